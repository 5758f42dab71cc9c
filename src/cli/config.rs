//! Shared configuration types for CLI commands
//!
//! A JSON file passed with `--config` supplies defaults; explicit flags on
//! the command line override them.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::pipeline::{OpponentKind, TrainingConfig};

/// Top-level configuration file contents
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub common: CommonConfig,
    pub training: TrainingConfig,
    pub evaluation: EvaluationDefaults,
}

/// Common configuration shared across commands
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommonConfig {
    /// Random seed for reproducibility
    pub seed: Option<u64>,

    /// Whether to show progress bars
    pub progress: bool,
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            seed: None,
            progress: true,
        }
    }
}

/// Evaluation defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationDefaults {
    /// Number of evaluation games
    pub games: usize,

    /// Opponent type
    pub opponent: OpponentKind,

    /// Spread games over all cores
    pub parallel: bool,
}

impl Default for EvaluationDefaults {
    fn default() -> Self {
        Self {
            games: 100,
            opponent: OpponentKind::Random,
            parallel: false,
        }
    }
}

impl AppConfig {
    /// Read a JSON configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open config file {}", path.display()))?;
        serde_json::from_reader(file)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Load `path` if given, otherwise fall back to defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"training": {{"alpha": 0.5}}, "evaluation": {{"opponent": "minimax"}}}}"#
        )
        .unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.training.alpha, 0.5);
        assert_eq!(config.evaluation.opponent, OpponentKind::Minimax);
        assert_eq!(config.evaluation.games, 100);
        assert!(config.common.progress);
    }

    #[test]
    fn test_missing_config_file() {
        let err = AppConfig::load(Path::new("/nonexistent/bayes.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to open config file"));
    }
}
