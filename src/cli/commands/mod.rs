//! Subcommand implementations

pub mod evaluate;
pub mod predict;
pub mod train;
pub mod validate;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::Args;

use crate::{
    cli::config::AppConfig,
    dataset::TrainingSet,
    pipeline::{TrainedModel, train},
    selection::MoveConvention,
    tictactoe::Player,
};

/// Where a command gets its model from: a saved file or a fresh fit
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct ModelSource {
    /// CSV data set to train on before running
    #[arg(long, short = 'd')]
    pub data: Option<PathBuf>,

    /// Previously saved model file
    #[arg(long, short = 'm')]
    pub model: Option<PathBuf>,
}

impl ModelSource {
    pub fn load(&self, config: &AppConfig) -> Result<TrainedModel> {
        match (&self.model, &self.data) {
            (Some(path), _) => TrainedModel::load(path)
                .with_context(|| format!("Failed to load model from {}", path.display())),
            (None, Some(path)) => {
                let set = load_training_set(path)?;
                let training = config
                    .training
                    .clone()
                    .with_source(path.display().to_string());
                train(&set, &training)
                    .with_context(|| format!("Failed to train on {}", path.display()))
            }
            (None, None) => Err(anyhow!("Either --data or --model is required")),
        }
    }
}

pub(crate) fn load_training_set(path: &Path) -> Result<TrainingSet> {
    TrainingSet::from_path(path)
        .with_context(|| format!("Failed to read training data from {}", path.display()))
}

pub(crate) fn parse_player_token(value: &str, flag: &str) -> Result<Player> {
    match value.trim().to_ascii_lowercase().as_str() {
        "x" | "first" | "player1" | "p1" => Ok(Player::X),
        "o" | "second" | "player2" | "p2" => Ok(Player::O),
        other => Err(anyhow!(
            "Invalid value '{other}' for {flag} (expected 'x' or 'o')"
        )),
    }
}

/// Convention for the agent playing `token`
pub(crate) fn convention_for(token: &str) -> Result<MoveConvention> {
    Ok(match parse_player_token(token, "--play")? {
        Player::X => MoveConvention::x_wins(),
        Player::O => MoveConvention::o_blocks(),
    })
}
