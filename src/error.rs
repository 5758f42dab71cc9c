//! Error types for the bayes_ttt crate

use thiserror::Error;

/// Main error type for the bayes_ttt crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("unknown symbol '{symbol}' at cell {position} (expected one of B, X, O)")]
    UnknownSymbol { symbol: String, position: usize },

    #[error("model has not been fitted: call fit before predicting")]
    UntrainedModel,

    #[error("cannot fit model: {reason}")]
    EmptyVocabularyOrData { reason: String },

    #[error(
        "feature {feature} has value {value} outside the fitted vocabulary of {categories} categories"
    )]
    UnseenFeatureValue {
        feature: usize,
        value: usize,
        categories: usize,
    },

    #[error("unknown class '{label}' (model classes: {available})")]
    UnknownClass { label: String, available: String },

    #[error("feature matrix has {rows} rows but label vector has {labels} labels")]
    LengthMismatch { rows: usize, labels: usize },

    #[error("smoothing constant {value} must be positive and finite")]
    InvalidSmoothing { value: f64 },

    #[error("invalid move: position {position} is out of bounds or already occupied")]
    InvalidMove { position: usize },

    #[error("no valid moves available")]
    NoValidMoves,

    #[error("game already over")]
    GameOver,

    #[error("board has {got} cells, expected {expected} in '{context}'")]
    InvalidBoardLength {
        expected: usize,
        got: usize,
        context: String,
    },

    #[error("invalid record on line {line}: {reason}")]
    InvalidRecord { line: u64, reason: String },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },

    #[error("corrupt model: {reason}")]
    CorruptModel { reason: String },

    #[error("unsupported model file version {found} (expected {expected})")]
    UnsupportedModelVersion { found: u32, expected: u32 },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to encode model: {0}")]
    ModelEncode(#[from] rmp_serde::encode::Error),

    #[error("failed to decode model: {0}")]
    ModelDecode(#[from] rmp_serde::decode::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
