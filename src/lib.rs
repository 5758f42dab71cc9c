//! Naive Bayes move selection for tic-tac-toe
//!
//! This crate provides:
//! - Tic-Tac-Toe boards, winning-line detection and game records
//! - A symbol encoder and a categorical Naive Bayes outcome classifier
//! - One-ply greedy move selection driven by the classifier
//! - Self-play evaluation against random and perfect-play opponents
//! - Training from labelled CSV data, held-out validation and persistence

pub mod classifier;
pub mod cli;
pub mod dataset;
pub mod encoding;
pub mod error;
pub mod pipeline;
pub mod ports;
pub mod selection;
pub mod tictactoe;
pub mod types;

pub use classifier::{CategoricalNaiveBayes, ClassProbabilities, SavedModel};
pub use dataset::{TrainingExample, TrainingSet};
pub use encoding::{EncodedBoard, SymbolEncoder};
pub use error::{Error, Result};
pub use pipeline::{
    EvaluationConfig, EvaluationResult, Evaluator, OutcomeCounts, TrainedModel, TrainingConfig,
    run_evaluation, simulate_game, train,
};
pub use selection::{MoveConvention, MoveSelector, select_move};
pub use tictactoe::{AgentOutcome, Board, Cell, Player};
pub use types::{ClassLabel, MoveScore};
