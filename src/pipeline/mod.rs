//! Training and evaluation pipeline abstractions
//!
//! This module provides composable pipelines for:
//! - Training the outcome classifier from a labelled data set
//! - Validating it on a held-out split
//! - Evaluating the greedy agent in self-play against baseline opponents
//! - Recording observations during evaluation

pub mod agents;
pub mod evaluation;
pub mod observers;
pub mod training;

pub use agents::{Difficulty, MinimaxAgent, ModelAgent, RandomAgent, positional_score};
pub use evaluation::{
    EvaluationConfig, EvaluationResult, Evaluator, OpponentKind, OutcomeCounts, play_game,
    run_evaluation, simulate_game, wilson_interval,
};
pub use observers::{JsonlObserver, Observation, ProgressObserver, StepObservation};
pub use training::{TrainedModel, TrainingConfig, ValidationReport, train, validate};

pub use crate::ports::{Agent, Observer};
