//! Outcome classifier
//!
//! This module provides the categorical Naive Bayes model used to score
//! boards, held-out evaluation metrics, and model persistence.

pub mod metrics;
pub mod naive_bayes;
pub mod persistence;

pub use metrics::{ClassReport, ConfusionMatrix};
pub use naive_bayes::{CategoricalNaiveBayes, ClassProbabilities, DEFAULT_ALPHA};
pub use persistence::{ModelMetadata, SavedModel};
