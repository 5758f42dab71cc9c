//! CLI infrastructure for the bayes-ttt toolkit
//!
//! This module provides the command-line interface for training, validating,
//! querying and evaluating the outcome classifier.

pub mod commands;
pub mod config;
pub mod output;
