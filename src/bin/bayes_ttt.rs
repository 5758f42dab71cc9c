//! bayes-ttt CLI - Naive Bayes move selection for tic-tac-toe
//!
//! This CLI provides a unified interface for:
//! - Training the outcome classifier from a labelled CSV data set
//! - Validating it on a held-out split
//! - Picking moves for a given board
//! - Evaluating the greedy agent in self-play

use std::path::PathBuf;

use anyhow::{Context, Result};
use bayes_ttt::cli::{
    commands::{evaluate, predict, train, validate},
    config::AppConfig,
};
use clap::{Parser, Subcommand};
use flexi_logger::{Logger, LoggerHandle, opt_format};

#[derive(Parser)]
#[command(name = "bayes-ttt")]
#[command(version, about = "Naive Bayes move selection for tic-tac-toe", long_about = None)]
struct Cli {
    /// JSON configuration file with defaults for every command
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level or filter spec (overrides RUST_LOG)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train the classifier and save it
    Train(train::TrainArgs),

    /// Pick the next move for a board
    Predict(predict::PredictArgs),

    /// Evaluate the greedy agent against an opponent
    Evaluate(evaluate::EvaluateArgs),

    /// Measure held-out accuracy
    Validate(validate::ValidateArgs),
}

fn setup_logging(level: Option<&str>) -> Result<LoggerHandle> {
    let logger = match level {
        Some(spec) => Logger::try_with_str(spec),
        None => Logger::try_with_env_or_str("warn"),
    }
    .context("Invalid log specification")?;

    logger
        .log_to_stderr()
        .format(opt_format)
        .start()
        .context("Failed to start logger")
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _logger = setup_logging(cli.log_level.as_deref())?;
    let config = AppConfig::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Commands::Train(args) => train::execute(args, &config),
        Commands::Predict(args) => predict::execute(args, &config),
        Commands::Evaluate(args) => evaluate::execute(args, &config),
        Commands::Validate(args) => validate::execute(args, &config),
    }
}
