//! Train command - Fit the outcome classifier and save it

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use super::load_training_set;
use crate::{
    cli::{
        config::AppConfig,
        output::{format_number, print_kv, print_section},
    },
    pipeline::train,
};

#[derive(Parser, Debug)]
#[command(about = "Train the outcome classifier on a labelled CSV data set")]
pub struct TrainArgs {
    /// CSV file with nine cell symbols and an outcome label per row
    #[arg(long, short = 'd')]
    pub data: PathBuf,

    /// Laplace smoothing constant (overrides the config file)
    #[arg(long, short = 'a')]
    pub alpha: Option<f64>,

    /// Where to write the trained model
    #[arg(long, short = 'o')]
    pub output: PathBuf,
}

pub fn execute(args: TrainArgs, config: &AppConfig) -> Result<()> {
    let set = load_training_set(&args.data)?;

    let mut training = config
        .training
        .clone()
        .with_source(args.data.display().to_string());
    if let Some(alpha) = args.alpha {
        training = training.with_alpha(alpha);
    }

    let trained = train(&set, &training)
        .with_context(|| format!("Failed to train on {}", args.data.display()))?;

    print_section("Training Summary");
    print_kv("Examples", &format_number(set.len()));
    print_kv("Alpha", &training.alpha.to_string());
    print_kv("Vocabulary", &trained.encoder.vocabulary_size().to_string());
    for (class, count) in trained.model.classes()?.iter().zip(trained.model.class_counts()?) {
        print_kv(class.as_str(), &format_number(*count));
    }

    trained
        .save(&args.output)
        .with_context(|| format!("Failed to save model to {}", args.output.display()))?;
    println!("\n✓ Model saved to: {}", args.output.display());

    Ok(())
}
