//! Validate command - Held-out accuracy of the outcome classifier

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use super::load_training_set;
use crate::{
    cli::{
        config::AppConfig,
        output::{
            format_number, format_percent, print_confusion, print_kv, print_section,
            print_subsection,
        },
    },
    pipeline::validate,
};

#[derive(Parser, Debug)]
#[command(about = "Train on part of a data set and score the held-out rest")]
pub struct ValidateArgs {
    /// CSV file with nine cell symbols and an outcome label per row
    #[arg(long, short = 'd')]
    pub data: PathBuf,

    /// Share of rows held out for testing
    #[arg(long, short = 't', default_value_t = 0.2)]
    pub test_fraction: f64,

    /// Seed for the shuffle before splitting
    #[arg(long)]
    pub seed: Option<u64>,

    /// Laplace smoothing constant (overrides the config file)
    #[arg(long, short = 'a')]
    pub alpha: Option<f64>,
}

pub fn execute(args: ValidateArgs, config: &AppConfig) -> Result<()> {
    let set = load_training_set(&args.data)?;

    let mut training = config.training.clone();
    if let Some(alpha) = args.alpha {
        training = training.with_alpha(alpha);
    }
    let seed = args.seed.or(config.common.seed).unwrap_or(0);

    let report = validate(&set, &training, args.test_fraction, seed)
        .with_context(|| format!("Failed to validate on {}", args.data.display()))?;

    print_section("Validation Results");
    print_kv("Training rows", &format_number(report.train_rows));
    print_kv("Held-out rows", &format_number(report.test_rows));
    print_kv("Accuracy", &format_percent(report.accuracy));

    print_subsection("Confusion matrix (rows: actual, columns: predicted)");
    print_confusion(&report.confusion);

    print_subsection("Per-class metrics");
    for class in report.confusion.report() {
        println!(
            "  {:10} precision {:.3}  recall {:.3}  f1 {:.3}  support {}",
            class.class.as_str(),
            class.precision,
            class.recall,
            class.f1,
            class.support
        );
    }

    Ok(())
}
