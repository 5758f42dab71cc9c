//! Evaluate command - Play the greedy agent against a baseline opponent

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use super::{ModelSource, convention_for, parse_player_token};
use crate::{
    cli::{
        config::AppConfig,
        output::{format_number, format_percent, print_kv, print_section},
    },
    pipeline::{EvaluationConfig, Evaluator, JsonlObserver, OpponentKind, ProgressObserver},
};

#[derive(Parser, Debug)]
#[command(about = "Evaluate the greedy agent in self-play")]
pub struct EvaluateArgs {
    #[command(flatten)]
    pub source: ModelSource,

    /// Opponent to evaluate against (`random`, `easy`, `medium` or `minimax`)
    #[arg(long, short = 'o')]
    pub opponent: Option<OpponentKind>,

    /// Number of evaluation games
    #[arg(long, short = 'g')]
    pub games: Option<usize>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Which token the evaluated agent controls (`x` or `o`)
    #[arg(long, default_value = "o")]
    pub play: String,

    /// Which token makes the first move (defaults to the opponent's)
    #[arg(long)]
    pub first_player: Option<String>,

    /// Spread games over all cores
    #[arg(long)]
    pub parallel: bool,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Write one JSON line per game with every move
    #[arg(long)]
    pub trace: Option<PathBuf>,

    /// Export results to file
    #[arg(long)]
    pub export: Option<PathBuf>,
}

pub fn execute(args: EvaluateArgs, config: &AppConfig) -> Result<()> {
    let trained = args.source.load(config)?;
    let convention = convention_for(&args.play)?;
    let first_player = match &args.first_player {
        Some(value) => parse_player_token(value, "--first-player")?,
        None => convention.agent.opponent(),
    };

    let defaults = &config.evaluation;
    let mut eval_config = EvaluationConfig::default()
        .with_games(args.games.unwrap_or(defaults.games))
        .with_opponent(args.opponent.unwrap_or(defaults.opponent))
        .with_first_player(first_player)
        .with_convention(convention);
    if let Some(seed) = args.seed.or(config.common.seed) {
        eval_config = eval_config.with_seed(seed);
    }
    let parallel = args.parallel || defaults.parallel;

    print_section("Evaluation Configuration");
    print_kv("Opponent", &eval_config.opponent.to_string());
    print_kv(
        "Agent plays as",
        &format!("{} (first player: {first_player})", eval_config.agent_player()),
    );
    print_kv("Target class", eval_config.convention.target_class.as_str());
    print_kv("Games", &format_number(eval_config.games));
    if let Some(seed) = eval_config.seed {
        print_kv("Seed", &seed.to_string());
    }

    let mut evaluator = Evaluator::new(eval_config);
    if config.common.progress && !args.no_progress {
        evaluator = evaluator.with_observer(Box::new(ProgressObserver::new()));
    }
    if let Some(path) = &args.trace {
        if parallel {
            log::warn!("--trace records moves only in sequential runs");
        }
        let observer = JsonlObserver::new(path)
            .with_context(|| format!("Failed to create trace file {}", path.display()))?;
        evaluator = evaluator.with_observer(Box::new(observer));
    }

    let result = if parallel {
        evaluator.run_parallel(&trained.model, &trained.encoder)?
    } else {
        evaluator.run(&trained.model, &trained.encoder)?
    };

    print_section("Evaluation Results");
    print_kv("Total games", &format_number(result.total_games));
    print_kv(
        "Wins",
        &format!("{} ({})", result.wins, format_percent(result.win_rate)),
    );
    print_kv(
        "Draws",
        &format!("{} ({})", result.draws, format_percent(result.draw_rate)),
    );
    print_kv(
        "Losses",
        &format!("{} ({})", result.losses, format_percent(result.loss_rate)),
    );
    let (lo, hi) = result.win_rate_interval;
    print_kv(
        "Win rate 95% CI",
        &format!("{} .. {}", format_percent(lo), format_percent(hi)),
    );

    if let Some(export_path) = &args.export {
        result
            .save(export_path)
            .with_context(|| format!("Failed to export results to {}", export_path.display()))?;
        println!("\n✓ Results exported to: {}", export_path.display());
    }

    Ok(())
}
