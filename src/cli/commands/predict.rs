//! Predict command - Score every move on a board and pick one

use anyhow::{Context, Result, bail};
use clap::Parser;

use super::{ModelSource, convention_for};
use crate::{
    cli::{
        config::AppConfig,
        output::{format_percent, print_board, print_kv, print_move_scores, print_subsection},
    },
    selection::MoveSelector,
    tictactoe::Board,
};

#[derive(Parser, Debug)]
#[command(about = "Pick the next move for a board")]
pub struct PredictArgs {
    #[command(flatten)]
    pub source: ModelSource,

    /// Board as rows separated by ';' and cells by ',' (e.g. "X,O,B;B,X,B;O,B,B")
    #[arg(long, short = 'b')]
    pub board: String,

    /// Which token the agent places (`x` or `o`)
    #[arg(long, default_value = "o")]
    pub play: String,
}

pub fn execute(args: PredictArgs, config: &AppConfig) -> Result<()> {
    let board = Board::decode(&args.board)
        .with_context(|| format!("Invalid board '{}'", args.board))?;
    if board.is_terminal() {
        bail!("Board is already finished:\n{board}");
    }

    let trained = args.source.load(config)?;
    let selector = MoveSelector::new(convention_for(&args.play)?);

    let probabilities = trained
        .model
        .predict_proba(&trained.encoder.encode(&board)?)?;
    let scores = selector.score_moves(&board, &trained.model, &trained.encoder)?;
    let chosen = trained.select_move(&board, &selector)?;

    print_subsection("Board");
    print_board(&board);

    print_subsection("Outcome probabilities");
    for (class, probability) in probabilities.iter() {
        print_kv(class.as_str(), &format_percent(probability));
    }

    let convention = selector.convention();
    print_subsection(&format!(
        "Move scores: P({}) after {} plays",
        convention.target_class, convention.agent
    ));
    print_move_scores(&scores, chosen);

    println!("\nSelected move: {chosen}");
    print_board(&board.with_move(chosen, convention.agent)?);

    Ok(())
}
