//! Common test utilities for the bayes_ttt test suite.
//!
//! Builds labelled endgame data sets from seeded random games, in the same
//! shape as the tic-tac-toe endgame corpus: X always opens, and a board is
//! `POSITIVE` exactly when X has won.

#![allow(dead_code)]

use std::{io::Write, path::Path};

use bayes_ttt::{
    Board, ClassLabel, Player, TrainingExample, TrainingSet,
    tictactoe::{Game, GameOutcome},
};
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Play one uniformly random game with X first and label its final board.
pub fn random_endgame(rng: &mut StdRng) -> TrainingExample {
    let mut game = Game::new(Player::X);
    while game.outcome.is_none() {
        let moves = game.board().empty_positions();
        let position = moves[rng.random_range(0..moves.len())];
        game.play(position).unwrap();
    }

    let outcome = match game.outcome {
        Some(GameOutcome::Win(Player::X)) => ClassLabel::positive(),
        _ => ClassLabel::negative(),
    };
    TrainingExample {
        board: *game.board(),
        outcome,
    }
}

/// `n` random endgames from a fixed seed.
pub fn endgame_set(n: usize, seed: u64) -> TrainingSet {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| random_endgame(&mut rng)).collect()
}

/// Write `set` as CSV rows of nine lowercase cell symbols and a label.
pub fn write_csv(set: &TrainingSet, path: &Path) {
    let mut file = std::fs::File::create(path).unwrap();
    for example in set.iter() {
        let cells: Vec<String> = example
            .board
            .symbols()
            .iter()
            .map(|s| s.to_lowercase())
            .collect();
        writeln!(
            file,
            "{},{}",
            cells.join(","),
            example.outcome.as_str().to_lowercase()
        )
        .unwrap();
    }
}

/// Decode a board in the row/column text format.
pub fn board(text: &str) -> Board {
    Board::decode(text).unwrap()
}
