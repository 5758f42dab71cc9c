//! Observer implementations for evaluation runs
//!
//! Observers allow composable reporting during evaluation without coupling
//! the game loop to specific output formats.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use super::evaluation::OutcomeCounts;
use crate::{
    Error, Result,
    ports::Observer,
    tictactoe::{AgentOutcome, Board},
};

/// A single move in a traced game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepObservation {
    /// Ply within the game, starting at 0
    pub ply: usize,
    /// Board before the move, as nine B/X/O symbols
    pub board: Vec<String>,
    /// Cell that was marked
    pub move_position: usize,
    /// Whether the evaluated agent made this move
    pub by_agent: bool,
}

/// Complete trace of one evaluation game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub game_num: usize,
    /// Outcome from the agent's perspective
    pub outcome: AgentOutcome,
    pub steps: Vec<StepObservation>,
}

/// Progress bar observer - Shows evaluation progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    counts: OutcomeCounts,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            counts: OutcomeCounts::default(),
        }
    }

    fn message(&self) -> String {
        format!(
            "{} D:{} L:{}",
            self.counts.wins, self.counts.draws, self.counts.losses
        )
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_evaluation_start(&mut self, total_games: usize) -> Result<()> {
        let pb = ProgressBar::new(total_games as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} games (W:{msg})")
                .map_err(|e| Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_game_end(&mut self, game_num: usize, outcome: AgentOutcome) -> Result<()> {
        self.counts.record(outcome);

        if let Some(pb) = &self.progress_bar {
            pb.set_position(game_num as u64 + 1);
            pb.set_message(self.message());
        }
        Ok(())
    }

    fn on_evaluation_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(self.message());
        }
        Ok(())
    }
}

/// JSONL observer - Writes one traced game per line
pub struct JsonlObserver {
    writer: BufWriter<File>,
    current_game_steps: Vec<StepObservation>,
}

impl JsonlObserver {
    /// Create a new JSONL observer
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path.as_ref()).map_err(|source| Error::Io {
            operation: format!("create trace file {}", path.as_ref().display()),
            source,
        })?;
        Ok(Self {
            writer: BufWriter::new(file),
            current_game_steps: Vec::new(),
        })
    }
}

impl Observer for JsonlObserver {
    fn on_move(
        &mut self,
        _game_num: usize,
        ply: usize,
        board: &Board,
        move_pos: usize,
        by_agent: bool,
    ) -> Result<()> {
        if ply == 0 {
            self.current_game_steps.clear();
        }
        self.current_game_steps.push(StepObservation {
            ply,
            board: board.symbols().iter().map(|s| s.to_string()).collect(),
            move_position: move_pos,
            by_agent,
        });
        Ok(())
    }

    fn on_game_end(&mut self, game_num: usize, outcome: AgentOutcome) -> Result<()> {
        let observation = Observation {
            game_num,
            outcome,
            steps: std::mem::take(&mut self.current_game_steps),
        };

        serde_json::to_writer(&mut self.writer, &observation)?;
        writeln!(&mut self.writer)?;
        self.writer.flush()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::{BufRead, BufReader};

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_progress_observer_counts() {
        let mut observer = ProgressObserver::new();
        observer.on_game_end(0, AgentOutcome::Win).unwrap();
        observer.on_game_end(1, AgentOutcome::Draw).unwrap();
        assert_eq!(observer.counts.total(), 2);
        assert_eq!(observer.message(), "1 D:1 L:0");
    }

    #[test]
    fn test_jsonl_observer_writes_one_line_per_game() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("trace.jsonl");
        let mut observer = JsonlObserver::new(&path).unwrap();

        let mut board = Board::empty();
        observer.on_move(0, 0, &board, 4, false).unwrap();
        board.place(4, crate::tictactoe::Player::X).unwrap();
        observer.on_move(0, 1, &board, 0, true).unwrap();
        observer.on_game_end(0, AgentOutcome::Loss).unwrap();
        observer.on_move(1, 0, &Board::empty(), 0, false).unwrap();
        observer.on_game_end(1, AgentOutcome::Draw).unwrap();
        drop(observer);

        let lines: Vec<Observation> = BufReader::new(File::open(&path).unwrap())
            .lines()
            .map(|line| serde_json::from_str(&line.unwrap()).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].steps.len(), 2);
        assert_eq!(lines[0].steps[1].board[4], "X");
        assert!(lines[0].steps[1].by_agent);
        assert_eq!(lines[1].outcome, AgentOutcome::Draw);
        assert_eq!(lines[1].steps.len(), 1);
    }
}
