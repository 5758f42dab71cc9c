//! Game records and outcomes

use serde::{Deserialize, Serialize};

use super::board::{Board, Player};

/// A move in the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub position: usize,
    pub player: Player,
}

/// Outcome of a finished board, independent of who is asking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOutcome {
    Win(Player),
    Draw,
}

impl GameOutcome {
    /// Outcome of a terminal board, or `None` while the game is still open
    pub fn of(board: &Board) -> Option<Self> {
        if let Some(winner) = board.winner() {
            Some(GameOutcome::Win(winner))
        } else if board.is_full() {
            Some(GameOutcome::Draw)
        } else {
            None
        }
    }

    /// View the outcome from one player's side
    pub fn for_player(self, player: Player) -> AgentOutcome {
        match self {
            GameOutcome::Win(winner) if winner == player => AgentOutcome::Win,
            GameOutcome::Win(_) => AgentOutcome::Loss,
            GameOutcome::Draw => AgentOutcome::Draw,
        }
    }
}

/// Outcome from the evaluated agent's perspective
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentOutcome {
    Win,
    Loss,
    Draw,
}

/// A complete game with history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    pub first_player: Player,
    pub moves: Vec<Move>,
    pub outcome: Option<GameOutcome>,
    board: Board,
}

impl Game {
    /// Start a game on an empty board
    pub fn new(first_player: Player) -> Self {
        Game {
            first_player,
            moves: Vec::new(),
            outcome: None,
            board: Board::empty(),
        }
    }

    /// Player whose turn it is
    pub fn to_move(&self) -> Player {
        if self.moves.len() % 2 == 0 {
            self.first_player
        } else {
            self.first_player.opponent()
        }
    }

    /// Current board
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Play a move for the player whose turn it is
    pub fn play(&mut self, position: usize) -> Result<Option<GameOutcome>, crate::Error> {
        if self.outcome.is_some() {
            return Err(crate::Error::GameOver);
        }

        let player = self.to_move();
        self.board.place(position, player)?;
        self.moves.push(Move { position, player });
        self.outcome = GameOutcome::of(&self.board);

        Ok(self.outcome)
    }
}
