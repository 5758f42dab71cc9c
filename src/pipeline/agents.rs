//! Agent implementations: the model-driven player and its opponents

use std::fmt;

use rand::{Rng, SeedableRng, random, rngs::StdRng};

use crate::{
    Error, Result,
    classifier::CategoricalNaiveBayes,
    encoding::SymbolEncoder,
    ports::Agent,
    selection::{MoveConvention, MoveSelector},
    tictactoe::{BOARD_CELLS, Board, Player, WINNING_LINES},
};

/// Plays the classifier's one-ply greedy move
pub struct ModelAgent<'a> {
    name: String,
    model: &'a CategoricalNaiveBayes,
    encoder: &'a SymbolEncoder,
    selector: MoveSelector,
}

impl<'a> ModelAgent<'a> {
    pub fn new(
        name: String,
        model: &'a CategoricalNaiveBayes,
        encoder: &'a SymbolEncoder,
        convention: MoveConvention,
    ) -> Self {
        Self {
            name,
            model,
            encoder,
            selector: MoveSelector::new(convention),
        }
    }

    pub fn convention(&self) -> &MoveConvention {
        self.selector.convention()
    }
}

impl Agent for ModelAgent<'_> {
    fn select_move(&mut self, board: &Board, player: Player) -> Result<usize> {
        let agent = self.selector.convention().agent;
        if player != agent {
            return Err(Error::InvalidConfiguration {
                message: format!("{} is configured to play {agent}, not {player}", self.name),
            });
        }
        self.selector.select_move(board, self.model, self.encoder)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Random policy agent (baseline)
pub struct RandomAgent {
    name: String,
    rng: StdRng,
}

impl RandomAgent {
    /// Create a new random agent
    pub fn new(name: String) -> Self {
        Self {
            name,
            rng: StdRng::seed_from_u64(random()),
        }
    }

    /// Create a new random agent with a deterministic seed
    pub fn with_seed(name: String, seed: u64) -> Self {
        Self {
            name,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Agent for RandomAgent {
    fn select_move(&mut self, board: &Board, _player: Player) -> Result<usize> {
        let moves = board.empty_positions();
        if moves.is_empty() {
            return Err(Error::NoValidMoves);
        }
        let index = self.rng.random_range(0..moves.len());
        Ok(moves[index])
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_rng_seed(&mut self, seed: u64) -> Result<()> {
        self.rng = StdRng::seed_from_u64(seed);
        Ok(())
    }
}

/// Search strength of a [`MinimaxAgent`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Difficulty {
    /// Random move four times in five, otherwise a two-ply positional search
    Easy,
    /// Four or five plies with line bonuses; one move in five is random
    Medium,
    /// Full search with random tie-breaks
    #[default]
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

/// Alpha-beta minimax agent with selectable difficulty.
///
/// Wins score `1000 - depth` so faster wins and slower losses are preferred.
/// Cells are searched center first, then corners, then edges. Depth-limited
/// searches score the cut-off position with [`positional_score`]. On
/// [`Difficulty::Hard`] the agent always opens in the center and picks
/// uniformly among equally valued moves, so two hard agents always draw.
pub struct MinimaxAgent {
    name: String,
    difficulty: Difficulty,
    rng: StdRng,
}

/// Center, corners, edges
const SEARCH_ORDER: [usize; 9] = [4, 0, 2, 6, 8, 1, 3, 5, 7];
const CENTER: usize = 4;
/// Larger than any positional score
const WIN_SCORE: i32 = 1000;
const POSITION_WEIGHTS: [i32; 9] = [3, 2, 3, 2, 5, 2, 3, 2, 3];
const OWN_PAIR_BONUS: i32 = 10;
const OPPONENT_PAIR_PENALTY: i32 = 8;
const EASY_RANDOM_CHANCE: f64 = 0.8;
const MEDIUM_MISTAKE_CHANCE: f64 = 0.2;

/// Heuristic value of `board` for `player`.
///
/// Sums the cell weights (center 5, corners 3, edges 2) of the player's marks
/// minus the opponent's. With `line_bonus`, every line holding two of the
/// player's marks and an empty cell adds 10 and every such line of the
/// opponent's subtracts 8.
pub fn positional_score(board: &Board, player: Player, line_bonus: bool) -> i32 {
    let own = player.to_cell();
    let theirs = player.opponent().to_cell();
    let cells = board.cells();

    let mut score: i32 = cells
        .iter()
        .zip(POSITION_WEIGHTS)
        .map(|(&cell, weight)| match cell {
            c if c == own => weight,
            c if c == theirs => -weight,
            _ => 0,
        })
        .sum();

    if line_bonus {
        for line in WINNING_LINES {
            let mine = line.iter().filter(|&&i| cells[i] == own).count();
            let other = line.iter().filter(|&&i| cells[i] == theirs).count();
            match (mine, other) {
                (2, 0) => score += OWN_PAIR_BONUS,
                (0, 2) => score -= OPPONENT_PAIR_PENALTY,
                _ => {}
            }
        }
    }
    score
}

/// How far a search looks and how it scores the positions where it stops
#[derive(Debug, Clone, Copy)]
struct Search {
    /// Plies after which the position is scored heuristically
    horizon: Option<i32>,
    line_bonus: bool,
}

impl Search {
    const FULL: Search = Search {
        horizon: None,
        line_bonus: false,
    };

    fn limited(horizon: i32, line_bonus: bool) -> Self {
        Self {
            horizon: Some(horizon),
            line_bonus,
        }
    }

    /// Score of `board` for `to_move`, who is about to play
    fn negamax(self, board: &Board, to_move: Player, depth: i32, mut alpha: i32, beta: i32) -> i32 {
        if board.has_won(to_move.opponent()) {
            return depth - WIN_SCORE;
        }
        if board.is_full() {
            return 0;
        }
        if self.horizon.is_some_and(|h| depth >= h) {
            return positional_score(board, to_move, self.line_bonus);
        }

        let mut best = i32::MIN + 1;
        for pos in SEARCH_ORDER {
            if !board.is_empty(pos) {
                continue;
            }
            let child = place(board, pos, to_move);
            let value = -self.negamax(&child, to_move.opponent(), depth + 1, -beta, -alpha);
            best = best.max(value);
            alpha = alpha.max(value);
            if alpha >= beta {
                break;
            }
        }
        best
    }

    fn move_values(self, board: &Board, player: Player) -> Vec<(usize, i32)> {
        SEARCH_ORDER
            .iter()
            .filter(|&&pos| board.is_empty(pos))
            .map(|&pos| {
                let child = place(board, pos, player);
                let value = -self.negamax(&child, player.opponent(), 1, -WIN_SCORE, WIN_SCORE);
                (pos, value)
            })
            .collect()
    }
}

fn place(board: &Board, pos: usize, player: Player) -> Board {
    let mut cells = *board.cells();
    cells[pos] = player.to_cell();
    Board::from_cells(cells)
}

impl MinimaxAgent {
    /// Perfect-play agent
    pub fn new(name: String) -> Self {
        Self::with_difficulty(name, Difficulty::Hard)
    }

    pub fn with_difficulty(name: String, difficulty: Difficulty) -> Self {
        Self {
            name,
            difficulty,
            rng: StdRng::seed_from_u64(random()),
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Exact minimax value of every empty cell for `player`
    pub fn move_values(board: &Board, player: Player) -> Vec<(usize, i32)> {
        Search::FULL.move_values(board, player)
    }

    fn random_cell(&mut self, moves: &[usize]) -> usize {
        moves[self.rng.random_range(0..moves.len())]
    }
}

impl Agent for MinimaxAgent {
    fn select_move(&mut self, board: &Board, player: Player) -> Result<usize> {
        let moves = board.empty_positions();
        if moves.is_empty() {
            return Err(Error::NoValidMoves);
        }

        let search = match self.difficulty {
            Difficulty::Easy => {
                if self.rng.random_bool(EASY_RANDOM_CHANCE) {
                    return Ok(self.random_cell(&moves));
                }
                Search::limited(2, false)
            }
            Difficulty::Medium => Search::limited(self.rng.random_range(4..=5), true),
            Difficulty::Hard => {
                // Only reachable as the agent's first move, before any threat exists
                if moves.len() >= BOARD_CELLS - 1 && board.is_empty(CENTER) {
                    return Ok(CENTER);
                }
                Search::FULL
            }
        };

        let values = search.move_values(board, player);
        if self.difficulty == Difficulty::Medium && self.rng.random_bool(MEDIUM_MISTAKE_CHANCE) {
            return Ok(self.random_cell(&moves));
        }

        let best = values
            .iter()
            .map(|&(_, value)| value)
            .max()
            .ok_or(Error::NoValidMoves)?;
        let tied: Vec<usize> = values
            .iter()
            .filter(|&&(_, value)| value == best)
            .map(|&(pos, _)| pos)
            .collect();
        Ok(self.random_cell(&tied))
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_rng_seed(&mut self, seed: u64) -> Result<()> {
        self.rng = StdRng::seed_from_u64(seed);
        Ok(())
    }
}
