//! Agent port - abstraction over anything that can pick a move
//!
//! The evaluator drives games through this trait, so the model-driven agent,
//! the random baseline and the minimax opponent are interchangeable.

use crate::{
    Result,
    tictactoe::{Board, Player},
};

/// Unified interface for move-producing players
///
/// # Examples
///
/// ```no_run
/// use bayes_ttt::{
///     ports::Agent,
///     tictactoe::{Board, Player},
/// };
///
/// fn opening<A: Agent>(agent: &mut A) -> bayes_ttt::Result<usize> {
///     agent.select_move(&Board::empty(), Player::X)
/// }
/// ```
pub trait Agent: Send {
    /// Select an empty cell (0-8) for `player` to mark on `board`.
    ///
    /// # Errors
    ///
    /// Returns an error if no valid moves are available.
    fn select_move(&mut self, board: &Board, player: Player) -> Result<usize>;

    /// Get the agent's name, used in logs and reports.
    fn name(&self) -> &str;

    /// Seed the agent's internal random number generator.
    ///
    /// The evaluator reseeds its opponent before each game. Deterministic
    /// agents can ignore it.
    fn set_rng_seed(&mut self, _seed: u64) -> Result<()> {
        Ok(())
    }
}
