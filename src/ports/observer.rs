//! Observer port - abstraction for watching evaluation runs
//!
//! Observers receive lifecycle events from the evaluator, keeping progress
//! display and other reporting out of the game loop.

use crate::{
    Result,
    tictactoe::{AgentOutcome, Board},
};

/// Observer trait for monitoring evaluation
///
/// # Event Sequence
///
/// 1. `on_evaluation_start(total_games)` - Once at the beginning
/// 2. For each game:
///    - `on_move(...)` - For each move in the game
///    - `on_game_end(game_num, outcome)`
/// 3. `on_evaluation_end()` - Once at the end
///
/// Parallel runs only report `on_game_end`, in game order, after all games
/// have finished.
///
/// # Examples
///
/// ```no_run
/// use bayes_ttt::{ports::Observer, tictactoe::AgentOutcome};
///
/// struct WinCounter {
///     wins: usize,
/// }
///
/// impl Observer for WinCounter {
///     fn on_game_end(&mut self, _game_num: usize, outcome: AgentOutcome) -> bayes_ttt::Result<()> {
///         if outcome == AgentOutcome::Win {
///             self.wins += 1;
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Observer: Send {
    /// Called once before the first game.
    fn on_evaluation_start(&mut self, _total_games: usize) -> Result<()> {
        Ok(())
    }

    /// Called after each move with the board before the move.
    fn on_move(
        &mut self,
        _game_num: usize,
        _ply: usize,
        _board: &Board,
        _move_pos: usize,
        _by_agent: bool,
    ) -> Result<()> {
        Ok(())
    }

    /// Called when a game reaches a terminal board.
    fn on_game_end(&mut self, _game_num: usize, _outcome: AgentOutcome) -> Result<()> {
        Ok(())
    }

    /// Called once after the last game.
    fn on_evaluation_end(&mut self) -> Result<()> {
        Ok(())
    }
}
