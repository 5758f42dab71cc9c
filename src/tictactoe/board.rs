//! Board representation and basic operations

use std::fmt;

use serde::{Deserialize, Serialize};

use super::lines::LineAnalyzer;

/// Number of cells on the board
pub const BOARD_CELLS: usize = 9;

/// A cell on the Tic-Tac-Toe board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    X,
    O,
}

impl Cell {
    /// All cell values, in declaration order
    pub const ALL: [Cell; 3] = [Cell::Empty, Cell::X, Cell::O];

    /// Canonical dataset symbol: "B" (blank), "X" or "O"
    pub fn symbol(self) -> &'static str {
        match self {
            Cell::Empty => "B",
            Cell::X => "X",
            Cell::O => "O",
        }
    }

    /// Parse a dataset symbol. Surrounding whitespace and case are ignored.
    pub fn from_symbol(symbol: &str) -> Option<Cell> {
        match symbol.trim().to_ascii_uppercase().as_str() {
            "B" => Some(Cell::Empty),
            "X" => Some(Cell::X),
            "O" => Some(Cell::O),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::X => 'X',
            Cell::O => 'O',
        }
    }
}

/// A player in the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    X,
    O,
}

impl Player {
    /// Get the opponent player
    pub fn opponent(self) -> Player {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    /// Convert player to cell
    pub fn to_cell(self) -> Cell {
        match self {
            Player::X => Cell::X,
            Player::O => Cell::O,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_cell().symbol())
    }
}

/// A validated 3x3 board.
///
/// Cells are indexed row-major from 0 (top-left) to 8 (bottom-right). Every
/// constructor validates shape and symbols, so downstream code never has to
/// re-check a `Board`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    cells: [Cell; BOARD_CELLS],
}

impl Board {
    /// Create an all-empty board
    pub fn empty() -> Self {
        Board {
            cells: [Cell::Empty; BOARD_CELLS],
        }
    }

    /// Create a board from already-typed cells
    pub fn from_cells(cells: [Cell; BOARD_CELLS]) -> Self {
        Board { cells }
    }

    /// Create a board from exactly nine dataset symbols.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidBoardLength`] if there are not exactly
    /// nine symbols and [`crate::Error::UnknownSymbol`] naming the first cell
    /// whose symbol is not one of B, X or O.
    pub fn from_symbols<S: AsRef<str>>(symbols: &[S]) -> Result<Self, crate::Error> {
        if symbols.len() != BOARD_CELLS {
            return Err(crate::Error::InvalidBoardLength {
                expected: BOARD_CELLS,
                got: symbols.len(),
                context: symbols
                    .iter()
                    .map(|s| s.as_ref())
                    .collect::<Vec<_>>()
                    .join(","),
            });
        }

        let mut cells = [Cell::Empty; BOARD_CELLS];
        for (position, symbol) in symbols.iter().enumerate() {
            let symbol = symbol.as_ref();
            cells[position] =
                Cell::from_symbol(symbol).ok_or_else(|| crate::Error::UnknownSymbol {
                    symbol: symbol.to_string(),
                    position,
                })?;
        }

        Ok(Board { cells })
    }

    /// Decode a free-form board description.
    ///
    /// Rows are separated by `;` and cells by `,`; blank entries are dropped.
    /// The result is padded with empty cells or truncated to nine cells, so
    /// `"X,O;B"` and `"X,O,B,B,X,B,O,B,B,X"` are both accepted.
    ///
    /// # Examples
    ///
    /// ```
    /// use bayes_ttt::tictactoe::{Board, Cell};
    ///
    /// let board = Board::decode("x,o,b; b,x,b; o,b,b").unwrap();
    /// assert_eq!(board.get(0), Cell::X);
    /// assert_eq!(board.get(6), Cell::O);
    /// assert_eq!(board.empty_positions(), vec![2, 3, 5, 7, 8]);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::UnknownSymbol`] for any entry outside B, X, O.
    pub fn decode(text: &str) -> Result<Self, crate::Error> {
        let mut cells = [Cell::Empty; BOARD_CELLS];
        let entries = text
            .split(';')
            .flat_map(|row| row.split(','))
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .take(BOARD_CELLS);

        for (position, entry) in entries.enumerate() {
            cells[position] =
                Cell::from_symbol(entry).ok_or_else(|| crate::Error::UnknownSymbol {
                    symbol: entry.to_string(),
                    position,
                })?;
        }

        Ok(Board { cells })
    }

    /// Borrow the raw cells
    pub fn cells(&self) -> &[Cell; BOARD_CELLS] {
        &self.cells
    }

    /// Get cell at position (0-8).
    ///
    /// # Panics
    ///
    /// Panics if `pos` is 9 or more.
    pub fn get(&self, pos: usize) -> Cell {
        self.cells[pos]
    }

    /// Check if a position is on the board and empty
    pub fn is_empty(&self, pos: usize) -> bool {
        self.cells.get(pos) == Some(&Cell::Empty)
    }

    /// Get all empty positions in ascending order
    pub fn empty_positions(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &cell)| cell == Cell::Empty)
            .map(|(i, _)| i)
            .collect()
    }

    /// Place a player's mark into an empty cell
    pub fn place(&mut self, pos: usize, player: Player) -> Result<(), crate::Error> {
        if pos >= BOARD_CELLS || !self.is_empty(pos) {
            return Err(crate::Error::InvalidMove { position: pos });
        }
        self.cells[pos] = player.to_cell();
        Ok(())
    }

    /// Return a copy of the board with the player's mark placed at `pos`
    #[must_use = "with_move returns a new board; the original is unchanged"]
    pub fn with_move(&self, pos: usize, player: Player) -> Result<Board, crate::Error> {
        let mut next = *self;
        next.place(pos, player)?;
        Ok(next)
    }

    /// Check if a player has won
    pub fn has_won(&self, player: Player) -> bool {
        LineAnalyzer::has_won(&self.cells, player)
    }

    /// Get the winner if there is one
    pub fn winner(&self) -> Option<Player> {
        if self.has_won(Player::X) {
            Some(Player::X)
        } else if self.has_won(Player::O) {
            Some(Player::O)
        } else {
            None
        }
    }

    /// Check if every cell is occupied
    pub fn is_full(&self) -> bool {
        !self.cells.contains(&Cell::Empty)
    }

    /// Check if the game is over (win or full board)
    pub fn is_terminal(&self) -> bool {
        self.winner().is_some() || self.is_full()
    }

    /// Dataset symbols for each cell, in board order
    pub fn symbols(&self) -> [&'static str; BOARD_CELLS] {
        self.cells.map(Cell::symbol)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, chunk) in self.cells.chunks(3).enumerate() {
            if row > 0 {
                writeln!(f)?;
            }
            for cell in chunk {
                write!(f, "{}", cell.to_char())?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_off_board_positions_are_not_empty() {
        let board = Board::empty();
        assert!(board.is_empty(8));
        assert!(!board.is_empty(BOARD_CELLS));
        assert!(!board.is_empty(usize::MAX));
        assert!(matches!(
            Board::empty().with_move(9, Player::X),
            Err(Error::InvalidMove { position: 9 })
        ));
    }

    #[test]
    fn test_from_symbols_accepts_mixed_case() {
        let board = Board::from_symbols(&["x", "O", "b", "B", "X", "B", "o", "B", "B"]).unwrap();
        assert_eq!(board.get(0), Cell::X);
        assert_eq!(board.get(1), Cell::O);
        assert_eq!(board.get(2), Cell::Empty);
        assert_eq!(board.empty_positions(), vec![2, 3, 5, 7, 8]);
    }

    #[test]
    fn test_from_symbols_rejects_unknown_symbol() {
        let err = Board::from_symbols(&["X", "O", "B", "B", "Q", "B", "O", "B", "B"]).unwrap_err();
        match err {
            Error::UnknownSymbol { symbol, position } => {
                assert_eq!(symbol, "Q");
                assert_eq!(position, 4);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_from_symbols_rejects_wrong_length() {
        let err = Board::from_symbols(&["X", "O"]).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidBoardLength {
                expected: 9,
                got: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_decode_rows_pads_missing_cells() {
        let board = Board::decode("X,O;B").unwrap();
        assert_eq!(board.get(0), Cell::X);
        assert_eq!(board.get(1), Cell::O);
        assert_eq!(board.empty_positions(), vec![2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_decode_truncates_excess_cells() {
        let board = Board::decode("X,X,X,X,X,X,X,X,X,O,O").unwrap();
        assert!(board.is_full());
        assert!(board.cells().iter().all(|&c| c == Cell::X));
    }

    #[test]
    fn test_decode_rejects_unknown_symbol() {
        let err = Board::decode("X,O,B;B,?,B").unwrap_err();
        assert!(matches!(err, Error::UnknownSymbol { position: 4, .. }));
    }

    #[test]
    fn test_place_rejects_occupied_cell() {
        let mut board = Board::empty();
        board.place(4, Player::X).unwrap();
        assert!(matches!(
            board.place(4, Player::O),
            Err(Error::InvalidMove { position: 4 })
        ));
        assert!(matches!(
            board.place(9, Player::O),
            Err(Error::InvalidMove { position: 9 })
        ));
    }

    #[test]
    fn test_with_move_leaves_original_untouched() {
        let board = Board::empty();
        let next = board.with_move(0, Player::O).unwrap();
        assert_eq!(board.get(0), Cell::Empty);
        assert_eq!(next.get(0), Cell::O);
    }

    #[test]
    fn test_terminal_detection() {
        let board = Board::decode("X,X,X;O,O,B;B,B,B").unwrap();
        assert_eq!(board.winner(), Some(Player::X));
        assert!(board.is_terminal());

        let draw = Board::decode("X,O,X;X,O,O;O,X,X").unwrap();
        assert_eq!(draw.winner(), None);
        assert!(draw.is_full());
        assert!(draw.is_terminal());
    }

    #[test]
    fn test_display_renders_rows() {
        let board = Board::decode("X,O,B;B,X,B;O,B,B").unwrap();
        assert_eq!(board.to_string(), "XO.\n.X.\nO..");
    }
}
