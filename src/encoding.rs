//! Ordinal encoding of board symbols into classifier features
//!
//! Every board position shares one vocabulary. Codes are assigned in sorted
//! symbol order, which for the full vocabulary gives `B -> 0`, `O -> 1`,
//! `X -> 2`, the convention the training data was labelled with.

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    tictactoe::{BOARD_CELLS, Board, Cell},
};

/// One ordinal code per board position
pub type EncodedBoard = [usize; BOARD_CELLS];

/// Maps cell symbols to integer codes.
///
/// The encoder is immutable once fitted, so the same instance can be shared
/// between training and any number of concurrent inference calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolEncoder {
    /// Vocabulary in code order: `categories[code]` is the cell for `code`
    categories: Vec<Cell>,
}

impl SymbolEncoder {
    /// Fit an encoder on a vocabulary of cells.
    ///
    /// Duplicates are ignored and codes follow sorted symbol order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyVocabularyOrData`] if the vocabulary is empty.
    pub fn fit(vocabulary: &[Cell]) -> Result<Self> {
        let mut categories = vocabulary.to_vec();
        categories.sort_by_key(|cell| cell.symbol());
        categories.dedup();

        if categories.is_empty() {
            return Err(Error::EmptyVocabularyOrData {
                reason: "symbol vocabulary is empty".to_string(),
            });
        }

        Ok(Self { categories })
    }

    /// Fit an encoder on raw dataset symbols such as `["B", "X", "O"]`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownSymbol`] if a symbol is outside B, X, O, with
    /// `position` giving its index in `symbols`.
    pub fn fit_symbols<S: AsRef<str>>(symbols: &[S]) -> Result<Self> {
        let cells = symbols
            .iter()
            .enumerate()
            .map(|(position, symbol)| {
                Cell::from_symbol(symbol.as_ref()).ok_or_else(|| Error::UnknownSymbol {
                    symbol: symbol.as_ref().to_string(),
                    position,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::fit(&cells)
    }

    /// Encoder over the full three-symbol vocabulary
    pub fn standard() -> Self {
        let mut categories = Cell::ALL.to_vec();
        categories.sort_by_key(|cell| cell.symbol());
        Self { categories }
    }

    /// Number of distinct codes per position
    pub fn vocabulary_size(&self) -> usize {
        self.categories.len()
    }

    /// Vocabulary in code order
    pub fn categories(&self) -> &[Cell] {
        &self.categories
    }

    /// Code for a single cell value found at `position`
    pub fn code(&self, cell: Cell, position: usize) -> Result<usize> {
        self.categories
            .iter()
            .position(|&c| c == cell)
            .ok_or_else(|| Error::UnknownSymbol {
                symbol: cell.symbol().to_string(),
                position,
            })
    }

    /// Encode every cell of a board.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownSymbol`] naming the first cell whose value is
    /// not in the fitted vocabulary.
    pub fn encode(&self, board: &Board) -> Result<EncodedBoard> {
        let mut encoded = [0; BOARD_CELLS];
        for (position, &cell) in board.cells().iter().enumerate() {
            encoded[position] = self.code(cell, position)?;
        }
        Ok(encoded)
    }

    /// Validate nine raw symbols as a board and encode them.
    pub fn encode_symbols<S: AsRef<str>>(&self, symbols: &[S]) -> Result<EncodedBoard> {
        self.encode(&Board::from_symbols(symbols)?)
    }

    /// Encode a batch of boards, failing on the first bad cell
    pub fn encode_all<'a, I>(&self, boards: I) -> Result<Vec<EncodedBoard>>
    where
        I: IntoIterator<Item = &'a Board>,
    {
        boards.into_iter().map(|board| self.encode(board)).collect()
    }
}

impl Default for SymbolEncoder {
    fn default() -> Self {
        Self::standard()
    }
}
