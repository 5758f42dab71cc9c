//! Training data loading
//!
//! Records are comma-separated lines of nine cell symbols followed by an
//! outcome label, as in the UCI Tic-Tac-Toe Endgame dataset:
//!
//! ```text
//! x,x,x,x,o,o,x,o,o,positive
//! x,x,x,x,o,o,o,x,o,positive
//! ```
//!
//! Blank lines are skipped, fields are trimmed and upper-cased, and anything
//! after the label is ignored.

use std::{fs::File, io::Read, path::Path};

use log::{debug, warn};
use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};
use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    encoding::{EncodedBoard, SymbolEncoder},
    tictactoe::{BOARD_CELLS, Board},
    types::ClassLabel,
};

/// A board with its recorded outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingExample {
    pub board: Board,
    pub outcome: ClassLabel,
}

/// Ordered collection of training examples
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingSet {
    examples: Vec<TrainingExample>,
}

impl TrainingSet {
    pub fn new(examples: Vec<TrainingExample>) -> Self {
        Self { examples }
    }

    /// Load records from a file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref()).map_err(|source| Error::Io {
            operation: format!("open training data {}", path.as_ref().display()),
            source,
        })?;
        let set = Self::from_reader(file)?;
        debug!(
            "loaded {} training examples from {}",
            set.len(),
            path.as_ref().display()
        );
        Ok(set)
    }

    /// Parse records from any reader.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRecord`] for a line with fewer than ten fields
    /// or an empty label, and [`Error::UnknownSymbol`] for a bad cell.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut examples = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            let line = record.position().map_or(0, |pos| pos.line());

            if record.iter().all(str::is_empty) {
                continue;
            }
            if record.len() < BOARD_CELLS + 1 {
                return Err(Error::InvalidRecord {
                    line,
                    reason: format!(
                        "expected {} cells and a label, found {} fields",
                        BOARD_CELLS,
                        record.len()
                    ),
                });
            }
            if record.len() > BOARD_CELLS + 1 {
                warn!(
                    "line {line}: ignoring {} trailing fields",
                    record.len() - BOARD_CELLS - 1
                );
            }

            let cells: Vec<&str> = record.iter().take(BOARD_CELLS).collect();
            let board = Board::from_symbols(&cells[..])?;
            let outcome = ClassLabel::new(&record[BOARD_CELLS]);
            if outcome.is_empty() {
                return Err(Error::InvalidRecord {
                    line,
                    reason: "empty outcome label".to_string(),
                });
            }

            examples.push(TrainingExample { board, outcome });
        }

        Ok(Self { examples })
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    pub fn examples(&self) -> &[TrainingExample] {
        &self.examples
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrainingExample> {
        self.examples.iter()
    }

    pub fn labels(&self) -> Vec<ClassLabel> {
        self.examples.iter().map(|e| e.outcome.clone()).collect()
    }

    /// Encoded feature matrix and label vector, row-aligned
    pub fn encode(&self, encoder: &SymbolEncoder) -> Result<(Vec<EncodedBoard>, Vec<ClassLabel>)> {
        let x = encoder.encode_all(self.examples.iter().map(|e| &e.board))?;
        Ok((x, self.labels()))
    }

    /// Shuffle with a fixed seed and split off `test_fraction` of the rows.
    ///
    /// Returns `(train, test)`. The test part gets `round(len * fraction)`
    /// rows.
    pub fn split(&self, test_fraction: f64, seed: u64) -> Result<(TrainingSet, TrainingSet)> {
        if !(0.0..1.0).contains(&test_fraction) {
            return Err(Error::InvalidConfiguration {
                message: format!("test fraction {test_fraction} must be in [0, 1)"),
            });
        }

        let mut shuffled = self.examples.clone();
        shuffled.shuffle(&mut StdRng::seed_from_u64(seed));

        let test_len = (shuffled.len() as f64 * test_fraction).round() as usize;
        let train = shuffled.split_off(test_len);
        Ok((TrainingSet::new(train), TrainingSet::new(shuffled)))
    }
}

impl FromIterator<TrainingExample> for TrainingSet {
    fn from_iter<I: IntoIterator<Item = TrainingExample>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
