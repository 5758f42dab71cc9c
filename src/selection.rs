//! One-ply greedy move selection driven by the outcome classifier
//!
//! Every empty cell is tried in turn: the agent's mark is placed there on a
//! copy of the board, the copy is encoded and classified, and the move whose
//! board gives the highest probability for the target class wins. Ties keep
//! the lowest cell index.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    classifier::CategoricalNaiveBayes,
    encoding::SymbolEncoder,
    tictactoe::{Board, Player},
    types::{ClassLabel, MoveScore},
};

/// Pairing of the mark the agent places with the class it maximizes.
///
/// The dataset labels boards `POSITIVE` when X won, so the two coherent
/// pairings are X maximizing `POSITIVE` and O maximizing `NEGATIVE`. A
/// selector holds exactly one convention for its whole lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveConvention {
    pub agent: Player,
    pub target_class: ClassLabel,
}

impl MoveConvention {
    pub fn new(agent: Player, target_class: ClassLabel) -> Self {
        Self {
            agent,
            target_class,
        }
    }

    /// Play X and maximize the probability that X wins
    pub fn x_wins() -> Self {
        Self::new(Player::X, ClassLabel::positive())
    }

    /// Play O and maximize the probability that X does not win
    pub fn o_blocks() -> Self {
        Self::new(Player::O, ClassLabel::negative())
    }
}

impl Default for MoveConvention {
    fn default() -> Self {
        Self::o_blocks()
    }
}

/// Greedy move selector for a fixed convention
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveSelector {
    convention: MoveConvention,
}

impl MoveSelector {
    pub fn new(convention: MoveConvention) -> Self {
        Self { convention }
    }

    pub fn convention(&self) -> &MoveConvention {
        &self.convention
    }

    /// Score every empty cell, in ascending cell order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownClass`] if the model was not trained on the
    /// target class, [`Error::UntrainedModel`] if it was not trained at all,
    /// and encoder errors unchanged.
    pub fn score_moves(
        &self,
        board: &Board,
        model: &CategoricalNaiveBayes,
        encoder: &SymbolEncoder,
    ) -> Result<Vec<MoveScore>> {
        model.require_class(&self.convention.target_class)?;

        board
            .empty_positions()
            .into_iter()
            .map(|position| {
                let hypothetical = board.with_move(position, self.convention.agent)?;
                let encoded = encoder.encode(&hypothetical)?;
                let probability = model.probability_of(&encoded, &self.convention.target_class)?;
                Ok(MoveScore {
                    position,
                    probability,
                })
            })
            .collect()
    }

    /// Pick the empty cell with the highest target-class probability.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoValidMoves`] on a full board, plus anything
    /// [`score_moves`](Self::score_moves) can return.
    pub fn select_move(
        &self,
        board: &Board,
        model: &CategoricalNaiveBayes,
        encoder: &SymbolEncoder,
    ) -> Result<usize> {
        let scores = self.score_moves(board, model, encoder)?;

        let mut best: Option<MoveScore> = None;
        for score in scores {
            if best.is_none_or(|b| score.probability > b.probability) {
                best = Some(score);
            }
        }

        let best = best.ok_or(Error::NoValidMoves)?;
        debug!(
            "{} selects cell {} (P({}) = {:.4})",
            self.convention.agent, best.position, self.convention.target_class, best.probability
        );
        Ok(best.position)
    }
}

/// Select a move with the default convention (O maximizing `NEGATIVE`)
pub fn select_move(
    board: &Board,
    model: &CategoricalNaiveBayes,
    encoder: &SymbolEncoder,
) -> Result<usize> {
    MoveSelector::default().select_move(board, model, encoder)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model_from(rows: &[(&str, &str)]) -> CategoricalNaiveBayes {
        let encoder = SymbolEncoder::standard();
        let x: Vec<_> = rows
            .iter()
            .map(|(board, _)| encoder.encode(&Board::decode(board).unwrap()).unwrap())
            .collect();
        let y: Vec<_> = rows.iter().map(|(_, label)| ClassLabel::new(label)).collect();
        let mut model = CategoricalNaiveBayes::new(encoder.vocabulary_size());
        model.fit(&x, &y).unwrap();
        model
    }

    #[test]
    fn test_selects_only_empty_cells() {
        let model = model_from(&[
            ("X,X,X;O,O,B;B,B,B", "positive"),
            ("O,O,O;X,X,B;X,B,B", "negative"),
        ]);
        let encoder = SymbolEncoder::standard();
        let board = Board::decode("X,O,B;B,X,B;O,B,B").unwrap();

        for selector in [
            MoveSelector::new(MoveConvention::x_wins()),
            MoveSelector::new(MoveConvention::o_blocks()),
        ] {
            let chosen = selector.select_move(&board, &model, &encoder).unwrap();
            assert!([2, 3, 5, 7, 8].contains(&chosen), "chose {chosen}");
        }
    }

    #[test]
    fn test_score_moves_covers_every_empty_cell() {
        let model = model_from(&[
            ("X,X,X;O,O,B;B,B,B", "positive"),
            ("O,O,O;X,X,B;X,B,B", "negative"),
        ]);
        let board = Board::decode("X,O,B;B,X,B;O,B,B").unwrap();
        let scores = MoveSelector::new(MoveConvention::x_wins())
            .score_moves(&board, &model, &SymbolEncoder::standard())
            .unwrap();

        let positions: Vec<_> = scores.iter().map(|s| s.position).collect();
        assert_eq!(positions, vec![2, 3, 5, 7, 8]);
        assert!(scores.iter().all(|s| s.probability > 0.0 && s.probability < 1.0));
    }

    #[test]
    fn test_prefers_cell_seen_in_positive_boards() {
        // X in the center only ever appears in winning boards
        let model = model_from(&[
            ("B,B,B;B,X,B;B,B,B", "positive"),
            ("B,B,B;B,X,B;B,B,B", "positive"),
            ("X,B,B;B,B,B;B,B,B", "negative"),
            ("B,B,X;B,B,B;B,B,B", "negative"),
        ]);
        let chosen = MoveSelector::new(MoveConvention::x_wins())
            .select_move(&Board::empty(), &model, &SymbolEncoder::standard())
            .unwrap();
        assert_eq!(chosen, 4);
    }

    #[test]
    fn test_ties_break_to_lowest_index() {
        // A single class makes every move score exactly 1.0
        let model = model_from(&[("B,B,B;B,B,B;B,B,B", "negative")]);
        let board = Board::decode("X,B,B;B,B,B;B,B,B").unwrap();
        let chosen = select_move(&board, &model, &SymbolEncoder::standard()).unwrap();
        assert_eq!(chosen, 1);
    }

    #[test]
    fn test_full_board_has_no_move() {
        let model = model_from(&[("B,B,B;B,B,B;B,B,B", "negative")]);
        let board = Board::decode("X,O,X;X,O,O;O,X,X").unwrap();
        assert!(matches!(
            select_move(&board, &model, &SymbolEncoder::standard()),
            Err(Error::NoValidMoves)
        ));
    }

    #[test]
    fn test_missing_target_class_is_reported() {
        let model = model_from(&[("B,B,B;B,B,B;B,B,B", "positive")]);
        let err = select_move(&Board::empty(), &model, &SymbolEncoder::standard()).unwrap_err();
        assert!(matches!(err, Error::UnknownClass { .. }));
    }
}
