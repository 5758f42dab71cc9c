//! Held-out evaluation of classifier predictions

use serde::{Deserialize, Serialize};

use crate::{Error, Result, types::ClassLabel};

/// Confusion matrix with rows for actual classes and columns for predictions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    classes: Vec<ClassLabel>,
    counts: Vec<Vec<usize>>,
}

/// Per-class precision, recall and F1
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassReport {
    pub class: ClassLabel,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

impl ConfusionMatrix {
    /// Tally predictions against ground truth.
    ///
    /// The class axis is the sorted union of labels in both slices.
    pub fn from_predictions(actual: &[ClassLabel], predicted: &[ClassLabel]) -> Result<Self> {
        if actual.len() != predicted.len() {
            return Err(Error::LengthMismatch {
                rows: predicted.len(),
                labels: actual.len(),
            });
        }

        let mut classes: Vec<ClassLabel> = actual.iter().chain(predicted).cloned().collect();
        classes.sort();
        classes.dedup();

        let mut counts = vec![vec![0; classes.len()]; classes.len()];
        for (a, p) in actual.iter().zip(predicted) {
            // Both labels come from `classes`, so the searches cannot miss
            if let (Ok(row), Ok(col)) = (classes.binary_search(a), classes.binary_search(p)) {
                counts[row][col] += 1;
            }
        }

        Ok(Self { classes, counts })
    }

    pub fn classes(&self) -> &[ClassLabel] {
        &self.classes
    }

    /// Count of rows with actual class `actual` predicted as `predicted`
    pub fn count(&self, actual: &ClassLabel, predicted: &ClassLabel) -> usize {
        match (
            self.classes.binary_search(actual),
            self.classes.binary_search(predicted),
        ) {
            (Ok(row), Ok(col)) => self.counts[row][col],
            _ => 0,
        }
    }

    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    /// Fraction of rows on the diagonal (0 for an empty matrix)
    pub fn accuracy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let correct: usize = (0..self.classes.len()).map(|i| self.counts[i][i]).sum();
        correct as f64 / total as f64
    }

    /// Precision, recall and F1 for every class
    pub fn report(&self) -> Vec<ClassReport> {
        let ratio = |num: usize, den: usize| if den == 0 { 0.0 } else { num as f64 / den as f64 };

        (0..self.classes.len())
            .map(|i| {
                let tp = self.counts[i][i];
                let support: usize = self.counts[i].iter().sum();
                let predicted: usize = self.counts.iter().map(|row| row[i]).sum();
                let precision = ratio(tp, predicted);
                let recall = ratio(tp, support);
                let f1 = if precision + recall == 0.0 {
                    0.0
                } else {
                    2.0 * precision * recall / (precision + recall)
                };
                ClassReport {
                    class: self.classes[i].clone(),
                    precision,
                    recall,
                    f1,
                    support,
                }
            })
            .collect()
    }
}
