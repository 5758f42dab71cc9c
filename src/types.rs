//! Newtype wrappers for improved type safety and domain modeling.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An outcome class label, normalized to upper case.
///
/// The reference dataset uses `POSITIVE` (X won) and `NEGATIVE` (X did not
/// win), but any non-empty label is accepted so that richer label sets keep
/// working.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClassLabel(String);

impl ClassLabel {
    /// Label used by the dataset for "X wins"
    pub const POSITIVE: &'static str = "POSITIVE";
    /// Label used by the dataset for "X does not win"
    pub const NEGATIVE: &'static str = "NEGATIVE";

    /// Create a label, trimming whitespace and upper-casing.
    pub fn new(label: impl AsRef<str>) -> Self {
        ClassLabel(label.as_ref().trim().to_ascii_uppercase())
    }

    pub fn positive() -> Self {
        ClassLabel(Self::POSITIVE.to_string())
    }

    pub fn negative() -> Self {
        ClassLabel(Self::NEGATIVE.to_string())
    }

    /// Get the label as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check whether the label is empty after normalization.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for ClassLabel {
    fn from(label: &str) -> Self {
        ClassLabel::new(label)
    }
}

impl AsRef<str> for ClassLabel {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClassLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A legal move together with the model's probability of the target class
/// after hypothetically playing it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoveScore {
    pub position: usize,
    pub probability: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_label_normalizes() {
        assert_eq!(ClassLabel::new("  positive "), ClassLabel::positive());
        assert_eq!(ClassLabel::from("Negative").as_str(), "NEGATIVE");
    }

    #[test]
    fn test_class_labels_sort_alphabetically() {
        let mut labels = vec![ClassLabel::positive(), ClassLabel::negative()];
        labels.sort();
        assert_eq!(labels, vec![ClassLabel::negative(), ClassLabel::positive()]);
    }
}
