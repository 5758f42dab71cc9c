//! Categorical Naive Bayes over encoded boards
//!
//! For each class `c` the model stores the prior `P(c) = count(c) / N` and,
//! for each feature `i` and category `v`, the smoothed conditional
//!
//! ```text
//! P(x_i = v | c) = (count(x_i = v, c) + alpha) / (count(c) + alpha * K)
//! ```
//!
//! where `K` is the number of categories per feature. Inference works in log
//! space and normalizes with log-sum-exp, so the returned distribution sums
//! to one even when individual likelihoods underflow.

use std::collections::BTreeMap;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    encoding::EncodedBoard,
    tictactoe::BOARD_CELLS,
    types::ClassLabel,
};

/// Default additive smoothing constant (Laplace smoothing)
pub const DEFAULT_ALPHA: f64 = 1.0;

/// Categorical Naive Bayes classifier with additive smoothing.
///
/// A model is created unfitted; [`fit`](Self::fit) replaces any previous
/// parameters in one step, after which all inference methods take `&self`
/// and can run concurrently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalNaiveBayes {
    alpha: f64,
    n_categories: usize,
    fitted: Option<FittedTables>,
}

/// Parameter tables produced by a fit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct FittedTables {
    /// Sorted class labels; table rows follow this order
    classes: Vec<ClassLabel>,
    class_counts: Vec<usize>,
    class_log_prior: Vec<f64>,
    /// Indexed `[class][feature][category]`
    feature_log_prob: Vec<Vec<Vec<f64>>>,
    n_samples: usize,
}

/// Normalized class probabilities for one example, in model class order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassProbabilities {
    entries: Vec<(ClassLabel, f64)>,
}

impl ClassProbabilities {
    /// Probability assigned to `label`, if the model knows that class
    pub fn get(&self, label: &ClassLabel) -> Option<f64> {
        self.entries
            .iter()
            .find(|(class, _)| class == label)
            .map(|&(_, p)| p)
    }

    /// Most probable class; ties go to the class that sorts first
    pub fn most_likely(&self) -> Option<&ClassLabel> {
        let mut best: Option<&(ClassLabel, f64)> = None;
        for entry in &self.entries {
            if best.is_none_or(|b| entry.1 > b.1) {
                best = Some(entry);
            }
        }
        best.map(|(label, _)| label)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ClassLabel, f64)> {
        self.entries.iter().map(|(label, p)| (label, *p))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CategoricalNaiveBayes {
    /// Create an unfitted model for features with `n_categories` values each
    pub fn new(n_categories: usize) -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            n_categories,
            fitted: None,
        }
    }

    /// Set the smoothing constant (validated at fit time)
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn n_categories(&self) -> usize {
        self.n_categories
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    /// Number of training rows seen by the last fit
    pub fn n_samples(&self) -> Result<usize> {
        Ok(self.tables()?.n_samples)
    }

    /// Estimate priors and conditional tables from encoded boards and labels.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidSmoothing`] if alpha is not positive and finite
    /// - [`Error::EmptyVocabularyOrData`] for zero categories, zero rows or an
    ///   empty label
    /// - [`Error::LengthMismatch`] if `x` and `y` differ in length
    /// - [`Error::UnseenFeatureValue`] for a code outside `0..n_categories`
    pub fn fit(&mut self, x: &[EncodedBoard], y: &[ClassLabel]) -> Result<()> {
        if !(self.alpha.is_finite() && self.alpha > 0.0) {
            return Err(Error::InvalidSmoothing { value: self.alpha });
        }
        if self.n_categories == 0 {
            return Err(Error::EmptyVocabularyOrData {
                reason: "features have zero categories".to_string(),
            });
        }
        if x.len() != y.len() {
            return Err(Error::LengthMismatch {
                rows: x.len(),
                labels: y.len(),
            });
        }
        if x.is_empty() {
            return Err(Error::EmptyVocabularyOrData {
                reason: "training set has no examples".to_string(),
            });
        }

        let mut class_index: BTreeMap<&ClassLabel, usize> = BTreeMap::new();
        for (row, label) in y.iter().enumerate() {
            if label.is_empty() {
                return Err(Error::EmptyVocabularyOrData {
                    reason: format!("row {row} has an empty class label"),
                });
            }
            class_index.entry(label).or_insert(0);
        }
        let classes: Vec<ClassLabel> = class_index.keys().map(|&label| label.clone()).collect();
        for (idx, slot) in class_index.values_mut().enumerate() {
            *slot = idx;
        }

        let k = self.n_categories;
        let mut class_counts = vec![0usize; classes.len()];
        let mut category_counts = vec![vec![vec![0usize; k]; BOARD_CELLS]; classes.len()];

        for (features, label) in x.iter().zip(y) {
            let c = class_index[label];
            class_counts[c] += 1;
            for (feature, &value) in features.iter().enumerate() {
                if value >= k {
                    return Err(Error::UnseenFeatureValue {
                        feature,
                        value,
                        categories: k,
                    });
                }
                category_counts[c][feature][value] += 1;
            }
        }

        let n_samples = x.len();
        let class_log_prior = class_counts
            .iter()
            .map(|&count| (count as f64 / n_samples as f64).ln())
            .collect();

        let alpha = self.alpha;
        let feature_log_prob = category_counts
            .iter()
            .zip(&class_counts)
            .map(|(per_feature, &class_count)| {
                let denominator = (class_count as f64 + alpha * k as f64).ln();
                per_feature
                    .iter()
                    .map(|counts| {
                        counts
                            .iter()
                            .map(|&count| (count as f64 + alpha).ln() - denominator)
                            .collect()
                    })
                    .collect()
            })
            .collect();

        info!(
            "fitted categorical naive bayes on {n_samples} rows: classes {:?}, counts {:?}, alpha {alpha}",
            classes.iter().map(ClassLabel::as_str).collect::<Vec<_>>(),
            class_counts
        );

        self.fitted = Some(FittedTables {
            classes,
            class_counts,
            class_log_prior,
            feature_log_prob,
            n_samples,
        });
        Ok(())
    }

    /// Class labels seen during fit, in sorted order
    pub fn classes(&self) -> Result<&[ClassLabel]> {
        Ok(&self.tables()?.classes)
    }

    /// Number of training rows per class, in [`classes`](Self::classes) order
    pub fn class_counts(&self) -> Result<&[usize]> {
        Ok(&self.tables()?.class_counts)
    }

    /// Prior probability of a class
    pub fn prior(&self, label: &ClassLabel) -> Result<f64> {
        let tables = self.tables()?;
        let c = Self::class_position(tables, label)?;
        Ok(tables.class_log_prior[c].exp())
    }

    /// Smoothed `P(x_feature = value | label)`
    pub fn conditional(&self, feature: usize, value: usize, label: &ClassLabel) -> Result<f64> {
        let tables = self.tables()?;
        let c = Self::class_position(tables, label)?;
        self.check_value(feature, value)?;
        Ok(tables.feature_log_prob[c][feature][value].exp())
    }

    /// Unnormalized log posterior per class for one example
    pub fn joint_log_likelihood(&self, x: &EncodedBoard) -> Result<Vec<f64>> {
        let tables = self.tables()?;
        for (feature, &value) in x.iter().enumerate() {
            self.check_value(feature, value)?;
        }

        Ok(tables
            .class_log_prior
            .iter()
            .zip(&tables.feature_log_prob)
            .map(|(&log_prior, per_feature)| {
                log_prior
                    + x.iter()
                        .enumerate()
                        .map(|(feature, &value)| per_feature[feature][value])
                        .sum::<f64>()
            })
            .collect())
    }

    /// Normalized class probabilities for one encoded example.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UntrainedModel`] before [`fit`](Self::fit) and
    /// [`Error::UnseenFeatureValue`] for a code outside the fitted vocabulary.
    pub fn predict_proba(&self, x: &EncodedBoard) -> Result<ClassProbabilities> {
        let tables = self.tables()?;
        let scores = self.joint_log_likelihood(x)?;

        let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let log_norm = max + scores.iter().map(|s| (s - max).exp()).sum::<f64>().ln();

        let entries = tables
            .classes
            .iter()
            .zip(scores)
            .map(|(label, score)| (label.clone(), (score - log_norm).exp()))
            .collect();

        Ok(ClassProbabilities { entries })
    }

    /// Probability of a single class for one encoded example
    pub fn probability_of(&self, x: &EncodedBoard, label: &ClassLabel) -> Result<f64> {
        let tables = self.tables()?;
        let c = Self::class_position(tables, label)?;
        let probabilities = self.predict_proba(x)?;
        Ok(probabilities.entries[c].1)
    }

    /// Most probable class for one encoded example
    pub fn predict(&self, x: &EncodedBoard) -> Result<ClassLabel> {
        let probabilities = self.predict_proba(x)?;
        probabilities
            .most_likely()
            .cloned()
            .ok_or(Error::UntrainedModel)
    }

    /// Most probable class for each example
    pub fn predict_batch(&self, xs: &[EncodedBoard]) -> Result<Vec<ClassLabel>> {
        let predictions: Vec<ClassLabel> = xs.iter().map(|x| self.predict(x)).collect::<Result<_>>()?;
        debug!("predicted {} examples", predictions.len());
        Ok(predictions)
    }

    /// Ensure a class label is known to the fitted model
    pub fn require_class(&self, label: &ClassLabel) -> Result<()> {
        Self::class_position(self.tables()?, label).map(|_| ())
    }

    /// Verify that the parameter tables have the shapes inference indexes
    /// into. Models restored from disk go through this before use.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CorruptModel`] describing the first inconsistency.
    pub fn check_consistency(&self) -> Result<()> {
        let corrupt = |reason: String| Err(Error::CorruptModel { reason });

        if self.n_categories == 0 {
            return corrupt("zero categories per feature".to_string());
        }
        if !(self.alpha.is_finite() && self.alpha > 0.0) {
            return corrupt(format!("smoothing constant {} is not positive", self.alpha));
        }
        let Some(tables) = &self.fitted else {
            return Ok(());
        };

        let n_classes = tables.classes.len();
        if n_classes == 0 {
            return corrupt("no classes".to_string());
        }
        if !tables.classes.windows(2).all(|pair| pair[0] < pair[1]) {
            return corrupt("class labels are not sorted and unique".to_string());
        }
        if tables.class_counts.len() != n_classes
            || tables.class_log_prior.len() != n_classes
            || tables.feature_log_prob.len() != n_classes
        {
            return corrupt(format!(
                "{n_classes} classes but {} counts, {} priors and {} conditional tables",
                tables.class_counts.len(),
                tables.class_log_prior.len(),
                tables.feature_log_prob.len()
            ));
        }

        for (label, per_feature) in tables.classes.iter().zip(&tables.feature_log_prob) {
            if per_feature.len() != BOARD_CELLS {
                return corrupt(format!(
                    "class {label} has {} features, expected {BOARD_CELLS}",
                    per_feature.len()
                ));
            }
            if let Some(feature) = per_feature
                .iter()
                .position(|values| values.len() != self.n_categories)
            {
                return corrupt(format!(
                    "class {label} feature {feature} has {} categories, expected {}",
                    per_feature[feature].len(),
                    self.n_categories
                ));
            }
        }
        Ok(())
    }

    fn tables(&self) -> Result<&FittedTables> {
        self.fitted.as_ref().ok_or(Error::UntrainedModel)
    }

    fn class_position(tables: &FittedTables, label: &ClassLabel) -> Result<usize> {
        tables
            .classes
            .binary_search(label)
            .map_err(|_| Error::UnknownClass {
                label: label.to_string(),
                available: tables
                    .classes
                    .iter()
                    .map(ClassLabel::as_str)
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }

    fn check_value(&self, feature: usize, value: usize) -> Result<()> {
        if feature >= BOARD_CELLS || value >= self.n_categories {
            return Err(Error::UnseenFeatureValue {
                feature,
                value,
                categories: self.n_categories,
            });
        }
        Ok(())
    }
}
