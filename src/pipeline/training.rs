//! Training pipeline: fit the encoder and classifier on a labelled data set

use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    classifier::{
        CategoricalNaiveBayes, ConfusionMatrix, DEFAULT_ALPHA, ModelMetadata, SavedModel,
    },
    dataset::TrainingSet,
    encoding::SymbolEncoder,
    selection::MoveSelector,
    tictactoe::Board,
    types::ClassLabel,
};

/// Training configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Laplace smoothing constant
    pub alpha: f64,

    /// Description of the data source, recorded in saved models
    pub source: Option<String>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            source: None,
        }
    }
}

impl TrainingConfig {
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Fitted encoder and classifier, ready for inference
#[derive(Debug, Clone, PartialEq)]
pub struct TrainedModel {
    pub encoder: SymbolEncoder,
    pub model: CategoricalNaiveBayes,
    pub metadata: ModelMetadata,
}

impl TrainedModel {
    /// Pick the next move for the selector's convention
    pub fn select_move(&self, board: &Board, selector: &MoveSelector) -> Result<usize> {
        selector.select_move(board, &self.model, &self.encoder)
    }

    /// Most likely outcome class for `board`
    pub fn predict(&self, board: &Board) -> Result<ClassLabel> {
        self.model.predict(&self.encoder.encode(board)?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        SavedModel::new(
            self.encoder.clone(),
            self.model.clone(),
            self.metadata.clone(),
        )?
        .save_to_file(path)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::try_from(SavedModel::load_from_file(path)?)
    }
}

impl TryFrom<SavedModel> for TrainedModel {
    type Error = Error;

    fn try_from(saved: SavedModel) -> Result<Self> {
        let metadata = saved.metadata.clone();
        let (encoder, model) = saved.into_parts()?;
        Ok(Self {
            encoder,
            model,
            metadata,
        })
    }
}

/// Fit a classifier on every example in `set`.
///
/// Boards are encoded with the full B/O/X vocabulary whatever symbols the
/// data happens to use, so codes and category counts never depend on the
/// training set.
///
/// # Errors
///
/// Returns [`Error::EmptyVocabularyOrData`] for an empty set and
/// [`Error::InvalidSmoothing`] for a non-positive `alpha`.
pub fn train(set: &TrainingSet, config: &TrainingConfig) -> Result<TrainedModel> {
    if set.is_empty() {
        return Err(Error::EmptyVocabularyOrData {
            reason: "training set has no examples".to_string(),
        });
    }

    let encoder = SymbolEncoder::standard();
    let (features, labels) = set.encode(&encoder)?;
    let mut model = CategoricalNaiveBayes::new(encoder.vocabulary_size()).with_alpha(config.alpha);
    model.fit(&features, &labels)?;

    let classes = model.classes()?;
    for expected in [ClassLabel::positive(), ClassLabel::negative()] {
        if !classes.contains(&expected) {
            warn!("class {expected} does not occur in the training data");
        }
    }

    info!(
        "trained on {} examples with alpha {} ({} classes)",
        set.len(),
        config.alpha,
        classes.len()
    );

    Ok(TrainedModel {
        encoder,
        model,
        metadata: ModelMetadata {
            training_rows: set.len(),
            alpha: config.alpha,
            source: config.source.clone(),
        },
    })
}

/// Held-out validation summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub train_rows: usize,
    pub test_rows: usize,
    pub accuracy: f64,
    pub confusion: ConfusionMatrix,
}

/// Train on a seeded split of `set` and score predictions on the held-out
/// part.
pub fn validate(
    set: &TrainingSet,
    config: &TrainingConfig,
    test_fraction: f64,
    seed: u64,
) -> Result<ValidationReport> {
    let (train_set, test_set) = set.split(test_fraction, seed)?;
    if test_set.is_empty() {
        return Err(Error::InvalidConfiguration {
            message: format!(
                "test fraction {test_fraction} leaves no held-out rows out of {}",
                set.len()
            ),
        });
    }

    let trained = train(&train_set, config)?;
    let (features, actual) = test_set.encode(&trained.encoder)?;
    let predicted = trained.model.predict_batch(&features)?;

    let confusion = ConfusionMatrix::from_predictions(&actual, &predicted)?;
    let accuracy = confusion.accuracy();
    info!(
        "validated on {} held-out rows: accuracy {:.3}",
        test_set.len(),
        accuracy
    );

    Ok(ValidationReport {
        train_rows: train_set.len(),
        test_rows: test_set.len(),
        accuracy,
        confusion,
    })
}
