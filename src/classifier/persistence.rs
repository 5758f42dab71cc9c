//! Saving and loading trained models.
//!
//! A saved model bundles the fitted classifier with the encoder it was
//! trained against, so inference after a load uses exactly the same codes.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use serde::{Deserialize, Serialize};

use super::naive_bayes::CategoricalNaiveBayes;
use crate::{Error, Result, encoding::SymbolEncoder};

/// Provenance recorded alongside a saved model
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Rows in the training set
    pub training_rows: usize,
    /// Smoothing constant used for the fit
    pub alpha: f64,
    /// Where the training data came from, if known
    pub source: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedModel {
    pub version: u32,
    pub encoder: SymbolEncoder,
    pub model: CategoricalNaiveBayes,
    pub metadata: ModelMetadata,
}

impl SavedModel {
    pub const VERSION: u32 = 1;

    /// Wrap a fitted model for saving.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UntrainedModel`] if the model has not been fitted.
    pub fn new(
        encoder: SymbolEncoder,
        model: CategoricalNaiveBayes,
        metadata: ModelMetadata,
    ) -> Result<Self> {
        if !model.is_fitted() {
            return Err(Error::UntrainedModel);
        }
        Ok(Self {
            version: Self::VERSION,
            encoder,
            model,
            metadata,
        })
    }

    /// Check the format version and table shapes, then hand back the parts.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedModelVersion`] for another format version
    /// and [`Error::CorruptModel`] when the encoder and model disagree on the
    /// vocabulary or the model's tables are malformed.
    pub fn into_parts(self) -> Result<(SymbolEncoder, CategoricalNaiveBayes)> {
        if self.version != Self::VERSION {
            return Err(Error::UnsupportedModelVersion {
                found: self.version,
                expected: Self::VERSION,
            });
        }
        if self.encoder.vocabulary_size() != self.model.n_categories() {
            return Err(Error::CorruptModel {
                reason: format!(
                    "encoder has {} symbols but model expects {} categories",
                    self.encoder.vocabulary_size(),
                    self.model.n_categories()
                ),
            });
        }
        if !self.model.is_fitted() {
            return Err(Error::UntrainedModel);
        }
        self.model.check_consistency()?;
        Ok((self.encoder, self.model))
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path.as_ref()).map_err(|source| Error::Io {
            operation: format!("create model file {}", path.as_ref().display()),
            source,
        })?;
        let mut writer = BufWriter::new(file);

        rmp_serde::encode::write(&mut writer, self)?;
        writer.flush().map_err(|source| Error::Io {
            operation: format!("write model file {}", path.as_ref().display()),
            source,
        })?;

        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref()).map_err(|source| Error::Io {
            operation: format!("open model file {}", path.as_ref().display()),
            source,
        })?;
        let reader = BufReader::new(file);

        Ok(rmp_serde::decode::from_read(reader)?)
    }
}
