//! Error types shared by the training and inference pipelines.

use std::io;

use thiserror::Error;

/// The error type for all msg2user operations.
///
/// Corpus-load and schema errors abort a training run; per-row
/// normalization errors are contained by the caller; artifact errors abort
/// an inference run. No variant is ever retried by this crate.
#[derive(Error, Debug)]
pub enum PredictorError {
    /// I/O errors (corpus reads, artifact writes).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// CSV errors while reading the corpus.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A required column, fitted state, or configuration value is missing
    /// before an operation that needs it.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A single corpus row failed normalization. Recovered by the
    /// training pipeline, which substitutes an empty document.
    #[error("row {row} failed normalization: {reason}")]
    RowProcessing { row: usize, reason: String },

    /// Persisted artifacts are missing, unreadable, or did not originate
    /// from the same training run.
    #[error("artifact load error: {0}")]
    ArtifactLoad(String),

    /// Features and labels do not line up, or a vector has the wrong width.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The underlying tree library failed during fitting.
    #[error("training error: {0}")]
    Training(String),

    /// The classifier failed on a well-formed vector.
    #[error("prediction error: {0}")]
    Prediction(String),

    /// Artifact serialization failed during a write.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for operations that may fail with [`PredictorError`].
pub type Result<T> = std::result::Result<T, PredictorError>;

impl PredictorError {
    /// Create a new configuration error.
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        PredictorError::Configuration(msg.into())
    }

    /// Create a new artifact load error.
    pub fn artifact_load<S: Into<String>>(msg: S) -> Self {
        PredictorError::ArtifactLoad(msg.into())
    }

    /// Create a new invalid input error.
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        PredictorError::InvalidInput(msg.into())
    }

    /// Create a new training error.
    pub fn training<S: Into<String>>(msg: S) -> Self {
        PredictorError::Training(msg.into())
    }

    /// Create a new prediction error.
    pub fn prediction<S: Into<String>>(msg: S) -> Self {
        PredictorError::Prediction(msg.into())
    }

    /// Create a new serialization error.
    pub fn serialization<S: Into<String>>(msg: S) -> Self {
        PredictorError::Serialization(msg.into())
    }
}
