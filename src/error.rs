//! Error types for the email categorizer.

use std::path::PathBuf;

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Prediction error: {0}")]
    Prediction(#[from] PredictionError),

    #[error("Training error: {0}")]
    Training(#[from] TrainingError),

    #[error("Corpus error: {0}")]
    Corpus(#[from] CorpusError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Service error: {0}")]
    Service(#[from] ServiceError),
}

/// Startup errors. The process must not begin serving after one of these.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Model artifact not found at {path}")]
    ArtifactMissing { path: PathBuf },

    #[error("Malformed model artifact at {path}: {reason}")]
    MalformedArtifact { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Per-request failures during feature transform or classification.
#[derive(Debug, thiserror::Error)]
pub enum PredictionError {
    #[error("Feature vector has {actual} dimensions, model expects {expected}")]
    FeatureMismatch { expected: usize, actual: usize },

    #[error("Model has no classes")]
    EmptyModel,

    #[error("Predicted class {0} is not in the classifier's class list")]
    UnknownClass(String),

    #[error("Worker pool unavailable: {0}")]
    WorkerUnavailable(String),

    #[error("Prediction task failed: {0}")]
    Join(String),
}

/// Request-level failures at the serving boundary.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Batch of {size} emails exceeds the limit of {max}")]
    BatchTooLarge { size: usize, max: usize },

    #[error(transparent)]
    Prediction(#[from] PredictionError),

    #[error("Server IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures that abort a single training run.
#[derive(Debug, thiserror::Error)]
pub enum TrainingError {
    #[error("Feature/label count mismatch: {features} samples, {labels} labels")]
    LengthMismatch { features: usize, labels: usize },

    #[error("Training dataset is empty")]
    EmptyDataset,

    #[error("Feature vector has {actual} dimensions, expected {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Vocabulary is empty after stop-word removal")]
    EmptyVocabulary,

    #[error("Invalid train/test split: {0}")]
    InvalidSplit(String),

    #[error("Invalid training parameter: {0}")]
    InvalidParameter(String),

    #[error("Evaluation failed: {0}")]
    Evaluation(#[from] PredictionError),

    #[error("Failed to write artifact: {0}")]
    ArtifactWrite(String),
}

/// Reading raw corpora and labeled datasets.
#[derive(Debug, thiserror::Error)]
pub enum CorpusError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON on line {line}: {reason}")]
    InvalidLine { line: usize, reason: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Building a category catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Invalid subject pattern {pattern} for category {category}: {source}")]
    InvalidPattern {
        category: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Duplicate category {0}")]
    DuplicateCategory(String),

    #[error("Catalog has no categories")]
    Empty,
}

/// Result type alias for the categorizer.
pub type Result<T> = std::result::Result<T, Error>;
