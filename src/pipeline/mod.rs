//! Categorization pipeline.
//!
//! Raw emails flow through two independent strategies, chosen by stage:
//! 1. Offline: `TextNormalizer` → `RuleScorer` → `WeakLabeler` produces weak
//!    labels for a training corpus
//! 2. Training: `ModelTrainer` fits TF-IDF + multinomial naive Bayes and
//!    writes a `ModelArtifact`
//! 3. Online: `InferenceEngine` loads the artifact and serves predictions
//!
//! Both strategies implement [`types::Categorizer`]; they are never ensembled.

pub mod types;

pub use types::{
    Alternative, Categorization, Categorizer, ConfidenceKind, Email, LabelDecision, Prediction,
    PredictionResult, ScoringResult,
};
