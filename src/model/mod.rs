//! Statistical categorization: TF-IDF features, multinomial Naive Bayes,
//! training/evaluation, the persisted artifact, and online inference.

pub mod artifact;
pub mod inference;
pub mod metrics;
pub mod naive_bayes;
pub mod trainer;
pub mod vectorizer;

pub use artifact::{ArtifactSource, FileArtifactSource, ModelArtifact};
pub use inference::InferenceEngine;
pub use metrics::{ClassMetrics, EvaluationReport};
pub use naive_bayes::MultinomialNaiveBayes;
pub use trainer::{LabeledExample, ModelTrainer, TrainingConfig, TrainingOutcome, train_test_split};
pub use vectorizer::{FeatureVector, TfIdfVectorizer};
