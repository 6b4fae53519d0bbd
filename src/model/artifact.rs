//! Persisted model artifact: the fitted vectorizer and classifier as one
//! versioned unit.
//!
//! Loading validates both slots eagerly, so a process that starts with a
//! bad artifact fails before it accepts any request.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ConfigError, TrainingError};
use crate::model::naive_bayes::MultinomialNaiveBayes;
use crate::model::vectorizer::TfIdfVectorizer;

/// Format version written by this build.
pub const ARTIFACT_VERSION: &str = "1";

/// Fitted vectorizer + classifier pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelArtifact {
    pub version: String,
    pub trained_at: DateTime<Utc>,
    pub vectorizer: TfIdfVectorizer,
    pub classifier: MultinomialNaiveBayes,
}

/// On-disk shape, with every slot optional so a missing one is reported
/// by name instead of as a generic parse error.
#[derive(Deserialize)]
struct RawArtifact {
    version: Option<String>,
    trained_at: Option<DateTime<Utc>>,
    vectorizer: Option<TfIdfVectorizer>,
    classifier: Option<MultinomialNaiveBayes>,
}

impl ModelArtifact {
    /// Pair a freshly fitted vectorizer and classifier.
    pub fn new(vectorizer: TfIdfVectorizer, classifier: MultinomialNaiveBayes) -> Self {
        Self {
            version: ARTIFACT_VERSION.to_string(),
            trained_at: Utc::now(),
            vectorizer,
            classifier,
        }
    }

    /// Check each half is internally consistent and that the two halves
    /// belong together.
    pub fn validate(&self) -> Result<(), String> {
        self.classifier.validate()?;
        self.vectorizer.validate()?;
        if self.vectorizer.vocabulary_size() != self.classifier.n_features() {
            return Err(format!(
                "vectorizer has {} features, classifier expects {}",
                self.vectorizer.vocabulary_size(),
                self.classifier.n_features()
            ));
        }
        if self.vectorizer.label_space() != self.classifier.classes() {
            return Err(format!(
                "label sets differ: vectorizer {:?}, classifier {:?}",
                self.vectorizer.label_space(),
                self.classifier.classes()
            ));
        }
        Ok(())
    }

    /// Write the artifact as JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), TrainingError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| TrainingError::ArtifactWrite(e.to_string()))?;
        }
        let json = serde_json::to_string(self)
            .map_err(|e| TrainingError::ArtifactWrite(e.to_string()))?;
        std::fs::write(path, json).map_err(|e| TrainingError::ArtifactWrite(e.to_string()))?;

        info!(
            path = %path.display(),
            classes = self.classifier.classes().len(),
            features = self.vectorizer.vocabulary_size(),
            "Model artifact saved"
        );
        Ok(())
    }

    /// Read and validate an artifact.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ArtifactMissing {
                path: path.to_path_buf(),
            });
        }
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw, path)
    }

    /// Parse and validate an artifact; `origin` is only used in errors.
    pub fn from_json(raw: &str, origin: &Path) -> Result<Self, ConfigError> {
        let malformed = |reason: String| ConfigError::MalformedArtifact {
            path: origin.to_path_buf(),
            reason,
        };

        let parsed: RawArtifact =
            serde_json::from_str(raw).map_err(|e| malformed(e.to_string()))?;
        let vectorizer = parsed
            .vectorizer
            .ok_or_else(|| malformed("missing vectorizer".to_string()))?;
        let classifier = parsed
            .classifier
            .ok_or_else(|| malformed("missing classifier".to_string()))?;

        let artifact = Self {
            version: parsed.version.unwrap_or_else(|| ARTIFACT_VERSION.to_string()),
            trained_at: parsed.trained_at.unwrap_or_else(Utc::now),
            vectorizer,
            classifier,
        };
        artifact.validate().map_err(malformed)?;
        Ok(artifact)
    }

    pub fn labels(&self) -> &[String] {
        self.classifier.classes()
    }
}

/// Where a model artifact comes from.
pub trait ArtifactSource: Send + Sync {
    fn load(&self) -> Result<ModelArtifact, ConfigError>;

    /// Human-readable location for logs.
    fn describe(&self) -> String;
}

/// Artifact stored as a JSON file.
#[derive(Debug, Clone)]
pub struct FileArtifactSource {
    path: PathBuf,
}

impl FileArtifactSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ArtifactSource for FileArtifactSource {
    fn load(&self) -> Result<ModelArtifact, ConfigError> {
        ModelArtifact::load(&self.path)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
