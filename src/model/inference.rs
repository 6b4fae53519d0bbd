//! Online inference over a loaded model artifact.
//!
//! The engine is immutable after construction and shared across workers
//! behind an `Arc`.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::error::{ConfigError, PredictionError};
use crate::model::artifact::{ArtifactSource, FileArtifactSource, ModelArtifact};
use crate::model::naive_bayes::argmax;
use crate::pipeline::types::{
    Alternative, Categorization, Categorizer, ConfidenceKind, Email, Prediction, PredictionResult,
};
use crate::text::TextNormalizer;

/// Keywords reported per prediction.
pub const MAX_KEYWORDS: usize = 5;

/// Normalizes, vectorizes and classifies email text.
#[derive(Debug, Clone)]
pub struct InferenceEngine {
    artifact: Arc<ModelArtifact>,
    normalizer: TextNormalizer,
}

impl InferenceEngine {
    /// Load from a JSON artifact file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::from_source(&FileArtifactSource::new(path))
    }

    pub fn from_source(source: &dyn ArtifactSource) -> Result<Self, ConfigError> {
        let artifact = source.load()?;
        info!(
            source = %source.describe(),
            version = %artifact.version,
            trained_at = %artifact.trained_at,
            classes = artifact.labels().len(),
            "Model artifact loaded"
        );
        Self::from_artifact(artifact)
    }

    /// Wrap an in-memory artifact after validating it.
    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self, ConfigError> {
        artifact
            .validate()
            .map_err(|reason| ConfigError::MalformedArtifact {
                path: "<memory>".into(),
                reason,
            })?;
        Ok(Self {
            artifact: Arc::new(artifact),
            normalizer: TextNormalizer::new(),
        })
    }

    pub fn artifact(&self) -> &ModelArtifact {
        &self.artifact
    }

    /// Classes the model can predict, sorted.
    pub fn labels(&self) -> &[String] {
        self.artifact.labels()
    }

    pub fn version(&self) -> &str {
        &self.artifact.version
    }

    /// Predict a category and its probability for raw text.
    pub fn predict(&self, text: &str) -> Result<(String, f64), PredictionError> {
        let cleaned = self.normalizer.clean(text);
        let x = self.artifact.vectorizer.transform(&cleaned);
        let classifier = &self.artifact.classifier;

        let category = classifier.predict(&x)?;
        let proba = classifier.predict_proba(&x)?;
        let idx = classifier
            .class_index(category)
            .ok_or_else(|| PredictionError::UnknownClass(category.to_string()))?;

        Ok((category.to_string(), proba[idx]))
    }

    /// Prediction with keywords and up to `max_alternatives` runner-up
    /// classes, most probable first.
    pub fn predict_detailed(
        &self,
        text: &str,
        max_alternatives: usize,
    ) -> Result<Prediction, PredictionError> {
        let cleaned = self.normalizer.clean(text);
        let x = self.artifact.vectorizer.transform(&cleaned);
        let classifier = &self.artifact.classifier;

        let proba = classifier.predict_proba(&x)?;
        let best = argmax(&proba);
        let classes = classifier.classes();

        let mut ranked: Vec<usize> = (0..proba.len()).filter(|&i| i != best).collect();
        ranked.sort_by(|&a, &b| proba[b].total_cmp(&proba[a]).then(a.cmp(&b)));
        let alternatives = ranked
            .into_iter()
            .take(max_alternatives)
            .map(|i| Alternative {
                category: classes[i].clone(),
                confidence: proba[i],
            })
            .collect();

        Ok(Prediction {
            category: classes[best].clone(),
            confidence: proba[best],
            keywords: self.artifact.vectorizer.top_terms(&x, MAX_KEYWORDS),
            alternatives,
        })
    }

    /// Predict each email independently. Order matches input; one failure
    /// never affects the others.
    pub fn predict_batch(&self, emails: &[Email]) -> Vec<Result<PredictionResult, PredictionError>> {
        let results: Vec<_> = emails
            .iter()
            .map(|email| {
                self.predict(&email.text()).map(|(category, confidence)| PredictionResult {
                    id: email.id.clone(),
                    category,
                    confidence,
                })
            })
            .collect();
        debug!(
            count = emails.len(),
            failed = results.iter().filter(|r| r.is_err()).count(),
            "Batch predicted"
        );
        results
    }
}

impl Categorizer for InferenceEngine {
    fn name(&self) -> &str {
        "naive_bayes"
    }

    fn categorize(&self, email: &Email) -> Result<Categorization, PredictionError> {
        let (category, confidence) = self.predict(&email.text())?;
        Ok(Categorization {
            category,
            confidence,
            kind: ConfidenceKind::Probability,
        })
    }
}
