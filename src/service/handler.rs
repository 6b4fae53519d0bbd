//! Categorization service: runs predictions on a bounded blocking pool.
//!
//! Inference is CPU-bound, so each request takes a semaphore permit and
//! runs on `spawn_blocking`. The engine is shared read-only.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tracing::{info, warn};

use crate::config::ServiceConfig;
use crate::error::{PredictionError, ServiceError};
use crate::model::InferenceEngine;
use crate::pipeline::types::{Alternative, Email, Prediction};

// ── Wire types ──────────────────────────────────────────────────────

/// One email to categorize.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CategorizeRequest {
    #[serde(alias = "email_id")]
    pub id: String,
    pub subject: String,
    pub body: String,
    pub sender: String,
    pub headers: BTreeMap<String, String>,
}

impl From<CategorizeRequest> for Email {
    fn from(req: CategorizeRequest) -> Self {
        Email {
            id: req.id,
            subject: req.subject,
            body: req.body,
            sender: req.sender,
            headers: req.headers,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategorizeResponse {
    pub id: String,
    pub category: String,
    pub confidence: f64,
    pub keywords: Vec<String>,
    pub alternatives: Vec<Alternative>,
}

impl CategorizeResponse {
    fn from_prediction(id: String, prediction: Prediction) -> Self {
        Self {
            id,
            category: prediction.category,
            confidence: prediction.confidence,
            keywords: prediction.keywords,
            alternatives: prediction.alternatives,
        }
    }

    /// Empty batch entry for a failed email; keeps only the id so the
    /// entry can be matched to its request.
    pub fn fallback(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchRequest {
    #[serde(default)]
    pub emails: Vec<CategorizeRequest>,
}

/// Per-email batch outcome. A failed entry carries `error` and a fallback
/// response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchItem {
    #[serde(flatten)]
    pub response: CategorizeResponse,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResponse {
    pub results: Vec<BatchItem>,
}

// ── Service ─────────────────────────────────────────────────────────

pub struct CategorizationService {
    engine: Arc<InferenceEngine>,
    permits: Arc<Semaphore>,
    max_batch_size: usize,
    max_alternatives: usize,
}

impl CategorizationService {
    pub fn new(engine: Arc<InferenceEngine>, config: &ServiceConfig) -> Self {
        Self {
            engine,
            permits: Arc::new(Semaphore::new(config.workers.max(1))),
            max_batch_size: config.max_batch_size,
            max_alternatives: config.max_alternatives,
        }
    }

    pub fn engine(&self) -> &InferenceEngine {
        &self.engine
    }

    pub fn max_batch_size(&self) -> usize {
        self.max_batch_size
    }

    /// Stop handing out workers. Requests still waiting, and any that
    /// arrive later, fail with `WorkerUnavailable`; running ones finish.
    pub fn close(&self) {
        self.permits.close();
    }

    /// Categorize one email.
    pub async fn categorize(
        &self,
        request: CategorizeRequest,
    ) -> Result<CategorizeResponse, PredictionError> {
        let start = Instant::now();
        let email = Email::from(request);
        let id = email.id.clone();

        let _permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| PredictionError::WorkerUnavailable(e.to_string()))?;

        let engine = Arc::clone(&self.engine);
        let max_alternatives = self.max_alternatives;
        let prediction = tokio::task::spawn_blocking(move || {
            engine.predict_detailed(&email.text(), max_alternatives)
        })
        .await
        .map_err(|e| PredictionError::Join(e.to_string()))??;

        info!(
            email_id = %id,
            category = %prediction.category,
            confidence = prediction.confidence,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Email categorized"
        );
        Ok(CategorizeResponse::from_prediction(id, prediction))
    }

    /// Categorize many emails concurrently. Output order matches input;
    /// a failure only affects its own entry.
    pub async fn categorize_batch(
        &self,
        requests: Vec<CategorizeRequest>,
    ) -> Result<Vec<BatchItem>, ServiceError> {
        if requests.len() > self.max_batch_size {
            return Err(ServiceError::BatchTooLarge {
                size: requests.len(),
                max: self.max_batch_size,
            });
        }

        let count = requests.len();
        let tasks = requests.into_iter().map(|request| async move {
            let id = request.id.clone();
            match self.categorize(request).await {
                Ok(response) => BatchItem {
                    response,
                    error: None,
                },
                Err(e) => {
                    warn!(email_id = %id, error = %e, "Batch entry failed");
                    BatchItem {
                        response: CategorizeResponse::fallback(id),
                        error: Some(format!("Error during prediction: {e}")),
                    }
                }
            }
        });
        let results = futures::future::join_all(tasks).await;

        info!(count, "Batch categorized");
        Ok(results)
    }
}
