//! Shared types for the categorization pipeline.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::PredictionError;

// ── Email ───────────────────────────────────────────────────────────

/// An email as it enters the pipeline.
///
/// Immutable input; lives for one request or one corpus pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Email {
    /// Opaque identifier (message id, request id, or generated).
    #[serde(alias = "message_id", alias = "email_id")]
    pub id: String,
    pub subject: String,
    pub body: String,
    /// Sender address.
    pub sender: String,
    /// Raw header values keyed by header name.
    pub headers: BTreeMap<String, String>,
}

impl Email {
    pub fn new(id: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            subject: subject.into(),
            body: body.into(),
            ..Default::default()
        }
    }

    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = sender.into();
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Subject and body joined, subject first.
    pub fn text(&self) -> String {
        format!("{} {}", self.subject, self.body)
    }
}

// ── Rule-based outputs ──────────────────────────────────────────────

/// Score of one email against one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringResult {
    pub category: String,
    pub score: u32,
    /// Which signals contributed, in evaluation order.
    pub factors: Vec<String>,
}

/// Weak label for one email.
///
/// `confidence` is `min(score / 20, 1.0)`: a normalized rule score, not a
/// probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelDecision {
    pub email_id: String,
    pub category: String,
    pub confidence: f64,
    pub score: u32,
    pub factors: Vec<String>,
}

// ── Statistical outputs ─────────────────────────────────────────────

/// Model prediction for one email. `confidence` is a class probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    #[serde(rename = "email_id")]
    pub id: String,
    #[serde(rename = "predicted_category")]
    pub category: String,
    #[serde(rename = "confidence_score")]
    pub confidence: f64,
}

/// A runner-up class and its probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alternative {
    pub category: String,
    pub confidence: f64,
}

/// Full single-email prediction used by the serving boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub category: String,
    pub confidence: f64,
    /// Highest-weighted vocabulary terms present in the input.
    pub keywords: Vec<String>,
    /// Next most probable classes, most probable first.
    pub alternatives: Vec<Alternative>,
}

// ── Common capability ───────────────────────────────────────────────

/// What a confidence value means. The two scales are never comparable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceKind {
    /// `min(rule_score / 20, 1.0)`.
    RuleScore,
    /// Classifier posterior probability.
    Probability,
}

/// A category with a confidence on a declared scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Categorization {
    pub category: String,
    pub confidence: f64,
    pub kind: ConfidenceKind,
}

/// Email → category + confidence.
///
/// Implemented by the weak labeler (offline) and the inference engine
/// (online). Strategies are selected by pipeline stage, never combined.
pub trait Categorizer: Send + Sync {
    /// Strategy name for logging.
    fn name(&self) -> &str;

    fn categorize(&self, email: &Email) -> Result<Categorization, PredictionError>;
}
