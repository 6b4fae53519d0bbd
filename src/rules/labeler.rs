//! Weak labeler: assigns bootstrap category labels from rule scores.
//!
//! Used offline to build training sets. Ties between equal top scores go to
//! the category declared first in the catalog.

use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::error::PredictionError;
use crate::pipeline::types::{
    Categorization, Categorizer, ConfidenceKind, Email, LabelDecision, ScoringResult,
};
use crate::rules::catalog::CategoryCatalog;
use crate::rules::scorer::RuleScorer;

/// Raw score at which rule confidence saturates at 1.0.
pub const CONFIDENCE_NORMALIZER: f64 = 20.0;

/// Rule-based labeler over a fixed catalog.
#[derive(Debug, Clone)]
pub struct WeakLabeler {
    scorer: RuleScorer,
}

impl WeakLabeler {
    pub fn new(catalog: Arc<CategoryCatalog>) -> Self {
        Self {
            scorer: RuleScorer::new(catalog),
        }
    }

    pub fn scorer(&self) -> &RuleScorer {
        &self.scorer
    }

    /// Label a single email with its best-scoring category.
    pub fn label(&self, email: &Email) -> LabelDecision {
        let scores = self.scorer.score_all(email);
        let best = select_best(scores);

        let decision = LabelDecision {
            email_id: email.id.clone(),
            confidence: rule_confidence(best.score),
            category: best.category,
            score: best.score,
            factors: best.factors,
        };

        debug!(
            email_id = %decision.email_id,
            category = %decision.category,
            score = decision.score,
            confidence = decision.confidence,
            "Weak label assigned"
        );
        decision
    }

    /// Label many emails. Output order matches input order.
    pub fn label_batch(&self, emails: &[Email]) -> Vec<LabelDecision> {
        info!(count = emails.len(), "Labeling email batch");
        emails.par_iter().map(|email| self.label(email)).collect()
    }
}

impl Categorizer for WeakLabeler {
    fn name(&self) -> &str {
        "weak_labeler"
    }

    fn categorize(&self, email: &Email) -> Result<Categorization, PredictionError> {
        let decision = self.label(email);
        Ok(Categorization {
            category: decision.category,
            confidence: decision.confidence,
            kind: ConfidenceKind::RuleScore,
        })
    }
}

/// Normalize a raw rule score into `[0, 1]`.
pub fn rule_confidence(score: u32) -> f64 {
    (f64::from(score) / CONFIDENCE_NORMALIZER).min(1.0)
}

/// First maximum in catalog order. The catalog is never empty.
fn select_best(scores: Vec<ScoringResult>) -> ScoringResult {
    let mut iter = scores.into_iter();
    let mut best = iter.next().unwrap_or_else(|| ScoringResult {
        category: String::new(),
        score: 0,
        factors: Vec::new(),
    });
    for candidate in iter {
        if candidate.score > best.score {
            best = candidate;
        }
    }
    best
}
