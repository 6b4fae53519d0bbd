//! Weighted multi-signal rule scorer.
//!
//! Scoring weights:
//! - sender domain match: 10 per domain
//! - keyword match: 3 per distinct keyword
//! - subject pattern match: 5 per pattern
//! - header indicator match: 4 per indicator

use std::sync::Arc;

use tracing::trace;

use crate::pipeline::types::{Email, ScoringResult};
use crate::rules::catalog::{CategoryCatalog, CategoryDefinition};
use crate::text::TextNormalizer;

pub const SENDER_WEIGHT: u32 = 10;
pub const KEYWORD_WEIGHT: u32 = 3;
pub const SUBJECT_PATTERN_WEIGHT: u32 = 5;
pub const HEADER_WEIGHT: u32 = 4;

/// Scores emails against every category of a catalog.
#[derive(Debug, Clone)]
pub struct RuleScorer {
    catalog: Arc<CategoryCatalog>,
    normalizer: TextNormalizer,
}

impl RuleScorer {
    pub fn new(catalog: Arc<CategoryCatalog>) -> Self {
        Self {
            catalog,
            normalizer: TextNormalizer::new(),
        }
    }

    pub fn catalog(&self) -> &CategoryCatalog {
        &self.catalog
    }

    /// Score one email against one category.
    pub fn score(&self, email: &Email, category: &CategoryDefinition) -> ScoringResult {
        let text = self.normalizer.clean_email(&email.subject, &email.body);
        score_with_text(email, &text, category)
    }

    /// Score one email against every category, in catalog order.
    ///
    /// The email text is normalized once and shared across categories.
    pub fn score_all(&self, email: &Email) -> Vec<ScoringResult> {
        let text = self.normalizer.clean_email(&email.subject, &email.body);
        self.catalog
            .categories()
            .iter()
            .map(|category| score_with_text(email, &text, category))
            .collect()
    }
}

/// Score against pre-normalized subject + body text.
fn score_with_text(email: &Email, text: &str, category: &CategoryDefinition) -> ScoringResult {
    let mut score = 0;
    let mut factors = Vec::new();

    let sender = email.sender.to_lowercase();
    for domain in &category.sender_domains {
        if sender.contains(domain.as_str()) {
            score += SENDER_WEIGHT;
            factors.push(format!("sender matches {domain}"));
        }
    }

    let keyword_matches = category
        .keywords
        .iter()
        .filter(|keyword| text.contains(keyword.as_str()))
        .count() as u32;
    if keyword_matches > 0 {
        score += KEYWORD_WEIGHT * keyword_matches;
        factors.push(format!("found {keyword_matches} keywords"));
    }

    let subject = email.subject.to_lowercase();
    for pattern in &category.subject_patterns {
        if pattern.regex.is_match(&subject) {
            score += SUBJECT_PATTERN_WEIGHT;
            factors.push(format!("subject matches pattern {}", pattern.pattern));
        }
    }

    let header_values: Vec<String> = email.headers.values().map(|v| v.to_lowercase()).collect();
    for indicator in &category.header_indicators {
        if header_values.iter().any(|v| v.contains(indicator.as_str())) {
            score += HEADER_WEIGHT;
            factors.push(format!("header contains {indicator}"));
        }
    }

    trace!(
        email_id = %email.id,
        category = %category.name,
        score,
        "Scored category"
    );

    ScoringResult {
        category: category.name.clone(),
        score,
        factors,
    }
}
