//! TF-IDF vectorizer for text feature extraction.
//!
//! Unigrams and bigrams over `\b\w\w+\b` tokens with English stop-words
//! removed. The vocabulary keeps the `max_features` most frequent terms
//! (ties broken alphabetically) and is indexed alphabetically. Weights are
//! raw counts times smooth IDF, L2-normalized per document.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::TrainingError;
use crate::text::stop_words::is_stop_word;

/// Default vocabulary cap.
pub const DEFAULT_MAX_FEATURES: usize = 1000;

static TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\w\w+\b").unwrap());

/// Sparse feature vector. Entries are sorted by index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub dim: usize,
    pub entries: Vec<(usize, f64)>,
}

impl FeatureVector {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Euclidean norm.
    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|(_, v)| v * v).sum::<f64>().sqrt()
    }
}

/// Fitted (or unfitted) TF-IDF vectorizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfIdfVectorizer {
    max_features: usize,
    ngram_range: (usize, usize),
    /// Vocabulary sorted alphabetically; position is the feature index.
    terms: Vec<String>,
    idf: Vec<f64>,
    n_documents: usize,
    /// Sorted label set of the training corpus.
    label_space: Vec<String>,
}

impl TfIdfVectorizer {
    /// Create an unfitted vectorizer.
    pub fn new(max_features: usize) -> Self {
        Self {
            max_features,
            ngram_range: (1, 2),
            terms: Vec::new(),
            idf: Vec::new(),
            n_documents: 0,
            label_space: Vec::new(),
        }
    }

    /// Fit the vocabulary and IDF weights on a labeled corpus.
    ///
    /// `labels` only records the training label space; weights depend on
    /// `documents` alone.
    pub fn fit(&mut self, documents: &[String], labels: &[String]) -> Result<(), TrainingError> {
        if documents.len() != labels.len() {
            return Err(TrainingError::LengthMismatch {
                features: documents.len(),
                labels: labels.len(),
            });
        }
        if documents.is_empty() {
            return Err(TrainingError::EmptyDataset);
        }

        let mut term_frequency: HashMap<String, usize> = HashMap::new();
        let mut document_frequency: HashMap<String, usize> = HashMap::new();

        for doc in documents {
            let terms = self.analyze(doc);
            let mut unique = HashSet::new();
            for term in terms {
                *term_frequency.entry(term.clone()).or_insert(0) += 1;
                if unique.insert(term.clone()) {
                    *document_frequency.entry(term).or_insert(0) += 1;
                }
            }
        }

        if term_frequency.is_empty() {
            return Err(TrainingError::EmptyVocabulary);
        }

        let mut ranked: Vec<(String, usize)> = term_frequency.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(self.max_features.max(1));

        let mut terms: Vec<String> = ranked.into_iter().map(|(term, _)| term).collect();
        terms.sort();

        let n = documents.len() as f64;
        let idf = terms
            .iter()
            .map(|term| {
                let df = document_frequency.get(term).copied().unwrap_or(0) as f64;
                ((1.0 + n) / (1.0 + df)).ln() + 1.0
            })
            .collect();

        let mut label_space: Vec<String> = labels.to_vec();
        label_space.sort();
        label_space.dedup();

        self.terms = terms;
        self.idf = idf;
        self.n_documents = documents.len();
        self.label_space = label_space;
        Ok(())
    }

    /// Transform a document with the frozen vocabulary.
    pub fn transform(&self, document: &str) -> FeatureVector {
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for term in self.analyze(document) {
            if let Some(idx) = self.index_of(&term) {
                *counts.entry(idx).or_insert(0.0) += 1.0;
            }
        }

        let mut entries: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(idx, count)| (idx, count * self.idf[idx]))
            .collect();

        let norm = entries.iter().map(|(_, v)| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, v) in &mut entries {
                *v /= norm;
            }
        }

        FeatureVector {
            dim: self.terms.len(),
            entries,
        }
    }

    /// Fit, then transform every training document.
    pub fn fit_transform(
        &mut self,
        documents: &[String],
        labels: &[String],
    ) -> Result<Vec<FeatureVector>, TrainingError> {
        self.fit(documents, labels)?;
        Ok(documents.iter().map(|doc| self.transform(doc)).collect())
    }

    /// Terms of `vector` with the highest weights, heaviest first.
    pub fn top_terms(&self, vector: &FeatureVector, limit: usize) -> Vec<String> {
        let mut weighted: Vec<&(usize, f64)> = vector.entries.iter().collect();
        weighted.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        weighted
            .into_iter()
            .take(limit)
            .filter_map(|(idx, _)| self.terms.get(*idx).cloned())
            .collect()
    }

    /// Tokens, stop-words removed, expanded to the configured n-grams.
    fn analyze(&self, document: &str) -> Vec<String> {
        let lowered = document.to_lowercase();
        let tokens: Vec<&str> = TOKEN
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .filter(|t| !is_stop_word(t))
            .collect();

        let (min_n, max_n) = self.ngram_range;
        let mut terms = Vec::new();
        for n in min_n..=max_n {
            if n == 0 || tokens.len() < n {
                continue;
            }
            for window in tokens.windows(n) {
                terms.push(window.join(" "));
            }
        }
        terms
    }

    /// Check the fitted state is usable for `transform`: one finite IDF
    /// weight per term and a strictly sorted vocabulary.
    pub fn validate(&self) -> Result<(), String> {
        if self.idf.len() != self.terms.len() {
            return Err(format!(
                "vectorizer has {} terms but {} idf weights",
                self.terms.len(),
                self.idf.len()
            ));
        }
        if let Some(pair) = self.terms.windows(2).find(|w| w[0] >= w[1]) {
            return Err(format!(
                "vectorizer vocabulary not sorted at {:?} / {:?}",
                pair[0], pair[1]
            ));
        }
        if self.idf.iter().any(|w| !w.is_finite()) {
            return Err("vectorizer idf weights must be finite".to_string());
        }
        if self.label_space.windows(2).any(|w| w[0] >= w[1]) {
            return Err("vectorizer label space not sorted".to_string());
        }
        Ok(())
    }

    fn index_of(&self, term: &str) -> Option<usize> {
        self.terms
            .binary_search_by(|t| t.as_str().cmp(term))
            .ok()
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.terms
    }

    pub fn vocabulary_size(&self) -> usize {
        self.terms.len()
    }

    pub fn label_space(&self) -> &[String] {
        &self.label_space
    }

    pub fn n_documents(&self) -> usize {
        self.n_documents
    }

    pub fn is_fitted(&self) -> bool {
        !self.terms.is_empty()
    }
}

impl Default for TfIdfVectorizer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FEATURES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn fitted() -> TfIdfVectorizer {
        let mut v = TfIdfVectorizer::default();
        v.fit(
            &docs(&["invoice payment due", "order shipped delivery", "invoice order"]),
            &docs(&["FINANCE", "SHOPPING", "FINANCE"]),
        )
        .unwrap();
        v
    }

    #[test]
    fn builds_sorted_unigram_and_bigram_vocabulary() {
        let v = fitted();
        let vocab = v.vocabulary();
        assert!(vocab.contains(&"invoice".to_string()));
        assert!(vocab.contains(&"invoice payment".to_string()));
        assert!(vocab.contains(&"order shipped".to_string()));
        // "due" is a stop-word
        assert!(!vocab.iter().any(|t| t.contains("due")));
        let mut sorted = vocab.to_vec();
        sorted.sort();
        assert_eq!(sorted, vocab);
    }

    #[test]
    fn records_label_space() {
        let v = fitted();
        assert_eq!(v.label_space(), &["FINANCE".to_string(), "SHOPPING".to_string()]);
        assert_eq!(v.n_documents(), 3);
    }

    #[test]
    fn idf_is_smoothed() {
        let v = fitted();
        let idx = v.index_of("invoice").unwrap();
        // df = 2, n = 3
        let expected = (4.0f64 / 3.0).ln() + 1.0;
        assert!((v.idf[idx] - expected).abs() < 1e-12);
    }

    #[test]
    fn transform_is_l2_normalized() {
        let v = fitted();
        let x = v.transform("invoice payment");
        assert_eq!(x.dim, v.vocabulary_size());
        assert!((x.norm() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn unknown_terms_produce_empty_vector() {
        let v = fitted();
        let x = v.transform("completely unrelated words");
        assert!(x.is_empty());
        assert_eq!(x.norm(), 0.0);
    }

    #[test]
    fn max_features_keeps_most_frequent_terms() {
        let mut v = TfIdfVectorizer::new(2);
        v.fit(
            &docs(&["alpha alpha beta", "alpha gamma", "beta"]),
            &docs(&["A", "B", "A"]),
        )
        .unwrap();
        assert_eq!(v.vocabulary(), &["alpha".to_string(), "beta".to_string()]);
    }

    #[test]
    fn rejects_bad_training_input() {
        let mut v = TfIdfVectorizer::default();
        assert!(matches!(
            v.fit(&docs(&["a b"]), &docs(&[])),
            Err(TrainingError::LengthMismatch { features: 1, labels: 0 })
        ));
        assert!(matches!(v.fit(&[], &[]), Err(TrainingError::EmptyDataset)));
        assert!(matches!(
            v.fit(&docs(&["the and of"]), &docs(&["X"])),
            Err(TrainingError::EmptyVocabulary)
        ));
    }

    #[test]
    fn top_terms_orders_by_weight() {
        let v = fitted();
        let x = v.transform("payment payment invoice");
        let top = v.top_terms(&x, 1);
        assert_eq!(top, vec!["payment".to_string()]);
    }
}
