//! Multinomial Naive Bayes over TF-IDF features.

use serde::{Deserialize, Serialize};

use crate::error::{PredictionError, TrainingError};
use crate::model::vectorizer::FeatureVector;

/// Default additive (Laplace) smoothing.
pub const DEFAULT_ALPHA: f64 = 1.0;

/// Fitted multinomial NB classifier.
///
/// `classes` is sorted; every per-class vector below is indexed the same way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultinomialNaiveBayes {
    alpha: f64,
    classes: Vec<String>,
    class_count: Vec<f64>,
    class_log_prior: Vec<f64>,
    /// `[class][feature]` log P(feature | class).
    feature_log_prob: Vec<Vec<f64>>,
    n_features: usize,
}

impl MultinomialNaiveBayes {
    /// Fit on feature vectors and their labels. Priors come from class
    /// frequencies.
    pub fn fit(
        features: &[FeatureVector],
        labels: &[String],
        alpha: f64,
    ) -> Result<Self, TrainingError> {
        if features.len() != labels.len() {
            return Err(TrainingError::LengthMismatch {
                features: features.len(),
                labels: labels.len(),
            });
        }
        let Some(first) = features.first() else {
            return Err(TrainingError::EmptyDataset);
        };
        let n_features = first.dim;

        let mut classes: Vec<String> = labels.to_vec();
        classes.sort();
        classes.dedup();

        let mut class_count = vec![0.0; classes.len()];
        let mut feature_count = vec![vec![0.0; n_features]; classes.len()];

        for (x, label) in features.iter().zip(labels) {
            if x.dim != n_features {
                return Err(TrainingError::DimensionMismatch {
                    expected: n_features,
                    actual: x.dim,
                });
            }
            // labels came from `classes`, so the search cannot miss
            let Ok(c) = classes.binary_search(label) else {
                continue;
            };
            class_count[c] += 1.0;
            for &(idx, value) in &x.entries {
                feature_count[c][idx] += value;
            }
        }

        let total: f64 = class_count.iter().sum();
        let class_log_prior: Vec<f64> = class_count.iter().map(|n| (n / total).ln()).collect();

        let feature_log_prob: Vec<Vec<f64>> = feature_count
            .iter()
            .map(|counts| {
                let smoothed_total = counts.iter().sum::<f64>() + alpha * n_features as f64;
                let log_total = smoothed_total.ln();
                counts
                    .iter()
                    .map(|fc| (fc + alpha).ln() - log_total)
                    .collect::<Vec<f64>>()
            })
            .collect();

        Ok(Self {
            alpha,
            classes,
            class_count,
            class_log_prior,
            feature_log_prob,
            n_features,
        })
    }

    /// Unnormalized log posterior per class.
    pub fn joint_log_likelihood(&self, x: &FeatureVector) -> Result<Vec<f64>, PredictionError> {
        if self.classes.is_empty() {
            return Err(PredictionError::EmptyModel);
        }
        if x.dim != self.n_features {
            return Err(PredictionError::FeatureMismatch {
                expected: self.n_features,
                actual: x.dim,
            });
        }

        Ok(self
            .class_log_prior
            .iter()
            .zip(&self.feature_log_prob)
            .map(|(prior, log_probs)| {
                prior
                    + x.entries
                        .iter()
                        .map(|&(idx, value)| value * log_probs[idx])
                        .sum::<f64>()
            })
            .collect())
    }

    /// Class probabilities, aligned with `classes()`. Sums to 1.
    pub fn predict_proba(&self, x: &FeatureVector) -> Result<Vec<f64>, PredictionError> {
        let jll = self.joint_log_likelihood(x)?;
        let max = jll.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let log_norm = max + jll.iter().map(|v| (v - max).exp()).sum::<f64>().ln();
        Ok(jll.iter().map(|v| (v - log_norm).exp()).collect())
    }

    /// Most probable class. The first class wins on exact ties.
    pub fn predict(&self, x: &FeatureVector) -> Result<&str, PredictionError> {
        let jll = self.joint_log_likelihood(x)?;
        let best = argmax(&jll);
        Ok(self.classes[best].as_str())
    }

    /// Check every per-class table has one row per class and every row one
    /// entry per feature.
    pub fn validate(&self) -> Result<(), String> {
        let n_classes = self.classes.len();
        if n_classes == 0 {
            return Err("classifier has no classes".to_string());
        }
        if self.classes.windows(2).any(|w| w[0] >= w[1]) {
            return Err("classifier classes not sorted".to_string());
        }
        for (name, len) in [
            ("class_count", self.class_count.len()),
            ("class_log_prior", self.class_log_prior.len()),
            ("feature_log_prob", self.feature_log_prob.len()),
        ] {
            if len != n_classes {
                return Err(format!("classifier {name} has {len} rows for {n_classes} classes"));
            }
        }
        if let Some((c, row)) = self
            .feature_log_prob
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != self.n_features)
        {
            return Err(format!(
                "classifier feature_log_prob row {c} has {} entries, expected {}",
                row.len(),
                self.n_features
            ));
        }
        if self.class_log_prior.iter().any(|v| v.is_nan())
            || self.feature_log_prob.iter().flatten().any(|v| v.is_nan())
        {
            return Err("classifier log probabilities contain NaN".to_string());
        }
        Ok(())
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn class_index(&self, class: &str) -> Option<usize> {
        self.classes.iter().position(|c| c == class)
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Training examples seen per class.
    pub fn class_count(&self) -> &[f64] {
        &self.class_count
    }
}

/// Index of the first maximum.
pub(crate) fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate().skip(1) {
        if *v > values[best] {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vector(dim: usize, entries: &[(usize, f64)]) -> FeatureVector {
        FeatureVector {
            dim,
            entries: entries.to_vec(),
        }
    }

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn two_class_model() -> MultinomialNaiveBayes {
        let x = vec![
            vector(3, &[(0, 1.0)]),
            vector(3, &[(0, 0.8), (1, 0.6)]),
            vector(3, &[(2, 1.0)]),
        ];
        MultinomialNaiveBayes::fit(&x, &labels(&["SPAM", "SPAM", "HAM"]), DEFAULT_ALPHA).unwrap()
    }

    #[test]
    fn classes_are_sorted_and_priors_follow_frequency() {
        let nb = two_class_model();
        assert_eq!(nb.classes(), &["HAM".to_string(), "SPAM".to_string()]);
        assert_eq!(nb.class_count(), &[1.0, 2.0]);
        assert!((nb.class_log_prior[0] - (1.0f64 / 3.0).ln()).abs() < 1e-12);
        assert!((nb.class_log_prior[1] - (2.0f64 / 3.0).ln()).abs() < 1e-12);
    }

    #[test]
    fn feature_log_prob_uses_laplace_smoothing() {
        let nb = two_class_model();
        // HAM: counts [0, 0, 1], total 1 + 3
        let ham = &nb.feature_log_prob[0];
        assert!((ham[2] - (2.0f64 / 4.0).ln()).abs() < 1e-12);
        assert!((ham[0] - (1.0f64 / 4.0).ln()).abs() < 1e-12);
    }

    #[test]
    fn probabilities_sum_to_one() {
        let nb = two_class_model();
        let proba = nb.predict_proba(&vector(3, &[(1, 0.5), (2, 0.5)])).unwrap();
        let sum: f64 = proba.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
        assert!(proba.iter().all(|p| (0.0..=1.0).contains(p)));
    }

    #[test]
    fn predicts_obvious_classes() {
        let nb = two_class_model();
        assert_eq!(nb.predict(&vector(3, &[(0, 1.0)])).unwrap(), "SPAM");
        assert_eq!(nb.predict(&vector(3, &[(2, 1.0)])).unwrap(), "HAM");
    }

    #[test]
    fn empty_input_falls_back_to_prior() {
        let nb = two_class_model();
        assert_eq!(nb.predict(&vector(3, &[])).unwrap(), "SPAM");
        let proba = nb.predict_proba(&vector(3, &[])).unwrap();
        assert!((proba[1] - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn rejects_wrong_dimension() {
        let nb = two_class_model();
        let err = nb.predict(&vector(5, &[])).unwrap_err();
        assert!(matches!(err, PredictionError::FeatureMismatch { expected: 3, actual: 5 }));
    }

    #[test]
    fn single_class_always_wins() {
        let nb = MultinomialNaiveBayes::fit(&[vector(2, &[(0, 1.0)])], &labels(&["ONLY"]), 1.0)
            .unwrap();
        assert_eq!(nb.predict(&vector(2, &[(1, 1.0)])).unwrap(), "ONLY");
        assert_eq!(nb.predict_proba(&vector(2, &[])).unwrap(), vec![1.0]);
    }

    #[test]
    fn fit_rejects_bad_input() {
        assert!(matches!(
            MultinomialNaiveBayes::fit(&[], &[], 1.0),
            Err(TrainingError::EmptyDataset)
        ));
        assert!(matches!(
            MultinomialNaiveBayes::fit(&[vector(1, &[])], &[], 1.0),
            Err(TrainingError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn argmax_takes_first_maximum() {
        assert_eq!(argmax(&[0.2, 0.5, 0.5]), 1);
        assert_eq!(argmax(&[1.0]), 0);
    }
}
