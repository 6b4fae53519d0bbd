//! Offline training: fit the vectorizer and classifier on weakly labeled
//! text, evaluate on a held-out split, and produce a `ModelArtifact`.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::TrainingError;
use crate::model::artifact::ModelArtifact;
use crate::model::metrics::EvaluationReport;
use crate::model::naive_bayes::{DEFAULT_ALPHA, MultinomialNaiveBayes};
use crate::model::vectorizer::{DEFAULT_MAX_FEATURES, TfIdfVectorizer};

/// One normalized text with its weak label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledExample {
    pub text: String,
    pub category: String,
}

impl LabeledExample {
    pub fn new(text: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            category: category.into(),
        }
    }
}

/// Training hyperparameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    pub max_features: usize,
    pub alpha: f64,
    /// Share of examples held out for evaluation, in `[0, 1)`.
    pub test_fraction: f64,
    pub seed: u64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            max_features: DEFAULT_MAX_FEATURES,
            alpha: DEFAULT_ALPHA,
            test_fraction: 0.2,
            seed: 42,
        }
    }
}

/// Artifact plus its held-out report.
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    pub artifact: ModelArtifact,
    /// `None` when nothing was held out.
    pub report: Option<EvaluationReport>,
    pub train_size: usize,
    pub test_size: usize,
}

/// Fits and evaluates models.
#[derive(Debug, Clone, Default)]
pub struct ModelTrainer {
    config: TrainingConfig,
}

impl ModelTrainer {
    pub fn new(config: TrainingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Fit a vectorizer + classifier pair on parallel text/label slices.
    ///
    /// A single-class dataset is accepted; the resulting model always
    /// predicts that class.
    pub fn train(&self, texts: &[String], labels: &[String]) -> Result<ModelArtifact, TrainingError> {
        if texts.len() != labels.len() {
            return Err(TrainingError::LengthMismatch {
                features: texts.len(),
                labels: labels.len(),
            });
        }
        if texts.is_empty() {
            return Err(TrainingError::EmptyDataset);
        }
        if self.config.alpha.is_nan() || self.config.alpha <= 0.0 {
            return Err(TrainingError::InvalidParameter(format!(
                "alpha must be positive, got {}",
                self.config.alpha
            )));
        }

        let mut vectorizer = TfIdfVectorizer::new(self.config.max_features);
        let features = vectorizer.fit_transform(texts, labels)?;
        let classifier = MultinomialNaiveBayes::fit(&features, labels, self.config.alpha)?;

        info!(
            samples = texts.len(),
            features = vectorizer.vocabulary_size(),
            classes = classifier.classes().len(),
            "Model trained"
        );
        Ok(ModelArtifact::new(vectorizer, classifier))
    }

    /// Fit on labeled examples.
    pub fn train_examples(&self, examples: &[LabeledExample]) -> Result<ModelArtifact, TrainingError> {
        let (texts, labels) = unzip(examples);
        self.train(&texts, &labels)
    }

    /// Score a fitted model against held-out examples.
    pub fn evaluate(
        &self,
        artifact: &ModelArtifact,
        test: &[LabeledExample],
    ) -> Result<EvaluationReport, TrainingError> {
        let (texts, y_true) = unzip(test);
        let y_pred = texts
            .iter()
            .map(|text| {
                let x = artifact.vectorizer.transform(text);
                artifact.classifier.predict(&x).map(str::to_string)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let report = EvaluationReport::compute(&y_true, &y_pred)?;
        info!(
            samples = report.total,
            accuracy = report.accuracy,
            macro_f1 = report.macro_avg.f1,
            "Model evaluated"
        );
        Ok(report)
    }

    /// Split, train on the larger part, evaluate on the held-out part.
    pub fn run(&self, examples: &[LabeledExample]) -> Result<TrainingOutcome, TrainingError> {
        let (train, test) = train_test_split(examples, self.config.test_fraction, self.config.seed)?;
        let artifact = self.train_examples(&train)?;
        let report = if test.is_empty() {
            None
        } else {
            Some(self.evaluate(&artifact, &test)?)
        };
        Ok(TrainingOutcome {
            artifact,
            report,
            train_size: train.len(),
            test_size: test.len(),
        })
    }
}

/// Seeded shuffle, then hold out `ceil(n * test_fraction)` examples.
///
/// The same seed always yields the same split. At least one example is
/// kept for training.
pub fn train_test_split(
    examples: &[LabeledExample],
    test_fraction: f64,
    seed: u64,
) -> Result<(Vec<LabeledExample>, Vec<LabeledExample>), TrainingError> {
    if examples.is_empty() {
        return Err(TrainingError::EmptyDataset);
    }
    if !(0.0..1.0).contains(&test_fraction) {
        return Err(TrainingError::InvalidSplit(format!(
            "test fraction must be in [0, 1), got {test_fraction}"
        )));
    }

    let n = examples.len();
    let n_test = ((n as f64) * test_fraction).ceil() as usize;
    if n_test >= n {
        return Err(TrainingError::InvalidSplit(format!(
            "{n} examples leave nothing to train on with test fraction {test_fraction}"
        )));
    }

    let mut shuffled = examples.to_vec();
    let mut rng = StdRng::seed_from_u64(seed);
    shuffled.shuffle(&mut rng);

    let train = shuffled.split_off(n_test);
    Ok((train, shuffled))
}

fn unzip(examples: &[LabeledExample]) -> (Vec<String>, Vec<String>) {
    examples
        .iter()
        .map(|e| (e.text.clone(), e.category.clone()))
        .unzip()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Vec<LabeledExample> {
        let finance = [
            "invoice payment bank",
            "bank statement balance",
            "payment invoice credit",
            "tax investment fund",
            "credit card payment",
        ];
        let shopping = [
            "order shipped delivery",
            "tracking order package",
            "delivery tracking number",
            "purchase cart discount",
            "order confirmation purchase",
        ];
        finance
            .iter()
            .map(|t| LabeledExample::new(*t, "FINANCE"))
            .chain(shopping.iter().map(|t| LabeledExample::new(*t, "SHOPPING")))
            .collect()
    }

    #[test]
    fn split_is_deterministic_for_a_seed() {
        let data = corpus();
        let a = train_test_split(&data, 0.2, 42).unwrap();
        let b = train_test_split(&data, 0.2, 42).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.0.len(), 8);
        assert_eq!(a.1.len(), 2);
    }

    #[test]
    fn split_rejects_bad_fractions() {
        let data = corpus();
        assert!(matches!(
            train_test_split(&data, 1.0, 1),
            Err(TrainingError::InvalidSplit(_))
        ));
        assert!(matches!(
            train_test_split(&data, -0.1, 1),
            Err(TrainingError::InvalidSplit(_))
        ));
        assert!(matches!(
            train_test_split(&data[..1], 0.5, 1),
            Err(TrainingError::InvalidSplit(_))
        ));
        let (train, test) = train_test_split(&data, 0.0, 1).unwrap();
        assert_eq!(train.len(), 10);
        assert!(test.is_empty());
    }

    #[test]
    fn trained_model_separates_clear_classes() {
        let trainer = ModelTrainer::default();
        let artifact = trainer.train_examples(&corpus()).unwrap();
        assert_eq!(artifact.labels(), &["FINANCE".to_string(), "SHOPPING".to_string()]);
        assert!(artifact.validate().is_ok());

        let report = trainer
            .evaluate(
                &artifact,
                &[
                    LabeledExample::new("bank payment", "FINANCE"),
                    LabeledExample::new("order delivery", "SHOPPING"),
                ],
            )
            .unwrap();
        assert_eq!(report.accuracy, 1.0);
    }

    #[test]
    fn single_class_dataset_is_allowed() {
        let data = vec![
            LabeledExample::new("invoice payment", "FINANCE"),
            LabeledExample::new("bank statement", "FINANCE"),
        ];
        let artifact = ModelTrainer::default().train_examples(&data).unwrap();
        assert_eq!(artifact.labels(), &["FINANCE".to_string()]);
    }

    #[test]
    fn train_rejects_mismatched_inputs() {
        let trainer = ModelTrainer::default();
        let err = trainer
            .train(&["a b".to_string()], &[])
            .unwrap_err();
        assert!(matches!(err, TrainingError::LengthMismatch { features: 1, labels: 0 }));
        assert!(matches!(trainer.train(&[], &[]), Err(TrainingError::EmptyDataset)));
    }

    #[test]
    fn run_reports_held_out_metrics() {
        let outcome = ModelTrainer::default().run(&corpus()).unwrap();
        assert_eq!(outcome.train_size, 8);
        assert_eq!(outcome.test_size, 2);
        let report = outcome.report.unwrap();
        assert_eq!(report.total, 2);
    }

    #[test]
    fn max_features_caps_vocabulary() {
        let trainer = ModelTrainer::new(TrainingConfig {
            max_features: 5,
            ..TrainingConfig::default()
        });
        let artifact = trainer.train_examples(&corpus()).unwrap();
        assert_eq!(artifact.vectorizer.vocabulary_size(), 5);
        assert_eq!(artifact.classifier.n_features(), 5);
    }
}
