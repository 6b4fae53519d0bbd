//! Held-out evaluation: per-class precision/recall/F1, macro and
//! support-weighted averages, and accuracy.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TrainingError;

/// Metrics for one class, or an average over classes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub label: String,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Full evaluation report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// One entry per label seen in either truth or prediction, sorted.
    pub per_class: Vec<ClassMetrics>,
    pub accuracy: f64,
    pub macro_avg: ClassMetrics,
    pub weighted_avg: ClassMetrics,
    pub total: usize,
}

impl EvaluationReport {
    /// Compare true labels against predictions.
    pub fn compute(y_true: &[String], y_pred: &[String]) -> Result<Self, TrainingError> {
        if y_true.len() != y_pred.len() {
            return Err(TrainingError::LengthMismatch {
                features: y_pred.len(),
                labels: y_true.len(),
            });
        }
        if y_true.is_empty() {
            return Err(TrainingError::EmptyDataset);
        }

        let labels: BTreeSet<&str> = y_true
            .iter()
            .chain(y_pred)
            .map(String::as_str)
            .collect();

        let per_class: Vec<ClassMetrics> = labels
            .into_iter()
            .map(|label| class_metrics(label, y_true, y_pred))
            .collect();

        let total = y_true.len();
        let correct = y_true.iter().zip(y_pred).filter(|(t, p)| t == p).count();
        let accuracy = correct as f64 / total as f64;

        let n = per_class.len() as f64;
        let macro_avg = ClassMetrics {
            label: "macro avg".to_string(),
            precision: per_class.iter().map(|m| m.precision).sum::<f64>() / n,
            recall: per_class.iter().map(|m| m.recall).sum::<f64>() / n,
            f1: per_class.iter().map(|m| m.f1).sum::<f64>() / n,
            support: total,
        };

        let weight = |m: &ClassMetrics| m.support as f64 / total as f64;
        let weighted_avg = ClassMetrics {
            label: "weighted avg".to_string(),
            precision: per_class.iter().map(|m| m.precision * weight(m)).sum(),
            recall: per_class.iter().map(|m| m.recall * weight(m)).sum(),
            f1: per_class.iter().map(|m| m.f1 * weight(m)).sum(),
            support: total,
        };

        Ok(Self {
            per_class,
            accuracy,
            macro_avg,
            weighted_avg,
            total,
        })
    }

    pub fn class(&self, label: &str) -> Option<&ClassMetrics> {
        self.per_class.iter().find(|m| m.label == label)
    }
}

fn class_metrics(label: &str, y_true: &[String], y_pred: &[String]) -> ClassMetrics {
    let mut tp = 0usize;
    let mut fp = 0usize;
    let mut fn_ = 0usize;
    for (t, p) in y_true.iter().zip(y_pred) {
        match (t == label, p == label) {
            (true, true) => tp += 1,
            (false, true) => fp += 1,
            (true, false) => fn_ += 1,
            (false, false) => {}
        }
    }

    // zero-division yields 0
    let ratio = |num: usize, den: usize| if den == 0 { 0.0 } else { num as f64 / den as f64 };
    let precision = ratio(tp, tp + fp);
    let recall = ratio(tp, tp + fn_);
    let f1 = if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    };

    ClassMetrics {
        label: label.to_string(),
        precision,
        recall,
        f1,
        support: tp + fn_,
    }
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .per_class
            .iter()
            .map(|m| m.label.len())
            .chain([self.weighted_avg.label.len()])
            .max()
            .unwrap_or(12);

        writeln!(
            f,
            "{:>width$} {:>9} {:>9} {:>9} {:>9}",
            "", "precision", "recall", "f1-score", "support"
        )?;
        writeln!(f)?;
        for m in &self.per_class {
            write_row(f, m, width)?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{:>width$} {:>9} {:>9} {:>9.2} {:>9}",
            "accuracy", "", "", self.accuracy, self.total
        )?;
        write_row(f, &self.macro_avg, width)?;
        write_row(f, &self.weighted_avg, width)
    }
}

fn write_row(f: &mut fmt::Formatter<'_>, m: &ClassMetrics, width: usize) -> fmt::Result {
    writeln!(
        f,
        "{:>width$} {:>9.2} {:>9.2} {:>9.2} {:>9}",
        m.label, m.precision, m.recall, m.f1, m.support
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn perfect_predictions_score_one() {
        let y = labels(&["A", "B", "A"]);
        let report = EvaluationReport::compute(&y, &y).unwrap();
        assert_eq!(report.accuracy, 1.0);
        assert_eq!(report.macro_avg.f1, 1.0);
        assert_eq!(report.class("A").unwrap().support, 2);
    }

    #[test]
    fn computes_per_class_and_averages() {
        let y_true = labels(&["A", "A", "B", "B"]);
        let y_pred = labels(&["A", "B", "B", "B"]);
        let report = EvaluationReport::compute(&y_true, &y_pred).unwrap();

        let a = report.class("A").unwrap();
        assert_eq!(a.precision, 1.0);
        assert_eq!(a.recall, 0.5);
        assert!((a.f1 - 2.0 / 3.0).abs() < 1e-12);

        let b = report.class("B").unwrap();
        assert!((b.precision - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(b.recall, 1.0);

        assert_eq!(report.accuracy, 0.75);
        assert!((report.macro_avg.recall - 0.75).abs() < 1e-12);
        assert_eq!(report.weighted_avg.support, 4);
    }

    #[test]
    fn label_only_predicted_gets_zero_recall_row() {
        let report =
            EvaluationReport::compute(&labels(&["A", "A"]), &labels(&["A", "C"])).unwrap();
        let c = report.class("C").unwrap();
        assert_eq!(c.precision, 0.0);
        assert_eq!(c.recall, 0.0);
        assert_eq!(c.support, 0);
    }

    #[test]
    fn rejects_mismatched_lengths() {
        let err = EvaluationReport::compute(&labels(&["A"]), &labels(&[])).unwrap_err();
        assert!(matches!(err, TrainingError::LengthMismatch { .. }));
    }

    #[test]
    fn display_renders_every_class() {
        let report =
            EvaluationReport::compute(&labels(&["FINANCE", "SHOPPING"]), &labels(&["FINANCE", "FINANCE"]))
                .unwrap();
        let table = report.to_string();
        assert!(table.contains("FINANCE"));
        assert!(table.contains("SHOPPING"));
        assert!(table.contains("accuracy"));
        assert!(table.contains("weighted avg"));
    }
}
