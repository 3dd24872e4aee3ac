//! Evaluation metrics for the held-out test split.
//!
//! Computes confusion-matrix-derived metrics from predicted and
//! ground-truth username labels.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Per-class precision/recall/F1 with support.
#[derive(Debug, Clone)]
pub struct ClassMetrics {
    pub label: String,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Evaluation of predictions against ground truth.
#[derive(Debug, Clone)]
pub struct EvaluationReport {
    /// Sorted union of the labels observed in truth and predictions.
    pub labels: Vec<String>,
    pub accuracy: f64,
    pub per_class: Vec<ClassMetrics>,
    /// Rows are actual labels, columns are predicted labels, both in
    /// `labels` order.
    pub confusion: Vec<Vec<usize>>,
}

/// Compute accuracy, per-class metrics, and the confusion matrix.
pub fn evaluate(truth: &[String], predictions: &[String]) -> EvaluationReport {
    assert_eq!(
        truth.len(),
        predictions.len(),
        "truth and predictions must have the same length"
    );

    let labels: Vec<String> = truth
        .iter()
        .chain(predictions.iter())
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let index: BTreeMap<&str, usize> = labels
        .iter()
        .enumerate()
        .map(|(i, label)| (label.as_str(), i))
        .collect();

    let classes = labels.len();
    let mut confusion = vec![vec![0usize; classes]; classes];
    let mut correct = 0;
    for (actual, predicted) in truth.iter().zip(predictions.iter()) {
        confusion[index[actual.as_str()]][index[predicted.as_str()]] += 1;
        if actual == predicted {
            correct += 1;
        }
    }

    let accuracy = if truth.is_empty() {
        0.0
    } else {
        correct as f64 / truth.len() as f64
    };

    let per_class = labels
        .iter()
        .enumerate()
        .map(|(class, label)| {
            let tp = confusion[class][class];
            let predicted: usize = (0..classes).map(|row| confusion[row][class]).sum();
            let support: usize = confusion[class].iter().sum();

            let precision = if predicted > 0 {
                tp as f64 / predicted as f64
            } else {
                0.0
            };
            let recall = if support > 0 {
                tp as f64 / support as f64
            } else {
                0.0
            };
            let f1 = if precision + recall > 0.0 {
                2.0 * precision * recall / (precision + recall)
            } else {
                0.0
            };

            ClassMetrics {
                label: label.clone(),
                precision,
                recall,
                f1,
                support,
            }
        })
        .collect();

    EvaluationReport {
        labels,
        accuracy,
        per_class,
        confusion,
    }
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let w = self
            .labels
            .iter()
            .map(String::len)
            .max()
            .unwrap_or(0)
            .max(9);

        writeln!(f, "{:>w$}  precision  recall  f1-score  support", "")?;
        for m in &self.per_class {
            writeln!(
                f,
                "{:>w$}  {:>9.4}  {:>6.4}  {:>8.4}  {:>7}",
                m.label, m.precision, m.recall, m.f1, m.support
            )?;
        }
        writeln!(f)?;
        writeln!(f, "Confusion matrix (rows: actual, columns: predicted):")?;
        write!(f, "{:>w$}", "")?;
        for label in &self.labels {
            write!(f, "  {label:>w$}")?;
        }
        writeln!(f)?;
        for (row, label) in self.labels.iter().enumerate() {
            write!(f, "{label:>w$}")?;
            for count in &self.confusion[row] {
                write!(f, "  {count:>w$}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_perfect_predictions() {
        let truth = strings(&["alice", "bob", "alice"]);
        let report = evaluate(&truth, &truth);

        assert!((report.accuracy - 1.0).abs() < 1e-9);
        for m in &report.per_class {
            assert!((m.precision - 1.0).abs() < 1e-9);
            assert!((m.recall - 1.0).abs() < 1e-9);
            assert!((m.f1 - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_mixed_multiclass() {
        let truth = strings(&["alice", "alice", "bob", "bob", "carol"]);
        let predictions = strings(&["alice", "bob", "bob", "bob", "alice"]);
        let report = evaluate(&truth, &predictions);

        assert!((report.accuracy - 3.0 / 5.0).abs() < 1e-9);

        // Labels are sorted: alice, bob, carol.
        assert_eq!(report.labels, strings(&["alice", "bob", "carol"]));
        assert_eq!(report.confusion[0], vec![1, 1, 0]);
        assert_eq!(report.confusion[1], vec![0, 2, 0]);
        assert_eq!(report.confusion[2], vec![1, 0, 0]);

        let alice = &report.per_class[0];
        assert!((alice.precision - 0.5).abs() < 1e-9);
        assert!((alice.recall - 0.5).abs() < 1e-9);
        assert_eq!(alice.support, 2);

        let bob = &report.per_class[1];
        assert!((bob.precision - 2.0 / 3.0).abs() < 1e-9);
        assert!((bob.recall - 1.0).abs() < 1e-9);

        let carol = &report.per_class[2];
        assert!((carol.precision).abs() < 1e-9);
        assert!((carol.recall).abs() < 1e-9);
        assert!((carol.f1).abs() < 1e-9);
        assert_eq!(carol.support, 1);
    }

    #[test]
    fn test_label_only_seen_in_predictions_gets_a_column() {
        let truth = strings(&["alice", "alice"]);
        let predictions = strings(&["alice", "mallory"]);
        let report = evaluate(&truth, &predictions);

        assert_eq!(report.labels, strings(&["alice", "mallory"]));
        assert_eq!(report.per_class[1].support, 0);
        assert!((report.per_class[1].recall).abs() < 1e-9);
    }

    #[test]
    fn test_empty_inputs() {
        let report = evaluate(&[], &[]);
        assert!((report.accuracy).abs() < 1e-9);
        assert!(report.labels.is_empty());
        assert!(report.per_class.is_empty());
    }

    #[test]
    fn test_display_renders_every_label() {
        let truth = strings(&["alice", "bob"]);
        let predictions = strings(&["alice", "alice"]);
        let rendered = evaluate(&truth, &predictions).to_string();

        assert!(rendered.contains("precision"));
        assert!(rendered.contains("alice"));
        assert!(rendered.contains("bob"));
        assert!(rendered.contains("Confusion matrix"));
    }
}
