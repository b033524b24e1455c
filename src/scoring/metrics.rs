//! Confusion-matrix metrics for binary packet predictions.
//!
//! Flood is the positive class.

use serde::{Deserialize, Serialize};

use crate::dataset::Label;

/// Binary confusion counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    /// Flood predicted as flood
    pub tp: usize,
    /// Normal predicted as flood
    pub fp: usize,
    /// Normal predicted as normal
    pub tn: usize,
    /// Flood predicted as normal
    #[serde(rename = "fn")]
    pub fn_count: usize,
}

impl ConfusionMatrix {
    /// Count outcomes pairwise. Both slices must be the same length.
    pub fn from_labels(predictions: &[Label], truth: &[Label]) -> Self {
        let mut m = Self::default();
        for (&pred, &actual) in predictions.iter().zip(truth) {
            match (pred, actual) {
                (Label::Flood, Label::Flood) => m.tp += 1,
                (Label::Flood, Label::Normal) => m.fp += 1,
                (Label::Normal, Label::Normal) => m.tn += 1,
                (Label::Normal, Label::Flood) => m.fn_count += 1,
            }
        }
        m
    }

    pub fn total(&self) -> usize {
        self.tp + self.fp + self.tn + self.fn_count
    }

    pub fn correct(&self) -> usize {
        self.tp + self.tn
    }

    /// Per-class precision, recall and F1 for `label`
    pub fn class_metrics(&self, label: Label) -> ClassMetrics {
        // (predicted as label and correct, predicted as label, actually label)
        let (hits, predicted, actual) = match label {
            Label::Flood => (self.tp, self.tp + self.fp, self.tp + self.fn_count),
            Label::Normal => (self.tn, self.tn + self.fn_count, self.tn + self.fp),
        };

        let precision = ratio(hits, predicted);
        let recall = ratio(hits, actual);
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };

        ClassMetrics {
            label,
            precision,
            recall,
            f1,
            support: actual,
        }
    }
}

/// Metrics for one class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub label: Label,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    /// Number of ground-truth records of this class
    pub support: usize,
}

fn ratio(num: usize, den: usize) -> f64 {
    if den > 0 {
        num as f64 / den as f64
    } else {
        0.0
    }
}
