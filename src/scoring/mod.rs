//! Scoring of classifier predictions against ground truth.

pub mod metrics;
pub mod report;

pub use metrics::{ClassMetrics, ConfusionMatrix};
pub use report::{generate_json_report, render_text_report, RunMetadata};

use log::info;
use serde::{Deserialize, Serialize};

use crate::dataset::Label;
use crate::error::EvalError;
use crate::features::AlignedMatrix;
use crate::model::Classifier;
use crate::sampler::ClassCounts;

/// Number of per-packet outcomes shown by default
pub const DEFAULT_PREVIEW_LEN: usize = 10;

/// Prediction for one packet of the subset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacketOutcome {
    /// 1-based position in the subset
    pub index: usize,
    pub predicted: Label,
    pub status: String,
}

/// Summary of one evaluation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionReport {
    pub total: usize,
    pub flood_detected: usize,
    pub normal: usize,
    /// Percentage of predictions matching ground truth, in [0, 100]
    pub accuracy: f64,
    /// Ground-truth class composition of the scored subset
    pub subset: ClassCounts,
    pub confusion: ConfusionMatrix,
    pub per_class: Vec<ClassMetrics>,
    pub preview: Vec<PacketOutcome>,
}

/// Run the classifier on `features` and score its predictions.
///
/// The matrix columns must equal the classifier's feature schema, name for
/// name and in order.
pub fn score(
    classifier: &dyn Classifier,
    features: &AlignedMatrix,
    ground_truth: &[Label],
    preview_len: usize,
) -> Result<PredictionReport, EvalError> {
    if features.columns() != classifier.feature_names_in() {
        return Err(EvalError::SchemaMismatch(format!(
            "matrix columns {:?} differ from the classifier schema {:?}",
            features.columns(),
            classifier.feature_names_in()
        )));
    }

    let total = features.n_rows();
    if ground_truth.len() != total {
        return Err(EvalError::PredictionLengthMismatch {
            what: "ground truth",
            expected: total,
            actual: ground_truth.len(),
        });
    }

    let predictions = classifier.predict(features);
    if predictions.len() != total {
        return Err(EvalError::PredictionLengthMismatch {
            what: "classifier output",
            expected: total,
            actual: predictions.len(),
        });
    }

    let report = build_report(&predictions, ground_truth, preview_len);
    info!(
        "Scored {} predictions: {} flood, {} normal, {:.2}% accurate",
        report.total, report.flood_detected, report.normal, report.accuracy
    );
    Ok(report)
}

/// Aggregate already-computed predictions. Slices must be the same length.
pub fn build_report(predictions: &[Label], ground_truth: &[Label], preview_len: usize) -> PredictionReport {
    let total = predictions.len();
    let confusion = ConfusionMatrix::from_labels(predictions, ground_truth);

    let flood_detected = predictions.iter().filter(|p| **p == Label::Flood).count();
    let accuracy = if total > 0 {
        100.0 * confusion.correct() as f64 / total as f64
    } else {
        0.0
    };

    let preview = predictions
        .iter()
        .take(preview_len)
        .enumerate()
        .map(|(i, &predicted)| PacketOutcome {
            index: i + 1,
            predicted,
            status: predicted.status().to_string(),
        })
        .collect();

    PredictionReport {
        total,
        flood_detected,
        normal: total - flood_detected,
        accuracy,
        subset: ClassCounts::from_labels(ground_truth),
        confusion,
        per_class: Label::ALL.iter().map(|&l| confusion.class_metrics(l)).collect(),
        preview,
    }
}
