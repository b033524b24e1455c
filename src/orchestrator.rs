//! High-level orchestration of one evaluation run.
//!
//! Stages run strictly in sequence: load dataset, load model, sample,
//! encode, align, score. Any stage failure aborts the run before a report
//! exists.

use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::info;

use crate::config::{EvalConfig, RunSettings};
use crate::dataset::{load_dataset, Dataset};
use crate::error::EvalError;
use crate::features::{align, encode};
use crate::model::{load_model, Classifier};
use crate::sampler::sample;
use crate::scoring::{generate_json_report, score, PredictionReport, RunMetadata};

/// Sample, encode, align and score against an already-loaded classifier.
pub fn evaluate(
    dataset: &Dataset,
    classifier: &dyn Classifier,
    settings: &RunSettings,
) -> Result<PredictionReport, EvalError> {
    let subset = sample(dataset, settings.n_packets, settings.normal_ratio, settings.seed)?;
    let counts = subset.counts();
    info!(
        "Subset composition: {} normal, {} flood (requested ratio {})",
        counts.normal, counts.flood, settings.normal_ratio
    );

    let encoded = encode(&subset, &settings.categorical_columns, &settings.selected_columns)?;
    info!(
        "Encoded {} rows into {} feature columns",
        encoded.matrix().n_rows(),
        encoded.matrix().n_columns()
    );

    let aligned = align(&encoded, classifier.feature_names_in())?;

    score(classifier, &aligned, &subset.labels(), settings.preview_len)
}

/// Run a full evaluation from a resolved configuration.
pub fn run(config: &EvalConfig) -> Result<PredictionReport> {
    let dataset = load_dataset(&config.dataset).wrap_err("Dataset loading failed")?;
    let model = load_model(&config.model).wrap_err("Model loading failed")?;

    let settings = config.settings();
    let report = evaluate(&dataset, &model, &settings).wrap_err_with(|| {
        format!(
            "Evaluation of {} packets (normal_ratio {}, seed {}) failed",
            settings.n_packets, settings.normal_ratio, settings.seed
        )
    })?;

    if let Some(path) = &config.json_report {
        let metadata = RunMetadata {
            dataset: config.dataset.clone(),
            model: config.model.clone(),
            n_packets: config.n_packets,
            normal_ratio: config.normal_ratio,
            seed: config.seed,
        };
        generate_json_report(&report, &metadata, path)?;
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Label, Record};
    use crate::features::AlignedMatrix;

    /// Predicts flood for every row whose Length exceeds 500
    struct LengthRule {
        schema: Vec<String>,
    }

    impl Classifier for LengthRule {
        fn feature_names_in(&self) -> &[String] {
            &self.schema
        }

        fn predict(&self, features: &AlignedMatrix) -> Vec<Label> {
            let idx = features.columns().iter().position(|c| c == "Length").unwrap();
            features
                .rows()
                .iter()
                .map(|r| if r[idx] > 500.0 { Label::Flood } else { Label::Normal })
                .collect()
        }
    }

    fn dataset() -> Dataset {
        let mut records = Vec::new();
        for i in 0..20u16 {
            records.push(Record {
                source_port: 40000 + i,
                destination_port: 443,
                protocol: "TLSv1.3".to_string(),
                length: 120,
                label: Label::Normal,
            });
            records.push(Record {
                source_port: 1024 + i,
                destination_port: 80,
                protocol: "UDP".to_string(),
                length: 1200,
                label: Label::Flood,
            });
        }
        Dataset::new(records)
    }

    fn classifier() -> LengthRule {
        LengthRule {
            schema: ["Source Port", "Destination Port", "Length", "Protocol_TCP", "Protocol_UDP"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    fn settings(n_packets: usize, normal_ratio: f64) -> RunSettings {
        RunSettings {
            n_packets,
            normal_ratio,
            ..RunSettings::default()
        }
    }

    #[test]
    fn test_evaluate_perfect_rule() {
        let report = evaluate(&dataset(), &classifier(), &settings(20, 0.7)).unwrap();
        assert_eq!(report.total, 20);
        assert_eq!(report.normal, 14);
        assert_eq!(report.flood_detected, 6);
        assert_eq!(report.accuracy, 100.0);
        assert_eq!(report.subset, crate::sampler::ClassCounts { normal: 14, flood: 6 });
    }

    #[test]
    fn test_evaluate_is_reproducible() {
        let a = evaluate(&dataset(), &classifier(), &settings(15, 0.4)).unwrap();
        let b = evaluate(&dataset(), &classifier(), &settings(15, 0.4)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_evaluate_insufficient() {
        let err = evaluate(&dataset(), &classifier(), &settings(30, 0.9)).unwrap_err();
        assert!(matches!(err, EvalError::InsufficientData { class: Label::Normal, .. }));
    }

    #[test]
    fn test_evaluate_schema_mismatch() {
        let clf = LengthRule {
            schema: vec!["TTL".to_string()],
        };
        let err = evaluate(&dataset(), &clf, &settings(10, 0.5)).unwrap_err();
        assert!(matches!(err, EvalError::SchemaMismatch(_)));
    }
}
