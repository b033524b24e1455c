use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::features::{DEFAULT_CATEGORICAL_COLUMNS, DEFAULT_FEATURE_COLUMNS};
use crate::scoring::DEFAULT_PREVIEW_LEN;

/// Dataset used when neither the config nor the CLI names one
pub const DEFAULT_DATASET: &str = "data/network_traffic_normal_heavy.csv";
/// Model artifact used when neither the config nor the CLI names one
pub const DEFAULT_MODEL: &str = "models/rf_flood_model.json";
pub const DEFAULT_N_PACKETS: usize = 1300;
pub const DEFAULT_NORMAL_RATIO: f64 = 0.77;
pub const DEFAULT_SEED: u64 = 42;

/// Run configuration that mirrors the YAML configuration file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    /// Path to the labeled packet CSV
    pub dataset: PathBuf,
    /// Path to the random forest JSON artifact
    pub model: PathBuf,
    /// Number of packets in the evaluated subset
    pub n_packets: usize,
    /// Fraction of the subset drawn from normal traffic (0-1)
    pub normal_ratio: f64,
    /// Seed for sampling and shuffling
    pub seed: u64,
    /// Number of per-packet predictions printed
    pub preview_len: usize,
    /// (Optional) Where to write the JSON report
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json_report: Option<PathBuf>,
    /// Feature columns handed to the encoder
    pub features: FeatureConfig,
}

/// Encoder column selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    /// Columns projected from each record, in order
    pub selected: Vec<String>,
    /// Subset of `selected` that is one-hot encoded
    pub categorical: Vec<String>,
}

impl EvalConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.n_packets == 0 {
            return Err(ValidationError::InvalidSampling(
                "n_packets must be greater than zero".to_string(),
            ));
        }
        if !self.normal_ratio.is_finite() || !(0.0..=1.0).contains(&self.normal_ratio) {
            return Err(ValidationError::InvalidSampling(format!(
                "normal_ratio must be within [0, 1], got {}",
                self.normal_ratio
            )));
        }
        if self.preview_len == 0 {
            return Err(ValidationError::InvalidReport(
                "preview_len must be greater than zero".to_string(),
            ));
        }
        self.features.validate()
    }

    /// The sampling/encoding knobs of this configuration
    pub fn settings(&self) -> RunSettings {
        RunSettings {
            n_packets: self.n_packets,
            normal_ratio: self.normal_ratio,
            seed: self.seed,
            preview_len: self.preview_len,
            selected_columns: self.features.selected.clone(),
            categorical_columns: self.features.categorical.clone(),
        }
    }
}

impl FeatureConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.selected.is_empty() {
            return Err(ValidationError::InvalidFeatures(
                "at least one feature column must be selected".to_string(),
            ));
        }
        for (i, column) in self.selected.iter().enumerate() {
            if self.selected[..i].contains(column) {
                return Err(ValidationError::InvalidFeatures(format!(
                    "column '{}' is selected twice",
                    column
                )));
            }
        }
        for column in &self.categorical {
            if !self.selected.contains(column) {
                return Err(ValidationError::InvalidFeatures(format!(
                    "categorical column '{}' is not a selected column",
                    column
                )));
            }
        }
        Ok(())
    }
}

/// Parameters the pipeline needs once inputs are loaded
#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    pub n_packets: usize,
    pub normal_ratio: f64,
    pub seed: u64,
    pub preview_len: usize,
    pub selected_columns: Vec<String>,
    pub categorical_columns: Vec<String>,
}

impl Default for RunSettings {
    fn default() -> Self {
        EvalConfig::default().settings()
    }
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid sampling configuration: {0}")]
    InvalidSampling(String),
    #[error("Invalid feature configuration: {0}")]
    InvalidFeatures(String),
    #[error("Invalid report configuration: {0}")]
    InvalidReport(String),
}

/// Default implementations
impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            dataset: PathBuf::from(DEFAULT_DATASET),
            model: PathBuf::from(DEFAULT_MODEL),
            n_packets: DEFAULT_N_PACKETS,
            normal_ratio: DEFAULT_NORMAL_RATIO,
            seed: DEFAULT_SEED,
            preview_len: DEFAULT_PREVIEW_LEN,
            json_report: None,
            features: FeatureConfig::default(),
        }
    }
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            selected: DEFAULT_FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect(),
            categorical: DEFAULT_CATEGORICAL_COLUMNS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_config_parsing() {
        let yaml = r#"
dataset: "captures/syn_flood.csv"
model: "models/rf_v2.json"
n_packets: 500
normal_ratio: 0.6
seed: 7
preview_len: 5
json_report: "out/report.json"
features:
  selected: ["Length", "Protocol"]
  categorical: ["Protocol"]
"#;

        let config: EvalConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.dataset, PathBuf::from("captures/syn_flood.csv"));
        assert_eq!(config.n_packets, 500);
        assert_eq!(config.seed, 7);
        assert_eq!(config.json_report, Some(PathBuf::from("out/report.json")));
        assert_eq!(config.features.selected, vec!["Length", "Protocol"]);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: EvalConfig = serde_yaml::from_str("n_packets: 200\n").unwrap();
        assert_eq!(config.n_packets, 200);
        assert_eq!(config.normal_ratio, DEFAULT_NORMAL_RATIO);
        assert_eq!(config.seed, DEFAULT_SEED);
        assert_eq!(config.dataset, PathBuf::from(DEFAULT_DATASET));
        assert_eq!(
            config.features.selected,
            vec!["Source Port", "Destination Port", "Protocol", "Length"]
        );
        assert_eq!(config.features.categorical, vec!["Protocol"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_errors() {
        let mut config = EvalConfig::default();
        config.n_packets = 0;
        assert!(matches!(config.validate(), Err(ValidationError::InvalidSampling(_))));

        let mut config = EvalConfig::default();
        config.normal_ratio = 1.01;
        assert!(matches!(config.validate(), Err(ValidationError::InvalidSampling(_))));

        let mut config = EvalConfig::default();
        config.preview_len = 0;
        assert!(matches!(config.validate(), Err(ValidationError::InvalidReport(_))));

        let mut config = EvalConfig::default();
        config.features.selected.clear();
        assert!(matches!(config.validate(), Err(ValidationError::InvalidFeatures(_))));

        let mut config = EvalConfig::default();
        config.features.categorical = vec!["Info".to_string()];
        assert!(matches!(config.validate(), Err(ValidationError::InvalidFeatures(_))));

        let mut config = EvalConfig::default();
        config.features.selected.push("Length".to_string());
        assert!(matches!(config.validate(), Err(ValidationError::InvalidFeatures(_))));
    }

    #[test]
    fn test_settings_from_default() {
        let settings = RunSettings::default();
        assert_eq!(settings.n_packets, 1300);
        assert_eq!(settings.normal_ratio, 0.77);
        assert_eq!(settings.seed, 42);
        assert_eq!(settings.preview_len, 10);
    }
}
