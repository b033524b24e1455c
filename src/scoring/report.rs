//! Report generation for subset evaluations.
//!
//! The text report goes to stdout in a fixed format; the JSON report is an
//! optional machine-readable copy with run metadata attached.

use std::fs;
use std::path::{Path, PathBuf};

use color_eyre::eyre::{Context, Result};
use serde::{Deserialize, Serialize};

use super::PredictionReport;

/// Inputs that identify a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetadata {
    pub dataset: PathBuf,
    pub model: PathBuf,
    pub n_packets: usize,
    pub normal_ratio: f64,
    pub seed: u64,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    metadata: &'a RunMetadata,
    #[serde(flatten)]
    report: &'a PredictionReport,
}

/// Render the stdout summary
pub fn render_text_report(report: &PredictionReport) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(String::new());
    lines.push("--- Subset Prediction Summary ---".to_string());
    lines.push(format!("Total packets: {}", report.total));
    lines.push(format!("FLOOD_DETECTED: {}", report.flood_detected));
    lines.push(format!("NORMAL: {}", report.normal));
    lines.push(format!("Accuracy on this subset: {:.2}%", report.accuracy));

    lines.push(String::new());
    lines.push("Sample predictions:".to_string());
    for outcome in &report.preview {
        lines.push(format!("Packet {}: {}", outcome.index, outcome.status));
    }

    let mut content = lines.join("\n");
    content.push('\n');
    content
}

/// Print the summary to stdout
pub fn print_report(report: &PredictionReport) {
    print!("{}", render_text_report(report));
}

/// Write the JSON report
pub fn generate_json_report(
    report: &PredictionReport,
    metadata: &RunMetadata,
    output_path: &Path,
) -> Result<()> {
    let json = serde_json::to_string_pretty(&JsonReport { metadata, report })
        .context("Failed to serialize report to JSON")?;

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create report directory {}", parent.display()))?;
    }
    fs::write(output_path, json)
        .with_context(|| format!("Failed to write JSON report to {}", output_path.display()))?;

    log::info!("JSON report written to {}", output_path.display());
    Ok(())
}
