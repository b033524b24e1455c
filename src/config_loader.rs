use crate::config::EvalConfig;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::info;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Load and parse configuration from a YAML file
pub fn load_config(config_path: &Path) -> Result<EvalConfig> {
    info!("Loading configuration from: {:?}", config_path);

    // Open the configuration file
    let file = File::open(config_path)
        .wrap_err_with(|| format!("Failed to open configuration '{}'", config_path.display()))?;

    // Parse the YAML content
    let config: EvalConfig = serde_yaml::from_reader(file)
        .wrap_err_with(|| format!("Failed to parse configuration '{}'", config_path.display()))?;

    // Validate the configuration
    config.validate()?;

    Ok(config)
}

/// CLI arguments that override YAML settings
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub dataset: Option<PathBuf>,
    pub model: Option<PathBuf>,
    pub n_packets: Option<usize>,
    pub normal_ratio: Option<f64>,
    pub seed: Option<u64>,
    pub preview_len: Option<usize>,
    pub json_report: Option<PathBuf>,
}

/// Apply CLI overrides to a configuration
pub fn apply_cli_overrides(config: &mut EvalConfig, overrides: &CliOverrides) -> Result<()> {
    if let Some(dataset) = &overrides.dataset {
        config.dataset = dataset.clone();
    }
    if let Some(model) = &overrides.model {
        config.model = model.clone();
    }
    if let Some(n_packets) = overrides.n_packets {
        info!("Overriding n_packets: {} -> {}", config.n_packets, n_packets);
        config.n_packets = n_packets;
    }
    if let Some(normal_ratio) = overrides.normal_ratio {
        info!("Overriding normal_ratio: {} -> {}", config.normal_ratio, normal_ratio);
        config.normal_ratio = normal_ratio;
    }
    if let Some(seed) = overrides.seed {
        config.seed = seed;
    }
    if let Some(preview_len) = overrides.preview_len {
        config.preview_len = preview_len;
    }
    if let Some(json_report) = &overrides.json_report {
        config.json_report = Some(json_report.clone());
    }

    // Re-validate after applying overrides
    config.validate()?;

    Ok(())
}

/// Resolve the effective configuration: defaults, then the optional YAML
/// file, then CLI flags
pub fn resolve_config(config_path: Option<&Path>, overrides: &CliOverrides) -> Result<EvalConfig> {
    let mut config = match config_path {
        Some(path) => load_config(path)?,
        None => EvalConfig::default(),
    };
    apply_cli_overrides(&mut config, overrides)?;
    Ok(config)
}
