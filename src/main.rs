use clap::Parser;
use color_eyre::Result;
use env_logger::Env;
use log::info;
use std::path::PathBuf;

use floodeval::config_loader::{self, CliOverrides};
use floodeval::orchestrator;
use floodeval::scoring::report::print_report;

/// Predict flood/normal packets on a reproducible subset of a labeled CSV
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input CSV file
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Trained random forest model file (JSON)
    #[arg(long)]
    model: Option<PathBuf>,

    /// Number of packets to predict in subset
    #[arg(long = "n_packets", alias = "n-packets")]
    n_packets: Option<usize>,

    /// Ratio of normal packets in subset (0-1)
    #[arg(long = "normal_ratio", alias = "normal-ratio")]
    normal_ratio: Option<f64>,

    /// Seed for sampling and shuffling
    #[arg(long)]
    seed: Option<u64>,

    /// Number of sample predictions to print
    #[arg(long)]
    preview: Option<usize>,

    /// Optional YAML run configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write a JSON copy of the report to this path
    #[arg(long)]
    json_report: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            dataset: self.csv.clone(),
            model: self.model.clone(),
            n_packets: self.n_packets,
            normal_ratio: self.normal_ratio,
            seed: self.seed,
            preview_len: self.preview,
            json_report: self.json_report.clone(),
        }
    }
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Parse command-line arguments
    let args = Args::parse();

    // Logs go to stderr; stdout carries only the report
    env_logger::Builder::from_env(Env::default().default_filter_or(&args.log_level)).init();

    let config = config_loader::resolve_config(args.config.as_deref(), &args.overrides())?;
    info!("Dataset: {:?}", config.dataset);
    info!("Model: {:?}", config.model);

    let report = orchestrator::run(&config)?;
    print_report(&report);

    Ok(())
}
