//! # Floodeval - Reproducible subset evaluation of a packet flood classifier
//!
//! This library measures how a pre-trained packet classifier (normal vs.
//! flood) performs on a controlled, reproducible slice of a labeled packet
//! capture.
//!
//! ## Overview
//!
//! A run draws a fixed-size subset with a chosen normal/flood ratio, turns it
//! into the numeric features the classifier was trained on, and scores the
//! classifier's predictions against the ground-truth labels. Given the same
//! dataset, size, ratio and seed, a run always produces the same report.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - `dataset`: Packet records, labels and CSV loading
//! - `sampler`: Seeded stratified sampling without replacement
//! - `features`: One-hot encoding and alignment to the classifier schema
//! - `model`: The `Classifier` capability and the random forest artifact
//! - `scoring`: Accuracy, per-class metrics and report rendering
//! - `config` / `config_loader`: YAML run configuration and CLI overrides
//! - `orchestrator`: Runs the stages in order
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use floodeval::{config_loader, orchestrator, scoring};
//!
//! let config = config_loader::resolve_config(None, &Default::default())?;
//! let report = orchestrator::run(&config)?;
//! print!("{}", scoring::render_text_report(&report));
//! # Ok::<(), color_eyre::eyre::Error>(())
//! ```
//!
//! ## Configuration Format
//!
//! Every field is optional and falls back to the built-in default:
//!
//! ```yaml
//! dataset: "data/network_traffic_normal_heavy.csv"
//! model: "models/rf_flood_model.json"
//! n_packets: 1300
//! normal_ratio: 0.77
//! seed: 42
//! preview_len: 10
//! json_report: "reports/run.json"
//! features:
//!   selected: ["Source Port", "Destination Port", "Protocol", "Length"]
//!   categorical: ["Protocol"]
//! ```
//!
//! ## Error Handling
//!
//! Pipeline stages return [`error::EvalError`]; the orchestrator and binary
//! add stage context with `color_eyre`. Every error is fatal: there is no
//! partial report.

pub mod config;
pub mod config_loader;
pub mod dataset;
pub mod error;
pub mod features;
pub mod model;
pub mod orchestrator;
pub mod sampler;
pub mod scoring;

pub use error::EvalError;
