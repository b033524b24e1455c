//! Stratified sampling of a fixed-size subset with a target class ratio.
//!
//! All randomness comes from the caller's seed. Each random step (normal
//! draw, flood draw, final shuffle) starts from a generator freshly seeded
//! with that value, so the same inputs always produce the same subset.

use log::{debug, info};
use rand::rngs::StdRng;
use rand::seq::{index, SliceRandom};
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::dataset::{Dataset, Label, Record};
use crate::error::EvalError;

/// Per-class record counts of a subset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassCounts {
    pub normal: usize,
    pub flood: usize,
}

impl ClassCounts {
    /// Split `requested_size` by `normal_ratio`.
    ///
    /// The normal share is truncated, so the realized ratio may be up to one
    /// record below the requested one. The flood share takes the remainder.
    pub fn from_ratio(requested_size: usize, normal_ratio: f64) -> Result<Self, EvalError> {
        if requested_size == 0 {
            return Err(EvalError::InvalidParameter(
                "requested subset size must be greater than zero".to_string(),
            ));
        }
        if !normal_ratio.is_finite() || !(0.0..=1.0).contains(&normal_ratio) {
            return Err(EvalError::InvalidParameter(format!(
                "normal_ratio must be within [0, 1], got {}",
                normal_ratio
            )));
        }

        let normal = (requested_size as f64 * normal_ratio) as usize;
        Ok(Self {
            normal,
            flood: requested_size - normal,
        })
    }

    /// Realized composition of a labeled sequence
    pub fn from_labels(labels: &[Label]) -> Self {
        let flood = labels.iter().filter(|l| **l == Label::Flood).count();
        Self {
            normal: labels.len() - flood,
            flood,
        }
    }

    pub fn total(&self) -> usize {
        self.normal + self.flood
    }

    pub fn get(&self, label: Label) -> usize {
        match label {
            Label::Normal => self.normal,
            Label::Flood => self.flood,
        }
    }
}

/// A sampled, shuffled slice of the dataset
#[derive(Debug, Clone, PartialEq)]
pub struct Subset<'a> {
    records: Vec<&'a Record>,
    counts: ClassCounts,
}

impl<'a> Subset<'a> {
    pub fn records(&self) -> &[&'a Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn counts(&self) -> ClassCounts {
        self.counts
    }

    /// Ground-truth labels in row order
    pub fn labels(&self) -> Vec<Label> {
        self.records.iter().map(|r| r.label).collect()
    }
}

/// Draw a stratified subset of `requested_size` records.
pub fn sample(
    dataset: &Dataset,
    requested_size: usize,
    normal_ratio: f64,
    seed: u64,
) -> Result<Subset<'_>, EvalError> {
    let counts = ClassCounts::from_ratio(requested_size, normal_ratio)?;
    info!(
        "Sampling {} records ({} normal, {} flood) with seed {}",
        counts.total(),
        counts.normal,
        counts.flood,
        seed
    );

    let mut records = Vec::with_capacity(counts.total());
    for label in Label::ALL {
        let group: Vec<&Record> = dataset
            .records()
            .iter()
            .filter(|r| r.label == label)
            .collect();
        records.extend(draw(&group, label, counts.get(label), seed)?);
    }

    records.shuffle(&mut StdRng::seed_from_u64(seed));

    Ok(Subset { records, counts })
}

/// Draw `count` records from `group` without replacement
fn draw<'a>(
    group: &[&'a Record],
    label: Label,
    count: usize,
    seed: u64,
) -> Result<Vec<&'a Record>, EvalError> {
    if group.len() < count {
        return Err(EvalError::InsufficientData {
            class: label,
            requested: count,
            available: group.len(),
        });
    }
    debug!("Drawing {} of {} {} records", count, group.len(), label);

    let mut rng = StdRng::seed_from_u64(seed);
    Ok(index::sample(&mut rng, group.len(), count)
        .into_iter()
        .map(|i| group[i])
        .collect())
}
