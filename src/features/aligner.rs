//! Alignment of encoded features to a classifier's training schema.
//!
//! The classifier reads features by position, so the aligned matrix must
//! carry exactly the schema's columns in the schema's order. Schema columns
//! missing from the encoding (categories absent from the subset) become
//! zeros; encoded columns unknown to the schema (categories never seen in
//! training) are dropped.

use std::collections::HashMap;

use log::{debug, info, warn};

use super::matrix::{AlignedMatrix, EncodedMatrix, FeatureMatrix};
use crate::error::EvalError;

/// Reshape `encoded` so its columns equal `schema`.
pub fn align<S: AsRef<str>>(encoded: &EncodedMatrix, schema: &[S]) -> Result<AlignedMatrix, EvalError> {
    let source = encoded.matrix();
    if schema.is_empty() {
        return Err(EvalError::SchemaMismatch(
            "classifier schema has no feature columns".to_string(),
        ));
    }

    let positions: HashMap<&str, usize> = source
        .columns()
        .iter()
        .enumerate()
        .map(|(i, name)| (name.as_str(), i))
        .collect();

    // Source column for each schema slot; None means fill with zeros
    let mapping: Vec<Option<usize>> = schema
        .iter()
        .map(|name| positions.get(name.as_ref()).copied())
        .collect();

    let matched = mapping.iter().filter(|m| m.is_some()).count();
    if matched == 0 {
        return Err(EvalError::SchemaMismatch(format!(
            "none of the {} schema columns appear among the {} encoded columns {:?}",
            schema.len(),
            source.n_columns(),
            source.columns()
        )));
    }

    let filled: Vec<&str> = schema
        .iter()
        .zip(&mapping)
        .filter(|(_, m)| m.is_none())
        .map(|(name, _)| name.as_ref())
        .collect();
    if !filled.is_empty() {
        debug!("Filling {} absent schema columns with zeros: {:?}", filled.len(), filled);
    }

    let dropped: Vec<&str> = source
        .columns()
        .iter()
        .map(String::as_str)
        .filter(|c| !schema.iter().any(|s| s.as_ref() == *c))
        .collect();
    if !dropped.is_empty() {
        warn!(
            "Dropping {} encoded columns unknown to the classifier: {:?}",
            dropped.len(),
            dropped
        );
    }

    let rows: Vec<Vec<f64>> = source
        .rows()
        .iter()
        .map(|row| mapping.iter().map(|m| m.map_or(0.0, |i| row[i])).collect())
        .collect();
    let columns: Vec<String> = schema.iter().map(|s| s.as_ref().to_string()).collect();

    info!(
        "Aligned {} rows to {} schema columns ({} matched, {} filled, {} dropped)",
        rows.len(),
        columns.len(),
        matched,
        filled.len(),
        dropped.len()
    );

    FeatureMatrix::new(columns, rows)
        .map(AlignedMatrix)
        .map_err(EvalError::SchemaMismatch)
}
