//! One-hot feature encoding of a sampled subset.

use std::collections::{BTreeSet, HashMap};

use log::debug;

use super::matrix::EncodedMatrix;
use crate::dataset::{CellValue, Record, DESTINATION_PORT, LENGTH, PROTOCOL, SOURCE_PORT};
use crate::error::EvalError;
use crate::sampler::Subset;

/// Feature columns exposed to the classifier, in selection order
pub const DEFAULT_FEATURE_COLUMNS: [&str; 4] = [SOURCE_PORT, DESTINATION_PORT, PROTOCOL, LENGTH];

/// Columns expanded into indicator columns
pub const DEFAULT_CATEGORICAL_COLUMNS: [&str; 1] = [PROTOCOL];

/// Separator between a column name and a category value
const CATEGORY_SEPARATOR: char = '_';

/// Encode the subset's selected columns into a numeric matrix.
///
/// Numeric columns come first in selection order, followed by one indicator
/// column per observed category (`<column>_<value>`), categories sorted.
pub fn encode<S: AsRef<str>>(
    subset: &Subset<'_>,
    categorical_columns: &[S],
    selected_feature_columns: &[S],
) -> Result<EncodedMatrix, EvalError> {
    encode_records(subset.records(), categorical_columns, selected_feature_columns)
}

/// Same as [`encode`] over plain records
pub fn encode_records<S: AsRef<str>>(
    records: &[&Record],
    categorical_columns: &[S],
    selected_feature_columns: &[S],
) -> Result<EncodedMatrix, EvalError> {
    let selected: Vec<&str> = selected_feature_columns.iter().map(AsRef::as_ref).collect();
    let categorical: Vec<&str> = categorical_columns.iter().map(AsRef::as_ref).collect();

    for column in categorical.iter() {
        if !selected.contains(column) {
            return Err(EvalError::UnknownColumn(format!(
                "categorical column '{}' is not among the selected feature columns",
                column
            )));
        }
    }

    let numeric: Vec<&str> = selected
        .iter()
        .copied()
        .filter(|c| !categorical.contains(c))
        .collect();
    // Keep selection order for the categorical groups too
    let categorical: Vec<&str> = selected
        .iter()
        .copied()
        .filter(|c| categorical.contains(c))
        .collect();

    let mut columns: Vec<String> = numeric.iter().map(|c| c.to_string()).collect();
    // Per categorical column: each record's category position, and the category count
    let mut groups: Vec<(Vec<usize>, usize)> = Vec::with_capacity(categorical.len());
    for &column in &categorical {
        let names = records
            .iter()
            .map(|record| cell(record, column).map(|v| v.category_name()))
            .collect::<Result<Vec<String>, EvalError>>()?;

        let categories: BTreeSet<&str> = names.iter().map(String::as_str).collect();
        let index: HashMap<&str, usize> = categories.iter().enumerate().map(|(i, &c)| (c, i)).collect();
        debug!("Column '{}' has {} categories: {:?}", column, categories.len(), categories);

        columns.extend(
            categories
                .iter()
                .map(|v| format!("{}{}{}", column, CATEGORY_SEPARATOR, v)),
        );
        let positions: Vec<usize> = names.iter().map(|n| index[n.as_str()]).collect();
        groups.push((positions, categories.len()));
    }

    let mut rows = Vec::with_capacity(records.len());
    for (r, record) in records.iter().enumerate() {
        let mut row = Vec::with_capacity(columns.len());
        for &column in &numeric {
            row.push(match cell(record, column)? {
                CellValue::Numeric(v) => v,
                CellValue::Category(s) => {
                    return Err(EvalError::UnknownColumn(format!(
                        "column '{}' holds text ('{}') and must be listed as categorical",
                        column, s
                    )))
                }
            });
        }
        for (positions, width) in &groups {
            let start = row.len();
            row.resize(start + width, 0.0);
            row[start + positions[r]] = 1.0;
        }
        rows.push(row);
    }

    EncodedMatrix::new(columns, rows).map_err(EvalError::InvalidParameter)
}

fn cell<'r>(record: &'r Record, column: &str) -> Result<CellValue<'r>, EvalError> {
    record
        .value(column)
        .ok_or_else(|| EvalError::UnknownColumn(column.to_string()))
}
