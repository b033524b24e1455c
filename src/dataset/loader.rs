//! Packet CSV loading.
//!
//! Reads capture exports with a header row. Columns are located by header
//! name, so extra columns (`No.`, `Time`, `Info`, ...) and any column order
//! are accepted.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use log::{debug, info};

use super::types::*;
use crate::error::EvalError;

/// Columns that must be present in the header
const REQUIRED_COLUMNS: [&str; 5] = [SOURCE_PORT, DESTINATION_PORT, PROTOCOL, LENGTH, LABEL];

/// Load a dataset from a CSV file on disk
pub fn load_dataset(path: &Path) -> Result<Dataset, EvalError> {
    info!("Loading dataset from: {:?}", path);

    let file = File::open(path).map_err(|e| EvalError::data_load(path, e.to_string()))?;
    let dataset = parse_dataset(BufReader::new(file), path)?;

    info!(
        "Loaded {} records ({} normal, {} flood)",
        dataset.len(),
        dataset.count_label(Label::Normal),
        dataset.count_label(Label::Flood)
    );
    Ok(dataset)
}

/// Parse CSV content. `source` is only used in error messages.
pub fn parse_dataset<R: BufRead>(reader: R, source: &Path) -> Result<Dataset, EvalError> {
    let mut lines = reader.lines().enumerate();

    let header_line = match lines.next() {
        Some((_, Ok(line))) => line,
        Some((_, Err(e))) => return Err(EvalError::data_load(source, e.to_string())),
        None => return Err(EvalError::data_load(source, "file is empty")),
    };
    let header = split_fields(header_line.trim_start_matches('\u{feff}'))
        .map_err(|e| EvalError::data_load(source, format!("line 1: {}", e)))?;
    let header_map: HashMap<String, usize> = header
        .into_iter()
        .enumerate()
        .map(|(i, name)| (name.trim().to_string(), i))
        .collect();

    for column in REQUIRED_COLUMNS {
        if !header_map.contains_key(column) {
            return Err(EvalError::data_load(
                source,
                format!("missing required column '{}'", column),
            ));
        }
    }
    let index = |name: &str| header_map[name];
    let columns = ColumnIndex {
        source_port: index(SOURCE_PORT),
        destination_port: index(DESTINATION_PORT),
        protocol: index(PROTOCOL),
        length: index(LENGTH),
        label: index(LABEL),
    };

    let mut records = Vec::new();
    for (i, line) in lines {
        let line_no = i + 1;
        let line = line.map_err(|e| EvalError::data_load(source, e.to_string()))?;
        if line.trim().is_empty() {
            continue;
        }

        let record = parse_record(&line, &columns)
            .map_err(|e| EvalError::data_load(source, format!("line {}: {}", line_no, e)))?;
        records.push(record);
    }

    debug!("Parsed {} data rows from {:?}", records.len(), source);
    Ok(Dataset::new(records))
}

/// Field positions of the columns a record is built from
struct ColumnIndex {
    source_port: usize,
    destination_port: usize,
    protocol: usize,
    length: usize,
    label: usize,
}

fn parse_record(line: &str, columns: &ColumnIndex) -> Result<Record, String> {
    let fields = split_fields(line)?;

    let get_field = |idx: usize, name: &str| -> Result<&str, String> {
        fields
            .get(idx)
            .map(|s| s.trim())
            .ok_or_else(|| format!("missing value for column '{}'", name))
    };

    let label_text = get_field(columns.label, LABEL)?;
    let label = label_text
        .parse::<u8>()
        .ok()
        .and_then(Label::from_value)
        .ok_or_else(|| format!("invalid label '{}' in column '{}' (expected 0 or 1)", label_text, LABEL))?;

    let protocol = get_field(columns.protocol, PROTOCOL)?;
    if protocol.is_empty() {
        return Err(format!("empty value in column '{}'", PROTOCOL));
    }

    Ok(Record {
        source_port: parse_number(get_field(columns.source_port, SOURCE_PORT)?, SOURCE_PORT)?,
        destination_port: parse_number(
            get_field(columns.destination_port, DESTINATION_PORT)?,
            DESTINATION_PORT,
        )?,
        protocol: protocol.to_string(),
        length: parse_number(get_field(columns.length, LENGTH)?, LENGTH)?,
        label,
    })
}

fn parse_number<T: FromStr>(text: &str, column: &str) -> Result<T, String> {
    if text.is_empty() {
        return Err(format!("empty value in column '{}'", column));
    }
    text.parse::<T>()
        .map_err(|_| format!("invalid number '{}' in column '{}'", text, column))
}

/// Split one CSV line into fields.
///
/// Fields may be wrapped in double quotes; inside quotes commas are literal
/// and `""` is an escaped quote.
fn split_fields(line: &str) -> Result<Vec<String>, String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            '"' if current.is_empty() => in_quotes = true,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }

    if in_quotes {
        return Err("unterminated quoted field".to_string());
    }
    fields.push(current);
    Ok(fields)
}
