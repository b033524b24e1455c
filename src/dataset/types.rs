//! Core data types for labeled packet observations.

use serde::{Deserialize, Serialize};

/// Header of the source port column
pub const SOURCE_PORT: &str = "Source Port";
/// Header of the destination port column
pub const DESTINATION_PORT: &str = "Destination Port";
/// Header of the protocol column
pub const PROTOCOL: &str = "Protocol";
/// Header of the frame length column
pub const LENGTH: &str = "Length";
/// Header of the ground-truth label column (0 = normal, 1 = flood)
pub const LABEL: &str = "bad_packet";

/// Ground-truth or predicted class of a packet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    /// 0 - regular traffic
    Normal,
    /// 1 - part of a flood
    Flood,
}

impl Label {
    /// Both classes in label order
    pub const ALL: [Label; 2] = [Label::Normal, Label::Flood];

    /// Map a numeric class value to a label
    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            0 => Some(Label::Normal),
            1 => Some(Label::Flood),
            _ => None,
        }
    }

    pub fn value(self) -> u8 {
        match self {
            Label::Normal => 0,
            Label::Flood => 1,
        }
    }

    /// Status string used in the prediction report
    pub fn status(self) -> &'static str {
        match self {
            Label::Normal => "NORMAL",
            Label::Flood => "FLOOD_DETECTED",
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Label::Normal => write!(f, "normal"),
            Label::Flood => write!(f, "flood"),
        }
    }
}

/// A single cell as seen by the feature encoder
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellValue<'a> {
    Numeric(f64),
    Category(&'a str),
}

impl CellValue<'_> {
    /// Text form used when a column is one-hot encoded
    pub fn category_name(&self) -> String {
        match self {
            CellValue::Numeric(v) => v.to_string(),
            CellValue::Category(s) => s.to_string(),
        }
    }
}

/// One packet observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub source_port: u16,
    pub destination_port: u16,
    pub protocol: String,
    pub length: u32,
    pub label: Label,
}

impl Record {
    /// Look up a feature column by its dataset header.
    ///
    /// The label column is deliberately not addressable here, so it can never
    /// leak into the feature matrix.
    pub fn value(&self, column: &str) -> Option<CellValue<'_>> {
        match column {
            SOURCE_PORT => Some(CellValue::Numeric(f64::from(self.source_port))),
            DESTINATION_PORT => Some(CellValue::Numeric(f64::from(self.destination_port))),
            PROTOCOL => Some(CellValue::Category(&self.protocol)),
            LENGTH => Some(CellValue::Numeric(f64::from(self.length))),
            _ => None,
        }
    }
}

/// Ordered, read-only collection of records loaded once per run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records carrying `label`
    pub fn count_label(&self, label: Label) -> usize {
        self.records.iter().filter(|r| r.label == label).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(protocol: &str, label: Label) -> Record {
        Record {
            source_port: 5353,
            destination_port: 53,
            protocol: protocol.to_string(),
            length: 74,
            label,
        }
    }

    #[test]
    fn test_label_values() {
        assert_eq!(Label::from_value(0), Some(Label::Normal));
        assert_eq!(Label::from_value(1), Some(Label::Flood));
        assert_eq!(Label::from_value(2), None);
        assert_eq!(Label::Flood.value(), 1);
        assert_eq!(Label::Flood.status(), "FLOOD_DETECTED");
        assert_eq!(Label::Normal.status(), "NORMAL");
    }

    #[test]
    fn test_record_value_hides_label() {
        let r = record("DNS", Label::Flood);
        assert_eq!(r.value(PROTOCOL), Some(CellValue::Category("DNS")));
        assert_eq!(r.value(LENGTH), Some(CellValue::Numeric(74.0)));
        assert_eq!(r.value(DESTINATION_PORT), Some(CellValue::Numeric(53.0)));
        assert_eq!(r.value(LABEL), None);
        assert_eq!(r.value("Info"), None);
    }

    #[test]
    fn test_count_label() {
        let ds = Dataset::new(vec![
            record("TCP", Label::Normal),
            record("UDP", Label::Flood),
            record("UDP", Label::Flood),
        ]);
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.count_label(Label::Normal), 1);
        assert_eq!(ds.count_label(Label::Flood), 2);
    }

    #[test]
    fn test_numeric_category_name() {
        assert_eq!(CellValue::Numeric(60.0).category_name(), "60");
        assert_eq!(CellValue::Category("TCP").category_name(), "TCP");
    }
}
