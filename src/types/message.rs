use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Format definition decoded from an FMT record.
///
/// Describes the byte layout of every later data record sharing `type_code`.
/// Scoped to one decode pass.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FormatMessage {
    pub type_code: u8,
    /// Total record length in bytes, including the 3-byte sync/type header
    pub byte_length: u8,
    pub name: String,
    /// One type character per field
    pub field_format: String,
    pub field_names: Vec<String>,
}

/// A single decoded field value.
///
/// Integer values are raw log units (often fixed-point); float values are
/// already engineering units.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum FieldValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl FieldValue {
    /// Numeric view of the value; text fields have none
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Int(v) => Some(*v as f64),
            FieldValue::Float(v) => Some(*v),
            FieldValue::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, FieldValue::Int(_))
    }
}

/// Generic decoded log message, identical for binary and text sources
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LogMessage {
    pub message_type: String,
    pub timestamp_seconds: f64,
    pub fields: HashMap<String, FieldValue>,
}

impl LogMessage {
    pub fn new(message_type: impl Into<String>, timestamp_seconds: f64) -> Self {
        Self {
            message_type: message_type.into(),
            timestamp_seconds,
            fields: HashMap::new(),
        }
    }

    /// Builder-style field insertion
    pub fn with_field(mut self, name: impl Into<String>, value: FieldValue) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Numeric value of a field, if present and numeric
    pub fn number(&self, name: &str) -> Option<f64> {
        self.fields.get(name).and_then(FieldValue::as_f64)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(FieldValue::as_str)
    }
}

/// Counters for records that were skipped instead of failing the parse
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DecodeStats {
    pub format_records: u32,
    pub malformed_format_records: u32,
    pub messages_decoded: u64,
    /// Bytes stepped over while searching for a sync marker
    pub skipped_bytes: u64,
    /// Records whose type code had no registered layout
    pub unknown_type_records: u64,
    pub truncated_records: u64,
    /// Records whose layout contains a type character we cannot decode
    pub undecodable_records: u64,
    pub blank_lines: u64,
    pub hit_message_cap: bool,
}

impl DecodeStats {
    /// Total number of records dropped on the floor
    pub fn dropped_records(&self) -> u64 {
        self.malformed_format_records as u64
            + self.unknown_type_records
            + self.truncated_records
            + self.undecodable_records
    }
}

/// Output of any decoder: messages in log order plus drop counters
#[derive(Debug, Clone, Default)]
pub struct DecodedLog {
    pub messages: Vec<LogMessage>,
    pub stats: DecodeStats,
}
