//! Runtime message-layout registry built from FMT records
//!
//! A log describes its own record layouts: each FMT record maps a type code to
//! a string of type characters and a list of column names. The registry turns
//! that into a decoding recipe consumed by one generic interpreter.

use crate::parser::stream::{fixed_ascii, LogDataStream};
use crate::types::{FieldValue, FormatMessage};
use std::collections::HashMap;
use tracing::{debug, trace};

/// Reserved type code of FMT records
pub const FMT_TYPE_CODE: u8 = 128;
/// Full FMT record length including the 3-byte header
pub const FMT_RECORD_LENGTH: usize = 89;
/// Sync marker + type code
pub const RECORD_HEADER_LENGTH: usize = 3;

/// Field type alphabet of the self-describing binary format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Float32,
    Float64,
    Char4,
    Char16,
    Char64,
    /// 32 x int16, skipped
    Int16Array32,
}

impl FieldType {
    /// Map a format character to its storage type.
    ///
    /// Scaled variants (`c`, `C`, `e`, `E`, `L`) decode to their raw integer
    /// storage; unit scaling happens during projection.
    pub fn from_format_char(c: char) -> Option<Self> {
        let field_type = match c {
            'b' => FieldType::Int8,
            'B' | 'M' => FieldType::UInt8,
            'h' | 'c' => FieldType::Int16,
            'H' | 'C' => FieldType::UInt16,
            'i' | 'e' | 'L' => FieldType::Int32,
            'I' | 'E' => FieldType::UInt32,
            'q' => FieldType::Int64,
            'Q' => FieldType::UInt64,
            'f' => FieldType::Float32,
            'd' => FieldType::Float64,
            'n' => FieldType::Char4,
            'N' => FieldType::Char16,
            'Z' => FieldType::Char64,
            'a' => FieldType::Int16Array32,
            _ => return None,
        };
        Some(field_type)
    }

    pub fn byte_width(self) -> usize {
        match self {
            FieldType::Int8 | FieldType::UInt8 => 1,
            FieldType::Int16 | FieldType::UInt16 => 2,
            FieldType::Int32 | FieldType::UInt32 | FieldType::Float32 | FieldType::Char4 => 4,
            FieldType::Int64 | FieldType::UInt64 | FieldType::Float64 => 8,
            FieldType::Char16 => 16,
            FieldType::Char64 | FieldType::Int16Array32 => 64,
        }
    }

    pub fn is_text(self) -> bool {
        matches!(self, FieldType::Char4 | FieldType::Char16 | FieldType::Char64)
    }

    pub fn is_float(self) -> bool {
        matches!(self, FieldType::Float32 | FieldType::Float64)
    }

    /// Read one value of this type. `None` means the field carries no scalar.
    pub fn read(self, stream: &mut LogDataStream) -> crate::Result<Option<FieldValue>> {
        let value = match self {
            FieldType::Int8 => FieldValue::Int(stream.read_i8()? as i64),
            FieldType::UInt8 => FieldValue::Int(stream.read_u8()? as i64),
            FieldType::Int16 => FieldValue::Int(stream.read_i16()? as i64),
            FieldType::UInt16 => FieldValue::Int(stream.read_u16()? as i64),
            FieldType::Int32 => FieldValue::Int(stream.read_i32()? as i64),
            FieldType::UInt32 => FieldValue::Int(stream.read_u32()? as i64),
            FieldType::Int64 => FieldValue::Int(stream.read_i64()?),
            FieldType::UInt64 => {
                let raw = stream.read_u64()?;
                match i64::try_from(raw) {
                    Ok(v) => FieldValue::Int(v),
                    Err(_) => FieldValue::Float(raw as f64),
                }
            }
            FieldType::Float32 => FieldValue::Float(stream.read_f32()? as f64),
            FieldType::Float64 => FieldValue::Float(stream.read_f64()?),
            FieldType::Char4 => FieldValue::Text(stream.read_fixed_string(4)?),
            FieldType::Char16 => FieldValue::Text(stream.read_fixed_string(16)?),
            FieldType::Char64 => FieldValue::Text(stream.read_fixed_string(64)?),
            FieldType::Int16Array32 => {
                stream.read_bytes(64)?;
                return Ok(None);
            }
        };
        Ok(Some(value))
    }
}

/// One step of a decoding recipe
#[derive(Debug, Clone, PartialEq)]
pub struct FieldLayout {
    pub name: String,
    pub field_type: FieldType,
}

/// Decoding recipe for one type code
#[derive(Debug, Clone)]
pub struct MessageLayout {
    pub format: FormatMessage,
    pub fields: Vec<FieldLayout>,
    /// False when the format uses a type character we cannot interpret or
    /// the fields overrun the declared length; such records are skipped whole.
    pub decodable: bool,
}

impl MessageLayout {
    pub fn from_format(format: FormatMessage) -> Self {
        let mut fields = Vec::with_capacity(format.field_names.len());
        let mut decodable = format.field_format.chars().count() == format.field_names.len();

        for (c, name) in format.field_format.chars().zip(format.field_names.iter()) {
            match FieldType::from_format_char(c) {
                Some(field_type) => fields.push(FieldLayout {
                    name: name.clone(),
                    field_type,
                }),
                None => {
                    decodable = false;
                    break;
                }
            }
        }

        let payload: usize = fields.iter().map(|f| f.field_type.byte_width()).sum();
        if payload + RECORD_HEADER_LENGTH > format.byte_length as usize {
            decodable = false;
        }

        Self {
            format,
            fields,
            decodable,
        }
    }

    pub fn record_length(&self) -> usize {
        self.format.byte_length as usize
    }
}

/// Type code -> layout, scoped to one decode pass
#[derive(Debug, Default)]
pub struct FormatRegistry {
    layouts: HashMap<u8, MessageLayout>,
}

impl FormatRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the layout for a format's type code
    pub fn register(&mut self, format: FormatMessage) {
        let layout = MessageLayout::from_format(format);
        if layout.decodable {
            trace!(
                "Registered {} (type {}) with {} fields",
                layout.format.name,
                layout.format.type_code,
                layout.fields.len()
            );
        } else {
            debug!(
                "Layout for {} (type {}) format '{}' is not decodable",
                layout.format.name, layout.format.type_code, layout.format.field_format
            );
        }
        self.layouts.insert(layout.format.type_code, layout);
    }

    pub fn get(&self, type_code: u8) -> Option<&MessageLayout> {
        self.layouts.get(&type_code)
    }

    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }
}

/// Parse the 86-byte body of an FMT record (everything after the header).
///
/// Returns `None` for bodies that cannot describe a usable layout.
pub fn parse_format_body(body: &[u8]) -> Option<FormatMessage> {
    if body.len() < FMT_RECORD_LENGTH - RECORD_HEADER_LENGTH {
        return None;
    }
    let type_code = body[0];
    let byte_length = body[1];
    let name = fixed_ascii(&body[2..6]);
    let field_format = fixed_ascii(&body[6..22]);
    let columns = fixed_ascii(&body[22..86]);

    if name.is_empty() || (byte_length as usize) < RECORD_HEADER_LENGTH {
        return None;
    }

    let field_names = if columns.is_empty() {
        Vec::new()
    } else {
        columns.split(',').map(|s| s.trim().to_string()).collect()
    };

    Some(FormatMessage {
        type_code,
        byte_length,
        name,
        field_format,
        field_names,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(format: &str, names: &[&str], length: u8) -> FormatMessage {
        FormatMessage {
            type_code: 130,
            byte_length: length,
            name: "TEST".into(),
            field_format: format.into(),
            field_names: names.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_format_char_widths() {
        let widths: Vec<usize> = "bBhHiIqQfdnNZacCeELM"
            .chars()
            .map(|c| FieldType::from_format_char(c).unwrap().byte_width())
            .collect();
        assert_eq!(
            widths,
            vec![1, 1, 2, 2, 4, 4, 8, 8, 4, 8, 4, 16, 64, 64, 2, 2, 4, 4, 4, 1]
        );
        assert!(FieldType::from_format_char('x').is_none());
    }

    #[test]
    fn test_layout_decodable_when_widths_fit() {
        let layout = MessageLayout::from_format(fmt("QhL", &["TimeUS", "A", "B"], 3 + 8 + 2 + 4));
        assert!(layout.decodable);
        assert_eq!(layout.fields.len(), 3);
        assert_eq!(layout.fields[2].field_type, FieldType::Int32);
    }

    #[test]
    fn test_layout_rejects_unknown_char_and_overrun() {
        assert!(!MessageLayout::from_format(fmt("Qx", &["TimeUS", "X"], 20)).decodable);
        assert!(!MessageLayout::from_format(fmt("QQ", &["A", "B"], 10)).decodable);
        assert!(!MessageLayout::from_format(fmt("QQ", &["A"], 19)).decodable);
    }

    #[test]
    fn test_parse_format_body() {
        let mut body = vec![0u8; 86];
        body[0] = 129;
        body[1] = 23;
        body[2..5].copy_from_slice(b"ATT");
        body[6..9].copy_from_slice(b"Qcc");
        let cols = b"TimeUS,Roll,Pitch";
        body[22..22 + cols.len()].copy_from_slice(cols);

        let format = parse_format_body(&body).unwrap();
        assert_eq!(format.type_code, 129);
        assert_eq!(format.byte_length, 23);
        assert_eq!(format.name, "ATT");
        assert_eq!(format.field_format, "Qcc");
        assert_eq!(format.field_names, vec!["TimeUS", "Roll", "Pitch"]);
    }

    #[test]
    fn test_parse_format_body_rejects_empty_name() {
        let mut body = vec![0u8; 86];
        body[1] = 20;
        assert!(parse_format_body(&body).is_none());
        assert!(parse_format_body(&body[..40]).is_none());
    }
}
