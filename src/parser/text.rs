//! Decoder for line-oriented text logs (`.LOG`, `.TLOG`)
//!
//! Each line is `TYPE, value, value, ...`. Layouts come from `FMT` lines in
//! the log itself, falling back to built-in layouts for the common message
//! types. Values are parsed defensively: anything non-numeric in a numeric
//! column becomes 0.

use crate::parser::binary::message_timestamp;
use crate::parser::format::FieldType;
use crate::types::{DecodedLog, FieldValue, FormatMessage, LogMessage};
use std::collections::HashMap;
use tracing::debug;

/// Built-in layouts: (message type, format characters, column names)
const BUILTIN_LAYOUTS: &[(&str, &str, &str)] = &[
    (
        "GPS",
        "QBIHBcLLeffffB",
        "TimeUS,Status,GMS,GWk,NSats,HDop,Lat,Lng,Alt,Spd,GCrs,VZ,Yaw,U",
    ),
    ("ATT", "QccccCCCCB", "TimeUS,DesRoll,Roll,DesPitch,Pitch,DesYaw,Yaw,ErrRP,ErrYaw,AEKF"),
    ("BAT", "QBfffffcf", "TimeUS,Inst,Volt,VoltR,Curr,CurrTot,EnrgTot,Temp,Res"),
    ("CTUN", "Qffffffefcfhh", "TimeUS,ThI,ABst,ThO,ThH,DAlt,Alt,BAlt,DSAlt,SAlt,TAlt,DCRt,CRt"),
    ("BARO", "QBffcfIffB", "TimeUS,I,Alt,Press,Temp,CRt,SMS,Offset,GndTemp,Health"),
    ("MODE", "QNBB", "TimeUS,Mode,ModeNum,Rsn"),
];

#[derive(Debug, Clone)]
struct TextLayout {
    /// Declared type per column; `None` for characters outside the alphabet
    column_types: Vec<Option<FieldType>>,
    names: Vec<String>,
}

impl TextLayout {
    fn new(format: &str, names: Vec<String>) -> Self {
        let column_types = format.chars().map(FieldType::from_format_char).collect();
        Self { column_types, names }
    }

    /// Interpret a token with the column's declared type
    fn parse_column(&self, index: usize, token: &str) -> FieldValue {
        match self.column_types.get(index).copied().flatten() {
            Some(field_type) if field_type.is_text() => FieldValue::Text(token.to_string()),
            Some(field_type) if field_type.is_float() => {
                FieldValue::Float(token.trim().parse::<f64>().unwrap_or(0.0))
            }
            _ => parse_numeric_token(token),
        }
    }
}

fn builtin_layouts() -> HashMap<String, TextLayout> {
    BUILTIN_LAYOUTS
        .iter()
        .map(|(name, format, columns)| {
            let names = columns.split(',').map(|s| s.to_string()).collect();
            (name.to_string(), TextLayout::new(format, names))
        })
        .collect()
}

/// Parse a token from an integer or untyped column.
///
/// Tokens with a fractional part or exponent are already engineering units
/// and become floats; plain integers stay raw. Unparseable input yields 0.
/// Columns declared `f`/`d` never come through here.
pub fn parse_numeric_token(token: &str) -> FieldValue {
    let token = token.trim();
    let looks_float = token.contains(&['.', 'e', 'E'][..]) || token.eq_ignore_ascii_case("nan");
    if !looks_float {
        if let Ok(v) = token.parse::<i64>() {
            return FieldValue::Int(v);
        }
    }
    match token.parse::<f64>() {
        Ok(v) => FieldValue::Float(v),
        Err(_) => FieldValue::Int(0),
    }
}

/// Parse an `FMT` line body: type, length, name, format, columns...
fn parse_fmt_line(values: &[&str]) -> Option<FormatMessage> {
    if values.len() < 4 {
        return None;
    }
    let type_code = values[0].parse::<u8>().ok()?;
    let byte_length = values[1].parse::<u8>().ok()?;
    let name = values[2].to_string();
    let field_format = values[3].to_string();
    let field_names: Vec<String> = values[4..]
        .iter()
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect();
    if name.is_empty() {
        return None;
    }
    Some(FormatMessage {
        type_code,
        byte_length,
        name,
        field_format,
        field_names,
    })
}

/// Decode a text log into generic messages, stopping at `max_messages`
pub fn decode_text_log(text: &str, max_messages: usize) -> DecodedLog {
    let builtin = builtin_layouts();
    let mut learned: HashMap<String, TextLayout> = HashMap::new();
    let mut log = DecodedLog::default();

    for line in text.lines() {
        if log.messages.len() >= max_messages {
            log.stats.hit_message_cap = true;
            break;
        }

        let line = line.trim();
        if line.is_empty() {
            log.stats.blank_lines += 1;
            continue;
        }

        let tokens: Vec<&str> = line.split(',').map(str::trim).collect();
        let message_type = tokens[0];
        let values = &tokens[1..];

        if message_type == "FMT" {
            match parse_fmt_line(values) {
                Some(format) => {
                    log.stats.format_records += 1;
                    let layout = TextLayout::new(&format.field_format, format.field_names);
                    learned.insert(format.name, layout);
                }
                None => log.stats.malformed_format_records += 1,
            }
            continue;
        }

        let layout = match learned.get(message_type).or_else(|| builtin.get(message_type)) {
            Some(layout) => layout,
            None => {
                log.stats.unknown_type_records += 1;
                continue;
            }
        };

        let mut message = LogMessage::new(message_type, 0.0);
        for (index, (name, token)) in layout.names.iter().zip(values.iter()).enumerate() {
            message
                .fields
                .insert(name.clone(), layout.parse_column(index, token));
        }
        message.timestamp_seconds = message_timestamp(&message);
        log.messages.push(message);
        log.stats.messages_decoded += 1;
    }

    debug!(
        "Text decode: {} messages, {} unknown lines",
        log.messages.len(),
        log.stats.unknown_type_records
    );

    log
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_tokens() {
        assert_eq!(parse_numeric_token("42"), FieldValue::Int(42));
        assert_eq!(parse_numeric_token(" -7 "), FieldValue::Int(-7));
        assert_eq!(parse_numeric_token("16.8"), FieldValue::Float(16.8));
        assert_eq!(parse_numeric_token("1e3"), FieldValue::Float(1000.0));
        assert_eq!(parse_numeric_token("abc"), FieldValue::Int(0));
        assert_eq!(parse_numeric_token(""), FieldValue::Int(0));
    }

    #[test]
    fn test_builtin_gps_layout() {
        let text =
            "GPS, 1000000, 3, 0, 0, 12, 0.8, 37.7749, -122.4194, 15.5, 2.0, 90.0, 0.1, 0, 1\n";
        let log = decode_text_log(text, 100);
        assert_eq!(log.messages.len(), 1);
        let gps = &log.messages[0];
        assert_eq!(gps.message_type, "GPS");
        assert_eq!(gps.timestamp_seconds, 1.0);
        assert_eq!(gps.get("Lat"), Some(&FieldValue::Float(37.7749)));
        assert_eq!(gps.get("NSats"), Some(&FieldValue::Int(12)));
    }

    #[test]
    fn test_unknown_types_and_blank_lines_are_ignored() {
        let text = "\nXYZ, 1, 2, 3\n\nATT, 2000000, 0, 1.5, 0, -2.0, 0, 90, 0, 0, 0\n";
        let log = decode_text_log(text, 100);
        assert_eq!(log.messages.len(), 1);
        assert_eq!(log.stats.unknown_type_records, 1);
        assert_eq!(log.stats.blank_lines, 2);
        assert_eq!(log.messages[0].number("Roll"), Some(1.5));
    }

    #[test]
    fn test_fmt_lines_define_layouts() {
        let text = "FMT, 150, 23, ESC, Qiff, TimeUS,RPM,Volt,Curr\nESC, 500000, 12000, 15.9, 4.2\n";
        let log = decode_text_log(text, 100);
        assert_eq!(log.stats.format_records, 1);
        assert_eq!(log.messages.len(), 1);
        assert_eq!(log.messages[0].number("RPM"), Some(12000.0));
        assert_eq!(log.messages[0].timestamp_seconds, 0.5);
    }

    #[test]
    fn test_latest_fmt_line_wins() {
        let text = "FMT, 147, 20, BAT, Qf, TimeUS,Volt\n\
                    BAT, 1000000, 16.2\n\
                    FMT, 147, 24, BAT, Qff, TimeUS,Curr,Volt\n\
                    BAT, 2000000, 7.5, 15.8\n";
        let log = decode_text_log(text, 100);
        assert_eq!(log.stats.format_records, 2);
        assert_eq!(log.messages[0].number("Volt"), Some(16.2));
        assert_eq!(log.messages[1].number("Curr"), Some(7.5));
        assert_eq!(log.messages[1].number("Volt"), Some(15.8));
        assert!(log.messages[1].get("Inst").is_none());
    }

    #[test]
    fn test_text_columns_keep_strings() {
        let log = decode_text_log("MODE, 3000000, Loiter, 5, 1\n", 100);
        assert_eq!(log.messages[0].text("Mode"), Some("Loiter"));
        assert_eq!(log.messages[0].number("ModeNum"), Some(5.0));
    }

    #[test]
    fn test_non_numeric_field_becomes_zero() {
        let log = decode_text_log("BAT, 1000000, 0, n/a, 16.1, 3.0, 0, 0, 0, 0\n", 100);
        assert_eq!(log.messages[0].number("Volt"), Some(0.0));
        assert_eq!(log.messages[0].number("VoltR"), Some(16.1));
    }

    #[test]
    fn test_float_columns_stay_floats_without_a_decimal_point() {
        let text = "BAT, 1000000, 0, 16, 0, 8, 0, 0, 30, 0\n\
                    CTUN, 1000000, 0, 0, 0, 0, 0, 25, 0, 0, 0, 0, 0, 0\n";
        let log = decode_text_log(text, 100);
        let bat = &log.messages[0];
        assert_eq!(bat.get("Volt"), Some(&FieldValue::Float(16.0)));
        assert_eq!(bat.get("Curr"), Some(&FieldValue::Float(8.0)));
        // 'c' column: integer-encoded centi-degrees
        assert_eq!(bat.get("Temp"), Some(&FieldValue::Int(30)));
        assert_eq!(log.messages[1].get("Alt"), Some(&FieldValue::Float(25.0)));
    }

    #[test]
    fn test_integer_column_keeps_fractional_tokens() {
        let log = decode_text_log("GPS, 1000000, 3, 0, 0, 12, 0.8, 37.7749, -122.4194\n", 100);
        assert_eq!(log.messages[0].get("Lat"), Some(&FieldValue::Float(37.7749)));
        assert_eq!(log.messages[0].get("NSats"), Some(&FieldValue::Int(12)));
    }

    #[test]
    fn test_short_lines_fill_available_columns() {
        let log = decode_text_log("GPS, 1000000, 3\n", 100);
        assert_eq!(log.messages.len(), 1);
        assert_eq!(log.messages[0].fields.len(), 2);
    }
}
