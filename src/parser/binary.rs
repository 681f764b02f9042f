//! Decoder for self-describing binary DataFlash logs (`.BIN`)
//!
//! Single forward scan: every record starts with the sync marker and a type
//! code. FMT records register layouts; any other record is decoded with the
//! layout registered for its type code, or stepped over one byte at a time
//! until the scanner resynchronizes.

use crate::parser::format::{
    parse_format_body, FormatRegistry, MessageLayout, FMT_RECORD_LENGTH, FMT_TYPE_CODE,
    RECORD_HEADER_LENGTH,
};
use crate::parser::stream::LogDataStream;
use crate::types::{DecodedLog, LogMessage};
use tracing::{debug, warn};

/// Two-byte record sync marker
pub const SYNC_MARKER: [u8; 2] = [0xA3, 0x95];

/// Decode a binary log buffer into generic messages.
///
/// Never fails: malformed, truncated and unknown records are counted in the
/// returned stats. Decoding stops once `max_messages` messages were produced.
pub fn decode_binary_log(data: &[u8], max_messages: usize) -> DecodedLog {
    let mut registry = FormatRegistry::new();
    let mut log = DecodedLog::default();
    let mut pos = 0usize;

    while pos + RECORD_HEADER_LENGTH <= data.len() {
        if log.messages.len() >= max_messages {
            log.stats.hit_message_cap = true;
            warn!("Message cap of {} reached, stopping decode at byte {}", max_messages, pos);
            break;
        }

        if data[pos] != SYNC_MARKER[0] || data[pos + 1] != SYNC_MARKER[1] {
            pos += 1;
            log.stats.skipped_bytes += 1;
            continue;
        }

        let type_code = data[pos + 2];

        if type_code == FMT_TYPE_CODE {
            if pos + FMT_RECORD_LENGTH > data.len() {
                log.stats.truncated_records += 1;
                break;
            }
            match parse_format_body(&data[pos + RECORD_HEADER_LENGTH..pos + FMT_RECORD_LENGTH]) {
                Some(format) => {
                    log.stats.format_records += 1;
                    registry.register(format);
                }
                None => log.stats.malformed_format_records += 1,
            }
            pos += FMT_RECORD_LENGTH;
            continue;
        }

        let layout = match registry.get(type_code) {
            Some(layout) => layout,
            None => {
                log.stats.unknown_type_records += 1;
                pos += 1;
                continue;
            }
        };

        let record_length = layout.record_length();
        if pos + record_length > data.len() {
            log.stats.truncated_records += 1;
            pos += 1;
            continue;
        }

        if !layout.decodable {
            log.stats.undecodable_records += 1;
            pos += record_length;
            continue;
        }

        match decode_record(layout, &data[pos + RECORD_HEADER_LENGTH..pos + record_length]) {
            Some(message) => {
                log.messages.push(message);
                log.stats.messages_decoded += 1;
            }
            None => log.stats.truncated_records += 1,
        }
        pos += record_length;
    }

    debug!(
        "Binary decode: {} messages, {} formats, {} dropped records, {} skipped bytes",
        log.messages.len(),
        registry.len(),
        log.stats.dropped_records(),
        log.stats.skipped_bytes
    );

    log
}

/// Interpret one record payload with its layout
pub fn decode_record(layout: &MessageLayout, payload: &[u8]) -> Option<LogMessage> {
    let mut stream = LogDataStream::new(payload);
    let mut message = LogMessage::new(layout.format.name.clone(), 0.0);

    for field in &layout.fields {
        if let Some(value) = field.field_type.read(&mut stream).ok()? {
            message.fields.insert(field.name.clone(), value);
        }
    }

    message.timestamp_seconds = message_timestamp(&message);
    Some(message)
}

/// Seconds from the record's time field (`TimeUS`, else `TimeMS`), or 0
pub fn message_timestamp(message: &LogMessage) -> f64 {
    if let Some(us) = message.number("TimeUS") {
        us / 1_000_000.0
    } else if let Some(ms) = message.number("TimeMS") {
        ms / 1_000.0
    } else {
        0.0
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Byte-level builders for synthetic binary logs

    use super::*;

    pub fn fmt_record(
        type_code: u8,
        length: u8,
        name: &str,
        format: &str,
        columns: &str,
    ) -> Vec<u8> {
        let mut record = vec![SYNC_MARKER[0], SYNC_MARKER[1], FMT_TYPE_CODE, type_code, length];
        let mut put = |text: &str, width: usize| {
            let mut field = text.as_bytes().to_vec();
            field.resize(width, 0);
            record.extend_from_slice(&field);
        };
        put(name, 4);
        put(format, 16);
        put(columns, 64);
        record
    }

    pub fn data_record(type_code: u8, payload: &[u8]) -> Vec<u8> {
        let mut record = vec![SYNC_MARKER[0], SYNC_MARKER[1], type_code];
        record.extend_from_slice(payload);
        record
    }
}
