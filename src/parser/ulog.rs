//! PX4 ULog (`.ULG`) support
//!
//! Only the file magic is recognised. Message decoding is not implemented:
//! a ULog buffer decodes to an empty message set and the pipeline reports an
//! empty flight rather than inventing data.

use crate::types::DecodedLog;
use tracing::warn;

/// `ULog` followed by the 0x01 0x12 0x35 magic tail
pub const ULOG_MAGIC: [u8; 7] = [0x55, 0x4c, 0x6f, 0x67, 0x01, 0x12, 0x35];

pub fn is_ulog(data: &[u8]) -> bool {
    data.len() >= ULOG_MAGIC.len() && data[..ULOG_MAGIC.len()] == ULOG_MAGIC
}

/// Decode a ULog buffer. Always returns no messages.
pub fn decode_ulog(data: &[u8]) -> DecodedLog {
    warn!(
        "PX4 ULog decoding is not supported; {} bytes yield no messages (magic present: {})",
        data.len(),
        is_ulog(data)
    );
    DecodedLog::default()
}
