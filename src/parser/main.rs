use crate::dynamics::calculate_flight_dynamics;
use crate::error::{FlightLogError, Result};
use crate::extract::{build_flight_summary, partition_messages};
use crate::filters::{downsample_by_stride, sort_points, validate_points};
use crate::parser::binary::{decode_binary_log, SYNC_MARKER};
use crate::parser::text::decode_text_log;
use crate::parser::ulog::{decode_ulog, is_ulog};
use crate::projection::project_parameters;
use crate::sink::DEFAULT_BATCH_SIZE;
use crate::types::*;
use std::path::Path;
use tracing::{debug, info};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Supported input log formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LogFormat {
    /// ArduPilot DataFlash binary (`.BIN`)
    ArduPilotBin,
    /// PX4 ULog (`.ULG`), decoded as an empty stub
    Px4Ulog,
    /// ArduPilot text dump (`.LOG`)
    TextLog,
    /// Text telemetry dump (`.TLOG`)
    Telemetry,
}

impl LogFormat {
    /// Case-insensitive mapping from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "bin" => Some(LogFormat::ArduPilotBin),
            "ulg" => Some(LogFormat::Px4Ulog),
            "log" => Some(LogFormat::TextLog),
            "tlog" => Some(LogFormat::Telemetry),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        Self::from_extension(ext).ok_or_else(|| {
            FlightLogError::UnsupportedFormat(if ext.is_empty() {
                "none".to_string()
            } else {
                ext.to_string()
            })
        })
    }

    /// Guess the format from the leading bytes of a buffer
    pub fn detect(data: &[u8]) -> Option<Self> {
        if data.len() >= 2 && data[..2] == SYNC_MARKER {
            return Some(LogFormat::ArduPilotBin);
        }
        if is_ulog(data) {
            return Some(LogFormat::Px4Ulog);
        }
        let head = &data[..data.len().min(512)];
        let printable = head
            .iter()
            .filter(|&&b| b == b'\n' || b == b'\r' || b == b'\t' || (0x20..0x7f).contains(&b))
            .count();
        if !head.is_empty() && head.contains(&b',') && printable == head.len() {
            return Some(LogFormat::TextLog);
        }
        None
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LogFormat::ArduPilotBin => "bin",
            LogFormat::Px4Ulog => "ulg",
            LogFormat::TextLog => "log",
            LogFormat::Telemetry => "tlog",
        }
    }
}

/// Limits applied during one parse call
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Hard cap on decoded messages
    pub max_messages: usize,
    /// Above this many messages the extractor downsamples by fixed stride
    pub max_extract_messages: usize,
    /// Rows per persistence batch
    pub batch_size: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_messages: 1_000_000,
            max_extract_messages: 100_000,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

/// Decode a buffer into generic messages without further processing
pub fn decode_messages(
    data: &[u8],
    format: LogFormat,
    options: &ParseOptions,
) -> Result<DecodedLog> {
    if data.is_empty() {
        return Err(FlightLogError::EmptyBuffer);
    }

    let decoded = match format {
        LogFormat::ArduPilotBin => decode_binary_log(data, options.max_messages),
        LogFormat::Px4Ulog => decode_ulog(data),
        LogFormat::TextLog | LogFormat::Telemetry => {
            let text = String::from_utf8_lossy(data);
            decode_text_log(&text, options.max_messages)
        }
    };
    Ok(decoded)
}

/// Parse a log held in memory into the normalized flight dataset
pub fn parse_flight_log(
    data: &[u8],
    format: LogFormat,
    options: &ParseOptions,
) -> Result<ParsedFlightData> {
    info!("Parsing {} bytes as {}", data.len(), format.as_str());
    let decoded = decode_messages(data, format, options)?;
    Ok(process_messages(decoded, options))
}

/// Parse a log file, picking the decoder from its extension
pub fn parse_flight_log_file(file_path: &Path, options: &ParseOptions) -> Result<ParsedFlightData> {
    let format = LogFormat::from_path(file_path)?;
    let file_data = std::fs::read(file_path)?;
    debug!(
        "Read {:?}: {} bytes ({:.2} MB)",
        file_path,
        file_data.len(),
        file_data.len() as f64 / 1024.0 / 1024.0
    );
    parse_flight_log(&file_data, format, options)
}

/// Run extraction, projection and derivation over decoded messages
pub fn process_messages(decoded: DecodedLog, options: &ParseOptions) -> ParsedFlightData {
    let DecodedLog {
        messages,
        stats: decode_stats,
        ..
    } = decoded;

    let total_messages = messages.len();
    let messages = downsample_by_stride(messages, options.max_extract_messages);
    let mut projection_stats = ProjectionStats {
        downsampled_messages: (total_messages - messages.len()) as u64,
        ..Default::default()
    };
    if projection_stats.downsampled_messages > 0 {
        debug!(
            "Downsampled {} messages to {}",
            total_messages,
            messages.len()
        );
    }

    let groups = partition_messages(messages);
    debug!(
        "Message groups present: {:?}",
        groups.present_groups().collect::<Vec<_>>()
    );
    let mut summary = build_flight_summary(&groups);

    let projected = project_parameters(&groups);
    projection_stats.projected_points = projected.points.len() as u64;
    projection_stats.rejected_points = projected.rejected;

    let series = group_by_parameter(&projected.points);
    let dynamics = calculate_flight_dynamics(&series);
    projection_stats.derived_points = dynamics.points.len() as u64;
    summary.total_distance = dynamics.total_distance;

    let mut points = projected.points;
    points.extend(dynamics.points);
    let (mut points, rejected) = validate_points(points);
    projection_stats.rejected_points += rejected;
    sort_points(&mut points);

    info!(
        "Parsed flight: {:.1}s, {} points, {} parameters, {} dropped records",
        summary.flight_duration,
        points.len(),
        series.len(),
        decode_stats.dropped_records()
    );

    ParsedFlightData {
        summary,
        time_series_data: points,
        decode_stats,
        projection_stats,
    }
}
