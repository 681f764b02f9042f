//! Persistence hand-off for parsed flights
//!
//! A [`FlightDataSink`] stands in for whatever stores flights (a database
//! table, a file, an in-memory map). [`persist_flight_data`] runs the final
//! validation gate, sorts by timestamp and writes fixed-size batches so no
//! single write grows with the log.

use crate::error::{FlightLogError, Result};
use crate::filters::{sort_points, validate_points};
use crate::parser::{parse_flight_log, LogFormat, ParseOptions};
use crate::types::{FlightSummary, ParsedFlightData, TimeSeriesPoint};
use std::collections::HashMap;
use tracing::{debug, info};

/// Default number of points per batch
pub const DEFAULT_BATCH_SIZE: usize = 1_000;

/// Storage collaborator for parsed flights
pub trait FlightDataSink {
    /// Update the flight record's scalar summary fields
    fn update_flight_summary(&mut self, flight_id: &str, summary: &FlightSummary) -> Result<()>;

    /// Insert one batch of time-series rows for a flight
    fn insert_time_series_batch(
        &mut self,
        flight_id: &str,
        points: &[TimeSeriesPoint],
    ) -> Result<()>;
}

/// What a persist call wrote
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistReport {
    pub batches: usize,
    pub points_written: usize,
    /// Points rejected by the final validation gate
    pub points_dropped: u64,
}

/// Validate, sort and write a parsed flight in batches of `batch_size`.
///
/// The summary is written after the last batch so a stored summary implies
/// the series is complete. The first sink error aborts the whole call.
pub fn persist_flight_data<S: FlightDataSink + ?Sized>(
    sink: &mut S,
    flight_id: &str,
    data: &ParsedFlightData,
    batch_size: usize,
) -> Result<PersistReport> {
    if flight_id.is_empty() {
        return Err(FlightLogError::Sink("flight id is empty".to_string()));
    }

    let (mut points, points_dropped) = validate_points(data.time_series_data.clone());
    sort_points(&mut points);

    let batch_size = batch_size.max(1);
    let mut report = PersistReport {
        points_dropped,
        ..Default::default()
    };
    for batch in points.chunks(batch_size) {
        sink.insert_time_series_batch(flight_id, batch)?;
        report.batches += 1;
        report.points_written += batch.len();
        debug!(
            "Flight {}: wrote batch {} ({} points)",
            flight_id,
            report.batches,
            batch.len()
        );
    }
    sink.update_flight_summary(flight_id, &data.summary)?;

    info!(
        "Flight {}: persisted {} points in {} batches",
        flight_id, report.points_written, report.batches
    );
    Ok(report)
}

/// Parse a buffer and persist the result with the configured batch size.
///
/// Nothing is written when parsing fails.
pub fn ingest_flight_log<S: FlightDataSink + ?Sized>(
    sink: &mut S,
    flight_id: &str,
    data: &[u8],
    format: LogFormat,
    options: &ParseOptions,
) -> Result<(ParsedFlightData, PersistReport)> {
    let parsed = parse_flight_log(data, format, options)?;
    let report = persist_flight_data(sink, flight_id, &parsed, options.batch_size)?;
    Ok((parsed, report))
}

/// In-memory sink, keyed by flight id
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub summaries: HashMap<String, FlightSummary>,
    pub points: HashMap<String, Vec<TimeSeriesPoint>>,
    /// Size of every batch received, in arrival order
    pub batch_sizes: Vec<usize>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn points_for(&self, flight_id: &str) -> &[TimeSeriesPoint] {
        self.points.get(flight_id).map_or(&[], Vec::as_slice)
    }
}

impl FlightDataSink for MemorySink {
    fn update_flight_summary(&mut self, flight_id: &str, summary: &FlightSummary) -> Result<()> {
        self.summaries.insert(flight_id.to_string(), summary.clone());
        Ok(())
    }

    fn insert_time_series_batch(
        &mut self,
        flight_id: &str,
        points: &[TimeSeriesPoint],
    ) -> Result<()> {
        self.batch_sizes.push(points.len());
        self.points
            .entry(flight_id.to_string())
            .or_default()
            .extend_from_slice(points);
        Ok(())
    }
}
