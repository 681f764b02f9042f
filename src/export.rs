//! Export of parsed flights to files
//!
//! Writes the normalized time series as CSV (`parameter,timestamp,value,unit`)
//! and the flight summary as JSON, next to the input log or into a chosen
//! output directory. Also provides [`CsvSink`], a [`FlightDataSink`] that
//! streams persisted batches into any CSV writer.

use crate::error::{FlightLogError, Result};
use crate::sink::FlightDataSink;
use crate::types::*;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[cfg(feature = "json")]
use crate::params::map_internal_to_display;
#[cfg(feature = "json")]
use serde::Serialize;

/// Export options for controlling output formats
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    pub csv: bool,
    pub json: bool,
    /// Defaults to the input file's directory
    pub output_dir: Option<String>,
}

impl ExportOptions {
    pub fn any(&self) -> bool {
        self.csv || self.json
    }
}

/// Output locations for one input log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPaths {
    pub output_dir: PathBuf,
    pub time_series_csv: PathBuf,
    pub summary_json: PathBuf,
}

/// Files written by one export call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportReport {
    pub written: Vec<PathBuf>,
}

/// Work out where the exports of `input_path` go
pub fn compute_export_paths(input_path: &Path, options: &ExportOptions) -> ExportPaths {
    let base_name = input_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("flight");

    let output_dir = match options.output_dir {
        Some(ref dir) => PathBuf::from(dir),
        None => input_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."))
            .to_path_buf(),
    };

    ExportPaths {
        time_series_csv: output_dir.join(format!("{base_name}.timeseries.csv")),
        summary_json: output_dir.join(format!("{base_name}.summary.json")),
        output_dir,
    }
}

/// Write points as `parameter,timestamp,value,unit` rows
#[cfg(feature = "csv")]
pub fn write_time_series_csv<W: std::io::Write>(
    points: &[TimeSeriesPoint],
    writer: W,
) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["parameter", "timestamp", "value", "unit"])?;
    for point in points {
        csv_writer.write_record([
            point.parameter.as_str(),
            &point.timestamp_seconds.to_string(),
            &point.value.to_string(),
            point.unit.as_str(),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Export the time series of a flight to a CSV file
#[cfg(feature = "csv")]
pub fn export_time_series_csv(points: &[TimeSeriesPoint], output_path: &Path) -> Result<()> {
    let file = std::fs::File::create(output_path)?;
    write_time_series_csv(points, std::io::BufWriter::new(file))?;
    debug!("Wrote {} rows to {:?}", points.len(), output_path);
    Ok(())
}

/// Per-parameter entry of the JSON summary
#[cfg(feature = "json")]
#[derive(Debug, Clone, Serialize)]
pub struct ParameterSummary {
    pub name: String,
    pub display_name: String,
    pub unit: String,
    #[serde(flatten)]
    pub statistics: SeriesStatistics,
}

/// Document written by [`export_summary_json`]
#[cfg(feature = "json")]
#[derive(Debug, Clone, Serialize)]
pub struct FlightReport<'a> {
    pub summary: &'a FlightSummary,
    pub parameters: Vec<ParameterSummary>,
    pub decode_stats: &'a DecodeStats,
    pub projection_stats: &'a ProjectionStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trends: Option<&'a FlightTrends>,
}

#[cfg(feature = "json")]
impl<'a> FlightReport<'a> {
    pub fn new(data: &'a ParsedFlightData, trends: Option<&'a FlightTrends>) -> Self {
        let mut units: BTreeMap<&str, &str> = BTreeMap::new();
        for point in &data.time_series_data {
            units.entry(&point.parameter).or_insert(&point.unit);
        }
        let parameters = group_by_parameter(&data.time_series_data)
            .iter()
            .filter_map(|(name, series)| {
                Some(ParameterSummary {
                    name: name.clone(),
                    display_name: map_internal_to_display(name),
                    unit: units.get(name.as_str()).copied().unwrap_or_default().to_string(),
                    statistics: SeriesStatistics::from_series(series)?,
                })
            })
            .collect();
        Self {
            summary: &data.summary,
            parameters,
            decode_stats: &data.decode_stats,
            projection_stats: &data.projection_stats,
            trends,
        }
    }
}

/// Export the flight summary, per-parameter statistics and optional trends
#[cfg(feature = "json")]
pub fn export_summary_json(
    data: &ParsedFlightData,
    trends: Option<&FlightTrends>,
    output_path: &Path,
) -> Result<()> {
    let file = std::fs::File::create(output_path)?;
    serde_json::to_writer_pretty(std::io::BufWriter::new(file), &FlightReport::new(data, trends))?;
    debug!("Wrote summary to {:?}", output_path);
    Ok(())
}

/// Write every export enabled in `options` for a parsed flight
pub fn export_flight_data(
    data: &ParsedFlightData,
    trends: Option<&FlightTrends>,
    input_path: &Path,
    options: &ExportOptions,
) -> Result<ExportReport> {
    let mut report = ExportReport::default();
    if !options.any() {
        return Ok(report);
    }

    let paths = compute_export_paths(input_path, options);
    if !paths.output_dir.exists() {
        std::fs::create_dir_all(&paths.output_dir)?;
        debug!("Created output directory: {:?}", paths.output_dir);
    }

    if options.csv {
        #[cfg(feature = "csv")]
        {
            export_time_series_csv(&data.time_series_data, &paths.time_series_csv)?;
            report.written.push(paths.time_series_csv.clone());
        }
        #[cfg(not(feature = "csv"))]
        return Err(FlightLogError::Export(
            "CSV export requires the `csv` feature".to_string(),
        ));
    }

    if options.json {
        #[cfg(feature = "json")]
        {
            export_summary_json(data, trends, &paths.summary_json)?;
            report.written.push(paths.summary_json.clone());
        }
        #[cfg(not(feature = "json"))]
        {
            let _ = trends;
            return Err(FlightLogError::Export(
                "JSON export requires the `json` feature".to_string(),
            ));
        }
    }

    for path in &report.written {
        info!("Exported {}", path.display());
    }
    Ok(report)
}

/// Sink streaming persisted batches into a CSV writer.
///
/// Rows are `flight_id,parameter,timestamp,value,unit`; summaries are kept in
/// memory and available after the write.
#[cfg(feature = "csv")]
pub struct CsvSink<W: std::io::Write> {
    writer: csv::Writer<W>,
    header_written: bool,
    summaries: BTreeMap<String, FlightSummary>,
}

#[cfg(feature = "csv")]
impl<W: std::io::Write> CsvSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(writer),
            header_written: false,
            summaries: BTreeMap::new(),
        }
    }

    pub fn summary(&self, flight_id: &str) -> Option<&FlightSummary> {
        self.summaries.get(flight_id)
    }

    /// Flush and return the underlying writer
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| FlightLogError::Export(e.error().to_string()))
    }
}

#[cfg(feature = "csv")]
impl<W: std::io::Write> FlightDataSink for CsvSink<W> {
    fn update_flight_summary(&mut self, flight_id: &str, summary: &FlightSummary) -> Result<()> {
        self.writer.flush()?;
        self.summaries.insert(flight_id.to_string(), summary.clone());
        Ok(())
    }

    fn insert_time_series_batch(
        &mut self,
        flight_id: &str,
        points: &[TimeSeriesPoint],
    ) -> Result<()> {
        if !self.header_written {
            self.writer
                .write_record(["flight_id", "parameter", "timestamp", "value", "unit"])?;
            self.header_written = true;
        }
        for point in points {
            self.writer.write_record([
                flight_id,
                point.parameter.as_str(),
                &point.timestamp_seconds.to_string(),
                &point.value.to_string(),
                point.unit.as_str(),
            ])?;
        }
        Ok(())
    }
}
