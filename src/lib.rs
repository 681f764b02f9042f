//! Flight Log Parser Library
//!
//! A Rust library for decoding UAV telemetry logs (ArduPilot DataFlash `.BIN`,
//! ArduPilot text `.LOG`/`.TLOG`, PX4 `.ULG`) into a normalized time-series
//! dataset plus flight-summary scalars.
//!
//! # Features
//!
//! - **`csv`** (default): Enable CSV export and the CSV sink
//! - **`cli`** (default): Build the command-line interface binary
//! - **`json`**: Enable JSON summary export
//! - **`serde`**: Enable serialization/deserialization of types
//!
//! # Quick Start
//!
//! Parse a log file and access the flight summary and series:
//! ```rust,no_run
//! use flightlog_parser::{parse_flight_log_file, ParseOptions};
//! use std::path::Path;
//!
//! let path = Path::new("00000042.BIN");
//! let flight = parse_flight_log_file(path, &ParseOptions::default()).unwrap();
//! println!("Flight duration: {:.1} s", flight.summary.flight_duration);
//! println!("Parameters: {:?}", flight.parameter_names());
//! ```
//!
//! Hand a parsed flight to a storage collaborator in fixed-size batches:
//! ```rust,no_run
//! use flightlog_parser::{parse_flight_log_file, persist_flight_data, MemorySink, ParseOptions};
//! use std::path::Path;
//!
//! let options = ParseOptions::default();
//! let flight = parse_flight_log_file(Path::new("00000042.BIN"), &options).unwrap();
//! let mut sink = MemorySink::new();
//! let report = persist_flight_data(&mut sink, "flight-42", &flight, options.batch_size).unwrap();
//! println!("Wrote {} points in {} batches", report.points_written, report.batches);
//! ```
//!
//! # Public API
//!
//! ## Parsing Functions
//! - [`parse_flight_log_file`] - Parse a log file, format chosen by extension
//! - [`parse_flight_log`] - Parse a log held in memory
//! - [`decode_messages`] - Decode generic messages without further processing
//! - [`process_messages`] - Extraction, projection and derivation over decoded messages
//! - [`LogFormat::detect`] - Guess the log format from leading bytes
//!
//! ## Data Types
//! - [`ParsedFlightData`] - Summary scalars plus the sorted time series
//! - [`FlightSummary`] - Duration, altitude, battery, GPS quality, modes
//! - [`TimeSeriesPoint`] - One sample of a canonical parameter
//! - [`LogMessage`] / [`FormatMessage`] - Decoder output
//! - [`DecodeStats`] / [`ProjectionStats`] - Counters for skipped records and points
//!
//! ## Parameter Reference
//! - [`map_raw_to_internal`] / [`map_internal_to_display`] - Name lookups
//! - [`get_parameter_definition`] - Category, unit, range and chart hints
//! - [`validate_parameter_set`] - Fraction of a parameter set that is known
//!
//! ## Analysis
//! - [`calculate_flight_dynamics`] - Derived speed, rates, power and distance
//! - [`analyze_trend`] / [`analyze_flight_trends`] - Trend classification
//! - [`group_by_parameter`] / [`filter_time_window`] / [`SeriesStatistics`] - Series utilities
//!
//! ## Persistence and Export
//! - [`FlightDataSink`] / [`persist_flight_data`] - Batched hand-off to storage
//! - [`export_flight_data`] - CSV time series and JSON summary files

// Module declarations
pub mod conversion;
pub mod dynamics;
pub mod error;
pub mod export;
pub mod extract;
pub mod filters;
pub mod params;
pub mod parser;
pub mod projection;
pub mod sink;
pub mod trend;
pub mod types;

// Re-export everything from modules for convenience
pub use conversion::*;
pub use dynamics::*;
pub use error::*;
pub use export::*;
pub use extract::*;
pub use filters::*;
pub use params::*;
pub use parser::*;
pub use projection::*;
pub use sink::*;
pub use trend::*;
pub use types::*;
