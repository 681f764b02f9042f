//! CLI binary for Flight Log Parser
//!
//! This provides the command-line interface for the flight log parser library.

use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use flightlog_parser::{
    analyze_flight_trends, export_flight_data, group_by_parameter, parse_flight_log_file,
    ExportOptions, FlightTrends, LogFormat, ParseOptions, ParsedFlightData, SeriesStatistics,
    TrendAnalysisResult,
};
use glob::glob;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

fn build_command() -> Command {
    Command::new("Flight Log Parser")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Decode ArduPilot/PX4 flight logs into normalized time series and flight summaries.")
        .arg(
            Arg::new("files")
                .help(
                    "Log files to parse (.BIN, .ULG, .LOG, .TLOG extensions supported, \
                     case-insensitive, supports globbing)",
                )
                .required(false)
                .num_args(1..)
                .index(1),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .help("Enable debug output and detailed parsing information")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("csv")
                .long("csv")
                .help("Export the normalized time series to <name>.timeseries.csv")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help(
                    "Export the flight summary and per-parameter statistics \
                     to <name>.summary.json",
                )
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("trends")
                .long("trends")
                .help("Print altitude, battery and GPS trend analysis")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("output-dir")
                .long("output-dir")
                .help("Directory for output files (default: same as input file)")
                .value_name("DIR"),
        )
        .arg(
            Arg::new("max-messages")
                .long("max-messages")
                .help("Hard cap on decoded messages per file")
                .value_name("N")
                .value_parser(clap::value_parser!(usize)),
        )
}

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(debug)
        .init();
}

/// Expand glob patterns and keep files with a supported extension
fn collect_input_files(file_patterns: &[&String]) -> Vec<PathBuf> {
    let mut valid_paths = Vec::new();
    for pattern in file_patterns {
        let paths: Vec<PathBuf> = if pattern.contains('*') || pattern.contains('?') {
            match glob(pattern) {
                Ok(glob_iter) => {
                    let collected = glob_iter.collect::<std::result::Result<Vec<_>, _>>();
                    match collected {
                        Ok(paths) => {
                            debug!("Glob pattern '{pattern}' matched {} files", paths.len());
                            paths
                        }
                        Err(e) => {
                            eprintln!("Error expanding glob pattern '{pattern}': {e}");
                            continue;
                        }
                    }
                }
                Err(e) => {
                    eprintln!("Invalid glob pattern '{pattern}': {e}");
                    continue;
                }
            }
        } else {
            vec![PathBuf::from(pattern.as_str())]
        };

        for path in paths {
            if !path.is_file() {
                eprintln!("Warning: File does not exist: {path:?}");
                continue;
            }
            if let Err(e) = LogFormat::from_path(&path) {
                eprintln!("Warning: Skipping {path:?}: {e}");
                continue;
            }
            debug!("Added valid file: {path:?}");
            valid_paths.push(path);
        }
    }
    valid_paths
}

fn format_trend(result: &TrendAnalysisResult) -> String {
    let mut text = format!("{} ({}%)", result.trend, result.confidence);
    if result.anomalous {
        text.push_str(" [anomalous]");
    }
    text
}

fn display_flight(flight: &ParsedFlightData) {
    let summary = &flight.summary;
    println!("  Duration:        {:.1} s", summary.flight_duration);
    println!("  Max altitude:    {:.1} m", summary.max_altitude);
    println!("  Distance:        {:.1} m", summary.total_distance);
    println!(
        "  Battery:         {:.2} V -> {:.2} V",
        summary.battery_start_voltage, summary.battery_end_voltage
    );
    println!("  GPS quality:     {:.0}/100", summary.gps_quality);
    if let Some(ref version) = summary.firmware_version {
        println!("  Firmware:        {version}");
    }
    let modes: Vec<&str> = summary.flight_modes.iter().map(|m| m.mode.as_str()).collect();
    if !modes.is_empty() {
        println!("  Flight modes:    {}", modes.join(", "));
    }

    let stats = &flight.decode_stats;
    println!(
        "  Messages:        {} decoded, {} records skipped{}",
        stats.messages_decoded,
        stats.dropped_records(),
        if stats.hit_message_cap { " (message cap reached)" } else { "" }
    );
    println!(
        "  Time series:     {} points across {} parameters",
        flight.time_series_data.len(),
        flight.parameter_names().len()
    );
}

fn display_parameter_statistics(flight: &ParsedFlightData) {
    for (name, series) in group_by_parameter(&flight.time_series_data) {
        if let Some(stats) = SeriesStatistics::from_series(&series) {
            debug!(
                "{name}: n={} min={:.3} max={:.3} mean={:.3} sd={:.3}",
                stats.count, stats.min, stats.max, stats.mean, stats.std_dev
            );
        }
    }
}

fn display_trends(trends: &FlightTrends) {
    println!("  Trends:");
    println!("    Altitude:      {}", format_trend(&trends.altitude));
    println!("    Battery:       {}", format_trend(&trends.battery));
    println!("    GPS:           {}", format_trend(&trends.gps));
}

fn process_file(
    path: &Path,
    parse_options: &ParseOptions,
    export_options: &ExportOptions,
    matches: &ArgMatches,
) -> Result<()> {
    let flight = parse_flight_log_file(path, parse_options)
        .with_context(|| format!("Failed to parse {path:?}"))?;

    display_flight(&flight);
    display_parameter_statistics(&flight);

    let trends = if matches.get_flag("trends") || export_options.json {
        let series = group_by_parameter(&flight.time_series_data);
        Some(analyze_flight_trends(&flight.summary, &series))
    } else {
        None
    };
    if matches.get_flag("trends") {
        if let Some(ref trends) = trends {
            display_trends(trends);
        }
    }

    let report = export_flight_data(&flight, trends.as_ref(), path, export_options)
        .with_context(|| format!("Failed to export {path:?}"))?;
    for written in &report.written {
        println!("  Exported:        {}", written.display());
    }
    Ok(())
}

fn main() -> Result<()> {
    let matches = build_command().get_matches();

    let debug = matches.get_flag("debug");
    init_logging(debug);
    debug!(
        "flightlog-parser {} (git {})",
        env!("CARGO_PKG_VERSION"),
        option_env!("VERGEN_GIT_SHA").unwrap_or("unknown")
    );

    // Check if no files were provided and show help
    let file_patterns: Vec<&String> = match matches.get_many::<String>("files") {
        Some(files) => files.collect(),
        None => {
            build_command().print_help()?;
            println!();
            return Ok(());
        }
    };

    let mut parse_options = ParseOptions::default();
    if let Some(max) = matches.get_one::<usize>("max-messages") {
        parse_options.max_messages = *max;
    }
    let export_options = ExportOptions {
        csv: matches.get_flag("csv"),
        json: matches.get_flag("json"),
        output_dir: matches.get_one::<String>("output-dir").cloned(),
    };

    let valid_paths = collect_input_files(&file_patterns);
    if valid_paths.is_empty() {
        eprintln!("Error: No valid files found to process.");
        eprintln!("Supported extensions: .BIN, .ULG, .LOG, .TLOG (case-insensitive)");
        eprintln!("Input patterns were: {file_patterns:?}");
        std::process::exit(1);
    }

    let mut processed_files = 0;
    for (index, path) in valid_paths.iter().enumerate() {
        if index > 0 {
            println!();
        }
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown");
        println!("Processing: {filename}");

        match process_file(path, &parse_options, &export_options, &matches) {
            Ok(()) => processed_files += 1,
            Err(e) => {
                eprintln!("Error processing {filename}: {e:#}");
                warn!("Continuing with next file...");
            }
        }
    }

    if processed_files == 0 {
        eprintln!(
            "Error: No files were successfully processed out of {} files found.",
            valid_paths.len()
        );
        eprintln!("Use --debug flag for more detailed error information.");
        std::process::exit(1);
    }

    Ok(())
}
