use crate::filters::calculate_variance;
use crate::types::DecodeStats;
use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One sample of a canonical parameter
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimeSeriesPoint {
    /// Canonical internal parameter name
    pub parameter: String,
    pub timestamp_seconds: f64,
    pub value: f64,
    pub unit: String,
}

impl TimeSeriesPoint {
    pub fn new(
        parameter: impl Into<String>,
        timestamp_seconds: f64,
        value: f64,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            parameter: parameter.into(),
            timestamp_seconds,
            value,
            unit: unit.into(),
        }
    }
}

/// Flight mode entry
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FlightMode {
    pub mode: String,
    pub timestamp: f64,
    /// Placeholder; mode durations are not refined from the log
    pub duration: f64,
}

/// Flight-level scalar aggregates
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FlightSummary {
    /// Seconds between first and last timestamped message
    pub flight_duration: f64,
    /// Meters
    pub max_altitude: f64,
    /// Meters along the GPS track
    pub total_distance: f64,
    pub battery_start_voltage: f64,
    pub battery_end_voltage: f64,
    /// 0..=100
    pub gps_quality: f64,
    pub flight_modes: Vec<FlightMode>,
    /// Autopilot firmware version if a version banner was logged
    pub firmware_version: Option<String>,
}

/// Counters of the projection and derivation stages
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProjectionStats {
    pub projected_points: u64,
    pub derived_points: u64,
    /// Candidates rejected by the validation gate
    pub rejected_points: u64,
    /// Messages dropped by stride downsampling before extraction
    pub downsampled_messages: u64,
}

/// Complete result of one parse call
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParsedFlightData {
    pub summary: FlightSummary,
    /// Validated points sorted by timestamp
    pub time_series_data: Vec<TimeSeriesPoint>,
    pub decode_stats: DecodeStats,
    pub projection_stats: ProjectionStats,
}

impl ParsedFlightData {
    /// Distinct parameter names present in the time series
    pub fn parameter_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .time_series_data
            .iter()
            .map(|p| p.parameter.as_str())
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    pub fn series(&self, parameter: &str) -> Vec<(f64, f64)> {
        self.time_series_data
            .iter()
            .filter(|p| p.parameter == parameter)
            .map(|p| (p.timestamp_seconds, p.value))
            .collect()
    }

    pub fn has_gps_data(&self) -> bool {
        self.time_series_data.iter().any(|p| p.parameter == "gps_lat")
    }
}

/// `(timestamp, value)` series keyed by canonical parameter name
pub type SeriesMap = BTreeMap<String, Vec<(f64, f64)>>;

/// Group points by parameter, each series ordered by timestamp.
///
/// The sort is stable, so points sharing a timestamp keep their input order.
pub fn group_by_parameter(points: &[TimeSeriesPoint]) -> SeriesMap {
    let mut map = SeriesMap::new();
    for point in points {
        map.entry(point.parameter.clone())
            .or_default()
            .push((point.timestamp_seconds, point.value));
    }
    for series in map.values_mut() {
        series.sort_by(|a, b| a.0.total_cmp(&b.0));
    }
    map
}

/// Summary statistics for one parameter series
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SeriesStatistics {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl SeriesStatistics {
    /// Statistics over the values of a series; `None` when empty
    pub fn from_series(series: &[(f64, f64)]) -> Option<Self> {
        if series.is_empty() {
            return None;
        }
        let values: Vec<f64> = series.iter().map(|(_, v)| *v).collect();
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        Some(Self {
            count: values.len(),
            min,
            max,
            mean,
            std_dev: calculate_variance(&values).sqrt(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_by_parameter_sorts_each_series() {
        let points = vec![
            TimeSeriesPoint::new("roll", 2.0, 3.0, "deg"),
            TimeSeriesPoint::new("pitch", 1.0, 1.0, "deg"),
            TimeSeriesPoint::new("roll", 1.0, 2.0, "deg"),
        ];
        let grouped = group_by_parameter(&points);
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped["roll"], vec![(1.0, 2.0), (2.0, 3.0)]);
    }

    #[test]
    fn test_series_statistics() {
        let stats = SeriesStatistics::from_series(&[(0.0, 2.0), (1.0, 4.0), (2.0, 6.0)]).unwrap();
        assert_eq!(stats.count, 3);
        assert_eq!(stats.min, 2.0);
        assert_eq!(stats.max, 6.0);
        assert!((stats.mean - 4.0).abs() < 1e-12);
        assert!(stats.std_dev > 1.6 && stats.std_dev < 1.7);
        assert!(SeriesStatistics::from_series(&[]).is_none());
    }

    #[test]
    fn test_parameter_names_are_distinct() {
        let data = ParsedFlightData {
            time_series_data: vec![
                TimeSeriesPoint::new("yaw", 0.0, 1.0, "deg"),
                TimeSeriesPoint::new("roll", 0.0, 1.0, "deg"),
                TimeSeriesPoint::new("yaw", 1.0, 2.0, "deg"),
            ],
            ..Default::default()
        };
        assert_eq!(data.parameter_names(), vec!["roll", "yaw"]);
        assert_eq!(data.series("yaw"), vec![(0.0, 1.0), (1.0, 2.0)]);
        assert!(!data.has_gps_data());
    }
}
