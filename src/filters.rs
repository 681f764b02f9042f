//! Filtering helpers applied between pipeline stages
//!
//! - the point validation gate every projected or derived point passes
//! - deterministic stride downsampling of oversized message sequences
//! - the final timestamp sort and time-window queries for consumers

use crate::types::TimeSeriesPoint;
use tracing::trace;

/// Validation gate for a candidate point.
///
/// Rejects non-finite values or timestamps and empty parameter names or units.
pub fn is_valid_point(point: &TimeSeriesPoint) -> bool {
    point.value.is_finite()
        && point.timestamp_seconds.is_finite()
        && !point.parameter.is_empty()
        && !point.unit.is_empty()
}

/// Drop points failing the gate. Returns the survivors and the drop count.
pub fn validate_points(points: Vec<TimeSeriesPoint>) -> (Vec<TimeSeriesPoint>, u64) {
    let before = points.len();
    let valid: Vec<TimeSeriesPoint> = points.into_iter().filter(is_valid_point).collect();
    let dropped = (before - valid.len()) as u64;
    if dropped > 0 {
        trace!("Validation gate dropped {} points", dropped);
    }
    (valid, dropped)
}

/// Keep every `stride`-th item so at most `cap` items remain.
///
/// The stride is `ceil(len / cap)` and always starts at index 0, so the same
/// input always yields the same output.
pub fn downsample_by_stride<T>(items: Vec<T>, cap: usize) -> Vec<T> {
    if cap == 0 || items.len() <= cap {
        return items;
    }
    let stride = (items.len() + cap - 1) / cap;
    items.into_iter().step_by(stride).collect()
}

/// Stable sort by timestamp; points sharing a timestamp keep their order
pub fn sort_points(points: &mut [TimeSeriesPoint]) {
    points.sort_by(|a, b| a.timestamp_seconds.total_cmp(&b.timestamp_seconds));
}

/// Points of one parameter within `[start, end]` seconds, inclusive
pub fn filter_time_window<'a>(
    points: &'a [TimeSeriesPoint],
    parameter: &str,
    start: f64,
    end: f64,
) -> Vec<&'a TimeSeriesPoint> {
    points
        .iter()
        .filter(|p| p.parameter == parameter)
        .filter(|p| p.timestamp_seconds >= start && p.timestamp_seconds <= end)
        .collect()
}

/// Calculate variance of a dataset
///
/// # Arguments
/// * `values` - Slice of f64 values to compute variance for
///
/// # Returns
/// The population variance, or 0 for fewer than two values
pub fn calculate_variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }

    let mean = values.iter().sum::<f64>() / values.len() as f64;
    values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / values.len() as f64
}
