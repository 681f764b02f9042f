//! Trend classification of parameter series
//!
//! The generic analyzer fits an ordinary-least-squares line and a Pearson
//! correlation against the sample index (not wall-clock time). Battery,
//! altitude and GPS get domain-specific adjustments on top of it. Missing or
//! short series always degrade to `stable` with confidence 0.

use crate::types::{FlightSummary, FlightTrends, SeriesMap, Trend, TrendAnalysisResult};
use tracing::debug;

/// Fewer samples than this cannot trend
pub const MIN_TREND_SAMPLES: usize = 3;

/// Relative change below which a weakly correlated series is stable
const STABLE_RELATIVE_CHANGE: f64 = 0.05;
const STABLE_CORRELATION: f64 = 0.5;

/// Relative voltage change below which the battery is stable
const BATTERY_STABLE_CHANGE: f64 = 0.02;

/// Takeoff ends and landing starts at these fractions of the flight
const TAKEOFF_END: f64 = 0.3;
const LANDING_START: f64 = 0.7;

const ALTITUDE_PHASE_BOOST: f64 = 1.2;
const ALTITUDE_STABLE_FLOOR: u8 = 60;
const GPS_DEGRADING_BOOST: f64 = 1.3;

/// Series consulted for the altitude trend, in order of preference
const ALTITUDE_SERIES: &[&str] = &["altitude", "gps_alt", "baro_alt"];
const GPS_SERIES: &str = "gps_satellites";

fn boost(confidence: u8, factor: f64) -> u8 {
    (confidence as f64 * factor).round().min(100.0) as u8
}

/// Generic trend of a `(timestamp, value)` series
pub fn analyze_trend(series: &[(f64, f64)]) -> TrendAnalysisResult {
    let n = series.len();
    if n < MIN_TREND_SAMPLES {
        return TrendAnalysisResult::no_data();
    }

    let mean_x = (n - 1) as f64 / 2.0;
    let mean_y = series.iter().map(|s| s.1).sum::<f64>() / n as f64;
    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (i, &(_, y)) in series.iter().enumerate() {
        let dx = i as f64 - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    let slope = cov / var_x;
    let correlation = if var_y > 0.0 {
        (cov / (var_x * var_y).sqrt()).clamp(-1.0, 1.0)
    } else {
        0.0
    };

    let first = series[0].1;
    let last = series[n - 1].1;
    let relative_change = if first == 0.0 {
        if last == 0.0 {
            0.0
        } else {
            1.0
        }
    } else {
        (last - first).abs() / first.abs()
    };

    let stable =
        relative_change < STABLE_RELATIVE_CHANGE && correlation.abs() < STABLE_CORRELATION;
    let trend = if stable {
        Trend::Stable
    } else if slope > 0.0 {
        Trend::Up
    } else {
        Trend::Down
    };

    let confidence = (correlation.abs() * 100.0).round().min(100.0) as u8;
    TrendAnalysisResult {
        trend,
        confidence,
        slope,
        correlation,
        anomalous: false,
    }
}

/// Battery trend from the start and end voltage of a flight.
///
/// A rising voltage is reported as `up` and flagged anomalous.
pub fn analyze_battery_trend(
    start_voltage: f64,
    end_voltage: f64,
    duration: f64,
) -> TrendAnalysisResult {
    if !(start_voltage.is_finite() && end_voltage.is_finite()) || start_voltage <= 0.0 {
        return TrendAnalysisResult::no_data();
    }

    let delta = end_voltage - start_voltage;
    let relative_change = delta.abs() / start_voltage;
    let slope = if duration > 0.0 { delta / duration } else { 0.0 };

    if relative_change < BATTERY_STABLE_CHANGE {
        let confidence =
            (50.0 + 50.0 * (1.0 - relative_change / BATTERY_STABLE_CHANGE)).round() as u8;
        return TrendAnalysisResult {
            trend: Trend::Stable,
            confidence,
            slope,
            correlation: 0.0,
            anomalous: false,
        };
    }

    let confidence = (relative_change * 500.0).clamp(50.0, 100.0).round() as u8;
    if delta < 0.0 {
        TrendAnalysisResult {
            trend: Trend::Down,
            confidence,
            slope,
            correlation: -1.0,
            anomalous: false,
        }
    } else {
        debug!(
            "Battery voltage rose from {:.2}V to {:.2}V",
            start_voltage, end_voltage
        );
        TrendAnalysisResult {
            trend: Trend::Up,
            confidence,
            slope,
            correlation: 1.0,
            anomalous: true,
        }
    }
}

/// Flight phase by share of the flight's duration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightPhase {
    Takeoff,
    Cruise,
    Landing,
}

impl FlightPhase {
    /// Direction the altitude should move in this phase
    pub fn expected_trend(self) -> Trend {
        match self {
            FlightPhase::Takeoff => Trend::Up,
            FlightPhase::Cruise => Trend::Stable,
            FlightPhase::Landing => Trend::Down,
        }
    }
}

/// Split a series into takeoff (first 30%), cruise and landing (last 30%)
pub fn split_flight_phases(series: &[(f64, f64)]) -> [(FlightPhase, Vec<(f64, f64)>); 3] {
    let mut phases = [
        (FlightPhase::Takeoff, Vec::new()),
        (FlightPhase::Cruise, Vec::new()),
        (FlightPhase::Landing, Vec::new()),
    ];
    let (Some(first), Some(last)) = (series.first(), series.last()) else {
        return phases;
    };
    let start = first.0;
    let duration = last.0 - start;
    for &sample in series {
        let fraction = if duration > 0.0 {
            (sample.0 - start) / duration
        } else {
            0.0
        };
        let slot = if fraction < TAKEOFF_END {
            0
        } else if fraction < LANDING_START {
            1
        } else {
            2
        };
        phases[slot].1.push(sample);
    }
    phases
}

/// Altitude trend judged on the best-sampled flight phase.
///
/// Confidence is boosted when the observed trend matches the phase's
/// expected direction; a stable result is floored at 60.
pub fn analyze_altitude_trend(series: &[(f64, f64)]) -> TrendAnalysisResult {
    if series.len() < MIN_TREND_SAMPLES {
        return analyze_trend(series);
    }

    let phases = split_flight_phases(series);
    // Ties go to the earlier phase
    let mut best = &phases[0];
    for candidate in &phases[1..] {
        if candidate.1.len() > best.1.len() {
            best = candidate;
        }
    }
    let (phase, samples) = best;
    if samples.len() < MIN_TREND_SAMPLES {
        return TrendAnalysisResult::no_data();
    }

    let mut result = analyze_trend(samples);
    if result.trend == phase.expected_trend() {
        result.confidence = boost(result.confidence, ALTITUDE_PHASE_BOOST);
    }
    if result.trend == Trend::Stable {
        result.confidence = result.confidence.max(ALTITUDE_STABLE_FLOOR);
    }
    debug!(
        "Altitude trend {} ({}%) from {:?} phase, {} samples",
        result.trend,
        result.confidence,
        phase,
        samples.len()
    );
    result
}

/// GPS trend with extra confidence on degradation
pub fn analyze_gps_trend(series: &[(f64, f64)]) -> TrendAnalysisResult {
    let mut result = analyze_trend(series);
    if result.trend == Trend::Down {
        result.confidence = boost(result.confidence, GPS_DEGRADING_BOOST);
    }
    result
}

/// One trend per dashboard metric for a flight.
///
/// Duration, distance and file size are single scalars per flight and are
/// always reported stable with full confidence.
pub fn analyze_flight_trends(summary: &FlightSummary, series: &SeriesMap) -> FlightTrends {
    let altitude = ALTITUDE_SERIES
        .iter()
        .filter_map(|name| series.get(*name))
        .find(|s| !s.is_empty())
        .map_or_else(TrendAnalysisResult::no_data, |s| analyze_altitude_trend(s));

    let gps = series
        .get(GPS_SERIES)
        .map_or_else(TrendAnalysisResult::no_data, |s| analyze_gps_trend(s));

    FlightTrends {
        altitude,
        battery: analyze_battery_trend(
            summary.battery_start_voltage,
            summary.battery_end_voltage,
            summary.flight_duration,
        ),
        gps,
        duration: TrendAnalysisResult::static_scalar(),
        distance: TrendAnalysisResult::static_scalar(),
        file_size: TrendAnalysisResult::static_scalar(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(values: &[f64]) -> Vec<(f64, f64)> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| (i as f64 * 5.0, *v))
            .collect()
    }

    #[test]
    fn test_rising_series_is_up() {
        let result = analyze_trend(&series(&[10.0, 15.0, 20.0, 25.0]));
        assert_eq!(result.trend, Trend::Up);
        assert!(result.confidence > 80);
        assert!(result.correlation > 0.8);
        assert!((result.slope - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_noisy_flat_series_is_stable() {
        let result = analyze_trend(&series(&[20.0, 21.0, 19.0, 20.5]));
        assert_eq!(result.trend, Trend::Stable);
    }

    #[test]
    fn test_short_series_has_no_confidence() {
        for values in [&[][..], &[1.0][..], &[1.0, 2.0][..]] {
            let result = analyze_trend(&series(values));
            assert_eq!(result.trend, Trend::Stable);
            assert_eq!(result.confidence, 0);
        }
    }

    #[test]
    fn test_constant_series_has_zero_correlation() {
        let result = analyze_trend(&series(&[5.0, 5.0, 5.0, 5.0]));
        assert_eq!(result.trend, Trend::Stable);
        assert_eq!(result.correlation, 0.0);
        assert_eq!(result.confidence, 0);
    }

    #[test]
    fn test_series_starting_at_zero() {
        let result = analyze_trend(&series(&[0.0, 1.0, 2.0]));
        assert_eq!(result.trend, Trend::Up);
        let result = analyze_trend(&series(&[0.0, 0.0, 0.0]));
        assert_eq!(result.trend, Trend::Stable);
    }

    #[test]
    fn test_battery_discharge_is_down() {
        let result = analyze_battery_trend(16.8, 14.2, 600.0);
        assert_eq!(result.trend, Trend::Down);
        assert!(!result.anomalous);
        assert!(result.confidence >= 50);
        assert!(result.slope < 0.0);
    }

    #[test]
    fn test_battery_rise_is_up_and_anomalous() {
        let result = analyze_battery_trend(14.2, 16.8, 600.0);
        assert_eq!(result.trend, Trend::Up);
        assert!(result.anomalous);
        assert!(result.confidence >= 50);
    }

    #[test]
    fn test_battery_small_change_is_stable() {
        let result = analyze_battery_trend(16.8, 16.8, 600.0);
        assert_eq!(result.trend, Trend::Stable);
        assert_eq!(result.confidence, 100);
        assert_eq!(analyze_battery_trend(0.0, 0.0, 0.0), TrendAnalysisResult::no_data());
    }

    #[test]
    fn test_altitude_uses_best_sampled_phase() {
        // Dense sampling in the middle of the flight, level at 50 m
        let mut samples = vec![(0.0, 0.0), (10.0, 30.0)];
        samples.extend((0..10).map(|i| (40.0 + i as f64, 50.0)));
        samples.extend([(90.0, 20.0), (100.0, 0.0)]);
        let result = analyze_altitude_trend(&samples);
        assert_eq!(result.trend, Trend::Stable);
        assert_eq!(result.confidence, 60);
    }

    #[test]
    fn test_altitude_climb_during_takeoff_is_boosted() {
        let mut samples: Vec<(f64, f64)> = (0..10).map(|i| (i as f64, i as f64 * 3.0)).collect();
        samples.push((100.0, 30.0));
        let result = analyze_altitude_trend(&samples);
        assert_eq!(result.trend, Trend::Up);
        assert_eq!(result.confidence, 100);
    }

    #[test]
    fn test_gps_degradation_is_boosted() {
        let result = analyze_gps_trend(&series(&[14.0, 13.0, 13.0, 11.0, 10.0, 10.5]));
        assert_eq!(result.trend, Trend::Down);
        let plain = analyze_trend(&series(&[14.0, 13.0, 13.0, 11.0, 10.0, 10.5]));
        assert!(result.confidence >= plain.confidence);
        assert_eq!(
            result.confidence,
            ((plain.confidence as f64) * 1.3).round().min(100.0) as u8
        );
    }

    #[test]
    fn test_flight_trends_degrade_without_series() {
        let trends = analyze_flight_trends(&FlightSummary::default(), &SeriesMap::new());
        assert_eq!(trends.altitude, TrendAnalysisResult::no_data());
        assert_eq!(trends.battery, TrendAnalysisResult::no_data());
        assert_eq!(trends.gps, TrendAnalysisResult::no_data());
        assert_eq!(trends.duration.confidence, 100);
        assert_eq!(trends.distance.trend, Trend::Stable);
        assert_eq!(trends.file_size, TrendAnalysisResult::static_scalar());
    }

    #[test]
    fn test_flight_trends_from_series() {
        let summary = FlightSummary {
            battery_start_voltage: 16.8,
            battery_end_voltage: 14.2,
            flight_duration: 600.0,
            ..Default::default()
        };
        let mut map = SeriesMap::new();
        map.insert("gps_satellites".into(), series(&[12.0, 12.0, 12.0, 12.0]));
        let trends = analyze_flight_trends(&summary, &map);
        assert_eq!(trends.battery.trend, Trend::Down);
        assert_eq!(trends.gps.trend, Trend::Stable);
    }
}
