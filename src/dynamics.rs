//! Derived flight-dynamics parameters
//!
//! Computes series that are not logged verbatim from the projected,
//! per-parameter series: ground speed, climb/descent rate, turn rate,
//! electrical power, a voltage-based battery estimate and the total GPS
//! track length. Pairs with zero or negative elapsed time are skipped, and a
//! single-sample series derives nothing.

use crate::conversion::{haversine_distance, wrap_angle_degrees};
use crate::types::{SeriesMap, TimeSeriesPoint};
use tracing::debug;

/// Altitude series used for vertical rates, in order of preference
const ALTITUDE_SERIES: &[&str] = &["altitude", "gps_alt", "baro_alt"];

/// Voltage and current samples further apart than this are not paired
const POWER_PAIRING_WINDOW_S: f64 = 1.0;

/// Output of the dynamics stage
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlightDynamics {
    /// Derived points, not yet validated or sorted
    pub points: Vec<TimeSeriesPoint>,
    /// Meters along the full GPS track
    pub total_distance: f64,
}

fn series<'a>(map: &'a SeriesMap, name: &str) -> &'a [(f64, f64)] {
    map.get(name).map_or(&[], Vec::as_slice)
}

/// Join latitude and longitude samples sharing a timestamp: `(t, lat, lng)`
fn gps_positions(lat: &[(f64, f64)], lng: &[(f64, f64)]) -> Vec<(f64, f64, f64)> {
    let mut positions = Vec::with_capacity(lat.len().min(lng.len()));
    let (mut i, mut j) = (0, 0);
    while i < lat.len() && j < lng.len() {
        let (t_lat, t_lng) = (lat[i].0, lng[j].0);
        if t_lat < t_lng {
            i += 1;
        } else if t_lng < t_lat {
            j += 1;
        } else {
            positions.push((t_lat, lat[i].1, lng[j].1));
            i += 1;
            j += 1;
        }
    }
    positions
}

fn ground_speed(positions: &[(f64, f64, f64)], out: &mut Vec<TimeSeriesPoint>) -> f64 {
    let mut total_distance = 0.0;
    for pair in positions.windows(2) {
        let (t1, lat1, lng1) = pair[0];
        let (t2, lat2, lng2) = pair[1];
        let distance = haversine_distance(lat1, lng1, lat2, lng2);
        total_distance += distance;

        let dt = t2 - t1;
        if dt > 0.0 {
            out.push(TimeSeriesPoint::new("ground_speed", t2, distance / dt, "m/s"));
        }
    }
    total_distance
}

fn vertical_rates(altitude: &[(f64, f64)], out: &mut Vec<TimeSeriesPoint>) {
    for pair in altitude.windows(2) {
        let ((t1, a1), (t2, a2)) = (pair[0], pair[1]);
        let dt = t2 - t1;
        if dt <= 0.0 {
            continue;
        }
        let rate = (a2 - a1) / dt;
        if rate >= 0.0 {
            out.push(TimeSeriesPoint::new("climb_rate", t2, rate, "m/s"));
        } else {
            out.push(TimeSeriesPoint::new("descent_rate", t2, -rate, "m/s"));
        }
        out.push(TimeSeriesPoint::new("vertical_speed", t2, rate, "m/s"));
    }
}

fn turn_rates(yaw: &[(f64, f64)], out: &mut Vec<TimeSeriesPoint>) {
    for pair in yaw.windows(2) {
        let ((t1, y1), (t2, y2)) = (pair[0], pair[1]);
        let dt = t2 - t1;
        if dt <= 0.0 {
            continue;
        }
        let rate = wrap_angle_degrees(y2 - y1) / dt;
        out.push(TimeSeriesPoint::new("turn_rate", t2, rate.abs(), "deg/s"));
        out.push(TimeSeriesPoint::new("yaw_rate", t2, rate, "deg/s"));
    }
}

/// Pair each voltage sample with the nearest-in-time current sample
fn power(voltage: &[(f64, f64)], current: &[(f64, f64)], out: &mut Vec<TimeSeriesPoint>) {
    if current.is_empty() {
        return;
    }
    let mut j = 0;
    for &(t, volts) in voltage {
        while j + 1 < current.len() && (current[j + 1].0 - t).abs() <= (current[j].0 - t).abs() {
            j += 1;
        }
        let (tc, amps) = current[j];
        if (tc - t).abs() < POWER_PAIRING_WINDOW_S {
            out.push(TimeSeriesPoint::new("power", t, volts * amps, "W"));
        }
    }
}

/// Rescale voltage between the observed min and max into 0..=100 %
fn battery_remaining_estimate(voltage: &[(f64, f64)], out: &mut Vec<TimeSeriesPoint>) {
    let min = voltage.iter().map(|s| s.1).fold(f64::INFINITY, f64::min);
    let max = voltage.iter().map(|s| s.1).fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;
    if span.is_nan() || span <= 0.0 {
        return;
    }
    for &(t, v) in voltage {
        let pct = ((v - min) / span * 100.0).clamp(0.0, 100.0);
        out.push(TimeSeriesPoint::new("battery_remaining_estimate", t, pct, "%"));
    }
}

/// Derive flight-dynamics series from per-parameter series sorted by time
pub fn calculate_flight_dynamics(series_map: &SeriesMap) -> FlightDynamics {
    let mut points = Vec::new();

    let positions = gps_positions(series(series_map, "gps_lat"), series(series_map, "gps_lng"));
    let total_distance = ground_speed(&positions, &mut points);

    if let Some(altitude) = ALTITUDE_SERIES
        .iter()
        .map(|name| series(series_map, name))
        .find(|s| !s.is_empty())
    {
        vertical_rates(altitude, &mut points);
    }

    turn_rates(series(series_map, "yaw"), &mut points);

    let voltage = series(series_map, "battery_voltage");
    power(voltage, series(series_map, "battery_current"), &mut points);
    battery_remaining_estimate(voltage, &mut points);

    debug!(
        "Derived {} points, GPS track {:.1} m over {} fixes",
        points.len(),
        total_distance,
        positions.len()
    );
    FlightDynamics {
        points,
        total_distance,
    }
}
