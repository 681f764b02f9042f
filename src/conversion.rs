//! Unit conversion and geometry helpers
//!
//! Fixed-point scaling, great-circle distance, heading wraparound, and
//! firmware/mode metadata decoding shared by the extractor and calculator.

use crate::types::FieldValue;
use semver::Version;

/// Mean Earth radius used for Haversine distances, meters
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Fixed-point scale for GPS coordinates (degrees * 10^7)
pub const GPS_COORDINATE_SCALE: f64 = 10_000_000.0;

/// How a raw field is scaled into its canonical unit
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scale {
    /// Value is already in the canonical unit
    None,
    /// Integer-encoded values are divided by the factor; float-encoded
    /// values are already engineering units and pass through unchanged
    FixedPoint(f64),
    /// Any numeric encoding is multiplied by the factor
    Multiply(f64),
}

impl Scale {
    /// Apply the scale to a decoded field, `None` for text fields
    pub fn apply(self, value: &FieldValue) -> Option<f64> {
        let raw = value.as_f64()?;
        Some(match self {
            Scale::None => raw,
            Scale::FixedPoint(divisor) if value.is_integer() => raw / divisor,
            Scale::FixedPoint(_) => raw,
            Scale::Multiply(factor) => raw * factor,
        })
    }
}

/// Convert a fixed-point GPS coordinate to degrees
pub fn convert_gps_coordinate(raw_value: i64) -> f64 {
    raw_value as f64 / GPS_COORDINATE_SCALE
}

/// Great-circle distance in meters between two lat/lng points in degrees
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();
    let a = (dlat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_M * c
}

/// Wrap an angle difference in degrees into [-180, 180)
pub fn wrap_angle_degrees(delta: f64) -> f64 {
    (delta + 180.0).rem_euclid(360.0) - 180.0
}

/// ArduCopter flight mode name for a numeric mode.
///
/// The numbering is ArduCopter's only; plane, rover and sub reuse the same
/// numbers for different modes. Use [`flight_mode_name`] when the vehicle is known.
pub fn copter_mode_name(mode_number: i64) -> String {
    let name = match mode_number {
        0 => "STABILIZE",
        1 => "ACRO",
        2 => "ALT_HOLD",
        3 => "AUTO",
        4 => "GUIDED",
        5 => "LOITER",
        6 => "RTL",
        7 => "CIRCLE",
        9 => "LAND",
        11 => "DRIFT",
        13 => "SPORT",
        14 => "FLIP",
        15 => "AUTOTUNE",
        16 => "POSHOLD",
        17 => "BRAKE",
        18 => "THROW",
        19 => "AVOID_ADSB",
        20 => "GUIDED_NOGPS",
        21 => "SMART_RTL",
        22 => "FLOWHOLD",
        23 => "FOLLOW",
        24 => "ZIGZAG",
        25 => "SYSTEMID",
        26 => "AUTOROTATE",
        27 => "AUTO_RTL",
        _ => return format!("MODE_{}", mode_number),
    };
    name.to_string()
}

/// Firmware family named at the start of a banner, e.g. "ArduPlane" in
/// "ArduPlane V4.4.0 (a1b2c3d4)"
pub fn banner_vehicle(banner: &str) -> Option<&str> {
    let word = banner.split_whitespace().next()?;
    let known = word.starts_with("Ardu") || matches!(word, "Blimp" | "AntennaTracker");
    known.then_some(word)
}

/// Mode name for a numeric mode on the given vehicle.
///
/// Copter logs and logs without a banner use the ArduCopter table; any other
/// vehicle gets `MODE_<n>`.
pub fn flight_mode_name(vehicle: Option<&str>, mode_number: i64) -> String {
    match vehicle {
        None | Some("ArduCopter") => copter_mode_name(mode_number),
        Some(_) => format!("MODE_{}", mode_number),
    }
}

/// Extract a firmware version from a banner such as "ArduCopter V4.5.1 (77d01ba3)"
pub fn extract_firmware_version(banner: &str) -> Option<Version> {
    banner.split_whitespace().find_map(|word| {
        let candidate = word.strip_prefix(&['V', 'v'][..]).unwrap_or(word);
        if !candidate.starts_with(|c: char| c.is_ascii_digit()) {
            return None;
        }
        Version::parse(candidate).ok().or_else(|| {
            // Two-component versions such as "4.5"
            Version::parse(&format!("{}.0", candidate)).ok()
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_point_scale_only_applies_to_integers() {
        let scale = Scale::FixedPoint(100.0);
        assert_eq!(scale.apply(&FieldValue::Int(1680)), Some(16.8));
        assert_eq!(scale.apply(&FieldValue::Float(16.8)), Some(16.8));
        assert_eq!(scale.apply(&FieldValue::Text("x".into())), None);
        assert_eq!(Scale::Multiply(0.5).apply(&FieldValue::Float(4.0)), Some(2.0));
        assert_eq!(Scale::None.apply(&FieldValue::Int(7)), Some(7.0));
    }

    #[test]
    fn test_gps_coordinate_conversion() {
        assert!((convert_gps_coordinate(377749000) - 37.7749).abs() < 1e-9);
        assert!((convert_gps_coordinate(-1224194000) + 122.4194).abs() < 1e-9);
    }

    #[test]
    fn test_haversine_one_millidegree_at_equator() {
        let d = haversine_distance(0.0, 0.0, 0.001, 0.0);
        assert!((d - 111.19).abs() < 0.1, "distance was {}", d);
        assert_eq!(haversine_distance(10.0, 20.0, 10.0, 20.0), 0.0);
    }

    #[test]
    fn test_wrap_angle_takes_shortest_path() {
        assert_eq!(wrap_angle_degrees(10.0 - 350.0), 20.0);
        assert_eq!(wrap_angle_degrees(350.0 - 10.0), -20.0);
        assert_eq!(wrap_angle_degrees(90.0), 90.0);
        assert_eq!(wrap_angle_degrees(-90.0), -90.0);
    }

    #[test]
    fn test_copter_mode_names() {
        assert_eq!(copter_mode_name(0), "STABILIZE");
        assert_eq!(copter_mode_name(5), "LOITER");
        assert_eq!(copter_mode_name(99), "MODE_99");
    }

    #[test]
    fn test_mode_numbers_are_vehicle_specific() {
        assert_eq!(banner_vehicle("ArduPlane V4.4.0 (a1b2c3d4)"), Some("ArduPlane"));
        assert_eq!(banner_vehicle("Frame: QUAD/X"), None);
        assert_eq!(flight_mode_name(Some("ArduCopter"), 6), "RTL");
        assert_eq!(flight_mode_name(None, 6), "RTL");
        assert_eq!(flight_mode_name(Some("ArduPlane"), 6), "MODE_6");
        assert_eq!(flight_mode_name(Some("ArduRover"), 0), "MODE_0");
    }

    #[test]
    fn test_extract_firmware_version() {
        assert_eq!(
            extract_firmware_version("ArduCopter V4.5.1 (77d01ba3)"),
            Some(Version::new(4, 5, 1))
        );
        assert_eq!(extract_firmware_version("ArduPlane V4.3"), Some(Version::new(4, 3, 0)));
        assert_eq!(extract_firmware_version("PreArm: Compass not healthy"), None);
    }
}
