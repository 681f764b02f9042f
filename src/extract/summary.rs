//! Flight-level scalar aggregates computed from grouped messages
//!
//! Every aggregate defaults to zero/empty when its inputs are absent; nothing
//! here invents a reading the log does not contain.

use crate::conversion::{banner_vehicle, extract_firmware_version, flight_mode_name};
use crate::extract::groups::{MessageGroup, MessageGroups};
use crate::params::scaled_field;
use crate::types::{FlightMode, FlightSummary, LogMessage};
use tracing::debug;

/// Altitude-bearing fields per group; the first one present in a message wins
const ALTITUDE_SOURCES: &[(MessageGroup, &[&str])] = &[
    (MessageGroup::Gps, &["Alt"]),
    (MessageGroup::ControlTuning, &["Alt", "BAlt"]),
    (MessageGroup::Barometer, &["Alt"]),
    (MessageGroup::Position, &["Alt", "RelHomeAlt"]),
    (MessageGroup::RangeFinder, &["Dist"]),
];

/// Voltage-bearing fields per group, pooled in log order
const VOLTAGE_SOURCES: &[(MessageGroup, &str)] = &[
    (MessageGroup::Battery, "Volt"),
    (MessageGroup::Power, "Vcc"),
    (MessageGroup::VoltageMonitor, "MVolt"),
];

/// Mode recorded when a flight has messages but never logged a mode change
const DEFAULT_MODE: &str = "STABILIZE";

/// Build the flight summary from partitioned messages.
///
/// `total_distance` is left at zero; it is derived from the projected GPS
/// series by the dynamics stage.
pub fn build_flight_summary(groups: &MessageGroups) -> FlightSummary {
    let (start, flight_duration) = flight_time_span(groups.all());
    let (battery_start_voltage, battery_end_voltage) = battery_voltage_range(groups);

    let summary = FlightSummary {
        flight_duration,
        max_altitude: max_altitude(groups),
        total_distance: 0.0,
        battery_start_voltage,
        battery_end_voltage,
        gps_quality: gps_quality(groups),
        flight_modes: flight_modes(groups, start, flight_duration),
        firmware_version: firmware_version(groups),
    };

    debug!(
        "Summary: duration={:.1}s max_alt={:.1}m battery={:.2}V->{:.2}V gps_quality={:.0} modes={}",
        summary.flight_duration,
        summary.max_altitude,
        summary.battery_start_voltage,
        summary.battery_end_voltage,
        summary.gps_quality,
        summary.flight_modes.len()
    );
    summary
}

/// (first timestamp, duration) over messages with a positive timestamp
fn flight_time_span(messages: &[LogMessage]) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for t in messages
        .iter()
        .map(|m| m.timestamp_seconds)
        .filter(|t| t.is_finite() && *t > 0.0)
    {
        min = min.min(t);
        max = max.max(t);
    }
    if min.is_finite() {
        (min, max - min)
    } else {
        (0.0, 0.0)
    }
}

fn max_altitude(groups: &MessageGroups) -> f64 {
    let mut best: Option<f64> = None;
    for (group, fields) in ALTITUDE_SOURCES {
        for message in groups.get(*group) {
            let reading = fields
                .iter()
                .find_map(|field| scaled_field(message, field))
                .filter(|v| v.is_finite());
            if let Some(value) = reading {
                best = Some(best.map_or(value, |b| b.max(value)));
            }
        }
    }
    best.unwrap_or(0.0)
}

fn battery_voltage_range(groups: &MessageGroups) -> (f64, f64) {
    let source_groups: Vec<MessageGroup> = VOLTAGE_SOURCES.iter().map(|(g, _)| *g).collect();
    let readings: Vec<f64> = groups
        .merged(&source_groups)
        .into_iter()
        .filter_map(|message| {
            let group = MessageGroup::for_message_type(&message.message_type)?;
            let field = VOLTAGE_SOURCES
                .iter()
                .find(|(g, _)| *g == group)
                .map(|(_, f)| *f)?;
            scaled_field(message, field)
        })
        .filter(|v| v.is_finite() && *v > 0.0)
        .collect();

    match (readings.first(), readings.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => (0.0, 0.0),
    }
}

/// GPS quality score in [0, 100].
///
/// The basic score is the mean fix status x 20. When accuracy messages carry
/// usable fields, their score replaces it: per message, the mean of
/// `max(0, 100 - (HAcc + VAcc) / 2)` and `max(0, 100 - 10 * VDop)`.
fn gps_quality(groups: &MessageGroups) -> f64 {
    let enhanced: Vec<f64> = groups
        .get(MessageGroup::GpsAccuracy)
        .filter_map(accuracy_score)
        .collect();
    if !enhanced.is_empty() {
        return mean(&enhanced);
    }

    let basic: Vec<f64> = groups
        .get(MessageGroup::Gps)
        .filter_map(|m| m.number("Status"))
        .filter(|v| v.is_finite())
        .map(|status| (status * 20.0).clamp(0.0, 100.0))
        .collect();
    if basic.is_empty() {
        0.0
    } else {
        mean(&basic)
    }
}

fn accuracy_score(message: &LogMessage) -> Option<f64> {
    let mut parts = Vec::with_capacity(2);
    if let (Some(h), Some(v)) = (scaled_field(message, "HAcc"), scaled_field(message, "VAcc")) {
        parts.push((100.0 - (h + v) / 2.0).max(0.0));
    }
    if let Some(vdop) = scaled_field(message, "VDop") {
        parts.push((100.0 - 10.0 * vdop).max(0.0));
    }
    let score = mean(&parts);
    (!parts.is_empty() && score.is_finite()).then_some(score)
}

fn flight_modes(groups: &MessageGroups, start: f64, duration: f64) -> Vec<FlightMode> {
    let vehicle = logged_vehicle(groups);
    let modes: Vec<FlightMode> = groups
        .get(MessageGroup::Modes)
        .filter_map(|message| {
            Some(FlightMode {
                mode: mode_name(message, vehicle)?,
                timestamp: message.timestamp_seconds,
                duration: 0.0,
            })
        })
        .collect();

    // Only a log with no mode messages at all gets the default entry
    if groups.count(MessageGroup::Modes) == 0 && !groups.is_empty() {
        return vec![FlightMode {
            mode: DEFAULT_MODE.to_string(),
            timestamp: start,
            duration,
        }];
    }
    modes
}

fn mode_name(message: &LogMessage, vehicle: Option<&str>) -> Option<String> {
    if let Some(name) = message.text("Mode").map(str::trim).filter(|s| !s.is_empty()) {
        return Some(name.to_string());
    }
    let number = message.number("ModeNum").or_else(|| message.number("Mode"))?;
    Some(flight_mode_name(vehicle, number as i64))
}

fn logged_vehicle(groups: &MessageGroups) -> Option<&str> {
    groups
        .get(MessageGroup::TextMessages)
        .filter_map(|m| m.text("Message"))
        .find_map(banner_vehicle)
}

fn firmware_version(groups: &MessageGroups) -> Option<String> {
    groups
        .get(MessageGroup::TextMessages)
        .filter_map(|m| m.text("Message"))
        .find_map(extract_firmware_version)
        .map(|v| v.to_string())
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::groups::partition_messages;
    use crate::types::FieldValue;

    fn msg(ty: &str, t: f64, fields: &[(&str, FieldValue)]) -> LogMessage {
        fields
            .iter()
            .fold(LogMessage::new(ty, t), |m, (k, v)| m.with_field(*k, v.clone()))
    }

    #[test]
    fn test_empty_flight_is_all_zero() {
        let summary = build_flight_summary(&partition_messages(Vec::new()));
        assert_eq!(summary, FlightSummary::default());
    }

    #[test]
    fn test_duration_ignores_zero_timestamps() {
        let groups = partition_messages(vec![
            LogMessage::new("PARM", 0.0),
            LogMessage::new("ATT", 12.0),
            LogMessage::new("ATT", 72.5),
        ]);
        let summary = build_flight_summary(&groups);
        assert_eq!(summary.flight_duration, 60.5);
        assert_eq!(summary.flight_modes.len(), 1);
        assert_eq!(summary.flight_modes[0].mode, "STABILIZE");
        assert_eq!(summary.flight_modes[0].timestamp, 12.0);
        assert_eq!(summary.flight_modes[0].duration, 60.5);
    }

    #[test]
    fn test_max_altitude_across_groups_first_field_wins() {
        let groups = partition_messages(vec![
            msg("GPS", 1.0, &[("Alt", FieldValue::Int(5000))]),
            // BAlt ignored because Alt is present
            msg(
                "CTUN",
                2.0,
                &[("Alt", FieldValue::Float(42.0)), ("BAlt", FieldValue::Float(99.0))],
            ),
            msg("POS", 3.0, &[("RelHomeAlt", FieldValue::Float(61.5))]),
            msg("BARO", 4.0, &[("Alt", FieldValue::Float(12.0))]),
        ]);
        assert_eq!(build_flight_summary(&groups).max_altitude, 61.5);
    }

    #[test]
    fn test_battery_voltage_pooled_in_log_order() {
        let groups = partition_messages(vec![
            msg("POWR", 1.0, &[("Vcc", FieldValue::Float(5.1))]),
            msg("BAT", 2.0, &[("Volt", FieldValue::Float(16.8))]),
            msg("BAT", 3.0, &[("Volt", FieldValue::Float(0.0))]),
            msg("CURR", 4.0, &[("Volt", FieldValue::Int(1420))]),
        ]);
        let summary = build_flight_summary(&groups);
        assert_eq!(summary.battery_start_voltage, 5.1);
        assert_eq!(summary.battery_end_voltage, 14.2);
    }

    #[test]
    fn test_gps_quality_basic_and_enhanced() {
        let basic = partition_messages(vec![
            msg("GPS", 1.0, &[("Status", FieldValue::Int(3))]),
            msg("GPS", 2.0, &[("Status", FieldValue::Int(6))]),
        ]);
        // (60 + 100) / 2
        assert_eq!(build_flight_summary(&basic).gps_quality, 80.0);

        let enhanced = partition_messages(vec![
            msg("GPS", 1.0, &[("Status", FieldValue::Int(3))]),
            msg(
                "GPA",
                1.0,
                &[
                    ("HAcc", FieldValue::Float(2.0)),
                    ("VAcc", FieldValue::Float(4.0)),
                    ("VDop", FieldValue::Float(1.5)),
                ],
            ),
        ]);
        // (97 + 85) / 2
        assert_eq!(build_flight_summary(&enhanced).gps_quality, 91.0);
    }

    #[test]
    fn test_mode_names_from_text_or_number() {
        let groups = partition_messages(vec![
            msg("MODE", 5.0, &[("Mode", FieldValue::Text("LOITER".into()))]),
            msg("MODE", 9.0, &[("Mode", FieldValue::Int(6)), ("ModeNum", FieldValue::Int(6))]),
        ]);
        let modes = build_flight_summary(&groups).flight_modes;
        assert_eq!(modes.len(), 2);
        assert_eq!(modes[0].mode, "LOITER");
        assert_eq!(modes[1].mode, "RTL");
        assert_eq!(modes[1].duration, 0.0);
    }

    #[test]
    fn test_unnamed_mode_messages_suppress_default_mode() {
        let groups = partition_messages(vec![
            msg("ATT", 1.0, &[("Roll", FieldValue::Float(0.5))]),
            msg("MODE", 2.0, &[("Mode", FieldValue::Text(" ".into()))]),
            msg("ATT", 30.0, &[("Roll", FieldValue::Float(0.5))]),
        ]);
        let summary = build_flight_summary(&groups);
        assert_eq!(summary.flight_duration, 29.0);
        assert!(summary.flight_modes.is_empty());
    }

    #[test]
    fn test_plane_mode_numbers_are_not_named_from_copter_table() {
        let groups = partition_messages(vec![
            msg(
                "MSG",
                0.5,
                &[("Message", FieldValue::Text("ArduPlane V4.4.0 (a1b2c3d4)".into()))],
            ),
            msg("MODE", 3.0, &[("Mode", FieldValue::Int(10)), ("ModeNum", FieldValue::Int(10))]),
            msg("MODE", 8.0, &[("Mode", FieldValue::Text("CRUISE".into()))]),
        ]);
        let modes = build_flight_summary(&groups).flight_modes;
        assert_eq!(modes.len(), 2);
        assert_eq!(modes[0].mode, "MODE_10");
        assert_eq!(modes[1].mode, "CRUISE");
    }

    #[test]
    fn test_firmware_version_from_text_messages() {
        let groups = partition_messages(vec![
            msg("MSG", 0.5, &[("Message", FieldValue::Text("Frame: QUAD".into()))]),
            msg(
                "MSG",
                0.6,
                &[("Message", FieldValue::Text("ArduCopter V4.5.1 (77d01ba3)".into()))],
            ),
        ]);
        assert_eq!(
            build_flight_summary(&groups).firmware_version.as_deref(),
            Some("4.5.1")
        );
    }
}
