use crate::conversion::{Scale, GPS_COORDINATE_SCALE};
use crate::types::LogMessage;

/// One row of the projection table: a raw message field and the canonical
/// parameter it feeds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldProjection {
    pub message_type: &'static str,
    pub field: &'static str,
    pub parameter: &'static str,
    pub unit: &'static str,
    pub scale: Scale,
}

const fn proj(
    message_type: &'static str,
    field: &'static str,
    parameter: &'static str,
    unit: &'static str,
    scale: Scale,
) -> FieldProjection {
    FieldProjection {
        message_type,
        field,
        parameter,
        unit,
        scale,
    }
}

/// `{message type, raw field} -> {canonical parameter, unit, scale}`.
///
/// Row order is the order points are emitted for a message.
pub static FIELD_PROJECTIONS: &[FieldProjection] = &[
    // GPS
    proj("GPS", "Status", "gps_status", "fix", Scale::None),
    proj("GPS", "NSats", "gps_satellites", "count", Scale::None),
    proj("GPS", "HDop", "gps_hdop", "dop", Scale::FixedPoint(100.0)),
    proj("GPS", "Lat", "gps_lat", "deg", Scale::FixedPoint(GPS_COORDINATE_SCALE)),
    proj("GPS", "Lng", "gps_lng", "deg", Scale::FixedPoint(GPS_COORDINATE_SCALE)),
    proj("GPS", "Alt", "gps_alt", "m", Scale::FixedPoint(100.0)),
    proj("GPS", "Spd", "gps_speed", "m/s", Scale::FixedPoint(100.0)),
    proj("GPS", "GCrs", "gps_course", "deg", Scale::FixedPoint(100.0)),
    proj("GPS", "VZ", "gps_vertical_speed", "m/s", Scale::FixedPoint(100.0)),
    proj("GPS", "Yaw", "gps_yaw", "deg", Scale::FixedPoint(100.0)),
    // GPA
    proj("GPA", "VDop", "gps_vdop", "dop", Scale::FixedPoint(100.0)),
    proj("GPA", "HAcc", "gps_horizontal_accuracy", "m", Scale::FixedPoint(100.0)),
    proj("GPA", "VAcc", "gps_vertical_accuracy", "m", Scale::FixedPoint(100.0)),
    proj("GPA", "SAcc", "gps_speed_accuracy", "m/s", Scale::FixedPoint(100.0)),
    // ATT
    proj("ATT", "DesRoll", "desired_roll", "deg", Scale::FixedPoint(100.0)),
    proj("ATT", "Roll", "roll", "deg", Scale::FixedPoint(100.0)),
    proj("ATT", "DesPitch", "desired_pitch", "deg", Scale::FixedPoint(100.0)),
    proj("ATT", "Pitch", "pitch", "deg", Scale::FixedPoint(100.0)),
    proj("ATT", "DesYaw", "desired_yaw", "deg", Scale::FixedPoint(100.0)),
    proj("ATT", "Yaw", "yaw", "deg", Scale::FixedPoint(100.0)),
    proj("ATT", "ErrRP", "attitude_error_rp", "deg", Scale::FixedPoint(100.0)),
    proj("ATT", "ErrYaw", "attitude_error_yaw", "deg", Scale::FixedPoint(100.0)),
    // BAT
    proj("BAT", "Volt", "battery_voltage", "V", Scale::FixedPoint(100.0)),
    proj("BAT", "VoltR", "battery_voltage_resting", "V", Scale::FixedPoint(100.0)),
    proj("BAT", "Curr", "battery_current", "A", Scale::FixedPoint(100.0)),
    proj("BAT", "CurrTot", "battery_consumed", "mAh", Scale::None),
    proj("BAT", "EnrgTot", "battery_energy", "Wh", Scale::None),
    proj("BAT", "Temp", "battery_temperature", "degC", Scale::FixedPoint(100.0)),
    proj("BAT", "Res", "battery_resistance", "Ohm", Scale::None),
    proj("BAT", "RemPct", "battery_remaining", "%", Scale::None),
    // CURR
    proj("CURR", "Volt", "battery_voltage", "V", Scale::FixedPoint(100.0)),
    proj("CURR", "Curr", "battery_current", "A", Scale::FixedPoint(100.0)),
    proj("CURR", "CurrTot", "battery_consumed", "mAh", Scale::None),
    // POWR
    proj("POWR", "Vcc", "board_voltage", "V", Scale::FixedPoint(100.0)),
    proj("POWR", "VServo", "servo_voltage", "V", Scale::FixedPoint(100.0)),
    proj("POWR", "Flags", "power_flags", "flags", Scale::None),
    // MCU
    proj("MCU", "MTemp", "mcu_temperature", "degC", Scale::FixedPoint(100.0)),
    proj("MCU", "MVolt", "mcu_voltage", "V", Scale::FixedPoint(100.0)),
    // CTUN
    proj("CTUN", "ThI", "throttle_in", "ratio", Scale::None),
    proj("CTUN", "ABst", "angle_boost", "ratio", Scale::None),
    proj("CTUN", "ThO", "throttle_out", "ratio", Scale::None),
    proj("CTUN", "ThH", "throttle_hover", "ratio", Scale::None),
    proj("CTUN", "DAlt", "desired_altitude", "m", Scale::FixedPoint(100.0)),
    proj("CTUN", "Alt", "altitude", "m", Scale::FixedPoint(100.0)),
    proj("CTUN", "BAlt", "ctun_baro_altitude", "m", Scale::FixedPoint(100.0)),
    proj("CTUN", "DSAlt", "desired_rangefinder_altitude", "m", Scale::FixedPoint(100.0)),
    proj("CTUN", "SAlt", "rangefinder_altitude", "m", Scale::FixedPoint(100.0)),
    proj("CTUN", "TAlt", "terrain_altitude", "m", Scale::FixedPoint(100.0)),
    proj("CTUN", "DCRt", "desired_climb_rate", "m/s", Scale::FixedPoint(100.0)),
    proj("CTUN", "CRt", "ctun_climb_rate", "m/s", Scale::FixedPoint(100.0)),
    // NTUN
    proj("NTUN", "WPDst", "wp_distance", "m", Scale::FixedPoint(100.0)),
    proj("NTUN", "WPBrg", "wp_bearing", "deg", Scale::FixedPoint(100.0)),
    proj("NTUN", "PErX", "position_error_x", "m", Scale::FixedPoint(100.0)),
    proj("NTUN", "PErY", "position_error_y", "m", Scale::FixedPoint(100.0)),
    proj("NTUN", "DVelX", "desired_velocity_x", "m/s", Scale::FixedPoint(100.0)),
    proj("NTUN", "DVelY", "desired_velocity_y", "m/s", Scale::FixedPoint(100.0)),
    proj("NTUN", "VelX", "velocity_x", "m/s", Scale::FixedPoint(100.0)),
    proj("NTUN", "VelY", "velocity_y", "m/s", Scale::FixedPoint(100.0)),
    proj("NTUN", "DAcX", "desired_accel_x", "m/s/s", Scale::FixedPoint(100.0)),
    proj("NTUN", "DAcY", "desired_accel_y", "m/s/s", Scale::FixedPoint(100.0)),
    // IMU
    proj("IMU", "GyrX", "gyro_x", "rad/s", Scale::None),
    proj("IMU", "GyrY", "gyro_y", "rad/s", Scale::None),
    proj("IMU", "GyrZ", "gyro_z", "rad/s", Scale::None),
    proj("IMU", "AccX", "accel_x", "m/s/s", Scale::None),
    proj("IMU", "AccY", "accel_y", "m/s/s", Scale::None),
    proj("IMU", "AccZ", "accel_z", "m/s/s", Scale::None),
    proj("IMU", "T", "imu_temperature", "degC", Scale::None),
    proj("IMU", "EG", "imu_gyro_errors", "count", Scale::None),
    proj("IMU", "EA", "imu_accel_errors", "count", Scale::None),
    // BARO
    proj("BARO", "Alt", "baro_alt", "m", Scale::FixedPoint(100.0)),
    proj("BARO", "Press", "baro_pressure", "Pa", Scale::None),
    proj("BARO", "Temp", "baro_temperature", "degC", Scale::FixedPoint(100.0)),
    proj("BARO", "CRt", "baro_climb_rate", "m/s", Scale::FixedPoint(100.0)),
    // MAG
    proj("MAG", "MagX", "mag_x", "mGauss", Scale::None),
    proj("MAG", "MagY", "mag_y", "mGauss", Scale::None),
    proj("MAG", "MagZ", "mag_z", "mGauss", Scale::None),
    proj("MAG", "OfsX", "mag_offset_x", "mGauss", Scale::None),
    proj("MAG", "OfsY", "mag_offset_y", "mGauss", Scale::None),
    proj("MAG", "OfsZ", "mag_offset_z", "mGauss", Scale::None),
    // RCIN
    proj("RCIN", "C1", "rc_in_1", "us", Scale::None),
    proj("RCIN", "C2", "rc_in_2", "us", Scale::None),
    proj("RCIN", "C3", "rc_in_3", "us", Scale::None),
    proj("RCIN", "C4", "rc_in_4", "us", Scale::None),
    proj("RCIN", "C5", "rc_in_5", "us", Scale::None),
    proj("RCIN", "C6", "rc_in_6", "us", Scale::None),
    proj("RCIN", "C7", "rc_in_7", "us", Scale::None),
    proj("RCIN", "C8", "rc_in_8", "us", Scale::None),
    // RCOU
    proj("RCOU", "C1", "rc_out_1", "us", Scale::None),
    proj("RCOU", "C2", "rc_out_2", "us", Scale::None),
    proj("RCOU", "C3", "rc_out_3", "us", Scale::None),
    proj("RCOU", "C4", "rc_out_4", "us", Scale::None),
    proj("RCOU", "C5", "rc_out_5", "us", Scale::None),
    proj("RCOU", "C6", "rc_out_6", "us", Scale::None),
    proj("RCOU", "C7", "rc_out_7", "us", Scale::None),
    proj("RCOU", "C8", "rc_out_8", "us", Scale::None),
    // VIBE
    proj("VIBE", "VibeX", "vibe_x", "m/s/s", Scale::None),
    proj("VIBE", "VibeY", "vibe_y", "m/s/s", Scale::None),
    proj("VIBE", "VibeZ", "vibe_z", "m/s/s", Scale::None),
    proj("VIBE", "Clip0", "vibe_clip_0", "count", Scale::None),
    proj("VIBE", "Clip1", "vibe_clip_1", "count", Scale::None),
    proj("VIBE", "Clip2", "vibe_clip_2", "count", Scale::None),
    // PM
    proj("PM", "NLon", "pm_long_loops", "count", Scale::None),
    proj("PM", "NLoop", "pm_loops", "count", Scale::None),
    proj("PM", "MaxT", "pm_max_loop_time", "us", Scale::None),
    proj("PM", "Mem", "free_memory", "bytes", Scale::None),
    proj("PM", "Load", "cpu_load", "%", Scale::FixedPoint(10.0)),
    // ATUN
    proj("ATUN", "Targ", "autotune_target", "deg/s", Scale::None),
    proj("ATUN", "Min", "autotune_min", "deg/s", Scale::None),
    proj("ATUN", "Max", "autotune_max", "deg/s", Scale::None),
    proj("ATUN", "RP", "autotune_rate_p", "gain", Scale::None),
    proj("ATUN", "RD", "autotune_rate_d", "gain", Scale::None),
    proj("ATUN", "SP", "autotune_stab_p", "gain", Scale::None),
    // RATE
    proj("RATE", "RDes", "rate_roll_desired", "deg/s", Scale::None),
    proj("RATE", "R", "rate_roll", "deg/s", Scale::None),
    proj("RATE", "ROut", "rate_roll_out", "ratio", Scale::None),
    proj("RATE", "PDes", "rate_pitch_desired", "deg/s", Scale::None),
    proj("RATE", "P", "rate_pitch", "deg/s", Scale::None),
    proj("RATE", "POut", "rate_pitch_out", "ratio", Scale::None),
    proj("RATE", "YDes", "rate_yaw_desired", "deg/s", Scale::None),
    proj("RATE", "Y", "rate_yaw", "deg/s", Scale::None),
    proj("RATE", "YOut", "rate_yaw_out", "ratio", Scale::None),
    proj("RATE", "ADes", "rate_accel_desired", "m/s/s", Scale::Multiply(0.01)),
    proj("RATE", "A", "rate_accel", "m/s/s", Scale::Multiply(0.01)),
    proj("RATE", "AOut", "rate_accel_out", "ratio", Scale::None),
    // PIDR
    proj("PIDR", "Tar", "pid_roll_target", "deg/s", Scale::None),
    proj("PIDR", "Act", "pid_roll_actual", "deg/s", Scale::None),
    proj("PIDR", "Err", "pid_roll_error", "deg/s", Scale::None),
    proj("PIDR", "P", "pid_roll_p", "output", Scale::None),
    proj("PIDR", "I", "pid_roll_i", "output", Scale::None),
    proj("PIDR", "D", "pid_roll_d", "output", Scale::None),
    proj("PIDR", "FF", "pid_roll_ff", "output", Scale::None),
    // PIDP
    proj("PIDP", "Tar", "pid_pitch_target", "deg/s", Scale::None),
    proj("PIDP", "Act", "pid_pitch_actual", "deg/s", Scale::None),
    proj("PIDP", "Err", "pid_pitch_error", "deg/s", Scale::None),
    proj("PIDP", "P", "pid_pitch_p", "output", Scale::None),
    proj("PIDP", "I", "pid_pitch_i", "output", Scale::None),
    proj("PIDP", "D", "pid_pitch_d", "output", Scale::None),
    proj("PIDP", "FF", "pid_pitch_ff", "output", Scale::None),
    // PIDY
    proj("PIDY", "Tar", "pid_yaw_target", "deg/s", Scale::None),
    proj("PIDY", "Act", "pid_yaw_actual", "deg/s", Scale::None),
    proj("PIDY", "Err", "pid_yaw_error", "deg/s", Scale::None),
    proj("PIDY", "P", "pid_yaw_p", "output", Scale::None),
    proj("PIDY", "I", "pid_yaw_i", "output", Scale::None),
    proj("PIDY", "D", "pid_yaw_d", "output", Scale::None),
    proj("PIDY", "FF", "pid_yaw_ff", "output", Scale::None),
    // ARSP
    proj("ARSP", "Airspeed", "airspeed", "m/s", Scale::None),
    proj("ARSP", "DiffPress", "airspeed_diff_pressure", "Pa", Scale::None),
    proj("ARSP", "Temp", "airspeed_temperature", "degC", Scale::FixedPoint(100.0)),
    // ESC
    proj("ESC", "RPM", "esc_rpm", "rpm", Scale::None),
    proj("ESC", "Volt", "esc_voltage", "V", Scale::FixedPoint(100.0)),
    proj("ESC", "Curr", "esc_current", "A", Scale::FixedPoint(100.0)),
    proj("ESC", "Temp", "esc_temperature", "degC", Scale::FixedPoint(100.0)),
    // OF
    proj("OF", "flowX", "optical_flow_x", "rad/s", Scale::None),
    proj("OF", "flowY", "optical_flow_y", "rad/s", Scale::None),
    proj("OF", "bodyX", "optical_flow_body_x", "rad/s", Scale::None),
    proj("OF", "bodyY", "optical_flow_body_y", "rad/s", Scale::None),
    proj("OF", "Qual", "optical_flow_quality", "quality", Scale::None),
    // RFND
    proj("RFND", "Dist", "rangefinder_distance", "m", Scale::FixedPoint(100.0)),
    proj("RFND", "Stat", "rangefinder_status", "status", Scale::None),
    // TEMP
    proj("TEMP", "Temp", "temperature", "degC", Scale::FixedPoint(100.0)),
    // POS
    proj("POS", "Lat", "pos_lat", "deg", Scale::FixedPoint(GPS_COORDINATE_SCALE)),
    proj("POS", "Lng", "pos_lng", "deg", Scale::FixedPoint(GPS_COORDINATE_SCALE)),
    proj("POS", "Alt", "pos_alt", "m", Scale::FixedPoint(100.0)),
    proj("POS", "RelHomeAlt", "relative_altitude", "m", Scale::FixedPoint(100.0)),
    proj("POS", "RelOriginAlt", "origin_altitude", "m", Scale::FixedPoint(100.0)),
    // ERR
    proj("ERR", "Subsys", "error_subsystem", "code", Scale::None),
    proj("ERR", "ECode", "error_code", "code", Scale::None),
    // EV
    proj("EV", "Id", "event_id", "code", Scale::None),
    // MODE
    proj("MODE", "ModeNum", "flight_mode_number", "mode", Scale::None),
];

/// Projection row for one raw message field
pub fn projection_for(message_type: &str, field: &str) -> Option<&'static FieldProjection> {
    FIELD_PROJECTIONS
        .iter()
        .find(|row| row.message_type == message_type && row.field == field)
}

/// Scaled value of a raw field, falling back to the unscaled number for
/// fields the table does not project
pub fn scaled_field(message: &LogMessage, field: &str) -> Option<f64> {
    let value = message.get(field)?;
    match projection_for(&message.message_type, field) {
        Some(row) => row.scale.apply(value),
        None => value.as_f64(),
    }
}

/// Raw names used outside the binary message/field convention
/// (PX4 topics, ground station exports, common shorthands)
pub static RAW_PARAMETER_ALIASES: &[(&str, &str)] = &[
    ("latitude", "gps_lat"),
    ("lat", "gps_lat"),
    ("longitude", "gps_lng"),
    ("lon", "gps_lng"),
    ("lng", "gps_lng"),
    ("GPS.Lon", "gps_lng"),
    ("satellites", "gps_satellites"),
    ("num_sats", "gps_satellites"),
    ("hdop", "gps_hdop"),
    ("vdop", "gps_vdop"),
    ("vehicle_gps_position.lat", "gps_lat"),
    ("vehicle_gps_position.lon", "gps_lng"),
    ("vehicle_gps_position.alt", "gps_alt"),
    ("vehicle_gps_position.satellites_used", "gps_satellites"),
    ("vehicle_gps_position.eph", "gps_horizontal_accuracy"),
    ("vehicle_gps_position.epv", "gps_vertical_accuracy"),
    ("vehicle_attitude.roll", "roll"),
    ("vehicle_attitude.pitch", "pitch"),
    ("vehicle_attitude.yaw", "yaw"),
    ("heading", "yaw"),
    ("voltage", "battery_voltage"),
    ("vbat", "battery_voltage"),
    ("battery_status.voltage_v", "battery_voltage"),
    ("current", "battery_current"),
    ("battery_status.current_a", "battery_current"),
    ("battery_status.remaining", "battery_remaining"),
    ("battery_status.discharged_mah", "battery_consumed"),
    ("alt", "altitude"),
    ("vehicle_global_position.alt", "altitude"),
    ("vehicle_air_data.baro_alt_meter", "baro_alt"),
    ("groundspeed", "ground_speed"),
    ("ground_speed", "ground_speed"),
    ("climb", "vertical_speed"),
    ("throttle", "throttle_out"),
    ("airspeed", "airspeed"),
];

/// Canonical name -> human-readable label
pub static DISPLAY_NAMES: &[(&str, &str)] = &[
    ("gps_lat", "GPS Latitude"),
    ("gps_lng", "GPS Longitude"),
    ("gps_alt", "GPS Altitude"),
    ("gps_speed", "GPS Speed"),
    ("gps_course", "GPS Course"),
    ("gps_satellites", "GPS Satellites"),
    ("gps_hdop", "GPS HDOP"),
    ("gps_vdop", "GPS VDOP"),
    ("gps_status", "GPS Fix Status"),
    ("roll", "Roll Angle"),
    ("pitch", "Pitch Angle"),
    ("yaw", "Yaw / Heading"),
    ("battery_voltage", "Battery Voltage"),
    ("battery_current", "Battery Current"),
    ("battery_consumed", "Consumed Capacity"),
    ("battery_remaining", "Battery Remaining"),
    ("battery_remaining_estimate", "Battery Remaining (Est.)"),
    ("altitude", "Altitude"),
    ("baro_alt", "Barometric Altitude"),
    ("relative_altitude", "Altitude Above Home"),
    ("throttle_out", "Throttle Output"),
    ("throttle_in", "Pilot Throttle"),
    ("vibe_x", "Vibration X"),
    ("vibe_y", "Vibration Y"),
    ("vibe_z", "Vibration Z"),
    ("cpu_load", "CPU Load"),
    ("esc_rpm", "ESC RPM"),
    ("ground_speed", "Ground Speed"),
    ("climb_rate", "Climb Rate"),
    ("descent_rate", "Descent Rate"),
    ("vertical_speed", "Vertical Speed"),
    ("turn_rate", "Turn Rate"),
    ("yaw_rate", "Yaw Rate"),
    ("power", "Power Draw"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_projection_rows_are_unique_and_complete() {
        let mut seen = HashSet::new();
        for row in FIELD_PROJECTIONS {
            assert!(
                seen.insert((row.message_type, row.field)),
                "duplicate row {}.{}",
                row.message_type,
                row.field
            );
            assert!(!row.parameter.is_empty());
            assert!(!row.unit.is_empty(), "{} has no unit", row.parameter);
        }
        assert!(FIELD_PROJECTIONS.len() >= 150);
    }

    #[test]
    fn test_projection_covers_core_groups() {
        let types: HashSet<&str> = FIELD_PROJECTIONS.iter().map(|r| r.message_type).collect();
        for expected in [
            "GPS", "ATT", "BAT", "CTUN", "NTUN", "IMU", "BARO", "RCIN", "RCOU", "VIBE",
        ] {
            assert!(types.contains(expected), "missing {}", expected);
        }
    }

    #[test]
    fn test_scaled_field_uses_row_scale() {
        use crate::types::FieldValue;
        let msg = LogMessage::new("CTUN", 1.0)
            .with_field("Alt", FieldValue::Int(1234))
            .with_field("Other", FieldValue::Int(7));
        assert_eq!(scaled_field(&msg, "Alt"), Some(12.34));
        assert_eq!(scaled_field(&msg, "Other"), Some(7.0));
        assert_eq!(scaled_field(&msg, "Missing"), None);
        assert!(projection_for("GPS", "Lat").is_some());
        assert!(projection_for("GPS", "Nope").is_none());
    }
}
