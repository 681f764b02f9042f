#[cfg(feature = "serde")]
use serde::Serialize;

/// Dashboard grouping of parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ParameterCategory {
    Gps,
    Attitude,
    Battery,
    Power,
    Altitude,
    Control,
    Navigation,
    Imu,
    Compass,
    RcInput,
    RcOutput,
    Vibration,
    Performance,
    Tuning,
    Airspeed,
    Esc,
    Sensors,
    Events,
    FlightDynamics,
}

/// Preferred chart rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ChartType {
    Line,
    Area,
    Step,
    Scatter,
}

/// Static reference record for one canonical parameter
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ParameterDefinition {
    pub name: &'static str,
    pub category: ParameterCategory,
    /// 1 is most important
    pub priority: u8,
    pub is_core: bool,
    pub chart_type: ChartType,
    pub unit: &'static str,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub decimals: u8,
}

impl ParameterDefinition {
    pub fn in_range(&self, value: f64) -> bool {
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value <= max)
    }
}

/// Display metadata for a category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct CategoryDefinition {
    pub category: ParameterCategory,
    pub key: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    pub sort_order: u8,
}

#[allow(clippy::too_many_arguments)]
const fn def(
    name: &'static str,
    category: ParameterCategory,
    priority: u8,
    is_core: bool,
    chart_type: ChartType,
    unit: &'static str,
    range: Option<(f64, f64)>,
    decimals: u8,
) -> ParameterDefinition {
    let (min, max) = match range {
        Some((lo, hi)) => (Some(lo), Some(hi)),
        None => (None, None),
    };
    ParameterDefinition {
        name,
        category,
        priority,
        is_core,
        chart_type,
        unit,
        min,
        max,
        decimals,
    }
}

use ChartType::*;
use ParameterCategory::*;

pub static PARAMETER_DEFINITIONS: &[ParameterDefinition] = &[
    // GPS
    def("gps_lat", Gps, 1, true, Line, "deg", Some((-90.0, 90.0)), 7),
    def("gps_lng", Gps, 1, true, Line, "deg", Some((-180.0, 180.0)), 7),
    def("gps_alt", Gps, 2, true, Line, "m", Some((-500.0, 10_000.0)), 1),
    def("gps_speed", Gps, 2, true, Line, "m/s", Some((0.0, 150.0)), 2),
    def("gps_course", Gps, 3, false, Line, "deg", Some((0.0, 360.0)), 1),
    def("gps_satellites", Gps, 2, true, Step, "count", Some((0.0, 64.0)), 0),
    def("gps_hdop", Gps, 2, true, Line, "dop", Some((0.0, 100.0)), 2),
    def("gps_vdop", Gps, 3, false, Line, "dop", Some((0.0, 100.0)), 2),
    def("gps_status", Gps, 3, false, Step, "fix", Some((0.0, 8.0)), 0),
    def("gps_vertical_speed", Gps, 4, false, Line, "m/s", None, 2),
    def("gps_horizontal_accuracy", Gps, 3, false, Line, "m", Some((0.0, 1000.0)), 2),
    def("gps_vertical_accuracy", Gps, 3, false, Line, "m", Some((0.0, 1000.0)), 2),
    // Attitude
    def("roll", Attitude, 1, true, Line, "deg", Some((-180.0, 180.0)), 2),
    def("pitch", Attitude, 1, true, Line, "deg", Some((-90.0, 90.0)), 2),
    def("yaw", Attitude, 1, true, Line, "deg", Some((0.0, 360.0)), 2),
    def("desired_roll", Attitude, 3, false, Line, "deg", Some((-180.0, 180.0)), 2),
    def("desired_pitch", Attitude, 3, false, Line, "deg", Some((-90.0, 90.0)), 2),
    def("desired_yaw", Attitude, 3, false, Line, "deg", Some((0.0, 360.0)), 2),
    // Battery and power
    def("battery_voltage", Battery, 1, true, Line, "V", Some((0.0, 100.0)), 2),
    def("battery_current", Battery, 1, true, Line, "A", Some((-10.0, 500.0)), 2),
    def("battery_consumed", Battery, 2, false, Area, "mAh", Some((0.0, 1_000_000.0)), 0),
    def("battery_remaining", Battery, 2, true, Area, "%", Some((0.0, 100.0)), 0),
    def("battery_temperature", Battery, 4, false, Line, "degC", Some((-40.0, 150.0)), 1),
    def("board_voltage", Power, 4, false, Line, "V", Some((0.0, 12.0)), 2),
    def("servo_voltage", Power, 4, false, Line, "V", Some((0.0, 20.0)), 2),
    // Altitude
    def("altitude", Altitude, 1, true, Area, "m", Some((-500.0, 10_000.0)), 1),
    def("desired_altitude", Altitude, 3, false, Line, "m", None, 1),
    def("baro_alt", Altitude, 2, true, Line, "m", Some((-500.0, 10_000.0)), 1),
    def("relative_altitude", Altitude, 2, false, Line, "m", None, 1),
    def("rangefinder_distance", Altitude, 3, false, Line, "m", Some((0.0, 100.0)), 2),
    // Control
    def("throttle_in", Control, 3, false, Line, "ratio", Some((0.0, 1.0)), 3),
    def("throttle_out", Control, 2, true, Line, "ratio", Some((0.0, 1.0)), 3),
    def("throttle_hover", Control, 4, false, Line, "ratio", Some((0.0, 1.0)), 3),
    // Navigation
    def("wp_distance", Navigation, 3, false, Line, "m", Some((0.0, 100_000.0)), 1),
    def("wp_bearing", Navigation, 4, false, Line, "deg", Some((-180.0, 360.0)), 1),
    // IMU
    def("gyro_x", Imu, 3, false, Line, "rad/s", None, 4),
    def("gyro_y", Imu, 3, false, Line, "rad/s", None, 4),
    def("gyro_z", Imu, 3, false, Line, "rad/s", None, 4),
    def("accel_x", Imu, 3, false, Line, "m/s/s", None, 3),
    def("accel_y", Imu, 3, false, Line, "m/s/s", None, 3),
    def("accel_z", Imu, 3, false, Line, "m/s/s", None, 3),
    // Compass
    def("mag_x", Compass, 4, false, Line, "mGauss", None, 0),
    def("mag_y", Compass, 4, false, Line, "mGauss", None, 0),
    def("mag_z", Compass, 4, false, Line, "mGauss", None, 0),
    // RC
    def("rc_in_1", RcInput, 3, false, Step, "us", Some((800.0, 2200.0)), 0),
    def("rc_in_2", RcInput, 3, false, Step, "us", Some((800.0, 2200.0)), 0),
    def("rc_in_3", RcInput, 3, false, Step, "us", Some((800.0, 2200.0)), 0),
    def("rc_in_4", RcInput, 3, false, Step, "us", Some((800.0, 2200.0)), 0),
    def("rc_out_1", RcOutput, 3, false, Line, "us", Some((800.0, 2200.0)), 0),
    def("rc_out_2", RcOutput, 3, false, Line, "us", Some((800.0, 2200.0)), 0),
    def("rc_out_3", RcOutput, 3, false, Line, "us", Some((800.0, 2200.0)), 0),
    def("rc_out_4", RcOutput, 3, false, Line, "us", Some((800.0, 2200.0)), 0),
    // Vibration
    def("vibe_x", Vibration, 2, true, Line, "m/s/s", Some((0.0, 100.0)), 2),
    def("vibe_y", Vibration, 2, true, Line, "m/s/s", Some((0.0, 100.0)), 2),
    def("vibe_z", Vibration, 2, true, Line, "m/s/s", Some((0.0, 100.0)), 2),
    def("vibe_clip_0", Vibration, 3, false, Step, "count", None, 0),
    // Performance
    def("cpu_load", Performance, 3, false, Line, "%", Some((0.0, 100.0)), 1),
    def("pm_max_loop_time", Performance, 4, false, Line, "us", None, 0),
    def("free_memory", Performance, 4, false, Line, "bytes", None, 0),
    // Airspeed and ESC
    def("airspeed", Airspeed, 2, false, Line, "m/s", Some((0.0, 150.0)), 2),
    def("esc_rpm", Esc, 3, false, Line, "rpm", Some((0.0, 100_000.0)), 0),
    def("esc_voltage", Esc, 4, false, Line, "V", Some((0.0, 100.0)), 2),
    def("esc_current", Esc, 4, false, Line, "A", Some((-10.0, 300.0)), 2),
    def("esc_temperature", Esc, 4, false, Line, "degC", Some((-40.0, 200.0)), 1),
    // Sensors
    def("baro_pressure", Sensors, 4, false, Line, "Pa", Some((0.0, 120_000.0)), 0),
    def("baro_temperature", Sensors, 4, false, Line, "degC", Some((-40.0, 100.0)), 1),
    def("optical_flow_quality", Sensors, 4, false, Line, "quality", Some((0.0, 255.0)), 0),
    def("temperature", Sensors, 4, false, Line, "degC", None, 1),
    // Events
    def("error_code", Events, 3, false, Scatter, "code", None, 0),
    def("event_id", Events, 3, false, Scatter, "code", None, 0),
    def("flight_mode_number", Events, 2, false, Step, "mode", None, 0),
    // Derived flight dynamics
    def("ground_speed", FlightDynamics, 1, true, Line, "m/s", Some((0.0, 150.0)), 2),
    def("climb_rate", FlightDynamics, 2, true, Line, "m/s", Some((0.0, 100.0)), 2),
    def("descent_rate", FlightDynamics, 2, true, Line, "m/s", Some((0.0, 100.0)), 2),
    def("vertical_speed", FlightDynamics, 2, true, Line, "m/s", Some((-100.0, 100.0)), 2),
    def("turn_rate", FlightDynamics, 2, false, Line, "deg/s", Some((0.0, 1000.0)), 1),
    def("yaw_rate", FlightDynamics, 3, false, Line, "deg/s", Some((-1000.0, 1000.0)), 1),
    def("power", FlightDynamics, 2, true, Area, "W", Some((0.0, 20_000.0)), 1),
    def("battery_remaining_estimate", FlightDynamics, 2, false, Area, "%", Some((0.0, 100.0)), 0),
];

pub static CATEGORY_DEFINITIONS: &[CategoryDefinition] = &[
    CategoryDefinition {
        category: Gps,
        key: "gps",
        display_name: "GPS",
        description: "Position, fix quality and satellite geometry",
        sort_order: 1,
    },
    CategoryDefinition {
        category: Attitude,
        key: "attitude",
        display_name: "Attitude",
        description: "Vehicle orientation and attitude targets",
        sort_order: 2,
    },
    CategoryDefinition {
        category: Altitude,
        key: "altitude",
        display_name: "Altitude",
        description: "Barometric, GPS and estimated altitude",
        sort_order: 3,
    },
    CategoryDefinition {
        category: Battery,
        key: "battery",
        display_name: "Battery",
        description: "Pack voltage, current and consumption",
        sort_order: 4,
    },
    CategoryDefinition {
        category: FlightDynamics,
        key: "flight_dynamics",
        display_name: "Flight Dynamics",
        description: "Values derived from logged parameters",
        sort_order: 5,
    },
    CategoryDefinition {
        category: Power,
        key: "power",
        display_name: "Power",
        description: "Board and servo rail supply",
        sort_order: 6,
    },
    CategoryDefinition {
        category: Control,
        key: "control",
        display_name: "Control",
        description: "Throttle and control tuning",
        sort_order: 7,
    },
    CategoryDefinition {
        category: Navigation,
        key: "navigation",
        display_name: "Navigation",
        description: "Waypoint and position controller state",
        sort_order: 8,
    },
    CategoryDefinition {
        category: Vibration,
        key: "vibration",
        display_name: "Vibration",
        description: "Accelerometer vibration levels and clipping",
        sort_order: 9,
    },
    CategoryDefinition {
        category: Imu,
        key: "imu",
        display_name: "IMU",
        description: "Raw gyroscope and accelerometer",
        sort_order: 10,
    },
    CategoryDefinition {
        category: Compass,
        key: "compass",
        display_name: "Compass",
        description: "Magnetometer field and offsets",
        sort_order: 11,
    },
    CategoryDefinition {
        category: RcInput,
        key: "rc_input",
        display_name: "RC Input",
        description: "Receiver channel pulse widths",
        sort_order: 12,
    },
    CategoryDefinition {
        category: RcOutput,
        key: "rc_output",
        display_name: "RC Output",
        description: "Servo and motor outputs",
        sort_order: 13,
    },
    CategoryDefinition {
        category: Tuning,
        key: "tuning",
        display_name: "Tuning",
        description: "Rate controller, PID and autotune state",
        sort_order: 14,
    },
    CategoryDefinition {
        category: Performance,
        key: "performance",
        display_name: "Performance",
        description: "Scheduler load and memory",
        sort_order: 15,
    },
    CategoryDefinition {
        category: Airspeed,
        key: "airspeed",
        display_name: "Airspeed",
        description: "Pitot airspeed sensor",
        sort_order: 16,
    },
    CategoryDefinition {
        category: Esc,
        key: "esc",
        display_name: "ESC",
        description: "Electronic speed controller telemetry",
        sort_order: 17,
    },
    CategoryDefinition {
        category: Sensors,
        key: "sensors",
        display_name: "Sensors",
        description: "Barometer, flow, rangefinder and temperature",
        sort_order: 18,
    },
    CategoryDefinition {
        category: Events,
        key: "events",
        display_name: "Events",
        description: "Errors, events and mode changes",
        sort_order: 19,
    },
];
