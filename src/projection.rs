//! Projection of decoded message fields onto canonical time series
//!
//! Each `{message type, field}` listed in [`FIELD_PROJECTIONS`] becomes one
//! [`TimeSeriesPoint`] per message, scaled into its canonical unit. Points
//! that fail the validation gate are dropped and counted.

use crate::extract::{MessageGroup, MessageGroups};
use crate::filters::is_valid_point;
use crate::params::{FieldProjection, FIELD_PROJECTIONS};
use crate::types::{LogMessage, TimeSeriesPoint};
use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::{debug, trace};

/// Output of the projection stage, unsorted
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectedSeries {
    pub points: Vec<TimeSeriesPoint>,
    /// Candidates dropped by the validation gate
    pub rejected: u64,
}

fn rows_by_message_type() -> &'static HashMap<&'static str, Vec<&'static FieldProjection>> {
    static ROWS: OnceLock<HashMap<&'static str, Vec<&'static FieldProjection>>> = OnceLock::new();
    ROWS.get_or_init(|| {
        let mut rows: HashMap<&'static str, Vec<&'static FieldProjection>> = HashMap::new();
        for row in FIELD_PROJECTIONS {
            rows.entry(row.message_type).or_default().push(row);
        }
        rows
    })
}

/// Project one message; returns the number of rejected candidates
fn project_message(message: &LogMessage, out: &mut Vec<TimeSeriesPoint>) -> u64 {
    let Some(rows) = rows_by_message_type().get(message.message_type.as_str()) else {
        return 0;
    };

    let mut rejected = 0;
    for row in rows {
        // Absent or text-valued fields are not candidates
        let Some(value) = message.get(row.field).and_then(|v| row.scale.apply(v)) else {
            continue;
        };
        let point = TimeSeriesPoint::new(row.parameter, message.timestamp_seconds, value, row.unit);
        if is_valid_point(&point) {
            out.push(point);
        } else {
            trace!(
                "Rejected {}.{} -> {} = {} at {}",
                message.message_type,
                row.field,
                row.parameter,
                value,
                message.timestamp_seconds
            );
            rejected += 1;
        }
    }
    rejected
}

/// Project every grouped message into canonical points.
///
/// Groups are visited in [`MessageGroup::ALL`] order and messages in log
/// order, so the output order is a pure function of the input.
pub fn project_parameters(groups: &MessageGroups) -> ProjectedSeries {
    let mut projected = ProjectedSeries::default();
    for group in MessageGroup::ALL {
        for message in groups.get(group) {
            projected.rejected += project_message(message, &mut projected.points);
        }
    }
    debug!(
        "Projected {} points ({} rejected)",
        projected.points.len(),
        projected.rejected
    );
    projected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::partition_messages;
    use crate::types::FieldValue;

    fn project(messages: Vec<LogMessage>) -> ProjectedSeries {
        project_parameters(&partition_messages(messages))
    }

    fn value_of(projected: &ProjectedSeries, parameter: &str) -> Option<f64> {
        projected
            .points
            .iter()
            .find(|p| p.parameter == parameter)
            .map(|p| p.value)
    }

    #[test]
    fn test_fixed_point_gps_latitude() {
        let projected = project(vec![LogMessage::new("GPS", 1.0)
            .with_field("Lat", FieldValue::Int(377749000))
            .with_field("Lng", FieldValue::Int(-1224194000))]);
        let lat = value_of(&projected, "gps_lat").unwrap();
        assert!((lat - 37.7749).abs() < 1e-9);
        let lng = value_of(&projected, "gps_lng").unwrap();
        assert!((lng + 122.4194).abs() < 1e-9);
        assert!(projected.points.iter().all(|p| p.unit == "deg"));
    }

    #[test]
    fn test_attitude_and_battery_scaling() {
        let projected = project(vec![
            LogMessage::new("ATT", 2.0)
                .with_field("Roll", FieldValue::Int(-1250))
                .with_field("Pitch", FieldValue::Float(3.5)),
            LogMessage::new("BAT", 2.0)
                .with_field("Volt", FieldValue::Int(1680))
                .with_field("Curr", FieldValue::Int(1234)),
        ]);
        assert_eq!(value_of(&projected, "roll"), Some(-12.5));
        // Float fields are already in degrees
        assert_eq!(value_of(&projected, "pitch"), Some(3.5));
        assert_eq!(value_of(&projected, "battery_voltage"), Some(16.8));
        assert_eq!(value_of(&projected, "battery_current"), Some(12.34));
    }

    #[test]
    fn test_non_finite_values_are_rejected_silently() {
        let projected = project(vec![LogMessage::new("ATT", 1.0)
            .with_field("Roll", FieldValue::Float(f64::NAN))
            .with_field("Yaw", FieldValue::Float(90.0))]);
        assert_eq!(projected.rejected, 1);
        assert_eq!(projected.points.len(), 1);
        assert_eq!(projected.points[0].parameter, "yaw");
    }

    #[test]
    fn test_unknown_types_and_text_fields_are_ignored() {
        let projected = project(vec![
            LogMessage::new("XKF1", 1.0).with_field("Roll", FieldValue::Float(1.0)),
            LogMessage::new("GPS", 1.0).with_field("Lat", FieldValue::Text("n/a".into())),
        ]);
        assert!(projected.points.is_empty());
        assert_eq!(projected.rejected, 0);
    }

    #[test]
    fn test_projection_is_deterministic() {
        let messages = vec![
            LogMessage::new("BAT", 1.0).with_field("Volt", FieldValue::Float(16.0)),
            LogMessage::new("ATT", 1.0).with_field("Roll", FieldValue::Float(1.0)),
            LogMessage::new("BAT", 2.0).with_field("Volt", FieldValue::Float(15.9)),
        ];
        assert_eq!(project(messages.clone()), project(messages));
    }
}
