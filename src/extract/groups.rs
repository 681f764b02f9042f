use crate::types::LogMessage;
use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::Serialize;

/// Semantic grouping of decoded message types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum MessageGroup {
    Gps,
    GpsAccuracy,
    Attitude,
    Battery,
    Power,
    VoltageMonitor,
    ControlTuning,
    NavigationTuning,
    Imu,
    Barometer,
    Magnetometer,
    RcInput,
    RcOutput,
    Vibration,
    Performance,
    AutoTune,
    Rate,
    PidRoll,
    PidPitch,
    PidYaw,
    Airspeed,
    Esc,
    OpticalFlow,
    RangeFinder,
    Temperature,
    Position,
    Errors,
    Events,
    Modes,
    TextMessages,
}

impl MessageGroup {
    pub const ALL: [MessageGroup; 30] = [
        MessageGroup::Gps,
        MessageGroup::GpsAccuracy,
        MessageGroup::Attitude,
        MessageGroup::Battery,
        MessageGroup::Power,
        MessageGroup::VoltageMonitor,
        MessageGroup::ControlTuning,
        MessageGroup::NavigationTuning,
        MessageGroup::Imu,
        MessageGroup::Barometer,
        MessageGroup::Magnetometer,
        MessageGroup::RcInput,
        MessageGroup::RcOutput,
        MessageGroup::Vibration,
        MessageGroup::Performance,
        MessageGroup::AutoTune,
        MessageGroup::Rate,
        MessageGroup::PidRoll,
        MessageGroup::PidPitch,
        MessageGroup::PidYaw,
        MessageGroup::Airspeed,
        MessageGroup::Esc,
        MessageGroup::OpticalFlow,
        MessageGroup::RangeFinder,
        MessageGroup::Temperature,
        MessageGroup::Position,
        MessageGroup::Errors,
        MessageGroup::Events,
        MessageGroup::Modes,
        MessageGroup::TextMessages,
    ];

    /// Message type names collected into this group
    pub fn message_types(self) -> &'static [&'static str] {
        match self {
            MessageGroup::Gps => &["GPS"],
            MessageGroup::GpsAccuracy => &["GPA"],
            MessageGroup::Attitude => &["ATT"],
            MessageGroup::Battery => &["BAT", "CURR"],
            MessageGroup::Power => &["POWR"],
            MessageGroup::VoltageMonitor => &["MCU"],
            MessageGroup::ControlTuning => &["CTUN"],
            MessageGroup::NavigationTuning => &["NTUN"],
            MessageGroup::Imu => &["IMU"],
            MessageGroup::Barometer => &["BARO"],
            MessageGroup::Magnetometer => &["MAG"],
            MessageGroup::RcInput => &["RCIN"],
            MessageGroup::RcOutput => &["RCOU"],
            MessageGroup::Vibration => &["VIBE"],
            MessageGroup::Performance => &["PM"],
            MessageGroup::AutoTune => &["ATUN"],
            MessageGroup::Rate => &["RATE"],
            MessageGroup::PidRoll => &["PIDR"],
            MessageGroup::PidPitch => &["PIDP"],
            MessageGroup::PidYaw => &["PIDY"],
            MessageGroup::Airspeed => &["ARSP"],
            MessageGroup::Esc => &["ESC"],
            MessageGroup::OpticalFlow => &["OF"],
            MessageGroup::RangeFinder => &["RFND"],
            MessageGroup::Temperature => &["TEMP"],
            MessageGroup::Position => &["POS"],
            MessageGroup::Errors => &["ERR"],
            MessageGroup::Events => &["EV"],
            MessageGroup::Modes => &["MODE"],
            MessageGroup::TextMessages => &["MSG"],
        }
    }

    pub fn for_message_type(message_type: &str) -> Option<MessageGroup> {
        MessageGroup::ALL
            .into_iter()
            .find(|group| group.message_types().contains(&message_type))
    }
}

/// Decoded messages in log order, indexed by semantic group.
#[derive(Debug, Clone, Default)]
pub struct MessageGroups {
    messages: Vec<LogMessage>,
    indices: BTreeMap<MessageGroup, Vec<usize>>,
}

impl MessageGroups {
    /// Messages of one group, in log order
    pub fn get(&self, group: MessageGroup) -> impl Iterator<Item = &LogMessage> + '_ {
        self.indices
            .get(&group)
            .into_iter()
            .flatten()
            .map(move |&i| &self.messages[i])
    }

    /// Messages of several groups merged back into log order
    pub fn merged(&self, groups: &[MessageGroup]) -> Vec<&LogMessage> {
        let mut indices: Vec<usize> = groups
            .iter()
            .filter_map(|g| self.indices.get(g))
            .flatten()
            .copied()
            .collect();
        indices.sort_unstable();
        indices.into_iter().map(|i| &self.messages[i]).collect()
    }

    pub fn count(&self, group: MessageGroup) -> usize {
        self.indices.get(&group).map_or(0, Vec::len)
    }

    /// Groups that received at least one message
    pub fn present_groups(&self) -> impl Iterator<Item = MessageGroup> + '_ {
        self.indices.keys().copied()
    }

    /// Every message, grouped or not
    pub fn all(&self) -> &[LogMessage] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Partition messages by semantic group, keeping the full ordered sequence.
///
/// Messages with no group stay in [`MessageGroups::all`] and still count
/// towards the flight duration.
pub fn partition_messages(messages: Vec<LogMessage>) -> MessageGroups {
    let mut indices: BTreeMap<MessageGroup, Vec<usize>> = BTreeMap::new();
    for (i, message) in messages.iter().enumerate() {
        if let Some(group) = MessageGroup::for_message_type(&message.message_type) {
            indices.entry(group).or_default().push(i);
        }
    }
    MessageGroups { messages, indices }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_group_has_distinct_types() {
        let mut seen = std::collections::HashSet::new();
        for group in MessageGroup::ALL {
            for ty in group.message_types() {
                assert!(seen.insert(*ty), "{} assigned twice", ty);
            }
        }
    }

    #[test]
    fn test_partition_preserves_order_and_ungrouped_messages() {
        let messages = vec![
            LogMessage::new("BAT", 1.0),
            LogMessage::new("GPS", 1.5),
            LogMessage::new("XKF1", 1.7),
            LogMessage::new("CURR", 2.0),
            LogMessage::new("POWR", 2.5),
        ];
        let groups = partition_messages(messages);
        assert_eq!(groups.all().len(), 5);
        assert_eq!(groups.count(MessageGroup::Battery), 2);
        assert_eq!(groups.count(MessageGroup::Gps), 1);
        assert_eq!(groups.count(MessageGroup::Imu), 0);

        let merged: Vec<&str> = groups
            .merged(&[MessageGroup::Power, MessageGroup::Battery])
            .iter()
            .map(|m| m.message_type.as_str())
            .collect();
        assert_eq!(merged, vec!["BAT", "CURR", "POWR"]);
    }

    #[test]
    fn test_lookup_by_type() {
        assert_eq!(MessageGroup::for_message_type("PIDY"), Some(MessageGroup::PidYaw));
        assert_eq!(MessageGroup::for_message_type("XKF1"), None);
    }
}
