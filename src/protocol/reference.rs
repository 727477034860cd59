//! Code tables published for the controller's status registers.

use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{EnumIter, FromRepr};

/// Alarm level reported per zone.
///
/// The wire value of `Evacuate` is 3, while the label table the device
/// documentation ships with names code 2 "Evacuate". Both are kept as given;
/// `AlarmStatus::label_for` follows the label table, `from_code` the wire value.
#[repr(u16)]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, FromRepr, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum AlarmStatus {
    NoAlarm = 0,
    Leak = 1,
    Evacuate = 3,
}

impl AlarmStatus {
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn from_code(code: i32) -> Option<Self> {
        u16::try_from(code).ok().and_then(Self::from_repr)
    }

    pub fn label_for(code: i32) -> &'static str {
        match code {
            0 => "No Alarm",
            1 => "Leak",
            2 => "Evacuate",
            _ => "Unknown alarm status",
        }
    }
}

impl fmt::Display for AlarmStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlarmStatus::NoAlarm => write!(f, "No Alarm"),
            AlarmStatus::Leak => write!(f, "Leak"),
            AlarmStatus::Evacuate => write!(f, "Evacuate"),
        }
    }
}

#[repr(u16)]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, FromRepr, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum OperatingMode {
    Normal = 0,
    ZoneHold = 1,
    Diagnostic = 2,
    Service = 3,
}

impl OperatingMode {
    pub fn from_code(code: i32) -> Option<Self> {
        u16::try_from(code).ok().and_then(Self::from_repr)
    }

    pub fn label_for(code: i32) -> &'static str {
        Self::from_code(code)
            .map(Self::label)
            .unwrap_or("Unknown operating mode")
    }

    pub fn label(self) -> &'static str {
        match self {
            OperatingMode::Normal => "Normal",
            OperatingMode::ZoneHold => "Zone hold",
            OperatingMode::Diagnostic => "Diagnostic",
            OperatingMode::Service => "Service",
        }
    }
}

impl fmt::Display for OperatingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[repr(u16)]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, FromRepr, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum CurrentState {
    Idle = 0,
    Sampling = 1,
    Zeroing = 2,
    WarmUp = 3,
    PressureCheck = 4,
}

impl CurrentState {
    pub fn from_code(code: i32) -> Option<Self> {
        u16::try_from(code).ok().and_then(Self::from_repr)
    }

    pub fn label_for(code: i32) -> &'static str {
        Self::from_code(code)
            .map(Self::label)
            .unwrap_or("Unknown current state")
    }

    pub fn label(self) -> &'static str {
        match self {
            CurrentState::Idle => "Idle",
            CurrentState::Sampling => "Sampling",
            CurrentState::Zeroing => "Zeroing",
            CurrentState::WarmUp => "Warm up",
            CurrentState::PressureCheck => "Pressure check",
        }
    }
}

impl fmt::Display for CurrentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_alarm_wire_values() {
        assert_eq!(AlarmStatus::NoAlarm.code(), 0);
        assert_eq!(AlarmStatus::Leak.code(), 1);
        assert_eq!(AlarmStatus::Evacuate.code(), 3);
        assert_eq!(AlarmStatus::from_code(3), Some(AlarmStatus::Evacuate));
        assert_eq!(AlarmStatus::from_code(2), None);
        assert_eq!(AlarmStatus::from_code(-1), None);
    }

    #[test]
    fn test_alarm_label_table_is_kept_literal() {
        assert_eq!(AlarmStatus::label_for(0), "No Alarm");
        assert_eq!(AlarmStatus::label_for(1), "Leak");
        assert_eq!(AlarmStatus::label_for(2), "Evacuate");
        assert_eq!(AlarmStatus::label_for(3), "Unknown alarm status");
        assert_eq!(AlarmStatus::label_for(-1), "Unknown alarm status");
    }

    #[test]
    fn test_operating_mode_labels() {
        let labels: Vec<_> = OperatingMode::iter().map(|m| m.to_string()).collect();
        assert_eq!(labels, ["Normal", "Zone hold", "Diagnostic", "Service"]);
        assert_eq!(OperatingMode::label_for(1), "Zone hold");
        assert_eq!(OperatingMode::label_for(9), "Unknown operating mode");
    }

    #[test]
    fn test_current_state_codes() {
        for (code, state) in CurrentState::iter().enumerate() {
            assert_eq!(CurrentState::from_code(code as i32), Some(state));
        }
        assert_eq!(CurrentState::label_for(3), "Warm up");
        assert_eq!(CurrentState::label_for(5), "Unknown current state");
    }
}
