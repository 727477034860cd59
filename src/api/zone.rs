use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::protocol::reference::{AlarmStatus, CurrentState, OperatingMode};

/// Concentration and alarm level of one zone at the moment it was read.
///
/// Fields are fixed at construction; `captured_at` is taken when the record
/// is built, i.e. after the read completed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneStatus {
    zone: u8,
    ppm: i32,
    alarm_level: i32,
    captured_at: DateTime<Utc>,
}

impl ZoneStatus {
    pub const UNSET: i32 = -1;

    pub fn new(zone: u8, ppm: i32, alarm_level: i32) -> Self {
        Self {
            zone,
            ppm,
            alarm_level,
            captured_at: Utc::now(),
        }
    }

    /// A record for a zone nothing was read for yet.
    pub fn unset(zone: u8) -> Self {
        Self::new(zone, Self::UNSET, Self::UNSET)
    }

    /// Zero-based zone number.
    pub fn zone(&self) -> u8 {
        self.zone
    }

    /// One-based zone number as printed on the controller.
    pub fn display_zone(&self) -> u16 {
        u16::from(self.zone) + 1
    }

    pub fn ppm(&self) -> i32 {
        self.ppm
    }

    /// Raw alarm code; the leak and evacuate thresholds are set per zone.
    pub fn alarm_level(&self) -> i32 {
        self.alarm_level
    }

    pub fn alarm_status(&self) -> Option<AlarmStatus> {
        AlarmStatus::from_code(self.alarm_level)
    }

    pub fn alarm_label(&self) -> &'static str {
        AlarmStatus::label_for(self.alarm_level)
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }
}

/// Per-zone configuration read from the 3000 register bank.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneSetpoints {
    pub zone: u8,
    pub refrigerant_type: i32,
    pub leak_setpoint: i32,
    pub spill_setpoint: i32,
    pub evacuation_setpoint: i32,
    pub sample_distance: i32,
    pub alarm_acknowledged: Option<bool>,
}

/// Snapshot of every device-wide reading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceSummary {
    pub operating_mode: i32,
    pub current_state: i32,
    pub active_zone: i32,
    pub max_alarm: i32,
    pub active_alarm_count: i32,
    pub acknowledged_alarm_count: i32,
    pub fault_code_status: i32,
    pub fault_code: i32,
    pub audible_alarm: Option<bool>,
    pub silenced: Option<bool>,
    pub highest_concentration_zone: i32,
    pub highest_concentration: i32,
    pub zones_installed: i32,
    pub manifold_pressure: f64,
    pub ambient_pressure: f64,
    pub vacuum_pressure: f64,
    pub bench_temperature: f64,
    pub average_voltage: f64,
    pub zero_volts: f64,
    pub average_au: f64,
    pub bench_ppm: i32,
    pub alarm_acknowledged: Option<bool>,
    pub captured_at: DateTime<Utc>,
}

impl DeviceSummary {
    pub fn operating_mode_label(&self) -> &'static str {
        OperatingMode::label_for(self.operating_mode)
    }

    pub fn current_state_label(&self) -> &'static str {
        CurrentState::label_for(self.current_state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_zone_uses_sentinels() {
        let status = ZoneStatus::unset(4);
        assert_eq!(status.ppm(), -1);
        assert_eq!(status.alarm_level(), -1);
        assert_eq!(status.alarm_status(), None);
        assert_eq!(status.display_zone(), 5);
    }

    #[test]
    fn test_capture_time_is_construction_time() {
        let before = Utc::now();
        let status = ZoneStatus::new(0, 12, 1);
        let after = Utc::now();
        assert!(status.captured_at() >= before && status.captured_at() <= after);
        assert_eq!(status.alarm_status(), Some(AlarmStatus::Leak));
        assert_eq!(status.alarm_label(), "Leak");
    }

    #[test]
    fn test_serializes_to_json() {
        let status = ZoneStatus::new(2, 30, 1);
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["zone"], 2);
        assert_eq!(json["ppm"], 30);
        assert_eq!(json["alarm_level"], 1);
        assert!(json["captured_at"].is_string());
    }
}
