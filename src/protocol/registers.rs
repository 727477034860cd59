//! Register layout of the controller.
//!
//! Every reading is one entry in `REGISTER_MAP`; entries are listed in the
//! same order as the `Reading` variants so a lookup is an index.

use serde::Serialize;
use strum::EnumIter;

use super::{
    decode::Decode::{self, Int, OptionalBool, Scaled},
    modbus::FunctionCode::{self, ReadHoldings, ReadInputs},
};
use crate::api::error::{Error, Result};

/// Number of sampling zones a controller can have installed.
pub const ZONE_COUNT: u8 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Reading {
    OperatingMode,
    ZonePpm,
    ZoneAlarm,
    CurrentState,
    ActiveZone,
    MaxAlarm,
    ActiveAlarmCount,
    AcknowledgedAlarmCount,
    FaultCodeStatus,
    FaultCode,
    AudibleAlarm,
    Silenced,
    HighestConcentrationZone,
    HighestConcentration,
    ZonesInstalled,
    ManifoldPressure,
    AmbientPressure,
    VacuumPressure,
    BenchTemperature,
    AverageVoltage,
    ZeroVolts,
    AverageAu,
    BenchPpm,
    AlarmAcknowledge,
    RefrigerantType,
    LeakSetpoint,
    SpillSetpoint,
    EvacuationSetpoint,
    SampleDistance,
    ZoneAlarmAcknowledge,
}

impl Reading {
    pub fn spec(self) -> &'static RegisterSpec {
        &REGISTER_MAP[self as usize]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterSpec {
    pub reading: Reading,
    pub name: &'static str,
    /// Register address, or the address of zone 0 for per-zone readings.
    pub address: u16,
    pub function: FunctionCode,
    pub decode: Decode,
    pub per_zone: bool,
}

impl RegisterSpec {
    const fn device(
        reading: Reading,
        name: &'static str,
        address: u16,
        decode: Decode,
    ) -> Self {
        Self {
            reading,
            name,
            address,
            function: FunctionCode::ReadHoldings,
            decode,
            per_zone: false,
        }
    }

    const fn zone(
        reading: Reading,
        name: &'static str,
        address: u16,
        function: FunctionCode,
        decode: Decode,
    ) -> Self {
        Self {
            reading,
            name,
            address,
            function,
            decode,
            per_zone: true,
        }
    }

    /// Resolve the register to read. Per-zone entries need a zone in 0..16,
    /// device-wide entries must not be given one.
    pub fn address_for(&self, zone: Option<u8>) -> Result<u16> {
        match (self.per_zone, zone) {
            (true, Some(zone)) => Ok(self.address + u16::from(validate_zone(zone)?)),
            (false, None) => Ok(self.address),
            (true, None) => Err(Error::InvalidArgument(format!(
                "{} is read per zone and needs a zone number",
                self.name
            ))),
            (false, Some(_)) => Err(Error::InvalidArgument(format!(
                "{} is a device-wide reading and takes no zone number",
                self.name
            ))),
        }
    }
}

pub fn validate_zone(zone: u8) -> Result<u8> {
    if zone < ZONE_COUNT {
        Ok(zone)
    } else {
        Err(Error::invalid_zone(zone))
    }
}

pub static REGISTER_MAP: [RegisterSpec; 30] = [
    RegisterSpec::device(Reading::OperatingMode, "operating_mode", 2000, Int),
    RegisterSpec::zone(Reading::ZonePpm, "zone_ppm", 2001, ReadHoldings, Int),
    RegisterSpec::zone(Reading::ZoneAlarm, "zone_alarm", 2017, ReadHoldings, Int),
    RegisterSpec::device(Reading::CurrentState, "current_state", 2033, Int),
    RegisterSpec::device(Reading::ActiveZone, "active_zone", 2034, Int),
    RegisterSpec::device(Reading::MaxAlarm, "max_alarm", 2035, Int),
    RegisterSpec::device(Reading::ActiveAlarmCount, "active_alarm_count", 2036, Int),
    RegisterSpec::device(
        Reading::AcknowledgedAlarmCount,
        "acknowledged_alarm_count",
        2037,
        Int,
    ),
    RegisterSpec::device(Reading::FaultCodeStatus, "fault_code_status", 2038, Int),
    RegisterSpec::device(Reading::FaultCode, "fault_code", 2039, Int),
    RegisterSpec::device(Reading::AudibleAlarm, "audible_alarm", 2040, OptionalBool),
    RegisterSpec::device(Reading::Silenced, "silenced", 2041, OptionalBool),
    RegisterSpec::device(
        Reading::HighestConcentrationZone,
        "highest_concentration_zone",
        2042,
        Int,
    ),
    RegisterSpec::device(
        Reading::HighestConcentration,
        "highest_concentration",
        2043,
        Int,
    ),
    RegisterSpec::device(Reading::ZonesInstalled, "zones_installed", 2044, Int),
    RegisterSpec::device(Reading::ManifoldPressure, "manifold_pressure", 2045, Scaled(100)),
    RegisterSpec::device(Reading::AmbientPressure, "ambient_pressure", 2046, Scaled(100)),
    RegisterSpec::device(Reading::VacuumPressure, "vacuum_pressure", 2047, Scaled(100)),
    RegisterSpec::device(Reading::BenchTemperature, "bench_temperature", 2048, Scaled(100)),
    RegisterSpec::device(Reading::AverageVoltage, "average_voltage", 2049, Scaled(1000)),
    RegisterSpec::device(Reading::ZeroVolts, "zero_volts", 2050, Scaled(1000)),
    RegisterSpec::device(Reading::AverageAu, "average_au", 2051, Scaled(10000)),
    RegisterSpec::device(Reading::BenchPpm, "bench_ppm", 2052, Int),
    RegisterSpec::device(Reading::AlarmAcknowledge, "alarm_acknowledge", 2053, OptionalBool),
    RegisterSpec::zone(Reading::RefrigerantType, "refrigerant_type", 3001, ReadInputs, Int),
    RegisterSpec::zone(Reading::LeakSetpoint, "leak_setpoint", 3017, ReadInputs, Int),
    RegisterSpec::zone(Reading::SpillSetpoint, "spill_setpoint", 3033, ReadInputs, Int),
    RegisterSpec::zone(
        Reading::EvacuationSetpoint,
        "evacuation_setpoint",
        3049,
        ReadInputs,
        Int,
    ),
    RegisterSpec::zone(Reading::SampleDistance, "sample_distance", 3065, ReadInputs, Int),
    RegisterSpec::zone(
        Reading::ZoneAlarmAcknowledge,
        "zone_alarm_acknowledge",
        3081,
        ReadInputs,
        OptionalBool,
    ),
];
