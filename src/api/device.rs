//! Typed accessors for one controller.
//!
//! Every accessor blocks for one serial round trip (two for the bulk zone
//! read). Errors fall in two groups:
//!
//! - `Error::InvalidArgument` comes from input validation (zone outside
//!   0-15) and is returned before any I/O.
//! - `Error::Transport` and `Error::Protocol` come from the read itself and
//!   are passed through unchanged.

use chrono::Utc;
use parking_lot::Mutex;
use std::sync::Arc;

use super::{
    config::DeviceConfig,
    error::{Error, Result},
    session::Session,
    zone::{DeviceSummary, ZoneSetpoints, ZoneStatus},
};
use crate::protocol::{
    decode::{as_int, as_optional_bool, as_scaled_decimal, DecodedValue},
    registers::{validate_zone, Reading, ZONE_COUNT},
    transport::{Connector, SerialConnector},
};

/// A device shared between threads. The mutex serializes requests on the wire.
pub type SharedDevice<C = SerialConnector> = Arc<Mutex<MultiZoneDevice<C>>>;

/// One multi-zone gas-detection controller on a Modbus RTU line.
pub struct MultiZoneDevice<C: Connector = SerialConnector> {
    station_id: u8,
    session: Session<C>,
}

impl MultiZoneDevice<SerialConnector> {
    /// Device on a serial port at the default 19200 baud.
    pub fn new(station_id: u8, port_name: &str) -> Result<Self> {
        Self::from_config(DeviceConfig::new(station_id, port_name))
    }

    pub fn from_config(config: DeviceConfig) -> Result<Self> {
        Self::with_connector(config, SerialConnector)
    }
}

impl<C: Connector> MultiZoneDevice<C> {
    /// Build a device that opens its link through `connector`.
    ///
    /// No connection is made here; the first read opens it.
    pub fn with_connector(config: DeviceConfig, connector: C) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            station_id: config.station_id,
            session: Session::new(config, connector),
        })
    }

    pub fn station_id(&self) -> u8 {
        self.station_id
    }

    pub fn config(&self) -> &DeviceConfig {
        self.session.config()
    }

    pub fn is_connected(&self) -> bool {
        self.session.is_connected()
    }

    /// Open the serial link if it is not open yet.
    pub fn ensure_connected(&mut self) -> Result<()> {
        self.session.ensure_connected().map(|_| ())
    }

    /// Close the serial link. Safe to call when already closed; the next
    /// read reconnects.
    pub fn disconnect(&mut self) {
        self.session.disconnect();
    }

    pub fn into_shared(self) -> SharedDevice<C> {
        Arc::new(Mutex::new(self))
    }

    fn read_word(&mut self, reading: Reading, zone: Option<u8>) -> Result<u16> {
        let spec = reading.spec();
        let address = spec.address_for(zone)?;
        let words = self
            .session
            .read_words(self.station_id, address, 1, spec.function)?;
        let word = words.first().copied().ok_or_else(|| {
            Error::Protocol(format!("Empty response reading {}", spec.name))
        })?;
        log::trace!("{} @ {} = {}", spec.name, address, word);
        Ok(word)
    }

    fn read_int(&mut self, reading: Reading, zone: Option<u8>) -> Result<i32> {
        self.read_word(reading, zone).map(as_int)
    }

    fn read_scaled(&mut self, reading: Reading) -> Result<f64> {
        let divisor = reading.spec().decode.divisor();
        self.read_word(reading, None)
            .map(|word| as_scaled_decimal(word, divisor))
    }

    fn read_flag(&mut self, reading: Reading, zone: Option<u8>) -> Result<Option<bool>> {
        self.read_word(reading, zone).map(as_optional_bool)
    }

    /// Read any entry of the register map and decode it by its table rule.
    ///
    /// `zone` must be given for per-zone readings and omitted otherwise,
    /// anything else is `InvalidArgument`. Read errors: `Transport`, `Protocol`.
    pub fn read_value(&mut self, reading: Reading, zone: Option<u8>) -> Result<DecodedValue> {
        let decode = reading.spec().decode;
        self.read_word(reading, zone).map(|word| decode.apply(word))
    }

    /// Current ppm and alarm level of a single zone (0-15).
    ///
    /// Validation errors: `InvalidArgument`. Read errors: `Transport`, `Protocol`.
    pub fn current_zone_status(&mut self, zone: u8) -> Result<ZoneStatus> {
        let zone = validate_zone(zone)?;
        let ppm = self.read_int(Reading::ZonePpm, Some(zone))?;
        let alarm_level = self.read_int(Reading::ZoneAlarm, Some(zone))?;
        Ok(ZoneStatus::new(zone, ppm, alarm_level))
    }

    /// Status of all sixteen zones from two bulk reads, in ascending zone order.
    ///
    /// Zones beyond the installed count are returned as the device reports
    /// them. Read errors: `Transport`, `Protocol`.
    pub fn all_current_zone_statuses(&mut self) -> Result<Vec<ZoneStatus>> {
        let ppm_spec = Reading::ZonePpm.spec();
        let alarm_spec = Reading::ZoneAlarm.spec();
        let count = u16::from(ZONE_COUNT);

        let ppm = self.session.read_words(
            self.station_id,
            ppm_spec.address_for(Some(0))?,
            count,
            ppm_spec.function,
        )?;
        let alarms = self.session.read_words(
            self.station_id,
            alarm_spec.address_for(Some(0))?,
            count,
            alarm_spec.function,
        )?;
        if ppm.len() != count as usize || alarms.len() != count as usize {
            return Err(Error::Protocol(format!(
                "Expected {} zone words, got {} ppm and {} alarm words",
                count,
                ppm.len(),
                alarms.len()
            )));
        }

        Ok(ppm
            .into_iter()
            .zip(alarms)
            .zip(0u8..)
            .map(|((ppm, alarm), zone)| ZoneStatus::new(zone, as_int(ppm), as_int(alarm)))
            .collect())
    }

    /// Raw operating mode code, see `OperatingMode`.
    ///
    /// Read errors: `Transport`, `Protocol`.
    pub fn operating_mode(&mut self) -> Result<i32> {
        self.read_int(Reading::OperatingMode, None)
    }

    /// Raw current state code, see `CurrentState`.
    ///
    /// Read errors: `Transport`, `Protocol`.
    pub fn current_state(&mut self) -> Result<i32> {
        self.read_int(Reading::CurrentState, None)
    }

    /// Zone the sampler is currently drawing from.
    ///
    /// Read errors: `Transport`, `Protocol`.
    pub fn active_zone(&mut self) -> Result<i32> {
        self.read_int(Reading::ActiveZone, None)
    }

    /// Highest alarm code across all zones, see `AlarmStatus`.
    ///
    /// Read errors: `Transport`, `Protocol`.
    pub fn max_alarm(&mut self) -> Result<i32> {
        self.read_int(Reading::MaxAlarm, None)
    }

    /// Number of zones currently in alarm.
    ///
    /// Read errors: `Transport`, `Protocol`.
    pub fn active_alarm_count(&mut self) -> Result<i32> {
        self.read_int(Reading::ActiveAlarmCount, None)
    }

    /// Number of alarms that have been acknowledged.
    ///
    /// Read errors: `Transport`, `Protocol`.
    pub fn acknowledged_alarm_count(&mut self) -> Result<i32> {
        self.read_int(Reading::AcknowledgedAlarmCount, None)
    }

    /// Read errors: `Transport`, `Protocol`.
    pub fn fault_code_status(&mut self) -> Result<i32> {
        self.read_int(Reading::FaultCodeStatus, None)
    }

    /// Read errors: `Transport`, `Protocol`.
    pub fn fault_code(&mut self) -> Result<i32> {
        self.read_int(Reading::FaultCode, None)
    }

    /// `None` when the device reports a code other than 0 or 1.
    ///
    /// Read errors: `Transport`, `Protocol`.
    pub fn is_audible_alarm(&mut self) -> Result<Option<bool>> {
        self.read_flag(Reading::AudibleAlarm, None)
    }

    /// `None` when the device reports a code other than 0 or 1.
    ///
    /// Read errors: `Transport`, `Protocol`.
    pub fn is_silenced(&mut self) -> Result<Option<bool>> {
        self.read_flag(Reading::Silenced, None)
    }

    /// Read errors: `Transport`, `Protocol`.
    pub fn highest_concentration_zone(&mut self) -> Result<i32> {
        self.read_int(Reading::HighestConcentrationZone, None)
    }

    /// Highest concentration seen, in ppm.
    ///
    /// Read errors: `Transport`, `Protocol`.
    pub fn highest_concentration(&mut self) -> Result<i32> {
        self.read_int(Reading::HighestConcentration, None)
    }

    /// Read errors: `Transport`, `Protocol`.
    pub fn zones_installed(&mut self) -> Result<i32> {
        self.read_int(Reading::ZonesInstalled, None)
    }

    /// Manifold pressure, hundredths on the wire.
    ///
    /// Read errors: `Transport`, `Protocol`.
    pub fn manifold_pressure(&mut self) -> Result<f64> {
        self.read_scaled(Reading::ManifoldPressure)
    }

    /// Read errors: `Transport`, `Protocol`.
    pub fn ambient_pressure(&mut self) -> Result<f64> {
        self.read_scaled(Reading::AmbientPressure)
    }

    /// Read errors: `Transport`, `Protocol`.
    pub fn vacuum_pressure(&mut self) -> Result<f64> {
        self.read_scaled(Reading::VacuumPressure)
    }

    /// Bench temperature, hundredths on the wire.
    ///
    /// Read errors: `Transport`, `Protocol`.
    pub fn bench_temperature(&mut self) -> Result<f64> {
        self.read_scaled(Reading::BenchTemperature)
    }

    /// Read errors: `Transport`, `Protocol`.
    pub fn average_voltage(&mut self) -> Result<f64> {
        self.read_scaled(Reading::AverageVoltage)
    }

    /// Zero voltage, thousandths on the wire.
    ///
    /// Read errors: `Transport`, `Protocol`.
    pub fn zero_volts(&mut self) -> Result<f64> {
        self.read_scaled(Reading::ZeroVolts)
    }

    /// Average absorbance, ten-thousandths on the wire.
    ///
    /// Read errors: `Transport`, `Protocol`.
    pub fn average_au(&mut self) -> Result<f64> {
        self.read_scaled(Reading::AverageAu)
    }

    /// Read errors: `Transport`, `Protocol`.
    pub fn bench_ppm(&mut self) -> Result<i32> {
        self.read_int(Reading::BenchPpm, None)
    }

    /// Acknowledge state across all zones.
    ///
    /// Read errors: `Transport`, `Protocol`.
    pub fn is_alarm_acknowledged(&mut self) -> Result<Option<bool>> {
        self.read_flag(Reading::AlarmAcknowledge, None)
    }

    /// Refrigerant code configured for `zone`.
    ///
    /// Validation errors: `InvalidArgument` for a zone above 15.
    /// Read errors: `Transport`, `Protocol`.
    pub fn refrigerant_type(&mut self, zone: u8) -> Result<i32> {
        self.read_int(Reading::RefrigerantType, Some(zone))
    }

    /// Leak threshold of `zone` in ppm.
    ///
    /// Validation errors: `InvalidArgument` for a zone above 15.
    /// Read errors: `Transport`, `Protocol`.
    pub fn leak_level_setpoint(&mut self, zone: u8) -> Result<i32> {
        self.read_int(Reading::LeakSetpoint, Some(zone))
    }

    /// Spill threshold of `zone` in ppm.
    ///
    /// Validation errors: `InvalidArgument` for a zone above 15.
    /// Read errors: `Transport`, `Protocol`.
    pub fn spill_level_setpoint(&mut self, zone: u8) -> Result<i32> {
        self.read_int(Reading::SpillSetpoint, Some(zone))
    }

    /// Evacuation threshold of `zone` in ppm.
    ///
    /// Validation errors: `InvalidArgument` for a zone above 15.
    /// Read errors: `Transport`, `Protocol`.
    pub fn evacuation_level_setpoint(&mut self, zone: u8) -> Result<i32> {
        self.read_int(Reading::EvacuationSetpoint, Some(zone))
    }

    /// Sample line length of `zone`.
    ///
    /// Validation errors: `InvalidArgument` for a zone above 15.
    /// Read errors: `Transport`, `Protocol`.
    pub fn sample_distance(&mut self, zone: u8) -> Result<i32> {
        self.read_int(Reading::SampleDistance, Some(zone))
    }

    /// `None` when the device reports a code other than 0 or 1.
    ///
    /// Validation errors: `InvalidArgument` for a zone above 15.
    /// Read errors: `Transport`, `Protocol`.
    pub fn is_zone_alarm_acknowledged(&mut self, zone: u8) -> Result<Option<bool>> {
        self.read_flag(Reading::ZoneAlarmAcknowledge, Some(zone))
    }

    /// All configuration registers of one zone.
    ///
    /// Validation errors: `InvalidArgument`, checked once before the first
    /// read. Read errors: `Transport`, `Protocol`.
    pub fn zone_setpoints(&mut self, zone: u8) -> Result<ZoneSetpoints> {
        let zone = validate_zone(zone)?;
        Ok(ZoneSetpoints {
            zone,
            refrigerant_type: self.refrigerant_type(zone)?,
            leak_setpoint: self.leak_level_setpoint(zone)?,
            spill_setpoint: self.spill_level_setpoint(zone)?,
            evacuation_setpoint: self.evacuation_level_setpoint(zone)?,
            sample_distance: self.sample_distance(zone)?,
            alarm_acknowledged: self.is_zone_alarm_acknowledged(zone)?,
        })
    }

    /// Every device-wide reading, one register at a time.
    ///
    /// Stops at the first failed read. Read errors: `Transport`, `Protocol`.
    pub fn summary(&mut self) -> Result<DeviceSummary> {
        Ok(DeviceSummary {
            operating_mode: self.operating_mode()?,
            current_state: self.current_state()?,
            active_zone: self.active_zone()?,
            max_alarm: self.max_alarm()?,
            active_alarm_count: self.active_alarm_count()?,
            acknowledged_alarm_count: self.acknowledged_alarm_count()?,
            fault_code_status: self.fault_code_status()?,
            fault_code: self.fault_code()?,
            audible_alarm: self.is_audible_alarm()?,
            silenced: self.is_silenced()?,
            highest_concentration_zone: self.highest_concentration_zone()?,
            highest_concentration: self.highest_concentration()?,
            zones_installed: self.zones_installed()?,
            manifold_pressure: self.manifold_pressure()?,
            ambient_pressure: self.ambient_pressure()?,
            vacuum_pressure: self.vacuum_pressure()?,
            bench_temperature: self.bench_temperature()?,
            average_voltage: self.average_voltage()?,
            zero_volts: self.zero_volts()?,
            average_au: self.average_au()?,
            bench_ppm: self.bench_ppm()?,
            alarm_acknowledged: self.is_alarm_acknowledged()?,
            captured_at: Utc::now(),
        })
    }
}
