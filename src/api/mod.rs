pub mod config;
pub mod device;
pub mod error;
pub mod session;
pub mod zone;

pub use config::DeviceConfig;
pub use device::{MultiZoneDevice, SharedDevice};
pub use error::{Error, Result};
pub use session::Session;
pub use zone::{DeviceSummary, ZoneSetpoints, ZoneStatus};

// Re-export the register-level types callers need alongside the device
pub use crate::protocol::{
    decode::DecodedValue,
    modbus::FunctionCode,
    reference::{AlarmStatus, CurrentState, OperatingMode},
    registers::{Reading, ZONE_COUNT},
    transport::{Connector, DiscardInput, ModbusLink, RtuLink, SerialConnector},
};

/// Builder for a device handle.
///
/// # Example
///
/// ```no_run
/// use multizone::MultiZoneBuilder;
///
/// let mut device = MultiZoneBuilder::new(1)
///     .with_port("/dev/ttyUSB0")
///     .with_baud_rate(9600)
///     .with_timeout(2000)
///     .build()?;
/// let zone = device.current_zone_status(0)?;
/// println!("Zone {}: {} ppm", zone.display_zone(), zone.ppm());
/// # Ok::<(), multizone::Error>(())
/// ```
pub struct MultiZoneBuilder {
    port_name: Option<String>,
    baud_rate: u32,
    station_id: u8,
    timeout_ms: u64,
}

impl MultiZoneBuilder {
    pub fn new(station_id: u8) -> Self {
        Self {
            port_name: None,
            baud_rate: config::DEFAULT_BAUD_RATE,
            station_id,
            timeout_ms: config::DEFAULT_TIMEOUT_MS,
        }
    }

    /// Set the serial port name.
    pub fn with_port(mut self, port_name: &str) -> Self {
        self.port_name = Some(port_name.to_string());
        self
    }

    /// Set the baud rate.
    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    /// Set the read timeout in milliseconds.
    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Build and validate the configuration.
    pub fn build_config(self) -> Result<DeviceConfig> {
        let port_name = self.port_name.ok_or_else(|| {
            Error::InvalidArgument("Port name is required. Use with_port()".to_string())
        })?;

        let config = DeviceConfig {
            port_name,
            baud_rate: self.baud_rate,
            station_id: self.station_id,
            timeout_ms: self.timeout_ms,
        };
        config.validate()?;
        Ok(config)
    }

    /// Build a device on a physical serial port.
    pub fn build(self) -> Result<MultiZoneDevice> {
        MultiZoneDevice::from_config(self.build_config()?)
    }

    /// Build a device that opens its link through a custom connector.
    pub fn build_with_connector<C: Connector>(self, connector: C) -> Result<MultiZoneDevice<C>> {
        MultiZoneDevice::with_connector(self.build_config()?, connector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = MultiZoneBuilder::new(1)
            .with_port("/dev/serial1")
            .build_config()
            .unwrap();
        assert_eq!(config.baud_rate, 19200);
        assert_eq!(config.timeout_ms, 1000);
        assert_eq!(config.station_id, 1);
    }

    #[test]
    fn test_builder_requires_port() {
        let err = MultiZoneBuilder::new(1).build_config().unwrap_err();
        assert!(err.is_input_error());
    }

    #[test]
    fn test_builder_validates_station() {
        let res = MultiZoneBuilder::new(250).with_port("COM1").build_config();
        assert!(matches!(res, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_build_does_not_connect() {
        let device = MultiZoneBuilder::new(2)
            .with_port("/dev/does-not-exist")
            .build()
            .unwrap();
        assert!(!device.is_connected());
        assert_eq!(device.station_id(), 2);
    }
}
