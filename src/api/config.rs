use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{path::Path, time::Duration};

use super::error::Error;

pub const DEFAULT_BAUD_RATE: u32 = 19200;
pub const DEFAULT_STATION_ID: u8 = 1;
pub const DEFAULT_TIMEOUT_MS: u64 = 1000;

/// Everything needed to reach one controller.
///
/// Framing is fixed at 8 data bits, 1 stop bit, no parity and no flow
/// control, so it is not part of the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DeviceConfig {
    /// Serial device path, e.g. `/dev/ttyUSB0` or `COM3`
    pub port_name: String,
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
    /// Modbus slave address of the controller (1-247)
    #[serde(default = "default_station_id")]
    pub station_id: u8,
    /// Read timeout of the serial port in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_baud_rate() -> u32 {
    DEFAULT_BAUD_RATE
}

fn default_station_id() -> u8 {
    DEFAULT_STATION_ID
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

impl DeviceConfig {
    pub fn new(station_id: u8, port_name: impl Into<String>) -> Self {
        Self {
            port_name: port_name.into(),
            baud_rate: DEFAULT_BAUD_RATE,
            station_id,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.port_name.trim().is_empty() {
            return Err(Error::InvalidArgument(
                "Port name is required".to_string(),
            ));
        }
        if !(1..=247).contains(&self.station_id) {
            return Err(Error::InvalidArgument(format!(
                "Station ID must be between 1-247, got {}",
                self.station_id
            )));
        }
        if self.baud_rate == 0 {
            return Err(Error::InvalidArgument(
                "Baud rate must be positive".to_string(),
            ));
        }
        if self.timeout_ms == 0 {
            return Err(Error::InvalidArgument(
                "Timeout must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn from_json(json_str: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json_str).context("Invalid JSON configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Self = toml::from_str(toml_str).context("Invalid TOML configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Read configuration from a file; `.json` files are parsed as JSON,
    /// everything else as TOML.
    pub fn from_file(file_path: impl AsRef<Path>) -> Result<Self> {
        let path = file_path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json(&content)
        } else {
            Self::from_toml(&content)
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
