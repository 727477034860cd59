use super::{config::DeviceConfig, error::Result};
use crate::protocol::{
    modbus::FunctionCode,
    transport::{Connector, ModbusLink},
};

/// Lazily opened connection to one controller.
///
/// The link is opened on first use and kept until `disconnect` is called or
/// the session is dropped. A failed read leaves the link in place, so the
/// next call reuses it.
pub struct Session<C: Connector> {
    connector: C,
    config: DeviceConfig,
    link: Option<C::Link>,
}

impl<C: Connector> Session<C> {
    pub fn new(config: DeviceConfig, connector: C) -> Self {
        Self {
            connector,
            config,
            link: None,
        }
    }

    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    pub fn is_connected(&self) -> bool {
        self.link.is_some()
    }

    /// Open the link if none is open. Calling it again is a no-op.
    pub fn ensure_connected(&mut self) -> Result<&mut C::Link> {
        let link = match self.link.take() {
            Some(link) => link,
            None => {
                log::debug!(
                    "Opening {} at {} baud (8-N-1, timeout {}ms)",
                    self.config.port_name,
                    self.config.baud_rate,
                    self.config.timeout_ms
                );
                let link = self.connector.connect(&self.config)?;
                log::debug!("Connected to {}", self.config.port_name);
                link
            }
        };
        Ok(self.link.insert(link))
    }

    /// Release the link if one is open.
    pub fn disconnect(&mut self) {
        if self.link.take().is_some() {
            log::debug!("Disconnected from {}", self.config.port_name);
        }
    }

    /// Blocking read of `count` raw words, connecting first when needed.
    pub fn read_words(
        &mut self,
        station_id: u8,
        start_register: u16,
        count: u16,
        function: FunctionCode,
    ) -> Result<Vec<u16>> {
        let link = self.ensure_connected()?;
        link.read_registers(station_id, function, start_register, count)
    }
}

impl<C: Connector> Drop for Session<C> {
    fn drop(&mut self) {
        self.disconnect();
    }
}
