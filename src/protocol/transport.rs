//! The seam between the register client and the wire.
//!
//! A `Connector` opens links; a `ModbusLink` performs one blocking register
//! read at a time. The serial implementation frames requests with `rmodbus`
//! and talks to the port through `serialport`.

use std::io::{Read, Write};

use super::modbus::{read_response_frame, FunctionCode};
use crate::{
    api::{
        config::DeviceConfig,
        error::Result,
    },
    utils::{format_hex, open_serial_port},
};

/// A live connection able to perform register reads.
pub trait ModbusLink {
    /// Read `count` words starting at `address` from `station_id`.
    ///
    /// Serial faults and timeouts surface as `Error::Transport`, exception or
    /// malformed responses as `Error::Protocol`. Nothing is retried.
    fn read_registers(
        &mut self,
        station_id: u8,
        function: FunctionCode,
        address: u16,
        count: u16,
    ) -> Result<Vec<u16>>;
}

/// Opens links for a device configuration.
pub trait Connector {
    type Link: ModbusLink;

    fn connect(&mut self, config: &DeviceConfig) -> Result<Self::Link>;
}

/// Byte streams whose unread receive data can be thrown away.
///
/// RTU replies do not name the register they answer, so anything still
/// buffered when a new request goes out belongs to an earlier exchange.
pub trait DiscardInput {
    fn discard_input(&mut self) -> Result<()>;
}

impl DiscardInput for Box<dyn serialport::SerialPort> {
    fn discard_input(&mut self) -> Result<()> {
        self.clear(serialport::ClearBuffer::Input)?;
        Ok(())
    }
}

/// Connector for a physical serial line.
#[derive(Debug, Default, Clone, Copy)]
pub struct SerialConnector;

impl Connector for SerialConnector {
    type Link = RtuLink<Box<dyn serialport::SerialPort>>;

    fn connect(&mut self, config: &DeviceConfig) -> Result<Self::Link> {
        let port = open_serial_port(&config.port_name, config.baud_rate, config.timeout())?;
        Ok(RtuLink::new(port))
    }
}

/// Modbus RTU master over any byte stream.
pub struct RtuLink<P> {
    port: P,
}

impl<P: Read + Write + DiscardInput> RtuLink<P> {
    pub fn new(port: P) -> Self {
        Self { port }
    }

    pub fn get_ref(&self) -> &P {
        &self.port
    }
}

impl<P: Read + Write + DiscardInput> ModbusLink for RtuLink<P> {
    fn read_registers(
        &mut self,
        station_id: u8,
        function: FunctionCode,
        address: u16,
        count: u16,
    ) -> Result<Vec<u16>> {
        let (mut request, frame) = function.generate_request(station_id, address, count)?;
        log::debug!("Sending Modbus request: {}", format_hex(&frame));

        self.port.discard_input()?;
        self.port.write_all(&frame)?;
        self.port.flush()?;

        let response = read_response_frame(&mut self.port, station_id, function)?;
        function.parse_response(&mut request, &response, count)
    }
}
