mod frame;
mod pull_get_holdings;
mod pull_get_inputs;

use serde::{Deserialize, Serialize};
use std::fmt;
use strum::FromRepr;

use rmodbus::client::ModbusRequest;

use crate::api::error::{Error, Result};

pub use frame::{drain_input, expected_frame_len, read_response_frame};
pub use pull_get_holdings::{generate_pull_get_holdings_request, parse_pull_get_holdings};
pub use pull_get_inputs::{generate_pull_get_inputs_request, parse_pull_get_inputs};

/// Read function used against one bank of the controller's registers.
///
/// The status/telemetry bank (2000 series) answers function 0x03 and the
/// per-zone configuration bank (3000 series) answers function 0x04.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromRepr, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunctionCode {
    ReadHoldings = 0x03,
    ReadInputs = 0x04,
}

impl FunctionCode {
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Build the RTU request frame for `count` words starting at `address`.
    pub fn generate_request(
        self,
        station_id: u8,
        address: u16,
        count: u16,
    ) -> Result<(ModbusRequest, Vec<u8>)> {
        match self {
            FunctionCode::ReadHoldings => {
                generate_pull_get_holdings_request(station_id, address, count)
            }
            FunctionCode::ReadInputs => generate_pull_get_inputs_request(station_id, address, count),
        }
    }

    /// Validate a complete response frame and extract exactly `count` words.
    pub fn parse_response(
        self,
        request: &mut ModbusRequest,
        response: &[u8],
        count: u16,
    ) -> Result<Vec<u16>> {
        let values = match self {
            FunctionCode::ReadHoldings => parse_pull_get_holdings(request, response)?,
            FunctionCode::ReadInputs => parse_pull_get_inputs(request, response)?,
        };
        if values.len() != count as usize {
            return Err(Error::Protocol(format!(
                "Value count mismatch: expected {}, got {}",
                count,
                values.len()
            )));
        }
        Ok(values)
    }
}

impl fmt::Display for FunctionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FunctionCode::ReadHoldings => write!(f, "read holdings (0x03)"),
            FunctionCode::ReadInputs => write!(f, "read inputs (0x04)"),
        }
    }
}

/// Turn the data section of an already validated register response into words.
fn words_from_response(response: &[u8]) -> Result<Vec<u16>> {
    if response.len() < 5 {
        return Err(Error::Protocol(format!(
            "Response too short (len={}, need >=5)",
            response.len()
        )));
    }
    let byte_count = response[2] as usize;
    if byte_count % 2 != 0 || response.len() != byte_count + 5 {
        return Err(Error::Protocol(format!(
            "Byte count {} does not match frame length {}",
            byte_count,
            response.len()
        )));
    }

    Ok(response[3..response.len() - 2]
        .chunks_exact(2)
        .map(|c| u16::from_be_bytes([c[0], c[1]]))
        .collect())
}

fn map_modbus_error(kind: rmodbus::ErrorKind) -> Error {
    Error::Protocol(format!("{kind:?}"))
}
