use rmodbus::client::ModbusRequest;

use super::{map_modbus_error, words_from_response};
use crate::api::error::Result;

/// Generate a Modbus RTU request to read input registers (function 0x04)
pub fn generate_pull_get_inputs_request(
    id: u8,
    start_address: u16,
    count: u16,
) -> Result<(ModbusRequest, Vec<u8>)> {
    let mut request = ModbusRequest::new(id, rmodbus::ModbusProto::Rtu);
    let mut raw = Vec::with_capacity(8);
    request
        .generate_get_inputs(start_address, count, &mut raw)
        .map_err(map_modbus_error)?;
    Ok((request, raw))
}

/// Parse a Modbus response for input registers (function 0x04) into u16 values.
pub fn parse_pull_get_inputs(request: &mut ModbusRequest, response: &[u8]) -> Result<Vec<u16>> {
    request.parse_ok(response).map_err(map_modbus_error)?;

    let values = words_from_response(response)?;
    log::trace!("Received input registers: {values:?}");

    Ok(values)
}
