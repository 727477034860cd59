use std::io::{self, Read};

use super::FunctionCode;
use crate::{
    api::error::{Error, Result},
    utils::format_hex,
};

/// Length of an RTU exception frame: station, function | 0x80, code, CRC.
const EXCEPTION_FRAME_LEN: usize = 5;

/// Largest RTU frame on the wire.
const MAX_FRAME_LEN: usize = 256;

/// Work out the full RTU frame length from its first three bytes.
///
/// A normal register response is `station, function, byte count, data.., CRC`,
/// an exception response is always five bytes long.
pub fn expected_frame_len(header: &[u8; 3], function: FunctionCode) -> Result<usize> {
    let func = header[1];
    if func == function.code() | 0x80 {
        Ok(EXCEPTION_FRAME_LEN)
    } else if func == function.code() {
        Ok(3 + header[2] as usize + 2)
    } else {
        Err(Error::Protocol(format!(
            "Function code mismatch: expected 0x{:02X}, got 0x{:02X}",
            function.code(),
            func
        )))
    }
}

/// Read one complete response frame addressed to `station_id`.
///
/// Blocks until the frame is complete or the port's read timeout expires.
pub fn read_response_frame<R: Read>(
    port: &mut R,
    station_id: u8,
    function: FunctionCode,
) -> Result<Vec<u8>> {
    let mut header = [0u8; 3];
    port.read_exact(&mut header)?;

    if header[0] != station_id {
        drain_input(port);
        return Err(Error::Protocol(format!(
            "Station ID mismatch: expected {}, got {}",
            station_id, header[0]
        )));
    }

    let len = match expected_frame_len(&header, function) {
        Ok(len) => len,
        Err(err) => {
            drain_input(port);
            return Err(err);
        }
    };
    let mut frame = Vec::with_capacity(len);
    frame.extend_from_slice(&header);
    frame.resize(len, 0);
    port.read_exact(&mut frame[3..])?;

    log::debug!("Received Modbus response: {}", format_hex(&frame));
    Ok(frame)
}

/// Throw away whatever is left of an unusable frame.
///
/// Reads until the port times out or reports end of stream, bounded by one
/// maximum frame so a busy bus cannot keep us here.
pub fn drain_input<R: Read>(port: &mut R) {
    let mut scratch = [0u8; MAX_FRAME_LEN];
    let mut drained = 0;
    while drained < MAX_FRAME_LEN {
        match port.read(&mut scratch[..MAX_FRAME_LEN - drained]) {
            Ok(0) => break,
            Ok(n) => {
                log::debug!("Discarded stale bytes: {}", format_hex(&scratch[..n]));
                drained += n;
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(_) => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_expected_len_for_register_response() {
        let len = expected_frame_len(&[0x01, 0x03, 0x20], FunctionCode::ReadHoldings).unwrap();
        assert_eq!(len, 37);
    }

    #[test]
    fn test_expected_len_for_exception() {
        let len = expected_frame_len(&[0x01, 0x84, 0x02], FunctionCode::ReadInputs).unwrap();
        assert_eq!(len, EXCEPTION_FRAME_LEN);
    }

    #[test]
    fn test_expected_len_rejects_other_function() {
        let res = expected_frame_len(&[0x01, 0x04, 0x02], FunctionCode::ReadHoldings);
        assert!(matches!(res, Err(Error::Protocol(_))));
    }

    #[test]
    fn test_short_read_is_transport_error() {
        let mut port = Cursor::new(vec![0x01, 0x03, 0x02, 0x00]);
        let res = read_response_frame(&mut port, 1, FunctionCode::ReadHoldings);
        assert!(matches!(res, Err(Error::Transport(_))));
    }

    #[test]
    fn test_foreign_station_is_protocol_error() {
        let mut port = Cursor::new(vec![0x02, 0x03, 0x02, 0x00, 0x01, 0x00, 0x00]);
        let res = read_response_frame(&mut port, 1, FunctionCode::ReadHoldings);
        assert!(matches!(res, Err(Error::Protocol(_))));
        // The rest of the foreign frame must not be left for the next read
        assert_eq!(port.position(), 7);
    }

    #[test]
    fn test_wrong_function_drains_frame() {
        let mut port = Cursor::new(vec![0x01, 0x04, 0x02, 0x00, 0x01, 0x00, 0x00]);
        let res = read_response_frame(&mut port, 1, FunctionCode::ReadHoldings);
        assert!(matches!(res, Err(Error::Protocol(_))));
        assert_eq!(port.position(), 7);
    }

    #[test]
    fn test_drain_is_bounded() {
        let mut port = Cursor::new(vec![0xAA; 600]);
        drain_input(&mut port);
        assert_eq!(port.position(), MAX_FRAME_LEN as u64);
    }

    #[test]
    fn test_reads_exactly_one_frame() {
        let mut port = Cursor::new(vec![0x01, 0x03, 0x02, 0x00, 0x01, 0xAA, 0xBB, 0xFF]);
        let frame = read_response_frame(&mut port, 1, FunctionCode::ReadHoldings).unwrap();
        assert_eq!(frame, vec![0x01, 0x03, 0x02, 0x00, 0x01, 0xAA, 0xBB]);
        assert_eq!(port.position(), 7);
    }
}
