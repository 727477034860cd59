use std::time::Duration;

use serialport::{DataBits, FlowControl, Parity, StopBits};

use crate::api::error::{Error, Result};

/// Open a serial port with the controller's fixed 8-N-1 framing and no flow
/// control, enabling exclusive access on Unix systems.
pub fn open_serial_port(
    port: &str,
    baud_rate: u32,
    timeout: Duration,
) -> Result<Box<dyn serialport::SerialPort>> {
    let builder = serialport::new(port, baud_rate)
        .data_bits(DataBits::Eight)
        .stop_bits(StopBits::One)
        .parity(Parity::None)
        .flow_control(FlowControl::None)
        .timeout(timeout);

    #[cfg(unix)]
    {
        let mut handle = builder
            .open_native()
            .map_err(|err| Error::Transport(format!("Failed to open port {port}: {err}")))?;
        handle.set_exclusive(true).map_err(|err| {
            Error::Transport(format!(
                "Failed to acquire exclusive access to {port}: {err}"
            ))
        })?;
        Ok(Box::new(handle))
    }

    #[cfg(not(unix))]
    {
        builder
            .open()
            .map_err(|err| Error::Transport(format!("Failed to open port {port}: {err}")))
    }
}
