//! Error type shared by every layer of the client.
//!
//! The three kinds let callers tell "fix your input" apart from "fix your
//! connection" apart from "the device answered something unexpected".
//! A tri-state register that reports a code outside {0, 1} is not an error;
//! it decodes to `None`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Rejected before any I/O took place.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The serial link could not be opened, timed out, or faulted.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The device sent a Modbus exception or a malformed frame.
    #[error("Protocol error: {0}")]
    Protocol(String),
}

impl Error {
    pub fn invalid_zone(zone: u8) -> Self {
        Error::InvalidArgument(format!("The zone number must be between 0-15, got {zone}"))
    }

    /// True when the caller passed a bad value and retrying is pointless.
    pub fn is_input_error(&self) -> bool {
        matches!(self, Error::InvalidArgument(_))
    }

    pub fn is_transport_error(&self) -> bool {
        matches!(self, Error::Transport(_))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::TimedOut => {
                Error::Transport(format!("Timed out waiting for response: {err}"))
            }
            _ => Error::Transport(err.to_string()),
        }
    }
}

impl From<serialport::Error> for Error {
    fn from(err: serialport::Error) -> Self {
        Error::Transport(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
