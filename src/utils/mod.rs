mod serial;

pub use serial::open_serial_port;

/// Space separated lowercase hex dump used in frame logs.
pub fn format_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_hex() {
        assert_eq!(format_hex(&[0x01, 0x03, 0xd1]), "01 03 d1");
        assert_eq!(format_hex(&[]), "");
    }
}
