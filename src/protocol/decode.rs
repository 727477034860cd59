//! Conversions from raw register words to readings. No I/O happens here.

use serde::Serialize;
use std::fmt;

/// How the words of one register are turned into a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decode {
    /// Plain unsigned integer.
    Int,
    /// Fixed-point value, the raw word divided by the given divisor.
    Scaled(u16),
    /// 0 / 1 flag, anything else is unknown.
    OptionalBool,
}

impl Decode {
    pub fn apply(self, word: u16) -> DecodedValue {
        match self {
            Decode::Int => DecodedValue::Int(as_int(word)),
            Decode::Scaled(divisor) => DecodedValue::Decimal(as_scaled_decimal(word, divisor)),
            Decode::OptionalBool => DecodedValue::Flag(as_optional_bool(word)),
        }
    }

    /// Divisor applied by this rule, 1 for everything that is not fixed-point.
    pub fn divisor(self) -> u16 {
        match self {
            Decode::Scaled(divisor) => divisor,
            Decode::Int | Decode::OptionalBool => 1,
        }
    }
}

/// A decoded register value, used where readings are handled generically.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DecodedValue {
    Int(i32),
    Decimal(f64),
    Flag(Option<bool>),
}

impl fmt::Display for DecodedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodedValue::Int(v) => write!(f, "{v}"),
            DecodedValue::Decimal(v) => write!(f, "{v}"),
            DecodedValue::Flag(Some(v)) => write!(f, "{v}"),
            DecodedValue::Flag(None) => write!(f, "unknown"),
        }
    }
}

pub fn as_int(word: u16) -> i32 {
    i32::from(word)
}

/// `word / divisor` as a fraction. The division must not truncate.
pub fn as_scaled_decimal(word: u16, divisor: u16) -> f64 {
    f64::from(word) / f64::from(divisor)
}

pub fn as_optional_bool(word: u16) -> Option<bool> {
    match word {
        0 => Some(false),
        1 => Some(true),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_int_never_sign_extends() {
        assert_eq!(as_int(0), 0);
        assert_eq!(as_int(0x8000), 32768);
        assert_eq!(as_int(u16::MAX), 65535);
    }

    #[test]
    fn test_scaled_decimal_keeps_fraction() {
        assert_eq!(as_scaled_decimal(12345, 100), 123.45);
        assert_eq!(as_scaled_decimal(42, 100), 0.42);
        assert_eq!(as_scaled_decimal(2500, 1000), 2.5);
        assert_eq!(as_scaled_decimal(5, 10000), 0.0005);
    }

    #[test]
    fn test_optional_bool() {
        assert_eq!(as_optional_bool(0), Some(false));
        assert_eq!(as_optional_bool(1), Some(true));
        assert_eq!(as_optional_bool(7), None);
        assert_eq!(as_optional_bool(u16::MAX), None);
    }

    #[test]
    fn test_decode_rules() {
        assert_eq!(Decode::Int.apply(30), DecodedValue::Int(30));
        assert_eq!(Decode::Scaled(100).apply(101), DecodedValue::Decimal(1.01));
        assert_eq!(Decode::OptionalBool.apply(2), DecodedValue::Flag(None));
        assert_eq!(Decode::Scaled(1000).divisor(), 1000);
        assert_eq!(Decode::OptionalBool.divisor(), 1);
    }

    #[test]
    fn test_decoded_value_display() {
        assert_eq!(DecodedValue::Int(-1).to_string(), "-1");
        assert_eq!(DecodedValue::Decimal(2.5).to_string(), "2.5");
        assert_eq!(DecodedValue::Flag(Some(true)).to_string(), "true");
        assert_eq!(DecodedValue::Flag(None).to_string(), "unknown");
    }
}
