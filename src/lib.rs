//! Multizone — Modbus RTU client for multi-zone refrigerant gas-detection
//! controllers.
//!
//! The crate maps the controller's fixed register layout to typed readings:
//! per-zone concentration and alarm level, operating mode and state, alarm
//! counters, fault codes, pressures, temperatures, voltages and per-zone
//! setpoints. Reads are blocking; the serial link is opened on first use and
//! kept until `disconnect` is called.
//!
//! The `multizone` binary under `src/main.rs` is a small CLI over the same API.

pub mod api;
#[doc(hidden)]
pub mod cli;
pub mod protocol;
#[doc(hidden)]
pub mod utils;

pub use api::*;
