#![allow(dead_code)]

use parking_lot::Mutex;
use std::{collections::HashMap, sync::Arc};

use multizone::{Connector, DeviceConfig, Error, FunctionCode, ModbusLink, MultiZoneDevice, Result};

/// Register banks and call counters shared by a fake connector and its links.
#[derive(Default)]
pub struct FakeState {
    pub connects: usize,
    pub reads: Vec<(FunctionCode, u16, u16)>,
    pub holdings: HashMap<u16, u16>,
    pub inputs: HashMap<u16, u16>,
    pub fail_connect: bool,
    pub fail_reads: usize,
}

#[derive(Clone, Default)]
pub struct FakeConnector {
    pub state: Arc<Mutex<FakeState>>,
}

pub struct FakeLink {
    state: Arc<Mutex<FakeState>>,
}

impl Connector for FakeConnector {
    type Link = FakeLink;

    fn connect(&mut self, _config: &DeviceConfig) -> Result<FakeLink> {
        let mut state = self.state.lock();
        if state.fail_connect {
            return Err(Error::Transport("No such file or directory".to_string()));
        }
        state.connects += 1;
        Ok(FakeLink {
            state: self.state.clone(),
        })
    }
}

impl ModbusLink for FakeLink {
    fn read_registers(
        &mut self,
        _station_id: u8,
        function: FunctionCode,
        address: u16,
        count: u16,
    ) -> Result<Vec<u16>> {
        let mut state = self.state.lock();
        state.reads.push((function, address, count));
        if state.fail_reads > 0 {
            state.fail_reads -= 1;
            return Err(Error::Transport("Timed out waiting for response".to_string()));
        }
        let bank = match function {
            FunctionCode::ReadHoldings => &state.holdings,
            FunctionCode::ReadInputs => &state.inputs,
        };
        Ok((address..address + count)
            .map(|addr| bank.get(&addr).copied().unwrap_or(0))
            .collect())
    }
}

impl FakeConnector {
    pub fn set_holding(&self, address: u16, value: u16) {
        self.state.lock().holdings.insert(address, value);
    }

    pub fn set_input(&self, address: u16, value: u16) {
        self.state.lock().inputs.insert(address, value);
    }

    pub fn connects(&self) -> usize {
        self.state.lock().connects
    }

    pub fn reads(&self) -> Vec<(FunctionCode, u16, u16)> {
        self.state.lock().reads.clone()
    }
}

pub fn fake_device() -> (MultiZoneDevice<FakeConnector>, FakeConnector) {
    let connector = FakeConnector::default();
    let device =
        MultiZoneDevice::with_connector(DeviceConfig::new(1, "/dev/serial1"), connector.clone())
            .unwrap();
    (device, connector)
}

/// CRC-16/MODBUS, appended low byte first.
pub fn crc16(data: &[u8]) -> u16 {
    let mut crc: u16 = 0xFFFF;
    for byte in data {
        crc ^= u16::from(*byte);
        for _ in 0..8 {
            if crc & 1 != 0 {
                crc = (crc >> 1) ^ 0xA001;
            } else {
                crc >>= 1;
            }
        }
    }
    crc
}

pub fn with_crc(mut frame: Vec<u8>) -> Vec<u8> {
    let crc = crc16(&frame);
    frame.extend_from_slice(&crc.to_le_bytes());
    frame
}

pub fn register_response(station_id: u8, function: u8, words: &[u16]) -> Vec<u8> {
    let mut frame = vec![station_id, function, (words.len() * 2) as u8];
    for word in words {
        frame.extend_from_slice(&word.to_be_bytes());
    }
    with_crc(frame)
}
