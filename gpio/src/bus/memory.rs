use crate::bus::RegisterBus;
use crate::{GpioError, GpioResult};
use log::trace;

/// A register bus that records every write instead of sending it anywhere.
///
/// Writes can be made to fail from a given point on with [MemoryBus::fail_from], which simulates
/// a device that dropped off the bus.
#[derive(Debug, Default, Clone)]
pub struct MemoryBus {
    writes: Vec<(u8, u8)>,
    fail_from: Option<usize>,
}

impl MemoryBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every write fail once `index` writes have succeeded.
    pub fn fail_from(mut self, index: usize) -> Self {
        self.fail_from = Some(index);
        self
    }

    /// Lets writes succeed again.
    pub fn recover(&mut self) {
        self.fail_from = None;
    }

    /// All successful writes as `(register, value)` pairs, oldest first.
    pub fn writes(&self) -> &[(u8, u8)] {
        &self.writes
    }

    /// Values successfully written to `register`, oldest first.
    pub fn values_of(&self, register: u8) -> Vec<u8> {
        self.writes
            .iter()
            .filter(|(r, _)| *r == register)
            .map(|(_, v)| *v)
            .collect()
    }

    /// The value the device would currently hold in `register`.
    pub fn register(&self, register: u8) -> Option<u8> {
        self.writes
            .iter()
            .rev()
            .find(|(r, _)| *r == register)
            .map(|(_, v)| *v)
    }

    pub fn clear(&mut self) {
        self.writes.clear();
    }
}

impl RegisterBus for MemoryBus {
    fn write_register(&mut self, register: u8, value: u8) -> GpioResult<()> {
        if let Some(from) = self.fail_from {
            if self.writes.len() >= from {
                return Err(GpioError::Transport(format!(
                    "write of {:#04x} to register {:#04x} failed",
                    value, register
                )));
            }
        }
        trace!("MemoryBus: reg {:#04x} <- {:08b}", register, value);
        self.writes.push((register, value));
        Ok(())
    }
}
