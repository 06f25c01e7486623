//! Register bus transports for the I/O expander.
//!
//! The expander is only reachable through register writes, so the transport is reduced to a single
//! operation, see [RegisterBus]. [LinuxI2cBus] talks to real hardware through `/dev/i2c-*`, and
//! [MemoryBus] keeps every write in memory, which is useful for dry runs and tests.
#[cfg(target_os = "linux")]
mod linux;
mod memory;

#[cfg(target_os = "linux")]
pub use linux::*;
pub use memory::*;

use crate::GpioResult;
use std::fmt::Debug;

/// A bus able to write one byte into one register of an already addressed device.
pub trait RegisterBus: Debug {
    /// Writes `value` into the device register `register` in one bus transaction.
    fn write_register(&mut self, register: u8, value: u8) -> GpioResult<()>;
}

impl<T: RegisterBus + ?Sized> RegisterBus for &mut T {
    fn write_register(&mut self, register: u8, value: u8) -> GpioResult<()> {
        (**self).write_register(register, value)
    }
}

impl<T: RegisterBus + ?Sized> RegisterBus for Box<T> {
    fn write_register(&mut self, register: u8, value: u8) -> GpioResult<()> {
        (**self).write_register(register, value)
    }
}
