use crate::bus::RegisterBus;
use crate::{GpioError, GpioResult};
use i2cdev::core::I2CDevice;
use i2cdev::linux::{LinuxI2CDevice, LinuxI2CError};
use log::trace;
use std::fmt::{Debug, Formatter};

/// Register bus over the Linux I2C character device `/dev/i2c-<bus>`.
pub struct LinuxI2cBus {
    device: LinuxI2CDevice,
    bus: u8,
    address: u16,
}

impl LinuxI2cBus {
    /// Opens `/dev/i2c-<bus>` and binds it to the slave at `address`.
    pub fn open(bus: u8, address: u16) -> GpioResult<Self> {
        let device = LinuxI2CDevice::new(format!("/dev/i2c-{}", bus), address)?;
        Ok(LinuxI2cBus {
            device,
            bus,
            address,
        })
    }
}

impl Debug for LinuxI2cBus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "LinuxI2cBus(/dev/i2c-{}@{:#04x})", self.bus, self.address)
    }
}

impl From<LinuxI2CError> for GpioError {
    fn from(err: LinuxI2CError) -> Self {
        GpioError::Transport(err.to_string())
    }
}

impl RegisterBus for LinuxI2cBus {
    fn write_register(&mut self, register: u8, value: u8) -> GpioResult<()> {
        trace!("{:?}: reg {:#04x} <- {:08b}", self, register, value);
        self.device.smbus_write_byte_data(register, value)?;
        Ok(())
    }
}
