//! MCP23008 8-bit I/O expander used as an output port.
//!
//! The expander exposes its 8 pins as a single register, so every pin change costs a whole bus
//! transaction. [Mcp23008] keeps the pin levels in a local image, lets callers stage several
//! changes with [Mcp23008::set_pin], and sends them all at once with [Mcp23008::write_pins].
use crate::bus::RegisterBus;
use crate::{GpioError, GpioResult};
use bitvec::prelude::*;
use embedded_hal::delay::DelayNs;
use log::trace;

/// I/O direction register. A `0` bit makes the pin an output.
pub const MCP23008_IODIR: u8 = 0x00;
/// Port register. Writing it drives the output pins.
pub const MCP23008_GPIO: u8 = 0x09;

/// Direction mask configuring all 8 pins as outputs.
pub const ALL_OUTPUTS: u8 = 0x00;

pub const PIN_COUNT: usize = 8;

type PinImage = BitArr!(for PIN_COUNT, in u8, Lsb0);

/// Output driver for one MCP23008.
///
/// The cached image always equals the last value successfully flushed to the device, except for
/// pins staged with [Mcp23008::set_pin] since then. A failed flush may leave the device behind the
/// cache; the next successful [Mcp23008::write_pins] brings them back in sync.
#[derive(Debug)]
pub struct Mcp23008<B: RegisterBus, D: DelayNs> {
    bus: B,
    delay: D,
    pins: PinImage,
}

impl<B: RegisterBus, D: DelayNs> Mcp23008<B, D> {
    /// Creates the driver and configures every pin as an output.
    pub fn new(bus: B, delay: D) -> GpioResult<Self> {
        Self::with_direction(bus, delay, ALL_OUTPUTS)
    }

    /// Creates the driver and writes `direction` to the IODIR register.
    pub fn with_direction(bus: B, delay: D, direction: u8) -> GpioResult<Self> {
        let mut expander = Mcp23008 {
            bus,
            delay,
            pins: BitArray::new([0u8]),
        };
        expander.initialize_io(direction)?;
        Ok(expander)
    }

    fn initialize_io(&mut self, direction: u8) -> GpioResult<()> {
        trace!("Configuring IODIR: {:08b}", direction);
        self.bus.write_register(MCP23008_IODIR, direction)
    }

    fn check_index(index: usize) -> GpioResult<()> {
        if index >= PIN_COUNT {
            return Err(GpioError::InvalidPin(index));
        }
        Ok(())
    }

    /// Stages a pin level in the local image. Nothing is sent to the device.
    pub fn set_pin(&mut self, index: usize, value: bool) -> GpioResult<()> {
        Self::check_index(index)?;
        self.pins.set(index, value);
        Ok(())
    }

    /// Gets the cached level of a pin.
    pub fn pin(&self, index: usize) -> GpioResult<bool> {
        Self::check_index(index)?;
        Ok(self.pins[index])
    }

    /// The cached register image, pin 0 in the least significant bit.
    pub fn image(&self) -> u8 {
        self.pins.as_raw_slice()[0]
    }

    /// Sends the whole cached image to the device in one transaction.
    pub fn write_pins(&mut self) -> GpioResult<()> {
        let image = self.image();
        self.bus.write_register(MCP23008_GPIO, image)
    }

    /// Sets one pin and flushes the image right away.
    pub fn set_and_write_pin(&mut self, index: usize, value: bool) -> GpioResult<()> {
        self.set_pin(index, value)?;
        self.write_pins()
    }

    /// Drives a pin high for `width_us` microseconds, then low again. Two flushes.
    ///
    /// If the first flush fails the pin is put back low in the cache, so the next flush does not
    /// emit a stray pulse.
    pub fn pulse_pin(&mut self, index: usize, width_us: u32) -> GpioResult<()> {
        Self::check_index(index)?;
        if let Err(err) = self.set_and_write_pin(index, true) {
            self.pins.set(index, false);
            return Err(err);
        }
        self.delay.delay_us(width_us);
        self.set_and_write_pin(index, false)
    }

    /// Blocks for `us` microseconds using the expander's delay.
    pub fn wait_us(&mut self, us: u32) {
        self.delay.delay_us(us);
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    pub fn delay(&self) -> &D {
        &self.delay
    }
}
