use crate::bus::RegisterBus;
use crate::expander::{Mcp23008, PIN_COUNT};
use crate::lcd::hd44780::driver::{CursorDirection, HD44780Driver};
use crate::{GpioError, GpioResult};
use embedded_hal::delay::DelayNs;
use log::{debug, trace};
use std::fmt::Debug;

/// Enable pulse width in microseconds. The controller needs 450 ns, the expander's bus latency
/// dwarfs that anyway.
pub const ENABLE_PULSE_WIDTH_US: u32 = 1_000;
/// Wait after clear and home in microseconds; the controller takes up to 1.52 ms for them.
pub const SETTLE_DELAY_US: u32 = 3_000;

/// Which expander pin drives which LCD signal.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct PinAssignment {
    pub rs: usize,
    pub enable: usize,
    /// D4, D5, D6, D7.
    pub data: [usize; 4],
    pub backlight: usize,
}

impl PinAssignment {
    /// Wiring of the CrowPi kit. Pin 0 is not connected.
    pub const CROWPI: PinAssignment = PinAssignment {
        rs: 1,
        enable: 2,
        data: [3, 4, 5, 6],
        backlight: 7,
    };

    fn all(&self) -> [usize; 7] {
        let [d4, d5, d6, d7] = self.data;
        [self.rs, self.enable, d4, d5, d6, d7, self.backlight]
    }

    fn validate(&self) -> GpioResult<()> {
        let pins = self.all();
        if let Some(&pin) = pins.iter().find(|&&pin| pin >= PIN_COUNT) {
            return Err(GpioError::InvalidPin(pin));
        }
        for (i, pin) in pins.iter().enumerate() {
            if pins[i + 1..].contains(pin) {
                return Err(GpioError::Configuration(format!(
                    "expander pin {} assigned twice",
                    pin
                )));
            }
        }
        Ok(())
    }
}

impl Default for PinAssignment {
    fn default() -> Self {
        Self::CROWPI
    }
}

/// Waits of the 4-bit protocol, in microseconds.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct LcdTimings {
    pub enable_pulse_us: u32,
    pub settle_us: u32,
}

impl Default for LcdTimings {
    fn default() -> Self {
        LcdTimings {
            enable_pulse_us: ENABLE_PULSE_WIDTH_US,
            settle_us: SETTLE_DELAY_US,
        }
    }
}

/// HD44780 driver in 4-bit mode behind an MCP23008 expander.
///
/// Every byte goes out as two nibbles, high first. For each nibble the data lines are staged and
/// flushed in one register write, then the enable line is pulsed.
#[derive(Debug)]
pub struct ExpanderHD44780Driver<B: RegisterBus, D: DelayNs> {
    expander: Mcp23008<B, D>,
    pins: PinAssignment,
    timings: LcdTimings,
}

impl<B: RegisterBus, D: DelayNs> ExpanderHD44780Driver<B, D> {
    /// Creates a driver with the CrowPi wiring and default timings.
    pub fn new(expander: Mcp23008<B, D>) -> Self {
        ExpanderHD44780Driver {
            expander,
            pins: PinAssignment::CROWPI,
            timings: LcdTimings::default(),
        }
    }

    /// Creates a driver with custom wiring and timings.
    ///
    /// # Errors
    /// - `GpioError::InvalidPin` if a pin is not on the expander.
    /// - `GpioError::Configuration` if two signals share a pin.
    pub fn with_pins(
        expander: Mcp23008<B, D>,
        pins: PinAssignment,
        timings: LcdTimings,
    ) -> GpioResult<Self> {
        pins.validate()?;
        Ok(ExpanderHD44780Driver {
            expander,
            pins,
            timings,
        })
    }

    pub fn expander(&self) -> &Mcp23008<B, D> {
        &self.expander
    }

    pub fn expander_mut(&mut self) -> &mut Mcp23008<B, D> {
        &mut self.expander
    }

    pub fn pins(&self) -> &PinAssignment {
        &self.pins
    }

    pub fn timings(&self) -> &LcdTimings {
        &self.timings
    }

    /// Presents the low 4 bits of `nibble` on D4..D7 and latches them with an enable pulse.
    fn write_nibble(&mut self, nibble: u8) -> GpioResult<()> {
        for (bit, &pin) in self.pins.data.iter().enumerate() {
            self.expander.set_pin(pin, nibble & (1 << bit) != 0)?;
        }
        self.expander.write_pins()?;
        self.expander
            .pulse_pin(self.pins.enable, self.timings.enable_pulse_us)
    }

    fn send(&mut self, data: u8, rs: bool) -> GpioResult<()> {
        trace!("Sending data: {:08b}, RS: {}", data, rs);

        self.expander.set_and_write_pin(self.pins.rs, rs)?;

        let high_nibble = (data >> 4) & 0x0F;
        let low_nibble = data & 0x0F;
        trace!("Writing HN: {:04b}", high_nibble);
        self.write_nibble(high_nibble)?;
        trace!("Writing LN: {:04b}", low_nibble);
        self.write_nibble(low_nibble)
    }
}

impl<B: RegisterBus, D: DelayNs + Debug> HD44780Driver for ExpanderHD44780Driver<B, D> {
    fn init(&mut self, multiline: bool, alt_font: bool) -> GpioResult<()> {
        debug!("Synchronizing HD44780 into 4-bit mode");
        // 0x3 three times resets the interface, the trailing 0x2 selects 4-bit mode
        self.send(0b0011_0011, false)?;
        self.send(0b0011_0010, false)?;
        self.set_display_control(true, false, false)?;
        self.function_set(false, multiline, alt_font)?;
        self.set_entry_mode(CursorDirection::Right, false)?;
        Ok(())
    }

    fn send_command(&mut self, command: u8) -> GpioResult<()> {
        self.send(command, false)
    }

    fn send_data(&mut self, data: u8) -> GpioResult<()> {
        self.send(data, true)
    }

    fn settle(&mut self) {
        self.expander.wait_us(self.timings.settle_us);
    }

    fn set_backlight(&mut self, on: bool) -> GpioResult<()> {
        trace!("Backlight: {}", on);
        self.expander.set_and_write_pin(self.pins.backlight, on)
    }
}
