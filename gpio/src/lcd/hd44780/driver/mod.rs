mod expander;

use crate::{GpioError, GpioResult};
pub use expander::*;
use std::fmt::Debug;

/// Instruction opcodes. Flags are OR-ed into the low bits.
pub mod command {
    pub const CLEAR_DISPLAY: u8 = 0x01;
    pub const RETURN_HOME: u8 = 0x02;
    pub const ENTRY_MODE_SET: u8 = 0x04;
    pub const DISPLAY_CONTROL: u8 = 0x08;
    pub const CURSOR_SHIFT: u8 = 0x10;
    pub const FUNCTION_SET: u8 = 0x20;
    pub const SET_CGRAM_ADDR: u8 = 0x40;
    pub const SET_DDRAM_ADDR: u8 = 0x80;
}

/// Flag bits for the instructions in [command].
pub mod flag {
    // Entry mode
    pub const ENTRY_LEFT: u8 = 0x02;
    pub const ENTRY_SHIFT_INCREMENT: u8 = 0x01;

    // Display control
    pub const DISPLAY_ON: u8 = 0x04;
    pub const CURSOR_ON: u8 = 0x02;
    pub const BLINK_ON: u8 = 0x01;

    // Cursor shift
    pub const DISPLAY_MOVE: u8 = 0x08;
    pub const MOVE_RIGHT: u8 = 0x04;

    // Function set
    pub const EIGHT_BIT_MODE: u8 = 0x10;
    pub const TWO_LINE: u8 = 0x08;
    pub const FONT_5X10: u8 = 0x04;
}

/// Highest CGRAM address, 8 glyphs of 8 rows.
pub const CGRAM_ADDRESS_MAX: u8 = 0b0011_1111;
/// Highest DDRAM address.
pub const DDRAM_ADDRESS_MAX: u8 = 0b0111_1111;

/// Write-only HD44780 controller.
///
/// The encoders are default methods built on [Self::send_command] and [Self::send_data], so an
/// implementation only has to move bytes to the controller.
pub trait HD44780Driver: Debug {
    /// Brings the controller into 4-bit mode and applies the default settings.
    fn init(&mut self, multiline: bool, alt_font: bool) -> GpioResult<()>;

    /// Clears the display and waits for the controller to finish.
    fn clear_display(&mut self) -> GpioResult<()> {
        self.send_command(command::CLEAR_DISPLAY)?;
        self.settle();
        Ok(())
    }

    /// Moves the cursor to the home position and waits for the controller to finish.
    fn return_home(&mut self) -> GpioResult<()> {
        self.send_command(command::RETURN_HOME)?;
        self.settle();
        Ok(())
    }

    fn set_entry_mode(&mut self, cursor_direction: CursorDirection, shift: bool) -> GpioResult<()> {
        let mut command = command::ENTRY_MODE_SET;
        if cursor_direction == CursorDirection::Right {
            command |= flag::ENTRY_LEFT;
        }
        if shift {
            command |= flag::ENTRY_SHIFT_INCREMENT;
        }
        self.send_command(command)
    }

    /// Sets the display on/off, cursor on/off, and blinking on/off.
    fn set_display_control(
        &mut self,
        display_on: bool,
        cursor_on: bool,
        blink_on: bool,
    ) -> GpioResult<()> {
        let mut command = command::DISPLAY_CONTROL;
        if display_on {
            command |= flag::DISPLAY_ON;
        }
        if cursor_on {
            command |= flag::CURSOR_ON;
        }
        if blink_on {
            command |= flag::BLINK_ON;
        }
        self.send_command(command)
    }

    /// Moves the cursor or shifts the display by one cell.
    fn cursor_shift(&mut self, display_shift: bool, direction: CursorDirection) -> GpioResult<()> {
        let mut command = command::CURSOR_SHIFT;
        if display_shift {
            command |= flag::DISPLAY_MOVE;
        }
        if direction == CursorDirection::Right {
            command |= flag::MOVE_RIGHT;
        }
        self.send_command(command)
    }

    fn function_set(&mut self, data_length: bool, two_lines: bool, font: bool) -> GpioResult<()> {
        let mut command = command::FUNCTION_SET;
        if data_length {
            command |= flag::EIGHT_BIT_MODE;
        }
        if two_lines {
            command |= flag::TWO_LINE;
        }
        if font {
            command |= flag::FONT_5X10;
        }
        self.send_command(command)
    }

    fn set_cgram_address(&mut self, address: u8) -> GpioResult<()> {
        if address > CGRAM_ADDRESS_MAX {
            return Err(GpioError::Configuration(format!(
                "CGRAM address {:#04x} out of range",
                address
            )));
        }
        self.send_command(command::SET_CGRAM_ADDR | address)
    }

    fn set_ddram_address(&mut self, address: u8) -> GpioResult<()> {
        if address > DDRAM_ADDRESS_MAX {
            return Err(GpioError::Configuration(format!(
                "DDRAM address {:#04x} out of range",
                address
            )));
        }
        self.send_command(command::SET_DDRAM_ADDR | address)
    }

    // Low-level operations, implemented per transport.

    /// Sends a command byte (RS low).
    fn send_command(&mut self, command: u8) -> GpioResult<()>;

    /// Sends a data byte (RS high).
    fn send_data(&mut self, data: u8) -> GpioResult<()>;

    /// Waits long enough for a clear or home instruction to complete.
    fn settle(&mut self);

    /// Switches the backlight. Does not go through the instruction protocol.
    fn set_backlight(&mut self, on: bool) -> GpioResult<()>;
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum CursorDirection {
    /// Moves the cursor to the left after writing data.
    Left,
    /// Moves the cursor to the right after writing data.
    Right,
}
