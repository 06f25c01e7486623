//! Character LCD support.
//!
//! [LcdDisplay] is the high-level 16x2 display of the CrowPi, driving any [hd44780::HD44780Driver].
pub mod hd44780;
mod display;

pub use display::*;

use crate::{GpioError, GpioResult};

/// I2C bus the CrowPi display sits on.
pub const DEFAULT_BUS: u8 = 0x1;
/// I2C address of the CrowPi display's MCP23008.
pub const DEFAULT_ADDRESS: u16 = 0x21;

/// Lifecycle of an [LcdDisplay].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LcdState {
    /// Created, nothing sent to the controller yet.
    Uninitialized,
    /// The reset and mode sequence is in progress, or failed midway.
    Initializing,
    /// Text and commands may be sent.
    Ready,
}

/// Size of the display and where each row starts in DDRAM.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct DisplayGeometry {
    pub rows: usize,
    pub columns: usize,
    /// DDRAM address of the first cell of each row, for up to 4 rows.
    pub row_offsets: [u8; 4],
}

impl DisplayGeometry {
    pub const CROWPI: DisplayGeometry = DisplayGeometry {
        rows: 2,
        columns: 16,
        row_offsets: [0x00, 0x40, 0x14, 0x54],
    };

    /// Checks a 1-based row number.
    pub fn check_row(&self, row: usize) -> GpioResult<()> {
        if row < 1 || row > self.rows.min(self.row_offsets.len()) {
            return Err(GpioError::Configuration(format!(
                "display has only {} rows, got row {}",
                self.rows, row
            )));
        }
        Ok(())
    }

    /// DDRAM address of the cell at the 1-based `row` and 0-based `column`.
    pub fn ddram_address(&self, row: usize, column: usize) -> GpioResult<u8> {
        self.check_row(row)?;
        if column >= self.columns {
            return Err(GpioError::Configuration(format!(
                "display has only {} columns, got column {}",
                self.columns, column
            )));
        }
        u8::try_from(column)
            .ok()
            .and_then(|column| self.row_offsets[row - 1].checked_add(column))
            .ok_or_else(|| GpioError::Configuration(format!("column {} out of range", column)))
    }
}

impl Default for DisplayGeometry {
    fn default() -> Self {
        Self::CROWPI
    }
}
