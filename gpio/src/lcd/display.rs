use crate::bus::RegisterBus;
use crate::expander::Mcp23008;
use crate::lcd::hd44780::{command, CursorDirection, ExpanderHD44780Driver, HD44780Driver};
use crate::lcd::{DisplayGeometry, LcdState};
use crate::{GpioError, GpioResult};
use embedded_hal::delay::DelayNs;
use log::{debug, warn};
use std::fmt::Debug;

#[cfg(target_os = "linux")]
use crate::bus::LinuxI2cBus;
#[cfg(target_os = "linux")]
use crate::delay::ThreadSleep;
#[cfg(target_os = "linux")]
use crate::lcd::{DEFAULT_ADDRESS, DEFAULT_BUS};

/// Rows of a 5x8 glyph.
pub const GLYPH_ROWS: usize = 8;

/// The CrowPi display behind an MCP23008.
pub type ExpanderLcd<B, D> = LcdDisplay<ExpanderHD44780Driver<B, D>>;

/// Text display on top of an [HD44780Driver].
///
/// Created [LcdState::Uninitialized]; [LcdDisplay::initialize] moves it to [LcdState::Ready], and
/// only then are text and command operations accepted. The backlight can be switched in any state.
///
/// # Cursor
///
/// The cursor position lives in the controller and is not tracked here. Every operation that
/// needs a position sets it explicitly. Within one operation, N consecutive character writes with no
/// address command in between advance the controller's cursor by N cells.
///
/// # Errors
///
/// Row and glyph arguments are checked before anything is sent. Bus errors are returned as they
/// are, without retrying; the controller's cursor may then be anywhere, so reposition before
/// writing again.
#[derive(Debug)]
pub struct LcdDisplay<T: HD44780Driver> {
    driver: T,
    geometry: DisplayGeometry,
    state: LcdState,
}

impl<T: HD44780Driver> LcdDisplay<T> {
    pub fn new(driver: T) -> Self {
        Self::with_geometry(driver, DisplayGeometry::CROWPI)
    }

    pub fn with_geometry(driver: T, geometry: DisplayGeometry) -> Self {
        LcdDisplay {
            driver,
            geometry,
            state: LcdState::Uninitialized,
        }
    }

    pub fn state(&self) -> LcdState {
        self.state
    }

    pub fn geometry(&self) -> &DisplayGeometry {
        &self.geometry
    }

    pub fn driver(&self) -> &T {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut T {
        &mut self.driver
    }

    /// Turns the backlight on, runs the controller's reset and mode sequence and clears the screen.
    ///
    /// Can be called again after a failure, or to reset a display that got out of sync.
    pub fn initialize(&mut self) -> GpioResult<()> {
        debug!("Initializing LCD...");
        self.driver.set_backlight(true)?;
        self.state = LcdState::Initializing;
        self.driver.init(self.geometry.rows > 1, false)?;
        self.clear()?;
        self.state = LcdState::Ready;
        debug!("LCD ready.");
        Ok(())
    }

    fn ensure_ready(&self) -> GpioResult<()> {
        match self.state {
            LcdState::Ready => Ok(()),
            state => Err(GpioError::NotReady(state)),
        }
    }

    /// Sends `command | flags` as one instruction.
    pub fn execute_command(&mut self, command: u8, flags: u8) -> GpioResult<()> {
        self.ensure_ready()?;
        self.driver.send_command(command | flags)
    }

    /// Clears the screen and returns the cursor home.
    pub fn clear_display(&mut self) -> GpioResult<()> {
        self.ensure_ready()?;
        self.clear()
    }

    fn clear(&mut self) -> GpioResult<()> {
        self.driver.clear_display()?;
        self.driver.return_home()
    }

    /// Moves the cursor to the first cell of the first row.
    pub fn return_home(&mut self) -> GpioResult<()> {
        self.ensure_ready()?;
        self.driver.return_home()
    }

    /// Moves the cursor to the start of the 1-based `row`.
    pub fn set_cursor_to_line(&mut self, row: usize) -> GpioResult<()> {
        self.ensure_ready()?;
        self.goto_line(row)
    }

    fn goto_line(&mut self, row: usize) -> GpioResult<()> {
        let address = self.geometry.ddram_address(row, 0)?;
        self.driver.send_command(command::SET_DDRAM_ADDR | address)
    }

    /// Moves the cursor to the 1-based `row` and 0-based `column`.
    pub fn set_cursor_position(&mut self, row: usize, column: usize) -> GpioResult<()> {
        self.ensure_ready()?;
        let address = self.geometry.ddram_address(row, column)?;
        self.driver.set_ddram_address(address)
    }

    /// Overwrites the whole `row` with spaces. The cursor ends up past the end of the row.
    pub fn clear_line(&mut self, row: usize) -> GpioResult<()> {
        self.ensure_ready()?;
        self.blank_line(row)
    }

    fn blank_line(&mut self, row: usize) -> GpioResult<()> {
        self.goto_line(row)?;
        for _ in 0..self.geometry.columns {
            self.driver.send_data(b' ')?;
        }
        Ok(())
    }

    /// Replaces the content of `row` with `text`.
    ///
    /// `text` should fit into one row; it is not truncated, and whatever does not fit ends up
    /// wherever the controller's address counter goes next.
    pub fn write_line(&mut self, text: &str, row: usize) -> GpioResult<()> {
        self.ensure_ready()?;
        self.geometry.check_row(row)?;

        self.driver.return_home()?;
        self.blank_line(row)?;
        self.goto_line(row)?;
        for c in text.chars() {
            self.put_char(c)?;
        }
        Ok(())
    }

    /// Writes `text` starting at the first row.
    ///
    /// Every `'\n'` moves to the start of the second row. Without a line break, the text wraps to
    /// the second row once the first row is full.
    ///
    /// Characters outside ASCII are sent as `'?'`. The controller's ROM has more glyphs at
    /// 0x80..=0xFF, but which ones depends on the ROM variant, so they are not mapped.
    ///
    /// # Errors
    /// - `GpioError::Configuration` if the text needs a second row the display does not have.
    ///   Nothing is sent in that case.
    pub fn write_text(&mut self, text: &str) -> GpioResult<()> {
        self.ensure_ready()?;
        let columns = self.geometry.columns;
        if text.contains('\n') || text.chars().count() >= columns {
            self.geometry.check_row(2)?;
        }
        self.goto_line(1)?;

        let mut wrapped = false;
        let mut first_row_len = 0;
        for c in text.chars() {
            if c == '\n' {
                self.goto_line(2)?;
                wrapped = true;
                continue;
            }

            self.put_char(c)?;

            if !wrapped {
                first_row_len += 1;
                if first_row_len == columns {
                    self.goto_line(2)?;
                    wrapped = true;
                }
            }
        }
        Ok(())
    }

    fn put_char(&mut self, c: char) -> GpioResult<()> {
        let byte = if c.is_ascii() {
            c as u8
        } else {
            warn!("Non-ASCII character: {}", c);
            b'?'
        };
        self.driver.send_data(byte)
    }

    /// Stores a 5x8 glyph in one of the 8 CGRAM slots. Print it with the character `slot`.
    ///
    /// `slot` is taken modulo 8. Missing rows of `pattern` are left blank, so exactly 8 rows are
    /// always written. The cursor stays in CGRAM afterwards; the text operations reposition it.
    ///
    /// # Errors
    /// - `GpioError::Configuration` if `pattern` has more than 8 rows.
    pub fn create_own_character(&mut self, slot: u8, pattern: &[u8]) -> GpioResult<()> {
        self.ensure_ready()?;
        if pattern.len() > GLYPH_ROWS {
            return Err(GpioError::Configuration(format!(
                "glyph has {} rows, a 5x8 character has only {}",
                pattern.len(),
                GLYPH_ROWS
            )));
        }

        let slot = slot & 0x7;
        self.driver.set_cgram_address(slot << 3)?;
        for row in 0..GLYPH_ROWS {
            self.driver.send_data(pattern.get(row).copied().unwrap_or(0))?;
        }
        Ok(())
    }

    /// Switches the backlight. Works before [LcdDisplay::initialize] too.
    pub fn set_display_backlight(&mut self, on: bool) -> GpioResult<()> {
        self.driver.set_backlight(on)
    }

    pub fn set_display_control(
        &mut self,
        display_on: bool,
        cursor_on: bool,
        blink_on: bool,
    ) -> GpioResult<()> {
        self.ensure_ready()?;
        self.driver.set_display_control(display_on, cursor_on, blink_on)
    }

    /// Moves the cursor, or with `display` the whole display content, by one cell.
    pub fn shift(&mut self, display: bool, direction: CursorDirection) -> GpioResult<()> {
        self.ensure_ready()?;
        self.driver.cursor_shift(display, direction)
    }
}

impl<B: RegisterBus, D: DelayNs + Debug> LcdDisplay<ExpanderHD44780Driver<B, D>> {
    /// Configures the expander reachable through `bus` with the CrowPi wiring.
    ///
    /// Only the expander's direction register is written; call [LcdDisplay::initialize] next.
    pub fn with_bus(bus: B, delay: D) -> GpioResult<Self> {
        let expander = Mcp23008::new(bus, delay)?;
        Ok(LcdDisplay::new(ExpanderHD44780Driver::new(expander)))
    }
}

#[cfg(target_os = "linux")]
impl LcdDisplay<ExpanderHD44780Driver<LinuxI2cBus, ThreadSleep>> {
    /// Opens the display on `/dev/i2c-<bus>` at `address`.
    pub fn open(bus: u8, address: u16) -> GpioResult<Self> {
        Self::with_bus(LinuxI2cBus::open(bus, address)?, ThreadSleep)
    }

    /// Opens the display where the CrowPi has it.
    pub fn open_default() -> GpioResult<Self> {
        Self::open(DEFAULT_BUS, DEFAULT_ADDRESS)
    }
}
