//! Drivers for an HD44780 character LCD wired to an MCP23008 I/O expander, as found on the
//! CrowPi kit.
//!
//! The layers, bottom up:
//! - [bus::RegisterBus] writes one byte to one register of the expander,
//! - [expander::Mcp23008] caches the 8 output pins and flushes them as one register write,
//! - [lcd::hd44780::HD44780Driver] encodes controller commands, implemented over the expander by
//!   [lcd::hd44780::ExpanderHD44780Driver],
//! - [lcd::LcdDisplay] renders text and glyphs on the 16x2 display.
pub mod bus;
pub mod delay;
pub mod expander;
pub mod lcd;

use crate::lcd::LcdState;
use thiserror::Error;

#[derive(Debug, Error, Eq, PartialEq, Clone)]
pub enum GpioError {
    /// An argument does not fit the display, e.g. a row other than 1 or 2.
    #[error("invalid configuration: {0}")]
    Configuration(String),
    #[error("pin index {0} out of range, the expander has 8 pins")]
    InvalidPin(usize),
    #[error("display is not ready (state: {0:?})")]
    NotReady(LcdState),
    #[error("IO error: {0}")]
    Io(std::io::ErrorKind),
    #[error("transport error: {0}")]
    Transport(String),
}

impl GpioError {
    /// Whether the error came from the bus rather than from the caller's arguments.
    pub fn is_transport(&self) -> bool {
        matches!(self, GpioError::Io(_) | GpioError::Transport(_))
    }
}

impl From<std::io::Error> for GpioError {
    fn from(err: std::io::Error) -> Self {
        GpioError::Io(err.kind())
    }
}

pub type GpioResult<T> = Result<T, GpioError>;
