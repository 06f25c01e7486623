//! HD44780 LCD controller.
//!
//! [driver::HD44780Driver] encodes the controller's instruction set and leaves the transfer of
//! single bytes to the implementation. [driver::ExpanderHD44780Driver] transfers them in 4-bit mode
//! over an MCP23008 expander.

pub mod driver;

pub use driver::*;
