//! HD44780 character LCD module.
//!
//! The controller is driven either over a 4-bit parallel bus (RS, optional RW, EN and D4..D7) or
//! through a PCF8574 I2C expander wired to the same parallel pins. See
//! [driver::HD44780Driver] for the command set and [driver::HD44780Handle] for wiring it up.

pub mod driver;
