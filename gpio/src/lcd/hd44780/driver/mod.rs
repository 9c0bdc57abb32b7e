mod config;
mod handle;
mod transport;

use crate::GpioError;
pub use config::*;
pub use handle::*;
use std::fmt::Debug;
use thiserror::Error;

/// Address of a PCF8574 expander with all address pins pulled high, as on most LCD backpacks.
pub const PCF8574_ADDRESS: u8 = 0x27;
/// Same backpack built around the PCF8574A.
pub const PCF8574A_ADDRESS: u8 = 0x3F;

/// Timeout handed to every I2C transfer.
pub const I2C_TIMEOUT_MS: u32 = 1000;
/// Time the controller needs after clear and home. The busy flag is never polled.
pub const BUSY_WAIT_MS: u32 = 2;
/// Settle time after each command of the power-on sequence.
pub const INIT_SETTLE_MS: u32 = 100;
/// EN is held high, and then low, for this long on every nibble.
pub const ENABLE_PULSE_MS: u32 = 1;

#[derive(Debug, Error, Eq, PartialEq, Clone)]
pub enum LcdError {
    #[error("display handle is not configured")]
    NullHandle,
    #[error("missing capability for the selected mode: {0}")]
    MissingCapability(&'static str),
    #[error("the communication mode is not supported")]
    NotSupported,
    #[error("invalid argument")]
    InvalidArgument,
    #[error("GPIO error: {0}")]
    Gpio(#[from] GpioError),
}

pub type LcdResult<T> = Result<T, LcdError>;

/// High-level interface of an HD44780 controller.
///
/// Everything is built on [Self::send_command], [Self::send_data] and [Self::delay_ms], which
/// are provided by the concrete driver. Each operation first checks that the driver is
/// configured, so an unconfigured driver fails with [LcdError::NullHandle] before any
/// capability is touched. Multi-write operations stop at the first failure; whatever was
/// already written stays on the display.
pub trait HD44780Driver: Debug {
    /// Runs the power-on sequence of the controller. This is to be implemented by the specific
    /// driver, see [HD44780Handle::configure].
    fn configure(&mut self) -> LcdResult<()>;

    /// Clears the display and sets the cursor to the home position.
    fn clear_display(&mut self) -> LcdResult<()> {
        self.ensure_configured()?;
        self.send_command(0b00000001)?;
        self.delay_ms(BUSY_WAIT_MS)
    }

    /// Sets the cursor to the home position.
    fn return_home(&mut self) -> LcdResult<()> {
        self.ensure_configured()?;
        self.send_command(0b00000010)?;
        self.delay_ms(BUSY_WAIT_MS)
    }

    /// Sets the display to the specified entry mode.
    fn set_entry_mode(&mut self, cursor_direction: CursorDirection, shift: bool) -> LcdResult<()> {
        let mut command = 0b00000100;
        if cursor_direction == CursorDirection::Right {
            command |= 0b00000010;
        }
        if shift {
            command |= 0b00000001;
        }
        self.send_command(command)
    }

    /// Sets the display on/off, cursor on/off, and blinking on/off.
    fn set_display_control(
        &mut self,
        display_on: bool,
        cursor_on: bool,
        blink_on: bool,
    ) -> LcdResult<()> {
        let mut command = 0b00001000;
        if display_on {
            command |= 0b00000100;
        }
        if cursor_on {
            command |= 0b00000010;
        }
        if blink_on {
            command |= 0b00000001;
        }
        self.send_command(command)
    }

    /// Moves the cursor or shifts the display.
    fn cursor_shift(&mut self, display_shift: bool, direction: CursorDirection) -> LcdResult<()> {
        let mut command = 0b00010000;
        if display_shift {
            command |= 0b00001000;
        }
        if direction == CursorDirection::Right {
            command |= 0b00000100;
        }
        self.send_command(command)
    }

    /// Sets the function set.
    fn function_set(&mut self, data_length: bool, two_lines: bool, font: bool) -> LcdResult<()> {
        let mut command = 0b00100000;
        if data_length {
            command |= 0b00010000;
        }
        if two_lines {
            command |= 0b00001000;
        }
        if font {
            command |= 0b00000100;
        }
        self.send_command(command)
    }

    /// Sets the CGRAM address.
    fn set_cgram_address(&mut self, address: u8) -> LcdResult<()> {
        self.ensure_configured()?;
        if address > 0b00111111 {
            return Err(LcdError::InvalidArgument);
        }
        self.send_command(0b01000000 | address)
    }

    /// Sets the DDRAM address.
    fn set_ddram_address(&mut self, address: u8) -> LcdResult<()> {
        self.ensure_configured()?;
        if address > 0b01111111 {
            return Err(LcdError::InvalidArgument);
        }
        self.send_command(0b10000000 | address)
    }

    /// Writes a single character code to the data register.
    fn write_char(&mut self, chr: u8) -> LcdResult<()> {
        self.send_data(chr)
    }

    /// Writes bytes up to, not including, the first `0` terminator or the end of the slice.
    fn write_bytes(&mut self, bytes: &[u8]) -> LcdResult<()> {
        self.ensure_configured()?;
        for &byte in bytes.iter().take_while(|&&byte| byte != 0) {
            self.send_data(byte)?;
        }
        Ok(())
    }

    /// Writes the UTF-8 bytes of `s`. Only ASCII maps to the expected glyphs of the ROM.
    fn write_string(&mut self, s: &str) -> LcdResult<()> {
        self.write_bytes(s.as_bytes())
    }

    /// Writes `number` in decimal, with a leading `-` when negative.
    fn write_int(&mut self, number: i32) -> LcdResult<()> {
        self.ensure_configured()?;
        if number < 0 {
            self.send_data(b'-')?;
        }
        self.write_bytes(number.unsigned_abs().to_string().as_bytes())
    }

    /// Writes `number` with exactly `precision` decimals, with a leading `-` when negative.
    fn write_float(&mut self, number: f32, precision: u8) -> LcdResult<()> {
        self.ensure_configured()?;
        let mut number = number;
        if number < 0.0 {
            self.send_data(b'-')?;
            number = -number;
        }
        let formatted = format!("{:.*}", precision as usize, number);
        self.write_bytes(formatted.as_bytes())
    }

    /// Moves the cursor to column `col` of row `row`, both zero-based.
    ///
    /// # Errors
    /// - [LcdError::InvalidArgument] if `row` does not exist on the configured display, or the
    ///   resulting DDRAM address is out of range.
    fn gotoxy(&mut self, col: u8, row: u8) -> LcdResult<()> {
        let size = self.size()?;
        let base = size
            .row_offsets()
            .get(row as usize)
            .copied()
            .ok_or(LcdError::InvalidArgument)?;
        let address = base.checked_add(col).ok_or(LcdError::InvalidArgument)?;
        self.set_ddram_address(address)
    }

    /// Moves the cursor `step` positions to the right.
    fn shift_cursor_forward(&mut self, step: u8) -> LcdResult<()> {
        self.ensure_configured()?;
        for _ in 0..step {
            self.cursor_shift(false, CursorDirection::Right)?;
        }
        Ok(())
    }

    /// Moves the cursor `step` positions to the left.
    fn shift_cursor_backward(&mut self, step: u8) -> LcdResult<()> {
        self.ensure_configured()?;
        for _ in 0..step {
            self.cursor_shift(false, CursorDirection::Left)?;
        }
        Ok(())
    }

    // Low-level commands
    // These are used by the high-level functions above and implemented by the driver itself.

    /// Fails with [LcdError::NullHandle] unless the driver has been configured.
    fn ensure_configured(&self) -> LcdResult<()>;

    /// Size of the attached display.
    fn size(&self) -> LcdResult<DisplaySize>;

    /// Sends a command to the HD44780 controller.
    /// Sets the RS pin to 0 (command).
    fn send_command(&mut self, command: u8) -> LcdResult<()>;

    /// Sends data to the HD44780 controller.
    /// Sets the RS pin to 1 (data).
    fn send_data(&mut self, data: u8) -> LcdResult<()>;

    /// Blocks for `ms` milliseconds using the injected delay.
    fn delay_ms(&mut self, ms: u32) -> LcdResult<()>;
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum CursorDirection {
    /// Moves the cursor to the left after writing/reading data.
    Left,
    /// Moves the cursor to the right after writing/reading data.
    Right,
}
