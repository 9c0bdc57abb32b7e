//! Capability traits and drivers for character LCDs.
//!
//! The driver never owns hardware. Pins, the I2C expander and the timer are handed in as
//! capabilities implementing [GpioOutput], [I2cOutput] and [Delay], either by a real backend or
//! by plain closures through the adapters in [func].

pub mod func;
pub mod lcd;
pub mod soft;

#[cfg(test)]
pub(crate) mod mock;

use std::fmt::Debug;
use thiserror::Error;

#[derive(Debug, Error, Eq, PartialEq, Clone)]
pub enum GpioError {
    #[error("pin already in use")]
    AlreadyInUse,
    #[error("invalid argument")]
    InvalidArgument,
    #[error("the feature is not supported on this backend")]
    NotSupported,
    #[error("transfer timed out")]
    Timeout,
    #[error("IO error: {0}")]
    Io(std::io::ErrorKind),
    #[error("error: {0}")]
    Other(String),
}

impl From<std::io::Error> for GpioError {
    fn from(err: std::io::Error) -> Self {
        GpioError::Io(err.kind())
    }
}

pub type GpioResult<T> = Result<T, GpioError>;

pub trait GpioOutput: Debug {
    /// Writes the state of the GPIO pin.
    fn write(&self, value: bool) -> GpioResult<()>;
}

pub trait GpioBusOutput<const N: usize>: Debug {
    fn write(&self, values: &[bool; N]) -> GpioResult<()>;
}

impl dyn GpioBusOutput<4> + '_ {
    /// Writes the values to the GPIO pins in the bus.
    /// The values are written as a nibble, LSb first.
    pub fn write_nibble(&self, value: u8) -> GpioResult<()> {
        if value > 0b1111 {
            return Err(GpioError::InvalidArgument);
        }

        let mut values = [false; 4];
        for (i, bit) in values.iter_mut().enumerate() {
            *bit = (value & (1 << i)) != 0;
        }
        self.write(&values)
    }
}

/// Transmit side of an I2C bus, already bound to the address of the target device.
pub trait I2cOutput: Debug {
    /// Sends `buf` in a single transfer, giving up after `timeout_ms` milliseconds.
    fn send(&self, buf: &[u8], timeout_ms: u32) -> GpioResult<()>;
}

/// Blocking millisecond delay.
pub trait Delay: Debug {
    fn delay_ms(&self, ms: u32);
}
