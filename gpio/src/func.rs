//! Adapters turning plain functions into capabilities.
//!
//! Handy when the pins are driven by some other HAL, or in firmware glue where a setter is just a
//! register write:
//!
//! ```
//! use hd44780_gpio::func::FnOutput;
//! use hd44780_gpio::GpioOutput;
//!
//! let pin = FnOutput::new(|level| {
//!     println!("EN -> {level}");
//!     Ok(())
//! });
//! pin.write(true).unwrap();
//! ```

use crate::{Delay, GpioOutput, GpioResult, I2cOutput};
use std::fmt::Debug;
use std::thread::sleep;
use std::time::Duration;

pub struct FnOutput<F> {
    func: F,
}

impl<F> FnOutput<F>
where
    F: Fn(bool) -> GpioResult<()>,
{
    pub fn new(func: F) -> Self {
        FnOutput { func }
    }
}

impl<F> Debug for FnOutput<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FnOutput")
    }
}

impl<F> GpioOutput for FnOutput<F>
where
    F: Fn(bool) -> GpioResult<()>,
{
    fn write(&self, value: bool) -> GpioResult<()> {
        (self.func)(value)
    }
}

pub struct FnI2c<F> {
    func: F,
}

impl<F> FnI2c<F>
where
    F: Fn(&[u8], u32) -> GpioResult<()>,
{
    pub fn new(func: F) -> Self {
        FnI2c { func }
    }
}

impl<F> Debug for FnI2c<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FnI2c")
    }
}

impl<F> I2cOutput for FnI2c<F>
where
    F: Fn(&[u8], u32) -> GpioResult<()>,
{
    fn send(&self, buf: &[u8], timeout_ms: u32) -> GpioResult<()> {
        (self.func)(buf, timeout_ms)
    }
}

pub struct FnDelay<F> {
    func: F,
}

impl<F> FnDelay<F>
where
    F: Fn(u32),
{
    pub fn new(func: F) -> Self {
        FnDelay { func }
    }
}

impl<F> Debug for FnDelay<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FnDelay")
    }
}

impl<F> Delay for FnDelay<F>
where
    F: Fn(u32),
{
    fn delay_ms(&self, ms: u32) {
        (self.func)(ms)
    }
}

/// Delay that puts the calling thread to sleep.
#[derive(Debug, Default, Copy, Clone)]
pub struct ThreadDelay;

impl Delay for ThreadDelay {
    fn delay_ms(&self, ms: u32) {
        sleep(Duration::from_millis(ms as u64));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GpioError;
    use std::cell::RefCell;

    #[test]
    fn closures_receive_every_call() {
        let levels = RefCell::new(Vec::new());
        let pin = FnOutput::new(|level| {
            levels.borrow_mut().push(level);
            Ok(())
        });

        pin.write(true).unwrap();
        pin.write(false).unwrap();

        assert_eq!(*levels.borrow(), vec![true, false]);
    }

    #[test]
    fn i2c_errors_are_returned_to_the_caller() {
        let bus = FnI2c::new(|_buf: &[u8], _timeout| Err(GpioError::Timeout));

        assert_eq!(bus.send(&[0x00], 1000), Err(GpioError::Timeout));
    }

    #[test]
    fn delay_forwards_milliseconds() {
        let total = RefCell::new(0);
        let delay = FnDelay::new(|ms| *total.borrow_mut() += ms);

        delay.delay_ms(2);
        delay.delay_ms(100);

        assert_eq!(*total.borrow(), 102);
    }
}
