use crate::{GpioBusOutput, GpioOutput, GpioResult};
use std::fmt::Debug;

/// A bus made of individual output pins, written one after another, index 0 first.
pub struct SoftGpioBusOutput<'a, const N: usize> {
    pins: [&'a dyn GpioOutput; N],
}

impl<'a, const N: usize> SoftGpioBusOutput<'a, N> {
    pub fn new(pins: [&'a dyn GpioOutput; N]) -> Self {
        Self { pins }
    }
}

impl<const N: usize> Debug for SoftGpioBusOutput<'_, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SoftGpioBusOutput({:?})", self.pins)
    }
}

impl<const N: usize> GpioBusOutput<N> for SoftGpioBusOutput<'_, N> {
    fn write(&self, values: &[bool; N]) -> GpioResult<()> {
        for (pin, value) in self.pins.iter().zip(values) {
            pin.write(*value)?;
        }

        Ok(())
    }
}
