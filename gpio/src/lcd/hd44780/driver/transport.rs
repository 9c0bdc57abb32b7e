use crate::lcd::hd44780::driver::{
    CommMode, ENABLE_PULSE_MS, HD44780Config, I2C_TIMEOUT_MS, LcdError, LcdResult,
};
use crate::soft::SoftGpioBusOutput;
use crate::{Delay, GpioBusOutput, GpioOutput, I2cOutput};
use log::trace;

/// PCF8574 pin assignment of the common LCD backpacks.
const I2C_RS: u8 = 0b0000_0001;
const I2C_EN: u8 = 0b0000_0100;
const I2C_BACKLIGHT: u8 = 0b0000_1000;

/// Splits a byte into the high and low nibble, in the order they go on the bus.
pub(crate) fn split_nibbles(byte: u8) -> (u8, u8) {
    ((byte >> 4) & 0x0F, byte & 0x0F)
}

/// Packs one byte into the four expander writes latching it: high nibble with EN high, then
/// low, and the same for the low nibble.
///
/// Data frames keep the backlight on throughout. Command frames only carry it on the last write.
pub(crate) fn pack_i2c_frame(byte: u8, rs: bool) -> [u8; 4] {
    let high = byte & 0xF0;
    let low = (byte << 4) & 0xF0;
    if rs {
        let flags = I2C_BACKLIGHT | I2C_RS;
        [high | flags | I2C_EN, high | flags, low | flags | I2C_EN, low | flags]
    } else {
        [high | I2C_EN, high, low | I2C_EN, low | I2C_BACKLIGHT]
    }
}

/// The writer selected for a communication mode, holding only the capabilities that mode uses.
#[derive(Debug)]
pub(crate) enum Transport<'a> {
    Parallel4Bit {
        pin_rs: &'a dyn GpioOutput,
        pin_rw: Option<&'a dyn GpioOutput>,
        pin_en: &'a dyn GpioOutput,
        data_bus: SoftGpioBusOutput<'a, 4>,
    },
    Parallel8Bit,
    I2c {
        bus: &'a dyn I2cOutput,
    },
}

impl<'a> Transport<'a> {
    pub(crate) fn from_config(config: &HD44780Config<'a>) -> LcdResult<Self> {
        let required = |pin: Option<&'a dyn GpioOutput>, name| pin.ok_or(LcdError::MissingCapability(name));

        match config.comm_mode {
            CommMode::Parallel4Bit => Ok(Transport::Parallel4Bit {
                pin_rs: required(config.pin_rs, "rs")?,
                pin_rw: config.pin_rw,
                pin_en: required(config.pin_en, "en")?,
                data_bus: SoftGpioBusOutput::new([
                    required(config.pins_data[4], "d4")?,
                    required(config.pins_data[5], "d5")?,
                    required(config.pins_data[6], "d6")?,
                    required(config.pins_data[7], "d7")?,
                ]),
            }),
            CommMode::Parallel8Bit => {
                required(config.pin_rs, "rs")?;
                required(config.pin_en, "en")?;
                Ok(Transport::Parallel8Bit)
            }
            CommMode::I2c => Ok(Transport::I2c {
                bus: config.i2c.ok_or(LcdError::MissingCapability("i2c"))?,
            }),
        }
    }

    /// Drives every control and data line low, so the first EN pulse starts from a known state.
    pub(crate) fn reset_lines(&self) -> LcdResult<()> {
        if let Transport::Parallel4Bit {
            pin_rs,
            pin_rw,
            pin_en,
            data_bus,
        } = self
        {
            pin_rs.write(false)?;
            if let Some(rw) = pin_rw {
                rw.write(false)?;
            }
            pin_en.write(false)?;
            let bus: &dyn GpioBusOutput<4> = data_bus;
            bus.write_nibble(0)?;
        }
        Ok(())
    }

    /// Writes a byte to the command (`rs == false`) or data (`rs == true`) register.
    pub(crate) fn write(&self, byte: u8, rs: bool, delay: &dyn Delay) -> LcdResult<()> {
        trace!("Sending data: {:08b}, RS: {}", byte, rs);

        match self {
            Transport::Parallel4Bit {
                pin_rs,
                pin_rw,
                pin_en,
                data_bus,
            } => {
                pin_rs.write(rs)?;
                if let Some(rw) = pin_rw {
                    rw.write(false)?;
                }

                let (high_nibble, low_nibble) = split_nibbles(byte);
                trace!("Writing HN: {:04b}", high_nibble);
                Self::write_nibble(data_bus, *pin_en, high_nibble, delay)?;
                trace!("Writing LN: {:04b}", low_nibble);
                Self::write_nibble(data_bus, *pin_en, low_nibble, delay)?;
                Ok(())
            }
            Transport::Parallel8Bit => Err(LcdError::NotSupported),
            Transport::I2c { bus } => {
                let frame = pack_i2c_frame(byte, rs);
                trace!("Writing frame: {:02X?}", frame);
                bus.send(&frame, I2C_TIMEOUT_MS)?;
                Ok(())
            }
        }
    }

    fn write_nibble(
        data_bus: &SoftGpioBusOutput<'_, 4>,
        pin_en: &dyn GpioOutput,
        nibble: u8,
        delay: &dyn Delay,
    ) -> LcdResult<()> {
        let bus: &dyn GpioBusOutput<4> = data_bus;
        bus.write_nibble(nibble)?;
        Self::pulse_e(pin_en, delay)
    }

    fn pulse_e(pin: &dyn GpioOutput, delay: &dyn Delay) -> LcdResult<()> {
        pin.write(true)?;
        delay.delay_ms(ENABLE_PULSE_MS);
        pin.write(false)?;
        delay.delay_ms(ENABLE_PULSE_MS);
        Ok(())
    }
}
