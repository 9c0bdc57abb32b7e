use crate::{Delay, GpioOutput, I2cOutput};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

/// Character geometry of the attached display.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DisplaySize {
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "16x2"))]
    Size16x2,
    #[cfg_attr(feature = "serde", serde(rename = "16x4"))]
    Size16x4,
    #[cfg_attr(feature = "serde", serde(rename = "20x4"))]
    Size20x4,
}

impl DisplaySize {
    pub fn columns(&self) -> u8 {
        match self {
            DisplaySize::Size16x2 | DisplaySize::Size16x4 => 16,
            DisplaySize::Size20x4 => 20,
        }
    }

    pub fn rows(&self) -> u8 {
        match self {
            DisplaySize::Size16x2 => 2,
            DisplaySize::Size16x4 | DisplaySize::Size20x4 => 4,
        }
    }

    /// DDRAM address of the first column of each row.
    ///
    /// Rows 2 and 3 continue rows 0 and 1 right after the last visible column.
    pub fn row_offsets(&self) -> &'static [u8] {
        match self {
            DisplaySize::Size16x2 => &[0x00, 0x40],
            DisplaySize::Size16x4 => &[0x00, 0x40, 0x10, 0x50],
            DisplaySize::Size20x4 => &[0x00, 0x40, 0x14, 0x54],
        }
    }
}

impl Display for DisplaySize {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.columns(), self.rows())
    }
}

impl FromStr for DisplaySize {
    type Err = ParseConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "16x2" => Ok(DisplaySize::Size16x2),
            "16x4" => Ok(DisplaySize::Size16x4),
            "20x4" => Ok(DisplaySize::Size20x4),
            _ => Err(ParseConfigError::UnknownSize(s.to_string())),
        }
    }
}

/// How the controller is wired to the host.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CommMode {
    /// RS, optional RW, EN and D4..D7.
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "4bit"))]
    Parallel4Bit,
    /// RS, optional RW, EN and D0..D7. Accepted by the configuration, but every write fails with
    /// [super::LcdError::NotSupported].
    #[cfg_attr(feature = "serde", serde(rename = "8bit"))]
    Parallel8Bit,
    /// PCF8574 expander backpack.
    #[cfg_attr(feature = "serde", serde(rename = "i2c"))]
    I2c,
}

impl Display for CommMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CommMode::Parallel4Bit => write!(f, "4-bit parallel"),
            CommMode::Parallel8Bit => write!(f, "8-bit parallel"),
            CommMode::I2c => write!(f, "I2C"),
        }
    }
}

impl FromStr for CommMode {
    type Err = ParseConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "4bit" | "4-bit" => Ok(CommMode::Parallel4Bit),
            "8bit" | "8-bit" => Ok(CommMode::Parallel8Bit),
            "i2c" => Ok(CommMode::I2c),
            _ => Err(ParseConfigError::UnknownMode(s.to_string())),
        }
    }
}

#[derive(Debug, Error, Eq, PartialEq, Clone)]
pub enum ParseConfigError {
    #[error("unknown display size: {0}")]
    UnknownSize(String),
    #[error("unknown communication mode: {0}")]
    UnknownMode(String),
}

/// Wiring of a display, copied into an [super::HD44780Handle] by
/// [super::HD44780Handle::set_config].
///
/// Only the capabilities needed by `comm_mode` have to be present:
///
/// | Mode                     | Required                          |
/// |--------------------------|-----------------------------------|
/// | [CommMode::Parallel4Bit] | `pin_rs`, `pin_en`, D4..D7, delay |
/// | [CommMode::Parallel8Bit] | `pin_rs`, `pin_en`, delay         |
/// | [CommMode::I2c]          | `i2c`, delay                      |
///
/// `pin_rw` is optional; when present it's held low, as the driver never reads. Connect RW to
/// GND otherwise.
#[derive(Debug, Copy, Clone, Default)]
pub struct HD44780Config<'a> {
    pub size: DisplaySize,
    pub comm_mode: CommMode,
    pub pin_rs: Option<&'a dyn GpioOutput>,
    pub pin_rw: Option<&'a dyn GpioOutput>,
    pub pin_en: Option<&'a dyn GpioOutput>,
    /// D0..D7, indexed by data line.
    pub pins_data: [Option<&'a dyn GpioOutput>; 8],
    pub i2c: Option<&'a dyn I2cOutput>,
    pub delay: Option<&'a dyn Delay>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_parse_from_their_display_form() {
        for size in [DisplaySize::Size16x2, DisplaySize::Size16x4, DisplaySize::Size20x4] {
            assert_eq!(size.to_string().parse::<DisplaySize>(), Ok(size));
        }
        assert_eq!(
            "24x2".parse::<DisplaySize>(),
            Err(ParseConfigError::UnknownSize("24x2".into()))
        );
    }

    #[test]
    fn modes_parse_case_insensitively() {
        assert_eq!("I2C".parse::<CommMode>(), Ok(CommMode::I2c));
        assert_eq!(" 4bit ".parse::<CommMode>(), Ok(CommMode::Parallel4Bit));
        assert_eq!("8-bit".parse::<CommMode>(), Ok(CommMode::Parallel8Bit));
        assert!("spi".parse::<CommMode>().is_err());
    }

    #[test]
    fn row_offsets_cover_every_row() {
        for size in [DisplaySize::Size16x2, DisplaySize::Size16x4, DisplaySize::Size20x4] {
            assert_eq!(size.row_offsets().len(), size.rows() as usize);
            // The last visible cell of every row has to be addressable.
            for offset in size.row_offsets() {
                assert!(offset + size.columns() - 1 <= 0x7F);
            }
        }
    }

    #[test]
    fn default_wiring_is_empty() {
        let config = HD44780Config::default();
        assert_eq!(config.size, DisplaySize::Size16x2);
        assert_eq!(config.comm_mode, CommMode::Parallel4Bit);
        assert!(config.pin_rs.is_none());
        assert!(config.pins_data.iter().all(Option::is_none));
        assert!(config.delay.is_none());
    }
}
