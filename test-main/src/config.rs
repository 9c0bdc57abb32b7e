use dotenv::var;
use hd44780_gpio::lcd::hd44780::driver::{CommMode, DisplaySize};
use serde::{Deserialize, Serialize};
use std::env::var_os;
use std::ffi::OsStr;
use std::path::Path;

/// What the playground puts on the simulated display.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
#[serde(default)]
pub struct Config {
    pub size: DisplaySize,
    pub comm_mode: CommMode,
    /// One entry per row, cut to the display width.
    pub lines: Vec<String>,
    pub counter: i32,
    pub reading: f32,
    pub precision: u8,
    /// Sleep for real instead of only accounting for the delays.
    pub real_time: bool,
}

impl Config {
    /// Loads `CONFIG_FILE` (default `lcd.json`), if it exists and parses.
    pub fn try_load() -> Option<Self> {
        let config_str = var_os("CONFIG_FILE");
        let config_str: &OsStr = config_str.as_deref().unwrap_or(OsStr::new("lcd.json"));
        let config_path = Path::new(config_str);
        if config_path.exists() {
            let file = std::fs::File::open(config_path).ok()?;
            let reader = std::io::BufReader::new(file);
            serde_json::from_reader(reader).ok()
        } else {
            None
        }
    }

    /// Applies the `LCD_SIZE` and `LCD_MODE` overrides from the environment.
    pub fn apply_env(&mut self) -> eyre::Result<()> {
        if let Ok(size) = var("LCD_SIZE") {
            self.size = size.parse()?;
        }
        if let Ok(mode) = var("LCD_MODE") {
            self.comm_mode = mode.parse()?;
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            size: DisplaySize::Size20x4,
            comm_mode: CommMode::I2c,
            lines: vec!["HD44780 playground".to_string(), "Hello, world!".to_string()],
            counter: -42,
            reading: 21.5,
            precision: 1,
            real_time: false,
        }
    }
}
