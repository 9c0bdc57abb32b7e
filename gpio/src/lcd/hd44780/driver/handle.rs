use crate::Delay;
use crate::lcd::hd44780::driver::transport::Transport;
use crate::lcd::hd44780::driver::{
    CommMode, CursorDirection, DisplaySize, HD44780Config, HD44780Driver, INIT_SETTLE_MS,
    LcdError, LcdResult,
};
use log::debug;
use std::fmt;

/// Handle of a single HD44780 display.
///
/// A new handle is unconfigured, and every operation on it fails with [LcdError::NullHandle]
/// until [Self::set_config] succeeds. After that, [HD44780Driver::configure] has to run once to
/// put the controller into 4-bit, two-line mode before anything is written.
///
/// ```
/// use hd44780_gpio::func::{FnI2c, ThreadDelay};
/// use hd44780_gpio::lcd::hd44780::driver::{
///     CommMode, DisplaySize, HD44780Config, HD44780Driver, HD44780Handle,
/// };
///
/// let bus = FnI2c::new(|_frame: &[u8], _timeout| Ok(()));
/// let delay = ThreadDelay;
///
/// let mut lcd = HD44780Handle::new();
/// lcd.set_config(HD44780Config {
///     size: DisplaySize::Size16x2,
///     comm_mode: CommMode::I2c,
///     i2c: Some(&bus),
///     delay: Some(&delay),
///     ..HD44780Config::default()
/// })?;
/// lcd.gotoxy(0, 1)?;
/// lcd.write_string("Hello")?;
/// # Ok::<(), hd44780_gpio::lcd::hd44780::driver::LcdError>(())
/// ```
///
/// The capabilities are borrowed for the handle's lifetime. Nothing here is synchronized; a
/// handle must only be used from one thread at a time.
#[derive(Debug, Default)]
pub struct HD44780Handle<'a> {
    state: Option<Configured<'a>>,
}

#[derive(Debug)]
struct Configured<'a> {
    size: DisplaySize,
    comm_mode: CommMode,
    transport: Transport<'a>,
    delay: &'a dyn Delay,
}

impl<'a> HD44780Handle<'a> {
    /// Creates an unconfigured handle.
    pub fn new() -> Self {
        HD44780Handle { state: None }
    }

    /// Creates a handle and applies `config` to it.
    pub fn with_config(config: HD44780Config<'a>) -> LcdResult<Self> {
        let mut handle = Self::new();
        handle.set_config(config)?;
        Ok(handle)
    }

    /// Copies the wiring into the handle and selects the writer for its communication mode.
    ///
    /// Nothing is sent to the display yet.
    ///
    /// # Errors
    /// - [LcdError::MissingCapability] if a capability required by the mode is absent. The
    ///   handle keeps its previous configuration in that case.
    pub fn set_config(&mut self, config: HD44780Config<'a>) -> LcdResult<()> {
        let transport = Transport::from_config(&config)?;
        let delay = config.delay.ok_or(LcdError::MissingCapability("delay"))?;

        debug!("Configured {} display over {}", config.size, config.comm_mode);
        self.state = Some(Configured {
            size: config.size,
            comm_mode: config.comm_mode,
            transport,
            delay,
        });
        Ok(())
    }

    pub fn is_configured(&self) -> bool {
        self.state.is_some()
    }

    pub fn comm_mode(&self) -> Option<CommMode> {
        self.state.as_ref().map(|state| state.comm_mode)
    }

    fn state(&self) -> LcdResult<&Configured<'a>> {
        self.state.as_ref().ok_or(LcdError::NullHandle)
    }

    fn settle(&mut self) -> LcdResult<()> {
        self.delay_ms(INIT_SETTLE_MS)
    }
}

impl HD44780Driver for HD44780Handle<'_> {
    /// Resets the parallel lines, then sends return home, function set (4-bit, two lines),
    /// entry mode (increment, no shift), display control (display on, no cursor) and clear,
    /// each followed by a 100 ms settle delay.
    ///
    /// # Errors
    /// - [LcdError::NotSupported] for [CommMode::Parallel8Bit].
    fn configure(&mut self) -> LcdResult<()> {
        let state = self.state()?;
        debug!("Initializing {} display over {}", state.size, state.comm_mode);
        state.transport.reset_lines()?;

        // Return home doubles as the switch into 4-bit mode.
        self.send_command(0b00000010)?;
        self.settle()?;
        self.function_set(false, true, false)?;
        self.settle()?;
        self.set_entry_mode(CursorDirection::Right, false)?;
        self.settle()?;
        self.set_display_control(true, false, false)?;
        self.settle()?;
        self.send_command(0b00000001)?;
        self.settle()?;

        debug!("Display initialized");
        Ok(())
    }

    fn ensure_configured(&self) -> LcdResult<()> {
        self.state().map(|_| ())
    }

    fn size(&self) -> LcdResult<DisplaySize> {
        self.state().map(|state| state.size)
    }

    fn send_command(&mut self, command: u8) -> LcdResult<()> {
        let state = self.state()?;
        state.transport.write(command, false, state.delay)
    }

    fn send_data(&mut self, data: u8) -> LcdResult<()> {
        let state = self.state()?;
        state.transport.write(data, true, state.delay)
    }

    fn delay_ms(&mut self, ms: u32) -> LcdResult<()> {
        self.state()?.delay.delay_ms(ms);
        Ok(())
    }
}

impl fmt::Write for HD44780Handle<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.write_string(s).map_err(|_| fmt::Error)
    }
}
