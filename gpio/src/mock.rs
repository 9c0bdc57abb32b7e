//! Recording capabilities for tests. Every pin, the I2C bus and the delay share one event log,
//! so the relative order of all hardware interactions can be asserted.

use crate::lcd::hd44780::driver::{CommMode, DisplaySize, HD44780Config};
use crate::{Delay, GpioError, GpioOutput, GpioResult, I2cOutput};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Pin(&'static str, bool),
    I2c(Vec<u8>, u32),
    Delay(u32),
}

#[derive(Debug, Clone, Default)]
pub struct MockLog(Rc<RefCell<Vec<Event>>>);

impl MockLog {
    pub fn push(&self, event: Event) {
        self.0.borrow_mut().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.borrow().clone()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    pub fn delays(&self) -> Vec<u32> {
        self.0
            .borrow()
            .iter()
            .filter_map(|event| match event {
                Event::Delay(ms) => Some(*ms),
                _ => None,
            })
            .collect()
    }

    /// Bytes latched by the controller over the parallel bus, tagged with the RS level.
    ///
    /// A nibble is latched on every falling edge of EN, using the current D4..D7 and RS levels.
    pub fn parallel_writes(&self) -> Vec<(bool, u8)> {
        let mut rs = false;
        let mut en = false;
        let mut data = [false; 4];
        let mut pending: Option<u8> = None;
        let mut writes = Vec::new();

        for event in self.0.borrow().iter() {
            let Event::Pin(name, level) = event else {
                continue;
            };
            match *name {
                "rs" => rs = *level,
                "d4" => data[0] = *level,
                "d5" => data[1] = *level,
                "d6" => data[2] = *level,
                "d7" => data[3] = *level,
                "en" => {
                    if en && !*level {
                        let nibble = data
                            .iter()
                            .enumerate()
                            .fold(0u8, |acc, (i, bit)| acc | ((*bit as u8) << i));
                        match pending.take() {
                            Some(high) => writes.push((rs, (high << 4) | nibble)),
                            None => pending = Some(nibble),
                        }
                    }
                    en = *level;
                }
                _ => {}
            }
        }

        writes
    }

    /// Bytes carried by the four-byte PCF8574 frames, tagged with the RS bit.
    pub fn i2c_writes(&self) -> Vec<(bool, u8)> {
        self.0
            .borrow()
            .iter()
            .filter_map(|event| match event {
                Event::I2c(frame, _) if frame.len() == 4 => {
                    Some((frame[0] & 0x01 != 0, (frame[0] & 0xF0) | (frame[2] >> 4)))
                }
                _ => None,
            })
            .collect()
    }
}

#[derive(Debug)]
pub struct MockPin {
    name: &'static str,
    log: MockLog,
    failure: RefCell<Option<GpioError>>,
}

impl MockPin {
    pub fn new(name: &'static str, log: &MockLog) -> Self {
        MockPin {
            name,
            log: log.clone(),
            failure: RefCell::new(None),
        }
    }

    pub fn fail_with(&self, error: GpioError) {
        *self.failure.borrow_mut() = Some(error);
    }
}

impl GpioOutput for MockPin {
    fn write(&self, value: bool) -> GpioResult<()> {
        if let Some(error) = self.failure.borrow().clone() {
            return Err(error);
        }
        self.log.push(Event::Pin(self.name, value));
        Ok(())
    }
}

#[derive(Debug)]
pub struct MockI2c {
    log: MockLog,
    failure: RefCell<Option<GpioError>>,
}

impl MockI2c {
    pub fn new(log: &MockLog) -> Self {
        MockI2c {
            log: log.clone(),
            failure: RefCell::new(None),
        }
    }

    pub fn fail_with(&self, error: GpioError) {
        *self.failure.borrow_mut() = Some(error);
    }
}

impl I2cOutput for MockI2c {
    fn send(&self, buf: &[u8], timeout_ms: u32) -> GpioResult<()> {
        if let Some(error) = self.failure.borrow().clone() {
            return Err(error);
        }
        self.log.push(Event::I2c(buf.to_vec(), timeout_ms));
        Ok(())
    }
}

#[derive(Debug)]
pub struct MockDelay {
    log: MockLog,
}

impl MockDelay {
    pub fn new(log: &MockLog) -> Self {
        MockDelay { log: log.clone() }
    }
}

impl Delay for MockDelay {
    fn delay_ms(&self, ms: u32) {
        self.log.push(Event::Delay(ms));
    }
}

/// A full set of capabilities, enough for every communication mode.
#[derive(Debug)]
pub struct MockBoard {
    pub log: MockLog,
    pub rs: MockPin,
    pub rw: MockPin,
    pub en: MockPin,
    pub data: [MockPin; 8],
    pub i2c: MockI2c,
    pub delay: MockDelay,
}

impl MockBoard {
    pub fn new() -> Self {
        let log = MockLog::default();
        MockBoard {
            rs: MockPin::new("rs", &log),
            rw: MockPin::new("rw", &log),
            en: MockPin::new("en", &log),
            data: ["d0", "d1", "d2", "d3", "d4", "d5", "d6", "d7"].map(|name| MockPin::new(name, &log)),
            i2c: MockI2c::new(&log),
            delay: MockDelay::new(&log),
            log,
        }
    }

    /// 4-bit wiring: RS, RW, EN and D4..D7.
    pub fn config_4bit(&self, size: DisplaySize) -> HD44780Config<'_> {
        HD44780Config {
            size,
            comm_mode: CommMode::Parallel4Bit,
            pin_rs: Some(&self.rs),
            pin_rw: Some(&self.rw),
            pin_en: Some(&self.en),
            pins_data: [
                None,
                None,
                None,
                None,
                Some(&self.data[4]),
                Some(&self.data[5]),
                Some(&self.data[6]),
                Some(&self.data[7]),
            ],
            i2c: None,
            delay: Some(&self.delay),
        }
    }

    pub fn config_8bit(&self, size: DisplaySize) -> HD44780Config<'_> {
        HD44780Config {
            size,
            comm_mode: CommMode::Parallel8Bit,
            pin_rs: Some(&self.rs),
            pin_rw: None,
            pin_en: Some(&self.en),
            pins_data: [
                Some(&self.data[0]),
                Some(&self.data[1]),
                Some(&self.data[2]),
                Some(&self.data[3]),
                Some(&self.data[4]),
                Some(&self.data[5]),
                Some(&self.data[6]),
                Some(&self.data[7]),
            ],
            i2c: None,
            delay: Some(&self.delay),
        }
    }

    pub fn config_i2c(&self, size: DisplaySize) -> HD44780Config<'_> {
        HD44780Config {
            size,
            comm_mode: CommMode::I2c,
            i2c: Some(&self.i2c),
            delay: Some(&self.delay),
            ..HD44780Config::default()
        }
    }
}
