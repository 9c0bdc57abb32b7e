//! A software HD44780 listening on the same lines a real one would.
//!
//! Only the write path is modelled: nibbles are latched on the falling edge of EN and paired
//! high nibble first, as the controller does once it's in 4-bit mode.

use hd44780_gpio::{GpioResult, I2cOutput};
use log::{debug, trace};
use std::cell::RefCell;

const DDRAM_SIZE: usize = 0x80;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Line {
    Rs,
    Rw,
    En,
    D4,
    D5,
    D6,
    D7,
}

#[derive(Debug)]
struct State {
    rs: bool,
    en: bool,
    data: [bool; 4],
    pending: Option<u8>,
    ddram: [u8; DDRAM_SIZE],
    address: u8,
    increment: bool,
    display_on: bool,
    backlight: bool,
    commands: usize,
    characters: usize,
}

#[derive(Debug)]
pub struct SimulatedLcd {
    state: RefCell<State>,
}

impl SimulatedLcd {
    pub fn new() -> Self {
        SimulatedLcd {
            state: RefCell::new(State {
                rs: false,
                en: false,
                data: [false; 4],
                pending: None,
                ddram: [b' '; DDRAM_SIZE],
                address: 0,
                increment: true,
                display_on: false,
                backlight: false,
                commands: 0,
                characters: 0,
            }),
        }
    }

    pub fn set_line(&self, line: Line, level: bool) -> GpioResult<()> {
        let mut state = self.state.borrow_mut();
        match line {
            Line::Rs => state.rs = level,
            Line::Rw => {}
            Line::D4 => state.data[0] = level,
            Line::D5 => state.data[1] = level,
            Line::D6 => state.data[2] = level,
            Line::D7 => state.data[3] = level,
            Line::En => {
                let falling = state.en && !level;
                state.en = level;
                if falling {
                    state.latch();
                }
            }
        }
        Ok(())
    }

    pub fn display_on(&self) -> bool {
        self.state.borrow().display_on
    }

    pub fn backlight(&self) -> bool {
        self.state.borrow().backlight
    }

    /// Number of commands and characters received so far.
    pub fn counters(&self) -> (usize, usize) {
        let state = self.state.borrow();
        (state.commands, state.characters)
    }

    /// Text of each visible row, given the DDRAM offset every row starts at.
    pub fn rows(&self, offsets: &[u8], columns: u8) -> Vec<String> {
        let state = self.state.borrow();
        offsets
            .iter()
            .map(|&offset| {
                (0..columns)
                    .map(|col| state.ddram[(offset + col) as usize % DDRAM_SIZE] as char)
                    .collect()
            })
            .collect()
    }
}

impl State {
    fn latch(&mut self) {
        let nibble = self
            .data
            .iter()
            .enumerate()
            .fold(0u8, |acc, (i, bit)| acc | ((*bit as u8) << i));

        match self.pending.take() {
            None => self.pending = Some(nibble),
            Some(high) => {
                let byte = (high << 4) | nibble;
                if self.rs {
                    self.write_data(byte);
                } else {
                    self.execute(byte);
                }
            }
        }
    }

    fn advance(&mut self, forward: bool) {
        self.address = if forward {
            (self.address + 1) % DDRAM_SIZE as u8
        } else {
            self.address.checked_sub(1).unwrap_or(DDRAM_SIZE as u8 - 1)
        };
    }

    fn write_data(&mut self, byte: u8) {
        trace!("DDRAM[{:#04X}] = {:?}", self.address, byte as char);
        self.ddram[self.address as usize] = byte;
        self.characters += 1;
        let increment = self.increment;
        self.advance(increment);
    }

    fn execute(&mut self, command: u8) {
        self.commands += 1;
        match command {
            0b1000_0000.. => {
                self.address = command & 0x7F;
                trace!("Set DDRAM address {:#04X}", self.address);
            }
            0b0100_0000.. => trace!("Set CGRAM address {:#04X}, ignored", command & 0x3F),
            0b0010_0000.. => debug!(
                "Function set: {} lines, {}-bit",
                if command & 0b1000 != 0 { 2 } else { 1 },
                if command & 0b1_0000 != 0 { 8 } else { 4 }
            ),
            0b0001_0000.. => {
                if command & 0b1000 != 0 {
                    trace!("Display shift ignored");
                } else {
                    self.advance(command & 0b0100 != 0);
                }
            }
            0b0000_1000.. => {
                self.display_on = command & 0b0100 != 0;
                debug!("Display control: on = {}", self.display_on);
            }
            0b0000_0100.. => self.increment = command & 0b0010 != 0,
            0b0000_0010.. => self.address = 0,
            0b0000_0001 => {
                self.ddram = [b' '; DDRAM_SIZE];
                self.address = 0;
            }
            _ => {}
        }
    }
}

/// The backpack: each written byte drives P0=RS, P1=RW, P2=EN, P3=backlight, P4..P7=D4..D7.
impl I2cOutput for SimulatedLcd {
    fn send(&self, buf: &[u8], timeout_ms: u32) -> GpioResult<()> {
        trace!("I2C write {:02X?}, timeout {} ms", buf, timeout_ms);
        for &byte in buf {
            self.state.borrow_mut().backlight = byte & 0b1000 != 0;
            self.set_line(Line::Rs, byte & 0b0001 != 0)?;
            self.set_line(Line::Rw, byte & 0b0010 != 0)?;
            self.set_line(Line::D4, byte & 0b0001_0000 != 0)?;
            self.set_line(Line::D5, byte & 0b0010_0000 != 0)?;
            self.set_line(Line::D6, byte & 0b0100_0000 != 0)?;
            self.set_line(Line::D7, byte & 0b1000_0000 != 0)?;
            self.set_line(Line::En, byte & 0b0100 != 0)?;
        }
        Ok(())
    }
}
