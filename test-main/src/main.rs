mod config;
mod sim;

use crate::config::Config;
use crate::sim::{Line, SimulatedLcd};
use dotenv::dotenv;
use hd44780_gpio::Delay;
use hd44780_gpio::func::{FnDelay, FnOutput, ThreadDelay};
use hd44780_gpio::lcd::hd44780::driver::{
    CommMode, HD44780Config, HD44780Driver, HD44780Handle, PCF8574_ADDRESS,
};
use log::{debug, info};
use std::cell::Cell;
use std::fmt::Write as _;

fn main() -> eyre::Result<()> {
    dotenv().ok();
    pretty_env_logger::init();

    let mut config = Config::try_load().unwrap_or_default();
    config.apply_env()?;
    let size = config.size;

    info!("Simulating a {} display over {}", size, config.comm_mode);
    if config.comm_mode == CommMode::I2c {
        info!("Backpack @ {:#04X}", PCF8574_ADDRESS);
    }

    let sim = SimulatedLcd::new();

    let elapsed = Cell::new(0u64);
    let simulated_delay = FnDelay::new(|ms| elapsed.set(elapsed.get() + ms as u64));
    let real_delay = ThreadDelay;
    let delay: &dyn Delay = if config.real_time {
        &real_delay
    } else {
        &simulated_delay
    };

    let pin_rs = FnOutput::new(|level| sim.set_line(Line::Rs, level));
    let pin_rw = FnOutput::new(|level| sim.set_line(Line::Rw, level));
    let pin_en = FnOutput::new(|level| sim.set_line(Line::En, level));
    let pin_d4 = FnOutput::new(|level| sim.set_line(Line::D4, level));
    let pin_d5 = FnOutput::new(|level| sim.set_line(Line::D5, level));
    let pin_d6 = FnOutput::new(|level| sim.set_line(Line::D6, level));
    let pin_d7 = FnOutput::new(|level| sim.set_line(Line::D7, level));

    debug!("Initializing LCD driver...");
    let mut lcd = HD44780Handle::with_config(HD44780Config {
        size,
        comm_mode: config.comm_mode,
        pin_rs: Some(&pin_rs),
        pin_rw: Some(&pin_rw),
        pin_en: Some(&pin_en),
        pins_data: [
            None,
            None,
            None,
            None,
            Some(&pin_d4),
            Some(&pin_d5),
            Some(&pin_d6),
            Some(&pin_d7),
        ],
        i2c: Some(&sim),
        delay: Some(delay),
    })?;
    lcd.configure()?;
    debug!("{:?} initialized.", lcd.comm_mode());

    // Text goes on every row but the last, which shows the numbers.
    let text_rows = size.rows() - 1;
    for (row, line) in (0..text_rows).zip(&config.lines) {
        let text: String = line.chars().take(size.columns() as usize).collect();
        lcd.gotoxy(0, row)?;
        lcd.write_string(&text)?;
    }

    lcd.gotoxy(0, text_rows)?;
    write!(lcd, "n=")?;
    lcd.write_int(config.counter)?;
    lcd.shift_cursor_forward(1)?;
    write!(lcd, "x=")?;
    lcd.write_float(config.reading, config.precision)?;
    lcd.return_home()?;

    for row in sim.rows(size.row_offsets(), size.columns()) {
        info!("|{}|", row);
    }

    let (commands, characters) = sim.counters();
    info!(
        "{} commands, {} characters, {} ms of delays, display {}, backlight {}",
        commands,
        characters,
        elapsed.get(),
        if sim.display_on() { "on" } else { "off" },
        if sim.backlight() { "on" } else { "off" }
    );

    Ok(())
}
