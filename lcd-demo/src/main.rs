mod config;

use crate::config::Config;
use crowlcd_gpio::bus::{MemoryBus, RegisterBus};
use crowlcd_gpio::delay::ThreadSleep;
use crowlcd_gpio::lcd::{ExpanderLcd, LcdDisplay};
use dotenv::dotenv;
use log::{debug, info};
use std::thread::sleep;
use std::time::Duration;
use sysinfo::System;
use time::OffsetDateTime;

const UNKNOWN_STR: &str = "???";

/// A 5x8 heart, stored in glyph slot 0.
const HEART: [u8; 8] = [
    0b00000,
    0b01010,
    0b11111,
    0b11111,
    0b01110,
    0b00100,
    0b00000,
    0b00000,
];

fn open_bus(config: &Config) -> eyre::Result<Box<dyn RegisterBus>> {
    if config.dry_run {
        info!("Dry run, register writes stay in memory.");
        return Ok(Box::new(MemoryBus::new()));
    }
    open_i2c(config)
}

#[cfg(target_os = "linux")]
fn open_i2c(config: &Config) -> eyre::Result<Box<dyn RegisterBus>> {
    let bus = crowlcd_gpio::bus::LinuxI2cBus::open(config.bus, config.address)?;
    Ok(Box::new(bus))
}

#[cfg(not(target_os = "linux"))]
fn open_i2c(_config: &Config) -> eyre::Result<Box<dyn RegisterBus>> {
    eyre::bail!("I2C is only available on Linux, set CROWLCD_DRY_RUN=1")
}

fn main() -> eyre::Result<()> {
    dotenv().ok();
    pretty_env_logger::init();

    info!("CrowPi LCD demo starting...");

    let config = Config::from_env()?;
    info!(
        "LCD @ /dev/i2c-{}, address {:#04x}",
        config.bus, config.address
    );

    let host_name = System::host_name().unwrap_or_else(|| UNKNOWN_STR.to_string());
    info!("Hostname {}", host_name);

    debug!("Initializing LCD driver...");
    let mut lcd: ExpanderLcd<Box<dyn RegisterBus>, ThreadSleep> =
        LcdDisplay::with_bus(open_bus(&config)?, ThreadSleep)?;
    lcd.initialize()?;
    debug!("{:?} initialized.", lcd.driver().expander().bus());

    lcd.create_own_character(0, &HEART)?;
    let name: String = host_name.chars().take(16).collect();
    lcd.write_text(&format!("Hello \u{0}\n{}", name))?;

    sleep(Duration::from_secs(2));

    info!("Showing the clock for {} s...", config.clock_seconds);
    lcd.write_line("Local time", 1)?;
    for _ in 0..config.clock_seconds {
        let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
        let line = format!("{:02}:{:02}:{:02}", now.hour(), now.minute(), now.second());
        debug!("Clock: {}", line);
        lcd.write_line(&line, 2)?;
        sleep(Duration::from_secs(1));
    }

    lcd.clear_display()?;
    lcd.write_line("Bye!", 1)?;
    info!("Done.");

    Ok(())
}
