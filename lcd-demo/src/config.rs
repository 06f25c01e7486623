use crowlcd_gpio::lcd::{DEFAULT_ADDRESS, DEFAULT_BUS};
use std::env::var;
use std::str::FromStr;

/// Demo settings, read from the environment (and `.env`).
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Config {
    /// `CROWLCD_I2C_BUS`
    pub bus: u8,
    /// `CROWLCD_I2C_ADDRESS`, decimal or `0x` hex.
    pub address: u16,
    /// `CROWLCD_DRY_RUN`, writes go to memory instead of the bus.
    pub dry_run: bool,
    /// `CROWLCD_CLOCK_SECONDS`, how long to show the clock.
    pub clock_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bus: DEFAULT_BUS,
            address: DEFAULT_ADDRESS,
            dry_run: false,
            clock_seconds: 10,
        }
    }
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let defaults = Config::default();
        Ok(Config {
            bus: parse_or("CROWLCD_I2C_BUS", defaults.bus)?,
            address: match var("CROWLCD_I2C_ADDRESS") {
                Ok(s) => parse_address(&s)?,
                Err(_) => defaults.address,
            },
            dry_run: match var("CROWLCD_DRY_RUN") {
                Ok(s) => parse_flag(&s)?,
                Err(_) => defaults.dry_run,
            },
            clock_seconds: parse_or("CROWLCD_CLOCK_SECONDS", defaults.clock_seconds)?,
        })
    }
}

fn parse_or<T>(key: &str, default: T) -> eyre::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match var(key) {
        Ok(s) => Ok(s.trim().parse()?),
        Err(_) => Ok(default),
    }
}

fn parse_address(s: &str) -> eyre::Result<u16> {
    let s = s.trim();
    let address = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16)?,
        None => s.parse()?,
    };
    if address > 0x7F {
        eyre::bail!("I2C address {:#x} does not fit in 7 bits", address);
    }
    Ok(address)
}

fn parse_flag(s: &str) -> eyre::Result<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(eyre::eyre!("Invalid flag value: {}", other)),
    }
}
