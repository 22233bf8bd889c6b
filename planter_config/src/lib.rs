#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema and validation for the planter fixture.
//!
//! `Config` and sub-structs are deserialized from TOML and validated. Every
//! field has a default matching the bench wiring the tool ships with, so an
//! absent config file is a valid configuration.

use std::path::Path;

use eyre::WrapErr;
use serde::Deserialize;

/// BCM pin numbers for the knob and the character display.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Pins {
    pub enc_a: u8,
    pub enc_b: u8,
    pub enc_sw: u8,
    pub lcd_rs: u8,
    pub lcd_en: u8,
    pub lcd_d4: u8,
    pub lcd_d5: u8,
    pub lcd_d6: u8,
    pub lcd_d7: u8,
    /// Optional backlight control pin; left unset the backlight is assumed
    /// hard-wired on.
    pub lcd_backlight: Option<u8>,
}

impl Default for Pins {
    fn default() -> Self {
        Self {
            enc_a: 27,
            enc_b: 22,
            enc_sw: 17,
            lcd_rs: 7,
            lcd_en: 8,
            lcd_d4: 25,
            lcd_d5: 24,
            lcd_d6: 23,
            lcd_d7: 18,
            lcd_backlight: Some(4),
        }
    }
}

/// Serial link parameters and the device discovery rule.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Serial {
    pub baud: u32,
    pub read_timeout_ms: u64,
    /// Port descriptor must contain this bridge-chip identifier.
    pub bridge_match: String,
    /// Port descriptor must also contain this bus-type marker.
    pub bus_match: String,
}

impl Default for Serial {
    fn default() -> Self {
        Self {
            baud: 115_200,
            read_timeout_ms: 1_000,
            bridge_match: "CP2102".into(),
            bus_match: "USB".into(),
        }
    }
}

/// esptool invocation parameters and firmware image names.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Flash {
    /// esptool executable; resolved via PATH when not absolute.
    pub esptool: String,
    pub baud: u32,
    /// Directory holding all image files below.
    pub bin_dir: String,
    pub boot_app0: String,
    pub bootloader: String,
    pub factory_app: String,
    pub factory_partitions: String,
    pub main_app: String,
    pub main_partitions: String,
}

impl Default for Flash {
    fn default() -> Self {
        Self {
            esptool: "esptool.py".into(),
            baud: 921_600,
            bin_dir: "bin".into(),
            boot_app0: "boot_app0.bin".into(),
            bootloader: "bootloader_dio_80m.bin".into(),
            factory_app: "floower-esp32-factoryreset.ino.bin".into(),
            factory_partitions: "floower-esp32-factoryreset.ino.partitions.bin".into(),
            main_app: "floower-esp32.ino.bin".into(),
            main_partitions: "floower-esp32.ino.partitions.bin".into(),
        }
    }
}

/// Poll cadence and fixed pause durations.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Timing {
    pub poll_ms: u64,
    pub banner_ms: u64,
    pub splash_ms: u64,
    pub flash_pause_ms: u64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            poll_ms: 500,
            banner_ms: 5_000,
            splash_ms: 1_000,
            flash_pause_ms: 1_000,
        }
    }
}

/// Console/file logging knobs.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Logging {
    /// Path to a .log file (JSON lines); unset disables file logging.
    pub file: Option<String>,
    /// "error" | "warn" | "info" | "debug" | "trace"
    pub level: Option<String>,
}

/// Starting values for the identity fields of a fresh session.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SessionDefaults {
    pub serial_number: i32,
    pub hardware_revision: i32,
}

impl Default for SessionDefaults {
    fn default() -> Self {
        Self {
            serial_number: 130,
            hardware_revision: 7,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub pins: Pins,
    pub serial: Serial,
    pub flash: Flash,
    pub timing: Timing,
    pub logging: Logging,
    pub session: SessionDefaults,
}

impl Config {
    /// Load and validate a TOML config file.
    pub fn load(path: &Path) -> eyre::Result<Self> {
        let text = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("reading config {}", path.display()))?;
        let cfg: Config = toml::from_str(&text)
            .wrap_err_with(|| format!("parsing config {}", path.display()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject configurations that cannot work regardless of hardware.
    pub fn validate(&self) -> eyre::Result<()> {
        if self.serial.baud == 0 {
            eyre::bail!("serial.baud must be nonzero");
        }
        if self.serial.bridge_match.trim().is_empty() {
            eyre::bail!("serial.bridge_match must not be empty");
        }
        if self.timing.poll_ms == 0 {
            eyre::bail!("timing.poll_ms must be nonzero");
        }
        let p = &self.pins;
        if p.enc_a == p.enc_b || p.enc_a == p.enc_sw || p.enc_b == p.enc_sw {
            eyre::bail!("pins.enc_a, pins.enc_b and pins.enc_sw must be distinct");
        }
        if self.session.serial_number < 0 {
            eyre::bail!("session.serial_number must be >= 0");
        }
        if !(0..=20).contains(&self.session.hardware_revision) {
            eyre::bail!("session.hardware_revision must be within 0..=20");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        Config::default().validate().unwrap();
    }

    #[test]
    fn empty_toml_is_the_default_config() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg.serial.bridge_match, "CP2102");
        assert_eq!(cfg.timing.poll_ms, 500);
        assert_eq!(cfg.session.serial_number, 130);
    }
}
