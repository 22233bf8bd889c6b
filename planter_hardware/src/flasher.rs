//! esptool.py subprocess invocation for the two fixed flash operations.
//!
//! The flashing protocol itself is esptool's problem; this module only
//! assembles the fixed argument sets (shared bootloader assets plus the
//! per-operation application/partition image pair) and runs the process to
//! completion against the suspended serial port.

use std::path::{Path, PathBuf};
use std::process::Command as Process;

use planter_traits::{BoxError, Flasher};

use crate::error::HwError;

#[derive(Debug, Clone)]
pub struct EsptoolFlasher {
    esptool: String,
    baud: u32,
    bin_dir: PathBuf,
    boot_app0: String,
    bootloader: String,
    factory_app: String,
    factory_partitions: String,
    main_app: String,
    main_partitions: String,
}

impl EsptoolFlasher {
    pub fn new(flash: &planter_config::Flash) -> Self {
        Self {
            esptool: flash.esptool.clone(),
            baud: flash.baud,
            bin_dir: PathBuf::from(&flash.bin_dir),
            boot_app0: flash.boot_app0.clone(),
            bootloader: flash.bootloader.clone(),
            factory_app: flash.factory_app.clone(),
            factory_partitions: flash.factory_partitions.clone(),
            main_app: flash.main_app.clone(),
            main_partitions: flash.main_partitions.clone(),
        }
    }

    fn image(&self, name: &str) -> PathBuf {
        self.bin_dir.join(name)
    }

    fn run(&self, port: &str, app: &Path, partitions: &Path) -> Result<(), HwError> {
        let mut cmd = Process::new(&self.esptool);
        cmd.arg("--port")
            .arg(port)
            .arg("--chip")
            .arg("esp32")
            .arg("-b")
            .arg(self.baud.to_string())
            .arg("--before")
            .arg("default_reset")
            .arg("--after")
            .arg("hard_reset")
            .arg("write_flash")
            .arg("-z")
            .arg("--flash_mode")
            .arg("dio")
            .arg("--flash_freq")
            .arg("80m")
            .arg("--flash_size")
            .arg("detect")
            .arg("0xe000")
            .arg(self.image(&self.boot_app0))
            .arg("0x1000")
            .arg(self.image(&self.bootloader))
            .arg("0x10000")
            .arg(app)
            .arg("0x8000")
            .arg(partitions);

        tracing::info!(?cmd, "running esptool");
        let status = cmd.status().map_err(HwError::Spawn)?;
        if !status.success() {
            return Err(HwError::Esptool(status));
        }
        Ok(())
    }
}

impl Flasher for EsptoolFlasher {
    fn factory_reset(&mut self, port: &str) -> Result<(), BoxError> {
        tracing::info!(port, "performing factory reset flash");
        self.run(
            port,
            &self.image(&self.factory_app),
            &self.image(&self.factory_partitions),
        )?;
        Ok(())
    }

    fn write_main_firmware(&mut self, port: &str) -> Result<(), BoxError> {
        tracing::info!(port, "flashing main firmware");
        self.run(
            port,
            &self.image(&self.main_app),
            &self.image(&self.main_partitions),
        )?;
        Ok(())
    }
}
