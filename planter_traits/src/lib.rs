pub mod clock;

pub use clock::{Clock, MonotonicClock};

use std::time::Duration;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// One enumerated serial port: OS device path plus a human-readable
/// descriptor used for bridge-chip matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortInfo {
    pub name: String,
    pub descriptor: String,
}

impl PortInfo {
    pub fn new(name: impl Into<String>, descriptor: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            descriptor: descriptor.into(),
        }
    }
}

/// An open line-oriented serial connection to the device.
pub trait LinkPort {
    /// Write one complete protocol line (terminator included by the caller).
    fn write_line(&mut self, line: &str) -> Result<(), BoxError>;
}

/// Serial port enumeration and opening.
pub trait Ports {
    fn enumerate(&self) -> Vec<PortInfo>;
    fn open(
        &self,
        name: &str,
        baud: u32,
        read_timeout: Duration,
    ) -> Result<Box<dyn LinkPort + Send>, BoxError>;
}

/// Firmware flashing capability, invoked against a serial port path whose
/// handle has been released by the caller for the duration of the flash.
pub trait Flasher {
    fn factory_reset(&mut self, port: &str) -> Result<(), BoxError>;
    fn write_main_firmware(&mut self, port: &str) -> Result<(), BoxError>;
}

/// A single 16x2 text frame for the operator display. The cursor, when set,
/// is where the renderer places its marker glyph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    pub line0: String,
    pub line1: String,
    pub cursor: Option<(u8, u8)>,
}

impl Frame {
    pub fn new(line0: impl Into<String>, line1: impl Into<String>) -> Self {
        Self {
            line0: line0.into(),
            line1: line1.into(),
            cursor: None,
        }
    }

    pub fn with_cursor(mut self, row: u8, col: u8) -> Self {
        self.cursor = Some((row, col));
        self
    }
}

/// Renders frames to the operator. Layout and glyph choices belong to the
/// implementation; the core only decides what to show.
pub trait Renderer {
    fn draw(&mut self, frame: &Frame) -> Result<(), BoxError>;
}
