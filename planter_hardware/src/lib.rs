//! Bench hardware backends: the CP2102 serial bridge, the esptool flasher,
//! and (behind the `hardware` feature) the GPIO knob and character LCD.
//!
//! Everything here plugs into the `planter_traits` seams so the wizard logic
//! in `planter_core` never touches a device directly.

pub mod error;
pub mod flasher;
#[cfg(feature = "hardware")]
pub mod knob;
#[cfg(feature = "hardware")]
pub mod lcd;
pub mod serial;
pub mod sim;

pub use error::HwError;
pub use flasher::EsptoolFlasher;
#[cfg(feature = "hardware")]
pub use knob::KnobInput;
#[cfg(feature = "hardware")]
pub use lcd::CharLcd;
pub use serial::SystemPorts;
pub use sim::{ConsoleRenderer, SimulatedFlasher, SimulatedPorts, spawn_stdin_input};
