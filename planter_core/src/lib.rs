#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Core calibration logic (hardware-agnostic).
//!
//! This crate provides the hardware-independent half of the Floower planter
//! fixture: the quadrature decoder for the tuning knob, the calibration
//! wizard state machine, the device-bound line protocol, and the link
//! upkeep/discovery logic. All hardware interactions go through the traits
//! in `planter_traits` (`Ports`, `Flasher`, `Renderer`, `Clock`).
//!
//! ## Architecture
//!
//! - **Decoding**: Gray-code quadrature state machine (`encoder` module)
//! - **Model**: one `CalibrationSession` per connected device (`session`)
//! - **Transitions**: pure wizard logic producing effects (`wizard`)
//! - **Protocol**: `TAG + decimal + \n` command lines (`protocol`)
//! - **Link**: discovery, presence polling, at-most-once sends (`link`)
//! - **Runner**: the single consumer owning session and link (`runner`)

pub mod config;
pub mod conversions;
pub mod encoder;
pub mod error;
pub mod link;
pub mod mocks;
pub mod protocol;
pub mod runner;
pub mod screen;
pub mod session;
pub mod wizard;

pub use config::{LinkCfg, TimingCfg};
pub use encoder::{QuadratureDecoder, Rotation};
pub use error::LinkError;
pub use link::DeviceLink;
pub use protocol::{Command, CommandTag};
pub use runner::Runner;
pub use screen::Screen;
pub use session::CalibrationSession;
pub use wizard::{Effect, InputEvent};
