//! The single-consumer event loop that owns all mutable state.
//!
//! Knob interrupts land in a channel; the runner alternates between draining
//! it and polling device presence on a fixed cadence. Because only this loop
//! touches the session and the link, a rotate event can never interleave
//! with a disconnect-triggered reset.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError};
use planter_traits::{Clock, Flasher, Frame, Ports, Renderer};

use crate::config::TimingCfg;
use crate::error::Result;
use crate::link::DeviceLink;
use crate::screen;
use crate::session::CalibrationSession;
use crate::wizard::{self, Effect, InputEvent};

pub struct Runner<P: Ports, F: Flasher, R: Renderer, C: Clock> {
    session: CalibrationSession,
    link: DeviceLink<P>,
    flasher: F,
    renderer: R,
    clock: C,
    events: Receiver<InputEvent>,
    shutdown: Arc<AtomicBool>,
    timing: TimingCfg,
}

impl<P: Ports, F: Flasher, R: Renderer, C: Clock> Runner<P, F, R, C> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        session: CalibrationSession,
        link: DeviceLink<P>,
        flasher: F,
        renderer: R,
        clock: C,
        events: Receiver<InputEvent>,
        shutdown: Arc<AtomicBool>,
        timing: TimingCfg,
    ) -> Self {
        Self {
            session,
            link,
            flasher,
            renderer,
            clock,
            events,
            shutdown,
            timing,
        }
    }

    pub fn session(&self) -> &CalibrationSession {
        &self.session
    }

    /// Show the version banner, then run until shutdown is requested or the
    /// input source goes away.
    pub fn run(&mut self) -> Result<()> {
        self.draw(&Frame::new(
            "Floower Planter",
            format!("v{}", env!("CARGO_PKG_VERSION")),
        ));
        self.clock.sleep(Duration::from_millis(self.timing.banner_ms));

        self.session.reset();
        self.redraw();
        tracing::info!("planter ready");

        let poll = Duration::from_millis(self.timing.poll_ms);
        loop {
            if self.shutdown.load(Ordering::Relaxed) {
                tracing::info!("shutdown requested");
                return Ok(());
            }
            match self.events.recv_timeout(poll) {
                Ok(event) => self.handle_event(event),
                Err(RecvTimeoutError::Timeout) => self.poll_link(),
                Err(RecvTimeoutError::Disconnected) => {
                    tracing::info!("input source closed, exiting");
                    return Ok(());
                }
            }
        }
    }

    fn handle_event(&mut self, event: InputEvent) {
        tracing::trace!(?event, screen = ?self.session.screen, "input");
        let effects = wizard::transition(&mut self.session, event);
        self.apply(effects);
    }

    fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Send(cmd) => {
                    if self.link.send(&cmd).is_err() {
                        // Write failure is a link loss; back to the connect
                        // prompt. The trailing Redraw shows it.
                        self.session.reset();
                    }
                }
                Effect::Redraw => self.redraw(),
                Effect::FlashFirmware => self.flash(),
            }
        }
    }

    fn poll_link(&mut self) {
        if self.link.is_connected() {
            if !self.link.check() {
                self.session.reset();
                self.redraw();
            }
        } else if self.link.poll_connect().is_some() {
            self.draw(&Frame::new("Connected", ""));
            self.clock.sleep(Duration::from_millis(self.timing.splash_ms));
            self.session.on_connected();
            self.redraw();
        }
    }

    /// Sequence the two esptool passes with the deliberate pause between
    /// them, then reopen the serial handle. A nonzero exit status is logged
    /// for the operator but does not branch the wizard.
    fn flash(&mut self) {
        let Some(port) = self.link.suspend() else {
            tracing::warn!("flash requested while disconnected, skipping");
            let effects = wizard::finish_flash(&mut self.session);
            self.apply(effects);
            return;
        };

        self.draw(&Frame::new("Flashing ...", "5%"));
        if let Err(e) = self.flasher.factory_reset(&port) {
            tracing::warn!(error = %e, "factory reset pass failed");
        }

        self.draw(&Frame::new("Flashing ...", "45%"));
        self.clock
            .sleep(Duration::from_millis(self.timing.flash_pause_ms));
        self.draw(&Frame::new("Flashing ...", "50%"));

        if let Err(e) = self.flasher.write_main_firmware(&port) {
            tracing::warn!(error = %e, "main firmware pass failed");
        }

        self.draw(&Frame::new("Done", ""));
        self.clock.sleep(Duration::from_millis(self.timing.splash_ms));

        if self.link.resume().is_err() {
            self.session.reset();
            self.redraw();
            return;
        }
        let effects = wizard::finish_flash(&mut self.session);
        self.apply(effects);
    }

    fn redraw(&mut self) {
        let frame = screen::frame(&self.session);
        self.draw(&frame);
    }

    fn draw(&mut self, frame: &Frame) {
        if let Err(e) = self.renderer.draw(frame) {
            tracing::warn!(error = %e, "display draw failed");
        }
    }
}
