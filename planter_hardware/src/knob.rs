//! GPIO knob input: edge interrupts on the encoder pins and the push switch.
//!
//! A dedicated thread owns the pins and the quadrature decoder; every edge
//! wakes it, the decoder turns pin samples into rotation events, and decoded
//! input lands in the runner's channel. The thread is joined on drop.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crossbeam_channel::Sender;
use planter_core::encoder::{QuadratureDecoder, Rotation};
use planter_core::wizard::InputEvent;
use rppal::gpio::{Gpio, Level, Trigger};

use crate::error::HwError;

const EDGE_POLL_TIMEOUT: Duration = Duration::from_millis(50);

pub struct KnobInput {
    shutdown: Arc<AtomicBool>,
    join_handle: Option<std::thread::JoinHandle<()>>,
}

impl KnobInput {
    /// Claim the three knob pins (pull-down inputs, matching the bench
    /// wiring) and start the edge-polling thread.
    pub fn spawn(
        enc_a: u8,
        enc_b: u8,
        enc_sw: u8,
        tx: Sender<InputEvent>,
    ) -> Result<Self, HwError> {
        let gpio = Gpio::new().map_err(|e| HwError::Gpio(e.to_string()))?;
        let mut pin_a = gpio
            .get(enc_a)
            .map_err(|e| HwError::Gpio(e.to_string()))?
            .into_input_pulldown();
        let mut pin_b = gpio
            .get(enc_b)
            .map_err(|e| HwError::Gpio(e.to_string()))?
            .into_input_pulldown();
        let mut pin_sw = gpio
            .get(enc_sw)
            .map_err(|e| HwError::Gpio(e.to_string()))?
            .into_input_pulldown();

        pin_a
            .set_interrupt(Trigger::Both)
            .map_err(|e| HwError::Gpio(e.to_string()))?;
        pin_b
            .set_interrupt(Trigger::Both)
            .map_err(|e| HwError::Gpio(e.to_string()))?;
        pin_sw
            .set_interrupt(Trigger::RisingEdge)
            .map_err(|e| HwError::Gpio(e.to_string()))?;

        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();
        let sw_bcm = pin_sw.pin();

        let join_handle = std::thread::spawn(move || {
            let mut decoder = QuadratureDecoder::new();
            loop {
                if shutdown_clone.load(Ordering::Relaxed) {
                    tracing::debug!("knob thread received shutdown signal");
                    break;
                }

                let fired = gpio.poll_interrupts(
                    &[&pin_a, &pin_b, &pin_sw],
                    false,
                    Some(EDGE_POLL_TIMEOUT),
                );
                let event = match fired {
                    Ok(Some((pin, level))) => {
                        if pin.pin() == sw_bcm {
                            (level == Level::High).then_some(InputEvent::ButtonPress)
                        } else {
                            decoder
                                .sample(pin_a.is_high(), pin_b.is_high())
                                .map(|rotation| match rotation {
                                    Rotation::Up => InputEvent::RotateUp,
                                    Rotation::Down => InputEvent::RotateDown,
                                })
                        }
                    }
                    Ok(None) => None,
                    Err(e) => {
                        tracing::warn!(error = %e, "gpio poll failed");
                        None
                    }
                };

                if let Some(event) = event {
                    // Consumer gone means the runner exited; follow it.
                    if tx.send(event).is_err() {
                        tracing::debug!("knob consumer disconnected, exiting thread");
                        break;
                    }
                }
            }
            tracing::trace!("knob thread exiting cleanly");
        });

        Ok(Self {
            shutdown,
            join_handle: Some(join_handle),
        })
    }
}

impl Drop for KnobInput {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(handle) = self.join_handle.take() {
            if let Err(e) = handle.join() {
                tracing::warn!(?e, "knob thread panicked during shutdown");
            }
        }
    }
}
