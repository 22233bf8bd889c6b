//! Desk-side stand-ins for the bench hardware.
//!
//! `run --simulate` wires these in so the whole wizard can be exercised on a
//! laptop: a fake serial bridge that is always present, a renderer that draws
//! frames to the terminal, a flasher that only logs, and a stdin reader in
//! place of the knob.

use std::io::BufRead;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use crossbeam_channel::Sender;
use planter_core::InputEvent;
use planter_traits::{BoxError, Flasher, Frame, LinkPort, PortInfo, Ports, Renderer};
use tracing::info;

const SIM_PORT: &str = "sim0";

/// Port enumeration that always reports a single attached bridge.
pub struct SimulatedPorts;

impl Ports for SimulatedPorts {
    fn enumerate(&self) -> Vec<PortInfo> {
        vec![PortInfo::new(SIM_PORT, "CP2102 USB to UART Bridge [USB]")]
    }

    fn open(
        &self,
        name: &str,
        baud: u32,
        _read_timeout: Duration,
    ) -> Result<Box<dyn LinkPort + Send>, BoxError> {
        info!(port = name, baud, "opening simulated port");
        Ok(Box::new(SimulatedLine))
    }
}

struct SimulatedLine;

impl LinkPort for SimulatedLine {
    fn write_line(&mut self, line: &str) -> Result<(), BoxError> {
        info!(line = line.trim_end(), "simulated device received");
        Ok(())
    }
}

/// Renders frames as a boxed 16x2 panel on stdout.
pub struct ConsoleRenderer;

impl Renderer for ConsoleRenderer {
    fn draw(&mut self, frame: &Frame) -> Result<(), BoxError> {
        let mut line0: Vec<u8> = format!("{:<16}", frame.line0).into_bytes();
        let mut line1: Vec<u8> = format!("{:<16}", frame.line1).into_bytes();
        if let Some((row, col)) = frame.cursor {
            let line = if row == 0 { &mut line0 } else { &mut line1 };
            if let Some(cell) = line.get_mut(col as usize) {
                *cell = b'>';
            }
        }
        println!("+----------------+");
        println!("|{}|", String::from_utf8_lossy(&line0[..16]));
        println!("|{}|", String::from_utf8_lossy(&line1[..16]));
        println!("+----------------+");
        Ok(())
    }
}

/// Flasher that narrates the steps without touching any device.
pub struct SimulatedFlasher;

impl Flasher for SimulatedFlasher {
    fn factory_reset(&mut self, port: &str) -> Result<(), BoxError> {
        info!(port, "simulated factory reset");
        Ok(())
    }

    fn write_main_firmware(&mut self, port: &str) -> Result<(), BoxError> {
        info!(port, "simulated firmware write");
        Ok(())
    }
}

/// Reads single-letter commands from stdin and feeds them to the wizard.
///
/// `u` rotates up, `d` rotates down, `p` presses the button. Anything else is
/// ignored. The thread ends when stdin closes or the flag is raised.
pub fn spawn_stdin_input(tx: Sender<InputEvent>, shutdown: Arc<AtomicBool>) {
    thread::Builder::new()
        .name("stdin-input".into())
        .spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                if shutdown.load(Ordering::SeqCst) {
                    break;
                }
                let Ok(line) = line else { break };
                let event = match line.trim() {
                    "u" => InputEvent::RotateUp,
                    "d" => InputEvent::RotateDown,
                    "p" => InputEvent::ButtonPress,
                    _ => continue,
                };
                if tx.send(event).is_err() {
                    break;
                }
            }
        })
        .ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simulated_bridge_matches_discovery_descriptor() {
        let ports = SimulatedPorts.enumerate();
        assert_eq!(ports.len(), 1);
        assert!(ports[0].descriptor.contains("CP2102"));
        assert!(ports[0].descriptor.contains("USB"));
    }

    #[test]
    fn console_renderer_places_marker() {
        let mut r = ConsoleRenderer;
        let frame = Frame::new(" Calibrate", " Flash firmware").with_cursor(0, 0);
        assert!(r.draw(&frame).is_ok());
    }
}
