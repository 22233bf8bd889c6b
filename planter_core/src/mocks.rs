//! Test and helper mocks for planter_core.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use planter_traits::{BoxError, Clock, Flasher, Frame, LinkPort, PortInfo, Ports, Renderer};

/// Shared log of lines written to a mock port.
pub type WriteLog = Arc<Mutex<Vec<String>>>;

/// A fake serial backend whose visible ports can be changed at runtime to
/// simulate plugging and unplugging the device.
#[derive(Clone, Default)]
pub struct MockPorts {
    visible: Arc<Mutex<Vec<PortInfo>>>,
    written: WriteLog,
    fail_writes: Arc<AtomicBool>,
}

impl MockPorts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&self, name: &str, descriptor: &str) {
        if let Ok(mut v) = self.visible.lock() {
            v.push(PortInfo::new(name, descriptor));
        }
    }

    pub fn detach(&self, name: &str) {
        if let Ok(mut v) = self.visible.lock() {
            v.retain(|p| p.name != name);
        }
    }

    /// Make every subsequent write fail, as if the cable dropped mid-line.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::Relaxed);
    }

    pub fn written(&self) -> Vec<String> {
        self.written.lock().map(|w| w.clone()).unwrap_or_default()
    }
}

struct MockLine {
    written: WriteLog,
    fail_writes: Arc<AtomicBool>,
}

impl LinkPort for MockLine {
    fn write_line(&mut self, line: &str) -> Result<(), BoxError> {
        if self.fail_writes.load(Ordering::Relaxed) {
            return Err(Box::new(std::io::Error::other("mock write failure")));
        }
        if let Ok(mut w) = self.written.lock() {
            w.push(line.to_string());
        }
        Ok(())
    }
}

impl Ports for MockPorts {
    fn enumerate(&self) -> Vec<PortInfo> {
        self.visible.lock().map(|v| v.clone()).unwrap_or_default()
    }

    fn open(
        &self,
        name: &str,
        _baud: u32,
        _read_timeout: Duration,
    ) -> Result<Box<dyn LinkPort + Send>, BoxError> {
        let present = self
            .enumerate()
            .iter()
            .any(|p| p.name == name);
        if !present {
            return Err(Box::new(std::io::Error::other("mock port vanished")));
        }
        Ok(Box::new(MockLine {
            written: self.written.clone(),
            fail_writes: self.fail_writes.clone(),
        }))
    }
}

/// Renderer that records every frame it is asked to draw.
#[derive(Clone, Default)]
pub struct RecordingRenderer {
    frames: Arc<Mutex<Vec<Frame>>>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> Vec<Frame> {
        self.frames.lock().map(|f| f.clone()).unwrap_or_default()
    }

    pub fn last(&self) -> Option<Frame> {
        self.frames().last().cloned()
    }
}

impl Renderer for RecordingRenderer {
    fn draw(&mut self, frame: &Frame) -> Result<(), BoxError> {
        if let Ok(mut f) = self.frames.lock() {
            f.push(frame.clone());
        }
        Ok(())
    }
}

/// Flasher that records which operations ran and against which port.
#[derive(Clone, Default)]
pub struct RecordingFlasher {
    calls: Arc<Mutex<Vec<String>>>,
}

impl RecordingFlasher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl Flasher for RecordingFlasher {
    fn factory_reset(&mut self, port: &str) -> Result<(), BoxError> {
        if let Ok(mut c) = self.calls.lock() {
            c.push(format!("factory_reset {port}"));
        }
        Ok(())
    }

    fn write_main_firmware(&mut self, port: &str) -> Result<(), BoxError> {
        if let Ok(mut c) = self.calls.lock() {
            c.push(format!("write_main_firmware {port}"));
        }
        Ok(())
    }
}

/// Clock whose sleeps return immediately; keeps runner tests fast while the
/// banner and splash pauses still execute their code paths.
#[derive(Debug, Default, Clone, Copy)]
pub struct InstantClock;

impl Clock for InstantClock {
    fn sleep(&self, _d: Duration) {}
}
