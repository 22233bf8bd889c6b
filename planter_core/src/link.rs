//! Device discovery, connection upkeep, and command transmission.
//!
//! `DeviceLink` is generic over `planter_traits::Ports` so the whole
//! discover/lose/send cycle runs against mocks in tests. Delivery is
//! at-most-once and fire-and-forget: a write failure is treated exactly like
//! an unplugged cable.

use std::time::Duration;

use planter_traits::{LinkPort, Ports};

use crate::config::LinkCfg;
use crate::error::LinkError;
use crate::protocol::Command;

struct Active {
    name: String,
    /// None while the handle is released for firmware flashing.
    port: Option<Box<dyn LinkPort + Send>>,
}

pub struct DeviceLink<P: Ports> {
    ports: P,
    cfg: LinkCfg,
    active: Option<Active>,
}

impl<P: Ports> DeviceLink<P> {
    pub fn new(ports: P, cfg: LinkCfg) -> Self {
        Self {
            ports,
            cfg,
            active: None,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.active.is_some()
    }

    /// Port identifier of the active device, if any.
    pub fn connected_to(&self) -> Option<&str> {
        self.active.as_ref().map(|a| a.name.as_str())
    }

    fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.cfg.read_timeout_ms)
    }

    fn matches(&self, descriptor: &str) -> bool {
        descriptor.contains(&self.cfg.bridge_match) && descriptor.contains(&self.cfg.bus_match)
    }

    /// Enumerate ports and connect to the first one matching the discovery
    /// rule. Returns the chosen identifier on success; `None` simply means
    /// "not yet connected" and the caller retries on the next poll.
    pub fn poll_connect(&mut self) -> Option<String> {
        let candidate = self
            .ports
            .enumerate()
            .into_iter()
            .find(|p| self.matches(&p.descriptor))?;

        match self
            .ports
            .open(&candidate.name, self.cfg.baud, self.read_timeout())
        {
            Ok(port) => {
                tracing::info!(port = %candidate.name, "connected");
                self.active = Some(Active {
                    name: candidate.name.clone(),
                    port: Some(port),
                });
                Some(candidate.name)
            }
            Err(e) => {
                tracing::warn!(port = %candidate.name, error = %e, "open failed");
                None
            }
        }
    }

    /// Re-enumerate and verify the active device is still present. Returns
    /// false on loss, after closing the handle and clearing the identity;
    /// the caller must then reset the session.
    pub fn check(&mut self) -> bool {
        let Some(active) = &self.active else {
            return false;
        };
        let present = self
            .ports
            .enumerate()
            .iter()
            .any(|p| p.name == active.name);
        if !present {
            tracing::info!(port = %active.name, "disconnected");
            self.active = None;
        }
        present
    }

    /// Transmit one protocol line. A missing connection drops the command
    /// with a log line (the device redraws regardless); a write failure is
    /// a link loss and surfaces as an error so the caller resets.
    pub fn send(&mut self, cmd: &Command) -> Result<(), LinkError> {
        let Some(active) = &mut self.active else {
            tracing::warn!(command = %cmd, "not connected, dropping command");
            return Ok(());
        };
        let Some(port) = &mut active.port else {
            tracing::warn!(command = %cmd, "link suspended, dropping command");
            return Ok(());
        };
        tracing::debug!(command = %cmd, "send");
        if let Err(e) = port.write_line(&cmd.encode()) {
            let msg = e.to_string();
            tracing::warn!(error = %msg, "serial write failed, disconnecting");
            self.active = None;
            return Err(LinkError::Write(msg));
        }
        Ok(())
    }

    /// Release the serial handle while keeping the device identity, so an
    /// external process can own the port. Returns the port identifier.
    pub fn suspend(&mut self) -> Option<String> {
        let active = self.active.as_mut()?;
        active.port = None;
        Some(active.name.clone())
    }

    /// Reopen the port after a `suspend`. On failure the identity is cleared
    /// and the caller should reset the session.
    pub fn resume(&mut self) -> Result<(), LinkError> {
        let Some(active) = &self.active else {
            return Err(LinkError::NotConnected);
        };
        let name = active.name.clone();
        match self.ports.open(&name, self.cfg.baud, self.read_timeout()) {
            Ok(port) => {
                if let Some(active) = &mut self.active {
                    active.port = Some(port);
                }
                Ok(())
            }
            Err(e) => {
                let msg = e.to_string();
                tracing::warn!(error = %msg, "reopen after flash failed");
                self.active = None;
                Err(LinkError::Open(msg))
            }
        }
    }
}
