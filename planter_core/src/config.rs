//! Runtime configuration for the link and the poll loop.
//!
//! These are the structs consumed by `DeviceLink` and `Runner`. They are
//! separate from the TOML-deserialized schema in `planter_config`.

/// Serial link parameters and the discovery rule.
#[derive(Debug, Clone)]
pub struct LinkCfg {
    /// Line rate of the device's USB-to-serial bridge.
    pub baud: u32,
    /// Read timeout applied when opening the port (ms).
    pub read_timeout_ms: u64,
    /// Substring a port descriptor must contain to identify the bridge chip.
    pub bridge_match: String,
    /// Substring identifying the expected bus type.
    pub bus_match: String,
}

impl Default for LinkCfg {
    fn default() -> Self {
        Self {
            baud: 115_200,
            read_timeout_ms: 1_000,
            bridge_match: "CP2102".into(),
            bus_match: "USB".into(),
        }
    }
}

/// Cadences and fixed pauses of the runner loop.
#[derive(Debug, Clone)]
pub struct TimingCfg {
    /// Presence-poll period while idle (ms).
    pub poll_ms: u64,
    /// How long the startup version banner stays on screen (ms).
    pub banner_ms: u64,
    /// Duration of transient splash frames ("Connected", "Done") (ms).
    pub splash_ms: u64,
    /// Deliberate pause between the factory-reset and main-firmware
    /// flash passes (ms).
    pub flash_pause_ms: u64,
}

impl Default for TimingCfg {
    fn default() -> Self {
        Self {
            poll_ms: 500,
            banner_ms: 5_000,
            splash_ms: 1_000,
            flash_pause_ms: 1_000,
        }
    }
}
