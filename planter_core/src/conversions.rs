//! From impls mapping the TOML schema in `planter_config` onto the runtime
//! configuration structs consumed by the core.

use crate::config::{LinkCfg, TimingCfg};

impl From<&planter_config::Serial> for LinkCfg {
    fn from(s: &planter_config::Serial) -> Self {
        Self {
            baud: s.baud,
            read_timeout_ms: s.read_timeout_ms,
            bridge_match: s.bridge_match.clone(),
            bus_match: s.bus_match.clone(),
        }
    }
}

impl From<&planter_config::Timing> for TimingCfg {
    fn from(t: &planter_config::Timing) -> Self {
        Self {
            poll_ms: t.poll_ms,
            banner_ms: t.banner_ms,
            splash_ms: t.splash_ms,
            flash_pause_ms: t.flash_pause_ms,
        }
    }
}
