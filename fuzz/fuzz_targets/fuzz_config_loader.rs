#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Parsing and validating arbitrary TOML must reject gracefully, never panic.
    if let Ok(cfg) = toml::from_str::<planter_config::Config>(data) {
        let _ = cfg.validate();
    }
});
