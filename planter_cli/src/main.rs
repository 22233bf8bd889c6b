//! Bench entry point: config loading, logging setup, and hardware wiring.

mod cli;

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use crossbeam_channel::{Receiver, Sender};
use eyre::{Result, WrapErr};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

use cli::{Cli, Commands, FILE_GUARD};
use planter_config::Config;
use planter_core::wizard::{self, Effect};
use planter_core::{CalibrationSession, DeviceLink, InputEvent, LinkCfg, Runner, TimingCfg};
use planter_hardware::{ConsoleRenderer, SimulatedFlasher, SimulatedPorts, spawn_stdin_input};
use planter_traits::{MonotonicClock, Ports};

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let cfg = if cli.config.exists() {
        Config::load(&cli.config)
            .wrap_err_with(|| format!("loading config {}", cli.config.display()))?
    } else {
        Config::default()
    };
    init_logging(&cli, &cfg.logging);
    if !cli.config.exists() {
        info!(path = %cli.config.display(), "config file not found, using defaults");
    }

    match cli.cmd {
        Commands::Run { simulate } => cmd_run(&cfg, simulate),
        Commands::SelfCheck => run_self_check(cli.json),
    }
}

fn init_logging(cli: &Cli, logging: &planter_config::Logging) {
    let level = logging.level.as_deref().unwrap_or(&cli.log_level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let mut layers = Vec::new();
    layers.push(filter.boxed());
    if cli.json {
        layers.push(fmt::layer().json().boxed());
    } else {
        layers.push(fmt::layer().boxed());
    }
    if let Some(path) = &logging.file {
        let p = Path::new(path);
        let dir = p
            .parent()
            .filter(|d| !d.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let name = p
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_else(|| "planter.log".into());
        let appender = tracing_appender::rolling::never(dir, name);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let _ = FILE_GUARD.set(guard);
        layers.push(fmt::layer().json().with_writer(writer).with_ansi(false).boxed());
    }
    tracing_subscriber::registry().with(layers).init();
}

fn cmd_run(cfg: &Config, simulate: bool) -> Result<()> {
    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let flag = shutdown.clone();
        ctrlc::set_handler(move || {
            flag.store(true, Ordering::SeqCst);
        })
        .wrap_err("installing Ctrl-C handler")?;
    }

    let (tx, rx) = crossbeam_channel::bounded::<InputEvent>(64);
    let session = CalibrationSession::new(cfg.session.serial_number, cfg.session.hardware_revision);
    let link_cfg: LinkCfg = (&cfg.serial).into();
    let timing: TimingCfg = (&cfg.timing).into();

    if simulate {
        info!("running with simulated bench hardware");
        spawn_stdin_input(tx, shutdown.clone());
        let link = DeviceLink::new(SimulatedPorts, link_cfg);
        let mut runner = Runner::new(
            session,
            link,
            SimulatedFlasher,
            ConsoleRenderer,
            MonotonicClock::new(),
            rx,
            shutdown,
            timing,
        );
        runner.run()
    } else {
        run_bench(cfg, session, link_cfg, timing, tx, rx, shutdown)
    }
}

#[cfg(feature = "hardware")]
fn run_bench(
    cfg: &Config,
    session: CalibrationSession,
    link_cfg: LinkCfg,
    timing: TimingCfg,
    tx: Sender<InputEvent>,
    rx: Receiver<InputEvent>,
    shutdown: Arc<AtomicBool>,
) -> Result<()> {
    use planter_hardware::{CharLcd, EsptoolFlasher, KnobInput, SystemPorts};

    let pins = &cfg.pins;
    let lcd = CharLcd::new(
        pins.lcd_rs,
        pins.lcd_en,
        pins.lcd_d4,
        pins.lcd_d5,
        pins.lcd_d6,
        pins.lcd_d7,
        pins.lcd_backlight,
    )?;
    // Keep the knob thread alive for the whole run.
    let _knob = KnobInput::spawn(pins.enc_a, pins.enc_b, pins.enc_sw, tx)?;
    let link = DeviceLink::new(SystemPorts::new(), link_cfg);
    let flasher = EsptoolFlasher::new(&cfg.flash);
    let mut runner = Runner::new(
        session,
        link,
        flasher,
        lcd,
        MonotonicClock::new(),
        rx,
        shutdown,
        timing,
    );
    runner.run()
}

#[cfg(not(feature = "hardware"))]
fn run_bench(
    _cfg: &Config,
    _session: CalibrationSession,
    _link_cfg: LinkCfg,
    _timing: TimingCfg,
    _tx: Sender<InputEvent>,
    _rx: Receiver<InputEvent>,
    _shutdown: Arc<AtomicBool>,
) -> Result<()> {
    tracing::warn!("built without the `hardware` feature");
    eyre::bail!("GPIO/LCD support is not compiled in; rerun with --simulate")
}

/// Walk the wizard through a full calibration against the simulated bridge
/// and check that the expected command lines come out.
fn run_self_check(json: bool) -> Result<()> {
    let ports = SimulatedPorts.enumerate();
    let discovered = ports
        .iter()
        .any(|p| p.descriptor.contains("CP2102") && p.descriptor.contains("USB"));

    let mut session = CalibrationSession::new(130, 7);
    session.on_connected();
    let mut sent = Vec::new();
    let events = [
        InputEvent::ButtonPress, // Menu -> calibrate
        InputEvent::RotateUp,    // close 1010
        InputEvent::RotateUp,    // close 1020
        InputEvent::ButtonPress, // open seeded at 1520
        InputEvent::RotateUp,    // open 1530
        InputEvent::ButtonPress, // verify
        InputEvent::ButtonPress, // replay close
        InputEvent::RotateUp,
        InputEvent::ButtonPress, // replay open
        InputEvent::RotateUp,
        InputEvent::ButtonPress, // accept -> serial number
        InputEvent::ButtonPress, // -> hw revision
        InputEvent::ButtonPress, // -> confirm
        InputEvent::ButtonPress, // finalize
    ];
    for ev in events {
        for effect in wizard::transition(&mut session, ev) {
            if let Effect::Send(cmd) = effect {
                sent.push(cmd.encode());
            }
        }
    }

    let expected = [
        "C1010\n", "C1020\n", "O1530\n", "C1020\n", "O1530\n", "C1020\n", "N130\n", "H7\n",
        "E0\n",
    ];
    let wizard_ok = sent == expected && session.screen == planter_core::Screen::Disconnect;
    let ok = discovered && wizard_ok;

    if json {
        let report = serde_json::json!({
            "ok": ok,
            "port_discovery": discovered,
            "wizard": wizard_ok,
            "commands_sent": sent.len(),
        });
        println!("{report}");
    } else {
        println!(
            "port discovery: {}",
            if discovered { "ok" } else { "FAILED" }
        );
        println!(
            "wizard walkthrough: {} ({} commands)",
            if wizard_ok { "ok" } else { "FAILED" },
            sent.len()
        );
    }
    if !ok {
        eyre::bail!("self-check failed");
    }
    Ok(())
}
