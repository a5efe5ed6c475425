//! Surface Book 2 button array driver
//!
//! Main entry point: loads the config, sets up logging and dispatches the
//! subcommands.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{info, warn};

use surfacebook2_acpi::{AcpiBus, AcpiCall};
use surfacebook2_button::{host_platform, DriverConfig, SURFACEBOOK2_BUTTON_DRIVER};
use surfacebook2_buttons::{DeviceIdentifier, GroupKind, SURFACEBOOK2};

mod cli;
use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(DriverConfig::default_path);
    let config = DriverConfig::load(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;

    // Initialize logging
    let level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run(&config),
        Commands::List => list(&config),
        Commands::Probe { instance } => probe(&config, &instance),
        Commands::Buttons => {
            buttons();
            Ok(())
        }
        Commands::Config { init } => show_config(&config, &config_path, init),
    }
}

/// Bind, then wait for Ctrl-C and unbind
fn run(config: &DriverConfig) -> Result<()> {
    let mut platform = host_platform(config);

    let bound = platform.register().context("enumerating ACPI devices")?;
    if bound == 0 {
        warn!("No button array bound");
    }

    // Set up Ctrl-C handler
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);
    ctrlc::set_handler(move || {
        running_clone.store(false, Ordering::SeqCst);
    })
    .context("installing signal handler")?;

    info!("Running with {} bound device(s). Press Ctrl+C to exit.", bound);
    while running.load(Ordering::SeqCst) {
        thread::sleep(Duration::from_millis(200));
    }

    platform.unregister();
    Ok(())
}

fn list(config: &DriverConfig) -> Result<()> {
    let bus = AcpiBus::new(&config.sysfs_root);
    let nodes = bus.matching(SURFACEBOOK2_BUTTON_DRIVER.ids)?;

    if nodes.is_empty() {
        println!("No {:?} nodes found", SURFACEBOOK2_BUTTON_DRIVER.ids);
        return Ok(());
    }

    for node in nodes {
        println!(
            "{:<14} hid={} bus_id={} path={}",
            node.instance(),
            node.hid(),
            node.bus_id(),
            node.path()
        );
    }
    Ok(())
}

fn probe(config: &DriverConfig, instance: &str) -> Result<()> {
    let node = AcpiBus::new(&config.sysfs_root).find(instance)?;
    let identifier = DeviceIdentifier::new(AcpiCall::new(&config.acpi_call_path));

    match identifier.check(&node) {
        Ok(id) => println!("{}: match (device id 0x{:x})", instance, id),
        Err(mismatch) => println!("{}: no match ({})", instance, mismatch),
    }
    Ok(())
}

fn show_config(config: &DriverConfig, path: &Path, init: bool) -> Result<()> {
    if !init {
        print!("{}", toml::to_string_pretty(config)?);
        return Ok(());
    }

    if path.exists() {
        bail!("{} already exists", path.display());
    }
    config.save(path)?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn buttons() {
    for kind in GroupKind::BUILD_ORDER {
        println!("slot {} ({}):", kind.slot(), kind);
        for b in SURFACEBOOK2.group(kind.autorepeat()) {
            println!(
                "  {:<8} crs={} gpio=0x{:04x} code={:<3} wakeup={:<5} active_low={}",
                b.name,
                b.acpi_index,
                b.gpio,
                b.code,
                b.wakeup,
                b.polarity.is_active_low()
            );
        }
    }
}
