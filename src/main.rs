use std::env;
use std::error::Error;
use std::process;

use clap::Parser;

use crate::cli::{main_cli, Args, Commands};
use crate::config::BridgeConfig;
use crate::input::manager::{run_session, Manager, SessionOutcome};
use crate::input::target::TargetDeviceTypeId;

mod cli;
mod config;
mod drivers;
mod input;
mod udev;
mod watcher;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let args = Args::parse();

    let log_level = match env::var("LOG_LEVEL") {
        Ok(value) => value,
        Err(_) => "info".to_string(),
    };
    env::set_var("RUST_LOG", log_level);
    env_logger::init();

    // Run any CLI commands if they were passed
    let run_args = match args.cmd {
        None => args.run,
        Some(Commands::Run(run_args)) => run_args,
        Some(cmd) => return main_cli(cmd).await,
    };

    const VERSION: &str = env!("CARGO_PKG_VERSION");
    log::info!("Starting rpi-touch v{}", VERSION);

    // Setup CTRL+C handler
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Unable to listen for shutdown signal: {e}");
            return;
        }
        log::info!("Shutting down");
        process::exit(0);
    });

    let mut config = BridgeConfig::load(run_args.config.as_deref())?;
    run_args.apply(&mut config);
    log::debug!("Using config: {config:?}");

    let target_kind = if run_args.dry_run {
        TargetDeviceTypeId::Debug
    } else {
        TargetDeviceTypeId::Touchscreen
    };

    // A fixed device bypasses discovery
    if let Some(path) = run_args.device.clone() {
        return run_device(path, config, target_kind).await;
    }

    let mut manager = Manager::new(config, target_kind);
    if let Err(e) = manager.run().await {
        log::error!("Error running the input manager: {e}");
        return Err(e);
    }

    log::info!("rpi-touch stopped");

    Ok(())
}

/// Run a single session on the given device and exit when it ends
async fn run_device(
    path: String,
    config: BridgeConfig,
    target_kind: TargetDeviceTypeId,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let task_path = path.clone();
    let outcome =
        tokio::task::spawn_blocking(move || run_session(&task_path, &config, target_kind)).await?;

    match outcome {
        SessionOutcome::SetupFailed(e) => Err(e.into()),
        SessionOutcome::Failed(e) => Err(e.into()),
        SessionOutcome::Ended(end) => {
            log::info!("Device {path} is gone: {:?}", end.reason);
            Ok(())
        }
    }
}
