pub mod decode;
pub mod devices;

use std::{error::Error, path::PathBuf};

use clap::{Args as ClapArgs, Parser, Subcommand};
use decode::handle_decode;
use devices::handle_devices;

use crate::{config::BridgeConfig, input::tracker::SyncPolicy, watcher::fifo};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(flatten)]
    pub run: RunArgs,
    #[command(subcommand)]
    pub cmd: Option<Commands>,
}

/// Options for running the bridge. Flags override the config file.
#[derive(ClapArgs, Debug, Clone, Default)]
pub struct RunArgs {
    /// Path to a config file
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Use this hidraw device instead of discovering one. Exits when the
    /// device goes away.
    #[arg(long)]
    pub device: Option<String>,
    /// Listen for device paths on this fifo
    #[arg(long)]
    pub fifo: Option<String>,
    /// Only emit the multi-touch slot stream
    #[arg(long)]
    pub no_legacy: bool,
    /// When to terminate event batches with a sync
    #[arg(long, value_enum)]
    pub sync: Option<SyncPolicy>,
    /// Log events instead of creating a virtual device
    #[arg(long)]
    pub dry_run: bool,
}

impl RunArgs {
    /// Apply the command line overrides to the given config
    pub fn apply(&self, config: &mut BridgeConfig) {
        if let Some(fifo) = self.fifo.as_ref() {
            config.discovery.fifo_path = Some(fifo.clone());
        }
        if self.no_legacy {
            config.target.legacy_single_touch = false;
        }
        if let Some(sync) = self.sync {
            config.target.sync_policy = sync;
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the touch bridge (default)
    Run(RunArgs),
    /// List hidraw devices and show which one is the touch controller
    Devices {
        /// Path to a config file
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Decode a single raw report given as hex and print the events it produces
    Decode {
        /// 25 bytes of hex, e.g. "aa 01 03 1b ..."
        report: String,
        /// Only show the multi-touch slot stream
        #[arg(long)]
        no_legacy: bool,
    },
    /// Tell a running bridge to use the given device
    Notify {
        /// Device path, e.g. /dev/hidraw0
        path: String,
        /// Fifo the running bridge listens on
        #[arg(long, default_value = fifo::DEFAULT_FIFO_PATH)]
        fifo: String,
    },
}

/// Handles every command other than [Commands::Run]
pub async fn main_cli(cmd: Commands) -> Result<(), Box<dyn Error + Send + Sync>> {
    match cmd {
        Commands::Run(_) => (),
        Commands::Devices { config } => {
            let config = BridgeConfig::load(config.as_deref())?;
            handle_devices(&config)?;
        }
        Commands::Decode { report, no_legacy } => handle_decode(report.as_str(), no_legacy)?,
        Commands::Notify { path, fifo } => {
            fifo::notify(fifo.as_str(), path.as_str())?;
            println!("Sent {path} to {fifo}");
        }
    }

    Ok(())
}
