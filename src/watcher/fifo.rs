//! Named pipe that other processes (e.g. a udev RUN rule) write device paths
//! into, one per line.

use std::{
    error::Error,
    fs::{File, OpenOptions},
    io::{BufRead, BufReader, Write},
    os::unix::fs::{FileTypeExt, OpenOptionsExt},
    path::Path,
};

use nix::{sys::stat::Mode, unistd::mkfifo};
use tokio::sync::mpsc::Sender;

use super::WatchEvent;

/// Default location of the notification fifo
pub const DEFAULT_FIFO_PATH: &str = "/run/rpi-touch/notify";

/// Create the fifo at the given path unless a fifo already exists there
pub fn create(path: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
    let fifo_path = Path::new(path);
    if let Ok(metadata) = fifo_path.metadata() {
        if metadata.file_type().is_fifo() {
            return Ok(());
        }
        return Err(format!("{path} exists and is not a fifo").into());
    }
    if let Some(parent) = fifo_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    mkfifo(fifo_path, Mode::S_IRUSR | Mode::S_IWUSR)?;
    log::debug!("Created fifo {path}");

    Ok(())
}

/// Returns the device path carried by one line of fifo input
pub fn parse_line(line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    Some(line.to_string())
}

/// Listen on the fifo at the given path, sending a [WatchEvent::Notify] for
/// every device path written into it. Returns when the fifo cannot be used or
/// the receiving side is gone.
pub fn listen(path: String, tx: Sender<WatchEvent>) {
    if let Err(e) = create(path.as_str()) {
        log::error!("Unable to create fifo {path}: {e}");
        return;
    }
    log::info!("Listening for device notifications on {path}");

    loop {
        // Blocks until a writer opens the other end
        let file = match File::open(path.as_str()) {
            Ok(file) => file,
            Err(e) => {
                log::error!("Unable to open fifo {path}: {e}");
                return;
            }
        };

        for line in BufReader::new(file).lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    log::warn!("Failed to read from fifo {path}: {e}");
                    break;
                }
            };
            let Some(device) = parse_line(line.as_str()) else {
                continue;
            };
            log::debug!("fifo NOTIFY: {device}");
            if let Err(e) = tx.blocking_send(WatchEvent::Notify { path: device }) {
                log::debug!("Stopping fifo listener on {path}: {e}");
                return;
            }
        }
    }
}

/// Write a device path into the fifo of a running instance. Fails if nobody
/// is listening.
pub fn notify(fifo: &str, device: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
    let mut file = OpenOptions::new()
        .write(true)
        .custom_flags(nix::libc::O_NONBLOCK)
        .open(fifo)
        .map_err(|e| format!("Unable to open fifo {fifo}: {e}"))?;
    writeln!(file, "{device}")?;

    Ok(())
}
