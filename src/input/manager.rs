use std::error::Error;

use tokio::sync::mpsc;

use crate::config::BridgeConfig;
use crate::drivers::rpi_touch::driver::Driver;
use crate::input::session::{Session, SessionEnd, SessionError};
use crate::input::target::{TargetDevice, TargetDeviceTypeId};
use crate::udev;
use crate::watcher::{self, fifo, WatchEvent};

const DEV_PATH: &str = "/dev";
const BUFFER_SIZE: usize = 1024;

/// Manager commands define all the different ways to interact with [Manager]
/// over a channel. These commands are processed in an asyncronous thread and
/// dispatched as they come in.
#[derive(Debug)]
pub enum Command {
    HIDRawAdded { name: String },
    HIDRawRemoved { name: String },
    DeviceNotified { path: String },
    SessionEnded { path: String, outcome: SessionOutcome },
}

impl Command {
    /// Translate a filesystem or fifo event into a manager command. Events
    /// for nodes other than hidraw devices are ignored.
    pub fn from_watch_event(event: WatchEvent) -> Option<Command> {
        match event {
            WatchEvent::Create { name } if name.starts_with("hidraw") => {
                Some(Command::HIDRawAdded { name })
            }
            WatchEvent::Delete { name } if name.starts_with("hidraw") => {
                Some(Command::HIDRawRemoved { name })
            }
            WatchEvent::Notify { path } => Some(Command::DeviceNotified { path }),
            _ => None,
        }
    }
}

/// How a session on a device finished
#[derive(Debug)]
pub enum SessionOutcome {
    /// The touch device or the virtual device could not be opened
    SetupFailed(String),
    /// Writing to the virtual device failed
    Failed(SessionError),
    /// The touch device went away
    Ended(SessionEnd),
}

/// Open the touch device at the given path, create the target device and
/// process reports until the touch device goes away. Blocks the calling
/// thread for the lifetime of the session.
pub fn run_session(path: &str, config: &BridgeConfig, kind: TargetDeviceTypeId) -> SessionOutcome {
    log::info!("Starting session on {path}");
    let driver = match Driver::open(path, config.device.vendor_id, config.device.product_id) {
        Ok(driver) => driver,
        Err(e) => return SessionOutcome::SetupFailed(format!("unable to open {path}: {e}")),
    };
    let target = match TargetDevice::create(kind, config.touchscreen_config()) {
        Ok(target) => target,
        Err(e) => {
            return SessionOutcome::SetupFailed(format!("unable to create target device: {e}"))
        }
    };

    let mut session = Session::new(driver, target, config.tracker_config());
    match session.run() {
        Ok(end) => SessionOutcome::Ended(end),
        Err(e) => SessionOutcome::Failed(e),
    }
}

/// Supervises touch device sessions
///
/// The [Manager] looks for the touch controller at startup and whenever a
/// discovery trigger arrives. At most one session runs at a time; triggers
/// received while a session is active are ignored. When a session ends on
/// device loss the manager rescans once, so a controller that re-enumerated
/// under a new node is picked up again.
pub struct Manager {
    config: BridgeConfig,
    target_kind: TargetDeviceTypeId,
    /// The transmit side of the [rx] channel used to send [Command] messages.
    tx: mpsc::Sender<Command>,
    /// The receive side of the channel used to listen for [Command] messages
    rx: mpsc::Receiver<Command>,
    /// Device path of the running session, if any
    active: Option<String>,
}

impl Manager {
    /// Returns a new instance of Manager
    pub fn new(config: BridgeConfig, target_kind: TargetDeviceTypeId) -> Manager {
        let (tx, rx) = mpsc::channel(BUFFER_SIZE);
        Manager {
            config,
            target_kind,
            tx,
            rx,
            active: None,
        }
    }

    /// Returns the device path of the running session
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Starts the discovery watchers and dispatches [Command] messages until
    /// every sender is gone.
    pub async fn run(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.watch_devices();

        // Perform an initial discovery
        self.scan();

        while let Some(cmd) = self.rx.recv().await {
            log::debug!("Received command: {:?}", cmd);
            match cmd {
                Command::HIDRawAdded { name } => {
                    log::debug!("HIDRaw added: {name}");
                    self.scan();
                }
                Command::HIDRawRemoved { name } => {
                    log::debug!("HIDRaw removed: {name}");
                }
                Command::DeviceNotified { path } => {
                    log::info!("Notified of device {path}");
                    self.start_session(path);
                }
                Command::SessionEnded { path, outcome } => self.on_session_ended(path, outcome),
            }
        }

        Ok(())
    }

    /// Look for the touch controller and start a session on it if idle
    fn scan(&mut self) {
        if let Some(path) = self.active() {
            log::debug!("Session on {path} is active. Skipping scan.");
            return;
        }

        let vid = self.config.device.vendor_id;
        let pid = self.config.device.product_id;
        match udev::find_touch_device(vid, pid) {
            Ok(Some(path)) => self.start_session(path),
            Ok(None) => log::info!("No {vid:04x}:{pid:04x} touch device found. Waiting."),
            Err(e) => log::error!("Unable to scan for touch devices: {e}"),
        }
    }

    /// Run a session on the given device on a blocking thread
    fn start_session(&mut self, path: String) {
        if let Some(active) = self.active.as_ref() {
            log::debug!("Session on {active} is active. Ignoring {path}.");
            return;
        }
        self.active = Some(path.clone());

        let config = self.config.clone();
        let kind = self.target_kind;
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let session_path = path.clone();
            let task =
                tokio::task::spawn_blocking(move || run_session(&session_path, &config, kind));
            let outcome = match task.await {
                Ok(outcome) => outcome,
                Err(e) => SessionOutcome::SetupFailed(format!("session task failed: {e}")),
            };
            if let Err(e) = tx.send(Command::SessionEnded { path, outcome }).await {
                log::error!("Unable to send command: {:?}", e);
            }
        });
    }

    fn on_session_ended(&mut self, path: String, outcome: SessionOutcome) {
        self.active = None;
        match outcome {
            SessionOutcome::SetupFailed(e) => {
                log::error!("Failed to start session on {path}: {e}");
            }
            SessionOutcome::Failed(e) => {
                log::error!("Session on {path} failed: {e}");
            }
            SessionOutcome::Ended(end) => {
                log::info!("Session on {path} ended: {:?}", end.reason);
                self.scan();
            }
        }
    }

    /// Starts the threads that produce discovery triggers
    fn watch_devices(&self) {
        // Create a channel to handle watch events
        let (watcher_tx, mut watcher_rx) = mpsc::channel(BUFFER_SIZE);

        // Start watcher thread to listen for hidraw device changes
        if self.config.discovery.watch_dev {
            let tx = watcher_tx.clone();
            tokio::task::spawn_blocking(move || {
                log::debug!("Started watcher thread");
                watcher::watch(DEV_PATH.into(), tx)
            });
        }

        // Start listener thread for device paths written into the fifo
        if let Some(path) = self.config.discovery.fifo_path.clone() {
            let tx = watcher_tx.clone();
            tokio::task::spawn_blocking(move || {
                log::debug!("Started fifo thread");
                fifo::listen(path, tx)
            });
        }
        drop(watcher_tx);

        // Start a task to dispatch filesystem watch events to the `run()` loop
        let cmd_tx = self.tx.clone();
        tokio::spawn(async move {
            log::debug!("Dispatching filesystem watch events");
            while let Some(event) = watcher_rx.recv().await {
                log::trace!("Received watch event: {:?}", event);
                let Some(cmd) = Command::from_watch_event(event) else {
                    continue;
                };
                if let Err(e) = cmd_tx.send(cmd).await {
                    log::error!("Unable to send command: {:?}", e);
                }
            }
        });
    }
}
