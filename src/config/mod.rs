pub mod path;

use std::{io, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    drivers::rpi_touch::driver::{PID, VID},
    input::{
        target::touchscreen::TouchscreenConfig,
        tracker::{SyncPolicy, TrackerConfig},
    },
};

/// Represents all possible errors loading a [BridgeConfig]
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Could not read: {0}")]
    IoError(#[from] io::Error),
    #[error("Unable to deserialize: {0}")]
    DeserializeError(#[from] serde_yaml::Error),
}

/// Top-level configuration of the touch bridge
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
#[serde(rename_all = "snake_case", default)]
pub struct BridgeConfig {
    pub version: u32,
    pub device: DeviceConfig,
    pub target: TargetConfig,
    pub discovery: DiscoveryConfig,
}

impl BridgeConfig {
    /// Load a [BridgeConfig] from the given YAML string
    pub fn from_yaml(content: String) -> Result<BridgeConfig, LoadError> {
        let config: BridgeConfig = serde_yaml::from_str(content.as_str())?;
        Ok(config)
    }

    /// Load a [BridgeConfig] from the given YAML file
    pub fn from_yaml_path(path: &Path) -> Result<BridgeConfig, LoadError> {
        let content = std::fs::read_to_string(path)?;
        BridgeConfig::from_yaml(content)
    }

    /// Load the configuration from the given path, or from the first config
    /// file found in the default locations. Falls back to the built-in
    /// defaults if no file exists.
    pub fn load(path: Option<&Path>) -> Result<BridgeConfig, LoadError> {
        if let Some(path) = path {
            log::debug!("Loading config from {path:?}");
            return BridgeConfig::from_yaml_path(path);
        }

        let Some(path) = path::find_config_file() else {
            log::debug!("No config file found. Using defaults.");
            return Ok(BridgeConfig::default());
        };
        log::debug!("Loading config from {path:?}");
        BridgeConfig::from_yaml_path(&path)
    }

    /// Returns the slot tracker configuration
    pub fn tracker_config(&self) -> TrackerConfig {
        TrackerConfig {
            legacy_single_touch: self.target.legacy_single_touch,
            sync_policy: self.target.sync_policy,
        }
    }

    /// Returns the virtual touchscreen configuration
    pub fn touchscreen_config(&self) -> TouchscreenConfig {
        TouchscreenConfig {
            name: self.target.name.clone(),
            ..Default::default()
        }
    }
}

/// Identifies the touch controller to look for
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "snake_case", default)]
pub struct DeviceConfig {
    pub vendor_id: u16,
    pub product_id: u16,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            vendor_id: VID,
            product_id: PID,
        }
    }
}

/// Virtual device and event stream options
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "snake_case", default)]
pub struct TargetConfig {
    pub name: String,
    pub legacy_single_touch: bool,
    pub sync_policy: SyncPolicy,
}

impl Default for TargetConfig {
    fn default() -> Self {
        let tracker = TrackerConfig::default();
        Self {
            name: TouchscreenConfig::default().name,
            legacy_single_touch: tracker.legacy_single_touch,
            sync_policy: tracker.sync_policy,
        }
    }
}

/// How new devices are noticed
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "snake_case", default)]
pub struct DiscoveryConfig {
    /// Watch /dev for hidraw nodes being created
    pub watch_dev: bool,
    /// Named pipe that other processes write device paths into
    pub fifo_path: Option<String>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            watch_dev: true,
            fifo_path: None,
        }
    }
}
