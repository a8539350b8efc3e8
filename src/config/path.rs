//! Module for searching for rpi-touch config files

use std::path::PathBuf;

/// System-wide config file, checked before the XDG config directories
const SYSTEM_CONFIG_PATH: &str = "/etc/rpi-touch/config.yaml";
const CONFIG_FILE_NAME: &str = "config.yaml";

/// Returns the config file candidates in load order.
/// E.g. ["/etc/rpi-touch/config.yaml", "~/.config/rpi-touch/config.yaml"]
pub fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(SYSTEM_CONFIG_PATH)];

    let Ok(base_dirs) = xdg::BaseDirectories::with_prefix("rpi-touch") else {
        log::warn!("Unable to determine XDG config directories.");
        return paths;
    };
    paths.push(base_dirs.get_config_home().join(CONFIG_FILE_NAME));
    paths.extend(
        base_dirs
            .get_config_dirs()
            .into_iter()
            .map(|dir| dir.join(CONFIG_FILE_NAME)),
    );

    paths
}

/// Returns the first config file that exists
pub fn find_config_file() -> Option<PathBuf> {
    get_config_paths().into_iter().find(|path| {
        log::trace!("Checking for config file {path:?}");
        path.is_file()
    })
}
