//! Module for searching for waypoint-trainer config files

use std::path::PathBuf;

use crate::constants::APP_NAME;

/// Name of the config file inside the XDG and system config directories
const CONFIG_FILE_NAME: &str = "config.yaml";

/// Returns the config file locations in the order they are checked.
/// E.g. ["./waypoint-trainer.yaml", "~/.config/waypoint-trainer/config.yaml",
/// "/etc/waypoint-trainer/config.yaml"]
pub fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(format!("./{APP_NAME}.yaml"))];

    match xdg::BaseDirectories::with_prefix(APP_NAME) {
        Ok(base_dirs) => paths.push(base_dirs.get_config_home().join(CONFIG_FILE_NAME)),
        Err(e) => log::debug!("Unable to determine XDG config directory: {e}"),
    }

    paths.push(PathBuf::from("/etc").join(APP_NAME).join(CONFIG_FILE_NAME));
    paths
}

/// Returns the first config file that exists, if any
pub fn find_config_file() -> Option<PathBuf> {
    get_config_paths().into_iter().find(|path| {
        log::trace!("Checking {path:?} for config");
        path.is_file()
    })
}

/// Directory the generated JSON schema is written to
pub fn get_schema_path() -> PathBuf {
    PathBuf::from("./rootfs/usr/share").join(APP_NAME).join("schema")
}
