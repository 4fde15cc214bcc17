use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = ".bb-pr-decorator.toml";

const APP_NAME: &str = "bb-pr-decorator";

/// Locate the config file
///
/// Searches in:
/// 1. Current working directory (`.bb-pr-decorator.toml`)
/// 2. Platform config directory (`~/.config/bb-pr-decorator/config.toml` on Linux)
///
/// Returns the first path that exists, None otherwise.
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILE);
    if local.is_file() {
        log::debug!("Found config at {}", local.display());
        return Some(local);
    }

    let global = global_config_path()?;
    if global.is_file() {
        log::debug!("Found config at {}", global.display());
        return Some(global);
    }

    None
}

/// Path of the config file in the platform config directory
fn global_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_NAME).join("config.toml"))
}

/// Read a config file into a string
pub(crate) fn read_config_file(path: &Path) -> anyhow::Result<String> {
    use anyhow::Context;
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))
}
