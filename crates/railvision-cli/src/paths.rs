//! Filesystem locations for RailVision state.

use std::env;
use std::path::PathBuf;

/// Home directory for config and session state.
///
/// `${RAILVISION_HOME}` overrides the default `~/.railvision`.
pub fn railvision_home() -> PathBuf {
    if let Ok(custom) = env::var("RAILVISION_HOME") {
        if !custom.trim().is_empty() {
            return PathBuf::from(custom);
        }
    }
    let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".railvision")
}

pub fn config_path() -> PathBuf {
    railvision_home().join("config.toml")
}

pub fn session_path() -> PathBuf {
    railvision_home().join("session.json")
}
