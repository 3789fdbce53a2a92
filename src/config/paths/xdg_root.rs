//! XDG Base Directory utilities for configuration lookup.

use std::path::PathBuf;

/// Get XDG config home directory
///
/// Returns `$XDG_CONFIG_HOME` if set, otherwise defaults to `$HOME/.config`
pub fn config_home() -> Option<PathBuf> {
    if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
        if !xdg_config_home.is_empty() {
            return Some(PathBuf::from(xdg_config_home));
        }
    }

    std::env::var("HOME")
        .ok()
        .map(|home| PathBuf::from(home).join(".config"))
}

/// Global config file path: `$XDG_CONFIG_HOME/pathstore/config.toml`
pub fn config_file() -> Option<PathBuf> {
    config_home().map(|home| home.join("pathstore").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_file_ends_with_pathstore_segment() {
        if let Some(path) = config_file() {
            assert!(path.ends_with("pathstore/config.toml"));
        }
    }
}
