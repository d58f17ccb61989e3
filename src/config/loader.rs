// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Configuration loading from files.
//!
//! Handles loading configuration from JSON and YAML files in various locations.

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

use super::types::{SinkKind, SnipConfig};

/// Config file names to search for (in order).
pub const CONFIG_FILES: &[&str] = &[
    ".snip.json",
    ".snip/config.json",
    "snip.config.json",
    ".snip.yaml",
    ".snip.yml",
];

/// Local config file name (for per-directory overrides).
pub const LOCAL_CONFIG_FILE: &str = ".snip.local.json";

/// Global config directory name.
pub const GLOBAL_CONFIG_DIR: &str = ".snip";

/// Global config file name.
pub const GLOBAL_CONFIG_FILE: &str = "config.json";

/// Get the global config directory path.
pub fn get_global_config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(GLOBAL_CONFIG_DIR))
}

/// Get the global config file path.
pub fn get_global_config_path() -> Option<PathBuf> {
    get_global_config_dir().map(|dir| dir.join(GLOBAL_CONFIG_FILE))
}

/// Load global configuration from ~/.snip/config.json.
pub fn load_global_config() -> Result<Option<SnipConfig>, ConfigError> {
    match get_global_config_path() {
        Some(path) if path.exists() => load_config_file(&path).map(Some),
        _ => Ok(None),
    }
}

/// Load workspace configuration from the first of [`CONFIG_FILES`] present.
pub fn load_workspace_config(workspace_root: &Path) -> Result<Option<SnipConfig>, ConfigError> {
    for filename in CONFIG_FILES {
        let path = workspace_root.join(filename);
        if path.exists() {
            return load_config_file(&path).map(Some);
        }
    }
    Ok(None)
}

/// Load local configuration from .snip.local.json.
pub fn load_local_config(workspace_root: &Path) -> Result<Option<SnipConfig>, ConfigError> {
    let path = workspace_root.join(LOCAL_CONFIG_FILE);
    if !path.exists() {
        return Ok(None);
    }
    load_config_file(&path).map(Some)
}

/// Load a configuration file (JSON or YAML, chosen by extension).
pub fn load_config_file(path: &Path) -> Result<SnipConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "yaml" | "yml" => serde_yaml::from_str(&content).map_err(ConfigError::from),
        _ => serde_json::from_str(&content).map_err(ConfigError::from),
    }
}

/// Save configuration to a file in the workspace root.
pub fn save_workspace_config(
    workspace_root: &Path,
    config: &SnipConfig,
    filename: Option<&str>,
) -> Result<PathBuf, ConfigError> {
    let path = workspace_root.join(filename.unwrap_or(".snip.json"));

    let content = match path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => serde_yaml::to_string(config)?,
        _ => serde_json::to_string_pretty(config)?,
    };
    std::fs::write(&path, content)?;

    Ok(path)
}

/// Write a new config file, using the example configuration when none is given.
pub fn init_config(workspace_root: &Path, config: Option<SnipConfig>) -> Result<PathBuf, ConfigError> {
    let config = config.unwrap_or_else(get_example_config);
    save_workspace_config(workspace_root, &config, None)
}

/// Find the workspace root by searching for config files.
///
/// Walks up the directory tree from `start` until it finds a directory
/// containing a config file or reaches the filesystem root.
pub fn find_workspace_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| CONFIG_FILES.iter().any(|name| dir.join(name).exists()))
        .map(Path::to_path_buf)
}

/// Get an example configuration.
pub fn get_example_config() -> SnipConfig {
    SnipConfig {
        max_urls: Some(5),
        base_url: Some("https://sn.ip".to_string()),
        sink: Some(SinkKind::Console),
        colors: Some(true),
        metrics: Some(true),
        ..Default::default()
    }
}
