// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Configuration merging.
//!
//! Handles merging configurations from different sources with proper precedence.

use std::path::PathBuf;

use url::Url;

use crate::error::ConfigError;

use super::types::{ResolvedConfig, SinkKind, SnipConfig};

/// CLI options that can override configuration.
#[derive(Debug, Clone, Default)]
pub struct CliOptions {
    pub max_urls: Option<usize>,
    pub base_url: Option<String>,
    pub sink: Option<SinkKind>,
    pub trace_file: Option<PathBuf>,
    pub no_color: bool,
    pub no_metrics: bool,
}

/// Default configuration values.
pub fn default_config() -> ResolvedConfig {
    ResolvedConfig::default()
}

/// Merge multiple configurations with precedence.
///
/// Precedence (highest to lowest):
/// 1. CLI options
/// 2. Local config (.snip.local.json)
/// 3. Workspace config (.snip.json)
/// 4. Global config (~/.snip/config.json)
/// 5. Default values
pub fn merge_config(
    global: Option<SnipConfig>,
    workspace: Option<SnipConfig>,
    local: Option<SnipConfig>,
    cli: CliOptions,
) -> ResolvedConfig {
    let mut result = default_config();

    for config in [global, workspace, local].into_iter().flatten() {
        apply_file_config(&mut result, config);
    }

    apply_cli_options(&mut result, cli);
    result
}

fn apply_file_config(result: &mut ResolvedConfig, config: SnipConfig) {
    if let Some(max_urls) = config.max_urls {
        result.max_urls = max_urls;
    }
    if let Some(base_url) = config.base_url {
        result.base_url = base_url;
    }
    if let Some(sink) = config.sink {
        result.sink = sink;
    }
    if let Some(trace_file) = config.trace_file {
        result.trace_file = trace_file;
    }
    if let Some(colors) = config.colors {
        result.colors = colors;
    }
    if let Some(metrics) = config.metrics {
        result.metrics = metrics;
    }
}

fn apply_cli_options(result: &mut ResolvedConfig, cli: CliOptions) {
    if let Some(max_urls) = cli.max_urls {
        result.max_urls = max_urls;
    }
    if let Some(base_url) = cli.base_url {
        result.base_url = base_url;
    }
    if let Some(sink) = cli.sink {
        result.sink = sink;
    }
    if let Some(trace_file) = cli.trace_file {
        result.trace_file = trace_file;
    }
    if cli.no_color {
        result.colors = false;
    }
    if cli.no_metrics {
        result.metrics = false;
    }
}

/// Reject settings the form cannot run with.
pub fn validate_config(config: &ResolvedConfig) -> Result<(), ConfigError> {
    if config.max_urls == 0 {
        return Err(ConfigError::InvalidValue {
            field: "maxUrls".to_string(),
            message: "must be at least 1".to_string(),
        });
    }

    match Url::parse(&config.base_url) {
        Ok(url) if !url.cannot_be_a_base() => Ok(()),
        _ => Err(ConfigError::InvalidValue {
            field: "baseUrl".to_string(),
            message: format!("'{}' is not an absolute URL", config.base_url),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_defaults_only() {
        let config = merge_config(None, None, None, CliOptions::default());
        assert_eq!(config, ResolvedConfig::default());
    }

    #[test]
    fn test_merge_precedence() {
        let global = SnipConfig {
            max_urls: Some(10),
            base_url: Some("https://global.example".to_string()),
            sink: Some(SinkKind::Tracing),
            ..Default::default()
        };
        let workspace = SnipConfig {
            max_urls: Some(8),
            ..Default::default()
        };
        let local = SnipConfig {
            max_urls: Some(6),
            colors: Some(false),
            ..Default::default()
        };
        let cli = CliOptions {
            sink: Some(SinkKind::Json),
            ..Default::default()
        };

        let config = merge_config(Some(global), Some(workspace), Some(local), cli);
        assert_eq!(config.max_urls, 6);
        assert_eq!(config.base_url, "https://global.example");
        assert_eq!(config.sink, SinkKind::Json);
        assert!(!config.colors);
    }

    #[test]
    fn test_cli_flags_only_disable() {
        let file = SnipConfig {
            colors: Some(false),
            metrics: Some(false),
            ..Default::default()
        };
        let config = merge_config(None, Some(file), None, CliOptions::default());
        assert!(!config.colors);
        assert!(!config.metrics);

        let cli = CliOptions {
            no_metrics: true,
            ..Default::default()
        };
        assert!(!merge_config(None, None, None, cli).metrics);
    }

    #[test]
    fn test_validate_config() {
        assert!(validate_config(&ResolvedConfig::default()).is_ok());

        let zero = ResolvedConfig {
            max_urls: 0,
            ..Default::default()
        };
        assert!(matches!(
            validate_config(&zero),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "maxUrls"
        ));

        let relative = ResolvedConfig {
            base_url: "sn.ip".to_string(),
            ..Default::default()
        };
        assert!(validate_config(&relative).is_err());

        let opaque = ResolvedConfig {
            base_url: "mailto:someone@example.com".to_string(),
            ..Default::default()
        };
        assert!(validate_config(&opaque).is_err());
    }
}
