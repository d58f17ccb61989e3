// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Configuration type definitions.
//!
//! Defines the structure of file and resolved configuration,
//! supporting JSON and YAML formats.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::form::{DEFAULT_BASE_URL, DEFAULT_MAX_URLS};

/// Default location of the JSON Lines trace file.
pub const DEFAULT_TRACE_FILE: &str = ".snip/trace.jsonl";

/// Where action trace records go.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    /// Grouped, colored output on stderr.
    #[default]
    Console,
    /// Events on the `tracing` subscriber.
    Tracing,
    /// JSON Lines appended to the trace file.
    Json,
    /// Drop records (metrics are still collected if enabled).
    None,
}

impl SinkKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Console => "console",
            Self::Tracing => "tracing",
            Self::Json => "json",
            Self::None => "none",
        }
    }
}

impl fmt::Display for SinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SinkKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "console" => Ok(Self::Console),
            "tracing" | "log" => Ok(Self::Tracing),
            "json" | "jsonl" => Ok(Self::Json),
            "none" | "off" => Ok(Self::None),
            other => Err(ConfigError::InvalidValue {
                field: "sink".to_string(),
                message: format!("unknown sink '{other}' (expected console, tracing, json or none)"),
            }),
        }
    }
}

/// Configuration as written in a config file. Every field is optional.
/// Can be defined in .snip.json, .snip/config.json, snip.config.json or .snip.yaml.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnipConfig {
    /// Maximum number of URL rows in the form
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_urls: Option<usize>,

    /// Base URL for generated short links
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Trace sink (console, tracing, json, none)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sink: Option<SinkKind>,

    /// Path of the JSON Lines trace file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_file: Option<PathBuf>,

    /// Use ANSI colors on the console sink
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colors: Option<bool>,

    /// Collect per-action metrics
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<bool>,
}

/// Resolved configuration with all values set.
/// This is the merged result of global, workspace, local, and CLI configs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedConfig {
    pub max_urls: usize,
    pub base_url: String,
    pub sink: SinkKind,
    pub trace_file: PathBuf,
    pub colors: bool,
    pub metrics: bool,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            max_urls: DEFAULT_MAX_URLS,
            base_url: DEFAULT_BASE_URL.to_string(),
            sink: SinkKind::Console,
            trace_file: PathBuf::from(DEFAULT_TRACE_FILE),
            colors: true,
            metrics: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snip_config_default() {
        let config = SnipConfig::default();
        assert!(config.max_urls.is_none());
        assert!(config.sink.is_none());
    }

    #[test]
    fn test_snip_config_json_serialization() {
        let config = SnipConfig {
            max_urls: Some(3),
            sink: Some(SinkKind::Json),
            trace_file: Some(PathBuf::from("audit.jsonl")),
            ..Default::default()
        };

        let json = serde_json::to_string_pretty(&config).unwrap();
        assert!(json.contains("\"maxUrls\": 3"));
        assert!(json.contains("\"sink\": \"json\""));
        assert!(!json.contains("baseUrl"));

        let parsed: SnipConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.sink, Some(SinkKind::Json));
    }

    #[test]
    fn test_snip_config_yaml() {
        let parsed: SnipConfig =
            serde_yaml::from_str("maxUrls: 7\nbaseUrl: https://s.example\nsink: tracing\n").unwrap();
        assert_eq!(parsed.max_urls, Some(7));
        assert_eq!(parsed.base_url.as_deref(), Some("https://s.example"));
        assert_eq!(parsed.sink, Some(SinkKind::Tracing));
    }

    #[test]
    fn test_resolved_config_default() {
        let config = ResolvedConfig::default();
        assert_eq!(config.max_urls, 5);
        assert_eq!(config.base_url, "https://sn.ip");
        assert_eq!(config.sink, SinkKind::Console);
        assert!(config.metrics);
    }

    #[test]
    fn test_sink_kind_from_str() {
        assert_eq!("JSON".parse::<SinkKind>().unwrap(), SinkKind::Json);
        assert_eq!("off".parse::<SinkKind>().unwrap(), SinkKind::None);
        assert!("syslog".parse::<SinkKind>().is_err());
    }
}
