// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Error types for snip.
//!
//! This module provides strongly-typed errors for different parts of the application,
//! using `thiserror` for ergonomic error definitions and `anyhow` for error propagation.

use thiserror::Error;

/// Errors raised by a trace sink while writing a record.
///
/// These never reach the caller of a wrapped action: the middleware
/// reports them through `tracing` and drops them.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("IO error writing trace record: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize trace record: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Sink lock poisoned: {0}")]
    Poisoned(String),

    #[error("Sink rejected record: {0}")]
    Rejected(String),
}

impl SinkError {
    /// Build a poisoning error from any `PoisonError`.
    pub fn poisoned<T>(err: std::sync::PoisonError<T>) -> Self {
        Self::Poisoned(err.to_string())
    }
}

/// Errors produced by the URL form and its actions.
///
/// The display strings are the messages shown to the user in the form's
/// error line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Please enter a valid URL")]
    InvalidUrl,

    #[error("Validity period must be a positive integer")]
    InvalidPeriod,

    #[error("Shortcode can only contain letters, numbers, underscore and hyphen")]
    InvalidShortcode,

    #[error("Maximum {0} URLs allowed")]
    LimitReached(usize),

    #[error("No URL entry at index {0}")]
    NoSuchEntry(usize),

    #[error("Unknown field: {0}")]
    UnknownField(String),
}

/// Errors parsing a REPL command line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CliError {
    #[error("Unknown command: {0} (type 'help' for a list)")]
    UnknownCommand(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Invalid index: {0}")]
    InvalidIndex(String),

    #[error(transparent)]
    Form(#[from] FormError),
}

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(String),

    #[error("Invalid config format: {0}")]
    InvalidFormat(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("IO error reading config: {0}")]
    IoError(String),

    #[error("YAML parsing error: {0}")]
    YamlError(String),

    #[error("JSON parsing error: {0}")]
    JsonError(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(err.to_string()),
            _ => Self::IoError(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonError(err.to_string())
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::YamlError(err.to_string())
    }
}

/// Result type alias using anyhow for flexible error handling.
pub type Result<T> = anyhow::Result<T>;
