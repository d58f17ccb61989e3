// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Snip - an instrumented URL-shortening form.
//!
//! A small form holding long URLs that are shortened by a local mock
//! generator. Every state change goes through an action-logging middleware
//! that reports what each call received, what it produced and how long it
//! took, without altering the call's result.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - [`middleware`] - The action-logging wrapper, trace records and sinks
//! - [`form`] - URL entries, validation, the mock shortener and the form itself
//! - [`error`] - Error types and result aliases
//! - [`config`] - Configuration loading and merging
//! - [`telemetry`] - Tracing setup, action spans, and metrics
//! - [`app`] - Wiring configuration into sinks and a form
//! - [`cli`] - The REPL and batch front end
//!
//! # Example
//!
//! ```rust,ignore
//! use snip::config::{load_config, CliOptions};
//! use snip::app::App;
//!
//! let config = load_config(Path::new("."), CliOptions::default())?;
//! let app = App::new(config)?;
//! let index = app.form().add_url().await?;
//! ```

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod form;
pub mod middleware;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use app::App;
pub use error::{CliError, ConfigError, FormError, Result, SinkError};
pub use form::{FormState, UrlEntry, UrlField, UrlForm};
pub use middleware::{
    wrap, ActionLogger, Instrumented, OperationTag, Phase, SharedSink, StateMutator, TraceRecord,
    TraceSink,
};

/// Snip version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_public_exports() {
        let _entry = UrlEntry::new("https://example.com");
        let _tag = OperationTag::new("SET_URLS");
        let _logger = ActionLogger::new(std::sync::Arc::new(middleware::NullSink));
    }
}
