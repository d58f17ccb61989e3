// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Telemetry, tracing, and metrics infrastructure.
//!
//! This is the ambient diagnostics layer, separate from the action trace
//! records in [`middleware`](crate::middleware):
//!
//! - **Tracing**: `tracing-subscriber` setup writing to stderr
//! - **Spans**: one `action` span per wrapped invocation (feature `telemetry`)
//! - **Metrics**: per-action counters and latency histograms
//! - **Correlation IDs**: pair the records of one invocation
//!
//! # Usage
//!
//! ```rust,ignore
//! use snip::telemetry::{init_telemetry, TelemetryConfig};
//!
//! init_telemetry(&TelemetryConfig::from_flags(verbose, debug))?;
//! ```

mod correlation;
mod init;
pub mod metrics;
mod spans;

pub use correlation::CorrelationId;
pub use init::{init_telemetry, TelemetryConfig};
pub use metrics::{ActionMetrics, Histogram, Metrics, MetricsSnapshot, Outcome, GLOBAL_METRICS};
pub use spans::{action_span, SpanExt};
