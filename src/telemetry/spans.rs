// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Span helpers for wrapped actions.

use std::time::Duration;

use tracing::{info_span, Span};

use super::CorrelationId;

/// Extension trait for recording action outcomes on a span.
pub trait SpanExt {
    /// Record the result of an operation (success/error).
    fn record_result<T, E>(&self, result: &Result<T, E>);

    /// Record elapsed time in milliseconds.
    fn record_duration(&self, elapsed: Duration);
}

impl SpanExt for Span {
    fn record_result<T, E>(&self, result: &Result<T, E>) {
        self.record("success", result.is_ok());
    }

    fn record_duration(&self, elapsed: Duration) {
        self.record("duration_ms", elapsed.as_secs_f64() * 1000.0);
    }
}

/// Span covering one invocation of a wrapped action.
pub fn action_span(tag: &str, call_id: CorrelationId) -> Span {
    info_span!(
        "action",
        tag = %tag,
        call_id = %call_id.short(),
        success = tracing::field::Empty,
        duration_ms = tracing::field::Empty,
    )
}
