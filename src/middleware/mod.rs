// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Action-logging middleware.
//!
//! Wraps state-mutating operations so that each call is observable through
//! a stream of [`TraceRecord`]s without changing what the call returns:
//!
//! - [`StateMutator`] - the operations being wrapped
//! - [`Instrumented`] / [`wrap`] / [`ActionLogger`] - the wrapper itself
//! - [`TraceSink`] - where records go (console, memory, tracing, JSON Lines,
//!   metrics, fan-out)
//!
//! Every call emits one `begin` record and then exactly one `end` or
//! `error` record. Wrapping a wrapped mutator nests the records: the outer
//! `begin` comes first and the outer terminal record comes last.
//!
//! # Example
//!
//! ```rust,ignore
//! use snip::middleware::{from_sync_fn, ActionLogger, StateMutator};
//!
//! let logger = ActionLogger::default();
//! let set_title = logger.wrap("SET_TITLE", from_sync_fn(|t: String| Ok::<_, Infallible>(t)));
//! let title = set_title.apply("hello".into()).await?;
//! ```

mod mutator;
mod record;
pub mod sink;
mod wrapper;

pub use mutator::{from_fn, from_sync_fn, FnMutator, StateMutator, SyncFnMutator};
pub use record::{
    cancelled_payload, error_payload, panicked_payload, snapshot, OperationTag, Phase, TraceRecord,
};
pub use sink::{
    ConsoleSink, FanoutSink, JsonLinesSink, MemorySink, MetricsSink, NullSink, SharedSink,
    TraceSink, TracingSink,
};
pub use wrapper::{wrap, ActionLogger, Instrumented};
