// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! The action-logging wrapper.
//!
//! [`Instrumented`] decorates a [`StateMutator`] so every call emits a
//! `begin` record, runs the mutator exactly once, then emits exactly one
//! `end` or `error` record. Results and errors pass through untouched.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, warn};

#[cfg(feature = "telemetry")]
use tracing::Instrument;

#[cfg(feature = "telemetry")]
use crate::telemetry::{action_span, SpanExt};
use crate::telemetry::CorrelationId;

use super::mutator::StateMutator;
use super::record::{
    cancelled_payload, error_payload, panicked_payload, snapshot, OperationTag, TraceRecord,
};
use super::sink::{ConsoleSink, SharedSink, TraceSink};

/// A [`StateMutator`] that reports every invocation to a trace sink.
///
/// Implements [`StateMutator`] itself with the same input, output and error
/// types, so it can stand in for the wrapped mutator anywhere, including
/// inside another `Instrumented`.
pub struct Instrumented<M> {
    tag: OperationTag,
    inner: M,
    sink: SharedSink,
}

impl<M: StateMutator> Instrumented<M> {
    pub fn new(tag: impl Into<OperationTag>, inner: M, sink: SharedSink) -> Self {
        let tag = tag.into();
        if tag.is_empty() {
            debug!("Wrapping an action with an empty tag");
        }
        Self { tag, inner, sink }
    }

    pub fn tag(&self) -> &OperationTag {
        &self.tag
    }

    pub fn inner(&self) -> &M {
        &self.inner
    }

    pub fn sink(&self) -> &SharedSink {
        &self.sink
    }

    /// Drop the instrumentation and return the wrapped mutator.
    pub fn into_inner(self) -> M {
        self.inner
    }
}

#[async_trait]
impl<M: StateMutator> StateMutator for Instrumented<M> {
    type Input = M::Input;
    type Output = M::Output;
    type Error = M::Error;

    async fn apply(&self, input: M::Input) -> Result<M::Output, M::Error> {
        let call = Invocation::begin(self.tag.clone(), Arc::clone(&self.sink), &input);

        #[cfg(feature = "telemetry")]
        let result = {
            let span = action_span(self.tag.as_str(), call.id);
            let result = self.inner.apply(input).instrument(span.clone()).await;
            span.record_result(&result);
            span.record_duration(call.started.elapsed());
            result
        };

        #[cfg(not(feature = "telemetry"))]
        let result = self.inner.apply(input).await;

        match &result {
            Ok(output) => call.succeed(output),
            Err(err) => call.fail(err),
        }
        result
    }
}

/// Wrap `operation` so its calls are reported to `sink` under `tag`.
pub fn wrap<M: StateMutator>(
    tag: impl Into<OperationTag>,
    operation: M,
    sink: SharedSink,
) -> Instrumented<M> {
    Instrumented::new(tag, operation, sink)
}

/// Factory holding the sink shared by all of an application's actions.
///
/// ```rust,ignore
/// let logger = ActionLogger::new(sink);
/// let set_urls = logger.wrap("SET_URLS", SetUrls::new(store.clone()));
/// set_urls.apply(urls).await?;
/// ```
#[derive(Clone)]
pub struct ActionLogger {
    sink: SharedSink,
}

impl ActionLogger {
    pub fn new(sink: SharedSink) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &SharedSink {
        &self.sink
    }

    pub fn wrap<M: StateMutator>(&self, tag: impl Into<OperationTag>, operation: M) -> Instrumented<M> {
        Instrumented::new(tag, operation, Arc::clone(&self.sink))
    }

    /// Flush the sink, logging rather than returning any failure.
    pub fn flush(&self) {
        if let Err(err) = self.sink.flush() {
            warn!(error = %err, "Failed to flush trace sink");
        }
    }
}

impl Default for ActionLogger {
    /// Logger writing grouped output to stderr.
    fn default() -> Self {
        Self::new(Arc::new(ConsoleSink::default()))
    }
}

/// One in-progress call. Emits its terminal record exactly once: through
/// `succeed`/`fail`, or as a cancellation when dropped unfinished.
struct Invocation {
    tag: OperationTag,
    sink: SharedSink,
    id: CorrelationId,
    started: Instant,
    finished: bool,
}

impl Invocation {
    fn begin<I: Serialize>(tag: OperationTag, sink: SharedSink, input: &I) -> Self {
        let started = Instant::now();
        let id = CorrelationId::new();
        deliver(&*sink, &TraceRecord::begin(tag.clone(), id, snapshot(input)));

        Self {
            tag,
            sink,
            id,
            started,
            finished: false,
        }
    }

    fn succeed<O: Serialize>(mut self, output: &O) {
        let record = TraceRecord::end(self.tag.clone(), self.id, snapshot(output), self.started.elapsed());
        self.finish(record);
    }

    fn fail<E: std::error::Error>(mut self, err: &E) {
        let record = TraceRecord::error(self.tag.clone(), self.id, error_payload(err), self.started.elapsed());
        self.finish(record);
    }

    fn finish(&mut self, record: TraceRecord) {
        self.finished = true;
        deliver(&*self.sink, &record);
    }
}

impl Drop for Invocation {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        let payload = if std::thread::panicking() {
            warn!(tag = %self.tag, call_id = %self.id.short(), "Action panicked");
            panicked_payload()
        } else {
            debug!(tag = %self.tag, call_id = %self.id.short(), "Action dropped before completion");
            cancelled_payload()
        };
        let record = TraceRecord::error(self.tag.clone(), self.id, payload, self.started.elapsed());
        self.finish(record);
    }
}

/// Hand a record to the sink. Sink failures are logged and dropped so they
/// can never change the outcome of the action.
fn deliver(sink: &dyn TraceSink, record: &TraceRecord) {
    if let Err(err) = sink.emit(record) {
        warn!(
            tag = %record.tag(),
            phase = %record.phase(),
            error = %err,
            "Dropping trace record"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SinkError;
    use crate::middleware::mutator::{from_fn, from_sync_fn};
    use crate::middleware::record::Phase;
    use crate::middleware::sink::MemorySink;
    use std::convert::Infallible;
    use std::time::Duration;

    struct FailingSink;

    impl TraceSink for FailingSink {
        fn emit(&self, _record: &TraceRecord) -> Result<(), SinkError> {
            Err(SinkError::Rejected("always".to_string()))
        }
    }

    #[tokio::test]
    async fn test_wrapped_call_returns_inner_result() {
        let sink = MemorySink::shared();
        let double = wrap("DOUBLE", from_sync_fn(|n: i64| Ok::<_, Infallible>(n * 2)), sink.clone());

        assert_eq!(double.apply(21).await.unwrap(), 42);
        assert_eq!(
            sink.sequence(),
            vec![("DOUBLE".to_string(), Phase::Begin), ("DOUBLE".to_string(), Phase::End)]
        );

        let records = sink.records();
        assert_eq!(records[0].payload(), &serde_json::json!(21));
        assert_eq!(records[1].payload(), &serde_json::json!(42));
        assert_eq!(records[0].call_id(), records[1].call_id());
        assert!(records[1].timestamp_or_duration() >= 0.0);
    }

    #[tokio::test]
    async fn test_empty_tag_still_runs() {
        let sink = MemorySink::shared();
        let op = wrap("", from_sync_fn(|s: String| Ok::<_, Infallible>(s)), sink.clone());

        assert_eq!(op.apply("x".to_string()).await.unwrap(), "x");
        assert!(sink.records().iter().all(|r| r.tag().is_empty()));
        assert_eq!(sink.len(), 2);
    }

    #[tokio::test]
    async fn test_failing_sink_does_not_change_outcome() {
        let ok = wrap("OK", from_sync_fn(|n: u8| Ok::<_, Infallible>(n)), Arc::new(FailingSink));
        assert_eq!(ok.apply(7).await.unwrap(), 7);

        let err = wrap(
            "ERR",
            from_sync_fn(|_: u8| -> Result<u8, std::fmt::Error> { Err(std::fmt::Error) }),
            Arc::new(FailingSink),
        );
        assert!(err.apply(7).await.is_err());
    }

    #[tokio::test]
    async fn test_dropped_call_emits_cancellation() {
        let sink = MemorySink::shared();
        let slow = wrap(
            "SLOW",
            from_fn(|_: ()| async move {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok::<_, Infallible>(())
            }),
            sink.clone(),
        );

        let timed_out = tokio::time::timeout(Duration::from_millis(10), slow.apply(())).await;
        assert!(timed_out.is_err());

        let records = sink.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].phase(), Phase::Error);
        assert!(records[1].is_cancellation());
    }

    #[tokio::test]
    async fn test_panicking_call_is_not_a_cancellation() {
        let sink = MemorySink::shared();
        let boom = wrap(
            "BOOM",
            from_sync_fn(|_: u8| -> Result<u8, Infallible> { panic!("boom") }),
            sink.clone(),
        );

        let joined = tokio::spawn(async move { boom.apply(1).await }).await;
        assert!(joined.unwrap_err().is_panic());

        let records = sink.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].phase(), Phase::Error);
        assert_eq!(records[1].payload()["kind"], "panicked");
        assert!(!records[1].is_cancellation());
        assert_eq!(records[0].call_id(), records[1].call_id());
    }

    #[tokio::test]
    async fn test_logger_wrap_uses_shared_sink() {
        let sink = MemorySink::shared();
        let logger = ActionLogger::new(sink.clone());
        let a = logger.wrap("A", from_sync_fn(|n: u8| Ok::<_, Infallible>(n)));
        let b = logger.wrap("B", from_sync_fn(|n: u8| Ok::<_, Infallible>(n)));

        a.apply(1).await.unwrap();
        b.apply(2).await.unwrap();
        logger.flush();

        assert_eq!(sink.records_for("A").len(), 2);
        assert_eq!(sink.records_for("B").len(), 2);
        assert_eq!(a.tag().as_str(), "A");
    }

    #[test]
    fn test_into_inner_unwraps() {
        let sink = MemorySink::shared();
        let op = wrap("X", from_sync_fn(|n: u8| Ok::<_, Infallible>(n)), sink);
        let _inner = op.into_inner();
    }
}
