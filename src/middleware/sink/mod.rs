// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Trace sinks: destinations for [`TraceRecord`]s.
//!
//! A sink receives records in emission order and appends them somewhere.
//! Each `emit` call writes one whole record; sinks guard their own state so
//! records from concurrent calls never tear, though they may interleave.

mod console;
mod jsonl;

pub use console::ConsoleSink;
pub use jsonl::JsonLinesSink;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::SinkError;
use crate::telemetry::metrics::{Metrics, Outcome};

use super::record::{Phase, TraceRecord};

/// Destination for trace records.
pub trait TraceSink: Send + Sync {
    /// Append one record.
    fn emit(&self, record: &TraceRecord) -> Result<(), SinkError>;

    /// Flush any buffered records.
    fn flush(&self) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Sink handle shared between every wrapped action of an application.
pub type SharedSink = Arc<dyn TraceSink>;

/// Captures records in memory, mostly for tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<TraceRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sink already wrapped for sharing.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Copy of all records captured so far, in emission order.
    pub fn records(&self) -> Vec<TraceRecord> {
        match self.records.lock() {
            Ok(records) => records.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Records belonging to one tag.
    pub fn records_for(&self, tag: &str) -> Vec<TraceRecord> {
        self.records()
            .into_iter()
            .filter(|r| r.tag().as_str() == tag)
            .collect()
    }

    /// `(tag, phase)` pairs, handy for asserting on ordering.
    pub fn sequence(&self) -> Vec<(String, Phase)> {
        self.records()
            .iter()
            .map(|r| (r.tag().to_string(), r.phase()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        if let Ok(mut records) = self.records.lock() {
            records.clear();
        }
    }
}

impl TraceSink for MemorySink {
    fn emit(&self, record: &TraceRecord) -> Result<(), SinkError> {
        self.records
            .lock()
            .map_err(SinkError::poisoned)?
            .push(record.clone());
        Ok(())
    }
}

/// Discards every record.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl TraceSink for NullSink {
    fn emit(&self, _record: &TraceRecord) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Forwards records to the `tracing` subscriber as structured events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl TraceSink for TracingSink {
    fn emit(&self, record: &TraceRecord) -> Result<(), SinkError> {
        let tag = record.tag().as_str();
        let call_id = record.call_id().short();
        let payload = record.payload().to_string();

        match record.phase() {
            Phase::Begin => debug!(
                target: "snip::actions",
                tag,
                call_id = %call_id,
                input = %payload,
                "Action started"
            ),
            Phase::End => debug!(
                target: "snip::actions",
                tag,
                call_id = %call_id,
                output = %payload,
                duration_ms = record.timestamp_or_duration(),
                "Action finished"
            ),
            Phase::Error => warn!(
                target: "snip::actions",
                tag,
                call_id = %call_id,
                error = %payload,
                duration_ms = record.timestamp_or_duration(),
                "Action failed"
            ),
        }
        Ok(())
    }
}

/// Aggregates per-tag latency and outcome counts into a [`Metrics`] registry.
#[derive(Debug, Clone)]
pub struct MetricsSink {
    metrics: Arc<Metrics>,
}

impl MetricsSink {
    pub fn new(metrics: Arc<Metrics>) -> Self {
        Self { metrics }
    }

    /// Sink that records into the process-wide registry.
    pub fn global() -> Self {
        Self::new(Arc::clone(&*crate::telemetry::GLOBAL_METRICS))
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }
}

impl TraceSink for MetricsSink {
    fn emit(&self, record: &TraceRecord) -> Result<(), SinkError> {
        let outcome = match record.phase() {
            Phase::Begin => {
                self.metrics.record_started();
                return Ok(());
            }
            Phase::End => Outcome::Succeeded,
            Phase::Error if record.is_cancellation() => Outcome::Cancelled,
            Phase::Error => Outcome::Failed,
        };
        let duration = record.duration().unwrap_or(Duration::ZERO);
        self.metrics
            .record_action(record.tag().as_str(), duration, outcome);
        Ok(())
    }
}

/// Delivers each record to several sinks in order.
///
/// A failing sink does not stop delivery to the ones after it; the first
/// failure is reported once every sink has seen the record.
#[derive(Default, Clone)]
pub struct FanoutSink {
    sinks: Vec<SharedSink>,
}

impl FanoutSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: SharedSink) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn push(&mut self, sink: SharedSink) {
        self.sinks.push(sink);
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl TraceSink for FanoutSink {
    fn emit(&self, record: &TraceRecord) -> Result<(), SinkError> {
        let mut first_error = None;
        for sink in &self.sinks {
            if let Err(err) = sink.emit(record) {
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    fn flush(&self) -> Result<(), SinkError> {
        let mut first_error = None;
        for sink in &self.sinks {
            if let Err(err) = sink.flush() {
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}
