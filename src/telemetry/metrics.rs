// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Metrics collection for wrapped actions.
//!
//! Provides lightweight metrics collection without external dependencies.
//! Fed by [`MetricsSink`](crate::middleware::MetricsSink) from the same trace
//! records every other sink sees.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

use once_cell::sync::Lazy;

/// Global metrics instance.
pub static GLOBAL_METRICS: Lazy<Arc<Metrics>> = Lazy::new(|| Arc::new(Metrics::new()));

/// How a wrapped invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Succeeded,
    Failed,
    Cancelled,
}

/// Central metrics collection.
#[derive(Debug)]
pub struct Metrics {
    /// Per-tag action metrics.
    actions: RwLock<HashMap<String, ActionMetrics>>,

    /// Invocations that emitted `begin` but no terminal record yet.
    in_flight: AtomicU64,

    /// Start time for calculating uptime.
    start_time: Instant,
}

impl Metrics {
    /// Create a new metrics collector.
    pub fn new() -> Self {
        Self {
            actions: RwLock::new(HashMap::new()),
            in_flight: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Note that an invocation has started.
    pub fn record_started(&self) {
        self.in_flight.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a finished invocation.
    pub fn record_action(&self, tag: &str, duration: Duration, outcome: Outcome) {
        let _ = self
            .in_flight
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1));

        let mut actions = self.actions.write().unwrap_or_else(PoisonError::into_inner);
        actions
            .entry(tag.to_string())
            .or_insert_with(ActionMetrics::new)
            .record(duration, outcome);
    }

    /// Get metrics for a specific action tag.
    pub fn action_metrics(&self, tag: &str) -> Option<ActionMetrics> {
        self.actions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(tag)
            .cloned()
    }

    /// Number of invocations currently running.
    pub fn in_flight(&self) -> u64 {
        self.in_flight.load(Ordering::Relaxed)
    }

    /// Get uptime since metrics were initialized.
    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Take a snapshot of all metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let actions = self.actions.read().unwrap_or_else(PoisonError::into_inner);

        MetricsSnapshot {
            actions: actions.clone(),
            in_flight: self.in_flight(),
            uptime: self.uptime(),
        }
    }

    /// Reset all metrics.
    pub fn reset(&self) {
        self.actions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.in_flight.store(0, Ordering::Relaxed);
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Metrics for one action tag.
#[derive(Debug, Clone)]
pub struct ActionMetrics {
    /// Total number of finished invocations.
    pub invocations: u64,

    /// Number of successful invocations.
    pub successes: u64,

    /// Number of invocations that returned an error.
    pub failures: u64,

    /// Number of invocations dropped before completion.
    pub cancellations: u64,

    /// Total time spent in this action.
    pub total_duration: Duration,

    /// Minimum execution time.
    pub min_duration: Duration,

    /// Maximum execution time.
    pub max_duration: Duration,

    /// Histogram buckets for latency distribution.
    pub histogram: Histogram,
}

impl ActionMetrics {
    /// Create new empty action metrics.
    pub fn new() -> Self {
        Self {
            invocations: 0,
            successes: 0,
            failures: 0,
            cancellations: 0,
            total_duration: Duration::ZERO,
            min_duration: Duration::MAX,
            max_duration: Duration::ZERO,
            histogram: Histogram::default(),
        }
    }

    /// Record one finished invocation.
    pub fn record(&mut self, duration: Duration, outcome: Outcome) {
        self.invocations += 1;
        match outcome {
            Outcome::Succeeded => self.successes += 1,
            Outcome::Failed => self.failures += 1,
            Outcome::Cancelled => self.cancellations += 1,
        }
        self.total_duration += duration;
        self.min_duration = self.min_duration.min(duration);
        self.max_duration = self.max_duration.max(duration);
        self.histogram.record(duration);
    }

    /// Calculate average execution time.
    pub fn avg_duration(&self) -> Duration {
        if self.invocations == 0 {
            Duration::ZERO
        } else {
            self.total_duration / self.invocations as u32
        }
    }

    /// Calculate success rate (0.0 to 1.0).
    pub fn success_rate(&self) -> f64 {
        if self.invocations == 0 {
            1.0
        } else {
            self.successes as f64 / self.invocations as f64
        }
    }
}

impl Default for ActionMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Simple histogram with fixed buckets for latency tracking.
#[derive(Debug, Clone)]
pub struct Histogram {
    /// Bucket boundaries in microseconds.
    buckets: Vec<u64>,

    /// Count per bucket, plus one overflow bucket.
    counts: Vec<u64>,
}

impl Histogram {
    /// Create a histogram with custom bucket boundaries (in microseconds).
    pub fn with_buckets(buckets: Vec<u64>) -> Self {
        let counts = vec![0; buckets.len() + 1];
        Self { buckets, counts }
    }

    /// Record a duration value.
    pub fn record(&mut self, duration: Duration) {
        let micros = duration.as_micros() as u64;
        let bucket_idx = self
            .buckets
            .iter()
            .position(|&b| micros <= b)
            .unwrap_or(self.buckets.len());
        self.counts[bucket_idx] += 1;
    }

    /// Get counts for each bucket.
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Get bucket boundaries.
    pub fn buckets(&self) -> &[u64] {
        &self.buckets
    }

    /// Approximate percentile as the upper boundary of the bucket holding it.
    pub fn percentile(&self, p: f64) -> Duration {
        let total: u64 = self.counts.iter().sum();
        if total == 0 {
            return Duration::ZERO;
        }

        let target = (total as f64 * p / 100.0).ceil() as u64;
        let mut cumulative = 0u64;

        for (i, &count) in self.counts.iter().enumerate() {
            cumulative += count;
            if cumulative >= target {
                let micros = match self.buckets.get(i) {
                    Some(&bound) => bound,
                    None => self.buckets.last().copied().unwrap_or(0) * 10,
                };
                return Duration::from_micros(micros);
            }
        }

        Duration::ZERO
    }

    pub fn p50(&self) -> Duration {
        self.percentile(50.0)
    }

    pub fn p99(&self) -> Duration {
        self.percentile(99.0)
    }
}

impl Default for Histogram {
    fn default() -> Self {
        // Actions are in-memory state updates, so the buckets start low:
        // 10us, 100us, 1ms, 10ms, 100ms, 1s
        Self::with_buckets(vec![10, 100, 1_000, 10_000, 100_000, 1_000_000])
    }
}

/// A snapshot of all metrics at a point in time.
#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    /// Action metrics by tag.
    pub actions: HashMap<String, ActionMetrics>,

    /// Invocations running when the snapshot was taken.
    pub in_flight: u64,

    /// Uptime when snapshot was taken.
    pub uptime: Duration,
}

impl MetricsSnapshot {
    /// Format as a human-readable report, actions sorted by tag.
    pub fn format_report(&self) -> String {
        let mut report = String::new();

        report.push_str("=== Action Metrics ===\n\n");
        report.push_str(&format!("Uptime: {:.2?}\n", self.uptime));
        report.push_str(&format!("In flight: {}\n", self.in_flight));

        if self.actions.is_empty() {
            report.push_str("\nNo actions recorded yet.\n");
            return report;
        }

        report.push('\n');
        let mut tags: Vec<&String> = self.actions.keys().collect();
        tags.sort();
        for tag in tags {
            let metrics = &self.actions[tag];
            report.push_str(&format!(
                "  {}: {} calls, {:.1}% success, {} failed, {} cancelled, avg {:.2?}, p99 {:.2?}\n",
                tag,
                metrics.invocations,
                metrics.success_rate() * 100.0,
                metrics.failures,
                metrics.cancellations,
                metrics.avg_duration(),
                metrics.histogram.p99()
            ));
        }

        report
    }
}
