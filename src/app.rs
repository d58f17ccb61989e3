// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Application assembly: turns a resolved configuration into a trace sink,
//! an action logger and a ready-to-use form.

use std::sync::Arc;

use tracing::debug;

use crate::config::{ResolvedConfig, SinkKind};
use crate::error::SinkError;
use crate::form::{FormOptions, UrlForm};
use crate::middleware::{
    ActionLogger, ConsoleSink, FanoutSink, JsonLinesSink, MetricsSink, NullSink, SharedSink,
    TracingSink,
};
use crate::telemetry::{Metrics, GLOBAL_METRICS};

/// Build the sink selected by `config`, adding a metrics sink when
/// `metrics` is given.
pub fn build_sink(
    config: &ResolvedConfig,
    metrics: Option<Arc<Metrics>>,
) -> Result<SharedSink, SinkError> {
    let primary: Option<SharedSink> = match config.sink {
        SinkKind::Console => Some(Arc::new(ConsoleSink::stderr().with_colors(config.colors))),
        SinkKind::Tracing => Some(Arc::new(TracingSink)),
        SinkKind::Json => Some(Arc::new(JsonLinesSink::open(&config.trace_file)?)),
        SinkKind::None => None,
    };
    let metrics: Option<SharedSink> =
        metrics.map(|m| Arc::new(MetricsSink::new(m)) as SharedSink);

    let sink: SharedSink = match (primary, metrics) {
        (Some(primary), Some(metrics)) => {
            Arc::new(FanoutSink::new().with(primary).with(metrics))
        }
        (Some(only), None) | (None, Some(only)) => only,
        (None, None) => Arc::new(NullSink),
    };
    Ok(sink)
}

/// A configured snip instance.
pub struct App {
    config: ResolvedConfig,
    logger: ActionLogger,
    form: UrlForm,
    metrics: Option<Arc<Metrics>>,
}

impl App {
    /// Build an app that records metrics into the process-wide registry.
    pub fn new(config: ResolvedConfig) -> Result<Self, SinkError> {
        let metrics = config.metrics.then(|| Arc::clone(&*GLOBAL_METRICS));
        Self::build(config, metrics)
    }

    /// Build an app with its own metrics registry.
    pub fn with_metrics(config: ResolvedConfig, metrics: Arc<Metrics>) -> Result<Self, SinkError> {
        let metrics = config.metrics.then_some(metrics);
        Self::build(config, metrics)
    }

    /// Build an app around an existing sink. Metrics are not collected.
    pub fn with_sink(config: ResolvedConfig, sink: SharedSink) -> Self {
        let logger = ActionLogger::new(sink);
        let form = UrlForm::new(&logger, form_options(&config));
        Self {
            config,
            logger,
            form,
            metrics: None,
        }
    }

    fn build(config: ResolvedConfig, metrics: Option<Arc<Metrics>>) -> Result<Self, SinkError> {
        let sink = build_sink(&config, metrics.clone())?;
        debug!(sink = %config.sink, metrics = metrics.is_some(), "Building form");

        let mut app = Self::with_sink(config, sink);
        app.metrics = metrics;
        Ok(app)
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    pub fn logger(&self) -> &ActionLogger {
        &self.logger
    }

    pub fn form(&self) -> &UrlForm {
        &self.form
    }

    pub fn metrics(&self) -> Option<&Arc<Metrics>> {
        self.metrics.as_ref()
    }

    /// The metrics report, or `None` when metrics are disabled.
    pub fn metrics_report(&self) -> Option<String> {
        self.metrics
            .as_ref()
            .map(|metrics| metrics.snapshot().format_report())
    }

    /// Flush buffered trace output.
    pub fn shutdown(&self) {
        self.logger.flush();
    }
}

fn form_options(config: &ResolvedConfig) -> FormOptions {
    FormOptions {
        max_urls: config.max_urls,
        base_url: config.base_url.clone(),
    }
}
