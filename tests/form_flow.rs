// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! End-to-end tests: configuration, form actions and their console trace.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use tempfile::TempDir;

use snip::app::App;
use snip::config::{load_config, CliOptions, SinkKind};
use snip::form::{UrlField, SET_ERROR, SET_URLS, SHORTEN_URL};
use snip::middleware::{ConsoleSink, FanoutSink, MemorySink, Phase};
use snip::FormError;

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn workspace(config: &str) -> TempDir {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join(".snip.json"), config).unwrap();
    temp
}

#[tokio::test]
async fn test_configured_form_flow() {
    let temp = workspace(r#"{"maxUrls": 2, "baseUrl": "https://s.example/", "sink": "none"}"#);
    let config = load_config(temp.path(), CliOptions::default()).unwrap();
    assert_eq!(config.sink, SinkKind::None);

    let memory = MemorySink::shared();
    let app = App::with_sink(config, memory.clone());
    let form = app.form();

    let first = form.add_url().await.unwrap();
    form.update_field(first, UrlField::LongUrl, "https://example.com/articles/2024/rust")
        .await
        .unwrap();
    form.update_field(first, UrlField::ValidityPeriod, "90").await.unwrap();

    let entry = form.shorten(first).await.unwrap();
    let short = entry.shortened.clone().unwrap();
    assert!(short.starts_with("https://s.example/"));
    assert_eq!(short.len(), "https://s.example/".len() + 6);
    assert_ne!(entry.expiry_date.as_deref(), Some("Never"));

    form.add_url().await.unwrap();
    assert_eq!(form.add_url().await, Err(FormError::LimitReached(2)));

    let state = form.snapshot().await;
    assert_eq!(state.urls.len(), 2);
    assert_eq!(state.urls[0], entry);
    assert_eq!(state.error, "Maximum 2 URLs allowed");

    let tags: Vec<String> = memory.sequence().into_iter().map(|(tag, _)| tag).collect();
    assert!(tags.contains(&SET_URLS.to_string()));
    assert!(tags.contains(&SET_ERROR.to_string()));
    assert!(tags.contains(&SHORTEN_URL.to_string()));

    let begins = memory.records().iter().filter(|r| r.phase() == Phase::Begin).count();
    assert_eq!(begins * 2, memory.len());
}

#[tokio::test]
async fn test_editing_clears_previous_result() {
    let temp = workspace(r#"{"sink": "none"}"#);
    let config = load_config(temp.path(), CliOptions::default()).unwrap();
    let app = App::with_sink(config, MemorySink::shared());
    let form = app.form();

    form.add_url().await.unwrap();
    form.update_field(0, UrlField::LongUrl, "https://example.com").await.unwrap();
    form.update_field(0, UrlField::Shortcode, "home").await.unwrap();
    assert!(form.shorten(0).await.unwrap().is_shortened());

    form.update_field(0, UrlField::Shortcode, "home!").await.unwrap();
    assert!(!form.snapshot().await.urls[0].is_shortened());
    assert_eq!(form.shorten(0).await, Err(FormError::InvalidShortcode));
}

#[tokio::test]
async fn test_console_trace_output() {
    let temp = workspace("{}");
    let config = load_config(temp.path(), CliOptions::default()).unwrap();

    let buffer = SharedBuffer::default();
    let console = ConsoleSink::with_writer(buffer.clone()).with_colors(false);
    let memory = MemorySink::shared();
    let sink = FanoutSink::new().with(Arc::new(console)).with(memory.clone());
    let app = App::with_sink(config, Arc::new(sink));

    app.form().add_url().await.unwrap();
    app.form()
        .update_field(0, UrlField::LongUrl, "http://a")
        .await
        .unwrap();
    app.form()
        .update_field(0, UrlField::ValidityPeriod, "-1")
        .await
        .unwrap();
    assert_eq!(app.form().shorten(0).await, Err(FormError::InvalidPeriod));
    app.shutdown();

    let output = buffer.contents();
    assert!(output.contains("▼ Action: SET_URLS"));
    assert!(output.contains("Previous State: [{\"longUrl\":\"http://a\"}]"));
    assert!(output.contains("Next State: "));
    assert!(output.contains("▼ Action: SHORTEN_URL"));
    assert!(output.contains("Error: {"));
    assert!(output.contains("Duration: "));
    assert!(output.contains("▲ SHORTEN_URL"));

    let shorten = memory.records_for(SHORTEN_URL);
    assert_eq!(shorten.len(), 2);
    assert_eq!(shorten[1].phase(), Phase::Error);
}
