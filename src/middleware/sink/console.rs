// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Human-readable grouped console output.

use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::Mutex;

use colored::{Color, Colorize};

use crate::error::SinkError;
use crate::middleware::record::{Phase, TraceRecord};
use crate::telemetry::CorrelationId;

use super::TraceSink;

const TITLE: Color = Color::TrueColor { r: 0x4C, g: 0xAF, b: 0x50 };
const PREVIOUS: Color = Color::TrueColor { r: 0x9E, g: 0x9E, b: 0x9E };
const NEXT: Color = Color::TrueColor { r: 0x4C, g: 0xAF, b: 0x50 };
const DURATION: Color = Color::TrueColor { r: 0x03, g: 0xA9, b: 0xF4 };
const ERROR: Color = Color::TrueColor { r: 0xF2, g: 0x04, b: 0x04 };

const INDENT: &str = "  ";

struct ConsoleState {
    out: Box<dyn Write + Send>,
    /// Open groups and the depth each one was opened at.
    open: HashMap<CorrelationId, usize>,
}

/// Writes each invocation as an indented group:
///
/// ```text
/// ▼ Action: SET_URLS
///   Previous State: [{"longUrl":"http://a"}]
///   Next State: [{"longUrl":"http://a"}]
///   Duration: 0.02ms
/// ▲ SET_URLS
/// ```
///
/// A group opens one level deeper for every group still open, so nested
/// invocations sit inside the enclosing one. A call's closing lines always
/// line up with its own opening lines, matched by call id. Calls that merely
/// overlap in time from separate tasks are indented the same way as nested
/// ones.
pub struct ConsoleSink {
    state: Mutex<ConsoleState>,
    colors: bool,
}

impl ConsoleSink {
    pub fn stdout() -> Self {
        Self::with_writer(io::stdout())
    }

    pub fn stderr() -> Self {
        Self::with_writer(io::stderr())
    }

    pub fn with_writer(out: impl Write + Send + 'static) -> Self {
        Self {
            state: Mutex::new(ConsoleState {
                out: Box::new(out),
                open: HashMap::new(),
            }),
            colors: true,
        }
    }

    /// Enable or disable ANSI colors.
    pub fn with_colors(mut self, colors: bool) -> Self {
        self.colors = colors;
        self
    }

    fn paint(&self, text: &str, color: Color, bold: bool) -> String {
        if !self.colors {
            return text.to_string();
        }
        let painted = text.color(color);
        if bold {
            painted.bold().to_string()
        } else {
            painted.to_string()
        }
    }

    fn render(&self, record: &TraceRecord, depth: usize) -> String {
        let pad = INDENT.repeat(depth);
        let payload = record.payload().to_string();

        match record.phase() {
            Phase::Begin => format!(
                "{pad}▼ {}\n{pad}{INDENT}{} {payload}\n",
                self.paint(&format!("Action: {}", record.tag()), TITLE, true),
                self.paint("Previous State:", PREVIOUS, true),
            ),
            Phase::End | Phase::Error => {
                let label = if record.phase() == Phase::End {
                    self.paint("Next State:", NEXT, true)
                } else {
                    self.paint("Error:", ERROR, true)
                };
                let duration = format!("Duration: {:.2}ms", record.timestamp_or_duration());
                format!(
                    "{pad}{INDENT}{label} {payload}\n{pad}{INDENT}{}\n{pad}▲ {}\n",
                    self.paint(&duration, DURATION, false),
                    record.tag(),
                )
            }
        }
    }
}

impl TraceSink for ConsoleSink {
    fn emit(&self, record: &TraceRecord) -> Result<(), SinkError> {
        let mut state = self.state.lock().map_err(SinkError::poisoned)?;

        let depth = match record.phase() {
            Phase::Begin => {
                let depth = state.open.len();
                state.open.insert(record.call_id(), depth);
                depth
            }
            Phase::End | Phase::Error => match state.open.remove(&record.call_id()) {
                Some(depth) => depth,
                None => state.open.len(),
            },
        };

        let text = self.render(record, depth);
        state.out.write_all(text.as_bytes())?;
        Ok(())
    }

    fn flush(&self) -> Result<(), SinkError> {
        let mut state = self.state.lock().map_err(SinkError::poisoned)?;
        state.out.flush()?;
        Ok(())
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::stderr()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::CorrelationId;
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Buffer {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    #[test]
    fn test_console_group_for_successful_call() {
        let buffer = Buffer::default();
        let sink = ConsoleSink::with_writer(buffer.clone()).with_colors(false);
        let id = CorrelationId::new();

        sink.emit(&TraceRecord::begin(
            "SET_URLS".into(),
            id,
            json!([{"longUrl": "http://a"}]),
        ))
        .unwrap();
        sink.emit(&TraceRecord::end(
            "SET_URLS".into(),
            id,
            json!([{"longUrl": "http://a"}]),
            Duration::from_millis(2),
        ))
        .unwrap();

        let text = buffer.text();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "▼ Action: SET_URLS");
        assert_eq!(lines[1], r#"  Previous State: [{"longUrl":"http://a"}]"#);
        assert_eq!(lines[2], r#"  Next State: [{"longUrl":"http://a"}]"#);
        assert_eq!(lines[3], "  Duration: 2.00ms");
        assert_eq!(lines[4], "▲ SET_URLS");
    }

    #[test]
    fn test_console_error_and_nesting() {
        let buffer = Buffer::default();
        let sink = ConsoleSink::with_writer(buffer.clone()).with_colors(false);
        let outer = CorrelationId::new();
        let inner = CorrelationId::new();

        sink.emit(&TraceRecord::begin("OUTER".into(), outer, json!(1)))
            .unwrap();
        sink.emit(&TraceRecord::begin("INNER".into(), inner, json!(1)))
            .unwrap();
        sink.emit(&TraceRecord::error(
            "INNER".into(),
            inner,
            json!({"message": "bad"}),
            Duration::ZERO,
        ))
        .unwrap();
        sink.emit(&TraceRecord::error(
            "OUTER".into(),
            outer,
            json!({"message": "bad"}),
            Duration::ZERO,
        ))
        .unwrap();

        let text = buffer.text();
        assert!(text.contains("  ▼ Action: INNER"));
        assert!(text.contains(r#"    Error: {"message":"bad"}"#));
        assert!(text.contains("  ▲ INNER"));
        assert!(text.ends_with("▲ OUTER\n"));
    }

    #[test]
    fn test_overlapping_calls_close_at_their_own_depth() {
        let buffer = Buffer::default();
        let sink = ConsoleSink::with_writer(buffer.clone()).with_colors(false);
        let a = CorrelationId::new();
        let b = CorrelationId::new();

        sink.emit(&TraceRecord::begin("A".into(), a, json!(1))).unwrap();
        sink.emit(&TraceRecord::begin("B".into(), b, json!(2))).unwrap();
        sink.emit(&TraceRecord::end("A".into(), a, json!(1), Duration::ZERO))
            .unwrap();
        sink.emit(&TraceRecord::end("B".into(), b, json!(2), Duration::ZERO))
            .unwrap();

        let text = buffer.text();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "▼ Action: A");
        assert_eq!(lines[2], "  ▼ Action: B");
        assert_eq!(lines[4], "  Next State: 1");
        assert_eq!(lines[6], "▲ A");
        assert_eq!(lines[7], "    Next State: 2");
        assert_eq!(lines[9], "  ▲ B");

        // Both groups are closed, so the next call starts at the left margin.
        let c = CorrelationId::new();
        sink.emit(&TraceRecord::begin("C".into(), c, json!(3))).unwrap();
        assert!(buffer.text().ends_with("\n▼ Action: C\n  Previous State: 3\n"));
    }
}
