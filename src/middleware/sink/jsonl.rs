// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! JSON Lines audit trail.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::SinkError;
use crate::middleware::record::TraceRecord;

use super::TraceSink;

/// Appends one JSON object per record to a file.
///
/// Every record is written and flushed under the sink's lock, so a line is
/// either present in full or absent.
pub struct JsonLinesSink {
    path: PathBuf,
    writer: Mutex<BufWriter<File>>,
}

impl JsonLinesSink {
    /// Open (or create) `path` for appending, creating parent directories.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SinkError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        Ok(Self {
            path,
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every record back from a JSON Lines file.
    pub fn read_all(path: impl AsRef<Path>) -> Result<Vec<TraceRecord>, SinkError> {
        let content = fs::read_to_string(path)?;
        content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).map_err(SinkError::from))
            .collect()
    }
}

impl TraceSink for JsonLinesSink {
    fn emit(&self, record: &TraceRecord) -> Result<(), SinkError> {
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');

        let mut writer = self.writer.lock().map_err(SinkError::poisoned)?;
        writer.write_all(&line)?;
        writer.flush()?;
        Ok(())
    }

    fn flush(&self) -> Result<(), SinkError> {
        self.writer.lock().map_err(SinkError::poisoned)?.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::record::Phase;
    use crate::telemetry::CorrelationId;
    use serde_json::json;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn test_jsonl_appends_and_reads_back() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("audit").join("trace.jsonl");
        let sink = JsonLinesSink::open(&path).unwrap();
        let id = CorrelationId::new();

        sink.emit(&TraceRecord::begin("SET_ERROR".into(), id, json!(["oops"])))
            .unwrap();
        sink.emit(&TraceRecord::end(
            "SET_ERROR".into(),
            id,
            json!("oops"),
            Duration::from_micros(40),
        ))
        .unwrap();

        let records = JsonLinesSink::read_all(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].phase(), Phase::Begin);
        assert_eq!(records[1].phase(), Phase::End);
        assert_eq!(records[1].call_id(), id);
        assert_eq!(records[1].payload(), &json!("oops"));
    }

    #[test]
    fn test_jsonl_reopen_appends() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("trace.jsonl");
        let id = CorrelationId::new();

        for _ in 0..2 {
            let sink = JsonLinesSink::open(&path).unwrap();
            sink.emit(&TraceRecord::begin("A".into(), id, json!(null)))
                .unwrap();
        }

        assert_eq!(JsonLinesSink::read_all(&path).unwrap().len(), 2);
    }
}
