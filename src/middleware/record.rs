// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Trace records emitted around each wrapped action.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::telemetry::CorrelationId;

/// Phase of a single invocation that a record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Emitted before the underlying action runs; payload is the input.
    Begin,
    /// Emitted after a successful run; payload is the result.
    End,
    /// Emitted after a failed, cancelled or panicked run; payload describes the error.
    Error,
}

impl Phase {
    /// Whether this phase closes an invocation.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Begin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Begin => "begin",
            Self::End => "end",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name of a logical action kind, such as `SET_URLS`.
///
/// Fixed when an action is wrapped and cheap to clone into every record.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OperationTag(Arc<str>);

impl OperationTag {
    pub fn new(tag: impl AsRef<str>) -> Self {
        Self(Arc::from(tag.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for OperationTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for OperationTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OperationTag({:?})", &*self.0)
    }
}

impl From<&str> for OperationTag {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

impl From<String> for OperationTag {
    fn from(tag: String) -> Self {
        Self(Arc::from(tag))
    }
}

impl Serialize for OperationTag {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for OperationTag {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        String::deserialize(deserializer).map(Self::from)
    }
}

/// One structured observation of one phase of one invocation.
///
/// Records are built by the middleware and never change afterwards; sinks
/// only get shared references to them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceRecord {
    tag: OperationTag,
    phase: Phase,
    payload: Value,
    /// Milliseconds since the Unix epoch for `begin`, elapsed milliseconds
    /// since the matching `begin` otherwise.
    timestamp_or_duration: f64,
    call_id: CorrelationId,
    at: DateTime<Utc>,
}

impl TraceRecord {
    /// Build the opening record of an invocation, stamped with the current time.
    pub fn begin(tag: OperationTag, call_id: CorrelationId, payload: Value) -> Self {
        let at = Utc::now();
        Self {
            tag,
            phase: Phase::Begin,
            payload,
            timestamp_or_duration: at.timestamp_micros() as f64 / 1000.0,
            call_id,
            at,
        }
    }

    /// Build the closing record of a successful invocation.
    pub fn end(tag: OperationTag, call_id: CorrelationId, payload: Value, elapsed: Duration) -> Self {
        Self::terminal(tag, Phase::End, call_id, payload, elapsed)
    }

    /// Build the closing record of a failed or cancelled invocation.
    pub fn error(tag: OperationTag, call_id: CorrelationId, payload: Value, elapsed: Duration) -> Self {
        Self::terminal(tag, Phase::Error, call_id, payload, elapsed)
    }

    fn terminal(
        tag: OperationTag,
        phase: Phase,
        call_id: CorrelationId,
        payload: Value,
        elapsed: Duration,
    ) -> Self {
        Self {
            tag,
            phase,
            payload,
            timestamp_or_duration: elapsed.as_secs_f64() * 1000.0,
            call_id,
            at: Utc::now(),
        }
    }

    pub fn tag(&self) -> &OperationTag {
        &self.tag
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }

    pub fn timestamp_or_duration(&self) -> f64 {
        self.timestamp_or_duration
    }

    /// Elapsed time of the invocation; `None` for `begin` records.
    pub fn duration(&self) -> Option<Duration> {
        if self.phase.is_terminal() {
            Some(Duration::from_secs_f64(self.timestamp_or_duration.max(0.0) / 1000.0))
        } else {
            None
        }
    }

    pub fn call_id(&self) -> CorrelationId {
        self.call_id
    }

    /// Wall-clock time the record was built.
    pub fn at(&self) -> DateTime<Utc> {
        self.at
    }

    /// Whether this record closes a call whose future was dropped early.
    pub fn is_cancellation(&self) -> bool {
        self.phase == Phase::Error && self.payload.get("kind").and_then(Value::as_str) == Some(CANCELLED)
    }
}

const CANCELLED: &str = "cancelled";

/// Snapshot a value into a JSON payload.
///
/// A value that cannot be serialized is replaced by a placeholder string so
/// that tracing never gets in the way of the action itself.
pub fn snapshot<T: Serialize + ?Sized>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or_else(|err| {
        tracing::debug!(error = %err, "Trace payload is not serializable");
        Value::String(format!("<unserializable: {err}>"))
    })
}

/// Describe an error returned by a wrapped action.
pub fn error_payload<E: std::error::Error + ?Sized>(err: &E) -> Value {
    let mut causes = Vec::new();
    let mut source = err.source();
    while let Some(cause) = source {
        causes.push(cause.to_string());
        source = cause.source();
    }

    json!({
        "kind": "failed",
        "error": format!("{err:?}"),
        "message": err.to_string(),
        "causes": causes,
    })
}

/// Payload for a call whose future was dropped before it finished.
pub fn cancelled_payload() -> Value {
    json!({
        "kind": CANCELLED,
        "message": "action was dropped before it completed",
    })
}

/// Payload for a call whose mutator panicked.
pub fn panicked_payload() -> Value {
    json!({
        "kind": "panicked",
        "message": "action panicked before it completed",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_phase_terminal() {
        assert!(!Phase::Begin.is_terminal());
        assert!(Phase::End.is_terminal());
        assert!(Phase::Error.is_terminal());
    }

    #[test]
    fn test_tag_from_str_and_display() {
        let tag = OperationTag::from("SET_URLS");
        assert_eq!(tag.as_str(), "SET_URLS");
        assert_eq!(tag.to_string(), "SET_URLS");
        assert!(!tag.is_empty());
        assert!(OperationTag::from("").is_empty());
    }

    #[test]
    fn test_begin_record_carries_timestamp() {
        let before = Utc::now().timestamp_millis() as f64;
        let record = TraceRecord::begin("SET_URLS".into(), CorrelationId::new(), json!([1]));
        assert_eq!(record.phase(), Phase::Begin);
        assert!(record.timestamp_or_duration() >= before);
        assert!(record.duration().is_none());
    }

    #[test]
    fn test_terminal_record_carries_duration() {
        let record = TraceRecord::end(
            "SET_URLS".into(),
            CorrelationId::new(),
            json!(null),
            Duration::from_millis(12),
        );
        assert!((record.timestamp_or_duration() - 12.0).abs() < 1e-6);
        let duration = record.duration().unwrap();
        assert!((duration.as_secs_f64() - 0.012).abs() < 1e-6);
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let record = TraceRecord::error(
            "SET_ERROR".into(),
            CorrelationId::new(),
            json!({"kind": "failed"}),
            Duration::ZERO,
        );
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["tag"], "SET_ERROR");
        assert_eq!(value["phase"], "error");
        assert!(value.get("timestampOrDuration").is_some());
        assert!(value.get("callId").is_some());
    }

    #[test]
    fn test_unserializable_payload_is_replaced() {
        let mut map = HashMap::new();
        map.insert((1, 2), "tuple keys are not valid JSON object keys");
        let payload = snapshot(&map);
        assert!(payload.as_str().unwrap().starts_with("<unserializable"));
    }

    #[test]
    fn test_error_payload_describes_error() {
        let err = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let payload = error_payload(&err);
        assert_eq!(payload["kind"], "failed");
        assert_eq!(payload["message"], "disk full");
    }

    #[test]
    fn test_error_payload_names_form_error_variant() {
        let payload = error_payload(&crate::error::FormError::NoSuchEntry(3));
        assert_eq!(payload["error"], "NoSuchEntry(3)");
        assert_eq!(payload["message"], "No URL entry at index 3");
    }

    #[test]
    fn test_cancellation_detection() {
        let record = TraceRecord::error(
            "SHORTEN_URL".into(),
            CorrelationId::new(),
            cancelled_payload(),
            Duration::ZERO,
        );
        assert!(record.is_cancellation());

        let failed = TraceRecord::error(
            "SHORTEN_URL".into(),
            CorrelationId::new(),
            json!({"kind": "failed"}),
            Duration::ZERO,
        );
        assert!(!failed.is_cancellation());

        let panicked = TraceRecord::error(
            "SHORTEN_URL".into(),
            CorrelationId::new(),
            panicked_payload(),
            Duration::ZERO,
        );
        assert!(!panicked.is_cancellation());
    }
}
