//! Response envelopes and their JSONL writer.
//!
//! Every request produces exactly one envelope: a success carrying the
//! member's result tagged with its declared type, or an error carrying the
//! failure description.

use std::io::Write;

use serde::Serialize;
use stagehand_graph::{Value, ValueKind};

use super::errors::DispatchError;

/// Outcome of a dispatched command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusCode {
    /// The member ran and returned.
    Success,
    /// Resolution, marshaling, or invocation failed.
    Error,
}

/// Status block of an envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Status {
    /// Outcome code.
    pub code: StatusCode,
    /// Error description; empty on success.
    pub message: String,
}

/// A result value tagged with the member's declared type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypedValue {
    /// Declared return or property type name.
    #[serde(rename = "type")]
    pub type_name: String,
    /// Plain JSON rendering of the value.
    pub value: serde_json::Value,
}

/// Response returned for every request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseEnvelope {
    /// Outcome and message.
    pub status: Status,
    /// Result value; absent on error and for `void` members.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<TypedValue>,
}

impl ResponseEnvelope {
    /// Builds a success envelope for `value` declared as `kind`.
    ///
    /// The payload carries the declared type rather than the runtime shape
    /// of `value`. A null string result is sent as an empty string.
    #[must_use]
    pub fn ok(kind: ValueKind, value: &Value) -> Self {
        let payload = match (kind, value) {
            (ValueKind::Void, _) => None,
            (ValueKind::String, Value::Null) => Some(TypedValue {
                type_name: kind.type_name().to_owned(),
                value: serde_json::Value::String(String::new()),
            }),
            _ => Some(TypedValue {
                type_name: kind.type_name().to_owned(),
                value: value.to_json(),
            }),
        };
        Self {
            status: Status {
                code: StatusCode::Success,
                message: String::new(),
            },
            payload,
        }
    }

    /// Builds an error envelope from `error`.
    #[must_use]
    pub fn fail(error: &DispatchError) -> Self {
        let message = error.to_string();
        Self {
            status: Status {
                code: StatusCode::Error,
                message: if message.is_empty() {
                    String::from("command failed")
                } else {
                    message
                },
            },
            payload: None,
        }
    }

    /// Reports whether the envelope describes a success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.code == StatusCode::Success
    }
}

/// Writer that serializes envelopes to a stream.
pub struct ResponseWriter<W> {
    writer: W,
}

impl<W: Write> ResponseWriter<W> {
    /// Creates a new response writer wrapping the given output stream.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Writes an envelope as a JSONL line and flushes the stream.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_envelope(&mut self, envelope: &ResponseEnvelope) -> Result<(), DispatchError> {
        serde_json::to_writer(&mut self.writer, envelope)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}
