//! Request deserialization for the dispatch loop.
//!
//! A request line is an inbound envelope whose `payload` field holds the
//! command description as a JSON string:
//!
//! ```json
//! {"payload":"{\"type\":\"Stagehand.AssetDatabase\",\"method\":\"AssetExists\",\"isMethod\":true,\"parameters\":[\"a.prefab\"]}"}
//! ```

use serde::Deserialize;

use super::errors::DispatchError;

/// Envelope received from the transport.
#[derive(Debug, Deserialize)]
pub struct InboundCommand {
    /// JSON-encoded [`CommandDescription`].
    pub payload: String,
}

impl InboundCommand {
    /// Parses a JSONL line into an inbound envelope.
    ///
    /// Trailing whitespace (including the newline delimiter) is trimmed
    /// before parsing.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::MalformedJsonl` if the line is empty or is not
    /// a JSON object with a string `payload`.
    pub fn parse(line: &[u8]) -> Result<Self, DispatchError> {
        let trimmed = line.trim_ascii_end();
        if trimmed.is_empty() {
            return Err(DispatchError::malformed("empty request line"));
        }
        serde_json::from_slice(trimmed).map_err(DispatchError::from_json_error)
    }

    /// Decodes the payload into a command description.
    ///
    /// # Errors
    ///
    /// As [`CommandDescription::from_payload`].
    pub fn command(&self) -> Result<CommandDescription, DispatchError> {
        CommandDescription::from_payload(&self.payload)
    }
}

/// A command naming a capability member and its textual arguments.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandDescription {
    /// Member name, matched ignoring case.
    pub method: String,
    /// Capability name.
    #[serde(rename = "type")]
    pub capability: String,
    /// Whether `method` names a method rather than a property.
    #[serde(default)]
    pub is_method: bool,
    /// Arguments in declaration order.
    #[serde(default)]
    pub parameters: Vec<String>,
}

impl CommandDescription {
    /// Decodes and validates a command description.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::MalformedJsonl` for invalid JSON and
    /// `DispatchError::InvalidStructure` when `type` or `method` is blank.
    pub fn from_payload(payload: &str) -> Result<Self, DispatchError> {
        let command: Self = serde_json::from_str(payload).map_err(DispatchError::from_json_error)?;
        command.validate()?;
        Ok(command)
    }

    fn validate(&self) -> Result<(), DispatchError> {
        if self.capability.trim().is_empty() {
            return Err(DispatchError::invalid_structure("type field is empty"));
        }
        if self.method.trim().is_empty() {
            return Err(DispatchError::invalid_structure("method field is empty"));
        }
        Ok(())
    }
}
