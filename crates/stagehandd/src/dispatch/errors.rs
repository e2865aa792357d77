//! Error types for request dispatch failures.
//!
//! Every variant is converted into an error envelope at the request
//! boundary; none escapes to the transport.

use std::io;

use stagehand_graph::{GraphError, MarshalError};
use thiserror::Error;

/// Errors surfaced while parsing, resolving, marshaling, or invoking a command.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Request line or payload could not be parsed as JSON.
    #[error("malformed JSONL: {message}")]
    MalformedJsonl {
        /// Parser message.
        message: String,
        /// Underlying parser error, when there is one.
        #[source]
        source: Option<serde_json::Error>,
    },

    /// Command description is missing required content.
    #[error("invalid request structure: {message}")]
    InvalidStructure {
        /// What was wrong.
        message: String,
    },

    /// Request exceeds the maximum allowed size.
    #[error("request too large: {size} bytes exceeds {max_size} byte limit")]
    RequestTooLarge {
        /// Bytes read so far.
        size: usize,
        /// Configured limit.
        max_size: usize,
    },

    /// No capability is registered under the name and no fallback applies.
    #[error("unknown capability: {name}")]
    UnknownCapability {
        /// Requested capability name.
        name: String,
    },

    /// The capability has no member of the requested kind and name.
    #[error("no {kind} named '{member}' on {capability}")]
    MemberNotFound {
        /// Capability that was searched.
        capability: String,
        /// Requested member name.
        member: String,
        /// `method` or `property`.
        kind: &'static str,
    },

    /// An enumeration argument named no declared member.
    #[error("invalid value '{value}' for enum {type_name}")]
    InvalidEnumValue {
        /// Declared enumeration.
        type_name: String,
        /// Rejected text.
        value: String,
    },

    /// An argument could not be converted to its declared type.
    #[error("cannot convert '{value}' to {target}")]
    TypeConversion {
        /// Rejected text.
        value: String,
        /// Declared type name.
        target: String,
    },

    /// Supplied argument count differs from the declared parameter count.
    #[error("{member} expects {expected} parameters but {supplied} were supplied")]
    ArityMismatch {
        /// Member being invoked.
        member: String,
        /// Declared parameter count.
        expected: usize,
        /// Supplied parameter count.
        supplied: usize,
    },

    /// A child path segment does not exist.
    #[error("Not found child chain: {path} (missing '{segment}')")]
    ChildNotFound {
        /// Child path being resolved.
        path: String,
        /// Missing segment.
        segment: String,
    },

    /// Source and target property types differ.
    #[error("Source and Target property types are not same! ({source_type} vs {target_type})")]
    TypeMismatch {
        /// Declared source type.
        source_type: String,
        /// Declared target type.
        target_type: String,
    },

    /// The invoked member itself failed.
    #[error("{message}")]
    HostInvocation {
        /// Failure description.
        message: String,
    },

    /// The host thread is no longer accepting jobs.
    #[error("host execution context is unavailable")]
    HostUnavailable,

    /// IO error during read or write.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Response serialization failed.
    #[error("failed to serialize response: {0}")]
    SerializeResponse(#[from] serde_json::Error),
}

impl DispatchError {
    /// Creates a malformed JSONL error from a serde error.
    pub fn from_json_error(source: serde_json::Error) -> Self {
        Self::MalformedJsonl {
            message: source.to_string(),
            source: Some(source),
        }
    }

    /// Creates a malformed JSONL error with a custom message.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedJsonl {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an invalid structure error.
    pub fn invalid_structure(message: impl Into<String>) -> Self {
        Self::InvalidStructure {
            message: message.into(),
        }
    }

    /// Creates a request too large error.
    pub fn request_too_large(size: usize, max_size: usize) -> Self {
        Self::RequestTooLarge { size, max_size }
    }

    /// Creates an unknown capability error.
    pub fn unknown_capability(name: impl Into<String>) -> Self {
        Self::UnknownCapability { name: name.into() }
    }

    /// Creates a member-not-found error.
    pub fn member_not_found(
        capability: impl Into<String>,
        member: impl Into<String>,
        is_method: bool,
    ) -> Self {
        Self::MemberNotFound {
            capability: capability.into(),
            member: member.into(),
            kind: if is_method { "method" } else { "property" },
        }
    }

    /// Creates an arity mismatch error.
    pub fn arity_mismatch(member: impl Into<String>, expected: usize, supplied: usize) -> Self {
        Self::ArityMismatch {
            member: member.into(),
            expected,
            supplied,
        }
    }

    /// Creates a host invocation error.
    pub fn host_invocation(message: impl Into<String>) -> Self {
        Self::HostInvocation {
            message: message.into(),
        }
    }
}

impl From<MarshalError> for DispatchError {
    fn from(error: MarshalError) -> Self {
        match error {
            MarshalError::InvalidEnumValue { type_name, value } => Self::InvalidEnumValue {
                type_name: type_name.to_owned(),
                value,
            },
            MarshalError::TypeConversion { value, target } => Self::TypeConversion {
                value,
                target: target.to_owned(),
            },
        }
    }
}

impl From<GraphError> for DispatchError {
    fn from(error: GraphError) -> Self {
        match error {
            GraphError::ChildNotFound { path, segment } => Self::ChildNotFound { path, segment },
            GraphError::TypeMismatch {
                source_type,
                target_type,
            } => Self::TypeMismatch {
                source_type,
                target_type,
            },
            GraphError::Marshal(inner) => inner.into(),
            other => Self::host_invocation(other.to_string()),
        }
    }
}
