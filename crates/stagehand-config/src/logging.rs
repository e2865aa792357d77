//! Log output settings for the daemon.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// How the daemon renders log records on stderr.
///
/// Parses case-insensitively from `json` or `compact`.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum LogFormat {
    /// One flattened JSON object per event, for editor-side log collectors.
    #[default]
    Json,
    /// Single-line text for operators watching the daemon in a terminal.
    Compact,
}

impl LogFormat {
    /// Whether records are machine-readable documents.
    #[must_use]
    pub const fn is_structured(self) -> bool {
        matches!(self, Self::Json)
    }

    /// Whether ANSI colour codes belong in the output when stderr is
    /// `interactive`. Structured records never carry them.
    #[must_use]
    pub const fn uses_ansi(self, interactive: bool) -> bool {
        interactive && !self.is_structured()
    }
}

/// Errors encountered while parsing a [`LogFormat`] from text.
pub type LogFormatParseError = strum::ParseError;
