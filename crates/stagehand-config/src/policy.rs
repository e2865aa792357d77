//! Commit behaviour for scoped mutations of persisted assets.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Decides whether a scoped mutation commits when its body fails.
///
/// `Always` writes the working node back on every exit path, including when
/// the mutation raised an error part-way through. `OnSuccess` discards the
/// working node instead, leaving the stored asset untouched.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum CommitPolicy {
    /// Commit unconditionally when the scope is released.
    #[default]
    Always,
    /// Commit only when the mutation body succeeded.
    OnSuccess,
}

impl CommitPolicy {
    /// Returns true when a failed mutation should still be committed.
    #[must_use]
    pub const fn commits_on_failure(self) -> bool {
        matches!(self, Self::Always)
    }
}
