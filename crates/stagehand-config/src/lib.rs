//! Shared configuration for the stagehand command daemon.
//!
//! Configuration is layered with [`ortho_config`]: built-in defaults are
//! overridden by a configuration file, then by `STAGEHAND_*` environment
//! variables, then by command-line flags. Every field carries a serde default
//! so partial files and sparse environments resolve to a complete [`Config`].

mod defaults;
mod logging;
mod policy;
mod socket;

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

pub use defaults::{
    DEFAULT_LOG_FILTER, DEFAULT_PORT_SCAN_RANGE, DEFAULT_STORE_ROOT, DEFAULT_TCP_PORT,
    default_commit_policy, default_log_filter, default_log_filter_string, default_log_format,
    default_port_scan_range, default_socket_endpoint, default_store_root,
};
pub use logging::{LogFormat, LogFormatParseError};
pub use policy::CommitPolicy;
pub use socket::{SocketEndpoint, SocketParseError, SocketPreparationError};

/// Resolved daemon configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "STAGEHAND")]
pub struct Config {
    /// Endpoint the command service listens on.
    #[serde(default = "defaults::default_socket_endpoint")]
    pub daemon_socket: SocketEndpoint,
    /// Consecutive TCP ports tried, starting at the configured one, before
    /// giving up (`0` or `1` binds only the configured port).
    #[serde(default = "defaults::default_port_scan_range")]
    pub port_scan_range: u16,
    /// Root directory of the persisted asset store.
    #[serde(default = "defaults::default_store_root")]
    pub store_root: Utf8PathBuf,
    /// `tracing` filter expression.
    #[serde(default = "defaults::default_log_filter_string")]
    pub log_filter: String,
    /// Output format for log records.
    #[serde(default = "defaults::default_log_format")]
    pub log_format: LogFormat,
    /// Capability used when a command names an unregistered namespace.
    #[serde(default)]
    pub fallback_capability: Option<String>,
    /// Reject commands whose parameter count differs from the member's.
    #[serde(default)]
    pub strict_arity: bool,
    /// Commit behaviour of scoped mutations whose body fails.
    #[serde(default = "defaults::default_commit_policy")]
    pub commit_policy: CommitPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            daemon_socket: default_socket_endpoint(),
            port_scan_range: default_port_scan_range(),
            store_root: default_store_root(),
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
            fallback_capability: None,
            strict_arity: false,
            commit_policy: default_commit_policy(),
        }
    }
}

impl Config {
    /// Endpoint the command service listens on.
    #[must_use]
    pub fn daemon_socket(&self) -> &SocketEndpoint {
        &self.daemon_socket
    }

    /// Consecutive TCP ports tried, starting at the configured one.
    #[must_use]
    pub const fn port_scan_range(&self) -> u16 {
        self.port_scan_range
    }

    /// Root directory of the persisted asset store.
    #[must_use]
    pub fn store_root(&self) -> &Utf8PathBuf {
        &self.store_root
    }

    /// `tracing` filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Output format for log records.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Capability used for unregistered namespaces, when configured.
    #[must_use]
    pub fn fallback_capability(&self) -> Option<&str> {
        self.fallback_capability
            .as_deref()
            .filter(|name| !name.trim().is_empty())
    }

    /// Whether parameter counts must match member arity exactly.
    #[must_use]
    pub const fn strict_arity(&self) -> bool {
        self.strict_arity
    }

    /// Commit behaviour of scoped mutations.
    #[must_use]
    pub const fn commit_policy(&self) -> CommitPolicy {
        self.commit_policy
    }
}
