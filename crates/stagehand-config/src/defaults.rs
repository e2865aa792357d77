use camino::Utf8PathBuf;

use crate::logging::LogFormat;
use crate::policy::CommitPolicy;
use crate::socket::SocketEndpoint;

/// Port the command service binds when nothing else is configured.
pub const DEFAULT_TCP_PORT: u16 = 50061;

/// Number of consecutive ports tried, starting at the configured port.
pub const DEFAULT_PORT_SCAN_RANGE: u16 = 20;

/// Default log filter expression used by the daemon.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Directory, relative to the working directory, holding persisted assets.
pub const DEFAULT_STORE_ROOT: &str = "Assets";

/// Default log filter expression used by the daemon.
#[must_use]
pub fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format for the daemon.
#[must_use]
pub fn default_log_format() -> LogFormat {
    LogFormat::Json
}

/// Computes the default socket endpoint for the daemon.
///
/// The service listens on loopback TCP so editor integrations on any
/// platform can reach it without a shared filesystem.
#[must_use]
pub fn default_socket_endpoint() -> SocketEndpoint {
    SocketEndpoint::tcp("127.0.0.1", DEFAULT_TCP_PORT)
}

/// Default number of consecutive ports tried, starting at the configured one.
#[must_use]
pub const fn default_port_scan_range() -> u16 {
    DEFAULT_PORT_SCAN_RANGE
}

/// Default root of the filesystem asset store.
#[must_use]
pub fn default_store_root() -> Utf8PathBuf {
    Utf8PathBuf::from(DEFAULT_STORE_ROOT)
}

/// Default commit behaviour for scoped mutations.
#[must_use]
pub fn default_commit_policy() -> CommitPolicy {
    CommitPolicy::Always
}
