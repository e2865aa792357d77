//! The stagehand daemon.
//!
//! Remote clients drive a content-authoring host by sending string-encoded
//! commands over a local socket. Each command names a capability, a member
//! of that capability, and textual arguments. The daemon resolves the
//! member, marshals the arguments against its declared parameter kinds,
//! runs it on the single host thread that owns the asset store, and answers
//! with a response envelope.
//!
//! Startup loads layered configuration, initialises structured telemetry,
//! and prepares the socket filesystem before the host thread and listener
//! start. Health reporting hooks emit an event at each stage.
//!
//! Errors never escape the request boundary: malformed requests, unknown
//! capabilities or members, marshal failures, and failing or panicking
//! members all become error envelopes.

mod bootstrap;
pub mod capabilities;
pub mod dispatch;
mod health;
pub mod host;
mod runtime;
mod telemetry;
mod transport;

pub use bootstrap::{
    BootstrapError, ConfigLoader, Daemon, StaticConfigLoader, SystemConfigLoader, bootstrap_with,
};
pub use health::{HealthReporter, StructuredHealthReporter};
pub use runtime::{
    LaunchError, ShutdownCause, ShutdownError, ShutdownSignal, SystemShutdownSignal, run_daemon,
    run_daemon_with,
};
pub use telemetry::{TelemetryError, TelemetryHandle};
pub use transport::ListenerError;

#[cfg(test)]
mod tests;
