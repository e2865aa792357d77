//! Test harness utilities for the daemon suites.

mod config_loader;
mod host;
mod reporter;

pub use config_loader::{FailingConfigLoader, TestConfigLoader};
pub use host::{lamp_asset, router_for, spawn_host};
pub use reporter::{HealthEvent, RecordingHealthReporter};
