//! Sequences daemon startup and shutdown.

use std::sync::Arc;

use stagehand_graph::{ComponentCatalog, FsStore};
use tracing::info;

use crate::bootstrap::{ConfigLoader, SystemConfigLoader, bootstrap_with};
use crate::capabilities::builtin_registry;
use crate::dispatch::{CommandRouter, DispatchConnectionHandler};
use crate::health::{HealthReporter, StructuredHealthReporter};
use crate::host::{HostExecutor, HostState, ProjectInfo};
use crate::transport::SocketListener;

use super::RUNTIME_TARGET;
use super::errors::LaunchError;
use super::shutdown::{ShutdownSignal, SystemShutdownSignal};

/// Runs the daemon using the production collaborators until a termination
/// signal arrives.
///
/// # Errors
///
/// Returns a [`LaunchError`] when any startup stage fails.
pub fn run_daemon() -> Result<(), LaunchError> {
    run_daemon_with(
        &SystemConfigLoader,
        Arc::new(StructuredHealthReporter::new()),
        &SystemShutdownSignal,
    )
}

/// Runs the daemon with injected collaborators.
///
/// Startup order: bootstrap (which also prepares the asset store root),
/// capability registry, host thread, listener. Shutdown stops the listener
/// before the host so no request is left waiting on a stopped host.
///
/// # Errors
///
/// Returns a [`LaunchError`] when any startup stage fails or the shutdown
/// signal cannot be awaited.
pub fn run_daemon_with(
    loader: &dyn ConfigLoader,
    reporter: Arc<dyn HealthReporter>,
    shutdown: &dyn ShutdownSignal,
) -> Result<(), LaunchError> {
    let daemon = bootstrap_with(loader, reporter)?;
    let config = daemon.config();
    let reporter = daemon.reporter();

    let registry = Arc::new(builtin_registry(config.fallback_capability())?);
    let store_root = config.store_root();
    let state = HostState::new(
        Box::new(FsStore::new(store_root.clone())),
        ComponentCatalog::builtin(),
        ProjectInfo::detect(store_root),
        config.commit_policy(),
    );
    let host = HostExecutor::spawn(state)?;
    reporter.host_started();

    let router = CommandRouter::new(registry, host.handle(), config.strict_arity());
    let listener =
        SocketListener::bind_scanning(config.daemon_socket(), config.port_scan_range())?;
    reporter.listener_ready(listener.endpoint());
    let listener_handle = listener.start(Arc::new(DispatchConnectionHandler::new(router)))?;

    let cause = shutdown.wait()?;
    info!(target: RUNTIME_TARGET, %cause, "stopping daemon");
    listener_handle.shutdown();
    listener_handle.join()?;
    host.shutdown()?;
    info!(target: RUNTIME_TARGET, "shutdown sequence completed");
    Ok(())
}
