//! Errors raised while binding or serving the command socket.

use std::io;

use thiserror::Error;

/// Errors surfaced while binding or running the socket listener.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// The endpoint's host did not resolve to any address.
    #[error("cannot resolve {endpoint}: {source}")]
    Resolve {
        /// Endpoint as configured.
        endpoint: String,
        /// Resolver failure.
        #[source]
        source: io::Error,
    },
    /// The operating system refused the bind.
    #[error("failed to bind {endpoint}: {source}")]
    Bind {
        /// Endpoint that was being bound.
        endpoint: String,
        /// Bind failure.
        #[source]
        source: io::Error,
    },
    /// Every port in the scan window is taken.
    #[error("no free TCP port on {host} between {first} and {last}")]
    PortsExhausted {
        /// Host the ports were probed on.
        host: String,
        /// First port tried.
        first: u16,
        /// Last port tried.
        last: u16,
    },
    /// Another live process still serves the Unix socket.
    #[error("unix socket {path} is already served by another process")]
    SocketInUse {
        /// Socket path.
        path: String,
    },
    /// Something other than a socket occupies the Unix socket path.
    #[error("{path} exists and is not a unix socket")]
    NotASocket {
        /// Occupied path.
        path: String,
    },
    /// A leftover socket file could not be inspected or removed.
    #[error("failed to reclaim stale unix socket {path}: {source}")]
    StaleSocket {
        /// Socket path.
        path: String,
        /// Inspection or removal failure.
        #[source]
        source: io::Error,
    },
    /// The bound socket could not be switched to non-blocking accepts.
    #[error("failed to configure listener for {endpoint}: {source}")]
    Configure {
        /// Bound endpoint.
        endpoint: String,
        /// Socket option failure.
        #[source]
        source: io::Error,
    },
    /// The accept thread could not be started.
    #[error("failed to spawn listener thread: {source}")]
    Spawn {
        /// Thread creation failure.
        #[source]
        source: io::Error,
    },
    /// The accept thread panicked.
    #[error("listener thread panicked")]
    ThreadPanic,
}

impl ListenerError {
    /// Whether the bind failed only because the address is taken, so a
    /// neighbouring port may still be free.
    #[must_use]
    pub fn is_address_in_use(&self) -> bool {
        matches!(self, Self::Bind { source, .. } if source.kind() == io::ErrorKind::AddrInUse)
    }
}
