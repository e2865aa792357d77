//! Command socket listener.
//!
//! The accept loop polls a non-blocking socket so a shutdown request is seen
//! within one backoff interval. Each accepted connection is served on its own
//! named thread; the handler blocks there while the host thread runs the
//! command.

use std::io;
use std::net::{TcpListener, ToSocketAddrs};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use stagehand_config::SocketEndpoint;

use super::{ConnectionHandler, ConnectionStream, LISTENER_TARGET, ListenerError};

#[cfg(unix)]
use std::os::unix::net::UnixListener;

const IDLE_POLL: Duration = Duration::from_millis(25);
const ERROR_BACKOFF: Duration = Duration::from_millis(150);

/// Bound command socket, not yet accepting.
#[derive(Debug)]
pub(crate) struct SocketListener {
    endpoint: SocketEndpoint,
    socket: BoundSocket,
}

#[derive(Debug)]
enum BoundSocket {
    Tcp(TcpListener),
    #[cfg(unix)]
    Unix(UnixListener),
}

impl SocketListener {
    /// Binds `endpoint` exactly. For TCP the recorded endpoint carries the
    /// port the OS assigned, which differs from the request for port 0.
    pub(crate) fn bind(endpoint: &SocketEndpoint) -> Result<Self, ListenerError> {
        match endpoint {
            SocketEndpoint::Tcp { host, port } => {
                let listener = bind_tcp(endpoint, host, *port)?;
                let bound_port = listener
                    .local_addr()
                    .map_err(|source| bind_error(endpoint, source))?
                    .port();
                Ok(Self {
                    endpoint: endpoint.with_port(bound_port),
                    socket: BoundSocket::Tcp(listener),
                })
            }
            SocketEndpoint::Unix { path } => Self::bind_unix(endpoint, path.as_str()),
        }
    }

    /// Binds the first free port in `port..port + scan_range`.
    ///
    /// Only an address-in-use failure moves on to the next port. Unix
    /// endpoints, port 0, and a window of one port or less bind directly.
    pub(crate) fn bind_scanning(
        endpoint: &SocketEndpoint,
        scan_range: u16,
    ) -> Result<Self, ListenerError> {
        let SocketEndpoint::Tcp { host, port } = endpoint else {
            return Self::bind(endpoint);
        };
        if *port == 0 || scan_range <= 1 {
            return Self::bind(endpoint);
        }
        let end = port.saturating_add(scan_range);
        for candidate in *port..end {
            match Self::bind(&endpoint.with_port(candidate)) {
                Ok(listener) => {
                    if candidate != *port {
                        info!(
                            target: LISTENER_TARGET,
                            configured = *port,
                            bound = candidate,
                            "configured port taken; bound the next free port"
                        );
                    }
                    return Ok(listener);
                }
                Err(error) if error.is_address_in_use() => {
                    debug!(target: LISTENER_TARGET, port = candidate, "port taken");
                }
                Err(error) => return Err(error),
            }
        }
        Err(ListenerError::PortsExhausted {
            host: host.clone(),
            first: *port,
            last: end.saturating_sub(1),
        })
    }

    #[cfg(unix)]
    fn bind_unix(endpoint: &SocketEndpoint, path: &str) -> Result<Self, ListenerError> {
        reclaim_stale_socket(path)?;
        let listener = UnixListener::bind(path).map_err(|source| bind_error(endpoint, source))?;
        Ok(Self {
            endpoint: endpoint.clone(),
            socket: BoundSocket::Unix(listener),
        })
    }

    #[cfg(not(unix))]
    fn bind_unix(endpoint: &SocketEndpoint, _path: &str) -> Result<Self, ListenerError> {
        Err(bind_error(
            endpoint,
            io::Error::new(
                io::ErrorKind::Unsupported,
                "unix sockets are not available on this platform",
            ),
        ))
    }

    /// Endpoint actually bound, with the resolved port for TCP.
    pub(crate) fn endpoint(&self) -> &SocketEndpoint {
        &self.endpoint
    }

    /// Starts the accept loop on the `stagehand-accept` thread.
    pub(crate) fn start(
        self,
        handler: Arc<dyn ConnectionHandler>,
    ) -> Result<ListenerHandle, ListenerError> {
        let nonblocking = match &self.socket {
            BoundSocket::Tcp(listener) => listener.set_nonblocking(true),
            #[cfg(unix)]
            BoundSocket::Unix(listener) => listener.set_nonblocking(true),
        };
        if let Err(source) = nonblocking {
            self.remove_socket_file();
            return Err(ListenerError::Configure {
                endpoint: self.endpoint.to_string(),
                source,
            });
        }
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);
        let thread = thread::Builder::new()
            .name(String::from("stagehand-accept"))
            .spawn(move || self.serve(&stop_flag, &handler))
            .map_err(|source| ListenerError::Spawn { source })?;
        Ok(ListenerHandle {
            stop,
            thread: Some(thread),
        })
    }

    fn serve(self, stop: &AtomicBool, handler: &Arc<dyn ConnectionHandler>) {
        info!(target: LISTENER_TARGET, endpoint = %self.endpoint, "accepting commands");
        let mut last_error = None::<io::ErrorKind>;
        while !stop.load(Ordering::SeqCst) {
            match self.accept() {
                Ok(Some(stream)) => {
                    last_error = None;
                    spawn_connection(stream, handler);
                }
                Ok(None) => thread::sleep(IDLE_POLL),
                Err(error) => {
                    // Repeats of the same failure are not logged again.
                    if last_error != Some(error.kind()) {
                        warn!(target: LISTENER_TARGET, %error, "accept failed");
                    }
                    last_error = Some(error.kind());
                    thread::sleep(ERROR_BACKOFF);
                }
            }
        }
        self.remove_socket_file();
        info!(target: LISTENER_TARGET, endpoint = %self.endpoint, "listener stopped");
    }

    fn accept(&self) -> io::Result<Option<ConnectionStream>> {
        let accepted = match &self.socket {
            BoundSocket::Tcp(listener) => listener.accept().and_then(|(stream, _)| {
                stream.set_nonblocking(false)?;
                Ok(ConnectionStream::Tcp(stream))
            }),
            #[cfg(unix)]
            BoundSocket::Unix(listener) => listener.accept().and_then(|(stream, _)| {
                stream.set_nonblocking(false)?;
                Ok(ConnectionStream::Unix(stream))
            }),
        };
        match accepted {
            Ok(stream) => Ok(Some(stream)),
            Err(error) if error.kind() == io::ErrorKind::WouldBlock => Ok(None),
            Err(error) => Err(error),
        }
    }

    fn remove_socket_file(&self) {
        let Some(path) = self.endpoint.unix_path() else {
            return;
        };
        if let Err(error) = std::fs::remove_file(path)
            && error.kind() != io::ErrorKind::NotFound
        {
            warn!(target: LISTENER_TARGET, %error, %path, "failed to remove unix socket file");
        }
    }
}

/// Handle to the running accept loop.
pub(crate) struct ListenerHandle {
    stop: Arc<AtomicBool>,
    thread: Option<thread::JoinHandle<()>>,
}

impl ListenerHandle {
    /// Asks the accept loop to stop. Connections already accepted finish.
    pub(crate) fn shutdown(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    /// Waits for the accept loop to exit.
    pub(crate) fn join(mut self) -> Result<(), ListenerError> {
        match self.thread.take() {
            Some(thread) => thread.join().map_err(|_| ListenerError::ThreadPanic),
            None => Ok(()),
        }
    }
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn spawn_connection(stream: ConnectionStream, handler: &Arc<dyn ConnectionHandler>) {
    let handler = Arc::clone(handler);
    let spawned = thread::Builder::new()
        .name(String::from("stagehand-conn"))
        .spawn(move || handler.handle(stream));
    if let Err(error) = spawned {
        warn!(target: LISTENER_TARGET, %error, "dropping connection: no thread to serve it");
    }
}

fn bind_error(endpoint: &SocketEndpoint, source: io::Error) -> ListenerError {
    ListenerError::Bind {
        endpoint: endpoint.to_string(),
        source,
    }
}

fn bind_tcp(endpoint: &SocketEndpoint, host: &str, port: u16) -> Result<TcpListener, ListenerError> {
    let resolve_error = |source| ListenerError::Resolve {
        endpoint: endpoint.to_string(),
        source,
    };
    let addr = (host, port)
        .to_socket_addrs()
        .map_err(resolve_error)?
        .next()
        .ok_or_else(|| {
            resolve_error(io::Error::new(
                io::ErrorKind::NotFound,
                "host resolved to no addresses",
            ))
        })?;
    TcpListener::bind(addr).map_err(|source| bind_error(endpoint, source))
}

/// Clears a socket file left behind by a daemon that exited without
/// cleaning up. A socket that still accepts connections is left alone.
#[cfg(unix)]
fn reclaim_stale_socket(path: &str) -> Result<(), ListenerError> {
    use std::os::unix::fs::FileTypeExt;
    use std::os::unix::net::UnixStream;

    let stale = |source| ListenerError::StaleSocket {
        path: path.to_owned(),
        source,
    };
    let metadata = match std::fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(error) => return Err(stale(error)),
    };
    if !metadata.file_type().is_socket() {
        return Err(ListenerError::NotASocket {
            path: path.to_owned(),
        });
    }
    match UnixStream::connect(path) {
        Ok(_) => Err(ListenerError::SocketInUse {
            path: path.to_owned(),
        }),
        Err(error)
            if matches!(
                error.kind(),
                io::ErrorKind::ConnectionRefused | io::ErrorKind::NotFound
            ) =>
        {
            debug!(target: LISTENER_TARGET, path, "removing stale unix socket");
            std::fs::remove_file(path).map_err(stale)
        }
        Err(error) => Err(stale(error)),
    }
}
