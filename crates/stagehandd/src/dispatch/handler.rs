//! Connection handler that dispatches JSONL commands.
//!
//! Each connection carries one request line and receives one envelope line.

use std::io::{self, Read};
use std::time::Duration;

use tracing::{debug, warn};

use crate::transport::{ConnectionHandler, ConnectionStream};

use super::errors::DispatchError;
use super::response::{ResponseEnvelope, ResponseWriter};
use super::router::{CommandRouter, DISPATCH_TARGET};

/// Maximum size of a single request line in bytes.
pub(crate) const MAX_REQUEST_BYTES: usize = 1024 * 1024;

const READ_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection handler that parses and dispatches JSONL commands.
#[derive(Debug)]
pub struct DispatchConnectionHandler {
    router: CommandRouter,
}

impl DispatchConnectionHandler {
    /// Creates a handler routing through `router`.
    pub fn new(router: CommandRouter) -> Self {
        Self { router }
    }

    fn dispatch(&self, mut stream: ConnectionStream) {
        if let Err(error) = stream.set_read_timeout(Some(READ_TIMEOUT)) {
            debug!(target: DISPATCH_TARGET, %error, "could not set read timeout");
        }
        let envelope = match read_request_line(&mut stream) {
            Ok(Some(bytes)) => self.router.respond(&bytes),
            Ok(None) => {
                debug!(target: DISPATCH_TARGET, "client disconnected without request");
                return;
            }
            Err(error) => {
                warn!(target: DISPATCH_TARGET, %error, "failed to read request");
                ResponseEnvelope::fail(&error)
            }
        };
        if let Err(error) = ResponseWriter::new(&mut stream).write_envelope(&envelope) {
            warn!(target: DISPATCH_TARGET, %error, "failed to write response");
        }
    }
}

impl ConnectionHandler for DispatchConnectionHandler {
    fn handle(&self, stream: ConnectionStream) {
        self.dispatch(stream);
    }
}

/// Reads a bounded JSONL request line from the stream.
///
/// Returns `Ok(None)` if the client disconnects without sending data.
/// Returns `Ok(Some(bytes))` when a complete line (or EOF with partial data)
/// is received. Returns an error if reading fails or the request exceeds the
/// maximum size.
fn read_request_line(stream: &mut impl Read) -> Result<Option<Vec<u8>>, DispatchError> {
    let mut buffer = Vec::new();
    let mut chunk = [0_u8; 1024];

    loop {
        let bytes_read = read_with_retry(stream, &mut chunk)?;
        let Some(received) = chunk.get(..bytes_read) else {
            return Err(DispatchError::malformed("reader overran its buffer"));
        };

        if received.is_empty() {
            return Ok(if buffer.is_empty() {
                None
            } else {
                Some(buffer)
            });
        }

        if let Some(newline) = received.iter().position(|byte| *byte == b'\n') {
            buffer.extend(received.iter().take(newline + 1));
            enforce_limit(buffer.len())?;
            return Ok(Some(buffer));
        }

        buffer.extend_from_slice(received);
        enforce_limit(buffer.len())?;
    }
}

/// Reads from the stream, retrying on interrupts.
fn read_with_retry(stream: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    loop {
        match stream.read(buf) {
            Ok(n) => return Ok(n),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
}

/// Enforces the maximum request size limit.
fn enforce_limit(size: usize) -> Result<(), DispatchError> {
    if size > MAX_REQUEST_BYTES {
        return Err(DispatchError::request_too_large(size, MAX_REQUEST_BYTES));
    }
    Ok(())
}
