//! Socket listener for daemon transport endpoints.
//!
//! The transport module binds to the configured endpoint, probing further
//! TCP ports when the configured one is taken, and accepts connections in a
//! background thread.

mod errors;
mod handler;
mod listener;

pub use self::errors::ListenerError;
pub(crate) use self::handler::{ConnectionHandler, ConnectionStream};
pub(crate) use self::listener::SocketListener;
#[cfg(test)]
pub(crate) use self::listener::ListenerHandle;

const LISTENER_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::transport");
