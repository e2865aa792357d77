//! Blocking wait for the end of the daemon's serving phase.

use std::fmt;
use std::io;

use signal_hook::consts::signal::{SIGHUP, SIGINT, SIGQUIT, SIGTERM};
use signal_hook::iterator::Signals;
use thiserror::Error;

const TERMINATION_SIGNALS: [(i32, &str); 4] = [
    (SIGTERM, "SIGTERM"),
    (SIGINT, "SIGINT"),
    (SIGQUIT, "SIGQUIT"),
    (SIGHUP, "SIGHUP"),
];

/// Why the daemon stopped serving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownCause {
    /// A termination signal arrived.
    Signal(&'static str),
    /// The embedding process asked for shutdown.
    Requested,
}

impl fmt::Display for ShutdownCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Signal(name) => f.write_str(name),
            Self::Requested => f.write_str("requested"),
        }
    }
}

/// Source of the shutdown notification.
pub trait ShutdownSignal: Send + Sync {
    /// Blocks until the daemon should stop serving.
    ///
    /// # Errors
    ///
    /// Returns an error when the notification source cannot be installed.
    fn wait(&self) -> Result<ShutdownCause, ShutdownError>;
}

/// Errors reported by shutdown signal listeners.
#[derive(Debug, Error)]
pub enum ShutdownError {
    /// Installing signal handlers failed.
    #[error("failed to install signal handlers: {source}")]
    Install {
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
}

/// Waits for SIGTERM, SIGINT, SIGQUIT or SIGHUP.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemShutdownSignal;

impl ShutdownSignal for SystemShutdownSignal {
    fn wait(&self) -> Result<ShutdownCause, ShutdownError> {
        let mut signals = Signals::new(TERMINATION_SIGNALS.map(|(number, _)| number))
            .map_err(|source| ShutdownError::Install { source })?;
        let received = signals.forever().next();
        Ok(received.map_or(ShutdownCause::Requested, |number| {
            ShutdownCause::Signal(signal_name(number))
        }))
    }
}

fn signal_name(number: i32) -> &'static str {
    TERMINATION_SIGNALS
        .iter()
        .find(|(candidate, _)| *candidate == number)
        .map_or("unknown signal", |(_, name)| name)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(SIGTERM, "SIGTERM")]
    #[case(SIGHUP, "SIGHUP")]
    #[case(0, "unknown signal")]
    fn names_termination_signals(#[case] number: i32, #[case] expected: &str) {
        assert_eq!(signal_name(number), expected);
    }

    #[test]
    fn causes_display_for_logs() {
        assert_eq!(ShutdownCause::Signal("SIGINT").to_string(), "SIGINT");
        assert_eq!(ShutdownCause::Requested.to_string(), "requested");
    }
}
