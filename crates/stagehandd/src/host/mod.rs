//! Single-threaded host execution context.
//!
//! The asset store and component catalog are owned by one dedicated thread.
//! Requests submit jobs over a channel and block until the job replies, so
//! concurrent callers are serialised by the queue alone.

mod state;

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use thiserror::Error;
use tracing::{debug, info};

use crate::dispatch::DispatchError;

pub use self::state::{HostState, PLATFORM, ProjectInfo};

const HOST_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::host");

type Job = Box<dyn FnOnce(&mut HostState) + Send>;

enum Message {
    Job(Job),
    Shutdown,
}

/// Errors raised while managing the host thread.
#[derive(Debug, Error)]
pub enum HostError {
    /// The host thread could not be spawned.
    #[error("failed to spawn host thread: {source}")]
    Spawn {
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },
    /// The host thread panicked outside a job.
    #[error("host thread panicked")]
    ThreadPanic,
}

/// Owns the host thread and its job queue.
pub struct HostExecutor {
    sender: Sender<Message>,
    thread: Option<JoinHandle<()>>,
}

impl HostExecutor {
    /// Moves `state` onto a new host thread.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Spawn`] when the thread cannot be created.
    pub fn spawn(state: HostState) -> Result<Self, HostError> {
        let (sender, receiver) = mpsc::channel();
        let thread = thread::Builder::new()
            .name(String::from("stagehand-host"))
            .spawn(move || run_host_loop(state, &receiver))
            .map_err(|source| HostError::Spawn { source })?;
        Ok(Self {
            sender,
            thread: Some(thread),
        })
    }

    /// Returns a cloneable handle for submitting jobs.
    #[must_use]
    pub fn handle(&self) -> HostHandle {
        HostHandle {
            sender: self.sender.clone(),
        }
    }

    /// Stops the host thread after queued jobs have run.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::ThreadPanic`] when the thread panicked.
    pub fn shutdown(mut self) -> Result<(), HostError> {
        let _ = self.sender.send(Message::Shutdown);
        match self.thread.take() {
            Some(thread) => thread.join().map_err(|_| HostError::ThreadPanic),
            None => Ok(()),
        }
    }
}

impl Drop for HostExecutor {
    fn drop(&mut self) {
        if self.thread.is_some() {
            let _ = self.sender.send(Message::Shutdown);
        }
    }
}

impl std::fmt::Debug for HostExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostExecutor")
            .field("running", &self.thread.is_some())
            .finish_non_exhaustive()
    }
}

/// Submits work to the host thread.
#[derive(Clone)]
pub struct HostHandle {
    sender: Sender<Message>,
}

impl HostHandle {
    /// Runs `job` on the host thread and blocks until it finishes.
    ///
    /// A panicking job is reported as [`DispatchError::HostInvocation`]; the
    /// host thread keeps serving later jobs.
    ///
    /// # Errors
    ///
    /// Returns the job's own error, or [`DispatchError::HostUnavailable`] when
    /// the host thread has stopped.
    pub fn run<T, F>(&self, job: F) -> Result<T, DispatchError>
    where
        T: Send + 'static,
        F: FnOnce(&mut HostState) -> Result<T, DispatchError> + Send + 'static,
    {
        let (reply, outcome) = mpsc::channel();
        let wrapped: Job = Box::new(move |state: &mut HostState| {
            let result = panic::catch_unwind(AssertUnwindSafe(|| job(state)))
                .unwrap_or_else(|payload| {
                    Err(DispatchError::host_invocation(panic_message(payload.as_ref())))
                });
            let _ = reply.send(result);
        });
        self.sender
            .send(Message::Job(wrapped))
            .map_err(|_| DispatchError::HostUnavailable)?;
        outcome.recv().map_err(|_| DispatchError::HostUnavailable)?
    }
}

impl std::fmt::Debug for HostHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostHandle").finish_non_exhaustive()
    }
}

fn run_host_loop(mut state: HostState, receiver: &Receiver<Message>) {
    info!(
        target: HOST_TARGET,
        data_path = %state.project().data_path(),
        "host thread started"
    );
    while let Ok(message) = receiver.recv() {
        match message {
            Message::Job(job) => job(&mut state),
            Message::Shutdown => break,
        }
    }
    debug!(target: HOST_TARGET, "host thread stopped");
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        format!("host job panicked: {text}")
    } else if let Some(text) = payload.downcast_ref::<String>() {
        format!("host job panicked: {text}")
    } else {
        String::from("host job panicked")
    }
}
