//! Routes command descriptions to capability members.
//!
//! Resolution and marshaling happen on the calling thread against the
//! immutable registry. The member itself runs on the host thread, and the
//! caller blocks until it returns.

use std::sync::Arc;

use stagehand_graph::{Value, ValueKind};
use tracing::{debug, warn};

use super::binding::bind;
use super::errors::DispatchError;
use super::member::Member;
use super::registry::CapabilityRegistry;
use super::request::{CommandDescription, InboundCommand};
use super::response::ResponseEnvelope;
use crate::host::HostHandle;

/// Tracing target for dispatch operations.
pub(crate) const DISPATCH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::dispatch");

/// Resolves and invokes commands.
#[derive(Debug, Clone)]
pub struct CommandRouter {
    registry: Arc<CapabilityRegistry>,
    host: HostHandle,
    strict_arity: bool,
}

impl CommandRouter {
    /// Creates a router over `registry` submitting work to `host`.
    pub fn new(registry: Arc<CapabilityRegistry>, host: HostHandle, strict_arity: bool) -> Self {
        Self {
            registry,
            host,
            strict_arity,
        }
    }

    /// Resolves and invokes `command`, returning the result and its
    /// declared kind.
    ///
    /// # Errors
    ///
    /// Returns any resolution, marshaling, arity, or invocation error.
    pub fn route(&self, command: &CommandDescription) -> Result<(ValueKind, Value), DispatchError> {
        let capability = self.registry.resolve(&command.capability)?;
        let member = capability.resolve_member(&command.method, command.is_method)?;
        debug!(
            target: DISPATCH_TARGET,
            capability = capability.name(),
            member = member.name(),
            parameters = command.parameters.len(),
            "dispatching command"
        );
        let kind = member.declared_kind();
        let value = match member {
            Member::Method(method) => {
                let arguments = bind(method, &command.parameters, self.strict_arity)?;
                let invoke = method.invoke();
                self.host.run(move |state| invoke(state, &arguments))?
            }
            Member::Property(property) => {
                if self.strict_arity && !command.parameters.is_empty() {
                    return Err(DispatchError::arity_mismatch(
                        property.name(),
                        0,
                        command.parameters.len(),
                    ));
                }
                let read = property.read();
                self.host.run(move |state| read(state))?
            }
        };
        Ok((kind, value))
    }

    /// Handles one request line end to end. Never fails: every error is
    /// logged and returned as an error envelope.
    pub fn respond(&self, line: &[u8]) -> ResponseEnvelope {
        let outcome = InboundCommand::parse(line)
            .and_then(|inbound| inbound.command())
            .and_then(|command| self.route(&command));
        match outcome {
            Ok((kind, value)) => ResponseEnvelope::ok(kind, &value),
            Err(error) => {
                warn!(target: DISPATCH_TARGET, %error, "command failed");
                ResponseEnvelope::fail(&error)
            }
        }
    }
}
