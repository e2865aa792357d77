//! `Stagehand.Application`: read-only facts about the served project.

use stagehand_graph::{Value, ValueKind};

use crate::dispatch::{Capability, DispatchError};
use crate::host::{HostState, PLATFORM};

/// Capability name.
pub const APPLICATION: &str = "Stagehand.Application";

pub(super) fn capability() -> Capability {
    Capability::new(APPLICATION)
        .with_property("dataPath", ValueKind::String, data_path)
        .with_property("projectRoot", ValueKind::String, project_root)
        .with_property("platform", ValueKind::Enum(&PLATFORM), platform)
        .with_property("version", ValueKind::String, version)
}

fn data_path(state: &HostState) -> Result<Value, DispatchError> {
    Ok(Value::String(state.project().data_path().to_string()))
}

fn project_root(state: &HostState) -> Result<Value, DispatchError> {
    Ok(Value::String(state.project().project_root().to_string()))
}

fn platform(state: &HostState) -> Result<Value, DispatchError> {
    Ok(Value::enum_member(&PLATFORM, state.project().platform()))
}

fn version(state: &HostState) -> Result<Value, DispatchError> {
    Ok(Value::String(state.project().version().to_owned()))
}
