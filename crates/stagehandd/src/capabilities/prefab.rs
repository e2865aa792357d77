//! `Stagehand.Prefab`: component-level edits addressed by path.

use stagehand_graph::{Value, ValueKind};

use crate::dispatch::{Arguments, Capability, DispatchError, Parameter};
use crate::host::HostState;

/// Capability name.
pub const PREFAB: &str = "Stagehand.Prefab";

pub(super) fn capability() -> Capability {
    let text = |name| Parameter::required(name, ValueKind::String);
    Capability::new(PREFAB)
        .with_method(
            "AddComponent",
            [
                text("asset"),
                text("address"),
                Parameter::optional("createMissing", ValueKind::Bool, "true"),
            ],
            ValueKind::Void,
            add_component,
        )
        .with_method(
            "SetValue",
            [text("asset"), text("address"), text("property"), text("value")],
            ValueKind::Void,
            set_value,
        )
        .with_method(
            "SetReferenceValue",
            [
                text("source"),
                text("sourceAddress"),
                text("sourceProperty"),
                text("target"),
                text("targetAddress"),
                text("targetProperty"),
            ],
            ValueKind::Void,
            set_reference_value,
        )
        .with_method(
            "Merge",
            [
                Parameter::required("assets", ValueKind::StringArray),
                text("target"),
            ],
            ValueKind::Void,
            merge,
        )
        .with_method(
            "CreateMeshColliderObject",
            [
                text("meshAsset"),
                text("target"),
                Parameter::optional("grabbable", ValueKind::Bool, "false"),
            ],
            ValueKind::Void,
            create_mesh_collider_object,
        )
        .with_method(
            "GetValue",
            [text("asset"), text("address"), text("property")],
            ValueKind::String,
            get_value,
        )
}

fn add_component(state: &mut HostState, args: &Arguments) -> Result<Value, DispatchError> {
    state.editor().add_component(
        args.text("asset")?,
        args.text("address")?,
        args.flag("createMissing")?,
    )?;
    Ok(Value::Null)
}

fn set_value(state: &mut HostState, args: &Arguments) -> Result<Value, DispatchError> {
    state.editor().set_value(
        args.text("asset")?,
        args.text("address")?,
        args.text("property")?,
        args.text("value")?,
    )?;
    Ok(Value::Null)
}

fn set_reference_value(state: &mut HostState, args: &Arguments) -> Result<Value, DispatchError> {
    state.editor().copy_reference(
        args.text("source")?,
        args.text("sourceAddress")?,
        args.text("sourceProperty")?,
        args.text("target")?,
        args.text("targetAddress")?,
        args.text("targetProperty")?,
    )?;
    Ok(Value::Null)
}

fn merge(state: &mut HostState, args: &Arguments) -> Result<Value, DispatchError> {
    state
        .editor()
        .merge(args.list("assets")?, args.text("target")?)?;
    Ok(Value::Null)
}

fn create_mesh_collider_object(
    state: &mut HostState,
    args: &Arguments,
) -> Result<Value, DispatchError> {
    state.editor().create_collider_asset(
        args.text("meshAsset")?,
        args.text("target")?,
        args.flag("grabbable")?,
    )?;
    Ok(Value::Null)
}

fn get_value(state: &mut HostState, args: &Arguments) -> Result<Value, DispatchError> {
    let read = state.editor().get_value(
        args.text("asset")?,
        args.text("address")?,
        args.text("property")?,
    )?;
    Ok(Value::String(read.value.to_string()))
}
