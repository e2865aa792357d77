//! `Stagehand.AssetDatabase`: whole-asset operations on the store.
//!
//! Copy and delete report failure as `false` and move reports it as an
//! error string, so clients can probe without receiving error envelopes.

use stagehand_graph::{Value, ValueKind};
use tracing::debug;

use crate::dispatch::{Arguments, Capability, DispatchError, Parameter};
use crate::host::HostState;

/// Capability name.
pub const ASSET_DATABASE: &str = "Stagehand.AssetDatabase";

const ASSETS_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::assets");

pub(super) fn capability() -> Capability {
    let path = |name| Parameter::required(name, ValueKind::String);
    Capability::new(ASSET_DATABASE)
        .with_method("CopyAsset", [path("from"), path("to")], ValueKind::Bool, copy_asset)
        .with_method("MoveAsset", [path("from"), path("to")], ValueKind::String, move_asset)
        .with_method("DeleteAsset", [path("path")], ValueKind::Bool, delete_asset)
        .with_method("AssetExists", [path("path")], ValueKind::Bool, asset_exists)
        .with_method(
            "FindAssets",
            [Parameter::optional("prefix", ValueKind::String, "")],
            ValueKind::StringArray,
            find_assets,
        )
        .with_method("Refresh", [], ValueKind::Void, refresh)
}

fn copy_asset(state: &mut HostState, args: &Arguments) -> Result<Value, DispatchError> {
    let from = args.text("from")?;
    let to = args.text("to")?;
    let copied = match state.store().copy_asset(from, to) {
        Ok(()) => true,
        Err(error) => {
            debug!(target: ASSETS_TARGET, from, to, %error, "copy failed");
            false
        }
    };
    Ok(Value::Bool(copied))
}

fn move_asset(state: &mut HostState, args: &Arguments) -> Result<Value, DispatchError> {
    let outcome = state
        .store()
        .move_asset(args.text("from")?, args.text("to")?);
    Ok(Value::String(
        outcome.err().map(|error| error.to_string()).unwrap_or_default(),
    ))
}

fn delete_asset(state: &mut HostState, args: &Arguments) -> Result<Value, DispatchError> {
    let path = args.text("path")?;
    let deleted = match state.store().delete_asset(path) {
        Ok(()) => true,
        Err(error) => {
            debug!(target: ASSETS_TARGET, path, %error, "delete failed");
            false
        }
    };
    Ok(Value::Bool(deleted))
}

fn asset_exists(state: &mut HostState, args: &Arguments) -> Result<Value, DispatchError> {
    Ok(Value::Bool(state.store().exists(args.text("path")?)))
}

fn find_assets(state: &mut HostState, args: &Arguments) -> Result<Value, DispatchError> {
    let found = state
        .store()
        .list(args.text("prefix")?)
        .map_err(|error| DispatchError::host_invocation(error.to_string()))?;
    Ok(Value::StringArray(found))
}

fn refresh(_: &mut HostState, _: &Arguments) -> Result<Value, DispatchError> {
    debug!(target: ASSETS_TARGET, "refresh requested; the store has no cache to invalidate");
    Ok(Value::Null)
}
