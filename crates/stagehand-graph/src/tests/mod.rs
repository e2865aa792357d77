//! Crate-level scenario and editor tests.

use crate::catalog::ComponentCatalog;
use crate::editor::AssetEditor;
use crate::node::{ComponentInstance, Node};
use crate::store::AssetStore;
use crate::value::{AssetRef, Value};
use stagehand_config::CommitPolicy;

mod behaviour;

/// Stored asset whose root carries a mesh filter and a lamp child.
pub(crate) fn lamp_asset(mesh: &str) -> Node {
    let mut root = Node::new("lamp");
    let mut filter = ComponentInstance::new("MeshFilter");
    filter.set("mesh", Value::Reference(AssetRef::new(mesh)));
    root.component_or_attach("MeshFilter", || filter);

    let mut bulb = Node::new("Bulb");
    let catalog = ComponentCatalog::builtin();
    if let Some(light) = catalog.get("Light") {
        bulb.component_or_attach("Light", || light.instantiate());
    }
    root.push_child(bulb);
    root
}

pub(crate) fn editor_for<'a>(
    store: &'a dyn AssetStore,
    catalog: &'a ComponentCatalog,
    policy: CommitPolicy,
) -> AssetEditor<'a> {
    AssetEditor::new(store, catalog, policy)
}
