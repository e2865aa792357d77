//! Host and router fixtures backed by an in-memory store.

use std::sync::Arc;

use stagehand_config::CommitPolicy;
use stagehand_graph::{AssetRef, ComponentCatalog, ComponentInstance, MemoryStore, Node, Value};

use crate::capabilities::builtin_registry;
use crate::dispatch::CommandRouter;
use crate::host::{HostExecutor, HostState, ProjectInfo};

/// Asset whose root carries a mesh filter and whose `Bulb` child carries a
/// light.
pub fn lamp_asset(mesh: &str) -> Node {
    let mut root = Node::new("lamp");
    let mut filter = ComponentInstance::new("MeshFilter");
    filter.set("mesh", Value::Reference(AssetRef::new(mesh)));
    root.component_or_attach("MeshFilter", || filter);

    let mut bulb = Node::new("Bulb");
    let catalog = ComponentCatalog::builtin();
    let light = catalog.resolve("Light").expect("built-in light");
    bulb.component_or_attach("Light", || light.instantiate());
    root.push_child(bulb);
    root
}

/// Spawns a host over `store` with the built-in catalog.
pub fn spawn_host(store: Arc<MemoryStore>, policy: CommitPolicy) -> HostExecutor {
    let state = HostState::new(
        Box::new(store),
        ComponentCatalog::builtin(),
        ProjectInfo::new("/project/Assets", "/project", "Linux", "1.2.3"),
        policy,
    );
    HostExecutor::spawn(state).expect("spawn host")
}

/// Router over the built-in registry submitting work to `host`.
pub fn router_for(host: &HostExecutor, strict_arity: bool) -> CommandRouter {
    let registry = builtin_registry(None).expect("built-in registry");
    CommandRouter::new(Arc::new(registry), host.handle(), strict_arity)
}
