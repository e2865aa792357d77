//! Asset-level edits: component attachment, property writes, reference
//! copies, merges, and collider assets.

use stagehand_config::CommitPolicy;
use tracing::debug;

use crate::catalog::ComponentCatalog;
use crate::error::GraphError;
use crate::mutation::{asset_name, mutate};
use crate::path::{Address, PathResolver};
use crate::store::AssetStore;
use crate::value::{Value, ValueKind, marshal};

const EDITOR_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::editor");

/// Component type name whose `mesh` property feeds collider assets.
pub const MESH_FILTER: &str = "MeshFilter";
/// Component type name attached by [`AssetEditor::create_collider_asset`].
pub const MESH_COLLIDER: &str = "MeshCollider";
/// Component type name marking an asset as grabbable.
pub const GRABBABLE: &str = "Grabbable";

/// A property value read from an asset, with its declared kind.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyValue {
    /// Declared kind of the property.
    pub kind: ValueKind,
    /// Stored value.
    pub value: Value,
}

/// Edits stored assets through scoped working nodes.
#[derive(Clone, Copy)]
pub struct AssetEditor<'a> {
    store: &'a dyn AssetStore,
    catalog: &'a ComponentCatalog,
    policy: CommitPolicy,
}

impl<'a> AssetEditor<'a> {
    /// Creates an editor over `store` using `catalog` for component types.
    #[must_use]
    pub const fn new(
        store: &'a dyn AssetStore,
        catalog: &'a ComponentCatalog,
        policy: CommitPolicy,
    ) -> Self {
        Self {
            store,
            catalog,
            policy,
        }
    }

    /// Returns the underlying store.
    #[must_use]
    pub const fn store(&self) -> &'a dyn AssetStore {
        self.store
    }

    const fn resolver(&self) -> PathResolver<'a> {
        PathResolver::new(self.catalog)
    }

    /// Attaches the component named by `address` to `asset`, creating
    /// missing children when `create_missing` is set.
    ///
    /// # Errors
    ///
    /// Returns address, component type, child, or store errors.
    pub fn add_component(
        &self,
        asset: &str,
        address: &str,
        create_missing: bool,
    ) -> Result<(), GraphError> {
        let parsed = Address::parse(address)?;
        self.catalog.resolve(parsed.component())?;
        let resolver = self.resolver();
        mutate(self.store, Some(asset), asset, self.policy, |root| {
            resolver.attach(&parsed, root, create_missing).map(drop)
        })
    }

    /// Marshals `text` against the declared kind of `property` and stores it
    /// on the component at `address` in `asset`.
    ///
    /// # Errors
    ///
    /// Returns marshal errors before the asset is opened, and child,
    /// component, or store errors from the edit itself.
    pub fn set_value(
        &self,
        asset: &str,
        address: &str,
        property: &str,
        text: &str,
    ) -> Result<(), GraphError> {
        let parsed = Address::parse(address)?;
        let descriptor = self.catalog.resolve(parsed.component())?.property(property)?;
        let value = marshal(text, descriptor.kind())?;
        let canonical = descriptor.name().to_owned();
        let resolver = self.resolver();
        mutate(self.store, Some(asset), asset, self.policy, |root| {
            let (_, component) = resolver.locate_mut(&parsed, root)?;
            component.set(canonical, value);
            Ok(())
        })
    }

    /// Reads `property` from the component at `address` in `asset`.
    ///
    /// # Errors
    ///
    /// Returns address, child, component, property, or store errors.
    pub fn get_value(
        &self,
        asset: &str,
        address: &str,
        property: &str,
    ) -> Result<PropertyValue, GraphError> {
        let parsed = Address::parse(address)?;
        let root = self.store.load(asset)?;
        let (component_type, component) = self.resolver().locate(&parsed, &root)?;
        let descriptor = component_type.property(property)?;
        let value = component
            .get(descriptor.name())
            .cloned()
            .unwrap_or_else(|| descriptor.default_value().clone());
        Ok(PropertyValue {
            kind: descriptor.kind(),
            value,
        })
    }

    /// Copies a property value from one asset's component to another's.
    ///
    /// The declared kinds of both properties are compared before the target
    /// is opened, so a mismatch never writes the target.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::TypeMismatch`] when the declared kinds differ,
    /// plus any lookup or store error on either side.
    pub fn copy_reference(
        &self,
        source: &str,
        source_address: &str,
        source_property: &str,
        target: &str,
        target_address: &str,
        target_property: &str,
    ) -> Result<(), GraphError> {
        let read = self.get_value(source, source_address, source_property)?;
        let parsed_target = Address::parse(target_address)?;
        let descriptor = self
            .catalog
            .resolve(parsed_target.component())?
            .property(target_property)?;
        if descriptor.kind() != read.kind {
            return Err(GraphError::type_mismatch(
                read.kind.type_name(),
                descriptor.kind().type_name(),
            ));
        }
        let canonical = descriptor.name().to_owned();
        let resolver = self.resolver();
        mutate(self.store, Some(target), target, self.policy, |root| {
            let (_, component) = resolver.locate_mut(&parsed_target, root)?;
            component.set(canonical, read.value);
            Ok(())
        })
    }

    /// Combines `assets` into `target`.
    ///
    /// Several assets become children of a fresh node saved at `target`,
    /// each named after its asset. A single asset is copied verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::EmptyMerge`] for no assets, or store errors.
    pub fn merge<S: AsRef<str>>(&self, assets: &[S], target: &str) -> Result<(), GraphError> {
        match assets {
            [] => Err(GraphError::EmptyMerge),
            [single] => {
                self.store.copy_asset(single.as_ref(), target)?;
                Ok(())
            }
            many => {
                let store = self.store;
                mutate(store, None, target, self.policy, |root| {
                    for asset in many {
                        let mut child = store.load(asset.as_ref())?;
                        child.set_name(asset_name(asset.as_ref()));
                        root.push_child(child);
                    }
                    debug!(
                        target: EDITOR_TARGET,
                        target_path = target,
                        merged = many.len(),
                        "merged assets"
                    );
                    Ok(())
                })
            }
        }
    }

    /// Creates a collider asset at `target` sharing the mesh of `mesh_asset`.
    ///
    /// The new root carries a convex `MeshCollider` whose `sharedMesh` is the
    /// `MeshFilter.mesh` of the source root, plus `Grabbable` when requested.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::ComponentNotFound`] when the source root has no
    /// mesh filter, or catalog and store errors.
    pub fn create_collider_asset(
        &self,
        mesh_asset: &str,
        target: &str,
        grabbable: bool,
    ) -> Result<(), GraphError> {
        let mesh = self.get_value(mesh_asset, MESH_FILTER, "mesh")?.value;
        let collider = self.catalog.resolve(MESH_COLLIDER)?;
        let grab = if grabbable {
            Some(self.catalog.resolve(GRABBABLE)?)
        } else {
            None
        };
        mutate(self.store, None, target, self.policy, |root| {
            let component = root.component_or_attach(collider.name(), || collider.instantiate());
            component.set(collider.property("sharedMesh")?.name(), mesh);
            component.set(collider.property("convex")?.name(), Value::Bool(true));
            if let Some(grab_type) = grab {
                root.component_or_attach(grab_type.name(), || grab_type.instantiate());
            }
            Ok(())
        })
    }
}

impl std::fmt::Debug for AssetEditor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetEditor")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
