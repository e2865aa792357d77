//! Object-graph model for the stagehand daemon.
//!
//! Assets are trees of named [`Node`]s carrying typed components. This crate
//! provides:
//!
//! - the value model and textual parameter marshaler ([`marshal`]);
//! - the [`ComponentCatalog`] of component types and their properties;
//! - [`Address`] parsing and the [`PathResolver`], which walks or creates
//!   child chains and attaches components;
//! - the [`AssetStore`] abstraction with in-memory and filesystem backends;
//! - [`MutationScope`], which owns a working node and commits it on release;
//! - [`AssetEditor`], the asset-level operations built on top of these.

mod catalog;
mod editor;
mod error;
mod mutation;
mod node;
mod path;
mod store;
mod value;

#[cfg(test)]
mod tests;

pub use catalog::{ComponentCatalog, ComponentType, LIGHT_TYPE, PropertyDescriptor};
pub use editor::{AssetEditor, GRABBABLE, MESH_COLLIDER, MESH_FILTER, PropertyValue};
pub use error::{GraphError, MarshalError, StoreError};
pub use mutation::{CloseOutcome, MutationScope, asset_name, mutate};
pub use node::{ComponentInstance, Node};
pub use path::{Address, PATH_DELIMITER, PathResolver, Resolved};
pub use store::{AssetStore, FsStore, MemoryStore};
pub use value::{ARRAY_DELIMITER, AssetRef, EnumType, Value, ValueKind, marshal};
