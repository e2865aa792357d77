//! Error types for object-graph addressing, persistence, and marshaling.

use std::io;

use thiserror::Error;

/// Errors raised while converting textual parameters into typed values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarshalError {
    /// The text named no member of the declared enumeration.
    #[error("failed to parse enum value '{value}' as {type_name}")]
    InvalidEnumValue {
        /// Declared enumeration name.
        type_name: &'static str,
        /// Rejected text.
        value: String,
    },
    /// The text could not be parsed as the declared type.
    #[error("cannot convert '{value}' to {target}")]
    TypeConversion {
        /// Rejected text.
        value: String,
        /// Name of the declared type.
        target: &'static str,
    },
}

/// Errors raised by [`AssetStore`](crate::AssetStore) implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No asset exists at the path.
    #[error("asset not found: {path}")]
    NotFound {
        /// Requested store path.
        path: String,
    },
    /// The path escapes the store or is otherwise unusable.
    #[error("invalid asset path '{path}': {reason}")]
    InvalidPath {
        /// Rejected store path.
        path: String,
        /// Why the path was rejected.
        reason: &'static str,
    },
    /// Reading or writing the backing storage failed.
    #[error("IO error for asset {path}: {source}")]
    Io {
        /// Store path being accessed.
        path: String,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// Serialising a node failed.
    #[error("failed to encode asset {path}: {source}")]
    Encode {
        /// Store path being written.
        path: String,
        /// Underlying serialisation error.
        #[source]
        source: serde_json::Error,
    },
    /// Stored content is not a valid node.
    #[error("failed to decode asset {path}: {source}")]
    Decode {
        /// Store path being read.
        path: String,
        /// Underlying deserialisation error.
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    /// Creates a not-found error.
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Creates an IO error for the given store path.
    pub fn io(path: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors returned by path resolution and asset mutation.
#[derive(Debug, Error)]
pub enum GraphError {
    /// The address was empty or contained an empty segment.
    #[error("invalid component address '{address}'")]
    InvalidAddress {
        /// Rejected address text.
        address: String,
    },
    /// The leaf segment named no registered component type.
    #[error("Not found component: {name}")]
    UnknownComponentType {
        /// Requested type name.
        name: String,
    },
    /// A component type with the same name is already registered.
    #[error("component type '{name}' is already registered")]
    DuplicateComponentType {
        /// Conflicting type name.
        name: String,
    },
    /// A segment of the child path does not exist and creation was not allowed.
    #[error("Not found child chain: {path} (missing '{segment}')")]
    ChildNotFound {
        /// Full child path that was being resolved.
        path: String,
        /// First segment that could not be found.
        segment: String,
    },
    /// The resolved node carries no component of the requested type.
    #[error("Not found the specified component: {address}")]
    ComponentNotFound {
        /// Address that was resolved.
        address: String,
    },
    /// The component type declares no property with the requested name.
    #[error("component {component} has no property '{property}'")]
    PropertyNotFound {
        /// Component type name.
        component: String,
        /// Requested property name.
        property: String,
    },
    /// Source and target properties have different declared types.
    #[error("Source and Target property types are not same! ({source_type} vs {target_type})")]
    TypeMismatch {
        /// Declared type of the source property.
        source_type: String,
        /// Declared type of the target property.
        target_type: String,
    },
    /// No assets were supplied to a merge.
    #[error("merge requires at least one asset")]
    EmptyMerge,
    /// A textual value could not be marshaled.
    #[error(transparent)]
    Marshal(#[from] MarshalError),
    /// The asset store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl GraphError {
    /// Creates an invalid address error.
    pub fn invalid_address(address: impl Into<String>) -> Self {
        Self::InvalidAddress {
            address: address.into(),
        }
    }

    /// Creates an unknown component type error.
    pub fn unknown_component_type(name: impl Into<String>) -> Self {
        Self::UnknownComponentType { name: name.into() }
    }

    /// Creates a child-not-found error.
    pub fn child_not_found(path: impl Into<String>, segment: impl Into<String>) -> Self {
        Self::ChildNotFound {
            path: path.into(),
            segment: segment.into(),
        }
    }

    /// Creates a component-not-found error.
    pub fn component_not_found(address: impl Into<String>) -> Self {
        Self::ComponentNotFound {
            address: address.into(),
        }
    }

    /// Creates a property-not-found error.
    pub fn property_not_found(component: impl Into<String>, property: impl Into<String>) -> Self {
        Self::PropertyNotFound {
            component: component.into(),
            property: property.into(),
        }
    }

    /// Creates a type mismatch error.
    pub fn type_mismatch(source_type: impl Into<String>, target_type: impl Into<String>) -> Self {
        Self::TypeMismatch {
            source_type: source_type.into(),
            target_type: target_type.into(),
        }
    }
}
