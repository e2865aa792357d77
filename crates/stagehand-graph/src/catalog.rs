//! Registry of component types and their declared properties.

use std::collections::HashMap;

use crate::error::GraphError;
use crate::node::ComponentInstance;
use crate::value::{EnumType, Value, ValueKind};

/// Light shapes understood by the built-in `Light` component.
pub static LIGHT_TYPE: EnumType =
    EnumType::new("LightType", &["Point", "Spot", "Directional", "Area"]);

/// A property declared by a component type.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDescriptor {
    name: String,
    kind: ValueKind,
    default: Value,
}

impl PropertyDescriptor {
    /// Returns the canonical property name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared kind.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        self.kind
    }

    /// Returns the value held by a freshly attached component.
    #[must_use]
    pub const fn default_value(&self) -> &Value {
        &self.default
    }
}

/// A component type: a name plus its declared properties.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentType {
    name: String,
    properties: Vec<PropertyDescriptor>,
}

impl ComponentType {
    /// Declares a component type with no properties.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: Vec::new(),
        }
    }

    /// Adds a property whose default is the zero value of `kind`.
    #[must_use]
    pub fn with_property(self, name: impl Into<String>, kind: ValueKind) -> Self {
        self.with_property_default(name, kind, kind.default_value())
    }

    /// Adds a property with an explicit default.
    #[must_use]
    pub fn with_property_default(
        mut self,
        name: impl Into<String>,
        kind: ValueKind,
        default: Value,
    ) -> Self {
        self.properties.push(PropertyDescriptor {
            name: name.into(),
            kind,
            default,
        });
        self
    }

    /// Returns the type name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared properties in declaration order.
    #[must_use]
    pub fn properties(&self) -> &[PropertyDescriptor] {
        &self.properties
    }

    /// Finds a property by name, ignoring ASCII case.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::PropertyNotFound`] when no property matches.
    pub fn property(&self, name: &str) -> Result<&PropertyDescriptor, GraphError> {
        self.properties
            .iter()
            .find(|property| property.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| GraphError::property_not_found(&self.name, name))
    }

    /// Creates a component instance holding every declared default.
    #[must_use]
    pub fn instantiate(&self) -> ComponentInstance {
        let mut instance = ComponentInstance::new(&self.name);
        for property in &self.properties {
            instance.set(&property.name, property.default.clone());
        }
        instance
    }
}

/// Component types known to the host, keyed by exact type name.
#[derive(Debug, Clone, Default)]
pub struct ComponentCatalog {
    types: HashMap<String, ComponentType>,
}

impl ComponentCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalog holding the built-in component types.
    #[must_use]
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        for component_type in builtin_types() {
            catalog
                .types
                .insert(component_type.name.clone(), component_type);
        }
        catalog
    }

    /// Registers a component type.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::DuplicateComponentType`] when the name is taken.
    pub fn register(&mut self, component_type: ComponentType) -> Result<(), GraphError> {
        if self.types.contains_key(&component_type.name) {
            return Err(GraphError::DuplicateComponentType {
                name: component_type.name,
            });
        }
        self.types
            .insert(component_type.name.clone(), component_type);
        Ok(())
    }

    /// Returns the type registered under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ComponentType> {
        self.types.get(name)
    }

    /// Returns the type registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownComponentType`] when nothing is registered.
    pub fn resolve(&self, name: &str) -> Result<&ComponentType, GraphError> {
        self.get(name)
            .ok_or_else(|| GraphError::unknown_component_type(name))
    }

    /// Returns the registered type names in sorted order.
    #[must_use]
    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.types.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

fn builtin_types() -> Vec<ComponentType> {
    vec![
        ComponentType::new("Transform").with_property("tag", ValueKind::String),
        ComponentType::new("MeshFilter").with_property("mesh", ValueKind::Reference),
        ComponentType::new("MeshCollider")
            .with_property("sharedMesh", ValueKind::Reference)
            .with_property("convex", ValueKind::Bool)
            .with_property("isTrigger", ValueKind::Bool),
        ComponentType::new("BoxCollider")
            .with_property("isTrigger", ValueKind::Bool)
            .with_property_default("size", ValueKind::Float, Value::Float(1.0)),
        ComponentType::new("Rigidbody")
            .with_property_default("mass", ValueKind::Float, Value::Float(1.0))
            .with_property_default("useGravity", ValueKind::Bool, Value::Bool(true))
            .with_property("isKinematic", ValueKind::Bool),
        ComponentType::new("Light")
            .with_property("type", ValueKind::Enum(&LIGHT_TYPE))
            .with_property_default("intensity", ValueKind::Float, Value::Float(1.0))
            .with_property_default("range", ValueKind::Float, Value::Float(10.0))
            .with_property("cookie", ValueKind::Reference),
        ComponentType::new("Grabbable")
            .with_property_default("enabled", ValueKind::Bool, Value::Bool(true)),
        ComponentType::new("Labels").with_property("values", ValueKind::StringArray),
    ]
}
