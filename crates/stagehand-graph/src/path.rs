//! Slash-delimited component addresses and their resolution against a node.
//!
//! An address such as `Body/Head/Light` names a chain of child nodes
//! (`Body`, then `Head`) followed by a component type (`Light`). Child names
//! match exactly; the component type is looked up in the
//! [`ComponentCatalog`], never in the command capability registry.

use std::fmt;
use std::str::FromStr;

use crate::catalog::{ComponentCatalog, ComponentType};
use crate::error::GraphError;
use crate::node::{ComponentInstance, Node};

/// Separator between address segments.
pub const PATH_DELIMITER: char = '/';

/// A parsed component address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    children: Vec<String>,
    component: String,
}

impl Address {
    /// Parses `segment/.../ComponentType`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidAddress`] when the address is empty or
    /// contains an empty segment.
    pub fn parse(text: &str) -> Result<Self, GraphError> {
        let mut segments: Vec<String> = text.split(PATH_DELIMITER).map(str::to_owned).collect();
        if segments.iter().any(String::is_empty) {
            return Err(GraphError::invalid_address(text));
        }
        let component = segments
            .pop()
            .ok_or_else(|| GraphError::invalid_address(text))?;
        Ok(Self {
            children: segments,
            component,
        })
    }

    /// Returns the child-node segments, root first.
    #[must_use]
    pub fn children(&self) -> &[String] {
        &self.children
    }

    /// Returns the component type segment.
    #[must_use]
    pub fn component(&self) -> &str {
        &self.component
    }

    /// Returns the child path joined with `/`, empty for the root.
    #[must_use]
    pub fn child_path(&self) -> String {
        self.children.join("/")
    }
}

impl FromStr for Address {
    type Err = GraphError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::parse(text)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for child in &self.children {
            write!(f, "{child}{PATH_DELIMITER}")?;
        }
        f.write_str(&self.component)
    }
}

/// A resolved address: the leaf component type and the node it targets.
#[derive(Debug)]
pub struct Resolved<'c, 'g> {
    /// Component type named by the final segment.
    pub component_type: &'c ComponentType,
    /// Node reached by the child path.
    pub node: &'g mut Node,
}

/// Resolves addresses against node hierarchies using a component catalog.
#[derive(Debug, Clone, Copy)]
pub struct PathResolver<'c> {
    catalog: &'c ComponentCatalog,
}

impl<'c> PathResolver<'c> {
    /// Creates a resolver over `catalog`.
    #[must_use]
    pub const fn new(catalog: &'c ComponentCatalog) -> Self {
        Self { catalog }
    }

    /// Returns the catalog used for component type lookup.
    #[must_use]
    pub const fn catalog(&self) -> &'c ComponentCatalog {
        self.catalog
    }

    /// Resolves the leaf type and walks the child path from `root`.
    ///
    /// When `create_missing` is set, every missing segment from the point of
    /// divergence onwards is created as an empty node. Otherwise the first
    /// missing segment fails the call and `root` is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownComponentType`] for an unregistered leaf
    /// type and [`GraphError::ChildNotFound`] for a missing child.
    pub fn resolve<'g>(
        &self,
        address: &Address,
        root: &'g mut Node,
        create_missing: bool,
    ) -> Result<Resolved<'c, 'g>, GraphError> {
        let component_type = self.catalog.resolve(address.component())?;
        if !create_missing {
            find_node(root, address)?;
        }
        let node = walk_creating(root, address)?;
        Ok(Resolved {
            component_type,
            node,
        })
    }

    /// Resolves `address` and attaches a default instance of the leaf type
    /// unless one is already present.
    ///
    /// # Errors
    ///
    /// Propagates [`resolve`](Self::resolve) failures.
    pub fn attach<'g>(
        &self,
        address: &Address,
        root: &'g mut Node,
        create_missing: bool,
    ) -> Result<&'g mut ComponentInstance, GraphError> {
        let Resolved {
            component_type,
            node,
        } = self.resolve(address, root, create_missing)?;
        Ok(node.component_or_attach(component_type.name(), || component_type.instantiate()))
    }

    /// Finds an attached component without creating nodes or components.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownComponentType`],
    /// [`GraphError::ChildNotFound`], or [`GraphError::ComponentNotFound`].
    pub fn locate<'g>(
        &self,
        address: &Address,
        root: &'g Node,
    ) -> Result<(&'c ComponentType, &'g ComponentInstance), GraphError> {
        let component_type = self.catalog.resolve(address.component())?;
        let component = find_node(root, address)?
            .component(component_type.name())
            .ok_or_else(|| GraphError::component_not_found(address.to_string()))?;
        Ok((component_type, component))
    }

    /// Mutable counterpart of [`locate`](Self::locate).
    ///
    /// # Errors
    ///
    /// As [`locate`](Self::locate).
    pub fn locate_mut<'g>(
        &self,
        address: &Address,
        root: &'g mut Node,
    ) -> Result<(&'c ComponentType, &'g mut ComponentInstance), GraphError> {
        let component_type = self.catalog.resolve(address.component())?;
        find_node(root, address)?;
        let component = walk_creating(root, address)?
            .component_mut(component_type.name())
            .ok_or_else(|| GraphError::component_not_found(address.to_string()))?;
        Ok((component_type, component))
    }
}

fn find_node<'g>(root: &'g Node, address: &Address) -> Result<&'g Node, GraphError> {
    address.children().iter().try_fold(root, |node, segment| {
        node.child(segment)
            .ok_or_else(|| GraphError::child_not_found(address.child_path(), segment))
    })
}

fn walk_creating<'g>(root: &'g mut Node, address: &Address) -> Result<&'g mut Node, GraphError> {
    let mut current = root;
    for segment in address.children() {
        let index = match current.child_index(segment) {
            Some(index) => index,
            None => current.push_child(Node::new(segment.clone())),
        };
        current = current
            .child_at_mut(index)
            .ok_or_else(|| GraphError::child_not_found(address.child_path(), segment))?;
    }
    Ok(current)
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn catalog() -> ComponentCatalog {
        ComponentCatalog::builtin()
    }

    #[rstest]
    #[case("Light", &[], "Light")]
    #[case("Foo/Light", &["Foo"], "Light")]
    #[case("Foo/Bar/Rigidbody", &["Foo", "Bar"], "Rigidbody")]
    fn parses_addresses(#[case] text: &str, #[case] children: &[&str], #[case] component: &str) {
        let address = Address::parse(text).expect("valid address");
        assert_eq!(address.children(), children);
        assert_eq!(address.component(), component);
        assert_eq!(address.to_string(), text);
    }

    #[rstest]
    #[case("")]
    #[case("Foo/")]
    #[case("/Light")]
    #[case("Foo//Light")]
    fn rejects_empty_segments(#[case] text: &str) {
        assert!(matches!(
            Address::parse(text),
            Err(GraphError::InvalidAddress { .. })
        ));
    }

    #[rstest]
    fn empty_child_path_targets_the_root(catalog: ComponentCatalog) {
        let resolver = PathResolver::new(&catalog);
        let mut root = Node::new("Root");
        let address = Address::parse("Light").expect("address");

        resolver
            .attach(&address, &mut root, false)
            .expect("attach to root");

        assert!(root.component("Light").is_some());
        assert_eq!(root.node_count(), 1);
    }

    #[rstest]
    fn creates_only_from_the_point_of_divergence(catalog: ComponentCatalog) {
        let resolver = PathResolver::new(&catalog);
        let mut root = Node::new("Root");
        let mut foo = Node::new("Foo");
        foo.push_child(Node::new("Existing"));
        root.push_child(foo);
        let address = Address::parse("Foo/Bar/Baz/Light").expect("address");

        resolver
            .attach(&address, &mut root, true)
            .expect("attach with creation");

        let foo_node = root.child("Foo").expect("Foo kept");
        assert_eq!(foo_node.children().len(), 2);
        assert!(root.descendant(&["Foo", "Bar", "Baz"]).is_some());
        assert_eq!(root.node_count(), 5);
    }

    #[rstest]
    fn unknown_leaf_type_fails_before_walking(catalog: ComponentCatalog) {
        let resolver = PathResolver::new(&catalog);
        let mut root = Node::new("Root");
        let address = Address::parse("Foo/Teleporter").expect("address");

        let error = resolver
            .attach(&address, &mut root, true)
            .expect_err("unknown type");

        assert!(matches!(error, GraphError::UnknownComponentType { .. }));
        assert_eq!(root.node_count(), 1);
    }

    #[rstest]
    fn locate_requires_an_attached_component(catalog: ComponentCatalog) {
        let resolver = PathResolver::new(&catalog);
        let mut root = Node::new("Root");
        root.push_child(Node::new("Body"));
        let address = Address::parse("Body/Light").expect("address");

        let error = resolver.locate(&address, &root).expect_err("no Light yet");
        assert!(matches!(error, GraphError::ComponentNotFound { .. }));

        resolver
            .attach(&address, &mut root, false)
            .expect("attach Light");
        let (component_type, component) = resolver.locate(&address, &root).expect("located");
        assert_eq!(component_type.name(), "Light");
        assert_eq!(component.type_name(), "Light");
    }

    #[rstest]
    fn locate_reports_missing_children_with_the_full_path(catalog: ComponentCatalog) {
        let resolver = PathResolver::new(&catalog);
        let root = Node::new("Root");
        let address = Address::parse("Arm/Hand/Light").expect("address");

        let error = resolver.locate(&address, &root).expect_err("no Arm");
        assert!(matches!(
            error,
            GraphError::ChildNotFound { ref path, ref segment } if path == "Arm/Hand" && segment == "Arm"
        ));
    }
}
