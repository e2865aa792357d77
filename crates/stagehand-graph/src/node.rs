//! Hierarchical asset content: named nodes carrying typed components.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// A component attached to a node, holding property values by canonical name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentInstance {
    type_name: String,
    #[serde(default)]
    properties: BTreeMap<String, Value>,
}

impl ComponentInstance {
    /// Creates a component with no property values.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            properties: BTreeMap::new(),
        }
    }

    /// Returns the component type name.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Returns the value stored under the canonical property name.
    #[must_use]
    pub fn get(&self, property: &str) -> Option<&Value> {
        self.properties.get(property)
    }

    /// Stores a value under the canonical property name.
    pub fn set(&mut self, property: impl Into<String>, value: Value) {
        self.properties.insert(property.into(), value);
    }

    /// Iterates over stored properties in name order.
    pub fn properties(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.properties
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }
}

/// A named node in an asset hierarchy.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Node {
    name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    components: Vec<ComponentInstance>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    children: Vec<Node>,
}

impl Node {
    /// Creates an empty node.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            components: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Returns the node name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Renames the node.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Returns the attached components in attachment order.
    #[must_use]
    pub fn components(&self) -> &[ComponentInstance] {
        &self.components
    }

    /// Returns the direct children in insertion order.
    #[must_use]
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Returns the first direct child with the given name.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children.iter().find(|child| child.name == name)
    }

    /// Returns the position of the first direct child with the given name.
    #[must_use]
    pub fn child_index(&self, name: &str) -> Option<usize> {
        self.children.iter().position(|child| child.name == name)
    }

    /// Returns the direct child at `index`.
    pub fn child_at_mut(&mut self, index: usize) -> Option<&mut Node> {
        self.children.get_mut(index)
    }

    /// Appends a child and returns its position.
    pub fn push_child(&mut self, child: Node) -> usize {
        self.children.push(child);
        self.children.len() - 1
    }

    /// Returns the descendant reached by following `segments` from this node.
    #[must_use]
    pub fn descendant<S: AsRef<str>>(&self, segments: &[S]) -> Option<&Node> {
        segments
            .iter()
            .try_fold(self, |node, segment| node.child(segment.as_ref()))
    }

    /// Returns the first component of the given type.
    #[must_use]
    pub fn component(&self, type_name: &str) -> Option<&ComponentInstance> {
        self.components
            .iter()
            .find(|component| component.type_name == type_name)
    }

    /// Returns the first component of the given type mutably.
    pub fn component_mut(&mut self, type_name: &str) -> Option<&mut ComponentInstance> {
        self.components
            .iter_mut()
            .find(|component| component.type_name == type_name)
    }

    /// Returns the component of the given type, attaching `make()` if absent.
    #[expect(
        clippy::indexing_slicing,
        reason = "index comes from position() or the push immediately before"
    )]
    pub fn component_or_attach(
        &mut self,
        type_name: &str,
        make: impl FnOnce() -> ComponentInstance,
    ) -> &mut ComponentInstance {
        let index = match self
            .components
            .iter()
            .position(|component| component.type_name == type_name)
        {
            Some(index) => index,
            None => {
                self.components.push(make());
                self.components.len() - 1
            }
        };
        &mut self.components[index]
    }

    /// Counts this node and all of its descendants.
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Self::node_count).sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn descendant_follows_segments() {
        let mut root = Node::new("Root");
        let mut body = Node::new("Body");
        body.push_child(Node::new("Head"));
        root.push_child(body);

        assert_eq!(
            root.descendant(&["Body", "Head"]).map(Node::name),
            Some("Head")
        );
        assert!(root.descendant(&["Body", "Tail"]).is_none());
        assert_eq!(root.node_count(), 3);
    }

    #[rstest]
    fn attaching_is_idempotent() {
        let mut node = Node::new("Lamp");
        node.component_or_attach("Light", || ComponentInstance::new("Light"));
        node.component_or_attach("Light", || ComponentInstance::new("Light"));
        assert_eq!(node.components().len(), 1);
    }

    #[rstest]
    fn serialises_without_empty_collections() {
        let json = serde_json::to_value(Node::new("Leaf")).expect("serialise node");
        assert_eq!(json, serde_json::json!({ "name": "Leaf" }));
    }
}
