//! Capability surfaces and case-insensitive member resolution.

use stagehand_graph::{Value, ValueKind};

use super::binding::Arguments;
use super::errors::DispatchError;
use crate::host::HostState;

/// Entry point of a method member. Runs on the host thread.
pub type MethodFn = fn(&mut HostState, &Arguments) -> Result<Value, DispatchError>;

/// Reader of a property member. Runs on the host thread.
pub type PropertyFn = fn(&HostState) -> Result<Value, DispatchError>;

/// A declared method parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parameter {
    name: &'static str,
    kind: ValueKind,
    default: Option<&'static str>,
}

impl Parameter {
    /// Declares a parameter that must be supplied.
    #[must_use]
    pub const fn required(name: &'static str, kind: ValueKind) -> Self {
        Self {
            name,
            kind,
            default: None,
        }
    }

    /// Declares a parameter marshaled from `default` when omitted.
    #[must_use]
    pub const fn optional(name: &'static str, kind: ValueKind, default: &'static str) -> Self {
        Self {
            name,
            kind,
            default: Some(default),
        }
    }

    /// Parameter name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Declared kind.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        self.kind
    }

    /// Textual default, if any.
    #[must_use]
    pub const fn default(&self) -> Option<&'static str> {
        self.default
    }
}

/// An invokable method.
#[derive(Debug, Clone)]
pub struct Method {
    name: &'static str,
    parameters: Vec<Parameter>,
    returns: ValueKind,
    invoke: MethodFn,
}

impl Method {
    /// Method name as declared.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Declared parameters in order.
    #[must_use]
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Declared return kind.
    #[must_use]
    pub const fn returns(&self) -> ValueKind {
        self.returns
    }

    /// Entry point.
    #[must_use]
    pub const fn invoke(&self) -> MethodFn {
        self.invoke
    }
}

/// A readable property.
#[derive(Debug, Clone)]
pub struct Property {
    name: &'static str,
    kind: ValueKind,
    read: PropertyFn,
}

impl Property {
    /// Property name as declared.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Declared kind.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        self.kind
    }

    /// Reader.
    #[must_use]
    pub const fn read(&self) -> PropertyFn {
        self.read
    }
}

/// A member of a capability.
#[derive(Debug, Clone)]
pub enum Member {
    /// Method call.
    Method(Method),
    /// Property read.
    Property(Property),
}

impl Member {
    /// Declared member name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Method(method) => method.name,
            Self::Property(property) => property.name,
        }
    }

    /// Return kind of a method, value kind of a property.
    #[must_use]
    pub const fn declared_kind(&self) -> ValueKind {
        match self {
            Self::Method(method) => method.returns,
            Self::Property(property) => property.kind,
        }
    }

    const fn is_method(&self) -> bool {
        matches!(self, Self::Method(_))
    }
}

/// A named, immutable set of members.
#[derive(Debug, Clone)]
pub struct Capability {
    name: String,
    members: Vec<Member>,
}

impl Capability {
    /// Starts an empty capability.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
        }
    }

    /// Adds a method.
    #[must_use]
    pub fn with_method(
        mut self,
        name: &'static str,
        parameters: impl IntoIterator<Item = Parameter>,
        returns: ValueKind,
        invoke: MethodFn,
    ) -> Self {
        self.members.push(Member::Method(Method {
            name,
            parameters: parameters.into_iter().collect(),
            returns,
            invoke,
        }));
        self
    }

    /// Adds a property.
    #[must_use]
    pub fn with_property(mut self, name: &'static str, kind: ValueKind, read: PropertyFn) -> Self {
        self.members
            .push(Member::Property(Property { name, kind, read }));
        self
    }

    /// Capability name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Members in declaration order.
    #[must_use]
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Finds the first declared member of the requested kind whose name
    /// matches `name` ignoring ASCII case.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::MemberNotFound`] when nothing matches.
    pub fn resolve_member(&self, name: &str, is_method: bool) -> Result<&Member, DispatchError> {
        let wanted = name.trim();
        self.members
            .iter()
            .find(|member| member.is_method() == is_method && member.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DispatchError::member_not_found(&self.name, wanted, is_method))
    }
}
