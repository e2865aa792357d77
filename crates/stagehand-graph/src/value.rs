//! Typed property values and the textual parameter marshaler.
//!
//! Commands arrive with every argument encoded as text. [`marshal`] turns a
//! single argument into a [`Value`] of the declared [`ValueKind`]:
//!
//! - string arrays are split on [`ARRAY_DELIMITER`];
//! - enumerations match a declared member name ignoring ASCII case;
//! - every other kind uses the standard scalar conversion for that type.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::MarshalError;

/// Separator used to encode string arrays as a single text argument.
pub const ARRAY_DELIMITER: &str = "%@%";

/// A declared enumeration type and its members in declaration order.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct EnumType {
    name: &'static str,
    members: &'static [&'static str],
}

impl EnumType {
    /// Declares an enumeration type.
    #[must_use]
    pub const fn new(name: &'static str, members: &'static [&'static str]) -> Self {
        Self { name, members }
    }

    /// Returns the enumeration name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the declared members.
    #[must_use]
    pub const fn members(&self) -> &'static [&'static str] {
        self.members
    }

    /// Returns the canonical member matching `text`, ignoring ASCII case.
    #[must_use]
    pub fn member(&self, text: &str) -> Option<&'static str> {
        let wanted = text.trim();
        self.members
            .iter()
            .copied()
            .find(|member| member.eq_ignore_ascii_case(wanted))
    }

    /// Returns the first declared member, used as the default value.
    #[must_use]
    pub fn first(&self) -> Option<&'static str> {
        self.members.first().copied()
    }
}

/// Declared type of a parameter, property, or return value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// No value. Only valid as a return type.
    Void,
    /// Boolean.
    Bool,
    /// Signed 64-bit integer.
    Int,
    /// 64-bit float.
    Float,
    /// Text.
    String,
    /// Sequence of text values.
    StringArray,
    /// Member of a declared enumeration.
    Enum(&'static EnumType),
    /// Reference to another asset.
    Reference,
}

impl ValueKind {
    /// Returns the name used for this kind in responses and errors.
    #[must_use]
    pub const fn type_name(self) -> &'static str {
        match self {
            Self::Void => "void",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::String => "string",
            Self::StringArray => "string[]",
            Self::Enum(enum_type) => enum_type.name(),
            Self::Reference => "reference",
        }
    }

    /// Returns the value a freshly attached property of this kind holds.
    #[must_use]
    pub fn default_value(self) -> Value {
        match self {
            Self::Void | Self::Reference => Value::Null,
            Self::Bool => Value::Bool(false),
            Self::Int => Value::Int(0),
            Self::Float => Value::Float(0.0),
            Self::String => Value::String(String::new()),
            Self::StringArray => Value::StringArray(Vec::new()),
            Self::Enum(enum_type) => enum_type
                .first()
                .map_or(Value::Null, |member| Value::enum_member(enum_type, member)),
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// A reference to an asset in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRef {
    /// Store path of the referenced asset.
    pub path: String,
}

impl AssetRef {
    /// Creates a reference to `path`.
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

/// A typed value held by a property or returned by a command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Value {
    /// Absent value: void results and unset references.
    Null,
    /// Boolean.
    Bool(bool),
    /// Integer.
    Int(i64),
    /// Float.
    Float(f64),
    /// Text.
    String(String),
    /// Sequence of text values.
    StringArray(Vec<String>),
    /// Enumeration member.
    Enum {
        /// Declared enumeration name.
        type_name: String,
        /// Canonical member name.
        member: String,
    },
    /// Asset reference.
    Reference(AssetRef),
}

impl Value {
    /// Creates an enumeration value.
    #[must_use]
    pub fn enum_member(enum_type: &EnumType, member: &str) -> Self {
        Self::Enum {
            type_name: enum_type.name().to_owned(),
            member: member.to_owned(),
        }
    }

    /// Reports whether the value may be stored in a slot of `kind`.
    #[must_use]
    pub fn conforms_to(&self, kind: ValueKind) -> bool {
        match (self, kind) {
            (Self::Null, ValueKind::Void | ValueKind::Reference)
            | (Self::Bool(_), ValueKind::Bool)
            | (Self::Int(_), ValueKind::Int)
            | (Self::Float(_), ValueKind::Float)
            | (Self::String(_), ValueKind::String)
            | (Self::StringArray(_), ValueKind::StringArray)
            | (Self::Reference(_), ValueKind::Reference) => true,
            (Self::Enum { type_name, member }, ValueKind::Enum(enum_type)) => {
                type_name == enum_type.name() && enum_type.members().contains(&member.as_str())
            }
            _ => false,
        }
    }

    /// Renders the value as plain JSON for response payloads.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as Json;
        match self {
            Self::Null => Json::Null,
            Self::Bool(value) => Json::Bool(*value),
            Self::Int(value) => Json::from(*value),
            Self::Float(value) => serde_json::Number::from_f64(*value).map_or(Json::Null, Json::Number),
            Self::String(value) => Json::String(value.clone()),
            Self::StringArray(values) => Json::from(values.clone()),
            Self::Enum { member, .. } => Json::String(member.clone()),
            Self::Reference(asset) => serde_json::json!({ "asset": asset.path }),
        }
    }
}

impl fmt::Display for Value {
    /// Renders the value in the same textual form [`marshal`] accepts.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::String(value) => f.write_str(value),
            Self::StringArray(values) => f.write_str(&values.join(ARRAY_DELIMITER)),
            Self::Enum { member, .. } => f.write_str(member),
            Self::Reference(asset) => f.write_str(&asset.path),
        }
    }
}

/// Converts a textual argument into a value of the declared kind.
///
/// # Errors
///
/// Returns [`MarshalError::InvalidEnumValue`] when an enumeration member does
/// not exist and [`MarshalError::TypeConversion`] when scalar parsing fails.
///
/// # Examples
///
/// ```
/// use stagehand_graph::{Value, ValueKind, marshal};
///
/// let value = marshal("a%@%b", ValueKind::StringArray).expect("array");
/// assert_eq!(value, Value::StringArray(vec!["a".into(), "b".into()]));
/// ```
pub fn marshal(text: &str, kind: ValueKind) -> Result<Value, MarshalError> {
    let conversion = || MarshalError::TypeConversion {
        value: text.to_owned(),
        target: kind.type_name(),
    };
    match kind {
        ValueKind::Void => Err(conversion()),
        ValueKind::Bool => parse_bool(text).map(Value::Bool).ok_or_else(conversion),
        ValueKind::Int => text
            .trim()
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| conversion()),
        ValueKind::Float => text
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .map(Value::Float)
            .ok_or_else(conversion),
        ValueKind::String => Ok(Value::String(text.to_owned())),
        ValueKind::StringArray => Ok(Value::StringArray(
            text.split(ARRAY_DELIMITER).map(str::to_owned).collect(),
        )),
        ValueKind::Enum(enum_type) => enum_type
            .member(text)
            .map(|member| Value::enum_member(enum_type, member))
            .ok_or_else(|| MarshalError::InvalidEnumValue {
                type_name: enum_type.name(),
                value: text.to_owned(),
            }),
        ValueKind::Reference => {
            let path = text.trim();
            if path.is_empty() {
                Ok(Value::Null)
            } else {
                Ok(Value::Reference(AssetRef::new(path)))
            }
        }
    }
}

fn parse_bool(text: &str) -> Option<bool> {
    let trimmed = text.trim();
    if trimmed.eq_ignore_ascii_case("true") {
        Some(true)
    } else if trimmed.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    static DIRECTION: EnumType = EnumType::new("Direction", &["North", "South"]);

    #[rstest]
    #[case("a%@%b%@%c", &["a", "b", "c"])]
    #[case("single", &["single"])]
    #[case("", &[""])]
    #[case("a%@%", &["a", ""])]
    fn splits_string_arrays_on_the_delimiter(#[case] text: &str, #[case] expected: &[&str]) {
        let value = marshal(text, ValueKind::StringArray).expect("string arrays always marshal");
        let expected = expected.iter().map(|item| (*item).to_owned()).collect();
        assert_eq!(value, Value::StringArray(expected));
    }

    #[rstest]
    #[case("north", "North")]
    #[case("SOUTH", "South")]
    #[case("North", "North")]
    fn matches_enum_members_ignoring_case(#[case] text: &str, #[case] expected: &str) {
        let value = marshal(text, ValueKind::Enum(&DIRECTION)).expect("member should match");
        assert_eq!(value, Value::enum_member(&DIRECTION, expected));
    }

    #[rstest]
    fn rejects_unknown_enum_members() {
        let error = marshal("East", ValueKind::Enum(&DIRECTION)).expect_err("East is undeclared");
        assert_eq!(
            error,
            MarshalError::InvalidEnumValue {
                type_name: "Direction",
                value: String::from("East"),
            }
        );
    }

    #[rstest]
    #[case("42", ValueKind::Int, Value::Int(42))]
    #[case(" -7 ", ValueKind::Int, Value::Int(-7))]
    #[case("2.5", ValueKind::Float, Value::Float(2.5))]
    #[case("True", ValueKind::Bool, Value::Bool(true))]
    #[case("false", ValueKind::Bool, Value::Bool(false))]
    #[case("hello", ValueKind::String, Value::String(String::from("hello")))]
    #[case("Assets/a.prefab", ValueKind::Reference, Value::Reference(AssetRef::new("Assets/a.prefab")))]
    #[case("", ValueKind::Reference, Value::Null)]
    fn converts_scalars(#[case] text: &str, #[case] kind: ValueKind, #[case] expected: Value) {
        assert_eq!(marshal(text, kind).expect("conversion should succeed"), expected);
    }

    #[rstest]
    #[case("forty", ValueKind::Int)]
    #[case("1.5", ValueKind::Int)]
    #[case("yes", ValueKind::Bool)]
    #[case("x", ValueKind::Float)]
    #[case("NaN", ValueKind::Float)]
    #[case("inf", ValueKind::Float)]
    #[case("-inf", ValueKind::Float)]
    #[case("anything", ValueKind::Void)]
    fn reports_conversion_failures(#[case] text: &str, #[case] kind: ValueKind) {
        let error = marshal(text, kind).expect_err("conversion should fail");
        assert!(matches!(error, MarshalError::TypeConversion { .. }));
    }

    #[rstest]
    fn enum_defaults_to_first_member() {
        assert_eq!(
            ValueKind::Enum(&DIRECTION).default_value(),
            Value::enum_member(&DIRECTION, "North")
        );
    }

    #[rstest]
    fn conformance_checks_enum_membership() {
        let value = Value::enum_member(&DIRECTION, "South");
        assert!(value.conforms_to(ValueKind::Enum(&DIRECTION)));
        assert!(!value.conforms_to(ValueKind::String));
        assert!(Value::Null.conforms_to(ValueKind::Reference));
    }

    #[rstest]
    fn renders_plain_json() {
        assert_eq!(Value::Int(3).to_json(), serde_json::json!(3));
        assert_eq!(
            Value::enum_member(&DIRECTION, "South").to_json(),
            serde_json::json!("South")
        );
        assert_eq!(
            Value::Reference(AssetRef::new("Assets/m.mesh")).to_json(),
            serde_json::json!({ "asset": "Assets/m.mesh" })
        );
    }

    #[rstest]
    #[case(Value::StringArray(vec!["a".into(), "b".into()]), "a%@%b")]
    #[case(Value::enum_member(&DIRECTION, "North"), "North")]
    #[case(Value::Reference(AssetRef::new("Assets/m.mesh")), "Assets/m.mesh")]
    #[case(Value::Bool(true), "true")]
    #[case(Value::Null, "")]
    fn displays_in_marshal_form(#[case] value: Value, #[case] expected: &str) {
        assert_eq!(value.to_string(), expected);
    }
}
