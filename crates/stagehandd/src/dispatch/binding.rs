//! Binds textual command parameters to a method's declared parameters.
//!
//! Parameters pair with the declaration in order. By default the pairing is
//! zip-style: surplus text is dropped and omitted trailing parameters fall
//! back to their declared default or stay unbound. Strict binding rejects
//! any count outside `required..=declared`.

use stagehand_graph::{Value, marshal};
use tracing::debug;

use super::errors::DispatchError;
use super::member::Method;
use super::router::DISPATCH_TARGET;

/// Marshaled arguments keyed by parameter name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    values: Vec<(&'static str, Value)>,
}

impl Arguments {
    /// Number of bound parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Reports whether nothing was bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the bound value of `name`.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::HostInvocation`] when the parameter was not
    /// supplied and has no default.
    pub fn value(&self, name: &str) -> Result<&Value, DispatchError> {
        self.values
            .iter()
            .find(|(bound, _)| *bound == name)
            .map(|(_, value)| value)
            .ok_or_else(|| DispatchError::host_invocation(format!("missing argument '{name}'")))
    }

    /// Returns a text argument.
    ///
    /// # Errors
    ///
    /// As [`value`](Self::value), or when the argument is not text.
    pub fn text(&self, name: &str) -> Result<&str, DispatchError> {
        match self.value(name)? {
            Value::String(text) => Ok(text),
            other => Err(unexpected(name, "string", other)),
        }
    }

    /// Returns a boolean argument.
    ///
    /// # Errors
    ///
    /// As [`value`](Self::value), or when the argument is not a boolean.
    pub fn flag(&self, name: &str) -> Result<bool, DispatchError> {
        match self.value(name)? {
            Value::Bool(flag) => Ok(*flag),
            other => Err(unexpected(name, "bool", other)),
        }
    }

    /// Returns a string-array argument.
    ///
    /// # Errors
    ///
    /// As [`value`](Self::value), or when the argument is not a string array.
    pub fn list(&self, name: &str) -> Result<&[String], DispatchError> {
        match self.value(name)? {
            Value::StringArray(items) => Ok(items),
            other => Err(unexpected(name, "string[]", other)),
        }
    }
}

fn unexpected(name: &str, wanted: &str, found: &Value) -> DispatchError {
    DispatchError::host_invocation(format!(
        "argument '{name}' is not a {wanted} (found {found:?})"
    ))
}

/// Marshals `supplied` against the parameters of `method`.
///
/// # Errors
///
/// Returns marshal errors for the first argument that fails to convert, and
/// [`DispatchError::ArityMismatch`] under strict binding.
pub fn bind(method: &Method, supplied: &[String], strict: bool) -> Result<Arguments, DispatchError> {
    let declared = method.parameters();
    if strict {
        let required = declared
            .iter()
            .filter(|parameter| parameter.default().is_none())
            .count();
        if supplied.len() > declared.len() || supplied.len() < required {
            return Err(DispatchError::arity_mismatch(
                method.name(),
                declared.len(),
                supplied.len(),
            ));
        }
    } else if supplied.len() > declared.len() {
        debug!(
            target: DISPATCH_TARGET,
            method = method.name(),
            declared = declared.len(),
            supplied = supplied.len(),
            "dropping surplus parameters"
        );
    }

    let mut values = Vec::with_capacity(declared.len());
    for (index, parameter) in declared.iter().enumerate() {
        let text = supplied
            .get(index)
            .map(String::as_str)
            .or_else(|| parameter.default());
        if let Some(text) = text {
            values.push((parameter.name(), marshal(text, parameter.kind())?));
        }
    }
    Ok(Arguments { values })
}
