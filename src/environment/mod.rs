//! Named sets of substitution variables.
//!
//! Environments are created and stored by the caller; this crate only reads
//! the selected one when resolving a request template.

mod substitute;

pub use substitute::substitute;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A named map of `{{variable}}` values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    /// Opaque identifier assigned by whoever stores environments.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Variable name to replacement value.
    #[serde(default)]
    pub variables: HashMap<String, String>,
}

impl Environment {
    /// Creates an empty environment.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            variables: HashMap::new(),
        }
    }

    /// Adds or replaces a variable, returning the environment for chaining.
    #[must_use]
    pub fn with_variable(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(key.into(), value.into());
        self
    }

    /// Looks up a variable by name.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(String::as_str)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_deserializes_collaborator_json() {
        let json = r#"{"id":"5E2F","name":"Staging","variables":{"host":"staging.example.test"}}"#;
        let environment: Environment = serde_json::from_str(json).unwrap();
        assert_eq!(environment.name, "Staging");
        assert_eq!(environment.get("host"), Some("staging.example.test"));
    }

    #[test]
    fn test_environment_without_variables_field_is_empty() {
        let environment: Environment =
            serde_json::from_str(r#"{"id":"1","name":"Bare"}"#).unwrap();
        assert!(environment.variables.is_empty());
    }

    #[test]
    fn test_with_variable_overwrites_existing_key() {
        let environment = Environment::new("1", "Local")
            .with_variable("token", "old")
            .with_variable("token", "new");
        assert_eq!(environment.get("token"), Some("new"));
        assert_eq!(environment.variables.len(), 1);
    }
}
