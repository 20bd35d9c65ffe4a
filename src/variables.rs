//! Agent variable table
//!
//! Named, dynamically-typed variable bindings owned by an `AgentState`.
//! Values are arbitrary JSON so any serde-representable type can be stored.

use crate::document::DocumentNode;
use crate::error::{Result, StateError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;

const VARS_TAG: &str = "vars";
const VAR_TAG: &str = "var";
const NAME_ATTR: &str = "name";
const VALUE_ATTR: &str = "value";

/// Variable bindings of one agent
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Variables {
    values: BTreeMap<String, serde_json::Value>,
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a raw variable value
    pub fn get(&self, name: &str) -> Option<&serde_json::Value> {
        self.values.get(name)
    }

    /// Get a variable decoded as `T`
    ///
    /// Returns `Ok(None)` when the variable is not bound.
    pub fn get_as<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>> {
        match self.values.get(name) {
            Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
            None => Ok(None),
        }
    }

    /// Bind a variable, returning the previous value
    pub fn set(
        &mut self,
        name: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Option<serde_json::Value> {
        self.values.insert(name.into(), value.into())
    }

    /// Bind a variable from any serializable value
    pub fn set_as<T: Serialize>(&mut self, name: impl Into<String>, value: &T) -> Result<()> {
        self.values.insert(name.into(), serde_json::to_value(value)?);
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> Option<serde_json::Value> {
        self.values.remove(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over bindings in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &serde_json::Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Replace `target`'s bindings with an independent copy of ours
    pub fn copy_to(&self, target: &mut Variables) {
        target.values.clone_from(&self.values);
    }

    /// Remove every binding
    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Write the bindings as a `vars` child of `node`
    pub fn save(&self, node: &mut DocumentNode) -> Result<()> {
        let vars = node.new_child(VARS_TAG);
        for (name, value) in &self.values {
            let var = vars.new_child(VAR_TAG);
            var.set_attr(NAME_ATTR, name.as_str());
            var.set_attr(VALUE_ATTR, serde_json::to_string(value)?);
        }
        Ok(())
    }

    /// Replace the bindings with the contents of `node`'s `vars` child
    ///
    /// When `node` has no `vars` child the table is left untouched. On error
    /// the table is unchanged.
    pub fn load(&mut self, node: &DocumentNode) -> Result<()> {
        let Some(vars) = node.find_child(VARS_TAG) else {
            return Ok(());
        };

        let mut values = BTreeMap::new();
        for var in vars.children().filter(|c| c.tag() == VAR_TAG) {
            let name = var.attr(NAME_ATTR).ok_or_else(|| {
                StateError::Document("Variable entry without a name".to_string())
            })?;
            let value = match var.attr(VALUE_ATTR) {
                Some(text) => serde_json::from_str(text)?,
                None => serde_json::Value::Null,
            };
            values.insert(name.to_string(), value);
        }

        self.values = values;
        Ok(())
    }
}
