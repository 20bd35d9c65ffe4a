//! Hierarchical document tree used as the persistence format
//!
//! A `DocumentNode` is a tagged element with string attributes and an
//! ordered list of child nodes. It is encoding-agnostic; on disk it is
//! written as JSON (see `store`).

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A tagged node with attributes and ordered children
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentNode {
    /// Element tag (e.g., "AgentState", "BehaviorTree")
    tag: String,

    /// Attribute id → string value
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    attributes: BTreeMap<String, String>,

    /// Child nodes in document order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    children: Vec<DocumentNode>,
}

impl DocumentNode {
    /// Create an empty node with the given tag
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Get an attribute value
    pub fn attr(&self, id: &str) -> Option<&str> {
        self.attributes.get(id).map(String::as_str)
    }

    /// Set an attribute, replacing any previous value
    pub fn set_attr(&mut self, id: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(id.into(), value.into());
    }

    /// Append a new empty child and return it for population
    pub fn new_child(&mut self, tag: impl Into<String>) -> &mut DocumentNode {
        self.children.push(DocumentNode::new(tag));
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    /// Find the first child with the given tag
    pub fn find_child(&self, tag: &str) -> Option<&DocumentNode> {
        self.children.iter().find(|c| c.tag == tag)
    }

    /// Get the child at `index`
    pub fn child(&self, index: usize) -> Option<&DocumentNode> {
        self.children.get(index)
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Iterate over children in document order
    pub fn children(&self) -> impl Iterator<Item = &DocumentNode> {
        self.children.iter()
    }

    /// Encode this node (and its subtree) as JSON
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }

    /// Decode a node from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(Into::into)
    }
}

/// Parse a boolean attribute permissively
///
/// Accepts `true`/`false` in any case, `1`/`0`, and surrounding whitespace.
/// Anything else is `false`.
pub fn parse_bool(value: &str) -> bool {
    let value = value.trim();
    value.eq_ignore_ascii_case("true") || value == "1"
}
