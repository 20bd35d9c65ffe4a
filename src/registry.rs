//! Tree registry — resolve behavior tree definitions by name
//!
//! The registry is passed explicitly to every load so state handling never
//! depends on process-wide setup.

use crate::error::{Result, StateError};
use crate::task::{BehaviorTreeTask, TreeDefinition};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Trait for tree definition registries
pub trait TreeRegistry: Send + Sync {
    /// Look up a definition by name
    fn resolve(&self, name: &str) -> Option<Arc<dyn TreeDefinition>>;

    /// Resolve a definition and instantiate a fresh task from it
    ///
    /// Returns `None` for unknown names.
    fn create_task(&self, name: &str) -> Option<Box<dyn BehaviorTreeTask>> {
        self.resolve(name).map(|definition| definition.create_task())
    }
}

/// In-memory tree registry
///
/// Stores definitions in a `HashMap` protected by `RwLock`.
#[derive(Default)]
pub struct MemoryTreeRegistry {
    definitions: RwLock<HashMap<String, Arc<dyn TreeDefinition>>>,
}

impl MemoryTreeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a definition under its own name, replacing any previous one
    pub fn register(&self, definition: Arc<dyn TreeDefinition>) -> Result<()> {
        let name = definition.name().to_string();
        if name.is_empty() {
            return Err(StateError::Registry(
                "Tree definition name cannot be empty".to_string(),
            ));
        }

        let mut definitions = self.definitions.write().map_err(|e| {
            StateError::Registry(format!("Tree registry lock poisoned: {}", e))
        })?;
        if definitions.insert(name.clone(), definition).is_some() {
            tracing::debug!(tree = %name, "Tree definition replaced");
        }
        Ok(())
    }

    /// Remove a definition, returning it if it was registered
    pub fn unregister(&self, name: &str) -> Result<Option<Arc<dyn TreeDefinition>>> {
        let mut definitions = self.definitions.write().map_err(|e| {
            StateError::Registry(format!("Tree registry lock poisoned: {}", e))
        })?;
        Ok(definitions.remove(name))
    }

    /// Registered definition names, sorted
    pub fn names(&self) -> Vec<String> {
        self.definitions
            .read()
            .map(|defs| {
                let mut names: Vec<String> = defs.keys().cloned().collect();
                names.sort();
                names
            })
            .unwrap_or_default()
    }
}

impl TreeRegistry for MemoryTreeRegistry {
    fn resolve(&self, name: &str) -> Option<Arc<dyn TreeDefinition>> {
        let definitions = self.definitions.read().ok()?;
        definitions.get(name).cloned()
    }
}
