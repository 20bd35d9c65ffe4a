//! Behavior tree definition and task abstractions
//!
//! A `TreeDefinition` is the immutable, named structure of a tree. A
//! `BehaviorTreeTask` is a live instantiation of a definition bound to one
//! agent. Agent state only ever touches tasks through this trait; the tick
//! semantics live with the implementations.

use crate::document::DocumentNode;
use crate::error::{Result, StateError};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Immutable, named behavior tree structure
pub trait TreeDefinition: fmt::Debug + Send + Sync {
    /// Name the definition is registered and persisted under
    fn name(&self) -> &str;

    /// Manufacture a fresh task bound to this definition
    fn create_task(self: Arc<Self>) -> Box<dyn BehaviorTreeTask>;
}

/// Running instance of a behavior tree
pub trait BehaviorTreeTask: fmt::Debug + Send {
    /// The definition this task was created from
    fn definition(&self) -> Arc<dyn TreeDefinition>;

    /// Copy this task's runtime state into `target`
    ///
    /// `target` must have been created from the same definition; otherwise
    /// implementations return `StateError::TaskMismatch` and leave it as is.
    fn copy_to(&self, target: &mut dyn BehaviorTreeTask) -> Result<()>;

    /// Write the runtime state into a `node` payload element
    fn save(&self, node: &mut DocumentNode) -> Result<()>;

    /// Restore the runtime state from a `node` payload element
    fn load(&mut self, node: &DocumentNode) -> Result<()>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<'a> dyn BehaviorTreeTask + 'a {
    /// Name of the definition this task runs
    pub fn tree_name(&self) -> String {
        self.definition().name().to_string()
    }

    /// Deep copy: a fresh task from the same definition carrying our state
    pub fn duplicate(&self) -> Result<Box<dyn BehaviorTreeTask>> {
        let mut fresh = self.definition().create_task();
        self.copy_to(fresh.as_mut())?;
        Ok(fresh)
    }

    pub fn downcast_ref<T: BehaviorTreeTask + 'static>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: BehaviorTreeTask + 'static>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}

/// Downcast a copy target to the concrete task type of `source`
///
/// Succeeds only if `target` is a `T` created from a definition with the
/// same name as `source`'s.
pub fn copy_target<'a, T: BehaviorTreeTask + 'static>(
    source: &T,
    target: &'a mut dyn BehaviorTreeTask,
) -> Result<&'a mut T> {
    let expected = source.definition().name().to_string();
    let actual = target.definition().name().to_string();
    if expected != actual {
        return Err(StateError::TaskMismatch { expected, actual });
    }
    target
        .as_any_mut()
        .downcast_mut::<T>()
        .ok_or(StateError::TaskMismatch { expected, actual })
}
