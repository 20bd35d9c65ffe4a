//! # a3s-agent-state
//!
//! Persistable runtime state for behavior-tree driven agents.
//!
//! ## Overview
//!
//! An [`AgentState`] owns one agent's variable bindings, the behavior tree
//! task it is currently running, and a stack of suspended tasks, each tagged
//! with whether an event interrupt suspended it. States can be deep-copied,
//! cleared, and saved to or loaded from a hierarchical [`DocumentNode`],
//! with tasks rebuilt by name through a [`TreeRegistry`].
//!
//! ## Quick Start
//!
//! ```rust
//! use a3s_agent_state::{
//!     AgentState, MemoryTreeRegistry, SequenceDefinition, StateContext, TreeRegistry,
//! };
//! use std::sync::Arc;
//!
//! # fn example() -> a3s_agent_state::Result<()> {
//! let registry = MemoryTreeRegistry::new();
//! registry.register(Arc::new(SequenceDefinition::new("Patrol", ["walk", "look"])))?;
//!
//! let mut state = AgentState::new("Guard");
//! state.vars_mut().set("hp", 100);
//! state.set_active_task(registry.create_task("Patrol"));
//!
//! let ctx = StateContext::new(&registry);
//! let document = state.save_to_node(&ctx, None)?;
//!
//! let mut restored = AgentState::default();
//! restored.load_from_node(&document, &ctx, None)?;
//! assert_eq!(restored.active_task().map(|t| t.tree_name()), Some("Patrol".to_string()));
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - **AgentState** — variables, active task, and suspension stack
//! - **BehaviorTreeTask** / **TreeDefinition** — polymorphic tree instances
//! - **TreeRegistry** — resolves tree names during load
//! - **MemberCodec** — persists the fields of a live agent by type name
//! - **StateStore** — file or in-memory document persistence

pub mod config;
pub mod document;
pub mod error;
pub mod members;
pub mod persist;
pub mod registry;
pub mod state;
pub mod store;
pub mod task;
pub mod tree;
pub mod variables;

// Re-export core types
pub use config::PersistConfig;
pub use document::DocumentNode;
pub use error::{Result, StateError};
pub use members::{Agent, MemberCodec, MemberCodecs, SerdeMemberCodec};
pub use persist::StateContext;
pub use registry::{MemoryTreeRegistry, TreeRegistry};
pub use state::{AgentState, BehaviorTreeStackItem};
pub use store::{FileStateStore, MemoryStateStore, StateStore};
pub use task::{BehaviorTreeTask, TreeDefinition};
pub use tree::{SequenceDefinition, SequenceTask, TaskStatus};
pub use variables::Variables;
