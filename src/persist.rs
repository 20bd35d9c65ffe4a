//! Agent state serialization
//!
//! Converts an `AgentState` to and from a `DocumentNode` shaped as
//!
//! ```text
//! AgentState agentType="..."
//! ├── members                       (only when a live agent is given)
//! ├── vars
//! ├── BehaviorTree source="Name"    (only with an active task)
//! │   └── node
//! └── stacks
//!     └── item event="true|false"   (bottom to top)
//!         └── BehaviorTree source="Name"
//!             └── node
//! ```
//!
//! Tasks are rebuilt by name through the `TreeRegistry` in the context.

use crate::config::PersistConfig;
use crate::document::{parse_bool, DocumentNode};
use crate::error::{Result, StateError};
use crate::members::{Agent, MemberCodecs};
use crate::registry::TreeRegistry;
use crate::state::{AgentState, BehaviorTreeStackItem};
use crate::store::{FileStateStore, StateStore};
use crate::task::BehaviorTreeTask;
use crate::variables::Variables;
use std::path::Path;

pub const AGENT_STATE_TAG: &str = "AgentState";
pub const AGENT_TYPE_ATTR: &str = "agentType";
pub const MEMBERS_TAG: &str = "members";
pub const BEHAVIOR_TREE_TAG: &str = "BehaviorTree";
pub const SOURCE_ATTR: &str = "source";
pub const PAYLOAD_TAG: &str = "node";
pub const STACKS_TAG: &str = "stacks";
pub const ITEM_TAG: &str = "item";
pub const EVENT_ATTR: &str = "event";

/// Collaborators needed to save and load agent state
#[derive(Clone)]
pub struct StateContext<'a> {
    /// Resolves tree names when tasks are rebuilt
    pub registry: &'a dyn TreeRegistry,

    /// Codecs for live agent members; members are skipped when absent
    pub members: Option<&'a MemberCodecs>,

    /// Document encoding for file persistence
    pub config: PersistConfig,
}

impl<'a> StateContext<'a> {
    pub fn new(registry: &'a dyn TreeRegistry) -> Self {
        Self {
            registry,
            members: None,
            config: PersistConfig::default(),
        }
    }

    pub fn with_members(mut self, members: &'a MemberCodecs) -> Self {
        self.members = Some(members);
        self
    }

    pub fn with_config(mut self, config: PersistConfig) -> Self {
        self.config = config;
        self
    }
}

/// Staged result of reading a document, committed all at once
struct StagedLoad {
    agent_type: Option<String>,
    vars: Variables,
    active_task: Option<Option<Box<dyn BehaviorTreeTask>>>,
    stack: Option<Vec<BehaviorTreeStackItem>>,
}

impl AgentState {
    /// Serialize this state into a new `AgentState` document node
    ///
    /// When `agent` is given its fields are written under `members` using
    /// the codec registered for its type name.
    pub fn save_to_node(
        &self,
        ctx: &StateContext<'_>,
        agent: Option<&dyn Agent>,
    ) -> Result<DocumentNode> {
        let mut root = DocumentNode::new(AGENT_STATE_TAG);
        root.set_attr(AGENT_TYPE_ATTR, self.agent_type.as_str());

        if let Some(agent) = agent {
            let members = root.new_child(MEMBERS_TAG);
            match ctx.members.and_then(|codecs| codecs.get(agent.type_name())) {
                Some(codec) => codec.save_fields(agent, members)?,
                None => tracing::warn!(
                    agent_type = %agent.type_name(),
                    "No member codec registered; members not saved"
                ),
            }
        }

        self.vars.save(&mut root)?;

        if let Some(task) = self.active_task.as_deref() {
            save_task(task, &mut root)?;
        }

        let stacks = root.new_child(STACKS_TAG);
        for item in &self.stack {
            let item_node = stacks.new_child(ITEM_TAG);
            item_node.set_attr(EVENT_ATTR, item.trigger_by_event.to_string());
            save_task(item.task.as_ref(), item_node)?;
        }

        Ok(root)
    }

    /// Restore this state from an `AgentState` document node
    ///
    /// Sections missing from the document leave the corresponding part of
    /// the state untouched. Either every section is applied or, on error,
    /// neither the state nor `agent` is modified.
    pub fn load_from_node(
        &mut self,
        node: &DocumentNode,
        ctx: &StateContext<'_>,
        agent: Option<&mut dyn Agent>,
    ) -> Result<()> {
        if node.tag() != AGENT_STATE_TAG {
            return Err(StateError::Document(format!(
                "Expected '{}' root, found '{}'",
                AGENT_STATE_TAG,
                node.tag()
            )));
        }

        let staged = self.stage_load(node, ctx)?;

        if let Some(agent) = agent {
            load_members(node, ctx, agent)?;
        }

        if let Some(agent_type) = staged.agent_type {
            self.agent_type = agent_type;
        }
        self.vars = staged.vars;
        if let Some(active_task) = staged.active_task {
            self.active_task = active_task;
        }
        if let Some(stack) = staged.stack {
            self.stack = stack;
        }

        tracing::debug!(
            agent_type = %self.agent_type,
            active = self.active_task.is_some(),
            stack_depth = self.stack.len(),
            "Agent state loaded"
        );
        Ok(())
    }

    fn stage_load(&self, node: &DocumentNode, ctx: &StateContext<'_>) -> Result<StagedLoad> {
        let mut vars = self.vars.clone();
        vars.load(node)?;

        let active_task = node
            .find_child(BEHAVIOR_TREE_TAG)
            .map(|bt| parse_task(bt, ctx.registry))
            .transpose()?;

        let stack = node
            .find_child(STACKS_TAG)
            .map(|stacks| parse_stack(stacks, ctx.registry))
            .transpose()?;

        Ok(StagedLoad {
            agent_type: node.attr(AGENT_TYPE_ATTR).map(str::to_string),
            vars,
            active_task,
            stack,
        })
    }

    /// Save this state into a document store
    pub fn save_to_store(
        &self,
        store: &dyn StateStore,
        ctx: &StateContext<'_>,
        agent: Option<&dyn Agent>,
    ) -> Result<()> {
        let document = self.save_to_node(ctx, agent)?;
        store.save(&document)
    }

    /// Load this state from a document store
    ///
    /// An empty store is `StateError::NotFound`. On any error the state is
    /// left as is.
    pub fn load_from_store(
        &mut self,
        store: &dyn StateStore,
        ctx: &StateContext<'_>,
        agent: Option<&mut dyn Agent>,
    ) -> Result<()> {
        let document = store.load()?.ok_or_else(|| {
            StateError::NotFound("no agent state document stored".to_string())
        })?;
        self.load_from_node(&document, ctx, agent)
    }

    /// Save this state as a document file, creating parent directories
    pub fn save_to_file(
        &self,
        path: impl AsRef<Path>,
        ctx: &StateContext<'_>,
        agent: Option<&dyn Agent>,
    ) -> Result<()> {
        let store = FileStateStore::new(path.as_ref()).with_config(ctx.config.clone());
        self.save_to_store(&store, ctx, agent)
    }

    /// Load this state from a document file
    ///
    /// A missing or unparsable file is an error and leaves the state as is.
    pub fn load_from_file(
        &mut self,
        path: impl AsRef<Path>,
        ctx: &StateContext<'_>,
        agent: Option<&mut dyn Agent>,
    ) -> Result<()> {
        let path = path.as_ref();
        let store = FileStateStore::new(path).with_config(ctx.config.clone());
        match self.load_from_store(&store, ctx, agent) {
            Err(StateError::NotFound(_)) => Err(StateError::NotFound(format!(
                "state file {}",
                path.display()
            ))),
            result => result,
        }
    }

    /// Save into an already-open stream
    ///
    /// Not supported: always fails without writing anything.
    pub fn save_to_writer(
        &self,
        _writer: &mut dyn std::io::Write,
        _ctx: &StateContext<'_>,
        _agent: Option<&dyn Agent>,
    ) -> Result<()> {
        Err(StateError::Unsupported(
            "saving agent state to an open stream".to_string(),
        ))
    }

    /// Load from an already-open stream
    ///
    /// Not supported: always fails without reading or modifying anything.
    pub fn load_from_reader(
        &mut self,
        _reader: &mut dyn std::io::Read,
        _ctx: &StateContext<'_>,
        _agent: Option<&mut dyn Agent>,
    ) -> Result<()> {
        Err(StateError::Unsupported(
            "loading agent state from an open stream".to_string(),
        ))
    }
}

fn save_task(task: &dyn BehaviorTreeTask, parent: &mut DocumentNode) -> Result<()> {
    let bt = parent.new_child(BEHAVIOR_TREE_TAG);
    bt.set_attr(SOURCE_ATTR, task.tree_name());
    task.save(bt.new_child(PAYLOAD_TAG))
}

/// Rebuild a task from a `BehaviorTree` node
///
/// A missing `source` or an unknown tree name yields `None`. A resolved
/// tree without its `node` payload is a structural fault.
fn parse_task(
    bt: &DocumentNode,
    registry: &dyn TreeRegistry,
) -> Result<Option<Box<dyn BehaviorTreeTask>>> {
    let Some(source) = bt.attr(SOURCE_ATTR) else {
        tracing::debug!("Behavior tree node has no source; no task restored");
        return Ok(None);
    };

    let Some(mut task) = registry.create_task(source) else {
        tracing::warn!(tree = %source, "Unknown behavior tree; no task restored");
        return Ok(None);
    };

    let payload = bt.find_child(PAYLOAD_TAG);
    debug_assert!(
        payload.is_some(),
        "Behavior tree '{}' is missing its 'node' payload",
        source
    );
    let payload = payload.ok_or_else(|| StateError::MissingPayload {
        tree: source.to_string(),
    })?;

    task.load(payload)?;
    Ok(Some(task))
}

fn parse_stack(
    stacks: &DocumentNode,
    registry: &dyn TreeRegistry,
) -> Result<Vec<BehaviorTreeStackItem>> {
    let mut items = Vec::with_capacity(stacks.child_count());

    for (index, item) in stacks.children().enumerate() {
        let trigger_by_event = item.attr(EVENT_ATTR).map(parse_bool).unwrap_or(false);

        let Some(bt) = item.find_child(BEHAVIOR_TREE_TAG) else {
            tracing::warn!(index, "Stack item has no behavior tree; skipped");
            continue;
        };

        match parse_task(bt, registry)? {
            Some(task) => items.push(BehaviorTreeStackItem::new(task, trigger_by_event)),
            None => tracing::warn!(index, "Stack item task not restored; skipped"),
        }
    }

    Ok(items)
}

fn load_members(
    node: &DocumentNode,
    ctx: &StateContext<'_>,
    agent: &mut dyn Agent,
) -> Result<()> {
    let Some(members) = node.find_child(MEMBERS_TAG) else {
        return Ok(());
    };

    match ctx.members.and_then(|codecs| codecs.get(agent.type_name())) {
        Some(codec) => codec.load_fields(agent, members),
        None => {
            tracing::warn!(
                agent_type = %agent.type_name(),
                "No member codec registered; members not loaded"
            );
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::MemoryTreeRegistry;
    use crate::store::MemoryStateStore;
    use crate::tree::{SequenceDefinition, SequenceTask};
    use serde::{Deserialize, Serialize};
    use std::any::Any;
    use std::sync::Arc;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Guard {
        hp: i32,
        post: String,
    }

    impl Agent for Guard {
        fn type_name(&self) -> &str {
            "Guard"
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    fn registry() -> MemoryTreeRegistry {
        let registry = MemoryTreeRegistry::new();
        for name in ["Patrol", "Idle", "Alarm"] {
            registry
                .register(Arc::new(SequenceDefinition::new(name, ["a", "b", "c"])))
                .unwrap();
        }
        registry
    }

    fn task(registry: &MemoryTreeRegistry, name: &str, advanced: usize) -> Box<dyn BehaviorTreeTask> {
        let mut task = registry.create_task(name).unwrap();
        let seq = task.downcast_mut::<SequenceTask>().unwrap();
        for _ in 0..advanced {
            seq.advance();
        }
        task
    }

    fn cursor(task: &dyn BehaviorTreeTask) -> usize {
        task.downcast_ref::<SequenceTask>().unwrap().cursor()
    }

    fn sample_state(registry: &MemoryTreeRegistry) -> AgentState {
        let mut state = AgentState::new("Guard");
        state.vars_mut().set("hp", 100);
        state.set_active_task(Some(task(registry, "Patrol", 1)));
        state.push_task(task(registry, "Idle", 2), false);
        state.push_task(task(registry, "Alarm", 0), true);
        state
    }

    #[test]
    fn test_save_shape() {
        let registry = registry();
        let ctx = StateContext::new(&registry);
        let node = sample_state(&registry).save_to_node(&ctx, None).unwrap();

        assert_eq!(node.tag(), "AgentState");
        assert_eq!(node.attr("agentType"), Some("Guard"));
        assert!(node.find_child("members").is_none());
        assert!(node.find_child("vars").is_some());

        let bt = node.find_child("BehaviorTree").unwrap();
        assert_eq!(bt.attr("source"), Some("Patrol"));
        assert_eq!(bt.find_child("node").unwrap().attr("cursor"), Some("1"));

        let stacks = node.find_child("stacks").unwrap();
        assert_eq!(stacks.child_count(), 2);
        let bottom = stacks.child(0).unwrap();
        assert_eq!(bottom.tag(), "item");
        assert_eq!(bottom.attr("event"), Some("false"));
        assert_eq!(
            bottom.find_child("BehaviorTree").unwrap().attr("source"),
            Some("Idle")
        );
        assert_eq!(stacks.child(1).unwrap().attr("event"), Some("true"));
    }

    #[test]
    fn test_save_without_task_writes_empty_stacks() {
        let registry = registry();
        let ctx = StateContext::new(&registry);
        let node = AgentState::new("Guard").save_to_node(&ctx, None).unwrap();

        assert!(node.find_child("BehaviorTree").is_none());
        assert_eq!(node.find_child("stacks").unwrap().child_count(), 0);
    }

    #[test]
    fn test_node_roundtrip() {
        let registry = registry();
        let ctx = StateContext::new(&registry);
        let state = sample_state(&registry);
        let node = state.save_to_node(&ctx, None).unwrap();

        let mut loaded = AgentState::default();
        loaded.load_from_node(&node, &ctx, None).unwrap();

        assert_eq!(loaded.agent_type(), "Guard");
        assert_eq!(loaded.vars(), state.vars());
        assert_eq!(loaded.active_task().unwrap().tree_name(), "Patrol");
        assert_eq!(cursor(loaded.active_task().unwrap()), 1);

        assert_eq!(loaded.stack_depth(), 2);
        assert_eq!(loaded.stack()[0].task.tree_name(), "Idle");
        assert_eq!(cursor(loaded.stack()[0].task.as_ref()), 2);
        assert!(!loaded.stack()[0].trigger_by_event);
        assert_eq!(loaded.stack()[1].task.tree_name(), "Alarm");
        assert!(loaded.stack()[1].trigger_by_event);
    }

    #[test]
    fn test_load_without_source_clears_active_task() {
        let registry = registry();
        let ctx = StateContext::new(&registry);
        let mut node = DocumentNode::new("AgentState");
        node.new_child("BehaviorTree").new_child("node");

        let mut state = sample_state(&registry);
        state.load_from_node(&node, &ctx, None).unwrap();
        assert!(!state.has_active_task());
        // Sections absent from the document are untouched
        assert_eq!(state.stack_depth(), 2);
        assert_eq!(state.vars().len(), 1);
        assert_eq!(state.agent_type(), "Guard");
    }

    #[test]
    fn test_load_unknown_tree_is_not_an_error() {
        let registry = registry();
        let ctx = StateContext::new(&registry);
        let mut node = DocumentNode::new("AgentState");
        node.new_child("BehaviorTree").set_attr("source", "Missing");

        let mut state = sample_state(&registry);
        state.load_from_node(&node, &ctx, None).unwrap();
        assert!(!state.has_active_task());
    }

    #[test]
    fn test_load_without_behavior_tree_keeps_active_task() {
        let registry = registry();
        let ctx = StateContext::new(&registry);
        let mut state = sample_state(&registry);
        state
            .load_from_node(&DocumentNode::new("AgentState"), &ctx, None)
            .unwrap();
        assert_eq!(state.active_task().unwrap().tree_name(), "Patrol");
    }

    #[test]
    #[cfg_attr(debug_assertions, should_panic(expected = "missing its 'node' payload"))]
    fn test_load_missing_payload_fails() {
        let registry = registry();
        let ctx = StateContext::new(&registry);
        let mut node = DocumentNode::new("AgentState");
        node.new_child("BehaviorTree").set_attr("source", "Patrol");

        let mut state = sample_state(&registry);
        let err = state.load_from_node(&node, &ctx, None).unwrap_err();
        assert!(matches!(err, StateError::MissingPayload { ref tree } if tree == "Patrol"));
        assert_eq!(cursor(state.active_task().unwrap()), 1);
    }

    #[test]
    fn test_load_failure_leaves_state_untouched() {
        let registry = registry();
        let ctx = StateContext::new(&registry);
        let mut node = DocumentNode::new("AgentState");
        node.set_attr("agentType", "Other");
        let var = node.new_child("vars").new_child("var");
        var.set_attr("name", "hp");
        var.set_attr("value", "1");
        let bt = node.new_child("BehaviorTree");
        bt.set_attr("source", "Patrol");
        bt.new_child("node").set_attr("cursor", "99");

        let mut state = sample_state(&registry);
        assert!(state.load_from_node(&node, &ctx, None).is_err());

        assert_eq!(state.agent_type(), "Guard");
        assert_eq!(state.vars().get("hp"), Some(&serde_json::json!(100)));
        assert_eq!(cursor(state.active_task().unwrap()), 1);
        assert_eq!(state.stack_depth(), 2);
    }

    #[test]
    fn test_load_rejects_wrong_root() {
        let registry = registry();
        let ctx = StateContext::new(&registry);
        let mut state = AgentState::default();
        let err = state
            .load_from_node(&DocumentNode::new("Agent"), &ctx, None)
            .unwrap_err();
        assert!(matches!(err, StateError::Document(_)));
    }

    #[test]
    fn test_load_stack_replaces_in_document_order() {
        let registry = registry();
        let ctx = StateContext::new(&registry);
        let mut node = DocumentNode::new("AgentState");
        let stacks = node.new_child("stacks");
        for (name, event) in [("Alarm", "TRUE"), ("Idle", "garbage"), ("Patrol", "")] {
            let item = stacks.new_child("item");
            item.set_attr("event", event);
            let bt = item.new_child("BehaviorTree");
            bt.set_attr("source", name);
            bt.new_child("node");
        }
        // Items without a resolvable tree are dropped
        stacks.new_child("item").set_attr("event", "true");
        let bt = stacks.new_child("item").new_child("BehaviorTree");
        bt.set_attr("source", "Missing");
        bt.new_child("node");

        let mut state = sample_state(&registry);
        state.load_from_node(&node, &ctx, None).unwrap();

        let names: Vec<String> = state.stack().iter().map(|i| i.task.tree_name()).collect();
        assert_eq!(names, vec!["Alarm", "Idle", "Patrol"]);
        let events: Vec<bool> = state.stack().iter().map(|i| i.trigger_by_event).collect();
        assert_eq!(events, vec![true, false, false]);
    }

    #[test]
    fn test_empty_stacks_clears_stack() {
        let registry = registry();
        let ctx = StateContext::new(&registry);
        let mut node = DocumentNode::new("AgentState");
        node.new_child("stacks");

        let mut state = sample_state(&registry);
        state.load_from_node(&node, &ctx, None).unwrap();
        assert_eq!(state.stack_depth(), 0);
    }

    #[test]
    fn test_members_roundtrip() {
        let registry = registry();
        let mut codecs = MemberCodecs::new();
        codecs.register_serde::<Guard>("Guard");
        let ctx = StateContext::new(&registry).with_members(&codecs);

        let agent = Guard {
            hp: 42,
            post: "gate".to_string(),
        };
        let node = sample_state(&registry)
            .save_to_node(&ctx, Some(&agent))
            .unwrap();
        assert_eq!(node.find_child("members").unwrap().child_count(), 2);

        let mut restored = Guard {
            hp: 0,
            post: String::new(),
        };
        let mut state = AgentState::default();
        state
            .load_from_node(&node, &ctx, Some(&mut restored))
            .unwrap();
        assert_eq!(restored, agent);
    }

    #[test]
    fn test_members_without_codec_are_skipped() {
        let registry = registry();
        let ctx = StateContext::new(&registry);
        let agent = Guard {
            hp: 42,
            post: "gate".to_string(),
        };

        let node = AgentState::new("Guard")
            .save_to_node(&ctx, Some(&agent))
            .unwrap();
        let members = node.find_child("members").unwrap();
        assert_eq!(members.child_count(), 0);

        let mut other = agent.clone();
        other.hp = 1;
        AgentState::default()
            .load_from_node(&node, &ctx, Some(&mut other))
            .unwrap();
        assert_eq!(other.hp, 1);
    }

    #[test]
    fn test_members_failure_leaves_state_untouched() {
        let registry = registry();
        let mut codecs = MemberCodecs::new();
        codecs.register_serde::<Guard>("Guard");
        let ctx = StateContext::new(&registry).with_members(&codecs);

        let mut node = DocumentNode::new("AgentState");
        node.set_attr("agentType", "Other");
        let field = node.new_child("members").new_child("field");
        field.set_attr("name", "hp");
        field.set_attr("value", "\"high\"");

        let mut agent = Guard {
            hp: 7,
            post: "gate".to_string(),
        };
        let mut state = sample_state(&registry);
        assert!(state.load_from_node(&node, &ctx, Some(&mut agent)).is_err());
        assert_eq!(state.agent_type(), "Guard");
        assert_eq!(agent.hp, 7);
    }

    #[test]
    #[cfg_attr(debug_assertions, should_panic(expected = "missing its 'node' payload"))]
    fn test_load_stack_item_missing_payload_fails() {
        let registry = registry();
        let ctx = StateContext::new(&registry);
        let mut node = DocumentNode::new("AgentState");
        let item = node.new_child("stacks").new_child("item");
        item.set_attr("event", "true");
        item.new_child("BehaviorTree").set_attr("source", "Patrol");

        let mut state = sample_state(&registry);
        let err = state.load_from_node(&node, &ctx, None).unwrap_err();
        assert!(matches!(err, StateError::MissingPayload { ref tree } if tree == "Patrol"));
        assert_eq!(state.stack_depth(), 2);
        assert_eq!(state.stack()[0].task.tree_name(), "Idle");
        assert_eq!(state.stack()[1].task.tree_name(), "Alarm");
    }

    #[test]
    fn test_unresolved_stack_items_are_dropped() {
        let registry = registry();
        let ctx = StateContext::new(&registry);
        let node = sample_state(&registry).save_to_node(&ctx, None).unwrap();

        registry.unregister("Idle").unwrap();
        let mut loaded = AgentState::default();
        loaded.load_from_node(&node, &ctx, None).unwrap();

        assert_eq!(loaded.stack_depth(), 1);
        assert_eq!(loaded.stack()[0].task.tree_name(), "Alarm");
        assert!(loaded.stack()[0].trigger_by_event);
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let registry = registry();
        let ctx = StateContext::new(&registry);
        let store = MemoryStateStore::default();
        let state = sample_state(&registry);

        state.save_to_store(&store, &ctx, None).unwrap();
        let stored = store.load().unwrap().unwrap();
        assert_eq!(stored.attr("agentType"), Some("Guard"));

        let mut loaded = AgentState::default();
        loaded.load_from_store(&store, &ctx, None).unwrap();
        assert_eq!(loaded.agent_type(), "Guard");
        assert_eq!(loaded.vars(), state.vars());
        assert_eq!(cursor(loaded.active_task().unwrap()), 1);
        assert_eq!(loaded.stack_depth(), 2);
        assert!(loaded.stack()[1].trigger_by_event);
    }

    #[test]
    fn test_load_from_empty_store_leaves_state_untouched() {
        let registry = registry();
        let ctx = StateContext::new(&registry);
        let store = MemoryStateStore::default();

        let mut state = sample_state(&registry);
        let err = state.load_from_store(&store, &ctx, None).unwrap_err();
        assert!(matches!(err, StateError::NotFound(_)));
        assert_eq!(state.stack_depth(), 2);
        assert!(state.has_active_task());
        assert_eq!(state.vars().len(), 1);
    }

    #[test]
    fn test_stream_variants_are_unsupported() {
        let registry = registry();
        let ctx = StateContext::new(&registry);
        let mut state = sample_state(&registry);

        let mut buffer: Vec<u8> = Vec::new();
        let err = state.save_to_writer(&mut buffer, &ctx, None).unwrap_err();
        assert!(matches!(err, StateError::Unsupported(_)));
        assert!(buffer.is_empty());

        let mut reader: &[u8] = b"{\"tag\":\"AgentState\"}";
        let err = state.load_from_reader(&mut reader, &ctx, None).unwrap_err();
        assert!(matches!(err, StateError::Unsupported(_)));
        assert_eq!(state.stack_depth(), 2);
        assert!(state.has_active_task());
    }
}
