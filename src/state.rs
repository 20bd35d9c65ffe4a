//! Agent runtime state
//!
//! An `AgentState` owns the variable bindings of one agent, the behavior
//! tree task it is currently running, and the stack of tasks suspended
//! beneath it. Every task is exclusively owned; replacing one drops the
//! previous value exactly once.

use crate::error::Result;
use crate::task::BehaviorTreeTask;
use crate::variables::Variables;

/// One suspended behavior tree execution
#[derive(Debug)]
pub struct BehaviorTreeStackItem {
    /// The suspended task
    pub task: Box<dyn BehaviorTreeTask>,

    /// Whether the task was suspended by an event interrupt
    pub trigger_by_event: bool,
}

impl BehaviorTreeStackItem {
    pub fn new(task: Box<dyn BehaviorTreeTask>, trigger_by_event: bool) -> Self {
        Self {
            task,
            trigger_by_event,
        }
    }

    /// Deep copy with a freshly instantiated task
    pub fn try_clone(&self) -> Result<Self> {
        Ok(Self {
            task: self.task.duplicate()?,
            trigger_by_event: self.trigger_by_event,
        })
    }
}

/// Persistable runtime state of one agent
///
/// Stack order is bottom to top: the first item is the earliest suspension.
#[derive(Debug, Default)]
pub struct AgentState {
    pub(crate) agent_type: String,
    pub(crate) vars: Variables,
    pub(crate) active_task: Option<Box<dyn BehaviorTreeTask>>,
    pub(crate) stack: Vec<BehaviorTreeStackItem>,
}

impl AgentState {
    /// Create an empty state for the given agent type
    pub fn new(agent_type: impl Into<String>) -> Self {
        Self {
            agent_type: agent_type.into(),
            ..Default::default()
        }
    }

    pub fn agent_type(&self) -> &str {
        &self.agent_type
    }

    pub fn set_agent_type(&mut self, agent_type: impl Into<String>) {
        self.agent_type = agent_type.into();
    }

    pub fn vars(&self) -> &Variables {
        &self.vars
    }

    pub fn vars_mut(&mut self) -> &mut Variables {
        &mut self.vars
    }

    /// The task currently running, if any
    pub fn active_task(&self) -> Option<&dyn BehaviorTreeTask> {
        self.active_task.as_deref()
    }

    pub fn active_task_mut(&mut self) -> Option<&mut (dyn BehaviorTreeTask + 'static)> {
        self.active_task.as_deref_mut()
    }

    pub fn has_active_task(&self) -> bool {
        self.active_task.is_some()
    }

    /// Install a new active task, returning the one it replaces
    pub fn set_active_task(
        &mut self,
        task: Option<Box<dyn BehaviorTreeTask>>,
    ) -> Option<Box<dyn BehaviorTreeTask>> {
        std::mem::replace(&mut self.active_task, task)
    }

    /// Remove and return the active task
    pub fn take_active_task(&mut self) -> Option<Box<dyn BehaviorTreeTask>> {
        self.active_task.take()
    }

    /// Suspended tasks, bottom to top
    pub fn stack(&self) -> &[BehaviorTreeStackItem] {
        &self.stack
    }

    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    /// Push a suspended task on top of the stack
    pub fn push_task(&mut self, task: Box<dyn BehaviorTreeTask>, trigger_by_event: bool) {
        self.stack
            .push(BehaviorTreeStackItem::new(task, trigger_by_event));
    }

    /// Pop the most recently suspended task
    pub fn pop_task(&mut self) -> Option<BehaviorTreeStackItem> {
        self.stack.pop()
    }

    /// Drop every suspended task
    pub fn clear_stack(&mut self) {
        self.stack.clear();
    }

    /// Assign `source`'s variables and active task to this state
    ///
    /// The active task is rebuilt from its definition and receives a copy
    /// of the source task's runtime state. The suspension stack and agent
    /// type are not copied. Nothing is modified if the task copy fails.
    pub fn copy_from(&mut self, source: &AgentState) -> Result<()> {
        let task = source
            .active_task
            .as_deref()
            .map(|task| task.duplicate())
            .transpose()?;

        source.vars.copy_to(&mut self.vars);
        self.active_task = task;
        Ok(())
    }

    /// A new state with this state's agent type, variables, and active task
    ///
    /// Self-assignment is `state.copy_from(&state.try_clone()?)`.
    pub fn try_clone(&self) -> Result<AgentState> {
        let mut copy = AgentState::new(self.agent_type.clone());
        copy.copy_from(self)?;
        Ok(copy)
    }

    /// Like `try_clone`, but also duplicates the suspension stack
    pub fn try_clone_full(&self) -> Result<AgentState> {
        let stack = self
            .stack
            .iter()
            .map(BehaviorTreeStackItem::try_clone)
            .collect::<Result<Vec<_>>>()?;

        let mut copy = self.try_clone()?;
        copy.stack = stack;
        Ok(copy)
    }

    /// Drop the active task and empty the variables
    ///
    /// The suspension stack is left as is; see `clear_stack`.
    pub fn clear(&mut self) {
        self.active_task = None;
        self.vars.clear();
    }
}
