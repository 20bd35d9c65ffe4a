//! Sequence tree — a minimal concrete behavior tree
//!
//! `SequenceDefinition` runs its named steps in order. A `SequenceTask`
//! tracks the step cursor, a status, and task-local blackboard values,
//! which is exactly the runtime state persisted in its `node` payload.

use crate::document::DocumentNode;
use crate::error::{Result, StateError};
use crate::task::{copy_target, BehaviorTreeTask, TreeDefinition};
use std::any::Any;
use std::collections::BTreeMap;
use std::sync::Arc;

const CURSOR_ATTR: &str = "cursor";
const STATUS_ATTR: &str = "status";
const LOCAL_TAG: &str = "local";

/// Execution status of a task
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TaskStatus {
    /// Not started
    #[default]
    Invalid,
    Running,
    Success,
    Failure,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Invalid => "invalid",
            Self::Running => "running",
            Self::Success => "success",
            Self::Failure => "failure",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "invalid" => Some(Self::Invalid),
            "running" => Some(Self::Running),
            "success" => Some(Self::Success),
            "failure" => Some(Self::Failure),
            _ => None,
        }
    }
}

/// Tree definition that executes named steps in order
#[derive(Debug, Clone)]
pub struct SequenceDefinition {
    name: String,
    steps: Vec<String>,
}

impl SequenceDefinition {
    pub fn new<S: Into<String>>(name: impl Into<String>, steps: impl IntoIterator<Item = S>) -> Self {
        Self {
            name: name.into(),
            steps: steps.into_iter().map(Into::into).collect(),
        }
    }

    pub fn steps(&self) -> &[String] {
        &self.steps
    }
}

impl TreeDefinition for SequenceDefinition {
    fn name(&self) -> &str {
        &self.name
    }

    fn create_task(self: Arc<Self>) -> Box<dyn BehaviorTreeTask> {
        Box::new(SequenceTask::new(self))
    }
}

/// Running instance of a `SequenceDefinition`
#[derive(Debug)]
pub struct SequenceTask {
    definition: Arc<SequenceDefinition>,
    cursor: usize,
    status: TaskStatus,
    locals: BTreeMap<String, serde_json::Value>,
}

impl SequenceTask {
    pub fn new(definition: Arc<SequenceDefinition>) -> Self {
        Self {
            definition,
            cursor: 0,
            status: TaskStatus::Invalid,
            locals: BTreeMap::new(),
        }
    }

    /// Index of the next step to run
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    /// The step the cursor points at, if any remain
    pub fn current_step(&self) -> Option<&str> {
        self.definition.steps.get(self.cursor).map(String::as_str)
    }

    /// Complete the current step and move to the next one
    pub fn advance(&mut self) -> TaskStatus {
        if self.cursor < self.definition.steps.len() {
            self.cursor += 1;
        }
        self.status = if self.cursor >= self.definition.steps.len() {
            TaskStatus::Success
        } else {
            TaskStatus::Running
        };
        self.status
    }

    /// Abort the sequence
    pub fn fail(&mut self) {
        self.status = TaskStatus::Failure;
    }

    pub fn local(&self, name: &str) -> Option<&serde_json::Value> {
        self.locals.get(name)
    }

    pub fn set_local(&mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) {
        self.locals.insert(name.into(), value.into());
    }
}

impl BehaviorTreeTask for SequenceTask {
    fn definition(&self) -> Arc<dyn TreeDefinition> {
        self.definition.clone()
    }

    fn copy_to(&self, target: &mut dyn BehaviorTreeTask) -> Result<()> {
        let target = copy_target(self, target)?;
        target.cursor = self.cursor;
        target.status = self.status;
        target.locals.clone_from(&self.locals);
        Ok(())
    }

    fn save(&self, node: &mut DocumentNode) -> Result<()> {
        node.set_attr(CURSOR_ATTR, self.cursor.to_string());
        node.set_attr(STATUS_ATTR, self.status.as_str());
        for (name, value) in &self.locals {
            let local = node.new_child(LOCAL_TAG);
            local.set_attr("name", name.as_str());
            local.set_attr("value", serde_json::to_string(value)?);
        }
        Ok(())
    }

    fn load(&mut self, node: &DocumentNode) -> Result<()> {
        let cursor = match node.attr(CURSOR_ATTR) {
            Some(text) => text.parse::<usize>().map_err(|e| {
                StateError::Document(format!("Invalid cursor '{}': {}", text, e))
            })?,
            None => 0,
        };
        if cursor > self.definition.steps.len() {
            return Err(StateError::Document(format!(
                "Cursor {} is past the end of '{}' ({} steps)",
                cursor,
                self.definition.name,
                self.definition.steps.len()
            )));
        }

        let status = match node.attr(STATUS_ATTR) {
            Some(text) => TaskStatus::parse(text).ok_or_else(|| {
                StateError::Document(format!("Unknown task status '{}'", text))
            })?,
            None => TaskStatus::Invalid,
        };

        let mut locals = BTreeMap::new();
        for local in node.children().filter(|c| c.tag() == LOCAL_TAG) {
            let name = local.attr("name").ok_or_else(|| {
                StateError::Document("Task local without a name".to_string())
            })?;
            let value = match local.attr("value") {
                Some(text) => serde_json::from_str(text)?,
                None => serde_json::Value::Null,
            };
            locals.insert(name.to_string(), value);
        }

        self.cursor = cursor;
        self.status = status;
        self.locals = locals;
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
