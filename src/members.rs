//! Agent member persistence
//!
//! Agent fields are persisted through a `MemberCodec` looked up by the
//! agent's declared type name, so the state layer never needs to know the
//! concrete agent types it saves.

use crate::document::DocumentNode;
use crate::error::{Result, StateError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::any::Any;
use std::collections::HashMap;
use std::marker::PhantomData;

const FIELD_TAG: &str = "field";

/// A live agent whose fields can be saved with its state
pub trait Agent: Any {
    /// Declared type name used to select a member codec
    fn type_name(&self) -> &str;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Saves and restores the fields of one agent type
///
/// `load_fields` must either fully apply the node or leave the agent
/// untouched.
pub trait MemberCodec: Send + Sync {
    fn save_fields(&self, agent: &dyn Agent, node: &mut DocumentNode) -> Result<()>;

    fn load_fields(&self, agent: &mut dyn Agent, node: &DocumentNode) -> Result<()>;
}

/// Member codecs keyed by agent type name
#[derive(Default)]
pub struct MemberCodecs {
    codecs: HashMap<String, Box<dyn MemberCodec>>,
}

impl MemberCodecs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a codec for an agent type name
    pub fn register(&mut self, type_name: impl Into<String>, codec: impl MemberCodec + 'static) {
        self.codecs.insert(type_name.into(), Box::new(codec));
    }

    /// Register a `SerdeMemberCodec` for `T`
    pub fn register_serde<T>(&mut self, type_name: impl Into<String>)
    where
        T: Agent + Serialize + DeserializeOwned,
    {
        self.register(type_name, SerdeMemberCodec::<T>::new());
    }

    pub fn get(&self, type_name: &str) -> Option<&dyn MemberCodec> {
        self.codecs.get(type_name).map(|c| c.as_ref())
    }

    pub fn len(&self) -> usize {
        self.codecs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codecs.is_empty()
    }
}

/// Member codec for agents that implement serde
///
/// Each top-level field becomes a `field` child carrying `name` and a JSON
/// encoded `value`. Fields missing from the document keep their current
/// values on load.
pub struct SerdeMemberCodec<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> SerdeMemberCodec<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for SerdeMemberCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> MemberCodec for SerdeMemberCodec<T>
where
    T: Agent + Serialize + DeserializeOwned,
{
    fn save_fields(&self, agent: &dyn Agent, node: &mut DocumentNode) -> Result<()> {
        let typed = agent
            .as_any()
            .downcast_ref::<T>()
            .ok_or_else(|| mismatch::<T>(agent))?;

        let serde_json::Value::Object(fields) = serde_json::to_value(typed)? else {
            return Err(StateError::Members {
                type_name: agent.type_name().to_string(),
                reason: "agent does not serialize to a struct".to_string(),
            });
        };

        for (name, value) in &fields {
            let field = node.new_child(FIELD_TAG);
            field.set_attr("name", name.as_str());
            field.set_attr("value", serde_json::to_string(value)?);
        }
        Ok(())
    }

    fn load_fields(&self, agent: &mut dyn Agent, node: &DocumentNode) -> Result<()> {
        let type_name = agent.type_name().to_string();
        let mismatch_err = mismatch::<T>(agent);
        let typed = agent
            .as_any_mut()
            .downcast_mut::<T>()
            .ok_or(mismatch_err)?;

        let serde_json::Value::Object(mut fields) = serde_json::to_value(&*typed)? else {
            return Err(StateError::Members {
                type_name,
                reason: "agent does not serialize to a struct".to_string(),
            });
        };

        for field in node.children().filter(|c| c.tag() == FIELD_TAG) {
            let Some(name) = field.attr("name") else {
                continue;
            };
            let value = match field.attr("value") {
                Some(text) => serde_json::from_str(text)?,
                None => serde_json::Value::Null,
            };
            fields.insert(name.to_string(), value);
        }

        let restored: T =
            serde_json::from_value(serde_json::Value::Object(fields)).map_err(|e| {
                StateError::Members {
                    type_name,
                    reason: e.to_string(),
                }
            })?;
        *typed = restored;
        Ok(())
    }
}

fn mismatch<T>(agent: &dyn Agent) -> StateError {
    StateError::Members {
        type_name: agent.type_name().to_string(),
        reason: format!("codec expects {}", std::any::type_name::<T>()),
    }
}
