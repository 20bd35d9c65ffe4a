//! State document stores
//!
//! Provides pluggable persistence for serialized agent state documents.
//! `AgentState::save_to_store`/`load_from_store` accept any `StateStore`;
//! `save_to_file`/`load_from_file` use a `FileStateStore`.

use crate::config::PersistConfig;
use crate::document::DocumentNode;
use crate::error::{Result, StateError};
use std::path::{Path, PathBuf};

/// Trait for persisting state documents
pub trait StateStore: Send + Sync {
    /// Save a document, replacing whatever was stored before
    fn save(&self, document: &DocumentNode) -> Result<()>;

    /// Load the stored document, `None` if nothing has been saved
    fn load(&self) -> Result<Option<DocumentNode>>;
}

/// JSON file-based state store
///
/// Missing parent directories are created on save. With
/// `PersistConfig::atomic` the document is written to a temp file and
/// renamed into place.
pub struct FileStateStore {
    path: PathBuf,
    config: PersistConfig,
}

impl FileStateStore {
    /// Create a new file state store at the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            config: PersistConfig::default(),
        }
    }

    /// Use a custom persistence configuration
    pub fn with_config(mut self, config: PersistConfig) -> Self {
        self.config = config;
        self
    }

    /// Get the file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &PersistConfig {
        &self.config
    }

    /// Temp file used for atomic writes: the full file name plus the temp
    /// extension (`state.json` → `state.json.tmp`)
    pub fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".");
        name.push(&self.config.temp_extension);
        self.path.with_file_name(name)
    }
}

impl StateStore for FileStateStore {
    fn save(&self, document: &DocumentNode) -> Result<()> {
        self.config.validate()?;
        let json = document.to_json(self.config.pretty)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| StateError::io(parent, e))?;
            }
        }

        if self.config.atomic {
            let tmp_path = self.temp_path();
            std::fs::write(&tmp_path, json).map_err(|e| StateError::io(&tmp_path, e))?;
            if let Err(e) = std::fs::rename(&tmp_path, &self.path) {
                let _ = std::fs::remove_file(&tmp_path);
                return Err(StateError::io(&self.path, e));
            }
        } else {
            std::fs::write(&self.path, json).map_err(|e| StateError::io(&self.path, e))?;
        }

        tracing::debug!(path = %self.path.display(), "State saved");
        Ok(())
    }

    fn load(&self) -> Result<Option<DocumentNode>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let json =
            std::fs::read_to_string(&self.path).map_err(|e| StateError::io(&self.path, e))?;

        let document = DocumentNode::from_json(&json).map_err(|e| {
            StateError::Document(format!(
                "Failed to parse state file {}: {}",
                self.path.display(),
                e
            ))
        })?;

        tracing::debug!(
            path = %self.path.display(),
            children = document.child_count(),
            "State loaded"
        );
        Ok(Some(document))
    }
}

/// In-memory state store for testing
///
/// Stores the document in memory — lost on drop, but useful for tests.
#[derive(Default)]
pub struct MemoryStateStore {
    document: std::sync::RwLock<Option<DocumentNode>>,
}

impl StateStore for MemoryStateStore {
    fn save(&self, document: &DocumentNode) -> Result<()> {
        let mut stored = self.document.write().map_err(|e| {
            StateError::Config(format!("Failed to acquire state lock: {}", e))
        })?;
        *stored = Some(document.clone());
        Ok(())
    }

    fn load(&self) -> Result<Option<DocumentNode>> {
        let stored = self.document.read().map_err(|e| {
            StateError::Config(format!("Failed to acquire state lock: {}", e))
        })?;
        Ok(stored.clone())
    }
}
