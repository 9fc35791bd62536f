//! Explanation history
//!
//! In-memory list of explanations, newest first, optionally persisted as a
//! JSON file. Sessions insert an in-progress placeholder, mutate only their
//! own entry, and either finalize or remove it; only finalized entries are
//! ever written to disk, so a crashed or failed session leaves no trace.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::api::ExplainRequest;
use crate::error::ExplainError;
use crate::stream::ExplanationFields;

pub type ExplanationId = String;

/// One stored explanation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    pub id: ExplanationId,
    pub code: String,
    pub language: String,
    #[serde(default)]
    pub title: String,
    pub explanation: String,
    pub timestamp: DateTime<Utc>,
    /// False while the owning session is still streaming.
    #[serde(default = "complete_default", skip_serializing)]
    pub complete: bool,
}

fn complete_default() -> bool {
    true
}

impl Explanation {
    /// In-progress placeholder for a session that just started.
    pub fn started(request: &ExplainRequest) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            code: request.code.clone(),
            language: request.language.clone(),
            title: String::new(),
            explanation: String::new(),
            timestamp: Utc::now(),
            complete: false,
        }
    }
}

/// History store shared by independent sessions.
///
/// Entries are only ever mutated by their owning session; the lock just makes
/// concurrent sessions over distinct entries safe.
pub struct HistoryStore {
    entries: RwLock<Vec<Explanation>>,
    path: Option<PathBuf>,
}

impl HistoryStore {
    /// Store without persistence.
    pub fn in_memory() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            path: None,
        }
    }

    /// Store backed by a JSON file; a missing file is an empty history.
    pub fn load(path: PathBuf) -> Result<Self, ExplainError> {
        let entries = match std::fs::read_to_string(&path) {
            Ok(json) => serde_json::from_str(&json)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(err) => return Err(err.into()),
        };
        Ok(Self {
            entries: RwLock::new(entries),
            path: Some(path),
        })
    }

    /// Default location: `<user data dir>/xc/history.json`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join("xc").join("history.json"))
    }

    /// Insert a new entry at the front (newest first).
    pub fn insert(&self, entry: Explanation) {
        self.entries.write().insert(0, entry);
    }

    /// Republish a streaming snapshot into an in-progress entry.
    ///
    /// In-memory only; nothing is persisted until the entry is finalized.
    pub fn update_fields(&self, id: &str, fields: &ExplanationFields) {
        if let Some(entry) = self.entries.write().iter_mut().find(|e| e.id == id) {
            entry.title = fields.title.clone();
            entry.language = fields.language.clone();
            entry.explanation = fields.explanation.clone();
        }
    }

    /// Finalize an entry with the authoritative field values and persist.
    pub fn complete(&self, id: &str, fields: &ExplanationFields) -> Option<Explanation> {
        let completed = {
            let mut entries = self.entries.write();
            let entry = entries.iter_mut().find(|e| e.id == id)?;
            entry.title = fields.title.clone();
            entry.language = fields.language.clone();
            entry.explanation = fields.explanation.clone();
            entry.complete = true;
            entry.clone()
        };
        self.save();
        Some(completed)
    }

    /// Remove an entry (failed session rollback) and persist.
    pub fn remove(&self, id: &str) -> Option<Explanation> {
        let removed = {
            let mut entries = self.entries.write();
            let index = entries.iter().position(|e| e.id == id)?;
            entries.remove(index)
        };
        self.save();
        Some(removed)
    }

    pub fn get(&self, id: &str) -> Option<Explanation> {
        self.entries.read().iter().find(|e| e.id == id).cloned()
    }

    /// Snapshot of all entries, newest first.
    pub fn entries(&self) -> Vec<Explanation> {
        self.entries.read().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Write finalized entries to disk. Persistence failures are logged, not
    /// raised - they must not abort a session that already succeeded.
    fn save(&self) {
        let Some(path) = self.path.as_deref() else {
            return;
        };
        let finalized: Vec<Explanation> = self
            .entries
            .read()
            .iter()
            .filter(|e| e.complete)
            .cloned()
            .collect();
        if let Err(err) = write_json(path, &finalized) {
            warn!("failed to persist history to {}: {err}", path.display());
        }
    }
}

fn write_json(path: &Path, entries: &[Explanation]) -> Result<(), ExplainError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(entries)?;
    std::fs::write(path, json)?;
    Ok(())
}
