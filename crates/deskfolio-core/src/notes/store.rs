//! The notes persistence slot.
//!
//! A slot holds the whole collection as one JSON array; every save rewrites it.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::Note;
use crate::error::StoreError;

pub trait NoteStore: Send {
    /// Read the slot. Missing or unparsable content yields an empty list.
    fn load(&self) -> Vec<Note>;

    /// Overwrite the slot with a snapshot of `notes`
    fn save(&self, notes: &[Note]) -> Result<(), StoreError>;
}

fn parse_slot(raw: &str, origin: &str) -> Vec<Note> {
    match serde_json::from_str::<Vec<Note>>(raw) {
        Ok(notes) => notes,
        Err(e) => {
            tracing::warn!(slot = origin, error = %e, "Discarding unreadable notes slot");
            Vec::new()
        }
    }
}

/// Slot backed by a JSON file on disk
pub struct FileNoteStore {
    path: PathBuf,
}

impl FileNoteStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling file a save is staged in before it replaces the slot
    fn staging_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

impl NoteStore for FileNoteStore {
    fn load(&self) -> Vec<Note> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => parse_slot(&raw, &self.path.display().to_string()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to read notes slot");
                Vec::new()
            }
        }
    }

    fn save(&self, notes: &[Note]) -> Result<(), StoreError> {
        let display = self.path.display().to_string();
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(&display, e))?;
        }

        let raw = serde_json::to_string(notes)?;

        // Write the temp file, then rename over the slot
        let staging = self.staging_path();
        fs::write(&staging, raw)
            .map_err(|e| StoreError::io(staging.display().to_string(), e))?;
        if let Err(e) = fs::rename(&staging, &self.path) {
            let _ = fs::remove_file(&staging);
            return Err(StoreError::io(&display, e));
        }
        Ok(())
    }
}

/// Slot kept in memory as serialized JSON text.
///
/// Clones share the same slot, so a test can keep one handle and inspect what
/// the session wrote through another.
#[derive(Clone, Default)]
pub struct MemoryNoteStore {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryNoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing raw slot content
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(raw.into()))),
        }
    }

    pub fn raw(&self) -> Option<String> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }
}

impl NoteStore for MemoryNoteStore {
    fn load(&self) -> Vec<Note> {
        match self.raw() {
            Some(raw) => parse_slot(&raw, "memory"),
            None => Vec::new(),
        }
    }

    fn save(&self, notes: &[Note]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(notes)?;
        if let Ok(mut slot) = self.slot.lock() {
            *slot = Some(raw);
        }
        Ok(())
    }
}
