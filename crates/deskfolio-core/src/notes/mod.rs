//! The Notes app: note records, their persistence slot, and the working session.

pub mod session;
pub mod store;

pub use session::{NotePatch, NoteSession};
pub use store::{FileNoteStore, MemoryNoteStore, NoteStore};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_TITLE: &str = "New Note";
pub const DEFAULT_FOLDER: &str = "Notes";

/// A single note as stored in the slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub title: String,
    pub content: String,
    pub last_modified: DateTime<Utc>,
    pub folder: String,
}

impl Note {
    /// First line of content, truncated for list previews
    pub fn preview(&self, max_chars: usize) -> String {
        self.content
            .lines()
            .find(|line| !line.trim().is_empty())
            .unwrap_or("")
            .chars()
            .take(max_chars)
            .collect()
    }

    fn matches(&self, needle_lower: &str) -> bool {
        self.title.to_lowercase().contains(needle_lower)
            || self.content.to_lowercase().contains(needle_lower)
    }
}
