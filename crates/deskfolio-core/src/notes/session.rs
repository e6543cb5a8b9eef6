//! In-memory working copy of the notes, written through to a `NoteStore`.

use chrono::Utc;

use super::{Note, NoteStore, DEFAULT_FOLDER, DEFAULT_TITLE};

/// Fields to merge into an existing note; `None` leaves a field untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotePatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub folder: Option<String>,
}

impl NotePatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }
}

pub struct NoteSession {
    notes: Vec<Note>,
    selected: Option<String>,
    store: Box<dyn NoteStore>,
    last_issued_id: i64,
}

impl NoteSession {
    /// Load the working list from `store`
    pub fn open(store: Box<dyn NoteStore>) -> Self {
        let notes = store.load();
        let last_issued_id = notes
            .iter()
            .filter_map(|note| note.id.parse::<i64>().ok())
            .max()
            .unwrap_or(0);

        tracing::debug!(count = notes.len(), "Loaded notes");

        Self {
            notes,
            selected: None,
            store,
            last_issued_id,
        }
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn get(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == id)
    }

    pub fn selected(&self) -> Option<&Note> {
        self.selected.as_deref().and_then(|id| self.get(id))
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Select an existing note; returns false when `id` is unknown
    pub fn select(&mut self, id: &str) -> bool {
        if self.get(id).is_some() {
            self.selected = Some(id.to_string());
            true
        } else {
            false
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Insert a fresh note at the head of the list and select it
    pub fn create(&mut self) -> Note {
        let note = Note {
            id: self.next_id(),
            title: DEFAULT_TITLE.to_string(),
            content: String::new(),
            last_modified: Utc::now(),
            folder: DEFAULT_FOLDER.to_string(),
        };

        self.notes.insert(0, note.clone());
        self.selected = Some(note.id.clone());
        self.persist();

        tracing::info!(note_id = %note.id, "Created note");
        note
    }

    /// Merge `patch` into the note with `id` and stamp it. Unknown ids are ignored.
    pub fn update(&mut self, id: &str, patch: NotePatch) {
        let Some(note) = self.notes.iter_mut().find(|note| note.id == id) else {
            return;
        };

        if let Some(title) = patch.title {
            note.title = title;
        }
        if let Some(content) = patch.content {
            note.content = content;
        }
        if let Some(folder) = patch.folder {
            note.folder = folder;
        }
        note.last_modified = Utc::now();

        self.persist();
    }

    /// Remove the note with `id`, clearing the selection if it pointed there
    pub fn delete(&mut self, id: &str) {
        let before = self.notes.len();
        self.notes.retain(|note| note.id != id);
        if self.notes.len() == before {
            return;
        }

        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
        self.persist();

        tracing::info!(note_id = %id, "Deleted note");
    }

    /// Notes whose title or content contains `query`, ignoring case
    pub fn search(&self, query: &str) -> Vec<&Note> {
        if query.is_empty() {
            return self.notes.iter().collect();
        }

        let needle = query.to_lowercase();
        self.notes.iter().filter(|note| note.matches(&needle)).collect()
    }

    // Time-based, bumped past the previous id when creations share a millisecond
    fn next_id(&mut self) -> String {
        let now = Utc::now().timestamp_millis();
        let id = now.max(self.last_issued_id + 1);
        self.last_issued_id = id;
        id.to_string()
    }

    fn persist(&self) {
        if let Err(e) = self.store.save(&self.notes) {
            tracing::warn!(error = %e, "Failed to persist notes");
        }
    }
}
