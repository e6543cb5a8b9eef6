use std::path::PathBuf;
use std::sync::Arc;

use chrono::Local;
use ratatui::layout::Rect;
use ratatui::widgets::ListState;
use tokio::task::JoinHandle;

use deskfolio_core::notes::FileNoteStore;
use deskfolio_core::{
    BlogLibrary, BlogView, ChatSession, CompletionGateway, DesktopContext, DockAction, DockItem,
    GatewayError, HttpGateway, NotePatch, NoteSession, Persona, PlaceholderCycle, WindowKind,
    WindowManager,
};

use crate::tui::TICK_RATE;

/// Which part of the desktop receives keyboard input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Terminal,
    Window(WindowKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotesPane {
    #[default]
    List,
    Search,
    Title,
    Content,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlogPane {
    #[default]
    List,
    Search,
    Draft,
}

/// A title-bar drag in progress, holding where the cursor grabbed the window
/// relative to its origin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragState {
    pub kind: WindowKind,
    pub grab_x: i32,
    pub grab_y: i32,
}

/// Rendered window frame, kept for mouse hit-testing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowHit {
    pub kind: WindowKind,
    pub area: Rect,
    /// Left edge the title-bar buttons are drawn from; `None` when clipped off screen
    pub buttons_x: Option<u16>,
}

/// Startup choices resolved from the command line and config
pub struct AppOptions {
    pub notes_path: PathBuf,
    pub gateway: Arc<dyn CompletionGateway>,
    pub persona: Persona,
    pub dark: bool,
}

impl AppOptions {
    pub fn http(notes_path: PathBuf, gateway_url: &str, persona: Persona, dark: bool) -> Self {
        Self {
            notes_path,
            gateway: Arc::new(HttpGateway::new(gateway_url)),
            persona,
            dark,
        }
    }
}

pub struct App {
    pub should_quit: bool,
    pub focus: Focus,
    pub desktop: DesktopContext,
    pub windows: WindowManager,
    pub persona: Persona,

    // Notes window
    pub notes: NoteSession,
    pub notes_pane: NotesPane,
    pub notes_query: String,
    pub notes_state: ListState,

    // Blog window
    pub blog: BlogLibrary,
    pub blog_pane: BlogPane,
    pub blog_query: String,
    pub blog_state: ListState,

    // Terminal
    pub chat: ChatSession,
    pub chat_cursor: usize, // cursor position in the chat input, in chars
    pub chat_scroll: u16,
    pub chat_height: u16,
    pub chat_width: u16,
    pub follow_chat: bool,
    pub chat_task: Option<JoinHandle<Result<String, GatewayError>>>,
    pub gateway: Arc<dyn CompletionGateway>,
    pub placeholder: PlaceholderCycle,
    pub animation_frame: u8,

    // Pointer state
    pub hovered_dock: Option<DockItem>,
    pub drag: Option<DragState>,
    pub status: Option<String>,

    // Areas for mouse hit-testing (updated during render)
    pub terminal_area: Option<Rect>,
    pub window_areas: Vec<WindowHit>,
    pub dock_areas: Vec<(DockItem, Rect)>,
    pub control_center_button: Option<Rect>,
    pub theme_toggle_area: Option<Rect>,
}

impl App {
    pub fn new(options: AppOptions) -> Self {
        let notes = NoteSession::open(Box::new(FileNoteStore::new(options.notes_path)));
        let placeholder = PlaceholderCycle::new(options.persona.placeholders());

        Self {
            should_quit: false,
            focus: Focus::Terminal,
            desktop: DesktopContext::new(options.dark),
            windows: WindowManager::new(),
            persona: options.persona.clone(),

            notes,
            notes_pane: NotesPane::default(),
            notes_query: String::new(),
            notes_state: ListState::default(),

            blog: BlogLibrary::with_samples(Local::now().date_naive()),
            blog_pane: BlogPane::default(),
            blog_query: String::new(),
            blog_state: ListState::default(),

            chat: ChatSession::new(options.persona),
            chat_cursor: 0,
            chat_scroll: 0,
            chat_height: 0,
            chat_width: 0,
            follow_chat: true,
            chat_task: None,
            gateway: options.gateway,
            placeholder,
            animation_frame: 0,

            hovered_dock: None,
            drag: None,
            status: None,

            terminal_area: None,
            window_areas: Vec::new(),
            dock_areas: Vec::new(),
            control_center_button: None,
            theme_toggle_area: None,
        }
    }

    // Window actions

    pub fn launch(&mut self, kind: WindowKind) {
        self.windows.launch(kind);
        self.focus = Focus::Window(kind);
        self.status = None;
    }

    pub fn close(&mut self, kind: WindowKind) {
        self.windows.close(kind);
        if self.drag.map(|d| d.kind) == Some(kind) {
            self.drag = None;
        }
        self.focus = self
            .windows
            .focused()
            .map(Focus::Window)
            .unwrap_or(Focus::Terminal);
    }

    pub fn toggle_control_center(&mut self) {
        if self.windows.is_open(WindowKind::ControlCenter) {
            self.close(WindowKind::ControlCenter);
        } else {
            self.launch(WindowKind::ControlCenter);
        }
    }

    pub fn focus_window(&mut self, kind: WindowKind) {
        self.windows.focus(kind);
        if self.windows.is_open(kind) {
            self.focus = Focus::Window(kind);
        }
    }

    /// Terminal -> front window; otherwise rotate through the open windows
    pub fn cycle_focus(&mut self) {
        let next = match self.focus {
            Focus::Terminal => self.windows.focused(),
            Focus::Window(_) => self.windows.cycle_focus(),
        };
        if let Some(kind) = next {
            self.focus = Focus::Window(kind);
        }
    }

    pub fn focused_window(&self) -> Option<WindowKind> {
        match self.focus {
            Focus::Window(kind) if self.windows.is_open(kind) => Some(kind),
            _ => None,
        }
    }

    pub fn activate_dock(&mut self, item: DockItem) {
        match item.action(&self.persona) {
            DockAction::Launch(kind) => self.launch(kind),
            DockAction::OpenLink(url) => self.open_link(&url),
        }
    }

    fn open_link(&mut self, url: &str) {
        tracing::info!(url, "Opening link");
        match open::that_detached(url) {
            Ok(()) => self.status = Some(format!("Opened {}", url)),
            Err(e) => {
                tracing::warn!(url, error = %e, "Failed to open link");
                self.status = Some(format!("Couldn't open {}", url));
            }
        }
    }

    pub fn toggle_theme(&mut self) {
        self.desktop.toggle_theme();
    }

    // Notes

    /// Ids of notes matching the sidebar search, in list order
    pub fn visible_note_ids(&self) -> Vec<String> {
        self.notes
            .search(&self.notes_query)
            .into_iter()
            .map(|note| note.id.clone())
            .collect()
    }

    /// Keep the list highlight on the selected note
    pub fn sync_notes_state(&mut self) {
        let ids = self.visible_note_ids();
        let position = self
            .notes
            .selected_id()
            .and_then(|id| ids.iter().position(|visible| visible == id));
        self.notes_state.select(position);
    }

    pub fn notes_nav(&mut self, delta: isize) {
        let ids = self.visible_note_ids();
        if ids.is_empty() {
            return;
        }
        let current = self
            .notes
            .selected_id()
            .and_then(|id| ids.iter().position(|visible| visible == id));
        let next = match current {
            Some(i) => (i as isize + delta).clamp(0, ids.len() as isize - 1) as usize,
            None => 0,
        };
        self.notes.select(&ids[next]);
        self.sync_notes_state();
    }

    pub fn new_note(&mut self) {
        self.notes_query.clear();
        self.notes.create();
        self.notes_pane = NotesPane::Title;
        self.sync_notes_state();
    }

    pub fn delete_selected_note(&mut self) {
        if let Some(id) = self.notes.selected_id().map(str::to_string) {
            self.notes.delete(&id);
            self.notes_pane = NotesPane::List;
            self.sync_notes_state();
        }
    }

    /// Apply an edit to the selected note's title or content. Edits that leave
    /// the text unchanged are not saved.
    pub fn edit_selected_note(&mut self, edit: impl FnOnce(&mut String)) {
        let Some(note) = self.notes.selected() else {
            return;
        };
        let id = note.id.clone();
        let patch = match self.notes_pane {
            NotesPane::Title => {
                let mut title = note.title.clone();
                edit(&mut title);
                if title == note.title {
                    return;
                }
                NotePatch::title(title)
            }
            NotesPane::Content => {
                let mut content = note.content.clone();
                edit(&mut content);
                if content == note.content {
                    return;
                }
                NotePatch::content(content)
            }
            NotesPane::List | NotesPane::Search => return,
        };
        self.notes.update(&id, patch);
    }

    // Blog

    pub fn visible_post_ids(&self) -> Vec<u32> {
        self.blog
            .search(&self.blog_query)
            .into_iter()
            .map(|post| post.id)
            .collect()
    }

    pub fn sync_blog_state(&mut self) {
        let ids = self.visible_post_ids();
        let position = self
            .blog
            .selected()
            .and_then(|post| ids.iter().position(|id| *id == post.id));
        self.blog_state.select(position);
    }

    pub fn blog_nav(&mut self, delta: isize) {
        let ids = self.visible_post_ids();
        if ids.is_empty() {
            return;
        }
        let current = self
            .blog
            .selected()
            .and_then(|post| ids.iter().position(|id| *id == post.id));
        let next = match current {
            Some(i) => (i as isize + delta).clamp(0, ids.len() as isize - 1) as usize,
            None => 0,
        };
        self.blog.select(ids[next]);
        self.blog_pane = BlogPane::List;
        self.sync_blog_state();
    }

    pub fn toggle_blog_view(&mut self) {
        self.blog.toggle_view();
        self.blog_pane = match self.blog.view() {
            BlogView::Edit => BlogPane::Draft,
            BlogView::Preview => BlogPane::List,
        };
    }

    // Terminal

    pub fn submit_chat(&mut self) {
        if self.chat_task.is_some() {
            return;
        }
        let Some(request) = self.chat.begin_submit_input() else {
            return;
        };

        self.chat_cursor = 0;
        self.follow_chat = true;

        let gateway = Arc::clone(&self.gateway);
        self.chat_task = Some(tokio::spawn(async move { gateway.complete(request).await }));
    }

    /// Collect a finished chat request, if any
    pub async fn poll_chat_task(&mut self) {
        let finished = self
            .chat_task
            .as_ref()
            .map(|task| task.is_finished())
            .unwrap_or(false);
        if !finished {
            return;
        }

        if let Some(task) = self.chat_task.take() {
            let result = match task.await {
                Ok(result) => result,
                Err(e) => Err(GatewayError::Upstream(format!("chat task failed: {}", e))),
            };
            self.chat.complete(result);
            self.follow_chat = true;
        }
    }

    pub fn scroll_chat(&mut self, delta: i32) {
        self.follow_chat = false;
        self.chat_scroll = if delta < 0 {
            self.chat_scroll.saturating_sub(delta.unsigned_abs() as u16)
        } else {
            self.chat_scroll.saturating_add(delta as u16)
        };
    }

    /// Tick animation state (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.chat.is_in_flight() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
        if self.chat.input().is_empty() {
            self.placeholder.advance(TICK_RATE);
        }
    }

    pub fn refresh_clock(&mut self) {
        self.desktop.refresh_clock();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use deskfolio_core::ChatRequest;

    struct EchoGateway;

    #[async_trait]
    impl CompletionGateway for EchoGateway {
        async fn complete(&self, request: ChatRequest) -> Result<String, GatewayError> {
            let last = request.messages.last().map(|m| m.content.clone());
            Ok(format!("echo: {}", last.unwrap_or_default()))
        }
    }

    fn test_app(dir: &tempfile::TempDir) -> App {
        App::new(AppOptions {
            notes_path: dir.path().join("notes.json"),
            gateway: Arc::new(EchoGateway),
            persona: Persona::default(),
            dark: true,
        })
    }

    #[test]
    fn test_launch_and_close_move_focus() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(&dir);

        app.launch(WindowKind::Notes);
        app.launch(WindowKind::Blog);
        assert_eq!(app.focus, Focus::Window(WindowKind::Blog));

        app.close(WindowKind::Blog);
        assert_eq!(app.focus, Focus::Window(WindowKind::Notes));

        app.close(WindowKind::Notes);
        assert_eq!(app.focus, Focus::Terminal);
    }

    #[test]
    fn test_cycle_focus_from_terminal() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(&dir);
        app.cycle_focus();
        assert_eq!(app.focus, Focus::Terminal);

        app.launch(WindowKind::Notes);
        app.launch(WindowKind::Blog);
        app.focus = Focus::Terminal;
        app.cycle_focus();
        assert_eq!(app.focus, Focus::Window(WindowKind::Blog));
        app.cycle_focus();
        assert_eq!(app.focus, Focus::Window(WindowKind::Notes));
    }

    #[test]
    fn test_dock_launches_windows() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(&dir);
        app.activate_dock(DockItem::Blog);
        assert!(app.windows.is_open(WindowKind::Blog));
        assert_eq!(app.focused_window(), Some(WindowKind::Blog));
    }

    #[test]
    fn test_note_editing_follows_pane() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(&dir);
        app.new_note();
        assert_eq!(app.notes_pane, NotesPane::Title);

        app.edit_selected_note(|title| {
            title.clear();
            title.push_str("Groceries");
        });
        app.notes_pane = NotesPane::Content;
        app.edit_selected_note(|content| content.push_str("milk"));

        let note = app.notes.selected().unwrap();
        assert_eq!(note.title, "Groceries");
        assert_eq!(note.content, "milk");
        assert_eq!(app.notes_state.selected(), Some(0));
    }

    #[test]
    fn test_unchanged_edit_is_not_saved() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(&dir);
        app.new_note();
        app.notes_pane = NotesPane::Content;
        let before = app.notes.selected().unwrap().last_modified;
        let slot = dir.path().join("notes.json");
        std::fs::remove_file(&slot).unwrap();

        // Backspace on empty content
        app.edit_selected_note(|content| {
            content.pop();
        });

        assert_eq!(app.notes.selected().unwrap().last_modified, before);
        assert!(!slot.exists());
    }

    #[test]
    fn test_notes_nav_respects_search() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(&dir);
        app.new_note();
        app.notes_pane = NotesPane::Title;
        app.edit_selected_note(|t| *t = "alpha".to_string());
        app.new_note();
        app.edit_selected_note(|t| *t = "beta".to_string());

        app.notes_query = "alp".to_string();
        app.notes_nav(1);
        assert_eq!(app.notes.selected().unwrap().title, "alpha");
        assert_eq!(app.notes_state.selected(), Some(0));
    }

    #[test]
    fn test_delete_clears_selection() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(&dir);
        app.new_note();
        app.delete_selected_note();
        assert!(app.notes.notes().is_empty());
        assert!(app.notes.selected().is_none());
        assert_eq!(app.notes_state.selected(), None);
    }

    #[test]
    fn test_blog_nav_and_view() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(&dir);
        app.blog_nav(1);
        assert_eq!(app.blog.selected().unwrap().id, 1);
        app.blog_nav(1);
        assert_eq!(app.blog.selected().unwrap().id, 2);

        app.toggle_blog_view();
        assert_eq!(app.blog_pane, BlogPane::Draft);
        app.toggle_blog_view();
        assert_eq!(app.blog_pane, BlogPane::List);
    }

    #[tokio::test]
    async fn test_chat_round_trip_through_task() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(&dir);
        app.chat.set_input("Hi");
        app.submit_chat();
        assert!(app.chat.is_in_flight());
        assert_eq!(app.chat.input(), "");

        // Second submit is ignored while the first is outstanding
        app.chat.set_input("again");
        app.submit_chat();
        assert_eq!(app.chat.input(), "again");

        while app.chat.is_in_flight() {
            tokio::task::yield_now().await;
            app.poll_chat_task().await;
        }

        let last = app.chat.transcript().last().unwrap();
        assert_eq!(last.content, "echo: Hi");
        assert!(app.chat_task.is_none());
    }
}
