//! Desktop-wide context: theme, clock, and the dock.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};

use crate::persona::Persona;
use crate::window::WindowKind;

/// Theme and clock shared by every part of the desktop
#[derive(Debug, Clone)]
pub struct DesktopContext {
    pub dark: bool,
    pub now: DateTime<Local>,
}

impl DesktopContext {
    pub fn new(dark: bool) -> Self {
        Self {
            dark,
            now: Local::now(),
        }
    }

    /// Flip light/dark; returns the new value of `dark`
    pub fn toggle_theme(&mut self) -> bool {
        self.dark = !self.dark;
        tracing::debug!(dark = self.dark, "Theme toggled");
        self.dark
    }

    pub fn refresh_clock(&mut self) {
        self.now = Local::now();
    }

    pub fn set_now(&mut self, now: DateTime<Local>) {
        self.now = now;
    }

    /// Menu-bar clock, e.g. "Mon Oct 19 3:05 PM"
    pub fn menu_clock(&self) -> String {
        format_menu_clock(&self.now.naive_local())
    }
}

pub fn format_menu_clock(time: &NaiveDateTime) -> String {
    time.format("%a %b %-d %-I:%M %p").to_string()
}

/// Local time helper for tests and fixed-clock rendering
pub fn local_time(time: NaiveDateTime) -> Option<DateTime<Local>> {
    Local.from_local_datetime(&time).single()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DockItem {
    Notes,
    Blog,
    Email,
    GitHub,
    Calendar,
    Spotify,
    VSCode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DockAction {
    Launch(WindowKind),
    OpenLink(String),
}

impl DockItem {
    pub fn all() -> [DockItem; 7] {
        [
            DockItem::Notes,
            DockItem::Blog,
            DockItem::Email,
            DockItem::GitHub,
            DockItem::Calendar,
            DockItem::Spotify,
            DockItem::VSCode,
        ]
    }

    /// Short label drawn on the dock itself
    pub fn label(&self) -> &'static str {
        match self {
            DockItem::Notes => "Notes",
            DockItem::Blog => "Blog",
            DockItem::Email => "Mail",
            DockItem::GitHub => "GitHub",
            DockItem::Calendar => "Cal",
            DockItem::Spotify => "Music",
            DockItem::VSCode => "Code",
        }
    }

    /// Text shown while hovering
    pub fn tooltip(&self) -> &'static str {
        match self {
            DockItem::Notes => "Notes",
            DockItem::Blog => "Blog Posts",
            DockItem::Email => "Email Me",
            DockItem::GitHub => "My GitHub",
            DockItem::Calendar => "Book a Call",
            DockItem::Spotify => "My Dev Playlist",
            DockItem::VSCode => "Launch VS Code",
        }
    }

    pub fn action(&self, persona: &Persona) -> DockAction {
        match self {
            DockItem::Notes => DockAction::Launch(WindowKind::Notes),
            DockItem::Blog => DockAction::Launch(WindowKind::Blog),
            DockItem::Email => DockAction::OpenLink(format!("mailto:{}", persona.email)),
            DockItem::GitHub => DockAction::OpenLink(with_scheme(&persona.github)),
            DockItem::Calendar => DockAction::OpenLink(persona.calendar_url.clone()),
            DockItem::Spotify => DockAction::OpenLink(persona.playlist_url.clone()),
            DockItem::VSCode => DockAction::OpenLink("vscode:/".to_string()),
        }
    }
}

fn with_scheme(url: &str) -> String {
    if url.contains("://") {
        url.to_string()
    } else {
        format!("https://{}", url)
    }
}
