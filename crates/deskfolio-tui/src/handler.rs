use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use deskfolio_core::{WindowKind, WindowPhase};

use crate::app::{App, BlogPane, DragState, Focus, NotesPane};
use crate::tui::AppEvent;

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

pub async fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => {
            app.tick_animation();
            app.poll_chat_task().await;
        }
        AppEvent::Clock => app.refresh_clock(),
    }
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work regardless of focus
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    if ctrl {
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') => {
                app.should_quit = true;
                return;
            }
            KeyCode::Char('n') => return app.launch(WindowKind::Notes),
            KeyCode::Char('b') => return app.launch(WindowKind::Blog),
            KeyCode::Char('o') => return app.toggle_control_center(),
            KeyCode::Char('t') => return app.toggle_theme(),
            _ => {}
        }
    }

    if key.code == KeyCode::Tab {
        app.cycle_focus();
        return;
    }

    if let Some(kind) = app.focused_window() {
        if handle_window_key(app, kind, key.code, ctrl, alt) {
            return;
        }
        match kind {
            WindowKind::Notes => handle_notes_key(app, key),
            WindowKind::Blog => handle_blog_key(app, key),
            WindowKind::ControlCenter => handle_control_center_key(app, key),
        }
    } else {
        app.focus = Focus::Terminal;
        handle_terminal_key(app, key);
    }
}

/// Move, resize, maximize, close. Returns true when the key was consumed.
fn handle_window_key(app: &mut App, kind: WindowKind, code: KeyCode, ctrl: bool, alt: bool) -> bool {
    let arrow = match code {
        KeyCode::Left => Some((-1, 0)),
        KeyCode::Right => Some((1, 0)),
        KeyCode::Up => Some((0, -1)),
        KeyCode::Down => Some((0, 1)),
        _ => None,
    };

    match (code, arrow) {
        (KeyCode::Char('w'), _) if ctrl => app.close(kind),
        (KeyCode::F(2), _) => app.windows.toggle_maximize(kind),
        (_, Some((dx, dy))) if ctrl => app.windows.drag(kind, dx * 2, dy),
        (_, Some((dw, dh))) if alt => app.windows.resize(kind, dw * 2, dh),
        _ => return false,
    }
    true
}

fn handle_terminal_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.submit_chat(),
        KeyCode::Backspace => {
            if app.chat_cursor > 0 {
                app.chat_cursor -= 1;
                let input = app.chat.input_mut();
                let byte_pos = char_to_byte_index(input, app.chat_cursor);
                input.remove(byte_pos);
            }
        }
        KeyCode::Delete => {
            let char_count = app.chat.input().chars().count();
            if app.chat_cursor < char_count {
                let cursor = app.chat_cursor;
                let input = app.chat.input_mut();
                let byte_pos = char_to_byte_index(input, cursor);
                input.remove(byte_pos);
            }
        }
        KeyCode::Left => {
            app.chat_cursor = app.chat_cursor.saturating_sub(1);
        }
        KeyCode::Right => {
            let char_count = app.chat.input().chars().count();
            app.chat_cursor = (app.chat_cursor + 1).min(char_count);
        }
        KeyCode::Home => app.chat_cursor = 0,
        KeyCode::End => app.chat_cursor = app.chat.input().chars().count(),
        KeyCode::Up => app.scroll_chat(-1),
        KeyCode::Down => app.scroll_chat(1),
        KeyCode::PageUp => app.scroll_chat(-(app.chat_height.max(2) as i32 / 2)),
        KeyCode::PageDown => app.scroll_chat(app.chat_height.max(2) as i32 / 2),
        KeyCode::Esc => app.chat_cursor = app.chat.input().chars().count(),
        KeyCode::Char(c) => {
            let cursor = app.chat_cursor;
            let input = app.chat.input_mut();
            let byte_pos = char_to_byte_index(input, cursor);
            input.insert(byte_pos, c);
            app.chat_cursor += 1;
        }
        _ => {}
    }
}

fn handle_notes_key(app: &mut App, key: KeyEvent) {
    match app.notes_pane {
        NotesPane::List => match key.code {
            KeyCode::Char('j') | KeyCode::Down => app.notes_nav(1),
            KeyCode::Char('k') | KeyCode::Up => app.notes_nav(-1),
            KeyCode::Char('n') => app.new_note(),
            KeyCode::Char('d') | KeyCode::Delete => app.delete_selected_note(),
            KeyCode::Char('/') => app.notes_pane = NotesPane::Search,
            KeyCode::Char('e') => {
                if app.notes.selected().is_some() {
                    app.notes_pane = NotesPane::Title;
                }
            }
            KeyCode::Enter => {
                if app.notes.selected().is_some() {
                    app.notes_pane = NotesPane::Content;
                }
            }
            KeyCode::Esc => app.focus = Focus::Terminal,
            _ => {}
        },
        NotesPane::Search => match key.code {
            KeyCode::Esc | KeyCode::Enter => app.notes_pane = NotesPane::List,
            KeyCode::Backspace => {
                app.notes_query.pop();
                app.sync_notes_state();
            }
            KeyCode::Char(c) => {
                app.notes_query.push(c);
                app.sync_notes_state();
            }
            KeyCode::Down => app.notes_nav(1),
            KeyCode::Up => app.notes_nav(-1),
            _ => {}
        },
        NotesPane::Title => match key.code {
            KeyCode::Esc => app.notes_pane = NotesPane::List,
            KeyCode::Enter => app.notes_pane = NotesPane::Content,
            KeyCode::Backspace => app.edit_selected_note(|title| {
                title.pop();
            }),
            KeyCode::Char(c) => app.edit_selected_note(|title| title.push(c)),
            _ => {}
        },
        NotesPane::Content => match key.code {
            KeyCode::Esc => app.notes_pane = NotesPane::List,
            KeyCode::Enter => app.edit_selected_note(|content| content.push('\n')),
            KeyCode::Backspace => app.edit_selected_note(|content| {
                content.pop();
            }),
            KeyCode::Char(c) => app.edit_selected_note(|content| content.push(c)),
            _ => {}
        },
    }
}

fn handle_blog_key(app: &mut App, key: KeyEvent) {
    match app.blog_pane {
        BlogPane::List => match key.code {
            KeyCode::Char('j') | KeyCode::Down => app.blog_nav(1),
            KeyCode::Char('k') | KeyCode::Up => app.blog_nav(-1),
            KeyCode::Char('/') => app.blog_pane = BlogPane::Search,
            KeyCode::Char('e') | KeyCode::Enter => app.toggle_blog_view(),
            KeyCode::Esc => app.focus = Focus::Terminal,
            _ => {}
        },
        BlogPane::Search => match key.code {
            KeyCode::Esc | KeyCode::Enter => app.blog_pane = BlogPane::List,
            KeyCode::Backspace => {
                app.blog_query.pop();
                app.sync_blog_state();
            }
            KeyCode::Char(c) => {
                app.blog_query.push(c);
                app.sync_blog_state();
            }
            _ => {}
        },
        BlogPane::Draft => match key.code {
            // Esc back to preview
            KeyCode::Esc => app.toggle_blog_view(),
            KeyCode::Enter => {
                if let Some(draft) = app.blog.draft_mut() {
                    draft.push('\n');
                }
            }
            KeyCode::Backspace => {
                if let Some(draft) = app.blog.draft_mut() {
                    draft.pop();
                }
            }
            KeyCode::Char(c) => {
                if let Some(draft) = app.blog.draft_mut() {
                    draft.push(c);
                }
            }
            _ => {}
        },
    }
}

fn handle_control_center_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('t') | KeyCode::Char(' ') | KeyCode::Enter => app.toggle_theme(),
        KeyCode::Esc => app.close(WindowKind::ControlCenter),
        _ => {}
    }
}

fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleButton {
    Close,
    Minimize,
    Maximize,
}

/// Traffic-light buttons sit at fixed offsets from the window's left edge
pub fn title_button_at(buttons_x: u16, column: u16) -> Option<TitleButton> {
    match column.checked_sub(buttons_x)? {
        2 => Some(TitleButton::Close),
        4 => Some(TitleButton::Minimize),
        6 => Some(TitleButton::Maximize),
        _ => None,
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let x = mouse.column;
    let y = mouse.row;

    match mouse.kind {
        MouseEventKind::Moved => {
            app.hovered_dock = app
                .dock_areas
                .iter()
                .find(|(_, area)| point_in_rect(x, y, *area))
                .map(|(item, _)| *item);
        }
        MouseEventKind::Down(MouseButton::Left) => handle_click(app, x, y),
        MouseEventKind::Drag(MouseButton::Left) => {
            // Move the window so the grab point sits under the cursor again
            if let Some(drag) = app.drag {
                if let Some(geometry) = app.windows.geometry(drag.kind) {
                    let dx = i32::from(x) - drag.grab_x - geometry.x;
                    let dy = i32::from(y) - drag.grab_y - geometry.y;
                    app.windows.drag(drag.kind, dx, dy);
                }
            }
        }
        MouseEventKind::Up(MouseButton::Left) => app.drag = None,
        MouseEventKind::ScrollDown => scroll_at(app, x, y, 1),
        MouseEventKind::ScrollUp => scroll_at(app, x, y, -1),
        _ => {}
    }
}

fn handle_click(app: &mut App, x: u16, y: u16) {
    if app.control_center_button.map(|r| point_in_rect(x, y, r)).unwrap_or(false) {
        app.toggle_control_center();
        return;
    }

    if let Some((item, _)) = app
        .dock_areas
        .iter()
        .find(|(_, area)| point_in_rect(x, y, *area))
        .copied()
    {
        app.activate_dock(item);
        return;
    }

    // Topmost window first
    let hit = app
        .window_areas
        .iter()
        .rev()
        .find(|hit| point_in_rect(x, y, hit.area))
        .copied();

    if let Some(hit) = hit {
        app.focus_window(hit.kind);

        if hit.kind == WindowKind::ControlCenter {
            if app.theme_toggle_area.map(|r| point_in_rect(x, y, r)).unwrap_or(false) {
                app.toggle_theme();
            }
            return;
        }

        if y == hit.area.y {
            match hit.buttons_x.and_then(|bx| title_button_at(bx, x)) {
                Some(TitleButton::Close) => app.close(hit.kind),
                Some(TitleButton::Maximize) => app.windows.toggle_maximize(hit.kind),
                Some(TitleButton::Minimize) => {}
                None => {
                    if app.windows.phase(hit.kind) == WindowPhase::Open {
                        if let Some(geometry) = app.windows.geometry(hit.kind) {
                            app.drag = Some(DragState {
                                kind: hit.kind,
                                grab_x: i32::from(x) - geometry.x,
                                grab_y: i32::from(y) - geometry.y,
                            });
                        }
                    }
                }
            }
        }
        return;
    }

    // Clicking the bare desktop dismisses the control center
    if app.windows.is_open(WindowKind::ControlCenter) {
        app.close(WindowKind::ControlCenter);
    }

    if app.terminal_area.map(|r| point_in_rect(x, y, r)).unwrap_or(false) {
        app.focus = Focus::Terminal;
    }
}

fn scroll_at(app: &mut App, x: u16, y: u16, delta: isize) {
    let hit = app
        .window_areas
        .iter()
        .rev()
        .find(|hit| point_in_rect(x, y, hit.area))
        .map(|hit| hit.kind);

    match hit {
        Some(WindowKind::Notes) => app.notes_nav(delta),
        Some(WindowKind::Blog) => app.blog_nav(delta),
        Some(WindowKind::ControlCenter) => {}
        None => {
            if app.terminal_area.map(|r| point_in_rect(x, y, r)).unwrap_or(false) {
                app.scroll_chat(3 * delta as i32);
            }
        }
    }
}
