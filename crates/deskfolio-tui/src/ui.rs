use chrono::Local;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use deskfolio_core::{BlogView, ChatRole, DockItem, Geometry, Placement, WindowKind};

use crate::app::{App, BlogPane, Focus, NotesPane, WindowHit};

const CONTROL_CENTER_WIDTH: u16 = 36;
const CONTROL_CENTER_HEIGHT: u16 = 10;

/// Colors for one theme
struct Palette {
    desktop_bg: Color,
    menu_bg: Color,
    window_bg: Color,
    fg: Color,
    muted: Color,
    border: Color,
    accent: Color,
    prompt: Color,
}

impl Palette {
    fn for_theme(dark: bool) -> Self {
        if dark {
            Self {
                desktop_bg: Color::Rgb(24, 26, 33),
                menu_bg: Color::Rgb(40, 42, 54),
                window_bg: Color::Rgb(30, 30, 30),
                fg: Color::Rgb(220, 220, 220),
                muted: Color::DarkGray,
                border: Color::Rgb(70, 70, 80),
                accent: Color::Cyan,
                prompt: Color::Green,
            }
        } else {
            Self {
                desktop_bg: Color::Rgb(214, 224, 240),
                menu_bg: Color::Rgb(236, 236, 240),
                window_bg: Color::Rgb(250, 250, 250),
                fg: Color::Rgb(30, 30, 30),
                muted: Color::Gray,
                border: Color::Rgb(170, 170, 180),
                accent: Color::Blue,
                prompt: Color::Rgb(0, 140, 60),
            }
        }
    }

    fn border_for(&self, focused: bool) -> Style {
        Style::default().fg(if focused { self.accent } else { self.border })
    }

    fn highlight(&self) -> Style {
        Style::default()
            .bg(self.accent)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD)
    }
}

/// Ensure the selected item in a list is visible by adjusting the ListState offset.
fn ensure_selected_visible(state: &mut ListState, visible_rows: usize) {
    let visible_rows = visible_rows.max(1);

    if let Some(selected) = state.selected() {
        let min_offset = selected.saturating_sub(visible_rows - 1);
        let new_offset = state.offset().clamp(min_offset, selected);
        if new_offset != state.offset() {
            *state.offset_mut() = new_offset;
        }
    }
}

/// Wrap text to fit within a given width, returning multiple lines.
/// Breaks on word boundaries; words longer than the width get their own line.
fn wrap_text_to_width(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current_line = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();

        if current_len == 0 {
            current_line = word.to_string();
            current_len = word_len;
        } else if current_len + 1 + word_len <= width {
            current_line.push(' ');
            current_line.push_str(word);
            current_len += 1 + word_len;
        } else {
            lines.push(std::mem::take(&mut current_line));
            current_line = word.to_string();
            current_len = word_len;
        }
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}

/// Rows a message body occupies once wrapped
fn wrapped_height(text: &str, width: usize) -> usize {
    text.lines()
        .map(|line| wrap_text_to_width(line, width).len())
        .sum::<usize>()
        .max(1)
}

/// Render one line of assistant markdown: headings and **bold** runs
fn parse_markdown_line(text: &str, accent: Color) -> Line<'static> {
    let trimmed = text.trim_start();
    if let Some(heading) = trimmed.strip_prefix('#') {
        let heading = heading.trim_start_matches('#').trim();
        return Line::from(Span::styled(
            heading.to_string(),
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        ));
    }

    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut rest = text;

    while let Some(start) = rest.find("**") {
        let after = &rest[start + 2..];
        let Some(end) = after.find("**") else {
            break;
        };
        if end == 0 {
            // "****" has nothing to embolden
            spans.push(Span::raw(rest[..start + 4].to_string()));
            rest = &after[2..];
            continue;
        }
        if start > 0 {
            spans.push(Span::raw(rest[..start].to_string()));
        }
        spans.push(Span::styled(
            after[..end].to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ));
        rest = &after[end + 2..];
    }

    if !rest.is_empty() {
        spans.push(Span::raw(rest.to_string()));
    }

    if spans.is_empty() {
        Line::default()
    } else {
        Line::from(spans)
    }
}

/// Place a floating window's geometry on the desktop, clipped to it
fn floating_rect(desktop: Rect, geometry: Geometry) -> (Rect, Option<u16>) {
    let left = i32::from(desktop.x) + geometry.x;
    let top = i32::from(desktop.y) + geometry.y;
    let right = (left + i32::from(geometry.width)).min(i32::from(desktop.right()));
    let bottom = (top + i32::from(geometry.height)).min(i32::from(desktop.bottom()));
    let clipped_left = left.max(i32::from(desktop.x));
    let clipped_top = top.max(i32::from(desktop.y));

    if right <= clipped_left || bottom <= clipped_top {
        return (Rect::default(), None);
    }

    let rect = Rect::new(
        clipped_left as u16,
        clipped_top as u16,
        (right - clipped_left) as u16,
        (bottom - clipped_top) as u16,
    );
    // Buttons are only clickable when the left edge and title row are on screen
    let buttons_x = (clipped_left == left && clipped_top == top).then_some(rect.x);
    (rect, buttons_x)
}

fn anchored_rect(desktop: Rect) -> Rect {
    let width = CONTROL_CENTER_WIDTH.min(desktop.width);
    let height = CONTROL_CENTER_HEIGHT.min(desktop.height);
    Rect::new(desktop.right().saturating_sub(width + 1), desktop.y, width, height)
}

/// Centered terminal panel, about three quarters of the desktop
fn terminal_rect(desktop: Rect) -> Rect {
    let width = (desktop.width.saturating_sub(4)).min(96);
    let height = (desktop.height.saturating_mul(3) / 4).max(desktop.height.min(8));
    let x = desktop.x + (desktop.width.saturating_sub(width)) / 2;
    let y = desktop.y + (desktop.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

fn traffic_lights() -> Vec<Span<'static>> {
    vec![
        Span::raw(" "),
        Span::styled("●", Style::default().fg(Color::Red)),
        Span::raw(" "),
        Span::styled("●", Style::default().fg(Color::Yellow)),
        Span::raw(" "),
        Span::styled("●", Style::default().fg(Color::Green)),
        Span::raw("  "),
    ]
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();
    let palette = Palette::for_theme(app.desktop.dark);

    // Menu bar, desktop, dock
    let [menu_area, desktop_area, dock_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(3),
    ])
    .areas(area);

    frame.render_widget(
        Block::default().style(Style::default().bg(palette.desktop_bg)),
        desktop_area,
    );
    app.windows.set_bounds(desktop_area.width, desktop_area.height);

    render_menu_bar(app, frame, menu_area, &palette);
    render_terminal(app, frame, terminal_rect(desktop_area), &palette);
    render_windows(app, frame, desktop_area, &palette);
    render_dock(app, frame, dock_area, desktop_area, &palette);
}

fn render_menu_bar(app: &mut App, frame: &mut Frame, area: Rect, palette: &Palette) {
    let active = app
        .focused_window()
        .map(|kind| kind.title())
        .unwrap_or("Terminal");

    let left = Line::from(vec![
        Span::styled(" ◆ ", Style::default().fg(palette.accent).bold()),
        Span::styled(active, Style::default().fg(palette.fg).bold()),
        Span::styled(
            "   ^N Notes  ^B Blog  ^O Control  ^W Close  F2 Max  Tab Focus",
            Style::default().fg(palette.muted),
        ),
    ]);
    frame.render_widget(
        Paragraph::new(left).style(Style::default().bg(palette.menu_bg)),
        area,
    );

    let clock = format!(" {} ", app.desktop.menu_clock());
    let clock_width = clock.chars().count() as u16;
    let button_width = 3;

    if area.width <= clock_width + button_width {
        app.control_center_button = None;
        return;
    }

    let clock_area = Rect::new(area.right() - clock_width, area.y, clock_width, 1);
    let button_area = Rect::new(clock_area.x - button_width, area.y, button_width, 1);

    let button_style = if app.windows.is_open(WindowKind::ControlCenter) {
        Style::default().bg(palette.accent).fg(Color::Black)
    } else {
        Style::default().bg(palette.menu_bg).fg(palette.fg)
    };
    frame.render_widget(Paragraph::new(" ≡ ").style(button_style), button_area);
    frame.render_widget(
        Paragraph::new(clock).style(Style::default().bg(palette.menu_bg).fg(palette.fg)),
        clock_area,
    );
    app.control_center_button = Some(button_area);
}

fn render_terminal(app: &mut App, frame: &mut Frame, area: Rect, palette: &Palette) {
    app.terminal_area = Some(area);
    let focused = app.focus == Focus::Terminal;

    let mut title = traffic_lights();
    title.push(Span::styled("~/portfolio", Style::default().fg(palette.muted)));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(palette.border_for(focused))
        .title(Line::from(title))
        .style(Style::default().bg(Color::Black).fg(Color::Rgb(230, 230, 230)));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [chat_area, input_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(inner);

    // Chat area dimensions for scroll calculations
    app.chat_height = chat_area.height;
    app.chat_width = chat_area.width;
    let width = chat_area.width.max(1) as usize;

    let mut lines: Vec<Line> = Vec::new();
    let mut total_rows = 0usize;

    for message in app.chat.transcript() {
        match message.role {
            ChatRole::User => {
                lines.push(Line::from(vec![
                    Span::styled("❯ ", Style::default().fg(palette.prompt)),
                    Span::raw(message.content.clone()),
                ]));
                total_rows += wrapped_height(&message.content, width.saturating_sub(2).max(1));
            }
            ChatRole::Assistant => {
                for line in message.content.lines() {
                    lines.push(parse_markdown_line(line, palette.accent));
                }
                total_rows += wrapped_height(&message.content, width);
            }
            // Never shown
            ChatRole::System => continue,
        }
        lines.push(Line::default());
        total_rows += 1;
    }

    if app.chat.is_in_flight() {
        let dots = ".".repeat(app.animation_frame as usize + 1);
        lines.push(Line::from(Span::styled(
            format!("▋ thinking{}", dots),
            Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
        )));
        total_rows += 1;
    }

    let max_scroll = total_rows.saturating_sub(chat_area.height as usize) as u16;
    if app.follow_chat || app.chat_scroll >= max_scroll {
        app.chat_scroll = max_scroll;
        app.follow_chat = true;
    }

    frame.render_widget(
        Paragraph::new(Text::from(lines))
            .wrap(Wrap { trim: false })
            .scroll((app.chat_scroll, 0)),
        chat_area,
    );

    let input_line = if app.chat.input().is_empty() {
        Line::from(vec![
            Span::styled("❯ ", Style::default().fg(palette.prompt)),
            Span::styled(app.placeholder.text().to_string(), Style::default().fg(Color::DarkGray)),
        ])
    } else {
        Line::from(vec![
            Span::styled("❯ ", Style::default().fg(palette.prompt)),
            Span::raw(app.chat.input().to_string()),
        ])
    };
    frame.render_widget(Paragraph::new(input_line), input_area);

    if focused && input_area.width > 2 {
        let cursor_x = input_area.x + 2 + (app.chat_cursor as u16).min(input_area.width - 3);
        frame.set_cursor_position((cursor_x, input_area.y));
    }
}

fn render_windows(app: &mut App, frame: &mut Frame, desktop: Rect, palette: &Palette) {
    app.window_areas.clear();
    app.theme_toggle_area = None;

    for kind in app.windows.stacking_order().to_vec() {
        let (area, buttons_x) = match app.windows.placement(kind) {
            Placement::Hidden => continue,
            Placement::Floating(geometry) => floating_rect(desktop, geometry),
            Placement::Maximized => (desktop, Some(desktop.x)),
            Placement::Anchored => (anchored_rect(desktop), None),
        };
        if area.is_empty() {
            continue;
        }

        app.window_areas.push(WindowHit {
            kind,
            area,
            buttons_x,
        });

        frame.render_widget(Clear, area);
        let focused = app.focus == Focus::Window(kind);

        match kind {
            WindowKind::Notes => render_notes_window(app, frame, area, buttons_x.is_some(), focused, palette),
            WindowKind::Blog => render_blog_window(app, frame, area, buttons_x.is_some(), focused, palette),
            WindowKind::ControlCenter => render_control_center(app, frame, area, focused, palette),
        }
    }
}

fn window_block<'a>(title: &'a str, with_buttons: bool, focused: bool, palette: &Palette) -> Block<'a> {
    let mut spans = if with_buttons { traffic_lights() } else { vec![Span::raw(" ")] };
    spans.push(Span::styled(title, Style::default().fg(palette.fg).bold()));
    spans.push(Span::raw(" "));

    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(palette.border_for(focused))
        .title(Line::from(spans))
        .style(Style::default().bg(palette.window_bg).fg(palette.fg))
}

fn search_box<'a>(query: &'a str, hint: &'a str, active: bool, palette: &Palette) -> Paragraph<'a> {
    let text = if query.is_empty() && !active {
        Span::styled(hint, Style::default().fg(palette.muted))
    } else if active {
        Span::raw(format!("{}▏", query))
    } else {
        Span::raw(query)
    };

    Paragraph::new(Line::from(text)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(palette.border_for(active)),
    )
}

fn render_notes_window(
    app: &mut App,
    frame: &mut Frame,
    area: Rect,
    with_buttons: bool,
    focused: bool,
    palette: &Palette,
) {
    let hints = if focused {
        match app.notes_pane {
            NotesPane::List => " n new · d delete · / search · e title · Enter edit ",
            NotesPane::Search => " type to filter · Enter/Esc done ",
            NotesPane::Title | NotesPane::Content => " Esc done ",
        }
    } else {
        ""
    };
    let block = window_block(WindowKind::Notes.title(), with_buttons, focused, palette)
        .title_bottom(Line::from(Span::styled(hints, Style::default().fg(palette.muted))));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let sidebar_width = (inner.width / 3).clamp(16, 32).min(inner.width);
    let [sidebar, editor] = Layout::horizontal([
        Constraint::Length(sidebar_width),
        Constraint::Min(0),
    ])
    .areas(inner);
    let [search_area, list_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(0),
    ])
    .areas(sidebar);

    frame.render_widget(
        search_box(
            &app.notes_query,
            "Search notes...",
            focused && app.notes_pane == NotesPane::Search,
            palette,
        ),
        search_area,
    );

    app.sync_notes_state();
    let preview_width = list_area.width.saturating_sub(4) as usize;
    let items: Vec<ListItem> = app
        .notes
        .search(&app.notes_query)
        .into_iter()
        .map(|note| {
            let edited = note.last_modified.with_timezone(&Local).format("%b %-d");
            ListItem::new(vec![
                Line::from(Span::styled(note.title.clone(), Style::default().bold())),
                Line::from(Span::styled(
                    format!("{} {}", edited, note.preview(preview_width)),
                    Style::default().fg(palette.muted),
                )),
            ])
        })
        .collect();

    if items.is_empty() {
        let message = if app.notes_query.is_empty() {
            "No notes yet.\nPress n to create one."
        } else {
            "No matching notes."
        };
        frame.render_widget(
            Paragraph::new(message)
                .style(Style::default().fg(palette.muted))
                .wrap(Wrap { trim: true }),
            list_area,
        );
    } else {
        ensure_selected_visible(&mut app.notes_state, (list_area.height / 2) as usize);
        let list = List::new(items)
            .highlight_style(palette.highlight())
            .highlight_symbol("▌");
        frame.render_stateful_widget(list, list_area, &mut app.notes_state);
    }

    let editor = Rect {
        x: editor.x + 1,
        width: editor.width.saturating_sub(1),
        ..editor
    };

    let Some(note) = app.notes.selected() else {
        frame.render_widget(
            Paragraph::new("Select a note, or press n for a new one.")
                .style(Style::default().fg(palette.muted)),
            editor,
        );
        return;
    };

    let [title_area, meta_area, content_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(2),
        Constraint::Min(0),
    ])
    .areas(editor);

    let editing_title = focused && app.notes_pane == NotesPane::Title;
    let editing_content = focused && app.notes_pane == NotesPane::Content;

    let mut title = vec![Span::styled(
        note.title.clone(),
        Style::default().fg(palette.fg).bold(),
    )];
    if editing_title {
        title.push(Span::styled("▏", Style::default().fg(palette.accent)));
    }
    frame.render_widget(Paragraph::new(Line::from(title)), title_area);

    let edited = note
        .last_modified
        .with_timezone(&Local)
        .format("%B %-d, %Y at %-I:%M %p");
    frame.render_widget(
        Paragraph::new(format!("{} · Edited {}", note.folder, edited))
            .style(Style::default().fg(palette.muted)),
        meta_area,
    );

    let mut content = Text::from(note.content.clone());
    if editing_content {
        let cursor = Span::styled("▏", Style::default().fg(palette.accent));
        if note.content.ends_with('\n') || content.lines.is_empty() {
            content.lines.push(Line::from(cursor));
        } else if let Some(last) = content.lines.last_mut() {
            last.spans.push(cursor);
        }
    }
    frame.render_widget(
        Paragraph::new(content).wrap(Wrap { trim: false }),
        content_area,
    );
}

fn render_blog_window(
    app: &mut App,
    frame: &mut Frame,
    area: Rect,
    with_buttons: bool,
    focused: bool,
    palette: &Palette,
) {
    let hints = if focused {
        match app.blog_pane {
            BlogPane::List => " j/k select · / search · e edit/preview ",
            BlogPane::Search => " type to filter · Enter/Esc done ",
            BlogPane::Draft => " Esc preview ",
        }
    } else {
        ""
    };
    let block = window_block(WindowKind::Blog.title(), with_buttons, focused, palette)
        .title_bottom(Line::from(Span::styled(hints, Style::default().fg(palette.muted))));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let sidebar_width = (inner.width * 2 / 5).clamp(20, 40).min(inner.width);
    let [sidebar, main] = Layout::horizontal([
        Constraint::Length(sidebar_width),
        Constraint::Min(0),
    ])
    .areas(inner);
    let [search_area, list_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(0),
    ])
    .areas(sidebar);

    frame.render_widget(
        search_box(
            &app.blog_query,
            "Search posts...",
            focused && app.blog_pane == BlogPane::Search,
            palette,
        ),
        search_area,
    );

    app.sync_blog_state();
    let items: Vec<ListItem> = app
        .blog
        .search(&app.blog_query)
        .into_iter()
        .map(|post| {
            let tags = post
                .tags
                .iter()
                .map(|tag| format!("#{}", tag))
                .collect::<Vec<_>>()
                .join(" ");
            ListItem::new(vec![
                Line::from(Span::styled(post.title.clone(), Style::default().bold())),
                Line::from(Span::styled(
                    format!("{} · {} · {} views", post.display_date(), post.read_time, post.views),
                    Style::default().fg(palette.muted),
                )),
                Line::from(Span::styled(tags, Style::default().fg(palette.accent))),
            ])
        })
        .collect();

    if items.is_empty() {
        frame.render_widget(
            Paragraph::new("No matching posts.").style(Style::default().fg(palette.muted)),
            list_area,
        );
    } else {
        ensure_selected_visible(&mut app.blog_state, (list_area.height / 3) as usize);
        let list = List::new(items)
            .highlight_style(palette.highlight())
            .highlight_symbol("▌");
        frame.render_stateful_widget(list, list_area, &mut app.blog_state);
    }

    let main = Rect {
        x: main.x + 1,
        width: main.width.saturating_sub(1),
        ..main
    };

    let Some(post) = app.blog.selected() else {
        frame.render_widget(
            Paragraph::new("Select a post to read it.").style(Style::default().fg(palette.muted)),
            main,
        );
        return;
    };

    let [header_area, body_area] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Min(0),
    ])
    .areas(main);

    let toggle = match app.blog.view() {
        BlogView::Preview => "[Edit]",
        BlogView::Edit => "[Preview]",
    };
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(post.title.clone(), Style::default().fg(palette.fg).bold()),
            Span::raw("  "),
            Span::styled(toggle, Style::default().fg(palette.accent)),
        ]))
        .wrap(Wrap { trim: true }),
        header_area,
    );

    let body = match app.blog.view() {
        BlogView::Preview => Text::from(
            app.blog
                .draft()
                .lines()
                .map(|line| parse_markdown_line(line, palette.accent))
                .collect::<Vec<_>>(),
        ),
        BlogView::Edit => {
            let mut text = Text::from(app.blog.draft().to_string());
            if focused {
                text.lines
                    .push(Line::from(Span::styled("▏", Style::default().fg(palette.accent))));
            }
            text
        }
    };
    frame.render_widget(Paragraph::new(body).wrap(Wrap { trim: false }), body_area);
}

fn render_control_center(app: &mut App, frame: &mut Frame, area: Rect, focused: bool, palette: &Palette) {
    let block = window_block(WindowKind::ControlCenter.title(), false, focused, palette);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(0),
    ])
    .split(inner);

    let tile = Style::default().fg(palette.muted);
    frame.render_widget(Paragraph::new(" Wi-Fi            Bluetooth").style(tile), rows[0]);

    let (icon, label) = if app.desktop.dark {
        ("☾", "Dark Mode")
    } else {
        ("☀", "Light Mode")
    };
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(" AirDrop          ", tile),
            Span::styled(
                format!("{} {}", icon, label),
                Style::default().fg(palette.accent).bold(),
            ),
        ])),
        rows[1],
    );
    app.theme_toggle_area = Some(rows[1]);

    let bar = |name: &str, percent: u16, width: u16| {
        let slots = width.saturating_sub(16).max(4);
        let filled = slots * percent / 100;
        Line::from(vec![
            Span::styled(format!(" {:<8}", name), tile),
            Span::styled("█".repeat(filled as usize), Style::default().fg(palette.fg)),
            Span::styled("░".repeat((slots - filled) as usize), tile),
            Span::styled(format!(" {}%", percent), tile),
        ])
    };
    frame.render_widget(Paragraph::new(bar("Display", 75, inner.width)), rows[3]);
    frame.render_widget(Paragraph::new(bar("Sound", 60, inner.width)), rows[4]);
    frame.render_widget(
        Paragraph::new(" t toggle theme · Esc close").style(tile),
        rows[5],
    );
}

fn render_dock(app: &mut App, frame: &mut Frame, area: Rect, desktop: Rect, palette: &Palette) {
    app.dock_areas.clear();

    let labels: Vec<(DockItem, String)> = DockItem::all()
        .into_iter()
        .map(|item| (item, format!(" {} ", item.label())))
        .collect();
    let content_width: u16 = labels
        .iter()
        .map(|(_, label)| label.chars().count() as u16 + 1)
        .sum::<u16>()
        + 1;
    let width = (content_width + 2).min(area.width);
    let dock = Rect::new(area.x + (area.width - width) / 2, area.y, width, area.height);

    frame.render_widget(
        Block::default().style(Style::default().bg(palette.desktop_bg)),
        area,
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.border))
        .style(Style::default().bg(palette.menu_bg));
    let inner = block.inner(dock);
    frame.render_widget(block, dock);
    if inner.height == 0 {
        return;
    }

    let mut x = inner.x + 1;
    for (item, label) in labels {
        let item_width = label.chars().count() as u16;
        if x + item_width > inner.right() {
            break;
        }
        let item_area = Rect::new(x, inner.y, item_width, 1);

        let launches_open_window = match item {
            DockItem::Notes => app.windows.is_open(WindowKind::Notes),
            DockItem::Blog => app.windows.is_open(WindowKind::Blog),
            _ => false,
        };
        let mut style = if app.hovered_dock == Some(item) {
            palette.highlight()
        } else {
            Style::default().fg(palette.fg)
        };
        if launches_open_window {
            style = style.add_modifier(Modifier::UNDERLINED);
        }

        frame.render_widget(Paragraph::new(label).style(style), item_area);
        app.dock_areas.push((item, item_area));
        x += item_width + 1;
    }

    // Tooltip on the desktop row just above the dock
    if let Some((item, item_area)) = app
        .hovered_dock
        .and_then(|hovered| app.dock_areas.iter().find(|(item, _)| *item == hovered).copied())
    {
        if desktop.height > 0 {
            let text = format!(" {} ", item.tooltip());
            let width = (text.chars().count() as u16).min(desktop.width);
            let center = item_area.x + item_area.width / 2;
            let tip_x = center
                .saturating_sub(width / 2)
                .clamp(desktop.x, desktop.right().saturating_sub(width));
            let tip = Rect::new(tip_x, desktop.bottom() - 1, width, 1);
            frame.render_widget(Clear, tip);
            frame.render_widget(
                Paragraph::new(text).style(Style::default().bg(palette.menu_bg).fg(palette.fg)),
                tip,
            );
        }
    } else if let Some(status) = &app.status {
        if desktop.height > 0 {
            let row = Rect::new(desktop.x, desktop.bottom() - 1, desktop.width, 1);
            frame.render_widget(
                Paragraph::new(format!(" {}", status)).style(Style::default().fg(palette.muted)),
                row,
            );
        }
    }
}
