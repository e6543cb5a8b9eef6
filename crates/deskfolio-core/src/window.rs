//! Desktop window/session management.
//!
//! Each window kind has at most one instance, moving between `Closed`, `Open`
//! and `OpenMaximized`. Floating windows remember their geometry while open
//! and get it back untouched when un-maximized; the control center is a panel
//! anchored to the menu bar that only opens and closes. The manager dispatches
//! every action through `ManagedWindow` and tracks z-order.

use std::fmt;

pub const MIN_WIDTH: u16 = 24;
pub const MIN_HEIGHT: u16 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowKind {
    Notes,
    Blog,
    ControlCenter,
}

impl WindowKind {
    pub fn all() -> [WindowKind; 3] {
        [WindowKind::Notes, WindowKind::Blog, WindowKind::ControlCenter]
    }

    pub fn title(&self) -> &'static str {
        match self {
            WindowKind::Notes => "Notes",
            WindowKind::Blog => "Blog Posts",
            WindowKind::ControlCenter => "Control Center",
        }
    }
}

impl fmt::Display for WindowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowPhase {
    Closed,
    Open,
    OpenMaximized,
}

impl WindowPhase {
    pub fn is_visible(&self) -> bool {
        !matches!(self, WindowPhase::Closed)
    }
}

/// Position and size in desktop cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub x: i32,
    pub y: i32,
    pub width: u16,
    pub height: u16,
}

impl Geometry {
    pub const fn new(x: i32, y: i32, width: u16, height: u16) -> Self {
        Self { x, y, width, height }
    }
}

/// Where a window should be drawn right now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Hidden,
    Floating(Geometry),
    Anchored,
    Maximized,
}

/// The capability every desktop window offers to the manager
pub trait ManagedWindow: Send {
    fn kind(&self) -> WindowKind;
    fn phase(&self) -> WindowPhase;
    fn open(&mut self);
    fn close(&mut self);
    fn toggle_maximize(&mut self);
    fn drag(&mut self, dx: i32, dy: i32);
    fn resize(&mut self, dw: i32, dh: i32);
    fn placement(&self) -> Placement;

    /// Remembered geometry, if this window has any
    fn geometry(&self) -> Option<Geometry> {
        None
    }
}

/// A draggable, maximizable window (Notes, Blog)
pub struct FloatingWindow {
    kind: WindowKind,
    phase: WindowPhase,
    geometry: Geometry,
    default_geometry: Geometry,
}

impl FloatingWindow {
    pub fn new(kind: WindowKind, default_geometry: Geometry) -> Self {
        Self {
            kind,
            phase: WindowPhase::Closed,
            geometry: default_geometry,
            default_geometry,
        }
    }
}

impl ManagedWindow for FloatingWindow {
    fn kind(&self) -> WindowKind {
        self.kind
    }

    fn phase(&self) -> WindowPhase {
        self.phase
    }

    fn open(&mut self) {
        // A closed window is discarded, so it comes back at its default spot
        if self.phase == WindowPhase::Closed {
            self.geometry = self.default_geometry;
            self.phase = WindowPhase::Open;
        }
    }

    fn close(&mut self) {
        self.phase = WindowPhase::Closed;
    }

    fn toggle_maximize(&mut self) {
        self.phase = match self.phase {
            WindowPhase::Open => WindowPhase::OpenMaximized,
            WindowPhase::OpenMaximized => WindowPhase::Open,
            WindowPhase::Closed => WindowPhase::Closed,
        };
    }

    fn drag(&mut self, dx: i32, dy: i32) {
        if self.phase == WindowPhase::Open {
            self.geometry.x += dx;
            self.geometry.y += dy;
        }
    }

    fn resize(&mut self, dw: i32, dh: i32) {
        if self.phase == WindowPhase::Open {
            self.geometry.width = clamp_dimension(self.geometry.width, dw, MIN_WIDTH);
            self.geometry.height = clamp_dimension(self.geometry.height, dh, MIN_HEIGHT);
        }
    }

    fn placement(&self) -> Placement {
        match self.phase {
            WindowPhase::Closed => Placement::Hidden,
            WindowPhase::Open => Placement::Floating(self.geometry),
            WindowPhase::OpenMaximized => Placement::Maximized,
        }
    }

    fn geometry(&self) -> Option<Geometry> {
        Some(self.geometry)
    }
}

fn clamp_dimension(current: u16, delta: i32, min: u16) -> u16 {
    (i32::from(current) + delta).clamp(i32::from(min), i32::from(u16::MAX)) as u16
}

/// A panel that drops down from the menu bar (Control Center)
pub struct AnchoredPanel {
    kind: WindowKind,
    open: bool,
}

impl AnchoredPanel {
    pub fn new(kind: WindowKind) -> Self {
        Self { kind, open: false }
    }
}

impl ManagedWindow for AnchoredPanel {
    fn kind(&self) -> WindowKind {
        self.kind
    }

    fn phase(&self) -> WindowPhase {
        if self.open {
            WindowPhase::Open
        } else {
            WindowPhase::Closed
        }
    }

    fn open(&mut self) {
        self.open = true;
    }

    fn close(&mut self) {
        self.open = false;
    }

    fn toggle_maximize(&mut self) {}

    fn drag(&mut self, _dx: i32, _dy: i32) {}

    fn resize(&mut self, _dw: i32, _dh: i32) {}

    fn placement(&self) -> Placement {
        if self.open {
            Placement::Anchored
        } else {
            Placement::Hidden
        }
    }
}

pub struct WindowManager {
    windows: Vec<Box<dyn ManagedWindow>>,
    /// Visible windows, bottom first
    z_order: Vec<WindowKind>,
    /// Desktop size in cells; drags keep the title bar reachable inside it
    bounds: Option<(u16, u16)>,
}

impl Default for WindowManager {
    fn default() -> Self {
        Self::new()
    }
}

impl WindowManager {
    pub fn new() -> Self {
        Self::with_windows(vec![
            Box::new(FloatingWindow::new(WindowKind::Notes, Geometry::new(4, 1, 72, 22))),
            Box::new(FloatingWindow::new(WindowKind::Blog, Geometry::new(10, 2, 84, 24))),
            Box::new(AnchoredPanel::new(WindowKind::ControlCenter)),
        ])
    }

    /// Build from explicit windows; one per kind, later duplicates are dropped
    pub fn with_windows(windows: Vec<Box<dyn ManagedWindow>>) -> Self {
        let mut unique: Vec<Box<dyn ManagedWindow>> = Vec::new();
        for window in windows {
            if !unique.iter().any(|w| w.kind() == window.kind()) {
                unique.push(window);
            }
        }

        Self {
            windows: unique,
            z_order: Vec::new(),
            bounds: None,
        }
    }

    pub fn set_bounds(&mut self, width: u16, height: u16) {
        self.bounds = Some((width, height));
    }

    fn window(&self, kind: WindowKind) -> Option<&dyn ManagedWindow> {
        self.windows.iter().find(|w| w.kind() == kind).map(|w| w.as_ref())
    }

    fn window_mut(&mut self, kind: WindowKind) -> Option<&mut Box<dyn ManagedWindow>> {
        self.windows.iter_mut().find(|w| w.kind() == kind)
    }

    pub fn phase(&self, kind: WindowKind) -> WindowPhase {
        self.window(kind).map(|w| w.phase()).unwrap_or(WindowPhase::Closed)
    }

    pub fn is_open(&self, kind: WindowKind) -> bool {
        self.phase(kind).is_visible()
    }

    pub fn placement(&self, kind: WindowKind) -> Placement {
        self.window(kind).map(|w| w.placement()).unwrap_or(Placement::Hidden)
    }

    pub fn geometry(&self, kind: WindowKind) -> Option<Geometry> {
        self.window(kind).and_then(|w| w.geometry())
    }

    /// Open `kind` (or keep it as is when already open) and bring it to the front
    pub fn launch(&mut self, kind: WindowKind) {
        let Some(window) = self.window_mut(kind) else {
            return;
        };
        let was_open = window.phase().is_visible();
        window.open();
        if !was_open {
            tracing::debug!(window = %kind, "Window opened");
        }
        self.raise(kind);
    }

    pub fn close(&mut self, kind: WindowKind) {
        if let Some(window) = self.window_mut(kind) {
            window.close();
            self.z_order.retain(|k| *k != kind);
            tracing::debug!(window = %kind, "Window closed");
        }
    }

    /// Open when closed, close when open. Returns whether it's open afterwards.
    pub fn toggle(&mut self, kind: WindowKind) -> bool {
        if self.is_open(kind) {
            self.close(kind);
            false
        } else {
            self.launch(kind);
            self.is_open(kind)
        }
    }

    pub fn toggle_maximize(&mut self, kind: WindowKind) {
        if let Some(window) = self.window_mut(kind) {
            window.toggle_maximize();
        }
        if self.is_open(kind) {
            self.raise(kind);
        }
    }

    pub fn drag(&mut self, kind: WindowKind, dx: i32, dy: i32) {
        let bounds = self.bounds;
        let Some(window) = self.window_mut(kind) else {
            return;
        };

        let (dx, dy) = match (bounds, window.placement()) {
            (Some((width, height)), Placement::Floating(geometry)) => {
                clamp_drag(geometry, dx, dy, width, height)
            }
            _ => (dx, dy),
        };
        window.drag(dx, dy);
    }

    pub fn resize(&mut self, kind: WindowKind, dw: i32, dh: i32) {
        if let Some(window) = self.window_mut(kind) {
            window.resize(dw, dh);
        }
    }

    /// Bring a visible window to the front; closed windows are left alone
    pub fn focus(&mut self, kind: WindowKind) {
        if self.is_open(kind) {
            self.raise(kind);
        }
    }

    /// Topmost visible window
    pub fn focused(&self) -> Option<WindowKind> {
        self.z_order.last().copied()
    }

    /// Visible windows, bottom first
    pub fn stacking_order(&self) -> &[WindowKind] {
        &self.z_order
    }

    /// Send the front window to the back; returns the new front window
    pub fn cycle_focus(&mut self) -> Option<WindowKind> {
        if let Some(top) = self.z_order.pop() {
            self.z_order.insert(0, top);
        }
        self.focused()
    }

    fn raise(&mut self, kind: WindowKind) {
        self.z_order.retain(|k| *k != kind);
        self.z_order.push(kind);
    }
}

// Keep at least a few cells of the title bar on screen
fn clamp_drag(geometry: Geometry, dx: i32, dy: i32, width: u16, height: u16) -> (i32, i32) {
    const GRIP: i32 = 6;
    let min_x = GRIP - i32::from(geometry.width);
    let max_x = i32::from(width) - GRIP;
    let max_y = i32::from(height).saturating_sub(1).max(0);

    let x = (geometry.x + dx).clamp(min_x.min(geometry.x), max_x.max(geometry.x));
    let y = (geometry.y + dy).clamp(0.min(geometry.y), max_y.max(geometry.y));
    (x - geometry.x, y - geometry.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notes_geometry(manager: &WindowManager) -> Geometry {
        manager.geometry(WindowKind::Notes).unwrap()
    }

    #[test]
    fn test_all_kinds_start_closed() {
        let manager = WindowManager::new();
        for kind in WindowKind::all() {
            assert_eq!(manager.phase(kind), WindowPhase::Closed);
            assert_eq!(manager.placement(kind), Placement::Hidden);
        }
        assert!(manager.focused().is_none());
    }

    #[test]
    fn test_launch_opens_and_focuses() {
        let mut manager = WindowManager::new();
        manager.launch(WindowKind::Notes);
        assert_eq!(manager.phase(WindowKind::Notes), WindowPhase::Open);
        assert_eq!(manager.focused(), Some(WindowKind::Notes));
    }

    #[test]
    fn test_second_launch_keeps_state() {
        let mut manager = WindowManager::new();
        manager.launch(WindowKind::Notes);
        manager.drag(WindowKind::Notes, 5, 3);
        let moved = notes_geometry(&manager);
        manager.toggle_maximize(WindowKind::Notes);

        manager.launch(WindowKind::Notes);

        assert_eq!(manager.phase(WindowKind::Notes), WindowPhase::OpenMaximized);
        manager.toggle_maximize(WindowKind::Notes);
        assert_eq!(notes_geometry(&manager), moved);
        assert_eq!(manager.stacking_order(), &[WindowKind::Notes]);
    }

    #[test]
    fn test_close_from_any_state() {
        let mut manager = WindowManager::new();

        manager.launch(WindowKind::Blog);
        manager.close(WindowKind::Blog);
        assert_eq!(manager.phase(WindowKind::Blog), WindowPhase::Closed);

        manager.launch(WindowKind::Blog);
        manager.toggle_maximize(WindowKind::Blog);
        manager.close(WindowKind::Blog);
        assert_eq!(manager.phase(WindowKind::Blog), WindowPhase::Closed);

        manager.close(WindowKind::Blog);
        assert_eq!(manager.phase(WindowKind::Blog), WindowPhase::Closed);
        assert!(manager.focused().is_none());
    }

    #[test]
    fn test_maximize_toggle_restores_geometry() {
        let mut manager = WindowManager::new();
        manager.launch(WindowKind::Notes);
        manager.drag(WindowKind::Notes, 7, 2);
        manager.resize(WindowKind::Notes, -10, 4);
        let before = notes_geometry(&manager);

        manager.toggle_maximize(WindowKind::Notes);
        assert_eq!(manager.placement(WindowKind::Notes), Placement::Maximized);

        manager.toggle_maximize(WindowKind::Notes);
        assert_eq!(manager.phase(WindowKind::Notes), WindowPhase::Open);
        assert_eq!(manager.placement(WindowKind::Notes), Placement::Floating(before));
    }

    #[test]
    fn test_drag_ignored_while_maximized_or_closed() {
        let mut manager = WindowManager::new();
        let initial = notes_geometry(&manager);

        manager.drag(WindowKind::Notes, 3, 3);
        assert_eq!(notes_geometry(&manager), initial);

        manager.launch(WindowKind::Notes);
        manager.toggle_maximize(WindowKind::Notes);
        manager.drag(WindowKind::Notes, 3, 3);
        manager.resize(WindowKind::Notes, 3, 3);
        manager.toggle_maximize(WindowKind::Notes);
        assert_eq!(notes_geometry(&manager), initial);
    }

    #[test]
    fn test_maximize_on_closed_window_is_noop() {
        let mut manager = WindowManager::new();
        manager.toggle_maximize(WindowKind::Notes);
        assert_eq!(manager.phase(WindowKind::Notes), WindowPhase::Closed);
        assert!(manager.focused().is_none());
    }

    #[test]
    fn test_reopen_starts_from_default_geometry() {
        let mut manager = WindowManager::new();
        let initial = notes_geometry(&manager);
        manager.launch(WindowKind::Notes);
        manager.drag(WindowKind::Notes, 9, 9);
        manager.close(WindowKind::Notes);
        manager.launch(WindowKind::Notes);
        assert_eq!(notes_geometry(&manager), initial);
    }

    #[test]
    fn test_resize_respects_minimum() {
        let mut manager = WindowManager::new();
        manager.launch(WindowKind::Blog);
        manager.resize(WindowKind::Blog, -1000, -1000);
        let geometry = manager.geometry(WindowKind::Blog).unwrap();
        assert_eq!((geometry.width, geometry.height), (MIN_WIDTH, MIN_HEIGHT));
    }

    #[test]
    fn test_control_center_is_anchored() {
        let mut manager = WindowManager::new();
        assert!(manager.toggle(WindowKind::ControlCenter));
        assert_eq!(manager.placement(WindowKind::ControlCenter), Placement::Anchored);

        manager.toggle_maximize(WindowKind::ControlCenter);
        manager.drag(WindowKind::ControlCenter, 4, 4);
        assert_eq!(manager.phase(WindowKind::ControlCenter), WindowPhase::Open);
        assert!(manager.geometry(WindowKind::ControlCenter).is_none());

        assert!(!manager.toggle(WindowKind::ControlCenter));
        assert_eq!(manager.phase(WindowKind::ControlCenter), WindowPhase::Closed);
    }

    #[test]
    fn test_z_order_follows_launch_and_focus() {
        let mut manager = WindowManager::new();
        manager.launch(WindowKind::Notes);
        manager.launch(WindowKind::Blog);
        assert_eq!(manager.stacking_order(), &[WindowKind::Notes, WindowKind::Blog]);

        manager.focus(WindowKind::Notes);
        assert_eq!(manager.focused(), Some(WindowKind::Notes));

        manager.close(WindowKind::Notes);
        assert_eq!(manager.focused(), Some(WindowKind::Blog));

        manager.focus(WindowKind::ControlCenter);
        assert_eq!(manager.stacking_order(), &[WindowKind::Blog]);
    }

    #[test]
    fn test_cycle_focus_rotates() {
        let mut manager = WindowManager::new();
        manager.launch(WindowKind::Notes);
        manager.launch(WindowKind::Blog);
        manager.launch(WindowKind::ControlCenter);

        assert_eq!(manager.cycle_focus(), Some(WindowKind::Blog));
        assert_eq!(manager.cycle_focus(), Some(WindowKind::Notes));
        assert_eq!(manager.cycle_focus(), Some(WindowKind::ControlCenter));
    }

    #[test]
    fn test_drag_clamped_to_bounds() {
        let mut manager = WindowManager::new();
        manager.set_bounds(100, 30);
        manager.launch(WindowKind::Notes);

        manager.drag(WindowKind::Notes, 0, -50);
        assert_eq!(notes_geometry(&manager).y, 0);

        manager.drag(WindowKind::Notes, 500, 500);
        let geometry = notes_geometry(&manager);
        assert_eq!(geometry.x, 94);
        assert_eq!(geometry.y, 29);
    }

    #[test]
    fn test_duplicate_kinds_are_dropped() {
        let mut manager = WindowManager::with_windows(vec![
            Box::new(FloatingWindow::new(WindowKind::Notes, Geometry::new(0, 0, 30, 10))),
            Box::new(FloatingWindow::new(WindowKind::Notes, Geometry::new(5, 5, 40, 12))),
        ]);
        manager.launch(WindowKind::Notes);
        assert_eq!(manager.geometry(WindowKind::Notes), Some(Geometry::new(0, 0, 30, 10)));
        assert_eq!(manager.stacking_order().len(), 1);
    }
}
