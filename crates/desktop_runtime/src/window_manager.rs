//! Window stack, focus, and per-window app-state ownership.
//!
//! The stack is kept back-to-front in a `Vec`, so a window's z-order is its 1-based position and
//! raising a window means moving it to the end.

use crate::model::{AppKind, AppState, WindowHandle, WindowId, WindowPosition, WindowRecord};

/// Horizontal origin of the first cascaded window.
pub const CASCADE_ORIGIN_X: i32 = 40;
/// Vertical origin of the first cascaded window.
pub const CASCADE_ORIGIN_Y: i32 = 48;
/// Offset (in px) between successive cascaded windows.
pub const CASCADE_STEP: i32 = 24;
/// Number of cascade steps before positions wrap back to the origin.
pub const CASCADE_WRAP: usize = 8;

#[derive(Debug, Clone, PartialEq)]
pub struct WindowManager {
    next_window_id: u64,
    windows: Vec<WindowRecord>,
}

impl Default for WindowManager {
    fn default() -> Self {
        Self {
            next_window_id: 1,
            windows: Vec::new(),
        }
    }
}

impl WindowManager {
    /// Opens a focused window with fresh, empty state for `app_kind`.
    pub fn open(&mut self, app_kind: AppKind) -> WindowHandle {
        let id = WindowId(self.next_window_id);
        self.next_window_id = self.next_window_id.saturating_add(1);

        let step = (self.windows.len() % CASCADE_WRAP) as i32 * CASCADE_STEP;
        self.windows.push(WindowRecord {
            id,
            title: app_kind.title().to_string(),
            position: WindowPosition {
                x: CASCADE_ORIGIN_X + step,
                y: CASCADE_ORIGIN_Y + step,
            },
            z_order: 0,
            is_focused: false,
            app_state: AppState::empty_for(app_kind),
        });
        self.focus(id);
        // `focus` just pushed the new record to the top.
        let index = self.windows.len() - 1;
        self.windows[index].handle()
    }

    /// Closes a window and drops its state. Returns `false` if no such window was open.
    pub fn close(&mut self, window_id: WindowId) -> bool {
        let before_len = self.windows.len();
        self.windows.retain(|w| w.id != window_id);
        if self.windows.len() == before_len {
            return false;
        }
        self.normalize_stack();
        true
    }

    /// Focuses and raises `window_id`. Returns `false` if no such window is open.
    pub fn focus(&mut self, window_id: WindowId) -> bool {
        let Some(index) = self.windows.iter().position(|w| w.id == window_id) else {
            return false;
        };

        let already_focused_top =
            index + 1 == self.windows.len() && self.windows[index].is_focused;
        if already_focused_top {
            return true;
        }

        for window in &mut self.windows {
            window.is_focused = false;
        }
        let mut window = self.windows.remove(index);
        window.is_focused = true;
        self.windows.push(window);
        self.normalize_stack();
        true
    }

    /// Moves a window without changing focus. Returns `false` if no such window is open.
    pub fn move_to(&mut self, window_id: WindowId, position: WindowPosition) -> bool {
        match self.get_mut(window_id) {
            Some(window) => {
                window.position = position;
                true
            }
            None => false,
        }
    }

    /// Closes every window.
    pub fn close_all(&mut self) {
        self.windows.clear();
    }

    /// Handles back-to-front (ascending z-order).
    pub fn list(&self) -> Vec<WindowHandle> {
        self.windows.iter().map(WindowRecord::handle).collect()
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn get(&self, window_id: WindowId) -> Option<&WindowRecord> {
        self.windows.iter().find(|w| w.id == window_id)
    }

    pub fn get_mut(&mut self, window_id: WindowId) -> Option<&mut WindowRecord> {
        self.windows.iter_mut().find(|w| w.id == window_id)
    }

    pub fn app_state_mut(&mut self, window_id: WindowId) -> Option<&mut AppState> {
        self.get_mut(window_id).map(|window| &mut window.app_state)
    }

    pub fn focused(&self) -> Option<WindowId> {
        self.windows.iter().find(|w| w.is_focused).map(|w| w.id)
    }

    /// Renumbers z-order and repairs the single-focus invariant.
    ///
    /// When nothing is focused, focus falls to the topmost remaining window.
    fn normalize_stack(&mut self) {
        let mut has_focused = false;
        for (idx, window) in self.windows.iter_mut().enumerate() {
            window.z_order = (idx + 1) as u32;
            if window.is_focused {
                if has_focused {
                    window.is_focused = false;
                } else {
                    has_focused = true;
                }
            }
        }

        if !has_focused {
            if let Some(top) = self.windows.last_mut() {
                top.is_focused = true;
            }
        }
    }
}
