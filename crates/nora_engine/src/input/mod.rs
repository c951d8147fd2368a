//! Input state shared with components
//!
//! The frame driver feeds window events into [`InputState`]; components only
//! ever query it. "Just pressed/released" flags and mouse/scroll deltas live
//! for one frame and are cleared by [`InputState::end_frame`] after the tick.

use std::collections::HashMap;

use bitflags::bitflags;

bitflags! {
    /// Per-key state for the current frame
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct KeyState: u8 {
        /// Key is held down
        const PRESSED = 1 << 0;
        /// Key went down this frame
        const JUST_PRESSED = 1 << 1;
        /// Key went up this frame
        const JUST_RELEASED = 1 << 2;
    }
}

/// Key codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum KeyCode {
    Space, Apostrophe, Comma, Minus, Period, Slash,
    Num0, Num1, Num2, Num3, Num4, Num5, Num6, Num7, Num8, Num9,
    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,
    Escape, Enter, Tab, Backspace, Insert, Delete,
    Right, Left, Down, Up,
    LeftShift, LeftControl, LeftAlt,
}

/// Mouse buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left mouse button
    Left,
    /// Right mouse button
    Right,
    /// Middle mouse button
    Middle,
}

/// Keyboard and mouse state for one frame
#[derive(Debug, Clone, Default)]
pub struct InputState {
    keys: HashMap<KeyCode, KeyState>,
    buttons: HashMap<MouseButton, KeyState>,
    mouse_position: (f64, f64),
    mouse_delta: (f64, f64),
    scroll_delta: (f64, f64),
    has_mouse_position: bool,
}

impl InputState {
    /// Creates a fresh, empty input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key going down. Repeated presses without a release do not
    /// re-trigger `just pressed`.
    pub fn press_key(&mut self, key: KeyCode) {
        press(self.keys.entry(key).or_default());
    }

    /// Record a key going up
    pub fn release_key(&mut self, key: KeyCode) {
        release(self.keys.entry(key).or_default());
    }

    /// Record a mouse button going down
    pub fn press_button(&mut self, button: MouseButton) {
        press(self.buttons.entry(button).or_default());
    }

    /// Record a mouse button going up
    pub fn release_button(&mut self, button: MouseButton) {
        release(self.buttons.entry(button).or_default());
    }

    /// Record the cursor position in window coordinates.
    ///
    /// The very first position seen produces no delta.
    pub fn move_mouse(&mut self, x: f64, y: f64) {
        if self.has_mouse_position {
            let (px, py) = self.mouse_position;
            self.mouse_delta.0 += x - px;
            self.mouse_delta.1 += y - py;
        }
        self.mouse_position = (x, y);
        self.has_mouse_position = true;
    }

    /// Accumulate scroll wheel movement
    pub fn scroll(&mut self, dx: f64, dy: f64) {
        self.scroll_delta.0 += dx;
        self.scroll_delta.1 += dy;
    }

    /// Clear per-frame flags and deltas. Called by the driver after each tick.
    pub fn end_frame(&mut self) {
        let transient = KeyState::JUST_PRESSED | KeyState::JUST_RELEASED;
        for state in self.keys.values_mut().chain(self.buttons.values_mut()) {
            state.remove(transient);
        }
        self.mouse_delta = (0.0, 0.0);
        self.scroll_delta = (0.0, 0.0);
    }

    /// Full state of a key
    pub fn key_state(&self, key: KeyCode) -> KeyState {
        self.keys.get(&key).copied().unwrap_or_default()
    }

    /// Returns true if the given key is currently held down.
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.key_state(key).contains(KeyState::PRESSED)
    }

    /// Returns true if the given key went down this frame.
    pub fn is_just_pressed(&self, key: KeyCode) -> bool {
        self.key_state(key).contains(KeyState::JUST_PRESSED)
    }

    /// Returns true if the given key went up this frame.
    pub fn is_just_released(&self, key: KeyCode) -> bool {
        self.key_state(key).contains(KeyState::JUST_RELEASED)
    }

    /// Returns true if the given mouse button is currently held.
    pub fn is_mouse_button_pressed(&self, button: MouseButton) -> bool {
        self.buttons
            .get(&button)
            .is_some_and(|state| state.contains(KeyState::PRESSED))
    }

    /// Last recorded cursor position
    pub fn mouse_position(&self) -> (f64, f64) {
        self.mouse_position
    }

    /// Cursor movement accumulated this frame
    pub fn mouse_delta(&self) -> (f64, f64) {
        self.mouse_delta
    }

    /// Scroll movement accumulated this frame
    pub fn scroll_delta(&self) -> (f64, f64) {
        self.scroll_delta
    }
}

fn press(state: &mut KeyState) {
    if !state.contains(KeyState::PRESSED) {
        state.insert(KeyState::JUST_PRESSED);
    }
    state.insert(KeyState::PRESSED);
    state.remove(KeyState::JUST_RELEASED);
}

fn release(state: &mut KeyState) {
    if state.contains(KeyState::PRESSED) {
        state.insert(KeyState::JUST_RELEASED);
    }
    state.remove(KeyState::PRESSED | KeyState::JUST_PRESSED);
}
