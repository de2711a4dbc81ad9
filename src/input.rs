//! Held-key input state
//!
//! Raw key press/release events latch booleans; the simulation reads one
//! `KeysState` value per tick so events arriving mid-frame can never tear a
//! tick.

use serde::{Deserialize, Serialize};

/// Logical control a raw key maps onto
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Jump,
}

impl Key {
    /// Map a DOM-style key name (`KeyboardEvent.key`) to a control
    pub fn from_key_name(name: &str) -> Option<Self> {
        match name {
            "ArrowLeft" | "a" => Some(Key::Left),
            "ArrowRight" | "d" => Some(Key::Right),
            "ArrowUp" | "w" | " " => Some(Key::Jump),
            _ => None,
        }
    }
}

/// Snapshot of held controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KeysState {
    pub left: bool,
    pub right: bool,
    pub up: bool,
}

/// Input state provider
#[derive(Debug, Clone, Default)]
pub struct InputState {
    keys: KeysState,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latch or release one control
    pub fn on_key(&mut self, key: Key, is_down: bool) {
        match key {
            Key::Left => self.keys.left = is_down,
            Key::Right => self.keys.right = is_down,
            Key::Jump => self.keys.up = is_down,
        }
    }

    /// Handle a raw key event by name
    ///
    /// Returns true if the key is mapped, so the host can suppress its
    /// default handling. Unmapped keys are ignored.
    pub fn on_key_event(&mut self, name: &str, is_down: bool) -> bool {
        match Key::from_key_name(name) {
            Some(key) => {
                self.on_key(key, is_down);
                true
            }
            None => false,
        }
    }

    pub fn snapshot(&self) -> KeysState {
        self.keys
    }

    /// Release everything (e.g. on focus loss)
    pub fn clear(&mut self) {
        self.keys = KeysState::default();
    }
}
