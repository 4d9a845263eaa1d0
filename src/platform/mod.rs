//! Platform input layer
//!
//! The browser reports key codes (`KeyboardEvent.code`). This module keeps the
//! set of held codes and maps them onto the logical buttons the simulation
//! reads each frame. Edge detection happens in `sim::input`, not here.

use std::collections::HashSet;

use crate::sim::TickInput;

/// Logical buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Left,
    Right,
    Jump,
    Attack,
    Pause,
    Debug,
}

/// Map a `KeyboardEvent.code` to a button
pub fn button_for_code(code: &str) -> Option<Button> {
    match code {
        "KeyA" | "ArrowLeft" => Some(Button::Left),
        "KeyD" | "ArrowRight" => Some(Button::Right),
        "KeyW" | "ArrowUp" => Some(Button::Jump),
        "Space" => Some(Button::Attack),
        "Escape" => Some(Button::Pause),
        "Backquote" => Some(Button::Debug),
        _ => None,
    }
}

/// Keys currently held down
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    held: HashSet<String>,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when the code is a game key (the host should suppress the
    /// browser default, e.g. Space scrolling)
    pub fn key_down(&mut self, code: &str) -> bool {
        self.held.insert(code.to_string());
        button_for_code(code).is_some()
    }

    pub fn key_up(&mut self, code: &str) -> bool {
        self.held.remove(code);
        button_for_code(code).is_some()
    }

    /// Forget everything, e.g. on window blur where key-ups are lost
    pub fn release_all(&mut self) {
        self.held.clear();
    }

    pub fn is_held(&self, button: Button) -> bool {
        self.held
            .iter()
            .any(|code| button_for_code(code) == Some(button))
    }

    /// Level snapshot for one tick
    pub fn tick_input(&self) -> TickInput {
        let mut input = TickInput::default();
        for button in self.held.iter().filter_map(|code| button_for_code(code)) {
            match button {
                Button::Left => input.left = true,
                Button::Right => input.right = true,
                Button::Jump => input.jump = true,
                Button::Attack => input.attack = true,
                Button::Pause => input.pause = true,
                Button::Debug => input.debug = true,
            }
        }
        input
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keymap() {
        assert_eq!(button_for_code("KeyA"), Some(Button::Left));
        assert_eq!(button_for_code("ArrowRight"), Some(Button::Right));
        assert_eq!(button_for_code("KeyW"), Some(Button::Jump));
        assert_eq!(button_for_code("Space"), Some(Button::Attack));
        assert_eq!(button_for_code("KeyQ"), None);
    }

    #[test]
    fn test_held_keys_become_tick_input() {
        let mut keys = KeyboardState::new();
        assert!(keys.key_down("KeyD"));
        assert!(keys.key_down("Space"));
        assert!(!keys.key_down("KeyZ"));

        let input = keys.tick_input();
        assert!(input.right && input.attack);
        assert!(!input.left && !input.jump);

        keys.key_up("Space");
        assert!(!keys.tick_input().attack);
        assert!(keys.is_held(Button::Right));
    }

    #[test]
    fn test_either_key_holds_button() {
        let mut keys = KeyboardState::new();
        keys.key_down("KeyA");
        keys.key_down("ArrowLeft");
        keys.key_up("KeyA");
        assert!(keys.is_held(Button::Left));
    }

    #[test]
    fn test_release_all() {
        let mut keys = KeyboardState::new();
        keys.key_down("KeyW");
        keys.release_all();
        assert_eq!(keys.tick_input(), TickInput::default());
    }
}
