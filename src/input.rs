//! Control-intent merging
//!
//! Two intent sources feed the simulation: held keyboard keys and on-screen
//! touch buttons. Both are level-triggered flag sets; `snapshot` ORs them
//! into the single `TickInput` consumed by the tick loop. Event handlers only
//! ever set or clear one flag, so no compound invariant crosses the handler
//! boundary.

use crate::sim::TickInput;

/// The three game actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Left,
    Right,
    Shoot,
}

impl Action {
    /// Map a DOM `KeyboardEvent.code` to an action
    pub fn from_key_code(code: &str) -> Option<Self> {
        match code {
            "ArrowLeft" | "KeyA" => Some(Action::Left),
            "ArrowRight" | "KeyD" => Some(Action::Right),
            "Space" => Some(Action::Shoot),
            _ => None,
        }
    }
}

/// Per-action held flags for one source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Held {
    left: bool,
    right: bool,
    shoot: bool,
}

impl Held {
    fn set(&mut self, action: Action, down: bool) {
        match action {
            Action::Left => self.left = down,
            Action::Right => self.right = down,
            Action::Shoot => self.shoot = down,
        }
    }
}

/// Merged input state for the session
#[derive(Debug, Clone, Copy, Default)]
pub struct InputState {
    keyboard: Held,
    touch: Held,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keyboard press/release. Unmapped keys are ignored.
    pub fn key_event(&mut self, code: &str, down: bool) {
        if let Some(action) = Action::from_key_code(code) {
            self.keyboard.set(action, down);
        }
    }

    /// Touch-button press/release
    pub fn touch_event(&mut self, action: Action, down: bool) {
        self.touch.set(action, down);
    }

    /// Drop everything held (used when the window loses focus, so keys do
    /// not stick through a missed keyup)
    pub fn release_all(&mut self) {
        *self = Self::default();
    }

    /// Current merged intent; either source suffices per action
    pub fn snapshot(&self) -> TickInput {
        TickInput {
            left: self.keyboard.left || self.touch.left,
            right: self.keyboard.right || self.touch.right,
            shoot: self.keyboard.shoot || self.touch.shoot,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(Action::from_key_code("ArrowLeft"), Some(Action::Left));
        assert_eq!(Action::from_key_code("KeyD"), Some(Action::Right));
        assert_eq!(Action::from_key_code("Space"), Some(Action::Shoot));
        assert_eq!(Action::from_key_code("Escape"), None);
    }

    #[test]
    fn test_key_press_release_cycle() {
        let mut input = InputState::new();
        input.key_event("ArrowLeft", true);
        assert!(input.snapshot().left);
        input.key_event("ArrowLeft", false);
        assert!(!input.snapshot().left);
    }

    #[test]
    fn test_sources_merge_with_or() {
        let mut input = InputState::new();
        input.touch_event(Action::Shoot, true);
        input.key_event("Space", true);
        assert!(input.snapshot().shoot);

        // Still held through one source
        input.key_event("Space", false);
        assert!(input.snapshot().shoot);
        input.touch_event(Action::Shoot, false);
        assert!(!input.snapshot().shoot);
    }

    #[test]
    fn test_release_all_clears_both_sources() {
        let mut input = InputState::new();
        input.key_event("ArrowRight", true);
        input.touch_event(Action::Left, true);
        input.release_all();
        assert_eq!(input.snapshot(), TickInput::default());
    }
}
