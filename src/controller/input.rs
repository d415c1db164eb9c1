/// Platform-agnostic input handling
use std::collections::HashSet;

/// Platform-independent input events
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Physical key code, `KeyboardEvent.code` naming ("KeyW", "Space", ...)
    KeyDown(String),
    KeyUp(String),

    /// Relative pointer motion in pixels
    MouseMove { dx: f32, dy: f32 },

    // Window events
    FocusLost,
    PointerLockChanged { locked: bool },
}

/// Held movement keys resolved against the bindings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MovementFlags {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

impl MovementFlags {
    pub fn any(&self) -> bool {
        self.forward || self.backward || self.left || self.right
    }
}

/// Input written by event callbacks and read once per frame by the loop
#[derive(Debug, Default)]
pub struct InputState {
    pub pressed_keys: HashSet<String>,
    pub look_delta: (f32, f32),
    pub pointer_locked: bool,
    jump_requested: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process an input event and update state
    pub fn process_event(&mut self, event: &InputEvent) {
        match event {
            InputEvent::KeyDown(key) => {
                self.pressed_keys.insert(key.clone());
            }
            InputEvent::KeyUp(key) => {
                self.pressed_keys.remove(key.as_str());
            }
            InputEvent::MouseMove { dx, dy } => {
                if self.pointer_locked {
                    self.look_delta.0 += dx;
                    self.look_delta.1 += dy;
                }
            }
            InputEvent::FocusLost => {
                self.clear_keys();
            }
            InputEvent::PointerLockChanged { locked } => {
                self.pointer_locked = *locked;
                if !locked {
                    self.look_delta = (0.0, 0.0);
                }
            }
        }
    }

    pub fn is_key_pressed(&self, key: &str) -> bool {
        self.pressed_keys.contains(key)
    }

    pub fn clear_keys(&mut self) {
        self.pressed_keys.clear();
    }

    pub fn request_jump(&mut self) {
        self.jump_requested = true;
    }

    pub fn jump_pending(&self) -> bool {
        self.jump_requested
    }

    /// Read-and-clear the edge-triggered jump flag
    pub fn take_jump(&mut self) -> bool {
        std::mem::take(&mut self.jump_requested)
    }

    pub fn consume_look(&mut self) -> (f32, f32) {
        let result = self.look_delta;
        self.look_delta = (0.0, 0.0);
        result
    }
}

/// Key mapping configuration, in `KeyboardEvent.code` names
#[derive(Debug, Clone, PartialEq)]
pub struct KeyBindings {
    pub forward: String,
    pub backward: String,
    pub left: String,
    pub right: String,
    pub jump: String,
    pub release_pointer: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            forward: "KeyW".to_string(),
            backward: "KeyS".to_string(),
            left: "KeyA".to_string(),
            right: "KeyD".to_string(),
            jump: "Space".to_string(),
            release_pointer: "Escape".to_string(),
        }
    }
}

/// High-level input processor
#[derive(Debug, Clone, Default)]
pub struct InputProcessor {
    bindings: KeyBindings,
}

impl InputProcessor {
    pub fn new(bindings: KeyBindings) -> Self {
        Self { bindings }
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    /// Apply a host event. A fresh press of the jump key (not an autorepeat)
    /// raises the jump request; everything else is plain key/look tracking.
    pub fn handle_event(&self, input: &mut InputState, event: &InputEvent) {
        if let InputEvent::KeyDown(key) = event {
            if self.is_jump_key(key) && !input.is_key_pressed(key) {
                input.request_jump();
            }
        }
        input.process_event(event);
    }

    pub fn movement(&self, input: &InputState) -> MovementFlags {
        MovementFlags {
            forward: self.is_moving_forward(input),
            backward: self.is_moving_backward(input),
            left: self.is_moving_left(input),
            right: self.is_moving_right(input),
        }
    }

    pub fn is_moving_forward(&self, input: &InputState) -> bool {
        input.is_key_pressed(&self.bindings.forward) || input.is_key_pressed("ArrowUp")
    }

    pub fn is_moving_backward(&self, input: &InputState) -> bool {
        input.is_key_pressed(&self.bindings.backward) || input.is_key_pressed("ArrowDown")
    }

    pub fn is_moving_left(&self, input: &InputState) -> bool {
        input.is_key_pressed(&self.bindings.left) || input.is_key_pressed("ArrowLeft")
    }

    pub fn is_moving_right(&self, input: &InputState) -> bool {
        input.is_key_pressed(&self.bindings.right) || input.is_key_pressed("ArrowRight")
    }

    pub fn is_jump_key(&self, key: &str) -> bool {
        key == self.bindings.jump
    }

    pub fn is_release_pointer(&self, key: &str) -> bool {
        key == self.bindings.release_pointer
    }

    /// Keys whose browser default (scrolling) should be suppressed
    pub fn is_game_key(&self, key: &str) -> bool {
        let b = &self.bindings;
        [&b.forward, &b.backward, &b.left, &b.right, &b.jump]
            .iter()
            .any(|k| k.as_str() == key)
            || matches!(key, "ArrowUp" | "ArrowDown" | "ArrowLeft" | "ArrowRight")
    }
}

pub mod wasm {
    use super::*;
    use web_sys::{KeyboardEvent, MouseEvent};

    pub fn keyboard_event_to_input(e: &KeyboardEvent, is_down: bool) -> InputEvent {
        let code = e.code();
        if is_down {
            InputEvent::KeyDown(code)
        } else {
            InputEvent::KeyUp(code)
        }
    }

    pub fn mouse_move_to_input(e: &MouseEvent) -> InputEvent {
        InputEvent::MouseMove {
            dx: e.movement_x() as f32,
            dy: e.movement_y() as f32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn down(code: &str) -> InputEvent {
        InputEvent::KeyDown(code.to_string())
    }

    fn up(code: &str) -> InputEvent {
        InputEvent::KeyUp(code.to_string())
    }

    #[test]
    fn test_movement_flags_follow_held_keys() {
        let processor = InputProcessor::default();
        let mut input = InputState::new();

        processor.handle_event(&mut input, &down("KeyW"));
        processor.handle_event(&mut input, &down("ArrowRight"));
        let flags = processor.movement(&input);
        assert!(flags.forward && flags.right);
        assert!(!flags.backward && !flags.left);

        processor.handle_event(&mut input, &up("KeyW"));
        assert!(!processor.movement(&input).forward);
    }

    #[test]
    fn test_unknown_keys_are_ignored_by_movement() {
        let processor = InputProcessor::default();
        let mut input = InputState::new();
        processor.handle_event(&mut input, &down("KeyZ"));
        assert!(!processor.movement(&input).any());
        assert!(!input.jump_pending());
    }

    #[test]
    fn test_jump_is_edge_triggered() {
        let processor = InputProcessor::default();
        let mut input = InputState::new();

        processor.handle_event(&mut input, &down("Space"));
        assert!(input.take_jump());
        assert!(!input.take_jump(), "request must clear after being read");

        // autorepeat while held does not re-arm
        processor.handle_event(&mut input, &down("Space"));
        assert!(!input.jump_pending());

        processor.handle_event(&mut input, &up("Space"));
        processor.handle_event(&mut input, &down("Space"));
        assert!(input.jump_pending());
    }

    #[test]
    fn test_look_only_accumulates_while_locked() {
        let mut input = InputState::new();
        input.process_event(&InputEvent::MouseMove { dx: 4.0, dy: 2.0 });
        assert_eq!(input.consume_look(), (0.0, 0.0));

        input.process_event(&InputEvent::PointerLockChanged { locked: true });
        input.process_event(&InputEvent::MouseMove { dx: 4.0, dy: 2.0 });
        input.process_event(&InputEvent::MouseMove { dx: 1.0, dy: -1.0 });
        assert_eq!(input.consume_look(), (5.0, 1.0));
        assert_eq!(input.consume_look(), (0.0, 0.0));

        input.process_event(&InputEvent::MouseMove { dx: 3.0, dy: 3.0 });
        input.process_event(&InputEvent::PointerLockChanged { locked: false });
        assert_eq!(input.consume_look(), (0.0, 0.0));
    }

    #[test]
    fn test_focus_loss_releases_keys() {
        let processor = InputProcessor::default();
        let mut input = InputState::new();
        processor.handle_event(&mut input, &down("KeyA"));
        processor.handle_event(&mut input, &InputEvent::FocusLost);
        assert!(!processor.movement(&input).left);
    }

    #[test]
    fn test_game_keys() {
        let processor = InputProcessor::default();
        assert!(processor.is_game_key("Space"));
        assert!(processor.is_game_key("ArrowDown"));
        assert!(!processor.is_game_key("KeyQ"));
        assert!(processor.is_release_pointer("Escape"));
    }
}
