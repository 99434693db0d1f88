/// Input handling for the platformer.
///
/// Two kinds of input reach the game:
///
/// - **Held controls** (move left/right, jump) are polled once per world tick
///   through the [`InputSource`] trait. The world never sees SDL; it only asks
///   "is this control pressed right now?".
/// - **One-shot actions** (quit, pause, single step, respawn) come from key-press
///   events and are handled by the game loop, not the world.
///
/// # Architecture
///
/// ```text
/// SDL events ──> action_for_key() ──> GameAction ──> game loop
/// SDL keyboard ──> impl InputSource ──> World::update()
/// ```
#[cfg(feature = "sdl")]
use sdl2::keyboard::{Keycode, KeyboardState, Scancode};

/// Held controls the world asks about every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    MoveLeft,
    MoveRight,
    Jump,
}

/// Anything that can answer digital control queries.
pub trait InputSource {
    fn is_pressed(&self, control: Control) -> bool;

    /// -1 for left, +1 for right, 0 when neither or both are held.
    fn movement_axis(&self) -> f32 {
        let mut axis = 0.0;
        if self.is_pressed(Control::MoveRight) {
            axis += 1.0;
        }
        if self.is_pressed(Control::MoveLeft) {
            axis -= 1.0;
        }
        axis
    }
}

/// Plain snapshot of the held controls. Used by tests and scripted input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    pub move_left: bool,
    pub move_right: bool,
    pub jump: bool,
}

impl InputState {
    /// Nothing pressed.
    pub const NONE: InputState = InputState {
        move_left: false,
        move_right: false,
        jump: false,
    };

    pub fn left() -> Self {
        InputState {
            move_left: true,
            ..InputState::NONE
        }
    }

    pub fn right() -> Self {
        InputState {
            move_right: true,
            ..InputState::NONE
        }
    }

    pub fn jump() -> Self {
        InputState {
            jump: true,
            ..InputState::NONE
        }
    }

    /// Copies the current state of any other source.
    pub fn capture(source: &impl InputSource) -> Self {
        InputState {
            move_left: source.is_pressed(Control::MoveLeft),
            move_right: source.is_pressed(Control::MoveRight),
            jump: source.is_pressed(Control::Jump),
        }
    }
}

impl InputSource for InputState {
    fn is_pressed(&self, control: Control) -> bool {
        match control {
            Control::MoveLeft => self.move_left,
            Control::MoveRight => self.move_right,
            Control::Jump => self.jump,
        }
    }
}

/// A/D to move, Space to jump.
#[cfg(feature = "sdl")]
pub fn scancode_for(control: Control) -> Scancode {
    match control {
        Control::MoveLeft => Scancode::A,
        Control::MoveRight => Scancode::D,
        Control::Jump => Scancode::Space,
    }
}

#[cfg(feature = "sdl")]
impl InputSource for KeyboardState<'_> {
    fn is_pressed(&self, control: Control) -> bool {
        self.is_scancode_pressed(scancode_for(control))
    }
}

/// One-shot actions handled by the game loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    Quit,
    /// Pause or resume the simulation.
    TogglePause,
    /// Advance exactly one tick (useful while paused).
    StepOnce,
    /// Put the player back at the level's spawn point.
    RespawnPlayer,
}

/// Maps a pressed key to its action, if any.
#[cfg(feature = "sdl")]
pub fn action_for_key(key: Keycode) -> Option<GameAction> {
    match key {
        Keycode::Escape => Some(GameAction::Quit),
        Keycode::P => Some(GameAction::TogglePause),
        Keycode::N => Some(GameAction::StepOnce),
        Keycode::R => Some(GameAction::RespawnPlayer),
        _ => None,
    }
}

/// Drains pending SDL events into actions.
#[cfg(feature = "sdl")]
pub fn poll_actions(event_pump: &mut sdl2::EventPump) -> Vec<GameAction> {
    use sdl2::event::Event;

    let mut actions = Vec::new();
    for event in event_pump.poll_iter() {
        match event {
            Event::Quit { .. } => actions.push(GameAction::Quit),
            Event::KeyDown {
                keycode: Some(key),
                repeat: false,
                ..
            } => {
                if let Some(action) = action_for_key(key) {
                    actions.push(action);
                }
            }
            _ => {}
        }
    }
    actions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_state_answers_queries() {
        let input = InputState {
            move_left: true,
            jump: true,
            ..InputState::NONE
        };

        assert!(input.is_pressed(Control::MoveLeft));
        assert!(!input.is_pressed(Control::MoveRight));
        assert!(input.is_pressed(Control::Jump));
    }

    #[test]
    fn test_movement_axis() {
        assert_eq!(InputState::NONE.movement_axis(), 0.0);
        assert_eq!(InputState::left().movement_axis(), -1.0);
        assert_eq!(InputState::right().movement_axis(), 1.0);

        let both = InputState {
            move_left: true,
            move_right: true,
            jump: false,
        };
        assert_eq!(both.movement_axis(), 0.0);
    }

    #[test]
    fn test_capture_copies_any_source() {
        struct JumpOnly;
        impl InputSource for JumpOnly {
            fn is_pressed(&self, control: Control) -> bool {
                control == Control::Jump
            }
        }

        assert_eq!(InputState::capture(&JumpOnly), InputState::jump());
    }
}
