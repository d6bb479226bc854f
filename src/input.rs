//! Input handling.
//!
//! [`Input`] turns raw window events into the two things the animation
//! consumes: the pointer position in surface pixels and a queue of discrete
//! [`Command`]s.
//!
//! | key | command |
//! |-----|---------|
//! | W   | [`Command::ToggleWords`] |
//! | T   | [`Command::ToggleTitle`] |
//! | F   | [`Command::ToggleFps`] |
//! | S   | [`Command::SaveStill`] |
//! | G   | [`Command::ToggleRecording`] |
//! | Esc | [`Command::Quit`] |

use glam::Vec2;
use std::collections::HashSet;
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// A discrete action triggered by a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    ToggleWords,
    ToggleTitle,
    ToggleFps,
    SaveStill,
    ToggleRecording,
    Quit,
}

impl Command {
    /// Command bound to a physical key, if any.
    pub fn from_key(key: KeyCode) -> Option<Self> {
        match key {
            KeyCode::KeyW => Some(Command::ToggleWords),
            KeyCode::KeyT => Some(Command::ToggleTitle),
            KeyCode::KeyF => Some(Command::ToggleFps),
            KeyCode::KeyS => Some(Command::SaveStill),
            KeyCode::KeyG => Some(Command::ToggleRecording),
            KeyCode::Escape => Some(Command::Quit),
            _ => None,
        }
    }
}

/// Pointer state and pending commands.
#[derive(Debug, Default)]
pub struct Input {
    keys_held: HashSet<KeyCode>,
    commands: Vec<Command>,
    /// Pointer in surface pixels, `None` once it leaves the window.
    pointer: Option<Vec2>,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer position in surface pixels.
    pub fn pointer(&self) -> Option<Vec2> {
        self.pointer
    }

    /// Take every command queued since the last call.
    pub fn drain_commands(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.commands)
    }

    /// Process a winit window event.
    pub fn handle_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    self.handle_key(key, event.state);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.pointer = Some(Vec2::new(position.x as f32, position.y as f32));
            }
            WindowEvent::CursorLeft { .. } => {
                self.pointer = None;
            }
            WindowEvent::Focused(false) => {
                self.keys_held.clear();
            }
            _ => {}
        }
    }

    /// Record a key transition. Auto-repeat presses of a held key are ignored.
    pub fn handle_key(&mut self, key: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if self.keys_held.insert(key) {
                    if let Some(command) = Command::from_key(key) {
                        self.commands.push(command);
                    }
                }
            }
            ElementState::Released => {
                self.keys_held.remove(&key);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_press_queues_command_once() {
        let mut input = Input::new();
        input.handle_key(KeyCode::KeyW, ElementState::Pressed);
        // Auto-repeat while held
        input.handle_key(KeyCode::KeyW, ElementState::Pressed);
        assert_eq!(input.drain_commands(), vec![Command::ToggleWords]);
        assert!(input.drain_commands().is_empty());

        input.handle_key(KeyCode::KeyW, ElementState::Released);
        input.handle_key(KeyCode::KeyW, ElementState::Pressed);
        assert_eq!(input.drain_commands(), vec![Command::ToggleWords]);
    }

    #[test]
    fn test_unbound_keys_are_ignored() {
        let mut input = Input::new();
        input.handle_key(KeyCode::KeyQ, ElementState::Pressed);
        assert!(input.drain_commands().is_empty());
    }

    #[test]
    fn test_key_bindings() {
        assert_eq!(Command::from_key(KeyCode::KeyT), Some(Command::ToggleTitle));
        assert_eq!(Command::from_key(KeyCode::KeyF), Some(Command::ToggleFps));
        assert_eq!(Command::from_key(KeyCode::KeyS), Some(Command::SaveStill));
        assert_eq!(Command::from_key(KeyCode::KeyG), Some(Command::ToggleRecording));
        assert_eq!(Command::from_key(KeyCode::Escape), Some(Command::Quit));
    }

    #[test]
    fn test_commands_keep_press_order() {
        let mut input = Input::new();
        input.handle_key(KeyCode::KeyS, ElementState::Pressed);
        input.handle_key(KeyCode::KeyG, ElementState::Pressed);
        assert_eq!(
            input.drain_commands(),
            vec![Command::SaveStill, Command::ToggleRecording]
        );
    }

    #[test]
    fn test_pointer_starts_absent() {
        assert_eq!(Input::new().pointer(), None);
    }
}
