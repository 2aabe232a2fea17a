//! Input bindings: which buttons and keys drive which editor commands.

use crate::input::{KeyEvent, MouseButton, PointerEvent, RawInput};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Editor command produced from raw input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Press,
    Release,
    Move,
    ModifierChanged(bool),
    Delete,
    Spawn,
    AlignToCenter,
    Duplicate,
}

/// Key and button bindings, by host-independent key name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BindingConfig {
    /// Button that selects and drags.
    pub select_button: MouseButton,
    /// Keys that hold multi-select while pressed.
    pub multi_select: Vec<String>,
    pub delete: Vec<String>,
    pub spawn: Vec<String>,
    /// Keys that move the selection onto its centre point.
    pub align_to_center: Vec<String>,
    pub duplicate: Vec<String>,
}

impl Default for BindingConfig {
    fn default() -> Self {
        Self {
            select_button: MouseButton::Left,
            multi_select: vec!["Shift".to_string(), "Control".to_string()],
            delete: vec!["Delete".to_string(), "Backspace".to_string()],
            spawn: vec!["N".to_string()],
            align_to_center: vec!["C".to_string()],
            duplicate: vec!["D".to_string()],
        }
    }
}

fn is_bound(keys: &[String], key: &str) -> bool {
    keys.iter().any(|k| k.eq_ignore_ascii_case(key))
}

/// Active bindings translating raw input into [`Command`]s.
///
/// Keys are counted per name, so two physical keys reporting the same
/// name (left and right Shift) keep it held until both are released.
/// Commands fire only when a name goes from released to held.
#[derive(Debug, Clone)]
pub struct InputBindings {
    config: BindingConfig,
    held_keys: HashMap<String, u32>,
}

impl InputBindings {
    pub fn new(config: BindingConfig) -> Self {
        Self {
            config,
            held_keys: HashMap::new(),
        }
    }

    pub fn multi_select_held(&self) -> bool {
        self.held_keys
            .keys()
            .any(|key| is_bound(&self.config.multi_select, key))
    }

    /// Translate one raw event. Returns `None` for unbound input.
    pub fn translate(&mut self, input: &RawInput) -> Option<Command> {
        match input {
            RawInput::Pointer(event) => self.translate_pointer(event),
            RawInput::Key(event) => self.translate_key(event),
        }
    }

    fn translate_pointer(&self, event: &PointerEvent) -> Option<Command> {
        match event {
            PointerEvent::Down { button, .. } if *button == self.config.select_button => {
                Some(Command::Press)
            }
            PointerEvent::Up { button, .. } if *button == self.config.select_button => {
                Some(Command::Release)
            }
            PointerEvent::Move { .. } => Some(Command::Move),
            _ => None,
        }
    }

    fn translate_key(&mut self, event: &KeyEvent) -> Option<Command> {
        match event {
            KeyEvent::Repeat(_) => None,
            KeyEvent::Pressed(key) => {
                let key = key.to_ascii_lowercase();
                let was_held = self.multi_select_held();
                let count = self.held_keys.entry(key.clone()).or_default();
                *count += 1;
                if *count > 1 {
                    return None;
                }
                let bindings = &self.config;
                if is_bound(&bindings.multi_select, &key) {
                    (!was_held).then_some(Command::ModifierChanged(true))
                } else if is_bound(&bindings.delete, &key) {
                    Some(Command::Delete)
                } else if is_bound(&bindings.spawn, &key) {
                    Some(Command::Spawn)
                } else if is_bound(&bindings.align_to_center, &key) {
                    Some(Command::AlignToCenter)
                } else if is_bound(&bindings.duplicate, &key) {
                    Some(Command::Duplicate)
                } else {
                    None
                }
            }
            KeyEvent::Released(key) => {
                let key = key.to_ascii_lowercase();
                let count = self.held_keys.get_mut(&key)?;
                *count -= 1;
                if *count > 0 {
                    return None;
                }
                self.held_keys.remove(&key);
                (is_bound(&self.config.multi_select, &key) && !self.multi_select_held())
                    .then_some(Command::ModifierChanged(false))
            }
        }
    }

    /// Forget all held keys. Returns the modifier release if one was held.
    pub fn release_all(&mut self) -> Option<Command> {
        let was_held = self.multi_select_held();
        self.held_keys.clear();
        was_held.then_some(Command::ModifierChanged(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;

    fn key_down(key: &str) -> RawInput {
        RawInput::Key(KeyEvent::Pressed(key.to_string()))
    }

    fn key_up(key: &str) -> RawInput {
        RawInput::Key(KeyEvent::Released(key.to_string()))
    }

    fn button(down: bool, button: MouseButton) -> RawInput {
        let position = Point::new(1.0, 1.0);
        RawInput::Pointer(if down {
            PointerEvent::Down { position, button }
        } else {
            PointerEvent::Up { position, button }
        })
    }

    #[test]
    fn test_pointer_translation() {
        let mut bindings = InputBindings::new(BindingConfig::default());

        assert_eq!(bindings.translate(&button(true, MouseButton::Left)), Some(Command::Press));
        assert_eq!(bindings.translate(&button(false, MouseButton::Left)), Some(Command::Release));
        assert_eq!(bindings.translate(&button(true, MouseButton::Right)), None);
        assert_eq!(
            bindings.translate(&RawInput::Pointer(PointerEvent::Move { position: Point::ZERO })),
            Some(Command::Move)
        );
    }

    #[test]
    fn test_command_keys() {
        let mut bindings = InputBindings::new(BindingConfig::default());

        assert_eq!(bindings.translate(&key_down("Delete")), Some(Command::Delete));
        assert_eq!(bindings.translate(&key_down("n")), Some(Command::Spawn));
        assert_eq!(bindings.translate(&key_down("c")), Some(Command::AlignToCenter));
        assert_eq!(bindings.translate(&key_down("D")), Some(Command::Duplicate));
        assert_eq!(bindings.translate(&key_down("Q")), None);
    }

    #[test]
    fn test_auto_repeat_suppressed() {
        let mut bindings = InputBindings::new(BindingConfig::default());
        let repeat = RawInput::Key(KeyEvent::Repeat("Backspace".to_string()));

        assert_eq!(bindings.translate(&key_down("Backspace")), Some(Command::Delete));
        assert_eq!(bindings.translate(&repeat), None);
        assert_eq!(bindings.translate(&repeat), None);
        bindings.translate(&key_up("Backspace"));
        assert_eq!(bindings.translate(&key_down("Backspace")), Some(Command::Delete));
    }

    #[test]
    fn test_same_name_keys_held_until_both_released() {
        let mut bindings = InputBindings::new(BindingConfig::default());

        // Left and right Shift both report "Shift"
        assert_eq!(bindings.translate(&key_down("Shift")), Some(Command::ModifierChanged(true)));
        assert_eq!(bindings.translate(&key_down("Shift")), None);
        assert_eq!(bindings.translate(&key_up("Shift")), None);
        assert!(bindings.multi_select_held());
        assert_eq!(bindings.translate(&key_up("Shift")), Some(Command::ModifierChanged(false)));
        assert!(!bindings.multi_select_held());
    }

    #[test]
    fn test_release_without_press_ignored() {
        let mut bindings = InputBindings::new(BindingConfig::default());
        assert_eq!(bindings.translate(&key_up("Shift")), None);
        assert_eq!(bindings.translate(&key_down("Shift")), Some(Command::ModifierChanged(true)));
    }

    #[test]
    fn test_multi_select_held_while_any_modifier_down() {
        let mut bindings = InputBindings::new(BindingConfig::default());

        assert_eq!(bindings.translate(&key_down("Shift")), Some(Command::ModifierChanged(true)));
        assert_eq!(bindings.translate(&key_down("Control")), None);
        assert_eq!(bindings.translate(&key_up("Shift")), None);
        assert!(bindings.multi_select_held());
        assert_eq!(bindings.translate(&key_up("Control")), Some(Command::ModifierChanged(false)));
        assert!(!bindings.multi_select_held());
    }

    #[test]
    fn test_release_all() {
        let mut bindings = InputBindings::new(BindingConfig::default());
        assert_eq!(bindings.release_all(), None);

        bindings.translate(&key_down("Shift"));
        assert_eq!(bindings.release_all(), Some(Command::ModifierChanged(false)));
        assert!(!bindings.multi_select_held());
    }

    #[test]
    fn test_custom_bindings_from_json() {
        let config: BindingConfig =
            serde_json::from_str(r#"{"select_button": "Right", "spawn": ["Space"]}"#).unwrap();
        assert_eq!(config.select_button, MouseButton::Right);
        assert_eq!(config.delete, BindingConfig::default().delete);

        let mut bindings = InputBindings::new(config);
        assert_eq!(bindings.translate(&key_down("space")), Some(Command::Spawn));
        assert_eq!(bindings.translate(&button(true, MouseButton::Right)), Some(Command::Press));
    }
}
