//! Translation from winit input to core input events.

use choreo_core::input::{KeyEvent, MouseButton, PointerEvent, RawInput};
use kurbo::Point;
use winit::event::{ElementState, MouseButton as WinitButton};
use winit::keyboard::{Key, NamedKey};

/// Host-independent name for a logical key, if the editor can bind it.
pub fn key_name(key: &Key) -> Option<String> {
    let name = match key {
        Key::Named(named) => match named {
            NamedKey::Shift => "Shift",
            NamedKey::Control => "Control",
            NamedKey::Alt => "Alt",
            NamedKey::Super => "Super",
            NamedKey::Delete => "Delete",
            NamedKey::Backspace => "Backspace",
            NamedKey::Escape => "Escape",
            NamedKey::Enter => "Enter",
            NamedKey::Space => "Space",
            _ => return None,
        },
        Key::Character(c) => c.as_str(),
        _ => return None,
    };
    Some(name.to_string())
}

pub fn mouse_button(button: WinitButton) -> Option<MouseButton> {
    match button {
        WinitButton::Left => Some(MouseButton::Left),
        WinitButton::Right => Some(MouseButton::Right),
        WinitButton::Middle => Some(MouseButton::Middle),
        _ => None,
    }
}

/// Pointer button press/release at `position` (physical pixels).
pub fn button_input(state: ElementState, button: WinitButton, position: Point) -> Option<RawInput> {
    let button = mouse_button(button)?;
    let event = match state {
        ElementState::Pressed => PointerEvent::Down { position, button },
        ElementState::Released => PointerEvent::Up { position, button },
    };
    Some(event.into())
}

pub fn cursor_input(position: Point) -> RawInput {
    PointerEvent::Move { position }.into()
}

pub fn key_input(state: ElementState, key: &Key, repeat: bool) -> Option<RawInput> {
    let name = key_name(key)?;
    let event = match state {
        ElementState::Pressed if repeat => KeyEvent::Repeat(name),
        ElementState::Pressed => KeyEvent::Pressed(name),
        ElementState::Released => KeyEvent::Released(name),
    };
    Some(event.into())
}
