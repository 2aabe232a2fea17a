//! Raw input events and the pointer viewport.

use crate::camera::Camera;
use crate::scene::{PointerSource, UiOcclusion};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Pointer event in screen coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down { position: Point, button: MouseButton },
    Up { position: Point, button: MouseButton },
    Move { position: Point },
}

impl PointerEvent {
    pub fn position(&self) -> Point {
        match self {
            PointerEvent::Down { position, .. }
            | PointerEvent::Up { position, .. }
            | PointerEvent::Move { position } => *position,
        }
    }
}

/// Keyboard event, keyed by a host-independent key name ("Shift", "Delete", "N").
///
/// Hosts report key auto-repeat as `Repeat`; every `Pressed` must be
/// matched by one `Released`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyEvent {
    Pressed(String),
    Repeat(String),
    Released(String),
}

/// Raw input delivered by the host, in the order it occurred.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RawInput {
    Pointer(PointerEvent),
    Key(KeyEvent),
}

impl From<PointerEvent> for RawInput {
    fn from(event: PointerEvent) -> Self {
        RawInput::Pointer(event)
    }
}

impl From<KeyEvent> for RawInput {
    fn from(event: KeyEvent) -> Self {
        RawInput::Key(event)
    }
}

/// Multi-select modifier state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModifierState {
    pub multi_select: bool,
}

/// Pointer collaborator backed by a camera and a list of UI regions.
///
/// The host feeds it screen positions; the controller reads world
/// positions. Without a camera there is no world position to report.
#[derive(Debug, Clone, Default)]
pub struct ViewportPointer {
    screen_position: Option<Point>,
    camera: Option<Camera>,
    ui_regions: Vec<Rect>,
}

impl ViewportPointer {
    /// Create a viewport pointer looking through `camera`.
    pub fn new(camera: Camera) -> Self {
        Self {
            camera: Some(camera),
            ..Self::default()
        }
    }

    /// Add a screen-space rectangle covered by host UI.
    pub fn with_ui_region(mut self, region: Rect) -> Self {
        self.ui_regions.push(region);
        self
    }

    pub fn set_screen_position(&mut self, position: Point) {
        self.screen_position = Some(position);
    }

    pub fn screen_position(&self) -> Option<Point> {
        self.screen_position
    }

    pub fn camera(&self) -> Option<&Camera> {
        self.camera.as_ref()
    }

    pub fn camera_mut(&mut self) -> Option<&mut Camera> {
        self.camera.as_mut()
    }

    /// Attach or detach the camera (e.g. while the window is minimised).
    pub fn set_camera(&mut self, camera: Option<Camera>) {
        self.camera = camera;
    }

    /// Replace the UI regions (after a host layout change).
    pub fn set_ui_regions(&mut self, regions: Vec<Rect>) {
        self.ui_regions = regions;
    }
}

impl PointerSource for ViewportPointer {
    fn current_world_position(&self) -> Option<Point> {
        let camera = self.camera.as_ref()?;
        self.screen_position.map(|p| camera.screen_to_world(p))
    }
}

impl UiOcclusion for ViewportPointer {
    fn is_pointer_over_ui(&self) -> bool {
        self.screen_position
            .is_some_and(|p| self.ui_regions.iter().any(|r| r.contains(p)))
    }
}
