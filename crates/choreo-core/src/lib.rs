//! Choreo Core Library
//!
//! Platform-agnostic selection and manipulation of dancers on a stage:
//! hit testing, multi-selection, drag-to-move and grid snapping.

pub mod bindings;
pub mod camera;
pub mod config;
pub mod controller;
pub mod drag;
pub mod error;
pub mod input;
pub mod scene;
pub mod selection;
pub mod session;
pub mod snap;
pub mod stage;

pub use bindings::{BindingConfig, Command, InputBindings};
pub use camera::Camera;
pub use config::EditorConfig;
pub use controller::{ControllerState, ManipulationController};
pub use drag::DragSession;
pub use error::{Collaborator, ConfigError, ConfigResult, EventOutcome, IgnoreReason};
pub use input::{KeyEvent, ModifierState, MouseButton, PointerEvent, RawInput, ViewportPointer};
pub use scene::{EntityId, EntityStore, PointerSource, Scene, SpatialIndex, UiOcclusion, Viewport};
pub use selection::SelectionSet;
pub use session::EditorSession;
pub use snap::{DEFAULT_CELL_SIZE, GridConfig, snap_to_grid};
pub use stage::{DEFAULT_DANCER_RADIUS, Dancer, DancerColor, Stage};
