//! Collaborator interfaces the manipulation controller depends on.
//!
//! The controller never owns entities or knows how they are drawn. It
//! reaches the scene, the pointer and the host UI through these traits,
//! all injected at construction.

use kurbo::Point;
use uuid::Uuid;

/// Unique identifier for an entity on the stage.
pub type EntityId = Uuid;

/// Resolves the pointer to a world position.
pub trait PointerSource {
    /// Current pointer position in world coordinates.
    ///
    /// `None` means no camera or viewport is available; the controller
    /// treats the event as a no-op.
    fn current_world_position(&self) -> Option<Point>;
}

/// Tells whether the pointer is over a host UI surface.
pub trait UiOcclusion {
    fn is_pointer_over_ui(&self) -> bool;
}

/// Everything the controller needs to know about the pointer.
pub trait Viewport: PointerSource + UiOcclusion {}

impl<T: PointerSource + UiOcclusion> Viewport for T {}

/// Point queries against the scene.
pub trait SpatialIndex {
    /// The entity occupying `point`, if any. When several overlap the
    /// top-most one wins.
    fn hit_test(&self, point: Point) -> Option<EntityId>;
}

/// Entity storage owned by the scene.
///
/// Calls with unknown ids are no-ops (`position` returns `None`).
pub trait EntityStore {
    fn position(&self, id: EntityId) -> Option<Point>;

    fn set_position(&mut self, id: EntityId, position: Point);

    /// Update the entity's selected look (tint, outline, scale...).
    fn set_selected_visual(&mut self, id: EntityId, selected: bool);

    fn destroy(&mut self, id: EntityId);

    /// Create a new entity at `position` and return its id.
    fn create_at(&mut self, position: Point) -> EntityId;

    /// Copy an entity in place. The copy is unselected and gets a new id.
    fn duplicate(&mut self, id: EntityId) -> Option<EntityId>;
}

/// A scene that can both answer hit tests and store entities.
pub trait Scene: SpatialIndex + EntityStore {}

impl<T: SpatialIndex + EntityStore> Scene for T {}
