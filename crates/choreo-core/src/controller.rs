//! Manipulation controller: turns pointer and keyboard commands into
//! selection changes and grid-aligned moves.
//!
//! Single-threaded and reactive. Each handler runs to completion and
//! leaves the controller in a consistent state; events that cannot be
//! applied are reported as [`EventOutcome::Ignored`] and change nothing.

use crate::bindings::Command;
use crate::drag::DragSession;
use crate::error::{Collaborator, EventOutcome, IgnoreReason};
use crate::input::ModifierState;
use crate::scene::{EntityId, Scene, Viewport};
use crate::selection::SelectionSet;
use crate::snap::GridConfig;
use kurbo::{Point, Vec2};

/// State of the manipulation state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControllerState {
    /// Nothing in progress.
    #[default]
    Idle,
    /// A press is being resolved against the scene.
    Selecting,
    /// The selection follows the pointer until release.
    Dragging,
}

/// Selection and drag state machine over an injected scene and viewport.
#[derive(Debug)]
pub struct ManipulationController<S, V> {
    scene: S,
    viewport: V,
    grid: GridConfig,
    /// Grid change requested mid-drag, applied once the drag ends.
    pending_grid: Option<GridConfig>,
    selection: SelectionSet,
    drag: Option<DragSession>,
    modifiers: ModifierState,
    state: ControllerState,
}

impl<S: Scene, V: Viewport> ManipulationController<S, V> {
    /// Create a controller with an empty selection.
    pub fn new(scene: S, viewport: V, grid: GridConfig) -> Self {
        Self {
            scene,
            viewport,
            grid,
            pending_grid: None,
            selection: SelectionSet::new(),
            drag: None,
            modifiers: ModifierState::default(),
            state: ControllerState::Idle,
        }
    }

    /// Route a command to its handler.
    pub fn dispatch(&mut self, command: Command) -> EventOutcome {
        match command {
            Command::Press => self.on_press(),
            Command::Release => self.on_release(),
            Command::Move => self.on_move(),
            Command::ModifierChanged(held) => self.on_modifier_changed(held),
            Command::Delete => self.on_delete_command(),
            Command::Spawn => self.on_spawn_command(),
            Command::AlignToCenter => self.on_align_to_center_command(),
            Command::Duplicate => self.on_duplicate_command(),
        }
    }

    /// Pointer pressed: select under the pointer and start dragging.
    pub fn on_press(&mut self) -> EventOutcome {
        if self.viewport.is_pointer_over_ui() {
            return EventOutcome::Ignored(IgnoreReason::PointerOverUi);
        }
        let Some(point) = self.viewport.current_world_position() else {
            log::warn!("Press ignored: no world position for pointer");
            return EventOutcome::Ignored(IgnoreReason::MissingCollaborator(Collaborator::Pointer));
        };

        if self.drag.is_some() {
            // The release for the previous drag never arrived
            log::debug!("Press while dragging, finishing previous drag");
            self.finish_drag();
        }

        self.state = ControllerState::Selecting;
        let multi = self.modifiers.multi_select;

        match self.scene.hit_test(point) {
            Some(id) => {
                if self.selection.contains(id) {
                    if multi {
                        self.selection.remove(id, &mut self.scene);
                    }
                } else {
                    if !multi {
                        self.selection.clear(&mut self.scene);
                    }
                    self.selection.add(id, &mut self.scene);
                }
                self.drag = Some(DragSession::new(point));
                self.state = ControllerState::Dragging;
                log::debug!(
                    "Drag started at ({:.2}, {:.2}) with {} selected",
                    point.x,
                    point.y,
                    self.selection.count()
                );
            }
            None => {
                if !multi {
                    self.selection.clear(&mut self.scene);
                }
                self.state = ControllerState::Idle;
            }
        }
        EventOutcome::Applied
    }

    /// Pointer moved: drag the selection by the pointer delta.
    ///
    /// Positions follow the pointer exactly; snapping happens on release.
    pub fn on_move(&mut self) -> EventOutcome {
        let Some(drag) = self.drag.as_mut() else {
            return EventOutcome::Ignored(IgnoreReason::NotDragging);
        };
        let Some(current) = self.viewport.current_world_position() else {
            log::warn!("Move ignored: no world position for pointer");
            return EventOutcome::Ignored(IgnoreReason::MissingCollaborator(Collaborator::Pointer));
        };

        let valid = drag.is_valid(self.selection.count());
        let delta = drag.advance(current);
        if !valid {
            return EventOutcome::Ignored(IgnoreReason::NoActiveSelection);
        }

        for id in self.selection.all() {
            match self.scene.position(id) {
                Some(position) => self.scene.set_position(id, position + delta),
                None => log::warn!("Selected entity {id} is gone from the scene"),
            }
        }
        log::trace!("Dragged {} by ({:.3}, {:.3})", self.selection.count(), delta.x, delta.y);
        EventOutcome::Applied
    }

    /// Pointer released: end the drag and snap each selected entity.
    pub fn on_release(&mut self) -> EventOutcome {
        if self.finish_drag() {
            EventOutcome::Applied
        } else {
            EventOutcome::Ignored(IgnoreReason::NotDragging)
        }
    }

    /// Multi-select modifier pressed or released.
    pub fn on_modifier_changed(&mut self, held: bool) -> EventOutcome {
        self.modifiers.multi_select = held;
        EventOutcome::Applied
    }

    /// Delete every selected entity.
    pub fn on_delete_command(&mut self) -> EventOutcome {
        if self.selection.is_empty() {
            return EventOutcome::Ignored(IgnoreReason::NoActiveSelection);
        }
        let ids: Vec<EntityId> = self.selection.all().collect();
        for &id in &ids {
            self.scene.destroy(id);
        }
        self.selection.clear(&mut self.scene);
        log::debug!("Deleted {} entities", ids.len());
        EventOutcome::Applied
    }

    /// Spawn a new entity under the pointer, grid-aligned if snapping is on.
    pub fn on_spawn_command(&mut self) -> EventOutcome {
        let Some(point) = self.viewport.current_world_position() else {
            log::warn!("Spawn ignored: no world position for pointer");
            return EventOutcome::Ignored(IgnoreReason::MissingCollaborator(Collaborator::Pointer));
        };
        let position = self.grid.align(point);
        let id = self.scene.create_at(position);
        log::debug!("Spawned {id} at ({:.2}, {:.2})", position.x, position.y);
        EventOutcome::Applied
    }

    /// Move every selected entity onto the centroid of the selection,
    /// grid-aligned if snapping is on. Needs at least two selected.
    pub fn on_align_to_center_command(&mut self) -> EventOutcome {
        if self.selection.count() < 2 {
            return EventOutcome::Ignored(IgnoreReason::TooFewSelected);
        }
        let positions: Vec<Point> = self
            .selection
            .all()
            .filter_map(|id| self.scene.position(id))
            .collect();
        if positions.is_empty() {
            return EventOutcome::Ignored(IgnoreReason::NoActiveSelection);
        }

        let sum = positions
            .iter()
            .fold(Vec2::ZERO, |acc, p| acc + p.to_vec2());
        let center = self.grid.align((sum / positions.len() as f64).to_point());
        for id in self.selection.all() {
            self.scene.set_position(id, center);
        }
        log::debug!(
            "Aligned {} entities to ({:.2}, {:.2})",
            self.selection.count(),
            center.x,
            center.y
        );
        EventOutcome::Applied
    }

    /// Copy every selected entity in place and select the copies instead.
    pub fn on_duplicate_command(&mut self) -> EventOutcome {
        if self.selection.is_empty() {
            return EventOutcome::Ignored(IgnoreReason::NoActiveSelection);
        }
        let originals: Vec<EntityId> = self.selection.all().collect();
        self.selection.clear(&mut self.scene);
        for id in originals {
            match self.scene.duplicate(id) {
                Some(copy) => {
                    self.selection.add(copy, &mut self.scene);
                }
                None => log::warn!("Selected entity {id} is gone from the scene"),
            }
        }
        log::debug!("Duplicated {} entities", self.selection.count());
        EventOutcome::Applied
    }

    /// Deselect everything. An active drag keeps running but moves nothing.
    pub fn clear_selection(&mut self) {
        self.selection.clear(&mut self.scene);
    }

    /// Change the grid. Deferred until the current drag, if any, is released.
    pub fn set_grid(&mut self, grid: GridConfig) {
        if self.drag.is_some() {
            self.pending_grid = Some(grid);
        } else {
            self.grid = grid;
        }
    }

    /// End the drag if there is one. Returns whether a drag was ended.
    fn finish_drag(&mut self) -> bool {
        let Some(mut drag) = self.drag.take() else {
            return false;
        };
        drag.end();

        if self.grid.snap_enabled() {
            for id in self.selection.all() {
                if let Some(position) = self.scene.position(id) {
                    self.scene.set_position(id, self.grid.snap(position));
                }
            }
        }
        if let Some(grid) = self.pending_grid.take() {
            self.grid = grid;
        }
        self.state = ControllerState::Idle;
        log::debug!(
            "Drag ended, total delta ({:.2}, {:.2})",
            drag.total_delta().x,
            drag.total_delta().y
        );
        true
    }

    /// Selected ids in selection order.
    pub fn selected_ids(&self) -> impl Iterator<Item = EntityId> + Clone + '_ {
        self.selection.all()
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.as_ref().is_some_and(DragSession::is_active)
    }

    pub fn drag_session(&self) -> Option<&DragSession> {
        self.drag.as_ref()
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn modifier_held(&self) -> bool {
        self.modifiers.multi_select
    }

    pub fn grid(&self) -> GridConfig {
        self.grid
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    /// Mutable scene access for the host. Entities removed here while
    /// selected are skipped by later moves.
    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    pub fn viewport(&self) -> &V {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut V {
        &mut self.viewport
    }
}
