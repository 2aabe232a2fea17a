//! Editor session: the host-driven lifecycle around the controller.
//!
//! The host calls [`EditorSession::initialize`] once its window is up,
//! [`EditorSession::tick`] with each batch of raw input, and
//! [`EditorSession::shutdown`] on exit. Bindings only exist between
//! `initialize` and `shutdown`; dropping the session shuts it down.

use crate::bindings::{BindingConfig, InputBindings};
use crate::config::EditorConfig;
use crate::controller::ManipulationController;
use crate::error::{EventOutcome, IgnoreReason};
use crate::input::{RawInput, ViewportPointer};
use crate::scene::Scene;

/// A running editor: controller plus its input bindings.
#[derive(Debug)]
pub struct EditorSession<S: Scene> {
    controller: ManipulationController<S, ViewportPointer>,
    binding_config: BindingConfig,
    bindings: Option<InputBindings>,
}

impl<S: Scene> EditorSession<S> {
    pub fn new(
        controller: ManipulationController<S, ViewportPointer>,
        binding_config: BindingConfig,
    ) -> Self {
        Self {
            controller,
            binding_config,
            bindings: None,
        }
    }

    /// Build a session over `scene` from an editor config.
    pub fn from_config(scene: S, viewport: ViewportPointer, config: &EditorConfig) -> Self {
        let controller = ManipulationController::new(scene, viewport, config.grid);
        Self::new(controller, config.bindings.clone())
    }

    /// Register input bindings. Calling it twice is harmless.
    pub fn initialize(&mut self) {
        if self.bindings.is_some() {
            return;
        }
        self.bindings = Some(InputBindings::new(self.binding_config.clone()));
        log::info!("Editor session initialized");
    }

    pub fn is_initialized(&self) -> bool {
        self.bindings.is_some()
    }

    /// Feed raw input in arrival order.
    ///
    /// Returns one outcome per editor command produced; unbound input
    /// produces none. Before `initialize` every event is ignored.
    pub fn tick<I>(&mut self, events: I) -> Vec<EventOutcome>
    where
        I: IntoIterator<Item = RawInput>,
    {
        let mut outcomes = Vec::new();
        for input in events {
            let Some(bindings) = self.bindings.as_mut() else {
                outcomes.push(EventOutcome::Ignored(IgnoreReason::NotInitialized));
                continue;
            };
            if let RawInput::Pointer(event) = &input {
                self.controller.viewport_mut().set_screen_position(event.position());
            }
            let Some(command) = bindings.translate(&input) else {
                continue;
            };
            let outcome = self.controller.dispatch(command);
            if let Some(reason) = outcome.ignored_reason() {
                log::debug!("{command:?} ignored: {reason}");
            }
            outcomes.push(outcome);
        }
        outcomes
    }

    /// End any drag, release held modifiers and drop the bindings.
    pub fn shutdown(&mut self) {
        let Some(mut bindings) = self.bindings.take() else {
            return;
        };
        if let Some(command) = bindings.release_all() {
            self.controller.dispatch(command);
        }
        self.controller.on_release();
        log::info!("Editor session shut down");
    }

    pub fn controller(&self) -> &ManipulationController<S, ViewportPointer> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut ManipulationController<S, ViewportPointer> {
        &mut self.controller
    }
}

impl<S: Scene> Drop for EditorSession<S> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
