//! Choreo Application
//!
//! Native shell: a window whose pointer and keyboard input drive an
//! editor session over the stage.

mod app;
mod keys;

pub use app::{App, AppConfig, AppError, fit_camera, seed_stage};
