//! Application state and lifecycle.

use choreo_core::camera::Camera;
use choreo_core::config::EditorConfig;
use choreo_core::error::{ConfigError, ConfigResult};
use choreo_core::input::{RawInput, ViewportPointer};
use choreo_core::session::EditorSession;
use choreo_core::stage::{DancerColor, Stage};
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::error::EventLoopError;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowId};

use crate::keys;

/// Fraction of the free viewport the stage fills after fitting.
const FIT_MARGIN: f64 = 0.9;

/// Errors that stop the application.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Event loop error: {0}")]
    EventLoop(#[from] EventLoopError),
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Stage extent in stage units.
    pub stage_width: f64,
    pub stage_height: f64,
    /// Dancers placed on the stage at startup.
    pub initial_dancers: usize,
    /// Height of the toolbar strip across the top, in logical pixels.
    /// Presses over it never reach the stage.
    pub toolbar_height: f64,
    /// Colors given to the initial dancers in turn.
    pub dancer_colors: Vec<DancerColor>,
    pub editor: EditorConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Choreo".to_string(),
            width: 1280,
            height: 800,
            stage_width: 16.0,
            stage_height: 10.0,
            initial_dancers: 5,
            toolbar_height: 48.0,
            dancer_colors: vec![
                DancerColor::new(230, 80, 80, 255),
                DancerColor::new(80, 150, 230, 255),
                DancerColor::new(90, 190, 110, 255),
                DancerColor::new(240, 190, 60, 255),
            ],
            editor: EditorConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file. Missing fields take defaults.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidConfiguration(format!(
                "window size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        let stage_ok = |v: f64| v.is_finite() && v > 0.0;
        if !stage_ok(self.stage_width) || !stage_ok(self.stage_height) {
            return Err(ConfigError::InvalidConfiguration(format!(
                "stage size must be positive, got {}x{}",
                self.stage_width, self.stage_height
            )));
        }
        if !(self.toolbar_height.is_finite() && self.toolbar_height >= 0.0) {
            return Err(ConfigError::InvalidConfiguration(format!(
                "toolbar height must not be negative, got {}",
                self.toolbar_height
            )));
        }
        self.editor.validate()
    }

    pub fn stage_size(&self) -> Size {
        Size::new(self.stage_width, self.stage_height)
    }
}

/// Camera that centres `stage` in the part of `viewport` below `top_inset`.
///
/// Returns `None` when there is no room left to show the stage.
pub fn fit_camera(stage: Rect, viewport: Size, top_inset: f64) -> Option<Camera> {
    let free = Rect::new(0.0, top_inset, viewport.width, viewport.height);
    if free.width() <= 0.0 || free.height() <= 0.0 || stage.is_zero_area() {
        return None;
    }
    let zoom = (free.width() / stage.width()).min(free.height() / stage.height()) * FIT_MARGIN;
    let camera = Camera::with_zoom(zoom);
    let offset = free.center().to_vec2() - stage.center().to_vec2() * camera.zoom;
    Some(Camera { offset, ..camera })
}

/// Stage with the configured dancers, colored from the palette in turn.
pub fn seed_stage(config: &AppConfig) -> Stage {
    let mut stage = Stage::with_dancers(
        config.stage_size(),
        config.initial_dancers,
        config.editor.dancer_radius,
    );
    let ids: Vec<_> = stage.dancers().map(|d| d.id).collect();
    for (id, color) in ids.into_iter().zip(config.dancer_colors.iter().cycle()) {
        stage.set_color(id, *color);
    }
    stage
}

/// Runtime state, created once the window exists.
struct AppState {
    window: Window,
    session: EditorSession<Stage>,
    /// Middle button held: cursor motion pans the camera.
    panning: bool,
}

impl AppState {
    /// Refit the camera and toolbar region to the current window size.
    fn layout(&mut self, config: &AppConfig) {
        let size = self.window.inner_size();
        let viewport = Size::new(size.width as f64, size.height as f64);
        let toolbar = config.toolbar_height * self.window.scale_factor();
        let stage = self.session.controller().scene().bounds();

        let pointer = self.session.controller_mut().viewport_mut();
        pointer.set_camera(fit_camera(stage, viewport, toolbar));
        pointer.set_ui_regions(vec![Rect::new(0.0, 0.0, viewport.width, toolbar)]);
    }

    fn feed(&mut self, input: RawInput) {
        self.session.tick([input]);
    }

    fn cursor(&self) -> Option<Point> {
        self.session.controller().viewport().screen_position()
    }

    fn log_stage(&self) {
        let stage = self.session.controller().scene();
        for dancer in stage.dancers() {
            log::debug!(
                "#{} {} at ({:.2}, {:.2}){}",
                dancer.order_in_formation,
                dancer.name,
                dancer.position.x,
                dancer.position.y,
                if dancer.selected { " [selected]" } else { "" }
            );
        }
    }
}

/// Main application struct.
pub struct App {
    config: AppConfig,
    state: Option<AppState>,
}

impl App {
    /// Create a new application with default configuration.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    pub fn with_config(config: AppConfig) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// Run the application until the window closes.
    pub fn run(mut self) -> Result<(), AppError> {
        self.config.validate()?;
        let event_loop = EventLoop::new()?;
        event_loop.run_app(&mut self)?;
        Ok(())
    }

    fn build_session(&self) -> EditorSession<Stage> {
        let editor = &self.config.editor;
        let stage = seed_stage(&self.config);
        let mut session = EditorSession::from_config(stage, ViewportPointer::default(), editor);
        session.initialize();
        session
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        log::info!("Creating window...");
        let window_attrs = Window::default_attributes()
            .with_title(&self.config.title)
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => window,
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        let mut state = AppState {
            window,
            session: self.build_session(),
            panning: false,
        };
        state.layout(&self.config);
        log::info!(
            "Stage {}x{} with {} dancers",
            self.config.stage_width,
            self.config.stage_height,
            state.session.controller().scene().len()
        );
        self.state = Some(state);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = &mut self.state else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                state.session.shutdown();
                state.log_stage();
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if size.width == 0 || size.height == 0 {
                    // Minimised: no world position until restored
                    state.session.controller_mut().viewport_mut().set_camera(None);
                    return;
                }
                state.layout(&self.config);
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                state.layout(&self.config);
            }

            WindowEvent::CursorMoved { position, .. } => {
                let cursor = Point::new(position.x, position.y);
                if let (true, Some(previous)) = (state.panning, state.cursor()) {
                    let pointer = state.session.controller_mut().viewport_mut();
                    if let Some(camera) = pointer.camera_mut() {
                        camera.pan(cursor - previous);
                    }
                }
                state.feed(keys::cursor_input(cursor));
            }

            WindowEvent::MouseInput {
                state: btn_state,
                button,
                ..
            } => {
                if button == MouseButton::Middle {
                    state.panning = btn_state == ElementState::Pressed;
                }
                let Some(cursor) = state.cursor() else {
                    return;
                };
                if let Some(input) = keys::button_input(btn_state, button, cursor) {
                    state.feed(input);
                }
                if btn_state.is_pressed() {
                    return;
                }
                state.log_stage();
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let factor = match delta {
                    MouseScrollDelta::LineDelta(_, y) => 1.1_f64.powf(y as f64),
                    MouseScrollDelta::PixelDelta(pos) => 1.0 + pos.y * 0.002,
                };
                let Some(cursor) = state.cursor() else {
                    return;
                };
                if let Some(camera) = state.session.controller_mut().viewport_mut().camera_mut() {
                    camera.zoom_at(cursor, factor);
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let Some(input) = keys::key_input(event.state, &event.logical_key, event.repeat)
                {
                    state.feed(input);
                }
            }

            WindowEvent::Focused(false) => {
                // Key releases are not delivered while unfocused
                state.panning = false;
                state.session.shutdown();
                state.session.initialize();
            }

            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_load_partial_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "title": "Rehearsal", "initial_dancers": 8, "editor": {{ "grid": {{ "cell_size": 0.5 }} }} }}"#
        )
        .unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.title, "Rehearsal");
        assert_eq!(config.initial_dancers, 8);
        assert_eq!(config.width, 1280);
        assert_eq!(config.editor.grid.cell_size(), 0.5);
        assert!(config.editor.grid.snap_enabled());
    }

    #[test]
    fn test_load_rejects_bad_stage() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "stage_width": 0.0 }}"#).unwrap();

        let err = AppConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        assert!(matches!(AppConfig::load(file.path()), Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_fit_camera_centres_stage_below_toolbar() {
        let stage = Rect::new(0.0, 0.0, 16.0, 10.0);
        let camera = fit_camera(stage, Size::new(1000.0, 600.0), 100.0).unwrap();

        // Height-bound: 500px free for 10 units at 90%
        assert!((camera.zoom - 45.0).abs() < 1e-10);
        let centre = camera.world_to_screen(stage.center());
        assert!((centre.x - 500.0).abs() < 1e-10);
        assert!((centre.y - 350.0).abs() < 1e-10);
        assert!(camera.world_to_screen(Point::ZERO).y > 100.0);
    }

    #[test]
    fn test_seed_stage_cycles_palette() {
        let config = AppConfig {
            initial_dancers: 3,
            dancer_colors: vec![DancerColor::new(1, 2, 3, 255), DancerColor::new(4, 5, 6, 255)],
            ..AppConfig::default()
        };
        let stage = seed_stage(&config);
        let colors: Vec<DancerColor> = stage.dancers().map(|d| d.color).collect();
        assert_eq!(
            colors,
            vec![
                DancerColor::new(1, 2, 3, 255),
                DancerColor::new(4, 5, 6, 255),
                DancerColor::new(1, 2, 3, 255),
            ]
        );

        let plain = seed_stage(&AppConfig {
            dancer_colors: Vec::new(),
            ..AppConfig::default()
        });
        assert!(plain.dancers().all(|d| d.color == DancerColor::white()));
    }

    #[test]
    fn test_fit_camera_without_room() {
        let stage = Rect::new(0.0, 0.0, 16.0, 10.0);
        assert!(fit_camera(stage, Size::new(800.0, 40.0), 48.0).is_none());
        assert!(fit_camera(Rect::ZERO, Size::new(800.0, 600.0), 0.0).is_none());
    }
}
