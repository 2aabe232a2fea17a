//! Main application entry point (native).

use choreo_app::{App, AppConfig};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    log::info!("Starting Choreo");

    let config = match std::env::args().nth(1) {
        Some(path) => AppConfig::load(&path).inspect_err(|e| {
            log::error!("Failed to load config {}: {}", path, e);
        })?,
        None => AppConfig::default(),
    };

    App::with_config(config).run().inspect_err(|e| log::error!("{}", e))?;
    Ok(())
}
