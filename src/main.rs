//! Level Selector: 3D carousel for picking a level
//!
//! Four building models stand around a pivot. Dragging or the arrow keys
//! turn the pivot to bring the next model to the front, while a card strip
//! shows the selected level's title and description.
//! - PS1-style software rasterizer (320x240, affine textures, vertex snapping)
//! - Distance blur on the models that are not selected
//! - RON scene and config files, hot-reloadable scene

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod rasterizer;
mod levels;
mod scene;
mod carousel;
mod config;
mod ui;
mod overlay;
mod app;

use macroquad::prelude::*;
use app::AppState;
use config::{AppConfig, DEFAULT_CONFIG_PATH};
use scene::Scene;

fn window_conf() -> Conf {
    Conf {
        window_title: format!("Level Selector v{}", VERSION),
        window_width: rasterizer::WIDTH as i32 * 3,
        window_height: rasterizer::HEIGHT as i32 * 3,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

fn init_logging() {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

#[macroquad::main(window_conf)]
async fn main() {
    init_logging();
    log::info!("=== Level Selector v{} ===", VERSION);

    let config = match AppConfig::load_or_default(DEFAULT_CONFIG_PATH) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    let scene = match Scene::load(&config.scene_path) {
        Ok(scene) => scene,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    // Load icon font (Lucide)
    let icon_font = match load_ttf_font("assets/fonts/lucide.ttf").await {
        Ok(font) => {
            log::info!("Loaded Lucide icon font");
            Some(font)
        }
        Err(e) => {
            log::warn!("Failed to load Lucide font: {}, using text labels", e);
            None
        }
    };

    let mut app = match AppState::new(config, scene, icon_font) {
        Ok(app) => app,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    while app.frame() {
        next_frame().await;
    }
    log::info!("Bye");
}
