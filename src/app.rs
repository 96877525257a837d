//! Application state
//!
//! Owns the scene, the carousel controller and the overlay, and runs one
//! frame of input, animation and drawing at a time.

use macroquad::prelude::*;
use crate::carousel::{CarouselController, SwipeDirection};
use crate::config::{AppConfig, RenderSettings};
use crate::overlay::{draw_cards, draw_status_message, process_input, CardStrip, DragTracker, OverlayInput};
use crate::rasterizer::{self, render_mesh, Framebuffer};
use crate::scene::{NodeId, Scene, SceneError};
use crate::ui::{MouseState, UiContext};

pub struct AppState {
    pub config: AppConfig,
    pub scene: Scene,
    pub carousel: CarouselController,
    pub strip: CardStrip,
    drag: DragTracker,
    ui: UiContext,
    /// Scene render target
    fb: Framebuffer,
    /// Scratch target for one blurred level model
    layer: Framebuffer,
    icon_font: Option<Font>,
}

impl AppState {
    pub fn new(config: AppConfig, mut scene: Scene, icon_font: Option<Font>) -> Result<Self, SceneError> {
        let mut carousel = CarouselController::initialize(&mut scene, config.carousel)?;
        carousel.subscribe(|record| log::info!("Selected level \"{}\"", record.title));

        let (width, height) = resolution(&config.render);
        Ok(Self {
            strip: CardStrip::new(carousel.current_index()),
            carousel,
            scene,
            config,
            drag: DragTracker::default(),
            ui: UiContext::new(),
            fb: Framebuffer::new(width, height),
            layer: Framebuffer::new(width, height),
            icon_font,
        })
    }

    /// Run one frame. Returns false once the user asked to quit.
    pub fn frame(&mut self) -> bool {
        let mouse = MouseState::capture();
        self.ui.begin_frame(mouse);

        match process_input(&mut self.drag, &mouse, &self.config.gesture) {
            OverlayInput::Navigate(direction) => self.navigate(direction),
            OverlayInput::Reload => self.reload_scene(),
            OverlayInput::OpenScene => self.open_scene(),
            OverlayInput::Quit => return false,
            OverlayInput::None => {}
        }

        let dt = get_frame_time();
        self.scene.tick(dt);
        self.strip.update(dt);

        self.render_scene();
        self.draw_framebuffer();

        let played = draw_cards(
            &self.strip,
            self.carousel.title(),
            self.carousel.description(),
            &mut self.ui,
            self.icon_font.as_ref(),
        );
        if played {
            log::info!("Play pressed on \"{}\"", self.carousel.title());
            self.strip.set_status("Coming soon");
        }
        draw_status_message(&self.strip);
        self.ui.draw_tooltip();

        true
    }

    pub fn navigate(&mut self, direction: SwipeDirection) {
        self.carousel.advance(&mut self.scene, direction);
        self.strip.select(self.carousel.current_index());
    }

    /// Swap in a freshly loaded scene. Both the scene and the controller's
    /// handles stay as they were if anything fails.
    fn replace_scene(&mut self, mut scene: Scene) -> Result<(), SceneError> {
        self.carousel.rebind(&mut scene)?;
        self.scene = scene;
        Ok(())
    }

    fn reload_scene(&mut self) {
        let result = self.scene.reload().and_then(|scene| self.replace_scene(scene));
        match result {
            Ok(()) => self.strip.set_status("Scene reloaded"),
            Err(e) => {
                log::error!("Reload failed: {}", e);
                self.strip.set_status("Reload failed, keeping current scene");
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn open_scene(&mut self) {
        let dialog = rfd::FileDialog::new()
            .add_filter("RON Scene", &["ron"])
            .set_directory(self.config.scene_path.parent().unwrap_or(std::path::Path::new(".")));

        let Some(path) = dialog.pick_file() else {
            return;
        };
        let result = Scene::load(&path).and_then(|scene| self.replace_scene(scene));
        match result {
            Ok(()) => self.strip.set_status(format!("Loaded {}", path.display())),
            Err(e) => {
                log::error!("Failed to open {}: {}", path.display(), e);
                self.strip.set_status("Could not open scene");
            }
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn open_scene(&mut self) {
        self.strip.set_status("Opening files is not available in the browser");
    }

    /// Draw the scene into `fb`: everything that is not a level model first,
    /// then each level model far to near through the blur layer.
    fn render_scene(&mut self) {
        let settings = &self.config.render.raster;
        let camera = self.scene.view_camera(self.carousel.camera());
        let textures = self.scene.textures();
        let levels = self.carousel.nodes();

        self.fb.clear(self.scene.background);

        for id in self.scene.node_ids().filter(|id| !levels.contains(id)) {
            if let Some((vertices, faces)) = self.scene.world_mesh(id) {
                render_mesh(&mut self.fb, &vertices, faces, textures, &camera, settings);
            }
        }

        let mut order: Vec<(NodeId, f32)> = levels
            .iter()
            .map(|&node| (node, self.carousel.distance_to(&self.scene, node)))
            .collect();
        order.sort_by(|a, b| b.1.total_cmp(&a.1));

        for (node, _) in order {
            let Some((vertices, faces)) = self.scene.world_mesh(node) else {
                continue;
            };
            let radius = self.carousel.blur_radius_for(&self.scene, node, &self.config.blur);

            self.layer.clear(rasterizer::Color::TRANSPARENT);
            render_mesh(&mut self.layer, &vertices, faces, textures, &camera, settings);
            self.layer.box_blur(radius);
            self.fb.composite_over(&self.layer);
        }
    }

    /// Blit `fb` to the window, letterboxed to keep its aspect ratio
    fn draw_framebuffer(&self) {
        let screen_w = screen_width();
        let screen_h = screen_height();
        clear_background(BLACK);

        let scale = (screen_w / self.fb.width as f32).min(screen_h / self.fb.height as f32);
        let draw_w = self.fb.width as f32 * scale;
        let draw_h = self.fb.height as f32 * scale;
        let draw_x = ((screen_w - draw_w) * 0.5).floor();
        let draw_y = ((screen_h - draw_h) * 0.5).floor();

        let texture = Texture2D::from_rgba8(self.fb.width as u16, self.fb.height as u16, &self.fb.pixels);
        texture.set_filter(FilterMode::Nearest);

        draw_texture_ex(
            &texture,
            draw_x,
            draw_y,
            WHITE,
            DrawTextureParams {
                dest_size: Some(vec2(draw_w, draw_h)),
                ..Default::default()
            },
        );
    }
}

fn resolution(render: &RenderSettings) -> (usize, usize) {
    if render.low_resolution {
        (rasterizer::WIDTH, rasterizer::HEIGHT)
    } else {
        (rasterizer::WIDTH_HI, rasterizer::HEIGHT_HI)
    }
}
