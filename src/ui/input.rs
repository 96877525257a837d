//! Input state for UI interaction

use super::Rect;
use macroquad::prelude::*;

/// Mouse button state
#[derive(Debug, Clone, Copy, Default)]
pub struct MouseState {
    pub x: f32,
    pub y: f32,
    pub left_down: bool,
    pub left_pressed: bool,  // Just pressed this frame
    pub left_released: bool, // Just released this frame
}

impl MouseState {
    /// Sample macroquad's mouse for this frame
    pub fn capture() -> Self {
        let (x, y) = mouse_position();
        Self {
            x,
            y,
            left_down: is_mouse_button_down(MouseButton::Left),
            left_pressed: is_mouse_button_pressed(MouseButton::Left),
            left_released: is_mouse_button_released(MouseButton::Left),
        }
    }

    pub fn inside(&self, rect: &Rect) -> bool {
        rect.contains(self.x, self.y)
    }

    pub fn clicking(&self, rect: &Rect) -> bool {
        self.left_down && rect.contains(self.x, self.y)
    }

    /// Released over the rect this frame
    pub fn clicked(&self, rect: &Rect) -> bool {
        self.left_released && rect.contains(self.x, self.y)
    }
}

struct PendingTooltip {
    text: String,
    x: f32,
    y: f32,
}

/// UI context passed through the frame
#[derive(Default)]
pub struct UiContext {
    pub mouse: MouseState,
    tooltip: Option<PendingTooltip>,
}

impl UiContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset at start of frame (call before UI code)
    pub fn begin_frame(&mut self, mouse: MouseState) {
        self.mouse = mouse;
        self.tooltip = None;
    }

    /// Set tooltip to show (call from widget when hovered)
    pub fn set_tooltip(&mut self, text: &str, x: f32, y: f32) {
        self.tooltip = Some(PendingTooltip {
            text: text.to_string(),
            x,
            y,
        });
    }

    #[cfg(test)]
    pub fn tooltip_text(&self) -> Option<&str> {
        self.tooltip.as_ref().map(|t| t.text.as_str())
    }

    /// Draw the tooltip if one is pending (call at end of frame)
    pub fn draw_tooltip(&self) {
        if let Some(tip) = &self.tooltip {
            let padding = 6.0;
            let font_size = 13.0;
            let dims = measure_text(&tip.text, None, font_size as u16, 1.0);

            let box_w = dims.width + padding * 2.0;
            let box_h = dims.height + padding * 2.0;

            // Below and right of the cursor, flipped to stay on screen
            let mut x = tip.x + 12.0;
            let mut y = tip.y + 20.0;
            if x + box_w > screen_width() {
                x = screen_width() - box_w - 4.0;
            }
            if y + box_h > screen_height() {
                y = tip.y - box_h - 4.0;
            }

            draw_rectangle(x, y, box_w, box_h, Color::from_rgba(30, 30, 35, 240));
            draw_rectangle_lines(x, y, box_w, box_h, 1.0, Color::from_rgba(80, 80, 90, 255));
            draw_text(
                &tip.text,
                x + padding,
                y + padding + dims.height - 2.0,
                font_size,
                Color::from_rgba(220, 220, 220, 255),
            );
        }
    }
}
