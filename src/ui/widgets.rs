//! Basic UI widgets

use macroquad::prelude::*;
use super::{Rect, UiContext, draw_icon_centered};

/// Accent color (cyan)
const ACCENT_COLOR: Color = Color::new(0.0, 0.75, 0.9, 1.0);

/// Draw an icon button, returns true if clicked. `label` is drawn when the
/// icon font is missing.
pub fn icon_button(
    ctx: &mut UiContext,
    rect: Rect,
    icon: char,
    label: &str,
    icon_font: Option<&Font>,
    tooltip: &str,
) -> bool {
    let hovered = ctx.mouse.inside(&rect);
    let pressed = ctx.mouse.clicking(&rect);
    let clicked = ctx.mouse.clicked(&rect);

    if hovered && !tooltip.is_empty() {
        ctx.set_tooltip(tooltip, ctx.mouse.x, ctx.mouse.y);
    }

    let corner_radius = (rect.h * 0.25).min(8.0);
    let background = if pressed {
        Color::new(0.0, 0.55, 0.7, 1.0)
    } else if hovered {
        Color::new(0.1, 0.85, 1.0, 1.0)
    } else {
        ACCENT_COLOR
    };
    draw_rounded_rect(rect.x, rect.y, rect.w, rect.h, corner_radius, background);

    let icon_size = (rect.h * 0.55).round();
    draw_icon_centered(icon_font, icon, label, &rect, icon_size, WHITE);

    clicked
}

/// Draw a rounded rectangle (simple approximation using overlapping rects)
fn draw_rounded_rect(x: f32, y: f32, w: f32, h: f32, r: f32, color: Color) {
    let r = r.min(w * 0.5).min(h * 0.5);
    draw_rectangle(x + r, y, w - r * 2.0, h, color);
    draw_rectangle(x, y + r, w, h - r * 2.0, color);
    draw_circle(x + r, y + r, r, color);
    draw_circle(x + w - r, y + r, r, color);
    draw_circle(x + r, y + h - r, r, color);
    draw_circle(x + w - r, y + h - r, r, color);
}
