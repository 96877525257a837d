//! Lucide icon support
//!
//! Uses the Lucide icon font when it is available; callers pass `None` to
//! fall back to macroquad's built-in font.

use macroquad::prelude::*;

/// Lucide icon codepoints
pub mod icon {
    pub const PLAY: char = '\u{e13c}';
}

/// Draw an icon centered in a rect. Without the icon font, `fallback` text
/// is drawn instead.
pub fn draw_icon_centered(font: Option<&Font>, icon: char, fallback: &str, rect: &super::Rect, size: f32, color: Color) {
    let Some(font) = font else {
        let dims = measure_text(fallback, None, size as u16, 1.0);
        draw_text(
            fallback,
            (rect.center_x() - dims.width * 0.5).round(),
            (rect.center_y() + dims.offset_y * 0.5).round(),
            size,
            color,
        );
        return;
    };

    // Icon glyphs are square, roughly `size` on each side, baseline at the bottom
    let x = rect.x + (rect.w - size) * 0.5;
    let y = rect.y + (rect.h + size) * 0.5;

    draw_text_ex(
        &icon.to_string(),
        x.round(),
        y.round(),
        TextParams {
            font: Some(font),
            font_size: size as u16,
            color,
            ..Default::default()
        },
    );
}
