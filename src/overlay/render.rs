//! Card overlay rendering
//!
//! Draws directly to the window (not the framebuffer) so text stays crisp

use macroquad::prelude::*;
use crate::levels::LevelCatalog;
use crate::ui::{icon, icon_button, Rect, UiContext};
use super::state::CardStrip;

/// Overlay colors
pub mod theme {
    use macroquad::prelude::Color;

    pub const CARD: Color = Color::new(0.05, 0.05, 0.12, 0.85);
    pub const CARD_BORDER: Color = Color::new(0.0, 0.83, 1.0, 1.0);
    pub const TITLE: Color = Color::new(1.0, 1.0, 1.0, 1.0);
    pub const DESCRIPTION: Color = Color::new(0.7, 0.7, 0.8, 1.0);
    pub const HINT: Color = Color::new(0.38, 0.38, 0.5, 1.0);
}

/// Layout constants (fractions of the window, scaled every frame)
pub mod layout {
    pub const CARD_WIDTH_PERCENT: f32 = 0.62;
    pub const CARD_HEIGHT_PERCENT: f32 = 0.26;
    /// Card centre, from the top
    pub const CARD_Y_PERCENT: f32 = 0.80;
    /// Distance between card centres, in card widths
    pub const CARD_SPACING: f32 = 1.08;
    /// Scale of cards that are not centred
    pub const SIDE_SCALE: f32 = 0.8;
    /// Extra vertical drop of side cards, in card heights
    pub const SIDE_DROP: f32 = 0.08;
    pub const TITLE_FONT_PERCENT: f32 = 0.045;
    pub const DESCRIPTION_FONT_PERCENT: f32 = 0.028;
    pub const PADDING_PERCENT: f32 = 0.06;
}

/// Draw the card strip. Returns true when the play button was clicked.
pub fn draw_cards(
    strip: &CardStrip,
    title: &str,
    description: &str,
    ctx: &mut UiContext,
    icon_font: Option<&Font>,
) -> bool {
    let screen_w = screen_width();
    let screen_h = screen_height();
    let card_w = (screen_w * layout::CARD_WIDTH_PERCENT).min(screen_h * 1.1);
    let card_h = screen_h * layout::CARD_HEIGHT_PERCENT;
    let center_y = screen_h * layout::CARD_Y_PERCENT;
    let mut play_clicked = false;

    for (idx, record) in LevelCatalog::iter().enumerate() {
        let offset = strip.offset_of(idx);
        let distance = offset.abs();
        if distance > 2.0 {
            continue;
        }

        // Centred card at full size, the rest shrink and fade with distance
        let focus = (1.0 - distance).max(0.0);
        let scale = layout::SIDE_SCALE + (1.0 - layout::SIDE_SCALE) * focus;
        let alpha = (1.0 - distance * 0.45).clamp(0.0, 1.0);
        let cx = screen_w * 0.5 + offset * card_w * layout::CARD_SPACING;
        let cy = center_y + (1.0 - focus) * card_h * layout::SIDE_DROP;
        let rect = Rect::centered(cx, cy, card_w * scale, card_h * scale);

        draw_rectangle(rect.x, rect.y, rect.w, rect.h, fade(theme::CARD, alpha));
        draw_rectangle_lines(rect.x, rect.y, rect.w, rect.h, 2.0, fade(theme::CARD_BORDER, alpha * 0.6 + focus * 0.4));

        let selected = idx == strip.selected;
        let shown_title = if selected { title } else { record.title };
        let padding = rect.w * layout::PADDING_PERCENT;
        let title_size = (screen_h * layout::TITLE_FONT_PERCENT * scale).max(12.0);
        let title_y = rect.y + padding + title_size * 0.8;
        draw_text(shown_title, rect.x + padding, title_y, title_size, fade(theme::TITLE, alpha));

        if !selected {
            continue;
        }

        let button_size = (rect.h * 0.32).round();
        let button = Rect::new(
            (rect.right() - padding - button_size).round(),
            (rect.bottom() - padding * 0.6 - button_size).round(),
            button_size,
            button_size,
        );
        let text_width = button.x - rect.x - padding * 2.0;
        let desc_size = (screen_h * layout::DESCRIPTION_FONT_PERCENT * scale).max(10.0);
        let lines = wrap_text(description, text_width, |s| measure_text(s, None, desc_size as u16, 1.0).width);
        let line_height = desc_size * 1.25;
        for (i, line) in lines.iter().enumerate() {
            let y = title_y + padding * 0.6 + line_height * (i as f32 + 1.0);
            if y > rect.bottom() - padding * 0.3 {
                break;
            }
            draw_text(line, rect.x + padding, y, desc_size, fade(theme::DESCRIPTION, alpha));
        }

        // Cards still sliding into place do not take clicks
        if distance < 0.05 {
            play_clicked = icon_button(ctx, button, icon::PLAY, ">", icon_font, "Play level");
        }
    }

    draw_hint(screen_w, screen_h);
    play_clicked
}

fn draw_hint(screen_w: f32, screen_h: f32) {
    let hint = "Drag or Left/Right to browse   R reload   O open scene   Esc quit";
    let font_size = (screen_h * 0.022).max(10.0);
    let dims = measure_text(hint, None, font_size as u16, 1.0);
    draw_text(hint, (screen_w - dims.width) * 0.5, screen_h - font_size * 0.6, font_size, theme::HINT);
}

/// Draw status message (centered, temporary notification)
pub fn draw_status_message(strip: &CardStrip) {
    let Some(message) = &strip.status_message else {
        return;
    };
    let screen_w = screen_width();
    let screen_h = screen_height();
    let font_size = (screen_h * 0.04).max(16.0) as u16;

    let text_dims = measure_text(message, None, font_size, 1.0);
    let padding = 16.0;
    let box_w = text_dims.width + padding * 2.0;
    let box_h = text_dims.height + padding * 2.0;
    let box_x = (screen_w - box_w) * 0.5;
    let box_y = screen_h * 0.12;

    // Fade out in the last half second
    let alpha = (strip.status_timer / 0.5).min(1.0);

    draw_rectangle(box_x, box_y, box_w, box_h, Color::new(0.0, 0.0, 0.0, 0.8 * alpha));
    draw_rectangle_lines(box_x, box_y, box_w, box_h, 2.0, fade(theme::CARD_BORDER, alpha));
    draw_text_ex(
        message,
        box_x + padding,
        box_y + padding + text_dims.offset_y,
        TextParams {
            font_size,
            color: Color::new(1.0, 1.0, 1.0, alpha),
            ..Default::default()
        },
    );
}

fn fade(color: Color, alpha: f32) -> Color {
    Color::new(color.r, color.g, color.b, color.a * alpha)
}

/// Greedy word wrap. `measure` returns the drawn width of a string.
/// A single word wider than `max_width` gets a line to itself.
pub fn wrap_text(text: &str, max_width: f32, measure: impl Fn(&str) -> f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        if line.is_empty() {
            line.push_str(word);
            continue;
        }
        let candidate = format!("{} {}", line, word);
        if measure(&candidate) <= max_width {
            line = candidate;
        } else {
            lines.push(std::mem::replace(&mut line, word.to_string()));
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> f32 {
        s.chars().count() as f32
    }

    #[test]
    fn test_wrap_text_breaks_on_words() {
        let lines = wrap_text("Conquer guardians, climb branches, unveil secrets", 20.0, chars);
        assert_eq!(lines, vec!["Conquer guardians,", "climb branches,", "unveil secrets"]);
        assert!(lines.iter().all(|l| chars(l) <= 20.0));
    }

    #[test]
    fn test_wrap_text_long_word_and_empty() {
        assert_eq!(wrap_text("a supercalifragilistic b", 5.0, chars), vec!["a", "supercalifragilistic", "b"]);
        assert!(wrap_text("   ", 10.0, chars).is_empty());
    }

    #[test]
    fn test_fade_scales_alpha() {
        let c = fade(Color::new(0.1, 0.2, 0.3, 0.5), 0.5);
        assert_eq!(c.a, 0.25);
        assert_eq!(c.r, 0.1);
    }
}
