//! Overlay input handling
//!
//! Turns keyboard presses and mouse drags into carousel commands

use macroquad::prelude::*;
use crate::carousel::SwipeDirection;
use crate::config::GestureSettings;
use crate::ui::MouseState;

/// Result of processing input for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OverlayInput {
    None,
    Navigate(SwipeDirection),
    /// Re-read the scene file from disk
    Reload,
    /// Pick another scene file
    OpenScene,
    Quit,
}

/// Classify a finished drag by its horizontal translation. Dragging left
/// brings the next level in, dragging right the previous one.
pub fn swipe_direction(translation: f32, min_translation: f32) -> Option<SwipeDirection> {
    if translation < -min_translation {
        Some(SwipeDirection::Next)
    } else if translation > min_translation {
        Some(SwipeDirection::Previous)
    } else {
        None
    }
}

/// Tracks a left-button drag from press to release
#[derive(Debug, Clone, Copy, Default)]
pub struct DragTracker {
    start_x: Option<f32>,
}

impl DragTracker {
    /// Feed this frame's mouse; returns the swipe completed on release, if any
    pub fn update(&mut self, mouse: &MouseState, gesture: &GestureSettings) -> Option<SwipeDirection> {
        if mouse.left_pressed {
            self.start_x = Some(mouse.x);
        }
        if mouse.left_released {
            let start = self.start_x.take()?;
            return swipe_direction(mouse.x - start, gesture.min_translation);
        }
        None
    }
}

/// Process this frame's input
pub fn process_input(drag: &mut DragTracker, mouse: &MouseState, gesture: &GestureSettings) -> OverlayInput {
    if is_key_pressed(KeyCode::Escape) {
        return OverlayInput::Quit;
    }
    if let Some(direction) = drag.update(mouse, gesture) {
        return OverlayInput::Navigate(direction);
    }
    if is_key_pressed(KeyCode::Left) {
        return OverlayInput::Navigate(SwipeDirection::Previous);
    }
    if is_key_pressed(KeyCode::Right) {
        return OverlayInput::Navigate(SwipeDirection::Next);
    }
    if is_key_pressed(KeyCode::R) {
        return OverlayInput::Reload;
    }
    if is_key_pressed(KeyCode::O) {
        return OverlayInput::OpenScene;
    }
    OverlayInput::None
}
