//! Level card overlay
//!
//! A horizontal strip of cards, one per level, that scrolls to the selected
//! level and carries the play button.

pub mod state;
pub mod render;
pub mod input;

pub use state::CardStrip;
pub use render::{draw_cards, draw_status_message};
pub use input::{process_input, DragTracker, OverlayInput};
