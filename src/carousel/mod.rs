//! Level carousel: selection state, pivot rotation and distance blur

mod controller;
pub mod geometry;

pub use controller::{CarouselController, CarouselSettings, SwipeDirection};
pub use geometry::BlurSettings;
