//! PS1-style software rasterizer
//!
//! Features:
//! - Affine texture mapping (no perspective correction = PS1 warping)
//! - Vertex snapping (integer coords = PS1 jitter)
//! - Flat and Gouraud shading
//! - Z-buffer or painter's algorithm
//! - Layer blur and compositing for the out-of-focus carousel models

mod math;
mod types;
mod render;

pub use math::*;
pub use types::*;
pub use render::*;

/// Screen dimensions (authentic PS1 resolution)
pub const WIDTH: usize = 320;
pub const HEIGHT: usize = 240;

/// High resolution dimensions (2x PS1)
pub const WIDTH_HI: usize = 640;
pub const HEIGHT_HI: usize = 480;
