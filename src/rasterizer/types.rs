//! Core types for the rasterizer

use serde::{Serialize, Deserialize};
use super::math::{Vec2, Vec3};

/// RGBA color (0-255 per channel)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };
    pub const TRANSPARENT: Color = Color { r: 0, g: 0, b: 0, a: 0 };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn with_alpha(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Apply shading (multiply by intensity 0.0-1.0)
    pub fn shade(self, intensity: f32) -> Self {
        let i = intensity.clamp(0.0, 1.0);
        Self {
            r: (self.r as f32 * i) as u8,
            g: (self.g as f32 * i) as u8,
            b: (self.b as f32 * i) as u8,
            a: self.a,
        }
    }

    /// Multiply two colors channel-wise (texture sample tinted by face color)
    pub fn modulate(self, other: Color) -> Self {
        let m = |a: u8, b: u8| ((a as u16 * b as u16) / 255) as u8;
        Self {
            r: m(self.r, other.r),
            g: m(self.g, other.g),
            b: m(self.b, other.b),
            a: m(self.a, other.a),
        }
    }

    pub fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// A vertex with position, texture coordinate, and normal
#[derive(Debug, Clone, Copy, Default)]
pub struct Vertex {
    pub pos: Vec3,
    pub uv: Vec2,
    pub normal: Vec3,
}

impl Vertex {
    pub fn new(pos: Vec3, uv: Vec2, normal: Vec3) -> Self {
        Self { pos, uv, normal }
    }
}

/// A triangle face (indices into vertex array)
#[derive(Debug, Clone, Copy)]
pub struct Face {
    pub v0: usize,
    pub v1: usize,
    pub v2: usize,
    pub texture_id: Option<usize>,
    /// Base color, multiplied with the texture sample when there is one
    pub color: Color,
}

impl Face {
    pub fn new(v0: usize, v1: usize, v2: usize) -> Self {
        Self {
            v0,
            v1,
            v2,
            texture_id: None,
            color: Color::WHITE,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_texture(mut self, texture_id: Option<usize>) -> Self {
        self.texture_id = texture_id;
        self
    }
}

/// Simple texture (array of colors)
#[derive(Debug, Clone)]
pub struct Texture {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<Color>,
    pub name: String,
}

impl Texture {
    /// Load texture from a PNG file
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        Self::from_bytes(&bytes, name)
            .map_err(|e| format!("{}: {}", path.display(), e))
    }

    /// Load texture from raw image bytes
    pub fn from_bytes(bytes: &[u8], name: String) -> Result<Self, String> {
        use image::GenericImageView;

        let img = image::load_from_memory(bytes)
            .map_err(|e| format!("Failed to decode image: {}", e))?;

        let (width, height) = img.dimensions();
        let rgba = img.to_rgba8();

        let pixels: Vec<Color> = rgba
            .pixels()
            .map(|p| Color::with_alpha(p[0], p[1], p[2], p[3]))
            .collect();

        Ok(Self {
            width: width as usize,
            height: height as usize,
            pixels,
            name,
        })
    }

    /// Sample texture at UV coordinates (no filtering - PS1 style)
    pub fn sample(&self, u: f32, v: f32) -> Color {
        if self.width == 0 || self.height == 0 {
            return Color::WHITE;
        }
        let tx = ((u.rem_euclid(1.0) * self.width as f32) as usize).min(self.width - 1);
        let ty = ((v.rem_euclid(1.0) * self.height as f32) as usize).min(self.height - 1);
        self.pixels[ty * self.width + tx]
    }
}

/// Shading mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShadingMode {
    None,     // No shading, raw texture/face colors
    Flat,     // One light calculation per face
    Gouraud,  // Interpolate vertex shading (PS1 style)
}

/// Rasterizer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RasterSettings {
    /// Use affine texture mapping (true = PS1 warping, false = perspective correct)
    pub affine_textures: bool,
    /// Snap vertices to integer coordinates (PS1 jitter)
    pub vertex_snap: bool,
    /// Use Z-buffer (false = painter's algorithm)
    pub use_zbuffer: bool,
    pub shading: ShadingMode,
    pub backface_cull: bool,
    /// Light direction in camera space
    pub light_dir: Vec3,
    /// Ambient light intensity (0.0-1.0)
    pub ambient: f32,
}

impl Default for RasterSettings {
    fn default() -> Self {
        Self {
            affine_textures: true,
            vertex_snap: true,
            use_zbuffer: true,
            shading: ShadingMode::Gouraud,
            backface_cull: false,
            light_dir: Vec3::new(-1.0, -1.0, 1.0).normalize(),
            ambient: 0.35,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shade_clamps() {
        let c = Color::new(200, 100, 50);
        assert_eq!(c.shade(2.0), c);
        assert_eq!(c.shade(0.0), Color::new(0, 0, 0));
        assert_eq!(c.shade(0.5), Color::new(100, 50, 25));
    }

    #[test]
    fn test_modulate_with_white_is_identity() {
        let c = Color::with_alpha(10, 20, 30, 40);
        assert_eq!(c.modulate(Color::WHITE), c);
    }

    #[test]
    fn test_texture_from_png_bytes() {
        let mut img = image::RgbaImage::new(2, 2);
        img.put_pixel(1, 0, image::Rgba([255, 0, 0, 255]));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();

        let tex = Texture::from_bytes(&bytes, "checker".to_string()).unwrap();
        assert_eq!((tex.width, tex.height), (2, 2));
        assert_eq!(tex.sample(0.75, 0.25), Color::new(255, 0, 0));
        assert_eq!(tex.sample(0.25, 0.25), Color::with_alpha(0, 0, 0, 0));
        // UVs wrap
        assert_eq!(tex.sample(1.75, -0.75), Color::new(255, 0, 0));
    }

    #[test]
    fn test_texture_from_garbage_fails() {
        assert!(Texture::from_bytes(&[1, 2, 3], "bad".to_string()).is_err());
    }
}
