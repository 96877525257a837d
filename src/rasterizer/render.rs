//! Core rendering functions
//! Triangle rasterization with PS1-style effects, plus the layer
//! operations (blur, compositing) used for distance blur.

use super::math::{barycentric, perspective_transform, project, Vec2, Vec3};
use super::types::{Color, Face, RasterSettings, ShadingMode, Texture, Vertex};

/// Framebuffer for software rendering
pub struct Framebuffer {
    pub pixels: Vec<u8>,    // RGBA, 4 bytes per pixel
    pub zbuffer: Vec<f32>,  // Depth buffer
    pub width: usize,
    pub height: usize,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![0; width * height * 4],
            zbuffer: vec![f32::MAX; width * height],
            width,
            height,
        }
    }

    pub fn clear(&mut self, color: Color) {
        let bytes = color.to_bytes();
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&bytes);
        }
        self.zbuffer.fill(f32::MAX);
    }

    #[cfg(test)]
    pub fn get_pixel(&self, x: usize, y: usize) -> Color {
        if x < self.width && y < self.height {
            let idx = (y * self.width + x) * 4;
            let p = &self.pixels[idx..idx + 4];
            Color::with_alpha(p[0], p[1], p[2], p[3])
        } else {
            Color::TRANSPARENT
        }
    }

    pub fn set_pixel_with_depth(&mut self, x: usize, y: usize, z: f32, color: Color) -> bool {
        if x < self.width && y < self.height {
            let idx = y * self.width + x;
            if z < self.zbuffer[idx] {
                self.zbuffer[idx] = z;
                let pixel_idx = idx * 4;
                self.pixels[pixel_idx..pixel_idx + 4].copy_from_slice(&color.to_bytes());
                return true;
            }
        }
        false
    }

    /// Separable box blur over all four channels.
    ///
    /// Layers are cleared to transparent black, so averaging raw RGBA keeps
    /// the result premultiplied; `composite_over` expects exactly that.
    pub fn box_blur(&mut self, radius: usize) {
        if radius == 0 || self.width == 0 || self.height == 0 {
            return;
        }
        // Wider than the image averages everything anyway
        let radius = radius.min(self.width.max(self.height));

        let (w, h) = (self.width, self.height);
        let mut scratch = vec![0u8; self.pixels.len()];

        // Horizontal pass: pixels -> scratch
        for y in 0..h {
            blur_line(&self.pixels, &mut scratch, w, radius, |i| (y * w + i) * 4);
        }
        // Vertical pass: scratch -> pixels
        for x in 0..w {
            blur_line(&scratch, &mut self.pixels, h, radius, |i| (i * w + x) * 4);
        }
    }

    /// Draw `layer` over this framebuffer (premultiplied alpha "over")
    pub fn composite_over(&mut self, layer: &Framebuffer) {
        debug_assert_eq!((self.width, self.height), (layer.width, layer.height));

        for (dst, src) in self.pixels.chunks_exact_mut(4).zip(layer.pixels.chunks_exact(4)) {
            let inv_alpha = 255 - src[3] as u16;
            for c in 0..4 {
                let v = src[c] as u16 + (dst[c] as u16 * inv_alpha) / 255;
                dst[c] = v.min(255) as u8;
            }
        }
    }
}

/// Box-filter one row or column. `offset(i)` maps the i-th sample of the
/// line to its byte offset in both buffers.
fn blur_line(src: &[u8], dst: &mut [u8], len: usize, radius: usize, offset: impl Fn(usize) -> usize) {
    let mut sum = [0u32; 4];
    let mut count = 0u32;

    // Prime the window with [0, radius)
    for i in 0..radius.min(len) {
        let o = offset(i);
        for c in 0..4 {
            sum[c] += src[o + c] as u32;
        }
        count += 1;
    }

    for i in 0..len {
        // Grow on the right
        let add = i + radius;
        if add < len {
            let o = offset(add);
            for c in 0..4 {
                sum[c] += src[o + c] as u32;
            }
            count += 1;
        }
        // Shrink on the left
        if i > radius {
            let o = offset(i - radius - 1);
            for c in 0..4 {
                sum[c] -= src[o + c] as u32;
            }
            count -= 1;
        }

        let o = offset(i);
        for c in 0..4 {
            dst[o + c] = (sum[c] / count.max(1)) as u8;
        }
    }
}

/// Camera state
pub struct Camera {
    pub position: Vec3,
    pub rotation_x: f32, // Pitch
    pub rotation_y: f32, // Yaw

    // Computed basis vectors
    pub basis_x: Vec3,
    pub basis_y: Vec3,
    pub basis_z: Vec3,
}

impl Camera {
    pub fn new() -> Self {
        let mut cam = Self {
            position: Vec3::ZERO,
            rotation_x: 0.0,
            rotation_y: 0.0,
            basis_x: Vec3::new(1.0, 0.0, 0.0),
            basis_y: Vec3::new(0.0, 1.0, 0.0),
            basis_z: Vec3::new(0.0, 0.0, 1.0),
        };
        cam.update_basis();
        cam
    }

    pub fn update_basis(&mut self) {
        let upward = Vec3::new(0.0, -1.0, 0.0);  // -Y is up in screen coordinates

        // Forward
        self.basis_z = Vec3 {
            x: self.rotation_x.cos() * self.rotation_y.sin(),
            y: -self.rotation_x.sin(),
            z: self.rotation_x.cos() * self.rotation_y.cos(),
        };

        // Right
        self.basis_x = upward.cross(self.basis_z).normalize();

        // Up
        self.basis_y = self.basis_z.cross(self.basis_x);
    }

    /// Orient the camera so its forward axis points at `target`
    pub fn look_at(&mut self, target: Vec3) {
        let dir = (target - self.position).normalize();
        if dir == Vec3::ZERO {
            return;
        }
        self.rotation_y = dir.x.atan2(dir.z);
        self.rotation_x = (-dir.y).clamp(-1.0, 1.0).asin().clamp(
            -std::f32::consts::FRAC_PI_2 + 0.01,
            std::f32::consts::FRAC_PI_2 - 0.01,
        );
        self.update_basis();
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

/// Projected surface (triangle ready for rasterization)
struct Surface {
    v1: Vec3, // Screen-space vertices
    v2: Vec3,
    v3: Vec3,
    vn1: Vec3, // Vertex normals (camera space)
    vn2: Vec3,
    vn3: Vec3,
    uv1: Vec2,
    uv2: Vec2,
    uv3: Vec2,
    normal: Vec3, // Face normal (camera space)
    face_idx: usize,
}

fn shade_intensity(normal: Vec3, light_dir: Vec3, ambient: f32) -> f32 {
    let diffuse = normal.dot(light_dir).max(0.0);
    (ambient + (1.0 - ambient) * diffuse).clamp(0.0, 1.0)
}

fn rasterize_triangle(
    fb: &mut Framebuffer,
    surface: &Surface,
    base_color: Color,
    texture: Option<&Texture>,
    settings: &RasterSettings,
) {
    // Bounding box
    let min_x = surface.v1.x.min(surface.v2.x).min(surface.v3.x).max(0.0) as usize;
    let max_x = (surface.v1.x.max(surface.v2.x).max(surface.v3.x) + 1.0).min(fb.width as f32) as usize;
    let min_y = surface.v1.y.min(surface.v2.y).min(surface.v3.y).max(0.0) as usize;
    let max_y = (surface.v1.y.max(surface.v2.y).max(surface.v3.y) + 1.0).min(fb.height as f32) as usize;

    let flat_shade = if settings.shading == ShadingMode::Flat {
        shade_intensity(surface.normal, settings.light_dir, settings.ambient)
    } else {
        1.0
    };

    for y in min_y..max_y {
        for x in min_x..max_x {
            let p = Vec3::new(x as f32, y as f32, 0.0);
            let bc = barycentric(p, surface.v1, surface.v2, surface.v3);

            const ERR: f32 = -0.0001;
            if bc.x < ERR || bc.y < ERR || bc.z < ERR {
                continue;
            }

            let z = bc.x * surface.v1.z + bc.y * surface.v2.z + bc.z * surface.v3.z;

            if settings.use_zbuffer && z >= fb.zbuffer[y * fb.width + x] {
                continue;
            }

            let (u, v) = if settings.affine_textures {
                // Affine (PS1 style)
                let u = bc.x * surface.uv1.x + bc.y * surface.uv2.x + bc.z * surface.uv3.x;
                let v = bc.x * surface.uv1.y + bc.y * surface.uv2.y + bc.z * surface.uv3.y;
                (u, v)
            } else {
                let mut bcc = Vec3::new(bc.x / surface.v1.z, bc.y / surface.v2.z, bc.z / surface.v3.z);
                let bd = bcc.x + bcc.y + bcc.z;
                bcc = bcc.scale(1.0 / bd);

                let u = bcc.x * surface.uv1.x + bcc.y * surface.uv2.x + bcc.z * surface.uv3.x;
                let v = bcc.x * surface.uv1.y + bcc.y * surface.uv2.y + bcc.z * surface.uv3.y;
                (u, v)
            };

            let color = match texture {
                Some(tex) => tex.sample(u, 1.0 - v).modulate(base_color),
                None => base_color,
            };

            let shade = match settings.shading {
                ShadingMode::None => 1.0,
                ShadingMode::Flat => flat_shade,
                ShadingMode::Gouraud => {
                    let s1 = shade_intensity(surface.vn1, settings.light_dir, settings.ambient);
                    let s2 = shade_intensity(surface.vn2, settings.light_dir, settings.ambient);
                    let s3 = shade_intensity(surface.vn3, settings.light_dir, settings.ambient);
                    bc.x * s1 + bc.y * s2 + bc.z * s3
                }
            };

            fb.set_pixel_with_depth(x, y, z, color.shade(shade));
        }
    }
}

/// Render a world-space mesh to the framebuffer
pub fn render_mesh(
    fb: &mut Framebuffer,
    vertices: &[Vertex],
    faces: &[Face],
    textures: &[Texture],
    camera: &Camera,
    settings: &RasterSettings,
) {
    let mut projected: Vec<Vec3> = Vec::with_capacity(vertices.len());
    let mut cam_space_positions: Vec<Vec3> = Vec::with_capacity(vertices.len());
    let mut cam_space_normals: Vec<Vec3> = Vec::with_capacity(vertices.len());

    for v in vertices {
        let rel_pos = v.pos - camera.position;
        let cam_pos = perspective_transform(rel_pos, camera.basis_x, camera.basis_y, camera.basis_z);
        cam_space_positions.push(cam_pos);
        projected.push(project(cam_pos, settings.vertex_snap, fb.width, fb.height));

        let cam_normal = perspective_transform(v.normal, camera.basis_x, camera.basis_y, camera.basis_z);
        cam_space_normals.push(cam_normal.normalize());
    }

    let mut surfaces: Vec<Surface> = Vec::with_capacity(faces.len());

    for (face_idx, face) in faces.iter().enumerate() {
        let cv1 = cam_space_positions[face.v0];
        let cv2 = cam_space_positions[face.v1];
        let cv3 = cam_space_positions[face.v2];

        // Near plane: +Z is forward
        if cv1.z <= 0.1 || cv2.z <= 0.1 || cv3.z <= 0.1 {
            continue;
        }

        let normal = (cv2 - cv1).cross(cv3 - cv1).normalize();

        if settings.backface_cull && normal.z > 0.0 {
            continue;
        }

        surfaces.push(Surface {
            v1: projected[face.v0],
            v2: projected[face.v1],
            v3: projected[face.v2],
            vn1: cam_space_normals[face.v0],
            vn2: cam_space_normals[face.v1],
            vn3: cam_space_normals[face.v2],
            uv1: vertices[face.v0].uv,
            uv2: vertices[face.v1].uv,
            uv3: vertices[face.v2].uv,
            normal,
            face_idx,
        });
    }

    // Painter's algorithm when there is no Z-buffer
    if !settings.use_zbuffer {
        surfaces.sort_by(|a, b| {
            let a_max_z = a.v1.z.max(a.v2.z).max(a.v3.z);
            let b_max_z = b.v1.z.max(b.v2.z).max(b.v3.z);
            b_max_z.total_cmp(&a_max_z)
        });
    }

    for surface in &surfaces {
        let face = &faces[surface.face_idx];
        let texture = face.texture_id.and_then(|id| textures.get(id));
        rasterize_triangle(fb, surface, face.color, texture, settings);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(w: usize, h: usize, color: Color) -> Framebuffer {
        let mut fb = Framebuffer::new(w, h);
        fb.clear(color);
        fb
    }

    #[test]
    fn test_box_blur_keeps_uniform_image() {
        let mut fb = solid(8, 6, Color::new(100, 150, 200));
        fb.box_blur(2);
        for y in 0..6 {
            for x in 0..8 {
                assert_eq!(fb.get_pixel(x, y), Color::new(100, 150, 200));
            }
        }
    }

    #[test]
    fn test_box_blur_spreads_single_pixel() {
        let mut fb = solid(5, 5, Color::TRANSPARENT);
        fb.set_pixel_with_depth(2, 2, 0.0, Color::WHITE);
        fb.box_blur(1);

        let center = fb.get_pixel(2, 2);
        let neighbour = fb.get_pixel(1, 1);
        assert!(center.a > 0 && center.a < 255);
        assert_eq!(center, neighbour);
        assert_eq!(fb.get_pixel(0, 0), Color::TRANSPARENT);
    }

    #[test]
    fn test_box_blur_huge_radius_averages_whole_image() {
        let mut fb = solid(4, 3, Color::new(10, 20, 30));
        fb.box_blur(usize::MAX);
        assert_eq!(fb.get_pixel(0, 0), Color::new(10, 20, 30));
        assert_eq!(fb.get_pixel(3, 2), Color::new(10, 20, 30));

        let mut dot = solid(4, 4, Color::TRANSPARENT);
        dot.set_pixel_with_depth(0, 0, 0.0, Color::WHITE);
        dot.box_blur(usize::MAX / 2);
        assert_eq!(dot.get_pixel(0, 0), dot.get_pixel(3, 3));
    }

    #[test]
    fn test_composite_over() {
        let mut base = solid(2, 1, Color::new(0, 0, 200));
        let mut layer = solid(2, 1, Color::TRANSPARENT);
        layer.set_pixel_with_depth(0, 0, 0.0, Color::new(255, 0, 0));
        base.composite_over(&layer);

        assert_eq!(base.get_pixel(0, 0), Color::new(255, 0, 0));
        assert_eq!(base.get_pixel(1, 0), Color::new(0, 0, 200));
    }

    #[test]
    fn test_look_at_points_forward_axis() {
        let mut cam = Camera::new();
        cam.position = Vec3::new(0.0, 2.0, -10.0);
        let target = Vec3::new(3.0, 0.0, 0.0);
        cam.look_at(target);

        let expected = (target - cam.position).normalize();
        assert!((cam.basis_z - expected).len() < 0.001);
    }

    #[test]
    fn test_render_mesh_draws_facing_triangle() {
        let mut fb = Framebuffer::new(32, 32);
        fb.clear(Color::TRANSPARENT);

        let mut cam = Camera::new();
        cam.position = Vec3::new(0.0, 0.0, -5.0);
        cam.look_at(Vec3::ZERO);

        let n = Vec3::new(0.0, 0.0, -1.0);
        let vertices = [
            Vertex::new(Vec3::new(-1.0, -1.0, 0.0), Vec2::default(), n),
            Vertex::new(Vec3::new(1.0, -1.0, 0.0), Vec2::default(), n),
            Vertex::new(Vec3::new(0.0, 1.0, 0.0), Vec2::default(), n),
        ];
        let faces = [Face::new(0, 1, 2).with_color(Color::new(0, 255, 0))];
        let settings = RasterSettings {
            shading: ShadingMode::None,
            ..Default::default()
        };

        render_mesh(&mut fb, &vertices, &faces, &[], &cam, &settings);
        assert_eq!(fb.get_pixel(16, 16), Color::new(0, 255, 0));
    }
}
