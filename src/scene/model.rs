//! Procedural building models
//!
//! Models are described in the scene file as a list of primitive parts and
//! turned into flat-shaded meshes once, at load time.

use serde::{Serialize, Deserialize};
use crate::rasterizer::{Color, Face, Vec2, Vec3, Vertex};

/// Primitive shapes. Every shape sits on y = 0 and is centred on x/z.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Cuboid { size: Vec3 },
    /// Square-based roof with a single apex
    Pyramid { size: Vec3 },
    /// Triangular prism roof, ridge along X
    Gable { size: Vec3 },
    Cylinder { radius: f32, height: f32, segments: usize },
}

/// One primitive placed inside a model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartDesc {
    pub shape: Shape,
    #[serde(default)]
    pub offset: Vec3,
    pub color: (u8, u8, u8),
}

/// Model attached to a scene node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDesc {
    pub parts: Vec<PartDesc>,
    /// PNG path relative to the scene file, tinted by each part's color
    #[serde(default)]
    pub texture: Option<String>,
}

/// Triangle mesh in model space
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub faces: Vec<Face>,
}

impl ModelDesc {
    pub fn build_mesh(&self, texture_id: Option<usize>) -> Mesh {
        let mut builder = MeshBuilder { mesh: Mesh::default(), texture_id };
        for part in &self.parts {
            let (r, g, b) = part.color;
            builder.add_shape(&part.shape, part.offset, Color::new(r, g, b));
        }
        builder.mesh
    }
}

struct MeshBuilder {
    mesh: Mesh,
    texture_id: Option<usize>,
}

impl MeshBuilder {
    fn add_shape(&mut self, shape: &Shape, offset: Vec3, color: Color) {
        match *shape {
            Shape::Cuboid { size } => self.cuboid(size, offset, color),
            Shape::Pyramid { size } => self.pyramid(size, offset, color),
            Shape::Gable { size } => self.gable(size, offset, color),
            Shape::Cylinder { radius, height, segments } => {
                self.cylinder(radius, height, segments.max(3), offset, color)
            }
        }
    }

    fn cuboid(&mut self, size: Vec3, offset: Vec3, color: Color) {
        let (hx, hz) = (size.x * 0.5, size.z * 0.5);
        let corner = |x: f32, y: f32, z: f32| offset + Vec3::new(x * hx, y * size.y, z * hz);
        let b = [corner(-1.0, 0.0, -1.0), corner(1.0, 0.0, -1.0), corner(1.0, 0.0, 1.0), corner(-1.0, 0.0, 1.0)];
        let t = [corner(-1.0, 1.0, -1.0), corner(1.0, 1.0, -1.0), corner(1.0, 1.0, 1.0), corner(-1.0, 1.0, 1.0)];
        let center = offset + Vec3::new(0.0, size.y * 0.5, 0.0);

        self.polygon(&[b[0], b[1], b[2], b[3]], center, color);
        self.polygon(&[t[0], t[1], t[2], t[3]], center, color);
        for i in 0..4 {
            let j = (i + 1) % 4;
            self.polygon(&[b[i], b[j], t[j], t[i]], center, color);
        }
    }

    fn pyramid(&mut self, size: Vec3, offset: Vec3, color: Color) {
        let (hx, hz) = (size.x * 0.5, size.z * 0.5);
        let b = [
            offset + Vec3::new(-hx, 0.0, -hz),
            offset + Vec3::new(hx, 0.0, -hz),
            offset + Vec3::new(hx, 0.0, hz),
            offset + Vec3::new(-hx, 0.0, hz),
        ];
        let apex = offset + Vec3::new(0.0, size.y, 0.0);
        let center = offset + Vec3::new(0.0, size.y * 0.25, 0.0);

        self.polygon(&b, center, color);
        for i in 0..4 {
            self.polygon(&[b[i], b[(i + 1) % 4], apex], center, color);
        }
    }

    fn gable(&mut self, size: Vec3, offset: Vec3, color: Color) {
        let (hx, hz) = (size.x * 0.5, size.z * 0.5);
        let b = [
            offset + Vec3::new(-hx, 0.0, -hz),
            offset + Vec3::new(hx, 0.0, -hz),
            offset + Vec3::new(hx, 0.0, hz),
            offset + Vec3::new(-hx, 0.0, hz),
        ];
        let ridge_l = offset + Vec3::new(-hx, size.y, 0.0);
        let ridge_r = offset + Vec3::new(hx, size.y, 0.0);
        let center = offset + Vec3::new(0.0, size.y / 3.0, 0.0);

        self.polygon(&b, center, color);
        self.polygon(&[b[0], b[1], ridge_r, ridge_l], center, color);
        self.polygon(&[b[3], b[2], ridge_r, ridge_l], center, color);
        self.polygon(&[b[0], b[3], ridge_l], center, color);
        self.polygon(&[b[1], b[2], ridge_r], center, color);
    }

    fn cylinder(&mut self, radius: f32, height: f32, segments: usize, offset: Vec3, color: Color) {
        let ring = |y: f32| -> Vec<Vec3> {
            (0..segments)
                .map(|i| {
                    let a = i as f32 / segments as f32 * std::f32::consts::TAU;
                    offset + Vec3::new(a.cos() * radius, y, a.sin() * radius)
                })
                .collect()
        };
        let bottom = ring(0.0);
        let top = ring(height);
        let center = offset + Vec3::new(0.0, height * 0.5, 0.0);

        self.polygon(&bottom, center, color);
        self.polygon(&top, center, color);
        for i in 0..segments {
            let j = (i + 1) % segments;
            self.polygon(&[bottom[i], bottom[j], top[j], top[i]], center, color);
        }
    }

    /// Emit a convex planar polygon as a triangle fan, wound so its normal
    /// points away from `center`.
    fn polygon(&mut self, points: &[Vec3], center: Vec3, color: Color) {
        if points.len() < 3 {
            return;
        }

        let mut normal = (points[1] - points[0]).cross(points[2] - points[0]).normalize();
        let poly_center = points.iter().fold(Vec3::ZERO, |acc, p| acc + *p) * (1.0 / points.len() as f32);
        let outward = normal.dot(poly_center - center) >= 0.0;
        if !outward {
            normal = -normal;
        }

        let base = self.mesh.vertices.len();
        for (i, p) in points.iter().enumerate() {
            self.mesh.vertices.push(Vertex::new(*p, polygon_uv(points.len(), i), normal));
        }

        for i in 1..points.len() - 1 {
            let (a, b) = if outward { (base + i, base + i + 1) } else { (base + i + 1, base + i) };
            self.mesh.faces.push(
                Face::new(base, a, b)
                    .with_color(color)
                    .with_texture(self.texture_id),
            );
        }
    }
}

fn polygon_uv(count: usize, i: usize) -> Vec2 {
    match (count, i) {
        (3, 0) => Vec2::new(0.0, 0.0),
        (3, 1) => Vec2::new(1.0, 0.0),
        (3, _) => Vec2::new(0.5, 1.0),
        (4, 0) => Vec2::new(0.0, 0.0),
        (4, 1) => Vec2::new(1.0, 0.0),
        (4, 2) => Vec2::new(1.0, 1.0),
        (4, _) => Vec2::new(0.0, 1.0),
        _ => {
            let a = i as f32 / count as f32 * std::f32::consts::TAU;
            Vec2::new(0.5 + 0.5 * a.cos(), 0.5 + 0.5 * a.sin())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(shape: Shape) -> ModelDesc {
        ModelDesc {
            parts: vec![PartDesc { shape, offset: Vec3::new(1.0, 2.0, 3.0), color: (10, 20, 30) }],
            texture: None,
        }
    }

    fn assert_outward(mesh: &Mesh, center: Vec3) {
        for face in &mesh.faces {
            let (a, b, c) = (mesh.vertices[face.v0].pos, mesh.vertices[face.v1].pos, mesh.vertices[face.v2].pos);
            let n = (b - a).cross(c - a);
            let mid = (a + b + c) * (1.0 / 3.0);
            assert!(n.dot(mid - center) > 0.0, "face winds inward");
            assert!(mesh.vertices[face.v0].normal.dot(n) > 0.0, "normal disagrees with winding");
        }
    }

    #[test]
    fn test_cuboid_mesh() {
        let mesh = model(Shape::Cuboid { size: Vec3::new(2.0, 1.0, 2.0) }).build_mesh(None);
        assert_eq!(mesh.faces.len(), 12);
        assert_eq!(mesh.vertices.len(), 24);
        assert_outward(&mesh, Vec3::new(1.0, 2.5, 3.0));
        assert!(mesh.faces.iter().all(|f| f.color == Color::new(10, 20, 30)));
    }

    #[test]
    fn test_pyramid_and_gable_meshes() {
        let pyramid = model(Shape::Pyramid { size: Vec3::new(2.0, 1.0, 2.0) }).build_mesh(Some(0));
        assert_eq!(pyramid.faces.len(), 6);
        assert_outward(&pyramid, Vec3::new(1.0, 2.25, 3.0));
        assert!(pyramid.faces.iter().all(|f| f.texture_id == Some(0)));

        let gable = model(Shape::Gable { size: Vec3::new(2.0, 1.0, 2.0) }).build_mesh(None);
        assert_eq!(gable.faces.len(), 2 + 2 + 2 + 1 + 1);
        assert_outward(&gable, Vec3::new(1.0, 2.0 + 1.0 / 3.0, 3.0));
    }

    #[test]
    fn test_cylinder_mesh() {
        let mesh = model(Shape::Cylinder { radius: 0.5, height: 2.0, segments: 8 }).build_mesh(None);
        // Two octagon caps (6 triangles each) plus 8 side quads
        assert_eq!(mesh.faces.len(), 6 * 2 + 8 * 2);
        assert_outward(&mesh, Vec3::new(1.0, 3.0, 3.0));
    }

    #[test]
    fn test_cylinder_clamps_segments() {
        let mesh = model(Shape::Cylinder { radius: 1.0, height: 1.0, segments: 1 }).build_mesh(None);
        assert_eq!(mesh.faces.len(), 1 + 1 + 3 * 2);
    }
}
