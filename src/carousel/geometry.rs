//! Planar carousel geometry

use std::f32::consts::{PI, TAU};
use serde::{Serialize, Deserialize};
use crate::rasterizer::Vec3;

/// Bearing of `p` around `pivot` in the XZ plane
pub fn bearing(p: Vec3, pivot: Vec3) -> f32 {
    (p.z - pivot.z).atan2(p.x - pivot.x)
}

/// Signed rotation that takes `b` to where `a` stands around the pivot.
///
/// Raw difference of bearings, so the result lies in (-2π, 2π).
pub fn angle_between(a: Vec3, b: Vec3, pivot: Vec3) -> f32 {
    bearing(b, pivot) - bearing(a, pivot)
}

/// Same turn expressed the short way round, in (-π, π]
pub fn shortest_arc(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI { wrapped + TAU } else { wrapped }
}

pub fn distance(a: Vec3, b: Vec3) -> f32 {
    a.distance(b)
}

/// Distance blur parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlurSettings {
    pub enabled: bool,
    /// Blur pixels per world unit beyond the focus distance
    pub scale: f32,
    pub max_radius: usize,
}

impl Default for BlurSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            scale: 0.6,
            max_radius: 4,
        }
    }
}

/// Blur radius in framebuffer pixels for a node `distance` away from the
/// camera, when the selected node sits at `focus`.
pub fn blur_radius(distance: f32, focus: f32, settings: &BlurSettings) -> usize {
    if !settings.enabled {
        return 0;
    }
    let excess = (distance - focus).max(0.0);
    ((excess * settings.scale).round() as usize).min(settings.max_radius)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PIVOT: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };

    #[test]
    fn test_angle_between_quarter_turn() {
        let front = Vec3::new(0.0, 0.0, -6.0);
        let left = Vec3::new(-6.0, 0.0, 0.0);
        // bearing(front) = -π/2, bearing(left) = π
        assert!((angle_between(front, left, PIVOT) - 1.5 * PI).abs() < 1e-5);
    }

    #[test]
    fn test_angle_between_antisymmetric_and_zero() {
        let pivot = Vec3::new(1.0, 5.0, -2.0);
        let points = [
            Vec3::new(3.0, 0.0, 1.0),
            Vec3::new(-4.0, 2.0, 0.5),
            Vec3::new(0.2, -1.0, -7.0),
            Vec3::new(6.0, 0.0, -2.0),
        ];
        for &a in &points {
            assert_eq!(angle_between(a, a, pivot), 0.0);
            for &b in &points {
                assert!((angle_between(a, b, pivot) + angle_between(b, a, pivot)).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_angle_between_ignores_height() {
        let a = Vec3::new(2.0, 0.0, 0.0);
        let b = Vec3::new(0.0, 0.0, 2.0);
        let raised = Vec3::new(0.0, 9.0, 2.0);
        assert_eq!(angle_between(a, b, PIVOT), angle_between(a, raised, PIVOT));
    }

    #[test]
    fn test_rotating_by_angle_brings_new_to_old() {
        let old = Vec3::new(0.0, 0.0, -6.0);
        let new = Vec3::new(6.0, 0.0, 0.0);
        let moved = new.rotate_y(angle_between(old, new, PIVOT));
        assert!((moved - old).len() < 1e-4);

        let moved_short = new.rotate_y(shortest_arc(angle_between(old, new, PIVOT)));
        assert!((moved_short - old).len() < 1e-4);
    }

    #[test]
    fn test_shortest_arc_range() {
        assert!((shortest_arc(1.5 * PI) + 0.5 * PI).abs() < 1e-5);
        assert!((shortest_arc(-1.5 * PI) - 0.5 * PI).abs() < 1e-5);
        assert!((shortest_arc(0.25) - 0.25).abs() < 1e-6);
        assert!((shortest_arc(-PI) - PI).abs() < 1e-5);
        assert!((shortest_arc(PI) - PI).abs() < 1e-5);
    }

    #[test]
    fn test_blur_radius() {
        let settings = BlurSettings { enabled: true, scale: 1.0, max_radius: 3 };
        assert_eq!(blur_radius(10.0, 10.0, &settings), 0);
        assert_eq!(blur_radius(8.0, 10.0, &settings), 0);
        assert_eq!(blur_radius(12.0, 10.0, &settings), 2);
        assert_eq!(blur_radius(40.0, 10.0, &settings), 3);

        let off = BlurSettings { enabled: false, ..settings };
        assert_eq!(blur_radius(40.0, 10.0, &off), 0);
    }

    #[test]
    fn test_distance() {
        assert_eq!(distance(Vec3::new(1.0, 2.0, 3.0), Vec3::new(4.0, 6.0, 3.0)), 5.0);
    }
}
