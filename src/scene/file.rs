//! Scene file loading
//!
//! Uses RON (Rusty Object Notation) for human-readable scene files.

use std::fs;
use std::path::Path;
use serde::{Serialize, Deserialize};
use crate::rasterizer::Vec3;
use super::SceneError;
use super::model::ModelDesc;

/// A node as written in the scene file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeDesc {
    pub name: String,
    /// Position in the parent's space
    #[serde(default)]
    pub position: Vec3,
    #[serde(default)]
    pub rotation_y: f32,
    #[serde(default)]
    pub model: Option<ModelDesc>,
    #[serde(default)]
    pub children: Vec<NodeDesc>,
}

/// Top level of a scene file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneFile {
    #[serde(default = "default_background")]
    pub background: (u8, u8, u8),
    pub nodes: Vec<NodeDesc>,
}

fn default_background() -> (u8, u8, u8) {
    (12, 12, 28)
}

/// Load a scene description from a RON file
pub fn load_scene_file<P: AsRef<Path>>(path: P) -> Result<SceneFile, SceneError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| SceneError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_scene(&contents, &path.display().to_string())
}

/// Parse a scene description from a RON string. `origin` names the source
/// in error messages.
pub fn parse_scene(s: &str, origin: &str) -> Result<SceneFile, SceneError> {
    ron::from_str(s).map_err(|source| SceneError::Parse {
        origin: origin.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::model::Shape;

    #[test]
    fn test_parse_minimal_scene() {
        let file = parse_scene(
            r#"(
                nodes: [
                    (name: "camera", position: (x: 0.0, y: 2.0, z: -10.0)),
                    (name: "pivot", children: [
                        (
                            name: "hut",
                            position: (x: 0.0, y: 0.0, z: -4.0),
                            model: Some((parts: [
                                (shape: Cuboid(size: (x: 1.0, y: 1.0, z: 1.0)), color: (200, 100, 50)),
                            ])),
                        ),
                    ]),
                ],
            )"#,
            "inline",
        )
        .unwrap();

        assert_eq!(file.background, default_background());
        assert_eq!(file.nodes.len(), 2);
        assert_eq!(file.nodes[0].position, Vec3::new(0.0, 2.0, -10.0));
        let hut = &file.nodes[1].children[0];
        assert_eq!(hut.name, "hut");
        assert_eq!(hut.rotation_y, 0.0);
        let model = hut.model.as_ref().unwrap();
        assert_eq!(model.parts[0].shape, Shape::Cuboid { size: Vec3::new(1.0, 1.0, 1.0) });
        assert_eq!(model.parts[0].offset, Vec3::ZERO);
        assert!(model.texture.is_none());
    }

    #[test]
    fn test_parse_error_names_origin() {
        let err = parse_scene("(nodes: [", "broken.ron").unwrap_err();
        assert!(matches!(err, SceneError::Parse { .. }));
        assert!(err.to_string().contains("broken.ron"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_scene_file("does/not/exist.ron").unwrap_err();
        assert!(matches!(err, SceneError::Io { .. }));
    }

    #[test]
    fn test_bundled_scene_parses() {
        let file = load_scene_file(concat!(env!("CARGO_MANIFEST_DIR"), "/assets/scenes/main_scene.ron")).unwrap();
        assert!(!file.nodes.is_empty());
    }
}
