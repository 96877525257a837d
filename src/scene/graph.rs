//! Scene graph
//!
//! Arena of nodes addressed by `NodeId`. Each node has a position and a
//! Y rotation relative to its parent, and optionally a model mesh.

use std::path::{Path, PathBuf};
use std::collections::HashSet;
use std::f32::consts::TAU;
use crate::rasterizer::{Camera, Color, Face, Texture, Vec3, Vertex};
use super::action::{Action, RunningAction};
use super::adapter::{NodeId, SceneAdapter, SceneError};
use super::file::{load_scene_file, NodeDesc, SceneFile};
use super::model::Mesh;

/// A placed node
#[derive(Debug, Clone)]
pub struct SceneNode {
    pub name: String,
    pub position: Vec3,
    pub rotation_y: f32,
    pub parent: Option<NodeId>,
    pub mesh: Option<Mesh>,
}

/// A loaded scene with its running actions
pub struct Scene {
    nodes: Vec<SceneNode>,
    actions: Vec<(NodeId, RunningAction)>,
    /// Camera node -> node it keeps looking at
    look_targets: Vec<(NodeId, NodeId)>,
    textures: Vec<Texture>,
    pub background: Color,
    source: Option<PathBuf>,
}

impl Scene {
    /// Load a scene from a RON file. Texture paths resolve relative to it.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SceneError> {
        let path = path.as_ref();
        let file = load_scene_file(path)?;
        let mut scene = Self::from_file(file, path.parent())?;
        scene.source = Some(path.to_path_buf());
        log::info!("Loaded scene {} ({} nodes)", path.display(), scene.nodes.len());
        Ok(scene)
    }

    /// Build a scene from an in-memory RON string (no textures, no reload)
    #[cfg(test)]
    pub fn from_ron_str(s: &str) -> Result<Self, SceneError> {
        Self::from_file(super::file::parse_scene(s, "<memory>")?, None)
    }

    pub fn from_file(file: SceneFile, base_dir: Option<&Path>) -> Result<Self, SceneError> {
        let mut seen = HashSet::new();
        check_unique_names(&file.nodes, &mut seen)?;

        let (r, g, b) = file.background;
        let mut scene = Self {
            nodes: Vec::new(),
            actions: Vec::new(),
            look_targets: Vec::new(),
            textures: Vec::new(),
            background: Color::new(r, g, b),
            source: None,
        };

        for desc in &file.nodes {
            scene.insert(desc, None, base_dir);
        }

        Ok(scene)
    }

    /// Load a fresh copy of this scene from the file it came from.
    ///
    /// `NodeId`s of this scene mean nothing in the new one; look them up again.
    pub fn reload(&self) -> Result<Scene, SceneError> {
        let path = self.source.as_deref().ok_or(SceneError::NoSource)?;
        Self::load(path)
    }

    fn insert(&mut self, desc: &NodeDesc, parent: Option<NodeId>, base_dir: Option<&Path>) -> NodeId {
        let texture_id = desc
            .model
            .as_ref()
            .and_then(|m| m.texture.as_deref())
            .and_then(|tex| self.load_texture(tex, base_dir));

        let id = NodeId(self.nodes.len());
        self.nodes.push(SceneNode {
            name: desc.name.clone(),
            position: desc.position,
            rotation_y: desc.rotation_y,
            parent,
            mesh: desc.model.as_ref().map(|m| m.build_mesh(texture_id)),
        });

        for child in &desc.children {
            self.insert(child, Some(id), base_dir);
        }
        id
    }

    /// Textures are cosmetic: a missing one only loses the texture
    fn load_texture(&mut self, relative: &str, base_dir: Option<&Path>) -> Option<usize> {
        let path = match base_dir {
            Some(dir) => dir.join(relative),
            None => PathBuf::from(relative),
        };
        match Texture::from_file(&path) {
            Ok(tex) => {
                log::debug!("Loaded texture {} ({}x{})", tex.name, tex.width, tex.height);
                self.textures.push(tex);
                Some(self.textures.len() - 1)
            }
            Err(e) => {
                log::warn!("{}", e);
                None
            }
        }
    }

    #[cfg(test)]
    pub fn node(&self, id: NodeId) -> &SceneNode {
        &self.nodes[id.0]
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    pub fn textures(&self) -> &[Texture] {
        &self.textures
    }

    /// Advance all running actions by `dt` seconds
    pub fn tick(&mut self, dt: f32) {
        for (node, action) in &mut self.actions {
            let delta = action.step(dt);
            self.nodes[node.0].rotation_y += delta;
        }
        // Endless spins would otherwise grow the angle until f32 loses precision
        for (node, _) in &self.actions {
            let rotation = &mut self.nodes[node.0].rotation_y;
            *rotation = rotation.rem_euclid(TAU);
        }
        self.actions.retain(|(_, action)| !action.is_finished());
    }

    /// Running actions on a node
    #[cfg(test)]
    pub fn actions_on(&self, node: NodeId) -> impl Iterator<Item = &RunningAction> {
        self.actions.iter().filter(move |(n, _)| *n == node).map(|(_, a)| a)
    }

    /// Transform a point from a node's local space to world space
    pub fn local_to_world(&self, node: NodeId, point: Vec3) -> Vec3 {
        let mut current = Some(node);
        let mut p = point;
        while let Some(id) = current {
            let n = &self.nodes[id.0];
            p = n.position + p.rotate_y(n.rotation_y);
            current = n.parent;
        }
        p
    }

    /// Accumulated Y rotation from the root down to `node`
    pub fn world_rotation(&self, node: NodeId) -> f32 {
        let mut current = Some(node);
        let mut angle = 0.0;
        while let Some(id) = current {
            let n = &self.nodes[id.0];
            angle += n.rotation_y;
            current = n.parent;
        }
        angle
    }

    /// World-space vertices of a node's mesh, with the faces to draw them
    pub fn world_mesh(&self, node: NodeId) -> Option<(Vec<Vertex>, &[Face])> {
        let mesh = self.nodes[node.0].mesh.as_ref()?;
        let rotation = self.world_rotation(node);
        let vertices = mesh
            .vertices
            .iter()
            .map(|v| Vertex::new(self.local_to_world(node, v.pos), v.uv, v.normal.rotate_y(rotation)))
            .collect();
        Some((vertices, &mesh.faces))
    }

    /// Rasterizer camera for a camera node, aimed at its look target if it has one
    pub fn view_camera(&self, camera: NodeId) -> Camera {
        let mut view = Camera::new();
        view.position = self.world_position(camera);
        view.rotation_y = self.world_rotation(camera);
        view.update_basis();

        if let Some((_, target)) = self.look_targets.iter().find(|(cam, _)| *cam == camera) {
            view.look_at(self.world_position(*target));
        }
        view
    }
}

fn check_unique_names<'a>(nodes: &'a [NodeDesc], seen: &mut HashSet<&'a str>) -> Result<(), SceneError> {
    for node in nodes {
        if !seen.insert(node.name.as_str()) {
            return Err(SceneError::DuplicateNode(node.name.clone()));
        }
        check_unique_names(&node.children, seen)?;
    }
    Ok(())
}

impl SceneAdapter for Scene {
    fn find_node(&self, name: &str) -> Option<NodeId> {
        self.nodes.iter().position(|n| n.name == name).map(NodeId)
    }

    fn world_position(&self, node: NodeId) -> Vec3 {
        self.local_to_world(node, Vec3::ZERO)
    }

    fn run_action(&mut self, node: NodeId, key: Option<&str>, action: Action) {
        let mut running = RunningAction::new(key, action);

        if let Some(key) = key {
            // Superseded: the new action inherits the turn the old one still owed
            if let Some(pos) = self
                .actions
                .iter()
                .position(|(n, a)| *n == node && a.key.as_deref() == Some(key))
            {
                let (_, old) = self.actions.remove(pos);
                running.absorb(old.remaining());
            }
        }

        self.actions.push((node, running));
    }

    fn look_at(&mut self, camera: NodeId, target: NodeId) {
        self.look_targets.retain(|(cam, _)| *cam != camera);
        self.look_targets.push((camera, target));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    const SCENE: &str = r#"(
        nodes: [
            (name: "camera", position: (x: 0.0, y: 2.0, z: -10.0)),
            (name: "pivot", position: (x: 1.0, y: 0.0, z: 0.0), children: [
                (
                    name: "box",
                    position: (x: 3.0, y: 0.0, z: 0.0),
                    model: Some((parts: [
                        (shape: Cuboid(size: (x: 1.0, y: 1.0, z: 1.0)), color: (255, 0, 0)),
                    ])),
                ),
            ]),
        ],
    )"#;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).len() < 1e-4
    }

    #[test]
    fn test_hierarchy_and_lookup() {
        let scene = Scene::from_ron_str(SCENE).unwrap();
        let pivot = scene.find_node("pivot").unwrap();
        let boxed = scene.find_node("box").unwrap();
        assert_eq!(scene.node(boxed).parent, Some(pivot));
        assert!(scene.find_node("missing").is_none());
        assert!(close(scene.world_position(boxed), Vec3::new(4.0, 0.0, 0.0)));
    }

    #[test]
    fn test_pivot_rotation_moves_children() {
        let mut scene = Scene::from_ron_str(SCENE).unwrap();
        let pivot = scene.find_node("pivot").unwrap();
        let boxed = scene.find_node("box").unwrap();

        scene.run_action(pivot, None, Action::rotate_by(FRAC_PI_2, 0.5));
        scene.tick(0.25);
        scene.tick(0.25);

        assert!(close(scene.world_position(boxed), Vec3::new(1.0, 0.0, -3.0)));
        assert_eq!(scene.actions_on(pivot).count(), 0);
    }

    #[test]
    fn test_keyed_action_supersedes_without_losing_turn() {
        let mut scene = Scene::from_ron_str(SCENE).unwrap();
        let pivot = scene.find_node("pivot").unwrap();

        scene.run_action(pivot, Some("turn"), Action::rotate_by(1.0, 1.0));
        scene.tick(0.5);
        scene.run_action(pivot, Some("turn"), Action::rotate_by(2.0, 1.0));
        assert_eq!(scene.actions_on(pivot).count(), 1);
        scene.tick(1.0);

        assert!((scene.node(pivot).rotation_y - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_unkeyed_actions_stack() {
        let mut scene = Scene::from_ron_str(SCENE).unwrap();
        let boxed = scene.find_node("box").unwrap();

        scene.run_action(boxed, None, Action::rotate_by(-10.0, 15.0).repeat_forever());
        scene.run_action(boxed, None, Action::rotate_by(1.5, 0.1));
        scene.tick(1.5);

        assert_eq!(scene.actions_on(boxed).count(), 1);
        assert!((scene.node(boxed).rotation_y - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_endless_spin_stays_in_one_turn() {
        let mut scene = Scene::from_ron_str(SCENE).unwrap();
        let boxed = scene.find_node("box").unwrap();
        scene.run_action(boxed, None, Action::rotate_by(-10.0, 15.0).repeat_forever());

        let mut unwrapped = 0.0f64;
        for _ in 0..10_000 {
            scene.tick(1.0 / 60.0);
            unwrapped += -10.0 / 15.0 / 60.0;
            let rotation = scene.node(boxed).rotation_y;
            assert!((0.0..=TAU).contains(&rotation), "rotation {} escaped one turn", rotation);
        }

        let expected = unwrapped.rem_euclid(std::f64::consts::TAU) as f32;
        let diff = (scene.node(boxed).rotation_y - expected).abs();
        assert!(diff.min(TAU - diff) < 1e-2);
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let err = Scene::from_ron_str(
            r#"(nodes: [(name: "pivot", children: [(name: "a")]), (name: "a")])"#,
        )
        .err()
        .unwrap();
        assert!(matches!(err, SceneError::DuplicateNode(name) if name == "a"));
    }

    #[test]
    fn test_world_mesh_follows_node() {
        let scene = Scene::from_ron_str(SCENE).unwrap();
        let boxed = scene.find_node("box").unwrap();
        let (vertices, faces) = scene.world_mesh(boxed).unwrap();
        assert_eq!(faces.len(), 12);
        assert!(vertices.iter().all(|v| v.pos.x >= 3.5 - 1e-4 && v.pos.x <= 4.5 + 1e-4));
        assert!(scene.world_mesh(scene.find_node("pivot").unwrap()).is_none());
    }

    #[test]
    fn test_view_camera_tracks_target() {
        let mut scene = Scene::from_ron_str(SCENE).unwrap();
        let camera = scene.find_node("camera").unwrap();
        let boxed = scene.find_node("box").unwrap();
        scene.look_at(camera, boxed);

        let view = scene.view_camera(camera);
        let expected = (scene.world_position(boxed) - view.position).normalize();
        assert!(close(view.basis_z, expected));
    }

    #[test]
    fn test_reload_without_source_fails() {
        let scene = Scene::from_ron_str(SCENE).unwrap();
        assert!(matches!(scene.reload(), Err(SceneError::NoSource)));
        assert!(scene.find_node("box").is_some());
    }

    #[test]
    fn test_bundled_scene_reloads() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/scenes/main_scene.ron");
        let scene = Scene::load(path).unwrap();
        for name in ["camera", "pivot", "tree_ref", "fantasy_ref", "medieval_ref", "chinese_buliding_ref"] {
            assert!(scene.find_node(name).is_some(), "missing {}", name);
        }

        let fresh = scene.reload().unwrap();
        assert_eq!(fresh.node_ids().count(), scene.node_ids().count());
        assert_eq!(fresh.find_node("pivot"), scene.find_node("pivot"));
    }

    #[test]
    fn test_missing_texture_is_not_fatal() {
        let scene = Scene::from_ron_str(
            r#"(nodes: [(name: "a", model: Some((parts: [], texture: Some("nope.png"))))])"#,
        )
        .unwrap();
        assert!(scene.textures().is_empty());
    }
}
