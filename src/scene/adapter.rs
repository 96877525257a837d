//! Capability interface between the carousel and a scene graph

use std::path::PathBuf;
use crate::rasterizer::Vec3;
use super::action::Action;

/// Handle to a node in a scene. Only meaningful for the scene that issued it;
/// after a reload, handles must be looked up again by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Errors raised while loading a scene or resolving its nodes
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("failed to read scene {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse scene {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("scene has no node named \"{0}\"")]
    MissingNode(String),
    #[error("scene has more than one node named \"{0}\"")]
    DuplicateNode(String),
    #[error("scene was not loaded from a file and cannot be reloaded")]
    NoSource,
}

/// What the carousel needs from a scene: named lookup, positions,
/// action scheduling and camera aiming.
pub trait SceneAdapter {
    /// Find a node anywhere in the hierarchy by its identifier
    fn find_node(&self, name: &str) -> Option<NodeId>;

    /// Current world-space position of a node's origin
    fn world_position(&self, node: NodeId) -> Vec3;

    /// Schedule an action on a node. A keyed action replaces any running
    /// action with the same key on that node.
    fn run_action(&mut self, node: NodeId, key: Option<&str>, action: Action);

    /// Aim `camera` at `target`
    fn look_at(&mut self, camera: NodeId, target: NodeId);
}
