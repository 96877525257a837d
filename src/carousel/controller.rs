//! Carousel controller
//!
//! Owns the current selection and the node handles for one scene, and turns
//! next/previous requests into a pivot rotation plus a camera re-aim.

use serde::{Serialize, Deserialize};
use crate::levels::{LevelCatalog, LevelId, LevelRecord};
use crate::scene::{Action, NodeId, SceneAdapter, SceneError};
use super::geometry::{self, BlurSettings};

/// Node the view camera is attached to
pub const CAMERA_NODE: &str = "camera";
/// Node the level models are arranged around
pub const PIVOT_NODE: &str = "pivot";

/// Key of the pivot rotation, so a new turn replaces one still in flight
const TURN_KEY: &str = "carousel_turn";
const SPIN_KEY: &str = "idle_spin";

/// Direction of a completed swipe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    Next,
    Previous,
}

/// Transition and idle animation parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarouselSettings {
    pub default_level: LevelId,
    /// Seconds for the pivot to turn to the next level
    pub transition_duration: f32,
    /// Idle spin of every model: `spin_angle` radians per `spin_duration` seconds
    pub spin_angle: f32,
    pub spin_duration: f32,
    /// Turn the short way round instead of by the raw bearing difference
    pub shortest_rotation: bool,
}

impl Default for CarouselSettings {
    fn default() -> Self {
        Self {
            default_level: LevelId::TreeHouse,
            transition_duration: 0.3,
            spin_angle: -10.0,
            spin_duration: 15.0,
            shortest_rotation: false,
        }
    }
}

type Observer = Box<dyn FnMut(&LevelRecord)>;

pub struct CarouselController {
    current_index: usize,
    /// One handle per catalog record, in catalog order
    nodes: Vec<NodeId>,
    camera: NodeId,
    pivot: NodeId,
    settings: CarouselSettings,
    title: &'static str,
    description: &'static str,
    observers: Vec<Observer>,
}

impl CarouselController {
    /// Resolve the camera, pivot and level nodes, start the idle spins and
    /// show the default level.
    pub fn initialize<S: SceneAdapter>(scene: &mut S, settings: CarouselSettings) -> Result<Self, SceneError> {
        let (camera, pivot, nodes) = resolve_nodes(scene)?;
        let record = LevelCatalog::record(settings.default_level);

        let controller = Self {
            current_index: record.id.index(),
            nodes,
            camera,
            pivot,
            settings,
            title: record.title,
            description: record.description,
            observers: Vec::new(),
        };
        controller.start_spins(scene);
        scene.look_at(controller.camera, controller.selected_node());

        log::info!("Carousel ready on \"{}\"", controller.title);
        Ok(controller)
    }

    /// Look the nodes up again in a freshly loaded scene, keeping the selection.
    ///
    /// A fresh scene has the default level in front, so the pivot is snapped
    /// round to put the selected level there instead. On error the controller
    /// keeps its old handles.
    pub fn rebind<S: SceneAdapter>(&mut self, scene: &mut S) -> Result<(), SceneError> {
        let (camera, pivot, nodes) = resolve_nodes(scene)?;
        self.camera = camera;
        self.pivot = pivot;
        self.nodes = nodes;

        let front = self.nodes[self.settings.default_level.index()];
        let mut angle = self.angle_between(scene, front, self.selected_node());
        if self.settings.shortest_rotation {
            angle = geometry::shortest_arc(angle);
        }
        scene.run_action(self.pivot, Some(TURN_KEY), Action::rotate_by(angle, 0.0));

        self.start_spins(scene);
        scene.look_at(self.camera, self.selected_node());
        log::debug!("Carousel rebound to new scene, pivot aligned by {:.3} rad", angle);
        Ok(())
    }

    /// Register a callback run with the newly selected record after every transition
    pub fn subscribe<F>(&mut self, observer: F)
    where
        F: FnMut(&LevelRecord) + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    pub fn advance_next<S: SceneAdapter>(&mut self, scene: &mut S) {
        let n = LevelCatalog::len();
        self.transition_to(scene, (self.current_index + 1) % n);
    }

    pub fn advance_previous<S: SceneAdapter>(&mut self, scene: &mut S) {
        let n = LevelCatalog::len();
        self.transition_to(scene, (self.current_index + n - 1) % n);
    }

    pub fn advance<S: SceneAdapter>(&mut self, scene: &mut S, direction: SwipeDirection) {
        match direction {
            SwipeDirection::Next => self.advance_next(scene),
            SwipeDirection::Previous => self.advance_previous(scene),
        }
    }

    /// Rotation that brings `b` to where `a` stands around the pivot
    pub fn angle_between<S: SceneAdapter>(&self, scene: &S, a: NodeId, b: NodeId) -> f32 {
        geometry::angle_between(
            scene.world_position(a),
            scene.world_position(b),
            scene.world_position(self.pivot),
        )
    }

    /// Camera distance to a node
    pub fn distance_to<S: SceneAdapter>(&self, scene: &S, node: NodeId) -> f32 {
        geometry::distance(scene.world_position(self.camera), scene.world_position(node))
    }

    /// Cosmetic blur for a level node. The selected node is always sharp.
    pub fn blur_radius_for<S: SceneAdapter>(&self, scene: &S, node: NodeId, blur: &BlurSettings) -> usize {
        if node == self.selected_node() {
            return 0;
        }
        let focus = self.distance_to(scene, self.selected_node());
        geometry::blur_radius(self.distance_to(scene, node), focus, blur)
    }

    fn transition_to<S: SceneAdapter>(&mut self, scene: &mut S, next: usize) {
        let old = self.selected_node();
        let new = self.nodes[next];

        let mut angle = self.angle_between(scene, old, new);
        if self.settings.shortest_rotation {
            angle = geometry::shortest_arc(angle);
        }

        self.current_index = next;
        scene.run_action(
            self.pivot,
            Some(TURN_KEY),
            Action::rotate_by(angle, self.settings.transition_duration),
        );
        scene.look_at(self.camera, new);

        let record = LevelCatalog::get(next);
        self.title = record.title;
        self.description = record.description;
        log::debug!("Selected {:?}, pivot turn {:.3} rad", record.id, angle);

        for observer in &mut self.observers {
            observer(record);
        }
    }

    fn start_spins<S: SceneAdapter>(&self, scene: &mut S) {
        let spin = Action::rotate_by(self.settings.spin_angle, self.settings.spin_duration).repeat_forever();
        for &node in &self.nodes {
            scene.run_action(node, Some(SPIN_KEY), spin.clone());
        }
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn title(&self) -> &str {
        self.title
    }

    pub fn description(&self) -> &str {
        self.description
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn selected_node(&self) -> NodeId {
        self.nodes[self.current_index]
    }

    pub fn camera(&self) -> NodeId {
        self.camera
    }
}

fn resolve_nodes<S: SceneAdapter>(scene: &S) -> Result<(NodeId, NodeId, Vec<NodeId>), SceneError> {
    let find = |name: &str| scene.find_node(name).ok_or_else(|| SceneError::MissingNode(name.to_string()));

    let camera = find(CAMERA_NODE)?;
    let pivot = find(PIVOT_NODE)?;
    let nodes = LevelCatalog::iter()
        .map(|record| find(record.id.node_name()))
        .collect::<Result<Vec<_>, _>>()?;

    Ok((camera, pivot, nodes))
}
