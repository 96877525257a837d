//! Scene layer: RON scene files, the node hierarchy, timed actions and the
//! `SceneAdapter` interface the carousel drives.

mod action;
mod adapter;
mod file;
mod graph;
mod model;

pub use action::Action;
pub use adapter::{NodeId, SceneAdapter, SceneError};
pub use graph::Scene;
