//! Interactive 3D graph scene on a 2D canvas.
//!
//! Host data flows through [`GraphHandle`] (structure and force layout) into
//! the [`GraphStore`], the single source of truth for positions, drags, hover
//! and selection. [`GraphScene`] mirrors the store as animated node and edge
//! visuals, and the canvas component draws them every frame.

mod camera;
mod component;
mod config;
mod edge;
mod geometry;
mod graph;
mod interaction;
mod layout;
mod line;
mod node;
mod render;
mod scene;
mod sizing;
mod spring;
mod state;
mod store;
mod theme;
mod tube;
mod types;

pub use camera::{CameraMode, Viewport};
pub use component::GraphCanvas;
pub use config::GraphSceneConfig;
pub use geometry::{ArcTable, Curve, EdgeVectors3};
pub use graph::GraphHandle;
pub use interaction::{HitTarget, PointerButton, PointerEvent};
pub use line::{Line, LineEvent, LineProps};
pub use scene::{GraphScene, SceneEvent};
pub use spring::{Spring, SpringConfig};
pub use state::GraphSceneHandle;
pub use store::GraphStore;
pub use theme::Theme;
pub use tube::TubeGeometry;
pub use types::{
	EdgeArrowPosition, EdgeInterpolation, EdgeLabelPosition, GraphData, GraphEdge, GraphNode,
	LabelVisibilityType, LayoutType, SizingType,
};
