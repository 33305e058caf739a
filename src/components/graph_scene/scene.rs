//! The scene tree: one node visual and one edge visual per id in the store.
//!
//! The scene keeps no graph state of its own. It mirrors the store, carries
//! per-entity animation state and the camera, and answers picking queries.

use std::collections::HashMap;

use glam::Vec3;

use super::camera::{CameraController, Viewport};
use super::config::GraphSceneConfig;
use super::edge::EdgeVisual;
use super::interaction::{EDGE_PICK_SLOP, HitTarget, NODE_PICK_SLOP, distance_to_polyline};
use super::layout::bounds;
use super::node::NodeVisual;
use super::store::GraphStore;

/// Points sampled along an edge for picking.
const PICK_SAMPLES: usize = 16;
/// Edges fainter than this cannot be picked.
const PICK_MIN_OPACITY: f32 = 0.05;

/// Something the host may want to hear about.
#[derive(Clone, Debug, PartialEq)]
pub enum SceneEvent {
	/// Primary click on a node.
	NodeClick(String),
	/// Secondary press on a node.
	NodeContextMenu(String),
	/// Pointer entered a node.
	NodePointerOver(String),
	/// Pointer left a node.
	NodePointerOut(String),
	/// A node drag began.
	NodeDragStart(String),
	/// A node drag ended at `position`.
	NodeDragEnd {
		/// Node id.
		id: String,
		/// Where the node was dropped.
		position: Vec3,
	},
	/// Primary click on an edge.
	EdgeClick(String),
	/// Secondary press on an edge.
	EdgeContextMenu(String),
	/// Pointer entered an edge.
	EdgePointerOver(String),
	/// Pointer left an edge.
	EdgePointerOut(String),
	/// Primary click on empty canvas.
	CanvasClick,
}

/// Projection of the store into renderable visuals.
pub struct GraphScene {
	config: GraphSceneConfig,
	nodes: Vec<NodeVisual>,
	node_index: HashMap<String, usize>,
	edges: Vec<EdgeVisual>,
	edge_index: HashMap<String, usize>,
	camera: CameraController,
	synced_revision: Option<u64>,
}

impl GraphScene {
	/// An empty scene.
	pub fn new(config: GraphSceneConfig) -> Self {
		Self {
			camera: CameraController::new(config.camera_mode),
			config,
			nodes: Vec::new(),
			node_index: HashMap::new(),
			edges: Vec::new(),
			edge_index: HashMap::new(),
			synced_revision: None,
		}
	}

	/// Current configuration.
	pub fn config(&self) -> &GraphSceneConfig {
		&self.config
	}

	/// Replaces the configuration; visuals pick it up on the next sync.
	pub fn set_config(&mut self, config: GraphSceneConfig) {
		self.camera.set_mode(config.camera_mode);
		self.config = config;
		self.synced_revision = None;
	}

	/// Reconciles visuals with the store. Returns true if anything was re-derived.
	///
	/// Visuals for ids that are still present keep their animation state,
	/// new ids mount fresh visuals and vanished ids are dropped.
	pub fn sync(&mut self, store: &GraphStore) -> bool {
		if self.synced_revision == Some(store.revision()) {
			return false;
		}

		let mut old_nodes: HashMap<String, NodeVisual> = self
			.nodes
			.drain(..)
			.map(|v| (v.id().to_string(), v))
			.collect();
		self.nodes = store
			.nodes()
			.iter()
			.map(|node| match old_nodes.remove(&node.id) {
				Some(mut visual) => {
					visual.update(node, store, &self.config);
					visual
				}
				None => NodeVisual::new(node, store, &self.config),
			})
			.collect();
		self.node_index = self
			.nodes
			.iter()
			.enumerate()
			.map(|(i, v)| (v.id().to_string(), i))
			.collect();

		let mut old_edges: HashMap<String, EdgeVisual> = self
			.edges
			.drain(..)
			.map(|v| (v.id().to_string(), v))
			.collect();
		self.edges = store
			.edges()
			.iter()
			.map(|edge| match old_edges.remove(&edge.id) {
				Some(mut visual) => {
					visual.update(edge, store, &self.config);
					visual
				}
				None => EdgeVisual::new(edge, store, &self.config),
			})
			.collect();
		self.edge_index = self
			.edges
			.iter()
			.enumerate()
			.map(|(i, v)| (v.id().to_string(), i))
			.collect();

		self.synced_revision = Some(store.revision());
		true
	}

	/// Advances every animation. Returns true while anything moves.
	pub fn tick(&mut self, dt: f32) -> bool {
		let mut moving = self.camera.tick(dt);
		for node in &mut self.nodes {
			moving |= node.tick(dt);
		}
		for edge in &mut self.edges {
			moving |= edge.tick(dt);
		}
		moving
	}

	/// Node visuals in store order.
	pub fn nodes(&self) -> &[NodeVisual] {
		&self.nodes
	}

	/// Edge visuals in store order.
	pub fn edges(&self) -> &[EdgeVisual] {
		&self.edges
	}

	/// Node visual by id.
	pub fn node(&self, id: &str) -> Option<&NodeVisual> {
		self.node_index.get(id).map(|&i| &self.nodes[i])
	}

	/// Node visual by id, mutably.
	pub fn node_mut(&mut self, id: &str) -> Option<&mut NodeVisual> {
		self.node_index.get(id).map(|&i| &mut self.nodes[i])
	}

	/// Edge visual by id.
	pub fn edge(&self, id: &str) -> Option<&EdgeVisual> {
		self.edge_index.get(id).map(|&i| &self.edges[i])
	}

	/// Edge visual by id, mutably.
	pub fn edge_mut(&mut self, id: &str) -> Option<&mut EdgeVisual> {
		self.edge_index.get(id).map(|&i| &mut self.edges[i])
	}

	/// Camera controls.
	pub fn camera(&self) -> &CameraController {
		&self.camera
	}

	/// Camera controls, mutably.
	pub fn camera_mut(&mut self) -> &mut CameraController {
		&mut self.camera
	}

	/// Points the camera at the given nodes, or at all nodes when `ids` is
	/// `None` or empty. Unknown ids are ignored; if nothing matches the camera
	/// stays put. Returns true when the camera was moved.
	pub fn center_graph(&mut self, store: &GraphStore, ids: Option<&[String]>, viewport: Viewport) -> bool {
		let selected: Vec<(Vec3, f32)> = store
			.nodes()
			.iter()
			.filter(|n| match ids {
				Some(ids) if !ids.is_empty() => ids.iter().any(|id| *id == n.id),
				_ => true,
			})
			.map(|n| (store.node_position(&n.id), n.size))
			.collect();
		let Some((min, max)) = bounds(selected.iter().map(|(p, _)| *p)) else {
			return false;
		};
		let center = (min + max) * 0.5;
		let radius = selected
			.iter()
			.map(|(p, size)| p.distance(center) + size)
			.fold(0.0, f32::max);
		self.camera
			.fit(center, radius, viewport.aspect(), !self.config.animated);
		true
	}

	/// The entity under a canvas point. Nodes win over edges; among several
	/// candidates the one nearest the camera wins.
	pub fn hit_test(&self, x: f64, y: f64, viewport: Viewport) -> Option<HitTarget> {
		let camera = self.camera.camera();

		let node_hit = self
			.nodes
			.iter()
			.filter_map(|node| {
				let p = camera.project(node.position(), viewport)?;
				let radius = node.size() as f64 * camera.pixels_per_unit(p.depth, viewport);
				let d = ((x - p.x).powi(2) + (y - p.y).powi(2)).sqrt();
				(d <= radius + NODE_PICK_SLOP).then_some((p.depth, node.id()))
			})
			.min_by(|a, b| a.0.total_cmp(&b.0));
		if let Some((_, id)) = node_hit {
			return Some(HitTarget::Node(id.to_string()));
		}

		self.edges
			.iter()
			.filter(|edge| edge.line().opacity() >= PICK_MIN_OPACITY && !edge.line().geometry().is_empty())
			.filter_map(|edge| {
				let curve = edge.line().curve();
				let mid = camera.project(curve.point_at(0.5), viewport)?;
				let screen: Vec<(f64, f64)> = curve
					.spaced_points(PICK_SAMPLES)
					.into_iter()
					.filter_map(|p| camera.project(p, viewport))
					.map(|p| (p.x, p.y))
					.collect();
				let d = distance_to_polyline(x, y, &screen)?;
				let half_width = edge.line().props().size as f64 / 2.0
					* camera.pixels_per_unit(mid.depth, viewport);
				(d <= half_width.max(EDGE_PICK_SLOP)).then_some((mid.depth, edge.id()))
			})
			.min_by(|a, b| a.0.total_cmp(&b.0))
			.map(|(_, id)| HitTarget::Edge(id.to_string()))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::graph_scene::store::tests::{internal_edge, internal_node, two_node_store};

	fn still() -> GraphSceneConfig {
		GraphSceneConfig {
			animated: false,
			..GraphSceneConfig::default()
		}
	}

	fn viewport() -> Viewport {
		Viewport::new(800.0, 600.0)
	}

	#[test]
	fn sync_mirrors_store_ids() {
		let mut store = two_node_store();
		let mut scene = GraphScene::new(still());
		assert!(scene.sync(&store));
		assert!(!scene.sync(&store));
		assert_eq!(scene.nodes().len(), 2);
		assert_eq!(scene.edges().len(), 1);

		store.set_graph(
			vec![
				internal_node("a", Vec3::ZERO),
				internal_node("c", Vec3::new(0.0, 40.0, 0.0)),
			],
			vec![internal_edge("a", "c")],
		);
		assert!(scene.sync(&store));
		let ids: Vec<&str> = scene.nodes().iter().map(|n| n.id()).collect();
		assert_eq!(ids, vec!["a", "c"]);
		assert!(scene.edge("a-b").is_none());
		assert!(scene.edge("a-c").is_some());
		assert_eq!(scene.node("a").unwrap().position(), Vec3::ZERO);
	}

	#[test]
	fn kept_visuals_animate_from_where_they_were() {
		let mut store = two_node_store();
		let mut scene = GraphScene::new(GraphSceneConfig::default());
		scene.sync(&store);
		while scene.tick(1.0 / 30.0) {}
		assert_eq!(scene.node("a").unwrap().position(), Vec3::new(-50.0, 0.0, 0.0));

		store.set_graph(
			vec![
				internal_node("a", Vec3::new(-50.0, 100.0, 0.0)),
				internal_node("b", Vec3::new(50.0, 0.0, 0.0)),
			],
			vec![internal_edge("a", "b")],
		);
		scene.sync(&store);
		assert_eq!(scene.node("a").unwrap().position(), Vec3::new(-50.0, 0.0, 0.0));
		scene.tick(1.0 / 60.0);
		let y = scene.node("a").unwrap().position().y;
		assert!(y > 0.0 && y < 100.0);
	}

	#[test]
	fn center_graph_on_all_or_subset() {
		let mut store = GraphStore::new();
		store.set_graph(
			vec![
				internal_node("a", Vec3::new(0.0, 0.0, 0.0)),
				internal_node("b", Vec3::new(100.0, 0.0, 0.0)),
				internal_node("c", Vec3::new(100.0, 200.0, 0.0)),
			],
			vec![],
		);
		let mut scene = GraphScene::new(still());
		scene.sync(&store);

		assert!(scene.center_graph(&store, None, viewport()));
		assert_eq!(scene.camera().camera().target, Vec3::new(50.0, 100.0, 0.0));
		let all_distance = scene.camera().camera().distance();

		let subset = ["b".to_string(), "c".to_string(), "nope".to_string()];
		assert!(scene.center_graph(&store, Some(subset.as_slice()), viewport()));
		assert_eq!(scene.camera().camera().target, Vec3::new(100.0, 100.0, 0.0));
		assert!(scene.camera().camera().distance() < all_distance);

		assert!(scene.center_graph(&store, Some(&[] as &[String]), viewport()));
		assert_eq!(scene.camera().camera().target, Vec3::new(50.0, 100.0, 0.0));

		assert!(!scene.center_graph(&store, Some(&["nope".to_string()][..]), viewport()));
		assert_eq!(scene.camera().camera().target, Vec3::new(50.0, 100.0, 0.0));
	}

	#[test]
	fn picks_nodes_before_edges() {
		let store = two_node_store();
		let mut scene = GraphScene::new(still());
		scene.sync(&store);
		scene.center_graph(&store, None, viewport());
		let camera = scene.camera().camera();

		let a = camera.project(Vec3::new(-50.0, 0.0, 0.0), viewport()).unwrap();
		assert_eq!(scene.hit_test(a.x, a.y, viewport()), Some(HitTarget::Node("a".into())));

		let mid = camera.project(Vec3::ZERO, viewport()).unwrap();
		assert_eq!(scene.hit_test(mid.x, mid.y, viewport()), Some(HitTarget::Edge("a-b".into())));

		assert_eq!(scene.hit_test(mid.x, mid.y + 100.0, viewport()), None);
	}
}
