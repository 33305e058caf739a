use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec3;
use leptos::prelude::*;
use log::info;

use super::camera::Viewport;
use super::config::GraphSceneConfig;
use super::graph::{GraphHandle, transform_graph};
use super::interaction::{HitTarget, PointerButton, PointerEvent, PressState};
use super::layout::layout_graph;
use super::scene::{GraphScene, SceneEvent};
use super::sizing::node_sizes;
use super::store::GraphStore;
use super::types::GraphData;

/// Wheel zoom step.
const ZOOM_STEP: f32 = 1.1;

/// Everything the canvas component shares between its frame loop and its listeners.
pub struct GraphState {
	pub graph: GraphHandle,
	pub store: GraphStore,
	pub scene: GraphScene,
	pub viewport: Viewport,
	pub animation_running: bool,
	data: GraphData,
	press: Option<PressState>,
	/// Node position minus the grab point, fixed when a drag starts.
	drag_offset: Vec3,
}

impl GraphState {
	pub fn new(data: &GraphData, config: GraphSceneConfig, viewport: Viewport) -> Self {
		let mut state = Self {
			graph: GraphHandle::build(&GraphData::default()),
			store: GraphStore::new(),
			scene: GraphScene::new(config),
			viewport,
			animation_running: true,
			data: GraphData::default(),
			press: None,
			drag_offset: Vec3::ZERO,
		};
		state.set_data(data.clone());
		state
	}

	/// Loads new host data: layout, sizing and transform, then recentre.
	pub fn set_data(&mut self, data: GraphData) {
		let config = self.scene.config().clone();
		let mut graph = GraphHandle::build(&data);
		let positions = layout_graph(&mut graph, config.layout_type);
		let sizes = node_sizes(&data, &graph, &config);
		let (nodes, edges) = transform_graph(&data, &graph, &positions, &sizes, &config);
		info!(
			"graph-scene: built graph with {} nodes, {} edges",
			nodes.len(),
			edges.len()
		);
		self.store.set_graph(nodes, edges);
		self.graph = graph;
		self.data = data;

		// A press survives the reload only while its target does
		let store = &self.store;
		self.press = self.press.take().filter(|press| match &press.target {
			Some(HitTarget::Node(id)) => store.node(id).is_some(),
			Some(HitTarget::Edge(id)) => store.edge(id).is_some(),
			None => true,
		});
		if let Some(id) = self.store.hovered_node().map(str::to_string) {
			let related = self.related_ids(&id);
			self.store.set_hovered_node(Some(id), related);
		}
		self.scene.sync(&self.store);
		self.scene.center_graph(&self.store, None, self.viewport);
	}

	/// Applies a new configuration. Layout and sizing depend on it, so the data is rebuilt.
	pub fn set_config(&mut self, config: GraphSceneConfig) {
		if *self.scene.config() == config {
			return;
		}
		self.scene.set_config(config);
		let data = std::mem::take(&mut self.data);
		self.set_data(data);
	}

	pub fn center_graph(&mut self, ids: Option<&[String]>) -> bool {
		self.scene.center_graph(&self.store, ids, self.viewport)
	}

	pub fn tick(&mut self, dt: f32) -> bool {
		self.scene.sync(&self.store);
		self.scene.tick(dt)
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.viewport = Viewport::new(width, height);
	}

	pub fn pointer_down(&mut self, mut event: PointerEvent) -> Vec<SceneEvent> {
		let mut events = Vec::new();
		let target = self.scene.hit_test(event.x, event.y, self.viewport);
		match &target {
			Some(HitTarget::Node(id)) => {
				if let Some(node) = self.scene.node(id) {
					if node.pointer_down(&mut event).is_some() {
						events.push(SceneEvent::NodeContextMenu(id.clone()));
					}
				}
			}
			Some(HitTarget::Edge(id)) => {
				if let Some(edge) = self.scene.edge(id) {
					if edge.line().pointer_down(&mut event).is_some() {
						events.push(SceneEvent::EdgeContextMenu(id.clone()));
					}
				}
			}
			None => {}
		}
		self.press = (!event.propagation_stopped()).then(|| PressState::new(target, &event));
		events
	}

	pub fn pointer_move(&mut self, x: f64, y: f64) -> Vec<SceneEvent> {
		if self.press.is_none() {
			return self.update_hover(x, y);
		}
		let Some(press) = self.press.as_mut() else {
			return Vec::new();
		};
		let (dx, dy) = press.track(x, y);
		if !press.moved {
			return Vec::new();
		}

		let mut events = Vec::new();
		let (start_x, start_y) = press.start;
		match (&press.target, press.button) {
			(Some(HitTarget::Node(id)), PointerButton::Primary) => {
				let id = id.clone();
				let anchor = self.store.node_position(&id);
				let camera = self.scene.camera().camera();
				if self.store.dragging_id() != Some(id.as_str()) {
					self.drag_offset = camera
						.unproject_on_plane(start_x, start_y, anchor, self.viewport)
						.map(|grab| anchor - grab)
						.unwrap_or(Vec3::ZERO);
					self.store.set_dragging(Some(id.clone()));
					events.push(SceneEvent::NodeDragStart(id.clone()));
				}
				if let Some(position) = camera.unproject_on_plane(x, y, anchor, self.viewport) {
					self.store.set_drag(&id, position + self.drag_offset);
				}
			}
			(_, PointerButton::Primary) => {
				self.scene.camera_mut().drag(dx, dy, self.viewport);
			}
			_ => {}
		}
		events
	}

	pub fn pointer_up(&mut self, event: PointerEvent) -> Vec<SceneEvent> {
		let mut events = Vec::new();
		let press = self.press.take();

		if let Some(id) = self.store.dragging_id().map(str::to_string) {
			let position = self.store.node_position(&id);
			self.graph.set_position(&id, position);
			self.store.set_dragging(None);
			events.push(SceneEvent::NodeDragEnd { id, position });
			return events;
		}
		let Some(press) = press else {
			return events;
		};
		if press.moved {
			return events;
		}

		let target = self.scene.hit_test(event.x, event.y, self.viewport);
		if target != press.target {
			return events;
		}
		match target {
			Some(HitTarget::Node(id)) => {
				if self.scene.node(&id).and_then(|n| n.click(&event)).is_some() {
					events.push(SceneEvent::NodeClick(id));
				}
			}
			Some(HitTarget::Edge(id)) => {
				if self.scene.edge(&id).and_then(|e| e.line().click(&event)).is_some() {
					events.push(SceneEvent::EdgeClick(id));
				}
			}
			None if event.button == PointerButton::Primary => events.push(SceneEvent::CanvasClick),
			None => {}
		}
		events
	}

	pub fn pointer_leave(&mut self) -> Vec<SceneEvent> {
		let mut events = Vec::new();
		if let Some((x, y)) = self.press.as_ref().map(|p| p.last) {
			events.extend(self.pointer_up(PointerEvent::new(x, y, PointerButton::Other(-1))));
		}
		events.extend(self.set_hover(None));
		events
	}

	pub fn wheel(&mut self, delta_y: f64) {
		let factor = if delta_y > 0.0 { ZOOM_STEP } else { 1.0 / ZOOM_STEP };
		self.scene.camera_mut().zoom(factor);
	}

	fn update_hover(&mut self, x: f64, y: f64) -> Vec<SceneEvent> {
		let target = self.scene.hit_test(x, y, self.viewport);
		self.set_hover(target)
	}

	fn set_hover(&mut self, target: Option<HitTarget>) -> Vec<SceneEvent> {
		let mut events = Vec::new();
		let hovered_node = match &target {
			Some(HitTarget::Node(id)) => Some(id.clone()),
			_ => None,
		};
		let hovered_edge = match &target {
			Some(HitTarget::Edge(id)) => Some(id.clone()),
			_ => None,
		};

		if let Some(old) = self.store.hovered_node().map(str::to_string) {
			if hovered_node.as_ref() != Some(&old) {
				if let Some(node) = self.scene.node_mut(&old) {
					node.pointer_out();
				}
				events.push(SceneEvent::NodePointerOut(old));
			}
		}
		if let Some(old) = self.store.hovered_edge().map(str::to_string) {
			if hovered_edge.as_ref() != Some(&old) {
				if let Some(edge) = self.scene.edge_mut(&old) {
					edge.line_mut().pointer_out();
				}
				events.push(SceneEvent::EdgePointerOut(old));
			}
		}
		if let Some(id) = &hovered_node {
			if self.scene.node_mut(id).and_then(|n| n.pointer_over()).is_some() {
				events.push(SceneEvent::NodePointerOver(id.clone()));
			}
		}
		if let Some(id) = &hovered_edge {
			if self
				.scene
				.edge_mut(id)
				.and_then(|e| e.line_mut().pointer_over())
				.is_some()
			{
				events.push(SceneEvent::EdgePointerOver(id.clone()));
			}
		}

		let related = hovered_node
			.as_deref()
			.map(|id| self.related_ids(id))
			.unwrap_or_default();
		self.store.set_hovered_node(hovered_node, related);
		self.store.set_hovered_edge(hovered_edge);
		events
	}

	/// Neighbour and incident edge ids of a node.
	fn related_ids(&self, id: &str) -> Vec<String> {
		self.graph
			.neighbors(id)
			.into_iter()
			.chain(self.graph.edges_of(id).map(str::to_string))
			.collect()
	}
}

/// Imperative handle to a mounted graph scene.
///
/// Create one, pass it to the canvas component, and use it afterwards to
/// recentre the camera or inspect the graph. Calls made before the component
/// mounts are no-ops.
///
/// The handle is `Copy` and `Send`, so it can be captured by views and
/// callbacks like any signal. The state itself stays on the creating thread.
#[derive(Clone, Copy)]
pub struct GraphSceneHandle {
	state: StoredValue<Rc<RefCell<Option<GraphState>>>, LocalStorage>,
}

impl Default for GraphSceneHandle {
	fn default() -> Self {
		Self::new()
	}
}

impl GraphSceneHandle {
	/// An unattached handle.
	pub fn new() -> Self {
		Self {
			state: StoredValue::new_local(Rc::new(RefCell::new(None))),
		}
	}

	/// The shared state cell. A disposed handle yields a fresh, empty cell.
	pub(crate) fn cell(&self) -> Rc<RefCell<Option<GraphState>>> {
		self.state.try_get_value().unwrap_or_default()
	}

	/// True once a component has mounted with this handle.
	pub fn is_mounted(&self) -> bool {
		self.cell().try_borrow().is_ok_and(|state| state.is_some())
	}

	/// Centres the camera on `ids`, or on every node for `None` or an empty list.
	pub fn center_graph(&self, ids: Option<&[String]>) -> bool {
		let cell = self.cell();
		let Ok(mut state) = cell.try_borrow_mut() else {
			return false;
		};
		state.as_mut().is_some_and(|s| s.center_graph(ids))
	}

	/// Runs `f` against the graph structure.
	pub fn with_graph<R>(&self, f: impl FnOnce(&GraphHandle) -> R) -> Option<R> {
		let cell = self.cell();
		let state = cell.try_borrow().ok()?;
		state.as_ref().map(|s| f(&s.graph))
	}

	/// Runs `f` against the store.
	pub fn with_store<R>(&self, f: impl FnOnce(&GraphStore) -> R) -> Option<R> {
		let cell = self.cell();
		let state = cell.try_borrow().ok()?;
		state.as_ref().map(|s| f(&s.store))
	}
}
