//! Shared graph store: the single owner of render-ready graph state.
//!
//! Every mutation bumps a revision counter. The scene compares revisions each
//! frame and reconciles its visuals only when something changed.

use std::collections::{HashMap, HashSet};

use glam::Vec3;

use super::types::{InternalGraphEdge, InternalGraphNode};

/// Graph state shared by the scene, the interaction handlers and the host.
#[derive(Clone, Debug, Default)]
pub struct GraphStore {
	nodes: Vec<InternalGraphNode>,
	node_index: HashMap<String, usize>,
	edges: Vec<InternalGraphEdge>,
	edge_index: HashMap<String, usize>,
	dragging_id: Option<String>,
	drags: HashMap<String, Vec3>,
	hovered_node: Option<String>,
	hovered_edge: Option<String>,
	hover_set: HashSet<String>,
	selections: Vec<String>,
	actives: Vec<String>,
	revision: u64,
}

impl GraphStore {
	/// An empty store.
	pub fn new() -> Self {
		Self::default()
	}

	/// Replaces the graph. Drag overrides and hover state of vanished nodes are dropped.
	pub fn set_graph(&mut self, nodes: Vec<InternalGraphNode>, edges: Vec<InternalGraphEdge>) {
		self.node_index = nodes
			.iter()
			.enumerate()
			.map(|(i, n)| (n.id.clone(), i))
			.collect();
		self.edge_index = edges
			.iter()
			.enumerate()
			.map(|(i, e)| (e.id.clone(), i))
			.collect();
		self.nodes = nodes;
		self.edges = edges;

		let index = &self.node_index;
		self.drags.retain(|id, _| index.contains_key(id));
		if self.dragging_id.as_ref().is_some_and(|id| !index.contains_key(id)) {
			self.dragging_id = None;
		}
		if self.hovered_node.as_ref().is_some_and(|id| !index.contains_key(id)) {
			self.hovered_node = None;
			self.hover_set.clear();
		}
		if self
			.hovered_edge
			.as_ref()
			.is_some_and(|id| !self.edge_index.contains_key(id))
		{
			self.hovered_edge = None;
		}
		self.bump();
	}

	/// Render-ready nodes in host order.
	pub fn nodes(&self) -> &[InternalGraphNode] {
		&self.nodes
	}

	/// Render-ready edges in host order.
	pub fn edges(&self) -> &[InternalGraphEdge] {
		&self.edges
	}

	/// Node ids in host order.
	pub fn node_ids(&self) -> impl Iterator<Item = &str> {
		self.nodes.iter().map(|n| n.id.as_str())
	}

	/// Edge ids in host order.
	pub fn edge_ids(&self) -> impl Iterator<Item = &str> {
		self.edges.iter().map(|e| e.id.as_str())
	}

	/// Looks up a node.
	pub fn node(&self, id: &str) -> Option<&InternalGraphNode> {
		self.node_index.get(id).map(|&i| &self.nodes[i])
	}

	/// Looks up an edge.
	pub fn edge(&self, id: &str) -> Option<&InternalGraphEdge> {
		self.edge_index.get(id).map(|&i| &self.edges[i])
	}

	/// Where a node currently is: its drag position, else its layout position,
	/// else the origin for unknown ids.
	pub fn node_position(&self, id: &str) -> Vec3 {
		self.drags
			.get(id)
			.copied()
			.or_else(|| self.node(id).map(|n| n.position))
			.unwrap_or(Vec3::ZERO)
	}

	/// Size of a node, zero for unknown ids.
	pub fn node_size(&self, id: &str) -> f32 {
		self.node(id).map(|n| n.size).unwrap_or(0.0)
	}

	/// Node being dragged, if any.
	pub fn dragging_id(&self) -> Option<&str> {
		self.dragging_id.as_deref()
	}

	/// True while a drag is in progress.
	pub fn is_dragging(&self) -> bool {
		self.dragging_id.is_some()
	}

	/// Starts or ends a drag.
	pub fn set_dragging(&mut self, id: Option<String>) {
		if self.dragging_id != id {
			self.dragging_id = id;
			self.bump();
		}
	}

	/// Records a dragged node's position.
	pub fn set_drag(&mut self, id: &str, position: Vec3) {
		if self.node_index.contains_key(id) {
			self.drags.insert(id.to_string(), position);
			self.bump();
		}
	}

	/// Drag overrides by node id.
	pub fn drags(&self) -> &HashMap<String, Vec3> {
		&self.drags
	}

	/// Hovered node, if any.
	pub fn hovered_node(&self) -> Option<&str> {
		self.hovered_node.as_deref()
	}

	/// Hovered edge, if any.
	pub fn hovered_edge(&self) -> Option<&str> {
		self.hovered_edge.as_deref()
	}

	/// Sets the hovered node and the ids emphasised along with it.
	pub fn set_hovered_node(&mut self, id: Option<String>, related: impl IntoIterator<Item = String>) {
		let mut hover_set = HashSet::new();
		if let Some(id) = &id {
			hover_set.insert(id.clone());
			hover_set.extend(related);
		}
		if self.hovered_node == id && self.hover_set == hover_set {
			return;
		}
		self.hover_set = hover_set;
		self.hovered_node = id;
		self.bump();
	}

	/// Sets the hovered edge.
	pub fn set_hovered_edge(&mut self, id: Option<String>) {
		if self.hovered_edge != id {
			self.hovered_edge = id;
			self.bump();
		}
	}

	/// Replaces the selected ids.
	pub fn set_selections(&mut self, ids: Vec<String>) {
		if self.selections != ids {
			self.selections = ids;
			self.bump();
		}
	}

	/// Replaces the active ids.
	pub fn set_actives(&mut self, ids: Vec<String>) {
		if self.actives != ids {
			self.actives = ids;
			self.bump();
		}
	}

	/// Selected ids.
	pub fn selections(&self) -> &[String] {
		&self.selections
	}

	/// Active ids.
	pub fn actives(&self) -> &[String] {
		&self.actives
	}

	/// True when any entity is selected, active or hover-highlighted.
	pub fn has_emphasis(&self) -> bool {
		!self.selections.is_empty() || !self.actives.is_empty() || !self.hover_set.is_empty()
	}

	/// True when `id` is selected, active or in the hover set.
	pub fn is_emphasized(&self, id: &str) -> bool {
		self.selections.iter().any(|s| s == id)
			|| self.actives.iter().any(|s| s == id)
			|| self.hover_set.contains(id)
	}

	/// True when `id` should take the active colour.
	pub fn is_active(&self, id: &str) -> bool {
		self.hovered_node.as_deref() == Some(id)
			|| self.hovered_edge.as_deref() == Some(id)
			|| self.selections.iter().any(|s| s == id)
			|| self.actives.iter().any(|s| s == id)
	}

	/// Changes whenever the store does.
	pub fn revision(&self) -> u64 {
		self.revision
	}

	fn bump(&mut self) {
		self.revision = self.revision.wrapping_add(1);
	}
}

#[cfg(test)]
pub(crate) mod tests {
	use super::*;
	use crate::components::graph_scene::types::EdgeInterpolation;

	pub(crate) fn internal_node(id: &str, position: Vec3) -> InternalGraphNode {
		InternalGraphNode {
			id: id.into(),
			label: Some(id.into()),
			sub_label: None,
			fill: "#64b4ff".into(),
			size: 5.0,
			cluster: None,
			position,
			data: None,
		}
	}

	pub(crate) fn internal_edge(source: &str, target: &str) -> InternalGraphEdge {
		InternalGraphEdge {
			id: format!("{source}-{target}"),
			source: source.into(),
			target: target.into(),
			label: None,
			fill: None,
			size: 1.0,
			interpolation: EdgeInterpolation::Linear,
		}
	}

	pub(crate) fn two_node_store() -> GraphStore {
		let mut store = GraphStore::new();
		store.set_graph(
			vec![
				internal_node("a", Vec3::new(-50.0, 0.0, 0.0)),
				internal_node("b", Vec3::new(50.0, 0.0, 0.0)),
			],
			vec![internal_edge("a", "b")],
		);
		store
	}

	#[test]
	fn positions_prefer_drags_and_default_to_origin() {
		let mut store = two_node_store();
		assert_eq!(store.node_position("a"), Vec3::new(-50.0, 0.0, 0.0));
		store.set_drag("a", Vec3::new(1.0, 2.0, 3.0));
		assert_eq!(store.node_position("a"), Vec3::new(1.0, 2.0, 3.0));
		assert_eq!(store.node_position("missing"), Vec3::ZERO);
		store.set_drag("missing", Vec3::ONE);
		assert!(!store.drags().contains_key("missing"));
	}

	#[test]
	fn replacing_graph_drops_stale_state() {
		let mut store = two_node_store();
		store.set_drag("b", Vec3::ONE);
		store.set_dragging(Some("b".into()));
		store.set_hovered_node(Some("b".into()), ["a-b".to_string()]);
		store.set_graph(vec![internal_node("a", Vec3::ZERO)], vec![]);
		assert!(store.drags().is_empty());
		assert!(!store.is_dragging());
		assert_eq!(store.hovered_node(), None);
		assert!(!store.has_emphasis());
		assert_eq!(store.edge_ids().count(), 0);
	}

	#[test]
	fn revision_tracks_changes_only() {
		let mut store = two_node_store();
		let r = store.revision();
		store.set_selections(vec![]);
		assert_eq!(store.revision(), r);
		store.set_selections(vec!["a".into()]);
		assert_ne!(store.revision(), r);
		assert!(store.is_emphasized("a"));
		assert!(!store.is_emphasized("b"));
		assert!(store.is_active("a"));
	}

	#[test]
	fn hover_emphasises_related_ids() {
		let mut store = two_node_store();
		store.set_hovered_node(Some("a".into()), ["b".to_string(), "a-b".to_string()]);
		assert!(store.has_emphasis());
		assert!(store.is_emphasized("b"));
		assert!(store.is_emphasized("a-b"));
		assert!(store.is_active("a"));
		assert!(!store.is_active("b"));
		store.set_hovered_node(None, Vec::new());
		assert!(!store.has_emphasis());
	}

	#[test]
	fn same_hover_with_new_neighbours_refreshes_emphasis() {
		let mut store = two_node_store();
		store.set_hovered_node(Some("a".into()), ["b".to_string(), "a-b".to_string()]);
		let r = store.revision();
		store.set_hovered_node(Some("a".into()), ["a-b".to_string(), "b".to_string()]);
		assert_eq!(store.revision(), r);

		store.set_hovered_node(Some("a".into()), Vec::new());
		assert_ne!(store.revision(), r);
		assert!(store.is_emphasized("a"));
		assert!(!store.is_emphasized("b"));
		assert!(!store.is_emphasized("a-b"));
	}
}
