//! The graph handle: host data loaded into a `force_graph` simulation graph,
//! plus the transform into render-ready nodes and edges.

use std::collections::{HashMap, HashSet};

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};
use glam::Vec3;
use log::warn;

use super::config::GraphSceneConfig;
use super::theme::{Color, cluster_color};
use super::types::{GraphData, InternalGraphEdge, InternalGraphNode};

/// User data stored on each simulation node.
#[derive(Clone, Debug, Default)]
pub struct NodeMeta {
	/// Host id.
	pub id: String,
}

/// An edge known to the handle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EdgeLink {
	/// Host edge id.
	pub id: String,
	/// Source node id.
	pub source: String,
	/// Target node id.
	pub target: String,
}

/// Graph structure handle, exposed to hosts for inspection.
pub struct GraphHandle {
	graph: ForceGraph<NodeMeta, ()>,
	index: HashMap<String, DefaultNodeIdx>,
	order: Vec<String>,
	edges: Vec<EdgeLink>,
}

impl GraphHandle {
	/// Loads host data. Duplicate node ids and edges with unknown endpoints are dropped.
	pub fn build(data: &GraphData) -> Self {
		let mut graph = ForceGraph::new(SimulationParameters {
			force_charge: 150.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
		});
		let mut index = HashMap::new();
		let mut order = Vec::with_capacity(data.nodes.len());
		let mut edges = Vec::with_capacity(data.edges.len());

		for node in &data.nodes {
			if index.contains_key(&node.id) {
				warn!("graph: duplicate node id {:?} ignored", node.id);
				continue;
			}
			let idx = graph.add_node(NodeData {
				x: 0.0,
				y: 0.0,
				mass: 10.0,
				is_anchor: false,
				user_data: NodeMeta {
					id: node.id.clone(),
				},
			});
			index.insert(node.id.clone(), idx);
			order.push(node.id.clone());
		}

		let mut seen = HashSet::new();
		for edge in &data.edges {
			let (Some(&src), Some(&tgt)) = (index.get(&edge.source), index.get(&edge.target))
			else {
				warn!(
					"graph: edge {:?} references a missing node ({:?} -> {:?})",
					edge.id, edge.source, edge.target
				);
				continue;
			};
			if !seen.insert(edge.id.clone()) {
				warn!("graph: duplicate edge id {:?} ignored", edge.id);
				continue;
			}
			// Self loops carry no layout force.
			if src != tgt {
				graph.add_edge(src, tgt, EdgeData::default());
			}
			edges.push(EdgeLink {
				id: edge.id.clone(),
				source: edge.source.clone(),
				target: edge.target.clone(),
			});
		}

		Self {
			graph,
			index,
			order,
			edges,
		}
	}

	/// Number of nodes.
	pub fn node_count(&self) -> usize {
		self.order.len()
	}

	/// Number of edges.
	pub fn edge_count(&self) -> usize {
		self.edges.len()
	}

	/// True if `id` is a node of the graph.
	pub fn has_node(&self, id: &str) -> bool {
		self.index.contains_key(id)
	}

	/// Node ids in insertion order.
	pub fn node_ids(&self) -> &[String] {
		&self.order
	}

	/// Edges in insertion order.
	pub fn edges(&self) -> &[EdgeLink] {
		&self.edges
	}

	/// Number of edges touching `id`. Self loops count twice.
	pub fn degree(&self, id: &str) -> usize {
		self.edges
			.iter()
			.map(|e| (e.source == id) as usize + (e.target == id) as usize)
			.sum()
	}

	/// Nodes sharing an edge with `id`, in edge order, without repeats.
	pub fn neighbors(&self, id: &str) -> Vec<String> {
		let mut out: Vec<String> = Vec::new();
		for e in &self.edges {
			let other = if e.source == id {
				&e.target
			} else if e.target == id {
				&e.source
			} else {
				continue;
			};
			if other != id && !out.contains(other) {
				out.push(other.clone());
			}
		}
		out
	}

	/// Ids of the edges touching `id`.
	pub fn edges_of<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a str> + 'a {
		self.edges
			.iter()
			.filter(move |e| e.source == id || e.target == id)
			.map(|e| e.id.as_str())
	}

	/// Current simulation positions (z = 0).
	pub fn positions(&self) -> HashMap<String, Vec3> {
		let mut out = HashMap::with_capacity(self.order.len());
		self.graph.visit_nodes(|node| {
			out.insert(
				node.data.user_data.id.clone(),
				Vec3::new(node.x(), node.y(), 0.0),
			);
		});
		out
	}

	/// Moves a node in the simulation. Only `x` and `y` are kept.
	pub fn set_position(&mut self, id: &str, position: Vec3) {
		let Some(&idx) = self.index.get(id) else {
			return;
		};
		self.graph.visit_nodes_mut(|node| {
			if node.index() == idx {
				node.data.x = position.x;
				node.data.y = position.y;
			}
		});
	}

	/// Places every node on a circle of `radius` around the origin, in insertion order.
	pub fn seed_circle(&mut self, radius: f32) {
		let n = self.order.len().max(1) as f32;
		let slots: HashMap<DefaultNodeIdx, usize> = self
			.order
			.iter()
			.enumerate()
			.filter_map(|(i, id)| self.index.get(id).map(|&idx| (idx, i)))
			.collect();
		self.graph.visit_nodes_mut(|node| {
			let i = slots.get(&node.index()).copied().unwrap_or(0) as f32;
			let angle = i * std::f32::consts::TAU / n;
			node.data.x = radius * angle.cos();
			node.data.y = radius * angle.sin();
		});
	}

	/// Runs the force simulation for `iterations` steps of `dt` seconds.
	pub fn simulate(&mut self, iterations: usize, dt: f32) {
		for _ in 0..iterations {
			self.graph.update(dt);
		}
	}

	/// The underlying simulation graph.
	pub fn inner(&self) -> &ForceGraph<NodeMeta, ()> {
		&self.graph
	}
}

/// Resolves a node fill: a valid host colour, else the cluster palette, else the theme.
fn resolve_fill(fill: Option<&str>, cluster: Option<&str>, theme_fill: &str) -> String {
	if let Some(fill) = fill.filter(|f| Color::parse(f).is_some()) {
		return fill.to_string();
	}
	if let Some(cluster) = cluster {
		return cluster_color(cluster).to_string();
	}
	theme_fill.to_string()
}

/// Builds render-ready nodes and edges from host data, positions and sizes.
///
/// Only nodes and edges accepted by `handle` are produced. Nodes without a
/// position sit at the origin.
pub fn transform_graph(
	data: &GraphData,
	handle: &GraphHandle,
	positions: &HashMap<String, Vec3>,
	sizes: &HashMap<String, f32>,
	config: &GraphSceneConfig,
) -> (Vec<InternalGraphNode>, Vec<InternalGraphEdge>) {
	let by_id: HashMap<&str, _> = data.nodes.iter().rev().map(|n| (n.id.as_str(), n)).collect();
	let nodes = handle
		.node_ids()
		.iter()
		.filter_map(|id| by_id.get(id.as_str()))
		.map(|node| InternalGraphNode {
			id: node.id.clone(),
			label: node.label.clone(),
			sub_label: node.sub_label.clone(),
			fill: resolve_fill(
				node.fill.as_deref(),
				node.cluster.as_deref(),
				&config.theme.node.fill,
			),
			size: sizes
				.get(&node.id)
				.copied()
				.unwrap_or(config.default_node_size),
			cluster: node.cluster.clone(),
			position: positions.get(&node.id).copied().unwrap_or(Vec3::ZERO),
			data: node.data.clone(),
		})
		.collect();

	let edge_by_id: HashMap<&str, _> = data.edges.iter().rev().map(|e| (e.id.as_str(), e)).collect();
	let edges = handle
		.edges()
		.iter()
		.filter_map(|link| edge_by_id.get(link.id.as_str()))
		.map(|edge| InternalGraphEdge {
			id: edge.id.clone(),
			source: edge.source.clone(),
			target: edge.target.clone(),
			label: edge.label.clone(),
			fill: edge.fill.clone().filter(|f| Color::parse(f).is_some()),
			size: edge.size.unwrap_or(config.default_edge_size),
			interpolation: edge.interpolation.unwrap_or(config.edge_interpolation),
		})
		.collect();

	(nodes, edges)
}
