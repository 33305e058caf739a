//! Graph data structures: host input and the render-ready derived forms.

use glam::Vec3;
use serde::Deserialize;

/// A node supplied by the host application.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct GraphNode {
	/// Unique identifier. Edges reference nodes by this id.
	pub id: String,
	/// Optional display label.
	#[serde(default)]
	pub label: Option<String>,
	/// Optional secondary label drawn under the main one.
	#[serde(default, alias = "subLabel")]
	pub sub_label: Option<String>,
	/// Optional CSS hex colour override (e.g. `"#ff0000"`).
	#[serde(default)]
	pub fill: Option<String>,
	/// Optional explicit size, used by the `Default` sizing type.
	#[serde(default)]
	pub size: Option<f32>,
	/// Optional cluster name. Clustered nodes without a fill take a palette colour.
	#[serde(default)]
	pub cluster: Option<String>,
	/// Arbitrary host attributes, read by attribute sizing.
	#[serde(default)]
	pub data: Option<serde_json::Value>,
}

/// An edge supplied by the host application.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct GraphEdge {
	/// Unique identifier.
	pub id: String,
	/// Source node id.
	pub source: String,
	/// Target node id.
	pub target: String,
	/// Optional display label.
	#[serde(default)]
	pub label: Option<String>,
	/// Optional CSS hex colour override.
	#[serde(default)]
	pub fill: Option<String>,
	/// Optional tube thickness.
	#[serde(default)]
	pub size: Option<f32>,
	/// Optional per-edge interpolation, overriding the scene default.
	#[serde(default)]
	pub interpolation: Option<EdgeInterpolation>,
}

/// Complete host graph: nodes and edges.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct GraphData {
	/// Nodes of the graph.
	#[serde(default)]
	pub nodes: Vec<GraphNode>,
	/// Edges of the graph. `links` is accepted for force-graph style payloads.
	#[serde(default, alias = "links")]
	pub edges: Vec<GraphEdge>,
}

/// A render-ready node with computed position, size and colour.
#[derive(Clone, Debug, PartialEq)]
pub struct InternalGraphNode {
	/// Host id.
	pub id: String,
	/// Display label.
	pub label: Option<String>,
	/// Secondary label.
	pub sub_label: Option<String>,
	/// Resolved `#rrggbb` fill.
	pub fill: String,
	/// Resolved size (sphere radius in world units).
	pub size: f32,
	/// Cluster name, if any.
	pub cluster: Option<String>,
	/// Layout position.
	pub position: Vec3,
	/// Host attributes.
	pub data: Option<serde_json::Value>,
}

/// A render-ready edge.
#[derive(Clone, Debug, PartialEq)]
pub struct InternalGraphEdge {
	/// Host id.
	pub id: String,
	/// Source node id.
	pub source: String,
	/// Target node id.
	pub target: String,
	/// Display label.
	pub label: Option<String>,
	/// Resolved `#rrggbb` fill, if the host overrode the theme.
	pub fill: Option<String>,
	/// Resolved tube thickness.
	pub size: f32,
	/// Resolved interpolation.
	pub interpolation: EdgeInterpolation,
}

/// Whether edges are drawn straight or as arcs.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EdgeInterpolation {
	/// Straight segment.
	#[default]
	Linear,
	/// Quadratic arc through an offset midpoint.
	Curved,
}

/// Where edge arrows are drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EdgeArrowPosition {
	/// No arrow.
	None,
	/// Arrow at the middle of the edge.
	Mid,
	/// Arrow touching the target node.
	#[default]
	End,
}

/// Where edge labels sit relative to the edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EdgeLabelPosition {
	/// Centred on the edge, rotated along it.
	#[default]
	Natural,
	/// Offset above the edge.
	Above,
	/// Offset below the edge.
	Below,
	/// Centred on the edge with a background plate.
	Inline,
}

/// Which labels are drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LabelVisibilityType {
	/// Every node and edge label.
	All,
	/// Emphasised entities and nodes large enough on screen.
	#[default]
	Auto,
	/// No labels.
	None,
	/// Node labels only.
	Nodes,
	/// Edge labels only.
	Edges,
}

/// Initial layout algorithm.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LayoutType {
	/// Force simulation in the z = 0 plane.
	#[default]
	ForceDirected2d,
	/// Nodes evenly spaced on a circle in the z = 0 plane.
	Circular2d,
}

/// How node sizes are derived.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SizingType {
	/// Every node gets the default size.
	None,
	/// The node's own `size`, falling back to the default size.
	#[default]
	Default,
	/// Degree centrality scaled into the min/max range.
	Centrality,
	/// A numeric attribute of `data` scaled into the min/max range.
	Attribute,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn graph_data_accepts_links_and_camel_case() {
		let json = r##"{
			"nodes": [
				{ "id": "a", "label": "A", "subLabel": "first", "data": { "weight": 3 } },
				{ "id": "b", "fill": "#ff0000", "cluster": "x" }
			],
			"links": [
				{ "id": "a-b", "source": "a", "target": "b", "interpolation": "curved" }
			]
		}"##;
		let data: GraphData = serde_json::from_str(json).unwrap();
		assert_eq!(data.nodes.len(), 2);
		assert_eq!(data.nodes[0].sub_label.as_deref(), Some("first"));
		assert_eq!(data.nodes[1].fill.as_deref(), Some("#ff0000"));
		assert_eq!(data.edges[0].interpolation, Some(EdgeInterpolation::Curved));
	}
}
