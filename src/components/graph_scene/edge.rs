//! Edge visuals: a [`Line`] plus its arrow and label, derived from the store.

use glam::Vec3;

use super::config::GraphSceneConfig;
use super::geometry::{DEFAULT_CURVE_OFFSET, EdgeVectors3, arrow_vectors, point_between};
use super::line::{Line, LineProps};
use super::store::GraphStore;
use super::types::{
	EdgeArrowPosition, EdgeInterpolation, EdgeLabelPosition, InternalGraphEdge, LabelVisibilityType,
};

/// Pixel gap between an edge and an above/below label.
pub const LABEL_GAP: f64 = 7.0;

/// A cone-shaped arrow along an edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Arrow {
	/// Centre of the base disc.
	pub base: Vec3,
	/// Tip.
	pub tip: Vec3,
	/// Base radius.
	pub radius: f32,
}

/// Where and how an edge label is drawn.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeLabel {
	/// Text.
	pub text: String,
	/// Anchor on the edge.
	pub anchor: Vec3,
	/// Placement relative to the edge.
	pub placement: EdgeLabelPosition,
	/// Text colour.
	pub color: String,
}

/// Screen transform for an edge label: pixel offset from the anchor and rotation.
///
/// The rotation follows the edge but is flipped so text never renders upside
/// down. Above/below labels shift perpendicular to the edge by `gap` pixels.
pub fn label_transform(
	from: (f64, f64),
	to: (f64, f64),
	placement: EdgeLabelPosition,
	gap: f64,
) -> (f64, f64, f64) {
	let (dx, dy) = (to.0 - from.0, to.1 - from.1);
	let mut angle = dy.atan2(dx);
	if angle > std::f64::consts::FRAC_PI_2 {
		angle -= std::f64::consts::PI;
	} else if angle < -std::f64::consts::FRAC_PI_2 {
		angle += std::f64::consts::PI;
	}
	// Screen-space normal pointing "up" relative to the upright text.
	let (nx, ny) = (angle.sin(), -angle.cos());
	match placement {
		EdgeLabelPosition::Above => (nx * gap, ny * gap, angle),
		EdgeLabelPosition::Below => (-nx * gap, -ny * gap, angle),
		EdgeLabelPosition::Natural => (0.0, 0.0, angle),
		EdgeLabelPosition::Inline => (0.0, 0.0, 0.0),
	}
}

/// Length of an arrow for an edge of thickness `size`.
pub fn arrow_length(size: f32) -> f32 {
	size * 2.0 + 4.0
}

/// Rendered state of one edge.
#[derive(Clone, Debug)]
pub struct EdgeVisual {
	id: String,
	source: String,
	target: String,
	line: Line,
	arrow_position: EdgeArrowPosition,
	arrow_color: String,
	label: Option<EdgeLabel>,
	label_visible: bool,
	active: bool,
}

impl EdgeVisual {
	/// Mounts the visual for `edge`.
	pub fn new(edge: &InternalGraphEdge, store: &GraphStore, config: &GraphSceneConfig) -> Self {
		let props = Self::line_props(edge, store, config);
		let mut visual = Self {
			id: edge.id.clone(),
			source: edge.source.clone(),
			target: edge.target.clone(),
			line: Line::new(props, store.is_dragging()),
			arrow_position: config.edge_arrow_position,
			arrow_color: String::new(),
			label: None,
			label_visible: false,
			active: false,
		};
		visual.apply_style(edge, store, config);
		visual
	}

	/// Re-derives props from the store.
	pub fn update(&mut self, edge: &InternalGraphEdge, store: &GraphStore, config: &GraphSceneConfig) {
		self.source = edge.source.clone();
		self.target = edge.target.clone();
		self.arrow_position = config.edge_arrow_position;
		self.line
			.update(Self::line_props(edge, store, config), store.is_dragging());
		self.apply_style(edge, store, config);
	}

	fn apply_style(&mut self, edge: &InternalGraphEdge, store: &GraphStore, config: &GraphSceneConfig) {
		let theme = &config.theme;
		self.active = store.is_active(&edge.id);
		self.arrow_color = if self.active {
			theme.arrow.active_fill.clone()
		} else {
			edge.fill.clone().unwrap_or_else(|| theme.arrow.fill.clone())
		};
		self.label_visible = match config.label_type {
			LabelVisibilityType::All | LabelVisibilityType::Edges => true,
			LabelVisibilityType::Auto => self.active || store.is_emphasized(&edge.id),
			LabelVisibilityType::None | LabelVisibilityType::Nodes => false,
		};
		self.label = edge.label.clone().map(|text| EdgeLabel {
			text,
			anchor: Vec3::ZERO,
			placement: config.edge_label_position,
			color: if self.active {
				theme.edge.label.active_color.clone()
			} else {
				theme.edge.label.color.clone()
			},
		});
		self.place_label();
	}

	/// Line props for `edge`: endpoints pulled back to the node surfaces.
	pub fn line_props(edge: &InternalGraphEdge, store: &GraphStore, config: &GraphSceneConfig) -> LineProps {
		let theme = &config.theme;
		let from = store.node_position(&edge.source);
		let to = store.node_position(&edge.target);
		let (from_size, to_size) = (store.node_size(&edge.source), store.node_size(&edge.target));
		let points = if from.distance(to) > from_size + to_size {
			EdgeVectors3::new(point_between(from, to, from_size), point_between(to, from, to_size))
		} else {
			// Overlapping nodes: nothing visible between them.
			EdgeVectors3::new(from, from)
		};

		let active = store.is_active(&edge.id);
		let color = if active {
			theme.edge.active_fill.clone()
		} else {
			edge.fill.clone().unwrap_or_else(|| theme.edge.fill.clone())
		};
		let opacity = if store.has_emphasis() {
			if active || store.is_emphasized(&edge.id) {
				theme.edge.selected_opacity
			} else {
				theme.edge.inactive_opacity
			}
		} else {
			theme.edge.opacity
		};

		LineProps {
			points,
			color,
			size: edge.size,
			curved: edge.interpolation == EdgeInterpolation::Curved,
			curve_offset: DEFAULT_CURVE_OFFSET,
			opacity,
			animated: config.animated,
		}
	}

	/// Advances animations. Returns true while moving.
	pub fn tick(&mut self, dt: f32) -> bool {
		let moving = self.line.tick(dt);
		self.place_label();
		moving
	}

	fn place_label(&mut self) {
		let anchor = self.line.curve().point_at(0.5);
		if let Some(label) = &mut self.label {
			label.anchor = anchor;
		}
	}

	/// Edge id.
	pub fn id(&self) -> &str {
		&self.id
	}

	/// Source node id.
	pub fn source(&self) -> &str {
		&self.source
	}

	/// Target node id.
	pub fn target(&self) -> &str {
		&self.target
	}

	/// The tube.
	pub fn line(&self) -> &Line {
		&self.line
	}

	/// The tube, mutably, for pointer handling.
	pub fn line_mut(&mut self) -> &mut Line {
		&mut self.line
	}

	/// True when hovered, selected or active.
	pub fn is_active(&self) -> bool {
		self.active
	}

	/// The arrow at this frame, if the edge has one and is long enough to show it.
	pub fn arrow(&self) -> Option<Arrow> {
		let at_end = match self.arrow_position {
			EdgeArrowPosition::None => return None,
			EdgeArrowPosition::Mid => false,
			EdgeArrowPosition::End => true,
		};
		let curve = self.line.curve();
		let size = self.line.props().size;
		let length = arrow_length(size);
		if curve.length() < length {
			return None;
		}
		let (center, direction) = arrow_vectors(curve, at_end, length);
		Some(Arrow {
			base: center - direction * (length / 2.0),
			tip: center + direction * (length / 2.0),
			radius: length / 2.5,
		})
	}

	/// Arrow colour.
	pub fn arrow_color(&self) -> &str {
		&self.arrow_color
	}

	/// The label, when it should be drawn.
	pub fn label(&self) -> Option<&EdgeLabel> {
		self.label.as_ref().filter(|_| self.label_visible)
	}
}

#[cfg(test)]
mod tests {
	use approx::assert_abs_diff_eq;

	use super::*;
	use crate::components::graph_scene::store::tests::{internal_edge, two_node_store};

	fn config() -> GraphSceneConfig {
		GraphSceneConfig {
			animated: false,
			..GraphSceneConfig::default()
		}
	}

	#[test]
	fn endpoints_stop_at_node_surfaces() {
		let store = two_node_store();
		let props = EdgeVisual::line_props(&internal_edge("a", "b"), &store, &config());
		assert!(props.points.from.distance(Vec3::new(-45.0, 0.0, 0.0)) < 1e-4);
		assert!(props.points.to.distance(Vec3::new(45.0, 0.0, 0.0)) < 1e-4);
		assert!(!props.curved);
	}

	#[test]
	fn missing_endpoint_defaults_to_origin() {
		let store = two_node_store();
		let props = EdgeVisual::line_props(&internal_edge("a", "ghost"), &store, &config());
		assert_eq!(props.points.to, Vec3::ZERO);
		assert!(props.points.from.distance(Vec3::new(-45.0, 0.0, 0.0)) < 1e-4);
	}

	#[test]
	fn emphasis_drives_colour_and_opacity() {
		let mut store = two_node_store();
		let config = config();
		let edge = internal_edge("a", "b");
		let theme = &config.theme;

		let props = EdgeVisual::line_props(&edge, &store, &config);
		assert_eq!(props.color, theme.edge.fill);
		assert_eq!(props.opacity, theme.edge.opacity);

		store.set_selections(vec!["a".into()]);
		let props = EdgeVisual::line_props(&edge, &store, &config);
		assert_eq!(props.opacity, theme.edge.inactive_opacity);

		store.set_actives(vec![edge.id.clone()]);
		let props = EdgeVisual::line_props(&edge, &store, &config);
		assert_eq!(props.opacity, theme.edge.selected_opacity);
		assert_eq!(props.color, theme.edge.active_fill);
	}

	#[test]
	fn end_arrow_tip_touches_target_surface() {
		let store = two_node_store();
		let visual = EdgeVisual::new(&internal_edge("a", "b"), &store, &config());
		let arrow = visual.arrow().unwrap();
		assert!(arrow.tip.distance(Vec3::new(45.0, 0.0, 0.0)) < 1e-3);
		assert_abs_diff_eq!(arrow.base.distance(arrow.tip), arrow_length(1.0), epsilon = 1e-3);

		let none = GraphSceneConfig {
			edge_arrow_position: EdgeArrowPosition::None,
			..config()
		};
		assert!(EdgeVisual::new(&internal_edge("a", "b"), &store, &none).arrow().is_none());
	}

	#[test]
	fn mid_arrow_sits_at_the_arc_midpoint() {
		let store = two_node_store();
		let mid = GraphSceneConfig {
			edge_arrow_position: EdgeArrowPosition::Mid,
			..config()
		};
		let arrow = EdgeVisual::new(&internal_edge("a", "b"), &store, &mid).arrow().unwrap();
		let center = (arrow.base + arrow.tip) * 0.5;
		assert!(center.distance(Vec3::ZERO) < 1e-3);
		assert!((arrow.tip - arrow.base).normalize().distance(Vec3::X) < 1e-3);

		let mut curved = internal_edge("a", "b");
		curved.interpolation = EdgeInterpolation::Curved;
		let visual = EdgeVisual::new(&curved, &store, &mid);
		let arrow = visual.arrow().unwrap();
		let center = (arrow.base + arrow.tip) * 0.5;
		assert!(center.distance(visual.line().curve().point_at(0.5)) < 1e-3);
		assert!(center.y.abs() > 1.0);
		assert!((arrow.tip - arrow.base).normalize().distance(Vec3::X) < 1e-2);
	}

	#[test]
	fn label_visibility_follows_label_type() {
		let mut store = two_node_store();
		let mut edge = internal_edge("a", "b");
		edge.label = Some("knows".into());

		let auto = config();
		let visual = EdgeVisual::new(&edge, &store, &auto);
		assert!(visual.label().is_none());

		store.set_hovered_edge(Some(edge.id.clone()));
		let visual = EdgeVisual::new(&edge, &store, &auto);
		let label = visual.label().unwrap();
		assert_eq!(label.text, "knows");
		assert!(label.anchor.distance(Vec3::ZERO) < 1e-3);

		let all = GraphSceneConfig {
			label_type: LabelVisibilityType::All,
			..config()
		};
		store.set_hovered_edge(None);
		assert!(EdgeVisual::new(&edge, &store, &all).label().is_some());
	}

	#[test]
	fn label_transform_keeps_text_upright() {
		let (_, _, angle) = label_transform((100.0, 0.0), (0.0, 0.0), EdgeLabelPosition::Natural, 0.0);
		assert_abs_diff_eq!(angle, 0.0, epsilon = 1e-9);

		let (dx, dy, angle) = label_transform((0.0, 0.0), (10.0, 0.0), EdgeLabelPosition::Above, 7.0);
		assert_abs_diff_eq!(angle, 0.0);
		assert_abs_diff_eq!(dx, 0.0, epsilon = 1e-9);
		assert_abs_diff_eq!(dy, -7.0);

		let (_, dy, _) = label_transform((0.0, 0.0), (10.0, 0.0), EdgeLabelPosition::Below, 7.0);
		assert_abs_diff_eq!(dy, 7.0);
	}
}
