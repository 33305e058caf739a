//! Scene-wide configuration propagated to every node and edge.

use super::camera::CameraMode;
use super::theme::Theme;
use super::types::{
	EdgeArrowPosition, EdgeInterpolation, EdgeLabelPosition, LabelVisibilityType, LayoutType,
	SizingType,
};

/// Configuration of a graph scene.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphSceneConfig {
	/// Colours and opacities.
	pub theme: Theme,
	/// Spring-animate transitions. When false every update is immediate.
	pub animated: bool,
	/// Initial layout.
	pub layout_type: LayoutType,
	/// Node sizing strategy.
	pub sizing_type: SizingType,
	/// Attribute of `GraphNode::data` read by attribute sizing.
	pub sizing_attribute: Option<String>,
	/// Size used when nothing else applies.
	pub default_node_size: f32,
	/// Lower bound for scaled sizing.
	pub min_node_size: f32,
	/// Upper bound for scaled sizing.
	pub max_node_size: f32,
	/// Thickness used for edges without a size.
	pub default_edge_size: f32,
	/// Which labels are drawn.
	pub label_type: LabelVisibilityType,
	/// Placement of edge labels.
	pub edge_label_position: EdgeLabelPosition,
	/// Placement of edge arrows.
	pub edge_arrow_position: EdgeArrowPosition,
	/// Interpolation for edges that do not set their own.
	pub edge_interpolation: EdgeInterpolation,
	/// What dragging the background does.
	pub camera_mode: CameraMode,
	/// Label font size in pixels.
	pub label_font_size: f64,
}

impl Default for GraphSceneConfig {
	fn default() -> Self {
		Self {
			theme: Theme::default(),
			animated: true,
			layout_type: LayoutType::default(),
			sizing_type: SizingType::default(),
			sizing_attribute: None,
			default_node_size: 7.0,
			min_node_size: 5.0,
			max_node_size: 15.0,
			default_edge_size: 1.0,
			label_type: LabelVisibilityType::default(),
			edge_label_position: EdgeLabelPosition::default(),
			edge_arrow_position: EdgeArrowPosition::default(),
			edge_interpolation: EdgeInterpolation::default(),
			camera_mode: CameraMode::default(),
			label_font_size: 12.0,
		}
	}
}
