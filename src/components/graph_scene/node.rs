//! Node visuals: an animated sphere with an optional label.

use glam::Vec3;

use super::config::GraphSceneConfig;
use super::interaction::{PointerButton, PointerEvent};
use super::spring::{Spring, SpringConfig};
use super::store::GraphStore;
use super::types::{InternalGraphNode, LabelVisibilityType};

/// Projected radius, in pixels, above which `Auto` shows a node label.
pub const AUTO_LABEL_MIN_RADIUS: f64 = 6.0;

/// Interaction callbacks a node can fire.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeEvent {
	/// Pointer entered the node.
	PointerOver,
	/// Pointer left the node.
	PointerOut,
	/// Primary click.
	Click,
	/// Secondary press.
	ContextMenu,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LabelMode {
	Never,
	Always,
	WhenLarge,
}

/// Rendered state of one node.
#[derive(Clone, Debug)]
pub struct NodeVisual {
	id: String,
	position: Spring<Vec3>,
	size: Spring<f32>,
	opacity: Spring<f32>,
	fill: String,
	active: bool,
	label: Option<String>,
	sub_label: Option<String>,
	label_color: String,
	label_mode: LabelMode,
	hovered: bool,
}

impl NodeVisual {
	/// Mounts the visual. Animated nodes grow out of the origin.
	pub fn new(node: &InternalGraphNode, store: &GraphStore, config: &GraphSceneConfig) -> Self {
		let spring = SpringConfig::default();
		let grow = config.animated && !store.is_dragging();
		let mut visual = Self {
			id: node.id.clone(),
			position: Spring::new(Vec3::ZERO, spring),
			size: Spring::new(0.0, spring),
			opacity: Spring::new(0.0, spring),
			fill: String::new(),
			active: false,
			label: None,
			sub_label: None,
			label_color: String::new(),
			label_mode: LabelMode::Never,
			hovered: false,
		};
		visual.apply(node, store, config, !grow);
		visual
	}

	/// Re-derives state from the store.
	pub fn update(&mut self, node: &InternalGraphNode, store: &GraphStore, config: &GraphSceneConfig) {
		self.apply(node, store, config, !config.animated || store.is_dragging());
	}

	fn apply(&mut self, node: &InternalGraphNode, store: &GraphStore, config: &GraphSceneConfig, immediate: bool) {
		let theme = &config.theme;
		let active = store.is_active(&node.id);
		let emphasized = active || store.is_emphasized(&node.id);
		let opacity = if store.has_emphasis() {
			if emphasized {
				theme.node.selected_opacity
			} else {
				theme.node.inactive_opacity
			}
		} else {
			theme.node.opacity
		};

		self.position.set(store.node_position(&node.id), immediate);
		self.size.set(node.size, immediate);
		self.opacity.set(opacity, immediate);
		self.active = active;
		self.fill = if active {
			theme.node.active_fill.clone()
		} else {
			node.fill.clone()
		};
		self.label = node.label.clone();
		self.sub_label = node.sub_label.clone();
		self.label_color = if active {
			theme.node.label.active_color.clone()
		} else {
			theme.node.label.color.clone()
		};
		self.label_mode = match config.label_type {
			LabelVisibilityType::All | LabelVisibilityType::Nodes => LabelMode::Always,
			LabelVisibilityType::Auto if emphasized => LabelMode::Always,
			LabelVisibilityType::Auto => LabelMode::WhenLarge,
			LabelVisibilityType::None | LabelVisibilityType::Edges => LabelMode::Never,
		};
	}

	/// Advances animations. Returns true while moving.
	pub fn tick(&mut self, dt: f32) -> bool {
		let a = self.position.step(dt);
		let b = self.size.step(dt);
		let c = self.opacity.step(dt);
		a || b || c
	}

	/// Node id.
	pub fn id(&self) -> &str {
		&self.id
	}

	/// Centre at this frame.
	pub fn position(&self) -> Vec3 {
		self.position.value()
	}

	/// Radius at this frame.
	pub fn size(&self) -> f32 {
		self.size.value()
	}

	/// Opacity at this frame.
	pub fn opacity(&self) -> f32 {
		self.opacity.value()
	}

	/// Fill colour.
	pub fn fill(&self) -> &str {
		&self.fill
	}

	/// True when hovered, selected or active.
	pub fn is_active(&self) -> bool {
		self.active
	}

	/// Label colour.
	pub fn label_color(&self) -> &str {
		&self.label_color
	}

	/// Label and sub-label to draw for a node whose disc is `screen_radius` pixels wide.
	pub fn labels(&self, screen_radius: f64) -> Option<(&str, Option<&str>)> {
		let label = self.label.as_deref()?;
		let show = match self.label_mode {
			LabelMode::Never => false,
			LabelMode::Always => true,
			LabelMode::WhenLarge => screen_radius >= AUTO_LABEL_MIN_RADIUS,
		};
		show.then_some((label, self.sub_label.as_deref()))
	}

	/// Pointer entered. Fires only on the transition.
	pub fn pointer_over(&mut self) -> Option<NodeEvent> {
		(!std::mem::replace(&mut self.hovered, true)).then_some(NodeEvent::PointerOver)
	}

	/// Pointer left. Fires only on the transition.
	pub fn pointer_out(&mut self) -> Option<NodeEvent> {
		std::mem::replace(&mut self.hovered, false).then_some(NodeEvent::PointerOut)
	}

	/// A press on the node. The secondary button opens the context menu and
	/// stops the event from reaching anything behind the node.
	pub fn pointer_down(&self, event: &mut PointerEvent) -> Option<NodeEvent> {
		if event.button != PointerButton::Secondary {
			return None;
		}
		event.stop_propagation();
		Some(NodeEvent::ContextMenu)
	}

	/// A completed click on the node. Only the primary button clicks.
	pub fn click(&self, event: &PointerEvent) -> Option<NodeEvent> {
		(event.button == PointerButton::Primary).then_some(NodeEvent::Click)
	}
}
