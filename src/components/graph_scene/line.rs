//! A single edge rendered as a tube between two animated endpoints.

use glam::Vec3;

use super::geometry::{Curve, DEFAULT_CURVE_OFFSET, EdgeVectors3};
use super::interaction::{PointerButton, PointerEvent};
use super::spring::{Spring, SpringConfig};
use super::tube::TubeGeometry;

/// Inputs of a [`Line`].
#[derive(Clone, Debug, PartialEq)]
pub struct LineProps {
	/// Endpoints.
	pub points: EdgeVectors3,
	/// `#rrggbb` colour.
	pub color: String,
	/// Tube thickness (diameter).
	pub size: f32,
	/// Arc instead of a straight segment.
	pub curved: bool,
	/// Arc bulge, in quarters of the edge length.
	pub curve_offset: f32,
	/// Target opacity.
	pub opacity: f32,
	/// Spring-animate changes.
	pub animated: bool,
}

impl Default for LineProps {
	fn default() -> Self {
		Self {
			points: EdgeVectors3::default(),
			color: "#000000".into(),
			size: 1.0,
			curved: false,
			curve_offset: DEFAULT_CURVE_OFFSET,
			opacity: 1.0,
			animated: true,
		}
	}
}

/// Interaction callbacks a line can fire.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineEvent {
	/// Pointer entered the line.
	PointerOver,
	/// Pointer left the line.
	PointerOut,
	/// Primary click.
	Click,
	/// Secondary press.
	ContextMenu,
}

/// Animated tube state of one edge.
#[derive(Clone, Debug)]
pub struct Line {
	props: LineProps,
	from: Spring<Vec3>,
	to: Spring<Vec3>,
	opacity: Spring<f32>,
	curve: Curve,
	geometry: TubeGeometry,
	built_for: Option<(EdgeVectors3, bool, f32, f32)>,
	hovered: bool,
}

impl Line {
	/// Mounts a line. Animated lines grow out of the origin and fade in.
	pub fn new(props: LineProps, dragging: bool) -> Self {
		let config = SpringConfig::default();
		let grow = props.animated && !dragging;
		let (from, to, opacity) = if grow {
			(Vec3::ZERO, Vec3::ZERO, 0.0)
		} else {
			(props.points.from, props.points.to, props.opacity)
		};
		let mut line = Self {
			from: Spring::new(from, config),
			to: Spring::new(to, config),
			opacity: Spring::new(opacity, config),
			curve: Curve::between(EdgeVectors3::new(from, to), props.curved, props.curve_offset),
			geometry: TubeGeometry::default(),
			built_for: None,
			hovered: false,
			props: props.clone(),
		};
		line.update(props, dragging);
		line
	}

	/// Applies new props. Changes are immediate when not animated or while dragging.
	pub fn update(&mut self, props: LineProps, dragging: bool) {
		let immediate = !props.animated || dragging;
		self.from.set(props.points.from, immediate);
		self.to.set(props.points.to, immediate);
		self.opacity.set(props.opacity, immediate);
		self.props = props;
		self.rebuild();
	}

	/// Advances the springs. Returns true while anything is still moving.
	pub fn tick(&mut self, dt: f32) -> bool {
		let a = self.from.step(dt);
		let b = self.to.step(dt);
		let c = self.opacity.step(dt);
		self.rebuild();
		a || b || c
	}

	fn rebuild(&mut self) {
		let key = (
			self.points(),
			self.props.curved,
			self.props.curve_offset,
			self.props.size,
		);
		if self.built_for == Some(key) {
			return;
		}
		self.curve = Curve::between(key.0, key.1, key.2);
		self.geometry = TubeGeometry::for_edge(&self.curve, key.3);
		self.built_for = Some(key);
	}

	/// Current props.
	pub fn props(&self) -> &LineProps {
		&self.props
	}

	/// Endpoints at this frame.
	pub fn points(&self) -> EdgeVectors3 {
		EdgeVectors3::new(self.from.value(), self.to.value())
	}

	/// Path at this frame.
	pub fn curve(&self) -> &Curve {
		&self.curve
	}

	/// Tube mesh at this frame.
	pub fn geometry(&self) -> &TubeGeometry {
		&self.geometry
	}

	/// Opacity at this frame.
	pub fn opacity(&self) -> f32 {
		self.opacity.value()
	}

	/// True while the pointer is over the line.
	pub fn is_hovered(&self) -> bool {
		self.hovered
	}

	/// Pointer entered. Fires only on the transition.
	pub fn pointer_over(&mut self) -> Option<LineEvent> {
		(!std::mem::replace(&mut self.hovered, true)).then_some(LineEvent::PointerOver)
	}

	/// Pointer left. Fires only on the transition.
	pub fn pointer_out(&mut self) -> Option<LineEvent> {
		std::mem::replace(&mut self.hovered, false).then_some(LineEvent::PointerOut)
	}

	/// A press on the line. The secondary button opens the context menu and
	/// stops the event from reaching anything behind the line.
	pub fn pointer_down(&self, event: &mut PointerEvent) -> Option<LineEvent> {
		if event.button != PointerButton::Secondary {
			return None;
		}
		event.stop_propagation();
		Some(LineEvent::ContextMenu)
	}

	/// A completed click on the line. Only the primary button clicks.
	pub fn click(&self, event: &PointerEvent) -> Option<LineEvent> {
		(event.button == PointerButton::Primary).then_some(LineEvent::Click)
	}
}

#[cfg(test)]
mod tests {
	use approx::assert_abs_diff_eq;

	use super::*;

	fn props(from: Vec3, to: Vec3) -> LineProps {
		LineProps {
			points: EdgeVectors3::new(from, to),
			color: "#336699".into(),
			size: 2.0,
			..LineProps::default()
		}
	}

	fn settle(line: &mut Line) {
		let mut frames = 0;
		while line.tick(1.0 / 60.0) {
			frames += 1;
			assert!(frames < 1000, "line never settled");
		}
	}

	#[test]
	fn animated_line_grows_from_origin() {
		let mut line = Line::new(props(Vec3::new(10.0, 0.0, 0.0), Vec3::new(90.0, 0.0, 0.0)), false);
		assert_eq!(line.points().from, Vec3::ZERO);
		assert_eq!(line.opacity(), 0.0);
		assert!(line.geometry().is_empty());
		settle(&mut line);
		assert_eq!(line.points().to, Vec3::new(90.0, 0.0, 0.0));
		assert_abs_diff_eq!(line.opacity(), 1.0);
		assert!(!line.geometry().is_empty());
	}

	#[test]
	fn unanimated_line_is_immediate() {
		let mut p = props(Vec3::ZERO, Vec3::new(0.0, 40.0, 0.0));
		p.animated = false;
		p.opacity = 0.4;
		let line = Line::new(p, false);
		assert_eq!(line.points().to, Vec3::new(0.0, 40.0, 0.0));
		assert_eq!(line.opacity(), 0.4);
	}

	#[test]
	fn dragging_applies_endpoint_updates_immediately() {
		let mut line = Line::new(props(Vec3::ZERO, Vec3::new(50.0, 0.0, 0.0)), false);
		settle(&mut line);

		line.update(props(Vec3::ZERO, Vec3::new(50.0, 80.0, 0.0)), true);
		assert_eq!(line.points().to, Vec3::new(50.0, 80.0, 0.0));
		assert_eq!(line.curve().end(), Vec3::new(50.0, 80.0, 0.0));

		line.update(props(Vec3::ZERO, Vec3::new(0.0, 80.0, 0.0)), false);
		assert_eq!(line.points().to, Vec3::new(50.0, 80.0, 0.0));
		assert!(line.tick(1.0 / 60.0));
		assert_ne!(line.points().to, Vec3::new(50.0, 80.0, 0.0));
	}

	#[test]
	fn straight_line_mesh_spans_the_segment() {
		let mut p = props(Vec3::new(-20.0, 0.0, 0.0), Vec3::new(20.0, 0.0, 0.0));
		p.animated = false;
		let line = Line::new(p, false);
		assert!(matches!(line.curve(), Curve::Linear { .. }));
		let centers = &line.geometry().centers;
		assert_eq!(centers.first(), Some(&Vec3::new(-20.0, 0.0, 0.0)));
		assert!(centers.last().unwrap().distance(Vec3::new(20.0, 0.0, 0.0)) < 1e-4);
		assert!(centers.iter().all(|c| c.y.abs() < 1e-5 && c.z.abs() < 1e-5));
	}

	#[test]
	fn toggling_curvature_keeps_endpoints() {
		let mut p = props(Vec3::ZERO, Vec3::new(100.0, 0.0, 0.0));
		p.animated = false;
		let mut line = Line::new(p.clone(), false);
		let straight_mid = line.curve().point_at(0.5);

		p.curved = true;
		line.update(p, false);
		let curve = *line.curve();
		assert!(matches!(curve, Curve::Quadratic { .. }));
		assert_eq!(curve.start(), Vec3::ZERO);
		assert_eq!(curve.end(), Vec3::new(100.0, 0.0, 0.0));
		assert!(curve.point_at(0.5).distance(straight_mid) > 5.0);
	}

	#[test]
	fn secondary_press_is_a_context_menu_not_a_click() {
		let line = Line::new(props(Vec3::ZERO, Vec3::X * 10.0), false);
		let mut right = PointerEvent::new(0.0, 0.0, PointerButton::Secondary);
		assert_eq!(line.pointer_down(&mut right), Some(LineEvent::ContextMenu));
		assert!(right.propagation_stopped());
		assert_eq!(line.click(&right), None);

		let mut left = PointerEvent::new(0.0, 0.0, PointerButton::Primary);
		assert_eq!(line.pointer_down(&mut left), None);
		assert!(!left.propagation_stopped());
		assert_eq!(line.click(&left), Some(LineEvent::Click));
	}

	#[test]
	fn hover_fires_on_transitions_only() {
		let mut line = Line::new(props(Vec3::ZERO, Vec3::X * 10.0), false);
		assert_eq!(line.pointer_over(), Some(LineEvent::PointerOver));
		assert_eq!(line.pointer_over(), None);
		assert!(line.is_hovered());
		assert_eq!(line.pointer_out(), Some(LineEvent::PointerOut));
		assert_eq!(line.pointer_out(), None);
	}
}
