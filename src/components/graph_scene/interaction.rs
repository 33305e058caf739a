//! Pointer events and the geometry of picking things on the canvas.

/// Pixels a pointer may travel between down and up and still count as a click.
pub const CLICK_TOLERANCE: f64 = 4.0;
/// Minimum pick distance for thin edges, in pixels.
pub const EDGE_PICK_SLOP: f64 = 4.0;
/// Extra pick distance around node discs, in pixels.
pub const NODE_PICK_SLOP: f64 = 2.0;

/// Which mouse button a pointer event concerns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
	/// Usually the left button.
	Primary,
	/// Usually the wheel button.
	Auxiliary,
	/// Usually the right button.
	Secondary,
	/// Anything else.
	Other(i16),
}

impl PointerButton {
	/// Decodes `MouseEvent.button`.
	pub fn from_dom(button: i16) -> Self {
		match button {
			0 => PointerButton::Primary,
			1 => PointerButton::Auxiliary,
			2 => PointerButton::Secondary,
			other => PointerButton::Other(other),
		}
	}
}

/// A pointer event in canvas coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
	/// Canvas x.
	pub x: f64,
	/// Canvas y.
	pub y: f64,
	/// Button concerned.
	pub button: PointerButton,
	propagation_stopped: bool,
}

impl PointerEvent {
	/// Builds an event.
	pub fn new(x: f64, y: f64, button: PointerButton) -> Self {
		Self {
			x,
			y,
			button,
			propagation_stopped: false,
		}
	}

	/// Keeps the event from reaching anything behind the current target.
	pub fn stop_propagation(&mut self) {
		self.propagation_stopped = true;
	}

	/// True once a target stopped the event.
	pub fn propagation_stopped(&self) -> bool {
		self.propagation_stopped
	}
}

/// What is under the pointer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HitTarget {
	/// A node, by id.
	Node(String),
	/// An edge, by id.
	Edge(String),
}

/// Distance from `(px, py)` to the segment `a -> b`.
pub fn distance_to_segment(px: f64, py: f64, a: (f64, f64), b: (f64, f64)) -> f64 {
	let (dx, dy) = (b.0 - a.0, b.1 - a.1);
	let len2 = dx * dx + dy * dy;
	let t = if len2 > 0.0 {
		(((px - a.0) * dx + (py - a.1) * dy) / len2).clamp(0.0, 1.0)
	} else {
		0.0
	};
	let (cx, cy) = (a.0 + t * dx, a.1 + t * dy);
	((px - cx).powi(2) + (py - cy).powi(2)).sqrt()
}

/// Distance from `(px, py)` to a polyline, or `None` for fewer than two points.
pub fn distance_to_polyline(px: f64, py: f64, points: &[(f64, f64)]) -> Option<f64> {
	points
		.windows(2)
		.map(|w| distance_to_segment(px, py, w[0], w[1]))
		.reduce(f64::min)
}

/// Tracks a press so release can be classified as a click or the end of a drag.
#[derive(Clone, Debug, PartialEq)]
pub struct PressState {
	/// Target under the pointer at press time, if any.
	pub target: Option<HitTarget>,
	/// Button held.
	pub button: PointerButton,
	/// Press position.
	pub start: (f64, f64),
	/// Last pointer position seen during the press.
	pub last: (f64, f64),
	/// Set once the pointer moved beyond the click tolerance.
	pub moved: bool,
}

impl PressState {
	/// Starts tracking a press.
	pub fn new(target: Option<HitTarget>, event: &PointerEvent) -> Self {
		let (x, y) = (event.x, event.y);
		Self {
			target,
			button: event.button,
			start: (x, y),
			last: (x, y),
			moved: false,
		}
	}

	/// Records pointer movement and returns the delta since the last call.
	pub fn track(&mut self, x: f64, y: f64) -> (f64, f64) {
		let delta = (x - self.last.0, y - self.last.1);
		self.last = (x, y);
		let (tx, ty) = (x - self.start.0, y - self.start.1);
		if (tx * tx + ty * ty).sqrt() > CLICK_TOLERANCE {
			self.moved = true;
		}
		delta
	}
}

#[cfg(test)]
mod tests {
	use approx::assert_abs_diff_eq;

	use super::*;

	#[test]
	fn decodes_dom_buttons() {
		assert_eq!(PointerButton::from_dom(0), PointerButton::Primary);
		assert_eq!(PointerButton::from_dom(2), PointerButton::Secondary);
		assert_eq!(PointerButton::from_dom(4), PointerButton::Other(4));
	}

	#[test]
	fn segment_distance() {
		assert_abs_diff_eq!(distance_to_segment(5.0, 3.0, (0.0, 0.0), (10.0, 0.0)), 3.0);
		assert_abs_diff_eq!(distance_to_segment(13.0, 4.0, (0.0, 0.0), (10.0, 0.0)), 5.0);
		assert_abs_diff_eq!(distance_to_segment(3.0, 4.0, (0.0, 0.0), (0.0, 0.0)), 5.0);
	}

	#[test]
	fn polyline_distance_takes_closest_segment() {
		let pts = [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)];
		assert_abs_diff_eq!(distance_to_polyline(12.0, 5.0, &pts).unwrap(), 2.0);
		assert_eq!(distance_to_polyline(0.0, 0.0, &pts[..1]), None);
	}

	#[test]
	fn press_becomes_drag_past_tolerance() {
		let mut press =
			PressState::new(None, &PointerEvent::new(10.0, 10.0, PointerButton::Primary));
		assert_eq!(press.track(12.0, 11.0), (2.0, 1.0));
		assert!(!press.moved);
		press.track(20.0, 10.0);
		assert!(press.moved);
	}

	#[test]
	fn stopping_propagation_sticks() {
		let mut ev = PointerEvent::new(1.0, 2.0, PointerButton::Secondary);
		assert!(!ev.propagation_stopped());
		ev.stop_propagation();
		assert!(ev.propagation_stopped());
	}
}
