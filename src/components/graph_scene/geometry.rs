//! Points, curves and placement helpers shared by edges, arrows and labels.

use glam::Vec3;

/// An endpoint position.
pub type Point3 = Vec3;

/// Distances below this are treated as coincident points.
pub const EPSILON: f32 = 1e-4;

/// Default control point displacement for curved edges, in quarters of the edge length.
pub const DEFAULT_CURVE_OFFSET: f32 = 1.0;

/// Divisions used for arc-length lookups.
const ARC_DIVISIONS: usize = 200;

/// The two endpoints of an edge at a given animation frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EdgeVectors3 {
	/// Source end.
	pub from: Point3,
	/// Target end.
	pub to: Point3,
}

impl EdgeVectors3 {
	/// Builds endpoints from two points.
	pub fn new(from: Point3, to: Point3) -> Self {
		Self { from, to }
	}

	/// Distance between the endpoints.
	pub fn length(&self) -> f32 {
		self.from.distance(self.to)
	}
}

/// Point on the segment `from -> to`, `offset` world units away from `from`.
pub fn point_between(from: Point3, to: Point3, offset: f32) -> Point3 {
	let distance = from.distance(to);
	if distance < EPSILON {
		return from;
	}
	from + (to - from) * (offset / distance)
}

/// Midpoint of the segment.
pub fn midpoint(from: Point3, to: Point3) -> Point3 {
	(from + to) * 0.5
}

/// Control point for a curved edge.
///
/// The point sits above the segment midpoint, displaced perpendicular to the
/// segment by a quarter of its length times `offset`. For edges lying in the
/// z = 0 plane the displacement stays in that plane.
pub fn curve_control_point(from: Point3, to: Point3, offset: f32) -> Point3 {
	let v = to - from;
	let len = v.length();
	if len < EPSILON {
		return from;
	}
	let vn = v / len;
	let k = vn.x.abs() % 1.0;
	let mut b = Vec3::new(-vn.y, vn.x - k * vn.z, k * vn.y).normalize_or_zero();
	if b == Vec3::ZERO {
		b = vn.any_orthonormal_vector();
	}
	midpoint(from, to) + b * (len / 4.0) * offset
}

/// A parametric edge path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Curve {
	/// Straight segment.
	Linear {
		/// Start point.
		from: Point3,
		/// End point.
		to: Point3,
	},
	/// Quadratic Bézier arc.
	Quadratic {
		/// Start point.
		from: Point3,
		/// Control point.
		control: Point3,
		/// End point.
		to: Point3,
		/// Cumulative arc lengths, computed once at construction.
		arc: ArcTable,
	},
}

/// Cumulative chord lengths at `ARC_DIVISIONS + 1` evenly spaced parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArcTable([f32; ARC_DIVISIONS + 1]);

impl ArcTable {
	fn sample(point: impl Fn(f32) -> Point3) -> Self {
		let mut lengths = [0.0; ARC_DIVISIONS + 1];
		let mut last = point(0.0);
		for i in 1..=ARC_DIVISIONS {
			let current = point(i as f32 / ARC_DIVISIONS as f32);
			lengths[i] = lengths[i - 1] + current.distance(last);
			last = current;
		}
		Self(lengths)
	}

	/// Total sampled length.
	pub fn total(&self) -> f32 {
		self.0[ARC_DIVISIONS]
	}

	/// Curve parameter whose sampled length is `u` of the total.
	fn parameter(&self, u: f32) -> f32 {
		let lengths = &self.0;
		let total = self.total();
		if total < EPSILON {
			return u;
		}
		let target = u * total;
		// Last sample not past the target length
		let i = match lengths.binary_search_by(|l| l.total_cmp(&target)) {
			Ok(i) => return i as f32 / ARC_DIVISIONS as f32,
			Err(i) => i.saturating_sub(1).min(ARC_DIVISIONS - 1),
		};
		let (before, after) = (lengths[i], lengths[i + 1]);
		let segment = after - before;
		let fraction = if segment > 0.0 {
			(target - before) / segment
		} else {
			0.0
		};
		(i as f32 + fraction) / ARC_DIVISIONS as f32
	}
}

impl Curve {
	/// A quadratic Bézier arc with its arc-length table.
	pub fn quadratic(from: Point3, control: Point3, to: Point3) -> Self {
		let arc = ArcTable::sample(|t| quadratic_point(from, control, to, t));
		Curve::Quadratic {
			from,
			control,
			to,
			arc,
		}
	}

	/// Builds the path for an edge, straight or arced through the offset midpoint.
	pub fn between(points: EdgeVectors3, curved: bool, curve_offset: f32) -> Self {
		if curved {
			Curve::quadratic(
				points.from,
				curve_control_point(points.from, points.to, curve_offset),
				points.to,
			)
		} else {
			Curve::Linear {
				from: points.from,
				to: points.to,
			}
		}
	}

	/// Start point.
	pub fn start(&self) -> Point3 {
		match *self {
			Curve::Linear { from, .. } | Curve::Quadratic { from, .. } => from,
		}
	}

	/// End point.
	pub fn end(&self) -> Point3 {
		match *self {
			Curve::Linear { to, .. } | Curve::Quadratic { to, .. } => to,
		}
	}

	/// Point at curve parameter `t` in `[0, 1]`.
	pub fn point(&self, t: f32) -> Point3 {
		match *self {
			Curve::Linear { from, to } => from.lerp(to, t),
			Curve::Quadratic { from, control, to, .. } => quadratic_point(from, control, to, t),
		}
	}

	/// Unit tangent at curve parameter `t`.
	pub fn tangent(&self, t: f32) -> Vec3 {
		let d = match *self {
			Curve::Linear { from, to } => to - from,
			Curve::Quadratic { from, control, to, .. } => {
				(control - from) * (2.0 * (1.0 - t)) + (to - control) * (2.0 * t)
			}
		};
		d.normalize_or_zero()
	}

	/// Total arc length.
	pub fn length(&self) -> f32 {
		match *self {
			Curve::Linear { from, to } => from.distance(to),
			Curve::Quadratic { arc, .. } => arc.total(),
		}
	}

	/// Point at arc-length fraction `u` in `[0, 1]`.
	pub fn point_at(&self, u: f32) -> Point3 {
		self.point(self.u_to_t(u))
	}

	/// Unit tangent at arc-length fraction `u` in `[0, 1]`.
	pub fn tangent_at(&self, u: f32) -> Vec3 {
		self.tangent(self.u_to_t(u))
	}

	/// `count + 1` evenly spaced (by arc length) points along the curve.
	pub fn spaced_points(&self, count: usize) -> Vec<Point3> {
		(0..=count)
			.map(|i| self.point_at(i as f32 / count.max(1) as f32))
			.collect()
	}

	fn u_to_t(&self, u: f32) -> f32 {
		let u = u.clamp(0.0, 1.0);
		match self {
			Curve::Linear { .. } => u,
			Curve::Quadratic { arc, .. } => arc.parameter(u),
		}
	}
}

fn quadratic_point(from: Point3, control: Point3, to: Point3, t: f32) -> Point3 {
	let u = 1.0 - t;
	from * (u * u) + control * (2.0 * u * t) + to * (t * t)
}

/// Arrow placement along a curve: the arrow centre and its pointing direction.
///
/// `end` arrows sit half an arrow length back from the curve end so the tip
/// touches it; `mid` arrows sit at the arc-length midpoint.
pub fn arrow_vectors(curve: &Curve, at_end: bool, arrow_length: f32) -> (Point3, Vec3) {
	let length = curve.length();
	if length < EPSILON {
		return (curve.end(), Vec3::ZERO);
	}
	let (abs, offset) = if at_end {
		(length, arrow_length / 2.0)
	} else {
		(length / 2.0, 0.0)
	};
	let u = ((abs - offset) / length).clamp(0.0, 1.0);
	(curve.point_at(u), curve.tangent_at(u))
}

#[cfg(test)]
mod tests {
	use approx::assert_abs_diff_eq;

	use super::*;

	fn near(a: Vec3, b: Vec3) -> bool {
		a.distance(b) < 1e-3
	}

	#[test]
	fn straight_curve_stays_on_segment() {
		let points = EdgeVectors3::new(Vec3::new(-10.0, 2.0, 0.0), Vec3::new(30.0, 12.0, 5.0));
		let curve = Curve::between(points, false, DEFAULT_CURVE_OFFSET);
		let dir = (points.to - points.from).normalize();
		for p in curve.spaced_points(20) {
			let rel = p - points.from;
			let off_axis = rel - dir * rel.dot(dir);
			assert!(off_axis.length() < 1e-3);
		}
		assert!(near(curve.start(), points.from));
		assert!(near(curve.end(), points.to));
		assert_abs_diff_eq!(curve.length(), points.length(), epsilon = 1e-3);
	}

	#[test]
	fn curvature_bends_through_control_point_and_keeps_endpoints() {
		let points = EdgeVectors3::new(Vec3::ZERO, Vec3::new(100.0, 0.0, 0.0));
		let straight = Curve::between(points, false, DEFAULT_CURVE_OFFSET);
		let curved = Curve::between(points, true, DEFAULT_CURVE_OFFSET);

		assert!(near(curved.point(0.0), points.from));
		assert!(near(curved.point(1.0), points.to));
		assert!(near(straight.point(0.5), Vec3::new(50.0, 0.0, 0.0)));

		let Curve::Quadratic { control, .. } = curved else {
			panic!("expected a quadratic curve");
		};
		assert!(near(control, Vec3::new(50.0, 25.0, 0.0)));
		// The Bézier midpoint lies halfway between the chord midpoint and the control point.
		assert!(near(curved.point(0.5), Vec3::new(50.0, 12.5, 0.0)));
		assert!(curved.length() > straight.length());
	}

	#[test]
	fn control_point_for_depth_edges_is_perpendicular() {
		let from = Vec3::ZERO;
		let to = Vec3::new(0.0, 0.0, 40.0);
		let c = curve_control_point(from, to, 1.0);
		let mid = midpoint(from, to);
		assert_abs_diff_eq!((c - mid).dot(to - from), 0.0, epsilon = 1e-3);
		assert_abs_diff_eq!((c - mid).length(), 10.0, epsilon = 1e-3);
	}

	#[test]
	fn point_between_handles_coincident_points() {
		let p = Vec3::new(1.0, 2.0, 3.0);
		assert_eq!(point_between(p, p, 5.0), p);
		let q = point_between(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), 3.0);
		assert!(near(q, Vec3::new(3.0, 0.0, 0.0)));
	}

	#[test]
	fn arc_length_parameter_is_uniform() {
		let curve = Curve::between(
			EdgeVectors3::new(Vec3::ZERO, Vec3::new(100.0, 0.0, 0.0)),
			true,
			2.0,
		);
		let pts = curve.spaced_points(10);
		let steps: Vec<f32> = pts.windows(2).map(|w| w[0].distance(w[1])).collect();
		for s in &steps {
			assert_abs_diff_eq!(*s, steps[0], epsilon = 0.2);
		}
	}

	#[test]
	fn arc_table_is_built_once_with_the_curve() {
		let from = Vec3::ZERO;
		let control = Vec3::new(30.0, 40.0, 0.0);
		let to = Vec3::new(60.0, 0.0, 10.0);
		let curve = Curve::quadratic(from, control, to);
		let Curve::Quadratic { arc, .. } = curve else {
			panic!("expected a quadratic curve");
		};
		let sampled: f32 = (0..=1000)
			.map(|i| curve.point(i as f32 / 1000.0))
			.collect::<Vec<_>>()
			.windows(2)
			.map(|w| w[0].distance(w[1]))
			.sum();
		assert_abs_diff_eq!(arc.total(), sampled, epsilon = 0.05);
		assert_eq!(curve.length(), arc.total());

		// Copies carry the same table
		let copy = curve;
		assert_eq!(copy, curve);
		assert!(near(copy.point_at(1.0), to));
		assert!(near(copy.point_at(0.0), from));
	}

	#[test]
	fn end_arrow_tip_touches_curve_end() {
		let curve = Curve::between(
			EdgeVectors3::new(Vec3::ZERO, Vec3::new(50.0, 0.0, 0.0)),
			false,
			DEFAULT_CURVE_OFFSET,
		);
		let (pos, dir) = arrow_vectors(&curve, true, 6.0);
		assert!(near(pos, Vec3::new(47.0, 0.0, 0.0)));
		assert!(near(dir, Vec3::X));
		let (mid, _) = arrow_vectors(&curve, false, 6.0);
		assert!(near(mid, Vec3::new(25.0, 0.0, 0.0)));
	}
}
