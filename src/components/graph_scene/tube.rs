//! Tube meshes swept along edge curves.

use glam::{Quat, Vec3};

use super::geometry::{Curve, EPSILON};

/// Segments along the curve.
pub const TUBULAR_SEGMENTS: usize = 20;
/// Segments around the cross-section.
pub const RADIAL_SEGMENTS: usize = 5;

/// Triangle mesh of a circular cross-section swept along a curve.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TubeGeometry {
	/// Vertex positions, `(tubular + 1) * (radial + 1)` of them.
	pub positions: Vec<Vec3>,
	/// Unit vertex normals, parallel to `positions`.
	pub normals: Vec<Vec3>,
	/// Triangle vertex indices.
	pub indices: Vec<[u32; 3]>,
	/// Ring centres along the curve.
	pub centers: Vec<Vec3>,
	/// Cross-section radius.
	pub radius: f32,
}

/// Moving frame along a curve.
struct Frames {
	tangents: Vec<Vec3>,
	normals: Vec<Vec3>,
	binormals: Vec<Vec3>,
}

impl TubeGeometry {
	/// Sweeps a circle of `radius` along `curve`.
	pub fn new(curve: &Curve, tubular_segments: usize, radius: f32, radial_segments: usize) -> Self {
		if curve.length() < EPSILON || tubular_segments == 0 || radial_segments == 0 {
			return Self {
				radius,
				..Self::default()
			};
		}
		let frames = Frames::compute(curve, tubular_segments);
		let ring = radial_segments + 1;
		let mut positions = Vec::with_capacity((tubular_segments + 1) * ring);
		let mut normals = Vec::with_capacity(positions.capacity());
		let mut centers = Vec::with_capacity(tubular_segments + 1);

		for i in 0..=tubular_segments {
			let center = curve.point_at(i as f32 / tubular_segments as f32);
			let (n, b) = (frames.normals[i], frames.binormals[i]);
			for j in 0..=radial_segments {
				let v = j as f32 / radial_segments as f32 * std::f32::consts::TAU;
				let normal = (n * -v.cos() + b * v.sin()).normalize_or_zero();
				normals.push(normal);
				positions.push(center + normal * radius);
			}
			centers.push(center);
		}

		let mut indices = Vec::with_capacity(tubular_segments * radial_segments * 2);
		for j in 1..=tubular_segments {
			for i in 1..=radial_segments {
				let a = (ring * (j - 1) + (i - 1)) as u32;
				let b = (ring * j + (i - 1)) as u32;
				let c = (ring * j + i) as u32;
				let d = (ring * (j - 1) + i) as u32;
				indices.push([a, b, d]);
				indices.push([b, c, d]);
			}
		}

		debug_assert_eq!(frames.tangents.len(), tubular_segments + 1);
		Self {
			positions,
			normals,
			indices,
			centers,
			radius,
		}
	}

	/// Sweeps with the default edge resolution.
	pub fn for_edge(curve: &Curve, size: f32) -> Self {
		Self::new(curve, TUBULAR_SEGMENTS, size / 2.0, RADIAL_SEGMENTS)
	}

	/// True when the mesh has no triangles.
	pub fn is_empty(&self) -> bool {
		self.indices.is_empty()
	}

	/// Iterates triangles as vertex positions plus the averaged face normal.
	pub fn triangles(&self) -> impl Iterator<Item = ([Vec3; 3], Vec3)> + '_ {
		self.indices.iter().map(|&[a, b, c]| {
			let (a, b, c) = (a as usize, b as usize, c as usize);
			let normal =
				(self.normals[a] + self.normals[b] + self.normals[c]).normalize_or_zero();
			([self.positions[a], self.positions[b], self.positions[c]], normal)
		})
	}
}

impl Frames {
	fn compute(curve: &Curve, segments: usize) -> Self {
		let tangents: Vec<Vec3> = (0..=segments)
			.map(|i| curve.tangent_at(i as f32 / segments as f32))
			.collect();
		let mut normals = Vec::with_capacity(segments + 1);
		let mut binormals = Vec::with_capacity(segments + 1);

		// Seed the first normal from the axis the tangent is least aligned with.
		let t0 = tangents[0];
		let abs = t0.abs();
		let axis = if abs.x <= abs.y && abs.x <= abs.z {
			Vec3::X
		} else if abs.y <= abs.z {
			Vec3::Y
		} else {
			Vec3::Z
		};
		let side = t0.cross(axis).normalize_or_zero();
		let n0 = t0.cross(side);
		normals.push(n0);
		binormals.push(t0.cross(n0));

		for i in 1..=segments {
			let mut n = normals[i - 1];
			let rotation_axis = tangents[i - 1].cross(tangents[i]);
			if rotation_axis.length() > f32::EPSILON {
				let theta = tangents[i - 1].dot(tangents[i]).clamp(-1.0, 1.0).acos();
				n = Quat::from_axis_angle(rotation_axis.normalize(), theta) * n;
			}
			normals.push(n);
			binormals.push(tangents[i].cross(n));
		}

		Self {
			tangents,
			normals,
			binormals,
		}
	}
}

#[cfg(test)]
mod tests {
	use approx::assert_abs_diff_eq;

	use super::*;
	use crate::components::graph_scene::geometry::EdgeVectors3;

	#[test]
	fn straight_tube_vertices_sit_at_radius_from_axis() {
		let from = Vec3::new(0.0, 0.0, 0.0);
		let to = Vec3::new(40.0, 30.0, 0.0);
		let curve = Curve::between(EdgeVectors3::new(from, to), false, 1.0);
		let tube = TubeGeometry::for_edge(&curve, 2.0);
		let dir = (to - from).normalize();

		assert_eq!(tube.positions.len(), (TUBULAR_SEGMENTS + 1) * (RADIAL_SEGMENTS + 1));
		assert_eq!(tube.indices.len(), TUBULAR_SEGMENTS * RADIAL_SEGMENTS * 2);
		for p in &tube.positions {
			let rel = *p - from;
			let off_axis = rel - dir * rel.dot(dir);
			assert_abs_diff_eq!(off_axis.length(), 1.0, epsilon = 1e-3);
		}
	}

	#[test]
	fn curved_tube_follows_curve() {
		let curve = Curve::between(
			EdgeVectors3::new(Vec3::ZERO, Vec3::new(80.0, 0.0, 0.0)),
			true,
			1.0,
		);
		let tube = TubeGeometry::new(&curve, 12, 0.5, 6);
		let ring = 7;
		for (i, center) in tube.centers.iter().enumerate() {
			for j in 0..ring {
				let p = tube.positions[i * ring + j];
				assert_abs_diff_eq!(p.distance(*center), 0.5, epsilon = 1e-3);
			}
		}
		assert!(tube.centers[6].y > 9.0);
	}

	#[test]
	fn degenerate_curve_has_no_mesh() {
		let p = Vec3::new(3.0, 3.0, 3.0);
		let curve = Curve::between(EdgeVectors3::new(p, p), true, 1.0);
		assert!(TubeGeometry::for_edge(&curve, 1.0).is_empty());
	}

	#[test]
	fn indices_stay_in_bounds() {
		let curve = Curve::between(
			EdgeVectors3::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 10.0)),
			true,
			1.0,
		);
		let tube = TubeGeometry::for_edge(&curve, 1.0);
		let max = tube.positions.len() as u32;
		assert!(tube.indices.iter().flatten().all(|&i| i < max));
		assert_eq!(tube.triangles().count(), tube.indices.len());
	}
}
