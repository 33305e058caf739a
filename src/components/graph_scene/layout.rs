//! Initial node placement.

use std::collections::HashMap;

use glam::Vec3;

use super::graph::GraphHandle;
use super::types::LayoutType;

/// Radius of the seed circle for the force layout.
const SEED_RADIUS: f32 = 100.0;
/// Simulation steps run before the first frame.
const FORCE_ITERATIONS: usize = 300;
/// Simulated seconds per step.
const FORCE_DT: f32 = 0.016;
/// Arc length reserved per node on the circular layout.
const CIRCLE_SPACING: f32 = 40.0;

/// Computes node positions for `layout`, centred on the origin.
///
/// The handle's simulation is left holding the same positions that are returned.
pub fn layout_graph(handle: &mut GraphHandle, layout: LayoutType) -> HashMap<String, Vec3> {
	match layout {
		LayoutType::ForceDirected2d => {
			handle.seed_circle(SEED_RADIUS);
			handle.simulate(FORCE_ITERATIONS, FORCE_DT);
			let positions = centered(handle.positions());
			for (id, position) in &positions {
				handle.set_position(id, *position);
			}
			positions
		}
		LayoutType::Circular2d => {
			let radius = (handle.node_count() as f32 * CIRCLE_SPACING / std::f32::consts::TAU)
				.max(SEED_RADIUS);
			handle.seed_circle(radius);
			handle.positions()
		}
	}
}

/// Shifts positions so their bounding-box centre is the origin.
fn centered(mut positions: HashMap<String, Vec3>) -> HashMap<String, Vec3> {
	let Some((min, max)) = bounds(positions.values().copied()) else {
		return positions;
	};
	let center = (min + max) * 0.5;
	for p in positions.values_mut() {
		*p -= center;
	}
	positions
}

/// Axis-aligned bounds of a point set.
pub fn bounds(points: impl IntoIterator<Item = Vec3>) -> Option<(Vec3, Vec3)> {
	points.into_iter().fold(None, |acc, p| match acc {
		None => Some((p, p)),
		Some((min, max)) => Some((min.min(p), max.max(p))),
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::graph_scene::graph::tests::sample;

	#[test]
	fn circular_layout_is_evenly_spaced() {
		let mut handle = GraphHandle::build(&sample());
		let positions = layout_graph(&mut handle, LayoutType::Circular2d);
		assert_eq!(positions.len(), 4);
		let ab = positions["a"].distance(positions["b"]);
		let bc = positions["b"].distance(positions["c"]);
		assert!((ab - bc).abs() < 1e-2);
		assert!(positions.values().all(|p| p.z == 0.0));
	}

	#[test]
	fn force_layout_is_centred_and_finite() {
		let mut handle = GraphHandle::build(&sample());
		let positions = layout_graph(&mut handle, LayoutType::ForceDirected2d);
		assert!(positions.values().all(|p| p.is_finite()));
		let (min, max) = bounds(positions.values().copied()).unwrap();
		assert!(((min + max) * 0.5).length() < 1e-2);
	}

	#[test]
	fn simulation_holds_the_returned_positions() {
		for layout in [LayoutType::ForceDirected2d, LayoutType::Circular2d] {
			let mut handle = GraphHandle::build(&sample());
			let positions = layout_graph(&mut handle, layout);
			let simulated = handle.positions();
			for (id, p) in &positions {
				assert!(simulated[id].distance(*p) < 1e-4, "{id} drifted under {layout:?}");
			}
		}
	}

	#[test]
	fn bounds_of_nothing() {
		assert_eq!(bounds(Vec::new()), None);
	}
}
