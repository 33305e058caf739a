//! Node size providers.

use std::collections::HashMap;

use super::config::GraphSceneConfig;
use super::graph::GraphHandle;
use super::types::{GraphData, SizingType};

/// Linearly maps `value` from `[lo, hi]` into `[min, max]`. A flat range maps to the middle.
fn scale(value: f32, lo: f32, hi: f32, min: f32, max: f32) -> f32 {
	if (hi - lo).abs() < f32::EPSILON {
		return (min + max) / 2.0;
	}
	min + (value - lo) / (hi - lo) * (max - min)
}

fn scale_all(raw: Vec<(String, f32)>, min: f32, max: f32) -> HashMap<String, f32> {
	let lo = raw.iter().map(|(_, v)| *v).fold(f32::INFINITY, f32::min);
	let hi = raw.iter().map(|(_, v)| *v).fold(f32::NEG_INFINITY, f32::max);
	raw.into_iter()
		.map(|(id, v)| (id, scale(v, lo, hi, min, max)))
		.collect()
}

/// Computes a size for every node the handle accepted.
pub fn node_sizes(
	data: &GraphData,
	handle: &GraphHandle,
	config: &GraphSceneConfig,
) -> HashMap<String, f32> {
	let (min, max) = (config.min_node_size, config.max_node_size);
	let accepted = data.nodes.iter().filter(|n| handle.has_node(&n.id));
	match config.sizing_type {
		SizingType::None => accepted
			.map(|n| (n.id.clone(), config.default_node_size))
			.collect(),
		SizingType::Default => accepted
			.map(|n| (n.id.clone(), n.size.unwrap_or(config.default_node_size)))
			.collect(),
		SizingType::Centrality => scale_all(
			accepted
				.map(|n| (n.id.clone(), handle.degree(&n.id) as f32))
				.collect(),
			min,
			max,
		),
		SizingType::Attribute => {
			let Some(attribute) = config.sizing_attribute.as_deref() else {
				log::warn!("sizing: attribute sizing without an attribute, using defaults");
				return accepted
					.map(|n| (n.id.clone(), config.default_node_size))
					.collect();
			};
			let raw: Vec<(String, Option<f32>)> = accepted
				.map(|n| {
					let value = n
						.data
						.as_ref()
						.and_then(|d| d.get(attribute))
						.and_then(|v| v.as_f64())
						.map(|v| v as f32);
					(n.id.clone(), value)
				})
				.collect();
			// Nodes missing the attribute rank with the smallest value present.
			let floor = raw
				.iter()
				.filter_map(|(_, v)| *v)
				.fold(f32::INFINITY, f32::min);
			let floor = if floor.is_finite() { floor } else { 0.0 };
			scale_all(
				raw.into_iter()
					.map(|(id, v)| (id, v.unwrap_or(floor)))
					.collect(),
				min,
				max,
			)
		}
	}
}
