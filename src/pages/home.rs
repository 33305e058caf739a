use glam::Vec3;
use leptos::prelude::*;

use crate::components::graph_scene::{
	EdgeInterpolation, GraphCanvas, GraphData, GraphEdge, GraphNode, GraphSceneHandle,
};
use crate::load_graph_data;

/// Generate sample graph data: a random tree, some edges curved and labelled.
fn generate_sample_data(n: usize) -> GraphData {
	let nodes: Vec<GraphNode> = (0..n)
		.map(|i| GraphNode {
			id: i.to_string(),
			label: Some(format!("Node {}", i)),
			sub_label: (i % 7 == 0).then(|| format!("group {}", i % 5)),
			cluster: Some(format!("group {}", i % 5)),
			..GraphNode::default()
		})
		.collect();

	let edges: Vec<GraphEdge> = (1..n)
		.map(|i| {
			let target = (rand_simple(i) * (i as f64)) as usize;
			GraphEdge {
				id: format!("{}->{}", i, target),
				source: i.to_string(),
				target: target.to_string(),
				label: (i % 9 == 0).then(|| "link".to_string()),
				interpolation: (i % 4 == 0).then_some(EdgeInterpolation::Curved),
				..GraphEdge::default()
			}
		})
		.collect();

	GraphData { nodes, edges }
}

/// Simple pseudo-random number generator (deterministic for consistency).
fn rand_simple(seed: usize) -> f64 {
	let x = ((seed + 1) * 9301 + 49297) % 233280;
	(x as f64) / 233280.0
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	// Page-supplied data wins over the generated sample
	let data = load_graph_data().unwrap_or_else(|| generate_sample_data(40));
	let graph_data = Signal::derive(move || data.clone());

	let handle = GraphSceneHandle::new();
	let selections = RwSignal::new(Vec::<String>::new());
	let last_event = RwSignal::new(String::from("-"));

	let center_selection = move |_| {
		let ids = selections.get_untracked();
		handle.center_graph(Some(ids.as_slice()));
	};

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-graph">
				<GraphCanvas
					data=graph_data
					selections=selections
					fullscreen=true
					handle=handle
					on_node_click=move |id: String| {
						last_event.set(format!("click node {}", id));
						selections.set(vec![id]);
					}
					on_node_context_menu=move |id: String| {
						last_event.set(format!("context menu node {}", id))
					}
					on_edge_click=move |id: String| last_event.set(format!("click edge {}", id))
					on_edge_context_menu=move |id: String| {
						last_event.set(format!("context menu edge {}", id))
					}
					on_node_drag_end=move |(id, _): (String, Vec3)| {
						last_event.set(format!("dropped node {}", id))
					}
					on_canvas_click=move |_: ()| {
						last_event.set("click canvas".to_string());
						selections.set(Vec::new());
					}
				/>
				<div class="graph-overlay">
					<h1>"Graph Scene"</h1>
					<p class="subtitle">
						"Drag nodes to reposition. Scroll to zoom. Drag background to pan. Right-click for context menu."
					</p>
					<button on:click=center_selection>"Center"</button>
					<p class="last-event">{move || last_event.get()}</p>
				</div>
			</div>
		</ErrorBoundary>
	}
}
