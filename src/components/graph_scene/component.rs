use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec3;
use leptos::prelude::*;
use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::camera::Viewport;
use super::config::GraphSceneConfig;
use super::interaction::{PointerButton, PointerEvent};
use super::render;
use super::scene::SceneEvent;
use super::state::{GraphSceneHandle, GraphState};
use super::types::GraphData;

/// Longest frame step fed to the animations, in seconds.
const MAX_FRAME_DT: f32 = 0.1;

/// Host callbacks, bundled so listeners can share them.
#[derive(Clone, Copy, Default)]
struct Callbacks {
	node_click: Option<Callback<String>>,
	node_context_menu: Option<Callback<String>>,
	node_pointer_over: Option<Callback<String>>,
	node_pointer_out: Option<Callback<String>>,
	node_drag_end: Option<Callback<(String, Vec3)>>,
	edge_click: Option<Callback<String>>,
	edge_context_menu: Option<Callback<String>>,
	edge_pointer_over: Option<Callback<String>>,
	edge_pointer_out: Option<Callback<String>>,
	canvas_click: Option<Callback<()>>,
}

impl Callbacks {
	fn dispatch(&self, events: Vec<SceneEvent>) {
		for event in events {
			match event {
				SceneEvent::NodeClick(id) => fire(self.node_click, id),
				SceneEvent::NodeContextMenu(id) => fire(self.node_context_menu, id),
				SceneEvent::NodePointerOver(id) => fire(self.node_pointer_over, id),
				SceneEvent::NodePointerOut(id) => fire(self.node_pointer_out, id),
				SceneEvent::NodeDragStart(_) => {}
				SceneEvent::NodeDragEnd { id, position } => fire(self.node_drag_end, (id, position)),
				SceneEvent::EdgeClick(id) => fire(self.edge_click, id),
				SceneEvent::EdgeContextMenu(id) => fire(self.edge_context_menu, id),
				SceneEvent::EdgePointerOver(id) => fire(self.edge_pointer_over, id),
				SceneEvent::EdgePointerOut(id) => fire(self.edge_pointer_out, id),
				SceneEvent::CanvasClick => fire(self.canvas_click, ()),
			}
		}
	}
}

fn fire<T: 'static>(callback: Option<Callback<T>>, value: T) {
	if let Some(callback) = callback {
		callback.run(value);
	}
}

fn window_size(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

fn canvas_point(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

fn pointer_event(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> PointerEvent {
	let (x, y) = canvas_point(canvas, ev);
	PointerEvent::new(x, y, PointerButton::from_dom(ev.button()))
}

/// A 3D node-edge graph drawn on a canvas.
///
/// Nodes and edges animate between layouts, can be hovered, clicked, opened
/// with a context menu (secondary button) and dragged. Pass a
/// [`GraphSceneHandle`] to recentre the camera from outside.
#[component]
pub fn GraphCanvas(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(optional, into)] selections: MaybeProp<Vec<String>>,
	#[prop(optional, into)] actives: MaybeProp<Vec<String>>,
	#[prop(optional, into)] config: MaybeProp<GraphSceneConfig>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
	#[prop(optional)] handle: Option<GraphSceneHandle>,
	#[prop(optional, into)] on_node_click: Option<Callback<String>>,
	#[prop(optional, into)] on_node_context_menu: Option<Callback<String>>,
	#[prop(optional, into)] on_node_pointer_over: Option<Callback<String>>,
	#[prop(optional, into)] on_node_pointer_out: Option<Callback<String>>,
	#[prop(optional, into)] on_node_drag_end: Option<Callback<(String, Vec3)>>,
	#[prop(optional, into)] on_edge_click: Option<Callback<String>>,
	#[prop(optional, into)] on_edge_context_menu: Option<Callback<String>>,
	#[prop(optional, into)] on_edge_pointer_over: Option<Callback<String>>,
	#[prop(optional, into)] on_edge_pointer_out: Option<Callback<String>>,
	#[prop(optional, into)] on_canvas_click: Option<Callback<()>>,
) -> impl IntoView {
	let callbacks = Callbacks {
		node_click: on_node_click,
		node_context_menu: on_node_context_menu,
		node_pointer_over: on_node_pointer_over,
		node_pointer_out: on_node_pointer_out,
		node_drag_end: on_node_drag_end,
		edge_click: on_edge_click,
		edge_context_menu: on_edge_context_menu,
		edge_pointer_over: on_edge_pointer_over,
		edge_pointer_out: on_edge_pointer_out,
		canvas_click: on_canvas_click,
	};

	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let handle = handle.unwrap_or_default();
	let state: Rc<RefCell<Option<GraphState>>> = handle.cell();
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (state_init, animate_init, resize_cb_init) =
		(state.clone(), animate.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if state_init.borrow().is_some() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = if fullscreen {
			window_size(&window).unwrap_or((800.0, 600.0))
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = match canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|ctx| ctx.dyn_into().ok())
		{
			Some(ctx) => ctx,
			None => {
				warn!("graph-scene: canvas has no 2d context");
				return;
			}
		};
		let config = config.get_untracked().unwrap_or_default();
		let mut graph_state = GraphState::new(&data.get_untracked(), config, Viewport::new(w, h));
		graph_state
			.store
			.set_selections(selections.get_untracked().unwrap_or_default());
		graph_state
			.store
			.set_actives(actives.get_untracked().unwrap_or_default());
		*state_init.borrow_mut() = Some(graph_state);

		if fullscreen {
			let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some((nw, nh)) = web_sys::window().as_ref().and_then(window_size) else {
					return;
				};
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut s) = *state_resize.borrow_mut() {
					s.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (state_anim, animate_inner) = (state_init.clone(), animate_init.clone());
		let mut last_frame = js_sys::Date::now();
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			let now = js_sys::Date::now();
			let dt = (((now - last_frame) / 1000.0) as f32).min(MAX_FRAME_DT);
			last_frame = now;
			if let Ok(mut guard) = state_anim.try_borrow_mut() {
				if let Some(ref mut s) = *guard {
					if s.animation_running {
						s.tick(dt);
					}
					let list = render::build_draw_list(&s.scene, &s.store, s.viewport);
					render::render(&ctx, &list, &s.scene.config().theme, s.viewport);
				}
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				if let Some(window) = web_sys::window() {
					let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
				}
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let state_data = state.clone();
	Effect::new(move |prev: Option<()>| {
		let data = data.get();
		if prev.is_none() {
			return;
		}
		if let Some(ref mut s) = *state_data.borrow_mut() {
			s.set_data(data);
		}
	});

	let state_config = state.clone();
	Effect::new(move |prev: Option<()>| {
		let config = config.get();
		if prev.is_none() {
			return;
		}
		if let Some(ref mut s) = *state_config.borrow_mut() {
			s.set_config(config.unwrap_or_default());
		}
	});

	let state_sel = state.clone();
	Effect::new(move |_| {
		let ids = selections.get().unwrap_or_default();
		if let Some(ref mut s) = *state_sel.borrow_mut() {
			s.store.set_selections(ids);
		}
	});

	let state_act = state.clone();
	Effect::new(move |_| {
		let ids = actives.get().unwrap_or_default();
		if let Some(ref mut s) = *state_act.borrow_mut() {
			s.store.set_actives(ids);
		}
	});

	// Listeners collect events under the borrow and dispatch after it is
	// released, so host callbacks may use the handle.
	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let event = pointer_event(&canvas.into(), &ev);
		let events = match *state_md.borrow_mut() {
			Some(ref mut s) => s.pointer_down(event),
			None => return,
		};
		callbacks.dispatch(events);
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let (x, y) = canvas_point(&canvas.into(), &ev);
		let events = match *state_mm.borrow_mut() {
			Some(ref mut s) => s.pointer_move(x, y),
			None => return,
		};
		callbacks.dispatch(events);
	};

	let state_mu = state.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let event = pointer_event(&canvas.into(), &ev);
		let events = match *state_mu.borrow_mut() {
			Some(ref mut s) => s.pointer_up(event),
			None => return,
		};
		callbacks.dispatch(events);
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		let events = match *state_ml.borrow_mut() {
			Some(ref mut s) => s.pointer_leave(),
			None => return,
		};
		callbacks.dispatch(events);
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			s.wheel(ev.delta_y());
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="graph-scene-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			on:contextmenu=|ev: MouseEvent| ev.prevent_default()
			style="display: block; cursor: grab;"
		/>
	}
}
