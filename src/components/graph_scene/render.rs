use std::f64::consts::PI;

use glam::Vec3;
use wasm_bindgen::JsValue;
use web_sys::{CanvasGradient, CanvasRenderingContext2d};

use super::camera::{Camera, Viewport};
use super::edge::{Arrow, LABEL_GAP, label_transform};
use super::scene::GraphScene;
use super::store::GraphStore;
use super::theme::{Color, Theme};
use super::types::EdgeLabelPosition;

/// Segments around an arrow cone.
const ARROW_SEGMENTS: usize = 8;
/// Ambient share of the tube lighting; the rest is headlight diffuse.
const AMBIENT: f32 = 0.55;

/// A filled, lit triangle of a tube or arrow.
#[derive(Clone, Debug, PartialEq)]
pub struct Triangle {
	pub points: [(f64, f64); 3],
	pub color: String,
}

/// A node sphere.
#[derive(Clone, Debug, PartialEq)]
pub struct Sphere {
	pub x: f64,
	pub y: f64,
	pub radius: f64,
	pub fill: Color,
	pub opacity: f32,
	pub ring: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
	Triangle(Triangle),
	Sphere(Sphere),
}

/// Text drawn on top of the scene.
#[derive(Clone, Debug, PartialEq)]
pub struct Label {
	pub x: f64,
	pub y: f64,
	pub angle: f64,
	pub text: String,
	pub color: String,
	pub font_size: f64,
	pub stroke: Option<String>,
	pub background: Option<String>,
}

/// Everything one frame draws. Shapes are ordered far to near.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DrawList {
	pub shapes: Vec<(f32, Shape)>,
	pub labels: Vec<Label>,
}

/// Projects the scene through its camera into canvas primitives.
pub fn build_draw_list(scene: &GraphScene, store: &GraphStore, viewport: Viewport) -> DrawList {
	let config = scene.config();
	let theme = &config.theme;
	let camera = scene.camera().camera();
	let mut list = DrawList::default();

	for edge in scene.edges() {
		let line = edge.line();
		let opacity = line.opacity();
		if opacity <= 0.0 {
			continue;
		}
		let color = Color::parse_or(&line.props().color, &theme.edge.fill);
		for (points, normal) in line.geometry().triangles() {
			push_triangle(&mut list, &camera, viewport, points, normal, color, opacity);
		}
		if let Some(arrow) = edge.arrow() {
			let color = Color::parse_or(edge.arrow_color(), &theme.arrow.fill);
			for (points, normal) in cone(&arrow) {
				push_triangle(&mut list, &camera, viewport, points, normal, color, opacity);
			}
		}
		if let Some(label) = edge.label() {
			let curve = line.curve();
			let (Some(anchor), Some(from), Some(to)) = (
				camera.project(label.anchor, viewport),
				camera.project(curve.start(), viewport),
				camera.project(curve.end(), viewport),
			) else {
				continue;
			};
			let (dx, dy, angle) =
				label_transform((from.x, from.y), (to.x, to.y), label.placement, LABEL_GAP);
			list.labels.push(Label {
				x: anchor.x + dx,
				y: anchor.y + dy,
				angle,
				text: label.text.clone(),
				color: Color::parse_or(&label.color, &theme.edge.label.color).rgba(opacity),
				font_size: config.label_font_size * 0.85,
				stroke: theme.edge.label.stroke.clone(),
				background: (label.placement == EdgeLabelPosition::Inline)
					.then(|| theme.canvas.background.clone()),
			});
		}
	}

	for node in scene.nodes() {
		let opacity = node.opacity();
		if opacity <= 0.0 {
			continue;
		}
		let Some(p) = camera.project(node.position(), viewport) else {
			continue;
		};
		let radius = node.size() as f64 * camera.pixels_per_unit(p.depth, viewport);
		if radius < 0.1 {
			continue;
		}
		let ring = if node.is_active() {
			Some(theme.ring.active_fill.clone())
		} else if store.is_emphasized(node.id()) {
			Some(theme.ring.fill.clone())
		} else {
			None
		};
		list.shapes.push((
			p.depth,
			Shape::Sphere(Sphere {
				x: p.x,
				y: p.y,
				radius,
				fill: Color::parse_or(node.fill(), &theme.node.fill),
				opacity,
				ring,
			}),
		));

		if let Some((label, sub_label)) = node.labels(radius) {
			let color = Color::parse_or(node.label_color(), &theme.node.label.color).rgba(opacity);
			let font_size = config.label_font_size;
			let y = p.y + radius + font_size;
			list.labels.push(Label {
				x: p.x,
				y,
				angle: 0.0,
				text: label.to_string(),
				color: color.clone(),
				font_size,
				stroke: theme.node.label.stroke.clone(),
				background: None,
			});
			if let Some(sub_label) = sub_label {
				list.labels.push(Label {
					x: p.x,
					y: y + font_size,
					angle: 0.0,
					text: sub_label.to_string(),
					color,
					font_size: font_size * 0.8,
					stroke: theme.node.label.stroke.clone(),
					background: None,
				});
			}
		}
	}

	list.shapes.sort_by(|a, b| b.0.total_cmp(&a.0));
	list
}

fn push_triangle(
	list: &mut DrawList,
	camera: &Camera,
	viewport: Viewport,
	points: [Vec3; 3],
	normal: Vec3,
	color: Color,
	opacity: f32,
) {
	let centroid = (points[0] + points[1] + points[2]) / 3.0;
	let facing = normal.dot((camera.position - centroid).normalize_or_zero());
	if facing <= 0.0 {
		return;
	}
	let (Some(a), Some(b), Some(c)) = (
		camera.project(points[0], viewport),
		camera.project(points[1], viewport),
		camera.project(points[2], viewport),
	) else {
		return;
	};
	let light = AMBIENT + (1.0 - AMBIENT) * facing;
	list.shapes.push((
		(a.depth + b.depth + c.depth) / 3.0,
		Shape::Triangle(Triangle {
			points: [(a.x, a.y), (b.x, b.y), (c.x, c.y)],
			color: color.shade(light).rgba(opacity),
		}),
	));
}

/// Side and base triangles of an arrow cone, with outward normals.
fn cone(arrow: &Arrow) -> Vec<([Vec3; 3], Vec3)> {
	let axis = (arrow.tip - arrow.base).normalize_or_zero();
	if axis == Vec3::ZERO {
		return Vec::new();
	}
	let u = axis.any_orthonormal_vector();
	let v = axis.cross(u);
	let rim: Vec<Vec3> = (0..=ARROW_SEGMENTS)
		.map(|i| {
			let a = i as f32 / ARROW_SEGMENTS as f32 * std::f32::consts::TAU;
			arrow.base + (u * a.cos() + v * a.sin()) * arrow.radius
		})
		.collect();

	let mut out = Vec::with_capacity(ARROW_SEGMENTS * 2);
	for pair in rim.windows(2) {
		let side = [arrow.tip, pair[0], pair[1]];
		let mut normal = (pair[0] - arrow.tip).cross(pair[1] - arrow.tip).normalize_or_zero();
		if normal.dot((pair[0] + pair[1]) * 0.5 - arrow.base) < 0.0 {
			normal = -normal;
		}
		out.push((side, normal));
		out.push(([arrow.base, pair[1], pair[0]], -axis));
	}
	out
}

/// Draws a frame.
pub fn render(ctx: &CanvasRenderingContext2d, list: &DrawList, theme: &Theme, viewport: Viewport) {
	ctx.set_fill_style_str(&theme.canvas.background);
	ctx.fill_rect(0.0, 0.0, viewport.width, viewport.height);

	for (_, shape) in &list.shapes {
		match shape {
			Shape::Triangle(tri) => draw_triangle(ctx, tri),
			Shape::Sphere(sphere) => draw_sphere(ctx, sphere),
		}
	}
	for label in &list.labels {
		draw_label(ctx, label);
	}
}

fn draw_triangle(ctx: &CanvasRenderingContext2d, tri: &Triangle) {
	let [a, b, c] = tri.points;
	ctx.begin_path();
	ctx.move_to(a.0, a.1);
	ctx.line_to(b.0, b.1);
	ctx.line_to(c.0, c.1);
	ctx.close_path();
	ctx.set_fill_style_str(&tri.color);
	ctx.fill();
	// Hairline in the same colour hides seams between neighbours.
	ctx.set_stroke_style_str(&tri.color);
	ctx.set_line_width(0.5);
	ctx.stroke();
}

fn sphere_gradient(ctx: &CanvasRenderingContext2d, s: &Sphere) -> Result<CanvasGradient, JsValue> {
	let (hx, hy) = (s.x - s.radius * 0.35, s.y - s.radius * 0.35);
	let gradient = ctx.create_radial_gradient(hx, hy, s.radius * 0.1, s.x, s.y, s.radius)?;
	gradient.add_color_stop(0.0, &s.fill.lighten(0.45).rgba(s.opacity))?;
	gradient.add_color_stop(0.6, &s.fill.rgba(s.opacity))?;
	gradient.add_color_stop(1.0, &s.fill.shade(0.6).rgba(s.opacity))?;
	Ok(gradient)
}

fn draw_sphere(ctx: &CanvasRenderingContext2d, s: &Sphere) {
	ctx.begin_path();
	let _ = ctx.arc(s.x, s.y, s.radius, 0.0, 2.0 * PI);
	match sphere_gradient(ctx, s) {
		#[allow(deprecated)]
		Ok(gradient) => ctx.set_fill_style(&gradient),
		Err(_) => ctx.set_fill_style_str(&s.fill.rgba(s.opacity)),
	}
	ctx.fill();

	if let Some(ring) = &s.ring {
		let width = (s.radius * 0.15).clamp(1.0, 3.0);
		ctx.begin_path();
		let _ = ctx.arc(s.x, s.y, s.radius + width + 1.0, 0.0, 2.0 * PI);
		ctx.set_stroke_style_str(ring);
		ctx.set_global_alpha(s.opacity as f64);
		ctx.set_line_width(width);
		ctx.stroke();
		ctx.set_global_alpha(1.0);
	}
}

fn draw_label(ctx: &CanvasRenderingContext2d, label: &Label) {
	ctx.save();
	let _ = ctx.translate(label.x, label.y);
	let _ = ctx.rotate(label.angle);
	ctx.set_font(&format!("{}px sans-serif", label.font_size));
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");

	if let Some(background) = &label.background {
		let width = ctx
			.measure_text(&label.text)
			.map(|m| m.width())
			.unwrap_or(label.font_size * 0.6 * label.text.chars().count() as f64);
		let pad = label.font_size * 0.3;
		ctx.set_fill_style_str(background);
		ctx.fill_rect(
			-width / 2.0 - pad,
			-label.font_size / 2.0 - pad,
			width + pad * 2.0,
			label.font_size + pad * 2.0,
		);
	}
	if let Some(stroke) = &label.stroke {
		ctx.set_stroke_style_str(stroke);
		ctx.set_line_width(3.0);
		let _ = ctx.stroke_text(&label.text, 0.0, 0.0);
	}
	ctx.set_fill_style_str(&label.color);
	let _ = ctx.fill_text(&label.text, 0.0, 0.0);
	ctx.restore();
}
