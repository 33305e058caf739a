//! Perspective camera, projection and controls.

use glam::{Mat4, Quat, Vec3};

use super::spring::{Spring, SpringConfig};

/// Vertical field of view, in degrees.
pub const DEFAULT_FOV: f32 = 10.0;
/// Starting distance from the target.
pub const DEFAULT_DISTANCE: f32 = 1000.0;
const NEAR: f32 = 5.0;
const FAR: f32 = 50000.0;
const MIN_DISTANCE: f32 = 50.0;
const MAX_DISTANCE: f32 = 40000.0;
/// Extra room around fitted content.
const FIT_PADDING: f32 = 1.15;
/// Orbit speed, radians per pixel dragged.
const ROTATE_SPEED: f32 = 0.005;

/// What dragging the background does.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CameraMode {
	/// Translate the view.
	#[default]
	Pan,
	/// Orbit around the target.
	Rotate,
}

/// Canvas size in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
	/// Width.
	pub width: f64,
	/// Height.
	pub height: f64,
}

impl Viewport {
	/// Builds a viewport.
	pub fn new(width: f64, height: f64) -> Self {
		Self { width, height }
	}

	/// Width over height.
	pub fn aspect(&self) -> f32 {
		if self.height > 0.0 {
			(self.width / self.height) as f32
		} else {
			1.0
		}
	}
}

/// A point projected onto the canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projected {
	/// Canvas x.
	pub x: f64,
	/// Canvas y.
	pub y: f64,
	/// Distance along the view axis.
	pub depth: f32,
}

/// A camera pose.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
	/// Eye position.
	pub position: Vec3,
	/// Look-at point.
	pub target: Vec3,
	/// Up vector.
	pub up: Vec3,
	/// Vertical field of view, radians.
	pub fov_y: f32,
}

impl Camera {
	/// Unit vector from eye to target.
	pub fn forward(&self) -> Vec3 {
		(self.target - self.position).normalize_or_zero()
	}

	/// Distance from eye to target.
	pub fn distance(&self) -> f32 {
		self.position.distance(self.target)
	}

	/// Combined view and projection matrix.
	pub fn view_projection(&self, viewport: Viewport) -> Mat4 {
		Mat4::perspective_rh(self.fov_y, viewport.aspect(), NEAR, FAR)
			* Mat4::look_at_rh(self.position, self.target, self.up)
	}

	/// Projects a world point; `None` when it is behind the near plane.
	pub fn project(&self, point: Vec3, viewport: Viewport) -> Option<Projected> {
		let clip = self.view_projection(viewport) * point.extend(1.0);
		if clip.w < NEAR {
			return None;
		}
		let ndc = clip.truncate() / clip.w;
		Some(Projected {
			x: (ndc.x as f64 + 1.0) / 2.0 * viewport.width,
			y: (1.0 - ndc.y as f64) / 2.0 * viewport.height,
			depth: clip.w,
		})
	}

	/// Canvas pixels covered by one world unit at `depth`.
	pub fn pixels_per_unit(&self, depth: f32, viewport: Viewport) -> f64 {
		let focal = viewport.height / 2.0 / (self.fov_y as f64 / 2.0).tan();
		focal / depth.max(NEAR) as f64
	}

	/// Ray through a canvas point, as origin and unit direction.
	pub fn ray(&self, x: f64, y: f64, viewport: Viewport) -> (Vec3, Vec3) {
		let inverse = self.view_projection(viewport).inverse();
		let ndc_x = (x / viewport.width * 2.0 - 1.0) as f32;
		let ndc_y = (1.0 - y / viewport.height * 2.0) as f32;
		let near = inverse.project_point3(Vec3::new(ndc_x, ndc_y, -1.0));
		let far = inverse.project_point3(Vec3::new(ndc_x, ndc_y, 1.0));
		(near, (far - near).normalize_or_zero())
	}

	/// Intersects the ray through a canvas point with the camera-facing plane through `anchor`.
	pub fn unproject_on_plane(&self, x: f64, y: f64, anchor: Vec3, viewport: Viewport) -> Option<Vec3> {
		let (origin, dir) = self.ray(x, y, viewport);
		let normal = self.forward();
		let denom = dir.dot(normal);
		if denom.abs() < 1e-6 {
			return None;
		}
		let t = (anchor - origin).dot(normal) / denom;
		(t >= 0.0).then(|| origin + dir * t)
	}
}

/// Camera with spring-animated pose and user controls.
#[derive(Clone, Debug)]
pub struct CameraController {
	position: Spring<Vec3>,
	target: Spring<Vec3>,
	fov_y: f32,
	mode: CameraMode,
}

impl CameraController {
	/// A camera looking down -z at the origin.
	pub fn new(mode: CameraMode) -> Self {
		let config = SpringConfig::default();
		Self {
			position: Spring::new(Vec3::new(0.0, 0.0, DEFAULT_DISTANCE), config),
			target: Spring::new(Vec3::ZERO, config),
			fov_y: DEFAULT_FOV.to_radians(),
			mode,
		}
	}

	/// Current pose.
	pub fn camera(&self) -> Camera {
		Camera {
			position: self.position.value(),
			target: self.target.value(),
			up: Vec3::Y,
			fov_y: self.fov_y,
		}
	}

	/// Pose the camera is animating to.
	pub fn target_camera(&self) -> Camera {
		Camera {
			position: self.position.target(),
			target: self.target.target(),
			up: Vec3::Y,
			fov_y: self.fov_y,
		}
	}

	/// Background drag behaviour.
	pub fn mode(&self) -> CameraMode {
		self.mode
	}

	/// Changes the background drag behaviour.
	pub fn set_mode(&mut self, mode: CameraMode) {
		self.mode = mode;
	}

	/// Advances animations. Returns true while moving.
	pub fn tick(&mut self, dt: f32) -> bool {
		let a = self.position.step(dt);
		let b = self.target.step(dt);
		a || b
	}

	/// Moves to a pose.
	pub fn set_view(&mut self, position: Vec3, target: Vec3, immediate: bool) {
		self.position.set(position, immediate);
		self.target.set(target, immediate);
	}

	/// Frames a sphere: target on `center`, distance so `radius` fits the view.
	/// The viewing direction is kept.
	pub fn fit(&mut self, center: Vec3, radius: f32, aspect: f32, immediate: bool) {
		let goal = self.target_camera();
		let half_v = self.fov_y / 2.0;
		let half_h = (half_v.tan() * aspect.max(f32::EPSILON)).atan();
		let half = half_v.min(half_h);
		let distance = (radius.max(1.0) / half.sin() * FIT_PADDING).clamp(MIN_DISTANCE, MAX_DISTANCE);
		let direction = match goal.forward() {
			d if d == Vec3::ZERO => Vec3::NEG_Z,
			d => d,
		};
		self.set_view(center - direction * distance, center, immediate);
	}

	/// Dollies toward (`factor < 1`) or away from the target.
	pub fn zoom(&mut self, factor: f32) {
		let goal = self.target_camera();
		let distance = (goal.distance() * factor).clamp(MIN_DISTANCE, MAX_DISTANCE);
		let position = goal.target - goal.forward() * distance;
		self.position.set(position, true);
		self.target.set(goal.target, true);
	}

	/// Handles a background drag of `(dx, dy)` pixels according to the mode.
	pub fn drag(&mut self, dx: f64, dy: f64, viewport: Viewport) {
		match self.mode {
			CameraMode::Pan => self.pan(dx, dy, viewport),
			CameraMode::Rotate => self.rotate(dx, dy),
		}
	}

	/// Translates the view so the content follows the pointer.
	pub fn pan(&mut self, dx: f64, dy: f64, viewport: Viewport) {
		let goal = self.target_camera();
		let units = 1.0 / goal.pixels_per_unit(goal.distance(), viewport) as f32;
		let right = goal.forward().cross(goal.up).normalize_or_zero();
		let up = right.cross(goal.forward());
		let shift = (right * -(dx as f32) + up * dy as f32) * units;
		self.set_view(goal.position + shift, goal.target + shift, true);
	}

	/// Orbits the eye around the target.
	pub fn rotate(&mut self, dx: f64, dy: f64) {
		let goal = self.target_camera();
		let offset = goal.position - goal.target;
		let right = goal.forward().cross(goal.up).normalize_or_zero();
		let yaw = Quat::from_axis_angle(Vec3::Y, -(dx as f32) * ROTATE_SPEED);
		let pitch = if right == Vec3::ZERO {
			Quat::IDENTITY
		} else {
			Quat::from_axis_angle(right, -(dy as f32) * ROTATE_SPEED)
		};
		let rotated = yaw * pitch * offset;
		// Keep away from the poles so `up` stays valid.
		if rotated.normalize_or_zero().dot(Vec3::Y).abs() > 0.99 {
			return;
		}
		self.set_view(goal.target + rotated, goal.target, true);
	}
}
