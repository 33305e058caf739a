//! Spring-physics interpolation used for every animated value in the scene.

use std::ops::{Add, Mul, Sub};

use glam::Vec3;

/// Integration sub-step, in seconds.
const STEP: f32 = 0.001;
/// Upper bound on a single frame's simulated time.
const MAX_FRAME: f32 = 0.1;

/// A value a [`Spring`] can drive.
pub trait Animatable:
	Copy + Add<Output = Self> + Sub<Output = Self> + Mul<f32, Output = Self>
{
	/// Length of the value, treated as a displacement.
	fn magnitude(self) -> f32;
	/// Inner product, used to detect overshoot.
	fn dot(self, other: Self) -> f32;
}

impl Animatable for f32 {
	fn magnitude(self) -> f32 {
		self.abs()
	}

	fn dot(self, other: Self) -> f32 {
		self * other
	}
}

impl Animatable for Vec3 {
	fn magnitude(self) -> f32 {
		self.length()
	}

	fn dot(self, other: Self) -> f32 {
		Vec3::dot(self, other)
	}
}

/// Spring parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringConfig {
	/// Mass of the moving body.
	pub mass: f32,
	/// Spring stiffness.
	pub tension: f32,
	/// Velocity damping.
	pub friction: f32,
	/// Stop once displacement and velocity fall under this.
	pub precision: f32,
	/// Snap to the target instead of overshooting it.
	pub clamp: bool,
}

impl Default for SpringConfig {
	fn default() -> Self {
		Self {
			mass: 10.0,
			tension: 1000.0,
			friction: 300.0,
			precision: 0.01,
			clamp: true,
		}
	}
}

/// A value moving toward a target under a damped spring.
#[derive(Clone, Debug, PartialEq)]
pub struct Spring<T: Animatable> {
	value: T,
	target: T,
	velocity: T,
	config: SpringConfig,
}

impl<T: Animatable> Spring<T> {
	/// A spring at rest on `value`.
	pub fn new(value: T, config: SpringConfig) -> Self {
		Self {
			value,
			target: value,
			velocity: value - value,
			config,
		}
	}

	/// Current value.
	pub fn value(&self) -> T {
		self.value
	}

	/// Value the spring is heading to.
	pub fn target(&self) -> T {
		self.target
	}

	/// Retargets the spring. `immediate` jumps straight to the target.
	pub fn set(&mut self, target: T, immediate: bool) {
		self.target = target;
		if immediate {
			self.value = target;
			self.velocity = target - target;
		}
	}

	/// True when the value rests on the target.
	pub fn is_idle(&self) -> bool {
		(self.target - self.value).magnitude() <= self.config.precision
			&& self.velocity.magnitude() <= self.config.precision
	}

	/// Advances the simulation by `dt` seconds. Returns true while still moving.
	pub fn step(&mut self, dt: f32) -> bool {
		if self.is_idle() {
			self.value = self.target;
			self.velocity = self.target - self.target;
			return false;
		}
		let SpringConfig {
			mass,
			tension,
			friction,
			clamp,
			..
		} = self.config;
		let steps = (dt.clamp(0.0, MAX_FRAME) / STEP).ceil() as usize;
		for _ in 0..steps {
			let before = self.target - self.value;
			let force = before * tension + self.velocity * -friction;
			self.velocity = self.velocity + force * (STEP / mass);
			self.value = self.value + self.velocity * STEP;
			if clamp && (self.target - self.value).dot(before) < 0.0 {
				self.value = self.target;
				self.velocity = self.target - self.target;
				break;
			}
		}
		if self.is_idle() {
			self.value = self.target;
			self.velocity = self.target - self.target;
			return false;
		}
		true
	}
}

#[cfg(test)]
mod tests {
	use approx::assert_abs_diff_eq;

	use super::*;

	#[test]
	fn converges_to_target() {
		let mut spring = Spring::new(0.0_f32, SpringConfig::default());
		spring.set(1.0, false);
		let mut frames = 0;
		while spring.step(1.0 / 60.0) {
			frames += 1;
			assert!(frames < 600, "spring never settled");
		}
		assert_eq!(spring.value(), 1.0);
		assert!(frames > 1);
	}

	#[test]
	fn immediate_skips_animation() {
		let mut spring = Spring::new(Vec3::ZERO, SpringConfig::default());
		spring.set(Vec3::new(5.0, -2.0, 1.0), true);
		assert_eq!(spring.value(), Vec3::new(5.0, -2.0, 1.0));
		assert!(!spring.step(1.0 / 60.0));
	}

	#[test]
	fn clamp_prevents_overshoot() {
		let config = SpringConfig {
			mass: 1.0,
			tension: 500.0,
			friction: 1.0,
			precision: 0.001,
			clamp: true,
		};
		let mut spring = Spring::new(0.0_f32, config);
		spring.set(10.0, false);
		for _ in 0..120 {
			spring.step(1.0 / 60.0);
			assert!(spring.value() <= 10.0);
		}
		assert_abs_diff_eq!(spring.value(), 10.0);
	}

	#[test]
	fn moves_partially_in_one_frame() {
		let mut spring = Spring::new(Vec3::ZERO, SpringConfig::default());
		spring.set(Vec3::new(100.0, 0.0, 0.0), false);
		spring.step(1.0 / 60.0);
		let x = spring.value().x;
		assert!(x > 0.0 && x < 100.0);
	}
}
