//! Rotation and projection for the gyroscope.

use glam::{DMat3, DVec2, DVec3};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
	X,
	Y,
	Z,
}

/// A rotation assembled one axis step at a time.
///
/// Every `then_*` call appends a rotation that is applied *after* the ones
/// already in the chain, so `Orientation::IDENTITY.then_x(a).then_y(b)` turns
/// a point about X by `a` first and about Y by `b` second. Positive angles
/// follow the right-hand rule.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Orientation(DMat3);

impl Orientation {
	pub const IDENTITY: Self = Self(DMat3::IDENTITY);

	pub fn then_axis(self, axis: Axis, angle: f64) -> Self {
		let step = match axis {
			Axis::X => DMat3::from_rotation_x(angle),
			Axis::Y => DMat3::from_rotation_y(angle),
			Axis::Z => DMat3::from_rotation_z(angle),
		};
		Self(step * self.0)
	}

	pub fn then_x(self, angle: f64) -> Self {
		self.then_axis(Axis::X, angle)
	}

	pub fn then_y(self, angle: f64) -> Self {
		self.then_axis(Axis::Y, angle)
	}

	pub fn then_z(self, angle: f64) -> Self {
		self.then_axis(Axis::Z, angle)
	}

	/// Apply `next` after `self`.
	pub fn then(self, next: Orientation) -> Self {
		Self(next.0 * self.0)
	}

	pub fn apply(&self, point: DVec3) -> DVec3 {
		self.0 * point
	}
}

/// A 3D point after perspective projection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projected {
	pub pos: DVec2,
	/// Perspective factor `fov / (fov + z)`.
	pub scale: f64,
	/// Depth before projection; larger is further away.
	pub z: f64,
}

pub fn project(point: DVec3, center: DVec2, fov: f64) -> Projected {
	let scale = fov / (fov + point.z);
	Projected {
		pos: center + point.truncate() * scale,
		scale,
		z: point.z,
	}
}

#[cfg(test)]
mod tests {
	use std::f64::consts::FRAC_PI_2;

	use super::*;

	const EPS: f64 = 1e-12;

	#[test]
	fn test_single_axis_rotations() {
		let x = Orientation::IDENTITY.then_x(FRAC_PI_2).apply(DVec3::Y);
		assert!(x.abs_diff_eq(DVec3::Z, EPS));
		let y = Orientation::IDENTITY.then_y(FRAC_PI_2).apply(DVec3::Z);
		assert!(y.abs_diff_eq(DVec3::X, EPS));
		let z = Orientation::IDENTITY.then_z(FRAC_PI_2).apply(DVec3::X);
		assert!(z.abs_diff_eq(DVec3::Y, EPS));
	}

	#[test]
	fn test_composition_order() {
		// Z first sends X to Y, then X sends Y to Z.
		let zx = Orientation::IDENTITY
			.then_z(FRAC_PI_2)
			.then_x(FRAC_PI_2)
			.apply(DVec3::X);
		assert!(zx.abs_diff_eq(DVec3::Z, EPS));

		// X first leaves X alone, then Z sends it to Y.
		let xz = Orientation::IDENTITY
			.then_x(FRAC_PI_2)
			.then_z(FRAC_PI_2)
			.apply(DVec3::X);
		assert!(xz.abs_diff_eq(DVec3::Y, EPS));
	}

	#[test]
	fn test_then_matches_chained_steps() {
		let tilt = Orientation::IDENTITY.then_x(0.3).then_y(1.1);
		let spin = Orientation::IDENTITY.then_z(-0.7);
		let p = DVec3::new(0.2, -0.4, 0.9);
		let chained = Orientation::IDENTITY.then_x(0.3).then_y(1.1).then_z(-0.7);
		assert!(tilt.then(spin).apply(p).abs_diff_eq(chained.apply(p), EPS));
	}

	#[test]
	fn test_rotation_preserves_length() {
		let o = Orientation::IDENTITY.then_x(0.4).then_y(2.2).then_z(-1.3);
		let p = DVec3::new(3.0, -1.0, 2.0);
		assert!((o.apply(p).length() - p.length()).abs() < 1e-9);
	}

	#[test]
	fn test_project_perspective_divide() {
		let center = DVec2::new(400.0, 300.0);
		let at_plane = project(DVec3::new(100.0, -50.0, 0.0), center, 600.0);
		assert_eq!(at_plane.pos, DVec2::new(500.0, 250.0));
		assert_eq!(at_plane.scale, 1.0);

		let far = project(DVec3::new(100.0, 0.0, 600.0), center, 600.0);
		assert_eq!(far.scale, 0.5);
		assert_eq!(far.pos, DVec2::new(450.0, 300.0));
		assert_eq!(far.z, 600.0);
	}
}
