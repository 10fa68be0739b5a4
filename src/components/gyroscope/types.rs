use std::f64::consts::PI;

use super::transform::{Axis, Orientation};

/// One of the large tilted rings. Sizes are fractions of the canvas scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GyroRing {
	pub radius: f64,
	pub segments: usize,
	pub line_width: f64,
	/// Fixed tilt about X, then Y, then Z.
	pub tilt: [f64; 3],
	pub spin_axis: Axis,
	/// Radians per millisecond.
	pub spin_speed: f64,
	pub opacity: f64,
	pub dash: Option<[f64; 2]>,
	/// Milliseconds after start before the ring fades in.
	pub bloom_delay: f64,
}

impl GyroRing {
	pub fn tilt(&self) -> Orientation {
		let [x, y, z] = self.tilt;
		Orientation::IDENTITY.then_x(x).then_y(y).then_z(z)
	}
}

const fn ring(
	radius: f64,
	segments: usize,
	line_width: f64,
	tilt: [f64; 3],
	spin_axis: Axis,
	spin_speed: f64,
	opacity: f64,
	dash: Option<[f64; 2]>,
	bloom_delay: f64,
) -> GyroRing {
	GyroRing {
		radius,
		segments,
		line_width,
		tilt,
		spin_axis,
		spin_speed,
		opacity,
		dash,
		bloom_delay,
	}
}

/// Inner rings first, then the wide ethereal ones.
pub const RINGS: [GyroRing; 10] = [
	ring(0.16, 100, 2.0, [0.3, 0.0, 0.0], Axis::Y, 0.0005, 0.65, None, 200.0),
	ring(0.21, 100, 1.7, [PI * 0.42, PI * 0.15, 0.0], Axis::X, -0.00042, 0.50, None, 350.0),
	ring(0.19, 100, 1.2, [PI * 0.52, 0.0, PI * 0.3], Axis::Z, 0.000378, 0.35, Some([4.0, 5.0]), 500.0),
	ring(0.30, 140, 1.3, [0.15, PI * 0.25, 0.0], Axis::Y, 0.000294, 0.32, None, 650.0),
	ring(0.34, 140, 1.1, [PI * 0.35, 0.0, PI * 0.5], Axis::X, -0.000252, 0.26, Some([5.0, 7.0]), 800.0),
	ring(0.28, 120, 1.0, [PI * 0.6, PI * 0.4, 0.0], Axis::Z, 0.000336, 0.22, Some([3.0, 4.0]), 750.0),
	ring(0.42, 180, 0.9, [0.1, PI * 0.1, PI * 0.2], Axis::Y, 0.000168, 0.18, Some([2.0, 4.0]), 1000.0),
	ring(0.46, 180, 0.7, [PI * 0.45, PI * 0.3, 0.0], Axis::X, -0.000147, 0.14, Some([2.0, 3.0]), 1200.0),
	ring(0.58, 220, 0.6, [PI * 0.12, PI * 0.08, PI * 0.35], Axis::Z, 0.00012, 0.11, Some([2.0, 6.0]), 1400.0),
	ring(0.72, 260, 0.5, [PI * 0.3, PI * 0.18, 0.0], Axis::Y, -0.0001, 0.08, Some([1.0, 5.0]), 1600.0),
];

/// Motes riding each of [`RINGS`].
pub const MOTES_PER_RING: [usize; 10] = [10, 8, 8, 7, 6, 5, 4, 4, 5, 6];

/// Free-floating motes drifting inside the box `±DUST_BOUNDS`.
pub const DUST_COUNT: usize = 25;
pub const DUST_BOUNDS: [f64; 3] = [0.65, 0.65, 0.35];

/// A small ring orbiting the core.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoreOrbit {
	pub radius: f64,
	pub tilt_x: f64,
	pub tilt_y: f64,
	pub speed: f64,
	/// Angle at start.
	pub angle: f64,
	pub opacity: f64,
	pub width: f64,
}

pub const CORE_ORBITS: [CoreOrbit; 3] = [
	CoreOrbit {
		radius: 0.085,
		tilt_x: 0.8,
		tilt_y: 0.0,
		speed: 0.00126,
		angle: 0.0,
		opacity: 0.35,
		width: 0.8,
	},
	CoreOrbit {
		radius: 0.105,
		tilt_x: 0.0,
		tilt_y: 1.2,
		speed: -0.00105,
		angle: PI * 0.7,
		opacity: 0.25,
		width: 0.7,
	},
	CoreOrbit {
		radius: 0.095,
		tilt_x: 1.4,
		tilt_y: 0.5,
		speed: 0.00084,
		angle: PI * 1.3,
		opacity: 0.2,
		width: 0.6,
	},
];

impl CoreOrbit {
	/// Tilt, then tumble by the current orbit angle.
	pub fn orientation(&self, angle: f64) -> Orientation {
		Orientation::IDENTITY
			.then_x(self.tilt_x)
			.then_y(self.tilt_y)
			.then_y(angle)
			.then_x(angle * 0.3)
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct GyroscopeConfig {
	/// Perspective distance in CSS pixels.
	pub fov: f64,
	/// Core radius as a fraction of the canvas scale.
	pub core_radius: f64,
	/// Radius within which motes are linked, as a fraction of the scale.
	pub link_distance: f64,
	pub noise_specks: usize,
	/// Active time the reduced-motion frame is drawn at.
	pub settled_elapsed: f64,
}

impl Default for GyroscopeConfig {
	fn default() -> Self {
		Self {
			fov: 600.0,
			core_radius: 0.06,
			link_distance: 0.18,
			noise_specks: 20,
			settled_elapsed: 3000.0,
		}
	}
}

#[cfg(test)]
mod tests {
	use glam::DVec3;

	use super::*;

	#[test]
	fn test_tables_line_up() {
		assert_eq!(RINGS.len(), MOTES_PER_RING.len());
		assert_eq!(MOTES_PER_RING.iter().sum::<usize>(), 63);
	}

	#[test]
	fn test_untilted_ring_stays_flat() {
		let flat = GyroRing {
			tilt: [0.0; 3],
			..RINGS[0]
		};
		let p = flat.tilt().apply(DVec3::new(1.0, 0.0, 0.0));
		assert!(p.abs_diff_eq(DVec3::X, 1e-12));
	}

	#[test]
	fn test_core_orbit_at_rest_is_its_tilt() {
		let orbit = CORE_ORBITS[2];
		let p = DVec3::new(0.3, 0.4, 0.0);
		let expected = Orientation::IDENTITY
			.then_x(orbit.tilt_x)
			.then_y(orbit.tilt_y)
			.apply(p);
		assert!(orbit.orientation(0.0).apply(p).abs_diff_eq(expected, 1e-12));
	}
}
