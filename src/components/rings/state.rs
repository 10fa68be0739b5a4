use std::f64::consts::PI;

use crate::components::motion::easing::sweep;
use crate::components::motion::{Reveal, Size};

const BREATH_AMPLITUDE: f64 = 0.025;
/// Progress after which the centre label starts fading in.
pub const LABEL_THRESHOLD: f64 = 0.75;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotifRing {
	/// Radius as a fraction of the canvas side.
	pub radius: f64,
	pub dash: Option<[f64; 2]>,
	/// Rotation in radians per millisecond.
	pub speed: f64,
	pub dir: f64,
	pub breath_offset: f64,
	pub opacity: f64,
	pub fill: bool,
}

const fn ring(
	radius: f64,
	dash: Option<[f64; 2]>,
	speed: f64,
	dir: f64,
	breath_offset: f64,
	opacity: f64,
	fill: bool,
) -> MotifRing {
	MotifRing {
		radius,
		dash,
		speed,
		dir,
		breath_offset,
		opacity,
		fill,
	}
}

/// Outermost first.
pub const RINGS: [MotifRing; 5] = [
	ring(0.44, Some([6.0, 8.0]), 0.00012, 1.0, 0.0, 0.18, false),
	ring(0.36, Some([3.0, 5.0]), 0.00025, -1.0, -1500.0, 0.30, false),
	ring(0.28, Some([5.0, 6.0]), 0.00018, 1.0, -3000.0, 0.40, false),
	ring(0.20, Some([2.0, 4.0]), 0.00030, -1.0, -4500.0, 0.50, false),
	ring(0.11, None, 0.0, 1.0, -6000.0, 0.60, true),
];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotifDot {
	pub ring: usize,
	pub angle: f64,
	pub speed: f64,
	pub size: f64,
}

const fn dot(ring: usize, angle: f64, speed: f64, size: f64) -> MotifDot {
	MotifDot {
		ring,
		angle,
		speed,
		size,
	}
}

pub const DOTS: [MotifDot; 8] = [
	dot(0, 0.0, 0.0006, 2.0),
	dot(0, PI, 0.0006, 1.5),
	dot(1, 1.2, -0.0008, 2.0),
	dot(1, 3.8, -0.0008, 1.2),
	dot(2, 0.5, 0.001, 2.2),
	dot(2, 2.8, 0.001, 1.4),
	dot(3, 2.0, -0.0014, 1.8),
	dot(3, 5.0, -0.0014, 1.0),
];

#[derive(Clone, Debug, PartialEq)]
pub struct RingsConfig {
	pub reveal_ms: f64,
	pub reveal_threshold: f64,
	pub max_size: f64,
	pub label: &'static str,
}

impl Default for RingsConfig {
	fn default() -> Self {
		Self {
			reveal_ms: 2200.0,
			reveal_threshold: 0.25,
			max_size: 280.0,
			label: "HOLON",
		}
	}
}

pub struct RingsState {
	pub config: RingsConfig,
	/// Side of the square canvas.
	pub size: f64,
	reveal: Reveal,
	progress: f64,
	now: f64,
}

impl RingsState {
	pub fn new(config: RingsConfig) -> Self {
		Self {
			config,
			size: 0.0,
			reveal: Reveal::default(),
			progress: 0.0,
			now: 0.0,
		}
	}

	pub fn fit(&self, parent: Size) -> Size {
		let side = parent.min_side().min(self.config.max_size);
		Size::new(side, side)
	}

	pub fn resize(&mut self, size: f64) {
		self.size = size;
	}

	pub fn trigger_reveal(&mut self, now: f64) -> bool {
		self.reveal.trigger(now)
	}

	pub fn settle(&mut self) {
		self.reveal.settle();
		self.progress = 1.0;
		self.now = 0.0;
	}

	pub fn is_revealed(&self) -> bool {
		self.reveal.is_triggered()
	}

	pub fn is_looping(&self) -> bool {
		self.reveal.is_looping()
	}

	pub fn now(&self) -> f64 {
		self.now
	}

	pub fn update(&mut self, now: f64) {
		self.now = now;
		self.progress = self.reveal.advance(now, self.config.reveal_ms);
	}

	pub fn ring_progress(&self, index: usize) -> f64 {
		sweep(self.progress, (RINGS.len() + 1) as f64, index)
	}

	pub fn rotation(&self, index: usize) -> f64 {
		if self.is_looping() {
			let ring = &RINGS[index];
			self.now * ring.speed * ring.dir
		} else {
			0.0
		}
	}

	pub fn ring_radius(&self, index: usize) -> f64 {
		let ring = &RINGS[index];
		let amplitude = if self.is_looping() { BREATH_AMPLITUDE } else { 0.0 };
		let breath = 1.0 + ((self.now + ring.breath_offset) * 0.0006).sin() * amplitude;
		ring.radius * self.size * breath
	}

	pub fn dash_offset(&self, index: usize) -> f64 {
		-self.now * 0.01 * RINGS[index].dir
	}

	/// Dot angle including its parent ring's current rotation.
	pub fn dot_angle(&self, dot: &MotifDot) -> f64 {
		dot.angle + self.now * dot.speed + self.rotation(dot.ring)
	}

	pub fn dot_position(&self, dot: &MotifDot) -> (f64, f64) {
		let c = self.size / 2.0;
		let (r, angle) = (self.ring_radius(dot.ring), self.dot_angle(dot));
		(c + angle.cos() * r, c + angle.sin() * r)
	}

	/// Alpha of the centre label; zero until the reveal passes [`LABEL_THRESHOLD`].
	pub fn label_alpha(&self) -> f64 {
		if self.progress <= LABEL_THRESHOLD {
			return 0.0;
		}
		((self.progress - LABEL_THRESHOLD) / (1.0 - LABEL_THRESHOLD)).min(1.0) * 0.7
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn state() -> RingsState {
		let mut state = RingsState::new(RingsConfig::default());
		state.resize(280.0);
		state
	}

	#[test]
	fn test_fit_is_square_and_capped() {
		let state = state();
		assert_eq!(state.fit(Size::new(600.0, 400.0)), Size::new(280.0, 280.0));
		assert_eq!(state.fit(Size::new(200.0, 400.0)), Size::new(200.0, 200.0));
	}

	#[test]
	fn test_drawn_rings_monotone_in_progress() {
		let mut state = state();
		let mut last = 0;
		for step in 0..=100 {
			state.progress = step as f64 / 100.0;
			let full = (0..RINGS.len()).filter(|&i| state.ring_progress(i) >= 1.0).count();
			assert!(full >= last);
			last = full;
		}
		assert_eq!(last, RINGS.len());
	}

	#[test]
	fn test_label_fades_in_late() {
		let mut state = state();
		state.progress = 0.75;
		assert_eq!(state.label_alpha(), 0.0);
		state.progress = 0.875;
		assert!((state.label_alpha() - 0.35).abs() < 1e-9);
		state.progress = 1.0;
		assert!((state.label_alpha() - 0.7).abs() < 1e-9);
	}

	#[test]
	fn test_static_until_looping() {
		let mut state = state();
		state.trigger_reveal(0.0);
		state.update(1000.0);
		assert_eq!(state.rotation(0), 0.0);
		assert_eq!(state.ring_radius(0), RINGS[0].radius * 280.0);

		state.update(2200.0);
		assert!(state.is_looping());
		assert_ne!(state.rotation(0), 0.0);
	}

	#[test]
	fn test_dots_follow_parent_rotation() {
		let mut state = state();
		state.settle();
		state.now = 5000.0;
		let dot = DOTS[2];
		let expected = dot.angle + 5000.0 * dot.speed + 5000.0 * RINGS[1].speed * RINGS[1].dir;
		assert!((state.dot_angle(&dot) - expected).abs() < 1e-12);
	}
}
