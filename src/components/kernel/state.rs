use std::f64::consts::{PI, TAU};

use super::types::{DOTS, KernelLabel, KernelStyle, LabelId, OrbitDot, RINGS, kernel_labels};
use crate::components::motion::easing::window;
use crate::components::motion::{LitMap, Reveal, Size};

/// Angular proximity, in radians, at which a dot lights a label.
pub const HIT_ANGLE: f64 = 0.35;
const RING_REVEAL_SPAN: f64 = 0.3;
const BREATH_AMPLITUDE: f64 = 0.008;

/// Shortest-arc distance between two angles, always in `[0, PI]`.
pub fn angular_distance(a: f64, b: f64) -> f64 {
	let diff = (a.rem_euclid(TAU) - b.rem_euclid(TAU)).abs();
	if diff > PI { TAU - diff } else { diff }
}

#[derive(Clone, Debug, PartialEq)]
pub struct KernelConfig {
	pub style: KernelStyle,
	pub reveal_ms: f64,
	pub reveal_threshold: f64,
	/// Selector of the section whose visibility triggers the reveal.
	pub section: &'static str,
	pub max_width: f64,
	pub aspect: f64,
}

impl Default for KernelConfig {
	fn default() -> Self {
		Self {
			style: KernelStyle::default(),
			reveal_ms: 2400.0,
			reveal_threshold: 0.15,
			section: ".reveal",
			max_width: 960.0,
			aspect: 0.72,
		}
	}
}

pub struct KernelState {
	pub config: KernelConfig,
	pub width: f64,
	pub height: f64,
	labels: Vec<KernelLabel>,
	label_lit: Vec<f64>,
	lit: LitMap<LabelId>,
	reveal: Reveal,
	progress: f64,
	now: f64,
}

impl KernelState {
	pub fn new(config: KernelConfig) -> Self {
		let labels = kernel_labels();
		Self {
			label_lit: vec![0.0; labels.len()],
			lit: LitMap::new(config.style.lit_envelope()),
			labels,
			config,
			width: 0.0,
			height: 0.0,
			reveal: Reveal::default(),
			progress: 0.0,
			now: 0.0,
		}
	}

	pub fn fit(&self, parent: Size) -> Size {
		let width = parent.width.min(self.config.max_width);
		Size::new(width, width * self.config.aspect)
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
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

	pub fn labels(&self) -> &[KernelLabel] {
		&self.labels
	}

	pub fn label_lit(&self, id: LabelId) -> f64 {
		self.label_lit.get(id.0).copied().unwrap_or(0.0)
	}

	pub fn center(&self) -> (f64, f64) {
		(self.width / 2.0, self.height * 0.46)
	}

	/// Diagram scale: ring radii are fractions of this.
	pub fn scale(&self) -> f64 {
		self.width * 0.44
	}

	/// Reveal progress of ring `index`; index 5 drives the caption.
	pub fn ring_progress(&self, index: usize) -> f64 {
		window(
			self.progress,
			index as f64 * self.config.style.ring_delay(),
			RING_REVEAL_SPAN,
		)
	}

	pub fn label_progress(&self, label: &KernelLabel) -> f64 {
		let (start, rate) = label.kind.reveal_window();
		let e = self.ring_progress(label.ring);
		if e > start { ((e - start) * rate).min(1.0) } else { 0.0 }
	}

	fn breath(&self, ring: usize, amplitude: f64) -> f64 {
		1.0 + ((self.now + RINGS[ring].breath_offset) * 0.0005).sin() * amplitude
	}

	/// Radius of ring `index` including the breathing swell once looping.
	pub fn ring_radius(&self, index: usize) -> f64 {
		let amplitude = if self.is_looping() { BREATH_AMPLITUDE } else { 0.0 };
		RINGS[index].radius * self.scale() * self.breath(index, amplitude)
	}

	/// Radius at which labels sit; labels do not breathe.
	pub fn label_radius(&self, index: usize) -> f64 {
		RINGS[index].radius * self.scale()
	}

	pub fn dash_offset(&self, index: usize) -> f64 {
		if self.is_looping() {
			-(self.now * 0.006 * RINGS[index].dir)
		} else {
			0.0
		}
	}

	pub fn dot_angle_at(dot: &OrbitDot, t: f64) -> f64 {
		dot.angle + t * dot.speed
	}

	pub fn dot_position(&self, dot: &OrbitDot, t: f64) -> (f64, f64) {
		let (cx, cy) = self.center();
		let r = RINGS[dot.ring].radius * self.scale() * self.breath(dot.ring, BREATH_AMPLITUDE);
		let angle = Self::dot_angle_at(dot, t);
		(cx + angle.cos() * r, cy + angle.sin() * r)
	}

	/// Slow wobble of the outer pills once looping.
	pub fn pill_drift(&self, index: usize) -> f64 {
		if self.is_looping() {
			(self.now * 0.0001 + index as f64 * 1.3).sin() * 0.005
		} else {
			0.0
		}
	}

	pub fn dot_near(&self, ring: usize, angle: f64) -> bool {
		DOTS.iter()
			.filter(|dot| dot.ring == ring)
			.any(|dot| angular_distance(Self::dot_angle_at(dot, self.now), angle) < HIT_ANGLE)
	}

	pub fn update(&mut self, now: f64) {
		self.now = now;
		self.progress = self.reveal.advance(now, self.config.reveal_ms);
		if !self.is_looping() {
			return;
		}
		for i in 0..self.labels.len() {
			let label = &self.labels[i];
			let (id, hit) = (label.id, self.dot_near(label.probe_ring, label.angle));
			self.label_lit[i] = self.lit.update(id, hit, now);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn looping_state(style: KernelStyle) -> KernelState {
		let mut state = KernelState::new(KernelConfig {
			style,
			..KernelConfig::default()
		});
		state.resize(960.0, 691.2);
		state.settle();
		state
	}

	fn label(state: &KernelState, text: &str) -> LabelId {
		state
			.labels()
			.iter()
			.find(|l| l.text == text)
			.map(|l| l.id)
			.unwrap()
	}

	#[test]
	fn test_angular_distance_is_shortest_arc() {
		assert!((angular_distance(0.1, TAU - 0.1) - 0.2).abs() < 1e-12);
		assert!((angular_distance(-PI / 2.0, 3.0 * PI / 2.0)).abs() < 1e-12);
		assert!((angular_distance(0.0, PI) - PI).abs() < 1e-12);
		for i in 0..100 {
			let a = i as f64 * 0.37 - 10.0;
			let b = i as f64 * -1.13 + 4.0;
			let d = angular_distance(a, b);
			assert!((0.0..=PI).contains(&d));
			assert!((d - angular_distance(b, a)).abs() < 1e-12);
			assert!((d - angular_distance(a + TAU, b)).abs() < 1e-9);
			assert!((d - angular_distance(a, b - 3.0 * TAU)).abs() < 1e-9);
		}
	}

	#[test]
	fn test_hit_symmetric_across_wrap() {
		let mut state = looping_state(KernelStyle::Classic);
		// Ring-1 dot starts at angle 0 and moves at 0.0006 rad/ms.
		state.now = 0.0;
		assert!(state.dot_near(1, 0.3));
		assert!(state.dot_near(1, TAU - 0.3));
		assert!(!state.dot_near(1, 0.4));
		assert!(!state.dot_near(1, TAU - 0.4));
	}

	#[test]
	fn test_dot_angle_accumulates_unbounded() {
		let dot = DOTS[0];
		let angle = KernelState::dot_angle_at(&dot, 1_000_000.0);
		assert!(angle > TAU);
	}

	#[test]
	fn test_label_lights_after_dot_sweeps_past() {
		let mut state = looping_state(KernelStyle::Classic);
		let persistence = label(&state, "Persistence");
		let top = label(&state, "Self-Containment");

		let mut t = 0.0;
		while t <= 700.0 {
			state.update(t);
			t += 16.0;
		}
		// The dot left the 0.35 rad window at ~583ms; 700ms is inside the hold.
		assert_eq!(state.label_lit(persistence), 1.0);
		assert_eq!(state.label_lit(top), 0.0);
	}

	#[test]
	fn test_trails_lit_lasts_longer() {
		let mut classic = looping_state(KernelStyle::Classic);
		let mut trails = looping_state(KernelStyle::Trails);
		let id = label(&classic, "Persistence");
		let mut t = 0.0;
		while t <= 1200.0 {
			classic.update(t);
			trails.update(t);
			t += 16.0;
		}
		assert!(classic.label_lit(id) > 0.0);
		assert!(trails.label_lit(id) > 0.0);

		// Last hit was at 576ms.
		classic.update(1420.0);
		trails.update(1420.0);
		assert_eq!(classic.label_lit(id), 0.0);
		assert!(trails.label_lit(id) > 0.0);
	}

	#[test]
	fn test_no_lit_before_looping() {
		let mut state = KernelState::new(KernelConfig::default());
		state.resize(960.0, 691.2);
		state.trigger_reveal(0.0);
		state.update(100.0);
		assert!(state.label_lit.iter().all(|&v| v == 0.0));
	}

	#[test]
	fn test_drawn_rings_monotone_in_progress() {
		for style in [KernelStyle::Classic, KernelStyle::Trails] {
			let mut state = looping_state(style);
			let mut last = 0;
			for step in 0..=200 {
				state.progress = step as f64 / 200.0;
				let full = (0..RINGS.len()).filter(|&i| state.ring_progress(i) >= 1.0).count();
				assert!(full >= last);
				last = full;
			}
			assert_eq!(last, RINGS.len());
		}
	}

	#[test]
	fn test_breathing_only_while_looping() {
		let mut state = KernelState::new(KernelConfig::default());
		state.resize(960.0, 691.2);
		state.now = 1234.0;
		assert_eq!(state.ring_radius(2), RINGS[2].radius * state.scale());
		state.settle();
		state.now = 1234.0;
		assert_ne!(state.ring_radius(2), RINGS[2].radius * state.scale());
	}

	#[test]
	fn test_fit_caps_width() {
		let state = KernelState::new(KernelConfig::default());
		let size = state.fit(Size::new(1400.0, 500.0));
		assert_eq!(size.width, 960.0);
		assert!((size.height - 691.2).abs() < 1e-9);
	}
}
