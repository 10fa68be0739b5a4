use std::f64::consts::TAU;

use glam::{DVec2, DVec3};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::transform::{Orientation, Projected, project};
use super::types::{
	CORE_ORBITS, DUST_BOUNDS, DUST_COUNT, GyroscopeConfig, MOTES_PER_RING, RINGS,
};
use crate::components::motion::Size;
use crate::components::motion::clock::{FIRST_FRAME_DELTA, FrameClock, FrameTime};

/// Bloom gained per millisecond by the scene as a whole.
const SCENE_BLOOM_RATE: f64 = 0.0008;
/// Bloom gained per millisecond by the core and by each mote.
const BLOOM_RATE: f64 = 0.0012;
const RING_BLOOM_RATE: f64 = 0.0008;
const PULSE_RATE: f64 = 0.0008;
/// One heartbeat every ~5.6 s.
const HEARTBEAT_RATE: f64 = 0.00018;
/// Offset of the weaker second beat within a heartbeat cycle.
const ECHO_OFFSET: f64 = 0.15;
const YAW_RATE: f64 = 0.0000336;
const PITCH_RATE: f64 = 0.0000168;
const TILT_GAIN: f64 = 0.4;
const TILT_FOLLOW: f64 = 0.05;
const TILT_RELEASE: f64 = 0.02;
const CORE_ORBIT_SEGMENTS: usize = 60;

/// Scene bloom below which motes are not linked.
pub const LINK_MIN_BLOOM: f64 = 0.3;
/// Mote bloom below which a mote takes no part in links.
pub const LINK_MOTE_BLOOM: f64 = 0.2;
/// Scene bloom below which heartbeat waves are not drawn.
pub const WAVE_MIN_BLOOM: f64 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Path {
	/// Riding ring `ring` at `angle`, advancing `speed` radians per millisecond.
	Orbit { ring: usize, angle: f64, speed: f64 },
	/// Floating freely; units are fractions of the canvas scale.
	Drift { pos: DVec3, vel: DVec3 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mote {
	pub path: Path,
	pub size: f64,
	pub alpha: f64,
	pub bloom_delay: f64,
	pub bloom: f64,
}

impl Mote {
	fn orbiting(ring: usize, rng: &mut SmallRng) -> Self {
		let boost = if ring < 3 { 1.3 } else { 0.8 };
		Self {
			path: Path::Orbit {
				ring,
				angle: rng.random::<f64>() * TAU,
				speed: (0.00042 + rng.random::<f64>() * 0.00063) * boost,
			},
			size: 1.0 + rng.random::<f64>() * 1.8,
			alpha: 0.35 + rng.random::<f64>() * 0.45,
			bloom_delay: RINGS[ring].bloom_delay + 200.0 + rng.random::<f64>() * 300.0,
			bloom: 0.0,
		}
	}

	fn drifting(rng: &mut SmallRng) -> Self {
		let mut centered = |span: f64| (rng.random::<f64>() - 0.5) * span;
		let pos = DVec3::new(centered(1.1), centered(1.1), centered(0.5));
		let vel = DVec3::new(centered(0.000021), centered(0.000021), centered(0.0000126));
		Self {
			path: Path::Drift { pos, vel },
			size: 0.5 + rng.random::<f64>(),
			alpha: 0.1 + rng.random::<f64>() * 0.15,
			bloom_delay: 1500.0 + rng.random::<f64>() * 600.0,
			bloom: 0.0,
		}
	}

	fn step(&mut self, frame: FrameTime) {
		if frame.elapsed > self.bloom_delay {
			self.bloom = (self.bloom + frame.dt * BLOOM_RATE).min(1.0);
		}
		match &mut self.path {
			Path::Orbit { angle, speed, .. } => *angle = (*angle + *speed * frame.dt) % TAU,
			Path::Drift { pos, vel } => {
				*pos += *vel * frame.dt;
				let bounds = DVec3::from_array(DUST_BOUNDS);
				for axis in 0..3 {
					// Only turn around when heading further out.
					if pos[axis].abs() > bounds[axis] && pos[axis] * vel[axis] > 0.0 {
						vel[axis] = -vel[axis];
					}
				}
			}
		}
	}
}

/// A mote after projection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotePoint {
	pub at: Projected,
	/// Radius in CSS pixels, perspective applied.
	pub size: f64,
	pub alpha: f64,
	pub bloom: f64,
}

/// A line between two nearby motes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Link {
	pub from: DVec2,
	pub to: DVec2,
	pub alpha: f64,
	pub width: f64,
}

/// An expanding light wave sent out by the heartbeat.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Wave {
	pub radius: f64,
	pub alpha: f64,
}

/// One speck of film grain.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Speck {
	pub x: f64,
	pub y: f64,
	pub width: f64,
	pub height: f64,
	pub light: bool,
}

/// Heartbeat intensity in `[0, 1]` at `phase` cycles: a sharp beat followed by
/// a weaker echo.
pub fn heartbeat_pulse(phase: f64) -> f64 {
	let beat = |p: f64| (p.rem_euclid(1.0) * TAU).sin().max(0.0).powf(1.5);
	(beat(phase) + beat(phase + ECHO_OFFSET) * 0.4).min(1.0)
}

/// Opacity factor in `[0.2, 1]` for something at depth `z`.
pub fn depth_fade(z: f64, scale: f64) -> f64 {
	0.2 + 0.8 * ((z + scale * 0.5) / scale).clamp(0.0, 1.0)
}

pub struct GyroscopeState {
	pub config: GyroscopeConfig,
	pub size: Size,
	clock: FrameClock,
	started: bool,
	frame: FrameTime,
	bloom: f64,
	core_bloom: f64,
	pulse_phase: f64,
	heartbeat: f64,
	spins: [f64; RINGS.len()],
	orbit_angles: [f64; CORE_ORBITS.len()],
	motes: Vec<Mote>,
	pointer: Option<DVec2>,
	/// `x` pitches about X following the pointer's height, `y` yaws about Y.
	tilt: DVec2,
	noise: Vec<Speck>,
	rng: SmallRng,
}

impl GyroscopeState {
	pub fn new(config: GyroscopeConfig, seed: u64) -> Self {
		let mut rng = SmallRng::seed_from_u64(seed);
		let mut motes = Vec::with_capacity(MOTES_PER_RING.iter().sum::<usize>() + DUST_COUNT);
		for (ring, &count) in MOTES_PER_RING.iter().enumerate() {
			motes.extend((0..count).map(|_| Mote::orbiting(ring, &mut rng)));
		}
		motes.extend((0..DUST_COUNT).map(|_| Mote::drifting(&mut rng)));

		Self {
			config,
			size: Size::default(),
			clock: FrameClock::default(),
			started: false,
			frame: FrameTime::default(),
			bloom: 0.0,
			core_bloom: 0.0,
			pulse_phase: 0.0,
			heartbeat: 0.0,
			spins: [0.0; RINGS.len()],
			orbit_angles: CORE_ORBITS.map(|orbit| orbit.angle),
			motes,
			pointer: None,
			tilt: DVec2::ZERO,
			noise: Vec::new(),
			rng,
		}
	}

	/// The gyroscope fills its parent.
	pub fn fit(&self, parent: Size) -> Size {
		parent
	}

	pub fn resize(&mut self, size: Size) {
		self.size = size;
	}

	/// Start the clock. Returns `false` if it was already started.
	pub fn start(&mut self, now: f64) -> bool {
		if self.started {
			return false;
		}
		self.started = true;
		self.clock.start(now);
		true
	}

	pub fn is_started(&self) -> bool {
		self.started
	}

	pub fn pause(&mut self, now: f64) {
		self.clock.pause(now);
	}

	pub fn resume(&mut self, now: f64) {
		if self.started {
			self.clock.start(now);
		}
	}

	/// Jump to the fully bloomed frame drawn when motion is reduced.
	pub fn settle(&mut self) {
		self.started = true;
		self.bloom = 1.0;
		self.core_bloom = 1.0;
		for mote in &mut self.motes {
			mote.bloom = 1.0;
		}
		self.step(FrameTime {
			elapsed: self.config.settled_elapsed,
			dt: FIRST_FRAME_DELTA,
		});
	}

	/// Pointer position relative to the canvas centre, in `[-0.5, 0.5]`, or
	/// `None` once it has left.
	pub fn set_pointer(&mut self, pointer: Option<DVec2>) {
		self.pointer = pointer;
	}

	pub fn update(&mut self, now: f64) {
		if !self.started {
			return;
		}
		let frame = self.clock.tick(now);
		self.step(frame);
	}

	fn step(&mut self, frame: FrameTime) {
		let dt = frame.dt;
		self.frame = frame;
		self.bloom = (self.bloom + dt * SCENE_BLOOM_RATE).min(1.0);
		self.core_bloom = (self.core_bloom + dt * BLOOM_RATE).min(1.0);
		self.pulse_phase += PULSE_RATE * dt;
		self.heartbeat += HEARTBEAT_RATE * dt;

		for (angle, orbit) in self.orbit_angles.iter_mut().zip(&CORE_ORBITS) {
			*angle += orbit.speed * dt;
		}
		for (spin, ring) in self.spins.iter_mut().zip(&RINGS) {
			*spin += ring.spin_speed * dt;
		}

		self.tilt += match self.pointer {
			// Vertical pointer movement pitches, horizontal movement yaws.
			Some(pointer) => (DVec2::new(pointer.y, pointer.x) * TILT_GAIN - self.tilt) * TILT_FOLLOW,
			None => -self.tilt * TILT_RELEASE,
		};

		for mote in &mut self.motes {
			mote.step(frame);
		}

		let (width, height) = (self.size.width, self.size.height);
		let rng = &mut self.rng;
		self.noise = (0..self.config.noise_specks)
			.map(|_| Speck {
				light: rng.random_bool(0.5),
				x: rng.random::<f64>() * width,
				y: rng.random::<f64>() * height,
				width: 1.0 + rng.random::<f64>(),
				height: 1.0 + rng.random::<f64>(),
			})
			.collect();
	}

	/// Active time since start, excluding pauses.
	pub fn elapsed(&self) -> f64 {
		self.frame.elapsed
	}

	pub fn bloom(&self) -> f64 {
		self.bloom
	}

	pub fn core_bloom(&self) -> f64 {
		self.core_bloom
	}

	pub fn noise(&self) -> &[Speck] {
		&self.noise
	}

	/// Lengths scale with the shorter canvas side.
	pub fn scale(&self) -> f64 {
		self.size.min_side()
	}

	pub fn center(&self) -> DVec2 {
		DVec2::new(self.size.width, self.size.height) / 2.0
	}

	/// Slow tumble of the whole scene, then the pointer tilt.
	pub fn global(&self) -> Orientation {
		let t = self.frame.elapsed;
		Orientation::IDENTITY
			.then_y(t * YAW_RATE)
			.then_x(t * PITCH_RATE)
			.then_x(self.tilt.x)
			.then_y(self.tilt.y)
	}

	/// Ring tilt, then its own spin.
	pub fn ring_orientation(&self, ring: usize) -> Orientation {
		let spec = &RINGS[ring];
		spec.tilt().then_axis(spec.spin_axis, self.spins[ring])
	}

	pub fn ring_bloom(&self, ring: usize) -> f64 {
		let since = self.frame.elapsed - RINGS[ring].bloom_delay;
		if since < 0.0 {
			0.0
		} else {
			(since * RING_BLOOM_RATE).min(1.0)
		}
	}

	/// Projected outline of `ring`, closed (first point repeated at the end).
	pub fn ring_points(&self, ring: usize) -> Vec<Projected> {
		let spec = &RINGS[ring];
		let frame = self.ring_orientation(ring).then(self.global());
		self.circle(spec.radius, spec.segments, frame)
	}

	/// Projected outline of the core orbit `orbit`, closed.
	pub fn core_orbit_points(&self, orbit: usize) -> Vec<Projected> {
		let spec = &CORE_ORBITS[orbit];
		let frame = spec
			.orientation(self.orbit_angles[orbit])
			.then(self.global());
		self.circle(spec.radius, CORE_ORBIT_SEGMENTS, frame)
	}

	fn circle(&self, radius: f64, segments: usize, frame: Orientation) -> Vec<Projected> {
		let r = radius * self.scale();
		(0..=segments)
			.map(|i| {
				let a = i as f64 / segments as f64 * TAU;
				self.project(frame.apply(DVec3::new(a.cos() * r, a.sin() * r, 0.0)))
			})
			.collect()
	}

	fn project(&self, point: DVec3) -> Projected {
		project(point, self.center(), self.config.fov)
	}

	/// Motes with at least `min_bloom`, projected and sorted back to front.
	pub fn mote_points(&self, min_bloom: f64) -> Vec<MotePoint> {
		let scale = self.scale();
		let global = self.global();
		let mut points: Vec<MotePoint> = self
			.motes
			.iter()
			.filter(|mote| mote.bloom >= min_bloom)
			.map(|mote| {
				let local = match mote.path {
					Path::Orbit { ring, angle, .. } => {
						let r = RINGS[ring].radius * scale;
						self.ring_orientation(ring)
							.apply(DVec3::new(angle.cos() * r, angle.sin() * r, 0.0))
					}
					Path::Drift { pos, .. } => pos * scale,
				};
				let at = self.project(global.apply(local));
				MotePoint {
					at,
					size: mote.size * at.scale,
					alpha: mote.alpha * mote.bloom,
					bloom: mote.bloom,
				}
			})
			.collect();
		points.sort_by(|a, b| b.at.z.total_cmp(&a.at.z));
		points
	}

	/// Lines between motes that are close on screen.
	pub fn links(&self) -> Vec<Link> {
		if self.bloom < LINK_MIN_BLOOM {
			return Vec::new();
		}
		let points = self.mote_points(LINK_MOTE_BLOOM);
		let max = self.scale() * self.config.link_distance;
		let mut links = Vec::new();
		for (i, a) in points.iter().enumerate() {
			for b in &points[i + 1..] {
				let dist = a.at.pos.distance(b.at.pos);
				if dist > max {
					continue;
				}
				let proximity = 1.0 - dist / max;
				let depth = (a.at.scale + b.at.scale) / 2.0;
				links.push(Link {
					from: a.at.pos,
					to: b.at.pos,
					alpha: proximity * proximity * 0.12 * self.bloom * a.bloom.min(b.bloom) * depth,
					width: 0.3 + proximity * 0.4,
				});
			}
		}
		links
	}

	pub fn heartbeat_pulse(&self) -> f64 {
		heartbeat_pulse(self.heartbeat)
	}

	/// Core radius in CSS pixels: slow wobble, swelling up to 8% on a beat.
	pub fn core_radius(&self) -> f64 {
		let wobble = 1.0 + self.pulse_phase.sin() * 0.06;
		let swell = 1.0 + self.heartbeat_pulse() * 0.08;
		self.config.core_radius * self.scale() * wobble * self.core_bloom * swell
	}

	/// The beat and its echo, each expanding from the core as the cycle runs.
	pub fn waves(&self) -> Vec<Wave> {
		if self.bloom < WAVE_MIN_BLOOM {
			return Vec::new();
		}
		let scale = self.scale();
		[(0.0, 1.0), (ECHO_OFFSET, 0.5)]
			.into_iter()
			.filter_map(|(offset, strength)| {
				let p = (self.heartbeat + offset).rem_euclid(1.0);
				let radius = p * scale * 0.85;
				let fade_in = (p * 8.0).min(1.0);
				let fade_out = 1.0 - p.powf(0.6);
				let alpha = fade_in * fade_out * 0.04 * strength * self.bloom;
				(alpha >= 0.001 && radius >= 1.0).then_some(Wave { radius, alpha })
			})
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const FRAME: f64 = 16.0;

	fn state() -> GyroscopeState {
		let mut state = GyroscopeState::new(GyroscopeConfig::default(), 9);
		state.resize(Size::new(800.0, 600.0));
		state
	}

	fn run(state: &mut GyroscopeState, from: f64, frames: u32) -> f64 {
		let mut now = from;
		for _ in 0..frames {
			now += FRAME;
			state.update(now);
		}
		now
	}

	fn assert_same_phase(a: &GyroscopeState, b: &GyroscopeState) {
		const EPS: f64 = 1e-9;
		assert!((a.elapsed() - b.elapsed()).abs() < EPS);
		assert!((a.heartbeat - b.heartbeat).abs() < EPS);
		assert!((a.core_radius() - b.core_radius()).abs() < EPS);
		for ring in 0..RINGS.len() {
			assert!((a.ring_bloom(ring) - b.ring_bloom(ring)).abs() < EPS);
			let (pa, pb) = (a.ring_points(ring), b.ring_points(ring));
			assert!(pa[7].pos.abs_diff_eq(pb[7].pos, EPS));
		}
		for (ma, mb) in a.mote_points(0.0).iter().zip(&b.mote_points(0.0)) {
			assert!(ma.at.pos.abs_diff_eq(mb.at.pos, EPS));
			assert!((ma.bloom - mb.bloom).abs() < EPS);
		}
	}

	#[test]
	fn test_phase_ignores_pause_length() {
		let mut steady = state();
		steady.start(0.0);
		run(&mut steady, 0.0, 100);

		for pause in [16.0, 5_000.0, 120_000.0] {
			let mut paused = state();
			paused.start(0.0);
			let at = run(&mut paused, 0.0, 50);
			paused.pause(at);
			paused.resume(at + pause);
			run(&mut paused, at + pause, 50);

			assert_same_phase(&steady, &paused);
		}
	}

	#[test]
	fn test_nothing_moves_before_start() {
		let mut state = state();
		state.update(1_000.0);
		assert_eq!(state.elapsed(), 0.0);
		assert_eq!(state.bloom(), 0.0);
		assert!(state.start(1_000.0));
		assert!(!state.start(2_000.0));
	}

	#[test]
	fn test_ring_bloom_waits_for_delay() {
		let mut state = state();
		state.start(0.0);
		state.update(RINGS[0].bloom_delay - 10.0);
		assert_eq!(state.ring_bloom(0), 0.0);
		state.update(RINGS[0].bloom_delay + 625.0);
		assert!((state.ring_bloom(0) - 0.5).abs() < 1e-9);
		state.update(RINGS[0].bloom_delay + 5_000.0);
		assert_eq!(state.ring_bloom(0), 1.0);
	}

	#[test]
	fn test_motes_sorted_back_to_front() {
		let mut state = state();
		state.settle();
		let points = state.mote_points(0.01);
		assert_eq!(points.len(), state.motes.len());
		assert!(points.windows(2).all(|w| w[0].at.z >= w[1].at.z));
	}

	#[test]
	fn test_links_stay_within_reach() {
		let mut state = state();
		state.settle();
		let max = state.scale() * state.config.link_distance;
		let links = state.links();
		assert!(!links.is_empty());
		for link in &links {
			assert!(link.from.distance(link.to) <= max);
			assert!(link.alpha > 0.0);
			assert!((0.3..=0.7).contains(&link.width));
		}
	}

	#[test]
	fn test_no_links_while_dim() {
		let mut state = state();
		state.start(0.0);
		run(&mut state, 0.0, 5);
		assert!(state.bloom() < LINK_MIN_BLOOM);
		assert!(state.links().is_empty());
		assert!(state.waves().is_empty());
	}

	#[test]
	fn test_heartbeat_pulse_shape() {
		for i in 0..=100 {
			let pulse = heartbeat_pulse(i as f64 / 37.0);
			assert!((0.0..=1.0).contains(&pulse));
		}
		assert_eq!(heartbeat_pulse(0.25), 1.0);
		// Both beats below the axis.
		assert_eq!(heartbeat_pulse(0.6), 0.0);
		assert_eq!(heartbeat_pulse(1.6), heartbeat_pulse(0.6));
	}

	#[test]
	fn test_depth_fade_range() {
		assert_eq!(depth_fade(-1_000.0, 100.0), 0.2);
		assert_eq!(depth_fade(1_000.0, 100.0), 1.0);
		assert!((depth_fade(0.0, 100.0) - 0.6).abs() < 1e-12);
	}

	#[test]
	fn test_settle_is_fully_bloomed() {
		let mut state = state();
		state.settle();
		assert!(state.is_started());
		assert_eq!(state.elapsed(), 3_000.0);
		assert_eq!(state.bloom(), 1.0);
		assert_eq!(state.core_bloom(), 1.0);
		assert!(state.motes.iter().all(|mote| mote.bloom == 1.0));
		assert_eq!(state.noise().len(), state.config.noise_specks);
		assert!(state.ring_bloom(RINGS.len() - 1) > 0.9);
	}

	#[test]
	fn test_tilt_follows_pointer_and_releases() {
		let mut state = state();
		state.start(0.0);
		state.set_pointer(Some(DVec2::new(0.5, -0.25)));
		let now = run(&mut state, 0.0, 200);
		let target = DVec2::new(-0.25, 0.5) * TILT_GAIN;
		assert!(state.tilt.abs_diff_eq(target, 1e-3));

		state.set_pointer(None);
		run(&mut state, now, 400);
		assert!(state.tilt.length() < 1e-3);
	}

	#[test]
	fn test_dust_stays_near_its_box() {
		let mut state = state();
		state.start(0.0);
		// Long frames to push motes against the walls.
		let mut now = 0.0;
		for _ in 0..20_000 {
			now += 50.0;
			state.update(now);
		}
		let slack = 0.00002 * 50.0;
		for mote in state.motes {
			if let Path::Drift { pos, .. } = mote.path {
				assert!(pos.x.abs() <= 0.65 + slack);
				assert!(pos.y.abs() <= 0.65 + slack);
				assert!(pos.z.abs() <= 0.35 + slack);
			}
		}
	}

	#[test]
	fn test_ring_points_close_the_loop() {
		let mut state = state();
		state.settle();
		let points = state.ring_points(3);
		assert_eq!(points.len(), RINGS[3].segments + 1);
		let (first, last) = (points[0], points[points.len() - 1]);
		assert!(first.pos.abs_diff_eq(last.pos, 1e-9));
		assert_eq!(state.core_orbit_points(0).len(), CORE_ORBIT_SEGMENTS + 1);
	}
}
