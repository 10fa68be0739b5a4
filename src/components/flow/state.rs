use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::types::{FlowGraph, NodeId};
use crate::components::motion::clock::Ticker;
use crate::components::motion::easing::{ease_in_out_quad, sweep};
use crate::components::motion::{Envelope, LitMap, Reveal, Size};

pub const NODE_SIZE: f64 = 8.0;
const TICK_HZ: f64 = 60.0;
const MAX_TICKS_PER_FRAME: u32 = 4;

#[derive(Clone, Debug, PartialEq)]
pub struct FlowConfig {
	pub reveal_ms: f64,
	pub reveal_threshold: f64,
	/// Chance per tick that a new particle is launched.
	pub spawn_chance: f64,
	pub lit: Envelope,
	pub aspect: f64,
	pub max_height: f64,
}

impl Default for FlowConfig {
	fn default() -> Self {
		Self {
			reveal_ms: 1500.0,
			reveal_threshold: 0.25,
			spawn_chance: 0.04,
			lit: Envelope::new(700.0, 0.5),
			aspect: 0.4,
			max_height: 280.0,
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
	pub from: NodeId,
	pub to: NodeId,
	/// Progress gained per tick.
	pub speed: f64,
	pub size: f64,
	age: u32,
}

impl Particle {
	pub fn progress(&self) -> f64 {
		self.age as f64 * self.speed
	}

	pub fn eased(&self) -> f64 {
		ease_in_out_quad(self.progress().min(1.0))
	}

	/// Fades in over the first fifth of the trip and out over the last.
	pub fn alpha(&self) -> f64 {
		let p = self.progress();
		(p * 5.0).min(1.0).min((1.0 - p) * 5.0).max(0.0)
	}
}

pub struct FlowState {
	pub graph: FlowGraph,
	pub config: FlowConfig,
	pub width: f64,
	pub height: f64,
	pub particles: Vec<Particle>,
	reveal: Reveal,
	progress: f64,
	ticker: Ticker,
	lit: LitMap<NodeId>,
	node_lit: Vec<f64>,
	rng: SmallRng,
}

impl FlowState {
	pub fn new(graph: FlowGraph, config: FlowConfig, seed: u64) -> Self {
		let node_lit = vec![0.0; graph.nodes.len()];
		Self {
			lit: LitMap::new(config.lit),
			graph,
			config,
			width: 0.0,
			height: 0.0,
			particles: Vec::new(),
			reveal: Reveal::default(),
			progress: 0.0,
			ticker: Ticker::new(TICK_HZ, MAX_TICKS_PER_FRAME),
			node_lit,
			rng: SmallRng::seed_from_u64(seed),
		}
	}

	pub fn fit(&self, parent: Size) -> Size {
		let width = parent.width;
		Size::new(width, (width * self.config.aspect).min(self.config.max_height))
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
	}

	pub fn is_revealed(&self) -> bool {
		self.reveal.is_triggered()
	}

	pub fn is_looping(&self) -> bool {
		self.reveal.is_looping()
	}

	/// Share of edge `index` drawn at the current reveal progress.
	pub fn edge_progress(&self, index: usize) -> f64 {
		sweep(self.progress, (self.graph.edges.len() + 2) as f64, index)
	}

	pub fn node_progress(&self, index: usize) -> f64 {
		(self.progress * 3.0 - index as f64 * 0.15).clamp(0.0, 1.0)
	}

	pub fn node_lit(&self, id: NodeId) -> f64 {
		self.node_lit.get(id.0).copied().unwrap_or(0.0)
	}

	pub fn node_pos(&self, id: NodeId) -> (f64, f64) {
		let node = &self.graph.nodes[id.0];
		(node.x * self.width, node.y * self.height)
	}

	pub fn particle_pos(&self, particle: &Particle) -> (f64, f64) {
		let ((x0, y0), (x1, y1)) = (self.node_pos(particle.from), self.node_pos(particle.to));
		let t = particle.eased();
		(x0 + (x1 - x0) * t, y0 + (y1 - y0) * t)
	}

	pub fn hit_radius(&self) -> f64 {
		(self.width * 0.035).max(30.0)
	}

	/// Put a particle on edge `edge` at progress zero.
	pub fn launch(&mut self, edge: usize, reverse: bool, speed: f64, size: f64) {
		let Some(&edge) = self.graph.edges.get(edge) else {
			return;
		};
		let (from, to) = if reverse {
			(edge.b, edge.a)
		} else {
			(edge.a, edge.b)
		};
		self.particles.push(Particle {
			from,
			to,
			speed,
			size,
			age: 0,
		});
	}

	fn spawn(&mut self) {
		if self.graph.edges.is_empty() {
			return;
		}
		let edge = self.rng.random_range(0..self.graph.edges.len());
		let reverse = self.rng.random_bool(0.5);
		let speed = 0.003 + self.rng.random::<f64>() * 0.004;
		let size = 1.5 + self.rng.random::<f64>() * 1.5;
		self.launch(edge, reverse, speed, size);
	}

	/// One fixed simulation tick: maybe spawn, age every particle, drop finished ones.
	pub fn step(&mut self) {
		if self.rng.random::<f64>() < self.config.spawn_chance {
			self.spawn();
		}
		for particle in &mut self.particles {
			particle.age += 1;
		}
		self.particles.retain(|p| p.progress() <= 1.0);
	}

	pub fn update(&mut self, now: f64) {
		self.progress = self.reveal.advance(now, self.config.reveal_ms);
		if !self.reveal.is_looping() {
			return;
		}
		for _ in 0..self.ticker.advance(now) {
			self.step();
		}
		self.refresh_lit(now);
	}

	pub fn pause(&mut self) {
		self.ticker.reset();
	}

	fn refresh_lit(&mut self, now: f64) {
		let radius = self.hit_radius();
		let hits: Vec<bool> = (0..self.graph.nodes.len())
			.map(|i| {
				let (nx, ny) = self.node_pos(NodeId(i));
				self.particles.iter().any(|p| {
					let (px, py) = self.particle_pos(p);
					(px - nx).hypot(py - ny) < radius
				})
			})
			.collect();
		for (i, hit) in hits.into_iter().enumerate() {
			self.node_lit[i] = self.lit.update(NodeId(i), hit, now);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn quiet_state() -> FlowState {
		let config = FlowConfig {
			spawn_chance: 0.0,
			..FlowConfig::default()
		};
		let mut state = FlowState::new(FlowGraph::holon_stack(), config, 7);
		state.resize(800.0, 280.0);
		state.settle();
		state
	}

	#[test]
	fn test_particle_lives_exactly_two_hundred_ticks() {
		let mut state = quiet_state();
		state.launch(0, false, 0.005, 2.0);
		for _ in 0..200 {
			state.step();
		}
		assert_eq!(state.particles.len(), 1);
		assert_eq!(state.particles[0].progress(), 1.0);
		assert_eq!(state.particles[0].from, NodeId(0));
		assert_eq!(state.particles[0].to, NodeId(1));

		state.step();
		assert!(state.particles.is_empty());
	}

	#[test]
	fn test_progress_grows_by_speed_each_tick() {
		let mut state = quiet_state();
		state.launch(3, true, 0.004, 2.0);
		let mut last = state.particles[0].progress();
		for _ in 0..100 {
			state.step();
			let p = state.particles[0].progress();
			assert!(p > last);
			assert!((p - last - 0.004).abs() < 1e-12);
			last = p;
		}
	}

	#[test]
	fn test_no_particle_survives_past_one() {
		let mut state = FlowState::new(
			FlowGraph::holon_stack(),
			FlowConfig {
				spawn_chance: 1.0,
				..FlowConfig::default()
			},
			42,
		);
		state.settle();
		for _ in 0..2_000 {
			state.step();
			assert!(state.particles.iter().all(|p| p.progress() <= 1.0));
		}
		assert!(!state.particles.is_empty());
	}

	#[test]
	fn test_reverse_launch_swaps_endpoints() {
		let mut state = quiet_state();
		state.launch(5, true, 0.005, 2.0);
		assert_eq!(state.particles[0].from, NodeId(4));
		assert_eq!(state.particles[0].to, NodeId(3));
	}

	#[test]
	fn test_particle_eases_between_nodes() {
		let mut state = quiet_state();
		state.launch(0, false, 0.005, 2.0);
		let start = state.particle_pos(&state.particles[0]);
		assert_eq!(start, state.node_pos(NodeId(0)));
		for _ in 0..100 {
			state.step();
		}
		let (mx, my) = state.particle_pos(&state.particles[0]);
		let ((x0, y0), (x1, y1)) = (state.node_pos(NodeId(0)), state.node_pos(NodeId(1)));
		assert!((mx - (x0 + x1) / 2.0).abs() < 1e-9);
		assert!((my - (y0 + y1) / 2.0).abs() < 1e-9);
	}

	#[test]
	fn test_drawn_edges_monotone_in_progress() {
		let mut state = quiet_state();
		let mut last = 0;
		for step in 0..=100 {
			state.progress = step as f64 / 100.0;
			let full = (0..state.graph.edges.len())
				.filter(|&i| state.edge_progress(i) >= 1.0)
				.count();
			assert!(full >= last);
			last = full;
		}
		assert_eq!(last, state.graph.edges.len());
	}

	#[test]
	fn test_node_lights_after_particle_passes() {
		let mut state = quiet_state();
		state.launch(0, false, 0.005, 2.0);
		// Parked on its source node the particle keeps re-stamping the hit.
		state.refresh_lit(1000.0);
		assert_eq!(state.node_lit(NodeId(0)), 0.0);

		for _ in 0..100 {
			state.step();
		}
		state.refresh_lit(1100.0);
		assert_eq!(state.node_lit(NodeId(0)), 1.0);
		state.refresh_lit(1000.0 + 700.0);
		assert_eq!(state.node_lit(NodeId(0)), 0.0);
	}

	#[test]
	fn test_hit_radius_floor() {
		let mut state = quiet_state();
		assert_eq!(state.hit_radius(), 30.0);
		state.resize(2000.0, 280.0);
		assert_eq!(state.hit_radius(), 70.0);
	}

	#[test]
	fn test_fit_caps_height() {
		let state = quiet_state();
		assert_eq!(state.fit(Size::new(500.0, 900.0)), Size::new(500.0, 200.0));
		assert_eq!(state.fit(Size::new(1200.0, 900.0)), Size::new(1200.0, 280.0));
	}

	#[test]
	fn test_update_waits_for_reveal() {
		let mut state = FlowState::new(
			FlowGraph::holon_stack(),
			FlowConfig {
				spawn_chance: 1.0,
				..FlowConfig::default()
			},
			1,
		);
		state.update(100.0);
		assert!(state.particles.is_empty());
		assert!(state.trigger_reveal(100.0));
		state.update(800.0);
		assert!(state.particles.is_empty());
		state.update(1600.0);
		assert!(state.is_looping());
		assert_eq!(state.particles.len(), 1);
	}
}
