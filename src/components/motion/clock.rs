//! Time bookkeeping for frame loops.

/// Largest frame delta fed to a simulation, in milliseconds.
pub const MAX_FRAME_DELTA: f64 = 50.0;
/// Delta assumed for the very first frame.
pub const FIRST_FRAME_DELTA: f64 = 16.0;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameTime {
	/// Active time since the clock first started, excluding pauses.
	pub elapsed: f64,
	/// Time since the previous frame, capped at [`MAX_FRAME_DELTA`].
	pub dt: f64,
}

/// Active-time clock that can be paused without the animation phase jumping.
///
/// Resuming shifts the origin forward by the paused duration, so `elapsed`
/// only ever counts time spent running.
#[derive(Clone, Debug, Default)]
pub struct FrameClock {
	origin: Option<f64>,
	last: Option<f64>,
	paused_at: Option<f64>,
}

impl FrameClock {
	pub fn start(&mut self, now: f64) {
		match (self.origin, self.paused_at.take()) {
			(None, _) => self.origin = Some(now),
			(Some(origin), Some(paused_at)) => self.origin = Some(origin + (now - paused_at)),
			(Some(_), None) => return,
		}
		self.last = Some(now);
	}

	pub fn pause(&mut self, now: f64) {
		if self.origin.is_some() && self.paused_at.is_none() {
			self.paused_at = Some(now);
		}
	}

	pub fn tick(&mut self, now: f64) -> FrameTime {
		let origin = *self.origin.get_or_insert(now);
		let dt = self
			.last
			.map_or(FIRST_FRAME_DELTA, |last| (now - last).clamp(0.0, MAX_FRAME_DELTA));
		self.last = Some(now);
		FrameTime {
			elapsed: now - origin,
			dt,
		}
	}
}

/// Fixed-timestep accumulator. Converts wall-clock frames into a whole number
/// of simulation ticks so per-tick rates do not depend on display refresh.
#[derive(Clone, Debug)]
pub struct Ticker {
	step: f64,
	max_steps: u32,
	carry: f64,
	last: Option<f64>,
}

impl Ticker {
	pub fn new(hz: f64, max_steps: u32) -> Self {
		Self {
			step: 1000.0 / hz,
			max_steps,
			carry: 0.0,
			last: None,
		}
	}

	/// Number of ticks due at `now`. The first call after a reset yields one tick.
	pub fn advance(&mut self, now: f64) -> u32 {
		let Some(last) = self.last.replace(now) else {
			return 1;
		};
		self.carry += (now - last).max(0.0);
		let due = (self.carry / self.step).floor();
		self.carry -= due * self.step;
		if due > self.max_steps as f64 {
			self.carry = 0.0;
			return self.max_steps;
		}
		due as u32
	}

	/// Forget the previous frame so time spent paused is not replayed.
	pub fn reset(&mut self) {
		self.last = None;
		self.carry = 0.0;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_clock_first_frame() {
		let mut clock = FrameClock::default();
		clock.start(500.0);
		let frame = clock.tick(516.0);
		assert_eq!(frame.elapsed, 16.0);
		assert_eq!(frame.dt, 16.0);
	}

	#[test]
	fn test_clock_caps_delta() {
		let mut clock = FrameClock::default();
		clock.start(0.0);
		clock.tick(0.0);
		assert_eq!(clock.tick(400.0).dt, MAX_FRAME_DELTA);
	}

	#[test]
	fn test_pause_excludes_paused_time() {
		let mut clock = FrameClock::default();
		clock.start(0.0);
		clock.tick(100.0);
		clock.pause(100.0);
		clock.start(10_100.0);
		let frame = clock.tick(10_116.0);
		assert_eq!(frame.elapsed, 116.0);
		assert_eq!(frame.dt, 16.0);
	}

	#[test]
	fn test_double_start_is_noop() {
		let mut clock = FrameClock::default();
		clock.start(0.0);
		clock.start(300.0);
		assert_eq!(clock.tick(316.0).elapsed, 316.0);
	}

	#[test]
	fn test_ticker_accumulates() {
		let mut ticker = Ticker::new(60.0, 4);
		assert_eq!(ticker.advance(0.0), 1);
		assert_eq!(ticker.advance(10.0), 0);
		assert_eq!(ticker.advance(20.0), 1);
		assert_eq!(ticker.advance(20.0 + 1000.0 / 30.0), 2);
	}

	#[test]
	fn test_ticker_caps_catch_up() {
		let mut ticker = Ticker::new(60.0, 4);
		ticker.advance(0.0);
		assert_eq!(ticker.advance(5_000.0), 4);
		ticker.reset();
		assert_eq!(ticker.advance(9_000.0), 1);
	}
}
