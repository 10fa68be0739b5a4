//! Transient "lit" highlights triggered by proximity.
//!
//! A hit stamps the entity with the current time. Intensity is then a pure
//! function of the time since that stamp: a fast linear rise, a hold at full
//! brightness, and a linear decay back to zero.

use std::collections::HashMap;
use std::hash::Hash;

const RISE: f64 = 0.08;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Envelope {
	/// Total length of one highlight in milliseconds.
	pub duration: f64,
	/// Fraction of `duration` at which the hold ends and decay begins.
	pub hold: f64,
}

impl Envelope {
	pub const fn new(duration: f64, hold: f64) -> Self {
		Self { duration, hold }
	}

	pub fn intensity(&self, elapsed: f64) -> f64 {
		if !(0.0..self.duration).contains(&elapsed) {
			return 0.0;
		}
		let p = elapsed / self.duration;
		if p < RISE {
			p / RISE
		} else if p < self.hold {
			1.0
		} else {
			1.0 - (p - self.hold) / (1.0 - self.hold)
		}
	}
}

/// Last-hit timestamps keyed by a stable entity id.
#[derive(Clone, Debug)]
pub struct LitMap<K> {
	envelope: Envelope,
	hits: HashMap<K, f64>,
}

impl<K: Eq + Hash> LitMap<K> {
	pub fn new(envelope: Envelope) -> Self {
		Self {
			envelope,
			hits: HashMap::new(),
		}
	}

	/// Record whether `key` was hit at `now` and return its intensity.
	pub fn update(&mut self, key: K, hit: bool, now: f64) -> f64 {
		if hit {
			self.hits.insert(key, now);
			return self.envelope.intensity(0.0);
		}
		self.intensity(&key, now)
	}

	pub fn intensity(&self, key: &K, now: f64) -> f64 {
		self.hits
			.get(key)
			.map_or(0.0, |&at| self.envelope.intensity(now - at))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const FLOW: Envelope = Envelope::new(700.0, 0.5);

	fn close(a: f64, b: f64) -> bool {
		(a - b).abs() < 1e-9
	}

	#[test]
	fn test_envelope_shape() {
		assert_eq!(FLOW.intensity(0.0), 0.0);
		assert!(close(FLOW.intensity(0.04 * 700.0), 0.5));
		assert!(close(FLOW.intensity(0.08 * 700.0), 1.0));
		assert_eq!(FLOW.intensity(300.0), 1.0);
		assert!(close(FLOW.intensity(0.75 * 700.0), 0.5));
		assert_eq!(FLOW.intensity(700.0), 0.0);
		assert_eq!(FLOW.intensity(-1.0), 0.0);
	}

	#[test]
	fn test_envelope_never_exceeds_one() {
		let kernel = Envelope::new(800.0, 0.55);
		for ms in 0..900 {
			let v = kernel.intensity(ms as f64);
			assert!((0.0..=1.0).contains(&v), "intensity {v} at {ms}ms");
		}
	}

	#[test]
	fn test_unhit_entity_is_dark() {
		let lit: LitMap<usize> = LitMap::new(FLOW);
		assert_eq!(lit.intensity(&3, 10_000.0), 0.0);
	}

	#[test]
	fn test_later_hit_resets_origin() {
		let mut lit = LitMap::new(FLOW);
		lit.update(0, true, 1000.0);
		assert_eq!(lit.update(0, false, 1300.0), 1.0);
		assert!(lit.update(0, false, 1600.0) < 0.5);

		// A fresh hit restarts the envelope from zero.
		assert_eq!(lit.update(0, true, 1600.0), 0.0);
		assert!(close(lit.update(0, false, 1600.0 + 56.0), 1.0));
		assert_eq!(lit.update(0, false, 2300.0), 0.0);
	}

	#[test]
	fn test_keys_are_independent() {
		let mut lit = LitMap::new(FLOW);
		lit.update("a", true, 0.0);
		assert_eq!(lit.update("a", false, 200.0), 1.0);
		assert_eq!(lit.update("b", false, 200.0), 0.0);
	}
}
