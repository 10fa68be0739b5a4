use super::easing::ease_out_cubic;

/// One-shot entrance animation shared by every diagram.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Reveal {
	#[default]
	Hidden,
	Revealing {
		started_at: f64,
	},
	Looping,
}

impl Reveal {
	/// Enter the revealing state. Returns `false` if the reveal already began.
	pub fn trigger(&mut self, now: f64) -> bool {
		if *self != Reveal::Hidden {
			return false;
		}
		*self = Reveal::Revealing { started_at: now };
		true
	}

	/// Skip straight to the terminal, fully revealed state.
	pub fn settle(&mut self) {
		*self = Reveal::Looping;
	}

	pub fn is_triggered(&self) -> bool {
		*self != Reveal::Hidden
	}

	pub fn is_looping(&self) -> bool {
		*self == Reveal::Looping
	}

	/// Eased progress at `now`. Moves to [`Reveal::Looping`] once the
	/// duration has elapsed.
	pub fn advance(&mut self, now: f64, duration: f64) -> f64 {
		match *self {
			Reveal::Hidden => 0.0,
			Reveal::Looping => 1.0,
			Reveal::Revealing { started_at } => {
				let raw = ((now - started_at) / duration).clamp(0.0, 1.0);
				if raw >= 1.0 {
					*self = Reveal::Looping;
					1.0
				} else {
					ease_out_cubic(raw)
				}
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_trigger_is_idempotent() {
		let mut reveal = Reveal::default();
		assert!(reveal.trigger(100.0));
		assert!(!reveal.trigger(500.0));
		assert_eq!(reveal, Reveal::Revealing { started_at: 100.0 });
	}

	#[test]
	fn test_advance_reaches_looping() {
		let mut reveal = Reveal::default();
		assert_eq!(reveal.advance(0.0, 1500.0), 0.0);
		reveal.trigger(1000.0);
		let mid = reveal.advance(1750.0, 1500.0);
		assert!(mid > 0.5 && mid < 1.0);
		assert!(!reveal.is_looping());
		assert_eq!(reveal.advance(2500.0, 1500.0), 1.0);
		assert!(reveal.is_looping());
		assert!(!reveal.trigger(3000.0));
	}

	#[test]
	fn test_progress_is_monotone() {
		let mut reveal = Reveal::default();
		reveal.trigger(0.0);
		let mut last = 0.0;
		for ms in (0..=2400).step_by(16) {
			let p = reveal.advance(ms as f64, 2400.0);
			assert!(p >= last);
			last = p;
		}
	}

	#[test]
	fn test_early_timestamp_clamps_to_zero() {
		let mut reveal = Reveal::default();
		reveal.trigger(1000.0);
		assert_eq!(reveal.advance(990.0, 1500.0), 0.0);
	}

	#[test]
	fn test_settle_skips_reveal() {
		let mut reveal = Reveal::default();
		reveal.settle();
		assert!(reveal.is_looping());
		assert_eq!(reveal.advance(0.0, 1500.0), 1.0);
	}
}
