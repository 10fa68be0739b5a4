/// Whether a frame loop should be drawing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
	/// Never started.
	#[default]
	Idle,
	Running,
	Paused,
}

/// Scheduler bookkeeping for a `requestAnimationFrame` loop.
///
/// Tracks whether a callback is already queued so a quick stop/start pair
/// never ends up with two callbacks chasing each other.
#[derive(Clone, Copy, Debug, Default)]
pub struct Playback {
	state: PlaybackState,
	frame_pending: bool,
}

impl Playback {
	pub fn state(&self) -> PlaybackState {
		self.state
	}

	pub fn is_running(&self) -> bool {
		self.state == PlaybackState::Running
	}

	/// Returns `true` when the caller must request a new frame.
	pub fn start(&mut self) -> bool {
		if self.is_running() {
			return false;
		}
		self.state = PlaybackState::Running;
		self.request()
	}

	/// Returns `true` if the loop was running.
	pub fn stop(&mut self) -> bool {
		if !self.is_running() {
			return false;
		}
		self.state = PlaybackState::Paused;
		true
	}

	/// Called on entry to the frame callback. Returns whether to draw.
	pub fn on_frame(&mut self) -> bool {
		self.frame_pending = false;
		self.is_running()
	}

	/// Called after drawing. Returns `true` when the next frame must be requested.
	pub fn request(&mut self) -> bool {
		if !self.is_running() || self.frame_pending {
			return false;
		}
		self.frame_pending = true;
		true
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_start_requests_once() {
		let mut playback = Playback::default();
		assert_eq!(playback.state(), PlaybackState::Idle);
		assert!(playback.start());
		assert!(!playback.start());
		assert!(!playback.request());
	}

	#[test]
	fn test_stop_then_start_before_frame_fires() {
		let mut playback = Playback::default();
		assert!(playback.start());
		assert!(playback.stop());
		// The queued callback is still pending, so restarting must not queue another.
		assert!(!playback.start());
		assert!(playback.on_frame());
		assert!(playback.request());
	}

	#[test]
	fn test_stopped_loop_does_not_reschedule() {
		let mut playback = Playback::default();
		playback.start();
		playback.stop();
		assert_eq!(playback.state(), PlaybackState::Paused);
		assert!(!playback.on_frame());
		assert!(!playback.request());
		assert!(playback.start());
	}

	#[test]
	fn test_stop_when_idle() {
		let mut playback = Playback::default();
		assert!(!playback.stop());
	}
}
