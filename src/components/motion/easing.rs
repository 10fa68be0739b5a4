//! Easing curves and windowed progress helpers shared by every diagram.

pub fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

/// Symmetric quadratic S-curve used for particles travelling along an edge.
pub fn ease_in_out_quad(t: f64) -> f64 {
	if t < 0.5 {
		2.0 * t * t
	} else {
		1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
	}
}

/// Progress of a sub-animation that starts at `delay` and lasts `span`, clamped to [0, 1].
pub fn window(progress: f64, delay: f64, span: f64) -> f64 {
	((progress - delay) / span).clamp(0.0, 1.0)
}

/// Staggered sweep: element `index` of a sequence spread over `slots` slots,
/// each taking two slots to complete.
pub fn sweep(progress: f64, slots: f64, index: usize) -> f64 {
	((progress * slots - index as f64) / 2.0).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_ease_endpoints() {
		assert_eq!(ease_out_cubic(0.0), 0.0);
		assert_eq!(ease_out_cubic(1.0), 1.0);
		assert_eq!(ease_in_out_quad(0.0), 0.0);
		assert_eq!(ease_in_out_quad(0.5), 0.5);
		assert_eq!(ease_in_out_quad(1.0), 1.0);
	}

	#[test]
	fn test_ease_out_cubic_front_loaded() {
		assert!(ease_out_cubic(0.5) > 0.8);
	}

	#[test]
	fn test_window_clamps() {
		assert_eq!(window(0.0, 0.12, 0.3), 0.0);
		assert_eq!(window(1.0, 0.12, 0.3), 1.0);
		assert!((window(0.27, 0.12, 0.3) - 0.5).abs() < 1e-12);
	}

	#[test]
	fn test_sweep_staggers_by_index() {
		assert_eq!(sweep(0.0, 9.0, 0), 0.0);
		assert_eq!(sweep(1.0, 9.0, 6), 1.0);
		assert!(sweep(0.2, 9.0, 0) > sweep(0.2, 9.0, 1));
	}
}
