//! Viewport visibility hooks and the reduced-motion preference.

use std::sync::OnceLock;

use js_sys::Array;
use wasm_bindgen::prelude::*;
use web_sys::{Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use crate::error::CanvasError;

const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

/// The user's reduced-motion preference, sampled once on first use.
pub fn prefers_reduced_motion() -> bool {
	static REDUCED: OnceLock<bool> = OnceLock::new();
	*REDUCED.get_or_init(|| {
		web_sys::window()
			.and_then(|window| window.match_media(REDUCED_MOTION_QUERY).ok().flatten())
			.is_some_and(|query| query.matches())
	})
}

type EntriesCallback = Closure<dyn FnMut(Array, IntersectionObserver)>;

/// Keeps an `IntersectionObserver` and its callback alive; disconnects on drop.
pub struct VisibilityObserver {
	observer: IntersectionObserver,
	_callback: EntriesCallback,
}

impl Drop for VisibilityObserver {
	fn drop(&mut self) {
		self.observer.disconnect();
	}
}

/// Call `on_visible` whenever `target` intersects the viewport past
/// `threshold`, and `on_hidden` whenever it stops.
pub fn observe_visibility(
	target: &Element,
	threshold: f64,
	mut on_visible: impl FnMut() + 'static,
	mut on_hidden: impl FnMut() + 'static,
) -> Result<VisibilityObserver, CanvasError> {
	let callback = EntriesCallback::new(move |entries: Array, _observer: IntersectionObserver| {
		for entry in entries.iter() {
			let entry: IntersectionObserverEntry = entry.unchecked_into();
			if entry.is_intersecting() {
				on_visible();
			} else {
				on_hidden();
			}
		}
	});
	observe(target, threshold, callback)
}

/// Call `on_enter` the first time `target` intersects the viewport, then stop observing.
pub fn observe_once(
	target: &Element,
	threshold: f64,
	on_enter: impl FnOnce() + 'static,
) -> Result<VisibilityObserver, CanvasError> {
	let mut on_enter = Some(on_enter);
	let callback = EntriesCallback::new(move |entries: Array, observer: IntersectionObserver| {
		for entry in entries.iter() {
			let entry: IntersectionObserverEntry = entry.unchecked_into();
			if !entry.is_intersecting() {
				continue;
			}
			if let Some(enter) = on_enter.take() {
				observer.unobserve(&entry.target());
				enter();
			}
		}
	});
	observe(target, threshold, callback)
}

fn observe(
	target: &Element,
	threshold: f64,
	callback: EntriesCallback,
) -> Result<VisibilityObserver, CanvasError> {
	let init = IntersectionObserverInit::new();
	init.set_threshold(&JsValue::from_f64(threshold));
	let observer =
		IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
	observer.observe(target);
	Ok(VisibilityObserver {
		observer,
		_callback: callback,
	})
}
