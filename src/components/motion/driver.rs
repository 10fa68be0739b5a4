//! Generic `requestAnimationFrame` loop wiring a [`Scene`] to a canvas.

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Element, HtmlCanvasElement};

use super::events::EventListener;
use super::playback::Playback;
use super::surface::{Backing, Size};
use super::visibility::{VisibilityObserver, observe_once, observe_visibility};
use crate::error::CanvasError;

/// Fraction of the canvas that must stay in view for its loop to keep running.
pub const PAUSE_THRESHOLD: f64 = 0.05;

/// One animated diagram: state advanced per frame and drawn to a 2D context.
pub trait Scene: 'static {
	fn name(&self) -> &'static str;

	/// CSS size the canvas should take inside a parent of size `parent`.
	fn fit(&self, parent: Size) -> Size;

	/// Called after the canvas itself was resized.
	fn resize(&mut self, backing: &Backing) -> Result<(), JsValue>;

	/// Begin the entrance animation. Returns `false` if it already began.
	fn reveal(&mut self, now: f64) -> bool;

	fn is_revealed(&self) -> bool;

	/// Jump to the static, fully revealed frame used for reduced motion.
	fn settle(&mut self);

	fn pause(&mut self, _now: f64) {}

	fn resume(&mut self, _now: f64) {}

	fn update(&mut self, now: f64);

	fn render(&self, ctx: &CanvasRenderingContext2d) -> Result<(), JsValue>;
}

/// What starts the entrance animation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Trigger {
	/// Reveal the first time the target is `threshold` in view. When `section`
	/// is set, the closest ancestor matching that selector is observed instead
	/// of the canvas. Off-screen canvases pause.
	InView {
		threshold: f64,
		section: Option<&'static str>,
	},
	/// Reveal immediately; pause while the page is hidden.
	OnMount,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LoopOptions {
	pub trigger: Trigger,
	pub reduced_motion: bool,
}

/// High resolution timestamp on the same timebase as animation frames.
pub fn now() -> f64 {
	web_sys::window()
		.and_then(|window| window.performance())
		.map_or_else(js_sys::Date::now, |performance| performance.now())
}

/// Seed for a scene's random number generator.
pub fn random_seed() -> u64 {
	(js_sys::Math::random() * u64::MAX as f64) as u64
}

struct Inner<S> {
	scene: S,
	canvas: HtmlCanvasElement,
	ctx: CanvasRenderingContext2d,
	playback: Playback,
}

struct Handle<S: Scene> {
	inner: Rc<RefCell<Inner<S>>>,
	frame: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>,
}

impl<S: Scene> Clone for Handle<S> {
	fn clone(&self) -> Self {
		Self {
			inner: self.inner.clone(),
			frame: self.frame.clone(),
		}
	}
}

impl<S: Scene> Handle<S> {
	fn start(&self) {
		let request = {
			let mut guard = self.inner.borrow_mut();
			let inner = &mut *guard;
			if inner.playback.is_running() {
				return;
			}
			inner.scene.resume(now());
			debug!("{}: start", inner.scene.name());
			inner.playback.start()
		};
		if request {
			self.request_frame();
		}
	}

	fn stop(&self) {
		let mut guard = self.inner.borrow_mut();
		let inner = &mut *guard;
		if inner.playback.stop() {
			inner.scene.pause(now());
			debug!("{}: stop", inner.scene.name());
		}
	}

	fn reveal(&self) {
		let triggered = {
			let mut inner = self.inner.borrow_mut();
			let triggered = inner.scene.reveal(now());
			if triggered {
				debug!("{}: reveal", inner.scene.name());
			}
			triggered
		};
		if triggered {
			self.start();
		}
	}

	fn resume_if_revealed(&self) {
		if self.inner.borrow().scene.is_revealed() {
			self.start();
		}
	}

	fn settle(&self) {
		let mut inner = self.inner.borrow_mut();
		inner.scene.settle();
		debug!("{}: reduced motion, drawing static frame", inner.scene.name());
	}

	fn request_frame(&self) {
		let Some(window) = web_sys::window() else {
			return;
		};
		if let Some(callback) = self.frame.borrow().as_ref() {
			let _ = window.request_animation_frame(callback.as_ref().unchecked_ref());
		}
	}

	fn draw(&self, now: f64) {
		let request = {
			let mut guard = self.inner.borrow_mut();
			let inner = &mut *guard;
			if !inner.playback.on_frame() {
				return;
			}
			inner.scene.update(now);
			if let Err(err) = inner.scene.render(&inner.ctx) {
				debug!("{}: frame failed: {err:?}", inner.scene.name());
			}
			inner.playback.request()
		};
		if request {
			self.request_frame();
		}
	}

	fn resize(&self) -> Result<(), CanvasError> {
		let window = web_sys::window().ok_or(CanvasError::NoWindow)?;
		let mut guard = self.inner.borrow_mut();
		let inner = &mut *guard;
		let parent = inner.canvas.parent_element().ok_or(CanvasError::Detached)?;
		let css = inner.scene.fit(Size::new(
			parent.client_width() as f64,
			parent.client_height() as f64,
		));
		let backing = Backing::new(css, window.device_pixel_ratio());
		backing.apply(&inner.canvas, &inner.ctx)?;
		inner.scene.resize(&backing)?;
		debug!(
			"{}: resized to {}x{} @{}x",
			inner.scene.name(),
			css.width,
			css.height,
			backing.ratio
		);
		// Resizing clears the canvas; a loop that is not running must repaint now.
		if !inner.playback.is_running() && inner.scene.is_revealed() {
			inner.scene.render(&inner.ctx)?;
		}
		Ok(())
	}
}

/// A mounted animation. Dropping it detaches every observer and listener.
pub struct FrameLoop<S: Scene> {
	handle: Handle<S>,
	_listeners: Vec<EventListener>,
	_observers: Vec<VisibilityObserver>,
}

impl<S: Scene> FrameLoop<S> {
	/// Run `f` against the scene, e.g. to forward pointer input.
	pub fn with_scene<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
		f(&mut self.handle.inner.borrow_mut().scene)
	}
}

/// Attach `scene` to `canvas`: size it, follow window resizes, and start the
/// loop according to `options`.
pub fn mount<S: Scene>(
	canvas: HtmlCanvasElement,
	scene: S,
	options: LoopOptions,
) -> Result<FrameLoop<S>, CanvasError> {
	let window = web_sys::window().ok_or(CanvasError::NoWindow)?;
	let ctx: CanvasRenderingContext2d = canvas
		.get_context("2d")?
		.ok_or(CanvasError::NoContext)?
		.dyn_into()
		.map_err(|_| CanvasError::NoContext)?;
	debug!("{}: mounting", scene.name());

	let handle = Handle {
		inner: Rc::new(RefCell::new(Inner {
			scene,
			canvas: canvas.clone(),
			ctx,
			playback: Playback::default(),
		})),
		frame: Rc::new(RefCell::new(None)),
	};

	let resize_handle = handle.clone();
	let mut listeners = vec![EventListener::new(&window, "resize", move || {
		if let Err(err) = resize_handle.resize() {
			warn!("resize failed: {err}");
		}
	})?];

	if options.reduced_motion {
		handle.settle();
		handle.resize()?;
		return Ok(FrameLoop {
			handle,
			_listeners: listeners,
			_observers: Vec::new(),
		});
	}
	handle.resize()?;

	let frame_handle = handle.clone();
	*handle.frame.borrow_mut() = Some(Closure::new(move |now: f64| frame_handle.draw(now)));

	let mut observers = Vec::new();
	match options.trigger {
		Trigger::InView { threshold, section } => {
			let target: Element = section
				.and_then(|selector| canvas.closest(selector).ok().flatten())
				.unwrap_or_else(|| canvas.clone().into());
			let reveal_handle = handle.clone();
			observers.push(observe_once(&target, threshold, move || {
				reveal_handle.reveal()
			})?);
			let (shown, hidden) = (handle.clone(), handle.clone());
			observers.push(observe_visibility(
				&canvas,
				PAUSE_THRESHOLD,
				move || shown.resume_if_revealed(),
				move || hidden.stop(),
			)?);
		}
		Trigger::OnMount => {
			let document = window.document().ok_or(CanvasError::NoDocument)?;
			let (page_handle, page) = (handle.clone(), document.clone());
			listeners.push(EventListener::new(&document, "visibilitychange", move || {
				if page.hidden() {
					page_handle.stop();
				} else {
					page_handle.start();
				}
			})?);
			handle.reveal();
		}
	}

	Ok(FrameLoop {
		handle,
		_listeners: listeners,
		_observers: observers,
	})
}
