use std::cell::RefCell;
use std::rc::Rc;

use glam::DVec2;
use leptos::prelude::*;
use log::warn;
use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent};

use super::render::{self, GlowBuffer};
use super::state::GyroscopeState;
use super::types::GyroscopeConfig;
use crate::components::motion::{
	Backing, FrameLoop, LoopOptions, Scene, Size, Trigger, mount, prefers_reduced_motion,
	random_seed,
};

pub struct GyroscopeScene {
	state: GyroscopeState,
	glow: GlowBuffer,
}

impl GyroscopeScene {
	fn point(&mut self, pointer: Option<DVec2>) {
		self.state.set_pointer(pointer);
	}
}

impl Scene for GyroscopeScene {
	fn name(&self) -> &'static str {
		"gyroscope"
	}

	fn fit(&self, parent: Size) -> Size {
		self.state.fit(parent)
	}

	fn resize(&mut self, backing: &Backing) -> Result<(), JsValue> {
		self.state.resize(backing.css);
		self.glow.resize(backing)
	}

	fn reveal(&mut self, now: f64) -> bool {
		self.state.start(now)
	}

	fn is_revealed(&self) -> bool {
		self.state.is_started()
	}

	fn settle(&mut self) {
		self.state.settle();
	}

	fn pause(&mut self, now: f64) {
		self.state.pause(now);
	}

	fn resume(&mut self, now: f64) {
		self.state.resume(now);
	}

	fn update(&mut self, now: f64) {
		self.state.update(now);
	}

	fn render(&self, ctx: &CanvasRenderingContext2d) -> Result<(), JsValue> {
		render::render(&self.state, ctx, &self.glow)
	}
}

/// Tilted rings, motes and a beating core, tumbling slowly and leaning
/// towards the pointer.
#[component]
pub fn GyroscopeCanvas(
	#[prop(optional)] config: Option<GyroscopeConfig>,
	#[prop(optional)] reduced_motion: Option<bool>,
	#[prop(optional)] seed: Option<u64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let mounted: Rc<RefCell<Option<FrameLoop<GyroscopeScene>>>> = Rc::new(RefCell::new(None));

	let mounted_fx = mounted.clone();
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if mounted_fx.borrow().is_some() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		let glow = match GlowBuffer::new() {
			Ok(glow) => glow,
			Err(err) => {
				warn!("gyroscope glow buffer unavailable: {err}");
				return;
			}
		};
		let config = config.clone().unwrap_or_default();
		let state = GyroscopeState::new(config, seed.unwrap_or_else(random_seed));
		let options = LoopOptions {
			trigger: Trigger::OnMount,
			reduced_motion: reduced_motion.unwrap_or_else(prefers_reduced_motion),
		};

		match mount(canvas, GyroscopeScene { state, glow }, options) {
			Ok(frame_loop) => *mounted_fx.borrow_mut() = Some(frame_loop),
			Err(err) => warn!("gyroscope canvas not mounted: {err}"),
		}
	});

	let mounted_mm = mounted.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let rect = canvas.get_bounding_client_rect();
		if rect.width() <= 0.0 || rect.height() <= 0.0 {
			return;
		}
		let pointer = DVec2::new(
			(ev.client_x() as f64 - rect.left()) / rect.width() - 0.5,
			(ev.client_y() as f64 - rect.top()) / rect.height() - 0.5,
		);
		if let Some(frame_loop) = mounted_mm.borrow().as_ref() {
			frame_loop.with_scene(|scene| scene.point(Some(pointer)));
		}
	};

	let on_mouseleave = move |_: MouseEvent| {
		if let Some(frame_loop) = mounted.borrow().as_ref() {
			frame_loop.with_scene(|scene| scene.point(None));
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			id="meshCanvas"
			class="mesh-canvas"
			on:mousemove=on_mousemove
			on:mouseleave=on_mouseleave
			style="display: block;"
		/>
	}
}
