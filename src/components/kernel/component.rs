use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::warn;
use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::render;
use super::state::{KernelConfig, KernelState};
use super::types::KernelStyle;
use crate::components::motion::{
	Backing, FrameLoop, LoopOptions, Scene, Size, Trigger, mount, prefers_reduced_motion,
};

pub struct KernelScene(KernelState);

impl Scene for KernelScene {
	fn name(&self) -> &'static str {
		"kernel"
	}

	fn fit(&self, parent: Size) -> Size {
		self.0.fit(parent)
	}

	fn resize(&mut self, backing: &Backing) -> Result<(), JsValue> {
		self.0.resize(backing.css.width, backing.css.height);
		Ok(())
	}

	fn reveal(&mut self, now: f64) -> bool {
		self.0.trigger_reveal(now)
	}

	fn is_revealed(&self) -> bool {
		self.0.is_revealed()
	}

	fn settle(&mut self) {
		self.0.settle();
	}

	fn update(&mut self, now: f64) {
		self.0.update(now);
	}

	fn render(&self, ctx: &CanvasRenderingContext2d) -> Result<(), JsValue> {
		render::render(&self.0, ctx)
	}
}

/// Concentric constraint-to-freedom diagram with labels sitting on the orbits.
#[component]
pub fn KernelCanvas(
	#[prop(optional)] style: KernelStyle,
	#[prop(optional)] config: Option<KernelConfig>,
	#[prop(optional)] reduced_motion: Option<bool>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let mounted: Rc<RefCell<Option<FrameLoop<KernelScene>>>> = Rc::new(RefCell::new(None));

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if mounted.borrow().is_some() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		let config = config.clone().unwrap_or_else(|| KernelConfig {
			style,
			..KernelConfig::default()
		});
		let options = LoopOptions {
			trigger: Trigger::InView {
				threshold: config.reveal_threshold,
				section: Some(config.section),
			},
			reduced_motion: reduced_motion.unwrap_or_else(prefers_reduced_motion),
		};

		match mount(canvas, KernelScene(KernelState::new(config)), options) {
			Ok(frame_loop) => *mounted.borrow_mut() = Some(frame_loop),
			Err(err) => warn!("kernel canvas not mounted: {err}"),
		}
	});

	view! { <canvas node_ref=canvas_ref id="kernelCanvas" class="kernel-canvas" style="display: block;" /> }
}
