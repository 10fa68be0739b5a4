use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::warn;
use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::render;
use super::state::{FlowConfig, FlowState};
use super::types::FlowGraph;
use crate::components::motion::{
	Backing, FrameLoop, LoopOptions, Scene, Size, Trigger, mount, prefers_reduced_motion,
	random_seed,
};

pub struct FlowScene(FlowState);

impl Scene for FlowScene {
	fn name(&self) -> &'static str {
		"flow"
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

	fn pause(&mut self, _now: f64) {
		self.0.pause();
	}

	fn update(&mut self, now: f64) {
		self.0.update(now);
	}

	fn render(&self, ctx: &CanvasRenderingContext2d) -> Result<(), JsValue> {
		render::render(&self.0, ctx)
	}
}

/// Particles travelling between backend nodes; nodes light up as particles pass.
#[component]
pub fn FlowCanvas(
	#[prop(optional)] graph: Option<FlowGraph>,
	#[prop(optional)] config: Option<FlowConfig>,
	#[prop(optional)] reduced_motion: Option<bool>,
	#[prop(optional)] seed: Option<u64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let mounted: Rc<RefCell<Option<FrameLoop<FlowScene>>>> = Rc::new(RefCell::new(None));

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if mounted.borrow().is_some() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		let config = config.clone().unwrap_or_default();
		let options = LoopOptions {
			trigger: Trigger::InView {
				threshold: config.reveal_threshold,
				section: None,
			},
			reduced_motion: reduced_motion.unwrap_or_else(prefers_reduced_motion),
		};
		let graph = graph.clone().unwrap_or_else(FlowGraph::holon_stack);
		let state = FlowState::new(graph, config, seed.unwrap_or_else(random_seed));

		match mount(canvas, FlowScene(state), options) {
			Ok(frame_loop) => *mounted.borrow_mut() = Some(frame_loop),
			Err(err) => warn!("flow canvas not mounted: {err}"),
		}
	});

	view! { <canvas node_ref=canvas_ref id="flowCanvas" class="flow-canvas" style="display: block;" /> }
}
