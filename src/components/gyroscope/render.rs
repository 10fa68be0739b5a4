use std::f64::consts::TAU;

use js_sys::Array;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::state::{GyroscopeState, depth_fade};
use super::types::{CORE_ORBITS, RINGS};
use crate::components::motion::Backing;
use crate::error::CanvasError;

const BACKGROUND: &str = "#0C0C0E";
const GLOW_ALPHA: f64 = 0.45;
const HUD_TICKS: usize = 96;
const HUD_GUIDES: [f64; 3] = [0.16, 0.30, 0.44];

/// Offscreen canvas the core and motes are drawn into before being blurred
/// back onto the scene.
pub struct GlowBuffer {
	canvas: HtmlCanvasElement,
	ctx: CanvasRenderingContext2d,
	backing: Option<Backing>,
}

impl GlowBuffer {
	pub fn new() -> Result<Self, CanvasError> {
		let document = web_sys::window()
			.ok_or(CanvasError::NoWindow)?
			.document()
			.ok_or(CanvasError::NoDocument)?;
		let canvas: HtmlCanvasElement = document
			.create_element("canvas")?
			.dyn_into()
			.map_err(|_| CanvasError::NoContext)?;
		let ctx = canvas
			.get_context("2d")?
			.ok_or(CanvasError::NoContext)?
			.dyn_into()
			.map_err(|_| CanvasError::NoContext)?;
		Ok(Self {
			canvas,
			ctx,
			backing: None,
		})
	}

	pub fn resize(&mut self, backing: &Backing) -> Result<(), JsValue> {
		backing.apply_offscreen(&self.canvas, &self.ctx)?;
		self.backing = Some(*backing);
		Ok(())
	}
}

pub fn render(
	state: &GyroscopeState,
	ctx: &CanvasRenderingContext2d,
	glow: &GlowBuffer,
) -> Result<(), JsValue> {
	let (w, h) = (state.size.width, state.size.height);
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, w, h);

	if let Some(backing) = glow.backing {
		glow.ctx.clear_rect(0.0, 0.0, w, h);
		draw_core(state, &glow.ctx)?;
		draw_motes(state, &glow.ctx)?;

		ctx.save();
		ctx.set_filter(&format!("blur({}px)", (state.scale() * 0.015).max(8.0)));
		ctx.set_global_alpha(GLOW_ALPHA);
		ctx.draw_image_with_html_canvas_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
			&glow.canvas,
			0.0,
			0.0,
			backing.pixel_width() as f64,
			backing.pixel_height() as f64,
			0.0,
			0.0,
			w,
			h,
		)?;
		ctx.restore();
	}

	draw_waves(state, ctx)?;
	draw_hud(state, ctx)?;
	draw_links(state, ctx)?;
	for ring in 0..RINGS.len() {
		draw_ring(state, ctx, ring)?;
	}
	draw_motes(state, ctx)?;
	draw_core(state, ctx)?;
	draw_vignette(state, ctx)?;
	draw_noise(state, ctx)
}

fn draw_waves(state: &GyroscopeState, ctx: &CanvasRenderingContext2d) -> Result<(), JsValue> {
	let waves = state.waves();
	if waves.is_empty() {
		return Ok(());
	}
	let c = state.center();
	let band = state.scale() * 0.12;
	ctx.save();
	ctx.set_global_composite_operation("lighter")?;
	for wave in waves {
		let a = wave.alpha;
		let inner = (wave.radius - band).max(0.0);
		let gradient = ctx.create_radial_gradient(c.x, c.y, inner, c.x, c.y, wave.radius)?;
		gradient.add_color_stop(0.0, "rgba(255, 80, 20, 0)")?;
		gradient.add_color_stop(0.3, &format!("rgba(255, 70, 15, {})", a * 0.5))?;
		gradient.add_color_stop(0.6, &format!("rgba(255, 255, 255, {a})"))?;
		gradient.add_color_stop(0.85, &format!("rgba(255, 70, 15, {})", a * 0.5))?;
		gradient.add_color_stop(1.0, "rgba(255, 55, 0, 0)")?;
		#[allow(deprecated)]
		ctx.set_fill_style(&gradient);
		ctx.fill_rect(
			c.x - wave.radius,
			c.y - wave.radius,
			wave.radius * 2.0,
			wave.radius * 2.0,
		);
	}
	ctx.restore();
	Ok(())
}

/// Crosshair, tick ring and dashed guide circles.
fn draw_hud(state: &GyroscopeState, ctx: &CanvasRenderingContext2d) -> Result<(), JsValue> {
	let a = state.bloom();
	if a < 0.01 {
		return Ok(());
	}
	let (c, s) = (state.center(), state.scale());
	ctx.save();

	let arm = s * 0.55;
	ctx.set_stroke_style_str(&format!("rgba(255, 255, 255, {})", 0.025 * a));
	ctx.set_line_width(0.4);
	ctx.begin_path();
	ctx.move_to(c.x - arm, c.y);
	ctx.line_to(c.x + arm, c.y);
	ctx.move_to(c.x, c.y - arm);
	ctx.line_to(c.x, c.y + arm);
	ctx.stroke();

	let inner = s * 0.5;
	for i in 0..HUD_TICKS {
		let angle = i as f64 / HUD_TICKS as f64 * TAU;
		let major = i % 6 == 0;
		let (len, alpha, width) = if major {
			(s * 0.016, 0.05, 0.5)
		} else {
			(s * 0.008, 0.025, 0.3)
		};
		let (cos, sin) = (angle.cos(), angle.sin());
		ctx.set_stroke_style_str(&format!("rgba(255, 255, 255, {})", alpha * a));
		ctx.set_line_width(width);
		ctx.begin_path();
		ctx.move_to(c.x + cos * inner, c.y + sin * inner);
		ctx.line_to(c.x + cos * (inner + len), c.y + sin * (inner + len));
		ctx.stroke();
	}

	ctx.set_stroke_style_str(&format!("rgba(255, 255, 255, {})", 0.02 * a));
	ctx.set_line_width(0.3);
	ctx.set_line_dash(&Array::of2(&JsValue::from_f64(2.0), &JsValue::from_f64(6.0)))?;
	for r in HUD_GUIDES {
		ctx.begin_path();
		ctx.arc(c.x, c.y, r * s, 0.0, TAU)?;
		ctx.stroke();
	}
	ctx.set_line_dash(&Array::new())?;
	ctx.restore();
	Ok(())
}

fn draw_links(state: &GyroscopeState, ctx: &CanvasRenderingContext2d) -> Result<(), JsValue> {
	let links = state.links();
	if links.is_empty() {
		return Ok(());
	}
	ctx.save();
	ctx.set_global_composite_operation("lighter")?;
	for link in links {
		ctx.begin_path();
		ctx.move_to(link.from.x, link.from.y);
		ctx.line_to(link.to.x, link.to.y);
		ctx.set_stroke_style_str(&format!("rgba(255, 255, 255, {})", link.alpha));
		ctx.set_line_width(link.width);
		ctx.stroke();
	}
	ctx.restore();
	Ok(())
}

/// Stroked segment by segment so each can fade with its own depth.
fn draw_ring(
	state: &GyroscopeState,
	ctx: &CanvasRenderingContext2d,
	ring: usize,
) -> Result<(), JsValue> {
	let bloom = state.ring_bloom(ring);
	if bloom < 0.01 {
		return Ok(());
	}
	let spec = &RINGS[ring];
	let s = state.scale();
	ctx.save();
	if let Some([dash, gap]) = spec.dash {
		ctx.set_line_dash(&Array::of2(&JsValue::from_f64(dash), &JsValue::from_f64(gap)))?;
	}
	for pair in state.ring_points(ring).windows(2) {
		let (p0, p1) = (pair[0], pair[1]);
		let z = (p0.z + p1.z) / 2.0;
		let fade = (0.2 + 0.8 * ((z + s * 0.5) / s)).clamp(0.05, 1.0);
		ctx.begin_path();
		ctx.move_to(p0.pos.x, p0.pos.y);
		ctx.line_to(p1.pos.x, p1.pos.y);
		ctx.set_stroke_style_str(&format!(
			"rgba(255, 255, 255, {})",
			spec.opacity * bloom * fade
		));
		ctx.set_line_width(spec.line_width * (0.4 + 0.6 * p0.scale));
		ctx.stroke();
	}
	ctx.set_line_dash(&Array::new())?;
	ctx.restore();
	Ok(())
}

fn draw_motes(state: &GyroscopeState, ctx: &CanvasRenderingContext2d) -> Result<(), JsValue> {
	let s = state.scale();
	for mote in state.mote_points(0.01) {
		let (x, y) = (mote.at.pos.x, mote.at.pos.y);
		let alpha = mote.alpha * depth_fade(mote.at.z, s);
		let size = mote.size.max(0.5);

		let reach = (size * 5.0).max(1.0);
		let glow = ctx.create_radial_gradient(x, y, 0.0, x, y, reach)?;
		glow.add_color_stop(0.0, &format!("rgba(255, 255, 255, {})", alpha * 0.35))?;
		glow.add_color_stop(1.0, "rgba(255, 255, 255, 0)")?;
		#[allow(deprecated)]
		ctx.set_fill_style(&glow);
		ctx.fill_rect(x - reach, y - reach, reach * 2.0, reach * 2.0);

		ctx.begin_path();
		ctx.arc(x, y, size, 0.0, TAU)?;
		ctx.set_fill_style_str(&format!("rgba(255, 255, 255, {alpha})"));
		ctx.fill();
	}
	Ok(())
}

/// Matte orange sphere inside its orbits. A heartbeat heats it towards white
/// and throws a brighter halo.
fn draw_core(state: &GyroscopeState, ctx: &CanvasRenderingContext2d) -> Result<(), JsValue> {
	let b = state.core_bloom();
	if b < 0.01 {
		return Ok(());
	}
	let (c, s) = (state.center(), state.scale());
	let beat = state.heartbeat_pulse();
	let r = state.core_radius();

	ctx.save();
	ctx.set_global_composite_operation("lighter")?;
	let intensity = (1.0 + beat * 1.2) * b;
	let reach = r * (3.5 + beat * 3.0);
	let halo = ctx.create_radial_gradient(c.x, c.y, r * 0.5, c.x, c.y, reach)?;
	halo.add_color_stop(0.0, &format!("rgba(255, 70, 10, {})", 0.12 * intensity))?;
	halo.add_color_stop(0.3, &format!("rgba(255, 55, 0, {})", 0.06 * intensity))?;
	halo.add_color_stop(0.7, &format!("rgba(255, 40, 0, {})", 0.02 * intensity))?;
	halo.add_color_stop(1.0, "rgba(255, 30, 0, 0)")?;
	#[allow(deprecated)]
	ctx.set_fill_style(&halo);
	ctx.fill_rect(c.x - reach, c.y - reach, reach * 2.0, reach * 2.0);
	ctx.restore();

	for (orbit, spec) in CORE_ORBITS.iter().enumerate() {
		for pair in state.core_orbit_points(orbit).windows(2) {
			let (p0, p1) = (pair[0], pair[1]);
			let fade = (0.3 + 0.7 * ((p0.z + s * 0.3) / (s * 0.6))).clamp(0.06, 1.0);
			ctx.begin_path();
			ctx.move_to(p0.pos.x, p0.pos.y);
			ctx.line_to(p1.pos.x, p1.pos.y);
			ctx.set_stroke_style_str(&format!(
				"rgba(255, 255, 255, {})",
				spec.opacity * b * fade
			));
			ctx.set_line_width(spec.width * (0.5 + 0.5 * p0.scale));
			ctx.stroke();
		}
	}

	let [center, mid, edge] = core_colors(beat);
	let sphere = ctx.create_radial_gradient(c.x, c.y, 0.0, c.x, c.y, r)?;
	sphere.add_color_stop(0.0, &rgba(center, 0.95 * b))?;
	sphere.add_color_stop(0.7, &rgba(mid, 0.92 * b))?;
	sphere.add_color_stop(1.0, &rgba(edge, 0.85 * b))?;
	ctx.begin_path();
	ctx.arc(c.x, c.y, r, 0.0, TAU)?;
	#[allow(deprecated)]
	ctx.set_fill_style(&sphere);
	ctx.fill();

	if beat > 0.1 {
		ctx.save();
		ctx.set_global_composite_operation("lighter")?;
		let hot_r = r * 0.7;
		let hot = ctx.create_radial_gradient(c.x, c.y, 0.0, c.x, c.y, hot_r)?;
		hot.add_color_stop(0.0, &format!("rgba(255, 220, 180, {})", 0.25 * beat * b))?;
		hot.add_color_stop(0.5, &format!("rgba(255, 120, 50, {})", 0.1 * beat * b))?;
		hot.add_color_stop(1.0, "rgba(255, 60, 10, 0)")?;
		#[allow(deprecated)]
		ctx.set_fill_style(&hot);
		ctx.begin_path();
		ctx.arc(c.x, c.y, hot_r, 0.0, TAU)?;
		ctx.fill();
		ctx.restore();
	}
	Ok(())
}

/// Centre, middle and rim colours of the core, orange at rest and warm white
/// at the peak of a beat.
fn core_colors(beat: f64) -> [[u8; 3]; 3] {
	let lerp = |from: f64, span: f64| (from + beat * span).round() as u8;
	[
		[255, lerp(65.0, 120.0), lerp(15.0, 80.0)],
		[255, lerp(55.0, 60.0), lerp(0.0, 30.0)],
		[230, lerp(45.0, 30.0), lerp(0.0, 10.0)],
	]
}

fn rgba([r, g, b]: [u8; 3], alpha: f64) -> String {
	format!("rgba({r}, {g}, {b}, {alpha})")
}

fn draw_vignette(state: &GyroscopeState, ctx: &CanvasRenderingContext2d) -> Result<(), JsValue> {
	let (w, h) = (state.size.width, state.size.height);
	let c = state.center();
	let vignette = ctx.create_radial_gradient(
		c.x,
		c.y,
		state.scale() * 0.2,
		c.x,
		c.y,
		w.max(h) * 0.85,
	)?;
	vignette.add_color_stop(0.0, "rgba(0, 0, 0, 0)")?;
	vignette.add_color_stop(1.0, "rgba(0, 0, 0, 0.4)")?;
	#[allow(deprecated)]
	ctx.set_fill_style(&vignette);
	ctx.fill_rect(0.0, 0.0, w, h);
	Ok(())
}

fn draw_noise(state: &GyroscopeState, ctx: &CanvasRenderingContext2d) -> Result<(), JsValue> {
	ctx.save();
	ctx.set_global_alpha(0.01);
	ctx.set_global_composite_operation("overlay")?;
	for speck in state.noise() {
		ctx.set_fill_style_str(if speck.light { "#fff" } else { "#000" });
		ctx.fill_rect(speck.x, speck.y, speck.width, speck.height);
	}
	ctx.restore();
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_core_colors_at_rest_and_peak() {
		assert_eq!(
			core_colors(0.0),
			[[255, 65, 15], [255, 55, 0], [230, 45, 0]]
		);
		assert_eq!(
			core_colors(1.0),
			[[255, 185, 95], [255, 115, 30], [230, 75, 10]]
		);
	}
}
