use std::f64::consts::PI;

use js_sys::Array;
use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::{DOTS, RINGS, RingsState};

const INK: &str = "0, 51, 70";

pub fn render(state: &RingsState, ctx: &CanvasRenderingContext2d) -> Result<(), JsValue> {
	let size = state.size;
	let c = size / 2.0;
	ctx.clear_rect(0.0, 0.0, size, size);

	for (i, ring) in RINGS.iter().enumerate() {
		let p = state.ring_progress(i);
		if p <= 0.0 {
			continue;
		}
		ctx.save();
		ctx.translate(c, c)?;
		ctx.rotate(state.rotation(i))?;
		ctx.begin_path();
		ctx.arc(0.0, 0.0, state.ring_radius(i), -PI / 2.0, -PI / 2.0 + 2.0 * PI * p)?;
		if ring.fill && p >= 1.0 {
			ctx.set_fill_style_str("rgba(0, 0, 0, 0.02)");
			ctx.fill();
		}
		ctx.set_stroke_style_str(&format!("rgba({INK}, {})", ring.opacity * p));
		ctx.set_line_width(if ring.radius > 0.35 { 0.5 } else { 1.0 });
		if let Some([dash, gap]) = ring.dash {
			ctx.set_line_dash(&Array::of2(&JsValue::from_f64(dash), &JsValue::from_f64(gap)))?;
			ctx.set_line_dash_offset(state.dash_offset(i));
		}
		ctx.stroke();
		ctx.set_line_dash(&Array::new())?;
		ctx.restore();
	}

	if state.is_looping() {
		for dot in &DOTS {
			let (x, y) = state.dot_position(dot);
			let glow = ctx.create_radial_gradient(x, y, 0.0, x, y, dot.size * 3.0)?;
			glow.add_color_stop(0.0, &format!("rgba({INK}, 0.3)"))?;
			glow.add_color_stop(1.0, &format!("rgba({INK}, 0)"))?;
			#[allow(deprecated)]
			ctx.set_fill_style(&glow);
			ctx.fill_rect(x - dot.size * 3.0, y - dot.size * 3.0, dot.size * 6.0, dot.size * 6.0);

			ctx.begin_path();
			ctx.arc(x, y, dot.size, 0.0, 2.0 * PI)?;
			let alpha = 0.5 + (state.now() * 0.002 + dot.angle).sin() * 0.2;
			ctx.set_fill_style_str(&format!("rgba({INK}, {alpha})"));
			ctx.fill();
		}
	}

	let label_alpha = state.label_alpha();
	if label_alpha > 0.0 {
		ctx.set_fill_style_str(&format!("rgba({INK}, {label_alpha})"));
		ctx.set_font(&format!("500 {}px Inter, sans-serif", size * 0.035));
		ctx.set_text_align("center");
		ctx.set_text_baseline("middle");
		ctx.fill_text(state.config.label, c, c)?;
	}
	Ok(())
}
