use std::f64::consts::PI;

use js_sys::Array;
use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::KernelState;
use super::types::{CAPTION, CORE_LABEL, DOTS, KernelLabel, LabelKind, Palette, RINGS};

const TRAIL_SAMPLES: usize = 10;
const TRAIL_STEP_MS: f64 = 35.0;

pub fn render(state: &KernelState, ctx: &CanvasRenderingContext2d) -> Result<(), JsValue> {
	let palette = state.config.style.palette();
	ctx.clear_rect(0.0, 0.0, state.width, state.height);

	if state.config.style.has_guides() {
		draw_guides(state, ctx, &palette)?;
	}
	draw_rings(state, ctx, &palette)?;
	if state.is_looping() {
		draw_dots(state, ctx, &palette)?;
	}
	let mut pill_slot = 0;
	for label in state.labels() {
		let lp = state.label_progress(label);
		if label.kind == LabelKind::Environment {
			if lp > 0.0 {
				draw_pill(state, ctx, &palette, label, pill_slot, lp)?;
			}
			pill_slot += 1;
		} else if lp > 0.0 {
			draw_label(state, ctx, &palette, label, lp)?;
		}
	}
	draw_core(state, ctx, &palette)?;
	draw_caption(state, ctx, &palette);
	Ok(())
}

/// Font size in px scaled to the canvas width, never below 9px.
fn font_size(state: &KernelState, ratio: f64) -> f64 {
	(state.width * ratio).max(9.0)
}

fn draw_guides(
	state: &KernelState,
	ctx: &CanvasRenderingContext2d,
	palette: &Palette,
) -> Result<(), JsValue> {
	let p = state.ring_progress(4);
	if p <= 0.0 {
		return Ok(());
	}
	let (cx, cy) = state.center();
	let (inner, outer) = (state.label_radius(0), state.label_radius(4) * p);
	ctx.save();
	ctx.set_line_dash(&Array::of2(&JsValue::from_f64(1.0), &JsValue::from_f64(4.0)))?;
	ctx.set_line_width(0.5);
	ctx.set_stroke_style_str(&format!("rgba({}, {})", palette.line, 0.12 * p));
	for label in state.labels().iter().filter(|l| l.kind == LabelKind::Environment) {
		let (cos, sin) = (label.angle.cos(), label.angle.sin());
		ctx.begin_path();
		ctx.move_to(cx + cos * inner, cy + sin * inner);
		ctx.line_to(cx + cos * outer, cy + sin * outer);
		ctx.stroke();
	}
	ctx.restore();
	Ok(())
}

fn draw_rings(
	state: &KernelState,
	ctx: &CanvasRenderingContext2d,
	palette: &Palette,
) -> Result<(), JsValue> {
	let (cx, cy) = state.center();
	for i in (1..RINGS.len()).rev() {
		let ring = &RINGS[i];
		let p = state.ring_progress(i);
		if p <= 0.0 {
			continue;
		}
		ctx.save();
		ctx.begin_path();
		ctx.arc(cx, cy, state.ring_radius(i), -PI / 2.0, -PI / 2.0 + 2.0 * PI * p)?;
		ctx.set_stroke_style_str(&format!("rgba({}, {})", palette.line, ring.opacity * p));
		ctx.set_line_width(ring.line_width);
		if let Some([dash, gap]) = ring.dash {
			ctx.set_line_dash(&Array::of2(&JsValue::from_f64(dash), &JsValue::from_f64(gap)))?;
			ctx.set_line_dash_offset(state.dash_offset(i));
		}
		ctx.stroke();
		ctx.set_line_dash(&Array::new())?;
		ctx.restore();
	}
	Ok(())
}

fn draw_dots(
	state: &KernelState,
	ctx: &CanvasRenderingContext2d,
	palette: &Palette,
) -> Result<(), JsValue> {
	let now = state.now();
	for dot in &DOTS {
		if state.config.style.has_trails() {
			for k in 1..=TRAIL_SAMPLES {
				let fade = 1.0 - k as f64 / (TRAIL_SAMPLES + 1) as f64;
				let (tx, ty) = state.dot_position(dot, now - k as f64 * TRAIL_STEP_MS);
				ctx.begin_path();
				ctx.arc(tx, ty, dot.size * (0.4 + 0.6 * fade), 0.0, 2.0 * PI)?;
				ctx.set_fill_style_str(&format!("rgba({}, {})", palette.line, 0.3 * fade * fade));
				ctx.fill();
			}
		}

		let (x, y) = state.dot_position(dot, now);
		let glow = ctx.create_radial_gradient(x, y, 0.0, x, y, dot.size * 3.5)?;
		glow.add_color_stop(0.0, &format!("rgba({}, 0.4)", palette.line))?;
		glow.add_color_stop(1.0, &format!("rgba({}, 0)", palette.line))?;
		#[allow(deprecated)]
		ctx.set_fill_style(&glow);
		ctx.fill_rect(x - dot.size * 4.0, y - dot.size * 4.0, dot.size * 8.0, dot.size * 8.0);

		ctx.begin_path();
		ctx.arc(x, y, dot.size, 0.0, 2.0 * PI)?;
		let alpha = 0.65 + (now * 0.002 + dot.angle).sin() * 0.15;
		ctx.set_fill_style_str(&format!("rgba({}, {alpha})", palette.line));
		ctx.fill();
	}
	Ok(())
}

struct LabelLook {
	color: &'static str,
	base_alpha: f64,
	font_ratio: f64,
	scale_gain: f64,
	shadow_alpha: f64,
	shadow_blur: f64,
}

fn look(kind: LabelKind, palette: &Palette) -> LabelLook {
	match kind {
		LabelKind::Invariant => LabelLook {
			color: palette.ink,
			base_alpha: 0.75,
			font_ratio: 0.019,
			scale_gain: 0.1,
			shadow_alpha: 0.7,
			shadow_blur: 14.0,
		},
		LabelKind::Rule => LabelLook {
			color: palette.line,
			base_alpha: 0.55,
			font_ratio: 0.015,
			scale_gain: 0.08,
			shadow_alpha: 0.5,
			shadow_blur: 12.0,
		},
		LabelKind::Interface | LabelKind::Environment => LabelLook {
			color: palette.line,
			base_alpha: 0.45,
			font_ratio: 0.014,
			scale_gain: 0.08,
			shadow_alpha: 0.5,
			shadow_blur: 10.0,
		},
	}
}

fn draw_label(
	state: &KernelState,
	ctx: &CanvasRenderingContext2d,
	palette: &Palette,
	label: &KernelLabel,
	lp: f64,
) -> Result<(), JsValue> {
	let (cx, cy) = state.center();
	let r = state.label_radius(label.ring);
	let (x, y) = (cx + label.angle.cos() * r, cy + label.angle.sin() * r);
	let lit = state.label_lit(label.id);
	let look = look(label.kind, palette);

	let alpha = (look.base_alpha + lit * (1.0 - look.base_alpha)) * lp;
	let weight = match label.kind {
		LabelKind::Invariant => (500.0 + lit * 200.0).round() as u32,
		_ if lit > 0.3 => 600,
		_ => 400,
	};
	let scale = 1.0 + lit * look.scale_gain;

	ctx.save();
	ctx.translate(x, y)?;
	ctx.scale(scale, scale)?;
	if lit > 0.05 {
		ctx.set_shadow_color(&format!("rgba({}, {})", palette.glow, look.shadow_alpha * lit));
		ctx.set_shadow_blur(look.shadow_blur * lit);
	}
	ctx.set_fill_style_str(&format!("rgba({}, {alpha})", look.color));
	ctx.set_font(&format!(
		"{weight} {}px Inter, sans-serif",
		font_size(state, look.font_ratio)
	));
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	ctx.fill_text(label.text, 0.0, 0.0)?;
	ctx.restore();
	Ok(())
}

fn draw_pill(
	state: &KernelState,
	ctx: &CanvasRenderingContext2d,
	palette: &Palette,
	label: &KernelLabel,
	slot: usize,
	lp: f64,
) -> Result<(), JsValue> {
	let (cx, cy) = state.center();
	let r = state.label_radius(label.ring);
	let angle = label.angle + state.pill_drift(slot);
	let (x, y) = (cx + angle.cos() * r, cy + angle.sin() * r);
	let lit = state.label_lit(label.id);

	let size = font_size(state, 0.013);
	let weight = if lit > 0.3 { 600 } else { 400 };
	ctx.set_font(&format!("{weight} {size}px Inter, sans-serif"));
	let (w, h) = (ctx.measure_text(label.text)?.width() + 14.0, size + 8.0);

	trace_pill(ctx, x - w / 2.0, y - h / 2.0, w, h, h / 2.0)?;
	ctx.set_fill_style_str(&format!(
		"rgba({}, {})",
		palette.pill_fill,
		(0.85 + lit * 0.15) * lp
	));
	ctx.fill();
	ctx.set_stroke_style_str(&format!("rgba({}, {})", palette.line, (0.3 + lit * 0.5) * lp));
	ctx.set_line_width(0.6);
	ctx.stroke();

	ctx.save();
	if lit > 0.05 {
		ctx.set_shadow_color(&format!("rgba({}, {})", palette.glow, 0.4 * lit));
		ctx.set_shadow_blur(8.0 * lit);
	}
	ctx.set_fill_style_str(&format!(
		"rgba({}, {})",
		palette.pill_text,
		(0.8 + lit * 0.2) * lp
	));
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	ctx.fill_text(label.text, x, y + 0.5)?;
	ctx.restore();
	Ok(())
}

fn trace_pill(
	ctx: &CanvasRenderingContext2d,
	x: f64,
	y: f64,
	w: f64,
	h: f64,
	r: f64,
) -> Result<(), JsValue> {
	ctx.begin_path();
	ctx.move_to(x + r, y);
	ctx.line_to(x + w - r, y);
	ctx.arc_to(x + w, y, x + w, y + r, r)?;
	ctx.line_to(x + w, y + h - r);
	ctx.arc_to(x + w, y + h, x + w - r, y + h, r)?;
	ctx.line_to(x + r, y + h);
	ctx.arc_to(x, y + h, x, y + h - r, r)?;
	ctx.line_to(x, y + r);
	ctx.arc_to(x, y, x + r, y, r)?;
	ctx.close_path();
	Ok(())
}

fn draw_core(
	state: &KernelState,
	ctx: &CanvasRenderingContext2d,
	palette: &Palette,
) -> Result<(), JsValue> {
	let e = state.ring_progress(0);
	if e <= 0.0 {
		return Ok(());
	}
	let (cx, cy) = state.center();
	let r = state.label_radius(0) * (e * 1.4).min(1.0);
	let grad = ctx.create_radial_gradient(cx - r * 0.1, cy - r * 0.1, 0.0, cx, cy, r)?;
	grad.add_color_stop(0.0, &format!("rgba({}, {})", palette.core, 0.95 * e))?;
	grad.add_color_stop(1.0, &format!("rgba({}, {})", palette.core, 0.98 * e))?;
	ctx.begin_path();
	ctx.arc(cx, cy, r, 0.0, 2.0 * PI)?;
	#[allow(deprecated)]
	ctx.set_fill_style(&grad);
	ctx.fill();

	if e > 0.4 {
		let lp = ((e - 0.4) * 1.7).min(1.0);
		ctx.set_fill_style_str(&format!("rgba({}, {})", palette.core_text, 0.95 * lp));
		ctx.set_font(&format!("600 {}px Inter, sans-serif", font_size(state, 0.024)));
		ctx.set_text_align("center");
		ctx.set_text_baseline("middle");
		ctx.fill_text(CORE_LABEL, cx, cy)?;
	}
	Ok(())
}

fn draw_caption(state: &KernelState, ctx: &CanvasRenderingContext2d, palette: &Palette) {
	let e = state.ring_progress(5);
	if e <= 0.2 {
		return;
	}
	let (cx, cy) = state.center();
	let top = cy + state.label_radius(4) + 36.0;
	let size = font_size(state, 0.015);
	ctx.set_text_align("center");
	ctx.set_text_baseline("top");
	for (i, (line, italic)) in CAPTION.iter().enumerate() {
		let alpha = e.min(1.0) * (0.55 - i as f64 * 0.1);
		ctx.set_fill_style_str(&format!("rgba({}, {alpha})", palette.line));
		ctx.set_font(&if *italic {
			format!("italic 400 {size}px Newsreader, serif")
		} else {
			format!("400 {size}px Inter, sans-serif")
		});
		let _ = ctx.fill_text(line, cx, top + i as f64 * size * 1.9);
	}
}
