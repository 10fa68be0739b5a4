use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::{FlowState, NODE_SIZE};
use super::types::{NodeId, Shape};

pub fn render(state: &FlowState, ctx: &CanvasRenderingContext2d) -> Result<(), JsValue> {
	ctx.clear_rect(0.0, 0.0, state.width, state.height);
	draw_edges(state, ctx);
	draw_nodes(state, ctx)?;
	if state.is_looping() {
		draw_particles(state, ctx)?;
	}
	Ok(())
}

fn draw_edges(state: &FlowState, ctx: &CanvasRenderingContext2d) {
	ctx.set_line_width(1.0);
	for (i, edge) in state.graph.edges.iter().enumerate() {
		let p = state.edge_progress(i);
		if p <= 0.0 {
			continue;
		}
		let ((ax, ay), (bx, by)) = (state.node_pos(edge.a), state.node_pos(edge.b));
		ctx.begin_path();
		ctx.move_to(ax, ay);
		ctx.line_to(ax + (bx - ax) * p, ay + (by - ay) * p);
		ctx.set_stroke_style_str(&format!("rgba(255, 255, 255, {})", 0.35 * p));
		ctx.stroke();
	}
}

fn trace_shape(
	ctx: &CanvasRenderingContext2d,
	x: f64,
	y: f64,
	shape: Shape,
	size: f64,
) -> Result<(), JsValue> {
	ctx.begin_path();
	match shape {
		Shape::Hexagon => {
			for i in 0..6 {
				let angle = PI / 3.0 * i as f64 - PI / 2.0;
				let (px, py) = (x + angle.cos() * size, y + angle.sin() * size);
				if i == 0 {
					ctx.move_to(px, py);
				} else {
					ctx.line_to(px, py);
				}
			}
			ctx.close_path();
		}
		Shape::Square => ctx.rect(x - size * 0.8, y - size * 0.8, size * 1.6, size * 1.6),
		Shape::Circle => ctx.arc(x, y, size, 0.0, 2.0 * PI)?,
	}
	Ok(())
}

fn draw_nodes(state: &FlowState, ctx: &CanvasRenderingContext2d) -> Result<(), JsValue> {
	for (i, node) in state.graph.nodes.iter().enumerate() {
		let node_p = state.node_progress(i);
		if node_p <= 0.0 {
			continue;
		}
		let (x, y) = state.node_pos(NodeId(i));
		let lit = state.node_lit(NodeId(i));

		if lit > 0.05 {
			let glow = ctx.create_radial_gradient(x, y, 0.0, x, y, NODE_SIZE * 3.5)?;
			glow.add_color_stop(0.0, &format!("rgba(255, 255, 255, {})", 0.2 * lit))?;
			glow.add_color_stop(1.0, "rgba(255, 255, 255, 0)")?;
			#[allow(deprecated)]
			ctx.set_fill_style(&glow);
			ctx.fill_rect(x - NODE_SIZE * 4.0, y - NODE_SIZE * 4.0, NODE_SIZE * 8.0, NODE_SIZE * 8.0);
		}

		trace_shape(ctx, x, y, node.shape, NODE_SIZE * node_p)?;
		ctx.set_stroke_style_str(&format!(
			"rgba(255, 255, 255, {})",
			(0.6 + lit * 0.4) * node_p
		));
		ctx.set_line_width(1.0 + lit * 0.8);
		ctx.stroke();

		if node_p <= 0.5 {
			continue;
		}
		let label_alpha = (0.85 + lit * 0.15) * (node_p - 0.5) * 2.0;
		let weight = if lit > 0.3 { 700 } else { 400 };
		let scale = 1.0 + lit * 0.1;

		ctx.save();
		ctx.translate(x, y + NODE_SIZE + 16.0)?;
		ctx.scale(scale, scale)?;
		if lit > 0.05 {
			ctx.set_shadow_color(&format!("rgba(255, 255, 255, {})", 0.7 * lit));
			ctx.set_shadow_blur(14.0 * lit);
		}
		ctx.set_fill_style_str(&format!("rgba(255, 255, 255, {label_alpha})"));
		ctx.set_font(&format!("{weight} {}px Inter, sans-serif", 10.0 + lit * 3.0));
		ctx.set_text_align("center");
		ctx.set_text_baseline("top");
		ctx.fill_text(&node.label, 0.0, 0.0)?;
		ctx.restore();
	}
	Ok(())
}

fn draw_particles(state: &FlowState, ctx: &CanvasRenderingContext2d) -> Result<(), JsValue> {
	for particle in &state.particles {
		let (x, y) = state.particle_pos(particle);
		ctx.begin_path();
		ctx.arc(x, y, particle.size, 0.0, 2.0 * PI)?;
		ctx.set_fill_style_str(&format!("rgba(255, 255, 255, {})", 0.8 * particle.alpha()));
		ctx.fill();
	}
	Ok(())
}
