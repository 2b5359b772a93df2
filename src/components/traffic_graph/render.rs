use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::TopologyState;
use crate::engine::{color_for, link_width_for};

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

pub fn render(state: &TopologyState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str("#1a1a2e");
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_rings(state, ctx);
	draw_edges(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();

	if state.graph.is_empty() {
		ctx.set_fill_style_str("rgba(255, 255, 255, 0.6)");
		ctx.set_font("14px sans-serif");
		let _ = ctx.fill_text("No visible devices", state.width / 2.0 - 60.0, state.height / 2.0);
	}
}

fn draw_rings(state: &TopologyState, ctx: &CanvasRenderingContext2d) {
	let Some(radii) = state.layout.radii else {
		return;
	};
	let c = state.layout.center;
	ctx.set_stroke_style_str("rgba(255, 255, 255, 0.06)");
	ctx.set_line_width(1.0 / state.transform.k);
	for r in [radii.inner(), radii.middle(), radii.outer()] {
		ctx.begin_path();
		let _ = ctx.arc(c.x, c.y, r, 0.0, 2.0 * PI);
		ctx.stroke();
	}
}

fn draw_edges(state: &TopologyState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	let (dash, gap, arrow_size) = (8.0 / k, 4.0 / k, 8.0 / k);
	let dash_offset = -(state.flow_time * 30.0) % (dash + gap);
	let t = ease_out_cubic(state.hover.highlight_t);

	for edge in &state.graph.edges {
		let (Some(p1), Some(p2)) = (state.layout.get(&edge.source), state.layout.get(&edge.target))
		else {
			continue;
		};
		let (dx, dy) = (p2.x - p1.x, p2.y - p1.y);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			continue;
		}

		let alpha = state
			.node_alpha(&edge.source, t)
			.min(state.node_alpha(&edge.target, t));
		let (edge_alpha, arrow_alpha) = (0.6 * alpha, 0.8 * alpha);
		let target_radius = state.node_radius(&edge.target);

		ctx.set_global_alpha(edge_alpha);
		ctx.set_stroke_style_str(color_for(&edge.protocol));
		ctx.set_line_width(link_width_for(edge.weight) / k);
		let _ = ctx.set_line_dash(&js_sys::Array::of2(
			&JsValue::from_f64(dash),
			&JsValue::from_f64(gap),
		));
		ctx.set_line_dash_offset(dash_offset);

		let (ux, uy) = (dx / dist, dy / dist);
		ctx.begin_path();
		ctx.move_to(p1.x, p1.y);
		ctx.line_to(
			p2.x - ux * (target_radius + arrow_size),
			p2.y - uy * (target_radius + arrow_size),
		);
		ctx.stroke();

		let _ = ctx.set_line_dash(&js_sys::Array::new());
		ctx.set_global_alpha(arrow_alpha);
		ctx.set_fill_style_str(color_for(&edge.protocol));
		let (tip_x, tip_y) = (p2.x - ux * target_radius, p2.y - uy * target_radius);
		let (back_x, back_y) = (tip_x - ux * arrow_size, tip_y - uy * arrow_size);
		let (px, py) = (-uy * arrow_size * 0.5, ux * arrow_size * 0.5);
		ctx.begin_path();
		ctx.move_to(tip_x, tip_y);
		ctx.line_to(back_x + px, back_y + py);
		ctx.line_to(back_x - px, back_y - py);
		ctx.close_path();
		ctx.fill();
	}
	ctx.set_global_alpha(1.0);
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn draw_nodes(state: &TopologyState, ctx: &CanvasRenderingContext2d) {
	let (t, k) = (
		ease_out_cubic(state.hover.highlight_t),
		state.transform.k,
	);
	let hovered = state.active_selection().and_then(|s| s.node());

	for node in &state.graph.nodes {
		let Some(p) = state.layout.get(&node.id) else {
			continue;
		};
		let alpha = state.node_alpha(&node.id, t);
		let mut radius = state.node_radius(&node.id);
		if hovered == Some(node.id.as_str()) {
			radius *= 1.0 + 0.35 * t;
		}

		ctx.set_global_alpha(alpha);
		ctx.begin_path();
		let _ = ctx.arc(p.x, p.y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(&node.color);
		ctx.fill();

		if hovered == Some(node.id.as_str()) && t > 0.01 {
			ctx.begin_path();
			let _ = ctx.arc(p.x, p.y, radius + 2.0 / k, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str(&format!("rgba(255, 255, 255, {})", 0.7 * t));
			ctx.set_line_width(1.5 / k);
			ctx.stroke();
		}

		ctx.set_fill_style_str(&format!("rgba(255, 255, 255, {})", alpha * 0.8));
		ctx.set_font(&format!("{}px sans-serif", 10.0 / k.max(0.5)));
		let _ = ctx.fill_text(&node.label, p.x + radius + 3.0, p.y + 3.0);
	}
	ctx.set_global_alpha(1.0);
}
