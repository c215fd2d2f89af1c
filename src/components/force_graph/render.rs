use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::scene::{LinkVisual, NodeVisual};
use super::state::ForceGraphState;

/// Paint the current visuals. Reads visuals only, never node simulation state.
pub fn render(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str("#ffffff");
	ctx.fill_rect(0.0, 0.0, state.width(), state.height());
	ctx.save();
	let t = state.view.transform;
	let _ = ctx.translate(t.x, t.y);
	let _ = ctx.scale(t.k, t.k);
	draw_links(&state.scene.visuals.links, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
	draw_tooltip(state, ctx);
}

fn draw_links(links: &[LinkVisual], ctx: &CanvasRenderingContext2d) {
	ctx.set_stroke_style_str("rgba(153, 153, 153, 0.6)");
	for link in links {
		if !(link.x1.is_finite() && link.y1.is_finite() && link.x2.is_finite() && link.y2.is_finite())
		{
			continue;
		}
		ctx.set_line_width(link.width);
		ctx.begin_path();
		ctx.move_to(link.x1, link.y1);
		ctx.line_to(link.x2, link.y2);
		ctx.stroke();

		if let Some(label) = &link.label {
			ctx.set_fill_style_str("#666666");
			ctx.set_font("9px sans-serif");
			let _ = ctx.fill_text(label, (link.x1 + link.x2) / 2.0, (link.y1 + link.y2) / 2.0);
		}
	}
}

fn draw_nodes(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let k = state.view.transform.k;
	for (idx, node) in state.scene.visuals.nodes.iter().enumerate() {
		if !(node.cx.is_finite() && node.cy.is_finite()) {
			continue;
		}
		draw_node(node, ctx);

		if state.selection == Some(idx) {
			ctx.begin_path();
			let _ = ctx.arc(node.cx, node.cy, node.radius + 3.0 / k, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str("#222222");
			ctx.set_line_width(2.0 / k);
			ctx.stroke();
		}
	}
	// labels last so circles never cover them
	ctx.set_fill_style_str("#111111");
	ctx.set_font("12px sans-serif");
	for node in &state.scene.visuals.nodes {
		if let Some(label) = &node.label {
			if node.cx.is_finite() && node.cy.is_finite() {
				let _ = ctx.fill_text(label, node.cx + node.radius + 2.0, node.cy + 4.0);
			}
		}
	}
}

fn draw_node(node: &NodeVisual, ctx: &CanvasRenderingContext2d) {
	ctx.begin_path();
	let _ = ctx.arc(node.cx, node.cy, node.radius, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(&node.color);
	ctx.fill();
	ctx.set_stroke_style_str("#ffffff");
	ctx.set_line_width(1.5);
	ctx.stroke();
}

fn draw_tooltip(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let Some(node) = state.hover.and_then(|idx| state.scene.visuals.nodes.get(idx)) else {
		return;
	};
	let t = state.view.transform;
	let (sx, sy) = t.apply(node.cx, node.cy);
	let (x, y) = (sx + node.radius * t.k + 6.0, sy - node.radius * t.k - 6.0);

	ctx.set_font("11px sans-serif");
	let width = ctx
		.measure_text(&node.tooltip)
		.map(|m| m.width())
		.unwrap_or(node.tooltip.len() as f64 * 6.0);
	ctx.set_fill_style_str("rgba(30, 30, 30, 0.85)");
	ctx.fill_rect(x - 4.0, y - 12.0, width + 8.0, 16.0);
	ctx.set_fill_style_str("#ffffff");
	let _ = ctx.fill_text(&node.tooltip, x, y);
}
