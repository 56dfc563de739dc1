//! Canvas rendering for the stage flow.
//!
//! Maps node content descriptors to drawn boxes. Rendering uses multiple
//! passes for correct z-ordering:
//! 1. Background and dot grid
//! 2. Connectors (world space), beneath every node
//! 3. Node boxes in layout order, then the hover ring

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::scale::{ScaleConfig, ScaledValues};
use super::state::{FlowViewState, NodeBox};
use super::theme::{BoxStyle, Theme};
use super::types::{EdgeStyle, NodeContent, TopicGroup};

/// Renders the complete flow to the canvas.
pub fn render(
	state: &FlowViewState,
	ctx: &CanvasRenderingContext2d,
	config: &ScaleConfig,
	theme: &Theme,
) {
	let scale = ScaledValues::new(config, state.transform.k);

	draw_background(state, ctx, theme);

	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);

	draw_dot_grid(state, ctx, theme);
	draw_edges(state, ctx, config, &scale);
	draw_nodes(state, ctx, config, &scale, theme);

	ctx.restore();
}

fn draw_background(state: &FlowViewState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let bg = &theme.background;
	let gradient = if bg.use_gradient {
		ctx.create_radial_gradient(
			state.width / 2.0,
			state.height / 2.0,
			0.0,
			state.width / 2.0,
			state.height / 2.0,
			state.width.max(state.height) * 0.8,
		)
		.ok()
	} else {
		None
	};

	match gradient {
		Some(gradient) => {
			let _ = gradient.add_color_stop(0.0, &bg.color_secondary.to_css());
			let _ = gradient.add_color_stop(1.0, &bg.color.to_css());
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		}
		None => ctx.set_fill_style_str(&bg.color.to_css()),
	}

	ctx.fill_rect(0.0, 0.0, state.width, state.height);
}

/// Dots on a fixed world grid, limited to the visible area.
fn draw_dot_grid(state: &FlowViewState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let bg = &theme.background;
	if bg.dot_gap <= 0.0 {
		return;
	}
	let gap = bg.dot_gap;
	// Too dense to be useful when zoomed far out.
	if gap * state.transform.k < 6.0 {
		return;
	}

	let (x0, y0) = state.screen_to_graph(0.0, 0.0);
	let (x1, y1) = state.screen_to_graph(state.width, state.height);

	ctx.set_fill_style_str(&bg.dot_color.to_css());
	let mut y = (y0 / gap).floor() * gap;
	while y <= y1 {
		let mut x = (x0 / gap).floor() * gap;
		while x <= x1 {
			ctx.fill_rect(x - bg.dot_size / 2.0, y - bg.dot_size / 2.0, bg.dot_size, bg.dot_size);
			x += gap;
		}
		y += gap;
	}
}

fn draw_edges(
	state: &FlowViewState,
	ctx: &CanvasRenderingContext2d,
	config: &ScaleConfig,
	scale: &ScaledValues,
) {
	let dash_offset = scale.dash_offset(state.flow_time, config.edge.flow_speed);

	for (edge, route) in state.graph.edges.iter().zip(&state.routes) {
		if route.len() < 2 {
			continue;
		}
		apply_edge_style(ctx, &edge.style, scale, dash_offset);
		stroke_rounded_polyline(ctx, route, config.edge.corner_radius);
	}

	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn apply_edge_style(
	ctx: &CanvasRenderingContext2d,
	style: &EdgeStyle,
	scale: &ScaledValues,
	dash_offset: f64,
) {
	ctx.set_stroke_style_str(&style.color.to_css());
	ctx.set_line_width(style.width * scale.edge_width_scale);

	// Fade dash pattern to solid when zoomed out
	let effective_gap = style.dash.1 * scale.dash_alpha;
	if style.dashed && effective_gap > 0.1 {
		let _ = ctx.set_line_dash(&js_sys::Array::of2(
			&JsValue::from_f64(style.dash.0),
			&JsValue::from_f64(effective_gap),
		));
		ctx.set_line_dash_offset(if style.animated { dash_offset } else { 0.0 });
	} else {
		let _ = ctx.set_line_dash(&js_sys::Array::new());
	}
}

/// Strokes an orthogonal path with rounded elbows.
fn stroke_rounded_polyline(ctx: &CanvasRenderingContext2d, points: &[(f64, f64)], radius: f64) {
	let Some((&(sx, sy), rest)) = points.split_first() else {
		return;
	};
	ctx.begin_path();
	ctx.move_to(sx, sy);
	for window in points.windows(3) {
		let (corner, next) = (window[1], window[2]);
		// Shrink the radius on short segments so elbows never overshoot.
		let seg_in = (corner.0 - window[0].0).abs() + (corner.1 - window[0].1).abs();
		let seg_out = (next.0 - corner.0).abs() + (next.1 - corner.1).abs();
		let r = radius.min(seg_in / 2.0).min(seg_out / 2.0);
		let _ = ctx.arc_to(corner.0, corner.1, next.0, next.1, r);
	}
	if let Some(&(ex, ey)) = rest.last() {
		ctx.line_to(ex, ey);
	}
	ctx.stroke();
}

fn draw_nodes(
	state: &FlowViewState,
	ctx: &CanvasRenderingContext2d,
	config: &ScaleConfig,
	scale: &ScaledValues,
	theme: &Theme,
) {
	let _ = ctx.set_line_dash(&js_sys::Array::new());

	for (node, b) in state.graph.nodes.iter().zip(&state.boxes) {
		match &node.content {
			NodeContent::Stage {
				ordinal,
				title,
				time,
				..
			} => draw_stage(ctx, b, config, scale, theme, *ordinal, title, time),
			NodeContent::Section { name } => draw_section(ctx, b, config, scale, theme, name),
			NodeContent::Details { groups } => draw_details(ctx, b, config, scale, theme, groups),
		}
	}

	if let Some(b) = state.hovered.and_then(|i| state.boxes.get(i)) {
		let ring = 3.0 / scale.k;
		rounded_rect(
			ctx,
			b.x - ring,
			b.y - ring,
			b.w + ring * 2.0,
			b.h + ring * 2.0,
			theme.stage.radius + ring,
		);
		ctx.set_stroke_style_str(&theme.hover_ring.to_css());
		ctx.set_line_width(1.5 / scale.k);
		ctx.stroke();
	}
}

fn fill_box(ctx: &CanvasRenderingContext2d, b: &NodeBox, style: &BoxStyle) {
	rounded_rect(ctx, b.x, b.y, b.w, b.h, style.radius);

	let gradient = ctx.create_linear_gradient(b.x, b.y, b.x, b.bottom());
	let stops = gradient
		.add_color_stop(0.0, &style.fill.lighten(0.08).to_css())
		.and_then(|_| gradient.add_color_stop(1.0, &style.fill.darken(0.1).to_css()));
	if stops.is_ok() {
		#[allow(deprecated)]
		ctx.set_fill_style(&gradient);
	} else {
		ctx.set_fill_style_str(&style.fill.to_css());
	}
	ctx.fill();

	if style.border_width > 0.0 {
		ctx.set_stroke_style_str(&style.border.to_css());
		ctx.set_line_width(style.border_width);
		ctx.stroke();
	}
}

#[allow(clippy::too_many_arguments)]
fn draw_stage(
	ctx: &CanvasRenderingContext2d,
	b: &NodeBox,
	config: &ScaleConfig,
	scale: &ScaledValues,
	theme: &Theme,
	ordinal: usize,
	title: &str,
	time: &str,
) {
	fill_box(ctx, b, &theme.stage);

	let r = config.node.badge_radius;
	let (cx, cy) = (b.x + 14.0 + r, b.y + b.h / 2.0);
	ctx.begin_path();
	let _ = ctx.arc(cx, cy, r, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(&theme.badge.to_css());
	ctx.fill();

	if !scale.show_text {
		return;
	}

	let size = config.text.title_size;
	ctx.set_text_baseline("middle");
	ctx.set_text_align("center");
	ctx.set_fill_style_str(&theme.background.color.to_css());
	ctx.set_font(&format!("bold {}px {}", size, theme.font_family));
	let _ = ctx.fill_text(&ordinal.to_string(), cx, cy);

	ctx.set_text_align("left");
	let text_x = cx + r + 12.0;
	let max_w = b.right() - text_x - 10.0;
	ctx.set_fill_style_str(&theme.stage.text.to_css());
	ctx.set_font(&format!("600 {}px {}", size, theme.font_family));
	let _ = ctx.fill_text_with_max_width(title, text_x, cy - size * 0.6, max_w);

	ctx.set_fill_style_str(&theme.stage.text_muted.to_css());
	ctx.set_font(&format!("{}px {}", config.text.detail_size, theme.font_family));
	let _ = ctx.fill_text_with_max_width(&format!("⏱ {}", time), text_x, cy + size * 0.7, max_w);
}

fn draw_section(
	ctx: &CanvasRenderingContext2d,
	b: &NodeBox,
	config: &ScaleConfig,
	scale: &ScaledValues,
	theme: &Theme,
	name: &str,
) {
	fill_box(ctx, b, &theme.section);
	if !scale.show_text {
		return;
	}

	let (cx, cy) = b.center();
	ctx.set_text_baseline("middle");
	ctx.set_text_align("center");
	ctx.set_fill_style_str(&theme.section.text.to_css());
	ctx.set_font(&format!("600 {}px {}", config.text.detail_size, theme.font_family));
	let _ = ctx.fill_text_with_max_width(name, cx, cy, b.w - 16.0);
}

fn draw_details(
	ctx: &CanvasRenderingContext2d,
	b: &NodeBox,
	config: &ScaleConfig,
	scale: &ScaledValues,
	theme: &Theme,
	groups: &[TopicGroup],
) {
	fill_box(ctx, b, &theme.details);
	if !scale.show_text {
		return;
	}

	let metrics = &config.node;
	let pad = metrics.details_padding;
	let max_w = b.w - pad * 2.0;
	let size = config.text.detail_size;

	ctx.set_text_baseline("middle");
	ctx.set_text_align("left");

	if groups.is_empty() {
		ctx.set_fill_style_str(&theme.details.text_muted.with_alpha(0.6).to_css());
		ctx.set_font(&format!("italic {}px {}", size, theme.font_family));
		let _ = ctx.fill_text_with_max_width(
			"No sections",
			b.x + pad,
			b.y + pad + metrics.line_height / 2.0,
			max_w,
		);
		return;
	}

	let mut y = b.y + pad + metrics.line_height / 2.0;
	for group in groups {
		ctx.set_fill_style_str(&theme.details.text.to_css());
		ctx.set_font(&format!("bold {}px {}", size, theme.font_family));
		let _ = ctx.fill_text_with_max_width(&group.name, b.x + pad, y, max_w);
		y += metrics.line_height;

		ctx.set_fill_style_str(&theme.details.text_muted.to_css());
		ctx.set_font(&format!("{}px {}", size, theme.font_family));
		for topic in &group.topics {
			let _ = ctx.fill_text_with_max_width(&format!("• {}", topic), b.x + pad + 8.0, y, max_w - 8.0);
			y += metrics.line_height;
		}
		y += metrics.group_gap;
	}
}

fn rounded_rect(ctx: &CanvasRenderingContext2d, x: f64, y: f64, w: f64, h: f64, r: f64) {
	let r = r.min(w / 2.0).min(h / 2.0).max(0.0);
	ctx.begin_path();
	ctx.move_to(x + r, y);
	let _ = ctx.arc_to(x + w, y, x + w, y + h, r);
	let _ = ctx.arc_to(x + w, y + h, x, y + h, r);
	let _ = ctx.arc_to(x, y + h, x, y, r);
	let _ = ctx.arc_to(x, y, x + w, y, r);
	ctx.close_path();
}
