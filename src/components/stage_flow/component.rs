//! Leptos component drawing a laid-out stage flow on a canvas.
//!
//! The component creates an HTML canvas element and wires up mouse/wheel event
//! handlers for panning, zooming and stage activation. An animation loop runs
//! via `requestAnimationFrame`, advancing the connector flow and redrawing
//! each frame. The graph itself is computed by the caller; every new value of
//! the `graph` signal replaces the displayed one.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, error};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::render;
use super::scale::ScaleConfig;
use super::state::FlowViewState;
use super::theme::Theme;
use super::types::FlowGraph;

/// Bundles view state with visual configuration.
struct CanvasContext {
	state: FlowViewState,
	scale: ScaleConfig,
	theme: Theme,
}

fn window_size(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

fn canvas_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Renders a stage flow graph on a canvas element.
///
/// Clicking a stage node calls `on_activate` with that stage's id. The
/// component sizes itself to its parent container by default; set
/// `fullscreen = true` to fill the viewport and resize with the window.
#[component]
pub fn FlowCanvas(
	#[prop(into)] graph: Signal<FlowGraph>,
	on_activate: Callback<String>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: Rc<RefCell<Option<CanvasContext>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (context_init, animate_init, resize_cb_init) =
		(context.clone(), animate.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if context_init.borrow().is_some() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			error!("stage-flow: no window, canvas disabled");
			return;
		};

		let (w, h) = if fullscreen {
			window_size(&window).unwrap_or((800.0, 600.0))
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			error!("stage-flow: 2d canvas context unavailable");
			return;
		};

		let scale = ScaleConfig::default();
		let theme = Theme::default();
		debug!("stage-flow: canvas {}x{} with theme {}", w, h, theme.name);
		*context_init.borrow_mut() = Some(CanvasContext {
			state: FlowViewState::new(graph.get_untracked(), w, h, &scale),
			scale,
			theme,
		});

		if fullscreen {
			let (context_resize, canvas_resize) = (context_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some((nw, nh)) = web_sys::window().as_ref().and_then(window_size) else {
					return;
				};
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut c) = *context_resize.borrow_mut() {
					c.state.resize(nw, nh, &c.scale);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (context_anim, animate_inner) = (context_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut c) = *context_anim.borrow_mut() {
				c.state.tick(0.016);
				render::render(&c.state, &ctx, &c.scale, &c.theme);
			}
			if let (Some(cb), Some(win)) = (&*animate_inner.borrow(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	// Swap in every new layout once the canvas is live.
	let context_graph = context.clone();
	Effect::new(move |_| {
		let next = graph.get();
		if let Some(ref mut c) = *context_graph.borrow_mut() {
			debug!(
				"stage-flow: relayout with {} nodes, {} edges",
				next.nodes.len(),
				next.edges.len()
			);
			c.state.set_graph(next, &c.scale);
		}
	});

	let context_md = context.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_md.borrow_mut() {
			c.state.begin_press(x, y);
		}
	};

	let context_mm = context.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_mm.borrow_mut() {
			if c.state.pan.active {
				c.state.drag_to(x, y, &c.scale);
			} else {
				let hovered = c.state.node_at_position(x, y);
				c.state.set_hover(hovered);
			}
			let cursor = if c.state.pan.moved {
				"grabbing"
			} else if c.state.hover_is_activatable() {
				"pointer"
			} else {
				"grab"
			};
			if let Some(canvas) = canvas_ref.get() {
				let canvas: HtmlCanvasElement = canvas.into();
				let _ = web_sys::HtmlElement::style(&canvas).set_property("cursor", cursor);
			}
		}
	};

	let context_mu = context.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		// Release the borrow before notifying: the callback triggers a relayout.
		let activated = context_mu
			.borrow_mut()
			.as_mut()
			.and_then(|c| c.state.end_press(x, y));
		if let Some(stage_id) = activated {
			on_activate.run(stage_id);
		}
	};

	let context_ml = context.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_ml.borrow_mut() {
			c.state.cancel_press();
		}
	};

	let context_wh = context.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_wh.borrow_mut() {
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			c.state.zoom_at(x, y, factor, &c.scale);
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="stage-flow-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
