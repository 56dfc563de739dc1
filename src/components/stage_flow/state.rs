//! View state of the flow canvas: measured node boxes, connector routes,
//! pan/zoom transform, hover and click tracking.
//!
//! Holds no layout logic. Each new [`FlowGraph`] from the layout replaces the
//! previous one wholesale and the view is fitted to it again.

use std::collections::HashMap;

use super::scale::ScaleConfig;
use super::types::{FlowGraph, GraphNode};

/// Axis-aligned box a node occupies in world space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NodeBox {
	pub x: f64,
	pub y: f64,
	pub w: f64,
	pub h: f64,
}

impl NodeBox {
	pub fn right(&self) -> f64 {
		self.x + self.w
	}

	pub fn bottom(&self) -> f64 {
		self.y + self.h
	}

	pub fn center(&self) -> (f64, f64) {
		(self.x + self.w / 2.0, self.y + self.h / 2.0)
	}

	pub fn contains(&self, x: f64, y: f64) -> bool {
		x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
	}

	fn union(&self, other: &NodeBox) -> NodeBox {
		let (x, y) = (self.x.min(other.x), self.y.min(other.y));
		NodeBox {
			x,
			y,
			w: self.right().max(other.right()) - x,
			h: self.bottom().max(other.bottom()) - y,
		}
	}
}

/// Orthogonal connector path between two boxes.
///
/// Connects right side to left side when the target sits to the right on an
/// overlapping row, otherwise bottom to top. Both variants bend once at the
/// midpoint between the two ends.
pub fn route_smooth_step(source: &NodeBox, target: &NodeBox) -> Vec<(f64, f64)> {
	let same_row = target.y < source.bottom() && target.bottom() > source.y;
	if same_row && target.x >= source.right() {
		let start = (source.right(), source.center().1);
		let end = (target.x, target.center().1);
		let mid_x = (start.0 + end.0) / 2.0;
		vec![start, (mid_x, start.1), (mid_x, end.1), end]
	} else {
		let start = (source.center().0, source.bottom());
		let end = (target.center().0, target.y);
		let mid_y = (start.1 + end.1) / 2.0;
		vec![start, (start.0, mid_y), (end.0, mid_y), end]
	}
}

/// Pan and zoom transform applied to the entire graph view.
#[derive(Clone, Debug)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	/// Zoom factor (1.0 = 100%).
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

/// Tracks an in-progress press on the canvas, which becomes either a click
/// or a pan once the pointer moves far enough.
#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	/// Set once the pointer has left the click slop.
	pub moved: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// Canvas state combining the laid-out graph with interaction tracking.
pub struct FlowViewState {
	pub graph: FlowGraph,
	/// Measured box per node, same order as `graph.nodes`.
	pub boxes: Vec<NodeBox>,
	/// Route per edge, same order as `graph.edges`. Empty for edges whose
	/// endpoints are missing.
	pub routes: Vec<Vec<(f64, f64)>>,
	pub transform: ViewTransform,
	pub pan: PanState,
	pub hovered: Option<usize>,
	pub width: f64,
	pub height: f64,
	pub flow_time: f64,
}

impl FlowViewState {
	pub fn new(graph: FlowGraph, width: f64, height: f64, config: &ScaleConfig) -> Self {
		let mut state = Self {
			graph: FlowGraph::default(),
			boxes: Vec::new(),
			routes: Vec::new(),
			transform: ViewTransform::default(),
			pan: PanState::default(),
			hovered: None,
			width,
			height,
			flow_time: 0.0,
		};
		state.set_graph(graph, config);
		state
	}

	/// Replace the displayed graph, re-measure it and fit it into view.
	pub fn set_graph(&mut self, graph: FlowGraph, config: &ScaleConfig) {
		self.boxes = graph
			.nodes
			.iter()
			.map(|node| measure(node, config))
			.collect();

		let index: HashMap<&str, usize> = graph
			.nodes
			.iter()
			.enumerate()
			.map(|(i, n)| (n.id.as_str(), i))
			.collect();
		self.routes = graph
			.edges
			.iter()
			.map(|edge| {
				match (index.get(edge.source.as_str()), index.get(edge.target.as_str())) {
					(Some(&s), Some(&t)) => route_smooth_step(&self.boxes[s], &self.boxes[t]),
					_ => Vec::new(),
				}
			})
			.collect();

		self.graph = graph;
		self.hovered = None;
		self.fit_view(config);
	}

	/// World-space bounds of all nodes.
	pub fn bounds(&self) -> Option<NodeBox> {
		let mut iter = self.boxes.iter();
		let first = *iter.next()?;
		Some(iter.fold(first, |acc, b| acc.union(b)))
	}

	/// Center the graph and zoom so it fits with padding, never above 100%.
	pub fn fit_view(&mut self, config: &ScaleConfig) {
		let Some(bounds) = self.bounds() else {
			self.transform = ViewTransform::default();
			return;
		};
		let avail_w = (self.width - config.fit_padding * 2.0).max(1.0);
		let avail_h = (self.height - config.fit_padding * 2.0).max(1.0);
		let k = (avail_w / bounds.w.max(1.0))
			.min(avail_h / bounds.h.max(1.0))
			.min(1.0)
			.clamp(config.min_k, config.max_k);
		let (cx, cy) = bounds.center();
		self.transform = ViewTransform {
			x: self.width / 2.0 - cx * k,
			y: self.height / 2.0 - cy * k,
			k,
		};
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Topmost node under a screen position.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		// Later nodes are drawn on top.
		self.boxes.iter().rposition(|b| b.contains(gx, gy))
	}

	/// Stage id activated by a click at a screen position, if any.
	pub fn activation_at(&self, sx: f64, sy: f64) -> Option<&str> {
		let idx = self.node_at_position(sx, sy)?;
		self.graph.nodes[idx].content.activation_target()
	}

	/// Whether the hovered node reacts to clicks.
	pub fn hover_is_activatable(&self) -> bool {
		self.hovered
			.and_then(|i| self.graph.nodes.get(i))
			.is_some_and(|n| n.content.activation_target().is_some())
	}

	pub fn set_hover(&mut self, node: Option<usize>) {
		self.hovered = node;
	}

	pub fn begin_press(&mut self, x: f64, y: f64) {
		self.pan = PanState {
			active: true,
			moved: false,
			start_x: x,
			start_y: y,
			transform_start_x: self.transform.x,
			transform_start_y: self.transform.y,
		};
	}

	/// Pointer moved while pressed. Pans the view once outside the click slop.
	pub fn drag_to(&mut self, x: f64, y: f64, config: &ScaleConfig) {
		if !self.pan.active {
			return;
		}
		let (dx, dy) = (x - self.pan.start_x, y - self.pan.start_y);
		if !self.pan.moved && (dx * dx + dy * dy).sqrt() > config.click_slop {
			self.pan.moved = true;
		}
		if self.pan.moved {
			self.transform.x = self.pan.transform_start_x + dx;
			self.transform.y = self.pan.transform_start_y + dy;
		}
	}

	/// Pointer released. Returns the stage to toggle when the press was a
	/// click on a stage node.
	pub fn end_press(&mut self, x: f64, y: f64) -> Option<String> {
		let was_click = self.pan.active && !self.pan.moved;
		self.pan = PanState::default();
		if was_click {
			self.activation_at(x, y).map(str::to_string)
		} else {
			None
		}
	}

	pub fn cancel_press(&mut self) {
		self.pan = PanState::default();
		self.hovered = None;
	}

	/// Zoom by `factor` keeping the screen point `(x, y)` fixed.
	pub fn zoom_at(&mut self, x: f64, y: f64, factor: f64, config: &ScaleConfig) {
		let new_k = (self.transform.k * factor).clamp(config.min_k, config.max_k);
		let ratio = new_k / self.transform.k;
		self.transform.x = x - (x - self.transform.x) * ratio;
		self.transform.y = y - (y - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	pub fn tick(&mut self, dt: f64) {
		self.flow_time += dt;
	}

	pub fn resize(&mut self, width: f64, height: f64, config: &ScaleConfig) {
		self.width = width;
		self.height = height;
		self.fit_view(config);
	}
}

fn measure(node: &GraphNode, config: &ScaleConfig) -> NodeBox {
	let (w, h) = config.node.size(&node.content);
	NodeBox {
		x: node.position.x,
		y: node.position.y,
		w,
		h,
	}
}
