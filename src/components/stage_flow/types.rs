//! Data structures for the stage hierarchy and the laid-out flow graph.

use serde::Deserialize;

use super::theme::Color;

/// A named sub-category within a stage, listing its topics in order.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Section {
	/// Display name, unique within the parent stage.
	pub name: String,
	/// Ordered topic lines. Duplicates are allowed.
	#[serde(default)]
	pub topics: Vec<String>,
}

/// A top-level phase of the process, drawn in the primary row.
#[derive(Clone, Debug, PartialEq)]
pub struct Stage {
	/// Stable identifier. Resolved by the normalizer from the payload or the
	/// stage's position, and used as the prefix of every node id it owns.
	pub id: String,
	/// Stage title (e.g. "Online Assessment").
	pub title: String,
	/// Free-text duration label (e.g. "60 min").
	pub time: String,
	/// Sections revealed when the stage is expanded.
	pub sections: Vec<Section>,
}

/// Node position in world coordinates (top-left corner of the node box).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
	pub x: f64,
	pub y: f64,
}

impl Position {
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}
}

/// One section's entry in the detail panel.
#[derive(Clone, Debug, PartialEq)]
pub struct TopicGroup {
	pub name: String,
	pub topics: Vec<String>,
}

/// What a node shows. The drawing surface decides how each kind looks.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeContent {
	/// A primary-row stage box. Activating it toggles expansion of `stage_id`.
	Stage {
		stage_id: String,
		/// 1-based position in the primary row.
		ordinal: usize,
		title: String,
		time: String,
	},
	/// A section of the expanded stage.
	Section { name: String },
	/// The topic breakdown of every section of the expanded stage.
	Details { groups: Vec<TopicGroup> },
}

impl NodeContent {
	/// Stage id to toggle when this node is activated, if it is a stage node.
	pub fn activation_target(&self) -> Option<&str> {
		match self {
			NodeContent::Stage { stage_id, .. } => Some(stage_id),
			_ => None,
		}
	}
}

/// A positioned node in the flow graph.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphNode {
	/// Globally unique within one layout result.
	pub id: String,
	pub position: Position,
	pub content: NodeContent,
}

/// Connector routing shape.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EdgeShape {
	/// Orthogonal segments joined at the midpoint between both ends.
	#[default]
	SmoothStep,
}

/// Connector styling metadata.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeStyle {
	pub dashed: bool,
	/// Dash pattern (dash, gap) in world units. Ignored when not dashed.
	pub dash: (f64, f64),
	pub color: Color,
	pub width: f64,
	/// Whether the dash pattern flows from source to target over time.
	pub animated: bool,
	pub shape: EdgeShape,
}

/// A directed connector between two nodes of the same layout result.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphEdge {
	pub id: String,
	pub source: String,
	pub target: String,
	pub style: EdgeStyle,
}

/// Complete layout result: nodes and edges, in drawing order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FlowGraph {
	pub nodes: Vec<GraphNode>,
	pub edges: Vec<GraphEdge>,
}

impl FlowGraph {
	/// Find a node by id.
	pub fn node(&self, id: &str) -> Option<&GraphNode> {
		self.nodes.iter().find(|n| n.id == id)
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}
}

/// Which stage, if any, is expanded.
///
/// Owned by the host and passed into the layout on every change. At most one
/// stage can be open: activating another stage replaces the current one, and
/// activating the open stage closes it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Expansion(Option<String>);

impl Expansion {
	/// Nothing expanded.
	pub const fn none() -> Self {
		Self(None)
	}

	/// `id` expanded.
	pub fn of(id: impl Into<String>) -> Self {
		Self(Some(id.into()))
	}

	pub fn stage_id(&self) -> Option<&str> {
		self.0.as_deref()
	}

	pub fn is_expanded(&self, id: &str) -> bool {
		self.stage_id() == Some(id)
	}

	/// Apply one activation of stage `id`.
	pub fn toggle(&mut self, id: &str) {
		if self.is_expanded(id) {
			self.0 = None;
		} else {
			self.0 = Some(id.to_string());
		}
	}

	/// Owned variant of [`Expansion::toggle`].
	pub fn toggled(mut self, id: &str) -> Self {
		self.toggle(id);
		self
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn toggle_opens_then_closes() {
		let mut e = Expansion::none();
		e.toggle("s1");
		assert_eq!(e.stage_id(), Some("s1"));
		e.toggle("s1");
		assert_eq!(e, Expansion::none());
	}

	#[test]
	fn toggle_other_stage_replaces() {
		let e = Expansion::of("s1").toggled("s2");
		assert!(e.is_expanded("s2"));
		assert!(!e.is_expanded("s1"));
	}

	#[test]
	fn only_stage_nodes_activate() {
		let stage = NodeContent::Stage {
			stage_id: "s1".into(),
			ordinal: 1,
			title: "Screen".into(),
			time: "30 min".into(),
		};
		assert_eq!(stage.activation_target(), Some("s1"));
		assert_eq!(
			NodeContent::Section { name: "A".into() }.activation_target(),
			None
		);
		assert_eq!(
			NodeContent::Details { groups: vec![] }.activation_target(),
			None
		);
	}
}
