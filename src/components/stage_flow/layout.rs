//! Fixed-grid layout of the stage flow.
//!
//! Converts the stage hierarchy plus the current expansion into positioned
//! nodes and styled connectors. The primary row holds one node per stage;
//! the expanded stage additionally gets a centered row of section nodes and a
//! single detail panel below them.
//!
//! Node ids are positional, so any stage id the payload carries is safe:
//! - `stage-{i}` for the stage at index `i`
//! - `stage-{i}-sec-{j}` for the sections of the expanded stage
//! - `stage-{i}-details` for its detail panel
//!
//! The stage's own id lives only in [`NodeContent::Stage`], for activation.
//!
//! Edge ids are `e-{source}-{target}`.

use super::theme::{Color, accent};
use super::types::{
	EdgeShape, EdgeStyle, FlowGraph, GraphEdge, GraphNode, NodeContent, Position, Section, Stage,
	TopicGroup,
};

/// Placement constants, in world units.
#[derive(Clone, Debug)]
pub struct LayoutConfig {
	/// Horizontal distance between consecutive stages.
	pub gap_x: f64,
	/// X of the first stage.
	pub margin_x: f64,
	/// Y of the primary row.
	pub top_y: f64,
	/// Distance from the primary row down to the section row.
	pub mid_offset: f64,
	/// Distance from the section row down to the detail panel.
	pub bottom_offset: f64,
	/// Horizontal distance between sibling sections.
	pub section_spacing: f64,
	/// Detail panel x relative to the expanded stage.
	pub detail_offset_x: f64,
	pub primary_edge: EdgeStyle,
	pub section_edge: EdgeStyle,
	pub detail_edge: EdgeStyle,
}

const fn connector(color: Color, dash: (f64, f64)) -> EdgeStyle {
	EdgeStyle {
		dashed: true,
		dash,
		color,
		width: 2.0,
		animated: true,
		shape: EdgeShape::SmoothStep,
	}
}

impl Default for LayoutConfig {
	fn default() -> Self {
		Self {
			gap_x: 300.0,
			margin_x: 60.0,
			top_y: 140.0,
			mid_offset: 160.0,
			bottom_offset: 160.0,
			section_spacing: 220.0,
			detail_offset_x: -100.0,
			primary_edge: connector(accent::PRIMARY, (8.0, 4.0)),
			section_edge: connector(accent::SECTION, (8.0, 4.0)),
			detail_edge: connector(accent::DETAIL, (6.0, 4.0)),
		}
	}
}

impl LayoutConfig {
	/// X of the stage at `index` in the primary row.
	pub fn stage_x(&self, index: usize) -> f64 {
		index as f64 * self.gap_x + self.margin_x
	}

	/// Offset of section `j` of `n` from its parent stage's x. Offsets are
	/// symmetric around zero, so the row is centered under the stage.
	pub fn section_offset(&self, j: usize, n: usize) -> f64 {
		(j as f64 - (n as f64 - 1.0) / 2.0) * self.section_spacing
	}
}

pub fn stage_node_id(stage_index: usize) -> String {
	format!("stage-{}", stage_index)
}

pub fn section_node_id(stage_index: usize, section_index: usize) -> String {
	format!("stage-{}-sec-{}", stage_index, section_index)
}

pub fn details_node_id(stage_index: usize) -> String {
	format!("stage-{}-details", stage_index)
}

fn edge(source: &str, target: &str, style: EdgeStyle) -> GraphEdge {
	GraphEdge {
		id: format!("e-{}-{}", source, target),
		source: source.to_string(),
		target: target.to_string(),
		style,
	}
}

/// Lay out `stages` with the default constants.
///
/// `expanded` names the open stage; an id that matches no stage is treated
/// as nothing expanded.
pub fn compute_layout(stages: &[Stage], expanded: Option<&str>) -> FlowGraph {
	compute_layout_with(stages, expanded, &LayoutConfig::default())
}

/// Lay out `stages` with explicit constants.
pub fn compute_layout_with(
	stages: &[Stage],
	expanded: Option<&str>,
	config: &LayoutConfig,
) -> FlowGraph {
	let mut graph = FlowGraph::default();

	// Primary row
	for (i, stage) in stages.iter().enumerate() {
		let node_id = stage_node_id(i);
		graph.nodes.push(GraphNode {
			id: node_id.clone(),
			position: Position::new(config.stage_x(i), config.top_y),
			content: NodeContent::Stage {
				stage_id: stage.id.clone(),
				ordinal: i + 1,
				title: stage.title.clone(),
				time: stage.time.clone(),
			},
		});

		if i + 1 < stages.len() {
			graph
				.edges
				.push(edge(&node_id, &stage_node_id(i + 1), config.primary_edge));
		}
	}

	let Some((index, stage)) = expanded.and_then(|id| {
		stages
			.iter()
			.enumerate()
			.find(|(_, stage)| stage.id == id)
	}) else {
		return graph;
	};

	add_sub_graph(&mut graph, index, stage, config);
	graph
}

/// Section row and detail panel for the expanded stage.
fn add_sub_graph(graph: &mut FlowGraph, index: usize, stage: &Stage, config: &LayoutConfig) {
	let stage_node = stage_node_id(index);
	let details_node = details_node_id(index);
	let base_x = config.stage_x(index);
	let mid_y = config.top_y + config.mid_offset;
	let bottom_y = mid_y + config.bottom_offset;
	let n = stage.sections.len();

	let section_ids: Vec<String> = (0..n).map(|j| section_node_id(index, j)).collect();

	for (j, (section, section_id)) in stage.sections.iter().zip(&section_ids).enumerate() {
		graph.nodes.push(GraphNode {
			id: section_id.clone(),
			position: Position::new(base_x + config.section_offset(j, n), mid_y),
			content: NodeContent::Section {
				name: section.name.clone(),
			},
		});
		graph
			.edges
			.push(edge(&stage_node, section_id, config.section_edge));
	}

	graph.nodes.push(GraphNode {
		id: details_node.clone(),
		position: Position::new(base_x + config.detail_offset_x, bottom_y),
		content: NodeContent::Details {
			groups: stage.sections.iter().map(topic_group).collect(),
		},
	});

	for section_id in &section_ids {
		graph
			.edges
			.push(edge(section_id, &details_node, config.detail_edge));
	}
}

fn topic_group(section: &Section) -> TopicGroup {
	TopicGroup {
		name: section.name.clone(),
		topics: section.topics.clone(),
	}
}

#[cfg(test)]
mod tests {
	use std::collections::HashSet;

	use super::*;
	use crate::components::stage_flow::types::Expansion;

	fn section(name: &str, topics: &[&str]) -> Section {
		Section {
			name: name.into(),
			topics: topics.iter().map(|t| t.to_string()).collect(),
		}
	}

	fn stage(id: &str, sections: Vec<Section>) -> Stage {
		Stage {
			id: id.into(),
			title: format!("Stage {}", id),
			time: "30 min".into(),
			sections,
		}
	}

	fn sample() -> Vec<Stage> {
		vec![
			stage("s1", vec![]),
			stage("s2", vec![section("A", &["t1"])]),
			stage(
				"s3",
				vec![
					section("Aptitude", &["Ratios", "Series"]),
					section("Coding", &["Arrays"]),
					section("Verbal", &[]),
				],
			),
		]
	}

	fn assert_well_formed(graph: &FlowGraph) {
		let ids: HashSet<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
		assert_eq!(ids.len(), graph.nodes.len(), "node ids must be unique");
		let edge_ids: HashSet<&str> = graph.edges.iter().map(|e| e.id.as_str()).collect();
		assert_eq!(edge_ids.len(), graph.edges.len(), "edge ids must be unique");
		for e in &graph.edges {
			assert!(ids.contains(e.source.as_str()), "dangling source {}", e.source);
			assert!(ids.contains(e.target.as_str()), "dangling target {}", e.target);
		}
	}

	#[test]
	fn empty_input_gives_empty_graph() {
		let graph = compute_layout(&[], Some("anything"));
		assert!(graph.is_empty());
		assert!(graph.edges.is_empty());
	}

	#[test]
	fn primary_row_positions_and_content() {
		let graph = compute_layout(&sample(), None);
		assert_eq!(graph.nodes.len(), 3);
		assert_eq!(graph.edges.len(), 2);

		let xs: Vec<f64> = graph.nodes.iter().map(|n| n.position.x).collect();
		assert_eq!(xs, [60.0, 360.0, 660.0]);
		assert!(graph.nodes.iter().all(|n| n.position.y == 140.0));

		assert_eq!(
			graph.nodes[1].content,
			NodeContent::Stage {
				stage_id: "s2".into(),
				ordinal: 2,
				title: "Stage s2".into(),
				time: "30 min".into(),
			}
		);
		assert_eq!(graph.edges[0].id, "e-stage-0-stage-1");
		assert_eq!(graph.edges[1].source, "stage-1");
		assert_eq!(graph.edges[1].target, "stage-2");
		assert_well_formed(&graph);
	}

	#[test]
	fn connector_count_is_stage_count_minus_one() {
		let stages = sample();
		for n in 0..=stages.len() {
			let graph = compute_layout(&stages[..n], None);
			assert_eq!(graph.edges.len(), n.saturating_sub(1));
			assert_eq!(graph.nodes.len(), n);
		}
	}

	#[test]
	fn primary_connectors_are_animated_dashed_accent() {
		let graph = compute_layout(&sample(), None);
		for e in &graph.edges {
			assert!(e.style.animated);
			assert!(e.style.dashed);
			assert_eq!(e.style.color, accent::PRIMARY);
			assert_eq!(e.style.dash, (8.0, 4.0));
			assert_eq!(e.style.width, 2.0);
		}
	}

	#[test]
	fn two_stages_with_second_expanded() {
		let stages = vec![stage("s1", vec![]), stage("s2", vec![section("A", &["t1"])])];
		let graph = compute_layout(&stages, Some("s2"));
		assert_eq!(graph.nodes.len(), 4);
		assert_eq!(graph.edges.len(), 3);
		assert_well_formed(&graph);

		let details = graph.node("stage-1-details").unwrap();
		assert_eq!(
			details.content,
			NodeContent::Details {
				groups: vec![TopicGroup {
					name: "A".into(),
					topics: vec!["t1".into()],
				}],
			}
		);
		assert_eq!(details.position, Position::new(360.0 - 100.0, 460.0));

		let sec = graph.node("stage-1-sec-0").unwrap();
		assert_eq!(sec.position, Position::new(360.0, 300.0));
	}

	#[test]
	fn expanded_counts_and_edge_tiers() {
		let stages = sample();
		let graph = compute_layout(&stages, Some("s3"));
		assert_eq!(graph.nodes.len(), 3 + 3 + 1);
		assert_eq!(graph.edges.len(), 2 + 3 + 3);
		assert_well_formed(&graph);

		let section_edges: Vec<_> = graph
			.edges
			.iter()
			.filter(|e| e.source == "stage-2")
			.collect();
		assert_eq!(section_edges.len(), 3);
		assert!(section_edges.iter().all(|e| e.style.color == accent::SECTION));

		let detail_edges: Vec<_> = graph
			.edges
			.iter()
			.filter(|e| e.target == "stage-2-details")
			.collect();
		assert_eq!(detail_edges.len(), 3);
		assert!(detail_edges.iter().all(|e| e.style.color == accent::DETAIL));
		assert!(detail_edges.iter().all(|e| e.style.dash == (6.0, 4.0)));
	}

	#[test]
	fn section_row_is_centered_under_stage() {
		let config = LayoutConfig::default();
		for n in 0..8 {
			let sum: f64 = (0..n).map(|j| config.section_offset(j, n)).sum();
			assert!(sum.abs() < 1e-9, "offsets for n={} sum to {}", n, sum);
		}

		let graph = compute_layout(&sample(), Some("s3"));
		let xs: Vec<f64> = (0..3)
			.map(|j| graph.node(&section_node_id(2, j)).unwrap().position.x)
			.collect();
		assert_eq!(xs, [660.0 - 220.0, 660.0, 660.0 + 220.0]);
	}

	#[test]
	fn detail_panel_lists_sections_in_order() {
		let graph = compute_layout(&sample(), Some("s3"));
		let NodeContent::Details { groups } = &graph.nodes.last().unwrap().content else {
			panic!("last node should be the detail panel");
		};
		let names: Vec<_> = groups.iter().map(|g| g.name.as_str()).collect();
		assert_eq!(names, ["Aptitude", "Coding", "Verbal"]);
		assert_eq!(groups[0].topics, vec!["Ratios", "Series"]);
		assert!(groups[2].topics.is_empty());
	}

	#[test]
	fn output_order_is_primary_then_sections_then_details() {
		let graph = compute_layout(&sample(), Some("s3"));
		let ids: Vec<_> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
		assert_eq!(
			ids,
			[
				"stage-0",
				"stage-1",
				"stage-2",
				"stage-2-sec-0",
				"stage-2-sec-1",
				"stage-2-sec-2",
				"stage-2-details",
			]
		);
	}

	#[test]
	fn expanded_stage_without_sections_keeps_empty_panel() {
		let graph = compute_layout(&sample(), Some("s1"));
		assert_eq!(graph.nodes.len(), 4);
		assert_eq!(graph.edges.len(), 2);
		assert_eq!(
			graph.node("stage-0-details").unwrap().content,
			NodeContent::Details { groups: vec![] }
		);
	}

	#[test]
	fn duplicate_topics_are_tolerated() {
		let stages = vec![stage("s1", vec![section("A", &["same", "same"])])];
		let graph = compute_layout(&stages, Some("s1"));
		let NodeContent::Details { groups } = &graph.node("stage-0-details").unwrap().content else {
			panic!("missing detail panel");
		};
		assert_eq!(groups[0].topics.len(), 2);
	}

	#[test]
	fn dangling_expansion_matches_none() {
		let stages = sample();
		assert_eq!(
			compute_layout(&stages, Some("gone")),
			compute_layout(&stages, None)
		);
	}

	#[test]
	fn layout_is_deterministic() {
		let stages = sample();
		for expanded in [None, Some("s1"), Some("s2"), Some("s3")] {
			assert_eq!(
				compute_layout(&stages, expanded),
				compute_layout(&stages, expanded)
			);
		}
	}

	#[test]
	fn toggling_open_stage_returns_to_collapsed_layout() {
		let stages = sample();
		let open = Expansion::none().toggled("s2");
		assert_eq!(compute_layout(&stages, open.stage_id()).nodes.len(), 5);

		let closed = open.toggled("s2");
		assert_eq!(
			compute_layout(&stages, closed.stage_id()),
			compute_layout(&stages, None)
		);
	}

	#[test]
	fn custom_constants_are_honoured() {
		let config = LayoutConfig {
			gap_x: 100.0,
			margin_x: 0.0,
			top_y: 10.0,
			..LayoutConfig::default()
		};
		let graph = compute_layout_with(&sample(), Some("s2"), &config);
		assert_eq!(graph.nodes[2].position, Position::new(200.0, 10.0));
		assert_eq!(
			graph.node("stage-1-sec-0").unwrap().position,
			Position::new(100.0, 170.0)
		);
	}

	#[test]
	fn stage_ids_that_look_like_node_ids_do_not_collide() {
		let stages = vec![
			stage("a", vec![section("X", &["t"])]),
			stage("a-sec-0", vec![]),
			stage("a-details", vec![]),
		];
		let graph = compute_layout(&stages, Some("a"));
		assert_well_formed(&graph);
		assert_eq!(graph.nodes.len(), 3 + 1 + 1);

		let to_section: Vec<_> = graph.edges.iter().filter(|e| e.source == "stage-0").collect();
		assert_eq!(to_section.len(), 2);
		let section = graph.node(&section_node_id(0, 0)).unwrap();
		assert_eq!(section.content, NodeContent::Section { name: "X".into() });

		let NodeContent::Stage { stage_id, .. } = &graph.node("stage-1").unwrap().content else {
			panic!("stage-1 should be a stage box");
		};
		assert_eq!(stage_id, "a-sec-0");
	}
}
