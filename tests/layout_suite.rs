// Test target reuses lib deps, silence noisy lint.
#![allow(unused_crate_dependencies)]

use std::collections::HashSet;

use stage_flow::{Expansion, FlowGraph, HostParams, NodeContent, compute_layout, load_stages};

const HIRING_JSON: &str = r#"[
	{"id": "oa", "title": "Online Assessment", "time": "90 min", "sections": [
		{"name": "Aptitude", "topics": ["Percentages", "Time & Work"]},
		{"name": "Coding", "topics": ["Arrays", "Strings", "DP"]}
	]},
	{"id": "tech", "title": "Technical Interview", "time": "45 min", "sections": [
		{"name": "DSA", "topics": ["Trees"]},
		{"name": "CS Fundamentals", "topics": ["OS", "DBMS", "Networks"]},
		{"name": "Projects"}
	]},
	{"id": "hr", "title": "HR Round", "time": "20 min"}
]"#;

fn assert_invariants(graph: &FlowGraph) {
	let ids: HashSet<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
	assert_eq!(ids.len(), graph.nodes.len(), "duplicate node id");
	for edge in &graph.edges {
		assert!(ids.contains(edge.source.as_str()), "{}: unknown source", edge.id);
		assert!(ids.contains(edge.target.as_str()), "{}: unknown target", edge.id);
	}

	let stage_xs: Vec<f64> = graph
		.nodes
		.iter()
		.filter(|n| matches!(n.content, NodeContent::Stage { .. }))
		.map(|n| n.position.x)
		.collect();
	assert!(
		stage_xs.windows(2).all(|w| w[0] < w[1]),
		"stage x must increase: {:?}",
		stage_xs
	);
}

#[test]
fn every_expansion_state_is_well_formed() {
	let stages = load_stages(Some(HIRING_JSON));
	assert_eq!(stages.len(), 3);

	let collapsed = compute_layout(&stages, None);
	assert_invariants(&collapsed);
	assert_eq!(collapsed.nodes.len(), 3);
	assert_eq!(collapsed.edges.len(), 2);

	for stage in &stages {
		let n = stage.sections.len();
		let graph = compute_layout(&stages, Some(stage.id.as_str()));
		assert_invariants(&graph);
		assert_eq!(graph.nodes.len(), stages.len() + n + 1, "stage {}", stage.id);
		assert_eq!(graph.edges.len(), stages.len() - 1 + 2 * n, "stage {}", stage.id);
	}
}

#[test]
fn clicking_through_stages_keeps_one_open() {
	let stages = load_stages(Some(HIRING_JSON));
	let mut expanded = Expansion::none();

	expanded.toggle("oa");
	expanded.toggle("tech");
	let graph = compute_layout(&stages, expanded.stage_id());
	assert!(graph.node("stage-1-details").is_some());
	assert!(graph.node("stage-0-details").is_none());

	expanded.toggle("tech");
	assert_eq!(
		compute_layout(&stages, expanded.stage_id()),
		compute_layout(&stages, None)
	);
}

#[test]
fn detail_panel_mirrors_payload() {
	let stages = load_stages(Some(HIRING_JSON));
	let graph = compute_layout(&stages, Some("tech"));
	let Some(NodeContent::Details { groups }) =
		graph.node("stage-1-details").map(|n| &n.content)
	else {
		panic!("detail panel missing");
	};
	let summary: Vec<(&str, usize)> = groups
		.iter()
		.map(|g| (g.name.as_str(), g.topics.len()))
		.collect();
	assert_eq!(
		summary,
		[("DSA", 1), ("CS Fundamentals", 3), ("Projects", 0)]
	);
}

#[test]
fn bad_host_payload_renders_empty_flow() {
	let context = HostParams {
		data: Some("[{\"title\": ".into()),
		company: None,
		domain: Some("Backend".into()),
	}
	.into_context();
	assert!(context.stages.is_empty());
	assert_eq!(context.branding.heading(), "Company — Backend Hiring Process");

	let graph = compute_layout(&context.stages, Some("oa"));
	assert!(graph.nodes.is_empty());
	assert!(graph.edges.is_empty());
}

#[test]
fn stage_id_shaped_like_section_node_keeps_ids_unique() {
	let stages = load_stages(Some(
		r#"[
			{"id": "a", "title": "First", "time": "10 min", "sections": [{"name": "X", "topics": ["t"]}]},
			{"id": "a-sec-0", "title": "Second", "time": "10 min"}
		]"#,
	));
	assert_eq!(stages.len(), 2);

	let graph = compute_layout(&stages, Some("a"));
	assert_invariants(&graph);
	let ids: Vec<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
	assert_eq!(ids, ["stage-0", "stage-1", "stage-0-sec-0", "stage-0-details"]);

	let Some(NodeContent::Section { name }) = graph.node("stage-0-sec-0").map(|n| &n.content)
	else {
		panic!("section node missing");
	};
	assert_eq!(name, "X");
	assert_eq!(
		graph.node("stage-1").map(|n| n.content.activation_target()),
		Some(Some("a-sec-0"))
	);
}
