//! stage-flow: Interactive expandable flowchart of a hiring process.
//!
//! This crate provides a WASM app that lays out a row of hiring stages and,
//! for the stage the user clicks, its sections and topic breakdown. Stage data
//! and branding labels come from the hosting page's query string.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info};
use web_sys::{UrlSearchParams, Window};

pub mod components;

pub use components::stage_flow::{
	Branding, Expansion, FlowCanvas, FlowContext, FlowGraph, GraphEdge, GraphNode, HostParams,
	NodeContent, Section, Stage, compute_layout, load_stages, parse_stages,
};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("stage-flow: logging initialized");
}

/// Read `data`, `company` and `domain` from the page's query string.
fn read_host_params() -> HostParams {
	let search = web_sys::window()
		.map(|w: Window| w.location())
		.and_then(|loc| loc.search().ok())
		.unwrap_or_default();
	let Ok(params) = UrlSearchParams::new_with_str(&search) else {
		return HostParams::default();
	};
	HostParams {
		data: params.get("data"),
		company: params.get("company"),
		domain: params.get("domain"),
	}
}

/// Main application component.
/// Loads stages from the page location and renders the expandable flow.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Hiring Process" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<HiringFlow context=read_host_params().into_context() />
	}
}

/// Header plus flow canvas for an already-loaded context.
///
/// Owns the expansion state; everything below it is derived.
#[component]
pub fn HiringFlow(context: FlowContext) -> impl IntoView {
	let FlowContext { stages, branding } = context;
	let (expanded, set_expanded) = signal(Expansion::none());

	let graph = Memo::new(move |_| compute_layout(&stages, expanded.get().stage_id()));
	let on_activate = Callback::new(move |stage_id: String| {
		set_expanded.update(|e| e.toggle(&stage_id));
		info!(
			"stage-flow: expanded = {:?}",
			expanded.get_untracked().stage_id()
		);
	});

	let heading = branding.heading();
	let company = branding.company;

	view! {
		<div class="fullscreen-graph">
			<FlowCanvas graph=graph on_activate=on_activate fullscreen=true />
			<div class="graph-overlay">
				<h2>{heading}</h2>
				<p class="subtitle">
					"This flowchart shows the hiring stages of " {company}
					". Click any stage to view sections and topic breakup."
				</p>
			</div>
		</div>
	}
}
