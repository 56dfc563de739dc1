//! Expandable stage flow diagram.
//!
//! A horizontal row of stages; clicking a stage reveals its sections and a
//! panel listing every section's topics. Split into:
//! - [`normalize`]: loading the stage hierarchy supplied by the host page
//! - [`layout`]: pure fixed-grid layout of stages, sections and details
//! - [`FlowCanvas`]: canvas drawing surface with pan, zoom and click activation
//!
//! # Example
//!
//! ```ignore
//! use stage_flow::{Expansion, FlowCanvas, compute_layout, load_stages};
//!
//! let stages = load_stages(Some(r#"[{"title": "Screen", "time": "20 min"}]"#));
//! let (expanded, set_expanded) = signal(Expansion::none());
//! let graph = Memo::new(move |_| compute_layout(&stages, expanded.get().stage_id()));
//!
//! view! {
//!     <FlowCanvas
//!         graph=graph
//!         on_activate=Callback::new(move |id: String| set_expanded.update(|e| e.toggle(&id)))
//!     />
//! }
//! ```

mod component;
pub mod layout;
pub mod normalize;
mod render;
pub mod scale;
mod state;
pub mod theme;
mod types;

pub use component::FlowCanvas;
pub use layout::{LayoutConfig, compute_layout, compute_layout_with};
pub use normalize::{Branding, FlowContext, HostParams, NormalizeError, load_stages, parse_stages};
pub use theme::{Color, Theme};
pub use types::{
	EdgeShape, EdgeStyle, Expansion, FlowGraph, GraphEdge, GraphNode, NodeContent, Position, Section,
	Stage, TopicGroup,
};
