//! Node box metrics and zoom-dependent scaling for the flow canvas.
//!
//! Node positions from the layout are top-left corners in world space; the
//! box each node occupies depends on its content kind and is measured here.
//!
//! # Scaling Behaviors
//!
//! - [`ScaleBehavior::World`]: Scales with zoom.
//! - [`ScaleBehavior::Screen`]: Constant screen size (divides by `k`).
//! - [`ScaleBehavior::Clamped`]: World-space scaling with min/max screen-size bounds.

use super::types::NodeContent;

/// Defines how a visual property scales with zoom level.
#[derive(Clone, Debug)]
#[allow(
	dead_code,
	reason = "World/Screen variants complete the API for users customizing ScaleConfig"
)]
pub enum ScaleBehavior {
	/// Constant world-space size. Appears larger when zoomed in.
	World,
	/// Constant screen-space size (pixels). Unaffected by zoom.
	Screen,
	/// World-space scaling, clamped to `(min_screen_px, max_screen_px)`.
	Clamped { min_screen: f64, max_screen: f64 },
}

impl ScaleBehavior {
	/// World-space value for a given base value and zoom level.
	pub fn apply(&self, base: f64, k: f64) -> f64 {
		match self {
			ScaleBehavior::World => base,
			ScaleBehavior::Screen => base / k,
			ScaleBehavior::Clamped {
				min_screen,
				max_screen,
			} => base.clamp(min_screen / k, max_screen / k),
		}
	}
}

/// Alpha multiplier that fades out below a zoom threshold.
#[derive(Clone, Debug)]
pub struct Fade {
	/// Zoom at which alpha reaches 0.
	pub zero_alpha_k: f64,
	/// Zoom at which alpha reaches 1.
	pub full_alpha_k: f64,
}

impl Fade {
	pub fn apply(&self, k: f64) -> f64 {
		if self.zero_alpha_k == self.full_alpha_k {
			return 1.0;
		}
		((k - self.zero_alpha_k) / (self.full_alpha_k - self.zero_alpha_k)).clamp(0.0, 1.0)
	}
}

/// Box sizes for each node kind, in world units.
#[derive(Clone, Debug)]
pub struct NodeMetrics {
	pub stage_size: (f64, f64),
	pub section_size: (f64, f64),
	pub details_width: f64,
	/// Inner padding of the detail panel.
	pub details_padding: f64,
	/// Height of one text line in the detail panel.
	pub line_height: f64,
	/// Extra space between two section groups in the detail panel.
	pub group_gap: f64,
	/// Ordinal badge radius on stage boxes.
	pub badge_radius: f64,
}

/// Connector scaling.
#[derive(Clone, Debug)]
pub struct EdgeScaleConfig {
	/// How connector width scales with zoom.
	pub width_behavior: ScaleBehavior,
	/// Flow animation speed (world units per second).
	pub flow_speed: f64,
	/// Dashes fade to solid lines when zoomed far out.
	pub dash_fade: Fade,
	/// Corner radius of smooth-step elbows.
	pub corner_radius: f64,
}

/// Font sizes in world units.
#[derive(Clone, Debug)]
pub struct TextScaleConfig {
	pub title_size: f64,
	pub detail_size: f64,
	/// Below this zoom, text is skipped.
	pub min_k: f64,
}

/// Complete scale configuration.
#[derive(Clone, Debug)]
pub struct ScaleConfig {
	pub node: NodeMetrics,
	pub edge: EdgeScaleConfig,
	pub text: TextScaleConfig,
	/// Pixels the pointer may travel between press and release and still count as a click.
	pub click_slop: f64,
	/// Zoom limits.
	pub min_k: f64,
	pub max_k: f64,
	/// Screen-space padding kept around the graph by fit-to-view.
	pub fit_padding: f64,
}

impl Default for ScaleConfig {
	fn default() -> Self {
		Self {
			node: NodeMetrics {
				stage_size: (240.0, 72.0),
				section_size: (170.0, 44.0),
				details_width: 280.0,
				details_padding: 14.0,
				line_height: 18.0,
				group_gap: 8.0,
				badge_radius: 16.0,
			},
			edge: EdgeScaleConfig {
				width_behavior: ScaleBehavior::Clamped {
					min_screen: 1.0,
					max_screen: 4.0,
				},
				flow_speed: 24.0,
				dash_fade: Fade {
					zero_alpha_k: 0.2,
					full_alpha_k: 0.5,
				},
				corner_radius: 8.0,
			},
			text: TextScaleConfig {
				title_size: 15.0,
				detail_size: 13.0,
				min_k: 0.25,
			},
			click_slop: 4.0,
			min_k: 0.1,
			max_k: 4.0,
			fit_padding: 40.0,
		}
	}
}

impl NodeMetrics {
	/// Width and height of the box drawn for `content`.
	pub fn size(&self, content: &NodeContent) -> (f64, f64) {
		match content {
			NodeContent::Stage { .. } => self.stage_size,
			NodeContent::Section { .. } => self.section_size,
			NodeContent::Details { groups } => {
				let lines: usize = groups.iter().map(|g| 1 + g.topics.len()).sum();
				let gaps = groups.len().saturating_sub(1) as f64 * self.group_gap;
				// An empty panel keeps room for one line.
				let text_height = lines.max(1) as f64 * self.line_height + gaps;
				(self.details_width, text_height + self.details_padding * 2.0)
			}
		}
	}
}

/// Pre-computed scale values for a specific zoom level.
#[derive(Clone, Debug)]
pub struct ScaledValues {
	pub k: f64,
	/// Connector width multiplier in world-space (applied to the edge style width).
	pub edge_width_scale: f64,
	/// Dash visibility [0, 1]. At 0, connectors are solid.
	pub dash_alpha: f64,
	pub show_text: bool,
}

impl ScaledValues {
	pub fn new(config: &ScaleConfig, k: f64) -> Self {
		Self {
			k,
			edge_width_scale: config.edge.width_behavior.apply(1.0, k),
			dash_alpha: config.edge.dash_fade.apply(k),
			show_text: k >= config.text.min_k,
		}
	}

	/// Dash offset for the flow animation. Negative so dashes travel from
	/// source to target.
	pub fn dash_offset(&self, flow_time: f64, flow_speed: f64) -> f64 {
		-flow_time * flow_speed
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::stage_flow::types::TopicGroup;

	#[test]
	fn clamped_behavior_bounds_screen_size() {
		let b = ScaleBehavior::Clamped {
			min_screen: 1.0,
			max_screen: 4.0,
		};
		assert_eq!(b.apply(1.0, 1.0), 1.0);
		// Zoomed far out: at least one screen pixel.
		assert_eq!(b.apply(1.0, 0.1), 10.0);
		// Zoomed far in: at most four screen pixels.
		assert_eq!(b.apply(1.0, 8.0), 0.5);
	}

	#[test]
	fn fade_ramps_between_thresholds() {
		let f = Fade {
			zero_alpha_k: 0.2,
			full_alpha_k: 0.6,
		};
		assert_eq!(f.apply(0.1), 0.0);
		assert!((f.apply(0.4) - 0.5).abs() < 1e-9);
		assert_eq!(f.apply(2.0), 1.0);
	}

	#[test]
	fn details_height_grows_with_topics() {
		let m = ScaleConfig::default().node;
		let empty = m.size(&NodeContent::Details { groups: vec![] });
		assert_eq!(empty, (280.0, 18.0 + 28.0));

		let two_groups = NodeContent::Details {
			groups: vec![
				TopicGroup {
					name: "A".into(),
					topics: vec!["t1".into(), "t2".into()],
				},
				TopicGroup {
					name: "B".into(),
					topics: vec![],
				},
			],
		};
		// 4 lines, 1 gap, padding on both sides.
		assert_eq!(m.size(&two_groups), (280.0, 4.0 * 18.0 + 8.0 + 28.0));
	}

	#[test]
	fn text_hidden_when_zoomed_out() {
		let config = ScaleConfig::default();
		assert!(ScaledValues::new(&config, 1.0).show_text);
		assert!(!ScaledValues::new(&config, 0.1).show_text);
	}
}
