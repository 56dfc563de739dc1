//! Loading the stage hierarchy and branding supplied by the hosting page.
//!
//! The page passes a JSON array of stages plus two branding labels. Bad or
//! missing data never reaches the user as an error: the loader logs a warning
//! and falls back to an empty flow.

use std::collections::HashSet;

use log::{info, warn};
use serde::Deserialize;
use thiserror::Error;

use super::types::{Section, Stage};

const DEFAULT_COMPANY: &str = "Company";
const DEFAULT_DOMAIN: &str = "Role";

/// Why a stage payload could not be used.
#[derive(Debug, Error)]
pub enum NormalizeError {
	#[error("no stage data supplied")]
	Missing,
	#[error("invalid stage data: {0}")]
	Malformed(#[from] serde_json::Error),
}

/// Stage as it appears in the payload, before id resolution.
#[derive(Debug, Deserialize)]
struct RawStage {
	#[serde(default)]
	id: Option<String>,
	title: String,
	#[serde(default)]
	time: String,
	#[serde(default)]
	sections: Vec<Section>,
}

/// Parse a JSON stage array, resolving stage ids.
///
/// Stages without an id (or with a blank one) are identified by their index.
/// Ids that would repeat are replaced so every stage stays addressable.
pub fn parse_stages(raw: &str) -> Result<Vec<Stage>, NormalizeError> {
	if raw.trim().is_empty() {
		return Err(NormalizeError::Missing);
	}
	let raw_stages: Vec<RawStage> = serde_json::from_str(raw)?;
	Ok(resolve_ids(raw_stages))
}

/// Like [`parse_stages`], but degrades to an empty flow on any failure.
pub fn load_stages(raw: Option<&str>) -> Vec<Stage> {
	let result = match raw {
		Some(raw) => parse_stages(raw),
		None => Err(NormalizeError::Missing),
	};
	match result {
		Ok(stages) => {
			info!("stage-flow: loaded {} stages", stages.len());
			stages
		}
		Err(e) => {
			warn!("stage-flow: {}; showing an empty flow", e);
			Vec::new()
		}
	}
}

fn resolve_ids(raw_stages: Vec<RawStage>) -> Vec<Stage> {
	let mut taken: HashSet<String> = HashSet::new();
	raw_stages
		.into_iter()
		.enumerate()
		.map(|(i, raw)| {
			let wanted = raw
				.id
				.as_deref()
				.map(str::trim)
				.filter(|id| !id.is_empty())
				.map(str::to_string)
				.unwrap_or_else(|| i.to_string());

			let id = if taken.contains(&wanted) {
				let fallback = unique_fallback(i, &taken);
				warn!(
					"stage-flow: duplicate stage id {:?} at index {}, using {:?}",
					wanted, i, fallback
				);
				fallback
			} else {
				wanted
			};
			taken.insert(id.clone());

			Stage {
				id,
				title: raw.title,
				time: raw.time,
				sections: raw.sections,
			}
		})
		.collect()
}

fn unique_fallback(index: usize, taken: &HashSet<String>) -> String {
	let base = index.to_string();
	if !taken.contains(&base) {
		return base;
	}
	(1..)
		.map(|n| format!("{}-{}", index, n))
		.find(|candidate| !taken.contains(candidate))
		.unwrap_or(base)
}

/// Labels shown in the page header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Branding {
	pub company: String,
	pub domain: String,
}

impl Branding {
	/// Build branding from optional labels; blank or missing labels get defaults.
	pub fn new(company: Option<&str>, domain: Option<&str>) -> Self {
		fn label(value: Option<&str>, default: &str) -> String {
			value
				.map(str::trim)
				.filter(|v| !v.is_empty())
				.unwrap_or(default)
				.to_string()
		}
		Self {
			company: label(company, DEFAULT_COMPANY),
			domain: label(domain, DEFAULT_DOMAIN),
		}
	}

	/// Page heading, e.g. "Acme — Backend Hiring Process".
	pub fn heading(&self) -> String {
		format!("{} — {} Hiring Process", self.company, self.domain)
	}
}

impl Default for Branding {
	fn default() -> Self {
		Self::new(None, None)
	}
}

/// Raw values decoded from the host page's query string.
#[derive(Clone, Debug, Default)]
pub struct HostParams {
	pub data: Option<String>,
	pub company: Option<String>,
	pub domain: Option<String>,
}

/// Everything the app needs from its host, already normalized.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FlowContext {
	pub stages: Vec<Stage>,
	pub branding: Branding,
}

impl HostParams {
	pub fn into_context(self) -> FlowContext {
		FlowContext {
			stages: load_stages(self.data.as_deref()),
			branding: Branding::new(self.company.as_deref(), self.domain.as_deref()),
		}
	}
}
