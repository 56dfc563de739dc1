//! Visual theming for the stage flow canvas.
//!
//! Provides the color type shared with connector styles, plus the background
//! and node box styles used by the renderer.

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Lighten the color by a factor (0.0 = unchanged, 1.0 = white)
	pub fn lighten(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 + (255.0 - self.r as f64) * f) as u8,
			g: (self.g as f64 + (255.0 - self.g as f64) * f) as u8,
			b: (self.b as f64 + (255.0 - self.b as f64) * f) as u8,
			a: self.a,
		}
	}

	/// Darken the color by a factor (0.0 = unchanged, 1.0 = black)
	pub fn darken(self, factor: f64) -> Self {
		let f = 1.0 - factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 * f) as u8,
			g: (self.g as f64 * f) as u8,
			b: (self.b as f64 * f) as u8,
			a: self.a,
		}
	}

	/// Parse a CSS color: `#rgb`, `#rrggbb`, `rgb(r, g, b)` or
	/// `rgba(r, g, b, a)`. Returns `None` for anything else.
	pub fn from_css(s: &str) -> Option<Self> {
		let s = s.trim();
		if let Some(hex) = s.strip_prefix('#') {
			return Self::from_hex(hex);
		}

		let (body, has_alpha) = if let Some(rest) = s.strip_prefix("rgba(") {
			(rest.strip_suffix(')')?, true)
		} else if let Some(rest) = s.strip_prefix("rgb(") {
			(rest.strip_suffix(')')?, false)
		} else {
			return None;
		};

		let parts: Vec<&str> = body.split(',').map(str::trim).collect();
		let channel = |i: usize| parts[i].parse::<u8>().ok();
		match (parts.len(), has_alpha) {
			(3, false) => Some(Self::rgb(channel(0)?, channel(1)?, channel(2)?)),
			(4, true) => {
				let a = parts[3].parse::<f64>().ok()?;
				if !(0.0..=1.0).contains(&a) {
					return None;
				}
				Some(Self::rgba(channel(0)?, channel(1)?, channel(2)?, a))
			}
			_ => None,
		}
	}

	fn from_hex(hex: &str) -> Option<Self> {
		if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
			return None;
		}
		let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok();
		let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
		match hex.len() {
			3 => Some(Self::rgb(
				digit(0)? * 17,
				digit(1)? * 17,
				digit(2)? * 17,
			)),
			6 => Some(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
			_ => None,
		}
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Connector accent colors, one per connector tier.
pub mod accent {
	use super::Color;

	/// Stage to stage.
	pub const PRIMARY: Color = Color::rgb(0x38, 0xbd, 0xf8);
	/// Stage to section.
	pub const SECTION: Color = Color::rgb(0x4a, 0xde, 0x80);
	/// Section to detail panel.
	pub const DETAIL: Color = Color::rgb(0x60, 0xa5, 0xfa);
}

/// Background style configuration.
#[derive(Clone, Debug)]
pub struct BackgroundStyle {
	/// Primary background color
	pub color: Color,
	/// Secondary color for gradients
	pub color_secondary: Color,
	/// Whether to use radial gradient
	pub use_gradient: bool,
	/// Spacing of the dot grid in world units (0 = no grid)
	pub dot_gap: f64,
	/// Dot radius in world units
	pub dot_size: f64,
	pub dot_color: Color,
}

/// Fill, border and text colors for one kind of node box.
#[derive(Clone, Debug)]
pub struct BoxStyle {
	pub fill: Color,
	pub border: Color,
	pub border_width: f64,
	/// Corner radius in world units
	pub radius: f64,
	pub text: Color,
	/// Secondary text (stage time, topic lines)
	pub text_muted: Color,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	pub name: &'static str,
	pub background: BackgroundStyle,
	pub stage: BoxStyle,
	/// Ordinal badge on stage boxes
	pub badge: Color,
	pub section: BoxStyle,
	pub details: BoxStyle,
	/// Outline drawn around the box under the cursor.
	pub hover_ring: Color,
	pub font_family: &'static str,
}

impl Theme {
	/// Dark slate theme (default)
	pub fn default_theme() -> Self {
		Self {
			name: "default",
			background: BackgroundStyle {
				color: Color::rgb(15, 23, 42),
				color_secondary: Color::rgb(22, 32, 54),
				use_gradient: true,
				dot_gap: 24.0,
				dot_size: 1.0,
				dot_color: Color::rgba(148, 163, 184, 0.35),
			},
			stage: BoxStyle {
				fill: Color::rgb(30, 41, 59),
				border: accent::PRIMARY.with_alpha(0.6),
				border_width: 1.5,
				radius: 14.0,
				text: Color::rgb(241, 245, 249),
				text_muted: Color::rgb(148, 163, 184),
			},
			badge: accent::PRIMARY,
			section: BoxStyle {
				fill: Color::rgb(20, 83, 45),
				border: accent::SECTION,
				border_width: 1.5,
				radius: 22.0,
				text: Color::rgb(220, 252, 231),
				text_muted: Color::rgb(134, 239, 172),
			},
			details: BoxStyle {
				fill: Color::rgba(30, 41, 59, 0.95),
				border: accent::DETAIL.with_alpha(0.7),
				border_width: 1.0,
				radius: 10.0,
				text: Color::rgb(191, 219, 254),
				text_muted: Color::rgb(203, 213, 225),
			},
			hover_ring: Color::rgba(255, 255, 255, 0.8),
			font_family: "sans-serif",
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::default_theme()
	}
}
