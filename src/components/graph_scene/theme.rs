//! Scene themes and colour helpers.

/// Palette for clustered nodes without an explicit fill.
pub const CLUSTER_COLORS: &[&str] = &[
	"#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
	"#bcbd22", "#17becf",
];

/// An sRGB colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
	/// Red.
	pub r: u8,
	/// Green.
	pub g: u8,
	/// Blue.
	pub b: u8,
}

impl Color {
	/// Parses `#rgb` or `#rrggbb`.
	pub fn parse(hex: &str) -> Option<Self> {
		let hex = hex.trim().strip_prefix('#')?;
		let channel = |s: &str| u8::from_str_radix(s, 16).ok();
		match hex.len() {
			3 => {
				let mut it = hex.chars().map(|c| channel(&format!("{c}{c}")));
				Some(Self {
					r: it.next()??,
					g: it.next()??,
					b: it.next()??,
				})
			}
			6 => Some(Self {
				r: channel(hex.get(0..2)?)?,
				g: channel(hex.get(2..4)?)?,
				b: channel(hex.get(4..6)?)?,
			}),
			_ => None,
		}
	}

	/// Parses `hex`, falling back to `fallback` when it is not a hex colour.
	pub fn parse_or(hex: &str, fallback: &str) -> Self {
		Self::parse(hex)
			.or_else(|| Self::parse(fallback))
			.unwrap_or(Self { r: 0, g: 0, b: 0 })
	}

	/// Scales the channels by `factor` (lighting), saturating at white.
	pub fn shade(self, factor: f32) -> Self {
		let f = |c: u8| (c as f32 * factor).round().clamp(0.0, 255.0) as u8;
		Self {
			r: f(self.r),
			g: f(self.g),
			b: f(self.b),
		}
	}

	/// Mixes toward white by `amount` in `[0, 1]`.
	pub fn lighten(self, amount: f32) -> Self {
		let f = |c: u8| (c as f32 + (255.0 - c as f32) * amount).round().clamp(0.0, 255.0) as u8;
		Self {
			r: f(self.r),
			g: f(self.g),
			b: f(self.b),
		}
	}

	/// CSS `rgba(...)` string.
	pub fn rgba(self, alpha: f32) -> String {
		format!(
			"rgba({}, {}, {}, {})",
			self.r,
			self.g,
			self.b,
			alpha.clamp(0.0, 1.0)
		)
	}
}

/// Palette colour for a cluster name. Stable across runs.
pub fn cluster_color(cluster: &str) -> &'static str {
	let hash = cluster
		.bytes()
		.fold(0u32, |h, b| h.wrapping_mul(31).wrapping_add(b as u32));
	CLUSTER_COLORS[hash as usize % CLUSTER_COLORS.len()]
}

/// Background of the canvas.
#[derive(Clone, Debug, PartialEq)]
pub struct CanvasTheme {
	/// Clear colour.
	pub background: String,
}

/// Label colours.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelTheme {
	/// Text colour.
	pub color: String,
	/// Text colour when emphasised.
	pub active_color: String,
	/// Outline around text, if any.
	pub stroke: Option<String>,
}

/// Node colours and opacities.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeTheme {
	/// Default fill.
	pub fill: String,
	/// Fill when hovered, selected or active.
	pub active_fill: String,
	/// Opacity when nothing is emphasised.
	pub opacity: f32,
	/// Opacity of emphasised nodes.
	pub selected_opacity: f32,
	/// Opacity of the rest while something is emphasised.
	pub inactive_opacity: f32,
	/// Node labels.
	pub label: LabelTheme,
}

/// Ring drawn around emphasised nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct RingTheme {
	/// Ring colour.
	pub fill: String,
	/// Ring colour when active.
	pub active_fill: String,
}

/// Edge colours and opacities.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeTheme {
	/// Default fill.
	pub fill: String,
	/// Fill when hovered, selected or active.
	pub active_fill: String,
	/// Opacity when nothing is emphasised.
	pub opacity: f32,
	/// Opacity of emphasised edges.
	pub selected_opacity: f32,
	/// Opacity of the rest while something is emphasised.
	pub inactive_opacity: f32,
	/// Edge labels.
	pub label: LabelTheme,
}

/// Arrow colours.
#[derive(Clone, Debug, PartialEq)]
pub struct ArrowTheme {
	/// Default fill.
	pub fill: String,
	/// Fill when emphasised.
	pub active_fill: String,
}

/// Complete scene theme.
#[derive(Clone, Debug, PartialEq)]
pub struct Theme {
	/// Canvas.
	pub canvas: CanvasTheme,
	/// Nodes.
	pub node: NodeTheme,
	/// Node rings.
	pub ring: RingTheme,
	/// Edges.
	pub edge: EdgeTheme,
	/// Arrows.
	pub arrow: ArrowTheme,
}

impl Theme {
	/// Light background theme.
	pub fn light() -> Self {
		Self {
			canvas: CanvasTheme {
				background: "#fafafa".into(),
			},
			node: NodeTheme {
				fill: "#7ca0ab".into(),
				active_fill: "#1de9ac".into(),
				opacity: 1.0,
				selected_opacity: 1.0,
				inactive_opacity: 0.2,
				label: LabelTheme {
					color: "#2a6475".into(),
					active_color: "#1de9ac".into(),
					stroke: Some("#ffffff".into()),
				},
			},
			ring: RingTheme {
				fill: "#d8e6ea".into(),
				active_fill: "#1de9ac".into(),
			},
			edge: EdgeTheme {
				fill: "#d8e6ea".into(),
				active_fill: "#1de9ac".into(),
				opacity: 1.0,
				selected_opacity: 1.0,
				inactive_opacity: 0.1,
				label: LabelTheme {
					color: "#2a6475".into(),
					active_color: "#1de9ac".into(),
					stroke: Some("#ffffff".into()),
				},
			},
			arrow: ArrowTheme {
				fill: "#d8e6ea".into(),
				active_fill: "#1de9ac".into(),
			},
		}
	}

	/// Dark background theme.
	pub fn dark() -> Self {
		Self {
			canvas: CanvasTheme {
				background: "#1a1a2e".into(),
			},
			node: NodeTheme {
				fill: "#64b4ff".into(),
				active_fill: "#ffffff".into(),
				opacity: 1.0,
				selected_opacity: 1.0,
				inactive_opacity: 0.2,
				label: LabelTheme {
					color: "#c8dcff".into(),
					active_color: "#ffffff".into(),
					stroke: Some("#1a1a2e".into()),
				},
			},
			ring: RingTheme {
				fill: "#3d5a80".into(),
				active_fill: "#ffffff".into(),
			},
			edge: EdgeTheme {
				fill: "#4a6b8a".into(),
				active_fill: "#c8dcff".into(),
				opacity: 0.8,
				selected_opacity: 1.0,
				inactive_opacity: 0.1,
				label: LabelTheme {
					color: "#9fb6d4".into(),
					active_color: "#ffffff".into(),
					stroke: Some("#1a1a2e".into()),
				},
			},
			arrow: ArrowTheme {
				fill: "#4a6b8a".into(),
				active_fill: "#c8dcff".into(),
			},
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::dark()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_short_and_long_hex() {
		assert_eq!(Color::parse("#fff"), Some(Color { r: 255, g: 255, b: 255 }));
		assert_eq!(Color::parse("#1f77b4"), Some(Color { r: 0x1f, g: 0x77, b: 0xb4 }));
		assert_eq!(Color::parse("red"), None);
		assert_eq!(Color::parse("#12345"), None);
	}

	#[test]
	fn invalid_colour_falls_back() {
		assert_eq!(Color::parse_or("nope", "#000001"), Color { r: 0, g: 0, b: 1 });
	}

	#[test]
	fn shading_saturates() {
		let c = Color { r: 200, g: 100, b: 0 };
		assert_eq!(c.shade(2.0), Color { r: 255, g: 200, b: 0 });
		assert_eq!(c.lighten(1.0), Color { r: 255, g: 255, b: 255 });
		assert_eq!(c.rgba(0.5), "rgba(200, 100, 0, 0.5)");
	}

	#[test]
	fn cluster_colours_are_stable() {
		assert_eq!(cluster_color("core"), cluster_color("core"));
		assert!(CLUSTER_COLORS.contains(&cluster_color("anything")));
	}
}
