//! Colors for the storm scene.

use super::particles::Category;

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

	/// Scale the existing alpha, e.g. by a fade-in opacity.
	pub fn fade(self, factor: f64) -> Self {
		Self {
			a: self.a * factor.clamp(0.0, 1.0),
			..self
		}
	}

	/// Linear interpolation between two colors
	pub fn lerp(self, other: Color, t: f64) -> Self {
		let t = t.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 * (1.0 - t) + other.r as f64 * t) as u8,
			g: (self.g as f64 * (1.0 - t) + other.g as f64 * t) as u8,
			b: (self.b as f64 * (1.0 - t) + other.b as f64 * t) as u8,
			a: self.a * (1.0 - t) + other.a * t,
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

/// Fill colors for each particle category.
#[derive(Clone, Debug)]
pub struct ParticlePalette {
	pub dust: Color,
	pub water: Color,
	pub ice_bottom: Color,
	pub ice_top: Color,
	pub positive: Color,
	pub negative: Color,
	/// Thin outline so small particles read against the cloud.
	pub outline: Color,
	pub glyph: Color,
}

impl ParticlePalette {
	pub fn color(&self, category: Category) -> Color {
		match category {
			Category::Dust => self.dust,
			Category::Water => self.water,
			Category::IceBottom => self.ice_bottom,
			Category::IceTop => self.ice_top,
			Category::Positive => self.positive,
			Category::Negative => self.negative,
		}
	}
}

/// Sky, ground, sun and cloud colors.
#[derive(Clone, Debug)]
pub struct SceneStyle {
	/// Per-frame wash; translucent so moving particles leave short trails.
	pub wash: Color,
	pub ground_top: Color,
	pub ground_bottom: Color,
	pub sun_core: Color,
	pub sun_edge: Color,
	pub sun_glow: Color,
	pub sun_ray: Color,
	pub cloud_core: Color,
	pub cloud_mid: Color,
	pub cloud_edge: Color,
	pub cloud_outline: Color,
}

/// Lightning, tree and annotation colors.
#[derive(Clone, Debug)]
pub struct StrikeStyle {
	pub bolt: Color,
	pub bolt_glow: Color,
	pub flash: Color,
	pub trunk: Color,
	pub crown: Color,
	pub tree_glow: Color,
	pub plate: Color,
	pub label: Color,
	pub label_font: &'static str,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	pub scene: SceneStyle,
	pub particles: ParticlePalette,
	pub strike: StrikeStyle,
}

impl Default for Theme {
	fn default() -> Self {
		Self {
			scene: SceneStyle {
				wash: Color::rgba(10, 17, 40, 0.3),
				ground_top: Color::rgb(45, 90, 39),
				ground_bottom: Color::rgb(30, 58, 26),
				sun_core: Color::rgb(255, 245, 157),
				sun_edge: Color::rgb(255, 193, 7),
				sun_glow: Color::rgba(255, 213, 79, 0.35),
				sun_ray: Color::rgba(255, 224, 130, 0.8),
				cloud_core: Color::rgba(255, 255, 255, 0.6),
				cloud_mid: Color::rgba(220, 220, 220, 0.4),
				cloud_edge: Color::rgba(180, 180, 180, 0.2),
				cloud_outline: Color::rgba(255, 255, 255, 0.3),
			},
			particles: ParticlePalette {
				dust: Color::rgb(136, 136, 136),
				water: Color::rgb(79, 195, 247),
				ice_bottom: Color::rgb(230, 247, 255),
				ice_top: Color::rgb(255, 255, 255),
				positive: Color::rgb(255, 107, 107),
				negative: Color::rgb(78, 205, 196),
				outline: Color::rgba(0, 0, 0, 0.3),
				glyph: Color::rgb(255, 255, 255),
			},
			strike: StrikeStyle {
				bolt: Color::rgb(255, 255, 255),
				bolt_glow: Color::rgba(180, 200, 255, 0.6),
				flash: Color::rgb(255, 255, 255),
				trunk: Color::rgb(62, 39, 35),
				crown: Color::rgb(27, 94, 32),
				tree_glow: Color::rgb(255, 241, 118),
				plate: Color::rgba(255, 255, 255, 0.5),
				label: Color::rgba(255, 255, 255, 0.9),
				label_font: "bold 14px Arial",
			},
		}
	}
}
