//! Simulation parameters and their validation.
//!
//! An [`ArtConfig`] is only ever constructed from validated input: the JSON
//! boundary goes through [`ArtConfig::from_json`], and anything handed to the
//! running simulation passes through a [`ConfigSlot`], which keeps the
//! last-known-good configuration when a candidate is rejected.

use log::warn;
use serde::Deserialize;

use super::color::Color;
use crate::error::ConfigError;

/// Upper bound on particle count; the connection pass is quadratic.
pub const MAX_PARTICLES: u32 = 5_000;

/// The primitive drawn for each particle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeType {
	#[default]
	Circle,
	Square,
	/// A streak along the particle's velocity.
	Line,
}

impl ShapeType {
	pub fn label(self) -> &'static str {
		match self {
			ShapeType::Circle => "circle",
			ShapeType::Square => "square",
			ShapeType::Line => "line",
		}
	}
}

/// Inclusive range particle radii are drawn from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SizeRange {
	pub min: f64,
	pub max: f64,
}

/// Complete parameter bundle for one simulation epoch.
#[derive(Clone, Debug, PartialEq)]
pub struct ArtConfig {
	pub particle_count: u32,
	pub particle_size: SizeRange,
	/// Scales the initial random velocity.
	pub speed: f64,
	/// Pairs closer than this are joined by a line. Zero disables connections.
	pub connection_radius: f64,
	pub colors: Vec<Color>,
	pub background: Color,
	/// Added to `vy` every tick.
	pub gravity: f64,
	/// Multiplicative velocity damping per tick, in (0, 1].
	pub friction: f64,
	/// Per-tick pull toward the viewport center. Zero disables it.
	pub vortex_strength: f64,
	pub shape_type: ShapeType,
}

impl Default for ArtConfig {
	fn default() -> Self {
		Self {
			particle_count: 150,
			particle_size: SizeRange { min: 1.0, max: 3.0 },
			speed: 1.5,
			connection_radius: 100.0,
			colors: vec![
				Color::rgb(0x4f, 0x46, 0xe5), // Indigo
				Color::rgb(0x06, 0xb6, 0xd4), // Cyan
				Color::rgb(0xec, 0x48, 0x99), // Pink
				Color::rgb(0xff, 0xff, 0xff), // White
			],
			background: Color::rgb(5, 5, 5),
			gravity: 0.0,
			friction: 0.99,
			vortex_strength: 0.0,
			shape_type: ShapeType::Circle,
		}
	}
}

/// Configuration as it appears on the wire, before colors are parsed and
/// ranges checked. Every field is required.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireConfig {
	particle_count: i64,
	particle_size: [f64; 2],
	speed: f64,
	connection_radius: f64,
	colors: Vec<String>,
	background: String,
	gravity: f64,
	friction: f64,
	vortex_strength: f64,
	shape_type: ShapeType,
}

impl TryFrom<WireConfig> for ArtConfig {
	type Error = ConfigError;

	fn try_from(wire: WireConfig) -> Result<Self, Self::Error> {
		if wire.particle_count <= 0 {
			return Err(ConfigError::NonPositiveParticleCount(wire.particle_count));
		}
		let particle_count = u32::try_from(wire.particle_count)
			.ok()
			.filter(|&n| n <= MAX_PARTICLES)
			.ok_or(ConfigError::TooManyParticles {
				count: wire.particle_count,
				max: MAX_PARTICLES,
			})?;

		let colors = wire
			.colors
			.iter()
			.map(|c| parse_color(c))
			.collect::<Result<Vec<_>, _>>()?;

		let config = ArtConfig {
			particle_count,
			particle_size: SizeRange {
				min: wire.particle_size[0],
				max: wire.particle_size[1],
			},
			speed: wire.speed,
			connection_radius: wire.connection_radius,
			colors,
			background: parse_color(&wire.background)?,
			gravity: wire.gravity,
			friction: wire.friction,
			vortex_strength: wire.vortex_strength,
			shape_type: wire.shape_type,
		};
		config.validate()?;
		Ok(config)
	}
}

fn parse_color(s: &str) -> Result<Color, ConfigError> {
	Color::parse(s).ok_or_else(|| ConfigError::InvalidColor(s.to_string()))
}

impl ArtConfig {
	/// Parses and validates a JSON configuration using the camelCase wire names.
	pub fn from_json(json: &str) -> Result<Self, ConfigError> {
		let wire: WireConfig = serde_json::from_str(json)?;
		ArtConfig::try_from(wire)
	}

	/// Checks every invariant the simulation relies on.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.particle_count == 0 {
			return Err(ConfigError::NonPositiveParticleCount(0));
		}
		if self.particle_count > MAX_PARTICLES {
			return Err(ConfigError::TooManyParticles {
				count: self.particle_count.into(),
				max: MAX_PARTICLES,
			});
		}

		for (field, value) in [
			("particleSize.min", self.particle_size.min),
			("particleSize.max", self.particle_size.max),
			("speed", self.speed),
			("connectionRadius", self.connection_radius),
			("gravity", self.gravity),
			("friction", self.friction),
			("vortexStrength", self.vortex_strength),
		] {
			if !value.is_finite() {
				return Err(ConfigError::NonFinite { field });
			}
		}

		let SizeRange { min, max } = self.particle_size;
		if min < 0.0 || min > max {
			return Err(ConfigError::InvalidSizeRange { min, max });
		}
		if self.speed < 0.0 {
			return Err(ConfigError::NegativeValue {
				field: "speed",
				value: self.speed,
			});
		}
		if self.connection_radius < 0.0 {
			return Err(ConfigError::NegativeValue {
				field: "connectionRadius",
				value: self.connection_radius,
			});
		}
		if !(self.friction > 0.0 && self.friction <= 1.0) {
			return Err(ConfigError::InvalidFriction(self.friction));
		}
		if self.colors.is_empty() {
			return Err(ConfigError::EmptyColors);
		}
		Ok(())
	}
}

/// Holds the active configuration and refuses invalid replacements.
#[derive(Clone, Debug)]
pub struct ConfigSlot {
	active: ArtConfig,
}

impl ConfigSlot {
	/// Starts from `initial`, or from the built-in default if `initial` is invalid.
	pub fn new(initial: ArtConfig) -> Self {
		match initial.validate() {
			Ok(()) => Self { active: initial },
			Err(e) => {
				warn!("lumina: initial configuration rejected, using default: {}", e);
				Self {
					active: ArtConfig::default(),
				}
			}
		}
	}

	pub fn active(&self) -> &ArtConfig {
		&self.active
	}

	/// Replaces the active configuration if `candidate` is valid. On error the
	/// previous configuration stays in place.
	pub fn offer(&mut self, candidate: ArtConfig) -> Result<&ArtConfig, ConfigError> {
		candidate.validate()?;
		self.active = candidate;
		Ok(&self.active)
	}
}

impl Default for ConfigSlot {
	fn default() -> Self {
		Self {
			active: ArtConfig::default(),
		}
	}
}
