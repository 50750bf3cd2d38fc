//! Error types for configuration, generation, and canvas setup.

use thiserror::Error;

/// Reasons a configuration is refused before it reaches the particle store.
#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("particle count must be positive, got {0}")]
	NonPositiveParticleCount(i64),
	#[error("particle count {count} exceeds the limit of {max}")]
	TooManyParticles { count: i64, max: u32 },
	#[error("invalid particle size range [{min}, {max}]")]
	InvalidSizeRange { min: f64, max: f64 },
	#[error("{field} must not be negative, got {value}")]
	NegativeValue { field: &'static str, value: f64 },
	#[error("{field} must be a finite number")]
	NonFinite { field: &'static str },
	#[error("friction must lie in (0, 1], got {0}")]
	InvalidFriction(f64),
	#[error("at least one particle color is required")]
	EmptyColors,
	#[error("unrecognized color {0:?}")]
	InvalidColor(String),
	#[error("malformed configuration: {0}")]
	Parse(#[from] serde_json::Error),
}

/// Failures while turning a prompt into a configuration.
#[derive(Debug, Error)]
pub enum GenerateError {
	#[error("prompt is empty")]
	EmptyPrompt,
	#[error("no API key configured")]
	MissingApiKey,
	#[error("request failed: {0}")]
	Request(String),
	#[error("service responded with HTTP {0}")]
	Status(u16),
	#[error("service returned no content")]
	EmptyResponse,
	#[error("could not decode service response: {0}")]
	Decode(serde_json::Error),
	#[error("service produced an unusable configuration: {0}")]
	Invalid(#[from] ConfigError),
}

/// The canvas cannot be drawn on.
#[derive(Debug, Error)]
pub enum SurfaceError {
	#[error("2d rendering context unavailable")]
	NoContext,
}
