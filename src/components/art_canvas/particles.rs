//! The particle store: every live particle plus the bounds they wrap within.

use rand::Rng;

use super::color::Color;
use super::config::ArtConfig;

/// A single simulated particle.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	/// Radius, fixed at creation.
	pub size: f64,
	/// Fixed at creation.
	pub color: Color,
}

/// All particles for the current configuration and viewport.
///
/// Particles are never added or removed individually; a reconfiguration or
/// resize swaps in a freshly generated set.
#[derive(Clone, Debug)]
pub struct ParticleStore {
	particles: Vec<Particle>,
	width: f64,
	height: f64,
}

/// Uniform sample in [0, 1).
fn unit<R: Rng + ?Sized>(rng: &mut R) -> f64 {
	rng.gen_range(0.0..1.0)
}

impl ParticleStore {
	pub fn new<R: Rng + ?Sized>(config: &ArtConfig, width: f64, height: f64, rng: &mut R) -> Self {
		Self {
			particles: Self::spawn(config, width, height, rng),
			width,
			height,
		}
	}

	fn spawn<R: Rng + ?Sized>(
		config: &ArtConfig,
		width: f64,
		height: f64,
		rng: &mut R,
	) -> Vec<Particle> {
		let count = config.particle_count as usize;
		let (min, max) = (config.particle_size.min, config.particle_size.max);
		let mut particles = Vec::with_capacity(count);

		for _ in 0..count {
			let color = if config.colors.is_empty() {
				Color::rgb(255, 255, 255)
			} else {
				config.colors[rng.gen_range(0..config.colors.len())]
			};
			particles.push(Particle {
				x: unit(rng) * width,
				y: unit(rng) * height,
				vx: (unit(rng) - 0.5) * config.speed,
				vy: (unit(rng) - 0.5) * config.speed,
				size: unit(rng) * (max - min) + min,
				color,
			});
		}

		particles
	}

	/// Discards every particle and generates a new set for `config` within
	/// the given bounds.
	pub fn reinitialize<R: Rng + ?Sized>(
		&mut self,
		config: &ArtConfig,
		width: f64,
		height: f64,
		rng: &mut R,
	) {
		*self = Self::new(config, width, height, rng);
	}

	pub fn particles(&self) -> &[Particle] {
		&self.particles
	}

	pub fn particles_mut(&mut self) -> &mut [Particle] {
		&mut self.particles
	}

	pub fn len(&self) -> usize {
		self.particles.len()
	}

	pub fn is_empty(&self) -> bool {
		self.particles.is_empty()
	}

	pub fn width(&self) -> f64 {
		self.width
	}

	pub fn height(&self) -> f64 {
		self.height
	}

	#[cfg(test)]
	pub(crate) fn from_particles(particles: Vec<Particle>, width: f64, height: f64) -> Self {
		Self {
			particles,
			width,
			height,
		}
	}
}
