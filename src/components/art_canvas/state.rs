//! Simulation state owned by the canvas component.
//!
//! Everything the frame loop touches lives here: the active configuration,
//! the particle store, the latest pointer position, the RNG used for
//! (re)initialization, and reusable frame buffers. Input handlers and the
//! frame callback share it on the browser's single thread, so a resize or
//! reconfiguration always lands between frames and swaps the whole store.

use log::{info, warn};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use super::config::{ArtConfig, ConfigSlot};
use super::particles::ParticleStore;
use super::render::{self, DrawCommand};
use super::simulation::{self, Pointer};
use super::spatial::Connection;
use crate::error::ConfigError;

pub struct ArtState {
	config: ConfigSlot,
	store: ParticleStore,
	pointer: Pointer,
	rng: SmallRng,
	links: Vec<Connection>,
	frame: Vec<DrawCommand>,
	ticks: u64,
}

impl ArtState {
	pub fn new(config: ArtConfig, width: f64, height: f64, seed: u64) -> Self {
		let config = ConfigSlot::new(config);
		let mut rng = SmallRng::seed_from_u64(seed);
		let store = ParticleStore::new(config.active(), width, height, &mut rng);

		Self {
			config,
			store,
			pointer: Pointer::ABSENT,
			rng,
			links: Vec::new(),
			frame: Vec::new(),
			ticks: 0,
		}
	}

	pub fn config(&self) -> &ArtConfig {
		self.config.active()
	}

	pub fn store(&self) -> &ParticleStore {
		&self.store
	}

	pub fn pointer(&self) -> Pointer {
		self.pointer
	}

	pub fn ticks(&self) -> u64 {
		self.ticks
	}

	/// Applies a full replacement configuration and regenerates every
	/// particle. An invalid configuration is refused and the current
	/// particles keep running under the previous one.
	pub fn reconfigure(&mut self, config: ArtConfig) -> Result<(), ConfigError> {
		if let Err(e) = self.config.offer(config) {
			warn!("lumina: keeping previous configuration: {}", e);
			return Err(e);
		}
		self.reinitialize(self.store.width(), self.store.height());
		Ok(())
	}

	/// Adopts new viewport bounds and regenerates every particle.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.reinitialize(width, height);
	}

	fn reinitialize(&mut self, width: f64, height: f64) {
		self.store
			.reinitialize(self.config.active(), width, height, &mut self.rng);
		info!(
			"lumina: {} particles in {}x{}",
			self.store.len(),
			width,
			height
		);
	}

	pub fn pointer_moved(&mut self, x: f64, y: f64) {
		self.pointer = Pointer::at(x, y);
	}

	pub fn pointer_left(&mut self) {
		self.pointer = Pointer::ABSENT;
	}

	/// Runs one simulation step and returns the draw commands for the result.
	pub fn tick(&mut self) -> &[DrawCommand] {
		simulation::step(&mut self.store, self.config.active(), self.pointer);
		render::build_frame(
			&self.store,
			self.config.active(),
			&mut self.links,
			&mut self.frame,
		);
		self.ticks += 1;
		&self.frame
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::art_canvas::config::SizeRange;

	fn still_pair_config() -> ArtConfig {
		ArtConfig {
			particle_count: 2,
			speed: 0.0,
			gravity: 0.0,
			friction: 1.0,
			vortex_strength: 0.0,
			connection_radius: 50.0,
			particle_size: SizeRange { min: 2.0, max: 2.0 },
			..ArtConfig::default()
		}
	}

	#[test]
	fn stationary_pair_draws_one_line_every_frame() {
		let mut state = ArtState::new(still_pair_config(), 400.0, 300.0, 1);
		state.store = ParticleStore::from_particles(
			state
				.store
				.particles()
				.iter()
				.zip([(100.0, 100.0), (110.0, 100.0)])
				.map(|(p, (x, y))| {
					let mut p = p.clone();
					(p.x, p.y) = (x, y);
					p
				})
				.collect(),
			400.0,
			300.0,
		);
		let before = state.store().particles().to_vec();

		for _ in 0..120 {
			let lines: Vec<f64> = state
				.tick()
				.iter()
				.filter_map(|c| match c {
					DrawCommand::Line { alpha, .. } => Some(*alpha),
					_ => None,
				})
				.collect();
			assert_eq!(lines.len(), 1);
			assert!((lines[0] - 0.8).abs() < 1e-12);
		}
		assert_eq!(state.store().particles(), &before[..]);
		assert_eq!(state.ticks(), 120);
	}

	#[test]
	fn reconfigure_replaces_store_with_new_count() {
		let mut state = ArtState::new(ArtConfig::default(), 800.0, 600.0, 9);
		let old = state.store().particles().to_vec();
		assert_eq!(old.len(), 150);

		state
			.reconfigure(ArtConfig {
				particle_count: 42,
				..ArtConfig::default()
			})
			.unwrap();

		assert_eq!(state.store().len(), 42);
		assert_eq!(state.config().particle_count, 42);
		assert!(state.store().particles().iter().all(|p| !old.contains(p)));
	}

	#[test]
	fn invalid_reconfigure_keeps_running_state() {
		let mut state = ArtState::new(ArtConfig::default(), 800.0, 600.0, 2);
		let before = state.store().particles().to_vec();

		let result = state.reconfigure(ArtConfig {
			colors: Vec::new(),
			..ArtConfig::default()
		});

		assert!(matches!(result, Err(ConfigError::EmptyColors)));
		assert_eq!(state.config(), &ArtConfig::default());
		assert_eq!(state.store().particles(), &before[..]);
		assert!(!state.tick().is_empty());
	}

	#[test]
	fn resize_regenerates_within_new_bounds() {
		let mut state = ArtState::new(ArtConfig::default(), 1920.0, 1080.0, 5);
		state.resize(320.0, 240.0);
		assert_eq!(state.store().len(), 150);
		for p in state.store().particles() {
			assert!(p.x < 320.0 && p.y < 240.0);
		}
	}

	#[test]
	fn pointer_defaults_to_absent_and_resets() {
		let mut state = ArtState::new(ArtConfig::default(), 100.0, 100.0, 0);
		assert_eq!(state.pointer(), Pointer::ABSENT);
		state.pointer_moved(12.0, 34.0);
		assert_eq!(state.pointer(), Pointer::at(12.0, 34.0));
		state.pointer_left();
		assert_eq!(state.pointer(), Pointer::ABSENT);
	}

	#[test]
	fn same_seed_gives_same_distribution() {
		let a = ArtState::new(ArtConfig::default(), 640.0, 480.0, 77);
		let b = ArtState::new(ArtConfig::default(), 640.0, 480.0, 77);
		assert_eq!(a.store().particles(), b.store().particles());
	}
}
