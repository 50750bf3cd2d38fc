//! Per-frame particle physics.
//!
//! Each tick applies, in order: vortex pull toward the viewport center,
//! gravity, friction, integration, pointer repulsion, and wraparound. The
//! order matters for the numeric result and is fixed.
//!
//! Forces whose direction is undefined (the particle sits exactly on the
//! vortex center or under the pointer) contribute nothing for that tick.

use super::config::ArtConfig;
use super::particles::{Particle, ParticleStore};

/// Particles closer than this to the pointer are pushed away.
pub const INTERACTION_RADIUS: f64 = 150.0;

/// Scales the pointer impulse.
pub const POINTER_COUPLING: f64 = 0.05;

/// Cursor or touch position in viewport coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pointer {
	pub x: f64,
	pub y: f64,
}

impl Pointer {
	/// Stand-in for "no pointer", far enough outside any viewport that it
	/// never falls within [`INTERACTION_RADIUS`].
	pub const ABSENT: Pointer = Pointer {
		x: -1000.0,
		y: -1000.0,
	};

	pub const fn at(x: f64, y: f64) -> Self {
		Self { x, y }
	}
}

impl Default for Pointer {
	fn default() -> Self {
		Self::ABSENT
	}
}

/// Distance for `(dx, dy)`, or `None` when it is zero or not finite.
fn usable_distance(dx: f64, dy: f64) -> Option<f64> {
	let dist = (dx * dx + dy * dy).sqrt();
	(dist > 0.0 && dist.is_finite()).then_some(dist)
}

/// Advances every particle in `store` by one tick.
pub fn step(store: &mut ParticleStore, config: &ArtConfig, pointer: Pointer) {
	let (width, height) = (store.width(), store.height());
	let center = (width / 2.0, height / 2.0);

	for p in store.particles_mut() {
		step_particle(p, config, pointer, center, width, height);
	}
}

fn step_particle(
	p: &mut Particle,
	config: &ArtConfig,
	pointer: Pointer,
	(cx, cy): (f64, f64),
	width: f64,
	height: f64,
) {
	// Vortex
	if config.vortex_strength != 0.0 {
		let (dx, dy) = (cx - p.x, cy - p.y);
		if let Some(dist) = usable_distance(dx, dy) {
			p.vx += (dx / dist) * config.vortex_strength;
			p.vy += (dy / dist) * config.vortex_strength;
		}
	}

	p.vy += config.gravity;
	p.vx *= config.friction;
	p.vy *= config.friction;
	p.x += p.vx;
	p.y += p.vy;

	// Pointer repulsion
	let (mdx, mdy) = (pointer.x - p.x, pointer.y - p.y);
	if let Some(mdist) = usable_distance(mdx, mdy).filter(|&d| d < INTERACTION_RADIUS) {
		let force = (INTERACTION_RADIUS - mdist) / INTERACTION_RADIUS;
		p.vx -= mdx * force * POINTER_COUPLING;
		p.vy -= mdy * force * POINTER_COUPLING;
	}

	// Wrap: a particle past an edge re-enters exactly at the opposite edge.
	if p.x < 0.0 {
		p.x = width;
	}
	if p.x > width {
		p.x = 0.0;
	}
	if p.y < 0.0 {
		p.y = height;
	}
	if p.y > height {
		p.y = 0.0;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::art_canvas::color::Color;

	fn still(x: f64, y: f64) -> Particle {
		moving(x, y, 0.0, 0.0)
	}

	fn moving(x: f64, y: f64, vx: f64, vy: f64) -> Particle {
		Particle {
			x,
			y,
			vx,
			vy,
			size: 2.0,
			color: Color::rgb(255, 255, 255),
		}
	}

	fn inert() -> ArtConfig {
		ArtConfig {
			gravity: 0.0,
			friction: 1.0,
			vortex_strength: 0.0,
			..ArtConfig::default()
		}
	}

	fn run(particle: Particle, config: &ArtConfig, pointer: Pointer) -> Particle {
		let mut store = ParticleStore::from_particles(vec![particle], 200.0, 100.0);
		step(&mut store, config, pointer);
		store.particles()[0].clone()
	}

	#[test]
	fn stationary_particles_stay_put() {
		let mut store =
			ParticleStore::from_particles(vec![still(20.0, 30.0), still(30.0, 30.0)], 200.0, 100.0);
		let before = store.particles().to_vec();
		for _ in 0..1_000 {
			step(&mut store, &inert(), Pointer::ABSENT);
		}
		assert_eq!(store.particles(), &before[..]);
	}

	#[test]
	fn gravity_is_applied_before_friction() {
		let config = ArtConfig {
			gravity: 1.0,
			friction: 0.5,
			..inert()
		};
		let p = run(moving(50.0, 50.0, 2.0, 2.0), &config, Pointer::ABSENT);
		assert_eq!((p.vx, p.vy), (1.0, 1.5));
		assert_eq!((p.x, p.y), (51.0, 51.5));
	}

	#[test]
	fn vortex_pulls_toward_center() {
		let config = ArtConfig {
			vortex_strength: 0.5,
			..inert()
		};
		// Center of 200x100 is (100, 50); particle sits directly left of it.
		let p = run(still(40.0, 50.0), &config, Pointer::ABSENT);
		assert_eq!((p.vx, p.vy), (0.5, 0.0));
	}

	#[test]
	fn vortex_at_center_is_a_no_op() {
		let config = ArtConfig {
			vortex_strength: 0.3,
			..inert()
		};
		let p = run(moving(100.0, 50.0, 0.25, -0.5), &config, Pointer::ABSENT);
		assert_eq!((p.vx, p.vy), (0.25, -0.5));
		assert!(p.x.is_finite() && p.y.is_finite());
	}

	#[test]
	fn pointer_repels_nearby_particles() {
		let p = run(still(50.0, 50.0), &inert(), Pointer::at(80.0, 50.0));
		// dx = 30, force = (150 - 30) / 150 = 0.8, impulse = 30 * 0.8 * 0.05
		assert!((p.vx + 1.2).abs() < 1e-12);
		assert_eq!(p.vy, 0.0);
		// Position integrates before the impulse lands.
		assert_eq!((p.x, p.y), (50.0, 50.0));
	}

	#[test]
	fn pointer_outside_radius_is_ignored() {
		let p = run(still(10.0, 10.0), &inert(), Pointer::at(170.0, 10.0));
		assert_eq!((p.vx, p.vy), (0.0, 0.0));
	}

	#[test]
	fn pointer_on_top_of_particle_exerts_no_force() {
		let p = run(still(60.0, 40.0), &inert(), Pointer::at(60.0, 40.0));
		assert_eq!((p.vx, p.vy), (0.0, 0.0));
		assert_eq!((p.x, p.y), (60.0, 40.0));
	}

	#[test]
	fn absent_pointer_never_interacts() {
		let p = run(still(0.0, 0.0), &inert(), Pointer::default());
		assert_eq!((p.vx, p.vy), (0.0, 0.0));
	}

	#[test]
	fn wrap_clamps_to_opposite_edge() {
		// Lands at x = 201 after integration: past the right edge, so it jumps to 0.
		let p = run(moving(199.0, 50.0, 2.0, 0.0), &inert(), Pointer::ABSENT);
		assert_eq!(p.x, 0.0);

		let p = run(moving(3.0, 50.0, -10.0, 0.0), &inert(), Pointer::ABSENT);
		assert_eq!(p.x, 200.0);

		let p = run(moving(50.0, 99.5, 0.0, 1.0), &inert(), Pointer::ABSENT);
		assert_eq!(p.y, 0.0);

		let p = run(moving(50.0, 0.5, 0.0, -1.0), &inert(), Pointer::ABSENT);
		assert_eq!(p.y, 100.0);
	}

	#[test]
	fn exact_edges_do_not_wrap() {
		let p = run(still(200.0, 100.0), &inert(), Pointer::ABSENT);
		assert_eq!((p.x, p.y), (200.0, 100.0));
		let p = run(still(0.0, 0.0), &inert(), Pointer::ABSENT);
		assert_eq!((p.x, p.y), (0.0, 0.0));
	}
}
