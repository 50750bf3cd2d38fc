//! Connection lines between nearby particles.
//!
//! Every unordered pair closer than the connection radius yields one
//! [`Connection`] whose opacity falls off linearly with distance. Small
//! particle sets are scanned pairwise; larger ones are bucketed into a uniform
//! grid whose cells are one radius wide, so only the 3x3 neighborhood of a
//! cell can hold partners. Both paths produce the same list in the same order.

use std::collections::HashMap;

use super::particles::Particle;

/// Particle count above which the grid is used instead of the pairwise scan.
pub const GRID_THRESHOLD: usize = 256;

/// A line between two particles, referenced by index with `from < to`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Connection {
	pub from: usize,
	pub to: usize,
	/// `1 - distance / radius`, in (0, 1].
	pub opacity: f64,
}

/// Opacity of the link between `a` and `b`, if they are within `radius`.
fn link(a: &Particle, b: &Particle, radius: f64) -> Option<f64> {
	let (dx, dy) = (a.x - b.x, a.y - b.y);
	let dist = (dx * dx + dy * dy).sqrt();
	(dist < radius).then(|| 1.0 - dist / radius)
}

/// Collects every connection among `particles` into `out`, ordered by
/// `(from, to)`. `out` is cleared first.
pub fn connections(particles: &[Particle], radius: f64, out: &mut Vec<Connection>) {
	out.clear();
	if !(radius > 0.0 && radius.is_finite()) || particles.len() < 2 {
		return;
	}

	if particles.len() > GRID_THRESHOLD {
		UniformGrid::build(particles, radius).connections(particles, radius, out);
	} else {
		pairwise(particles, radius, out);
	}
}

fn pairwise(particles: &[Particle], radius: f64, out: &mut Vec<Connection>) {
	for (i, a) in particles.iter().enumerate() {
		for (j, b) in particles.iter().enumerate().skip(i + 1) {
			if let Some(opacity) = link(a, b, radius) {
				out.push(Connection {
					from: i,
					to: j,
					opacity,
				});
			}
		}
	}
}

/// Particle indices bucketed by square cells of side `cell_size`.
struct UniformGrid {
	cell_size: f64,
	cells: HashMap<(i64, i64), Vec<usize>>,
}

impl UniformGrid {
	fn build(particles: &[Particle], cell_size: f64) -> Self {
		let mut grid = Self {
			cell_size,
			cells: HashMap::new(),
		};
		for (i, p) in particles.iter().enumerate() {
			let key = grid.cell_of(p);
			grid.cells.entry(key).or_default().push(i);
		}
		grid
	}

	fn cell_of(&self, p: &Particle) -> (i64, i64) {
		(
			(p.x / self.cell_size).floor() as i64,
			(p.y / self.cell_size).floor() as i64,
		)
	}

	fn connections(&self, particles: &[Particle], radius: f64, out: &mut Vec<Connection>) {
		for (i, a) in particles.iter().enumerate() {
			let (cx, cy) = self.cell_of(a);
			for nx in cx.saturating_sub(1)..=cx.saturating_add(1) {
				for ny in cy.saturating_sub(1)..=cy.saturating_add(1) {
					let Some(bucket) = self.cells.get(&(nx, ny)) else {
						continue;
					};
					for &j in bucket.iter().filter(|&&j| j > i) {
						if let Some(opacity) = link(a, &particles[j], radius) {
							out.push(Connection {
								from: i,
								to: j,
								opacity,
							});
						}
					}
				}
			}
		}
		out.sort_unstable_by_key(|c| (c.from, c.to));
	}
}

#[cfg(test)]
mod tests {
	use rand::rngs::SmallRng;
	use rand::{Rng, SeedableRng};

	use super::*;
	use crate::components::art_canvas::color::Color;

	fn at(x: f64, y: f64) -> Particle {
		Particle {
			x,
			y,
			vx: 0.0,
			vy: 0.0,
			size: 1.0,
			color: Color::rgb(255, 255, 255),
		}
	}

	fn scatter(n: usize, seed: u64) -> Vec<Particle> {
		let mut rng = SmallRng::seed_from_u64(seed);
		(0..n)
			.map(|_| at(rng.gen_range(0.0..1200.0), rng.gen_range(0.0..800.0)))
			.collect()
	}

	#[test]
	fn pair_ten_apart_has_expected_opacity() {
		let mut out = Vec::new();
		connections(&[at(10.0, 10.0), at(20.0, 10.0)], 50.0, &mut out);
		assert_eq!(out.len(), 1);
		assert_eq!((out[0].from, out[0].to), (0, 1));
		assert!((out[0].opacity - 0.8).abs() < 1e-12);
	}

	#[test]
	fn zero_radius_disables_connections() {
		let mut out = vec![Connection {
			from: 0,
			to: 1,
			opacity: 1.0,
		}];
		connections(&[at(0.0, 0.0), at(0.0, 0.0)], 0.0, &mut out);
		assert!(out.is_empty());
	}

	#[test]
	fn boundary_distance_is_excluded() {
		let mut out = Vec::new();
		connections(&[at(0.0, 0.0), at(30.0, 40.0)], 50.0, &mut out);
		assert!(out.is_empty());
	}

	#[test]
	fn coincident_particles_link_at_full_opacity() {
		let mut out = Vec::new();
		connections(&[at(5.0, 5.0), at(5.0, 5.0)], 10.0, &mut out);
		assert_eq!(out.len(), 1);
		assert_eq!(out[0].opacity, 1.0);
	}

	#[test]
	fn opacity_is_symmetric() {
		let (p, q) = (at(3.0, 4.0), at(17.5, -2.25));
		assert_eq!(link(&p, &q, 40.0), link(&q, &p, 40.0));

		let mut forward = Vec::new();
		let mut reverse = Vec::new();
		connections(&[p.clone(), q.clone()], 40.0, &mut forward);
		connections(&[q, p], 40.0, &mut reverse);
		assert_eq!(forward[0].opacity, reverse[0].opacity);
		assert!((0.0..=1.0).contains(&forward[0].opacity));
	}

	#[test]
	fn grid_matches_pairwise_scan() {
		let particles = scatter(900, 11);
		for radius in [5.0, 37.5, 100.0, 250.0] {
			let mut expected = Vec::new();
			pairwise(&particles, radius, &mut expected);

			let mut actual = Vec::new();
			UniformGrid::build(&particles, radius).connections(&particles, radius, &mut actual);

			assert_eq!(actual, expected, "radius {radius}");
		}
	}

	#[test]
	fn large_sets_route_through_grid_with_same_output() {
		let particles = scatter(GRID_THRESHOLD + 50, 4);
		let mut via_entry = Vec::new();
		connections(&particles, 60.0, &mut via_entry);

		let mut expected = Vec::new();
		pairwise(&particles, 60.0, &mut expected);
		assert_eq!(via_entry, expected);
		assert!(!via_entry.is_empty());
	}
}
