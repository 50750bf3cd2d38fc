//! Canvas rendering for the particle field.
//!
//! A frame is first built as a list of [`DrawCommand`]s and then replayed
//! onto the 2D context. Commands are ordered for correct z-ordering:
//! 1. Background fill
//! 2. Connection lines
//! 3. One shape per particle, drawn over the lines

use std::f64::consts::TAU;

use web_sys::CanvasRenderingContext2d;

use super::color::Color;
use super::config::{ArtConfig, ShapeType};
use super::particles::ParticleStore;
use super::spatial::{self, Connection};

/// Stroke width of connection lines.
pub const CONNECTION_LINE_WIDTH: f64 = 0.5;

/// A single drawing instruction.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
	/// Fill the whole surface.
	Clear { color: Color, width: f64, height: f64 },
	/// A connection line, stroked at `alpha` opacity.
	Line {
		from: (f64, f64),
		to: (f64, f64),
		color: Color,
		alpha: f64,
	},
	/// A filled disc.
	Circle { x: f64, y: f64, radius: f64, color: Color },
	/// A filled square centered on `(x, y)` with side `2 * half_side`.
	Square {
		x: f64,
		y: f64,
		half_side: f64,
		color: Color,
	},
	/// A velocity streak of stroke width `width`.
	Streak {
		from: (f64, f64),
		to: (f64, f64),
		width: f64,
		color: Color,
	},
}

/// Builds the draw commands for the current state of `store` into `out`.
///
/// `links` is scratch space for the connection pass; both buffers are
/// cleared first so they can be reused across frames.
pub fn build_frame(
	store: &ParticleStore,
	config: &ArtConfig,
	links: &mut Vec<Connection>,
	out: &mut Vec<DrawCommand>,
) {
	out.clear();
	out.push(DrawCommand::Clear {
		color: config.background,
		width: store.width(),
		height: store.height(),
	});

	let particles = store.particles();
	spatial::connections(particles, config.connection_radius, links);
	out.extend(links.iter().map(|link| {
		let (a, b) = (&particles[link.from], &particles[link.to]);
		DrawCommand::Line {
			from: (a.x, a.y),
			to: (b.x, b.y),
			color: a.color,
			alpha: link.opacity,
		}
	}));

	out.extend(particles.iter().map(|p| match config.shape_type {
		ShapeType::Circle => DrawCommand::Circle {
			x: p.x,
			y: p.y,
			radius: p.size,
			color: p.color,
		},
		ShapeType::Square => DrawCommand::Square {
			x: p.x,
			y: p.y,
			half_side: p.size,
			color: p.color,
		},
		ShapeType::Line => DrawCommand::Streak {
			from: (p.x, p.y),
			to: (p.x + p.vx * 2.0, p.y + p.vy * 2.0),
			width: p.size,
			color: p.color,
		},
	}));
}

/// Replays `commands` onto the canvas.
pub fn paint(ctx: &CanvasRenderingContext2d, commands: &[DrawCommand]) {
	for command in commands {
		match *command {
			DrawCommand::Clear {
				color,
				width,
				height,
			} => {
				ctx.set_global_alpha(1.0);
				ctx.set_fill_style_str(&color.to_css());
				ctx.fill_rect(0.0, 0.0, width, height);
			}
			DrawCommand::Line {
				from,
				to,
				color,
				alpha,
			} => {
				ctx.begin_path();
				ctx.set_stroke_style_str(&color.to_css());
				ctx.set_global_alpha(alpha);
				ctx.set_line_width(CONNECTION_LINE_WIDTH);
				ctx.move_to(from.0, from.1);
				ctx.line_to(to.0, to.1);
				ctx.stroke();
			}
			DrawCommand::Circle {
				x,
				y,
				radius,
				color,
			} => {
				ctx.set_global_alpha(1.0);
				ctx.set_fill_style_str(&color.to_css());
				ctx.begin_path();
				let _ = ctx.arc(x, y, radius, 0.0, TAU);
				ctx.fill();
			}
			DrawCommand::Square {
				x,
				y,
				half_side,
				color,
			} => {
				ctx.set_global_alpha(1.0);
				ctx.set_fill_style_str(&color.to_css());
				ctx.fill_rect(x - half_side, y - half_side, half_side * 2.0, half_side * 2.0);
			}
			DrawCommand::Streak {
				from,
				to,
				width,
				color,
			} => {
				ctx.set_global_alpha(1.0);
				ctx.set_stroke_style_str(&color.to_css());
				ctx.set_line_width(width);
				ctx.set_line_cap("round");
				ctx.begin_path();
				ctx.move_to(from.0, from.1);
				ctx.line_to(to.0, to.1);
				ctx.stroke();
			}
		}
	}
	ctx.set_global_alpha(1.0);
}
