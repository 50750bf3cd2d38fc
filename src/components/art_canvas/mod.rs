//! Particle canvas driven by an [`ArtConfig`].
//!
//! Renders a generative particle field on an HTML canvas with:
//! - Vortex, gravity, and friction physics with edge wraparound
//! - Pointer and touch repulsion
//! - Distance-faded connection lines between nearby particles
//! - Circle, square, or velocity-streak particle shapes
//!
//! # Example
//!
//! ```ignore
//! use lumina::components::art_canvas::{ArtCanvas, ArtConfig};
//!
//! let config = RwSignal::new(ArtConfig::default());
//! view! { <ArtCanvas config=config /> }
//! ```

pub mod color;
mod component;
pub mod config;
pub mod driver;
pub mod particles;
pub mod render;
pub mod simulation;
pub mod spatial;
mod state;

pub use color::Color;
pub use component::ArtCanvas;
pub use config::{ArtConfig, ConfigSlot, ShapeType, SizeRange};
pub use state::ArtState;
