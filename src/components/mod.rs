//! UI components.

pub mod art_canvas;
