//! Paint model shared between the draw context and the renderer.
//!
//! Scope:
//! - 8-bit straight-alpha colors as sketches specify them
//! - blend modes, which are part of every batch key

mod blend;
mod color;

pub use blend::BlendMode;
pub use color::Color;
