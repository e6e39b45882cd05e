//! Batch renderer.
//!
//! Accumulates transformed geometry from many primitive calls into one shared
//! vertex/index buffer and draws it with as few GPU state changes as possible.
//!
//! Ordering rules:
//! - batches are drawn in submission order (required for correct blending)
//! - consecutive submissions with an identical [`BatchKey`] merge into one
//!   draw; nothing is ever reordered to create more merges

mod key;
mod renderer;
mod stats;

pub use key::{Batch, BatchKey, DrawState};
pub use renderer::{BatchLimits, BatchRenderer};
pub use stats::RenderStats;
