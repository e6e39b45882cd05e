//! Sketch lifecycle: the [`Sketch`] trait user programs implement, the
//! per-callback [`SketchCtx`], loop control ([`SketchDriver`]) and the
//! window-independent [`SketchHost`] that ties them to a draw context.

mod config;
mod driver;
mod host;

pub use config::SketchConfig;
pub use driver::SketchDriver;
pub use host::{Sketch, SketchCtx, SketchHost};
