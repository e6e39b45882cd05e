//! Window host.
//!
//! Owns the `winit` event loop and window, wires them to the GPU layer and
//! drives a [`SketchHost`](crate::sketch::SketchHost) from window events.

mod runtime;

pub use runtime::Runtime;
