//! GPU boundary.
//!
//! The renderer talks to the GPU only through [`GpuBackend`]: a small
//! capability set (upload, bind, draw, create/release resources). Two
//! implementations ship with the engine:
//! - [`WgpuBackend`]: the real renderer, drawing into an offscreen canvas that
//!   is blitted to the window surface on present
//! - [`RecordingBackend`]: headless, records every call; used by tests and
//!   tooling that only needs the command stream

mod backend;
mod error;
mod recording;
mod wgpu_backend;

pub use backend::{FramebufferIds, GpuBackend, ResourceId, TextureFilter};
pub use error::GpuError;
pub use recording::{GpuCall, RecordingBackend, Upload};
pub use wgpu_backend::WgpuBackend;
