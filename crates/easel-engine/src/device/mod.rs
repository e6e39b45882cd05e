//! GPU device + surface management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - creating & configuring the Surface (swapchain)
//! - acquiring surface frames the backend presents the sketch canvas into

mod context;
mod frame;
mod init;
mod surface;

pub use context::Gpu;
pub use surface::SurfaceErrorAction;
pub use frame::GpuFrame;
pub use init::GpuInit;
