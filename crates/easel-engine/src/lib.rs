//! easel engine crate.
//!
//! Immediate-mode 2D drawing for creative coding. A sketch implements
//! [`sketch::Sketch`]; each primitive call is tessellated with the active
//! style and matrix, batched by [`batch::BatchRenderer`] and drawn through a
//! [`gpu::GpuBackend`]. [`window::Runtime`] hosts a sketch in a window.

pub mod assets;
pub mod batch;
pub mod coords;
pub mod device;
pub mod geometry;
pub mod gpu;
pub mod graphics;
pub mod input;
pub mod logging;
pub mod paint;
pub mod sketch;
pub mod state;
pub mod style;
pub mod time;
pub mod window;

/// Everything a typical sketch needs.
pub mod prelude {
    pub use crate::assets::{ImageId, RenderbufferId, ShaderId, TextureId};
    pub use crate::gpu::TextureFilter;
    pub use crate::graphics::{DrawContext, ShapeEnd};
    pub use crate::input::{InputEvent, Key, MouseButton};
    pub use crate::logging::{init_logging, LoggingConfig};
    pub use crate::paint::{BlendMode, Color};
    pub use crate::sketch::{Sketch, SketchConfig, SketchCtx};
    pub use crate::style::{
        AngleMode, EllipseMode, ImageMode, RectMode, ShapeKind, StrokeCap, StrokeJoin,
    };
    pub use crate::window::Runtime;
}
