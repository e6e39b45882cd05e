//! Style records read by every primitive at call time.

mod modes;
mod render_style;

pub use modes::{AngleMode, EllipseMode, ImageMode, RectMode, ShapeKind, StrokeCap, StrokeJoin};
pub use render_style::RenderStyle;
