use crate::assets::ShaderId;
use crate::paint::{BlendMode, Color};

use super::{AngleMode, EllipseMode, ImageMode, RectMode, StrokeCap, StrokeJoin};

/// Complete drawing style: what `push_style` saves and `pop_style` restores.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderStyle {
    pub fill: Color,
    pub stroke: Color,
    /// Multiplied into image texels.
    pub tint: Color,
    pub fill_enabled: bool,
    pub stroke_enabled: bool,
    pub stroke_weight: f32,
    pub stroke_cap: StrokeCap,
    pub stroke_join: StrokeJoin,
    pub blend_mode: BlendMode,
    pub angle_mode: AngleMode,
    pub rect_mode: RectMode,
    pub ellipse_mode: EllipseMode,
    pub image_mode: ImageMode,
    /// `None` draws with the renderer's default shader.
    pub shader: Option<ShaderId>,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            fill: Color::WHITE,
            stroke: Color::BLACK,
            tint: Color::WHITE,
            fill_enabled: true,
            stroke_enabled: true,
            stroke_weight: 1.0,
            stroke_cap: StrokeCap::default(),
            stroke_join: StrokeJoin::default(),
            blend_mode: BlendMode::default(),
            angle_mode: AngleMode::default(),
            rect_mode: RectMode::default(),
            ellipse_mode: EllipseMode::default(),
            image_mode: ImageMode::default(),
            shader: None,
        }
    }
}

impl RenderStyle {
    /// Fill color if filling is enabled.
    #[inline]
    pub fn fill_color(&self) -> Option<Color> {
        self.fill_enabled.then_some(self.fill)
    }

    /// Stroke color if stroking is enabled and the weight is visible.
    #[inline]
    pub fn stroke_color(&self) -> Option<Color> {
        (self.stroke_enabled && self.stroke_weight > 0.0).then_some(self.stroke)
    }
}
