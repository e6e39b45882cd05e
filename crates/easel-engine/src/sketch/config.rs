use crate::batch::BatchLimits;
use crate::paint::Color;

/// Window and canvas setup for a sketch.
#[derive(Debug, Clone)]
pub struct SketchConfig {
    pub title: String,

    /// Canvas size in sketch pixels; also the initial window size.
    pub width: u32,
    pub height: u32,

    pub vsync: bool,

    /// Canvas fill before `setup` runs. `None` leaves it transparent black.
    pub background: Option<Color>,

    pub limits: BatchLimits,
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self {
            title: "easel".to_string(),
            width: 640,
            height: 480,
            vsync: true,
            background: Some(Color::gray(204)),
            limits: BatchLimits::default(),
        }
    }
}

impl SketchConfig {
    pub fn new(title: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            title: title.into(),
            width,
            height,
            ..Self::default()
        }
    }
}
