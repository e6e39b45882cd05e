use std::ops::{Deref, DerefMut};

use crate::batch::RenderStats;
use crate::gpu::{GpuBackend, WgpuBackend};
use crate::graphics::DrawContext;
use crate::input::{InputEvent, InputState};
use crate::paint::Color;
use crate::time::FrameClock;

use super::config::SketchConfig;
use super::driver::SketchDriver;

/// A creative-coding program.
///
/// `setup` runs once before the first frame, `draw` once per frame while the
/// sketch loops (or after `redraw`), `destroy` once at shutdown. Everything
/// drawn lands on a persistent canvas; call `background` to clear it.
pub trait Sketch<B: GpuBackend = WgpuBackend> {
    fn setup(&mut self, ctx: &mut SketchCtx<'_, B>) {
        let _ = ctx;
    }

    fn draw(&mut self, ctx: &mut SketchCtx<'_, B>);

    fn destroy(&mut self, ctx: &mut SketchCtx<'_, B>) {
        let _ = ctx;
    }

    /// Called for every input event, between frames. `ctx.input()` already
    /// reflects the event.
    fn on_event(&mut self, ctx: &mut SketchCtx<'_, B>, event: &InputEvent) {
        let _ = (ctx, event);
    }
}

/// What a sketch callback sees: the draw context (through `Deref`), input,
/// timing and loop control.
pub struct SketchCtx<'a, B: GpuBackend = WgpuBackend> {
    gfx: &'a mut DrawContext<B>,
    driver: &'a mut SketchDriver,
    input: &'a InputState,
    clock: &'a FrameClock,
    dt: f32,
}

impl<'a, B: GpuBackend> SketchCtx<'a, B> {
    pub fn input(&self) -> &InputState {
        self.input
    }

    /// Frames drawn so far; 1 during the first `draw`, 0 in `setup`.
    pub fn frame_count(&self) -> u64 {
        self.clock.frame_count()
    }

    /// Smoothed frames per second.
    pub fn frame_rate(&self) -> f32 {
        self.clock.frame_rate()
    }

    /// Seconds since the previous frame.
    pub fn delta_time(&self) -> f32 {
        self.dt
    }

    /// Milliseconds since the sketch started.
    pub fn millis(&self) -> u128 {
        self.clock.elapsed().as_millis()
    }

    pub fn no_loop(&mut self) {
        self.driver.no_loop();
    }

    pub fn start_loop(&mut self) {
        self.driver.start_loop();
    }

    pub fn is_looping(&self) -> bool {
        self.driver.is_looping()
    }

    pub fn redraw(&mut self) {
        self.driver.redraw();
    }

    pub fn exit(&mut self) {
        self.driver.exit();
    }
}

impl<B: GpuBackend> Deref for SketchCtx<'_, B> {
    type Target = DrawContext<B>;

    fn deref(&self) -> &DrawContext<B> {
        self.gfx
    }
}

impl<B: GpuBackend> DerefMut for SketchCtx<'_, B> {
    fn deref_mut(&mut self) -> &mut DrawContext<B> {
        self.gfx
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Phase {
    Created,
    Running,
    Destroyed,
}

/// Drives a [`Sketch`] against a [`DrawContext`], independent of any window.
///
/// The windowed runtime feeds it events and frame ticks; tests drive it
/// directly with a [`RecordingBackend`](crate::gpu::RecordingBackend).
pub struct SketchHost<S, B: GpuBackend> {
    sketch: S,
    gfx: DrawContext<B>,
    driver: SketchDriver,
    input: InputState,
    clock: FrameClock,
    dt: f32,
    background: Option<Color>,
    phase: Phase,
}

macro_rules! sketch_ctx {
    ($host:expr) => {
        SketchCtx {
            gfx: &mut $host.gfx,
            driver: &mut $host.driver,
            input: &$host.input,
            clock: &$host.clock,
            dt: $host.dt,
        }
    };
}

impl<S, B> SketchHost<S, B>
where
    S: Sketch<B>,
    B: GpuBackend,
{
    pub fn new(sketch: S, backend: B, config: &SketchConfig) -> Self {
        Self {
            sketch,
            gfx: DrawContext::new(backend, config.width, config.height, config.limits),
            driver: SketchDriver::new(),
            input: InputState::new(),
            clock: FrameClock::new(),
            dt: 0.0,
            background: config.background,
            phase: Phase::Created,
        }
    }

    pub fn sketch(&self) -> &S {
        &self.sketch
    }

    pub fn graphics(&self) -> &DrawContext<B> {
        &self.gfx
    }

    pub fn graphics_mut(&mut self) -> &mut DrawContext<B> {
        &mut self.gfx
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn driver(&self) -> &SketchDriver {
        &self.driver
    }

    /// True once the sketch asked to exit or was destroyed.
    pub fn exit_requested(&self) -> bool {
        self.driver.exit_requested() || self.phase == Phase::Destroyed
    }

    /// True when the next [`frame`](Self::frame) would call `draw`.
    pub fn wants_frame(&self) -> bool {
        self.phase != Phase::Destroyed && self.driver.should_draw()
    }

    /// Clears the canvas to the configured background and runs `setup`.
    /// Later calls do nothing.
    pub fn setup(&mut self) {
        if self.phase != Phase::Created {
            return;
        }
        self.phase = Phase::Running;
        log::debug!("sketch setup ({}x{})", self.gfx.width(), self.gfx.height());

        self.gfx.begin_draw();
        if let Some(bg) = self.background {
            self.gfx.background(bg);
        }
        self.sketch.setup(&mut sketch_ctx!(self));
        self.gfx.end_draw();
        self.clock.reset();
    }

    /// Runs one `draw` if the driver wants one. Returns the frame's render
    /// statistics, or `None` when no frame was drawn.
    pub fn frame(&mut self) -> Option<RenderStats> {
        self.setup();
        if !self.wants_frame() {
            return None;
        }

        self.dt = self.clock.tick().dt;
        self.gfx.begin_draw();
        self.sketch.draw(&mut sketch_ctx!(self));
        let stats = self.gfx.end_draw();

        self.driver.frame_drawn();
        self.input.end_frame();
        Some(stats)
    }

    /// Applies an input event and forwards it to the sketch.
    ///
    /// Geometry the handler draws is flushed to the current target right away.
    pub fn handle_event(&mut self, event: InputEvent) {
        self.input.apply_event(&event);
        if self.phase != Phase::Running {
            return;
        }
        self.sketch.on_event(&mut sketch_ctx!(self), &event);
        if !self.gfx.pending_batches().is_empty() {
            self.gfx.flush();
        }
    }

    /// Runs `destroy` and releases every asset. Later calls do nothing.
    pub fn destroy(&mut self) {
        if self.phase == Phase::Destroyed {
            return;
        }
        if self.phase == Phase::Running {
            self.sketch.destroy(&mut sketch_ctx!(self));
        }
        self.gfx.release_all();
        self.phase = Phase::Destroyed;
        log::debug!("sketch destroyed");
    }
}
