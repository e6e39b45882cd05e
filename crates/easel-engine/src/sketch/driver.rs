/// Decides whether the host runs `draw` on the next frame.
///
/// Starts looping with one draw owed, so a sketch that calls `no_loop` in
/// `setup` still gets a single frame.
#[derive(Debug, Clone)]
pub struct SketchDriver {
    looping: bool,
    redraw_pending: bool,
    exit_requested: bool,
}

impl Default for SketchDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl SketchDriver {
    pub fn new() -> Self {
        Self {
            looping: true,
            redraw_pending: true,
            exit_requested: false,
        }
    }

    /// Stops calling `draw` every frame.
    pub fn no_loop(&mut self) {
        self.looping = false;
    }

    pub fn start_loop(&mut self) {
        self.looping = true;
    }

    /// Requests one `draw` while not looping.
    pub fn redraw(&mut self) {
        self.redraw_pending = true;
    }

    /// Ends the sketch after the current callback; no further draws run.
    pub fn exit(&mut self) {
        self.exit_requested = true;
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    pub fn should_draw(&self) -> bool {
        !self.exit_requested && (self.looping || self.redraw_pending)
    }

    /// Records that `draw` ran, consuming a pending redraw.
    pub fn frame_drawn(&mut self) {
        self.redraw_pending = false;
    }
}
