use std::f32::consts::TAU;

use easel_engine::prelude::*;

const WIDTH: u32 = 800;
const HEIGHT: u32 = 600;
const ORBITERS: usize = 48;

/// Orbiting dots painted into a fading trail buffer, a checker stamp that
/// follows the mouse, and a freehand polygon built from clicks.
///
/// Keys: `p` pauses/resumes, space draws one frame while paused, `c` clears
/// the polygon, escape quits.
struct Orbits {
    trail: Option<RenderbufferId>,
    checker: Option<ImageId>,
    clicks: Vec<(f32, f32)>,
    phase: f32,
}

impl Orbits {
    fn new() -> Self {
        Self {
            trail: None,
            checker: None,
            clicks: Vec::new(),
            phase: 0.0,
        }
    }
}

fn checker_pixels(size: u32, cell: u32) -> Vec<u8> {
    let mut px = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let on = ((x / cell) + (y / cell)) % 2 == 0;
            px.extend_from_slice(if on { &[250, 250, 250, 255] } else { &[30, 30, 40, 255] });
        }
    }
    px
}

impl Sketch for Orbits {
    fn setup(&mut self, ctx: &mut SketchCtx<'_>) {
        match ctx.create_renderbuffer(WIDTH, HEIGHT) {
            Ok(rb) => self.trail = Some(rb),
            Err(e) => log::error!("trail buffer unavailable: {e}"),
        }
        match ctx.create_image(64, 64, checker_pixels(64, 8)) {
            Ok(img) => self.checker = Some(img),
            Err(e) => log::error!("checker image unavailable: {e}"),
        }
        ctx.ellipse_detail(24);
        log::info!("orbits ready: {}x{}", ctx.width(), ctx.height());
    }

    fn draw(&mut self, ctx: &mut SketchCtx<'_>) {
        self.phase += ctx.delta_time();
        let (w, h) = (ctx.width() as f32, ctx.height() as f32);

        // Fade the trail and paint this frame's dots into it.
        if let Some(trail) = self.trail {
            ctx.renderbuffer(trail);
            ctx.no_stroke();
            ctx.fill(Color::rgba(12, 12, 20, 28));
            ctx.rect(0.0, 0.0, w, h);

            ctx.push();
            ctx.translate(w * 0.5, h * 0.5);
            ctx.blend_mode(BlendMode::Additive);
            for i in 0..ORBITERS {
                let t = i as f32 / ORBITERS as f32;
                let radius = 60.0 + 200.0 * t;
                let angle = self.phase * (0.4 + t) + t * TAU;
                let (s, c) = angle.sin_cos();
                ctx.fill(Color::rgba(80 + (175.0 * t) as u8, 120, 255 - (175.0 * t) as u8, 200));
                ctx.circle(c * radius, s * radius, 6.0 + 6.0 * t);
            }
            ctx.pop();
            ctx.no_renderbuffer();
        }

        ctx.background(Color::rgb(12, 12, 20));
        if let Some(trail) = self.trail {
            ctx.image(trail, 0.0, 0.0);
        }

        // Click polygon.
        if self.clicks.len() >= 2 {
            ctx.fill(Color::rgba(255, 200, 80, 60));
            ctx.stroke(Color::rgb(255, 200, 80));
            ctx.stroke_weight(2.0);
            ctx.begin_shape(ShapeKind::Polygon);
            for &(x, y) in &self.clicks {
                ctx.vertex(x, y);
            }
            ctx.end_shape(ShapeEnd::Close);
        }

        // Checker stamp at the mouse, spinning with pointer speed.
        if let Some(checker) = self.checker {
            let input = ctx.input();
            let (mx, my) = (input.mouse.x, input.mouse.y);
            let speed = (input.mouse - input.pmouse).length();
            ctx.push();
            ctx.translate(mx, my);
            ctx.rotate(self.phase + speed * 0.02);
            ctx.image_mode(ImageMode::Center);
            ctx.tint(Color::rgba(255, 255, 255, 180));
            ctx.image_sized(checker, 0.0, 0.0, 48.0, 48.0);
            ctx.pop();
        }

        if ctx.frame_count() % 300 == 0 {
            log::debug!("frame {} at {:.1} fps", ctx.frame_count(), ctx.frame_rate());
        }
    }

    fn on_event(&mut self, ctx: &mut SketchCtx<'_>, event: &InputEvent) {
        match *event {
            InputEvent::MousePressed { button: MouseButton::Left, x, y } => {
                self.clicks.push((x, y));
                ctx.redraw();
            }
            InputEvent::KeyPressed { key: Key::Char('p'), repeat: false } => {
                if ctx.is_looping() {
                    ctx.no_loop();
                } else {
                    ctx.start_loop();
                }
            }
            InputEvent::KeyPressed { key: Key::Char(' '), .. } => ctx.redraw(),
            InputEvent::KeyPressed { key: Key::Char('c'), .. } => {
                self.clicks.clear();
                ctx.redraw();
            }
            InputEvent::KeyPressed { key: Key::Escape, .. } => ctx.exit(),
            _ => {}
        }
    }

    fn destroy(&mut self, _ctx: &mut SketchCtx<'_>) {
        log::info!("orbits done after {} clicks", self.clicks.len());
    }
}

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    let config = SketchConfig {
        background: Some(Color::rgb(12, 12, 20)),
        ..SketchConfig::new("easel orbits", WIDTH, HEIGHT)
    };
    Runtime::run(config, Orbits::new())
}
