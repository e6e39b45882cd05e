use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::device::{Gpu, GpuInit, SurfaceErrorAction};
use crate::gpu::WgpuBackend;
use crate::input::winit::{translate_window_event, CanvasMapping};
use crate::sketch::{Sketch, SketchConfig, SketchHost};

/// Entry point for windowed sketches.
pub struct Runtime;

impl Runtime {
    /// Opens a window sized to the sketch canvas and runs `sketch` until it
    /// exits or the window closes.
    ///
    /// Only platform setup failures (event loop, window, adapter, device)
    /// return an error; everything inside the sketch is logged.
    pub fn run<S>(config: SketchConfig, sketch: S) -> Result<()>
    where
        S: Sketch + 'static,
    {
        anyhow::ensure!(
            config.width > 0 && config.height > 0,
            "sketch size must be non-zero, got {}x{}",
            config.width,
            config.height
        );

        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, sketch);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.fatal.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct AppState<S>
where
    S: Sketch + 'static,
{
    config: SketchConfig,

    /// Held until the window exists, then moved into `host`.
    pending: Option<S>,
    host: Option<SketchHost<S, WgpuBackend>>,
    entry: Option<WindowEntry>,

    fatal: Option<anyhow::Error>,
    exit_requested: bool,
}

impl<S> AppState<S>
where
    S: Sketch + 'static,
{
    fn new(config: SketchConfig, sketch: S) -> Self {
        Self {
            config,
            pending: Some(sketch),
            host: None,
            entry: None,
            fatal: None,
            exit_requested: false,
        }
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(LogicalSize::new(self.config.width as f64, self.config.height as f64));

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_init = GpuInit::with_vsync(self.config.vsync);
        let entry = WindowEntryTryBuilder {
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed")?;

        let (width, height, limits) = (self.config.width, self.config.height, self.config.limits);
        let backend = entry
            .with_gpu(|gpu| WgpuBackend::new(gpu.device(), gpu.queue(), width, height, limits))
            .context("failed to create the canvas renderer")?;

        let sketch = self.pending.take().context("sketch already started")?;
        let mut host = SketchHost::new(sketch, backend, &self.config);
        host.setup();

        entry.with_window(|w| w.request_redraw());
        self.entry = Some(entry);
        self.host = Some(host);
        Ok(())
    }

    /// Runs `destroy` on the sketch and asks the loop to stop.
    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(host) = self.host.as_mut() {
            host.destroy();
        }
        self.exit_requested = true;
        event_loop.exit();
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(entry), Some(host)) = (self.entry.as_mut(), self.host.as_mut()) else {
            return;
        };

        host.frame();
        if host.exit_requested() {
            self.shutdown(event_loop);
            return;
        }

        let fatal = entry.with_mut(|fields| {
            let frame = match fields.gpu.begin_frame() {
                Ok(frame) => frame,
                Err(err) => return fields.gpu.handle_surface_error(err) == SurfaceErrorAction::Fatal,
            };
            host.graphics_mut()
                .backend_mut()
                .present(&frame.view, fields.gpu.surface_format());
            fields.window.pre_present_notify();
            fields.gpu.present(frame);
            false
        });

        if fatal {
            self.fatal = Some(anyhow::anyhow!("surface lost and could not be recovered"));
            self.shutdown(event_loop);
        }
    }
}

impl<S> ApplicationHandler for AppState<S>
where
    S: Sketch + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() || self.exit_requested {
            return;
        }

        if let Err(e) = self.start(event_loop) {
            log::error!("failed to start sketch: {e:#}");
            self.fatal = Some(e);
            self.exit_requested = true;
            event_loop.exit();
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);

        // Present pacing comes from the surface; only ask for frames the
        // sketch will draw.
        if let (Some(entry), Some(host)) = (self.entry.as_ref(), self.host.as_ref()) {
            if host.wants_frame() {
                entry.with_window(|w| w.request_redraw());
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        if self.exit_requested {
            return;
        }

        if let (Some(entry), Some(host)) = (self.entry.as_ref(), self.host.as_mut()) {
            let canvas = (self.config.width, self.config.height);
            let mapping = entry.with_window(|w| CanvasMapping::new(w.inner_size(), canvas));
            if let Some(ev) = translate_window_event(&event, host.input(), mapping) {
                host.handle_event(ev);
                if host.wants_frame() {
                    entry.with_window(|w| w.request_redraw());
                }
            }
            if host.exit_requested() {
                self.shutdown(event_loop);
                return;
            }
        }

        match &event {
            WindowEvent::CloseRequested => self.shutdown(event_loop),

            WindowEvent::Resized(new_size) => {
                if let Some(entry) = self.entry.as_mut() {
                    entry.with_gpu_mut(|gpu| gpu.resize(*new_size));
                    entry.with_window(|w| w.request_redraw());
                }
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(entry) = self.entry.as_mut() {
                    let new_size = entry.with_window(|w| w.inner_size());
                    entry.with_gpu_mut(|gpu| gpu.resize(new_size));
                    entry.with_window(|w| w.request_redraw());
                }
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(host) = self.host.as_mut() {
            host.destroy();
        }
        // Backend resources go before the device-owning window entry.
        self.host = None;
        self.entry = None;
    }
}
