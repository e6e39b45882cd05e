//! wgpu implementation of [`GpuBackend`].
//!
//! Sketches draw into an offscreen canvas texture owned by the backend. The
//! window surface only ever receives a copy of it (`present`), so a sketch
//! that never calls `background` keeps accumulating pixels across frames.

mod pipeline;
mod texture;

use std::collections::{HashMap, HashSet};

use crate::batch::BatchLimits;
use crate::coords::Mat4;
use crate::geometry::Vertex;
use crate::paint::{BlendMode, Color};

use super::{FramebufferIds, GpuBackend, GpuError, ResourceId, TextureFilter};

use texture::GpuTexture;

/// One recorded draw, resolved to live ids at record time.
#[derive(Debug, Copy, Clone)]
struct PendingDraw {
    shader: ResourceId,
    texture: ResourceId,
    blend: BlendMode,
    index_start: u32,
    index_count: u32,
}

pub struct WgpuBackend {
    device: wgpu::Device,
    queue: wgpu::Queue,

    globals_ubo: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,
    texture_bgl: wgpu::BindGroupLayout,
    pipeline_layout: wgpu::PipelineLayout,
    pipelines: HashMap<(ResourceId, BlendMode), wgpu::RenderPipeline>,
    /// Pairs wgpu refused to build; their draws are skipped.
    broken_pipelines: HashSet<(ResourceId, BlendMode)>,

    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    limits: BatchLimits,
    upload_ok: bool,

    next_id: u32,
    shaders: HashMap<ResourceId, wgpu::ShaderModule>,
    textures: HashMap<ResourceId, GpuTexture>,
    framebuffers: HashMap<ResourceId, ResourceId>,

    default_shader: ResourceId,
    white_texture: ResourceId,
    canvas: FramebufferIds,

    /// Color texture of the framebuffer draws currently land in.
    target: ResourceId,
    pending_clear: Option<wgpu::Color>,
    shader: ResourceId,
    texture: ResourceId,
    blend: BlendMode,
    draws: Vec<PendingDraw>,

    blit: Option<(wgpu::TextureFormat, wgpu::RenderPipeline)>,
}

impl WgpuBackend {
    /// Creates the backend with a `width` x `height` canvas and buffers sized
    /// for `limits`.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        width: u32,
        height: u32,
        limits: BatchLimits,
    ) -> Result<Self, GpuError> {
        let globals_bgl = pipeline::globals_layout(device);
        let texture_bgl = pipeline::texture_layout(device);

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("easel batch pipeline layout"),
            bind_group_layouts: &[&globals_bgl, &texture_bgl],
            immediate_size: 0,
        });

        let globals_ubo = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("easel globals ubo"),
            size: std::mem::size_of::<Mat4>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("easel globals bind group"),
            layout: &globals_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_ubo.as_entire_binding(),
            }],
        });

        let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("easel batch vbo"),
            size: (limits.max_vertices.max(1) * std::mem::size_of::<Vertex>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let index_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("easel batch ibo"),
            size: (limits.max_indices.max(1) * std::mem::size_of::<u32>()) as u64,
            usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let mut backend = Self {
            device: device.clone(),
            queue: queue.clone(),
            globals_ubo,
            globals_bind_group,
            texture_bgl,
            pipeline_layout,
            pipelines: HashMap::new(),
            broken_pipelines: HashSet::new(),
            vertex_buffer,
            index_buffer,
            limits,
            upload_ok: false,
            next_id: 1,
            shaders: HashMap::new(),
            textures: HashMap::new(),
            framebuffers: HashMap::new(),
            default_shader: ResourceId(0),
            white_texture: ResourceId(0),
            canvas: FramebufferIds {
                framebuffer: ResourceId(0),
                color: ResourceId(0),
            },
            target: ResourceId(0),
            pending_clear: None,
            shader: ResourceId(0),
            texture: ResourceId(0),
            blend: BlendMode::default(),
            draws: Vec::new(),
            blit: None,
        };

        backend.default_shader = backend.create_shader(pipeline::DEFAULT_SHADER_SRC)?;
        backend.white_texture =
            backend.create_texture(1, 1, &[255, 255, 255, 255], TextureFilter::Nearest)?;
        backend.canvas = backend.create_framebuffer(width, height)?;
        backend.target = backend.canvas.color;
        backend.shader = backend.default_shader;
        backend.texture = backend.white_texture;

        log::debug!("WgpuBackend: canvas {width}x{height}, limits {limits:?}");
        Ok(backend)
    }

    /// Canvas size in pixels.
    pub fn canvas_size(&self) -> (u32, u32) {
        self.textures
            .get(&self.canvas.color)
            .map(|t| (t.width, t.height))
            .unwrap_or((0, 0))
    }

    /// Commits pending work and copies the canvas onto `surface_view`.
    pub fn present(&mut self, surface_view: &wgpu::TextureView, surface_format: wgpu::TextureFormat) {
        self.run_pass();
        self.ensure_blit(surface_format);

        let Some((_, blit)) = self.blit.as_ref() else { return };
        let Some(canvas) = self.textures.get(&self.canvas.color) else { return };

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("easel present encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("easel present pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: surface_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
            rpass.set_pipeline(blit);
            rpass.set_bind_group(0, &canvas.bind_group, &[]);
            rpass.draw(0..3, 0..1);
        }
        self.queue.submit(std::iter::once(encoder.finish()));
    }

    fn ensure_blit(&mut self, format: wgpu::TextureFormat) {
        if matches!(&self.blit, Some((f, _)) if *f == format) {
            return;
        }
        let pipeline = pipeline::blit_pipeline(&self.device, &self.texture_bgl, format);
        self.blit = Some((format, pipeline));
    }

    fn ensure_pipeline(&mut self, shader: ResourceId, blend: BlendMode) {
        let key = (shader, blend);
        if self.pipelines.contains_key(&key) || self.broken_pipelines.contains(&key) {
            return;
        }
        let Some(module) = self.shaders.get(&shader) else { return };

        let scope = self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let pipeline = pipeline::batch_pipeline(&self.device, &self.pipeline_layout, module, blend);
        if let Some(err) = pollster::block_on(scope.pop()) {
            log::error!("WgpuBackend: pipeline for {shader:?} / {blend:?} rejected: {err}; draws skipped");
            self.broken_pipelines.insert(key);
            return;
        }
        self.pipelines.insert(key, pipeline);
    }

    fn alloc_id(&mut self) -> ResourceId {
        let id = ResourceId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Encodes and submits the pending clear and draws as one render pass.
    fn run_pass(&mut self) {
        if self.draws.is_empty() && self.pending_clear.is_none() {
            return;
        }

        let draws = std::mem::take(&mut self.draws);
        let clear = self.pending_clear.take();

        // Mutating methods must happen before borrowing pipelines immutably.
        for d in &draws {
            self.ensure_pipeline(d.shader, d.blend);
        }

        let Some(target) = self.textures.get(&self.target) else {
            log::warn!("WgpuBackend: render target {:?} is gone; pass dropped", self.target);
            return;
        };

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("easel batch encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("easel batch pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: clear.map_or(wgpu::LoadOp::Load, wgpu::LoadOp::Clear),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            if !draws.is_empty() {
                rpass.set_bind_group(0, &self.globals_bind_group, &[]);
                rpass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
                rpass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);

                for d in &draws {
                    let Some(pipeline) = self.pipelines.get(&(d.shader, d.blend)) else { continue };
                    let Some(tex) = self.textures.get(&d.texture) else { continue };
                    rpass.set_pipeline(pipeline);
                    rpass.set_bind_group(1, &tex.bind_group, &[]);
                    rpass.draw_indexed(d.index_start..d.index_start + d.index_count, 0, 0..1);
                }
            }
        }
        self.queue.submit(std::iter::once(encoder.finish()));
    }
}

impl GpuBackend for WgpuBackend {
    fn create_texture(
        &mut self,
        width: u32,
        height: u32,
        rgba: &[u8],
        filter: TextureFilter,
    ) -> Result<ResourceId, GpuError> {
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(GpuError::TextureDataSize {
                expected,
                actual: rgba.len(),
            });
        }
        let tex = GpuTexture::new(&self.device, &self.texture_bgl, width, height, filter)?;
        tex.write(&self.queue, rgba)?;

        let id = self.alloc_id();
        self.textures.insert(id, tex);
        Ok(id)
    }

    fn update_texture(&mut self, texture: ResourceId, rgba: &[u8]) -> Result<(), GpuError> {
        // Draws already recorded must sample the old contents.
        if !self.draws.is_empty() {
            self.run_pass();
        }
        let tex = self
            .textures
            .get(&texture)
            .ok_or(GpuError::UnknownResource(texture))?;
        tex.write(&self.queue, rgba)
    }

    fn release_texture(&mut self, texture: ResourceId) {
        let is_attachment = self.framebuffers.values().any(|&c| c == texture);
        if texture == self.white_texture || is_attachment {
            log::warn!("WgpuBackend: texture {texture:?} is backend-owned; release ignored");
            return;
        }
        self.run_pass();
        self.textures.remove(&texture);
    }

    fn create_shader(&mut self, source: &str) -> Result<ResourceId, GpuError> {
        pipeline::validate_batch_shader(source)?;

        // A trial pipeline surfaces layout mismatches here instead of mid-frame.
        let scope = self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let module = self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("easel shader"),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });
        let trial = pipeline::batch_pipeline(
            &self.device,
            &self.pipeline_layout,
            &module,
            BlendMode::default(),
        );
        if let Some(err) = pollster::block_on(scope.pop()) {
            log::error!("WgpuBackend: shader rejected by the device: {err}");
            return Err(GpuError::ShaderCompile(err.to_string()));
        }

        let id = self.alloc_id();
        self.shaders.insert(id, module);
        self.pipelines.insert((id, BlendMode::default()), trial);
        Ok(id)
    }

    fn release_shader(&mut self, shader: ResourceId) {
        if shader == self.default_shader {
            log::warn!("WgpuBackend: default shader cannot be released");
            return;
        }
        self.run_pass();
        if self.shaders.remove(&shader).is_some() {
            self.pipelines.retain(|(s, _), _| *s != shader);
            self.broken_pipelines.retain(|(s, _)| *s != shader);
        }
        if self.shader == shader {
            self.shader = self.default_shader;
        }
    }

    fn create_framebuffer(&mut self, width: u32, height: u32) -> Result<FramebufferIds, GpuError> {
        let tex = GpuTexture::new(&self.device, &self.texture_bgl, width, height, TextureFilter::Linear)
            .map_err(|_| GpuError::IncompleteFramebuffer { width, height })?;

        let ids = FramebufferIds {
            framebuffer: self.alloc_id(),
            color: self.alloc_id(),
        };
        self.textures.insert(ids.color, tex);
        self.framebuffers.insert(ids.framebuffer, ids.color);
        Ok(ids)
    }

    fn release_framebuffer(&mut self, framebuffer: ResourceId) {
        if framebuffer == self.canvas.framebuffer {
            log::warn!("WgpuBackend: the canvas cannot be released");
            return;
        }
        self.run_pass();
        if let Some(color) = self.framebuffers.remove(&framebuffer) {
            self.textures.remove(&color);
            if self.target == color {
                self.target = self.canvas.color;
            }
        }
    }

    fn default_shader(&self) -> ResourceId {
        self.default_shader
    }

    fn white_texture(&self) -> ResourceId {
        self.white_texture
    }

    fn bind_target(&mut self, framebuffer: Option<ResourceId>) {
        let color = match framebuffer {
            None => self.canvas.color,
            Some(fb) => match self.framebuffers.get(&fb) {
                Some(&color) => color,
                None => {
                    log::warn!("WgpuBackend: unknown framebuffer {fb:?}; drawing to the canvas");
                    self.canvas.color
                }
            },
        };
        if color != self.target {
            self.run_pass();
            self.target = color;
        }
    }

    fn clear(&mut self, color: Color) {
        // Draws recorded before the clear must land first.
        if !self.draws.is_empty() {
            self.run_pass();
        }
        let [r, g, b, a] = color.to_normalized();
        self.pending_clear = Some(wgpu::Color {
            r: r as f64,
            g: g as f64,
            b: b as f64,
            a: a as f64,
        });
    }

    fn set_view_projection(&mut self, view_projection: &Mat4) {
        if !self.draws.is_empty() {
            self.run_pass();
        }
        self.queue
            .write_buffer(&self.globals_ubo, 0, bytemuck::bytes_of(view_projection));
    }

    fn upload(&mut self, vertices: &[Vertex], indices: &[u32]) {
        // Recorded draws reference the buffer contents being replaced.
        if !self.draws.is_empty() {
            self.run_pass();
        }
        if vertices.len() > self.limits.max_vertices || indices.len() > self.limits.max_indices {
            log::error!(
                "WgpuBackend: upload of {} vertices / {} indices exceeds buffer limits {:?}",
                vertices.len(),
                indices.len(),
                self.limits
            );
            self.upload_ok = false;
            return;
        }
        if !vertices.is_empty() {
            self.queue
                .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(vertices));
        }
        if !indices.is_empty() {
            self.queue
                .write_buffer(&self.index_buffer, 0, bytemuck::cast_slice(indices));
        }
        self.upload_ok = true;
    }

    fn bind_shader(&mut self, shader: ResourceId) {
        self.shader = if self.shaders.contains_key(&shader) {
            shader
        } else {
            log::warn!("WgpuBackend: unknown shader {shader:?}; using the default");
            self.default_shader
        };
    }

    fn bind_texture(&mut self, texture: ResourceId) {
        self.texture = if self.textures.contains_key(&texture) {
            texture
        } else {
            log::warn!("WgpuBackend: unknown texture {texture:?}; using white");
            self.white_texture
        };
    }

    fn set_blend(&mut self, blend: BlendMode) {
        self.blend = blend;
    }

    fn draw_indexed(&mut self, index_start: u32, index_count: u32) {
        if !self.upload_ok || index_count == 0 {
            return;
        }
        if self.texture == self.target {
            log::warn!("WgpuBackend: a render target cannot sample itself; draw skipped");
            return;
        }
        self.draws.push(PendingDraw {
            shader: self.shader,
            texture: self.texture,
            blend: self.blend,
            index_start,
            index_count,
        });
    }

    fn finish(&mut self) {
        self.run_pass();
    }
}
