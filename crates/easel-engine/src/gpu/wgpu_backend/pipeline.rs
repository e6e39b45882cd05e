use crate::coords::Mat4;
use crate::geometry::Vertex;
use crate::gpu::GpuError;
use crate::paint::BlendMode;

use super::texture::TEXTURE_FORMAT;

pub(super) const DEFAULT_SHADER_SRC: &str = include_str!("shaders/default.wgsl");
pub(super) const BLIT_SHADER_SRC: &str = include_str!("shaders/blit.wgsl");

/// Resource bindings of the batch pipeline layout: globals, texture, sampler.
const BATCH_BINDINGS: [(u32, u32); 3] = [(0, 0), (1, 0), (1, 1)];

/// Vertex attribute locations provided by [`Vertex::layout`].
const VERTEX_LOCATIONS: [u32; 3] = [0, 1, 2];

/// Parses and validates WGSL and checks the `vs_main`/`fs_main` entry points.
///
/// wgpu treats an invalid module as a fatal device error; validating up front
/// turns a bad user shader into an ordinary `Err`.
pub(super) fn validate_wgsl(source: &str) -> Result<naga::Module, GpuError> {
    let module = naga::front::wgsl::parse_str(source)
        .map_err(|e| GpuError::ShaderCompile(e.emit_to_string(source)))?;

    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::empty(),
    );
    validator
        .validate(&module)
        .map_err(|e| GpuError::ShaderCompile(format!("{e:?}")))?;

    for (stage, name) in [
        (naga::ShaderStage::Vertex, "vs_main"),
        (naga::ShaderStage::Fragment, "fs_main"),
    ] {
        let found = module
            .entry_points
            .iter()
            .any(|ep| ep.stage == stage && ep.name == name);
        if !found {
            return Err(GpuError::ShaderCompile(format!(
                "missing {stage:?} entry point `{name}`"
            )));
        }
    }
    Ok(module)
}

/// [`validate_wgsl`] plus a check that the shader only uses what the batch
/// pipeline layout and vertex buffer provide.
pub(super) fn validate_batch_shader(source: &str) -> Result<(), GpuError> {
    let module = validate_wgsl(source)?;

    for (_, var) in module.global_variables.iter() {
        let Some(rb) = &var.binding else { continue };
        if !BATCH_BINDINGS.contains(&(rb.group, rb.binding)) {
            return Err(GpuError::ShaderCompile(format!(
                "@group({}) @binding({}) is not provided by the batch pipeline",
                rb.group, rb.binding
            )));
        }
    }

    let vs = module
        .entry_points
        .iter()
        .filter(|ep| ep.stage == naga::ShaderStage::Vertex && ep.name == "vs_main");
    for ep in vs {
        for arg in &ep.function.arguments {
            let mut locations = Vec::new();
            match (&arg.binding, &module.types[arg.ty].inner) {
                (Some(naga::Binding::Location { location, .. }), _) => locations.push(*location),
                (None, naga::TypeInner::Struct { members, .. }) => {
                    locations.extend(members.iter().filter_map(|m| match m.binding {
                        Some(naga::Binding::Location { location, .. }) => Some(location),
                        _ => None,
                    }));
                }
                _ => {}
            }
            if let Some(bad) = locations.iter().find(|&&l| !VERTEX_LOCATIONS.contains(&l)) {
                return Err(GpuError::ShaderCompile(format!(
                    "vertex input @location({bad}) is not provided by the vertex buffer"
                )));
            }
        }
    }
    Ok(())
}

pub(super) fn globals_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("easel globals bgl"),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: wgpu::BufferSize::new(std::mem::size_of::<Mat4>() as u64),
            },
            count: None,
        }],
    })
}

/// Texture + sampler layout; group 1 of batch pipelines and group 0 of the blit.
pub(super) fn texture_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("easel texture bgl"),
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
    })
}

/// Pipeline for one (shader, blend) pair drawing into a [`TEXTURE_FORMAT`] target.
pub(super) fn batch_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    module: &wgpu::ShaderModule,
    blend: BlendMode,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("easel batch pipeline"),
        layout: Some(layout),

        vertex: wgpu::VertexState {
            module,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[Vertex::layout()],
        },

        fragment: Some(wgpu::FragmentState {
            module,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: TEXTURE_FORMAT,
                blend: blend.to_wgpu(),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),

        primitive: triangle_list(),
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}

/// Fullscreen copy of a texture onto a surface of the given format.
pub(super) fn blit_pipeline(
    device: &wgpu::Device,
    texture_layout: &wgpu::BindGroupLayout,
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("easel blit shader"),
        source: wgpu::ShaderSource::Wgsl(BLIT_SHADER_SRC.into()),
    });

    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("easel blit pipeline layout"),
        bind_group_layouts: &[texture_layout],
        immediate_size: 0,
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("easel blit pipeline"),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &module,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[],
        },
        fragment: Some(wgpu::FragmentState {
            module: &module,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: triangle_list(),
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}

fn triangle_list() -> wgpu::PrimitiveState {
    wgpu::PrimitiveState {
        topology: wgpu::PrimitiveTopology::TriangleList,
        strip_index_format: None,
        front_face: wgpu::FrontFace::Ccw,
        cull_mode: None,
        polygon_mode: wgpu::PolygonMode::Fill,
        unclipped_depth: false,
        conservative: false,
    }
}
