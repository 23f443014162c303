//! wgpu renderer for the starfield.
//!
//! Owns the surface, device and the two draw passes (point cloud and
//! connection lines). All simulation happens on the CPU in [`Scene`]; this
//! module only uploads the dirty attribute ranges and draws them.

mod lines;
mod points;

use std::sync::Arc;

use winit::window::Window;

use crate::error::GpuError;
use crate::scene::Scene;
use crate::visuals::{hex_to_linear, BlendMode};

use lines::LineMeshPass;
use points::PointCloudPass;

/// Requested MSAA sample count when the surface format supports it.
const MSAA_SAMPLES: u32 = 4;

/// Per-frame uniforms shared by both passes. Layout matches the WGSL
/// `Uniforms` struct (128 bytes).
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct Uniforms {
    model_view_proj: [[f32; 4]; 4],
    viewport: [f32; 2],
    point_size: f32,
    line_opacity: f32,
    point_color: [f32; 4],
    line_color: [f32; 4],
    attenuation_depth: f32,
    _padding: [f32; 3],
}

impl Uniforms {
    fn from_scene(scene: &Scene, width: u32, height: u32) -> Self {
        let visuals = scene.visuals();
        Self {
            model_view_proj: scene.model_view_projection().to_cols_array_2d(),
            viewport: [width as f32, height as f32],
            point_size: visuals.point_size,
            line_opacity: visuals.line_opacity,
            point_color: hex_to_linear(visuals.point_color).extend(1.0).to_array(),
            line_color: hex_to_linear(visuals.line_color).extend(1.0).to_array(),
            attenuation_depth: if visuals.size_attenuation {
                scene.camera.position.length()
            } else {
                0.0
            },
            _padding: [0.0; 3],
        }
    }
}

/// Everything a mesh pipeline needs beyond the device.
pub(crate) struct MeshPipelineDesc<'a> {
    pub label: &'a str,
    pub shader_source: &'a str,
    pub uniform_layout: &'a wgpu::BindGroupLayout,
    pub buffers: &'a [wgpu::VertexBufferLayout<'a>],
    pub topology: wgpu::PrimitiveTopology,
    pub surface_format: wgpu::TextureFormat,
    pub blend_mode: BlendMode,
    pub sample_count: u32,
}

/// Build an unlit, depth-free pipeline with `vs_main`/`fs_main` entry points.
pub(crate) fn create_mesh_pipeline(
    device: &wgpu::Device,
    desc: &MeshPipelineDesc<'_>,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(desc.label),
        source: wgpu::ShaderSource::Wgsl(desc.shader_source.into()),
    });

    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(desc.label),
        bind_group_layouts: &[desc.uniform_layout],
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(desc.label),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: desc.buffers,
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: desc.surface_format,
                blend: Some(desc.blend_mode.to_blend_state()),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: desc.topology,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        // Blended sprites and lines, no depth buffer.
        depth_stencil: None,
        multisample: wgpu::MultisampleState {
            count: desc.sample_count,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
        cache: None,
    })
}

/// GPU state for one mounted window.
pub struct Renderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    sample_count: u32,
    /// Multisampled colour target, resolved into the swapchain image.
    msaa: Option<wgpu::TextureView>,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    clear_color: wgpu::Color,
    points: PointCloudPass,
    lines: LineMeshPass,
}

impl Renderer {
    pub async fn new(window: Arc<Window>, scene: &Scene) -> Result<Self, GpuError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|_| GpuError::NoAdapter)?;

        let info = adapter.get_info();
        log::info!("Using adapter {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(GpuError::IncompatibleSurface)?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let sample_count = if adapter
            .get_texture_format_features(surface_format)
            .flags
            .sample_count_supported(MSAA_SAMPLES)
        {
            MSAA_SAMPLES
        } else {
            log::warn!(
                "{:?} does not support {}x MSAA, rendering without antialiasing",
                surface_format,
                MSAA_SAMPLES
            );
            1
        };
        let msaa = create_msaa_texture(&device, &config, sample_count);

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Uniform Buffer"),
            size: std::mem::size_of::<Uniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Uniform Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Uniform Bind Group"),
            layout: &uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let visuals = scene.visuals();
        let points = PointCloudPass::new(
            &device,
            &uniform_bind_group_layout,
            scene.points.capacity(),
            surface_format,
            visuals.point_blend,
            sample_count,
        );
        let lines = LineMeshPass::new(
            &device,
            &uniform_bind_group_layout,
            scene.lines.vertex_capacity(),
            surface_format,
            visuals.line_blend,
            sample_count,
        );

        let background = hex_to_linear(visuals.background_color);
        let clear_color = wgpu::Color {
            r: background.x as f64,
            g: background.y as f64,
            b: background.z as f64,
            a: 1.0,
        };

        log::debug!(
            "Renderer ready: {}x{} {:?}, {} sample(s), {} line vertices",
            config.width,
            config.height,
            surface_format,
            sample_count,
            scene.lines.vertex_capacity()
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            sample_count,
            msaa,
            uniform_buffer,
            uniform_bind_group,
            clear_color,
            points,
            lines,
        })
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.msaa = create_msaa_texture(&self.device, &self.config, self.sample_count);
        }
    }

    /// Reconfigure only if the window size drifted from the surface.
    pub fn sync_size(&mut self, size: winit::dpi::PhysicalSize<u32>) {
        if size.width != self.config.width || size.height != self.config.height {
            self.resize(size);
        }
    }

    /// Reconfigure the surface at its current size (after `Lost`/`Outdated`).
    pub fn reconfigure(&mut self) {
        let size = winit::dpi::PhysicalSize::new(self.config.width, self.config.height);
        self.resize(size);
    }

    pub fn render(&mut self, scene: &mut Scene) -> Result<(), wgpu::SurfaceError> {
        let uniforms = Uniforms::from_scene(scene, self.config.width, self.config.height);
        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));

        let point_count = scene.point_count();
        self.points.upload(&self.queue, &mut scene.points, point_count);
        self.lines.upload(&self.queue, &mut scene.lines);

        let line_vertices = if scene.effect().show_lines {
            scene.lines.vertex_count()
        } else {
            0
        };

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let (target, resolve_target, store) = match &self.msaa {
                Some(msaa) => (msaa, Some(&view), wgpu::StoreOp::Discard),
                None => (&view, None, wgpu::StoreOp::Store),
            };

            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            self.points.draw(&mut render_pass, point_count);
            self.lines.draw(&mut render_pass, line_vertices);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

fn create_msaa_texture(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    sample_count: u32,
) -> Option<wgpu::TextureView> {
    if sample_count <= 1 {
        return None;
    }

    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("MSAA Texture"),
        size: wgpu::Extent3d {
            width: config.width,
            height: config.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count,
        dimension: wgpu::TextureDimension::D2,
        format: config.format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    Some(texture.create_view(&wgpu::TextureViewDescriptor::default()))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn validate_wgsl(source: &str) -> Result<(), String> {
        let module = naga::front::wgsl::parse_str(source)
            .map_err(|e| format!("WGSL parse error: {:?}", e))?;

        let mut validator = naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        );
        validator
            .validate(&module)
            .map_err(|e| format!("WGSL validation error: {:?}", e))?;
        Ok(())
    }

    #[test]
    fn test_uniforms_match_wgsl_layout() {
        assert_eq!(std::mem::size_of::<Uniforms>(), 128);
        assert_eq!(std::mem::size_of::<Uniforms>() % 16, 0);
    }

    #[test]
    fn test_uniforms_from_default_scene() {
        let scene = Scene::new(&crate::Config::default(), 800, 600);
        let uniforms = Uniforms::from_scene(&scene, 800, 600);

        assert_eq!(uniforms.viewport, [800.0, 600.0]);
        assert_eq!(uniforms.point_size, 2.0);
        assert!((uniforms.line_opacity - 0.3).abs() < 1e-6);
        assert!(uniforms.point_color.iter().all(|c| (c - 1.0).abs() < 1e-6));
        assert_eq!(uniforms.line_color[3], 1.0);
        assert_eq!(
            uniforms.model_view_proj,
            scene.model_view_projection().to_cols_array_2d()
        );
        assert_eq!(uniforms.attenuation_depth, 1750.0);
    }

    #[test]
    fn test_size_attenuation_can_be_disabled() {
        let mut config = crate::Config::default();
        config.visuals.size_attenuation(false);
        let scene = Scene::new(&config, 800, 600);

        assert_eq!(Uniforms::from_scene(&scene, 800, 600).attenuation_depth, 0.0);
    }
}
