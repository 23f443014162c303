//! Point-cloud pass.
//!
//! Draws one camera-facing round sprite per active particle, instanced from
//! a vertex buffer of `xyz` positions.

use crate::buffer::DynamicAttribute;
use crate::visuals::BlendMode;

use super::{create_mesh_pipeline, MeshPipelineDesc};

pub(crate) const SHADER_SOURCE: &str = include_str!("points.wgsl");

const POSITION_STRIDE: wgpu::BufferAddress = 3 * std::mem::size_of::<f32>() as wgpu::BufferAddress;

/// GPU resources for the point cloud.
pub struct PointCloudPass {
    /// Particle positions, one `vec3<f32>` per allocated particle.
    vertex_buffer: wgpu::Buffer,
    pipeline: wgpu::RenderPipeline,
}

impl PointCloudPass {
    pub fn new(
        device: &wgpu::Device,
        uniform_layout: &wgpu::BindGroupLayout,
        capacity: usize,
        surface_format: wgpu::TextureFormat,
        blend_mode: BlendMode,
        sample_count: u32,
    ) -> Self {
        let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Point Cloud Buffer"),
            size: capacity as u64 * POSITION_STRIDE,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let pipeline = create_mesh_pipeline(
            device,
            &MeshPipelineDesc {
                label: "Point Cloud",
                shader_source: SHADER_SOURCE,
                uniform_layout,
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: POSITION_STRIDE,
                    step_mode: wgpu::VertexStepMode::Instance,
                    attributes: &[wgpu::VertexAttribute {
                        offset: 0,
                        shader_location: 0,
                        format: wgpu::VertexFormat::Float32x3,
                    }],
                }],
                topology: wgpu::PrimitiveTopology::TriangleList,
                surface_format,
                blend_mode,
                sample_count,
            },
        );

        Self {
            vertex_buffer,
            pipeline,
        }
    }

    /// Upload the first `count` positions if the attribute changed.
    pub fn upload(&self, queue: &wgpu::Queue, points: &mut DynamicAttribute, count: u32) {
        if points.take_dirty() && count > 0 {
            queue.write_buffer(
                &self.vertex_buffer,
                0,
                bytemuck::cast_slice(points.items(count as usize)),
            );
        }
    }

    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>, count: u32) {
        if count == 0 {
            return;
        }
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.draw(0..6, 0..count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_shader_validates() {
        super::super::tests::validate_wgsl(SHADER_SOURCE).unwrap();
    }

    #[test]
    fn test_points_shader_entry_points() {
        assert!(SHADER_SOURCE.contains("fn vs_main"));
        assert!(SHADER_SOURCE.contains("fn fs_main"));
        assert!(SHADER_SOURCE.contains("@location(0) particle_pos: vec3<f32>"));
    }

    #[test]
    fn test_points_shader_scales_with_inverse_depth() {
        assert!(SHADER_SOURCE.contains("uniforms.attenuation_depth / clip_pos.w"));
    }
}
