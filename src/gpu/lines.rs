//! Line-mesh pass for the connection graph.
//!
//! Segments are drawn as a plain `LineList` from two vertex buffers: endpoint
//! positions and per-vertex proximity gray. Only the draw range published by
//! the last frame update is uploaded and drawn.

use crate::buffer::ConnectionBuffer;
use crate::visuals::BlendMode;

use super::{create_mesh_pipeline, MeshPipelineDesc};

pub(crate) const SHADER_SOURCE: &str = include_str!("lines.wgsl");

const VEC3_STRIDE: wgpu::BufferAddress = 3 * std::mem::size_of::<f32>() as wgpu::BufferAddress;

/// GPU resources for the line mesh.
pub struct LineMeshPass {
    /// Segment endpoints, two vertices per connection.
    position_buffer: wgpu::Buffer,
    /// Per-vertex RGB gray.
    color_buffer: wgpu::Buffer,
    pipeline: wgpu::RenderPipeline,
}

impl LineMeshPass {
    pub fn new(
        device: &wgpu::Device,
        uniform_layout: &wgpu::BindGroupLayout,
        vertex_capacity: usize,
        surface_format: wgpu::TextureFormat,
        blend_mode: BlendMode,
        sample_count: u32,
    ) -> Self {
        let size = vertex_capacity as u64 * VEC3_STRIDE;
        let position_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Connection Position Buffer"),
            size,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let color_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Connection Color Buffer"),
            size,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let pipeline = create_mesh_pipeline(
            device,
            &MeshPipelineDesc {
                label: "Connection",
                shader_source: SHADER_SOURCE,
                uniform_layout,
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: VEC3_STRIDE,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &[wgpu::VertexAttribute {
                            offset: 0,
                            shader_location: 0,
                            format: wgpu::VertexFormat::Float32x3,
                        }],
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: VEC3_STRIDE,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &[wgpu::VertexAttribute {
                            offset: 0,
                            shader_location: 1,
                            format: wgpu::VertexFormat::Float32x3,
                        }],
                    },
                ],
                topology: wgpu::PrimitiveTopology::LineList,
                surface_format,
                blend_mode,
                sample_count,
            },
        );

        Self {
            position_buffer,
            color_buffer,
            pipeline,
        }
    }

    /// Upload the active prefix of whichever attributes changed.
    pub fn upload(&self, queue: &wgpu::Queue, lines: &mut ConnectionBuffer) {
        let vertices = lines.vertex_count() as usize;
        let (positions, colors) = lines.attributes_mut();

        if positions.take_dirty() && vertices > 0 {
            queue.write_buffer(
                &self.position_buffer,
                0,
                bytemuck::cast_slice(positions.items(vertices)),
            );
        }
        if colors.take_dirty() && vertices > 0 {
            queue.write_buffer(
                &self.color_buffer,
                0,
                bytemuck::cast_slice(colors.items(vertices)),
            );
        }
    }

    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>, vertex_count: u32) {
        if vertex_count == 0 {
            return;
        }
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_vertex_buffer(0, self.position_buffer.slice(..));
        render_pass.set_vertex_buffer(1, self.color_buffer.slice(..));
        render_pass.draw(0..vertex_count, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_shader_validates() {
        super::super::tests::validate_wgsl(SHADER_SOURCE).unwrap();
    }

    #[test]
    fn test_lines_shader_reads_both_attributes() {
        assert!(SHADER_SOURCE.contains("@location(0) position: vec3<f32>"));
        assert!(SHADER_SOURCE.contains("@location(1) color: vec3<f32>"));
        assert!(SHADER_SOURCE.contains("line_opacity"));
    }
}
