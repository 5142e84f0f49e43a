//! Instanced rendering of scene batches
//!
//! Every visible object contributes one model matrix to a shared instance
//! buffer. Objects sharing geometry and material occupy a contiguous range of
//! that buffer and are drawn with a single instanced draw call.

use std::ops::Range;

use bytemuck::{Pod, Zeroable};
use cgmath::Matrix4;
use wgpu::{Buffer, Device, Queue, RenderPass};

use crate::gfx::{
    resources::material::{MaterialManager, TextureId},
    scene::{object::DrawMesh, GeometryId, InstanceBatch, Scene},
};

/// Instance data for a single rendered instance
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct InstanceData {
    /// Model matrix (4x4) for the instance
    pub model: [[f32; 4]; 4],
}

impl InstanceData {
    pub fn from_matrix(model: Matrix4<f32>) -> Self {
        Self {
            model: model.into(),
        }
    }

    /// Get vertex buffer layout for instance data
    pub fn vertex_buffer_layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceData>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                // Model matrix (4 vec4s)
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 2, // After position(0) and normal(1)
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 4]>() as wgpu::BufferAddress,
                    shader_location: 3,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 8]>() as wgpu::BufferAddress,
                    shader_location: 4,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 12]>() as wgpu::BufferAddress,
                    shader_location: 5,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// A batch resolved to its matcap texture and its slice of the instance buffer
#[derive(Debug, Clone, PartialEq)]
pub struct DrawBatch {
    pub geometry: GeometryId,
    pub matcap: TextureId,
    pub instances: Range<u32>,
}

/// Flattens batches into one instance array plus per-batch ranges
pub fn pack_instances(
    batches: &[InstanceBatch],
    materials: &MaterialManager,
) -> (Vec<InstanceData>, Vec<DrawBatch>) {
    let mut instances = Vec::with_capacity(batches.iter().map(|b| b.models.len()).sum());
    let mut draws = Vec::with_capacity(batches.len());

    for batch in batches {
        let start = instances.len() as u32;
        instances.extend(batch.models.iter().copied().map(InstanceData::from_matrix));
        draws.push(DrawBatch {
            geometry: batch.geometry,
            matcap: materials.get_material_for_object(&batch.material).matcap,
            instances: start..instances.len() as u32,
        });
    }

    (instances, draws)
}

/// Instanced renderer for the scene's object batches
pub struct InstancedRenderer {
    instance_buffer: Buffer,
    capacity: u32,
    draws: Vec<DrawBatch>,
}

impl InstancedRenderer {
    /// Create a new instanced renderer with room for `initial_capacity` instances
    pub fn new(device: &Device, initial_capacity: u32) -> Self {
        let capacity = initial_capacity.max(1);
        Self {
            instance_buffer: Self::create_instance_buffer(device, capacity),
            capacity,
            draws: Vec::new(),
        }
    }

    fn create_instance_buffer(device: &Device, capacity: u32) -> Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Instance Buffer"),
            size: (capacity as u64) * std::mem::size_of::<InstanceData>() as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    /// Collects the scene's batches and uploads their instance data
    ///
    /// The instance buffer grows to the next power of two when needed.
    pub fn prepare(&mut self, device: &Device, queue: &Queue, scene: &Scene) {
        let (instances, draws) = pack_instances(&scene.instance_batches(), &scene.material_manager);

        let needed = instances.len() as u32;
        if needed > self.capacity {
            self.capacity = needed.next_power_of_two();
            self.instance_buffer = Self::create_instance_buffer(device, self.capacity);
            log::debug!("Instance buffer grown to {} instances", self.capacity);
        }

        if !instances.is_empty() {
            queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));
        }
        self.draws = draws;
    }

    /// Issues one draw call per batch
    ///
    /// `matcap_bind_group` resolves the texture bind group for slot 1.
    pub fn render<'a, F>(&'a self, render_pass: &mut RenderPass<'a>, scene: &'a Scene, matcap_bind_group: F)
    where
        F: Fn(TextureId) -> &'a wgpu::BindGroup,
    {
        if self.draws.is_empty() {
            return;
        }

        render_pass.set_vertex_buffer(1, self.instance_buffer.slice(..));

        for draw in &self.draws {
            let Some(mesh) = scene.geometry(draw.geometry) else {
                continue;
            };
            render_pass.set_bind_group(1, matcap_bind_group(draw.matcap), &[]);
            render_pass.draw_mesh_instanced(mesh, draw.instances.clone());
        }
    }
}
