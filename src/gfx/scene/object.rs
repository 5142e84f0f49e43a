use std::ops::Range;

use cgmath::{Matrix4, Rad, Vector3};
use wgpu::Device;

use super::{scene::GeometryId, vertex::Vertex3D};
use crate::gfx::{geometry::GeometryData, resources::material::MaterialId};

/// Uploadable triangle mesh
///
/// Vertex data stays on the CPU until [`Mesh::upload`] runs; dropping the
/// mesh drops its GPU buffers.
pub struct Mesh {
    vertices: Vec<Vertex3D>,
    indices: Vec<u32>,
    vertex_buffer: Option<wgpu::Buffer>,
    index_buffer: Option<wgpu::Buffer>,
    index_count: u32,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex3D>, indices: Vec<u32>) -> Self {
        let index_count = indices.len() as u32;
        Self {
            vertices,
            indices,
            vertex_buffer: None,
            index_buffer: None,
            index_count,
        }
    }

    pub fn from_geometry(data: &GeometryData) -> Self {
        let (vertices, indices) = data.to_scene_format();
        Self::new(vertices, indices)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    pub fn is_uploaded(&self) -> bool {
        self.vertex_buffer.is_some() && self.index_buffer.is_some()
    }

    /// Creates the GPU buffers if they do not exist yet
    pub fn upload(&mut self, device: &Device) {
        if self.is_uploaded() || self.indices.is_empty() {
            return;
        }

        let vertex_buffer = wgpu::util::DeviceExt::create_buffer_init(
            device,
            &wgpu::util::BufferInitDescriptor {
                label: Some("Mesh Vertex Buffer"),
                contents: bytemuck::cast_slice(&self.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            },
        );

        let index_buffer = wgpu::util::DeviceExt::create_buffer_init(
            device,
            &wgpu::util::BufferInitDescriptor {
                label: Some("Mesh Index Buffer"),
                contents: bytemuck::cast_slice(&self.indices),
                usage: wgpu::BufferUsages::INDEX,
            },
        );

        log::debug!(
            "Uploaded mesh: {} vertices, {} triangles",
            self.vertices.len(),
            self.index_count / 3
        );

        self.vertex_buffer = Some(vertex_buffer);
        self.index_buffer = Some(index_buffer);
    }
}

/// Position, Euler rotation (XYZ order, radians) and per-axis scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vector3<f32>,
    pub rotation: Vector3<f32>,
    pub scale: Vector3<f32>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 0.0),
            rotation: Vector3::new(0.0, 0.0, 0.0),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Model matrix: T * Rx * Ry * Rz * S
    pub fn matrix(&self) -> Matrix4<f32> {
        let t = Matrix4::from_translation(self.position);
        let r = Matrix4::from_angle_x(Rad(self.rotation.x))
            * Matrix4::from_angle_y(Rad(self.rotation.y))
            * Matrix4::from_angle_z(Rad(self.rotation.z));
        let s = Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z);
        t * r * s // Order matters: T * R * S
    }
}

/// A mesh instance: shared geometry and material referenced by id
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    pub geometry: GeometryId,
    pub material: MaterialId,
    pub transform: Transform,
    pub visible: bool,
}

impl Object {
    pub fn new(geometry: GeometryId, material: &str) -> Self {
        Self {
            geometry,
            material: material.to_string(),
            transform: Transform::default(),
            visible: true,
        }
    }

    /// Builder pattern: set the transform
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }
}

pub trait DrawMesh<'a> {
    fn draw_mesh_instanced(&mut self, mesh: &'a Mesh, instances: Range<u32>);
}

impl<'a, 'b> DrawMesh<'b> for wgpu::RenderPass<'a>
where
    'b: 'a,
{
    fn draw_mesh_instanced(&mut self, mesh: &'b Mesh, instances: Range<u32>) {
        let (Some(vertex_buffer), Some(index_buffer)) = (&mesh.vertex_buffer, &mesh.index_buffer)
        else {
            return; // Skip drawing if not uploaded
        };

        self.set_vertex_buffer(0, vertex_buffer.slice(..));
        self.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.draw_indexed(0..mesh.index_count, 0, instances);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::generate_box;
    use approx::assert_relative_eq;
    use cgmath::{Vector4, Zero};
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_identity_transform() {
        let m = Transform::default().matrix();
        assert_eq!(m, Matrix4::from_scale(1.0));
    }

    #[test]
    fn test_transform_order() {
        let transform = Transform {
            position: Vector3::new(1.0, 2.0, 3.0),
            rotation: Vector3::new(0.0, FRAC_PI_2, 0.0),
            scale: Vector3::new(2.0, 2.0, 2.0),
        };
        // Scale, then rotate +X onto -Z, then translate
        let p = transform.matrix() * Vector4::new(1.0, 0.0, 0.0, 1.0);
        assert_relative_eq!(p.x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(p.y, 2.0, epsilon = 1e-5);
        assert_relative_eq!(p.z, 1.0, epsilon = 1e-5);

        // Rx is applied after Rz
        let transform = Transform {
            position: Vector3::zero(),
            rotation: Vector3::new(FRAC_PI_2, 0.0, FRAC_PI_2),
            scale: Vector3::new(1.0, 1.0, 1.0),
        };
        let p = transform.matrix() * Vector4::new(1.0, 0.0, 0.0, 1.0);
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(p.y, 0.0, epsilon = 1e-5);
        assert_relative_eq!(p.z, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_mesh_from_geometry() {
        let mesh = Mesh::from_geometry(&generate_box(1.0, 1.0, 1.0));
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.index_count(), 36);
        assert!(!mesh.is_uploaded());
    }
}
