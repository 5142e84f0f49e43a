//! Global uniform bindings for camera data
//!
//! Manages the uniform buffer and bind group holding per-frame camera state
//! shared by every draw call. Bound to slot 0 of the matcap pipeline.

use crate::{
    gfx::camera::camera_utils::CameraUniform,
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::UniformBuffer,
    },
};

/// Global uniform buffer content
///
/// MUST match the `Globals` struct in the matcap shader exactly.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUBOContent {
    view_position: [f32; 4],  // Camera position (homogeneous coordinates)
    view_proj: [[f32; 4]; 4], // Camera view-projection matrix
    view: [[f32; 4]; 4],      // World to view transform
}
// Total: 16 + 64 + 64 = 144 bytes

impl From<CameraUniform> for GlobalUBOContent {
    fn from(camera: CameraUniform) -> Self {
        Self {
            view_position: camera.view_position,
            view_proj: camera.view_proj,
            view: camera.view,
        }
    }
}

/// Type alias for the global uniform buffer
pub type GlobalUBO = UniformBuffer<GlobalUBOContent>;

/// Updates the global uniform buffer with new camera data
pub fn update_global_ubo(ubo: &mut GlobalUBO, queue: &wgpu::Queue, camera: CameraUniform) {
    ubo.update_content(queue, camera.into());
}

/// Bind group layout and bind group for the global uniforms
pub struct GlobalBindings {
    bind_group_layout: BindGroupLayoutWithDesc,
    bind_group: wgpu::BindGroup,
}

impl GlobalBindings {
    pub fn new(device: &wgpu::Device, ubo: &GlobalUBO) -> Self {
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform())
            .create(device, "Globals Bind Group Layout");

        let bind_group = BindGroupBuilder::new(&bind_group_layout)
            .resource(ubo.binding_resource())
            .create(device, "Global Bind Group");

        GlobalBindings {
            bind_group_layout,
            bind_group,
        }
    }

    /// Layout used when creating render pipelines
    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_matches_shader_layout() {
        assert_eq!(std::mem::size_of::<GlobalUBOContent>(), 144);

        let mut camera = CameraUniform::default();
        camera.view_position = [1.0, 2.0, 3.0, 1.0];
        let content = GlobalUBOContent::from(camera);
        assert_eq!(content.view_position, [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(content.view[3][3], 1.0);
    }
}
