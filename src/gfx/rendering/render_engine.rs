//! WGPU-based rendering engine
//!
//! Owns the surface, device and queue, the matcap pipeline, the depth buffer
//! and one bind group per loaded matcap texture. Frames are a single main
//! pass drawing instanced batches, followed by an optional UI overlay.

use std::{collections::HashMap, sync::Arc};

use anyhow::Context;
use wgpu::TextureFormat;

use crate::{
    error::TextscapeError,
    gfx::{
        camera::camera_utils::CameraUniform,
        resources::{
            global_bindings::{update_global_ubo, GlobalBindings, GlobalUBO},
            material::TextureId,
            texture_resource::TextureResource,
        },
        scene::{scene::Scene, vertex::Vertex3D},
    },
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
    },
};

use super::instanced_renderer::{InstanceData, InstancedRenderer};
use super::pipeline_manager::{PipelineConfig, PipelineManager};

const MATCAP_PIPELINE: &str = "Matcap";
const INITIAL_INSTANCE_CAPACITY: u32 = 1024;

/// A matcap texture together with its bind group
struct MatcapSlot {
    _texture: TextureResource,
    bind_group: wgpu::BindGroup,
}

impl MatcapSlot {
    fn new(device: &wgpu::Device, layout: &BindGroupLayoutWithDesc, texture: TextureResource, label: &str) -> Self {
        let bind_group = BindGroupBuilder::new(layout)
            .texture(&texture.view)
            .sampler(&texture.sampler)
            .create(device, label);
        Self {
            _texture: texture,
            bind_group,
        }
    }
}

/// Core rendering engine managing GPU resources and draw calls
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    depth_texture: TextureResource,
    format: TextureFormat,
    pipeline_manager: PipelineManager,
    global_ubo: GlobalUBO,
    global_bindings: GlobalBindings,
    matcap_layout: BindGroupLayoutWithDesc,
    placeholder: MatcapSlot,
    matcaps: HashMap<TextureId, MatcapSlot>,
    instanced_renderer: InstancedRenderer,
}

impl RenderEngine {
    /// Creates a new render engine for the given window
    ///
    /// # Arguments
    /// * `window` - Window surface target for rendering
    /// * `width` - Initial surface width in pixels
    /// * `height` - Initial surface height in pixels
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> anyhow::Result<RenderEngine> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window)
            .context("Failed to create surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("Failed to request adapter")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits {
                    max_texture_dimension_2d: 4096,
                    ..wgpu::Limits::downlevel_defaults()
                },
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .context("Failed to request a device")?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        // Matcap texels are written unchanged, so prefer a non-sRGB target
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .ok_or_else(|| TextscapeError::GpuSetup("surface reports no formats".into()))?;
        let alpha_mode = surface_capabilities
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::Fifo, // Paced by the display refresh rate
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        log::info!(
            "Surface configured: {:?} {}x{} via {}",
            format,
            config.width,
            config.height,
            adapter.get_info().name
        );

        let depth_texture =
            TextureResource::create_depth_texture(&device, &config, "depth_texture");

        let global_ubo = GlobalUBO::new(&device);
        let global_bindings = GlobalBindings::new(&device, &global_ubo);

        let matcap_layout = BindGroupLayoutBuilder::new()
            .next_binding_fragment(binding_types::texture_2d())
            .next_binding_fragment(binding_types::sampler(wgpu::SamplerBindingType::Filtering))
            .create(&device, "Matcap Bind Group Layout");

        let placeholder = MatcapSlot::new(
            &device,
            &matcap_layout,
            TextureResource::create_placeholder(&device, &queue),
            "Matcap Placeholder Bind Group",
        );

        let device_handle = Arc::new(device);
        let queue_handle = Arc::new(queue);

        let mut pipeline_manager = PipelineManager::new(device_handle.clone());
        pipeline_manager.load_shader("matcap", include_str!("matcap.wgsl"));

        pipeline_manager.register_pipeline(
            MATCAP_PIPELINE,
            PipelineConfig::default_with_shader("matcap")
                .with_label("Matcap Pipeline")
                .with_bind_group_layouts(vec![
                    global_bindings.bind_group_layout().clone(),
                    matcap_layout.layout.clone(),
                ])
                .with_vertex_buffers(vec![Vertex3D::desc(), InstanceData::vertex_buffer_layout()])
                // Text side walls and caps are viewed from both sides
                .with_cull_mode(None)
                .with_depth_format(TextureResource::DEPTH_FORMAT)
                .with_color_targets(vec![Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })]),
        );

        pipeline_manager
            .create_all_pipelines()
            .context("Failed to build render pipelines")?;

        let instanced_renderer = InstancedRenderer::new(&device_handle, INITIAL_INSTANCE_CAPACITY);

        Ok(Self {
            surface,
            device: device_handle,
            queue: queue_handle,
            config,
            depth_texture,
            format,
            pipeline_manager,
            global_ubo,
            global_bindings,
            matcap_layout,
            placeholder,
            matcaps: HashMap::new(),
            instanced_renderer,
        })
    }

    /// Uploads a decoded RGBA8 matcap into texture slot `id`
    ///
    /// Replaces any texture previously stored in the slot. Images with the
    /// wrong byte count or beyond the device's texture limit are rejected.
    pub fn upload_matcap(&mut self, id: TextureId, rgba: &[u8], width: u32, height: u32) {
        let max_dimension = self.device.limits().max_texture_dimension_2d;
        if let Err(reason) = check_matcap_size(rgba.len(), width, height, max_dimension) {
            log::error!("Matcap {}: {}; keeping placeholder", id.0, reason);
            return;
        }

        let label = format!("Matcap {}", id.0);
        let texture = TextureResource::create_from_rgba_data(
            &self.device,
            &self.queue,
            rgba,
            width,
            height,
            &label,
        );
        let slot = MatcapSlot::new(&self.device, &self.matcap_layout, texture, &label);
        self.matcaps.insert(id, slot);
        log::debug!("Uploaded matcap {} ({}x{})", id.0, width, height);
    }

    /// Bind group for texture slot `id`, or the grey placeholder
    fn matcap_bind_group(&self, id: TextureId) -> &wgpu::BindGroup {
        self.matcaps
            .get(&id)
            .map_or(&self.placeholder.bind_group, |slot| &slot.bind_group)
    }

    /// Renders a frame with an optional UI overlay
    ///
    /// Uploads pending scene geometry, draws every instance batch, then runs
    /// `ui_callback` on the same surface texture. A lost or outdated surface
    /// is reconfigured and the frame skipped.
    pub fn render_frame<F>(
        &mut self,
        scene: &mut Scene,
        ui_callback: Option<F>,
    ) -> Result<(), wgpu::SurfaceError>
    where
        F: FnOnce(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView),
    {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("Surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Surface texture timed out, skipping frame");
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        scene.prepare_gpu(&self.device);
        self.instanced_renderer
            .prepare(&self.device, &self.queue, scene);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);

            if let Some(pipeline) = self.pipeline_manager.pipeline(MATCAP_PIPELINE) {
                render_pass.set_pipeline(pipeline);
                self.instanced_renderer
                    .render(&mut render_pass, scene, |id| self.matcap_bind_group(id));
            } else {
                log::warn!("Matcap pipeline missing, nothing drawn");
            }
        }

        if let Some(ui_callback) = ui_callback {
            ui_callback(
                &self.device,
                &self.queue,
                &mut encoder,
                &surface_texture_view,
            );
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        Ok(())
    }

    /// Convenience method for rendering without UI
    pub fn render_frame_simple(&mut self, scene: &mut Scene) -> Result<(), wgpu::SurfaceError> {
        self.render_frame(
            scene,
            None::<fn(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView)>,
        )
    }

    /// Convenience method for rendering with UI
    pub fn render_frame_with_ui<F>(
        &mut self,
        scene: &mut Scene,
        ui_callback: F,
    ) -> Result<(), wgpu::SurfaceError>
    where
        F: FnOnce(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView),
    {
        self.render_frame(scene, Some(ui_callback))
    }

    /// Uploads new camera data to the global uniform buffer
    pub fn update(&mut self, camera_uniform: CameraUniform) {
        update_global_ubo(&mut self.global_ubo, &self.queue, camera_uniform);
    }

    /// Resizes the surface and recreates the depth buffer
    ///
    /// Zero-sized requests (minimized windows) are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);

        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, &self.config, "depth_texture");
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Returns the surface texture format
    ///
    /// Used for creating compatible render targets and UI systems.
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.format
    }
}

/// Checks that `len` RGBA8 bytes form a `width`x`height` image the device can hold
fn check_matcap_size(len: usize, width: u32, height: u32, max_dimension: u32) -> Result<(), String> {
    if width == 0 || height == 0 {
        return Err(format!("empty image ({}x{})", width, height));
    }
    if width > max_dimension || height > max_dimension {
        return Err(format!(
            "{}x{} exceeds the {} px texture limit",
            width, height, max_dimension
        ));
    }
    let expected = width as usize * height as usize * 4;
    if len != expected {
        return Err(format!(
            "{} bytes, expected {} for {}x{}",
            len, expected, width, height
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matcap_size_checks() {
        assert!(check_matcap_size(256 * 256 * 4, 256, 256, 4096).is_ok());
        assert!(check_matcap_size(4096 * 4 * 4, 4096, 4, 4096).is_ok());

        // Well-formed but larger than the device allows
        let err = check_matcap_size(4097 * 4, 4097, 1, 4096).unwrap_err();
        assert!(err.contains("4096"));
        assert!(check_matcap_size(8 * 5000 * 4, 8, 5000, 4096).is_err());

        assert!(check_matcap_size(0, 0, 16, 4096).is_err());
        assert!(check_matcap_size(15, 2, 2, 4096).is_err());
    }
}
