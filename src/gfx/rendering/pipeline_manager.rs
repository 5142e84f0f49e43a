//! Render pipeline creation
//!
//! Pipelines are described by a [`PipelineConfig`], registered under a name
//! and built together once the device is ready. Shaders must expose
//! `vs_main` and `fs_main`.

use std::{collections::HashMap, sync::Arc};
use wgpu::*;

use crate::{
    error::{Result, TextscapeError},
    gfx::scene::vertex::Vertex3D,
};

/// Everything needed to build one render pipeline
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub label: String,
    pub shader: String,
    pub bind_group_layouts: Vec<BindGroupLayout>,
    pub vertex_buffers: Vec<VertexBufferLayout<'static>>,
    pub cull_mode: Option<Face>,
    pub depth_format: Option<TextureFormat>,
    pub color_targets: Vec<Option<ColorTargetState>>,
}

impl PipelineConfig {
    /// Triangle list with back-face culling, no depth test and one
    /// `Bgra8Unorm` target; adjust with the builder methods
    pub fn default_with_shader(shader: &str) -> Self {
        Self {
            label: format!("{} Pipeline", shader),
            shader: shader.to_string(),
            bind_group_layouts: Vec::new(),
            vertex_buffers: vec![Vertex3D::desc()],
            cull_mode: Some(Face::Back),
            depth_format: None,
            color_targets: vec![Some(ColorTargetState {
                format: TextureFormat::Bgra8Unorm,
                blend: Some(BlendState::REPLACE),
                write_mask: ColorWrites::ALL,
            })],
        }
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = label.to_owned();
        self
    }

    pub fn with_cull_mode(mut self, face: Option<Face>) -> Self {
        self.cull_mode = face;
        self
    }

    /// Bind group layouts in group order
    pub fn with_bind_group_layouts(mut self, layouts: Vec<BindGroupLayout>) -> Self {
        self.bind_group_layouts = layouts;
        self
    }

    /// Vertex buffer layouts, one per vertex buffer slot
    pub fn with_vertex_buffers(mut self, buffers: Vec<VertexBufferLayout<'static>>) -> Self {
        self.vertex_buffers = buffers;
        self
    }

    /// Enables depth testing against a depth buffer of this format
    pub fn with_depth_format(mut self, format: TextureFormat) -> Self {
        self.depth_format = Some(format);
        self
    }

    pub fn with_color_targets(mut self, targets: Vec<Option<ColorTargetState>>) -> Self {
        self.color_targets = targets;
        self
    }
}

/// Named shaders and the pipelines built from them
pub struct PipelineManager {
    device: Arc<Device>,
    shader_modules: HashMap<String, ShaderModule>,
    configs: HashMap<String, PipelineConfig>,
    pipelines: HashMap<String, RenderPipeline>,
}

impl PipelineManager {
    pub fn new(device: Arc<Device>) -> Self {
        Self {
            device,
            shader_modules: HashMap::new(),
            configs: HashMap::new(),
            pipelines: HashMap::new(),
        }
    }

    /// Compiles a WGSL shader module under `name`
    pub fn load_shader(&mut self, name: &str, source: &str) {
        let module = self.device.create_shader_module(ShaderModuleDescriptor {
            label: Some(name),
            source: ShaderSource::Wgsl(source.into()),
        });
        self.shader_modules.insert(name.to_string(), module);
    }

    /// Registers a pipeline to be built by [`Self::create_all_pipelines`]
    pub fn register_pipeline(&mut self, name: &str, config: PipelineConfig) {
        self.configs.insert(name.to_string(), config);
    }

    /// Builds every registered pipeline that does not exist yet
    ///
    /// Fails on the first pipeline whose shader was never loaded.
    pub fn create_all_pipelines(&mut self) -> Result<()> {
        let pending: Vec<String> = self
            .configs
            .keys()
            .filter(|name| !self.pipelines.contains_key(*name))
            .cloned()
            .collect();

        for name in pending {
            let pipeline = self.build(&name, &self.configs[&name])?;
            self.pipelines.insert(name, pipeline);
        }
        Ok(())
    }

    pub fn pipeline(&self, name: &str) -> Option<&RenderPipeline> {
        self.pipelines.get(name)
    }

    /// Number of built pipelines
    pub fn pipeline_count(&self) -> usize {
        self.pipelines.len()
    }

    fn build(&self, name: &str, config: &PipelineConfig) -> Result<RenderPipeline> {
        let shader = self.shader_modules.get(&config.shader).ok_or_else(|| {
            TextscapeError::GpuSetup(format!(
                "pipeline '{}' uses unknown shader '{}'",
                name, config.shader
            ))
        })?;

        let layouts: Vec<&BindGroupLayout> = config.bind_group_layouts.iter().collect();
        let pipeline_layout = self
            .device
            .create_pipeline_layout(&PipelineLayoutDescriptor {
                label: Some(&format!("{} Layout", name)),
                bind_group_layouts: &layouts,
                push_constant_ranges: &[],
            });

        let depth_stencil = config.depth_format.map(|format| DepthStencilState {
            format,
            depth_write_enabled: true,
            depth_compare: CompareFunction::Less,
            stencil: StencilState::default(),
            bias: DepthBiasState::default(),
        });

        let pipeline = self
            .device
            .create_render_pipeline(&RenderPipelineDescriptor {
                label: Some(&config.label),
                layout: Some(&pipeline_layout),
                vertex: VertexState {
                    module: shader,
                    entry_point: Some("vs_main"),
                    buffers: &config.vertex_buffers,
                    compilation_options: PipelineCompilationOptions::default(),
                },
                fragment: Some(FragmentState {
                    module: shader,
                    entry_point: Some("fs_main"),
                    targets: &config.color_targets,
                    compilation_options: PipelineCompilationOptions::default(),
                }),
                primitive: PrimitiveState {
                    topology: PrimitiveTopology::TriangleList,
                    front_face: FrontFace::Ccw,
                    cull_mode: config.cull_mode,
                    ..Default::default()
                },
                depth_stencil,
                multisample: MultisampleState::default(),
                multiview: None,
                cache: None,
            });

        log::debug!("Created pipeline '{}'", name);
        Ok(pipeline)
    }
}
