use cgmath::Vector3;
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{DeviceEvent, DeviceId, ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes, WindowId},
};

use crate::{
    assets::{start_loading, AssetEvent, DemoEvent, MatcapImage},
    config::DemoConfig,
    demo::Demo,
    gfx::{
        camera::{
            camera_controller::{CameraController, DEFAULT_DAMPING},
            camera_utils::CameraManager,
            orbit_camera::OrbitCamera,
        },
        rendering::render_engine::RenderEngine,
        resources::material::TextureId,
        scene::Scene,
    },
    ui::{parameter_panel, PanelStatus, UiManager},
};

/// Initial camera position; the camera looks at the origin
const CAMERA_EYE: Vector3<f32> = Vector3::new(0.5, -1.0, 4.0);

pub struct TextscapeApp {
    event_loop: Option<EventLoop<DemoEvent>>,
    app_state: AppState,
}

struct AppState {
    config: DemoConfig,
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    ui_manager: Option<UiManager>,
    scene: Scene,
    demo: Demo,
    matcap_labels: Vec<String>,
    // Textures that finished decoding before the GPU was ready
    pending_matcaps: Vec<(TextureId, MatcapImage)>,
    setup_error: Option<anyhow::Error>,
}

impl TextscapeApp {
    /// Creates the event loop, the scene and the demo, and starts asset loading
    pub fn new(config: DemoConfig) -> anyhow::Result<Self> {
        let event_loop = EventLoop::<DemoEvent>::with_user_event().build()?;

        let (width, height) = config.window_size;
        let camera = OrbitCamera::from_eye(
            CAMERA_EYE,
            Vector3::new(0.0, 0.0, 0.0),
            width as f32 / height.max(1) as f32,
        );
        let controller = CameraController::new(0.005, 0.1).with_damping(DEFAULT_DAMPING);

        let mut scene = Scene::new(CameraManager::new(camera, controller));
        let demo = Demo::new(&config.text, &mut scene);

        let matcap_labels = config
            .matcap_paths
            .iter()
            .enumerate()
            .map(|(i, path)| {
                path.file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
                    .unwrap_or_else(|| format!("matcap {}", i + 1))
            })
            .collect();

        start_loading(&config, event_loop.create_proxy());

        Ok(Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                config,
                window: None,
                render_engine: None,
                ui_manager: None,
                scene,
                demo,
                matcap_labels,
                pending_matcaps: Vec::new(),
                setup_error: None,
            },
        })
    }

    /// Run the application (consumes self and starts the event loop)
    pub fn run(mut self) -> anyhow::Result<()> {
        let Some(event_loop) = self.event_loop.take() else {
            anyhow::bail!("Event loop already consumed");
        };
        event_loop.set_control_flow(ControlFlow::Wait);
        event_loop.run_app(&mut self.app_state)?;

        match self.app_state.setup_error.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl AppState {
    fn init_graphics(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let (width, height) = self.config.window_size;
        let window = event_loop.create_window(
            WindowAttributes::default()
                .with_title(self.config.window_title.clone())
                .with_inner_size(winit::dpi::LogicalSize::new(width, height)),
        )?;
        let window_handle = Arc::new(window);
        self.window = Some(window_handle.clone());

        let (width, height) = window_handle.inner_size().into();
        self.scene
            .camera_manager
            .camera
            .resize_projection(width, height);

        let window_clone = window_handle.clone();
        let mut renderer = pollster::block_on(async move {
            RenderEngine::new(window_clone, width, height).await
        })?;

        for (slot, image) in self.pending_matcaps.drain(..) {
            renderer.upload_matcap(slot, &image.rgba, image.width, image.height);
        }

        if self.config.show_panel {
            self.ui_manager = Some(UiManager::new(
                renderer.device(),
                renderer.queue(),
                renderer.surface_format(),
                &window_handle,
            ));
        }

        self.render_engine = Some(renderer);
        window_handle.request_redraw();
        Ok(())
    }

    fn handle_asset(&mut self, event: AssetEvent) {
        match event {
            AssetEvent::FontLoaded(font) => {
                log::debug!("Typeface ready ({} glyphs)", font.glyph_count());
                if let Err(e) = self
                    .demo
                    .on_font_loaded(font, &mut self.scene, &mut rand::rng())
                {
                    log::error!("Initial scene generation failed: {}", e);
                }
            }
            AssetEvent::FontFailed(error) => {
                log::error!("Failed to load typeface, scene stays empty: {}", error);
            }
            AssetEvent::MatcapLoaded { slot, image } => match self.render_engine.as_mut() {
                Some(renderer) => {
                    renderer.upload_matcap(slot, &image.rgba, image.width, image.height)
                }
                None => self.pending_matcaps.push((slot, image)),
            },
            AssetEvent::MatcapFailed { slot, error } => {
                log::error!("Failed to load matcap {}: {}", slot.0 + 1, error);
            }
        }
    }

    /// Animation step: texture, controls, camera uniform, one render
    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Self {
            window,
            render_engine,
            ui_manager,
            scene,
            demo,
            matcap_labels,
            ..
        } = self;
        let (Some(window), Some(render_engine)) = (window.as_ref(), render_engine.as_mut()) else {
            return;
        };

        demo.tick(scene);
        scene.update();
        render_engine.update(scene.camera_manager.camera.uniform);

        let status = PanelStatus {
            ready: demo.is_ready(),
            stats: scene.statistics(),
        };

        let result = match ui_manager.as_mut() {
            Some(ui_manager) => {
                let params = &mut demo.params;
                let labels: &[String] = matcap_labels;
                let mut request = None;
                let result = render_engine.render_frame_with_ui(
                    scene,
                    |device, queue, encoder, target| {
                        request = Some(ui_manager.draw(
                            device,
                            queue,
                            encoder,
                            window,
                            target,
                            |ui| parameter_panel(ui, params, labels, &status),
                        ));
                    },
                );
                if let Some(request) = request {
                    demo.request(request);
                }
                result
            }
            None => render_engine.render_frame_simple(scene),
        };

        match result {
            Ok(()) => {}
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Out of GPU memory, exiting");
                event_loop.exit();
                return;
            }
            Err(e) => log::warn!("Frame skipped: {}", e),
        }

        // Panel edits take effect between frames
        if let Err(e) = demo.apply_pending(scene, &mut rand::rng()) {
            log::error!("Regeneration failed: {}", e);
        }

        window.request_redraw();
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, event: &KeyEvent) {
        if event.state == ElementState::Pressed
            && event.physical_key == PhysicalKey::Code(KeyCode::Escape)
        {
            event_loop.exit();
            return;
        }
        self.scene.camera_manager.process_keyboard_event(event);
    }
}

impl ApplicationHandler<DemoEvent> for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(e) = self.init_graphics(event_loop) {
            log::error!("Graphics setup failed: {:#}", e);
            self.setup_error = Some(e);
            event_loop.exit();
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: DemoEvent) {
        match event {
            DemoEvent::Asset(asset) => self.handle_asset(asset),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = self.window.clone() else {
            return;
        };

        // Handle UI input first
        if let Some(ui_manager) = self.ui_manager.as_mut() {
            if ui_manager.handle_window_event(&window, window_id, &event) {
                return;
            }
        }

        match event {
            WindowEvent::KeyboardInput { event, .. } => self.handle_key(event_loop, &event),
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                self.scene
                    .camera_manager
                    .camera
                    .resize_projection(width, height);
                if let Some(render_engine) = self.render_engine.as_mut() {
                    render_engine.resize(width, height);
                }
                window.request_redraw();
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => (),
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        // Don't process camera events when the UI is active
        if self
            .ui_manager
            .as_ref()
            .is_some_and(|ui_manager| ui_manager.wants_input())
        {
            return;
        }

        self.scene.camera_manager.process_event(&event);
    }
}
