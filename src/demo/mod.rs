//! # Demo State
//!
//! Ties the parameter set, the text object and the three shape batches to a
//! scene. The demo starts in [`DemoState::AwaitingFont`]; once the typeface
//! arrives it turns [`DemoState::Ready`] and builds text, spheres, boxes and
//! donuts in that order. Later edits queue a [`RegenerationRequest`] which is
//! applied between frames.

pub mod batch;
pub mod params;
pub mod randomize;
pub mod text;

pub use batch::{instances_per_batch, ShapeBatch, ShapeKind};
pub use params::{FieldRange, Generator, ParamField, ParameterSet, RegenerationRequest};
pub use text::TextInstance;

use std::sync::Arc;

use rand::Rng;

use crate::{
    error::Result,
    gfx::{
        resources::material::{Material, MaterialId},
        scene::Scene,
        typeface::Font,
    },
};

/// Name of the material shared by the text and every shape
pub const SHARED_MATERIAL: &str = "matcap";

/// Lifecycle of the demo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoState {
    /// No generator may run until the typeface has loaded
    AwaitingFont,
    Ready,
}

/// All demo content placed in a scene
pub struct Demo {
    state: DemoState,
    pub params: ParameterSet,
    text: String,
    material: MaterialId,
    text_instance: TextInstance,
    spheres: ShapeBatch,
    boxes: ShapeBatch,
    donuts: ShapeBatch,
    pending: RegenerationRequest,
}

impl Demo {
    /// Registers the shared material with the scene
    pub fn new(text: &str, scene: &mut Scene) -> Self {
        let params = ParameterSet::default();
        let material = scene
            .material_manager
            .add_material(Material::new(SHARED_MATERIAL, params.texture));

        Self {
            state: DemoState::AwaitingFont,
            params,
            text: text.to_string(),
            material,
            text_instance: TextInstance::new(),
            spheres: ShapeBatch::new(ShapeKind::Spheres),
            boxes: ShapeBatch::new(ShapeKind::Boxes),
            donuts: ShapeBatch::new(ShapeKind::Donuts),
            pending: RegenerationRequest::none(),
        }
    }

    pub fn state(&self) -> DemoState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == DemoState::Ready
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn material(&self) -> &str {
        &self.material
    }

    pub fn text_instance(&self) -> &TextInstance {
        &self.text_instance
    }

    pub fn batch(&self, kind: ShapeKind) -> &ShapeBatch {
        match kind {
            ShapeKind::Spheres => &self.spheres,
            ShapeKind::Boxes => &self.boxes,
            ShapeKind::Donuts => &self.donuts,
        }
    }

    /// Stores the typeface, enters `Ready` and builds everything once
    pub fn on_font_loaded<R: Rng + ?Sized>(
        &mut self,
        font: Arc<Font>,
        scene: &mut Scene,
        rng: &mut R,
    ) -> Result<()> {
        self.params.font = Some(font);
        if self.state == DemoState::AwaitingFont {
            log::info!("Typeface ready, building scene");
            self.state = DemoState::Ready;
        }
        self.pending = RegenerationRequest::none();
        self.apply(RegenerationRequest::all(), scene, rng)
    }

    /// Queues generators to rerun after the current frame
    pub fn request(&mut self, request: RegenerationRequest) {
        self.pending.merge(request);
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Runs queued generators
    ///
    /// Requests made before the typeface loaded are dropped; loading rebuilds
    /// everything anyway.
    pub fn apply_pending<R: Rng + ?Sized>(&mut self, scene: &mut Scene, rng: &mut R) -> Result<()> {
        let request = std::mem::take(&mut self.pending);
        if request.is_empty() {
            return Ok(());
        }
        if !self.is_ready() {
            log::debug!("Dropping regeneration request while awaiting the typeface");
            return Ok(());
        }
        self.apply(request, scene, rng)
    }

    /// Runs the requested generators in order (text, spheres, boxes, donuts)
    ///
    /// Every requested generator runs even if an earlier one fails; the first
    /// error is returned.
    pub fn apply<R: Rng + ?Sized>(
        &mut self,
        request: RegenerationRequest,
        scene: &mut Scene,
        rng: &mut R,
    ) -> Result<()> {
        if !self.is_ready() {
            return Ok(());
        }

        let mut result = Ok(());
        for generator in request.generators() {
            if let Err(e) = self.run(generator, scene, rng) {
                log::error!("{:?} generation failed: {}", generator, e);
                if result.is_ok() {
                    result = Err(e);
                }
            }
        }
        result
    }

    fn run<R: Rng + ?Sized>(
        &mut self,
        generator: Generator,
        scene: &mut Scene,
        rng: &mut R,
    ) -> Result<()> {
        let kind = match generator {
            Generator::Text => {
                self.text_instance
                    .generate(&self.params, &self.text, scene, &self.material)?;
                return Ok(());
            }
            Generator::Spheres => ShapeKind::Spheres,
            Generator::Boxes => ShapeKind::Boxes,
            Generator::Donuts => ShapeKind::Donuts,
        };

        let batch = match kind {
            ShapeKind::Spheres => &mut self.spheres,
            ShapeKind::Boxes => &mut self.boxes,
            ShapeKind::Donuts => &mut self.donuts,
        };
        batch.regenerate(&self.params, scene, &self.material, rng);
        Ok(())
    }

    /// Per-frame step: applies the selected matcap to the shared material
    pub fn tick(&mut self, scene: &mut Scene) {
        if !scene
            .material_manager
            .set_matcap(&self.material, self.params.texture)
        {
            log::warn!("Shared material '{}' is missing", self.material);
        }
    }
}
