//! The extruded text object

use super::params::ParameterSet;
use crate::{
    error::{Result, TextscapeError},
    gfx::{
        geometry::text::generate_text,
        scene::{GeometryId, Object, ObjectId, Scene},
    },
};

/// The single text object in the scene, if any
#[derive(Debug, Default)]
pub struct TextInstance {
    object: Option<ObjectId>,
    geometry: Option<GeometryId>,
}

impl TextInstance {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn object(&self) -> Option<ObjectId> {
        self.object
    }

    pub fn geometry(&self) -> Option<GeometryId> {
        self.geometry
    }

    /// Detaches the text object and releases its geometry
    pub fn clear(&mut self, scene: &mut Scene) {
        if let Some(object) = self.object.take() {
            scene.remove_object(object);
        }
        if let Some(geometry) = self.geometry.take() {
            scene.remove_geometry(geometry);
        }
    }

    /// Builds centered text geometry and swaps it in for the previous text
    ///
    /// Fails with [`TextscapeError::FontNotLoaded`] before the typeface has
    /// arrived. The scene is left untouched on any error.
    pub fn generate(
        &mut self,
        params: &ParameterSet,
        text: &str,
        scene: &mut Scene,
        material: &str,
    ) -> Result<ObjectId> {
        let font = params.font.as_ref().ok_or(TextscapeError::FontNotLoaded)?;

        let mut data = generate_text(font, text, &params.text)?;
        data.center();

        self.clear(scene);
        let geometry = scene.add_geometry(&data);
        let object = scene.add_object(Object::new(geometry, material));
        self.geometry = Some(geometry);
        self.object = Some(object);

        log::debug!(
            "Generated text: {} vertices, {} triangles",
            data.vertex_count(),
            data.triangle_count()
        );
        Ok(object)
    }
}
