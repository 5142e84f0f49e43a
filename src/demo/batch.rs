//! Batches of scattered primitives
//!
//! A [`ShapeBatch`] owns one shared geometry in the scene's pool and tracks
//! the objects it created, so regenerating replaces exactly its own shapes.

use rand::Rng;

use super::{
    params::{Generator, ParameterSet},
    randomize::{randomize_position, randomize_rotation, randomize_scale},
};
use crate::gfx::{
    geometry::{generate_box, generate_sphere, generate_torus, GeometryData},
    scene::{GeometryId, Object, ObjectId, Scene, Transform},
};

const SPHERE_WIDTH_SEGMENTS: u32 = 20;
const SPHERE_HEIGHT_SEGMENTS: u32 = 45;
const DONUT_RADIAL_SEGMENTS: u32 = 20;
const DONUT_TUBULAR_SEGMENTS: u32 = 45;

/// Which primitive a batch scatters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Spheres,
    Boxes,
    Donuts,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 3] = [ShapeKind::Spheres, ShapeKind::Boxes, ShapeKind::Donuts];

    /// Builds the shared geometry from the current parameters
    pub fn geometry(self, params: &ParameterSet) -> GeometryData {
        match self {
            ShapeKind::Spheres => generate_sphere(
                params.sphere_radius,
                SPHERE_WIDTH_SEGMENTS,
                SPHERE_HEIGHT_SEGMENTS,
            ),
            ShapeKind::Boxes => generate_box(params.box_size, params.box_size, params.box_size),
            ShapeKind::Donuts => generate_torus(
                params.donut_size,
                params.donut_size * 0.5,
                DONUT_RADIAL_SEGMENTS,
                DONUT_TUBULAR_SEGMENTS,
            ),
        }
    }

    pub fn generator(self) -> Generator {
        match self {
            ShapeKind::Spheres => Generator::Spheres,
            ShapeKind::Boxes => Generator::Boxes,
            ShapeKind::Donuts => Generator::Donuts,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ShapeKind::Spheres => "spheres",
            ShapeKind::Boxes => "boxes",
            ShapeKind::Donuts => "donuts",
        }
    }
}

/// Instances per batch; the remainder of `item_count / 3` is dropped
pub fn instances_per_batch(item_count: u32) -> usize {
    (item_count / 3) as usize
}

/// The objects and geometry one shape kind has placed in the scene
#[derive(Debug)]
pub struct ShapeBatch {
    kind: ShapeKind,
    instances: Vec<ObjectId>,
    geometry: Option<GeometryId>,
}

impl ShapeBatch {
    pub fn new(kind: ShapeKind) -> Self {
        Self {
            kind,
            instances: Vec::new(),
            geometry: None,
        }
    }

    /// Ids of the objects currently placed by this batch
    pub fn instances(&self) -> &[ObjectId] {
        &self.instances
    }

    pub fn geometry(&self) -> Option<GeometryId> {
        self.geometry
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Detaches every tracked object and releases the shared geometry
    pub fn clear(&mut self, scene: &mut Scene) {
        for id in self.instances.drain(..) {
            scene.remove_object(id);
        }
        if let Some(geometry) = self.geometry.take() {
            scene.remove_geometry(geometry);
        }
    }

    /// Replaces this batch's shapes with a freshly randomized set
    ///
    /// Returns the number of objects placed.
    pub fn regenerate<R: Rng + ?Sized>(
        &mut self,
        params: &ParameterSet,
        scene: &mut Scene,
        material: &str,
        rng: &mut R,
    ) -> usize {
        self.clear(scene);

        let geometry = scene.add_geometry(&self.kind.geometry(params));
        self.geometry = Some(geometry);

        let count = instances_per_batch(params.item_count);
        self.instances.reserve(count);
        for _ in 0..count {
            let mut transform = Transform::default();
            randomize_position(&mut transform, rng);
            randomize_rotation(&mut transform, rng);
            randomize_scale(&mut transform, rng);

            let id = scene.add_object(Object::new(geometry, material).with_transform(transform));
            self.instances.push(id);
        }

        log::debug!("Regenerated {} {}", count, self.kind.label());
        count
    }
}
