use std::collections::BTreeMap;

use cgmath::Matrix4;
use slotmap::{new_key_type, SlotMap};
use wgpu::Device;

use crate::gfx::{
    camera::camera_utils::CameraManager,
    geometry::GeometryData,
    resources::material::{MaterialId, MaterialManager},
    scene::object::{Mesh, Object},
};

new_key_type! {
    /// Handle of an object in the scene
    pub struct ObjectId;
    /// Handle of a mesh in the scene's geometry pool
    pub struct GeometryId;
}

/// Visible instances sharing one geometry and one material
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceBatch {
    pub geometry: GeometryId,
    pub material: MaterialId,
    pub models: Vec<Matrix4<f32>>,
}

/// Main scene containing objects, the geometry pool, materials, and camera
pub struct Scene {
    pub camera_manager: CameraManager,
    pub material_manager: MaterialManager, // Centralized material storage
    objects: SlotMap<ObjectId, Object>,
    geometries: SlotMap<GeometryId, Mesh>,
}

impl Scene {
    /// Creates a new scene with the given camera manager
    pub fn new(camera_manager: CameraManager) -> Self {
        Self {
            camera_manager,
            material_manager: MaterialManager::new(),
            objects: SlotMap::with_key(),
            geometries: SlotMap::with_key(),
        }
    }

    /// Advances camera controls and refreshes the camera matrices
    pub fn update(&mut self) {
        self.camera_manager.update();
    }

    /// Moves geometry into the pool
    ///
    /// The mesh is uploaded on the next [`Scene::prepare_gpu`].
    pub fn add_geometry(&mut self, data: &GeometryData) -> GeometryId {
        self.geometries.insert(Mesh::from_geometry(data))
    }

    /// Releases geometry and its GPU buffers
    ///
    /// Objects still referencing it are skipped when drawing.
    pub fn remove_geometry(&mut self, id: GeometryId) -> bool {
        let removed = self.geometries.remove(id).is_some();
        let orphans = self.count_using(id);
        if removed && orphans > 0 {
            log::warn!("Released geometry still used by {} objects", orphans);
        }
        removed
    }

    pub fn geometry(&self, id: GeometryId) -> Option<&Mesh> {
        self.geometries.get(id)
    }

    pub fn add_object(&mut self, object: Object) -> ObjectId {
        self.objects.insert(object)
    }

    /// Detaches an object, returning it if it was present
    pub fn remove_object(&mut self, id: ObjectId) -> Option<Object> {
        self.objects.remove(id)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(id)
    }

    pub fn object(&self, id: ObjectId) -> Option<&Object> {
        self.objects.get(id)
    }

    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut Object> {
        self.objects.get_mut(id)
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn geometry_count(&self) -> usize {
        self.geometries.len()
    }

    /// Number of objects referencing the given geometry
    pub fn count_using(&self, geometry: GeometryId) -> usize {
        self.objects
            .values()
            .filter(|object| object.geometry == geometry)
            .count()
    }

    /// Uploads every mesh that has no GPU buffers yet
    ///
    /// Must be called after the GPU context is available and before rendering.
    pub fn prepare_gpu(&mut self, device: &Device) {
        for mesh in self.geometries.values_mut() {
            mesh.upload(device);
        }
    }

    /// Groups visible objects by (geometry, material)
    ///
    /// Objects whose geometry has been released are left out.
    pub fn instance_batches(&self) -> Vec<InstanceBatch> {
        let mut groups: BTreeMap<(GeometryId, &str), Vec<Matrix4<f32>>> = BTreeMap::new();

        for object in self.objects.values() {
            if !object.visible || !self.geometries.contains_key(object.geometry) {
                continue;
            }
            groups
                .entry((object.geometry, object.material.as_str()))
                .or_default()
                .push(object.transform.matrix());
        }

        groups
            .into_iter()
            .map(|((geometry, material), models)| InstanceBatch {
                geometry,
                material: material.to_string(),
                models,
            })
            .collect()
    }

    /// Gets statistics about the scene
    pub fn statistics(&self) -> SceneStatistics {
        let total_triangles = self
            .objects
            .values()
            .filter_map(|object| self.geometries.get(object.geometry))
            .map(|mesh| mesh.index_count() as usize / 3)
            .sum();

        SceneStatistics {
            object_count: self.objects.len(),
            geometry_count: self.geometries.len(),
            material_count: self.material_manager.material_count(),
            total_triangles,
        }
    }
}

/// Scene statistics for debugging and UI display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneStatistics {
    pub object_count: usize,
    pub geometry_count: usize,
    pub material_count: usize,
    pub total_triangles: usize,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::Scene;
    use crate::gfx::camera::{CameraController, CameraManager, OrbitCamera};
    use cgmath::Vector3;

    /// Scene with the demo camera and no GPU resources
    pub fn empty_scene() -> Scene {
        let camera = OrbitCamera::from_eye(
            Vector3::new(0.5, -1.0, 4.0),
            Vector3::new(0.0, 0.0, 0.0),
            1.5,
        );
        Scene::new(CameraManager::new(camera, CameraController::new(0.005, 0.1)))
    }
}
