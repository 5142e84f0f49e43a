//! Matcap materials
//!
//! A material names the matcap texture it samples. Materials are stored in
//! [`MaterialManager`] and objects reference them by name, so changing a
//! material's texture affects every object using it on the next frame.
//! GPU bind groups live with the renderer, keyed by [`TextureId`].

use std::collections::HashMap;

/// Material ID for referencing materials
pub type MaterialId = String;

/// Name of the material the manager always provides
pub const DEFAULT_MATERIAL: &str = "default";

/// Index of a matcap texture slot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub usize);

/// Matcap material: a name and the texture slot it samples
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    pub matcap: TextureId,
}

impl Default for Material {
    fn default() -> Self {
        Self::new(DEFAULT_MATERIAL, TextureId::default())
    }
}

impl Material {
    pub fn new(name: &str, matcap: TextureId) -> Self {
        Self {
            name: name.to_string(),
            matcap,
        }
    }

    /// Builder pattern: set the matcap texture
    pub fn with_matcap(mut self, matcap: TextureId) -> Self {
        self.matcap = matcap;
        self
    }
}

/// Manages all materials in the scene
///
/// Always holds a default material, used as the fallback for objects whose
/// material name is unknown.
pub struct MaterialManager {
    materials: HashMap<MaterialId, Material>,
    default_material: Material,
}

impl Default for MaterialManager {
    fn default() -> Self {
        Self::new()
    }
}

impl MaterialManager {
    pub fn new() -> Self {
        Self {
            materials: HashMap::new(),
            default_material: Material::default(),
        }
    }

    /// Adds a material, replacing any material with the same name
    pub fn add_material(&mut self, material: Material) -> MaterialId {
        let id = material.name.clone();
        if id == DEFAULT_MATERIAL {
            self.default_material = material;
        } else if self.materials.insert(id.clone(), material).is_some() {
            log::debug!("Replaced material '{}'", id);
        }
        id
    }

    pub fn get_material(&self, id: &str) -> Option<&Material> {
        if id == DEFAULT_MATERIAL {
            return Some(&self.default_material);
        }
        self.materials.get(id)
    }

    pub fn get_material_mut(&mut self, id: &str) -> Option<&mut Material> {
        if id == DEFAULT_MATERIAL {
            return Some(&mut self.default_material);
        }
        self.materials.get_mut(id)
    }

    /// Gets material for an object with fallback to default
    pub fn get_material_for_object(&self, material_id: &str) -> &Material {
        self.get_material(material_id)
            .unwrap_or(&self.default_material)
    }

    /// Points a material at another matcap texture
    ///
    /// Returns false if no material has this name.
    pub fn set_matcap(&mut self, id: &str, matcap: TextureId) -> bool {
        match self.get_material_mut(id) {
            Some(material) => {
                material.matcap = matcap;
                true
            }
            None => false,
        }
    }

    /// Number of materials; the default always counts, so this is at least 1
    pub fn material_count(&self) -> usize {
        self.materials.len() + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_falls_back_to_default() {
        let mut manager = MaterialManager::new();
        manager.add_material(Material::new("matcap", TextureId(3)));

        assert_eq!(manager.get_material_for_object("matcap").matcap, TextureId(3));
        assert_eq!(manager.get_material_for_object("missing").name, DEFAULT_MATERIAL);
        assert_eq!(manager.material_count(), 2);
    }

    #[test]
    fn test_set_matcap() {
        let mut manager = MaterialManager::new();
        let id = manager.add_material(Material::default().with_matcap(TextureId(1)));
        assert_eq!(id, DEFAULT_MATERIAL);
        assert_eq!(manager.get_material(&id).unwrap().matcap, TextureId(1));
        assert_eq!(manager.material_count(), 1);

        let id = manager.add_material(Material::new("shared", TextureId(0)));
        assert!(manager.set_matcap(&id, TextureId(4)));
        assert_eq!(manager.get_material(&id).unwrap().matcap, TextureId(4));
        assert!(!manager.set_matcap("nope", TextureId(1)));
    }
}
