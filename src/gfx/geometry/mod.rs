//! # Procedural Geometry Generation
//!
//! This module provides the geometry factories used by the demo: the three
//! scattered primitives and extruded text. Everything is produced as plain
//! CPU-side [`GeometryData`]; GPU upload happens later through the scene's
//! geometry pool.
//!
//! ## Supported Shapes
//!
//! - **Box**: axis-aligned box with per-face normals
//! - **Sphere**: UV sphere with configurable radius and resolution
//! - **Torus**: ring with configurable radius, tube and resolution
//! - **Text**: extruded, optionally bevelled glyph outlines (see [`text`])
//!
//! ## Usage
//!
//! ```rust
//! use textscape::gfx::geometry::{generate_box, generate_sphere, generate_torus};
//!
//! let sphere = generate_sphere(0.4, 20, 45);
//! let cube = generate_box(0.6, 0.6, 0.6);
//! let donut = generate_torus(0.3, 0.15, 20, 45);
//! assert!(sphere.triangle_count() > 0 && cube.triangle_count() == 12 && donut.vertex_count() > 0);
//! ```

pub mod primitives;
pub mod text;

pub use primitives::*;

/// Represents generated geometry data ready for GPU upload
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices (counter-clockwise winding)
    pub indices: Vec<u32>,
}

impl GeometryData {
    /// Create a new empty geometry data structure
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            normals: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Get the number of vertices in this geometry
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of triangles in this geometry
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Appends a vertex and returns its index
    pub fn push_vertex(&mut self, position: [f32; 3], normal: [f32; 3]) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(position);
        self.normals.push(normal);
        index
    }

    /// Appends a triangle
    pub fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    /// Axis-aligned bounding box as `(min, max)`, or `None` for empty geometry
    pub fn bounding_box(&self) -> Option<([f32; 3], [f32; 3])> {
        let first = *self.vertices.first()?;
        let bounds = self.vertices.iter().fold((first, first), |(mut min, mut max), v| {
            for axis in 0..3 {
                min[axis] = min[axis].min(v[axis]);
                max[axis] = max[axis].max(v[axis]);
            }
            (min, max)
        });
        Some(bounds)
    }

    /// Moves every vertex by `offset`
    pub fn translate(&mut self, offset: [f32; 3]) {
        for v in &mut self.vertices {
            v[0] += offset[0];
            v[1] += offset[1];
            v[2] += offset[2];
        }
    }

    /// Centers the geometry on its bounding box
    ///
    /// Returns the offset that was applied.
    pub fn center(&mut self) -> [f32; 3] {
        let Some((min, max)) = self.bounding_box() else {
            return [0.0; 3];
        };
        let offset = [
            -0.5 * (min[0] + max[0]),
            -0.5 * (min[1] + max[1]),
            -0.5 * (min[2] + max[2]),
        ];
        self.translate(offset);
        offset
    }

    /// Convert to the interleaved vertex format used by the renderer
    pub fn to_scene_format(&self) -> (Vec<crate::gfx::scene::vertex::Vertex3D>, Vec<u32>) {
        use crate::gfx::scene::vertex::Vertex3D;

        let vertices: Vec<Vertex3D> = (0..self.vertices.len())
            .map(|i| Vertex3D {
                position: self.vertices[i],
                normal: self.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
            })
            .collect();

        (vertices, self.indices.clone())
    }
}

impl Default for GeometryData {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_center_makes_bounds_symmetric() {
        let mut data = generate_box(1.0, 2.0, 3.0);
        data.translate([4.0, -2.0, 7.5]);

        let offset = data.center();
        assert_relative_eq!(offset[0], -4.0);
        assert_relative_eq!(offset[1], 2.0);
        assert_relative_eq!(offset[2], -7.5);

        let (min, max) = data.bounding_box().unwrap();
        for axis in 0..3 {
            assert_relative_eq!(min[axis], -max[axis], epsilon = 1e-5);
        }
    }

    #[test]
    fn test_empty_geometry_has_no_bounds() {
        let mut data = GeometryData::new();
        assert!(data.bounding_box().is_none());
        assert_eq!(data.center(), [0.0; 3]);
    }

    #[test]
    fn test_scene_format_keeps_counts() {
        let data = generate_sphere(1.0, 8, 6);
        let (vertices, indices) = data.to_scene_format();
        assert_eq!(vertices.len(), data.vertex_count());
        assert_eq!(indices.len(), data.indices.len());
    }
}
