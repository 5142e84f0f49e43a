//! # Primitive Shape Generation
//!
//! This module contains functions to generate the primitive shapes scattered
//! through the demo scene. All shapes are generated with outward normals and
//! counter-clockwise winding, Y up.

use super::GeometryData;
use std::f32::consts::PI;

/// Generate a box centered at the origin
///
/// # Arguments
/// * `width` - Extent along X
/// * `height` - Extent along Y
/// * `depth` - Extent along Z
///
/// Each face has its own four vertices so normals stay flat.
pub fn generate_box(width: f32, height: f32, depth: f32) -> GeometryData {
    let mut data = GeometryData::new();

    let (hx, hy, hz) = (width * 0.5, height * 0.5, depth * 0.5);

    #[rustfmt::skip]
    let positions = [
        // Front face
        [-hx, -hy,  hz], [ hx, -hy,  hz], [ hx,  hy,  hz], [-hx,  hy,  hz],
        // Back face
        [-hx, -hy, -hz], [-hx,  hy, -hz], [ hx,  hy, -hz], [ hx, -hy, -hz],
        // Left face
        [-hx, -hy, -hz], [-hx, -hy,  hz], [-hx,  hy,  hz], [-hx,  hy, -hz],
        // Right face
        [ hx, -hy,  hz], [ hx, -hy, -hz], [ hx,  hy, -hz], [ hx,  hy,  hz],
        // Top face
        [-hx,  hy,  hz], [ hx,  hy,  hz], [ hx,  hy, -hz], [-hx,  hy, -hz],
        // Bottom face
        [-hx, -hy, -hz], [ hx, -hy, -hz], [ hx, -hy,  hz], [-hx, -hy,  hz],
    ];

    let face_normals = [
        [0.0, 0.0, 1.0],
        [0.0, 0.0, -1.0],
        [-1.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, -1.0, 0.0],
    ];

    for (face, normal) in face_normals.iter().enumerate() {
        let base = (face * 4) as u32;
        for corner in 0..4 {
            data.push_vertex(positions[face * 4 + corner], *normal);
        }
        // 2 triangles per face
        data.push_triangle(base, base + 1, base + 2);
        data.push_triangle(base + 2, base + 3, base);
    }

    data
}

/// Generate a UV sphere
///
/// # Arguments
/// * `radius` - Sphere radius
/// * `width_segments` - Number of segments around the Y axis (longitude lines)
/// * `height_segments` - Number of segments from pole to pole (latitude lines)
///
/// The degenerate triangles at the poles are skipped, so the sphere has
/// `2 * width * height - 2 * width` triangles.
pub fn generate_sphere(radius: f32, width_segments: u32, height_segments: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let width_segs = width_segments.max(3);
    let height_segs = height_segments.max(2);

    // Generate vertices
    for iy in 0..=height_segs {
        let v = iy as f32 / height_segs as f32;
        let theta = v * PI; // 0 to PI
        let (sin_theta, cos_theta) = theta.sin_cos();

        for ix in 0..=width_segs {
            let u = ix as f32 / width_segs as f32;
            let phi = u * 2.0 * PI; // 0 to 2*PI
            let (sin_phi, cos_phi) = phi.sin_cos();

            let x = -cos_phi * sin_theta;
            let y = cos_theta;
            let z = sin_phi * sin_theta;

            // Normal is the unit direction for a sphere centered at the origin
            data.push_vertex([x * radius, y * radius, z * radius], [x, y, z]);
        }
    }

    // Generate indices
    let row = width_segs + 1;
    for iy in 0..height_segs {
        for ix in 0..width_segs {
            let a = iy * row + ix + 1;
            let b = iy * row + ix;
            let c = (iy + 1) * row + ix;
            let d = (iy + 1) * row + ix + 1;

            if iy != 0 {
                data.push_triangle(a, b, d);
            }
            if iy != height_segs - 1 {
                data.push_triangle(b, c, d);
            }
        }
    }

    data
}

/// Generate a torus lying in the XY plane
///
/// # Arguments
/// * `radius` - Distance from the center of the torus to the center of the tube
/// * `tube` - Radius of the tube
/// * `radial_segments` - Segments around the tube cross-section
/// * `tubular_segments` - Segments around the ring
pub fn generate_torus(
    radius: f32,
    tube: f32,
    radial_segments: u32,
    tubular_segments: u32,
) -> GeometryData {
    let mut data = GeometryData::new();

    let radial_segs = radial_segments.max(3);
    let tubular_segs = tubular_segments.max(3);

    for j in 0..=radial_segs {
        let v = j as f32 / radial_segs as f32 * 2.0 * PI;
        let (sin_v, cos_v) = v.sin_cos();

        for i in 0..=tubular_segs {
            let u = i as f32 / tubular_segs as f32 * 2.0 * PI;
            let (sin_u, cos_u) = u.sin_cos();

            let position = [
                (radius + tube * cos_v) * cos_u,
                (radius + tube * cos_v) * sin_u,
                tube * sin_v,
            ];

            // Normal points from the tube's center line to the vertex
            let normal = [cos_v * cos_u, cos_v * sin_u, sin_v];

            data.push_vertex(position, normal);
        }
    }

    let row = tubular_segs + 1;
    for j in 1..=radial_segs {
        for i in 1..=tubular_segs {
            let a = row * j + i - 1;
            let b = row * (j - 1) + i - 1;
            let c = row * (j - 1) + i;
            let d = row * j + i;

            data.push_triangle(a, b, d);
            data.push_triangle(b, c, d);
        }
    }

    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn length(v: [f32; 3]) -> f32 {
        (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
    }

    #[test]
    fn test_box_generation() {
        let cube = generate_box(0.6, 0.6, 0.6);
        assert_eq!(cube.vertices.len(), 24); // 6 faces * 4 vertices
        assert_eq!(cube.indices.len(), 36); // 6 faces * 2 triangles * 3 indices
        assert_eq!(cube.triangle_count(), 12);

        let (min, max) = cube.bounding_box().unwrap();
        assert_relative_eq!(min[0], -0.3);
        assert_relative_eq!(max[2], 0.3);
    }

    #[test]
    fn test_box_winding_matches_normals() {
        let cube = generate_box(1.0, 2.0, 3.0);
        for tri in cube.indices.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| cube.vertices[i as usize]);
            let e1 = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
            let e2 = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
            let face = [
                e1[1] * e2[2] - e1[2] * e2[1],
                e1[2] * e2[0] - e1[0] * e2[2],
                e1[0] * e2[1] - e1[1] * e2[0],
            ];
            let n = cube.normals[tri[0] as usize];
            let dot = face[0] * n[0] + face[1] * n[1] + face[2] * n[2];
            assert!(dot > 0.0, "triangle {:?} winds against its normal", tri);
        }
    }

    #[test]
    fn test_sphere_generation() {
        let sphere = generate_sphere(0.4, 20, 45);
        assert_eq!(sphere.vertex_count(), 21 * 46);
        assert_eq!(sphere.triangle_count(), 2 * 20 * 45 - 2 * 20);
        assert_eq!(sphere.vertices.len(), sphere.normals.len());

        for (p, n) in sphere.vertices.iter().zip(&sphere.normals) {
            assert_relative_eq!(length(*p), 0.4, epsilon = 1e-5);
            assert_relative_eq!(length(*n), 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_torus_generation() {
        let torus = generate_torus(0.3, 0.15, 20, 45);
        assert_eq!(torus.vertex_count(), 21 * 46);
        assert_eq!(torus.triangle_count(), 2 * 20 * 45);

        let (min, max) = torus.bounding_box().unwrap();
        assert_relative_eq!(max[0], 0.45, epsilon = 1e-5);
        assert_relative_eq!(min[2], -0.15, epsilon = 1e-3);
        assert_relative_eq!(max[2], 0.15, epsilon = 1e-3);
    }

    #[test]
    fn test_segment_counts_are_clamped() {
        let sphere = generate_sphere(1.0, 0, 0);
        assert_eq!(sphere.vertex_count(), 4 * 3);
        let torus = generate_torus(1.0, 0.5, 1, 1);
        assert_eq!(torus.triangle_count(), 2 * 3 * 3);
    }
}
