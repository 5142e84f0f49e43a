//! # Extruded Text Geometry
//!
//! Builds a closed, flat-shaded mesh from laid-out glyph contours. Each glyph
//! is extruded along +Z into a stack of layers; bevelled text adds rounded
//! rings of progressively inset layers in front of and behind the body.
//!
//! Layer layout for `n` bevel segments, with `t = b / n`:
//!
//! | layers | z | inset |
//! |---|---|---|
//! | front, `b = 0..n` | `-thickness * cos(t·π/2)` | `size * sin(t·π/2) + offset` |
//! | body | `0`, `depth` | `size + offset` |
//! | back, `b = n-1..=0` | `depth + thickness * cos(t·π/2)` | as front |
//!
//! The first and last layer are closed with caps triangulated by lyon.

use std::f32::consts::{FRAC_PI_2, SQRT_2};

use lyon::math::point as lyon_point;
use lyon::path::{FillRule, Path};
use lyon::tessellation::{BuffersBuilder, FillOptions, FillTessellator, FillVertex, VertexBuffers};

use super::GeometryData;
use crate::error::{Result, TextscapeError};
use crate::gfx::typeface::{layout_text, Font, GlyphContours};

/// Below this length a normal or edge is considered degenerate
const EPSILON: f32 = 1e-7;

/// Text extrusion parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextParams {
    /// Glyph height in scene units per em
    pub size: f32,
    /// Extrusion depth of the body
    pub depth: f32,
    /// Line segments per outline curve
    pub curve_segments: u32,
    pub bevel_enabled: bool,
    /// How far the bevel extends in front of and behind the body
    pub bevel_thickness: f32,
    /// How far the body extends outside the glyph outline
    pub bevel_size: f32,
    /// Extra outline offset applied to every bevel ring
    pub bevel_offset: f32,
    pub bevel_segments: u32,
}

impl Default for TextParams {
    fn default() -> Self {
        Self {
            size: 0.5,
            depth: 0.5,
            curve_segments: 5,
            bevel_enabled: true,
            bevel_thickness: 0.03,
            bevel_size: 0.02,
            bevel_offset: 0.0,
            bevel_segments: 4,
        }
    }
}

impl TextParams {
    /// `(z, inset)` for every layer, front to back
    fn layers(&self) -> Vec<(f32, f32)> {
        if !self.bevel_enabled {
            return vec![(0.0, 0.0), (self.depth, 0.0)];
        }

        let segments = self.bevel_segments.max(1);
        let ring = |b: u32| {
            let t = b as f32 / segments as f32;
            let angle = t * FRAC_PI_2;
            (
                self.bevel_thickness * angle.cos(),
                self.bevel_size * angle.sin() + self.bevel_offset,
            )
        };

        let mut layers = Vec::with_capacity(2 * segments as usize + 2);
        for b in 0..segments {
            let (z, inset) = ring(b);
            layers.push((-z, inset));
        }
        let body = self.bevel_size + self.bevel_offset;
        layers.push((0.0, body));
        layers.push((self.depth, body));
        for b in (0..segments).rev() {
            let (z, inset) = ring(b);
            layers.push((self.depth + z, inset));
        }
        layers
    }
}

/// Generates extruded text geometry for `text`
///
/// The result is not centered; see [`GeometryData::center`]. Glyphs whose
/// caps cannot be triangulated fail with [`TextscapeError::InvalidOutline`].
pub fn generate_text(font: &Font, text: &str, params: &TextParams) -> Result<GeometryData> {
    let mut data = GeometryData::new();
    let layers = params.layers();
    let mut tessellator = FillTessellator::new();

    for glyph in layout_text(font, text, params.size, params.curve_segments) {
        extrude_glyph(&mut data, &mut tessellator, &glyph, &layers)?;
    }

    log::debug!(
        "Generated text geometry: {} vertices, {} triangles",
        data.vertex_count(),
        data.triangle_count()
    );
    Ok(data)
}

/// A contour with its per-point miter vectors
struct Outline {
    points: Vec<[f32; 2]>,
    miters: Vec<[f32; 2]>,
}

impl Outline {
    fn at(&self, i: usize, inset: f32) -> [f32; 2] {
        let (p, m) = (self.points[i], self.miters[i]);
        [p[0] + m[0] * inset, p[1] + m[1] * inset]
    }

    fn len(&self) -> usize {
        self.points.len()
    }
}

fn extrude_glyph(
    data: &mut GeometryData,
    tessellator: &mut FillTessellator,
    glyph: &GlyphContours,
    layers: &[(f32, f32)],
) -> Result<()> {
    let outlines: Vec<Outline> = orient_contours(&glyph.contours)
        .into_iter()
        .map(|points| Outline {
            miters: miter_vectors(&points),
            points,
        })
        .collect();

    // Side walls
    for outline in &outlines {
        for pair in layers.windows(2) {
            let (z0, inset0) = pair[0];
            let (z1, inset1) = pair[1];
            for i in 0..outline.len() {
                let j = (i + 1) % outline.len();
                let lift = |p: [f32; 2], z: f32| [p[0], p[1], z];
                let a = lift(outline.at(i, inset0), z0);
                let b = lift(outline.at(j, inset0), z0);
                let c = lift(outline.at(j, inset1), z1);
                let d = lift(outline.at(i, inset1), z1);
                push_quad(data, a, b, c, d);
            }
        }
    }

    // Caps
    let (Some(&(front_z, front_inset)), Some(&(back_z, back_inset))) =
        (layers.first(), layers.last())
    else {
        return Ok(());
    };
    push_cap(data, tessellator, glyph.ch, &outlines, front_z, front_inset, -1.0)?;
    push_cap(data, tessellator, glyph.ch, &outlines, back_z, back_inset, 1.0)?;

    Ok(())
}

/// Orients solid contours counter-clockwise and holes clockwise
///
/// A contour is a hole when its first point lies inside an odd number of the
/// glyph's other contours.
fn orient_contours(contours: &[Vec<[f32; 2]>]) -> Vec<Vec<[f32; 2]>> {
    contours
        .iter()
        .enumerate()
        .map(|(i, contour)| {
            let probe = contour[0];
            let depth = contours
                .iter()
                .enumerate()
                .filter(|&(j, other)| j != i && contains_point(other, probe))
                .count();
            let is_hole = depth % 2 == 1;
            let is_ccw = signed_area(contour) > 0.0;

            let mut oriented = contour.clone();
            if is_hole == is_ccw {
                oriented.reverse();
            }
            oriented
        })
        .collect()
}

/// Shoelace area, positive for counter-clockwise polygons
fn signed_area(points: &[[f32; 2]]) -> f32 {
    let n = points.len();
    (0..n)
        .map(|i| {
            let (p, q) = (points[i], points[(i + 1) % n]);
            p[0] * q[1] - q[0] * p[1]
        })
        .sum::<f32>()
        * 0.5
}

/// Even-odd ray casting test
fn contains_point(polygon: &[[f32; 2]], p: [f32; 2]) -> bool {
    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let (a, b) = (polygon[i], polygon[j]);
        if (a[1] > p[1]) != (b[1] > p[1]) {
            let x = a[0] + (p[1] - a[1]) / (b[1] - a[1]) * (b[0] - a[0]);
            if p[0] < x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Outward normal of the edge `from -> to` (solid on the left)
fn edge_normal(from: [f32; 2], to: [f32; 2]) -> [f32; 2] {
    let (dx, dy) = (to[0] - from[0], to[1] - from[1]);
    let len = (dx * dx + dy * dy).sqrt();
    if len < EPSILON {
        return [0.0, 0.0];
    }
    [dy / len, -dx / len]
}

/// Per-point offset directions that move both adjacent edges by one unit
fn miter_vectors(points: &[[f32; 2]]) -> Vec<[f32; 2]> {
    let n = points.len();
    (0..n)
        .map(|i| {
            let prev = points[(i + n - 1) % n];
            let next = points[(i + 1) % n];
            let n_in = edge_normal(prev, points[i]);
            let n_out = edge_normal(points[i], next);

            let sum = [n_in[0] + n_out[0], n_in[1] + n_out[1]];
            let len = (sum[0] * sum[0] + sum[1] * sum[1]).sqrt();
            if len < EPSILON {
                // Edge folds back onto itself
                return n_in;
            }
            let dir = [sum[0] / len, sum[1] / len];
            let cos = dir[0] * n_in[0] + dir[1] * n_in[1];
            let scale = if cos > EPSILON { (1.0 / cos).min(SQRT_2) } else { SQRT_2 };
            [dir[0] * scale, dir[1] * scale]
        })
        .collect()
}

fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

/// Flat-shaded quad `a b c d`, skipped when degenerate
fn push_quad(data: &mut GeometryData, a: [f32; 3], b: [f32; 3], c: [f32; 3], d: [f32; 3]) {
    let n = cross(sub(c, a), sub(d, b));
    let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
    if len < EPSILON {
        return;
    }
    let normal = [n[0] / len, n[1] / len, n[2] / len];

    let ia = data.push_vertex(a, normal);
    let ib = data.push_vertex(b, normal);
    let ic = data.push_vertex(c, normal);
    let id = data.push_vertex(d, normal);
    data.push_triangle(ia, ib, ic);
    data.push_triangle(ic, id, ia);
}

/// Triangulates one cap layer of a glyph facing `facing` along Z
fn push_cap(
    data: &mut GeometryData,
    tessellator: &mut FillTessellator,
    ch: char,
    outlines: &[Outline],
    z: f32,
    inset: f32,
    facing: f32,
) -> Result<()> {
    // Solids wind counter-clockwise and holes clockwise, so non-zero filling
    // keeps overlapping offset solids filled
    let mut builder = Path::builder();
    for outline in outlines {
        let first = outline.at(0, inset);
        builder.begin(lyon_point(first[0], first[1]));
        for i in 1..outline.len() {
            let p = outline.at(i, inset);
            builder.line_to(lyon_point(p[0], p[1]));
        }
        builder.end(true);
    }
    let path = builder.build();

    let mut buffers: VertexBuffers<[f32; 2], u32> = VertexBuffers::new();
    tessellator
        .tessellate_path(
            &path,
            &FillOptions::default().with_fill_rule(FillRule::NonZero),
            &mut BuffersBuilder::new(&mut buffers, |vertex: FillVertex| {
                vertex.position().to_array()
            }),
        )
        .map_err(|err| TextscapeError::InvalidOutline {
            glyph: ch,
            reason: format!("cap triangulation failed: {:?}", err),
        })?;

    let normal = [0.0, 0.0, facing];
    let base = data.vertex_count() as u32;
    for p in &buffers.vertices {
        data.push_vertex([p[0], p[1], z], normal);
    }

    for tri in buffers.indices.chunks_exact(3) {
        let [a, b, c] = [tri[0], tri[1], tri[2]];
        let area = signed_area(&[
            buffers.vertices[a as usize],
            buffers.vertices[b as usize],
            buffers.vertices[c as usize],
        ]);
        if area.abs() < EPSILON * EPSILON {
            continue;
        }
        // Counter-clockwise seen from the side the cap faces
        if (area > 0.0) == (facing > 0.0) {
            data.push_triangle(base + a, base + b, base + c);
        } else {
            data.push_triangle(base + a, base + c, base + b);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::typeface::fixtures::test_font;
    use approx::assert_relative_eq;

    fn flat(size: f32, depth: f32) -> TextParams {
        TextParams {
            size,
            depth,
            bevel_enabled: false,
            ..TextParams::default()
        }
    }

    fn face_normal(data: &GeometryData, tri: &[u32]) -> [f32; 3] {
        let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| data.vertices[i as usize]);
        cross(sub(b, a), sub(c, a))
    }

    fn dot(a: [f32; 3], b: [f32; 3]) -> f32 {
        a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
    }

    #[test]
    fn test_flat_bar_is_a_box() {
        let font = test_font();
        let data = generate_text(&font, "I", &flat(0.5, 0.5)).unwrap();

        // 4 walls + 2 two-triangle caps
        assert_eq!(data.triangle_count(), 12);

        let (min, max) = data.bounding_box().unwrap();
        assert_relative_eq!(min[0], 0.05, epsilon = 1e-6);
        assert_relative_eq!(max[0], 0.15, epsilon = 1e-6);
        assert_relative_eq!(min[2], 0.0);
        assert_relative_eq!(max[2], 0.5);
    }

    #[test]
    fn test_bevel_extends_bounds() {
        let font = test_font();
        let params = TextParams::default();
        let data = generate_text(&font, "I", &params).unwrap();

        let (min, max) = data.bounding_box().unwrap();
        assert_relative_eq!(min[2], -0.03, epsilon = 1e-6);
        assert_relative_eq!(max[2], 0.53, epsilon = 1e-6);
        // Body is pushed out by bevel_size on every side
        assert_relative_eq!(min[0], 0.03, epsilon = 1e-6);
        assert_relative_eq!(max[0], 0.17, epsilon = 1e-6);
        assert_relative_eq!(min[1], -0.02, epsilon = 1e-6);

        // 2n + 2 layers, 4 edges per layer gap, 2 caps
        let layers = 2 * params.bevel_segments as usize + 2;
        assert_eq!(data.triangle_count(), (layers - 1) * 4 * 2 + 2 * 2);
    }

    #[test]
    fn test_layers_are_ordered_front_to_back() {
        let layers = TextParams::default().layers();
        assert_eq!(layers.len(), 10);
        assert!(layers.windows(2).all(|w| w[0].0 <= w[1].0));
        assert_relative_eq!(layers[0].1, 0.0);
        assert_relative_eq!(layers[4].1, 0.02);
    }

    #[test]
    fn test_triangles_wind_with_their_normals() {
        let font = test_font();
        for text in ["I", "O", "D"] {
            let data = generate_text(&font, text, &TextParams::default()).unwrap();
            for tri in data.indices.chunks(3) {
                let face = face_normal(&data, tri);
                let n = data.normals[tri[0] as usize];
                assert!(dot(face, n) > 0.0, "{}: triangle {:?} winds against its normal", text, tri);
            }
        }
    }

    #[test]
    fn test_hole_walls_face_into_the_hole() {
        let font = test_font();
        let data = generate_text(&font, "O", &flat(1.0, 0.2)).unwrap();
        let center = [0.3, 0.35];

        let mut hole_walls = 0;
        for tri in data.indices.chunks(3) {
            let n = data.normals[tri[0] as usize];
            if n[2].abs() > 0.5 {
                continue;
            }
            let centroid = tri.iter().fold([0.0f32; 2], |acc, &i| {
                let v = data.vertices[i as usize];
                [acc[0] + v[0] / 3.0, acc[1] + v[1] / 3.0]
            });
            let outward = (centroid[0] - center[0]) * n[0] + (centroid[1] - center[1]) * n[1];
            let in_hole = (0.14..=0.46).contains(&centroid[0]) && (0.14..=0.56).contains(&centroid[1]);
            if in_hole {
                hole_walls += 1;
                assert!(outward < 0.0);
            } else {
                assert!(outward > 0.0);
            }
        }
        assert_eq!(hole_walls, 8);
    }

    #[test]
    fn test_caps_leave_holes_open() {
        let font = test_font();
        let data = generate_text(&font, "O", &flat(1.0, 0.2)).unwrap();

        let back_area: f32 = data
            .indices
            .chunks(3)
            .filter(|tri| data.normals[tri[0] as usize][2] > 0.5)
            .map(|tri| face_normal(&data, tri)[2] * 0.5)
            .sum();
        assert_relative_eq!(back_area, 0.6 * 0.7 - 0.3 * 0.4, epsilon = 1e-4);
    }

    #[test]
    fn test_grown_solids_fill_their_overlap() {
        let square = |x: f32| vec![[x, 0.0], [x + 0.1, 0.0], [x + 0.1, 0.1], [x, 0.1]];
        let glyph = GlyphContours {
            ch: 'm',
            contours: vec![square(0.0), square(0.11)],
        };
        let params = TextParams {
            depth: 0.2,
            bevel_thickness: 0.01,
            bevel_size: 0.0,
            bevel_offset: 0.01,
            bevel_segments: 1,
            ..TextParams::default()
        };

        let mut data = GeometryData::new();
        extrude_glyph(&mut data, &mut FillTessellator::new(), &glyph, &params.layers()).unwrap();

        let back_area: f32 = data
            .indices
            .chunks(3)
            .filter(|tri| data.normals[tri[0] as usize][2] > 0.5)
            .map(|tri| face_normal(&data, tri)[2] * 0.5)
            .sum();
        // Both squares grow to 0.12 and overlap by 0.01 along X
        assert_relative_eq!(back_area, 0.23 * 0.12, epsilon = 1e-4);
    }

    #[test]
    fn test_empty_text_yields_empty_geometry() {
        let font = test_font();
        let data = generate_text(&font, " \n ", &TextParams::default()).unwrap();
        assert_eq!(data.vertex_count(), 0);
        assert!(data.bounding_box().is_none());
    }

    #[test]
    fn test_miter_keeps_edges_at_unit_distance() {
        let square = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
        let miters = miter_vectors(&square);
        assert_relative_eq!(miters[0][0], -1.0, epsilon = 1e-6);
        assert_relative_eq!(miters[0][1], -1.0, epsilon = 1e-6);
        assert_relative_eq!(miters[2][0], 1.0, epsilon = 1e-6);
    }
}
