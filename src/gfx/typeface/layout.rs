//! Text layout and outline flattening
//!
//! Turns a string into per-glyph polygon contours in scene units, ready for
//! extrusion.

use super::{Font, OutlineCommand};

/// Points closer than this are treated as duplicates
const DUPLICATE_EPSILON: f32 = 1e-6;

/// The flattened contours of one laid-out glyph
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphContours {
    pub ch: char,
    /// Closed polygons; the closing edge from the last to the first point is implicit
    pub contours: Vec<Vec<[f32; 2]>>,
}

/// Lays out `text` with the given size and flattens every glyph outline
///
/// Each quadratic or cubic segment is split into `curve_segments` lines.
/// `'\n'` starts a new line. Glyphs without outline (spaces) only advance the
/// pen and produce no entry.
pub fn layout_text(font: &Font, text: &str, size: f32, curve_segments: u32) -> Vec<GlyphContours> {
    let scale = size / font.resolution;
    let line_height = font.line_height(size);
    let divisions = curve_segments.max(1);

    let mut glyphs = Vec::new();
    let mut offset = [0.0f32, 0.0f32];

    for ch in text.chars() {
        if ch == '\n' {
            offset[0] = 0.0;
            offset[1] -= line_height;
            continue;
        }

        let Some(glyph) = font.glyph_or_fallback(ch) else {
            log::warn!("Character '{}' has no glyph and no '?' fallback", ch);
            continue;
        };

        let contours = flatten_outline(&glyph.outline, scale, offset, divisions);
        if !contours.is_empty() {
            glyphs.push(GlyphContours { ch, contours });
        }

        offset[0] += glyph.advance * scale;
    }

    glyphs
}

/// Converts outline commands into cleaned-up closed polygons
fn flatten_outline(
    outline: &[OutlineCommand],
    scale: f32,
    offset: [f32; 2],
    divisions: u32,
) -> Vec<Vec<[f32; 2]>> {
    let place = |p: [f32; 2]| [p[0] * scale + offset[0], p[1] * scale + offset[1]];

    let mut contours = Vec::new();
    let mut current: Vec<[f32; 2]> = Vec::new();

    for command in outline {
        match *command {
            OutlineCommand::MoveTo(p) => {
                if !current.is_empty() {
                    contours.push(std::mem::take(&mut current));
                }
                current.push(place(p));
            }
            OutlineCommand::LineTo(p) => current.push(place(p)),
            OutlineCommand::QuadTo { ctrl, to } => {
                let Some(&start) = current.last() else {
                    continue;
                };
                let (ctrl, to) = (place(ctrl), place(to));
                for i in 1..=divisions {
                    let t = i as f32 / divisions as f32;
                    current.push(quadratic_point(start, ctrl, to, t));
                }
            }
            OutlineCommand::CubicTo { ctrl1, ctrl2, to } => {
                let Some(&start) = current.last() else {
                    continue;
                };
                let (ctrl1, ctrl2, to) = (place(ctrl1), place(ctrl2), place(to));
                for i in 1..=divisions {
                    let t = i as f32 / divisions as f32;
                    current.push(cubic_point(start, ctrl1, ctrl2, to, t));
                }
            }
        }
    }
    if !current.is_empty() {
        contours.push(current);
    }

    contours
        .into_iter()
        .map(clean_contour)
        .filter(|c| c.len() >= 3)
        .collect()
}

/// Drops consecutive duplicates and a closing point equal to the first
fn clean_contour(points: Vec<[f32; 2]>) -> Vec<[f32; 2]> {
    let mut cleaned: Vec<[f32; 2]> = Vec::with_capacity(points.len());
    for p in points {
        if cleaned.last().map_or(true, |last| !same_point(*last, p)) {
            cleaned.push(p);
        }
    }
    while cleaned.len() > 1 && same_point(cleaned[0], cleaned[cleaned.len() - 1]) {
        cleaned.pop();
    }
    cleaned
}

fn same_point(a: [f32; 2], b: [f32; 2]) -> bool {
    (a[0] - b[0]).abs() <= DUPLICATE_EPSILON && (a[1] - b[1]).abs() <= DUPLICATE_EPSILON
}

fn quadratic_point(p0: [f32; 2], c: [f32; 2], p1: [f32; 2], t: f32) -> [f32; 2] {
    let k = 1.0 - t;
    [
        k * k * p0[0] + 2.0 * k * t * c[0] + t * t * p1[0],
        k * k * p0[1] + 2.0 * k * t * c[1] + t * t * p1[1],
    ]
}

fn cubic_point(p0: [f32; 2], c1: [f32; 2], c2: [f32; 2], p1: [f32; 2], t: f32) -> [f32; 2] {
    let k = 1.0 - t;
    let (a, b, c, d) = (k * k * k, 3.0 * k * k * t, 3.0 * k * t * t, t * t * t);
    [
        a * p0[0] + b * c1[0] + c * c2[0] + d * p1[0],
        a * p0[1] + b * c1[1] + c * c2[1] + d * p1[1],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::typeface::fixtures::test_font;
    use approx::assert_relative_eq;

    #[test]
    fn test_glyphs_advance_along_the_line() {
        let font = test_font();
        let glyphs = layout_text(&font, "I I", 1.0, 5);

        // The space advances but produces no contours
        assert_eq!(glyphs.len(), 2);
        let first_x = glyphs[0].contours[0][0][0];
        let second_x = glyphs[1].contours[0][0][0];
        assert_relative_eq!(first_x, 0.1, epsilon = 1e-6);
        assert_relative_eq!(second_x, 0.1 + 0.4 + 0.25, epsilon = 1e-6);
    }

    #[test]
    fn test_newline_resets_pen() {
        let font = test_font();
        let glyphs = layout_text(&font, "I\nI", 2.0, 5);

        assert_eq!(glyphs.len(), 2);
        let top = glyphs[0].contours[0][0];
        let bottom = glyphs[1].contours[0][0];
        assert_relative_eq!(top[0], bottom[0], epsilon = 1e-6);
        assert_relative_eq!(top[1] - bottom[1], font.line_height(2.0), epsilon = 1e-6);
    }

    #[test]
    fn test_closing_point_and_duplicates_removed() {
        let font = test_font();
        let glyphs = layout_text(&font, "I", 1.0, 5);
        assert_eq!(glyphs[0].contours.len(), 1);

        let expected = [[0.1, 0.0], [0.3, 0.0], [0.3, 0.7], [0.1, 0.7]];
        let contour = &glyphs[0].contours[0];
        assert_eq!(contour.len(), expected.len());
        for (p, e) in contour.iter().zip(expected) {
            assert_relative_eq!(p[0], e[0], epsilon = 1e-6);
            assert_relative_eq!(p[1], e[1], epsilon = 1e-6);
        }
    }

    #[test]
    fn test_curves_use_curve_segments() {
        let font = test_font();

        // 2 line points + curve_segments curve points + 1 line point
        for segments in [1, 5, 12] {
            let glyphs = layout_text(&font, "D", 1.0, segments);
            assert_eq!(glyphs[0].contours[0].len(), 3 + segments as usize);
        }

        let glyphs = layout_text(&font, "D", 1.0, 4);
        let curve_end = glyphs[0].contours[0][2 + 3];
        assert_relative_eq!(curve_end[0], 0.4, epsilon = 1e-6);
        assert_relative_eq!(curve_end[1], 0.4, epsilon = 1e-6);
    }

    #[test]
    fn test_holes_are_separate_contours() {
        let font = test_font();
        let glyphs = layout_text(&font, "O", 1.0, 5);
        assert_eq!(glyphs[0].contours.len(), 2);
    }

    #[test]
    fn test_unknown_characters_use_fallback() {
        let font = test_font();
        let glyphs = layout_text(&font, "Z", 1.0, 5);
        assert_eq!(glyphs.len(), 1);
        assert_eq!(glyphs[0].ch, 'Z');
        assert_relative_eq!(glyphs[0].contours[0][2][0], 0.3, epsilon = 1e-6);
    }

    #[test]
    fn test_cubic_endpoints() {
        let p = cubic_point([0.0, 0.0], [1.0, 2.0], [3.0, 2.0], [4.0, 0.0], 1.0);
        assert_relative_eq!(p[0], 4.0);
        let mid = cubic_point([0.0, 0.0], [1.0, 2.0], [3.0, 2.0], [4.0, 0.0], 0.5);
        assert_relative_eq!(mid[0], 2.0);
        assert_relative_eq!(mid[1], 1.5);
    }
}
