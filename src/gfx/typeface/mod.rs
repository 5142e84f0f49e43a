//! # Typeface Loading
//!
//! Parses typeface JSON descriptions (the facetype.js format) into glyph
//! outlines. Outline strings are parsed eagerly so a malformed file fails at
//! load time instead of during text generation.
//!
//! ## Format
//!
//! ```json
//! {
//!   "glyphs": { "I": { "ha": 400, "x_min": 100, "x_max": 300, "o": "m 100 0 l 300 0 l 300 700 l 100 700" } },
//!   "resolution": 1000,
//!   "boundingBox": { "xMin": 0, "yMin": -200, "xMax": 700, "yMax": 800 },
//!   "underlineThickness": 50
//! }
//! ```
//!
//! Outline commands: `m x y`, `l x y`, `q x y cpx cpy` (end point first) and
//! `b x y c1x c1y c2x c2y` (end point first).

pub mod layout;

pub use layout::{layout_text, GlyphContours};

use serde::Deserialize;
use std::{collections::HashMap, path::Path};

use crate::error::{Result, TextscapeError};

/// A single outline drawing command in font units
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutlineCommand {
    MoveTo([f32; 2]),
    LineTo([f32; 2]),
    QuadTo { ctrl: [f32; 2], to: [f32; 2] },
    CubicTo { ctrl1: [f32; 2], ctrl2: [f32; 2], to: [f32; 2] },
}

/// A glyph: horizontal advance plus outline in font units
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    pub advance: f32,
    pub outline: Vec<OutlineCommand>,
}

/// Font-wide bounding box in font units
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct FontBounds {
    #[serde(rename = "xMin")]
    pub x_min: f32,
    #[serde(rename = "yMin")]
    pub y_min: f32,
    #[serde(rename = "xMax")]
    pub x_max: f32,
    #[serde(rename = "yMax")]
    pub y_max: f32,
}

#[derive(Deserialize)]
struct TypefaceJson {
    glyphs: HashMap<String, GlyphJson>,
    resolution: f32,
    #[serde(rename = "boundingBox")]
    bounding_box: FontBounds,
    #[serde(rename = "underlineThickness", default)]
    underline_thickness: f32,
    #[serde(rename = "familyName", default)]
    family_name: Option<String>,
}

#[derive(Deserialize)]
struct GlyphJson {
    ha: f32,
    #[serde(default)]
    o: Option<String>,
}

/// A loaded typeface
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    pub family_name: Option<String>,
    /// Font units per em
    pub resolution: f32,
    pub bounds: FontBounds,
    pub underline_thickness: f32,
    glyphs: HashMap<char, Glyph>,
}

impl Font {
    /// Parses a typeface description from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: TypefaceJson = serde_json::from_str(json)?;
        if raw.resolution <= 0.0 {
            return Err(TextscapeError::TypefaceJson(serde::de::Error::custom(format!(
                "resolution must be positive, got {}",
                raw.resolution
            ))));
        }

        let mut glyphs = HashMap::with_capacity(raw.glyphs.len());
        for (key, glyph) in raw.glyphs {
            let mut chars = key.chars();
            let (Some(ch), None) = (chars.next(), chars.next()) else {
                log::warn!("Skipping glyph entry '{}': key is not a single character", key);
                continue;
            };

            let outline = match glyph.o.as_deref() {
                Some(source) => parse_outline(ch, source)?,
                None => Vec::new(),
            };

            glyphs.insert(
                ch,
                Glyph {
                    advance: glyph.ha,
                    outline,
                },
            );
        }

        Ok(Self {
            family_name: raw.family_name,
            resolution: raw.resolution,
            bounds: raw.bounding_box,
            underline_thickness: raw.underline_thickness,
            glyphs,
        })
    }

    /// Reads and parses a typeface file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| TextscapeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let font = Self::from_json_str(&json)?;
        log::info!(
            "Loaded typeface '{}' ({} glyphs) from {}",
            font.family_name.as_deref().unwrap_or("unnamed"),
            font.glyph_count(),
            path.display()
        );
        Ok(font)
    }

    /// Looks up a glyph, falling back to `'?'` for unknown characters
    pub fn glyph_or_fallback(&self, ch: char) -> Option<&Glyph> {
        self.glyphs.get(&ch).or_else(|| self.glyphs.get(&'?'))
    }

    /// Number of glyphs in the typeface
    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    /// Distance between baselines for the given text size
    pub fn line_height(&self, size: f32) -> f32 {
        (self.bounds.y_max - self.bounds.y_min + self.underline_thickness) * size
            / self.resolution
    }
}

/// Parses an outline command string
fn parse_outline(glyph: char, source: &str) -> Result<Vec<OutlineCommand>> {
    let mut tokens = source.split_whitespace();
    let mut commands = Vec::new();

    let invalid = |reason: String| TextscapeError::InvalidOutline { glyph, reason };

    let next_point = |tokens: &mut std::str::SplitWhitespace<'_>, op: &str| -> Result<[f32; 2]> {
        let mut coord = || -> Result<f32> {
            let token = tokens
                .next()
                .ok_or_else(|| invalid(format!("'{}' is missing coordinates", op)))?;
            token
                .parse::<f32>()
                .map_err(|_| invalid(format!("'{}' is not a number", token)))
        };
        Ok([coord()?, coord()?])
    };

    while let Some(op) = tokens.next() {
        let command = match op {
            "m" => OutlineCommand::MoveTo(next_point(&mut tokens, op)?),
            "l" => OutlineCommand::LineTo(next_point(&mut tokens, op)?),
            "q" => {
                let to = next_point(&mut tokens, op)?;
                let ctrl = next_point(&mut tokens, op)?;
                OutlineCommand::QuadTo { ctrl, to }
            }
            "b" => {
                let to = next_point(&mut tokens, op)?;
                let ctrl1 = next_point(&mut tokens, op)?;
                let ctrl2 = next_point(&mut tokens, op)?;
                OutlineCommand::CubicTo { ctrl1, ctrl2, to }
            }
            // Some converters emit explicit closes; contours are closed implicitly
            "z" => continue,
            other => return Err(invalid(format!("unknown command '{}'", other))),
        };
        commands.push(command);
    }

    Ok(commands)
}

/// Small typeface used by unit tests across the crate
#[cfg(test)]
pub(crate) mod fixtures {
    use super::Font;

    /// `I` is a bar, `O` a square ring, `D` has a quadratic edge, `?` a box.
    pub const TEST_TYPEFACE: &str = r#"{
        "familyName": "Test Sans",
        "resolution": 1000,
        "underlineThickness": 50,
        "boundingBox": { "xMin": 0, "yMin": -200, "xMax": 700, "yMax": 800 },
        "glyphs": {
            "I": { "ha": 400, "x_min": 100, "x_max": 300, "o": "m 100 0 l 300 0 l 300 700 l 100 700 z" },
            "O": { "ha": 700, "o": "m 0 0 l 600 0 l 600 700 l 0 700 m 150 150 l 150 550 l 450 550 l 450 150" },
            "D": { "ha": 650, "o": "m 0 0 l 400 0 q 400 400 600 200 l 0 400" },
            "?": { "ha": 350, "o": "m 0 0 l 300 0 l 300 300 l 0 300" },
            " ": { "ha": 250 }
        }
    }"#;

    pub fn test_font() -> Font {
        Font::from_json_str(TEST_TYPEFACE).expect("test typeface parses")
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::{test_font, TEST_TYPEFACE};
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_fixture() {
        let font = test_font();
        assert_eq!(font.family_name.as_deref(), Some("Test Sans"));
        assert_eq!(font.glyph_count(), 5);
        assert_relative_eq!(font.line_height(1.0), 1.05);
        assert_relative_eq!(font.line_height(0.5), 0.525);

        let d = font.glyph_or_fallback('D').unwrap();
        assert_eq!(d.outline.len(), 4);
        assert_eq!(
            d.outline[2],
            OutlineCommand::QuadTo {
                ctrl: [600.0, 200.0],
                to: [400.0, 400.0]
            }
        );
    }

    #[test]
    fn test_unknown_char_falls_back_to_question_mark() {
        let font = test_font();
        let fallback = font.glyph_or_fallback('Z').unwrap();
        assert_relative_eq!(fallback.advance, 350.0);
        assert!(font.glyph_or_fallback(' ').unwrap().outline.is_empty());
    }

    #[test]
    fn test_cubic_command_order() {
        let commands = parse_outline('x', "m 0 0 b 10 0 1 2 3 4").unwrap();
        assert_eq!(
            commands[1],
            OutlineCommand::CubicTo {
                ctrl1: [1.0, 2.0],
                ctrl2: [3.0, 4.0],
                to: [10.0, 0.0]
            }
        );
    }

    #[test]
    fn test_malformed_outline_is_rejected() {
        assert!(matches!(
            parse_outline('x', "m 0 0 l 5"),
            Err(TextscapeError::InvalidOutline { glyph: 'x', .. })
        ));
        assert!(matches!(
            parse_outline('x', "m 0 0 k 1 1"),
            Err(TextscapeError::InvalidOutline { .. })
        ));
        assert!(parse_outline('x', "m 0 zero").is_err());
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        assert!(matches!(
            Font::from_json_str("{ \"glyphs\": {} }"),
            Err(TextscapeError::TypefaceJson(_))
        ));
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.typeface.json");
        std::fs::write(&path, TEST_TYPEFACE).unwrap();

        let font = Font::load(&path).unwrap();
        assert_eq!(font.glyph_count(), 5);

        let missing = Font::load(dir.path().join("missing.json"));
        assert!(matches!(missing, Err(TextscapeError::Io { .. })));
    }
}
