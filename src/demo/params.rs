//! Live-tunable demo parameters
//!
//! [`ParameterSet`] is the single record read by every generator. Each
//! editable field declares its range and the generators that must rerun when
//! it changes; setters clamp and snap the value and return the resulting
//! [`RegenerationRequest`].

use std::sync::Arc;

use crate::gfx::{geometry::text::TextParams, resources::material::TextureId, typeface::Font};

/// The independent scene builders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Generator {
    Text,
    Spheres,
    Boxes,
    Donuts,
}

impl Generator {
    /// Run order on startup
    pub const ALL: [Generator; 4] = [
        Generator::Text,
        Generator::Spheres,
        Generator::Boxes,
        Generator::Donuts,
    ];
}

/// Set of generators waiting to rerun
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegenerationRequest {
    text: bool,
    spheres: bool,
    boxes: bool,
    donuts: bool,
}

impl RegenerationRequest {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn all() -> Self {
        Self {
            text: true,
            spheres: true,
            boxes: true,
            donuts: true,
        }
    }

    pub fn from_generators(generators: &[Generator]) -> Self {
        let mut request = Self::none();
        for generator in generators {
            request.insert(*generator);
        }
        request
    }

    pub fn insert(&mut self, generator: Generator) {
        *self.flag_mut(generator) = true;
    }

    pub fn merge(&mut self, other: RegenerationRequest) {
        for generator in other.generators() {
            self.insert(generator);
        }
    }

    pub fn contains(&self, generator: Generator) -> bool {
        match generator {
            Generator::Text => self.text,
            Generator::Spheres => self.spheres,
            Generator::Boxes => self.boxes,
            Generator::Donuts => self.donuts,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::none()
    }

    /// Requested generators in run order (text, spheres, boxes, donuts)
    pub fn generators(&self) -> impl Iterator<Item = Generator> + '_ {
        Generator::ALL.into_iter().filter(|g| self.contains(*g))
    }

    fn flag_mut(&mut self, generator: Generator) -> &mut bool {
        match generator {
            Generator::Text => &mut self.text,
            Generator::Spheres => &mut self.spheres,
            Generator::Boxes => &mut self.boxes,
            Generator::Donuts => &mut self.donuts,
        }
    }
}

/// Inclusive value range with a step grid anchored at `min`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldRange {
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl FieldRange {
    const fn new(min: f32, max: f32, step: f32) -> Self {
        Self { min, max, step }
    }

    /// Snaps to the nearest step and clamps into range
    pub fn apply(&self, value: f32) -> f32 {
        if !value.is_finite() {
            return self.min;
        }
        let snapped = self.min + ((value - self.min) / self.step).round() * self.step;
        snapped.clamp(self.min, self.max)
    }
}

/// Every editable parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamField {
    Texture,
    Size,
    Depth,
    CurveSegments,
    BevelEnabled,
    BevelThickness,
    BevelSize,
    BevelOffset,
    BevelSegments,
    SphereRadius,
    BoxSize,
    DonutSize,
    ItemCount,
}

const TEXT_ONLY: &[Generator] = &[Generator::Text];
const ALL_SHAPES: &[Generator] = &[Generator::Spheres, Generator::Boxes, Generator::Donuts];

impl ParamField {
    /// Panel order
    pub const ALL: [ParamField; 13] = [
        ParamField::Texture,
        ParamField::Size,
        ParamField::Depth,
        ParamField::CurveSegments,
        ParamField::BevelEnabled,
        ParamField::BevelThickness,
        ParamField::BevelSize,
        ParamField::BevelOffset,
        ParamField::BevelSegments,
        ParamField::SphereRadius,
        ParamField::BoxSize,
        ParamField::DonutSize,
        ParamField::ItemCount,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ParamField::Texture => "texture",
            ParamField::Size => "size",
            ParamField::Depth => "depth",
            ParamField::CurveSegments => "curve segments",
            ParamField::BevelEnabled => "bevel",
            ParamField::BevelThickness => "bevel thickness",
            ParamField::BevelSize => "bevel size",
            ParamField::BevelOffset => "bevel offset",
            ParamField::BevelSegments => "bevel segments",
            ParamField::SphereRadius => "sphere radius",
            ParamField::BoxSize => "box size",
            ParamField::DonutSize => "donut size",
            ParamField::ItemCount => "item count",
        }
    }

    /// Numeric range, `None` for the texture choice and the bevel toggle
    pub fn range(self) -> Option<FieldRange> {
        let range = match self {
            ParamField::Texture | ParamField::BevelEnabled => return None,
            ParamField::Size => FieldRange::new(0.1, 2.0, 0.01),
            ParamField::Depth => FieldRange::new(0.01, 2.0, 0.01),
            ParamField::CurveSegments => FieldRange::new(1.0, 20.0, 1.0),
            ParamField::BevelThickness => FieldRange::new(0.0, 0.2, 0.001),
            ParamField::BevelSize => FieldRange::new(0.0, 0.2, 0.001),
            ParamField::BevelOffset => FieldRange::new(-0.1, 0.1, 0.001),
            ParamField::BevelSegments => FieldRange::new(1.0, 10.0, 1.0),
            ParamField::SphereRadius | ParamField::BoxSize | ParamField::DonutSize => {
                FieldRange::new(0.05, 1.0, 0.01)
            }
            ParamField::ItemCount => FieldRange::new(0.0, 3000.0, 1.0),
        };
        Some(range)
    }

    /// Whether the field holds a whole number
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            ParamField::CurveSegments | ParamField::BevelSegments | ParamField::ItemCount
        )
    }

    /// Generators that rerun when this field changes
    pub fn dependents(self) -> &'static [Generator] {
        match self {
            ParamField::Texture => &[],
            ParamField::Size
            | ParamField::Depth
            | ParamField::CurveSegments
            | ParamField::BevelEnabled
            | ParamField::BevelThickness
            | ParamField::BevelSize
            | ParamField::BevelOffset
            | ParamField::BevelSegments => TEXT_ONLY,
            ParamField::SphereRadius => &[Generator::Spheres],
            ParamField::BoxSize => &[Generator::Boxes],
            ParamField::DonutSize => &[Generator::Donuts],
            ParamField::ItemCount => ALL_SHAPES,
        }
    }
}

/// Flat configuration record shared by the generators and the panel
#[derive(Debug, Clone)]
pub struct ParameterSet {
    /// Active matcap slot
    pub texture: TextureId,
    /// `None` until the typeface has loaded
    pub font: Option<Arc<Font>>,
    pub text: TextParams,
    pub sphere_radius: f32,
    pub box_size: f32,
    pub donut_size: f32,
    pub item_count: u32,
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            texture: TextureId(0),
            font: None,
            text: TextParams::default(),
            sphere_radius: 0.4,
            box_size: 0.6,
            donut_size: 0.3,
            item_count: 300,
        }
    }
}

impl ParameterSet {
    /// Current value of a field as a float
    ///
    /// The bevel toggle reads as 0 or 1, the texture as its slot index.
    pub fn get(&self, field: ParamField) -> f32 {
        match field {
            ParamField::Texture => self.texture.0 as f32,
            ParamField::Size => self.text.size,
            ParamField::Depth => self.text.depth,
            ParamField::CurveSegments => self.text.curve_segments as f32,
            ParamField::BevelEnabled => {
                if self.text.bevel_enabled {
                    1.0
                } else {
                    0.0
                }
            }
            ParamField::BevelThickness => self.text.bevel_thickness,
            ParamField::BevelSize => self.text.bevel_size,
            ParamField::BevelOffset => self.text.bevel_offset,
            ParamField::BevelSegments => self.text.bevel_segments as f32,
            ParamField::SphereRadius => self.sphere_radius,
            ParamField::BoxSize => self.box_size,
            ParamField::DonutSize => self.donut_size,
            ParamField::ItemCount => self.item_count as f32,
        }
    }

    /// Stores a clamped, step-snapped value
    ///
    /// Returns the generators to rerun, empty when the stored value did not change.
    pub fn set(&mut self, field: ParamField, value: f32) -> RegenerationRequest {
        let value = match field.range() {
            Some(range) => range.apply(value),
            None => value,
        };
        if self.get(field) == value {
            return RegenerationRequest::none();
        }

        match field {
            ParamField::Texture => self.texture = TextureId(value.max(0.0).round() as usize),
            ParamField::Size => self.text.size = value,
            ParamField::Depth => self.text.depth = value,
            ParamField::CurveSegments => self.text.curve_segments = value.round() as u32,
            ParamField::BevelEnabled => self.text.bevel_enabled = value >= 0.5,
            ParamField::BevelThickness => self.text.bevel_thickness = value,
            ParamField::BevelSize => self.text.bevel_size = value,
            ParamField::BevelOffset => self.text.bevel_offset = value,
            ParamField::BevelSegments => self.text.bevel_segments = value.round() as u32,
            ParamField::SphereRadius => self.sphere_radius = value,
            ParamField::BoxSize => self.box_size = value,
            ParamField::DonutSize => self.donut_size = value,
            ParamField::ItemCount => self.item_count = value.round() as u32,
        }

        RegenerationRequest::from_generators(field.dependents())
    }

    pub fn set_bevel_enabled(&mut self, enabled: bool) -> RegenerationRequest {
        self.set(ParamField::BevelEnabled, if enabled { 1.0 } else { 0.0 })
    }

    /// Selects the active matcap; no generator depends on it
    pub fn set_texture(&mut self, texture: TextureId) -> RegenerationRequest {
        self.texture = texture;
        RegenerationRequest::none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_defaults() {
        let params = ParameterSet::default();
        assert!(params.font.is_none());
        assert_eq!(params.item_count, 300);
        assert_relative_eq!(params.text.size, 0.5);
        assert_relative_eq!(params.text.bevel_thickness, 0.03);
        assert_eq!(params.text.bevel_segments, 4);
    }

    #[test]
    fn test_field_dependents() {
        for field in [
            ParamField::Size,
            ParamField::Depth,
            ParamField::CurveSegments,
            ParamField::BevelEnabled,
            ParamField::BevelThickness,
            ParamField::BevelSize,
            ParamField::BevelOffset,
            ParamField::BevelSegments,
        ] {
            assert_eq!(field.dependents(), &[Generator::Text], "{:?}", field);
        }
        assert_eq!(ParamField::SphereRadius.dependents(), &[Generator::Spheres]);
        assert_eq!(ParamField::BoxSize.dependents(), &[Generator::Boxes]);
        assert_eq!(ParamField::DonutSize.dependents(), &[Generator::Donuts]);
        assert_eq!(
            ParamField::ItemCount.dependents(),
            &[Generator::Spheres, Generator::Boxes, Generator::Donuts]
        );
        assert!(ParamField::Texture.dependents().is_empty());
    }

    #[test]
    fn test_set_clamps_and_snaps() {
        let mut params = ParameterSet::default();

        let request = params.set(ParamField::ItemCount, 300.3);
        assert!(request.is_empty()); // rounds back to 300
        assert_eq!(params.item_count, 300);

        params.set(ParamField::ItemCount, 9000.0);
        assert_eq!(params.item_count, 3000);
        // Counts that are not multiples of three are stored as given
        params.set(ParamField::ItemCount, 50.0);
        assert_eq!(params.item_count, 50);
        params.set(ParamField::ItemCount, 52.4);
        assert_eq!(params.item_count, 52);

        params.set(ParamField::SphereRadius, 0.0);
        assert_relative_eq!(params.sphere_radius, 0.05);
        params.set(ParamField::BevelOffset, 0.12345);
        assert_relative_eq!(params.text.bevel_offset, 0.1, epsilon = 1e-6);
        params.set(ParamField::Size, 0.734);
        assert_relative_eq!(params.text.size, 0.73, epsilon = 1e-5);
        params.set(ParamField::CurveSegments, 7.6);
        assert_eq!(params.text.curve_segments, 8);
        params.set(ParamField::Depth, f32::NAN);
        assert_relative_eq!(params.text.depth, 0.01);
    }

    #[test]
    fn test_set_reports_dependents() {
        let mut params = ParameterSet::default();

        let request = params.set(ParamField::ItemCount, 51.0);
        assert_eq!(
            request.generators().collect::<Vec<_>>(),
            vec![Generator::Spheres, Generator::Boxes, Generator::Donuts]
        );

        let request = params.set_bevel_enabled(false);
        assert!(request.contains(Generator::Text));
        assert!(!params.text.bevel_enabled);
        assert!(params.set_bevel_enabled(false).is_empty());

        assert!(params.set_texture(TextureId(3)).is_empty());
        assert_eq!(params.texture, TextureId(3));
    }

    #[test]
    fn test_request_merge_keeps_run_order() {
        let mut request = RegenerationRequest::from_generators(&[Generator::Donuts]);
        request.merge(RegenerationRequest::from_generators(&[Generator::Text]));
        assert_eq!(
            request.generators().collect::<Vec<_>>(),
            vec![Generator::Text, Generator::Donuts]
        );
        assert_eq!(
            RegenerationRequest::all().generators().count(),
            Generator::ALL.len()
        );
    }
}
