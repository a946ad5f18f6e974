//! Enum-like string tables
//!
//! Names are matched case-insensitively, ignoring `-`, `_` and spaces, so
//! `"DoubleSide"`, `"double-side"` and `"double"` all resolve the same way.

use log::debug;
use serde::{Deserialize, Serialize};

use super::Value;

/// An enum that can be looked up by name
pub trait NamedEnum: Copy + Sized + 'static {
    /// Kind label used in logs
    const KIND: &'static str;

    /// Normalized name → variant; several names may map to one variant
    const TABLE: &'static [(&'static str, Self)];

    /// Look up a variant by name
    fn from_name(name: &str) -> Option<Self> {
        let key = normalize(name);
        Self::TABLE
            .iter()
            .find(|(candidate, _)| *candidate == key)
            .map(|(_, variant)| *variant)
    }
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Resolve a named enum; unknown names yield `fallback`
pub fn resolve_enum<T: NamedEnum>(raw: &Value, fallback: Option<T>) -> Option<T> {
    match raw {
        Value::Text(text) => T::from_name(text).or_else(|| {
            debug!("Unknown {} '{}', using default", T::KIND, text);
            fallback
        }),
        _ => fallback,
    }
}

/// Which faces of a surface are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Side {
    /// Front faces only
    #[default]
    Front,
    /// Back faces only
    Back,
    /// Both faces
    Double,
}

impl NamedEnum for Side {
    const KIND: &'static str = "side";
    const TABLE: &'static [(&'static str, Self)] = &[
        ("front", Self::Front),
        ("frontside", Self::Front),
        ("back", Self::Back),
        ("backside", Self::Back),
        ("double", Self::Double),
        ("doubleside", Self::Double),
    ];
}

/// Blending equation of a material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Blending {
    /// Blending disabled
    None,
    /// Standard alpha blending
    #[default]
    Normal,
    /// Additive
    Additive,
    /// Subtractive
    Subtractive,
    /// Multiplicative
    Multiply,
    /// Custom factors supplied elsewhere
    Custom,
}

impl NamedEnum for Blending {
    const KIND: &'static str = "blending";
    const TABLE: &'static [(&'static str, Self)] = &[
        ("no", Self::None),
        ("none", Self::None),
        ("noblending", Self::None),
        ("normal", Self::Normal),
        ("normalblending", Self::Normal),
        ("additive", Self::Additive),
        ("additiveblending", Self::Additive),
        ("subtractive", Self::Subtractive),
        ("subtractiveblending", Self::Subtractive),
        ("multiply", Self::Multiply),
        ("multiplyblending", Self::Multiply),
        ("custom", Self::Custom),
        ("customblending", Self::Custom),
    ];
}

/// Texture wrapping mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Wrapping {
    /// Tile the texture
    Repeat,
    /// Stretch the edge texels
    #[default]
    ClampToEdge,
    /// Tile, mirroring every other repetition
    MirroredRepeat,
}

impl NamedEnum for Wrapping {
    const KIND: &'static str = "wrapping";
    const TABLE: &'static [(&'static str, Self)] = &[
        ("repeat", Self::Repeat),
        ("repeatwrapping", Self::Repeat),
        ("clamp", Self::ClampToEdge),
        ("clamptoedge", Self::ClampToEdge),
        ("clamptoedgewrapping", Self::ClampToEdge),
        ("mirror", Self::MirroredRepeat),
        ("mirroredrepeat", Self::MirroredRepeat),
        ("mirroredrepeatwrapping", Self::MirroredRepeat),
    ];
}

/// Shading model of a material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MaterialKind {
    /// Unlit
    Basic,
    /// Lambert diffuse
    Lambert,
    /// Blinn-Phong
    Phong,
    /// Physically based
    #[default]
    Standard,
    /// Line rendering
    LineBasic,
    /// Point sprites
    Points,
}

impl NamedEnum for MaterialKind {
    const KIND: &'static str = "material type";
    const TABLE: &'static [(&'static str, Self)] = &[
        ("basic", Self::Basic),
        ("meshbasic", Self::Basic),
        ("meshbasicmaterial", Self::Basic),
        ("lambert", Self::Lambert),
        ("meshlambert", Self::Lambert),
        ("meshlambertmaterial", Self::Lambert),
        ("phong", Self::Phong),
        ("meshphong", Self::Phong),
        ("meshphongmaterial", Self::Phong),
        ("standard", Self::Standard),
        ("meshstandard", Self::Standard),
        ("meshstandardmaterial", Self::Standard),
        ("linebasic", Self::LineBasic),
        ("linebasicmaterial", Self::LineBasic),
        ("points", Self::Points),
        ("pointsmaterial", Self::Points),
    ];
}

/// Shape family of a geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GeometryKind {
    /// Axis-aligned box: width, height, depth
    #[default]
    Box,
    /// Sphere: radius, width segments, height segments
    Sphere,
    /// Plane: width, height
    Plane,
    /// Cylinder: top radius, bottom radius, height
    Cylinder,
    /// Torus: radius, tube
    Torus,
    /// Chart-generated buffer; parameters are opaque to the engine
    Buffer,
}

impl NamedEnum for GeometryKind {
    const KIND: &'static str = "geometry type";
    const TABLE: &'static [(&'static str, Self)] = &[
        ("box", Self::Box),
        ("boxgeometry", Self::Box),
        ("cube", Self::Box),
        ("sphere", Self::Sphere),
        ("spheregeometry", Self::Sphere),
        ("plane", Self::Plane),
        ("planegeometry", Self::Plane),
        ("cylinder", Self::Cylinder),
        ("cylindergeometry", Self::Cylinder),
        ("torus", Self::Torus),
        ("torusgeometry", Self::Torus),
        ("buffer", Self::Buffer),
        ("buffergeometry", Self::Buffer),
    ];
}

impl GeometryKind {
    /// Parameters used when none are given
    pub fn default_parameters(self) -> &'static [f32] {
        match self {
            Self::Box => &[1.0, 1.0, 1.0],
            Self::Sphere => &[1.0, 32.0, 16.0],
            Self::Plane => &[1.0, 1.0],
            Self::Cylinder => &[1.0, 1.0, 1.0],
            Self::Torus => &[1.0, 0.4],
            Self::Buffer => &[],
        }
    }
}
