//! Material and geometry descriptions pushed into scene slots

use serde::{Deserialize, Serialize};

use crate::foundation::math::Color;
use crate::resolve::{Blending, GeometryKind, MaterialKind, Side, Wrapping};

/// Texture reference; loading is left to the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureRef {
    /// Fully resolved URL
    pub url: String,
    /// Horizontal wrapping
    pub wrap_s: Wrapping,
    /// Vertical wrapping
    pub wrap_t: Wrapping,
}

/// Material resource shared between every object it is attached to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Shading model
    pub kind: MaterialKind,
    /// Base color
    pub color: Color,
    /// Opacity in `0.0..=1.0`
    pub opacity: f32,
    /// Whether alpha blending is enabled
    pub transparent: bool,
    /// Rendered faces
    pub side: Side,
    /// Blending equation
    pub blending: Blending,
    /// Draw edges only
    pub wireframe: bool,
    /// Color map
    pub map: Option<TextureRef>,
    /// Optional name for debugging
    pub name: Option<String>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            kind: MaterialKind::default(),
            color: Color::WHITE,
            opacity: 1.0,
            transparent: false,
            side: Side::default(),
            blending: Blending::default(),
            wireframe: false,
            map: None,
            name: None,
        }
    }
}

impl Material {
    /// Unlit material of a single color
    pub fn basic(color: Color) -> Self {
        Self {
            kind: MaterialKind::Basic,
            color,
            ..Self::default()
        }
    }

    /// Set the material name for debugging
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Geometry description; vertex data is built by the backend
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Geometry {
    /// Shape family
    pub kind: GeometryKind,
    /// Shape parameters in the family's documented order
    pub parameters: Vec<f32>,
}

impl Geometry {
    /// Geometry with the family's default parameters
    pub fn new(kind: GeometryKind) -> Self {
        Self {
            kind,
            parameters: kind.default_parameters().to_vec(),
        }
    }
}
