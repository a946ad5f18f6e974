//! Loosely typed declarative input values

use crate::foundation::collections::{NodeId, ResourceId};
use crate::foundation::math::{Color, Euler, Vec3};

/// A declarative attribute value as written by the host
///
/// Hosts pass whatever their templates produced; the resolver coerces it to
/// the strongly typed value a scene slot needs.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Absent / unset
    #[default]
    Null,
    /// Boolean literal
    Bool(bool),
    /// Numeric literal
    Number(f64),
    /// String literal
    Text(String),
    /// Positional list
    List(Vec<Value>),
    /// Already a vector
    Vector(Vec3),
    /// Already an euler rotation
    Euler(Euler),
    /// Already a color
    Color(Color),
    /// Reference to a resource component
    Resource(ResourceId),
    /// Reference to another owning node's scene object
    Node(NodeId),
}

impl Value {
    /// Whether the value is semantically absent
    pub fn is_absent(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Text(text) => text.trim().is_empty(),
            _ => false,
        }
    }

    /// Resource reference carried by this value, if any
    pub fn as_resource(&self) -> Option<ResourceId> {
        match self {
            Self::Resource(id) => Some(*id),
            _ => None,
        }
    }

    /// Borrow the text of a string value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Build a list value from anything convertible
    pub fn list<T: Into<Value>>(items: impl IntoIterator<Item = T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<[f32; 3]> for Value {
    fn from(value: [f32; 3]) -> Self {
        Self::list(value)
    }
}

impl From<Vec3> for Value {
    fn from(value: Vec3) -> Self {
        Self::Vector(value)
    }
}

impl From<Euler> for Value {
    fn from(value: Euler) -> Self {
        Self::Euler(value)
    }
}

impl From<Color> for Value {
    fn from(value: Color) -> Self {
        Self::Color(value)
    }
}

impl From<ResourceId> for Value {
    fn from(value: ResourceId) -> Self {
        Self::Resource(value)
    }
}

impl From<NodeId> for Value {
    fn from(value: NodeId) -> Self {
        Self::Node(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}
