//! Value resolution
//!
//! Stateless coercion of loosely typed declarative inputs into the typed
//! values scene slots need. Every resolver follows the same contract:
//!
//! - absent input yields `fallback`, else `None`, unless `required`, in which
//!   case the type's zero value is returned;
//! - lists map positionally onto the first fields of the target type;
//! - values already of the target type pass through unchanged;
//! - resource and node references are delegated to the [`ValueContext`].
//!
//! Nothing here fails loudly. Unresolvable input becomes `None` and the
//! caller decides whether to substitute a default.

mod value;
mod vector;
mod angle;
mod color;
mod enums;

pub use value::Value;
pub use vector::resolve_vector;
pub use angle::{resolve_angle, resolve_euler};
pub use color::{parse_color, resolve_color};
pub use enums::{Blending, GeometryKind, MaterialKind, NamedEnum, Side, Wrapping, resolve_enum};

use crate::core::SyncContext;
use crate::foundation::collections::{NodeId, ObjectHandle, ResourceId};
use crate::foundation::math::{Euler, Vec3};
use crate::resource::ResourceValue;
use crate::scene::VectorSlot;

/// Cross-node lookups the resolver needs but does not implement
pub trait ValueContext {
    /// Current value of a resource component
    fn resource_value(&self, id: ResourceId) -> Option<ResourceValue>;

    /// Scene object owned by a node, if it exists yet
    fn node_object(&self, node: NodeId) -> Option<ObjectHandle>;

    /// Read a vector slot of a scene object
    fn object_vector(&self, object: ObjectHandle, slot: VectorSlot) -> Option<Vec3>;

    /// Read the rotation of a scene object
    fn object_rotation(&self, object: ObjectHandle) -> Option<Euler>;

    /// Uniform random number in `[0, 1)`
    fn random_unit(&self) -> f32;

    /// Resolve an asset reference to a full URL
    fn asset_url(&self, kind: &str, reference: &str) -> String;
}

/// A [`ValueContext`] with no scene behind it
///
/// References never resolve; randomness and asset locations come from the
/// wrapped [`SyncContext`].
pub struct DetachedContext<'a> {
    context: &'a SyncContext,
}

impl<'a> DetachedContext<'a> {
    /// Wrap a sync context
    pub fn new(context: &'a SyncContext) -> Self {
        Self { context }
    }
}

impl ValueContext for DetachedContext<'_> {
    fn resource_value(&self, _id: ResourceId) -> Option<ResourceValue> {
        None
    }

    fn node_object(&self, _node: NodeId) -> Option<ObjectHandle> {
        None
    }

    fn object_vector(&self, _object: ObjectHandle, _slot: VectorSlot) -> Option<Vec3> {
        None
    }

    fn object_rotation(&self, _object: ObjectHandle) -> Option<Euler> {
        None
    }

    fn random_unit(&self) -> f32 {
        self.context.random_unit()
    }

    fn asset_url(&self, kind: &str, reference: &str) -> String {
        self.context.asset_url(kind, reference)
    }
}

/// Resolve a number; numeric strings are accepted
pub fn resolve_number(raw: &Value, fallback: Option<f64>) -> Option<f64> {
    let resolved = match raw {
        Value::Number(n) if n.is_finite() => Some(*n),
        Value::Text(text) => text.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        Value::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
        _ => None,
    };
    resolved.or(fallback)
}

/// Resolve a number as `f32`
pub fn resolve_f32(raw: &Value, fallback: Option<f32>) -> Option<f32> {
    resolve_number(raw, None).map(|n| n as f32).or(fallback)
}

/// Resolve an integer; fractional input is truncated toward zero
pub fn resolve_int(raw: &Value, fallback: Option<i32>) -> Option<i32> {
    resolve_number(raw, None)
        .filter(|n| *n >= f64::from(i32::MIN) && *n <= f64::from(i32::MAX))
        .map(|n| n.trunc() as i32)
        .or(fallback)
}

/// Resolve a boolean
///
/// Accepts booleans, non-zero numbers and the strings
/// `true/false`, `yes/no`, `on/off`, `1/0`.
pub fn resolve_bool(raw: &Value, fallback: Option<bool>) -> Option<bool> {
    let resolved = match raw {
        Value::Bool(flag) => Some(*flag),
        Value::Number(n) => Some(*n != 0.0),
        Value::Text(text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Some(true),
            "false" | "no" | "off" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    };
    resolved.or(fallback)
}

/// Resolve a string; numbers and booleans are formatted
pub fn resolve_string(raw: &Value, fallback: Option<&str>) -> Option<String> {
    let resolved = match raw {
        Value::Text(text) => Some(text.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    };
    resolved.or_else(|| fallback.map(str::to_string))
}

/// Resolve every element of a list as `f32`, requiring at least `min` items
pub(crate) fn resolve_f32_list(items: &[Value], min: usize) -> Option<Vec<f32>> {
    if items.len() < min {
        return None;
    }
    items.iter().map(|item| resolve_f32(item, None)).collect()
}
