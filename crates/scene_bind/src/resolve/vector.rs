//! Vector resolution

use super::{resolve_f32, resolve_f32_list, Value, ValueContext};
use crate::foundation::math::Vec3;
use crate::resource::ResourceValue;
use crate::scene::VectorSlot;

/// Resolve a 3D vector
///
/// Accepts vectors, lists of at least three numbers, a single number (all
/// components), a `"x,y,z"` string, a vector resource component, or a node
/// reference (its object's position).
pub fn resolve_vector(
    raw: &Value,
    fallback: Option<Vec3>,
    required: bool,
    cx: &dyn ValueContext,
) -> Option<Vec3> {
    let resolved = match raw {
        Value::Null => None,
        Value::Vector(v) => Some(*v),
        Value::List(items) => resolve_f32_list(items.get(..3).unwrap_or(items), 3)
            .map(|xyz| Vec3::new(xyz[0], xyz[1], xyz[2])),
        Value::Number(_) => resolve_f32(raw, None).map(|n| Vec3::new(n, n, n)),
        Value::Text(text) => parse_vector_text(text),
        Value::Resource(id) => match cx.resource_value(*id) {
            Some(ResourceValue::Vector(v)) => Some(v),
            _ => None,
        },
        Value::Node(node) => cx
            .node_object(*node)
            .and_then(|object| cx.object_vector(object, VectorSlot::Position)),
        Value::Bool(_) | Value::Euler(_) | Value::Color(_) => None,
    };
    resolved
        .or(fallback)
        .or_else(|| required.then(Vec3::zeros))
}

fn parse_vector_text(text: &str) -> Option<Vec3> {
    let parts: Vec<f32> = text
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(|part| part.parse::<f32>().ok())
        .collect::<Option<_>>()?;
    match parts.as_slice() {
        [n] => Some(Vec3::new(*n, *n, *n)),
        [x, y, z, ..] => Some(Vec3::new(*x, *y, *z)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{EngineConfig, SyncContext};
    use crate::resolve::DetachedContext;

    fn context() -> SyncContext {
        SyncContext::new(EngineConfig::new().with_rng_seed(1)).unwrap()
    }

    #[test]
    fn test_list_maps_first_three() {
        let sync = context();
        let cx = DetachedContext::new(&sync);
        let raw = Value::list([1.0, 2.0, 3.0, 4.0]);
        assert_eq!(resolve_vector(&raw, None, false, &cx), Some(Vec3::new(1.0, 2.0, 3.0)));
    }

    #[test]
    fn test_short_list_is_unresolved() {
        let sync = context();
        let cx = DetachedContext::new(&sync);
        let raw = Value::list([1.0, 2.0]);
        assert_eq!(resolve_vector(&raw, None, false, &cx), None);
    }

    #[test]
    fn test_null_uses_fallback_then_required_default() {
        let sync = context();
        let cx = DetachedContext::new(&sync);
        let fallback = Vec3::new(9.0, 9.0, 9.0);
        assert_eq!(resolve_vector(&Value::Null, Some(fallback), false, &cx), Some(fallback));
        assert_eq!(resolve_vector(&Value::Null, None, false, &cx), None);
        assert_eq!(resolve_vector(&Value::Null, None, true, &cx), Some(Vec3::zeros()));
    }

    #[test]
    fn test_scalar_and_text_forms() {
        let sync = context();
        let cx = DetachedContext::new(&sync);
        assert_eq!(resolve_vector(&Value::from(2), None, false, &cx), Some(Vec3::new(2.0, 2.0, 2.0)));
        assert_eq!(
            resolve_vector(&Value::from("1, 0 -1"), None, false, &cx),
            Some(Vec3::new(1.0, 0.0, -1.0))
        );
        assert_eq!(resolve_vector(&Value::from("1,x,2"), None, false, &cx), None);
    }

    #[test]
    fn test_unresolved_reference_falls_back() {
        let sync = context();
        let cx = DetachedContext::new(&sync);
        let mut arena = slotmap::SlotMap::<crate::foundation::collections::ResourceId, ()>::with_key();
        let id = arena.insert(());
        let fallback = Some(Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(resolve_vector(&Value::Resource(id), fallback, false, &cx), fallback);
    }
}
