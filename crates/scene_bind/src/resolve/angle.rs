//! Angle and euler resolution
//!
//! Declarative angles are degrees. The literal `"random"` picks a uniform
//! angle in `[0, 2π)`, and a `rad` suffix passes radians through.

use super::{resolve_f32, Value, ValueContext};
use crate::foundation::math::{constants::TAU, utils::deg_to_rad, Euler, RotationOrder};
use crate::resource::ResourceValue;

/// Resolve one angle to radians
pub fn resolve_angle(raw: &Value, fallback: Option<f32>, cx: &dyn ValueContext) -> Option<f32> {
    let resolved = match raw {
        Value::Number(_) => resolve_f32(raw, None).map(deg_to_rad),
        Value::Text(text) => {
            let text = text.trim().to_ascii_lowercase();
            if text == "random" {
                Some(cx.random_unit() * TAU)
            } else if let Some(radians) = text.strip_suffix("rad") {
                radians.trim().parse::<f32>().ok()
            } else {
                text.strip_suffix("deg")
                    .unwrap_or(&text)
                    .trim()
                    .parse::<f32>()
                    .ok()
                    .map(deg_to_rad)
            }
        }
        _ => None,
    };
    resolved.filter(|a| a.is_finite()).or(fallback)
}

/// Resolve an euler rotation
///
/// Lists are `[x, y, z]` in degrees (each element may be `"random"`),
/// optionally followed by an order name such as `"YXZ"`.
pub fn resolve_euler(
    raw: &Value,
    fallback: Option<Euler>,
    required: bool,
    cx: &dyn ValueContext,
) -> Option<Euler> {
    let resolved = match raw {
        Value::Euler(euler) => Some(*euler),
        Value::List(items) if items.len() >= 3 => {
            let angles: Option<Vec<f32>> = items[..3]
                .iter()
                .map(|item| resolve_angle(item, None, cx))
                .collect();
            angles.map(|xyz| {
                let order = items
                    .get(3)
                    .and_then(Value::as_text)
                    .and_then(RotationOrder::parse)
                    .unwrap_or_default();
                Euler::new(xyz[0], xyz[1], xyz[2]).with_order(order)
            })
        }
        Value::Vector(v) => Some(Euler::new(deg_to_rad(v.x), deg_to_rad(v.y), deg_to_rad(v.z))),
        Value::Text(text) if text.trim().eq_ignore_ascii_case("random") => Some(Euler::new(
            cx.random_unit() * TAU,
            cx.random_unit() * TAU,
            cx.random_unit() * TAU,
        )),
        Value::Resource(id) => match cx.resource_value(*id) {
            Some(ResourceValue::Euler(euler)) => Some(euler),
            _ => None,
        },
        Value::Node(node) => cx
            .node_object(*node)
            .and_then(|object| cx.object_rotation(object)),
        _ => None,
    };
    resolved
        .or(fallback)
        .or_else(|| required.then(Euler::default))
}
