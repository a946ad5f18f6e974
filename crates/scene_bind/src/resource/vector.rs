//! Position, scale and look-at values

use super::{ResourceComponent, ResourceKind};
use crate::foundation::math::utils::{cylindrical_to_cartesian, deg_to_rad, spherical_to_cartesian};
use crate::foundation::math::Vec3;
use crate::resolve::{resolve_bool, resolve_f32, resolve_f32_list, resolve_vector, Value, ValueContext};
use crate::scene::VectorSlot;

/// Derive a vector value
///
/// Precedence: `ref` > `value` / `x`,`y`,`z` > `spherical` / `cylindrical`
/// > kind default. `normalize` then `multiply` apply to whatever was found.
/// Look-at has no default and yields `None` without inputs.
pub(super) fn compute(
    kind: ResourceKind,
    component: &ResourceComponent,
    cx: &dyn ValueContext,
) -> Option<Vec3> {
    let base = from_reference(kind, component.input("ref"), cx)
        .or_else(|| from_fields(kind, component, cx))
        .or_else(|| from_alternate(component));

    let Some(mut value) = base else {
        return default_for(kind);
    };

    if resolve_bool(component.input("normalize"), Some(false)) == Some(true) {
        if let Some(unit) = value.try_normalize(f32::EPSILON) {
            value = unit;
        }
    }
    if let Some(factor) = resolve_vector(component.input("multiply"), None, false, cx) {
        value.component_mul_assign(&factor);
    }
    Some(value)
}

fn from_reference(kind: ResourceKind, reference: &Value, cx: &dyn ValueContext) -> Option<Vec3> {
    match reference {
        Value::Node(node) => {
            let slot = match kind {
                ResourceKind::Scale => VectorSlot::Scale,
                _ => VectorSlot::Position,
            };
            cx.node_object(*node).and_then(|object| cx.object_vector(object, slot))
        }
        other => resolve_vector(other, None, false, cx),
    }
}

fn from_fields(kind: ResourceKind, component: &ResourceComponent, cx: &dyn ValueContext) -> Option<Vec3> {
    if let Some(value) = resolve_vector(component.input("value"), None, false, cx) {
        return Some(value);
    }
    let axes = ["x", "y", "z"].map(|axis| resolve_f32(component.input(axis), None));
    if axes.iter().all(Option::is_none) {
        return None;
    }
    let base = default_for(kind).unwrap_or_else(Vec3::zeros);
    Some(Vec3::new(
        axes[0].unwrap_or(base.x),
        axes[1].unwrap_or(base.y),
        axes[2].unwrap_or(base.z),
    ))
}

fn from_alternate(component: &ResourceComponent) -> Option<Vec3> {
    if let Value::List(items) = component.input("spherical") {
        if let Some(v) = resolve_f32_list(items.get(..3).unwrap_or(items), 3) {
            return Some(spherical_to_cartesian(v[0], deg_to_rad(v[1]), deg_to_rad(v[2])));
        }
    }
    if let Value::List(items) = component.input("cylindrical") {
        if let Some(v) = resolve_f32_list(items.get(..3).unwrap_or(items), 3) {
            return Some(cylindrical_to_cartesian(v[0], deg_to_rad(v[1]), v[2]));
        }
    }
    None
}

fn default_for(kind: ResourceKind) -> Option<Vec3> {
    match kind {
        ResourceKind::Scale => Some(Vec3::new(1.0, 1.0, 1.0)),
        ResourceKind::Lookat => None,
        _ => Some(Vec3::zeros()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{EngineConfig, SyncContext};
    use crate::resolve::DetachedContext;
    use approx::assert_relative_eq;

    fn component(kind: ResourceKind, inputs: &[(&str, Value)]) -> ResourceComponent {
        let mut component = ResourceComponent::new(kind);
        for (name, value) in inputs {
            component.set_input(name, value.clone());
        }
        component
    }

    #[test]
    fn test_kind_defaults() {
        let sync = SyncContext::new(EngineConfig::new()).unwrap();
        let cx = DetachedContext::new(&sync);
        let scale = component(ResourceKind::Scale, &[("y", Value::from(3))]);
        assert_eq!(compute(ResourceKind::Scale, &scale, &cx), Some(Vec3::new(1.0, 3.0, 1.0)));

        let lookat = component(ResourceKind::Lookat, &[]);
        assert_eq!(compute(ResourceKind::Lookat, &lookat, &cx), None);
    }

    #[test]
    fn test_value_beats_spherical() {
        let sync = SyncContext::new(EngineConfig::new()).unwrap();
        let cx = DetachedContext::new(&sync);
        let position = component(
            ResourceKind::Position,
            &[
                ("spherical", Value::list([2.0, 0.0, 0.0])),
                ("value", Value::list([4.0, 5.0, 6.0])),
            ],
        );
        assert_eq!(compute(ResourceKind::Position, &position, &cx), Some(Vec3::new(4.0, 5.0, 6.0)));
    }

    #[test]
    fn test_cylindrical_then_multiply() {
        let sync = SyncContext::new(EngineConfig::new()).unwrap();
        let cx = DetachedContext::new(&sync);
        let position = component(
            ResourceKind::Position,
            &[
                ("cylindrical", Value::list([1.0, 90.0, 2.0])),
                ("multiply", Value::from(3)),
            ],
        );
        let value = compute(ResourceKind::Position, &position, &cx).unwrap();
        assert_relative_eq!(value, Vec3::new(3.0, 6.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn test_normalize_before_multiply() {
        let sync = SyncContext::new(EngineConfig::new()).unwrap();
        let cx = DetachedContext::new(&sync);
        let position = component(
            ResourceKind::Position,
            &[
                ("value", Value::list([0.0, 0.0, 10.0])),
                ("normalize", Value::from(true)),
                ("multiply", Value::list([1.0, 1.0, 2.0])),
            ],
        );
        assert_eq!(compute(ResourceKind::Position, &position, &cx), Some(Vec3::new(0.0, 0.0, 2.0)));
    }
}
