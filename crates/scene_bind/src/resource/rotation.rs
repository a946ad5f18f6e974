//! Rotation values

use super::ResourceComponent;
use crate::foundation::math::{Euler, RotationOrder};
use crate::resolve::{resolve_angle, resolve_euler, Value, ValueContext};

/// Derive an euler rotation
///
/// `ref` (a node's rotation or a rotation resource) wins over `value`, which
/// wins over individual `x`/`y`/`z` angles in degrees. `order` overrides the
/// rotation order of whatever was found.
pub(super) fn compute(component: &ResourceComponent, cx: &dyn ValueContext) -> Euler {
    let euler = resolve_euler(component.input("ref"), None, false, cx)
        .or_else(|| resolve_euler(component.input("value"), None, false, cx))
        .or_else(|| from_axes(component, cx))
        .unwrap_or_default();

    match component.input("order").as_text().and_then(RotationOrder::parse) {
        Some(order) => euler.with_order(order),
        None => euler,
    }
}

fn from_axes(component: &ResourceComponent, cx: &dyn ValueContext) -> Option<Euler> {
    let axes = ["x", "y", "z"].map(|axis| resolve_angle(component.input(axis), None, cx));
    if axes.iter().all(Option::is_none) {
        return None;
    }
    Some(Euler::new(
        axes[0].unwrap_or(0.0),
        axes[1].unwrap_or(0.0),
        axes[2].unwrap_or(0.0),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{EngineConfig, SyncContext};
    use crate::foundation::math::constants::PI;
    use crate::resolve::DetachedContext;
    use approx::assert_relative_eq;

    #[test]
    fn test_axes_are_degrees() {
        let sync = SyncContext::new(EngineConfig::new()).unwrap();
        let cx = DetachedContext::new(&sync);
        let mut rotation = ResourceComponent::new(super::super::ResourceKind::Rotation);
        rotation.set_input("y", Value::from(90));
        rotation.set_input("order", Value::from("ZYX"));

        let euler = compute(&rotation, &cx);
        assert_relative_eq!(euler.y, PI / 2.0, epsilon = 1e-6);
        assert_eq!(euler.x, 0.0);
        assert_eq!(euler.order, RotationOrder::Zyx);
    }

    #[test]
    fn test_empty_is_identity() {
        let sync = SyncContext::new(EngineConfig::new()).unwrap();
        let cx = DetachedContext::new(&sync);
        let rotation = ResourceComponent::new(super::super::ResourceKind::Rotation);
        assert_eq!(compute(&rotation, &cx), Euler::default());
    }
}
