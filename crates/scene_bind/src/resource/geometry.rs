//! Geometry values
//!
//! Only the description is derived here; vertex data is the backend's job.

use super::{ResourceComponent, ResourceValue};
use crate::resolve::{resolve_enum, resolve_f32, resolve_f32_list, GeometryKind, Value, ValueContext};
use crate::scene::Geometry;

/// Named parameters per family, in parameter order
fn parameter_names(kind: GeometryKind) -> &'static [&'static str] {
    match kind {
        GeometryKind::Box => &["width", "height", "depth"],
        GeometryKind::Sphere => &["radius", "widthsegments", "heightsegments"],
        GeometryKind::Plane => &["width", "height"],
        GeometryKind::Cylinder => &["radiustop", "radiusbottom", "height"],
        GeometryKind::Torus => &["radius", "tube"],
        GeometryKind::Buffer => &[],
    }
}

/// Derive a geometry description
///
/// Starts from a referenced geometry resource or the family defaults, then
/// applies the `parameters` list and finally any named parameter.
pub(super) fn compute(component: &ResourceComponent, cx: &dyn ValueContext) -> Geometry {
    let base = match component.input("ref").as_resource().and_then(|id| cx.resource_value(id)) {
        Some(ResourceValue::Geometry(base)) => Some((*base).clone()),
        _ => None,
    };
    let kind = resolve_enum::<GeometryKind>(component.input("type"), base.as_ref().map(|g| g.kind))
        .unwrap_or_default();
    let mut geometry = match base {
        Some(base) if base.kind == kind => base,
        _ => Geometry::new(kind),
    };

    if let Value::List(items) = component.input("parameters") {
        if let Some(values) = resolve_f32_list(items, 1) {
            for (index, value) in values.into_iter().enumerate() {
                if index < geometry.parameters.len() {
                    geometry.parameters[index] = value;
                } else {
                    geometry.parameters.push(value);
                }
            }
        }
    }
    for (index, name) in parameter_names(kind).iter().enumerate() {
        if let (Some(value), Some(slot)) = (
            resolve_f32(component.input(name), None),
            geometry.parameters.get_mut(index),
        ) {
            *slot = value;
        }
    }
    geometry
}
