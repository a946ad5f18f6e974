//! Material values

use super::{ResourceComponent, ResourceValue};
use crate::resolve::{
    resolve_bool, resolve_color, resolve_enum, resolve_f32, resolve_string, Blending, MaterialKind, Side,
    ValueContext, Wrapping,
};
use crate::scene::{Material, TextureRef};

/// Derive a material
///
/// A `ref` to another material resource supplies the starting point; every
/// explicit input then overrides its field. Opacity below one turns
/// transparency on unless `transparent` says otherwise.
pub(super) fn compute(component: &ResourceComponent, cx: &dyn ValueContext) -> Material {
    let mut material = match component.input("ref").as_resource().and_then(|id| cx.resource_value(id)) {
        Some(ResourceValue::Material(base)) => (*base).clone(),
        _ => Material::default(),
    };

    if let Some(kind) = resolve_enum::<MaterialKind>(component.input("type"), None) {
        material.kind = kind;
    }
    if let Some(color) = resolve_color(component.input("color"), None, false, cx) {
        material.color = color;
    }
    if let Some(opacity) = resolve_f32(component.input("opacity"), None) {
        material.opacity = opacity.clamp(0.0, 1.0);
        material.transparent = material.opacity < 1.0;
    }
    if let Some(transparent) = resolve_bool(component.input("transparent"), None) {
        material.transparent = transparent;
    }
    if let Some(side) = resolve_enum::<Side>(component.input("side"), None) {
        material.side = side;
    }
    if let Some(blending) = resolve_enum::<Blending>(component.input("blending"), None) {
        material.blending = blending;
    }
    if let Some(wireframe) = resolve_bool(component.input("wireframe"), None) {
        material.wireframe = wireframe;
    }
    if let Some(reference) = resolve_string(component.input("map"), None).filter(|r| !r.is_empty()) {
        let wrap = resolve_enum::<Wrapping>(component.input("wrap"), None);
        material.map = Some(TextureRef {
            url: cx.asset_url("texture", &reference),
            wrap_s: resolve_enum(component.input("wraps"), wrap).unwrap_or_default(),
            wrap_t: resolve_enum(component.input("wrapt"), wrap).unwrap_or_default(),
        });
    }
    if let Some(name) = resolve_string(component.input("name"), None) {
        material.name = Some(name);
    }
    material
}
