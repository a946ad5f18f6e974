//! Resource components
//!
//! A resource component owns one typed value (vector, euler, material or
//! geometry) derived from its own declarative inputs. It can be attached to
//! any number of owning nodes at once; each attachment is an [`OwnerLink`]
//! recording where the value lands and which fields the owner accepts.
//!
//! Values are derived lazily: input changes only set a dirty flag, and the
//! next [`ResourceComponent::get_value`] recomputes and caches.

mod vector;
mod rotation;
mod material;
mod geometry;

use std::cell::{Cell, RefCell};
use std::fmt;
use std::sync::Arc;

use bitflags::bitflags;
use log::trace;

use crate::events::{ChangeEvent, SubscriptionSet};
use crate::foundation::collections::{IndexMap, NodeId, ObjectHandle, Publisher};
use crate::foundation::math::{Color, Euler, Vec3};
use crate::resolve::{Value, ValueContext};
use crate::scene::{Geometry, Material, SceneBackend, VectorSlot};

/// Which slot of an owner a resource drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Local translation
    Position,
    /// Local rotation
    Rotation,
    /// Local scale
    Scale,
    /// Point the owner faces
    Lookat,
    /// Material slot
    Material,
    /// Geometry slot
    Geometry,
}

impl ResourceKind {
    /// Every kind, in canonical order
    pub const ALL: [Self; 6] = [
        Self::Position,
        Self::Rotation,
        Self::Scale,
        Self::Lookat,
        Self::Material,
        Self::Geometry,
    ];

    /// Lowercase name
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Position => "position",
            Self::Rotation => "rotation",
            Self::Scale => "scale",
            Self::Lookat => "lookat",
            Self::Material => "material",
            Self::Geometry => "geometry",
        }
    }

    /// Raw event an owner publishes when this slot changes
    pub fn event(self) -> ChangeEvent {
        match self {
            Self::Position => ChangeEvent::Position,
            Self::Rotation => ChangeEvent::Rotation,
            Self::Scale => ChangeEvent::Scale,
            Self::Lookat => ChangeEvent::Lookat,
            Self::Material => ChangeEvent::Material,
            Self::Geometry => ChangeEvent::Geometry,
        }
    }

    /// Whether the kind drives the owner's local transform
    pub fn is_transform(self) -> bool {
        matches!(self, Self::Position | Self::Rotation | Self::Scale | Self::Lookat)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current value of a resource component
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceValue {
    /// Position, scale or look-at target
    Vector(Vec3),
    /// Rotation
    Euler(Euler),
    /// Plain color
    Color(Color),
    /// Shared material
    Material(Arc<Material>),
    /// Shared geometry
    Geometry(Arc<Geometry>),
}

bitflags! {
    /// Vector and euler fields an owner lets a resource drive
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SyncFields: u8 {
        /// X component
        const X = 0b001;
        /// Y component
        const Y = 0b010;
        /// Z component
        const Z = 0b100;
    }
}

impl Default for SyncFields {
    fn default() -> Self {
        Self::all()
    }
}

impl SyncFields {
    /// Parse `"x"`, `"xz"`, `"x,y"`; empty or unknown input means all fields
    pub fn parse(text: &str) -> Self {
        let mut fields = Self::empty();
        for c in text.chars() {
            match c.to_ascii_lowercase() {
                'x' => fields |= Self::X,
                'y' => fields |= Self::Y,
                'z' => fields |= Self::Z,
                _ => {}
            }
        }
        if fields.is_empty() {
            Self::all()
        } else {
            fields
        }
    }

    /// Overwrite the selected components of `current` with `next`
    pub fn merge(self, current: [f32; 3], next: [f32; 3]) -> [f32; 3] {
        let mut merged = current;
        for (index, flag) in [Self::X, Self::Y, Self::Z].into_iter().enumerate() {
            if self.contains(flag) {
                merged[index] = next[index];
            }
        }
        merged
    }
}

/// One owner a resource is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnerLink {
    /// Resolved scene object, if it exists yet
    pub target: Option<ObjectHandle>,
    /// Fields the owner accepts
    pub fields: SyncFields,
    /// Position in the owner's material slot list
    pub slot_index: usize,
    /// A value is waiting for the owner to load
    pub pending_push: bool,
}

/// Subscription keys held by a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceSubKey {
    /// Lifecycle of an attached owner
    Owner(NodeId),
    /// Changes of something the inputs reference
    Source(Publisher),
}

/// A shareable typed value provider
#[derive(Debug)]
pub struct ResourceComponent {
    kind: ResourceKind,
    inputs: IndexMap<String, Value>,
    target_name: Option<String>,
    cached: RefCell<Option<ResourceValue>>,
    dirty: Cell<bool>,
    owners: IndexMap<NodeId, OwnerLink>,
    pub(crate) subscriptions: SubscriptionSet<ResourceSubKey>,
}

impl ResourceComponent {
    /// Create a component with no inputs
    pub fn new(kind: ResourceKind) -> Self {
        Self {
            kind,
            inputs: IndexMap::new(),
            target_name: None,
            cached: RefCell::new(None),
            dirty: Cell::new(true),
            owners: IndexMap::new(),
            subscriptions: SubscriptionSet::new(),
        }
    }

    /// Slot kind this component drives
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Set a declarative input; names are case-insensitive
    ///
    /// Returns whether the stored input actually changed.
    pub fn set_input(&mut self, name: &str, value: Value) -> bool {
        let key = name.trim().to_ascii_lowercase();
        if key == "refname" || key == "target" {
            let name = value.as_text().map(str::to_string).filter(|n| !n.is_empty());
            let changed = self.target_name != name;
            self.target_name = name;
            return changed;
        }
        if value.is_absent() {
            if self.inputs.shift_remove(&key).is_none() {
                return false;
            }
        } else if self.inputs.get(&key) == Some(&value) {
            return false;
        } else {
            self.inputs.insert(key, value);
        }
        self.invalidate();
        true
    }

    /// Read a declarative input
    pub fn input(&self, name: &str) -> &Value {
        static NULL: Value = Value::Null;
        self.inputs.get(name).unwrap_or(&NULL)
    }

    /// Every input, in insertion order
    pub fn inputs(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.inputs.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Name of the sub-object the value lands on, if narrowed
    pub fn target_name(&self) -> Option<&str> {
        self.target_name.as_deref()
    }

    /// Mark the cached value stale
    pub fn invalidate(&self) {
        self.dirty.set(true);
    }

    /// Whether the next read recomputes
    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    /// Current value, recomputed if dirty
    pub fn get_value(&self, cx: &dyn ValueContext) -> Option<ResourceValue> {
        if !self.dirty.get() {
            return self.cached.borrow().clone();
        }
        let value = self.compute(cx);
        trace!("Recomputed {} resource: {:?}", self.kind, value);
        *self.cached.borrow_mut() = value.clone();
        self.dirty.set(false);
        value
    }

    fn compute(&self, cx: &dyn ValueContext) -> Option<ResourceValue> {
        match self.kind {
            ResourceKind::Position | ResourceKind::Scale | ResourceKind::Lookat => {
                vector::compute(self.kind, self, cx).map(ResourceValue::Vector)
            }
            ResourceKind::Rotation => Some(ResourceValue::Euler(rotation::compute(self, cx))),
            ResourceKind::Material => Some(ResourceValue::Material(Arc::new(material::compute(self, cx)))),
            ResourceKind::Geometry => Some(ResourceValue::Geometry(Arc::new(geometry::compute(self, cx)))),
        }
    }

    /// Publishers the inputs reference
    pub fn sources(&self) -> Vec<Publisher> {
        let mut sources = Vec::new();
        for value in self.inputs.values() {
            collect_sources(value, &mut sources);
        }
        sources
    }

    /// Attached owners and their links
    pub fn owners(&self) -> impl Iterator<Item = (NodeId, &OwnerLink)> {
        self.owners.iter().map(|(owner, link)| (*owner, link))
    }

    /// Link to one owner
    pub fn owner(&self, owner: NodeId) -> Option<&OwnerLink> {
        self.owners.get(&owner)
    }

    pub(crate) fn owner_mut(&mut self, owner: NodeId) -> Option<&mut OwnerLink> {
        self.owners.get_mut(&owner)
    }

    /// Whether no owner holds this component
    pub fn is_orphaned(&self) -> bool {
        self.owners.is_empty()
    }

    /// Remember an owner
    pub(crate) fn link_owner(&mut self, owner: NodeId, link: OwnerLink) {
        self.owners.insert(owner, link);
    }

    /// Forget an owner, returning its last link
    pub(crate) fn unlink_owner(&mut self, owner: NodeId) -> Option<OwnerLink> {
        self.owners.shift_remove(&owner)
    }
}

fn collect_sources(value: &Value, sources: &mut Vec<Publisher>) {
    let publisher = match value {
        Value::Resource(id) => Publisher::Resource(*id),
        Value::Node(id) => Publisher::Node(*id),
        Value::List(items) => {
            for item in items {
                collect_sources(item, sources);
            }
            return;
        }
        _ => return,
    };
    if !sources.contains(&publisher) {
        sources.push(publisher);
    }
}

/// Write a value onto a target, honoring the link's field mask
///
/// Returns `false` when the value does not fit the slot.
pub fn push_value<B: SceneBackend + ?Sized>(
    backend: &mut B,
    kind: ResourceKind,
    link: &OwnerLink,
    target: ObjectHandle,
    value: &ResourceValue,
) -> bool {
    match (kind, value) {
        (ResourceKind::Position, ResourceValue::Vector(v)) => {
            push_vector(backend, target, VectorSlot::Position, link.fields, *v);
        }
        (ResourceKind::Scale, ResourceValue::Vector(v)) => {
            push_vector(backend, target, VectorSlot::Scale, link.fields, *v);
        }
        (ResourceKind::Lookat, ResourceValue::Vector(v)) => backend.look_at(target, *v),
        (ResourceKind::Rotation, ResourceValue::Euler(euler)) => {
            let current = backend.rotation(target).unwrap_or_default();
            let [x, y, z] = link
                .fields
                .merge([current.x, current.y, current.z], [euler.x, euler.y, euler.z]);
            backend.set_rotation(target, Euler::new(x, y, z).with_order(euler.order));
        }
        (ResourceKind::Material, ResourceValue::Material(material)) => {
            backend.set_material(target, link.slot_index, Some(Arc::clone(material)));
        }
        (ResourceKind::Material, ResourceValue::Color(color)) => {
            backend.set_material(target, link.slot_index, Some(Arc::new(Material::basic(*color))));
        }
        (ResourceKind::Geometry, ResourceValue::Geometry(geometry)) => {
            backend.set_geometry(target, Some(Arc::clone(geometry)));
        }
        _ => return false,
    }
    true
}

fn push_vector<B: SceneBackend + ?Sized>(
    backend: &mut B,
    target: ObjectHandle,
    slot: VectorSlot,
    fields: SyncFields,
    value: Vec3,
) {
    let merged = if fields == SyncFields::all() {
        value
    } else {
        let current = backend.vector(target, slot).unwrap_or_else(Vec3::zeros);
        let [x, y, z] = fields.merge([current.x, current.y, current.z], [value.x, value.y, value.z]);
        Vec3::new(x, y, z)
    };
    backend.set_vector(target, slot, merged);
}

/// Undo what a detached resource left in its owner's slot
///
/// Transform slots keep their last value; material and geometry slots are
/// cleared.
pub fn clear_slot<B: SceneBackend + ?Sized>(
    backend: &mut B,
    kind: ResourceKind,
    link: &OwnerLink,
    target: ObjectHandle,
) {
    match kind {
        ResourceKind::Material => backend.set_material(target, link.slot_index, None),
        ResourceKind::Geometry => backend.set_geometry(target, None),
        ResourceKind::Position | ResourceKind::Rotation | ResourceKind::Scale | ResourceKind::Lookat => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{EngineConfig, SyncContext};
    use crate::resolve::DetachedContext;
    use crate::scene::{MemoryScene, ObjectKind};

    fn context() -> SyncContext {
        SyncContext::new(EngineConfig::new().with_rng_seed(3)).unwrap()
    }

    #[test]
    fn test_sync_fields_parse_and_merge() {
        assert_eq!(SyncFields::parse("x"), SyncFields::X);
        assert_eq!(SyncFields::parse("X,z"), SyncFields::X | SyncFields::Z);
        assert_eq!(SyncFields::parse(""), SyncFields::all());
        assert_eq!(SyncFields::X.merge([1.0, 2.0, 3.0], [5.0, 7.0, 9.0]), [5.0, 2.0, 3.0]);
    }

    #[test]
    fn test_value_is_cached_until_input_changes() {
        let sync = context();
        let cx = DetachedContext::new(&sync);
        let mut position = ResourceComponent::new(ResourceKind::Position);
        position.set_input("x", Value::from(1));
        assert_eq!(position.get_value(&cx), Some(ResourceValue::Vector(Vec3::new(1.0, 0.0, 0.0))));
        assert!(!position.is_dirty());

        assert!(!position.set_input("x", Value::from(1)));
        assert!(!position.is_dirty());

        assert!(position.set_input("y", Value::from(2)));
        assert_eq!(position.get_value(&cx), Some(ResourceValue::Vector(Vec3::new(1.0, 2.0, 0.0))));
    }

    #[test]
    fn test_target_name_is_not_an_input() {
        let mut scale = ResourceComponent::new(ResourceKind::Scale);
        scale.set_input("refName", Value::from("wheel"));
        assert_eq!(scale.target_name(), Some("wheel"));
        assert_eq!(scale.inputs().count(), 0);
    }

    #[test]
    fn test_push_honors_field_mask() {
        let mut scene = MemoryScene::new();
        let object = scene.create_object(ObjectKind::Object3d);
        scene.set_vector(object, VectorSlot::Position, Vec3::new(1.0, 2.0, 3.0));
        let link = OwnerLink {
            target: Some(object),
            fields: SyncFields::X,
            slot_index: 0,
            pending_push: false,
        };

        let pushed = push_value(
            &mut scene,
            ResourceKind::Position,
            &link,
            object,
            &ResourceValue::Vector(Vec3::new(5.0, 7.0, 9.0)),
        );

        assert!(pushed);
        assert_eq!(scene.vector(object, VectorSlot::Position), Some(Vec3::new(5.0, 2.0, 3.0)));
    }

    #[test]
    fn test_mismatched_value_is_not_pushed() {
        let mut scene = MemoryScene::new();
        let object = scene.create_object(ObjectKind::Mesh);
        let link = OwnerLink {
            target: Some(object),
            fields: SyncFields::all(),
            slot_index: 0,
            pending_push: false,
        };
        let pushed = push_value(
            &mut scene,
            ResourceKind::Geometry,
            &link,
            object,
            &ResourceValue::Vector(Vec3::zeros()),
        );
        assert!(!pushed);
    }

    #[test]
    fn test_sources_collects_references() {
        let mut nodes = slotmap::SlotMap::<NodeId, ()>::with_key();
        let node = nodes.insert(());
        let mut lookat = ResourceComponent::new(ResourceKind::Lookat);
        lookat.set_input("ref", Value::Node(node));
        lookat.set_input("multiply", Value::List(vec![Value::Node(node), Value::from(2)]));
        assert_eq!(lookat.sources(), vec![Publisher::Node(node)]);
    }
}
