//! Resource attachment and value fan-out

use std::cell::Cell;
use std::sync::Arc;

use log::{debug, trace};

use super::engine::SyncEngine;
use super::node::{NodeKind, NodeSubKey};
use super::report::ApplyReport;
use super::token::ChangeToken;
use crate::events::{ChangeEvent, Subscriber};
use crate::foundation::collections::{IndexSet, NodeId, ObjectHandle, Publisher, ResourceId};
use crate::foundation::math::{Color, Euler, Vec3};
use crate::resolve::{
    resolve_color, resolve_enum, resolve_euler, resolve_vector, GeometryKind, Value, ValueContext,
};
use crate::resource::{self, OwnerLink, ResourceKind, ResourceSubKey, ResourceValue};
use crate::scene::{Geometry, Material, SceneBackend, VectorSlot};

/// Filter a resource uses to follow the owners it is attached to
const OWNER_FILTER: &str = "loaded,destroy";
/// Filter a resource uses to follow a node it reads from
const NODE_SOURCE_FILTER: &str = "position,rotation,scale";
/// Filter a resource uses to follow another resource it reads from
const RESOURCE_SOURCE_FILTER: &str = "changed";

/// [`ValueContext`] backed by a live engine
///
/// Resource-to-resource references are followed up to the configured depth,
/// which also stops reference cycles.
pub(super) struct Lookup<'a, B: SceneBackend> {
    engine: &'a SyncEngine<B>,
    depth: Cell<u8>,
}

impl<'a, B: SceneBackend> Lookup<'a, B> {
    pub(super) fn new(engine: &'a SyncEngine<B>) -> Self {
        Self { engine, depth: Cell::new(0) }
    }
}

impl<B: SceneBackend> ValueContext for Lookup<'_, B> {
    fn resource_value(&self, id: ResourceId) -> Option<ResourceValue> {
        let depth = self.depth.get();
        if depth >= self.engine.context.config().max_reference_depth {
            debug!("Reference depth exceeded at resource {:?}", id);
            return None;
        }
        self.depth.set(depth + 1);
        let value = self.engine.resources.get(id).and_then(|r| r.get_value(self));
        self.depth.set(depth);
        value
    }

    fn node_object(&self, node: NodeId) -> Option<ObjectHandle> {
        self.engine.nodes.get(node).and_then(|n| n.object)
    }

    fn object_vector(&self, object: ObjectHandle, slot: VectorSlot) -> Option<Vec3> {
        self.engine.backend.vector(object, slot)
    }

    fn object_rotation(&self, object: ObjectHandle) -> Option<Euler> {
        self.engine.backend.rotation(object)
    }

    fn random_unit(&self) -> f32 {
        self.engine.context.random_unit()
    }

    fn asset_url(&self, kind: &str, reference: &str) -> String {
        self.engine.context.asset_url(kind, reference)
    }
}

/// Literal value used when no resource drives a slot
enum Fallback {
    Vector(VectorSlot, Vec3),
    Rotation(Euler),
    LookAt(Vec3),
    Material(Color),
    Geometry(GeometryKind),
}

impl<B: SceneBackend> SyncEngine<B> {
    /// Resource branch of an apply pass
    ///
    /// Diffs the wanted resources (attribute reference first, then content
    /// children) against the attached ones. Only the difference is attached
    /// or detached, so re-applying an unchanged list touches nothing.
    pub(super) fn apply_resource_list(&mut self, id: NodeId, kind: ResourceKind, report: &mut ApplyReport) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        let mut wanted: Vec<ResourceId> = Vec::new();
        if let Some(resource) = node.attribute(kind.into()).as_resource() {
            wanted.push(resource);
        }
        if let Some(children) = node.content_resources.get(&kind) {
            wanted.extend(children.iter().copied());
        }
        let mut seen = IndexSet::new();
        wanted.retain(|resource| {
            self.resources.get(*resource).is_some_and(|r| r.kind() == kind) && seen.insert(*resource)
        });
        let cached = node.bound_resources(kind).to_vec();
        let handle = node.object;

        let mut changed = false;
        for &resource in cached.iter().filter(|r| !wanted.contains(r)) {
            self.detach_resource(resource, id);
            report.detached.push(resource);
            changed = true;
        }
        for (index, &resource) in wanted.iter().enumerate() {
            if !cached.contains(&resource) {
                self.attach_resource(resource, id, index);
                report.attached.push(resource);
                changed = true;
            } else if kind == ResourceKind::Material {
                self.move_material_slot(resource, id, index);
            }
        }
        // Geometry has a single slot: the last wanted component owns it
        if kind == ResourceKind::Geometry && changed {
            if let Some(&last) = wanted.last().filter(|last| cached.contains(last)) {
                self.repush_link(last, id);
            }
        }

        if let Some(node) = self.nodes.get_mut(id) {
            if wanted.is_empty() {
                node.bound.shift_remove(&kind);
            } else {
                node.bound.insert(kind, wanted.clone());
            }
        }
        if kind == ResourceKind::Material && !(wanted.is_empty() && cached.is_empty()) {
            if let Some(handle) = handle {
                self.backend.truncate_materials(handle, wanted.len());
            }
        }
        if wanted.is_empty() {
            self.apply_fallback(id, kind);
        }
    }

    /// Attach one resource to an owner and push its value when possible
    pub(super) fn attach_resource(&mut self, resource: ResourceId, owner: NodeId, slot_index: usize) {
        let (Some(node), Some(component)) = (self.nodes.get(owner), self.resources.get(resource)) else {
            return;
        };
        let kind = component.kind();
        let loaded = node.loaded;
        let watch_changes =
            node.kind == NodeKind::Chart && matches!(kind, ResourceKind::Material | ResourceKind::Geometry);
        let mut link = OwnerLink {
            target: self.resolve_target(resource, owner),
            fields: node.sync_fields(kind),
            slot_index,
            pending_push: true,
        };
        if let (true, Some(target)) = (loaded, link.target) {
            if self.push_resource(resource, &link, target) {
                link.pending_push = false;
            }
        }

        let lifecycle = self
            .channel
            .subscribe(owner, Subscriber::Resource(resource), OWNER_FILTER);
        if let Some(component) = self.resources.get_mut(resource) {
            component
                .subscriptions
                .replace(&mut self.channel, ResourceSubKey::Owner(owner), lifecycle);
            component.link_owner(owner, link);
        }
        if watch_changes {
            let changes = self
                .channel
                .subscribe(resource, Subscriber::Node(owner), RESOURCE_SOURCE_FILTER);
            if let Some(node) = self.nodes.get_mut(owner) {
                node.subscriptions
                    .replace(&mut self.channel, NodeSubKey::Resource(resource), changes);
            }
        }
        debug!(
            "Attached {} resource {:?} to {:?} (slot {}, pending {})",
            kind, resource, owner, slot_index, link.pending_push
        );
    }

    /// Detach one resource from an owner, clearing what it left behind
    pub(super) fn detach_resource(&mut self, resource: ResourceId, owner: NodeId) {
        let Some(component) = self.resources.get_mut(resource) else {
            return;
        };
        let kind = component.kind();
        component
            .subscriptions
            .remove(&mut self.channel, &ResourceSubKey::Owner(owner));
        let link = component.unlink_owner(owner);
        if let Some(node) = self.nodes.get_mut(owner) {
            node.subscriptions
                .remove(&mut self.channel, &NodeSubKey::Resource(resource));
        }
        let Some(link) = link else {
            return;
        };
        if let (false, Some(target)) = (link.pending_push, link.target) {
            resource::clear_slot(&mut self.backend, kind, &link, target);
        }
        debug!("Detached {} resource {:?} from {:?}", kind, resource, owner);
    }

    /// Scene object a resource writes to for one owner
    ///
    /// A target name narrows the owner's object to a named descendant.
    pub(super) fn resolve_target(&self, resource: ResourceId, owner: NodeId) -> Option<ObjectHandle> {
        let root = self.nodes.get(owner)?.object?;
        match self.resources.get(resource)?.target_name() {
            Some(name) => self.backend.find_by_name(root, name),
            None => Some(root),
        }
    }

    /// Compute (or reuse) a resource value and write it through a link
    pub(super) fn push_resource(&mut self, resource: ResourceId, link: &OwnerLink, target: ObjectHandle) -> bool {
        let Some(kind) = self.resources.get(resource).map(|r| r.kind()) else {
            return false;
        };
        let value = {
            let lookup = Lookup::new(self);
            self.resources.get(resource).and_then(|r| r.get_value(&lookup))
        };
        match value {
            Some(value) => resource::push_value(&mut self.backend, kind, link, target, &value),
            None => false,
        }
    }

    /// Owner finished loading: deliver the value that was held back
    pub(super) fn deliver_pending(&mut self, resource: ResourceId, owner: NodeId) {
        let target = self.resolve_target(resource, owner);
        let loaded = self.nodes.get(owner).is_some_and(|node| node.loaded);
        let Some(link) = self.resources.get_mut(resource).and_then(|r| r.owner_mut(owner)) else {
            return;
        };
        link.target = target;
        if !link.pending_push || !loaded {
            return;
        }
        let Some(target) = target else {
            return;
        };
        let snapshot = *link;
        if self.push_resource(resource, &snapshot, target) {
            self.settle_push(resource, owner);
            if self.resources.get(resource).is_some_and(|r| r.kind().is_transform()) {
                self.matrix_dirty.insert(owner);
            }
            trace!("Delivered held value of {:?} to {:?}", resource, owner);
        }
    }

    /// Re-derive a resource and push the value to every ready owner
    ///
    /// The value is computed once and shared across owners; each owner's
    /// field mask applies independently.
    pub(super) fn refresh_resource(&mut self, resource: ResourceId) {
        let Some(component) = self.resources.get(resource) else {
            return;
        };
        let kind = component.kind();
        let owners: Vec<NodeId> = component.owners().map(|(owner, _)| owner).collect();

        for &owner in &owners {
            let target = self.resolve_target(resource, owner);
            let loaded = self.nodes.get(owner).is_some_and(|node| node.loaded);
            let Some(link) = self.resources.get_mut(resource).and_then(|r| r.owner_mut(owner)) else {
                continue;
            };
            link.target = target;
            let snapshot = *link;
            let (true, Some(target)) = (loaded, target) else {
                continue;
            };
            if self.push_resource(resource, &snapshot, target) {
                self.settle_push(resource, owner);
                if kind.is_transform() {
                    self.matrix_dirty.insert(owner);
                }
            }
        }
        trace!("Refreshed {} resource {:?} for {} owners", kind, resource, owners.len());

        self.publish(resource, &[ChangeEvent::Changed]);
        for owner in owners {
            self.publish(owner, &[kind.event()]);
        }
    }

    /// Re-push every attached resource of one kind without re-attaching
    pub(super) fn repush_bound(&mut self, id: NodeId, kind: ResourceKind) {
        let bound = self
            .nodes
            .get(id)
            .map(|node| node.bound_resources(kind).to_vec())
            .unwrap_or_default();
        if bound.is_empty() {
            self.apply_fallback(id, kind);
            return;
        }
        for resource in bound {
            if let Some(component) = self.resources.get(resource) {
                component.invalidate();
                self.repush_link(resource, id);
            }
        }
    }

    /// Write an attached resource's current value through its link again
    fn repush_link(&mut self, resource: ResourceId, owner: NodeId) {
        let loaded = self.nodes.get(owner).is_some_and(|node| node.loaded);
        let Some(link) = self.resources.get(resource).and_then(|r| r.owner(owner)).copied() else {
            return;
        };
        if let (true, Some(target)) = (loaded, link.target) {
            if self.push_resource(resource, &link, target) {
                self.settle_push(resource, owner);
            }
        }
    }

    fn settle_push(&mut self, resource: ResourceId, owner: NodeId) {
        if let Some(link) = self.resources.get_mut(resource).and_then(|r| r.owner_mut(owner)) {
            link.pending_push = false;
        }
    }

    /// Keep subscriptions to whatever the inputs reference in step with them
    pub(super) fn resubscribe_sources(&mut self, resource: ResourceId) {
        let Some(component) = self.resources.get_mut(resource) else {
            return;
        };
        let sources = component.sources();
        component
            .subscriptions
            .remove_where(&mut self.channel, |key| matches!(key, ResourceSubKey::Source(_)));
        for source in sources {
            let filter = match source {
                Publisher::Resource(other) if other == resource => continue,
                Publisher::Resource(_) => RESOURCE_SOURCE_FILTER,
                Publisher::Node(_) => NODE_SOURCE_FILTER,
            };
            let disposable = self.channel.subscribe(source, Subscriber::Resource(resource), filter);
            component
                .subscriptions
                .replace(&mut self.channel, ResourceSubKey::Source(source), disposable);
        }
    }

    fn move_material_slot(&mut self, resource: ResourceId, owner: NodeId, index: usize) {
        let Some(link) = self.resources.get_mut(resource).and_then(|r| r.owner_mut(owner)) else {
            return;
        };
        if link.slot_index == index {
            return;
        }
        link.slot_index = index;
        let snapshot = *link;
        if let (false, Some(target)) = (snapshot.pending_push, snapshot.target) {
            self.push_resource(resource, &snapshot, target);
        }
    }

    /// Write the literal attribute of a slot no resource drives
    ///
    /// Unresolvable literals leave the slot untouched.
    fn apply_fallback(&mut self, id: NodeId, kind: ResourceKind) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        let Some(handle) = node.object else {
            return;
        };
        let raw = node.attribute(ChangeToken::from(kind));
        if raw.is_absent() {
            return;
        }
        let fallback = {
            let lookup = Lookup::new(self);
            literal_fallback(kind, raw, &lookup)
        };
        let Some(fallback) = fallback else {
            trace!("No literal {} for {:?}", kind, id);
            return;
        };
        match fallback {
            Fallback::Vector(slot, value) => self.backend.set_vector(handle, slot, value),
            Fallback::Rotation(euler) => self.backend.set_rotation(handle, euler),
            Fallback::LookAt(point) => self.backend.look_at(handle, point),
            Fallback::Material(color) => {
                self.backend
                    .set_material(handle, 0, Some(Arc::new(Material::basic(color))));
                self.backend.truncate_materials(handle, 1);
            }
            Fallback::Geometry(geometry) => {
                self.backend
                    .set_geometry(handle, Some(Arc::new(Geometry::new(geometry))));
            }
        }
    }
}

fn literal_fallback(kind: ResourceKind, raw: &Value, cx: &dyn ValueContext) -> Option<Fallback> {
    match kind {
        ResourceKind::Position => {
            resolve_vector(raw, None, false, cx).map(|v| Fallback::Vector(VectorSlot::Position, v))
        }
        ResourceKind::Scale => {
            resolve_vector(raw, None, false, cx).map(|v| Fallback::Vector(VectorSlot::Scale, v))
        }
        ResourceKind::Rotation => resolve_euler(raw, None, false, cx).map(Fallback::Rotation),
        ResourceKind::Lookat => resolve_vector(raw, None, false, cx).map(Fallback::LookAt),
        ResourceKind::Material => resolve_color(raw, None, false, cx).map(Fallback::Material),
        ResourceKind::Geometry => resolve_enum::<GeometryKind>(raw, None).map(Fallback::Geometry),
    }
}
