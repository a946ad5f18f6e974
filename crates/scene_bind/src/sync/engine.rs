//! Synchronization engine
//!
//! Owns every node and resource component, drives apply passes and routes
//! channel notifications between them. All work happens synchronously
//! inside host calls; [`SyncEngine::flush`] is the scheduling primitive.

use log::{debug, info, trace};

use super::changes::Pass;
use super::node::{NodeKind, NodeOptions, NodeState, NodeSubKey, OwningNode};
use super::report::ApplyReport;
use super::token::{Branch, ChangeToken, LiteralSlot, StructuralKind};
use crate::core::{EngineConfig, SyncContext};
use crate::error::{SyncError, SyncResult};
use crate::events::{
    ChangeEvent, Disposable, Interest, Notification, Subscriber, SubscriptionChannel, Target,
};
use crate::foundation::collections::{IndexSet, NodeId, ObjectHandle, Publisher, ResourceId, SlotMap};
use crate::resolve::{resolve_bool, resolve_int, resolve_string, Value};
use crate::resource::{ResourceComponent, ResourceKind, SyncFields};
use crate::scene::{ObjectFlag, SceneBackend};

/// Keeps a [`SceneBackend`] in sync with declarative nodes
pub struct SyncEngine<B: SceneBackend> {
    pub(super) backend: B,
    pub(super) context: SyncContext,
    pub(super) nodes: SlotMap<NodeId, OwningNode>,
    pub(super) resources: SlotMap<ResourceId, ResourceComponent>,
    pub(super) channel: SubscriptionChannel,
    pub(super) dirty_nodes: IndexSet<NodeId>,
    pub(super) dirty_resources: IndexSet<ResourceId>,
    pub(super) matrix_dirty: IndexSet<NodeId>,
}

impl<B: SceneBackend> SyncEngine<B> {
    /// Create an engine over a backend
    pub fn new(backend: B, context: SyncContext) -> Self {
        Self {
            backend,
            context,
            nodes: SlotMap::with_key(),
            resources: SlotMap::with_key(),
            channel: SubscriptionChannel::new(),
            dirty_nodes: IndexSet::new(),
            dirty_resources: IndexSet::new(),
            matrix_dirty: IndexSet::new(),
        }
    }

    /// Create an engine from a configuration
    pub fn with_config(backend: B, config: EngineConfig) -> SyncResult<Self> {
        Ok(Self::new(backend, SyncContext::new(config)?))
    }

    /// Scene backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Scene backend, mutably; objects the engine owns should be left alone
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Shared context
    pub fn context(&self) -> &SyncContext {
        &self.context
    }

    /// Shared context, mutably (asset path registration)
    pub fn context_mut(&mut self) -> &mut SyncContext {
        &mut self.context
    }

    /// Look up a node
    pub fn node(&self, id: NodeId) -> Option<&OwningNode> {
        self.nodes.get(id)
    }

    /// Look up a resource component
    pub fn resource(&self, id: ResourceId) -> Option<&ResourceComponent> {
        self.resources.get(id)
    }

    /// Number of nodes, including destroyed ones
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of live resource components
    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }

    // ---------------------------------------------------------------------
    // Nodes
    // ---------------------------------------------------------------------

    /// Register a node; its scene object is created on first access
    pub fn create_node(&mut self, kind: NodeKind, options: NodeOptions) -> NodeId {
        let id = self.nodes.insert(OwningNode::new(kind, options));
        self.channel.register_publisher(id);
        trace!("Created {:?} node {:?}", kind, id);
        id
    }

    /// Set a raw attribute and queue its token
    ///
    /// Reserved tokens (`init`, `clearinit`) are only queued. Input for a
    /// destroyed node is ignored.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: impl Into<Value>) -> SyncResult<()> {
        let token: ChangeToken = name.parse()?;
        self.set_attribute_token(id, token, value.into())
    }

    /// Set a raw attribute by token
    pub fn set_attribute_token(&mut self, id: NodeId, token: ChangeToken, value: Value) -> SyncResult<()> {
        let node = self.nodes.get_mut(id).ok_or(SyncError::UnknownNode(id))?;
        if node.state == NodeState::Destroyed {
            return Ok(());
        }
        if token.branch() != Branch::Reserved {
            node.attributes.insert(token, value);
        }
        self.queue(id, token);
        Ok(())
    }

    /// Queue token names without changing any attribute
    ///
    /// Unknown names are skipped; returns how many were queued.
    pub fn add_changes(&mut self, id: NodeId, names: &str) -> SyncResult<usize> {
        let node = self.nodes.get_mut(id).ok_or(SyncError::UnknownNode(id))?;
        if node.state == NodeState::Destroyed {
            return Ok(0);
        }
        let added = node.pending.add(names);
        if added > 0 {
            self.dirty_nodes.insert(id);
        }
        Ok(added)
    }

    /// Queue typed tokens without changing any attribute
    pub fn add_change_tokens(
        &mut self,
        id: NodeId,
        tokens: impl IntoIterator<Item = ChangeToken>,
    ) -> SyncResult<()> {
        let node = self.nodes.get(id).ok_or(SyncError::UnknownNode(id))?;
        if node.state == NodeState::Destroyed {
            return Ok(());
        }
        for token in tokens {
            self.queue(id, token);
        }
        Ok(())
    }

    /// Set the ordered content-child resources of one kind
    pub fn set_content_resources(
        &mut self,
        id: NodeId,
        kind: ResourceKind,
        resources: Vec<ResourceId>,
    ) -> SyncResult<()> {
        for &resource in &resources {
            let found = self
                .resources
                .get(resource)
                .ok_or(SyncError::UnknownResource(resource))?
                .kind();
            if found != kind {
                return Err(SyncError::KindMismatch { resource, expected: kind, found });
            }
        }
        let node = self.nodes.get_mut(id).ok_or(SyncError::UnknownNode(id))?;
        if node.state == NodeState::Destroyed {
            return Ok(());
        }
        node.content_resources.insert(kind, resources);
        self.queue(id, kind.into());
        Ok(())
    }

    /// Set the ordered content-child nodes of one structural kind
    pub fn set_content_children(
        &mut self,
        id: NodeId,
        kind: StructuralKind,
        children: Vec<NodeId>,
    ) -> SyncResult<()> {
        for &child in &children {
            if child == id {
                return Err(SyncError::SelfContainment(id));
            }
            if !self.nodes.contains_key(child) {
                return Err(SyncError::UnknownNode(child));
            }
        }
        let node = self.nodes.get_mut(id).ok_or(SyncError::UnknownNode(id))?;
        if node.state == NodeState::Destroyed {
            return Ok(());
        }
        node.content_children.insert(kind, children);
        self.queue(id, kind.token());
        Ok(())
    }

    /// Restrict which vector fields resources of `kind` drive on this node
    pub fn set_sync_fields(&mut self, id: NodeId, kind: ResourceKind, fields: SyncFields) -> SyncResult<()> {
        let node = self.nodes.get_mut(id).ok_or(SyncError::UnknownNode(id))?;
        if node.state == NodeState::Destroyed {
            return Ok(());
        }
        node.sync_fields.insert(kind, fields);
        let bound = node.bound_resources(kind).to_vec();
        for resource in bound {
            if let Some(link) = self.resources.get_mut(resource).and_then(|r| r.owner_mut(id)) {
                link.fields = fields;
                self.dirty_resources.insert(resource);
            }
        }
        Ok(())
    }

    /// Scene object of a node, creating it on first access
    ///
    /// The first access runs the full canonical change-set once, together
    /// with anything buffered before. Destroyed nodes and behaviours yield
    /// `None`.
    pub fn object(&mut self, id: NodeId) -> SyncResult<Option<ObjectHandle>> {
        let node = self.nodes.get_mut(id).ok_or(SyncError::UnknownNode(id))?;
        match node.state {
            NodeState::Destroyed => return Ok(None),
            NodeState::Live => return Ok(node.object),
            NodeState::Uninitialized => {}
        }

        let handle = node.kind.object_kind().map(|kind| self.backend.create_object(kind));
        if let Some(handle) = handle {
            let auto_update = self.context.config().default_matrix_auto_update;
            self.backend.set_flag(handle, ObjectFlag::MatrixAutoUpdate, auto_update);
        }
        node.object = handle;
        node.state = NodeState::Live;
        node.loaded = handle.is_some() && !node.deferred_load;
        node.needs_rebuild = true;
        node.pending.add_token(ChangeToken::Init);
        let loaded = node.loaded;
        self.dirty_nodes.shift_remove(&id);
        debug!("Node {:?} is live with object {:?}", id, handle);

        self.apply_pending(id);

        let mut events = vec![ChangeEvent::Object3d];
        if loaded {
            events.push(ChangeEvent::Loaded);
        }
        self.publish(id, &events);
        Ok(handle)
    }

    /// Apply every queued change
    ///
    /// Resource values are re-derived and fanned out first, then each dirty
    /// live node runs one pass. Changes queued while this runs are picked up
    /// by the next flush; nodes without a scene object stay buffered.
    ///
    /// A resource refreshes at most once per flush. One that is invalidated
    /// again after its refresh stays dirty for the next flush.
    pub fn flush(&mut self) -> Vec<ApplyReport> {
        let mut refreshed = IndexSet::new();
        let mut carried = IndexSet::new();
        while let Some(resource) = self.dirty_resources.shift_remove_index(0) {
            if refreshed.insert(resource) {
                self.refresh_resource(resource);
            } else {
                carried.insert(resource);
            }
        }

        let queued: Vec<NodeId> = self.dirty_nodes.drain(..).collect();
        let mut reports = Vec::new();
        for id in queued {
            match self.nodes.get(id).map(OwningNode::state) {
                Some(NodeState::Live) => {
                    if let Some(report) = self.apply_pending(id) {
                        if report.matrix_updated {
                            self.matrix_dirty.shift_remove(&id);
                        }
                        reports.push(report);
                    }
                    if self.nodes.get(id).is_some_and(|node| !node.pending.is_empty()) {
                        self.dirty_nodes.insert(id);
                    }
                }
                Some(NodeState::Uninitialized) => {
                    self.dirty_nodes.insert(id);
                }
                Some(NodeState::Destroyed) | None => {}
            }
        }

        let manual: Vec<NodeId> = self.matrix_dirty.drain(..).collect();
        for id in manual {
            if let Some(handle) = self.nodes.get(id).and_then(OwningNode::object) {
                self.update_matrix_if_manual(handle);
            }
        }
        carried.retain(|id| self.resources.contains_key(*id));
        self.dirty_resources.extend(carried);
        reports
    }

    // ---------------------------------------------------------------------
    // Host lifecycle
    // ---------------------------------------------------------------------

    /// Host initialised the component; queue a full rebuild
    pub fn on_init(&mut self, id: NodeId) -> SyncResult<()> {
        let node = self.nodes.get_mut(id).ok_or(SyncError::UnknownNode(id))?;
        if node.state == NodeState::Destroyed {
            return Ok(());
        }
        node.needs_rebuild = true;
        self.queue(id, ChangeToken::Init);
        Ok(())
    }

    /// Host reported changed attributes
    ///
    /// Unknown attribute names are skipped. Returns how many were recorded.
    pub fn on_changes<S: AsRef<str>>(
        &mut self,
        id: NodeId,
        changes: impl IntoIterator<Item = (S, Value)>,
    ) -> SyncResult<usize> {
        if !self.nodes.contains_key(id) {
            return Err(SyncError::UnknownNode(id));
        }
        let mut recorded = 0;
        for (name, value) in changes {
            match name.as_ref().parse::<ChangeToken>() {
                Ok(token) => {
                    self.set_attribute_token(id, token, value)?;
                    recorded += 1;
                }
                Err(_) => debug!("Ignoring unknown attribute '{}' on {:?}", name.as_ref(), id),
            }
        }
        Ok(recorded)
    }

    /// Host finished collecting content children; the node goes live
    pub fn on_content_init(&mut self, id: NodeId) -> SyncResult<Option<ObjectHandle>> {
        self.object(id)
    }

    /// Host destroyed the component
    pub fn on_destroy(&mut self, id: NodeId) -> SyncResult<()> {
        self.destroy_node(id)
    }

    /// Tear a node down; repeated calls are no-ops
    pub fn destroy_node(&mut self, id: NodeId) -> SyncResult<()> {
        let node = self.nodes.get_mut(id).ok_or(SyncError::UnknownNode(id))?;
        if node.state == NodeState::Destroyed {
            return Ok(());
        }
        let bound: Vec<ResourceId> = node.bound.drain(..).flat_map(|(_, list)| list).collect();
        let children: Vec<(StructuralKind, Vec<NodeId>)> = node.attached_children.drain(..).collect();
        let parent = node.parent.take();

        for resource in bound {
            self.detach_resource(resource, id);
        }
        for (kind, list) in children {
            for child in list {
                self.release_child(id, child, kind);
            }
        }
        if let Some(node) = self.nodes.get_mut(id) {
            node.subscriptions.dispose_all(&mut self.channel);
        }
        self.publish(id, &[ChangeEvent::Destroy]);
        self.channel.unregister_publisher(id);

        if let Some(parent) = parent.and_then(|p| self.nodes.get_mut(p)) {
            for list in parent.content_children.values_mut() {
                list.retain(|child| *child != id);
            }
            for list in parent.attached_children.values_mut() {
                list.retain(|child| *child != id);
            }
            parent
                .subscriptions
                .remove_where(&mut self.channel, |key| matches!(key, NodeSubKey::Child(_, child) if *child == id));
        }

        let Some(node) = self.nodes.get_mut(id) else {
            return Ok(());
        };
        if let Some(handle) = node.object.take() {
            self.backend.remove_from_parent(handle);
            self.backend.destroy_object(handle);
        }
        node.state = NodeState::Destroyed;
        node.loaded = false;
        node.needs_rebuild = false;
        node.pending.clear();
        node.attributes.clear();
        node.content_resources.clear();
        node.content_children.clear();
        node.sync_fields.clear();
        self.dirty_nodes.shift_remove(&id);
        self.matrix_dirty.shift_remove(&id);
        debug!("Destroyed node {:?}", id);
        Ok(())
    }

    /// Swap the scene object of a node
    ///
    /// The old object is detached and destroyed, the new one takes its place
    /// under the same parent, attached resources re-push onto it and a full
    /// rebuild is queued.
    pub fn replace_object(&mut self, id: NodeId, object: ObjectHandle) -> SyncResult<()> {
        self.object(id)?;
        let Some(node) = self.nodes.get_mut(id).filter(|node| node.is_live()) else {
            return Ok(());
        };
        let old = node.object;
        if old == Some(object) {
            return Ok(());
        }
        if let Some(old) = old {
            let parent = self.backend.parent(old);
            self.backend.remove_from_parent(old);
            if let Some(parent) = parent {
                self.backend.add_child(parent, object);
            }
            self.backend.destroy_object(old);
        }
        let auto_update = self.context.config().default_matrix_auto_update;
        self.backend.set_flag(object, ObjectFlag::MatrixAutoUpdate, auto_update);
        node.object = Some(object);
        node.loaded = true;
        node.needs_rebuild = true;
        let bound: Vec<ResourceId> = node.bound.values().flatten().copied().collect();

        for resource in bound {
            let target = self.resolve_target(resource, id);
            if let Some(link) = self.resources.get_mut(resource).and_then(|r| r.owner_mut(id)) {
                link.target = target;
                link.pending_push = true;
            }
        }
        self.queue(id, ChangeToken::Init);
        info!("Replaced object of {:?}: {:?} -> {:?}", id, old, object);
        self.publish(id, &[ChangeEvent::Loaded, ChangeEvent::Object3d]);
        Ok(())
    }

    /// Mark a deferred-load node's object as ready
    pub fn mark_loaded(&mut self, id: NodeId) -> SyncResult<()> {
        let node = self.nodes.get_mut(id).ok_or(SyncError::UnknownNode(id))?;
        if !node.is_live() || node.loaded || node.object.is_none() {
            return Ok(());
        }
        node.loaded = true;
        debug!("Node {:?} loaded", id);
        self.publish(id, &[ChangeEvent::Loaded]);
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Resources
    // ---------------------------------------------------------------------

    /// Register a resource component
    pub fn create_resource(&mut self, kind: ResourceKind) -> ResourceId {
        let id = self.resources.insert(ResourceComponent::new(kind));
        self.channel.register_publisher(id);
        trace!("Created {} resource {:?}", kind, id);
        id
    }

    /// Set a declarative input of a resource; owners see it on the next flush
    pub fn set_resource_input(&mut self, id: ResourceId, name: &str, value: impl Into<Value>) -> SyncResult<()> {
        let resource = self.resources.get_mut(id).ok_or(SyncError::UnknownResource(id))?;
        if resource.set_input(name, value.into()) {
            self.resubscribe_sources(id);
            self.dirty_resources.insert(id);
        }
        Ok(())
    }

    /// Tear a resource down
    ///
    /// It is detached from every owner and each owner falls back to its
    /// literal attribute on the next flush.
    pub fn destroy_resource(&mut self, id: ResourceId) -> SyncResult<()> {
        if !self.resources.contains_key(id) {
            return Err(SyncError::UnknownResource(id));
        }
        self.teardown_resource(id);
        Ok(())
    }

    fn teardown_resource(&mut self, id: ResourceId) {
        let Some(resource) = self.resources.get(id) else {
            return;
        };
        let kind = resource.kind();
        let owners: Vec<NodeId> = resource.owners().map(|(owner, _)| owner).collect();

        for owner in owners {
            self.detach_resource(id, owner);
            if let Some(node) = self.nodes.get_mut(owner) {
                for list in node.bound.values_mut().chain(node.content_resources.values_mut()) {
                    list.retain(|other| *other != id);
                }
            }
            self.queue(owner, kind.into());
        }
        self.publish(id, &[ChangeEvent::Destroy]);
        if let Some(mut resource) = self.resources.remove(id) {
            resource.subscriptions.dispose_all(&mut self.channel);
        }
        self.channel.unregister_publisher(id);
        self.dirty_resources.shift_remove(&id);
        debug!("Destroyed {} resource {:?}", kind, id);
    }

    /// Resources no node currently holds
    pub fn orphaned_resources(&self) -> Vec<ResourceId> {
        self.resources
            .iter()
            .filter(|(_, resource)| resource.is_orphaned())
            .map(|(id, _)| id)
            .collect()
    }

    /// Destroy every orphaned resource, returning their ids
    pub fn release_orphans(&mut self) -> Vec<ResourceId> {
        let orphans = self.orphaned_resources();
        for &id in &orphans {
            self.teardown_resource(id);
        }
        orphans
    }

    // ---------------------------------------------------------------------
    // Host subscriptions
    // ---------------------------------------------------------------------

    /// Watch a node or resource from the host
    pub fn subscribe(
        &mut self,
        publisher: impl Into<Publisher>,
        filter: &str,
        callback: impl FnMut(Interest) + 'static,
    ) -> Disposable {
        self.channel
            .subscribe(publisher, Subscriber::Callback(Box::new(callback)), filter)
    }

    /// Drop a host subscription; safe to call repeatedly
    pub fn unsubscribe(&mut self, disposable: &mut Disposable) {
        self.channel.unsubscribe(disposable);
    }

    // ---------------------------------------------------------------------
    // Apply passes
    // ---------------------------------------------------------------------

    pub(super) fn queue(&mut self, id: NodeId, token: ChangeToken) {
        if let Some(node) = self.nodes.get_mut(id) {
            if node.state != NodeState::Destroyed {
                node.pending.add_token(token);
                self.dirty_nodes.insert(id);
            }
        }
    }

    fn apply_pending(&mut self, id: NodeId) -> Option<ApplyReport> {
        let node = self.nodes.get_mut(id)?;
        if !node.is_live() || node.applying {
            return None;
        }
        let rebuild = node.pending.contains(ChangeToken::Init);
        let pass = node.pending.take_pass(&node.canonical)?;
        node.applying = true;

        let report = self.run_pass(id, pass);

        if let Some(node) = self.nodes.get_mut(id) {
            node.applying = false;
            if rebuild {
                node.needs_rebuild = false;
            }
            node.last_report = Some(report.clone());
        }
        Some(report)
    }

    fn run_pass(&mut self, id: NodeId, pass: Pass) -> ApplyReport {
        let mut report = ApplyReport::new(id);
        let mut touched: Vec<ResourceKind> = Vec::new();

        match pass {
            Pass::Refresh => {
                report.tokens.push(ChangeToken::ClearInit);
                touched = self.refresh_values(id);
            }
            Pass::Apply(tokens) => {
                for token in tokens {
                    trace!("{:?} apply {}", id, token);
                    report.tokens.push(token);
                    match token.branch() {
                        Branch::Reserved => {}
                        Branch::Literal(slot) => self.apply_literal(id, token, slot),
                        Branch::Resource(kind) => {
                            self.apply_resource_list(id, kind, &mut report);
                            touched.push(kind);
                        }
                        Branch::Structural(kind) => self.apply_structure(id, kind),
                    }
                }
            }
        }

        if touched.iter().any(|kind| kind.is_transform()) {
            if let Some(handle) = self.nodes.get(id).and_then(OwningNode::object) {
                report.matrix_updated = self.update_matrix_if_manual(handle);
            }
        }
        let events: Vec<ChangeEvent> = touched
            .iter()
            .map(|kind| kind.event())
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect();
        if !events.is_empty() {
            self.publish(id, &events);
        }
        report
    }

    fn apply_literal(&mut self, id: NodeId, token: ChangeToken, slot: LiteralSlot) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        let Some(handle) = node.object else {
            return;
        };
        let raw = node.attribute(token);
        let flag = match slot {
            LiteralSlot::Name => {
                if let Some(name) = resolve_string(raw, None) {
                    self.backend.set_name(handle, &name);
                }
                return;
            }
            LiteralSlot::RenderOrder => {
                if let Some(order) = resolve_int(raw, None) {
                    self.backend.set_render_order(handle, order);
                }
                return;
            }
            LiteralSlot::Visible => ObjectFlag::Visible,
            LiteralSlot::CastShadow => ObjectFlag::CastShadow,
            LiteralSlot::ReceiveShadow => ObjectFlag::ReceiveShadow,
            LiteralSlot::FrustumCulled => ObjectFlag::FrustumCulled,
            LiteralSlot::MatrixAutoUpdate => ObjectFlag::MatrixAutoUpdate,
        };
        if let Some(value) = resolve_bool(raw, None) {
            self.backend.set_flag(handle, flag, value);
        }
    }

    /// Clear-init pass: literals and cached resources re-push, nothing is
    /// attached or detached
    fn refresh_values(&mut self, id: NodeId) -> Vec<ResourceKind> {
        let Some(node) = self.nodes.get(id) else {
            return Vec::new();
        };
        let canonical = node.canonical.clone();
        let mut touched = Vec::new();
        for token in canonical {
            match token.branch() {
                Branch::Literal(slot) => self.apply_literal(id, token, slot),
                Branch::Resource(kind) => {
                    self.repush_bound(id, kind);
                    touched.push(kind);
                }
                Branch::Structural(_) | Branch::Reserved => {}
            }
        }
        touched
    }

    pub(super) fn update_matrix_if_manual(&mut self, handle: ObjectHandle) -> bool {
        if self.backend.flag(handle, ObjectFlag::MatrixAutoUpdate) == Some(false) {
            self.backend.update_matrix(handle);
            true
        } else {
            false
        }
    }

    // ---------------------------------------------------------------------
    // Notification routing
    // ---------------------------------------------------------------------

    pub(super) fn publish(&mut self, publisher: impl Into<Publisher>, events: &[ChangeEvent]) {
        let notifications = self.channel.publish(publisher, events);
        self.route(notifications);
    }

    fn route(&mut self, notifications: Vec<Notification>) {
        for note in notifications {
            match (note.target, note.interest, note.publisher) {
                (Target::Resource(resource), Interest::Loaded, Publisher::Node(owner)) => {
                    self.deliver_pending(resource, owner);
                }
                (Target::Resource(resource), Interest::Destroy, Publisher::Node(owner)) => {
                    self.detach_resource(resource, owner);
                    if let Some(node) = self.nodes.get_mut(owner) {
                        for list in node.bound.values_mut() {
                            list.retain(|other| *other != resource);
                        }
                    }
                }
                (Target::Resource(resource), _, _) => {
                    if let Some(component) = self.resources.get(resource) {
                        component.invalidate();
                        self.dirty_resources.insert(resource);
                    }
                }
                (Target::Node(node), Interest::Changed, Publisher::Resource(_)) => {
                    self.queue(node, ChangeToken::ClearInit);
                }
                (Target::Node(node), Interest::Object3d, Publisher::Node(child)) => {
                    if let Some(kind) = self.nodes.get(child).map(|c| c.kind.structural_kind()) {
                        self.queue(node, kind.token());
                    }
                }
                (Target::Node(_), _, _) => {}
            }
        }
    }
}

impl<B: SceneBackend + Default> Default for SyncEngine<B> {
    fn default() -> Self {
        Self::new(B::default(), SyncContext::default())
    }
}
