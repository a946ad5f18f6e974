//! Structural branch: keeping content children parented

use log::{debug, trace};

use super::engine::SyncEngine;
use super::node::{NodeState, NodeSubKey};
use super::token::StructuralKind;
use crate::events::Subscriber;
use crate::foundation::collections::NodeId;
use crate::scene::SceneBackend;

/// Filter a parent uses to notice a child swapping its scene object
const CHILD_FILTER: &str = "object3d";

impl<B: SceneBackend> SyncEngine<B> {
    /// Re-parent one content-child list
    ///
    /// Child objects are created on demand and attached under this node's
    /// object; behaviours only learn their parent. Children that left the
    /// list are detached if they still hang under this node.
    pub(super) fn apply_structure(&mut self, id: NodeId, kind: StructuralKind) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        node.subscriptions.remove_where(&mut self.channel, |key| {
            matches!(key, NodeSubKey::Child(child_kind, _) if *child_kind == kind)
        });
        let handle = node.object;
        let current = node.content_children.get(&kind).cloned().unwrap_or_default();
        let previous = node.attached_children.get(&kind).cloned().unwrap_or_default();

        for &child in previous.iter().filter(|child| !current.contains(child)) {
            self.release_child(id, child, kind);
        }

        let mut attached = Vec::with_capacity(current.len());
        for child in current {
            let usable = child != id
                && self
                    .nodes
                    .get(child)
                    .is_some_and(|node| node.state != NodeState::Destroyed);
            if !usable {
                trace!("Skipping unusable child {:?} of {:?}", child, id);
                continue;
            }
            if kind.holds_objects() {
                let child_handle = self.object(child).ok().flatten();
                if let (Some(parent), Some(child_handle)) = (handle, child_handle) {
                    if self.backend.parent(child_handle) != Some(parent) {
                        self.backend.add_child(parent, child_handle);
                    }
                }
            }
            if let Some(child_node) = self.nodes.get_mut(child) {
                child_node.parent = Some(id);
            }
            let watch = self.channel.subscribe(child, Subscriber::Node(id), CHILD_FILTER);
            if let Some(node) = self.nodes.get_mut(id) {
                node.subscriptions
                    .replace(&mut self.channel, NodeSubKey::Child(kind, child), watch);
            }
            attached.push(child);
        }

        debug!("{:?} holds {} {:?} children", id, attached.len(), kind);
        if let Some(node) = self.nodes.get_mut(id) {
            node.attached_children.insert(kind, attached);
        }
    }

    /// Undo the parenting of one child that left a content list
    pub(super) fn release_child(&mut self, parent: NodeId, child: NodeId, kind: StructuralKind) {
        let parent_handle = self.nodes.get(parent).and_then(|node| node.object);
        let Some(child_node) = self.nodes.get_mut(child) else {
            return;
        };
        if child_node.parent == Some(parent) {
            child_node.parent = None;
        }
        if !kind.holds_objects() {
            return;
        }
        if let (Some(parent_handle), Some(child_handle)) = (parent_handle, child_node.object) {
            if self.backend.parent(child_handle) == Some(parent_handle) {
                self.backend.remove_from_parent(child_handle);
            }
        }
    }
}
