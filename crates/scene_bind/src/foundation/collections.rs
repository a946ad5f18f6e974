//! Specialized collection types
//!
//! Owning nodes, resource components and subscriptions live in slot-map
//! arenas; every cross reference between them is one of the keys below.

pub use slotmap::{SlotMap, SecondaryMap};
pub use indexmap::{IndexMap, IndexSet};

slotmap::new_key_type! {
    /// Stable id of an owning node
    pub struct NodeId;

    /// Stable id of a resource component
    pub struct ResourceId;

    /// Stable id of a live subscription
    pub struct SubscriptionId;

    /// Opaque handle of a scene-graph object
    pub struct ObjectHandle;
}

/// Anything that can publish change events on the channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Publisher {
    /// An owning node
    Node(NodeId),
    /// A resource component
    Resource(ResourceId),
}

impl From<NodeId> for Publisher {
    fn from(id: NodeId) -> Self {
        Self::Node(id)
    }
}

impl From<ResourceId> for Publisher {
    fn from(id: ResourceId) -> Self {
        Self::Resource(id)
    }
}
