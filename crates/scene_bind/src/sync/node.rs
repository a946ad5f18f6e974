//! Owning nodes
//!
//! An owning node is the engine-side record of one declarative component.
//! It owns at most one scene object, remembers its raw attribute values and
//! content children, and caches which resource components are attached so
//! the next pass can diff instead of rebuilding.

use super::changes::ChangeSet;
use super::report::ApplyReport;
use super::token::{ChangeToken, StructuralKind};
use crate::events::SubscriptionSet;
use crate::foundation::collections::{IndexMap, NodeId, ObjectHandle, ResourceId};
use crate::resolve::Value;
use crate::resource::{ResourceKind, SyncFields};
use crate::scene::ObjectKind;

use ChangeToken as T;

const OBJECT_TOKENS: &[ChangeToken] = &[
    T::Position,
    T::Rotation,
    T::Scale,
    T::Lookat,
    T::Name,
    T::Visible,
    T::CastShadow,
    T::ReceiveShadow,
    T::FrustumCulled,
    T::RenderOrder,
    T::MatrixAutoUpdate,
    T::Object3d,
    T::Controller,
    T::Rigidbody,
    T::Mixer,
];

const MESH_TOKENS: &[ChangeToken] = &[
    T::Position,
    T::Rotation,
    T::Scale,
    T::Lookat,
    T::Material,
    T::Geometry,
    T::Name,
    T::Visible,
    T::CastShadow,
    T::ReceiveShadow,
    T::FrustumCulled,
    T::RenderOrder,
    T::MatrixAutoUpdate,
    T::Object3d,
    T::Controller,
    T::Rigidbody,
    T::Mixer,
];

/// Declarative component type behind a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Plain transform
    Object3d,
    /// Group of children
    Group,
    /// Mesh with material and geometry
    Mesh,
    /// Mesh whose geometry is generated from data
    Chart,
    /// Positional audio
    Audio,
    /// Behaviour attached to a parent object
    Controller,
    /// Physics body attached to a parent object
    RigidBody,
    /// Animation mixer attached to a parent object
    Mixer,
}

impl NodeKind {
    /// Scene object created on first access; behaviours own none
    pub fn object_kind(self) -> Option<ObjectKind> {
        match self {
            Self::Object3d => Some(ObjectKind::Object3d),
            Self::Group => Some(ObjectKind::Group),
            Self::Mesh | Self::Chart => Some(ObjectKind::Mesh),
            Self::Audio => Some(ObjectKind::Audio),
            Self::Controller | Self::RigidBody | Self::Mixer => None,
        }
    }

    /// Tokens `init` expands to
    pub fn canonical_tokens(self) -> &'static [ChangeToken] {
        match self {
            Self::Mesh | Self::Chart => MESH_TOKENS,
            Self::Object3d | Self::Group | Self::Audio => OBJECT_TOKENS,
            Self::Controller | Self::RigidBody | Self::Mixer => &[],
        }
    }

    /// Structural list a node of this kind belongs in
    pub fn structural_kind(self) -> StructuralKind {
        match self {
            Self::Controller => StructuralKind::Controller,
            Self::RigidBody => StructuralKind::Rigidbody,
            Self::Mixer => StructuralKind::Mixer,
            _ => StructuralKind::Object3d,
        }
    }
}

/// Lifecycle state of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    /// Created, no scene object yet
    Uninitialized,
    /// Scene object exists and is kept in sync
    Live,
    /// Torn down; further input is ignored
    Destroyed,
}

/// Options fixed at node creation
#[derive(Debug, Clone, Default)]
pub struct NodeOptions {
    /// Replace the kind's canonical token list
    pub canonical: Option<Vec<ChangeToken>>,
    /// The scene object is not usable until `mark_loaded`
    pub deferred_load: bool,
}

impl NodeOptions {
    /// Default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder pattern: override the canonical token list
    pub fn with_canonical(mut self, tokens: impl IntoIterator<Item = ChangeToken>) -> Self {
        self.canonical = Some(tokens.into_iter().filter(|t| !matches!(t, T::Init | T::ClearInit)).collect());
        self
    }

    /// Builder pattern: wait for `mark_loaded` before pushing resource values
    pub fn with_deferred_load(mut self, deferred: bool) -> Self {
        self.deferred_load = deferred;
        self
    }
}

/// Subscription keys held by a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum NodeSubKey {
    /// Identity changes of a content child
    Child(StructuralKind, NodeId),
    /// Value changes of an attached resource
    Resource(ResourceId),
}

/// Engine-side record of one declarative component
#[derive(Debug)]
pub struct OwningNode {
    pub(crate) kind: NodeKind,
    pub(crate) state: NodeState,
    pub(crate) object: Option<ObjectHandle>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) canonical: Vec<ChangeToken>,
    pub(crate) attributes: IndexMap<ChangeToken, Value>,
    pub(crate) content_resources: IndexMap<ResourceKind, Vec<ResourceId>>,
    pub(crate) content_children: IndexMap<StructuralKind, Vec<NodeId>>,
    pub(crate) bound: IndexMap<ResourceKind, Vec<ResourceId>>,
    pub(crate) attached_children: IndexMap<StructuralKind, Vec<NodeId>>,
    pub(crate) sync_fields: IndexMap<ResourceKind, SyncFields>,
    pub(crate) pending: ChangeSet,
    pub(crate) subscriptions: SubscriptionSet<NodeSubKey>,
    pub(crate) needs_rebuild: bool,
    pub(crate) applying: bool,
    pub(crate) deferred_load: bool,
    pub(crate) loaded: bool,
    pub(crate) last_report: Option<ApplyReport>,
}

impl OwningNode {
    pub(crate) fn new(kind: NodeKind, options: NodeOptions) -> Self {
        Self {
            kind,
            state: NodeState::Uninitialized,
            object: None,
            parent: None,
            canonical: options
                .canonical
                .unwrap_or_else(|| kind.canonical_tokens().to_vec()),
            attributes: IndexMap::new(),
            content_resources: IndexMap::new(),
            content_children: IndexMap::new(),
            bound: IndexMap::new(),
            attached_children: IndexMap::new(),
            sync_fields: IndexMap::new(),
            pending: ChangeSet::new(),
            subscriptions: SubscriptionSet::new(),
            needs_rebuild: true,
            applying: false,
            deferred_load: options.deferred_load,
            loaded: false,
            last_report: None,
        }
    }

    /// Component type
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Lifecycle state
    pub fn state(&self) -> NodeState {
        self.state
    }

    /// Owned scene object, if created
    pub fn object(&self) -> Option<ObjectHandle> {
        self.object
    }

    /// Parent node
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Tokens `init` expands to for this node
    pub fn canonical_tokens(&self) -> &[ChangeToken] {
        &self.canonical
    }

    /// Raw attribute value
    pub fn attribute(&self, token: ChangeToken) -> &Value {
        static NULL: Value = Value::Null;
        self.attributes.get(&token).unwrap_or(&NULL)
    }

    /// Resources currently attached for a slot kind
    pub fn bound_resources(&self, kind: ResourceKind) -> &[ResourceId] {
        self.bound.get(&kind).map_or(&[], Vec::as_slice)
    }

    /// Children currently parented for a structural kind
    pub fn attached_children(&self, kind: StructuralKind) -> &[NodeId] {
        self.attached_children.get(&kind).map_or(&[], Vec::as_slice)
    }

    /// Field mask used when attaching resources of a kind
    pub fn sync_fields(&self, kind: ResourceKind) -> SyncFields {
        self.sync_fields.get(&kind).copied().unwrap_or_default()
    }

    /// Tokens waiting for the next pass
    pub fn pending(&self) -> &ChangeSet {
        &self.pending
    }

    /// Whether the next pass must be a full rebuild
    pub fn needs_rebuild(&self) -> bool {
        self.needs_rebuild
    }

    /// Whether resource values can be pushed onto the object
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Report of the most recent apply pass
    pub fn last_report(&self) -> Option<&ApplyReport> {
        self.last_report.as_ref()
    }

    pub(crate) fn is_live(&self) -> bool {
        self.state == NodeState::Live
    }
}
