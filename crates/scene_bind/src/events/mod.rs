//! Subscription channel
//!
//! Owning nodes and resource components publish raw change events; anything
//! can subscribe to a publisher with a filter of interest categories.
//!
//! Key rules:
//! - A static table maps each [`Interest`] to the raw [`ChangeEvent`]s that
//!   satisfy it
//! - A subscriber is invoked at most once per publish, with the first
//!   category of its filter that matched
//! - Subscribing to a publisher that is not live yields a no-op [`Disposable`]
//! - Unsubscribing is idempotent
//!
//! Engine-internal subscribers (nodes and resources) are not called back
//! directly. [`SubscriptionChannel::publish`] returns them as
//! [`Notification`]s and the engine routes each one. Host callbacks run
//! synchronously inside `publish`.

use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use log::{debug, trace};

use crate::foundation::collections::{
    IndexMap, IndexSet, NodeId, Publisher, ResourceId, SlotMap, SubscriptionId,
};

/// Raw change event published by a node or resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeEvent {
    /// Position slot changed
    Position,
    /// Rotation slot changed
    Rotation,
    /// Scale slot changed
    Scale,
    /// Look-at target changed
    Lookat,
    /// Material slots changed
    Material,
    /// Geometry slot changed
    Geometry,
    /// A texture was (re)assigned
    Texture,
    /// The scene object was created, replaced or re-parented
    Object3d,
    /// A mesh was rebuilt
    Mesh,
    /// The scene object finished loading
    Loaded,
    /// The publisher is being torn down
    Destroy,
    /// A resource value was re-derived
    Changed,
}

impl ChangeEvent {
    /// Lowercase wire name
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Position => "position",
            Self::Rotation => "rotation",
            Self::Scale => "scale",
            Self::Lookat => "lookat",
            Self::Material => "material",
            Self::Geometry => "geometry",
            Self::Texture => "texture",
            Self::Object3d => "object3d",
            Self::Mesh => "mesh",
            Self::Loaded => "loaded",
            Self::Destroy => "destroy",
            Self::Changed => "changed",
        }
    }
}

impl fmt::Display for ChangeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChangeEvent {
    type Err = ();

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.trim().to_ascii_lowercase().as_str() {
            "position" => Ok(Self::Position),
            "rotation" => Ok(Self::Rotation),
            "scale" => Ok(Self::Scale),
            "lookat" => Ok(Self::Lookat),
            "material" => Ok(Self::Material),
            "geometry" => Ok(Self::Geometry),
            "texture" => Ok(Self::Texture),
            "object3d" => Ok(Self::Object3d),
            "mesh" => Ok(Self::Mesh),
            "loaded" => Ok(Self::Loaded),
            "destroy" => Ok(Self::Destroy),
            "changed" => Ok(Self::Changed),
            _ => Err(()),
        }
    }
}

/// Interest category used in subscription filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interest {
    /// Position of the publisher's object
    Position,
    /// Rotation of the publisher's object
    Rotation,
    /// Scale of the publisher's object
    Scale,
    /// Look-at of the publisher's object
    Lookat,
    /// Material of the publisher's object
    Material,
    /// Geometry of the publisher's object
    Geometry,
    /// Textures of the publisher's materials
    Texture,
    /// Identity of the publisher's object
    Object3d,
    /// Load completion
    Loaded,
    /// Teardown
    Destroy,
    /// Any re-derived resource value
    Changed,
}

impl Interest {
    /// Raw events that satisfy this category
    pub fn events(self) -> &'static [ChangeEvent] {
        use ChangeEvent as E;
        match self {
            Self::Position => &[E::Position, E::Object3d, E::Loaded],
            Self::Rotation => &[E::Rotation, E::Object3d, E::Loaded],
            Self::Scale => &[E::Scale, E::Object3d, E::Loaded],
            Self::Lookat => &[E::Lookat, E::Position, E::Object3d, E::Loaded],
            Self::Material => &[E::Object3d, E::Mesh, E::Material, E::Loaded],
            Self::Geometry => &[E::Object3d, E::Mesh, E::Geometry, E::Loaded],
            Self::Texture => &[E::Texture, E::Material, E::Loaded],
            Self::Object3d => &[E::Object3d, E::Loaded],
            Self::Loaded => &[E::Loaded],
            Self::Destroy => &[E::Destroy],
            Self::Changed => &[E::Changed],
        }
    }

    /// Lowercase filter name
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Position => "position",
            Self::Rotation => "rotation",
            Self::Scale => "scale",
            Self::Lookat => "lookat",
            Self::Material => "material",
            Self::Geometry => "geometry",
            Self::Texture => "texture",
            Self::Object3d => "object3d",
            Self::Loaded => "loaded",
            Self::Destroy => "destroy",
            Self::Changed => "changed",
        }
    }

    /// Look up a category by name
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "position" => Some(Self::Position),
            "rotation" => Some(Self::Rotation),
            "scale" => Some(Self::Scale),
            "lookat" => Some(Self::Lookat),
            "material" => Some(Self::Material),
            "geometry" => Some(Self::Geometry),
            "texture" => Some(Self::Texture),
            "object3d" => Some(Self::Object3d),
            "loaded" => Some(Self::Loaded),
            "destroy" => Some(Self::Destroy),
            "changed" => Some(Self::Changed),
            _ => None,
        }
    }

    /// Parse a comma separated filter, dropping unknown names
    pub fn parse_filter(filter: &str) -> Vec<Self> {
        let mut interests = Vec::new();
        for name in filter.split(',').map(str::trim).filter(|n| !n.is_empty()) {
            match Self::parse(name) {
                Some(interest) if !interests.contains(&interest) => interests.push(interest),
                Some(_) => {}
                None => debug!("Ignoring unknown interest '{}' in filter '{}'", name, filter),
            }
        }
        interests
    }
}

/// Host callback invoked with the matched interest
pub type Callback = Box<dyn FnMut(Interest)>;

/// Who receives a subscription's notifications
pub enum Subscriber {
    /// An owning node; routed by the engine
    Node(NodeId),
    /// A resource component; routed by the engine
    Resource(ResourceId),
    /// A host callback; invoked during publish
    Callback(Callback),
}

impl fmt::Debug for Subscriber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node(id) => f.debug_tuple("Node").field(id).finish(),
            Self::Resource(id) => f.debug_tuple("Resource").field(id).finish(),
            Self::Callback(_) => f.write_str("Callback"),
        }
    }
}

/// Engine-internal subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// An owning node
    Node(NodeId),
    /// A resource component
    Resource(ResourceId),
}

/// A match delivered to an engine-internal subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Notification {
    /// Subscription that matched
    pub subscription: SubscriptionId,
    /// Who published
    pub publisher: Publisher,
    /// Who should react
    pub target: Target,
    /// First matching category of the filter
    pub interest: Interest,
}

/// Handle to a live subscription
///
/// Dropping it does not unsubscribe; call
/// [`SubscriptionChannel::unsubscribe`].
#[derive(Debug, Default, PartialEq, Eq)]
#[must_use = "a subscription stays live until it is unsubscribed"]
pub struct Disposable {
    id: Option<SubscriptionId>,
}

impl Disposable {
    /// A handle that refers to nothing
    pub fn noop() -> Self {
        Self { id: None }
    }

    /// Whether the handle still refers to a subscription
    pub fn is_active(&self) -> bool {
        self.id.is_some()
    }

    /// Subscription id, if any
    pub fn id(&self) -> Option<SubscriptionId> {
        self.id
    }
}

struct Subscription {
    publisher: Publisher,
    subscriber: Subscriber,
    filter: Vec<Interest>,
}

/// Publisher registry and subscription store
#[derive(Default)]
pub struct SubscriptionChannel {
    subscriptions: SlotMap<SubscriptionId, Subscription>,
    publishers: IndexMap<Publisher, Vec<SubscriptionId>>,
}

impl SubscriptionChannel {
    /// Create an empty channel
    pub fn new() -> Self {
        Self::default()
    }

    /// Make a publisher live so it can be subscribed to
    pub fn register_publisher(&mut self, publisher: impl Into<Publisher>) {
        self.publishers.entry(publisher.into()).or_default();
    }

    /// Retire a publisher, dropping every subscription to it
    pub fn unregister_publisher(&mut self, publisher: impl Into<Publisher>) {
        let publisher = publisher.into();
        if let Some(ids) = self.publishers.shift_remove(&publisher) {
            for id in ids {
                self.subscriptions.remove(id);
            }
            trace!("Unregistered publisher {:?}", publisher);
        }
    }

    /// Whether a publisher is live
    pub fn is_live(&self, publisher: impl Into<Publisher>) -> bool {
        self.publishers.contains_key(&publisher.into())
    }

    /// Subscribe to a publisher with a comma separated interest filter
    pub fn subscribe(
        &mut self,
        publisher: impl Into<Publisher>,
        subscriber: Subscriber,
        filter: &str,
    ) -> Disposable {
        let publisher = publisher.into();
        let interests = Interest::parse_filter(filter);
        let Some(ids) = self.publishers.get_mut(&publisher) else {
            debug!("Publisher {:?} is not live, subscription is a no-op", publisher);
            return Disposable::noop();
        };
        if interests.is_empty() {
            return Disposable::noop();
        }
        let id = self.subscriptions.insert(Subscription {
            publisher,
            subscriber,
            filter: interests,
        });
        ids.push(id);
        Disposable { id: Some(id) }
    }

    /// Drop a subscription; safe to call repeatedly
    pub fn unsubscribe(&mut self, disposable: &mut Disposable) {
        let Some(id) = disposable.id.take() else {
            return;
        };
        if let Some(subscription) = self.subscriptions.remove(id) {
            if let Some(ids) = self.publishers.get_mut(&subscription.publisher) {
                ids.retain(|other| *other != id);
            }
        }
    }

    /// Number of live subscriptions to a publisher
    pub fn subscriber_count(&self, publisher: impl Into<Publisher>) -> usize {
        self.publishers.get(&publisher.into()).map_or(0, Vec::len)
    }

    /// Publish raw events
    ///
    /// Callbacks run immediately; engine-internal matches are returned in
    /// subscription order.
    pub fn publish(
        &mut self,
        publisher: impl Into<Publisher>,
        events: &[ChangeEvent],
    ) -> Vec<Notification> {
        let publisher = publisher.into();
        let Some(ids) = self.publishers.get(&publisher).cloned() else {
            return Vec::new();
        };
        let raised: IndexSet<ChangeEvent> = events.iter().copied().collect();
        let mut notifications = Vec::new();
        for id in ids {
            let Some(subscription) = self.subscriptions.get_mut(id) else {
                continue;
            };
            let matched = subscription
                .filter
                .iter()
                .copied()
                .find(|interest| interest.events().iter().any(|e| raised.contains(e)));
            let Some(interest) = matched else {
                continue;
            };
            match &mut subscription.subscriber {
                Subscriber::Callback(callback) => callback(interest),
                Subscriber::Node(node) => notifications.push(Notification {
                    subscription: id,
                    publisher,
                    target: Target::Node(*node),
                    interest,
                }),
                Subscriber::Resource(resource) => notifications.push(Notification {
                    subscription: id,
                    publisher,
                    target: Target::Resource(*resource),
                    interest,
                }),
            }
        }
        trace!("{:?} published {:?} to {} targets", publisher, events, notifications.len());
        notifications
    }
}

/// Subscriptions held by one subscriber, keyed so each can be replaced
/// independently
#[derive(Debug)]
pub struct SubscriptionSet<K: Hash + Eq> {
    entries: IndexMap<K, Disposable>,
}

impl<K: Hash + Eq> Default for SubscriptionSet<K> {
    fn default() -> Self {
        Self { entries: IndexMap::new() }
    }
}

impl<K: Hash + Eq> SubscriptionSet<K> {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a subscription under `key`, disposing whatever was there first
    pub fn replace(&mut self, channel: &mut SubscriptionChannel, key: K, disposable: Disposable) {
        if let Some(mut previous) = self.entries.insert(key, disposable) {
            channel.unsubscribe(&mut previous);
        }
    }

    /// Dispose the subscription under `key`
    pub fn remove(&mut self, channel: &mut SubscriptionChannel, key: &K) {
        if let Some(mut previous) = self.entries.shift_remove(key) {
            channel.unsubscribe(&mut previous);
        }
    }

    /// Dispose every subscription whose key matches
    pub fn remove_where(&mut self, channel: &mut SubscriptionChannel, mut matches: impl FnMut(&K) -> bool) {
        let mut kept = IndexMap::new();
        for (key, mut disposable) in self.entries.drain(..) {
            if matches(&key) {
                channel.unsubscribe(&mut disposable);
            } else {
                kept.insert(key, disposable);
            }
        }
        self.entries = kept;
    }

    /// Dispose everything
    pub fn dispose_all(&mut self, channel: &mut SubscriptionChannel) {
        for (_, mut disposable) in self.entries.drain(..) {
            channel.unsubscribe(&mut disposable);
        }
    }

    /// Whether a key is held
    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Subscription id held under a key
    pub fn get(&self, key: &K) -> Option<SubscriptionId> {
        self.entries.get(key).and_then(Disposable::id)
    }

    /// Number of held subscriptions
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is held
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
