//! Errors reported to the host
//!
//! Value and structure problems inside an apply pass are absorbed and logged;
//! only misuse of the host-facing API surfaces here.

use thiserror::Error;

use crate::config::ConfigError;
use crate::foundation::collections::{NodeId, ResourceId};
use crate::resource::ResourceKind;

/// Synchronization engine errors
#[derive(Error, Debug)]
pub enum SyncError {
    /// The node id was never issued by this engine
    #[error("Unknown node: {0:?}")]
    UnknownNode(NodeId),

    /// The resource id is unknown or the resource was destroyed
    #[error("Unknown resource: {0:?}")]
    UnknownResource(ResourceId),

    /// A change token name is not recognised
    #[error("Unknown change token: {0}")]
    UnknownToken(String),

    /// A resource was offered for a slot of another kind
    #[error("Resource {resource:?} is a {found} component, expected {expected}")]
    KindMismatch {
        /// Offending resource
        resource: ResourceId,
        /// Slot kind requested
        expected: ResourceKind,
        /// Kind of the resource
        found: ResourceKind,
    },

    /// A node cannot be its own content child
    #[error("Node {0:?} cannot contain itself")]
    SelfContainment(NodeId),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result alias for engine operations
pub type SyncResult<T> = Result<T, SyncError>;
