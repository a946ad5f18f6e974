//! # Scene Bind
//!
//! Keeps a retained 3D scene graph in sync with a declarative component tree.
//!
//! ## Features
//!
//! - **Change tracking**: per-node change-sets applied in one pass per flush
//! - **Shared resources**: position, rotation, scale, look-at, material and
//!   geometry components attached to any number of owners
//! - **Incremental attachment**: only the difference between the wanted and
//!   attached resources is applied
//! - **Lenient values**: numbers, strings, lists and references all coerce
//!   into the typed value a slot needs
//! - **Pluggable scene**: anything implementing [`scene::SceneBackend`]
//!
//! ## Quick Start
//!
//! ```rust
//! use scene_bind::prelude::*;
//!
//! let mut engine = SyncEngine::new(MemoryScene::new(), SyncContext::default());
//! let mesh = engine.create_node(NodeKind::Mesh, NodeOptions::new());
//! engine.set_attribute(mesh, "position", Vec3::new(1.0, 2.0, 3.0)).unwrap();
//! engine.set_attribute(mesh, "material", "#ff8800").unwrap();
//!
//! let object = engine.object(mesh).unwrap().unwrap();
//! assert_eq!(engine.backend().object(object).unwrap().position, Vec3::new(1.0, 2.0, 3.0));
//!
//! engine.set_attribute(mesh, "visible", false).unwrap();
//! let reports = engine.flush();
//! assert_eq!(reports[0].trace(), vec!["visible"]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Core modules
pub mod core;
pub mod config;
pub mod error;

pub mod foundation;
pub mod resolve;
pub mod scene;
pub mod events;
pub mod resource;
pub mod sync;

pub use error::{SyncError, SyncResult};
pub use sync::SyncEngine;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        core::{EngineConfig, SyncContext},
        error::{SyncError, SyncResult},
        events::{Disposable, Interest},
        foundation::{
            collections::{NodeId, ObjectHandle, ResourceId},
            math::{Color, Euler, Vec3},
        },
        resolve::Value,
        resource::{ResourceKind, SyncFields},
        scene::{MemoryScene, ObjectKind, SceneBackend},
        sync::{ApplyReport, ChangeToken, NodeKind, NodeOptions, StructuralKind, SyncEngine},
    };
}
