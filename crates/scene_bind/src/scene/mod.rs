//! Scene-graph library boundary
//!
//! The engine never owns rendering state. It talks to whatever retained
//! scene graph the host uses through [`SceneBackend`], addressing objects by
//! opaque [`ObjectHandle`]s. [`MemoryScene`] is the in-tree implementation
//! used by the demo and the tests.
//!
//! ## Architecture
//!
//! ```text
//! Declarative tree (host)
//!      ↓
//! SyncEngine (change sets, bindings)
//!      ↓
//! SceneBackend (retained objects)
//! ```

mod material;
mod memory;

pub use material::{Geometry, Material, TextureRef};
pub use memory::{MemoryScene, SceneObject, SceneOp};

use std::sync::Arc;

use crate::foundation::collections::ObjectHandle;
use crate::foundation::math::{Euler, Vec3};

/// What kind of scene object a node owns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    /// Plain transform node
    Object3d,
    /// Grouping node
    Group,
    /// Renderable mesh with material and geometry slots
    Mesh,
    /// Positional audio emitter
    Audio,
}

/// Vector-valued slots of a scene object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VectorSlot {
    /// Local translation
    Position,
    /// Local scale
    Scale,
    /// Up direction used by look-at
    Up,
}

/// Boolean slots of a scene object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectFlag {
    /// Rendered at all
    Visible,
    /// Casts shadows
    CastShadow,
    /// Receives shadows
    ReceiveShadow,
    /// Skipped when outside the view frustum
    FrustumCulled,
    /// Local matrix recomputed automatically every frame
    MatrixAutoUpdate,
}

/// Operations the engine needs from a retained scene graph
///
/// Calls with a handle the backend does not know are ignored; getters return
/// `None` for them.
pub trait SceneBackend {
    /// Create a detached object
    fn create_object(&mut self, kind: ObjectKind) -> ObjectHandle;

    /// Destroy an object, detaching it and orphaning its children
    fn destroy_object(&mut self, object: ObjectHandle);

    /// Whether the handle refers to a live object
    fn contains(&self, object: ObjectHandle) -> bool;

    /// Kind the object was created with
    fn kind(&self, object: ObjectHandle) -> Option<ObjectKind>;

    /// Attach `child` under `parent`, detaching it from any previous parent
    fn add_child(&mut self, parent: ObjectHandle, child: ObjectHandle);

    /// Detach an object from its parent
    fn remove_from_parent(&mut self, object: ObjectHandle);

    /// Current parent
    fn parent(&self, object: ObjectHandle) -> Option<ObjectHandle>;

    /// Children in attachment order
    fn children(&self, object: ObjectHandle) -> Vec<ObjectHandle>;

    /// Depth-first search of `root` and its descendants by name
    fn find_by_name(&self, root: ObjectHandle, name: &str) -> Option<ObjectHandle>;

    /// Set the object name
    fn set_name(&mut self, object: ObjectHandle, name: &str);

    /// Read a vector slot
    fn vector(&self, object: ObjectHandle, slot: VectorSlot) -> Option<Vec3>;

    /// Write a vector slot
    fn set_vector(&mut self, object: ObjectHandle, slot: VectorSlot, value: Vec3);

    /// Read the rotation
    fn rotation(&self, object: ObjectHandle) -> Option<Euler>;

    /// Write the rotation
    fn set_rotation(&mut self, object: ObjectHandle, value: Euler);

    /// Rotate the object to face a point in its parent's space
    fn look_at(&mut self, object: ObjectHandle, target: Vec3);

    /// Read a boolean slot
    fn flag(&self, object: ObjectHandle, flag: ObjectFlag) -> Option<bool>;

    /// Write a boolean slot
    fn set_flag(&mut self, object: ObjectHandle, flag: ObjectFlag, value: bool);

    /// Set the render order
    fn set_render_order(&mut self, object: ObjectHandle, order: i32);

    /// Place a material in slot `index`, growing the slot list if needed
    fn set_material(&mut self, object: ObjectHandle, index: usize, material: Option<Arc<Material>>);

    /// Shrink the material slot list to `len`
    fn truncate_materials(&mut self, object: ObjectHandle, len: usize);

    /// Set or clear the geometry
    fn set_geometry(&mut self, object: ObjectHandle, geometry: Option<Arc<Geometry>>);

    /// Recompute the local matrix once
    fn update_matrix(&mut self, object: ObjectHandle);
}
