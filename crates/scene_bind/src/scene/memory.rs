//! In-memory retained scene graph
//!
//! A straightforward arena of objects with parent/child links. It keeps an
//! operation log so callers can see exactly which mutations the engine made.

use std::sync::Arc;

use super::{Geometry, Material, ObjectFlag, ObjectKind, SceneBackend, VectorSlot};
use crate::foundation::collections::{ObjectHandle, SlotMap};
use crate::foundation::math::{Euler, Quat, Vec3};

/// One retained object
#[derive(Debug, Clone)]
pub struct SceneObject {
    /// Kind it was created with
    pub kind: ObjectKind,
    /// Name used by sub-object lookups
    pub name: String,
    /// Local translation
    pub position: Vec3,
    /// Local rotation
    pub rotation: Euler,
    /// Local scale
    pub scale: Vec3,
    /// Up direction
    pub up: Vec3,
    /// Visibility flag
    pub visible: bool,
    /// Shadow casting flag
    pub cast_shadow: bool,
    /// Shadow receiving flag
    pub receive_shadow: bool,
    /// Frustum culling flag
    pub frustum_culled: bool,
    /// Automatic matrix update flag
    pub matrix_auto_update: bool,
    /// Render order
    pub render_order: i32,
    /// Material slots
    pub materials: Vec<Option<Arc<Material>>>,
    /// Geometry slot
    pub geometry: Option<Arc<Geometry>>,
    /// How many explicit matrix recomputes happened
    pub matrix_updates: u32,
    parent: Option<ObjectHandle>,
    children: Vec<ObjectHandle>,
}

impl SceneObject {
    fn new(kind: ObjectKind, matrix_auto_update: bool) -> Self {
        Self {
            kind,
            name: String::new(),
            position: Vec3::zeros(),
            rotation: Euler::default(),
            scale: Vec3::new(1.0, 1.0, 1.0),
            up: Vec3::y(),
            visible: true,
            cast_shadow: false,
            receive_shadow: false,
            frustum_culled: true,
            matrix_auto_update,
            render_order: 0,
            materials: Vec::new(),
            geometry: None,
            matrix_updates: 0,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Parent object
    pub fn parent(&self) -> Option<ObjectHandle> {
        self.parent
    }

    /// Child objects in attachment order
    pub fn children(&self) -> &[ObjectHandle] {
        &self.children
    }
}

/// Mutations recorded by [`MemoryScene`]
#[derive(Debug, Clone, PartialEq)]
pub enum SceneOp {
    /// Object created
    Create(ObjectHandle),
    /// Object destroyed
    Destroy(ObjectHandle),
    /// Child attached to parent
    Attach {
        /// New parent
        parent: ObjectHandle,
        /// Attached child
        child: ObjectHandle,
    },
    /// Object detached from its parent
    Detach(ObjectHandle),
    /// Matrix recomputed explicitly
    UpdateMatrix(ObjectHandle),
}

/// Arena-backed [`SceneBackend`]
#[derive(Debug)]
pub struct MemoryScene {
    objects: SlotMap<ObjectHandle, SceneObject>,
    default_matrix_auto_update: bool,
    ops: Vec<SceneOp>,
}

impl MemoryScene {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::with_matrix_auto_update(true)
    }

    /// Create an empty scene whose objects start with the given matrix policy
    pub fn with_matrix_auto_update(enabled: bool) -> Self {
        Self {
            objects: SlotMap::with_key(),
            default_matrix_auto_update: enabled,
            ops: Vec::new(),
        }
    }

    /// Borrow an object
    pub fn object(&self, handle: ObjectHandle) -> Option<&SceneObject> {
        self.objects.get(handle)
    }

    /// Number of live objects
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Recorded mutations, oldest first
    pub fn ops(&self) -> &[SceneOp] {
        &self.ops
    }

    /// Forget recorded mutations
    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }

    fn detach_internal(&mut self, child: ObjectHandle) {
        let Some(parent) = self.objects.get_mut(child).and_then(|obj| obj.parent.take()) else {
            return;
        };
        if let Some(parent_obj) = self.objects.get_mut(parent) {
            parent_obj.children.retain(|c| *c != child);
        }
        self.ops.push(SceneOp::Detach(child));
    }

    fn is_ancestor(&self, candidate: ObjectHandle, of: ObjectHandle) -> bool {
        let mut current = self.objects.get(of).and_then(|obj| obj.parent);
        while let Some(handle) = current {
            if handle == candidate {
                return true;
            }
            current = self.objects.get(handle).and_then(|obj| obj.parent);
        }
        false
    }
}

impl Default for MemoryScene {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneBackend for MemoryScene {
    fn create_object(&mut self, kind: ObjectKind) -> ObjectHandle {
        let handle = self
            .objects
            .insert(SceneObject::new(kind, self.default_matrix_auto_update));
        self.ops.push(SceneOp::Create(handle));
        handle
    }

    fn destroy_object(&mut self, object: ObjectHandle) {
        if !self.objects.contains_key(object) {
            return;
        }
        self.detach_internal(object);
        if let Some(removed) = self.objects.remove(object) {
            for child in removed.children {
                if let Some(child_obj) = self.objects.get_mut(child) {
                    child_obj.parent = None;
                }
            }
        }
        self.ops.push(SceneOp::Destroy(object));
    }

    fn contains(&self, object: ObjectHandle) -> bool {
        self.objects.contains_key(object)
    }

    fn kind(&self, object: ObjectHandle) -> Option<ObjectKind> {
        self.objects.get(object).map(|obj| obj.kind)
    }

    fn add_child(&mut self, parent: ObjectHandle, child: ObjectHandle) {
        if parent == child
            || !self.objects.contains_key(parent)
            || !self.objects.contains_key(child)
            || self.is_ancestor(child, parent)
        {
            return;
        }
        if self.objects[child].parent == Some(parent) {
            return;
        }
        self.detach_internal(child);
        self.objects[child].parent = Some(parent);
        self.objects[parent].children.push(child);
        self.ops.push(SceneOp::Attach { parent, child });
    }

    fn remove_from_parent(&mut self, object: ObjectHandle) {
        self.detach_internal(object);
    }

    fn parent(&self, object: ObjectHandle) -> Option<ObjectHandle> {
        self.objects.get(object).and_then(|obj| obj.parent)
    }

    fn children(&self, object: ObjectHandle) -> Vec<ObjectHandle> {
        self.objects
            .get(object)
            .map(|obj| obj.children.clone())
            .unwrap_or_default()
    }

    fn find_by_name(&self, root: ObjectHandle, name: &str) -> Option<ObjectHandle> {
        let mut stack = vec![root];
        while let Some(handle) = stack.pop() {
            let Some(obj) = self.objects.get(handle) else {
                continue;
            };
            if obj.name == name {
                return Some(handle);
            }
            stack.extend(obj.children.iter().rev().copied());
        }
        None
    }

    fn set_name(&mut self, object: ObjectHandle, name: &str) {
        if let Some(obj) = self.objects.get_mut(object) {
            obj.name = name.to_string();
        }
    }

    fn vector(&self, object: ObjectHandle, slot: VectorSlot) -> Option<Vec3> {
        self.objects.get(object).map(|obj| match slot {
            VectorSlot::Position => obj.position,
            VectorSlot::Scale => obj.scale,
            VectorSlot::Up => obj.up,
        })
    }

    fn set_vector(&mut self, object: ObjectHandle, slot: VectorSlot, value: Vec3) {
        if let Some(obj) = self.objects.get_mut(object) {
            match slot {
                VectorSlot::Position => obj.position = value,
                VectorSlot::Scale => obj.scale = value,
                VectorSlot::Up => obj.up = value,
            }
        }
    }

    fn rotation(&self, object: ObjectHandle) -> Option<Euler> {
        self.objects.get(object).map(|obj| obj.rotation)
    }

    fn set_rotation(&mut self, object: ObjectHandle, value: Euler) {
        if let Some(obj) = self.objects.get_mut(object) {
            obj.rotation = value;
        }
    }

    fn look_at(&mut self, object: ObjectHandle, target: Vec3) {
        let Some(obj) = self.objects.get_mut(object) else {
            return;
        };
        let direction = target - obj.position;
        if direction.norm_squared() <= f32::EPSILON {
            return;
        }
        let up = if direction.cross(&obj.up).norm_squared() <= f32::EPSILON {
            Vec3::z()
        } else {
            obj.up
        };
        let facing = Quat::face_towards(&direction, &up);
        obj.rotation = Euler::from_quat(&facing);
    }

    fn flag(&self, object: ObjectHandle, flag: ObjectFlag) -> Option<bool> {
        self.objects.get(object).map(|obj| match flag {
            ObjectFlag::Visible => obj.visible,
            ObjectFlag::CastShadow => obj.cast_shadow,
            ObjectFlag::ReceiveShadow => obj.receive_shadow,
            ObjectFlag::FrustumCulled => obj.frustum_culled,
            ObjectFlag::MatrixAutoUpdate => obj.matrix_auto_update,
        })
    }

    fn set_flag(&mut self, object: ObjectHandle, flag: ObjectFlag, value: bool) {
        if let Some(obj) = self.objects.get_mut(object) {
            match flag {
                ObjectFlag::Visible => obj.visible = value,
                ObjectFlag::CastShadow => obj.cast_shadow = value,
                ObjectFlag::ReceiveShadow => obj.receive_shadow = value,
                ObjectFlag::FrustumCulled => obj.frustum_culled = value,
                ObjectFlag::MatrixAutoUpdate => obj.matrix_auto_update = value,
            }
        }
    }

    fn set_render_order(&mut self, object: ObjectHandle, order: i32) {
        if let Some(obj) = self.objects.get_mut(object) {
            obj.render_order = order;
        }
    }

    fn set_material(&mut self, object: ObjectHandle, index: usize, material: Option<Arc<Material>>) {
        if let Some(obj) = self.objects.get_mut(object) {
            if obj.materials.len() <= index {
                obj.materials.resize(index + 1, None);
            }
            obj.materials[index] = material;
        }
    }

    fn truncate_materials(&mut self, object: ObjectHandle, len: usize) {
        if let Some(obj) = self.objects.get_mut(object) {
            obj.materials.truncate(len);
        }
    }

    fn set_geometry(&mut self, object: ObjectHandle, geometry: Option<Arc<Geometry>>) {
        if let Some(obj) = self.objects.get_mut(object) {
            obj.geometry = geometry;
        }
    }

    fn update_matrix(&mut self, object: ObjectHandle) {
        if let Some(obj) = self.objects.get_mut(object) {
            obj.matrix_updates += 1;
            self.ops.push(SceneOp::UpdateMatrix(object));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_child_reparents() {
        let mut scene = MemoryScene::new();
        let a = scene.create_object(ObjectKind::Group);
        let b = scene.create_object(ObjectKind::Group);
        let child = scene.create_object(ObjectKind::Mesh);

        scene.add_child(a, child);
        scene.add_child(b, child);

        assert_eq!(scene.parent(child), Some(b));
        assert!(scene.children(a).is_empty());
        assert_eq!(scene.children(b), vec![child]);
        assert!(scene.ops().contains(&SceneOp::Detach(child)));
    }

    #[test]
    fn test_add_child_rejects_cycles() {
        let mut scene = MemoryScene::new();
        let root = scene.create_object(ObjectKind::Group);
        let leaf = scene.create_object(ObjectKind::Group);
        scene.add_child(root, leaf);
        scene.add_child(leaf, root);
        assert_eq!(scene.parent(root), None);
    }

    #[test]
    fn test_destroy_orphans_children() {
        let mut scene = MemoryScene::new();
        let root = scene.create_object(ObjectKind::Group);
        let child = scene.create_object(ObjectKind::Mesh);
        scene.add_child(root, child);

        scene.destroy_object(root);
        scene.destroy_object(root);

        assert!(!scene.contains(root));
        assert_eq!(scene.parent(child), None);
        let destroys = scene.ops().iter().filter(|op| matches!(op, SceneOp::Destroy(_))).count();
        assert_eq!(destroys, 1);
    }

    #[test]
    fn test_find_by_name_searches_descendants() {
        let mut scene = MemoryScene::new();
        let root = scene.create_object(ObjectKind::Group);
        let arm = scene.create_object(ObjectKind::Object3d);
        let hand = scene.create_object(ObjectKind::Object3d);
        scene.add_child(root, arm);
        scene.add_child(arm, hand);
        scene.set_name(hand, "hand");

        assert_eq!(scene.find_by_name(root, "hand"), Some(hand));
        assert_eq!(scene.find_by_name(root, "foot"), None);
    }

    #[test]
    fn test_material_slots_grow_and_truncate() {
        let mut scene = MemoryScene::new();
        let mesh = scene.create_object(ObjectKind::Mesh);
        scene.set_material(mesh, 2, Some(Arc::new(Material::default())));
        assert_eq!(scene.object(mesh).unwrap().materials.len(), 3);
        scene.truncate_materials(mesh, 1);
        assert_eq!(scene.object(mesh).unwrap().materials.len(), 1);
    }
}
