//! End-to-end engine scenarios against the in-memory scene

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use approx::assert_relative_eq;

use super::*;
use crate::core::EngineConfig;
use crate::error::SyncError;
use crate::events::Interest;
use crate::foundation::collections::{NodeId, ObjectHandle};
use crate::foundation::math::{constants::PI, Color, Vec3};
use crate::resolve::{GeometryKind, Value};
use crate::resource::{ResourceKind, SyncFields};
use crate::scene::{MemoryScene, ObjectKind, SceneBackend, SceneObject, SceneOp};

use ChangeToken as T;

fn engine() -> SyncEngine<MemoryScene> {
    let config = EngineConfig::new().with_rng_seed(7);
    SyncEngine::with_config(MemoryScene::new(), config).unwrap()
}

fn manual_matrix_engine() -> SyncEngine<MemoryScene> {
    let config = EngineConfig::new().with_rng_seed(7).with_matrix_auto_update(false);
    SyncEngine::with_config(MemoryScene::new(), config).unwrap()
}

fn scene_object(engine: &SyncEngine<MemoryScene>, handle: ObjectHandle) -> &SceneObject {
    engine.backend().object(handle).unwrap()
}

fn live(engine: &mut SyncEngine<MemoryScene>, kind: NodeKind) -> (NodeId, ObjectHandle) {
    let id = engine.create_node(kind, NodeOptions::new());
    let handle = engine.object(id).unwrap().unwrap();
    (id, handle)
}

fn color_material(engine: &mut SyncEngine<MemoryScene>, hex: &str) -> crate::foundation::collections::ResourceId {
    let id = engine.create_resource(ResourceKind::Material);
    engine.set_resource_input(id, "color", hex).unwrap();
    id
}

#[test]
fn test_first_access_then_incremental_pass() {
    let mut engine = engine();
    let node = engine.create_node(
        NodeKind::Object3d,
        NodeOptions::new().with_canonical([T::Position, T::Visible]),
    );
    engine.set_attribute(node, "visible", true).unwrap();
    engine.set_attribute(node, "position", Vec3::new(1.0, 2.0, 3.0)).unwrap();

    let handle = engine.object(node).unwrap().unwrap();
    let report = engine.node(node).unwrap().last_report().unwrap();
    assert_eq!(report.trace(), vec!["position", "visible"]);
    assert_eq!(scene_object(&engine, handle).position, Vec3::new(1.0, 2.0, 3.0));
    assert!(scene_object(&engine, handle).visible);
    assert!(!engine.node(node).unwrap().needs_rebuild());

    engine.set_attribute(node, "visible", false).unwrap();
    let reports = engine.flush();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].trace(), vec!["visible"]);
    assert!(!scene_object(&engine, handle).visible);
    assert_eq!(scene_object(&engine, handle).position, Vec3::new(1.0, 2.0, 3.0));
}

#[test]
fn test_changes_buffer_until_first_access() {
    let mut engine = engine();
    let node = engine.create_node(NodeKind::Group, NodeOptions::new());
    engine.set_attribute(node, "name", "rig").unwrap();

    assert!(engine.flush().is_empty());
    assert_eq!(engine.node(node).unwrap().state(), NodeState::Uninitialized);
    assert!(engine.node(node).unwrap().pending().contains(T::Name));

    let handle = engine.object(node).unwrap().unwrap();
    assert_eq!(scene_object(&engine, handle).name, "rig");
    assert!(engine.flush().is_empty());
}

#[test]
fn test_reapplying_unchanged_state_is_idempotent() {
    let mut engine = engine();
    let material = color_material(&mut engine, "#ff0000");
    let node = engine.create_node(NodeKind::Mesh, NodeOptions::new());
    engine.set_attribute(node, "material", material).unwrap();
    engine.set_attribute(node, "position", Vec3::new(4.0, 0.0, 0.0)).unwrap();
    engine.set_attribute(node, "castshadow", true).unwrap();
    let handle = engine.object(node).unwrap().unwrap();
    engine.flush();
    let before = scene_object(&engine, handle).clone();
    engine.backend_mut().clear_ops();

    engine.on_init(node).unwrap();
    engine.add_changes(node, "material,position,castshadow").unwrap();
    let reports = engine.flush();

    assert_eq!(reports.len(), 1);
    assert!(reports[0].attached.is_empty());
    assert!(reports[0].detached.is_empty());
    assert!(engine.backend().ops().is_empty());
    let after = scene_object(&engine, handle);
    assert_eq!(after.position, before.position);
    assert_eq!(after.cast_shadow, before.cast_shadow);
    assert_eq!(after.materials.len(), 1);
    assert!(Arc::ptr_eq(
        after.materials[0].as_ref().unwrap(),
        before.materials[0].as_ref().unwrap()
    ));
}

#[test]
fn test_material_list_applies_only_the_difference() {
    let mut engine = engine();
    let a = color_material(&mut engine, "#ff0000");
    let b = color_material(&mut engine, "#00ff00");
    let c = color_material(&mut engine, "#0000ff");
    let node = engine.create_node(NodeKind::Mesh, NodeOptions::new());
    engine.set_content_resources(node, ResourceKind::Material, vec![a, b]).unwrap();
    let handle = engine.object(node).unwrap().unwrap();
    assert_eq!(scene_object(&engine, handle).materials.len(), 2);

    engine.set_content_resources(node, ResourceKind::Material, vec![b, c]).unwrap();
    let reports = engine.flush();

    assert_eq!(reports[0].detached, vec![a]);
    assert_eq!(reports[0].attached, vec![c]);
    let materials = &scene_object(&engine, handle).materials;
    assert_eq!(materials.len(), 2);
    assert_eq!(materials[0].as_ref().unwrap().color, Color::from_hex(0x00ff00));
    assert_eq!(materials[1].as_ref().unwrap().color, Color::from_hex(0x0000ff));
    assert!(engine.resource(a).unwrap().is_orphaned());
    assert_eq!(engine.resource(b).unwrap().owner(node).unwrap().slot_index, 0);
    assert_eq!(engine.node(node).unwrap().bound_resources(ResourceKind::Material), &[b, c]);
}

#[test]
fn test_kind_mismatch_is_rejected() {
    let mut engine = engine();
    let position = engine.create_resource(ResourceKind::Position);
    let node = engine.create_node(NodeKind::Mesh, NodeOptions::new());
    let result = engine.set_content_resources(node, ResourceKind::Material, vec![position]);
    assert!(matches!(
        result,
        Err(SyncError::KindMismatch { expected: ResourceKind::Material, found: ResourceKind::Position, .. })
    ));
    assert!(matches!(
        engine.set_attribute(node, "wobble", 1),
        Err(SyncError::UnknownToken(_))
    ));
}

#[test]
fn test_switching_reference_replaces_subscription() {
    let mut engine = engine();
    let (x, _) = live(&mut engine, NodeKind::Object3d);
    let (y, _) = live(&mut engine, NodeKind::Object3d);
    engine.set_attribute(x, "position", Vec3::new(1.0, 0.0, 0.0)).unwrap();
    engine.set_attribute(y, "position", Vec3::new(0.0, 5.0, 0.0)).unwrap();
    engine.flush();

    let follow = engine.create_resource(ResourceKind::Position);
    engine.set_resource_input(follow, "ref", x).unwrap();
    let owner = engine.create_node(NodeKind::Object3d, NodeOptions::new());
    engine.set_attribute(owner, "position", follow).unwrap();
    let handle = engine.object(owner).unwrap().unwrap();
    assert_eq!(scene_object(&engine, handle).position, Vec3::new(1.0, 0.0, 0.0));

    engine.set_resource_input(follow, "ref", y).unwrap();
    engine.flush();
    assert_eq!(scene_object(&engine, handle).position, Vec3::new(0.0, 5.0, 0.0));
    assert_eq!(engine.channel.subscriber_count(x), 0);
    assert_eq!(engine.channel.subscriber_count(y), 1);

    engine.set_attribute(x, "position", Vec3::new(9.0, 9.0, 9.0)).unwrap();
    engine.flush();
    engine.flush();
    assert_eq!(scene_object(&engine, handle).position, Vec3::new(0.0, 5.0, 0.0));

    engine.set_attribute(y, "position", Vec3::new(0.0, 6.0, 0.0)).unwrap();
    engine.flush();
    engine.flush();
    assert_eq!(scene_object(&engine, handle).position, Vec3::new(0.0, 6.0, 0.0));
}

#[test]
fn test_deferred_owner_receives_value_once_loaded() {
    let mut engine = engine();
    let offset = engine.create_resource(ResourceKind::Position);
    engine.set_resource_input(offset, "value", Vec3::new(2.0, 0.0, 0.0)).unwrap();
    let node = engine.create_node(NodeKind::Mesh, NodeOptions::new().with_deferred_load(true));
    engine.set_attribute(node, "position", offset).unwrap();
    let handle = engine.object(node).unwrap().unwrap();

    assert!(!engine.node(node).unwrap().is_loaded());
    assert_eq!(scene_object(&engine, handle).position, Vec3::zeros());
    assert!(engine.resource(offset).unwrap().owner(node).unwrap().pending_push);

    engine.mark_loaded(node).unwrap();
    assert_eq!(scene_object(&engine, handle).position, Vec3::new(2.0, 0.0, 0.0));
    assert!(!engine.resource(offset).unwrap().owner(node).unwrap().pending_push);

    engine.backend_mut().set_vector(handle, crate::scene::VectorSlot::Position, Vec3::zeros());
    engine.mark_loaded(node).unwrap();
    assert_eq!(scene_object(&engine, handle).position, Vec3::zeros());
}

#[test]
fn test_fan_out_honors_each_owner_mask() {
    let mut engine = engine();
    let shared = engine.create_resource(ResourceKind::Position);
    engine.set_resource_input(shared, "value", Vec3::new(1.0, 2.0, 3.0)).unwrap();

    let o1 = engine.create_node(NodeKind::Object3d, NodeOptions::new());
    engine.set_sync_fields(o1, ResourceKind::Position, SyncFields::X).unwrap();
    engine.set_attribute(o1, "position", shared).unwrap();
    let h1 = engine.object(o1).unwrap().unwrap();
    let o2 = engine.create_node(NodeKind::Object3d, NodeOptions::new());
    engine.set_attribute(o2, "position", shared).unwrap();
    let h2 = engine.object(o2).unwrap().unwrap();
    assert_eq!(scene_object(&engine, h1).position, Vec3::new(1.0, 0.0, 0.0));

    engine.set_resource_input(shared, "value", Vec3::new(5.0, 7.0, 9.0)).unwrap();
    engine.flush();

    assert_eq!(scene_object(&engine, h1).position, Vec3::new(5.0, 0.0, 0.0));
    assert_eq!(scene_object(&engine, h2).position, Vec3::new(5.0, 7.0, 9.0));
    assert!(!engine.resource(shared).unwrap().is_dirty());
}

#[test]
fn test_destroy_is_terminal_and_idempotent() {
    let mut engine = engine();
    let material = color_material(&mut engine, "#ffffff");
    let (parent, parent_handle) = live(&mut engine, NodeKind::Group);
    let child = engine.create_node(NodeKind::Mesh, NodeOptions::new());
    engine.set_attribute(child, "material", material).unwrap();
    engine.set_content_children(parent, StructuralKind::Object3d, vec![child]).unwrap();
    engine.flush();
    let child_handle = engine.node(child).unwrap().object().unwrap();
    assert_eq!(scene_object(&engine, child_handle).parent(), Some(parent_handle));

    engine.destroy_node(child).unwrap();
    let ops = engine.backend().ops().len();
    let objects = engine.backend().object_count();
    engine.destroy_node(child).unwrap();
    engine.on_destroy(child).unwrap();

    assert_eq!(engine.backend().ops().len(), ops);
    assert_eq!(engine.backend().object_count(), objects);
    assert!(engine.backend().object(child_handle).is_none());
    assert!(scene_object(&engine, parent_handle).children().is_empty());
    assert!(engine.resource(material).unwrap().is_orphaned());
    assert_eq!(engine.node(child).unwrap().state(), NodeState::Destroyed);
    assert!(engine.node(parent).unwrap().attached_children(StructuralKind::Object3d).is_empty());

    engine.set_attribute(child, "visible", false).unwrap();
    assert!(engine.node(child).unwrap().pending().is_empty());
    assert_eq!(engine.object(child).unwrap(), None);
}

#[test]
fn test_rotation_literal_reads_rotation_attribute() {
    let mut engine = engine();
    let node = engine.create_node(NodeKind::Object3d, NodeOptions::new());
    engine.set_attribute(node, "scale", Vec3::new(2.0, 2.0, 2.0)).unwrap();
    engine.set_attribute(node, "rotation", Value::list([0, 90, 0])).unwrap();
    let handle = engine.object(node).unwrap().unwrap();

    let object = scene_object(&engine, handle);
    assert_relative_eq!(object.rotation.y, PI / 2.0, epsilon = 1e-6);
    assert_relative_eq!(object.rotation.x, 0.0);
    assert_eq!(object.scale, Vec3::new(2.0, 2.0, 2.0));
}

#[test]
fn test_literal_color_and_geometry_fallbacks() {
    let mut engine = engine();
    let node = engine.create_node(NodeKind::Mesh, NodeOptions::new());
    engine.set_attribute(node, "material", "#336699").unwrap();
    engine.set_attribute(node, "geometry", "sphere").unwrap();
    let handle = engine.object(node).unwrap().unwrap();

    let object = scene_object(&engine, handle);
    assert_eq!(object.materials.len(), 1);
    assert_eq!(object.materials[0].as_ref().unwrap().color, Color::from_hex(0x336699));
    assert_eq!(object.geometry.as_ref().unwrap().kind, GeometryKind::Sphere);
}

#[test]
fn test_manual_matrix_updates_once_per_pass() {
    let mut engine = manual_matrix_engine();
    let shared = engine.create_resource(ResourceKind::Position);
    let node = engine.create_node(NodeKind::Object3d, NodeOptions::new());
    engine.set_attribute(node, "position", shared).unwrap();
    engine.set_attribute(node, "scale", Vec3::new(3.0, 3.0, 3.0)).unwrap();
    let handle = engine.object(node).unwrap().unwrap();
    assert_eq!(scene_object(&engine, handle).matrix_updates, 1);
    assert!(engine.node(node).unwrap().last_report().unwrap().matrix_updated);

    engine.set_attribute(node, "visible", false).unwrap();
    engine.flush();
    assert_eq!(scene_object(&engine, handle).matrix_updates, 1);

    engine.set_attribute(node, "scale", Vec3::new(1.0, 1.0, 1.0)).unwrap();
    engine.flush();
    assert_eq!(scene_object(&engine, handle).matrix_updates, 2);

    engine.set_resource_input(shared, "x", 4).unwrap();
    engine.flush();
    assert_eq!(scene_object(&engine, handle).matrix_updates, 3);
    assert_eq!(scene_object(&engine, handle).position, Vec3::new(4.0, 0.0, 0.0));
}

#[test]
fn test_auto_matrix_needs_no_explicit_update() {
    let mut engine = engine();
    let node = engine.create_node(NodeKind::Object3d, NodeOptions::new());
    engine.set_attribute(node, "position", Vec3::new(1.0, 1.0, 1.0)).unwrap();
    let handle = engine.object(node).unwrap().unwrap();
    assert_eq!(scene_object(&engine, handle).matrix_updates, 0);
}

#[test]
fn test_replace_object_moves_under_parent_and_repushes() {
    let mut engine = engine();
    let material = color_material(&mut engine, "#ff8000");
    let parent = engine.create_node(NodeKind::Group, NodeOptions::new());
    let child = engine.create_node(NodeKind::Mesh, NodeOptions::new());
    engine.set_attribute(child, "material", material).unwrap();
    engine.set_content_children(parent, StructuralKind::Object3d, vec![child]).unwrap();
    let parent_handle = engine.object(parent).unwrap().unwrap();
    let old = engine.node(child).unwrap().object().unwrap();

    let loaded = engine.backend_mut().create_object(ObjectKind::Mesh);
    engine.replace_object(child, loaded).unwrap();

    assert!(engine.backend().object(old).is_none());
    assert_eq!(scene_object(&engine, loaded).parent(), Some(parent_handle));
    assert_eq!(
        scene_object(&engine, loaded).materials[0].as_ref().unwrap().color,
        Color::from_hex(0xff8000)
    );
    assert!(engine.node(child).unwrap().needs_rebuild());

    let reports = engine.flush();
    let rebuild = reports.iter().find(|r| r.node == child).unwrap();
    assert_eq!(rebuild.tokens[0], T::Position);
    assert!(rebuild.attached.is_empty());
    assert!(!engine.node(child).unwrap().needs_rebuild());
}

#[test]
fn test_chart_refreshes_when_geometry_changes() {
    let mut engine = engine();
    let shape = engine.create_resource(ResourceKind::Geometry);
    engine.set_resource_input(shape, "type", "box").unwrap();
    let chart = engine.create_node(NodeKind::Chart, NodeOptions::new());
    engine.set_attribute(chart, "geometry", shape).unwrap();
    let handle = engine.object(chart).unwrap().unwrap();
    assert_eq!(scene_object(&engine, handle).geometry.as_ref().unwrap().kind, GeometryKind::Box);

    engine.set_resource_input(shape, "type", "torus").unwrap();
    let reports = engine.flush();

    assert!(reports.iter().any(|r| r.node == chart && r.is_refresh()));
    assert_eq!(scene_object(&engine, handle).geometry.as_ref().unwrap().kind, GeometryKind::Torus);
}

#[test]
fn test_destroyed_resource_detaches_and_orphans_release() {
    let mut engine = engine();
    let material = color_material(&mut engine, "#00ff00");
    let unused = engine.create_resource(ResourceKind::Scale);
    let node = engine.create_node(NodeKind::Mesh, NodeOptions::new());
    engine.set_attribute(node, "material", material).unwrap();
    let handle = engine.object(node).unwrap().unwrap();
    assert!(scene_object(&engine, handle).materials[0].is_some());

    engine.destroy_resource(material).unwrap();
    assert!(engine.resource(material).is_none());
    assert!(engine.node(node).unwrap().pending().contains(T::Material));
    engine.flush();
    assert!(scene_object(&engine, handle).materials.iter().all(Option::is_none));
    assert!(engine.node(node).unwrap().bound_resources(ResourceKind::Material).is_empty());

    assert_eq!(engine.orphaned_resources(), vec![unused]);
    assert_eq!(engine.release_orphans(), vec![unused]);
    assert_eq!(engine.resource_count(), 0);
    assert!(matches!(
        engine.destroy_resource(unused),
        Err(SyncError::UnknownResource(_))
    ));
}

#[test]
fn test_departed_children_are_detached() {
    let mut engine = engine();
    let parent = engine.create_node(NodeKind::Group, NodeOptions::new());
    let first = engine.create_node(NodeKind::Object3d, NodeOptions::new());
    let second = engine.create_node(NodeKind::Object3d, NodeOptions::new());
    let behaviour = engine.create_node(NodeKind::Controller, NodeOptions::new());
    engine.set_content_children(parent, StructuralKind::Object3d, vec![first, second]).unwrap();
    engine.set_content_children(parent, StructuralKind::Controller, vec![behaviour]).unwrap();
    let parent_handle = engine.object(parent).unwrap().unwrap();
    assert_eq!(scene_object(&engine, parent_handle).children().len(), 2);
    assert_eq!(engine.node(behaviour).unwrap().parent(), Some(parent));
    assert_eq!(engine.node(behaviour).unwrap().object(), None);

    engine.set_content_children(parent, StructuralKind::Object3d, vec![second]).unwrap();
    engine.flush();

    let first_handle = engine.node(first).unwrap().object().unwrap();
    let second_handle = engine.node(second).unwrap().object().unwrap();
    assert_eq!(scene_object(&engine, first_handle).parent(), None);
    assert_eq!(scene_object(&engine, second_handle).parent(), Some(parent_handle));
    assert_eq!(engine.node(first).unwrap().parent(), None);
    assert!(matches!(
        engine.set_content_children(parent, StructuralKind::Object3d, vec![parent]),
        Err(SyncError::SelfContainment(_))
    ));
}

#[test]
fn test_target_name_narrows_to_descendant() {
    let mut engine = engine();
    let rig = engine.create_node(NodeKind::Group, NodeOptions::new());
    let wheel = engine.create_node(NodeKind::Mesh, NodeOptions::new());
    engine.set_attribute(wheel, "name", "wheel").unwrap();
    engine.set_content_children(rig, StructuralKind::Object3d, vec![wheel]).unwrap();
    let rig_handle = engine.object(rig).unwrap().unwrap();

    let spin = engine.create_resource(ResourceKind::Scale);
    engine.set_resource_input(spin, "value", Vec3::new(0.5, 0.5, 0.5)).unwrap();
    engine.set_resource_input(spin, "refname", "wheel").unwrap();
    engine.set_attribute(rig, "scale", spin).unwrap();
    engine.flush();

    let wheel_handle = engine.node(wheel).unwrap().object().unwrap();
    assert_eq!(scene_object(&engine, wheel_handle).scale, Vec3::new(0.5, 0.5, 0.5));
    assert_eq!(scene_object(&engine, rig_handle).scale, Vec3::new(1.0, 1.0, 1.0));
}

#[test]
fn test_cyclic_references_terminate() {
    let mut engine = engine();
    let a = engine.create_resource(ResourceKind::Position);
    let b = engine.create_resource(ResourceKind::Position);
    engine.set_resource_input(a, "ref", b).unwrap();
    engine.set_resource_input(b, "ref", a).unwrap();
    let node = engine.create_node(NodeKind::Object3d, NodeOptions::new());
    engine.set_attribute(node, "position", a).unwrap();
    let handle = engine.object(node).unwrap().unwrap();
    engine.flush();
    assert_eq!(scene_object(&engine, handle).position, Vec3::zeros());
}

#[test]
fn test_host_callbacks_see_first_matching_interest() {
    let mut engine = engine();
    let (node, _) = live(&mut engine, NodeKind::Object3d);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let mut watch = engine.subscribe(node, "position,destroy", move |interest| {
        sink.borrow_mut().push(interest)
    });

    engine.set_attribute(node, "position", Vec3::new(0.0, 1.0, 0.0)).unwrap();
    engine.flush();
    assert_eq!(*seen.borrow(), vec![Interest::Position]);

    engine.unsubscribe(&mut watch);
    engine.unsubscribe(&mut watch);
    engine.destroy_node(node).unwrap();
    assert_eq!(seen.borrow().len(), 1);
}

#[test]
fn test_destroy_logs_each_object_once() {
    let mut engine = engine();
    let (node, handle) = live(&mut engine, NodeKind::Audio);
    engine.backend_mut().clear_ops();
    engine.destroy_node(node).unwrap();
    engine.destroy_node(node).unwrap();
    assert_eq!(engine.backend().ops(), &[SceneOp::Destroy(handle)]);
}

#[test]
fn test_first_access_runs_the_kind_canonical_list() {
    let mut engine = engine();
    let mesh = engine.create_node(NodeKind::Mesh, NodeOptions::new());
    engine.object(mesh).unwrap().unwrap();

    let report = engine.node(mesh).unwrap().last_report().unwrap();
    assert_eq!(report.tokens, NodeKind::Mesh.canonical_tokens());
}

#[test]
fn test_resource_following_a_driven_node_catches_up() {
    let mut engine = engine();
    let drive = engine.create_resource(ResourceKind::Position);
    engine.set_resource_input(drive, "value", Vec3::new(1.0, 0.0, 0.0)).unwrap();
    let leader = engine.create_node(NodeKind::Object3d, NodeOptions::new());
    engine.set_attribute(leader, "position", drive).unwrap();
    engine.object(leader).unwrap().unwrap();

    let follow = engine.create_resource(ResourceKind::Position);
    engine.set_resource_input(follow, "ref", leader).unwrap();
    let follower = engine.create_node(NodeKind::Object3d, NodeOptions::new());
    engine.set_attribute(follower, "position", follow).unwrap();
    let handle = engine.object(follower).unwrap().unwrap();
    engine.flush();
    assert_eq!(scene_object(&engine, handle).position, Vec3::new(1.0, 0.0, 0.0));

    // follow refreshes first, then the leader moves under it
    engine.set_resource_input(follow, "multiply", 2.0_f64).unwrap();
    engine.set_resource_input(drive, "value", Vec3::new(5.0, 0.0, 0.0)).unwrap();
    engine.flush();
    assert_eq!(scene_object(&engine, handle).position, Vec3::new(2.0, 0.0, 0.0));

    engine.flush();
    assert_eq!(scene_object(&engine, handle).position, Vec3::new(10.0, 0.0, 0.0));
    engine.flush();
    assert_eq!(scene_object(&engine, handle).position, Vec3::new(10.0, 0.0, 0.0));
}

#[test]
fn test_dropping_one_of_two_geometries_keeps_the_other() {
    let mut engine = engine();
    let cube = engine.create_resource(ResourceKind::Geometry);
    engine.set_resource_input(cube, "type", "box").unwrap();
    let ball = engine.create_resource(ResourceKind::Geometry);
    engine.set_resource_input(ball, "type", "sphere").unwrap();

    let mesh = engine.create_node(NodeKind::Mesh, NodeOptions::new());
    engine.set_attribute(mesh, "geometry", cube).unwrap();
    engine.set_content_resources(mesh, ResourceKind::Geometry, vec![ball]).unwrap();
    let handle = engine.object(mesh).unwrap().unwrap();
    assert_eq!(scene_object(&engine, handle).geometry.as_ref().unwrap().kind, GeometryKind::Sphere);

    engine.set_attribute(mesh, "geometry", Value::Null).unwrap();
    let reports = engine.flush();
    assert_eq!(reports[0].detached, vec![cube]);
    assert_eq!(engine.node(mesh).unwrap().bound_resources(ResourceKind::Geometry), &[ball]);
    assert_eq!(scene_object(&engine, handle).geometry.as_ref().unwrap().kind, GeometryKind::Sphere);

    engine.set_content_resources(mesh, ResourceKind::Geometry, Vec::new()).unwrap();
    engine.flush();
    assert!(scene_object(&engine, handle).geometry.is_none());
}
