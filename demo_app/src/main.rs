//! Scene binding demo
//!
//! Builds a small rig in the in-memory scene: a group holding two meshes
//! that share a position and a material component, then drives a few
//! changes through the engine and logs each apply pass.
//!
//! Pass a TOML or RON engine config path as the first argument to override
//! the defaults.

use scene_bind::config::Config;
use scene_bind::foundation::logging;
use scene_bind::prelude::*;

fn load_config() -> Result<EngineConfig, Box<dyn std::error::Error>> {
    match std::env::args().nth(1) {
        Some(path) => {
            let config = EngineConfig::load_from_file(&path)?;
            config.validate()?;
            Ok(config)
        }
        None => Ok(EngineConfig::new().with_rng_seed(42)),
    }
}

fn log_reports(label: &str, reports: &[ApplyReport]) {
    log::info!("{}: {} pass(es)", label, reports.len());
    for report in reports {
        log::info!(
            "  {:?} -> {:?} (+{} -{} resources, matrix {})",
            report.node,
            report.trace(),
            report.attached.len(),
            report.detached.len(),
            report.matrix_updated
        );
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    logging::init_with_level(&config.log_level);
    log::info!("Starting scene binding demo...");

    let mut engine = SyncEngine::with_config(MemoryScene::new(), config)?;

    // Shared components
    let hover = engine.create_resource(ResourceKind::Position);
    engine.set_resource_input(hover, "value", Vec3::new(0.0, 1.5, 0.0))?;
    let paint = engine.create_resource(ResourceKind::Material);
    engine.set_resource_input(paint, "color", "#4488ff")?;
    engine.set_resource_input(paint, "opacity", 0.8_f64)?;

    // Rig: one group, two meshes
    let rig = engine.create_node(NodeKind::Group, NodeOptions::new());
    engine.set_attribute(rig, "name", "rig")?;

    let left = engine.create_node(NodeKind::Mesh, NodeOptions::new());
    engine.set_attribute(left, "geometry", "box")?;
    engine.set_attribute(left, "position", hover)?;
    engine.set_attribute(left, "material", paint)?;

    let right = engine.create_node(NodeKind::Mesh, NodeOptions::new());
    engine.set_attribute(right, "geometry", "sphere")?;
    engine.set_sync_fields(right, ResourceKind::Position, SyncFields::Y)?;
    engine.set_attribute(right, "position", hover)?;
    engine.set_attribute(right, "material", paint)?;

    engine.set_content_children(rig, StructuralKind::Object3d, vec![left, right])?;

    let mut watch = engine.subscribe(right, "position", |interest| {
        log::info!("  host saw {} on the right mesh", interest.as_str());
    });

    let root = engine.object(rig)?.ok_or("rig has no scene object")?;
    log::info!(
        "Rig built: {} objects, root has {} children",
        engine.backend().object_count(),
        engine.backend().children(root).len()
    );
    log_reports("Initial flush", &engine.flush());

    // Move the shared position; each owner keeps its own field mask
    engine.set_resource_input(hover, "value", Vec3::new(2.0, 3.0, -1.0))?;
    log_reports("Hover moved", &engine.flush());
    for (label, node) in [("left", left), ("right", right)] {
        if let Some(handle) = engine.object(node)? {
            if let Some(object) = engine.backend().object(handle) {
                log::info!("  {} mesh at {:?}", label, object.position);
            }
        }
    }

    // Literal change on one node only
    engine.set_attribute(left, "visible", false)?;
    log_reports("Left hidden", &engine.flush());

    engine.unsubscribe(&mut watch);
    engine.destroy_node(right)?;
    log_reports("Right destroyed", &engine.flush());

    let released = engine.release_orphans();
    log::info!("Released {} orphaned resource(s)", released.len());
    log::info!("Demo finished with {} live objects", engine.backend().object_count());
    Ok(())
}
