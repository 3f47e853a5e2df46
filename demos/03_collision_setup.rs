//! 03 - Collision Setup
//!
//! Attach a collision graph to a scene node: volumes, a rigid body and
//! the collision object that links the body to the node.
//!
//! This example demonstrates:
//! - Building box and capsule volumes and grouping them in a list shape
//! - Creating a fixed rigid body over the list
//! - Attaching the body to a node and walking the chain back down
//! - How edits referencing removed blocks are rejected
//!
//! Run with: `cargo run --example 03_collision_setup`

use strata::{
    BodyKind, BodyParams, BoxParams, CapsuleParams, CollisionObjectFlags, Document, EngineTarget,
    ListParams, ShapeMaterial, Transform, Vec3,
};

fn main() {
    env_logger::init();
    log::info!("Wiring a collision graph");

    let mut doc = Document::new(EngineTarget::V100);

    let bench = doc
        .add_node(
            "Bench",
            Transform::from_translation(Vec3::new(0.0, 40.0, 0.0)),
            None,
        )
        .expect("Failed to add node");

    // Two volumes grouped under one list: a seat slab and a leg capsule
    let seat = doc.add_box_shape(BoxParams::new(
        ShapeMaterial::new(3),
        0.1,
        Vec3::new(10.0, 4.0, 1.0),
    ));
    let leg = doc.add_capsule_shape(CapsuleParams::new(
        ShapeMaterial::new(3),
        Vec3::new(0.0, 0.0, -8.0),
        Vec3::ZERO,
        0.8,
    ));
    let group = doc
        .add_list_shape(ListParams::default(), &[seat, leg])
        .expect("Failed to group volumes");

    // Scenery never moves; a fixed body on layer 1 is enough
    let body = doc
        .add_rigid_body(BodyKind::Plain, BodyParams::fixed(1), group)
        .expect("Failed to add rigid body");
    doc.attach_collision(bench, body, CollisionObjectFlags::default())
        .expect("Failed to attach collision");

    // Walk the chain back down from the node
    let object = doc
        .node_collision(bench)
        .expect("Failed to read collision")
        .expect("Bench lost its collision object");
    let body = doc.rigid_body(object.body).expect("Dangling body ref");
    let children = doc
        .list_children(body.shape)
        .expect("Failed to read shape")
        .expect("Body shape is not a list");
    log::info!("Bench collision groups {} volumes", children.len());
    for &child in children {
        if let Some(params) = doc.box_shape(child).expect("Failed to read volume") {
            log::info!("  box half extents {:?}", params.dimensions);
        } else if let Some(params) = doc.capsule_shape(child).expect("Failed to read volume") {
            log::info!("  capsule of length {}", params.length());
        }
    }

    // Edits that reference removed blocks come back as errors
    doc.remove(seat);
    match doc.add_list_shape(ListParams::default(), &[seat]) {
        Ok(_) => log::error!("Grouping a removed volume should not succeed"),
        Err(e) => log::info!("Rejected as expected: {}", e),
    }
}
