//! 01 - Build a Scene
//!
//! The simplest Strata example: assemble a document from scratch.
//!
//! This example demonstrates:
//! - Creating a Document for an engine target
//! - Adding nodes and a shape under the scene root
//! - Attaching a lighting shader and extra data
//! - Reading back names and vertex data through buffer queries
//! - Saving the document as RON
//!
//! Run with: `cargo run --example 01_build_scene`

use strata::{
    Document, EngineTarget, ExtraData, Geometry, LightingAttributes, LightingKind, Shader,
    Transform, Triangle, Vec3,
};

fn main() {
    env_logger::init();
    log::info!("Building a scene document");

    let mut doc = Document::new(EngineTarget::V130);

    // A node for the torso and a quad shape hanging under it
    let torso = doc
        .add_node(
            "Torso",
            Transform::from_translation(Vec3::new(0.0, 0.0, 60.0)),
            None,
        )
        .expect("Failed to add torso node");

    let geometry = Geometry::new(
        vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(10.0, 10.0, 0.0),
            Vec3::new(0.0, 10.0, 0.0),
        ],
        vec![Triangle::new(0, 1, 2), Triangle::new(0, 2, 3)],
    )
    .with_normals(vec![Vec3::Z; 4])
    .with_uvs(vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]);

    let vest = doc
        .add_shape("Vest", Transform::identity(), geometry, Some(torso))
        .expect("Failed to add shape");

    // Surface material and some metadata on the root
    doc.set_shader(
        vest,
        Shader::Lighting(
            LightingAttributes::new("VestMat", LightingKind::Default).with_textures(vec![
                "textures/vest.dds".to_string(),
                "textures/vest_n.dds".to_string(),
            ]),
        ),
    )
    .expect("Failed to attach shader");
    doc.append_extra_data(None, ExtraData::flags("BSX", 2))
        .expect("Failed to append extra data");

    // Read back what we built
    log::info!("Nodes:\n{}", doc.node_names());
    log::info!("Shapes:\n{}", doc.shape_names());

    let mut probe = [Vec3::ZERO; 0];
    let total = doc
        .vertices_into(vest, &mut probe, 0)
        .expect("Failed to count vertices");
    let mut vertices = vec![Vec3::ZERO; total];
    doc.vertices_into(vest, &mut vertices, 0)
        .expect("Failed to read vertices");
    log::info!("Shape has {} vertices, first at {:?}", total, vertices[0]);

    let global = doc
        .global_transform(vest.as_node())
        .expect("Failed to compose transforms");
    log::info!("Vest global translation: {:?}", global.translation);

    // Persist the whole document
    let path = std::env::temp_dir().join("strata_scene.ron");
    doc.save(&path).expect("Failed to save document");
    log::info!("Saved {} blocks to {:?}", doc.block_count(), path);
}
