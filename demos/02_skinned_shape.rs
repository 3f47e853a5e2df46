//! 02 - Skinned Shape
//!
//! Bind a shape to a reference skeleton through the staged skin workflow.
//!
//! This example demonstrates:
//! - Loading configuration to pick the default engine target
//! - Writing a skeleton file and loading it through the SkeletonCache
//! - Staging bones and vertex weights on a SkinBinding
//! - Committing the binding, which materializes bone nodes on demand
//! - Reading the committed skin back from the document
//!
//! Run with: `cargo run --example 02_skinned_shape`

use std::sync::Arc;

use strata::{
    Bone, Document, Geometry, Skeleton, SkeletonCache, SkinBinding, StrataConfig, Transform,
    Triangle, Vec3, VertexWeight,
};

fn main() {
    env_logger::init();
    log::info!("Skinning a shape against a reference skeleton");

    let config = StrataConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config: {}. Using defaults.", e);
        StrataConfig::default()
    });
    let target = config
        .assets
        .default_target()
        .expect("Config names an unknown engine target");

    // A three-bone skeleton, written to disk so the cache has something
    // to load
    let skeleton = Skeleton::new(
        target,
        "Root",
        vec![
            Bone::root("Root", Transform::identity()),
            Bone::child(
                "Spine",
                0,
                Transform::from_translation(Vec3::new(0.0, 0.0, 60.0)),
            ),
            Bone::child(
                "Arm",
                1,
                Transform::from_translation(Vec3::new(20.0, 0.0, 55.0)),
            ),
        ],
    )
    .expect("Failed to build skeleton");

    let skeleton_dir = std::env::temp_dir().join("strata_skeletons");
    std::fs::create_dir_all(&skeleton_dir).expect("Failed to create skeleton dir");
    let cache = SkeletonCache::new(&skeleton_dir);
    std::fs::write(
        cache.path_for(target),
        skeleton.to_ron_string().expect("Failed to serialize"),
    )
    .expect("Failed to write skeleton file");

    let skeleton = cache.load(target).expect("Failed to load skeleton");
    log::info!(
        "Loaded {} bones for {} from {:?}",
        skeleton.bone_count(),
        target,
        cache.path_for(target)
    );

    // A quad to skin
    let mut doc = Document::new(target);
    let geometry = Geometry::new(
        vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(10.0, 10.0, 0.0),
            Vec3::new(0.0, 10.0, 0.0),
        ],
        vec![Triangle::new(0, 1, 2), Triangle::new(0, 2, 3)],
    );
    let shape = doc
        .add_shape("Vest", Transform::identity(), geometry, None)
        .expect("Failed to add shape");

    // Stage weights for two bones, then commit in one step
    let mut binding =
        SkinBinding::stage(&doc, shape, Arc::clone(&skeleton)).expect("Failed to stage binding");
    binding
        .set_weights(
            "Spine",
            vec![
                VertexWeight::new(0, 1.0),
                VertexWeight::new(1, 0.6),
                VertexWeight::new(3, 1.0),
            ],
        )
        .expect("Failed to stage Spine weights");
    binding
        .set_weights(
            "Arm",
            vec![VertexWeight::new(1, 0.4), VertexWeight::new(2, 1.0)],
        )
        .expect("Failed to stage Arm weights");
    binding.commit(&mut doc).expect("Failed to commit skin");

    log::info!("Bones on the shape:\n{}", doc.bone_names(shape).unwrap());
    log::info!(
        "Materialized nodes:\n{}",
        doc.node_names()
    );
    let arm = doc.find_node("Arm").expect("Arm was not materialized");
    let global = doc.global_transform(arm).expect("Failed to compose");
    log::info!("Arm sits at {:?} in global space", global.translation);
}
