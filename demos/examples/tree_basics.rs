// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dynamic tree basics.
//!
//! Insert three boxes, list overlapping pairs, move one, and cast a ray.
//!
//! Run:
//! - `RUST_LOG=trace cargo run -p thicket_demos --example tree_basics`

use glam::Vec3;
use thicket_tree::{Aabb3, DynamicTree, Entity, NodeFilter, Ray};
use tracing_subscriber::EnvFilter;

fn unit_at(x: f32) -> Aabb3 {
    Aabb3::new(Vec3::new(x, 0.0, 0.0), Vec3::new(x + 1.0, 1.0, 1.0))
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let mut tree = DynamicTree::new();
    tree.insert(Entity(1), unit_at(0.0)).unwrap();
    tree.insert(Entity(2), unit_at(5.0)).unwrap();
    tree.insert(Entity(3), unit_at(0.5)).unwrap();
    println!("pairs: {:?}", tree.collision_pairs());

    // Slide entity 2 onto the other two.
    tree.translate(Entity(2), Vec3::new(-4.2, 0.0, 0.0)).unwrap();
    let pairs = tree.collision_pairs();
    println!("pairs after move: {pairs:?}");
    assert_eq!(pairs.len(), 3, "all three boxes overlap now");

    let ray = Ray::new(Vec3::new(-3.0, 0.5, 0.5), Vec3::X);
    let hit = tree.query_ray(&ray).unwrap();
    println!("ray hit {:?} at t = {}", hit.entity, hit.t);
    assert_eq!(hit.entity, Entity(1));

    let diag = tree.query_ray_collisions(&ray);
    println!(
        "ray touched {} boxes; tree has {} leaves, {} internal nodes, height {}",
        diag.boxes.len(),
        tree.all_boxes(NodeFilter::LEAVES).len(),
        tree.all_boxes(NodeFilter::INTERNAL).len(),
        tree.height()
    );
    tree.validate().unwrap();
}
