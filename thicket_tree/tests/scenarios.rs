// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end scenarios over the public API.

use glam::Vec3;
use thicket_tree::{Aabb3, DynamicTree, Entity, NodeFilter, Ray, TreeConfig};

fn grid_box(i: u64) -> Aabb3 {
    let x = (i % 10) as f32 * 2.0;
    let z = (i / 10) as f32 * 2.0;
    Aabb3::new(Vec3::new(x, 0.0, z), Vec3::new(x + 1.0, 1.0, z + 1.0))
}

fn checked_tree() -> DynamicTree<Entity> {
    DynamicTree::with_config(TreeConfig::default().with_validation(true))
}

#[test]
fn grid_of_boxes_inserted_then_removed_in_scrambled_order() {
    let mut tree = checked_tree();
    for i in 0..100 {
        tree.insert(Entity(i), grid_box(i)).unwrap();
    }
    assert_eq!(tree.node_count(), 199);
    assert!(tree.collision_pairs().is_empty(), "grid cells do not touch");

    // 37 is coprime with 100, so this visits every index once.
    for k in 0..100 {
        let i = (k * 37 + 11) % 100;
        assert_eq!(tree.remove(Entity(i)), Ok(grid_box(i)));
        tree.validate().unwrap();
    }
    assert!(tree.is_empty());
    assert_eq!(tree.node_count(), 0);
    assert_eq!(tree.root_box(), None);
}

#[test]
fn freed_slots_are_reused_after_churn() {
    let mut tree = checked_tree();
    for i in 0..50 {
        tree.insert(Entity(i), grid_box(i)).unwrap();
    }
    let capacity = tree.capacity();
    for round in 0..10 {
        for i in 0..50 {
            tree.remove(Entity(i)).unwrap();
            tree.insert(Entity(i), grid_box((i + round) % 100)).unwrap();
        }
    }
    assert_eq!(tree.capacity(), capacity, "churn must not grow the arena");
    assert_eq!(tree.node_count(), 99);
}

#[test]
fn moving_entity_into_contact_creates_a_pair() {
    let mut tree = checked_tree();
    tree.insert(Entity(1), grid_box(0)).unwrap();
    tree.insert(Entity(2), grid_box(5)).unwrap();
    assert!(tree.collision_pairs().is_empty());

    // Slide entity 2 from x = 10 to x = 1 (touching faces count as overlap).
    for _ in 0..9 {
        tree.translate(Entity(2), Vec3::new(-1.0, 0.0, 0.0)).unwrap();
    }
    let pairs = tree.collision_pairs();
    assert_eq!(pairs.len(), 1);
    let (a, b) = pairs[0];
    assert!((a, b) == (Entity(1), Entity(2)) || (a, b) == (Entity(2), Entity(1)));
}

#[test]
fn picking_through_a_grid() {
    let mut tree = checked_tree();
    for i in 0..100 {
        tree.insert(Entity(i), grid_box(i)).unwrap();
    }
    // Down the z axis through column x = 6..7: cells 3, 13, 23, ...
    let ray = Ray::new(Vec3::new(6.5, 0.5, -10.0), Vec3::Z);
    let hit = tree.query_ray(&ray).unwrap();
    assert_eq!(hit.entity, Entity(3));
    assert_eq!(hit.t, 10.0);

    let diag = tree.query_ray_collisions(&ray);
    assert!(diag.hit);
    let leaf_boxes = tree.all_boxes(NodeFilter::LEAVES);
    let leaves_on_ray = diag
        .boxes
        .iter()
        .filter(|b| leaf_boxes.contains(b))
        .count();
    assert_eq!(leaves_on_ray, 10);

    // Backwards from the far side finds the last cell first.
    let back = Ray::new(Vec3::new(6.5, 0.5, 50.0), -Vec3::Z);
    assert_eq!(tree.query_ray(&back).unwrap().entity, Entity(93));

    // Above the grid, nothing.
    let above = Ray::new(Vec3::new(6.5, 3.0, -10.0), Vec3::Z);
    assert_eq!(tree.query_ray(&above), None);
}

#[test]
fn generic_entity_keys() {
    let mut tree: DynamicTree<&'static str> = DynamicTree::new();
    tree.insert("crate", grid_box(0)).unwrap();
    tree.insert("barrel", grid_box(0).translated(Vec3::splat(0.5)))
        .unwrap();
    let pairs = tree.collision_pairs();
    assert_eq!(pairs.len(), 1);
    assert!(tree.contains("crate"));
    let mut names: Vec<_> = tree.entities().collect();
    names.sort_unstable();
    assert_eq!(names, vec!["barrel", "crate"]);
}
