// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Multi-frame simulations driven through `BroadPhase::sync`.

use std::collections::{BTreeMap, HashMap};

use glam::{Affine3A, Quat, Vec3};
use thicket_scene::{BoundsSource, BroadPhase, Placed};
use thicket_tree::{Aabb3, Ray, TreeConfig};

fn brute_pairs(boxes: &BTreeMap<u32, Aabb3>) -> Vec<(u32, u32)> {
    let items: Vec<_> = boxes.iter().collect();
    let mut out = Vec::new();
    for (i, (a, ab)) in items.iter().enumerate() {
        for (b, bb) in items.iter().skip(i + 1) {
            if ab.overlaps(bb) {
                out.push((**a, **b));
            }
        }
    }
    out
}

#[test]
fn orbiting_bodies_match_brute_force_every_frame() {
    let local = Aabb3::new(Vec3::splat(-0.6), Vec3::splat(0.6));
    let mut scene: Vec<Placed<u32>> = (0..40)
        .map(|i| Placed {
            entity: i,
            local,
            transform: Affine3A::IDENTITY,
        })
        .collect();
    let mut broad = BroadPhase::with_config(TreeConfig::default().with_validation(true));

    for frame in 0..30 {
        let time = frame as f32 * 0.1;
        for (i, body) in scene.iter_mut().enumerate() {
            let radius = 2.0 + (i % 5) as f32;
            let angle = time * (1.0 + (i % 3) as f32 * 0.5) + i as f32;
            let position = Vec3::new(radius * angle.cos(), (i % 4) as f32 * 0.5, radius * angle.sin());
            body.transform = Affine3A::from_rotation_translation(Quat::from_rotation_y(angle), position);
        }
        let report = broad.sync(&scene).unwrap();
        if frame == 0 {
            assert_eq!(report.added.len(), 40);
        } else {
            assert!(report.added.is_empty() && report.removed.is_empty());
        }
        broad.tree().validate().unwrap();

        let world: BTreeMap<u32, Aabb3> = scene.world_bounds().collect();
        assert_eq!(broad.overlapping_pairs(), brute_pairs(&world));
    }
}

#[test]
fn entities_come_and_go_through_a_map_source() {
    let mut source: HashMap<u32, Aabb3> = HashMap::new();
    let mut broad = BroadPhase::new();
    for frame in 0..20_u32 {
        // Spawn one, despawn the one spawned five frames ago.
        source.insert(frame, Aabb3::new(Vec3::ZERO, Vec3::ONE).translated(Vec3::X * frame as f32 * 0.5));
        if frame >= 5 {
            source.remove(&(frame - 5));
        }
        let report = broad.sync(&source).unwrap();
        assert_eq!(report.added.len(), 1);
        assert_eq!(report.removed.len(), usize::from(frame >= 5));
        assert!(report.moved.is_empty());
        assert_eq!(broad.len(), source.len());
    }
    let mut live: Vec<u32> = broad.tree().entities().collect();
    live.sort_unstable();
    assert_eq!(live, (15..20).collect::<Vec<_>>());
}

#[test]
fn emptying_the_source_clears_the_tree() {
    let mut broad = BroadPhase::new();
    let frame: Vec<(u64, Aabb3)> = (0..10)
        .map(|i| (i, Aabb3::new(Vec3::ZERO, Vec3::ONE).translated(Vec3::Z * i as f32 * 3.0)))
        .collect();
    broad.sync(&frame).unwrap();
    let report = broad.sync(&Vec::<(u64, Aabb3)>::new()).unwrap();
    assert_eq!(report.removed.len(), 10);
    let removed: Vec<u64> = report.removed.iter().map(|(e, _)| *e).collect();
    assert_eq!(removed, (0..10).collect::<Vec<_>>(), "removals are reported in entity order");
    assert!(broad.is_empty());
    assert_eq!(broad.tree().node_count(), 0);
    assert_eq!(report.union(), Some(Aabb3::new(Vec3::ZERO, Vec3::new(1.0, 1.0, 28.0))));
    assert_eq!(broad.pick(&Ray::new(Vec3::ZERO, Vec3::Z)), None);
}
