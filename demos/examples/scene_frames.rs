// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene broad phase over several frames.
//!
//! Bodies orbit the origin; each frame their transforms change, the broad phase
//! is synced, and the overlapping pairs and change report are printed.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p thicket_demos --example scene_frames`

use glam::{Affine3A, Quat, Vec3};
use thicket_scene::{BroadPhase, Placed};
use thicket_tree::{Aabb3, Ray};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let local = Aabb3::from_center_half_extents(Vec3::ZERO, Vec3::new(0.8, 0.4, 0.4));
    let mut bodies: Vec<Placed<u32>> = (0..12)
        .map(|i| Placed {
            entity: i,
            local,
            transform: Affine3A::IDENTITY,
        })
        .collect();
    let mut broad = BroadPhase::new();

    for frame in 0..5 {
        let time = frame as f32 * 0.25;
        for (i, body) in bodies.iter_mut().enumerate() {
            let angle = time + i as f32 * core::f32::consts::TAU / 12.0;
            let radius = if i % 2 == 0 { 3.0 } else { 3.5 };
            body.transform = Affine3A::from_rotation_translation(
                Quat::from_rotation_y(-angle),
                Vec3::new(radius * angle.cos(), 0.0, radius * angle.sin()),
            );
        }
        let report = broad.sync(&bodies).unwrap();
        println!(
            "frame {frame}: +{} -{} ~{} changed, dirty region {:?}",
            report.added.len(),
            report.removed.len(),
            report.moved.len(),
            report.union()
        );
        println!("  pairs: {:?}", broad.overlapping_pairs());
    }

    // Despawn every other body.
    bodies.retain(|b| b.entity % 2 == 1);
    let report = broad.sync(&bodies).unwrap();
    println!("despawned {:?}", report.removed.iter().map(|(e, _)| e).collect::<Vec<_>>());

    let pick = broad.pick(&Ray::new(Vec3::new(0.0, 0.0, 0.0), Vec3::X));
    println!("pick from the origin along +x: {pick:?}");
}
