// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Static mesh hierarchy.
//!
//! Build a BVH over a rippled terrain and drop rays onto it.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p thicket_demos --example mesh_picking`

use glam::Vec3;
use thicket_mesh::{BuildConfig, MeshBvh};
use thicket_tree::{Aabb3, Ray};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let n = 64_u32;
    let mut vertices = Vec::new();
    for z in 0..=n {
        for x in 0..=n {
            let (fx, fz) = (x as f32, z as f32);
            vertices.push(Vec3::new(fx, (fx * 0.3).sin() + (fz * 0.2).cos(), fz));
        }
    }
    let row = n + 1;
    let mut indices = Vec::new();
    for z in 0..n {
        for x in 0..n {
            let i = z * row + x;
            indices.extend([i, i + 1, i + row, i + 1, i + row + 1, i + row]);
        }
    }

    let bvh = MeshBvh::from_indexed(&vertices, &indices, BuildConfig::default()).unwrap();
    println!(
        "{} triangles, {} nodes, depth {}, bounds {:?}",
        bvh.triangles().len(),
        bvh.node_count(),
        bvh.depth(),
        bvh.bounds()
    );

    for (x, z) in [(10.5, 10.5), (32.25, 48.75), (63.9, 0.1), (80.0, 80.0)] {
        let ray = Ray::new(Vec3::new(x, 10.0, z), -Vec3::Y);
        match bvh.cast_ray(&ray) {
            Some(hit) => println!(
                "({x}, {z}): triangle {} at height {:.3}",
                hit.triangle,
                ray.point_at(hit.t).y
            ),
            None => println!("({x}, {z}): miss"),
        }
    }

    let region = Aabb3::new(Vec3::new(20.0, -5.0, 20.0), Vec3::new(22.0, 5.0, 22.0));
    println!("triangles near (21, 21): {}", bvh.query_box(&region).len());
}
