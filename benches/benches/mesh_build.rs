// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use glam::Vec3;
use thicket_mesh::{BuildConfig, MeshBvh};
use thicket_tree::Ray;

/// A rippled height-field of `n` x `n` quads.
fn gen_terrain(n: u32) -> (Vec<Vec3>, Vec<u32>) {
    let mut vertices = Vec::with_capacity(((n + 1) * (n + 1)) as usize);
    for z in 0..=n {
        for x in 0..=n {
            let (fx, fz) = (x as f32, z as f32);
            let y = (fx * 0.3).sin() * (fz * 0.2).cos() * 2.0;
            vertices.push(Vec3::new(fx, y, fz));
        }
    }
    let row = n + 1;
    let mut indices = Vec::with_capacity((n * n * 6) as usize);
    for z in 0..n {
        for x in 0..n {
            let i = z * row + x;
            indices.extend([i, i + 1, i + row, i + 1, i + row + 1, i + row]);
        }
    }
    (vertices, indices)
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("mesh_build");
    group.sample_size(20);
    for &n in &[64_u32, 256] {
        let (vertices, indices) = gen_terrain(n);
        group.throughput(Throughput::Elements(u64::from(n * n * 2)));
        let serial = BuildConfig::default().with_parallel_threshold(usize::MAX);
        group.bench_function(format!("serial_tris{}", n * n * 2), |b| {
            b.iter(|| black_box(MeshBvh::from_indexed(&vertices, &indices, serial).unwrap()));
        });
        let parallel = BuildConfig::default();
        group.bench_function(format!("parallel_tris{}", n * n * 2), |b| {
            b.iter(|| black_box(MeshBvh::from_indexed(&vertices, &indices, parallel).unwrap()));
        });
    }
    group.finish();
}

fn bench_cast(c: &mut Criterion) {
    let mut group = c.benchmark_group("mesh_cast");
    let (vertices, indices) = gen_terrain(256);
    let bvh = MeshBvh::from_indexed(&vertices, &indices, BuildConfig::default()).unwrap();
    let rays: Vec<Ray> = (0..1024)
        .map(|i| {
            let x = (i % 32) as f32 * 8.0 + 0.5;
            let z = (i / 32) as f32 * 8.0 + 0.5;
            Ray::new(Vec3::new(x, 20.0, z), Vec3::new(0.3, -1.0, 0.2))
        })
        .collect();
    group.throughput(Throughput::Elements(rays.len() as u64));
    group.bench_function("terrain_rays_1024", |b| {
        b.iter(|| {
            let hits = rays.iter().filter(|r| bvh.cast_ray(r).is_some()).count();
            black_box(hits);
        });
    });
    group.finish();
}

criterion_group!(benches, bench_build, bench_cast);
criterion_main!(benches);
