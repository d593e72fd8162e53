// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![cfg(feature = "compare_rstar")]

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use glam::Vec3;
use thicket_tree::{Aabb3, DynamicTree, Entity};

use rstar::primitives::Rectangle;
use rstar::{AABB, RTree};

fn gen_grid_boxes(n: usize, cell: f32) -> Vec<Aabb3> {
    let mut out = Vec::with_capacity(n * n * n);
    for z in 0..n {
        for y in 0..n {
            for x in 0..n {
                let min = Vec3::new(x as f32, y as f32, z as f32) * cell;
                out.push(Aabb3::new(min, min + Vec3::splat(cell)));
            }
        }
    }
    out
}

fn to_rstar_boxes(v: &[Aabb3]) -> Vec<Rectangle<[f32; 3]>> {
    v.iter()
        .map(|b| Rectangle::from_corners(b.min.to_array(), b.max.to_array()))
        .collect()
}

fn bench_rstar_compare(c: &mut Criterion) {
    let mut group = c.benchmark_group("rstar_compare");
    for &n in &[12_usize, 20] {
        let boxes = gen_grid_boxes(n, 10.0);
        let query = Aabb3::new(Vec3::splat(25.0), Vec3::splat(75.0));
        group.throughput(Throughput::Elements((n * n * n) as u64));

        group.bench_function(format!("thicket_build_query_n{}", n * n * n), |b| {
            b.iter_batched(
                DynamicTree::<Entity>::new,
                |mut tree| {
                    for (i, bbox) in boxes.iter().enumerate() {
                        tree.insert(Entity(i as u64), *bbox).unwrap();
                    }
                    black_box(tree.query_box(&query).len());
                },
                BatchSize::SmallInput,
            );
        });

        group.bench_function(format!("rstar_insert_query_n{}", n * n * n), |b| {
            b.iter_batched(
                || to_rstar_boxes(&boxes),
                |rects| {
                    let mut tree = RTree::new();
                    for r in rects {
                        tree.insert(r);
                    }
                    let env = AABB::from_corners(query.min.to_array(), query.max.to_array());
                    black_box(tree.locate_in_envelope_intersecting(&env).count());
                },
                BatchSize::SmallInput,
            );
        });

        group.bench_function(format!("rstar_bulk_query_n{}", n * n * n), |b| {
            b.iter_batched(
                || to_rstar_boxes(&boxes),
                |rects| {
                    let tree = RTree::bulk_load(rects);
                    let env = AABB::from_corners(query.min.to_array(), query.max.to_array());
                    black_box(tree.locate_in_envelope_intersecting(&env).count());
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_rstar_compare);
criterion_main!(benches);
