// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use glam::Vec3;
use thicket_tree::{Aabb3, DynamicTree, Entity, Ray};

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f32(&mut self) -> f32 {
        let v = self.next_u64() >> 40;
        v as f32 / (1_u64 << 24) as f32
    }
    fn next_vec3(&mut self, scale: f32) -> Vec3 {
        Vec3::new(self.next_f32(), self.next_f32(), self.next_f32()) * scale
    }
}

fn gen_grid_boxes(n: usize, cell: f32) -> Vec<Aabb3> {
    let mut out = Vec::with_capacity(n * n * n);
    for z in 0..n {
        for y in 0..n {
            for x in 0..n {
                let min = Vec3::new(x as f32, y as f32, z as f32) * cell;
                out.push(Aabb3::new(min, min + Vec3::splat(cell * 0.8)));
            }
        }
    }
    out
}

fn gen_random_boxes(count: usize, world: f32, max_size: f32, seed: u64) -> Vec<Aabb3> {
    let mut rng = Rng::new(seed);
    (0..count)
        .map(|_| {
            let min = rng.next_vec3(world);
            Aabb3::new(min, min + rng.next_vec3(max_size))
        })
        .collect()
}

fn build(boxes: &[Aabb3]) -> DynamicTree {
    let mut tree = DynamicTree::new();
    for (i, b) in boxes.iter().enumerate() {
        tree.insert(Entity(i as u64), *b).unwrap();
    }
    tree
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree_insert");
    for &n in &[8_usize, 16, 24] {
        let boxes = gen_grid_boxes(n, 2.0);
        group.throughput(Throughput::Elements(boxes.len() as u64));
        group.bench_function(format!("grid_n{}", n * n * n), |b| {
            b.iter(|| black_box(build(&boxes)));
        });
    }
    let boxes = gen_random_boxes(4096, 200.0, 4.0, 0x5eed);
    group.throughput(Throughput::Elements(boxes.len() as u64));
    group.bench_function("random_4096", |b| {
        b.iter(|| black_box(build(&boxes)));
    });
    group.finish();
}

fn bench_update_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree_update");
    let boxes = gen_random_boxes(4096, 200.0, 4.0, 0xc0ffee);
    group.throughput(Throughput::Elements(boxes.len() as u64));
    group.bench_function("translate_all_4096", |b| {
        b.iter_batched(
            || (build(&boxes), Rng::new(7)),
            |(mut tree, mut rng)| {
                for i in 0..boxes.len() {
                    let delta = rng.next_vec3(0.5) - Vec3::splat(0.25);
                    tree.translate(Entity(i as u64), delta).unwrap();
                }
                black_box(tree.height());
            },
            BatchSize::SmallInput,
        );
    });
    group.bench_function("remove_reinsert_half_4096", |b| {
        b.iter_batched(
            || build(&boxes),
            |mut tree| {
                for i in (0..boxes.len()).step_by(2) {
                    let bbox = tree.remove(Entity(i as u64)).unwrap();
                    tree.insert(Entity(i as u64), bbox.translated(Vec3::X)).unwrap();
                }
                black_box(tree.node_count());
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

fn bench_pairs(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree_pairs");
    for &(count, world) in &[(1024_usize, 100.0_f32), (4096, 200.0), (4096, 60.0)] {
        let tree = build(&gen_random_boxes(count, world, 4.0, 42));
        let pairs = tree.collision_pairs().len();
        group.bench_function(format!("n{count}_world{world}_pairs{pairs}"), |b| {
            b.iter(|| black_box(tree.collision_pairs().len()));
        });
    }
    group.finish();
}

fn bench_rays(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree_rays");
    let tree = build(&gen_random_boxes(4096, 200.0, 4.0, 99));
    let mut rng = Rng::new(1234);
    let rays: Vec<Ray> = (0..256)
        .map(|_| {
            let origin = rng.next_vec3(200.0);
            let target = rng.next_vec3(200.0);
            Ray::new(origin, target - origin + Vec3::splat(1e-3))
        })
        .collect();
    group.throughput(Throughput::Elements(rays.len() as u64));
    group.bench_function("nearest_hit_256", |b| {
        b.iter(|| {
            let hits = rays.iter().filter(|r| tree.query_ray(r).is_some()).count();
            black_box(hits);
        });
    });
    group.bench_function("all_boxes_on_ray_256", |b| {
        b.iter(|| {
            let boxes: usize = rays.iter().map(|r| tree.query_ray_collisions(r).boxes.len()).sum();
            black_box(boxes);
        });
    });
    group.finish();
}

criterion_group!(benches, bench_insert, bench_update_churn, bench_pairs, bench_rays);
criterion_main!(benches);
