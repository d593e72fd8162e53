// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Read-only traversals: overlapping pairs, ray casts, box queries.
//!
//! All traversals use an explicit stack, so tree depth never turns into call depth.

use core::fmt::Debug;
use core::hash::Hash;

use crate::arena::{Kind, NodeId};
use crate::tree::DynamicTree;
use crate::types::{Aabb3, Ray};

/// Nearest leaf hit by a ray.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RayHit<E> {
    /// The entity whose box was hit.
    pub entity: E,
    /// Distance along the ray to the box entry point (0 if the origin is inside).
    pub t: f32,
}

/// Every box a ray passed through, for debug drawing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RayCollisions {
    /// Boxes of all intersected nodes, leaves and internal.
    pub boxes: Vec<Aabb3>,
    /// Whether any leaf was hit.
    pub hit: bool,
}

#[derive(Copy, Clone, Debug)]
enum PairTask {
    /// Two children of one node: pairs inside each, then pairs across.
    Siblings(NodeId, NodeId),
    /// Two disjoint subtrees: only pairs with one leaf on each side.
    Cross(NodeId, NodeId),
}

impl<E: Copy + Eq + Hash + Debug> DynamicTree<E> {
    /// Call `f` once for every unordered pair of entities whose boxes overlap.
    pub fn for_each_pair(&self, mut f: impl FnMut(E, E)) {
        let Some(root) = self.root else {
            return;
        };
        let Some((left, right)) = self.children(root) else {
            return;
        };

        let mut stack = Vec::with_capacity(64);
        stack.push(PairTask::Siblings(left, right));
        while let Some(task) = stack.pop() {
            match task {
                PairTask::Siblings(a, b) => {
                    for n in [a, b] {
                        if let Some((l, r)) = self.children(n) {
                            stack.push(PairTask::Siblings(l, r));
                        }
                    }
                    stack.push(PairTask::Cross(a, b));
                }
                PairTask::Cross(a, b) => {
                    let (na, nb) = (&self.arena[a], &self.arena[b]);
                    if !na.bbox.overlaps(&nb.bbox) {
                        continue;
                    }
                    match (na.kind, nb.kind) {
                        (Kind::Leaf(ea), Kind::Leaf(eb)) => f(ea, eb),
                        (Kind::Internal { left, right }, Kind::Leaf(_)) => {
                            stack.push(PairTask::Cross(left, b));
                            stack.push(PairTask::Cross(right, b));
                        }
                        (Kind::Leaf(_), Kind::Internal { left, right }) => {
                            stack.push(PairTask::Cross(a, left));
                            stack.push(PairTask::Cross(a, right));
                        }
                        (
                            Kind::Internal {
                                left: al,
                                right: ar,
                            },
                            Kind::Internal {
                                left: bl,
                                right: br,
                            },
                        ) => {
                            stack.push(PairTask::Cross(al, bl));
                            stack.push(PairTask::Cross(al, br));
                            stack.push(PairTask::Cross(ar, bl));
                            stack.push(PairTask::Cross(ar, br));
                        }
                    }
                }
            }
        }
    }

    /// All unordered pairs of entities whose boxes overlap, each reported once.
    pub fn collision_pairs(&self) -> Vec<(E, E)> {
        let mut out = Vec::new();
        self.for_each_pair(|a, b| out.push((a, b)));
        out
    }

    /// Nearest entity whose box the ray enters, or `None`.
    ///
    /// Subtrees are skipped when the ray misses their box or enters it no
    /// closer than the best hit so far.
    pub fn query_ray(&self, ray: &Ray) -> Option<RayHit<E>> {
        let root = self.root?;
        let mut best: Option<RayHit<E>> = None;
        let mut stack = Vec::with_capacity(64);
        stack.push(root);
        while let Some(index) = stack.pop() {
            let node = &self.arena[index];
            let Some(t) = ray.intersect_aabb(&node.bbox) else {
                continue;
            };
            if best.is_some_and(|hit| t >= hit.t) {
                continue;
            }
            match node.kind {
                Kind::Leaf(entity) => best = Some(RayHit { entity, t }),
                Kind::Internal { left, right } => {
                    stack.push(left);
                    stack.push(right);
                }
            }
        }
        best
    }

    /// Every node box the ray intersects, and whether any of them is a leaf.
    pub fn query_ray_collisions(&self, ray: &Ray) -> RayCollisions {
        let mut out = RayCollisions::default();
        let Some(root) = self.root else {
            return out;
        };
        let mut stack = vec![root];
        while let Some(index) = stack.pop() {
            let node = &self.arena[index];
            if ray.intersect_aabb(&node.bbox).is_none() {
                continue;
            }
            out.boxes.push(node.bbox);
            match node.kind {
                Kind::Leaf(_) => out.hit = true,
                Kind::Internal { left, right } => {
                    stack.push(left);
                    stack.push(right);
                }
            }
        }
        out
    }

    /// Entities whose boxes overlap `query`.
    pub fn query_box(&self, query: &Aabb3) -> Vec<E> {
        let mut out = Vec::new();
        let Some(root) = self.root else {
            return out;
        };
        let mut stack = vec![root];
        while let Some(index) = stack.pop() {
            let node = &self.arena[index];
            if !node.bbox.overlaps(query) {
                continue;
            }
            match node.kind {
                Kind::Leaf(entity) => out.push(entity),
                Kind::Internal { left, right } => {
                    stack.push(left);
                    stack.push(right);
                }
            }
        }
        out
    }
}
