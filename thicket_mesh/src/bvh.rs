// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The built hierarchy and its queries.

use core::fmt;

use glam::Vec3;
use thicket_tree::{Aabb3, Ray};
use tracing::debug;

use crate::build::{PrimRef, build_subtree};
use crate::config::BuildConfig;
use crate::error::MeshError;
use crate::triangle::Triangle;

/// What a node holds.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MeshNodeKind {
    /// A run of `count` triangles starting at `first` in the build order.
    Leaf {
        /// Start of the run.
        first: usize,
        /// Triangles in the run.
        count: usize,
    },
    /// Two children, by index into [`MeshBvh::nodes`].
    Internal {
        /// Left child index.
        left: usize,
        /// Right child index.
        right: usize,
    },
}

/// One node of the flattened hierarchy.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MeshNode {
    /// Box covering everything below this node.
    pub bbox: Aabb3,
    /// Leaf range or child links.
    pub kind: MeshNodeKind,
}

impl MeshNode {
    pub(crate) fn shifted(self, offset: usize) -> Self {
        match self.kind {
            MeshNodeKind::Leaf { .. } => self,
            MeshNodeKind::Internal { left, right } => Self {
                bbox: self.bbox,
                kind: MeshNodeKind::Internal {
                    left: left + offset,
                    right: right + offset,
                },
            },
        }
    }
}

/// Nearest triangle hit by a ray.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TriangleHit {
    /// Index of the triangle in the input order.
    pub triangle: usize,
    /// Distance along the ray.
    pub t: f32,
    /// Barycentric weight of the triangle's `b` corner.
    pub u: f32,
    /// Barycentric weight of the triangle's `c` corner.
    pub v: f32,
}

/// Bounding volume hierarchy over a fixed set of triangles.
///
/// Built once, then queried. Nodes are stored depth-first with the root at
/// index 0; leaves refer to runs of a permuted triangle order, so the
/// triangles themselves stay in input order.
#[derive(Clone)]
pub struct MeshBvh {
    triangles: Vec<Triangle>,
    order: Vec<usize>,
    nodes: Vec<MeshNode>,
    depth: usize,
}

impl fmt::Debug for MeshBvh {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MeshBvh")
            .field("triangles", &self.triangles.len())
            .field("nodes", &self.nodes.len())
            .field("depth", &self.depth)
            .finish_non_exhaustive()
    }
}

impl MeshBvh {
    /// Build a hierarchy over `triangles`.
    pub fn build(triangles: Vec<Triangle>, config: BuildConfig) -> Result<Self, MeshError> {
        config.validate()?;
        if triangles.is_empty() {
            return Err(MeshError::EmptyMesh);
        }

        let mut prims: Vec<PrimRef> = triangles
            .iter()
            .enumerate()
            .map(|(i, t)| PrimRef::new(i, t))
            .collect();
        let nodes = build_subtree(&mut prims, 0, &config);
        let order = prims.iter().map(|p| p.index).collect();
        let depth = measure_depth(&nodes);
        debug!(
            triangles = triangles.len(),
            nodes = nodes.len(),
            depth,
            "built mesh bvh"
        );
        Ok(Self {
            triangles,
            order,
            nodes,
            depth,
        })
    }

    /// Build from an indexed triangle list: every three indices name one triangle.
    pub fn from_indexed(
        vertices: &[Vec3],
        indices: &[u32],
        config: BuildConfig,
    ) -> Result<Self, MeshError> {
        if indices.len() % 3 != 0 {
            return Err(MeshError::MalformedIndices { len: indices.len() });
        }
        let vertex = |index: u32| {
            vertices
                .get(index as usize)
                .copied()
                .ok_or(MeshError::IndexOutOfRange {
                    index,
                    vertex_count: vertices.len(),
                })
        };
        let triangles = indices
            .chunks_exact(3)
            .map(|tri| Ok(Triangle::new(vertex(tri[0])?, vertex(tri[1])?, vertex(tri[2])?)))
            .collect::<Result<Vec<_>, MeshError>>()?;
        Self::build(triangles, config)
    }

    /// Triangles in input order.
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Flattened nodes, root first.
    pub fn nodes(&self) -> &[MeshNode] {
        &self.nodes
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of node levels. A hierarchy that is a single leaf has depth 1.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Box covering the whole mesh.
    pub fn bounds(&self) -> Aabb3 {
        self.nodes[0].bbox
    }

    /// Nearest triangle along the ray.
    ///
    /// Children are visited near-first and any subtree whose box is entered no
    /// closer than the current best hit is skipped.
    pub fn cast_ray(&self, ray: &Ray) -> Option<TriangleHit> {
        let mut best: Option<TriangleHit> = None;
        let mut stack: Vec<(usize, f32)> = Vec::with_capacity(2 * self.depth);
        stack.push((0, ray.intersect_aabb(&self.nodes[0].bbox)?));
        while let Some((index, t_enter)) = stack.pop() {
            if best.is_some_and(|hit| t_enter >= hit.t) {
                continue;
            }
            match self.nodes[index].kind {
                MeshNodeKind::Leaf { first, count } => {
                    for &triangle in &self.order[first..first + count] {
                        let Some((t, u, v)) = self.triangles[triangle].intersect_ray(ray) else {
                            continue;
                        };
                        if best.is_none_or(|hit| t < hit.t) {
                            best = Some(TriangleHit { triangle, t, u, v });
                        }
                    }
                }
                MeshNodeKind::Internal { left, right } => {
                    let l = ray.intersect_aabb(&self.nodes[left].bbox).map(|t| (left, t));
                    let r = ray.intersect_aabb(&self.nodes[right].bbox).map(|t| (right, t));
                    match (l, r) {
                        (Some(l), Some(r)) => {
                            let (near, far) = if l.1 <= r.1 { (l, r) } else { (r, l) };
                            stack.push(far);
                            stack.push(near);
                        }
                        (Some(only), None) | (None, Some(only)) => stack.push(only),
                        (None, None) => {}
                    }
                }
            }
        }
        best
    }

    /// Indices (input order) of triangles whose bounding boxes overlap `query`.
    pub fn query_box(&self, query: &Aabb3) -> Vec<usize> {
        let mut out = Vec::new();
        let mut stack = vec![0];
        while let Some(index) = stack.pop() {
            let node = &self.nodes[index];
            if !node.bbox.overlaps(query) {
                continue;
            }
            match node.kind {
                MeshNodeKind::Leaf { first, count } => out.extend(
                    self.order[first..first + count]
                        .iter()
                        .copied()
                        .filter(|&i| self.triangles[i].bounds().overlaps(query)),
                ),
                MeshNodeKind::Internal { left, right } => {
                    stack.push(left);
                    stack.push(right);
                }
            }
        }
        out
    }
}

fn measure_depth(nodes: &[MeshNode]) -> usize {
    let mut deepest = 0;
    let mut stack = vec![(0, 1)];
    while let Some((index, level)) = stack.pop() {
        deepest = deepest.max(level);
        if let MeshNodeKind::Internal { left, right } = nodes[index].kind {
            stack.push((left, level + 1));
            stack.push((right, level + 1));
        }
    }
    deepest
}
