// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Top-down binned SAH construction.
//!
//! Each call builds one subtree over a slice of primitive references and returns
//! that subtree's nodes with the subtree root first. Child indices are local to
//! the returned list; the caller shifts them when it splices the list after its
//! own node. Primitive references are permuted in place so every leaf covers a
//! contiguous range.

use glam::Vec3;
use thicket_tree::Aabb3;

use crate::bvh::{MeshNode, MeshNodeKind};
use crate::config::BuildConfig;
use crate::triangle::Triangle;

#[derive(Copy, Clone, Debug)]
pub(crate) struct PrimRef {
    pub(crate) index: usize,
    bounds: Aabb3,
    centroid: Vec3,
}

impl PrimRef {
    pub(crate) fn new(index: usize, triangle: &Triangle) -> Self {
        Self {
            index,
            bounds: triangle.bounds(),
            centroid: triangle.centroid(),
        }
    }
}

/// Binning of one axis of the centroid bounds.
#[derive(Copy, Clone, Debug)]
struct Binning {
    axis: usize,
    origin: f32,
    scale: f32,
    bins: usize,
}

impl Binning {
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "bin positions are clamped into 0..bins"
    )]
    fn bin_of(&self, centroid: Vec3) -> usize {
        let pos = (centroid[self.axis] - self.origin) * self.scale;
        (pos.max(0.0) as usize).min(self.bins - 1)
    }
}

/// Build the subtree for `prims`, whose first element sits at `first` in the
/// final primitive order.
pub(crate) fn build_subtree(
    prims: &mut [PrimRef],
    first: usize,
    config: &BuildConfig,
) -> Vec<MeshNode> {
    let bbox = prims
        .iter()
        .fold(Aabb3::EMPTY, |acc, p| acc.merge(&p.bounds));
    let Some((binning, split)) = find_split(prims, &bbox, config) else {
        return vec![MeshNode {
            bbox,
            kind: MeshNodeKind::Leaf {
                first,
                count: prims.len(),
            },
        }];
    };

    let mid = partition(prims, |p| binning.bin_of(p.centroid) < split);
    debug_assert!(
        mid > 0 && mid < prims.len(),
        "a chosen split leaves both sides populated"
    );
    let fork = prims.len() >= config.parallel_threshold;
    let (lo, hi) = prims.split_at_mut(mid);
    let (left, right) = if fork {
        rayon::join(
            || build_subtree(lo, first, config),
            || build_subtree(hi, first + mid, config),
        )
    } else {
        (
            build_subtree(lo, first, config),
            build_subtree(hi, first + mid, config),
        )
    };
    stitch(bbox, left, right)
}

/// Pick the cheapest bin boundary on the axis of largest centroid extent.
///
/// Returns `None` when the node should stay a leaf.
#[allow(
    clippy::cast_precision_loss,
    reason = "primitive counts only weight the cost estimate"
)]
fn find_split(prims: &[PrimRef], bbox: &Aabb3, config: &BuildConfig) -> Option<(Binning, usize)> {
    let n = prims.len();
    if n <= config.max_leaf_size {
        return None;
    }

    let centroids = Aabb3::from_points(prims.iter().map(|p| p.centroid));
    let extent = centroids.extents();
    let axis = if extent.x >= extent.y && extent.x >= extent.z {
        0
    } else if extent.y >= extent.z {
        1
    } else {
        2
    };
    if extent[axis] <= 0.0 {
        // Every centroid coincides; no plane separates them.
        return None;
    }

    let bins = config.bin_count;
    let binning = Binning {
        axis,
        origin: centroids.min[axis],
        scale: bins as f32 / extent[axis],
        bins,
    };
    let mut counts = vec![0_usize; bins];
    let mut boxes = vec![Aabb3::EMPTY; bins];
    for p in prims {
        let b = binning.bin_of(p.centroid);
        counts[b] += 1;
        boxes[b] = boxes[b].merge(&p.bounds);
    }

    // Suffix sweep: right side of boundary `i` covers bins `i..`.
    let mut right_area = vec![0.0_f32; bins];
    let mut right_count = vec![0_usize; bins];
    let mut acc = Aabb3::EMPTY;
    let mut count = 0;
    for i in (1..bins).rev() {
        acc = acc.merge(&boxes[i]);
        count += counts[i];
        right_area[i] = acc.surface_area();
        right_count[i] = count;
    }

    // Prefix sweep, evaluating each boundary.
    let mut best: Option<(f32, usize)> = None;
    let mut acc = Aabb3::EMPTY;
    let mut count = 0;
    for i in 1..bins {
        acc = acc.merge(&boxes[i - 1]);
        count += counts[i - 1];
        if count == 0 || right_count[i] == 0 {
            continue;
        }
        let cost = acc.surface_area() * count as f32 + right_area[i] * right_count[i] as f32;
        if best.is_none_or(|(c, _)| cost < c) {
            best = Some((cost, i));
        }
    }
    let (weighted_area, split) = best?;

    let node_area = bbox.surface_area();
    if node_area > 0.0 {
        let split_cost = config.traversal_cost
            + config.intersection_cost * weighted_area / node_area;
        let leaf_cost = config.intersection_cost * n as f32;
        if split_cost >= leaf_cost {
            return None;
        }
    }
    Some((binning, split))
}

/// Move every element matching `pred` to the front. Returns how many matched.
fn partition(prims: &mut [PrimRef], mut pred: impl FnMut(&PrimRef) -> bool) -> usize {
    let mut mid = 0;
    for i in 0..prims.len() {
        if pred(&prims[i]) {
            prims.swap(i, mid);
            mid += 1;
        }
    }
    mid
}

/// Put a new internal node in front of two built subtrees.
fn stitch(bbox: Aabb3, left: Vec<MeshNode>, right: Vec<MeshNode>) -> Vec<MeshNode> {
    let left_root = 1;
    let right_root = 1 + left.len();
    let mut nodes = Vec::with_capacity(1 + left.len() + right.len());
    nodes.push(MeshNode {
        bbox,
        kind: MeshNodeKind::Internal {
            left: left_root,
            right: right_root,
        },
    });
    nodes.extend(left.into_iter().map(|n| n.shifted(left_root)));
    nodes.extend(right.into_iter().map(|n| n.shifted(right_root)));
    nodes
}
