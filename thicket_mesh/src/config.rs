// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Build options.

use crate::error::MeshError;

/// Options for [`MeshBvh::build`](crate::MeshBvh::build).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct BuildConfig {
    /// Number of centroid bins evaluated per split. At least 2.
    pub bin_count: usize,
    /// Nodes with this many triangles or fewer become leaves. At least 1.
    pub max_leaf_size: usize,
    /// Subtrees with at least this many triangles are built on the rayon pool.
    pub parallel_threshold: usize,
    /// Cost of visiting an internal node, relative to `intersection_cost`.
    pub traversal_cost: f32,
    /// Cost of testing one triangle.
    pub intersection_cost: f32,
}

impl BuildConfig {
    /// Set [`BuildConfig::bin_count`].
    #[must_use]
    pub const fn with_bin_count(mut self, bin_count: usize) -> Self {
        self.bin_count = bin_count;
        self
    }

    /// Set [`BuildConfig::max_leaf_size`].
    #[must_use]
    pub const fn with_max_leaf_size(mut self, max_leaf_size: usize) -> Self {
        self.max_leaf_size = max_leaf_size;
        self
    }

    /// Set [`BuildConfig::parallel_threshold`].
    ///
    /// `usize::MAX` keeps the whole build on the calling thread.
    #[must_use]
    pub const fn with_parallel_threshold(mut self, parallel_threshold: usize) -> Self {
        self.parallel_threshold = parallel_threshold;
        self
    }

    /// Set both SAH cost constants.
    #[must_use]
    pub const fn with_costs(mut self, traversal_cost: f32, intersection_cost: f32) -> Self {
        self.traversal_cost = traversal_cost;
        self.intersection_cost = intersection_cost;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), MeshError> {
        if self.bin_count < 2 {
            return Err(MeshError::InvalidConfig("bin_count must be at least 2"));
        }
        if self.max_leaf_size == 0 {
            return Err(MeshError::InvalidConfig("max_leaf_size must be at least 1"));
        }
        if !(self.traversal_cost >= 0.0 && self.traversal_cost.is_finite()) {
            return Err(MeshError::InvalidConfig(
                "traversal_cost must be finite and non-negative",
            ));
        }
        if !(self.intersection_cost > 0.0 && self.intersection_cost.is_finite()) {
            return Err(MeshError::InvalidConfig(
                "intersection_cost must be finite and positive",
            ));
        }
        Ok(())
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            bin_count: 12,
            max_leaf_size: 4,
            parallel_threshold: 1024,
            traversal_cost: 1.0,
            intersection_cost: 1.0,
        }
    }
}
