// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-frame broad phase over a [`DynamicTree`].

use core::fmt::Debug;
use core::hash::Hash;
use std::collections::HashSet;

use glam::Vec3;
use thicket_tree::{Aabb3, DynamicTree, Ray, RayHit, TreeConfig, TreeError};
use tracing::debug;

use crate::error::SyncError;
use crate::report::SyncReport;
use crate::source::BoundsSource;

/// Keeps a [`DynamicTree`] in step with a [`BoundsSource`] and answers
/// deterministic pair and pick queries.
///
/// Pairs come back canonical (`a < b`) and sorted, so the same scene always
/// yields the same list regardless of tree shape.
pub struct BroadPhase<E> {
    tree: DynamicTree<E>,
    seen: HashSet<E>,
}

impl<E: Debug> Debug for BroadPhase<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BroadPhase")
            .field("tree", &self.tree)
            .finish_non_exhaustive()
    }
}

impl<E: Copy + Ord + Hash + Debug> Default for BroadPhase<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Copy + Ord + Hash + Debug> BroadPhase<E> {
    /// Create an empty broad phase with the default tree configuration.
    pub fn new() -> Self {
        Self::with_config(TreeConfig::default())
    }

    /// Create an empty broad phase whose tree uses `config`.
    pub fn with_config(config: TreeConfig) -> Self {
        Self {
            tree: DynamicTree::with_config(config),
            seen: HashSet::new(),
        }
    }

    /// Read access to the tree, for debug drawing and custom queries.
    pub fn tree(&self) -> &DynamicTree<E> {
        &self.tree
    }

    /// Number of tracked entities.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// True if no entity is tracked.
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Make the tree hold exactly the entities and boxes `source` yields.
    ///
    /// New entities are inserted, changed boxes are updated and entities the
    /// source no longer yields are removed. If the source yields an entity
    /// twice, nothing is applied and [`SyncError::DuplicateEntity`] is returned.
    pub fn sync<S>(&mut self, source: &S) -> Result<SyncReport<E>, SyncError>
    where
        S: BoundsSource<Entity = E> + ?Sized,
    {
        self.seen.clear();
        for (entity, _) in source.world_bounds() {
            if !self.seen.insert(entity) {
                return Err(SyncError::DuplicateEntity(format!("{entity:?}")));
            }
        }

        let mut report = SyncReport::default();
        let mut gone: Vec<E> = self
            .tree
            .entities()
            .filter(|e| !self.seen.contains(e))
            .collect();
        gone.sort_unstable();
        for entity in gone {
            let bbox = self.tree.remove(entity)?;
            report.removed.push((entity, bbox));
        }

        for (entity, bbox) in source.world_bounds() {
            if self.tree.contains(entity) {
                let old = self.tree.bounding_box(entity)?;
                if old != bbox {
                    self.tree.update(entity, bbox)?;
                    report.moved.push((entity, old, bbox));
                }
            } else {
                self.tree.insert(entity, bbox)?;
                report.added.push((entity, bbox));
            }
        }

        debug!(
            added = report.added.len(),
            removed = report.removed.len(),
            moved = report.moved.len(),
            "synced broad phase"
        );
        Ok(report)
    }

    /// Shift one entity's box by `delta` without a full sync.
    pub fn move_by(&mut self, entity: E, delta: Vec3) -> Result<(), TreeError> {
        self.tree.translate(entity, delta)
    }

    /// Every overlapping pair as `(a, b)` with `a < b`, sorted ascending.
    pub fn overlapping_pairs(&self) -> Vec<(E, E)> {
        let mut pairs: Vec<(E, E)> = self
            .tree
            .collision_pairs()
            .into_iter()
            .map(|(a, b)| if a <= b { (a, b) } else { (b, a) })
            .collect();
        pairs.sort_unstable();
        pairs
    }

    /// Nearest entity along the ray.
    pub fn pick(&self, ray: &Ray) -> Option<RayHit<E>> {
        self.tree.query_ray(ray)
    }

    /// Entities whose boxes overlap `region`, sorted ascending.
    pub fn query_region(&self, region: &Aabb3) -> Vec<E> {
        let mut hits = self.tree.query_box(region);
        hits.sort_unstable();
        hits
    }
}
