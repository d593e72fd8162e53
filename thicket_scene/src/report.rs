// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! What a sync changed.

use thicket_tree::Aabb3;

/// Changes applied by one [`BroadPhase::sync`](crate::BroadPhase::sync).
#[derive(Clone, Debug, PartialEq)]
pub struct SyncReport<E> {
    /// Entities inserted, with their boxes, in source order.
    pub added: Vec<(E, Aabb3)>,
    /// Entities dropped because the source no longer yields them, with their last boxes.
    pub removed: Vec<(E, Aabb3)>,
    /// Entities whose box changed: (entity, old, new).
    pub moved: Vec<(E, Aabb3, Aabb3)>,
}

impl<E> Default for SyncReport<E> {
    fn default() -> Self {
        Self {
            added: Vec::new(),
            removed: Vec::new(),
            moved: Vec::new(),
        }
    }
}

impl<E> SyncReport<E> {
    /// True if the sync changed nothing.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.moved.is_empty()
    }

    /// Box covering every added, removed, old and new box. `None` if empty.
    pub fn union(&self) -> Option<Aabb3> {
        let mut it = self
            .added
            .iter()
            .chain(&self.removed)
            .map(|(_, b)| *b)
            .chain(self.moved.iter().flat_map(|(_, old, new)| [*old, *new]));
        let first = it.next()?;
        Some(it.fold(first, |acc, b| acc.merge(&b)))
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    #[test]
    fn empty_report_has_no_union() {
        let report: SyncReport<u32> = SyncReport::default();
        assert!(report.is_empty());
        assert_eq!(report.union(), None);
    }

    #[test]
    fn union_covers_old_and_new_positions() {
        let a = Aabb3::new(Vec3::ZERO, Vec3::ONE);
        let report = SyncReport {
            added: vec![(1_u32, a)],
            removed: vec![],
            moved: vec![(2, a.translated(Vec3::Y * 4.0), a.translated(Vec3::X * -3.0))],
        };
        assert!(!report.is_empty());
        assert_eq!(
            report.union(),
            Some(Aabb3::new(Vec3::new(-3.0, 0.0, 0.0), Vec3::new(1.0, 5.0, 1.0)))
        );
    }
}
