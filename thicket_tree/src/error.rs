// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type for tree operations.

use core::fmt::Debug;

use thiserror::Error;

/// Errors reported by [`DynamicTree`](crate::DynamicTree).
///
/// Entities are carried in their `Debug` form so the error type does not depend
/// on the entity type parameter.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TreeError {
    /// The entity is not in the tree.
    #[error("entity {0} is not in the tree")]
    UnknownEntity(String),
    /// The entity is already in the tree.
    #[error("entity {0} is already in the tree")]
    DuplicateEntity(String),
    /// A capacity request would shrink the node arena.
    #[error("capacity {requested} is smaller than the current capacity {current}")]
    InvalidCapacity {
        /// Requested slot count.
        requested: usize,
        /// Capacity at the time of the request.
        current: usize,
    },
    /// A structural invariant does not hold. Only produced by
    /// [`DynamicTree::validate`](crate::DynamicTree::validate).
    #[error("tree invariant broken: {0}")]
    Corrupt(String),
}

impl TreeError {
    pub(crate) fn unknown(entity: &impl Debug) -> Self {
        Self::UnknownEntity(format!("{entity:?}"))
    }

    pub(crate) fn duplicate(entity: &impl Debug) -> Self {
        Self::DuplicateEntity(format!("{entity:?}"))
    }
}
