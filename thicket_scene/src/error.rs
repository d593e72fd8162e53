// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type for scene synchronization.

use thicket_tree::TreeError;
use thiserror::Error;

/// Errors reported by [`BroadPhase::sync`](crate::BroadPhase::sync).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SyncError {
    /// The source yielded the same entity more than once. Nothing was applied.
    #[error("entity {0} appears more than once in the bounds source")]
    DuplicateEntity(String),
    /// The underlying tree rejected an operation.
    #[error(transparent)]
    Tree(#[from] TreeError),
}
