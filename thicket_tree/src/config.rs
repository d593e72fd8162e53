// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree construction options.

/// Options for [`DynamicTree::with_config`](crate::DynamicTree::with_config).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct TreeConfig {
    /// Node slots reserved up front. The arena doubles when it runs out.
    pub initial_capacity: usize,
    /// Re-check every structural invariant after each mutation (debug builds only).
    pub validate_on_mutation: bool,
}

impl TreeConfig {
    /// Default initial arena capacity.
    pub const DEFAULT_CAPACITY: usize = 16;

    /// Set [`TreeConfig::initial_capacity`].
    #[must_use]
    pub const fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    /// Set [`TreeConfig::validate_on_mutation`].
    #[must_use]
    pub const fn with_validation(mut self, validate_on_mutation: bool) -> Self {
        self.validate_on_mutation = validate_on_mutation;
        self
    }
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            initial_capacity: Self::DEFAULT_CAPACITY,
            validate_on_mutation: false,
        }
    }
}
