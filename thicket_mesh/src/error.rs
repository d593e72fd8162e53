// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type for BVH construction.

use thiserror::Error;

/// Errors reported while building a [`MeshBvh`](crate::MeshBvh).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MeshError {
    /// The mesh has no triangles.
    #[error("mesh has no triangles")]
    EmptyMesh,
    /// An index refers past the end of the vertex buffer.
    #[error("vertex index {index} is out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        /// The offending index.
        index: u32,
        /// Length of the vertex buffer.
        vertex_count: usize,
    },
    /// The index buffer length is not a multiple of three.
    #[error("index buffer length {len} is not a multiple of 3")]
    MalformedIndices {
        /// Length of the index buffer.
        len: usize,
    },
    /// A [`BuildConfig`](crate::BuildConfig) field is out of range.
    #[error("invalid build configuration: {0}")]
    InvalidConfig(&'static str),
}
