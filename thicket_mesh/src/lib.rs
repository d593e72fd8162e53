// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Thicket Mesh: a static bounding volume hierarchy over triangle meshes.
//!
//! Where `thicket_tree` tracks boxes that move every frame, this crate builds a
//! hierarchy once over geometry that does not change (level collision, a
//! static prop's render mesh) and answers exact triangle ray casts against it.
//!
//! Construction is top-down. At each node the triangles' centroids are binned
//! along the axis of largest spread and the bin boundary with the lowest
//! surface-area-heuristic cost is chosen. Large subtrees are built in parallel
//! on the rayon pool; the result is identical to a single-threaded build.
//!
//! # Example
//!
//! ```rust
//! use glam::Vec3;
//! use thicket_mesh::{BuildConfig, MeshBvh};
//! use thicket_tree::Ray;
//!
//! // A unit quad in the y = 0 plane.
//! let vertices = [
//!     Vec3::new(0.0, 0.0, 0.0),
//!     Vec3::new(1.0, 0.0, 0.0),
//!     Vec3::new(1.0, 0.0, 1.0),
//!     Vec3::new(0.0, 0.0, 1.0),
//! ];
//! let indices = [0, 1, 2, 0, 2, 3];
//! let bvh = MeshBvh::from_indexed(&vertices, &indices, BuildConfig::default()).unwrap();
//!
//! let hit = bvh.cast_ray(&Ray::new(Vec3::new(0.25, 2.0, 0.75), -Vec3::Y)).unwrap();
//! assert_eq!(hit.triangle, 1);
//! assert!((hit.t - 2.0).abs() < 1e-5);
//! ```

mod build;
pub mod bvh;
pub mod config;
pub mod error;
pub mod triangle;

pub use bvh::{MeshBvh, MeshNode, MeshNodeKind, TriangleHit};
pub use config::BuildConfig;
pub use error::MeshError;
pub use triangle::Triangle;
