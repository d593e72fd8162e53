// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Thicket Scene: glue between a scene's entities and the dynamic AABB tree.
//!
//! A scene owns transforms and local bounds; the tree only knows world-space
//! boxes. This crate closes the gap:
//!
//! - [`BoundsSource`] lists every entity's current world box. It is implemented
//!   for lists and maps of `(entity, box)` and for [`Placed`] entities that
//!   carry a local box and an affine transform.
//! - [`BroadPhase::sync`] diffs a source against the tree, applies inserts,
//!   updates and removals, and returns a [`SyncReport`] of what changed.
//! - [`BroadPhase::overlapping_pairs`] and [`BroadPhase::pick`] read the result
//!   back in a deterministic order.
//!
//! # Example
//!
//! ```rust
//! use glam::{Affine3A, Vec3};
//! use thicket_scene::{BroadPhase, Placed};
//! use thicket_tree::{Aabb3, Ray};
//!
//! let crate_box = Aabb3::new(Vec3::splat(-0.5), Vec3::splat(0.5));
//! let mut scene = vec![
//!     Placed { entity: 1_u32, local: crate_box, transform: Affine3A::IDENTITY },
//!     Placed { entity: 2, local: crate_box, transform: Affine3A::from_translation(Vec3::X * 5.0) },
//! ];
//!
//! let mut broad = BroadPhase::new();
//! let report = broad.sync(&scene).unwrap();
//! assert_eq!(report.added.len(), 2);
//! assert!(broad.overlapping_pairs().is_empty());
//!
//! // Next frame entity 2 has slid next to entity 1.
//! scene[1].transform = Affine3A::from_translation(Vec3::X * 0.75);
//! let report = broad.sync(&scene).unwrap();
//! assert_eq!(report.moved.len(), 1);
//! assert_eq!(broad.overlapping_pairs(), vec![(1, 2)]);
//!
//! let hit = broad.pick(&Ray::new(Vec3::new(-5.0, 0.0, 0.0), Vec3::X)).unwrap();
//! assert_eq!(hit.entity, 1);
//! ```

mod broad;
mod error;
mod report;
mod source;

pub use broad::BroadPhase;
pub use error::SyncError;
pub use report::SyncReport;
pub use source::{BoundsSource, Placed, transform_aabb};
