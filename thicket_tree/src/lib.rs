// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Thicket Tree: a dynamic 3D AABB tree for broad-phase collision and picking.
//!
//! Thicket Tree tracks a changing set of entities' world-space boxes and answers
//! "which entities overlap" and "what does this ray hit first".
//!
//! - Insert, update, translate and remove boxes keyed by an opaque entity handle.
//! - Enumerate every overlapping pair exactly once with [`DynamicTree::collision_pairs`].
//! - Cast rays with [`DynamicTree::query_ray`] (nearest hit) or
//!   [`DynamicTree::query_ray_collisions`] (every box touched, for debug drawing).
//!
//! Nodes live in a contiguous arena addressed by index, with a free list for reuse.
//! Insertion chooses a sibling with a surface-area cost heuristic and both insertion
//! and removal refit and rebalance the path to the root with AVL-style rotations,
//! so sibling heights never differ by more than one.
//!
//! The tree does not know where boxes come from. Higher layers (for example
//! `thicket_scene`) compute world-space boxes from transforms and feed them here.
//!
//! # Example
//!
//! ```rust
//! use glam::Vec3;
//! use thicket_tree::{Aabb3, DynamicTree, Entity, Ray};
//!
//! let mut tree = DynamicTree::new();
//! tree.insert(Entity(1), Aabb3::new(Vec3::ZERO, Vec3::ONE)).unwrap();
//! tree.insert(Entity(2), Aabb3::new(Vec3::new(5.0, 0.0, 0.0), Vec3::new(6.0, 1.0, 1.0))).unwrap();
//! tree.insert(Entity(3), Aabb3::new(Vec3::new(0.5, 0.0, 0.0), Vec3::new(1.5, 1.0, 1.0))).unwrap();
//!
//! // Only entities 1 and 3 overlap.
//! let pairs = tree.collision_pairs();
//! assert_eq!(pairs.len(), 1);
//!
//! // Entities move every frame.
//! tree.translate(Entity(2), Vec3::new(-4.2, 0.0, 0.0)).unwrap();
//! assert_eq!(tree.collision_pairs().len(), 3);
//!
//! // Nearest hit along +x from the left.
//! let hit = tree.query_ray(&Ray::new(Vec3::new(-3.0, 0.5, 0.5), Vec3::X)).unwrap();
//! assert_eq!(hit.entity, Entity(1));
//! ```
//!
//! ### Float semantics
//!
//! Boxes are assumed finite and NaN-free. Overlap is inclusive: boxes that touch on a
//! face overlap.
//!
//! ### Threading
//!
//! The tree does no internal locking. Mutations take `&mut self`, so callers
//! perform all writes for a frame before handing out shared references for queries.

mod arena;
pub mod config;
pub mod error;
pub mod query;
pub mod tree;
pub mod types;

pub use config::TreeConfig;
pub use error::TreeError;
pub use query::{RayCollisions, RayHit};
pub use tree::DynamicTree;
pub use types::{Aabb3, Entity, NodeFilter, Ray};
