// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Primitive geometry types: boxes, rays, entity handles.

use glam::Vec3;

/// Opaque entity handle issued by an external registry.
///
/// The tree never interprets the value; it is only used as a map key and
/// returned from queries.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Entity(pub u64);

impl From<u64> for Entity {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

/// Axis-aligned bounding box in 3D.
///
/// A finalized box satisfies `min <= max` on every axis. The [`Aabb3::EMPTY`]
/// box is inverted (`min = +inf`, `max = -inf`) and is the identity of
/// [`Aabb3::merge`], so boxes can be grown incrementally from it.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aabb3 {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Default for Aabb3 {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Aabb3 {
    /// The empty box; merging anything into it yields that thing.
    pub const EMPTY: Self = Self {
        min: Vec3::new(f32::INFINITY, f32::INFINITY, f32::INFINITY),
        max: Vec3::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY),
    };

    /// The box covering all of space.
    pub const INFINITE: Self = Self {
        min: Vec3::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY),
        max: Vec3::new(f32::INFINITY, f32::INFINITY, f32::INFINITY),
    };

    /// Create a box from its min/max corners.
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create a box centered on `center` extending `half_extents` along each axis.
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        let half = half_extents.abs();
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Smallest box containing every point. Empty if there are no points.
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        let mut out = Self::EMPTY;
        for p in points {
            out.include_point(p);
        }
        out
    }

    /// True if the box is inverted on any axis (contains no points).
    pub fn is_empty(&self) -> bool {
        self.max.cmplt(self.min).any()
    }

    /// Componentwise union of two boxes.
    #[must_use]
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Grow the box to contain `point`.
    pub fn include_point(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Reset to [`Aabb3::EMPTY`].
    pub fn reset(&mut self) {
        *self = Self::EMPTY;
    }

    /// Reset to [`Aabb3::INFINITE`].
    pub fn set_to_limit(&mut self) {
        *self = Self::INFINITE;
    }

    /// Whether the two boxes overlap. Bounds are inclusive: touching faces count.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.min.cmple(other.max).all() && self.max.cmpge(other.min).all()
    }

    /// Whether `other` lies entirely inside this box.
    pub fn contains(&self, other: &Self) -> bool {
        self.min.cmple(other.min).all() && self.max.cmpge(other.max).all()
    }

    /// The box moved by `delta`.
    #[must_use]
    pub fn translated(&self, delta: Vec3) -> Self {
        Self {
            min: self.min + delta,
            max: self.max + delta,
        }
    }

    /// Center point. Meaningless for empty boxes.
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Size along each axis, zero for empty boxes.
    pub fn extents(&self) -> Vec3 {
        (self.max - self.min).max(Vec3::ZERO)
    }

    /// Surface area, the size metric used by every cost comparison in this crate.
    ///
    /// Empty boxes have zero area.
    pub fn surface_area(&self) -> f32 {
        if self.is_empty() {
            return 0.0;
        }
        let d = self.max - self.min;
        2.0 * (d.x * d.y + d.y * d.z + d.z * d.x)
    }
}

/// A ray with its inverse direction and per-axis sign bits precomputed for slab tests.
///
/// The direction is normalized on construction, so hit parameters are distances.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ray {
    origin: Vec3,
    direction: Vec3,
    inv_direction: Vec3,
    sign: [usize; 3],
    max_distance: f32,
}

impl Ray {
    /// Create an unbounded ray. `direction` must be non-zero.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        debug_assert!(direction != Vec3::ZERO, "ray direction must be non-zero");
        let direction = direction.normalize_or_zero();
        let inv_direction = direction.recip();
        let sign = [
            usize::from(inv_direction.x < 0.0),
            usize::from(inv_direction.y < 0.0),
            usize::from(inv_direction.z < 0.0),
        ];
        Self {
            origin,
            direction,
            inv_direction,
            sign,
            max_distance: f32::INFINITY,
        }
    }

    /// Limit hits to `t <= max_distance`.
    #[must_use]
    pub fn with_max_distance(mut self, max_distance: f32) -> Self {
        self.max_distance = max_distance;
        self
    }

    /// Ray origin.
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Unit direction.
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Largest accepted hit distance.
    pub fn max_distance(&self) -> f32 {
        self.max_distance
    }

    /// Point at distance `t` along the ray.
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Slab test against `bbox`.
    ///
    /// Returns the entry distance, clamped to zero when the origin is inside the box.
    /// Near and far planes are picked by the sign bits rather than by comparing.
    pub fn intersect_aabb(&self, bbox: &Aabb3) -> Option<f32> {
        let bounds = [bbox.min, bbox.max];
        let mut t_enter = 0.0_f32;
        let mut t_exit = self.max_distance;
        for axis in 0..3 {
            let near = bounds[self.sign[axis]][axis];
            let far = bounds[1 - self.sign[axis]][axis];
            let inv = self.inv_direction[axis];
            let o = self.origin[axis];
            // `f32::max`/`min` drop the NaN produced by 0 * inf on a slab plane.
            t_enter = t_enter.max((near - o) * inv);
            t_exit = t_exit.min((far - o) * inv);
        }
        (t_enter <= t_exit).then_some(t_enter)
    }
}

bitflags::bitflags! {
    /// Which node kinds [`DynamicTree::all_boxes`](crate::DynamicTree::all_boxes) reports.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct NodeFilter: u8 {
        /// Leaf boxes (one per entity).
        const LEAVES   = 0b0000_0001;
        /// Internal boxes (unions of subtrees).
        const INTERNAL = 0b0000_0010;
    }
}

impl Default for NodeFilter {
    fn default() -> Self {
        Self::all()
    }
}
