// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Triangle primitive.

use glam::Vec3;
use thicket_tree::{Aabb3, Ray};

/// Determinants and distances below this are treated as zero.
const EPSILON: f32 = 1e-7;

/// A triangle given by its three corners.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Triangle {
    /// First corner.
    pub a: Vec3,
    /// Second corner.
    pub b: Vec3,
    /// Third corner.
    pub c: Vec3,
}

impl Triangle {
    /// Create a triangle from its corners.
    pub const fn new(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self { a, b, c }
    }

    /// Tight bounding box.
    pub fn bounds(&self) -> Aabb3 {
        Aabb3::new(self.a.min(self.b).min(self.c), self.a.max(self.b).max(self.c))
    }

    /// Mean of the corners.
    pub fn centroid(&self) -> Vec3 {
        (self.a + self.b + self.c) / 3.0
    }

    /// Unnormalized face normal, following the `a -> b -> c` winding.
    pub fn normal(&self) -> Vec3 {
        (self.b - self.a).cross(self.c - self.a)
    }

    /// Möller–Trumbore ray test, hitting both faces.
    ///
    /// Returns `(t, u, v)` where `t` is the distance along the ray and `u`, `v`
    /// are the barycentric weights of `b` and `c`. Hits at the origin or past
    /// [`Ray::max_distance`] are rejected, as are rays parallel to the plane.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<(f32, f32, f32)> {
        let edge1 = self.b - self.a;
        let edge2 = self.c - self.a;
        let h = ray.direction().cross(edge2);
        let det = edge1.dot(h);
        if det.abs() < EPSILON {
            return None;
        }
        let inv_det = det.recip();

        let s = ray.origin() - self.a;
        let u = inv_det * s.dot(h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }
        let q = s.cross(edge1);
        let v = inv_det * ray.direction().dot(q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }
        let t = inv_det * edge2.dot(q);
        (t > EPSILON && t <= ray.max_distance()).then_some((t, u, v))
    }
}
