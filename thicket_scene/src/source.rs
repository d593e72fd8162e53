// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Where world-space bounds come from.

use std::collections::{BTreeMap, HashMap};

use glam::{Affine3A, Mat3A, Vec3, Vec3A};
use thicket_tree::Aabb3;

/// Anything that can list every entity's current world-space box.
///
/// A source is expected to yield each entity at most once per call.
pub trait BoundsSource {
    /// Entity handle type.
    type Entity;

    /// Every entity paired with its world-space box.
    fn world_bounds(&self) -> impl Iterator<Item = (Self::Entity, Aabb3)> + '_;
}

impl<E: Copy> BoundsSource for [(E, Aabb3)] {
    type Entity = E;

    fn world_bounds(&self) -> impl Iterator<Item = (E, Aabb3)> + '_ {
        self.iter().copied()
    }
}

impl<E: Copy> BoundsSource for Vec<(E, Aabb3)> {
    type Entity = E;

    fn world_bounds(&self) -> impl Iterator<Item = (E, Aabb3)> + '_ {
        self.iter().copied()
    }
}

impl<E: Copy, S> BoundsSource for HashMap<E, Aabb3, S> {
    type Entity = E;

    fn world_bounds(&self) -> impl Iterator<Item = (E, Aabb3)> + '_ {
        self.iter().map(|(e, b)| (*e, *b))
    }
}

impl<E: Copy> BoundsSource for BTreeMap<E, Aabb3> {
    type Entity = E;

    fn world_bounds(&self) -> impl Iterator<Item = (E, Aabb3)> + '_ {
        self.iter().map(|(e, b)| (*e, *b))
    }
}

/// An entity with a local-space box and a transform placing it in the world.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Placed<E> {
    /// Entity handle.
    pub entity: E,
    /// Box in the entity's own coordinate frame.
    pub local: Aabb3,
    /// Local-to-world transform.
    pub transform: Affine3A,
}

impl<E> Placed<E> {
    /// World-space box of the transformed local box.
    pub fn world_bounds(&self) -> Aabb3 {
        transform_aabb(&self.local, &self.transform)
    }
}

impl<E: Copy> BoundsSource for [Placed<E>] {
    type Entity = E;

    fn world_bounds(&self) -> impl Iterator<Item = (E, Aabb3)> + '_ {
        self.iter().map(|p| (p.entity, p.world_bounds()))
    }
}

impl<E: Copy> BoundsSource for Vec<Placed<E>> {
    type Entity = E;

    fn world_bounds(&self) -> impl Iterator<Item = (E, Aabb3)> + '_ {
        self.as_slice().world_bounds()
    }
}

/// Smallest world-space box containing `local` after `transform`.
///
/// The center is transformed as a point and the half extents are pushed
/// through the absolute value of the linear part, which is exact for the
/// eight corners of the box.
pub fn transform_aabb(local: &Aabb3, transform: &Affine3A) -> Aabb3 {
    if local.is_empty() {
        return *local;
    }
    let center = transform.transform_point3(local.center());
    let half = Vec3A::from((local.max - local.min) * 0.5);
    let m = transform.matrix3;
    let abs = Mat3A::from_cols(m.x_axis.abs(), m.y_axis.abs(), m.z_axis.abs());
    Aabb3::from_center_half_extents(center, Vec3::from(abs * half))
}
