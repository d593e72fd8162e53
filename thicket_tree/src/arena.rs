// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Index-addressed node storage with a free list.

use core::ops::{Index, IndexMut};

use tracing::debug;

use crate::error::TreeError;
use crate::types::Aabb3;

/// Index of a node slot in the arena.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(u32);

impl NodeId {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Node ids are intentionally 32-bit; the arena never holds 2^32 nodes."
    )]
    const fn new(idx: usize) -> Self {
        Self(idx as u32)
    }

    pub(crate) const fn get(self) -> usize {
        self.0 as usize
    }
}

#[derive(Copy, Clone, Debug)]
pub(crate) enum Kind<E> {
    Leaf(E),
    Internal { left: NodeId, right: NodeId },
}

#[derive(Clone, Debug)]
pub(crate) struct Node<E> {
    pub(crate) bbox: Aabb3,
    /// 0 for leaves, `1 + max(children)` otherwise.
    pub(crate) height: u32,
    pub(crate) parent: Option<NodeId>,
    pub(crate) kind: Kind<E>,
}

impl<E> Node<E> {
    pub(crate) const fn leaf(entity: E, bbox: Aabb3) -> Self {
        Self {
            bbox,
            height: 0,
            parent: None,
            kind: Kind::Leaf(entity),
        }
    }

    pub(crate) const fn is_leaf(&self) -> bool {
        matches!(self.kind, Kind::Leaf(_))
    }
}

/// Contiguous node slots. Vacant slots are `None` and their ids sit on the free list.
#[derive(Clone, Debug)]
pub(crate) struct NodeArena<E> {
    slots: Vec<Option<Node<E>>>,
    free_list: Vec<NodeId>,
    capacity: usize,
    count: usize,
}

impl<E> NodeArena<E> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            slots: Vec::with_capacity(capacity),
            free_list: Vec::new(),
            capacity,
            count: 0,
        }
    }

    /// Live node count.
    pub(crate) const fn count(&self) -> usize {
        self.count
    }

    pub(crate) const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Store `node` in a reclaimed slot if one exists, else in a fresh one.
    pub(crate) fn allocate(&mut self, node: Node<E>) -> NodeId {
        let id = if let Some(id) = self.free_list.pop() {
            debug_assert!(self.slots[id.get()].is_none(), "free list holds a live slot");
            self.slots[id.get()] = Some(node);
            id
        } else {
            if self.count == self.capacity {
                self.grow(self.capacity * 2);
            }
            self.slots.push(Some(node));
            NodeId::new(self.slots.len() - 1)
        };
        self.count += 1;
        id
    }

    /// Vacate a slot and return what it held.
    pub(crate) fn free(&mut self, id: NodeId) -> Node<E> {
        let node = self.slots[id.get()]
            .take()
            .expect("freed node id must refer to a live slot");
        self.free_list.push(id);
        self.count -= 1;
        node
    }

    /// Raise capacity to `capacity` slots. Shrinking is rejected.
    pub(crate) fn reserve(&mut self, capacity: usize) -> Result<(), TreeError> {
        if capacity < self.capacity {
            return Err(TreeError::InvalidCapacity {
                requested: capacity,
                current: self.capacity,
            });
        }
        self.grow(capacity);
        Ok(())
    }

    fn grow(&mut self, capacity: usize) {
        if capacity == self.capacity {
            return;
        }
        debug!(old = self.capacity, new = capacity, "growing node arena");
        self.slots.reserve_exact(capacity - self.slots.len());
        self.capacity = capacity;
    }

    /// Drop every node. Capacity is kept.
    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free_list.clear();
        self.count = 0;
    }

    /// Live nodes, in slot order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (NodeId, &Node<E>)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|n| (NodeId::new(i), n)))
    }
}

impl<E> Index<NodeId> for NodeArena<E> {
    type Output = Node<E>;

    fn index(&self, id: NodeId) -> &Node<E> {
        self.slots[id.get()]
            .as_ref()
            .expect("node id must refer to a live slot")
    }
}

impl<E> IndexMut<NodeId> for NodeArena<E> {
    fn index_mut(&mut self, id: NodeId) -> &mut Node<E> {
        self.slots[id.get()]
            .as_mut()
            .expect("node id must refer to a live slot")
    }
}
