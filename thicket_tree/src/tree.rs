// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The dynamic tree: insertion, removal, rebalancing and introspection.

use core::fmt::Debug;
use core::hash::Hash;
use std::collections::HashMap;
use std::collections::hash_map::Entry;

use glam::Vec3;
use tracing::{debug, trace, warn};

use crate::arena::{Kind, Node, NodeArena, NodeId};
use crate::config::TreeConfig;
use crate::error::TreeError;
use crate::types::{Aabb3, Entity, NodeFilter};

/// A dynamic bounding volume hierarchy keyed by entity.
///
/// Leaves hold one entity's box each; internal nodes hold the union of their two
/// children. Insertion picks the sibling with the cheapest surface-area cost and
/// rebalances on the way back up, and so does removal.
pub struct DynamicTree<E = Entity> {
    pub(crate) arena: NodeArena<E>,
    pub(crate) root: Option<NodeId>,
    leaves: HashMap<E, NodeId>,
    config: TreeConfig,
}

impl<E> Debug for DynamicTree<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DynamicTree")
            .field("entities", &self.leaves.len())
            .field("nodes", &self.arena.count())
            .field("capacity", &self.arena.capacity())
            .field("height", &self.root.map(|r| self.arena[r].height))
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<E: Copy + Eq + Hash + Debug> Default for DynamicTree<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Copy + Eq + Hash + Debug> DynamicTree<E> {
    /// Create an empty tree with the default configuration.
    pub fn new() -> Self {
        Self::with_config(TreeConfig::default())
    }

    /// Create an empty tree.
    pub fn with_config(config: TreeConfig) -> Self {
        Self {
            arena: NodeArena::with_capacity(config.initial_capacity),
            root: None,
            leaves: HashMap::with_capacity(config.initial_capacity.div_ceil(2)),
            config,
        }
    }

    /// The configuration the tree was created with.
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Number of entities.
    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    /// True if the tree holds no entities.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Live nodes, leaves and internal.
    pub fn node_count(&self) -> usize {
        self.arena.count()
    }

    /// Node slots available before the arena grows again.
    pub fn capacity(&self) -> usize {
        self.arena.capacity()
    }

    /// Height of the root, 0 for an empty or single-entity tree.
    pub fn height(&self) -> u32 {
        self.root.map_or(0, |r| self.arena[r].height)
    }

    /// Box covering every entity, or `None` if the tree is empty.
    pub fn root_box(&self) -> Option<Aabb3> {
        self.root.map(|r| self.arena[r].bbox)
    }

    /// Whether `entity` is in the tree.
    pub fn contains(&self, entity: E) -> bool {
        self.leaves.contains_key(&entity)
    }

    /// Entities in the tree, in no particular order.
    pub fn entities(&self) -> impl Iterator<Item = E> + '_ {
        self.leaves.keys().copied()
    }

    /// Grow the node arena to at least `capacity` slots.
    ///
    /// Requests below the current capacity fail with [`TreeError::InvalidCapacity`].
    pub fn reserve(&mut self, capacity: usize) -> Result<(), TreeError> {
        self.arena.reserve(capacity)
    }

    /// Remove every entity. The arena keeps its capacity.
    pub fn clear(&mut self) {
        debug!(entities = self.leaves.len(), "clearing tree");
        self.arena.clear();
        self.leaves.clear();
        self.root = None;
    }

    /// Insert `entity` with its world-space box.
    pub fn insert(&mut self, entity: E, bbox: Aabb3) -> Result<(), TreeError> {
        let Entry::Vacant(slot) = self.leaves.entry(entity) else {
            return Err(TreeError::duplicate(&entity));
        };
        let leaf = self.arena.allocate(Node::leaf(entity, bbox));
        slot.insert(leaf);
        self.insert_leaf(leaf);
        trace!(?entity, "inserted");
        self.check_after_mutation();
        Ok(())
    }

    /// Remove `entity` and return the box it had.
    pub fn remove(&mut self, entity: E) -> Result<Aabb3, TreeError> {
        let leaf = self
            .leaves
            .remove(&entity)
            .ok_or_else(|| TreeError::unknown(&entity))?;
        self.remove_leaf(leaf);
        let node = self.arena.free(leaf);
        trace!(?entity, "removed");
        self.check_after_mutation();
        Ok(node.bbox)
    }

    /// Replace `entity`'s box. Always re-inserts the leaf.
    pub fn update(&mut self, entity: E, bbox: Aabb3) -> Result<(), TreeError> {
        let leaf = *self
            .leaves
            .get(&entity)
            .ok_or_else(|| TreeError::unknown(&entity))?;
        self.remove_leaf(leaf);
        self.arena[leaf].bbox = bbox;
        self.insert_leaf(leaf);
        self.check_after_mutation();
        Ok(())
    }

    /// Move `entity`'s box by `delta`.
    pub fn translate(&mut self, entity: E, delta: Vec3) -> Result<(), TreeError> {
        let bbox = self.bounding_box(entity)?;
        self.update(entity, bbox.translated(delta))
    }

    /// The box stored for `entity`.
    pub fn bounding_box(&self, entity: E) -> Result<Aabb3, TreeError> {
        self.leaves
            .get(&entity)
            .map(|&leaf| self.arena[leaf].bbox)
            .ok_or_else(|| TreeError::unknown(&entity))
    }

    /// Boxes of every live node matching `filter`, for debug drawing.
    pub fn all_boxes(&self, filter: NodeFilter) -> Vec<Aabb3> {
        self.arena
            .iter()
            .filter(|(_, node)| {
                if node.is_leaf() {
                    filter.contains(NodeFilter::LEAVES)
                } else {
                    filter.contains(NodeFilter::INTERNAL)
                }
            })
            .map(|(_, node)| node.bbox)
            .collect()
    }

    fn insert_leaf(&mut self, leaf: NodeId) {
        let Some(root) = self.root else {
            self.arena[leaf].parent = None;
            self.root = Some(leaf);
            return;
        };

        let leaf_box = self.arena[leaf].bbox;
        let sibling = self.pick_sibling(root, &leaf_box);
        let old_parent = self.arena[sibling].parent;
        let (sibling_box, sibling_height) = {
            let s = &self.arena[sibling];
            (s.bbox, s.height)
        };

        let parent = self.arena.allocate(Node {
            bbox: leaf_box.merge(&sibling_box),
            height: sibling_height + 1,
            parent: old_parent,
            kind: Kind::Internal {
                left: sibling,
                right: leaf,
            },
        });
        self.arena[sibling].parent = Some(parent);
        self.arena[leaf].parent = Some(parent);
        match old_parent {
            Some(p) => self.replace_child(p, sibling, parent),
            None => self.root = Some(parent),
        }

        self.refit_upwards(Some(parent));
    }

    /// Greedy descent for the cheapest sibling of a box being inserted.
    ///
    /// At each internal node, pairing here costs `2 * SA(node ∪ leaf)`; going lower costs
    /// the child's own growth plus `2 * (SA(node ∪ leaf) - SA(node))` inherited by every
    /// ancestor. Stop when pairing here is cheaper than both children.
    fn pick_sibling(&self, root: NodeId, leaf_box: &Aabb3) -> NodeId {
        let mut index = root;
        loop {
            let node = &self.arena[index];
            let Kind::Internal { left, right } = node.kind else {
                return index;
            };
            let area = node.bbox.surface_area();
            let combined_area = node.bbox.merge(leaf_box).surface_area();

            let direct = 2.0 * combined_area;
            let inherited = 2.0 * (combined_area - area);
            let cost_left = self.descent_cost(left, leaf_box) + inherited;
            let cost_right = self.descent_cost(right, leaf_box) + inherited;

            if direct < cost_left && direct < cost_right {
                return index;
            }
            index = if cost_left < cost_right { left } else { right };
        }
    }

    fn descent_cost(&self, child: NodeId, leaf_box: &Aabb3) -> f32 {
        let node = &self.arena[child];
        let merged = node.bbox.merge(leaf_box).surface_area();
        if node.is_leaf() {
            merged
        } else {
            merged - node.bbox.surface_area()
        }
    }

    /// Detach a leaf, splicing its sibling into the parent's place. The leaf slot stays allocated.
    fn remove_leaf(&mut self, leaf: NodeId) {
        if self.root == Some(leaf) {
            self.root = None;
            return;
        }

        let parent = self.arena[leaf]
            .parent
            .expect("a non-root leaf has a parent");
        let sibling = match self.arena[parent].kind {
            Kind::Internal { left, right } if left == leaf => right,
            Kind::Internal { left, .. } => left,
            Kind::Leaf(_) => unreachable!("a parent is always internal"),
        };
        let grand_parent = self.arena[parent].parent;

        self.arena[sibling].parent = grand_parent;
        match grand_parent {
            Some(g) => self.replace_child(g, parent, sibling),
            None => self.root = Some(sibling),
        }
        let _ = self.arena.free(parent);

        self.refit_upwards(grand_parent);
    }

    /// Rebalance and refit every node from `cursor` to the root.
    fn refit_upwards(&mut self, mut cursor: Option<NodeId>) {
        while let Some(index) = cursor {
            let index = self.balance(index);
            self.refit(index);
            cursor = self.arena[index].parent;
        }
    }

    /// Recompute an internal node's box and height from its children.
    fn refit(&mut self, index: NodeId) {
        let Some((left, right)) = self.children(index) else {
            return;
        };
        let (l, r) = (&self.arena[left], &self.arena[right]);
        let bbox = l.bbox.merge(&r.bbox);
        let height = 1 + l.height.max(r.height);
        let node = &mut self.arena[index];
        node.bbox = bbox;
        node.height = height;
    }

    /// Restore `|height(left) - height(right)| <= 1` at `a`, assuming both
    /// subtrees already satisfy it.
    ///
    /// Returns the node now occupying `a`'s position.
    fn balance(&mut self, a: NodeId) -> NodeId {
        let Some((b, c)) = self.children(a) else {
            return a;
        };
        let balance = i64::from(self.arena[c].height) - i64::from(self.arena[b].height);
        if balance > 1 {
            self.rotate_up(a, c)
        } else if balance < -1 {
            self.rotate_up(a, b)
        } else {
            a
        }
    }

    /// Lift `child` into `a`'s place. `child` keeps its taller child and hands the
    /// shorter one to `a`, which covers both the single and the double rotation.
    ///
    /// When the sibling search stopped high in the tree the height gap can
    /// exceed two, leaving `a` lopsided after the hand-off, so `a` is balanced
    /// again before `child` is refit.
    fn rotate_up(&mut self, a: NodeId, child: NodeId) -> NodeId {
        let (f, g) = self
            .children(child)
            .expect("a child two levels taller than its sibling is internal");
        let (keep, give) = if self.arena[f].height > self.arena[g].height {
            (f, g)
        } else {
            (g, f)
        };

        let grand_parent = self.arena[a].parent;
        self.arena[child].parent = grand_parent;
        match grand_parent {
            Some(p) => self.replace_child(p, a, child),
            None => self.root = Some(child),
        }

        self.arena[child].kind = Kind::Internal {
            left: a,
            right: keep,
        };
        self.arena[a].parent = Some(child);
        self.replace_child(a, child, give);
        self.arena[give].parent = Some(a);

        self.refit(a);
        trace!(from = a.get(), to = child.get(), "rotated");
        self.balance(a);
        self.refit(child);
        child
    }

    fn replace_child(&mut self, parent: NodeId, old: NodeId, new: NodeId) {
        if let Kind::Internal { left, right } = &mut self.arena[parent].kind {
            if *left == old {
                *left = new;
            } else {
                debug_assert_eq!(*right, old, "replaced node must be a child of its parent");
                *right = new;
            }
        }
    }

    pub(crate) fn children(&self, index: NodeId) -> Option<(NodeId, NodeId)> {
        match self.arena[index].kind {
            Kind::Internal { left, right } => Some((left, right)),
            Kind::Leaf(_) => None,
        }
    }

    fn check_after_mutation(&self) {
        if cfg!(debug_assertions) && self.config.validate_on_mutation {
            let result = self.validate();
            if let Err(err) = &result {
                warn!(%err, "tree invariant broken after mutation");
            }
            debug_assert!(result.is_ok(), "{result:?}");
        }
    }

    /// Walk the whole tree and check every structural invariant.
    ///
    /// Checks parent/child links, that internal boxes are exactly the union of
    /// their children, heights, the balance bound, and that the entity map and
    /// node count agree with what is reachable from the root.
    pub fn validate(&self) -> Result<(), TreeError> {
        let corrupt = |msg: String| -> Result<(), TreeError> { Err(TreeError::Corrupt(msg)) };

        let Some(root) = self.root else {
            if self.arena.count() != 0 || !self.leaves.is_empty() {
                return corrupt(format!(
                    "empty tree still holds {} nodes and {} entities",
                    self.arena.count(),
                    self.leaves.len()
                ));
            }
            return Ok(());
        };
        if self.arena[root].parent.is_some() {
            return corrupt("root has a parent".into());
        }

        let mut reached = 0_usize;
        let mut leaves = 0_usize;
        let mut stack = vec![root];
        while let Some(index) = stack.pop() {
            reached += 1;
            let node = &self.arena[index];
            match node.kind {
                Kind::Leaf(entity) => {
                    leaves += 1;
                    if node.height != 0 {
                        return corrupt(format!("leaf {} has height {}", index.get(), node.height));
                    }
                    if self.leaves.get(&entity) != Some(&index) {
                        return corrupt(format!("leaf {} not mapped from {entity:?}", index.get()));
                    }
                }
                Kind::Internal { left, right } => {
                    let (l, r) = (&self.arena[left], &self.arena[right]);
                    if l.parent != Some(index) || r.parent != Some(index) {
                        return corrupt(format!("children of {} do not point back", index.get()));
                    }
                    if node.bbox != l.bbox.merge(&r.bbox) {
                        return corrupt(format!("box of {} is not its children's union", index.get()));
                    }
                    if node.height != 1 + l.height.max(r.height) {
                        return corrupt(format!("height of {} is stale", index.get()));
                    }
                    if l.height.abs_diff(r.height) > 1 {
                        return corrupt(format!(
                            "node {} unbalanced: {} vs {}",
                            index.get(),
                            l.height,
                            r.height
                        ));
                    }
                    stack.push(left);
                    stack.push(right);
                }
            }
        }

        if reached != self.arena.count() {
            return corrupt(format!(
                "{reached} nodes reachable but {} allocated",
                self.arena.count()
            ));
        }
        if leaves != self.leaves.len() {
            return corrupt(format!(
                "{leaves} leaves reachable but {} entities mapped",
                self.leaves.len()
            ));
        }
        Ok(())
    }
}
