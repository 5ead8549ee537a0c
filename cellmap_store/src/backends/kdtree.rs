// Copyright 2025 the Cellmap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adaptive kd-tree backend: no fixed bounds, lazy splits, one record per
//! leaf.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::mem;

use crate::backend::{Backend, StoreError};
use crate::index::{CellIndex, Scalar};
use crate::record::{DuplicatePolicy, Record};

/// Adaptive binary space-partitioning backend.
///
/// Every leaf holds exactly one `(index, record)` pair; every internal node
/// holds a routing rule `coord[dim] < split -> left, else right`. A leaf
/// splits only when a second distinct index collides with it: the split
/// dimension is the one with the largest absolute coordinate delta between
/// the two indices (lowest dimension wins ties), and the split value is the
/// ceiling midpoint along that dimension.
///
/// The tree is never rebalanced. Adversarial insertion orders, such as
/// coordinates increasing monotonically along one axis, produce linear-depth
/// trees and degrade insert/lookup to O(n). That is an accepted property of
/// the structure, traded for cheap inserts and no bookkeeping.
///
/// Nodes live in an arena addressed by index, so neither [`Backend::clear`]
/// nor drop recurses over the tree; adversarial depth cannot overflow the
/// stack. Splits push into the arena, which may reallocate, so any record
/// reference obtained earlier is invalidated by an insert even for an
/// unrelated index.
pub struct KdTree<K: CellIndex, R> {
    policy: DuplicatePolicy,
    arena: Vec<Node<K, R>>,
    root: Option<NodeIdx>,
    len: usize,
}

enum Node<K: CellIndex, R> {
    Leaf {
        index: K,
        record: R,
    },
    Internal {
        dim: usize,
        split: K::Scalar,
        left: NodeIdx,
        right: NodeIdx,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct NodeIdx(usize);

impl NodeIdx {
    const fn new(i: usize) -> Self {
        Self(i)
    }

    const fn get(self) -> usize {
        self.0
    }
}

impl<K: CellIndex, R> KdTree<K, R> {
    /// Create an empty tree with the [`DuplicatePolicy::Replace`] policy.
    pub fn new() -> Self {
        Self::with_policy(DuplicatePolicy::Replace)
    }

    /// Create an empty tree with the given duplicate policy.
    pub fn with_policy(policy: DuplicatePolicy) -> Self {
        Self {
            policy,
            arena: Vec::new(),
            root: None,
            len: 0,
        }
    }

    /// The configured duplicate policy.
    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    /// Descend from the root to the leaf whose region contains `index`.
    /// Must not be called on an empty tree.
    fn leaf_for(&self, index: K) -> NodeIdx {
        let mut cur = self.root.expect("descend into an empty tree");
        loop {
            match &self.arena[cur.get()] {
                Node::Internal {
                    dim, split, left, right,
                } => {
                    cur = if index.coord(*dim) < *split { *left } else { *right };
                }
                Node::Leaf { .. } => return cur,
            }
        }
    }

    /// Split dimension and value separating two distinct indices.
    ///
    /// Dimensions are scanned in ascending order and only a strictly larger
    /// delta replaces the choice, so the lowest dimension index wins ties.
    fn split_plane(a: K, b: K) -> (usize, K::Scalar) {
        let mut dim = 0;
        let mut best = K::Scalar::zero();
        for d in 0..K::DIMS {
            let delta = K::Scalar::abs_delta(a.coord(d), b.coord(d));
            if delta > best {
                best = delta;
                dim = d;
            }
        }
        (dim, K::Scalar::split_mid(a.coord(dim), b.coord(dim)))
    }
}

impl<K: CellIndex, R> Default for KdTree<K, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: CellIndex, R> Backend<K, R> for KdTree<K, R> {
    fn insert<A>(&mut self, index: K, args: A) -> Result<&mut R, StoreError>
    where
        R: Record<A>,
    {
        if self.root.is_none() {
            // First writer wins unconditionally; there is nothing to merge
            // against.
            let idx = NodeIdx::new(self.arena.len());
            self.arena.push(Node::Leaf {
                index,
                record: R::create(args),
            });
            self.root = Some(idx);
            self.len = 1;
            let Node::Leaf { record, .. } = &mut self.arena[idx.get()] else {
                unreachable!("node just pushed is a leaf");
            };
            return Ok(record);
        }

        let cur = self.leaf_for(index);
        let stored = match &self.arena[cur.get()] {
            Node::Leaf { index, .. } => *index,
            Node::Internal { .. } => unreachable!("descent must end at a leaf"),
        };

        if stored == index {
            let Node::Leaf { record, .. } = &mut self.arena[cur.get()] else {
                unreachable!("descent must end at a leaf");
            };
            record.merge(self.policy, args);
            return Ok(record);
        }

        // Distinct index reached an occupied leaf: split it in place. The
        // former leaf becomes an internal node, its record moves to the
        // child its index routes to, and the new record takes the sibling.
        let (dim, split) = Self::split_plane(stored, index);
        let left = NodeIdx::new(self.arena.len());
        let right = NodeIdx::new(self.arena.len() + 1);
        let old = mem::replace(
            &mut self.arena[cur.get()],
            Node::Internal {
                dim,
                split,
                left,
                right,
            },
        );
        let Node::Leaf {
            index: old_index,
            record: old_record,
        } = old
        else {
            unreachable!("split target must be a leaf");
        };

        let target = if old_index.coord(dim) < split {
            self.arena.push(Node::Leaf {
                index: old_index,
                record: old_record,
            });
            self.arena.push(Node::Leaf {
                index,
                record: R::create(args),
            });
            right
        } else {
            self.arena.push(Node::Leaf {
                index,
                record: R::create(args),
            });
            self.arena.push(Node::Leaf {
                index: old_index,
                record: old_record,
            });
            left
        };
        self.len += 1;

        let Node::Leaf { record, .. } = &mut self.arena[target.get()] else {
            unreachable!("node just pushed is a leaf");
        };
        Ok(record)
    }

    fn get(&self, index: K) -> Option<&R> {
        self.root?;
        match &self.arena[self.leaf_for(index).get()] {
            Node::Leaf {
                index: stored,
                record,
            } if *stored == index => Some(record),
            _ => None,
        }
    }

    fn get_mut(&mut self, index: K) -> Option<&mut R> {
        self.root?;
        let cur = self.leaf_for(index);
        match &mut self.arena[cur.get()] {
            Node::Leaf {
                index: stored,
                record,
            } if *stored == index => Some(record),
            _ => None,
        }
    }

    fn traverse<F: FnMut(&K, &R)>(&self, mut visit: F) {
        // In-order walk (left subtree before right) with an explicit stack.
        let mut stack: Vec<NodeIdx> = Vec::new();
        stack.extend(self.root);
        while let Some(cur) = stack.pop() {
            match &self.arena[cur.get()] {
                Node::Leaf { index, record } => visit(index, record),
                Node::Internal { left, right, .. } => {
                    stack.push(*right);
                    stack.push(*left);
                }
            }
        }
    }

    fn traverse_mut<F: FnMut(&K, &mut R)>(&mut self, mut visit: F) {
        let mut stack: Vec<NodeIdx> = Vec::new();
        stack.extend(self.root);
        while let Some(cur) = stack.pop() {
            match &mut self.arena[cur.get()] {
                Node::Leaf { index, record } => visit(index, record),
                Node::Internal { left, right, .. } => {
                    stack.push(*right);
                    stack.push(*left);
                }
            }
        }
    }

    fn len(&self) -> usize {
        self.len
    }

    fn clear(&mut self) {
        // Arena truncation; no recursive teardown at any depth.
        self.arena.clear();
        self.root = None;
        self.len = 0;
    }
}

impl<K: CellIndex, R> Debug for KdTree<K, R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("KdTree")
            .field("policy", &self.policy)
            .field("nodes", &self.arena.len())
            .field("len", &self.len)
            .finish_non_exhaustive()
    }
}
