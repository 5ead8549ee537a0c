// Copyright 2025 the Cellmap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hash map backend: direct addressing, no bounds, the correctness baseline.

use core::fmt::Debug;
use core::hash::Hash;

use hashbrown::HashMap;
use hashbrown::hash_map::Entry;

use crate::backend::{Backend, StoreError};
use crate::index::CellIndex;
use crate::record::{DuplicatePolicy, Record};

/// Hash table backend keyed by index equality/hash.
///
/// No bounds and no reshaping concerns; the natural choice when the index
/// domain is sparse and unbounded, and the reference implementation the
/// other backends are tested against. `insert` never fails.
///
/// [`Backend::traverse`] follows table iteration order, which is unspecified
/// and not stable across mutations.
pub struct HashStore<K: CellIndex + Hash, R> {
    policy: DuplicatePolicy,
    map: HashMap<K, R>,
}

impl<K: CellIndex + Hash, R> HashStore<K, R> {
    /// Create an empty store with the [`DuplicatePolicy::Replace`] policy.
    pub fn new() -> Self {
        Self::with_policy(DuplicatePolicy::Replace)
    }

    /// Create an empty store with the given duplicate policy.
    pub fn with_policy(policy: DuplicatePolicy) -> Self {
        Self {
            policy,
            map: HashMap::new(),
        }
    }

    /// Create an empty store preallocated for `capacity` records.
    pub fn with_capacity(policy: DuplicatePolicy, capacity: usize) -> Self {
        Self {
            policy,
            map: HashMap::with_capacity(capacity),
        }
    }

    /// The configured duplicate policy.
    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }
}

impl<K: CellIndex + Hash, R> Default for HashStore<K, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: CellIndex + Hash, R> Backend<K, R> for HashStore<K, R> {
    fn insert<A>(&mut self, index: K, args: A) -> Result<&mut R, StoreError>
    where
        R: Record<A>,
    {
        match self.map.entry(index) {
            Entry::Occupied(slot) => {
                let record = slot.into_mut();
                record.merge(self.policy, args);
                Ok(record)
            }
            Entry::Vacant(slot) => Ok(slot.insert(R::create(args))),
        }
    }

    fn get(&self, index: K) -> Option<&R> {
        self.map.get(&index)
    }

    fn get_mut(&mut self, index: K) -> Option<&mut R> {
        self.map.get_mut(&index)
    }

    fn traverse<F: FnMut(&K, &R)>(&self, mut visit: F) {
        for (index, record) in &self.map {
            visit(index, record);
        }
    }

    fn traverse_mut<F: FnMut(&K, &mut R)>(&mut self, mut visit: F) {
        for (index, record) in &mut self.map {
            visit(index, record);
        }
    }

    fn len(&self) -> usize {
        self.map.len()
    }

    fn clear(&mut self) {
        self.map.clear();
    }
}

impl<K: CellIndex + Hash, R> Debug for HashStore<K, R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HashStore")
            .field("policy", &self.policy)
            .field("len", &self.map.len())
            .finish_non_exhaustive()
    }
}
