// Copyright 2025 the Cellmap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dense array backend: fixed shape, row-major addressing, validity bitmap.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt::Debug;

use crate::backend::{Backend, StoreError};
use crate::index::{CellIndex, Scalar};
use crate::record::{DuplicatePolicy, Record};

/// Dense array backend over a contiguous slot buffer.
///
/// Addressing is row-major over offset-adjusted coordinates:
/// `slot = sum_i (coord[i] - offset[i]) * prod_{j>i} extent[j]`. An index is
/// invalid when any dimension's adjusted coordinate falls outside
/// `[0, extent)`; [`Backend::insert`] reports that as
/// [`StoreError::OutOfRange`] carrying the first offending dimension, while
/// lookups just report absence.
///
/// Shape must be configured before first use via [`DenseGrid::set_extent`]
/// (and optionally [`DenseGrid::set_offset`]); both are rejected with
/// [`StoreError::InvalidReconfiguration`] while any record is active, because
/// changing shape invalidates the address mapping for existing entries.
/// A grid with no extent configured rejects every insert.
///
/// [`Backend::traverse`] visits slots in ascending slot order, i.e. row-major
/// coordinate order.
pub struct DenseGrid<K: CellIndex, R> {
    policy: DuplicatePolicy,
    extent: Vec<usize>,
    // strides[i] = product of extent[j] for j > i; slot arithmetic only.
    strides: Vec<usize>,
    offset: K,
    slots: Vec<Option<R>>,
    valid: Bitmap,
    len: usize,
}

impl<K: CellIndex, R> DenseGrid<K, R> {
    /// Create an empty, unshaped grid with the [`DuplicatePolicy::Replace`]
    /// policy.
    pub fn new() -> Self {
        Self::with_policy(DuplicatePolicy::Replace)
    }

    /// Create an empty, unshaped grid with the given duplicate policy.
    pub fn with_policy(policy: DuplicatePolicy) -> Self {
        Self {
            policy,
            extent: Vec::new(),
            strides: Vec::new(),
            offset: K::from_coords(|_| K::Scalar::zero()),
            slots: Vec::new(),
            valid: Bitmap::with_len(0),
            len: 0,
        }
    }

    /// The configured duplicate policy.
    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    /// The per-dimension extent, empty until [`DenseGrid::set_extent`] is
    /// called.
    pub fn extent(&self) -> &[usize] {
        &self.extent
    }

    /// The per-dimension coordinate origin.
    pub fn offset(&self) -> K {
        self.offset
    }

    /// Total number of addressable slots under the current extent.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Set the per-dimension extent, reallocating the slot buffer.
    ///
    /// Fails with [`StoreError::InvalidReconfiguration`] when the grid is
    /// non-empty or when `extent.len()` differs from `K::DIMS`.
    ///
    /// # Panics
    ///
    /// Panics when the extent product overflows `usize` (resource
    /// exhaustion, not recoverable locally).
    pub fn set_extent(&mut self, extent: &[usize]) -> Result<(), StoreError> {
        if extent.len() != K::DIMS || self.valid.any() {
            return Err(StoreError::InvalidReconfiguration);
        }

        let total = extent
            .iter()
            .try_fold(1_usize, |acc, &e| acc.checked_mul(e))
            .expect("extent product overflows usize");

        self.extent.clear();
        self.extent.extend_from_slice(extent);
        self.strides.clear();
        self.strides.resize(K::DIMS, 1);
        for i in (0..K::DIMS.saturating_sub(1)).rev() {
            self.strides[i] = self.strides[i + 1] * extent[i + 1];
        }

        self.slots.clear();
        self.slots.resize_with(total, || None);
        self.valid = Bitmap::with_len(total);
        self.len = 0;
        Ok(())
    }

    /// Set the per-dimension coordinate origin.
    ///
    /// Fails with [`StoreError::InvalidReconfiguration`] unless the grid is
    /// empty.
    pub fn set_offset(&mut self, offset: K) -> Result<(), StoreError> {
        if self.valid.any() {
            return Err(StoreError::InvalidReconfiguration);
        }
        self.offset = offset;
        Ok(())
    }

    fn slot_of(&self, index: K) -> Result<usize, StoreError> {
        if self.extent.len() != K::DIMS {
            // Unshaped grid: no coordinate can be in range.
            return Err(StoreError::OutOfRange { dim: 0 });
        }
        let mut slot = 0_usize;
        for dim in 0..K::DIMS {
            let cell =
                K::Scalar::cell_offset(index.coord(dim), self.offset.coord(dim), self.extent[dim])
                    .ok_or(StoreError::OutOfRange { dim })?;
            slot = slot * self.extent[dim] + cell;
        }
        Ok(slot)
    }
}

fn key_at<K: CellIndex>(slot: usize, strides: &[usize], extent: &[usize], offset: &K) -> K {
    K::from_coords(|dim| {
        K::Scalar::coord_at((slot / strides[dim]) % extent[dim], offset.coord(dim))
    })
}

impl<K: CellIndex, R> Default for DenseGrid<K, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: CellIndex, R> Backend<K, R> for DenseGrid<K, R> {
    fn insert<A>(&mut self, index: K, args: A) -> Result<&mut R, StoreError>
    where
        R: Record<A>,
    {
        let slot = self.slot_of(index)?;
        let cell = &mut self.slots[slot];
        match cell {
            Some(record) => {
                record.merge(self.policy, args);
                Ok(record)
            }
            None => {
                self.valid.set(slot);
                self.len += 1;
                Ok(cell.insert(R::create(args)))
            }
        }
    }

    fn get(&self, index: K) -> Option<&R> {
        self.slots[self.slot_of(index).ok()?].as_ref()
    }

    fn get_mut(&mut self, index: K) -> Option<&mut R> {
        let slot = self.slot_of(index).ok()?;
        self.slots[slot].as_mut()
    }

    fn traverse<F: FnMut(&K, &R)>(&self, mut visit: F) {
        for slot in self.valid.ones() {
            let key = key_at(slot, &self.strides, &self.extent, &self.offset);
            if let Some(record) = self.slots[slot].as_ref() {
                visit(&key, record);
            }
        }
    }

    fn traverse_mut<F: FnMut(&K, &mut R)>(&mut self, mut visit: F) {
        for slot in self.valid.ones() {
            let key = key_at(slot, &self.strides, &self.extent, &self.offset);
            if let Some(record) = self.slots[slot].as_mut() {
                visit(&key, record);
            }
        }
    }

    fn len(&self) -> usize {
        self.len
    }

    fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
        self.valid.clear_all();
        self.len = 0;
    }
}

impl<K: CellIndex, R> Debug for DenseGrid<K, R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DenseGrid")
            .field("policy", &self.policy)
            .field("extent", &self.extent)
            .field("offset", &self.offset)
            .field("capacity", &self.slots.len())
            .field("active", &self.len)
            .finish_non_exhaustive()
    }
}

/// Per-slot validity bits.
///
/// Mirrors `Option` occupancy in the slot buffer so traversal can skip 64
/// empty slots per word and the reshape guard does not scan records.
struct Bitmap {
    words: Vec<u64>,
}

impl Bitmap {
    fn with_len(bits: usize) -> Self {
        Self {
            words: vec![0; bits.div_ceil(64)],
        }
    }

    fn set(&mut self, bit: usize) {
        self.words[bit / 64] |= 1 << (bit % 64);
    }

    fn any(&self) -> bool {
        self.words.iter().any(|&w| w != 0)
    }

    fn clear_all(&mut self) {
        for word in &mut self.words {
            *word = 0;
        }
    }

    /// Indices of set bits in ascending order.
    fn ones(&self) -> Ones<'_> {
        Ones {
            rest: &self.words,
            word: 0,
            base: 0,
        }
    }
}

struct Ones<'a> {
    rest: &'a [u64],
    word: u64,
    // Bit index of the current word's bit 0, already advanced past `word`'s
    // source word in `rest`.
    base: usize,
}

impl Iterator for Ones<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        while self.word == 0 {
            let (&next, rest) = self.rest.split_first()?;
            self.rest = rest;
            self.word = next;
            self.base += 64;
        }
        let bit = self.word.trailing_zeros() as usize;
        self.word &= self.word - 1;
        Some(self.base - 64 + bit)
    }
}
