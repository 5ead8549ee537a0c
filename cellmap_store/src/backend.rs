// Copyright 2025 the Cellmap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared backend contract and error type.

use core::fmt;

use crate::index::CellIndex;
use crate::record::Record;

/// Errors a backend can report from a structural operation.
///
/// Absence of a record is not an error; lookups report it through `Option`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StoreError {
    /// Insert targeted an index outside `[offset, offset + extent)` of a
    /// dense array backend.
    OutOfRange {
        /// First dimension whose coordinate fell outside the window
        /// (dimensions are checked in ascending order).
        dim: usize,
    },
    /// Rejected reshape of a dense array backend: it still holds records
    /// (`clear` first), or the new extent's arity does not match the index
    /// dimensionality.
    InvalidReconfiguration,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { dim } => {
                write!(f, "index outside the configured array bounds in dimension {dim}")
            }
            Self::InvalidReconfiguration => {
                write!(f, "invalid reconfiguration of an array backend")
            }
        }
    }
}

impl core::error::Error for StoreError {}

/// Storage backend over one index-to-record association.
///
/// All implementations are observationally equivalent for the *set* of
/// `(index, record)` pairs they hold; they differ in addressing strategy,
/// memory layout, and traversal order.
///
/// # Reference invalidation
///
/// References returned by [`Backend::insert`] and the lookup methods are
/// borrowed views whose validity window ends at the next structural mutation:
/// a reshape, a [`Backend::clear`], or (in the kd-tree backend) any split
/// triggered by an unrelated insert. The borrow checker enforces this window;
/// do not work around it by copying indices out and re-fetching across
/// mutations you do not control.
pub trait Backend<K: CellIndex, R> {
    /// Create or combine the record at `index`, per the configured
    /// [`DuplicatePolicy`](crate::DuplicatePolicy).
    ///
    /// The first insert for an index always constructs via
    /// [`Record::create`]; later inserts for the same index apply the policy.
    fn insert<A>(&mut self, index: K, args: A) -> Result<&mut R, StoreError>
    where
        R: Record<A>;

    /// The record at `index`, if one is present.
    fn get(&self, index: K) -> Option<&R>;

    /// Mutable variant of [`Backend::get`].
    fn get_mut(&mut self, index: K) -> Option<&mut R>;

    /// Visit every active `(index, record)` pair exactly once.
    ///
    /// Order is backend-defined and not stable across backend types, but is
    /// deterministic for a fixed backend and insertion history.
    fn traverse<F: FnMut(&K, &R)>(&self, visit: F);

    /// Mutable variant of [`Backend::traverse`]. The visitor may edit records
    /// but cannot change which indices are present.
    fn traverse_mut<F: FnMut(&K, &mut R)>(&mut self, visit: F);

    /// Number of records currently held.
    fn len(&self) -> usize;

    /// Whether the backend holds no records.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every record, returning the backend to the empty state.
    fn clear(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn errors_render_distinct_messages() {
        assert_ne!(
            StoreError::OutOfRange { dim: 0 }.to_string(),
            StoreError::InvalidReconfiguration.to_string(),
            "error kinds must be distinguishable in logs"
        );
    }

    #[test]
    fn out_of_range_reports_its_dimension() {
        assert_ne!(
            StoreError::OutOfRange { dim: 0 },
            StoreError::OutOfRange { dim: 1 },
            "the offending dimension is part of the error"
        );
    }
}
