// Copyright 2025 the Cellmap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Coordinate scalar and cell index contracts.

use core::fmt::Debug;
use core::hash::Hash;

/// Coordinate scalar used by cell indices.
///
/// Cell indices in clustering pipelines are integral bins, so the contract
/// requires total ordering, equality, and hashing; floating-point coordinates
/// would forfeit `Eq`/`Hash` and with them the hash backend. Arithmetic is
/// computed in a widened type internally so extreme coordinate/origin pairs
/// cannot overflow.
pub trait Scalar: Copy + Ord + Eq + Hash + Debug {
    /// Zero value for the scalar type.
    fn zero() -> Self;

    /// Absolute difference `|a - b|`, saturating at the type maximum.
    fn abs_delta(a: Self, b: Self) -> Self;

    /// Split plane between two distinct coordinates.
    ///
    /// For `lo = min(a, b)` and `hi = max(a, b)` with `lo < hi`, the result
    /// always satisfies `lo < split_mid(a, b) <= hi`. This is the ceiling
    /// midpoint `ceil((a + b) / 2)`. The plain floor midpoint would route
    /// both of two adjacent coordinates to the same side of the plane,
    /// making one record unreachable.
    fn split_mid(a: Self, b: Self) -> Self;

    /// Offset-adjusted position of `coord` relative to `origin`, or `None`
    /// when the coordinate falls outside `[origin, origin + extent)`.
    fn cell_offset(coord: Self, origin: Self, extent: usize) -> Option<usize>;

    /// Exact inverse of [`Scalar::cell_offset`] for any position that some
    /// coordinate maps to.
    fn coord_at(cell: usize, origin: Self) -> Self;
}

impl Scalar for i32 {
    #[inline]
    fn zero() -> Self {
        0
    }

    #[inline]
    fn abs_delta(a: Self, b: Self) -> Self {
        let d = i64::from(a).abs_diff(i64::from(b)).min(Self::MAX as u64);
        #[allow(
            clippy::cast_possible_truncation,
            reason = "clamped to i32::MAX above"
        )]
        {
            d as Self
        }
    }

    #[inline]
    fn split_mid(a: Self, b: Self) -> Self {
        let m = (i64::from(a) + i64::from(b) + 1).div_euclid(2);
        #[allow(
            clippy::cast_possible_truncation,
            reason = "midpoint lies between two i32 values"
        )]
        {
            m as Self
        }
    }

    #[inline]
    fn cell_offset(coord: Self, origin: Self, extent: usize) -> Option<usize> {
        let off = i64::from(coord) - i64::from(origin);
        usize::try_from(off).ok().filter(|&off| off < extent)
    }

    #[inline]
    fn coord_at(cell: usize, origin: Self) -> Self {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "positions produced by cell_offset round-trip exactly"
        )]
        {
            (i64::from(origin) + cell as i64) as Self
        }
    }
}

impl Scalar for i64 {
    #[inline]
    fn zero() -> Self {
        0
    }

    #[inline]
    fn abs_delta(a: Self, b: Self) -> Self {
        let d = i128::from(a).abs_diff(i128::from(b)).min(Self::MAX as u128);
        #[allow(
            clippy::cast_possible_truncation,
            reason = "clamped to i64::MAX above"
        )]
        {
            d as Self
        }
    }

    #[inline]
    fn split_mid(a: Self, b: Self) -> Self {
        let m = (i128::from(a) + i128::from(b) + 1).div_euclid(2);
        #[allow(
            clippy::cast_possible_truncation,
            reason = "midpoint lies between two i64 values"
        )]
        {
            m as Self
        }
    }

    #[inline]
    fn cell_offset(coord: Self, origin: Self, extent: usize) -> Option<usize> {
        let off = i128::from(coord) - i128::from(origin);
        usize::try_from(off).ok().filter(|&off| off < extent)
    }

    #[inline]
    fn coord_at(cell: usize, origin: Self) -> Self {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "positions produced by cell_offset round-trip exactly"
        )]
        {
            (i128::from(origin) + cell as i128) as Self
        }
    }
}

/// Fixed-dimension cell index: a small tuple of ordered scalar coordinates.
///
/// `Hash` is deliberately not part of the base contract; the hash backend adds
/// that bound itself, so array and kd-tree backends stay usable with
/// non-hashable coordinate wrappers.
pub trait CellIndex: Copy + Eq + Debug {
    /// Per-dimension coordinate scalar.
    type Scalar: Scalar;

    /// Number of dimensions, fixed at configuration time.
    const DIMS: usize;

    /// The coordinate along `dim`. `dim` must be below [`CellIndex::DIMS`].
    fn coord(&self, dim: usize) -> Self::Scalar;

    /// Build an index by asking `f` for each dimension's coordinate in turn.
    fn from_coords(f: impl FnMut(usize) -> Self::Scalar) -> Self;
}

impl<T: Scalar, const N: usize> CellIndex for [T; N] {
    type Scalar = T;

    const DIMS: usize = N;

    #[inline]
    fn coord(&self, dim: usize) -> T {
        self[dim]
    }

    #[inline]
    fn from_coords(f: impl FnMut(usize) -> T) -> Self {
        core::array::from_fn(f)
    }
}
