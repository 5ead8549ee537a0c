// Copyright 2025 the Cellmap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cellmap Store: pluggable N-dimensional cell storage for clustering
//! pipelines.
//!
//! Cellmap Store accumulates one payload record per distinct
//! multi-dimensional index seen during processing, such as the grid cells of
//! a spatial distribution being clustered or mapped.
//!
//! - One shared contract ([`Backend`]): insert, lookup, traversal, clear.
//! - Three interchangeable backends differing only in addressing strategy,
//!   memory layout, and traversal order.
//! - Caller-selectable merge-on-duplicate semantics ([`DuplicatePolicy`]):
//!   replace the record, or aggregate into it.
//!
//! The payload type and its merge logic stay entirely on the caller's side
//! through the [`Record`] contract, so algorithm code above the store never
//! changes when the backend is swapped.
//!
//! # Example
//!
//! ```rust
//! use cellmap_store::{Backend, DenseGrid, DuplicatePolicy, Record};
//!
//! // Per-cell hit statistics, aggregated under the Merge policy.
//! #[derive(Debug, PartialEq)]
//! struct CellStats {
//!     hits: u32,
//!     weight: f64,
//! }
//!
//! impl Record<f64> for CellStats {
//!     fn create(weight: f64) -> Self {
//!         Self { hits: 1, weight }
//!     }
//!
//!     fn merge(&mut self, policy: DuplicatePolicy, weight: f64) {
//!         match policy {
//!             DuplicatePolicy::Replace => *self = Self::create(weight),
//!             DuplicatePolicy::Merge => {
//!                 self.hits += 1;
//!                 self.weight += weight;
//!             }
//!         }
//!     }
//! }
//!
//! let mut grid: DenseGrid<[i64; 2], CellStats> =
//!     DenseGrid::with_policy(DuplicatePolicy::Merge);
//! grid.set_extent(&[4, 4]).unwrap();
//!
//! grid.insert([1, 2], 0.5).unwrap();
//! grid.insert([1, 2], 0.25).unwrap();
//! assert_eq!(
//!     grid.get([1, 2]),
//!     Some(&CellStats { hits: 2, weight: 0.75 })
//! );
//!
//! // Out-of-range inserts fail loudly; out-of-range lookups are absence.
//! assert!(grid.insert([4, 0], 1.0).is_err());
//! assert_eq!(grid.get([9, 9]), None);
//! ```
//!
//! Algorithm code written against the trait runs on any backend:
//!
//! ```rust
//! use cellmap_store::{Backend, DuplicatePolicy, HashStore, KdTree, Record};
//!
//! struct Count(u32);
//!
//! impl Record<()> for Count {
//!     fn create((): ()) -> Self {
//!         Self(1)
//!     }
//!
//!     fn merge(&mut self, _policy: DuplicatePolicy, (): ()) {
//!         self.0 += 1;
//!     }
//! }
//!
//! fn bin<B: Backend<[i32; 2], Count>>(store: &mut B, cells: &[[i32; 2]]) {
//!     for &cell in cells {
//!         store.insert(cell, ()).unwrap();
//!     }
//! }
//!
//! let cells = [[0, 0], [1, 3], [0, 0]];
//! let mut tree: KdTree<[i32; 2], Count> = KdTree::new();
//! let mut table: HashStore<[i32; 2], Count> = HashStore::new();
//! bin(&mut tree, &cells);
//! bin(&mut table, &cells);
//! assert_eq!(tree.len(), 2);
//! assert_eq!(table.len(), 2);
//! ```
//!
//! ## Choosing a backend
//!
//! - [`DenseGrid`]: O(1) addressing over a fixed coordinate window. Best when
//!   the index domain is known, dense, and bounded; pays memory for the whole
//!   window up front and rejects indices outside it.
//! - [`KdTree`]: no bounds, memory proportional to distinct indices. Splits
//!   adapt to the data, but the tree is never rebalanced, so adversarial
//!   insertion orders degrade to O(n) paths.
//! - [`HashStore`]: no bounds, O(1) amortized operations, no ordering at
//!   all. The correctness baseline, and the default for sparse unbounded
//!   domains.
//!
//! All three hold the same `(index, record)` set for the same insert
//! sequence; only traversal order differs.
//!
//! ## Threading
//!
//! A backend instance is exclusively owned by its caller: single-threaded,
//! synchronous, no interior locking. Rust's borrow rules already forbid
//! mutating a store during its own traversal.

#![no_std]

extern crate alloc;

pub mod backend;
pub mod backends;
pub mod index;
pub mod record;

pub use backend::{Backend, StoreError};
pub use backends::array::DenseGrid;
pub use backends::hashmap::HashStore;
pub use backends::kdtree::KdTree;
pub use index::{CellIndex, Scalar};
pub use record::{DuplicatePolicy, Record};
