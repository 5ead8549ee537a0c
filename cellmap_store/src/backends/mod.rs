// Copyright 2025 the Cellmap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend implementations for different addressing strategies.
//!
//! - `array`: bounds-checked dense array with a validity bitmap; O(1)
//!   addressing via row-major flattening, fixed shape.
//! - `kdtree`: adaptive binary space partitioning with no fixed bounds;
//!   splits lazily, one record per leaf.
//! - `hashmap`: direct addressing over a hash table; the correctness
//!   baseline, and the choice for sparse unbounded index domains.
//!
//! Split-plane note
//! ----------------
//! The kd-tree picks the split dimension as the one with the largest absolute
//! coordinate delta between the colliding indices (lowest dimension wins
//! ties), and the split value as the ceiling midpoint along that dimension.
//! The ceiling keeps the routing rule `coord < split -> left` able to
//! separate adjacent integer coordinates.

pub mod array;
pub mod hashmap;
pub mod kdtree;
