// Copyright 2025 the Cellmap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dense grid basics.
//!
//! Shape a grid, insert weighted samples, trip the reshape guard, traverse
//! in row-major order.
//!
//! Run:
//! - `cargo run -p cellmap_examples --example basic_store`

use cellmap_store::{Backend, DenseGrid, DuplicatePolicy, Record, StoreError};

#[derive(Debug)]
struct CellStats {
    hits: u32,
    weight: f64,
}

impl Record<f64> for CellStats {
    fn create(weight: f64) -> Self {
        Self { hits: 1, weight }
    }

    fn merge(&mut self, policy: DuplicatePolicy, weight: f64) {
        match policy {
            DuplicatePolicy::Replace => *self = Self::create(weight),
            DuplicatePolicy::Merge => {
                self.hits += 1;
                self.weight += weight;
            }
        }
    }
}

fn main() {
    let mut grid: DenseGrid<[i64; 2], CellStats> =
        DenseGrid::with_policy(DuplicatePolicy::Merge);
    grid.set_extent(&[4, 4]).unwrap();
    grid.set_offset([-2, -2]).unwrap();

    for (cell, weight) in [([0, 0], 1.0), ([-2, 1], 0.5), ([0, 0], 0.25), ([1, -1], 2.0)] {
        grid.insert(cell, weight).unwrap();
    }

    // Inserting outside the window fails loudly instead of dropping data.
    assert_eq!(
        grid.insert([2, 0], 1.0).unwrap_err(),
        StoreError::OutOfRange { dim: 0 }
    );

    // The shape is locked while any record is active.
    assert_eq!(grid.set_extent(&[8, 8]), Err(StoreError::InvalidReconfiguration));

    println!("{grid:?}");
    grid.traverse(|cell, stats| {
        println!("cell {cell:?}: {} hits, weight {}", stats.hits, stats.weight);
    });

    grid.clear();
    grid.set_extent(&[8, 8]).unwrap();
    println!("after clear, reshape succeeded: {grid:?}");
}
