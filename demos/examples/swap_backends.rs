// Copyright 2025 the Cellmap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! One accumulation routine, three backends.
//!
//! The binning function is written once against the `Backend` trait and
//! executed over the dense grid, the kd-tree, and the hash table; all three
//! end up holding the same cells.
//!
//! Run:
//! - `cargo run -p cellmap_examples --example swap_backends`

use std::collections::BTreeMap;

use cellmap_store::{Backend, DenseGrid, DuplicatePolicy, HashStore, KdTree, Record};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Count(u32);

impl Record<()> for Count {
    fn create((): ()) -> Self {
        Self(1)
    }

    fn merge(&mut self, policy: DuplicatePolicy, (): ()) {
        match policy {
            DuplicatePolicy::Replace => *self = Self::create(()),
            DuplicatePolicy::Merge => self.0 += 1,
        }
    }
}

const SAMPLES: [[i32; 2]; 9] = [
    [0, 0],
    [3, 1],
    [0, 0],
    [2, 2],
    [3, 1],
    [0, 3],
    [0, 0],
    [1, 1],
    [2, 2],
];

fn bin<B: Backend<[i32; 2], Count>>(store: &mut B) -> BTreeMap<[i32; 2], u32> {
    for &cell in &SAMPLES {
        store.insert(cell, ()).unwrap();
    }
    // Collect into an ordered map so the printed summary is identical no
    // matter what traversal order the backend uses.
    let mut out = BTreeMap::new();
    store.traverse(|&cell, &Count(n)| {
        out.insert(cell, n);
    });
    out
}

fn main() {
    let mut grid: DenseGrid<[i32; 2], Count> = DenseGrid::with_policy(DuplicatePolicy::Merge);
    grid.set_extent(&[4, 4]).unwrap();
    let mut tree: KdTree<[i32; 2], Count> = KdTree::with_policy(DuplicatePolicy::Merge);
    let mut table: HashStore<[i32; 2], Count> = HashStore::with_policy(DuplicatePolicy::Merge);

    let from_grid = bin(&mut grid);
    let from_tree = bin(&mut tree);
    let from_table = bin(&mut table);

    println!("array:   {from_grid:?}");
    println!("kdtree:  {from_tree:?}");
    println!("hashmap: {from_table:?}");
    assert_eq!(from_grid, from_tree);
    assert_eq!(from_grid, from_table);
}
