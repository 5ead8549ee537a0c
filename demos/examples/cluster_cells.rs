// Copyright 2025 the Cellmap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bin random 2-D points into cells and compute per-cell centroids.
//!
//! This is the intended use of the `Merge` policy in clustering pipelines:
//! the record accumulates a count and coordinate sums, and the centroid
//! falls out at the end. The hash backend fits because the occupied cells
//! are sparse in an unbounded domain.
//!
//! Run:
//! - `cargo run -p cellmap_examples --example cluster_cells`

use cellmap_store::{Backend, DuplicatePolicy, HashStore, Record};

const CELL_SIZE: f64 = 10.0;

#[derive(Debug)]
struct Centroid {
    count: u32,
    sum_x: f64,
    sum_y: f64,
}

impl Centroid {
    fn mean(&self) -> (f64, f64) {
        let n = f64::from(self.count);
        (self.sum_x / n, self.sum_y / n)
    }
}

impl Record<(f64, f64)> for Centroid {
    fn create((x, y): (f64, f64)) -> Self {
        Self {
            count: 1,
            sum_x: x,
            sum_y: y,
        }
    }

    fn merge(&mut self, policy: DuplicatePolicy, (x, y): (f64, f64)) {
        match policy {
            DuplicatePolicy::Replace => *self = Self::create((x, y)),
            DuplicatePolicy::Merge => {
                self.count += 1;
                self.sum_x += x;
                self.sum_y += y;
            }
        }
    }
}

struct Rng(u64);

impl Rng {
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1_u64 << 53) as f64)
    }
}

fn cell_of(x: f64, y: f64) -> [i64; 2] {
    [
        (x / CELL_SIZE).floor() as i64,
        (y / CELL_SIZE).floor() as i64,
    ]
}

fn main() {
    let mut rng = Rng(0x5EED_CAFE);
    let mut cells: HashStore<[i64; 2], Centroid> =
        HashStore::with_policy(DuplicatePolicy::Merge);

    // Three blobs of points around different centers.
    for &(cx, cy) in &[(15.0, 15.0), (-40.0, 5.0), (70.0, -25.0)] {
        for _ in 0..200 {
            let x = cx + (rng.next_f64() - 0.5) * 12.0;
            let y = cy + (rng.next_f64() - 0.5) * 12.0;
            cells.insert(cell_of(x, y), (x, y)).unwrap();
        }
    }

    println!("{} occupied cells", cells.len());
    let mut summary: Vec<([i64; 2], u32, (f64, f64))> = Vec::new();
    cells.traverse(|&cell, centroid| {
        summary.push((cell, centroid.count, centroid.mean()));
    });
    summary.sort_by(|a, b| b.1.cmp(&a.1));
    for (cell, count, (mx, my)) in summary.iter().take(5) {
        println!("cell {cell:?}: {count} points, centroid ({mx:.1}, {my:.1})");
    }
}
