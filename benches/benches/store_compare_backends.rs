// Copyright 2025 the Cellmap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};

use cellmap_store::{Backend, DenseGrid, DuplicatePolicy, HashStore, KdTree, Record};

#[derive(Copy, Clone, Debug)]
struct Tally {
    count: u32,
    sum: i64,
}

impl Record<i64> for Tally {
    fn create(v: i64) -> Self {
        Self { count: 1, sum: v }
    }

    fn merge(&mut self, policy: DuplicatePolicy, v: i64) {
        match policy {
            DuplicatePolicy::Replace => *self = Self::create(v),
            DuplicatePolicy::Merge => {
                self.count += 1;
                self.sum += v;
            }
        }
    }
}

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_i32_in(&mut self, lo: i32, hi: i32) -> i32 {
        let span = (hi - lo) as u64;
        lo + (self.next_u64() % span) as i32
    }
}

/// Every cell of an `n`-by-`n` window, in row-major order.
fn gen_dense_cells(n: i32) -> Vec<[i32; 2]> {
    let mut out = Vec::with_capacity((n * n) as usize);
    for x in 0..n {
        for y in 0..n {
            out.push([x, y]);
        }
    }
    out
}

/// Random cells scattered over an `n`-by-`n` window, duplicates included.
fn gen_sparse_cells(n: i32, count: usize, seed: u64) -> Vec<[i32; 2]> {
    let mut rng = Rng::new(seed);
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        out.push([rng.next_i32_in(0, n), rng.next_i32_in(0, n)]);
    }
    out
}

fn shaped_grid(n: i32, policy: DuplicatePolicy) -> DenseGrid<[i32; 2], Tally> {
    let mut grid = DenseGrid::with_policy(policy);
    grid.set_extent(&[n as usize, n as usize]).unwrap();
    grid
}

fn fill<B: Backend<[i32; 2], Tally>>(store: &mut B, cells: &[[i32; 2]]) {
    for (i, &cell) in cells.iter().enumerate() {
        store.insert(cell, i as i64).unwrap();
    }
}

fn bench_insert_dense(c: &mut Criterion) {
    let n = 64;
    let cells = gen_dense_cells(n);
    let mut group = c.benchmark_group("insert_dense_64x64");
    group.throughput(Throughput::Elements(cells.len() as u64));
    group.bench_function("array", |b| {
        b.iter_batched_ref(
            || shaped_grid(n, DuplicatePolicy::Replace),
            |store| fill(store, &cells),
            BatchSize::SmallInput,
        );
    });
    group.bench_function("kdtree", |b| {
        b.iter_batched_ref(
            KdTree::<[i32; 2], Tally>::new,
            |store| fill(store, &cells),
            BatchSize::SmallInput,
        );
    });
    group.bench_function("hashmap", |b| {
        b.iter_batched_ref(
            HashStore::<[i32; 2], Tally>::new,
            |store| fill(store, &cells),
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

fn bench_insert_sparse(c: &mut Criterion) {
    let n = 1024;
    let cells = gen_sparse_cells(n, 4096, 0x5EED);
    let mut group = c.benchmark_group("insert_sparse_1024x1024");
    group.throughput(Throughput::Elements(cells.len() as u64));
    group.bench_function("array", |b| {
        b.iter_batched_ref(
            || shaped_grid(n, DuplicatePolicy::Merge),
            |store| fill(store, &cells),
            BatchSize::SmallInput,
        );
    });
    group.bench_function("kdtree", |b| {
        b.iter_batched_ref(
            || KdTree::<[i32; 2], Tally>::with_policy(DuplicatePolicy::Merge),
            |store| fill(store, &cells),
            BatchSize::SmallInput,
        );
    });
    group.bench_function("hashmap", |b| {
        b.iter_batched_ref(
            || HashStore::<[i32; 2], Tally>::with_policy(DuplicatePolicy::Merge),
            |store| fill(store, &cells),
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

fn bench_merge_duplicates(c: &mut Criterion) {
    // Heavy duplicate pressure: 16 distinct cells hit 4096 times total.
    let cells = gen_sparse_cells(4, 4096, 0xD1CE);
    let mut group = c.benchmark_group("merge_duplicates");
    group.throughput(Throughput::Elements(cells.len() as u64));
    group.bench_function("array", |b| {
        b.iter_batched_ref(
            || shaped_grid(4, DuplicatePolicy::Merge),
            |store| fill(store, &cells),
            BatchSize::SmallInput,
        );
    });
    group.bench_function("kdtree", |b| {
        b.iter_batched_ref(
            || KdTree::<[i32; 2], Tally>::with_policy(DuplicatePolicy::Merge),
            |store| fill(store, &cells),
            BatchSize::SmallInput,
        );
    });
    group.bench_function("hashmap", |b| {
        b.iter_batched_ref(
            || HashStore::<[i32; 2], Tally>::with_policy(DuplicatePolicy::Merge),
            |store| fill(store, &cells),
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

fn bench_get(c: &mut Criterion) {
    let n = 64;
    let cells = gen_dense_cells(n);
    let probes = gen_sparse_cells(n, 1024, 0xB0B);

    let mut grid = shaped_grid(n, DuplicatePolicy::Replace);
    fill(&mut grid, &cells);
    let mut tree: KdTree<[i32; 2], Tally> = KdTree::new();
    fill(&mut tree, &cells);
    let mut table: HashStore<[i32; 2], Tally> = HashStore::new();
    fill(&mut table, &cells);

    let mut group = c.benchmark_group("get_hit");
    group.throughput(Throughput::Elements(probes.len() as u64));
    group.bench_function("array", |b| {
        b.iter(|| {
            for &cell in &probes {
                black_box(grid.get(black_box(cell)));
            }
        });
    });
    group.bench_function("kdtree", |b| {
        b.iter(|| {
            for &cell in &probes {
                black_box(tree.get(black_box(cell)));
            }
        });
    });
    group.bench_function("hashmap", |b| {
        b.iter(|| {
            for &cell in &probes {
                black_box(table.get(black_box(cell)));
            }
        });
    });
    group.finish();
}

fn bench_traverse(c: &mut Criterion) {
    let n = 64;
    let cells = gen_dense_cells(n);

    let mut grid = shaped_grid(n, DuplicatePolicy::Replace);
    fill(&mut grid, &cells);
    let mut tree: KdTree<[i32; 2], Tally> = KdTree::new();
    fill(&mut tree, &cells);
    let mut table: HashStore<[i32; 2], Tally> = HashStore::new();
    fill(&mut table, &cells);

    let mut group = c.benchmark_group("traverse_4096");
    group.throughput(Throughput::Elements(cells.len() as u64));
    group.bench_function("array", |b| {
        b.iter(|| {
            let mut total = 0_i64;
            grid.traverse(|_, record| total += record.sum);
            black_box(total)
        });
    });
    group.bench_function("kdtree", |b| {
        b.iter(|| {
            let mut total = 0_i64;
            tree.traverse(|_, record| total += record.sum);
            black_box(total)
        });
    });
    group.bench_function("hashmap", |b| {
        b.iter(|| {
            let mut total = 0_i64;
            table.traverse(|_, record| total += record.sum);
            black_box(total)
        });
    });
    group.finish();
}

fn bench_kd_monotone(c: &mut Criterion) {
    // The documented adversarial case for the kd-tree: a monotone axis fill
    // chains every split down one spine, so inserts walk O(n) paths.
    let cells: Vec<[i32; 2]> = (0..1024).map(|x| [x, 0]).collect();
    let mut group = c.benchmark_group("kd_monotone_fill");
    group.throughput(Throughput::Elements(cells.len() as u64));
    group.bench_function("kdtree", |b| {
        b.iter_batched_ref(
            KdTree::<[i32; 2], Tally>::new,
            |store| fill(store, &cells),
            BatchSize::SmallInput,
        );
    });
    group.bench_function("hashmap", |b| {
        b.iter_batched_ref(
            HashStore::<[i32; 2], Tally>::new,
            |store| fill(store, &cells),
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_insert_dense,
    bench_insert_sparse,
    bench_merge_duplicates,
    bench_get,
    bench_traverse,
    bench_kd_monotone
);
criterion_main!(benches);
