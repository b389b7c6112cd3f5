// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Circle, Point};
use understory_demos::{KNearest, RangeSearch, pack, scatter};
use understory_traverse::SingleTreeTraverser;

fn brute_nearest(points: &[Point], q: Point) -> usize {
    let mut best = (f64::INFINITY, 0);
    for (i, p) in points.iter().enumerate() {
        let d2 = p.distance_squared(q);
        if d2 < best.0 {
            best = (d2, i);
        }
    }
    best.1
}

fn bench_knn(c: &mut Criterion) {
    let mut group = c.benchmark_group("knn");
    for &n in &[1_000usize, 10_000, 100_000] {
        let points = scatter(n, 1000.0, 17);
        let queries = scatter(64, 1000.0, 18);
        let tree = pack(&points, 8).unwrap();
        let root = tree.root().unwrap();
        group.throughput(Throughput::Elements(queries.len() as u64));

        for &k in &[1usize, 10] {
            group.bench_function(format!("traverse_k{k}_n{n}"), |b| {
                b.iter_batched(
                    || KNearest::new(&points, &queries, k),
                    |mut rule| {
                        let mut t = SingleTreeTraverser::with_capacity(&mut rule, 64);
                        for q in 0..queries.len() {
                            t.traverse(q, root);
                        }
                        black_box(t.num_prunes());
                    },
                    BatchSize::SmallInput,
                );
            });
        }

        if n <= 10_000 {
            group.bench_function(format!("brute_k1_n{n}"), |b| {
                b.iter(|| {
                    for &q in &queries {
                        black_box(brute_nearest(&points, q));
                    }
                });
            });
        }
    }
    group.finish();
}

fn bench_range(c: &mut Criterion) {
    let mut group = c.benchmark_group("range");
    for &fanout in &[4usize, 8, 16, 32] {
        let points = scatter(50_000, 1000.0, 23);
        let circles: Vec<Circle> = scatter(64, 1000.0, 24)
            .into_iter()
            .map(|p| Circle::new(p, 30.0))
            .collect();
        let tree = pack(&points, fanout).unwrap();
        let root = tree.root().unwrap();
        group.throughput(Throughput::Elements(circles.len() as u64));

        group.bench_function(format!("traverse_fanout{fanout}"), |b| {
            b.iter_batched(
                || RangeSearch::new(&points, &circles),
                |mut rule| {
                    let mut t = SingleTreeTraverser::new(&mut rule);
                    for q in 0..circles.len() {
                        t.traverse(q, root);
                    }
                    black_box(rule.hits(0).len());
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_knn, bench_range);
criterion_main!(benches);
