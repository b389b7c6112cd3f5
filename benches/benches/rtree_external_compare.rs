// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![cfg(feature = "compare_rstar")]

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_demos::{KNearest, pack, scatter};
use understory_traverse::SingleTreeTraverser;

use rstar::RTree;

fn bench_nearest_external_compare(c: &mut Criterion) {
    let mut group = c.benchmark_group("nearest_external_compare");
    for &n in &[10_000usize, 100_000] {
        let points = scatter(n, 1000.0, 31);
        let queries = scatter(256, 1000.0, 32);
        group.throughput(Throughput::Elements(queries.len() as u64));

        let tree = pack(&points, 8).unwrap();
        let root = tree.root().unwrap();
        group.bench_function(format!("understory_nearest_n{}", n), |b| {
            b.iter(|| {
                let mut rule = KNearest::new(&points, &queries, 1);
                let mut t = SingleTreeTraverser::new(&mut rule);
                for q in 0..queries.len() {
                    t.traverse(q, root);
                }
                black_box(rule.neighbors(0).first().copied());
            });
        });

        let rtree = RTree::bulk_load(points.iter().map(|p| [p.x, p.y]).collect());
        group.bench_function(format!("rstar_nearest_n{}", n), |b| {
            b.iter(|| {
                for q in &queries {
                    black_box(rtree.nearest_neighbor(&[q.x, q.y]));
                }
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_nearest_external_compare);
criterion_main!(benches);
