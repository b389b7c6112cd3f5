// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Nearest neighbours.
//!
//! Pack random points into a tree, find the 3 nearest points to a few queries, and
//! report how many subtrees the running best distance pruned.
//!
//! Run:
//! - `cargo run -p understory_demos --example nearest_neighbor`
//! - `RUST_LOG=understory_traverse=debug cargo run -p understory_demos --example nearest_neighbor`

use kurbo::Point;
use tracing::info;
use understory_demos::{KNearest, init_logging, pack, scatter};
use understory_traverse::SingleTreeTraverser;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let points = scatter(10_000, 1000.0, 42);
    let queries = [
        Point::new(500.0, 500.0),
        Point::new(0.0, 0.0),
        Point::new(999.0, 10.0),
    ];
    let tree = pack(&points, 8)?;
    let root = tree.root().ok_or("packed tree has no root")?;
    println!("tree: {:?}, height {}", tree, tree.height());

    let mut rule = KNearest::new(&points, &queries, 3);
    let mut traverser = SingleTreeTraverser::new(&mut rule);
    for q in 0..queries.len() {
        traverser.reset_prunes();
        traverser.traverse(q, root);
        info!(query = q, prunes = traverser.num_prunes(), "nearest neighbours found");
    }

    for (q, query) in queries.iter().enumerate() {
        for &(d2, i) in rule.neighbors(q) {
            println!(
                "  {query:?} -> point {i} at {:?}, distance {:.3}",
                points[i],
                d2.sqrt()
            );
        }
    }
    Ok(())
}
