// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Range search.
//!
//! Collect every point inside a few circles. Subtrees whose bounds miss a circle are
//! pruned on their first score.
//!
//! Run:
//! - `cargo run -p understory_demos --example range_search`

use kurbo::Circle;
use tracing::info;
use understory_demos::{RangeSearch, init_logging, pack, scatter};
use understory_traverse::SingleTreeTraverser;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let points = scatter(5_000, 1000.0, 7);
    let circles = [
        Circle::new((250.0, 250.0), 25.0),
        Circle::new((800.0, 100.0), 60.0),
        Circle::new((2000.0, 2000.0), 10.0),
    ];
    let tree = pack(&points, 12)?;
    let root = tree.root().ok_or("packed tree has no root")?;

    let mut rule = RangeSearch::new(&points, &circles);
    let mut traverser = SingleTreeTraverser::new(&mut rule);
    for q in 0..circles.len() {
        let before = traverser.num_prunes();
        traverser.traverse(q, root);
        info!(
            circle = q,
            prunes = traverser.num_prunes() - before,
            "range search done"
        );
    }

    for (q, c) in circles.iter().enumerate() {
        println!("{c:?}: {} points", rule.hits(q).len());
    }
    assert!(rule.hits(2).is_empty(), "circle 2 lies outside all points");
    Ok(())
}
