// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Early exit.
//!
//! The traverser has no cancellation of its own. A rule stops a search by pruning
//! everything once it is satisfied; here, as soon as any point inside the circle is
//! found.
//!
//! Run:
//! - `RUST_LOG=understory_traverse=trace cargo run -p understory_demos --example early_exit`

use kurbo::Circle;
use tracing::info;
use understory_demos::{FirstWithin, init_logging, pack, scatter};
use understory_traverse::SingleTreeTraverser;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let points = scatter(2_000, 100.0, 3);
    let tree = pack(&points, 8)?;
    let root = tree.root().ok_or("packed tree has no root")?;

    let area = Circle::new((40.0, 60.0), 20.0);
    let mut rule = FirstWithin::new(&points, area);
    let mut traverser = SingleTreeTraverser::new(&mut rule);
    traverser.traverse(0, root);
    let prunes = traverser.num_prunes();
    info!(prunes, "search stopped");

    match rule.found() {
        Some(i) => println!("found point {i} at {:?} ({prunes} subtrees skipped)", points[i]),
        None => println!("no point inside {area:?}"),
    }
    Ok(())
}
