//! `fob-deptrack stats`

use super::analyze;
use crate::cli::StatsArgs;
use crate::error::Result;
use crate::ui;

pub fn execute(args: StatsArgs) -> Result<()> {
    let snapshot = analyze(&args.graph)?;
    let stats = snapshot.statistics();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("{}", ui::field("modules", stats.module_count));
    println!("{}", ui::field("edges", stats.edge_count));
    println!("{}", ui::field("orphans", stats.orphan_count));
    println!("{}", ui::field("leaves", stats.leaf_count));

    if args.orphans {
        for id in snapshot.orphans() {
            println!("{id}");
        }
    }
    Ok(())
}
