//! `fob-deptrack snapshot`

use fob_deptrack::{CompilationView, DependencyTracker};

use super::{load_config, load_graph};
use crate::cli::SnapshotArgs;
use crate::error::Result;
use crate::ui;

pub fn execute(args: SnapshotArgs) -> Result<()> {
    let mut config = load_config(&args.graph)?;
    if let Some(out) = &args.out {
        config.snapshot_path = out.clone();
        if !config.should_persist(args.mode) {
            config.persist_modes.push(args.mode);
        }
    }

    let graph = load_graph(&args.graph.graph)?;
    let tracker = DependencyTracker::from_config(&config)?;
    let summary = tracker.on_compilation_finished(&CompilationView::new(&graph, args.mode))?;

    println!("{}", ui::field("mode", summary.mode));
    println!("{}", ui::field("modules", summary.records));
    println!("{}", ui::field("unresolved", summary.unresolved));
    println!("{}", ui::field("ignored", summary.ignored));
    println!("{}", ui::field("failures", summary.failures));

    if summary.failures > 0 {
        ui::warning(&format!(
            "{} connection walk(s) failed, see {}",
            summary.failures,
            config.log_path.display()
        ));
    }

    if summary.persisted {
        ui::success(&format!(
            "Wrote snapshot to {}",
            config.snapshot_path.display()
        ));
    } else {
        ui::info(&format!(
            "Snapshot not persisted in {} mode (use --out to force)",
            summary.mode
        ));
    }
    Ok(())
}
