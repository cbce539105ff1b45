//! `fob-deptrack impact`: which files are affected when these change.

use std::collections::BTreeSet;

use fob_deptrack::ModuleId;

use super::analyze;
use crate::cli::ImpactArgs;
use crate::error::{CliError, Result};
use crate::ui;

pub fn execute(args: ImpactArgs) -> Result<()> {
    let snapshot = analyze(&args.graph)?;

    let mut affected = BTreeSet::new();
    for file in &args.files {
        let id = ModuleId::new(file).map_err(|source| CliError::InvalidPath {
            path: file.clone(),
            source,
        })?;
        if !snapshot.contains(&id) {
            ui::warning(&format!("{id} is not tracked"));
            continue;
        }
        affected.extend(snapshot.transitive_dependents(&id));
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&affected)?);
    } else {
        for id in &affected {
            println!("{id}");
        }
        ui::info(&format!("{} affected module(s)", affected.len()));
    }
    Ok(())
}
