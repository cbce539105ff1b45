//! fob-deptrack - dependency snapshots from bundler module graph dumps.

use clap::Parser;
use fob_deptrack_cli::{cli, commands, error, logger, ui};
use miette::Result;

fn main() -> Result<()> {
    let args = cli::Cli::parse();

    logger::init_logger(args.verbose, args.quiet, args.no_color);
    ui::init(args.quiet, args.no_color);

    let result = match args.command {
        cli::Command::Snapshot(snapshot_args) => commands::snapshot_execute(snapshot_args),
        cli::Command::Impact(impact_args) => commands::impact_execute(impact_args),
        cli::Command::Stats(stats_args) => commands::stats_execute(stats_args),
    };

    result.map_err(error::cli_error_to_miette)
}
