//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use fob_deptrack::BuildMode;

/// Track which files depend on which in a bundler module graph
#[derive(Parser, Debug)]
#[command(
    name = "fob-deptrack",
    version,
    about = "Track which files depend on which in a bundler module graph",
    long_about = "Runs a dependency pass over a module graph dump exported by a bundler host.\n\
                  Each tracked file gets the set of files it depends on and the set of files\n\
                  that depend on it, with ignore patterns applied to both directions."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one pass over a graph dump and persist the snapshot
    ///
    /// The snapshot is written when the build mode is one of the configured
    /// persist modes, or always when --out is given.
    Snapshot(SnapshotArgs),

    /// List every file affected by a change to the given files
    Impact(ImpactArgs),

    /// Print snapshot statistics
    Stats(StatsArgs),
}

/// Options shared by every command that runs a pass.
#[derive(Args, Debug, Clone)]
pub struct GraphArgs {
    /// Module graph dump (JSON) exported by the host
    #[arg(short, long, value_name = "FILE")]
    pub graph: PathBuf,

    /// Extra ignore pattern, added to the configured ones (repeatable)
    #[arg(short, long = "ignore", value_name = "GLOB")]
    pub ignore: Vec<String>,

    /// Config file (defaults to ./fob-deptrack.toml when present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct SnapshotArgs {
    #[command(flatten)]
    pub graph: GraphArgs,

    /// Build mode reported for the pass (development, production, none)
    #[arg(short, long, default_value = "development", value_parser = parse_mode)]
    pub mode: BuildMode,

    /// Write the snapshot here, regardless of build mode
    #[arg(short, long, value_name = "FILE")]
    pub out: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ImpactArgs {
    #[command(flatten)]
    pub graph: GraphArgs,

    /// Changed files
    #[arg(required = true, value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Print the result as a JSON array
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct StatsArgs {
    #[command(flatten)]
    pub graph: GraphArgs,

    /// Also list modules nothing depends on
    #[arg(long)]
    pub orphans: bool,

    /// Print the statistics as JSON
    #[arg(long, conflicts_with = "orphans")]
    pub json: bool,
}

fn parse_mode(s: &str) -> Result<BuildMode, String> {
    s.parse()
}
