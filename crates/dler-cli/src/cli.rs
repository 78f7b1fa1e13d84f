//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// dler - Apply source directives to bundled distribution trees
#[derive(Parser, Debug)]
#[command(name = "dler")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Apply `<dler-*>` directives from the source tree to distribution trees
    ///
    /// Examples:
    ///   dler directives --target dist-npm --target dist-jsr
    ///   dler directives --target dist-libs --dry-run
    ///   dler directives                    # targets from dler.toml
    Directives(DirectivesArgs),
}

/// Flags for `dler directives`. Unset values fall back to the project
/// config file, then to built-in defaults.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectivesArgs {
    /// Distribution target: dist-npm, dist-jsr, dist-libs or dist-libs/<lib>
    #[arg(short, long = "target", value_name = "TARGET")]
    pub targets: Vec<String>,

    /// Project root (defaults to the current directory)
    #[arg(long, env = "DLER_ROOT")]
    pub root: Option<PathBuf>,

    /// Source directory relative to the project root
    #[arg(long)]
    pub source_dir: Option<String>,

    /// Files processed concurrently within a batch
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Targets processed concurrently
    #[arg(long)]
    pub targets_concurrency: Option<usize>,

    /// Files per batch
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Abort on the first file that fails
    #[arg(long)]
    pub stop_on_error: bool,

    /// Evaluate distribution files as they are instead of resetting them to source first
    #[arg(long)]
    pub no_copy_fresh: bool,

    /// Report what would change without writing or deleting
    #[arg(long)]
    pub dry_run: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}
