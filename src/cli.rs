use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "ripple",
    version,
    about = "Static change-impact analysis",
    after_help = r#"Examples:
  ripple analyze --repo . --inventory inventory.json
  ripple analyze --repo . --inventory inventory.json --base-ref main --max-depth 3
  ripple changed-files --repo .
  ripple graph --inventory inventory.json
"#
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the full impact analysis and print the report as JSON.
    Analyze {
        #[arg(long, default_value = ".")]
        repo: PathBuf,
        /// Declaration inventory produced by the source loader.
        #[arg(long)]
        inventory: PathBuf,
        /// Baseline ref used when the working tree is clean.
        #[arg(long)]
        base_ref: Option<String>,
        /// Maximum propagation depth in dependency hops.
        #[arg(long)]
        max_depth: Option<usize>,
        /// Stop propagation after the first dependent hop.
        #[arg(long)]
        no_transitive: bool,
    },
    /// Show the resolved changed-file set and exit.
    ChangedFiles {
        #[arg(long, default_value = ".")]
        repo: PathBuf,
        /// Baseline ref used when the working tree is clean.
        #[arg(long)]
        base_ref: Option<String>,
    },
    /// Dump the resolved dependency graph.
    Graph {
        /// Declaration inventory produced by the source loader.
        #[arg(long)]
        inventory: PathBuf,
    },
}
