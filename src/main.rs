use anyhow::Result;
use clap::Parser;
use ripple::config::AnalyzerConfig;
use ripple::graph::DependencyGraph;
use ripple::vcs::GitCli;
use ripple::{changes, cli, loader};
use serde_json::json;

fn main() -> Result<()> {
    let args = cli::Args::parse();

    match args.command {
        cli::Command::Analyze {
            repo,
            inventory,
            base_ref,
            max_depth,
            no_transitive,
        } => {
            let mut config = AnalyzerConfig::from_env();
            if let Some(base_ref) = base_ref {
                config.base_ref = base_ref;
            }
            if let Some(max_depth) = max_depth {
                config.max_depth = max_depth;
            }
            if no_transitive {
                config.include_transitive = false;
            }
            let files = loader::load_inventory(&inventory)?;
            let vcs = GitCli::new(&repo);
            let outcome = ripple::analyze(&files, &vcs, &repo, &config)?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
            Ok(())
        }
        cli::Command::ChangedFiles { repo, base_ref } => {
            let mut config = AnalyzerConfig::from_env();
            if let Some(base_ref) = base_ref {
                config.base_ref = base_ref;
            }
            let vcs = GitCli::new(&repo);
            let change_set = changes::extract_changes(&vcs, &repo, &config.base_ref);
            println!("{}", serde_json::to_string_pretty(&change_set)?);
            Ok(())
        }
        cli::Command::Graph { inventory } => {
            let files = loader::load_inventory(&inventory)?;
            let graph = DependencyGraph::build(&files);
            let out = json!({
                "files": files.len(),
                "edges": graph.edge_count(),
                "dependencies": graph.dependencies(),
                "reverse_dependencies": graph.reverse_dependencies(),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
            Ok(())
        }
    }
}
