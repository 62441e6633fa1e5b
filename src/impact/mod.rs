//! Impact-analysis pipeline.
//!
//! One strictly forward pass: dependency graph and changed set first, then
//! entity mapping, propagation, scoring, risk and suggestions. Every stage's
//! duration lands in the returned trace. All state is constructed fresh per
//! invocation.

pub mod propagate;
pub mod score;
pub mod suggest;

use crate::changes::{self, ChangeSource};
use crate::config::AnalyzerConfig;
use crate::entities;
use crate::graph::DependencyGraph;
use crate::model::{
    AnalysisOutcome, AnalysisReport, ImpactScope, RiskAssessment, SourceFile, VcsContext,
};
use crate::trace::AnalysisTrace;
use crate::vcs::Vcs;
use anyhow::Result;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::time::Instant;

/// Run the full analysis over a declaration inventory.
///
/// Per-file VCS failures degrade to empty contributions; the only hard
/// errors are programming mistakes surfaced by collaborators.
pub fn analyze(
    inventory: &[SourceFile],
    vcs: &dyn Vcs,
    analysis_root: &Path,
    config: &AnalyzerConfig,
) -> Result<AnalysisOutcome> {
    let mut trace = AnalysisTrace::new();

    let started = Instant::now();
    let graph = DependencyGraph::build(inventory);
    trace.step(
        "graph",
        started,
        format!("{} files, {} edges", inventory.len(), graph.edge_count()),
    );

    let started = Instant::now();
    let change_set = changes::extract_changes(vcs, analysis_root, &config.base_ref);
    trace.step(
        "changes",
        started,
        format!("{:?}: {} files", change_set.source, change_set.files.len()),
    );

    let vcs_context = VcsContext {
        branch: vcs.current_branch(),
        commit: vcs.head_commit().map(|(sha, _)| sha),
        commit_subject: vcs.head_commit().map(|(_, subject)| subject),
    };

    if change_set.source == ChangeSource::Empty || change_set.files.is_empty() {
        return Ok(AnalysisOutcome {
            report: empty_report(vcs_context),
            trace,
        });
    }

    let started = Instant::now();
    let by_path: BTreeMap<&str, &SourceFile> =
        inventory.iter().map(|f| (f.path.as_str(), f)).collect();
    let files_with_entities: Vec<_> = change_set
        .files
        .into_iter()
        .map(|file| {
            let entities = by_path
                .get(file.path.as_str())
                .map(|source| entities::map_entities(&file, source))
                .unwrap_or_default();
            (file, entities)
        })
        .collect();
    let changed_paths: Vec<&str> = files_with_entities
        .iter()
        .map(|(f, _)| f.path.as_str())
        .collect();
    let symbols = entities::collect_exported_symbols(&changed_paths, inventory);
    let entity_count: usize = files_with_entities.iter().map(|(_, e)| e.len()).sum();
    trace.step(
        "entities",
        started,
        format!("{} entities, {} exported symbols", entity_count, symbols.len()),
    );

    let started = Instant::now();
    let changed_set: BTreeSet<String> = changed_paths.iter().map(|p| p.to_string()).collect();
    let propagation = propagate::propagate(
        &changed_set,
        &graph,
        config.max_depth,
        config.include_transitive,
    );
    trace.step(
        "propagate",
        started,
        format!(
            "{} reached, max depth {}",
            propagation.scope.total, propagation.scope.max_depth
        ),
    );

    let started = Instant::now();
    let ranked = score::rank_files(files_with_entities, &graph, &symbols);
    let risk = score::assess_risk(&propagation.scope, &ranked, &symbols);
    trace.step(
        "score",
        started,
        format!("risk {:?} ({})", risk.overall, risk.score),
    );

    let started = Instant::now();
    let suggestions = suggest::generate(&ranked, &propagation, &risk, &symbols);
    trace.step(
        "suggest",
        started,
        format!(
            "{} tests, {} investigations",
            suggestions.tests.len(),
            suggestions.investigations.len()
        ),
    );

    let summary = format!(
        "{} changed file(s), {} affected, {:?} impact, {:?} risk",
        propagation.scope.direct,
        propagation.scope.total,
        propagation.scope.level,
        risk.overall
    );

    Ok(AnalysisOutcome {
        report: AnalysisReport {
            summary,
            vcs: vcs_context,
            files: ranked,
            scope: propagation.scope,
            modules: propagation.modules,
            components: propagation.components,
            exported_symbols: symbols,
            risk,
            test_paths: suggestions.test_paths,
            test_suggestions: suggestions.tests,
            investigations: suggestions.investigations,
        },
        trace,
    })
}

fn empty_report(vcs: VcsContext) -> AnalysisReport {
    AnalysisReport {
        summary: "no changes detected".to_string(),
        vcs,
        files: Vec::new(),
        scope: ImpactScope::empty(),
        modules: Vec::new(),
        components: Vec::new(),
        exported_symbols: Vec::new(),
        risk: RiskAssessment::empty(),
        test_paths: Vec::new(),
        test_suggestions: Vec::new(),
        investigations: Vec::new(),
    }
}
