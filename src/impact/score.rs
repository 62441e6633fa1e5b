//! File weighting and change-risk assessment.
//!
//! Weights rank changed files for review ordering; the risk assessment adds
//! fixed points per fired condition and buckets the clamped sum. All
//! constants are deliberate, tuning them shifts every report.

use crate::graph::DependencyGraph;
use crate::model::{
    ChangedFile, CodeEntity, EntityKind, ExportedSymbol, FileType, ImpactLevel, ImpactScope,
    RankedFile, RiskAssessment, RiskFactor, RiskLevel,
};

/// Module categories whose changes carry extra risk.
const CORE_MODULES: [&str; 5] = ["api", "store", "utils", "hooks", "common"];

pub fn file_type_weight(file_type: FileType) -> f64 {
    match file_type {
        FileType::Api => 30.0,
        FileType::Store => 25.0,
        FileType::Config => 20.0,
        FileType::Hook => 20.0,
        FileType::Util => 15.0,
        FileType::Component => 10.0,
        FileType::Page => 10.0,
        FileType::Type => 5.0,
        FileType::Style => 3.0,
        FileType::Test => 0.0,
        FileType::Other => 5.0,
    }
}

/// Weight of one changed file, clamped to `[0, 100]`.
///
/// Base type weight, plus capped contributions for symbol usage, reverse
/// dependents and churn, plus per-entity bonuses.
pub fn score_file(
    file: &ChangedFile,
    entities: &[CodeEntity],
    dependents: usize,
    symbol_usage: usize,
) -> f64 {
    let mut weight = file_type_weight(file.file_type);
    weight += (2.0 * symbol_usage as f64).min(30.0);
    weight += (3.0 * dependents as f64).min(20.0);

    let lines = (file.additions + file.deletions) as f64;
    weight += (lines / 10.0).min(10.0);

    for entity in entities {
        if entity.exported {
            weight += 5.0;
        }
        match entity.kind {
            EntityKind::Function | EntityKind::Hook => weight += 3.0,
            EntityKind::Component => weight += 4.0,
            _ => {}
        }
    }

    weight.clamp(0.0, 100.0)
}

/// Rank the changed files by weight, descending, ties broken by path.
pub fn rank_files(
    files: Vec<(ChangedFile, Vec<CodeEntity>)>,
    graph: &DependencyGraph,
    symbols: &[ExportedSymbol],
) -> Vec<RankedFile> {
    let mut ranked: Vec<RankedFile> = files
        .into_iter()
        .map(|(file, entities)| {
            let dependents = graph.dependent_count(&file.path);
            let symbol_usage = symbols
                .iter()
                .filter(|s| s.file == file.path)
                .map(|s| s.usage_count)
                .sum();
            let weight = score_file(&file, &entities, dependents, symbol_usage);
            RankedFile {
                file,
                entities,
                dependents,
                symbol_usage,
                weight,
            }
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.weight
            .partial_cmp(&a.weight)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.file.path.cmp(&b.file.path))
    });
    ranked
}

fn mitigation_for(factor: &str) -> &'static str {
    match factor {
        "wide-scope" => "Stage the rollout and verify downstream dependents before release",
        "core-module" => "Request a second reviewer for core-module changes",
        "high-usage-symbol" => "Search all call sites of heavily used symbols for contract drift",
        "api-change" => "Verify request/response contracts against consumers of the API layer",
        "state-change" => "Exercise state transitions around the modified store logic",
        _ => "Review the change manually",
    }
}

/// Assess overall change risk from independent fixed-point conditions.
pub fn assess_risk(
    scope: &ImpactScope,
    files: &[RankedFile],
    symbols: &[ExportedSymbol],
) -> RiskAssessment {
    let mut factors: Vec<RiskFactor> = Vec::new();

    match scope.level {
        ImpactLevel::Critical => factors.push(RiskFactor {
            name: "wide-scope".to_string(),
            points: 30.0,
            detail: format!("{} files reached by propagation", scope.total),
        }),
        ImpactLevel::Large => factors.push(RiskFactor {
            name: "wide-scope".to_string(),
            points: 20.0,
            detail: format!("{} files reached by propagation", scope.total),
        }),
        _ => {}
    }

    let core: Vec<&str> = files
        .iter()
        .filter(|f| CORE_MODULES.contains(&f.file.module.as_str()))
        .map(|f| f.file.path.as_str())
        .collect();
    if !core.is_empty() {
        factors.push(RiskFactor {
            name: "core-module".to_string(),
            points: 25.0,
            detail: format!("core module files changed: {}", core.join(", ")),
        });
    }

    if let Some(hot) = symbols.iter().find(|s| s.usage_count > 5) {
        factors.push(RiskFactor {
            name: "high-usage-symbol".to_string(),
            points: 20.0,
            detail: format!("{} used {} times", hot.name, hot.usage_count),
        });
    }

    if files.iter().any(|f| f.file.file_type == FileType::Api) {
        factors.push(RiskFactor {
            name: "api-change".to_string(),
            points: 15.0,
            detail: "API layer files changed".to_string(),
        });
    }

    if files.iter().any(|f| f.file.file_type == FileType::Store) {
        factors.push(RiskFactor {
            name: "state-change".to_string(),
            points: 15.0,
            detail: "state store files changed".to_string(),
        });
    }

    let score: f64 = factors.iter().map(|f| f.points).sum::<f64>().clamp(0.0, 100.0);
    let overall = if score >= 70.0 {
        RiskLevel::Critical
    } else if score >= 50.0 {
        RiskLevel::High
    } else if score >= 30.0 {
        RiskLevel::Medium
    } else if score >= 10.0 {
        RiskLevel::Low
    } else {
        RiskLevel::Minimal
    };

    let mitigations = factors
        .iter()
        .map(|f| mitigation_for(&f.name).to_string())
        .collect();

    RiskAssessment {
        overall,
        score,
        factors,
        mitigations,
    }
}
