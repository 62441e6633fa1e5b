//! Test and investigation suggestions derived from the analysis.
//!
//! Suggestions are deterministic functions of the ranked files, the
//! propagation result and the risk assessment. Output lists are sorted by
//! priority, most urgent first, with ties broken by id.

use crate::impact::propagate::{Propagation, component_name};
use crate::model::{
    ExportedSymbol, FileType, InvestigationKind, InvestigationSuggestion, Priority, RankedFile,
    RiskAssessment, RiskLevel, TestKind, TestPath, TestSuggestion,
};
use std::collections::BTreeSet;

#[derive(Debug, Default)]
pub struct Suggestions {
    pub test_paths: Vec<TestPath>,
    pub tests: Vec<TestSuggestion>,
    pub investigations: Vec<InvestigationSuggestion>,
}

pub fn generate(
    ranked: &[RankedFile],
    propagation: &Propagation,
    risk: &RiskAssessment,
    symbols: &[ExportedSymbol],
) -> Suggestions {
    let mut tests = Vec::new();

    for file in ranked {
        if !matches!(file.file.file_type, FileType::Component | FileType::Page) {
            continue;
        }
        let name = component_name(&file.file.path);
        tests.push(TestSuggestion {
            id: format!("smoke-{name}"),
            kind: TestKind::Smoke,
            priority: Priority::Critical,
            target: file.file.path.clone(),
            steps: vec![
                format!("Navigate to the view rendering {name}"),
                "Wait for the view to finish rendering".to_string(),
                "Check the console for errors".to_string(),
            ],
            expected: vec![
                "View renders without errors".to_string(),
                "Key elements are visible".to_string(),
            ],
        });

        if !file.entities.is_empty() {
            let names: Vec<&str> = file
                .entities
                .iter()
                .take(5)
                .map(|e| e.name.as_str())
                .collect();
            tests.push(TestSuggestion {
                id: format!("functional-{name}"),
                kind: TestKind::Functional,
                priority: Priority::High,
                target: file.file.path.clone(),
                steps: vec![
                    format!("Exercise the changed behavior of {}", names.join(", ")),
                    "Interact with the affected controls".to_string(),
                ],
                expected: vec!["Changed entities behave as specified".to_string()],
            });
        }
    }

    if matches!(risk.overall, RiskLevel::High | RiskLevel::Critical) {
        let paths: Vec<&str> = ranked.iter().map(|f| f.file.path.as_str()).collect();
        tests.push(TestSuggestion {
            id: "regression-full".to_string(),
            kind: TestKind::Regression,
            priority: Priority::Medium,
            target: paths.join(", "),
            steps: vec![
                "Run the full regression suite".to_string(),
                "Review flows touching every changed file".to_string(),
            ],
            expected: vec!["No regressions outside the changed behavior".to_string()],
        });
    }

    let mut investigations = Vec::new();

    for file in ranked {
        if file.weight > 50.0 {
            investigations.push(InvestigationSuggestion {
                id: format!("review-{}", file.file.path),
                kind: InvestigationKind::CodeReview,
                priority: Priority::High,
                target: file.file.path.clone(),
                checkpoints: vec![
                    "Read the full diff, not only the touched entities".to_string(),
                    format!("{} dependents rely on this file", file.dependents),
                ],
            });
        }
    }

    let hot: Vec<&ExportedSymbol> = symbols.iter().filter(|s| s.usage_count > 3).collect();
    if !hot.is_empty() {
        let names: Vec<&str> = hot.iter().map(|s| s.name.as_str()).collect();
        investigations.push(InvestigationSuggestion {
            id: "dependency-check".to_string(),
            kind: InvestigationKind::DependencyCheck,
            priority: Priority::Medium,
            target: names.join(", "),
            checkpoints: hot
                .iter()
                .map(|s| format!("{} is used {} times across the project", s.name, s.usage_count))
                .collect(),
        });
    }

    if ranked.iter().any(|f| f.file.file_type == FileType::Api) {
        investigations.push(InvestigationSuggestion {
            id: "api-compatibility".to_string(),
            kind: InvestigationKind::ApiCompatibility,
            priority: Priority::High,
            target: "API layer".to_string(),
            checkpoints: vec![
                "Compare request and response shapes with existing consumers".to_string(),
                "Check error-path handling for changed endpoints".to_string(),
            ],
        });
    }

    if ranked.iter().any(|f| f.file.file_type == FileType::Store) {
        investigations.push(InvestigationSuggestion {
            id: "state-management".to_string(),
            kind: InvestigationKind::StateManagement,
            priority: Priority::Medium,
            target: "state stores".to_string(),
            checkpoints: vec![
                "Verify state shape changes against every subscriber".to_string(),
                "Check persistence or hydration of the changed state".to_string(),
            ],
        });
    }

    tests.sort_by(|a, b| a.priority.cmp(&b.priority).then_with(|| a.id.cmp(&b.id)));
    investigations.sort_by(|a, b| a.priority.cmp(&b.priority).then_with(|| a.id.cmp(&b.id)));

    Suggestions {
        test_paths: group_test_paths(propagation),
        tests,
        investigations,
    }
}

/// Group affected components into navigable test paths.
///
/// Components under a `pages/` or `views/` segment anchor a route; other
/// affected components join the route whose anchor they sit within one hop
/// of. Components with no route nearby share a single unrouted group.
pub fn group_test_paths(propagation: &Propagation) -> Vec<TestPath> {
    let mut paths = Vec::new();
    let mut grouped: BTreeSet<&str> = BTreeSet::new();

    for page in &propagation.components {
        let Some(route) = infer_route(&page.path) else {
            continue;
        };
        let mut members = vec![page.path.clone()];
        grouped.insert(page.path.as_str());
        for other in &propagation.components {
            if other.path != page.path
                && infer_route(&other.path).is_none()
                && other.depth <= page.depth + 1
            {
                members.push(other.path.clone());
                grouped.insert(other.path.as_str());
            }
        }
        paths.push(TestPath {
            priority: path_priority(propagation, &members),
            route,
            components: members,
        });
    }

    let loose: Vec<String> = propagation
        .components
        .iter()
        .filter(|c| !grouped.contains(c.path.as_str()))
        .map(|c| c.path.clone())
        .collect();
    if !loose.is_empty() {
        paths.push(TestPath {
            priority: path_priority(propagation, &loose),
            route: "(no route)".to_string(),
            components: loose,
        });
    }

    paths.sort_by(|a, b| a.priority.cmp(&b.priority).then_with(|| a.route.cmp(&b.route)));
    paths
}

fn path_priority(propagation: &Propagation, members: &[String]) -> u8 {
    let best = members
        .iter()
        .filter_map(|m| propagation.depths.get(m))
        .copied()
        .min();
    match best {
        Some(0) => 1,
        Some(1) => 2,
        _ => 3,
    }
}

/// Route inferred from the path segments after `pages/` or `views/`,
/// dropping the file name unless it names the route directory.
fn infer_route(path: &str) -> Option<String> {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let anchor = segments
        .iter()
        .position(|s| *s == "pages" || *s == "views")?;
    let mut parts: Vec<&str> = segments[anchor + 1..].to_vec();
    let file = parts.pop()?;
    let stem = file.split('.').next().unwrap_or(file);
    if stem != "index" {
        parts.push(stem);
    }
    if parts.is_empty() {
        Some("/".to_string())
    } else {
        Some(format!("/{}", parts.join("/")))
    }
}
