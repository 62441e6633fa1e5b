//! Breadth-first impact propagation over reverse dependencies.
//!
//! Starting from the changed path set, walks dependents outward up to
//! `max_depth` hops, recording the shortest hop-count per reached file. The
//! walk is read-only over the graph; running it twice on the same inputs
//! yields identical results.

use crate::changes::{classify_file_type, module_category};
use crate::graph::DependencyGraph;
use crate::model::{
    AffectedComponent, AffectedModule, FileType, ImpactLevel, ImpactScope, ImpactType, RiskLevel,
};
use std::collections::{BTreeMap, BTreeSet, VecDeque};

/// Everything the BFS produces: the scope summary plus per-file depths and
/// the module/component groupings derived from them.
#[derive(Debug)]
pub struct Propagation {
    pub scope: ImpactScope,
    /// Shortest hop-count from any changed file; changed files are depth 0.
    pub depths: BTreeMap<String, usize>,
    pub modules: Vec<AffectedModule>,
    pub components: Vec<AffectedComponent>,
}

pub fn propagate(
    changed: &BTreeSet<String>,
    graph: &DependencyGraph,
    max_depth: usize,
    include_transitive: bool,
) -> Propagation {
    let effective_depth = if include_transitive { max_depth } else { 1 };

    let mut depths: BTreeMap<String, usize> = BTreeMap::new();
    let mut queue: VecDeque<(String, usize)> = VecDeque::new();
    for path in changed {
        depths.insert(path.clone(), 0);
        queue.push_back((path.clone(), 0));
    }

    while let Some((path, depth)) = queue.pop_front() {
        if depth >= effective_depth {
            continue;
        }
        if let Some(dependents) = graph.dependents_of(&path) {
            for dependent in dependents {
                if !depths.contains_key(dependent) {
                    depths.insert(dependent.clone(), depth + 1);
                    queue.push_back((dependent.clone(), depth + 1));
                }
            }
        }
    }

    let direct = changed.len();
    let indirect = depths.values().filter(|d| **d == 1).count();
    let transitive = depths.len().saturating_sub(direct + indirect);
    let max_reached = depths.values().copied().max().unwrap_or(0);
    let total = depths.len();

    let scope = ImpactScope {
        direct,
        indirect,
        transitive,
        total,
        max_depth: max_reached,
        level: level_for(total),
    };

    let modules = group_modules(&depths);
    let components = collect_components(&depths);

    Propagation {
        scope,
        depths,
        modules,
        components,
    }
}

/// Fixed bucketing of the total reached-file count.
fn level_for(total: usize) -> ImpactLevel {
    match total {
        0..=3 => ImpactLevel::Minimal,
        4..=10 => ImpactLevel::Small,
        11..=30 => ImpactLevel::Medium,
        31..=50 => ImpactLevel::Large,
        _ => ImpactLevel::Critical,
    }
}

fn impact_for(depth: usize) -> ImpactType {
    match depth {
        0 => ImpactType::Direct,
        1 => ImpactType::Indirect,
        _ => ImpactType::Transitive,
    }
}

/// Group reached files by module category, keeping the best depth per group.
fn group_modules(depths: &BTreeMap<String, usize>) -> Vec<AffectedModule> {
    let mut best: BTreeMap<String, usize> = BTreeMap::new();
    for (path, depth) in depths {
        let module = module_category(path);
        best.entry(module)
            .and_modify(|d| *d = (*d).min(*depth))
            .or_insert(*depth);
    }
    best.into_iter()
        .map(|(name, depth)| AffectedModule {
            name,
            impact: impact_for(depth),
            depth,
            risk: match depth {
                0 => RiskLevel::High,
                1 => RiskLevel::Medium,
                _ => RiskLevel::Low,
            },
        })
        .collect()
}

fn collect_components(depths: &BTreeMap<String, usize>) -> Vec<AffectedComponent> {
    depths
        .iter()
        .filter(|(path, _)| {
            matches!(
                classify_file_type(path),
                FileType::Component | FileType::Page
            )
        })
        .map(|(path, depth)| AffectedComponent {
            path: path.clone(),
            name: component_name(path),
            impact: impact_for(*depth),
            depth: *depth,
        })
        .collect()
}

/// Display name of a component file: the stem, or the parent directory for
/// `index.*` files.
pub fn component_name(path: &str) -> String {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let file = segments.last().copied().unwrap_or(path);
    let stem = file.split('.').next().unwrap_or(file);
    if stem == "index" && segments.len() >= 2 {
        segments[segments.len() - 2].to_string()
    } else {
        stem.to_string()
    }
}
