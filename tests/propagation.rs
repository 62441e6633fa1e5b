use ripple::graph::DependencyGraph;
use ripple::impact::propagate::propagate;
use ripple::model::{ImpactLevel, SourceFile};
use std::collections::BTreeSet;

fn file(path: &str, imports: &[String]) -> SourceFile {
    SourceFile {
        path: path.to_string(),
        imports: imports.to_vec(),
        declarations: Vec::new(),
    }
}

/// A tree where every file at layer `n` imports one file at layer `n - 1`.
/// Changing the root reaches `width^1 + width^2 + ...` dependents.
fn layered_graph(width: usize, depth: usize) -> DependencyGraph {
    let mut files = vec![file("src/layer0/f0.ts", &[])];
    let mut previous = vec!["src/layer0/f0.ts".to_string()];
    for layer in 1..=depth {
        let mut current = Vec::new();
        for (i, parent) in previous.iter().cycle().take(width * previous.len()).enumerate() {
            let path = format!("src/layer{layer}/f{i}.ts");
            let import = format!(
                "../{}/{}",
                parent.split('/').nth(1).unwrap(),
                parent.split('/').nth(2).unwrap().trim_end_matches(".ts")
            );
            files.push(file(&path, &[import]));
            current.push(path);
        }
        previous = current;
    }
    DependencyGraph::build(&files)
}

fn root_set() -> BTreeSet<String> {
    ["src/layer0/f0.ts".to_string()].into_iter().collect()
}

#[test]
fn direct_count_matches_changed_set_size() {
    let graph = layered_graph(3, 2);
    for changed in [
        root_set(),
        ["src/layer1/f0.ts".to_string(), "src/layer1/f1.ts".to_string()]
            .into_iter()
            .collect::<BTreeSet<String>>(),
    ] {
        let result = propagate(&changed, &graph, 5, true);
        assert_eq!(result.scope.direct, changed.len());
    }
}

#[test]
fn deeper_limits_never_shrink_the_reached_set() {
    let graph = layered_graph(2, 4);
    let changed = root_set();
    let mut previous_total = 0;
    for max_depth in 0..=5 {
        let result = propagate(&changed, &graph, max_depth, true);
        assert!(
            result.scope.total >= previous_total,
            "total shrank at depth {max_depth}"
        );
        previous_total = result.scope.total;
    }
}

#[test]
fn repeated_runs_are_identical() {
    let graph = layered_graph(3, 3);
    let changed = root_set();
    let first = propagate(&changed, &graph, 4, true);
    let second = propagate(&changed, &graph, 4, true);
    assert_eq!(first.depths, second.depths);
    assert_eq!(first.scope.total, second.scope.total);
    assert_eq!(first.scope.indirect, second.scope.indirect);
    assert_eq!(first.scope.transitive, second.scope.transitive);
}

#[test]
fn totals_drive_level_buckets() {
    // Single isolated file: minimal.
    let small = DependencyGraph::build(&[file("src/a.ts", &[])]);
    let changed = ["src/a.ts".to_string()].into_iter().collect();
    assert_eq!(propagate(&changed, &small, 5, true).scope.level, ImpactLevel::Minimal);

    // Wide fan-out crosses the small and medium thresholds.
    let graph = layered_graph(9, 1);
    let result = propagate(&root_set(), &graph, 5, true);
    assert_eq!(result.scope.total, 10);
    assert_eq!(result.scope.level, ImpactLevel::Small);

    let graph = layered_graph(4, 2);
    let result = propagate(&root_set(), &graph, 5, true);
    assert_eq!(result.scope.total, 21);
    assert_eq!(result.scope.level, ImpactLevel::Medium);
}

#[test]
fn empty_changed_set_reaches_nothing() {
    let graph = layered_graph(3, 3);
    let result = propagate(&BTreeSet::new(), &graph, 5, true);
    assert_eq!(result.scope.total, 0);
    assert_eq!(result.scope.direct, 0);
    assert_eq!(result.scope.level, ImpactLevel::Minimal);
    assert!(result.modules.is_empty());
}
