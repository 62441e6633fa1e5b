use criterion::{Criterion, black_box, criterion_group, criterion_main};
use ripple::graph::DependencyGraph;
use ripple::impact::propagate::propagate;
use ripple::model::SourceFile;
use std::collections::BTreeSet;

/// Synthetic layered project: `layers` layers of `width` files, every file
/// importing one file from the previous layer.
fn synthetic_inventory(layers: usize, width: usize) -> Vec<SourceFile> {
    let mut files = Vec::new();
    for layer in 0..layers {
        for i in 0..width {
            let imports = if layer == 0 {
                Vec::new()
            } else {
                vec![format!("../layer{}/file{}", layer - 1, i % width)]
            };
            files.push(SourceFile {
                path: format!("src/layer{layer}/file{i}.ts"),
                imports,
                declarations: Vec::new(),
            });
        }
    }
    files
}

fn bench_graph_build(c: &mut Criterion) {
    let files = synthetic_inventory(20, 50);
    c.bench_function("graph_build_1000_files", |b| {
        b.iter(|| DependencyGraph::build(black_box(&files)))
    });
}

fn bench_propagation_depth(c: &mut Criterion) {
    let files = synthetic_inventory(20, 50);
    let graph = DependencyGraph::build(&files);
    let changed: BTreeSet<String> = ["src/layer0/file0.ts".to_string()].into_iter().collect();

    let mut group = c.benchmark_group("propagate_depth");
    for depth in [1usize, 3, 5, 10] {
        group.bench_function(format!("depth_{depth}"), |b| {
            b.iter(|| propagate(black_box(&changed), &graph, depth, true))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_graph_build, bench_propagation_depth);
criterion_main!(benches);
