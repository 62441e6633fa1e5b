//! Module-import dependency graph.
//!
//! Built once per run from the declaration inventory and read-only
//! afterwards; impact propagation traverses the reverse direction. Both maps
//! record the same edge set, so `a ∈ reverse[b]` iff `b ∈ dependencies[a]`.

use crate::model::SourceFile;
use std::collections::{BTreeMap, BTreeSet};

/// Extensions tried when resolving an import specifier, in order.
const RESOLVE_EXTENSIONS: [&str; 5] = [".ts", ".tsx", ".js", ".jsx", ".vue"];

#[derive(Debug, Default)]
pub struct DependencyGraph {
    dependencies: BTreeMap<String, BTreeSet<String>>,
    reverse: BTreeMap<String, BTreeSet<String>>,
}

impl DependencyGraph {
    /// Build the graph from every loaded source file.
    ///
    /// Bare package specifiers and unresolvable path aliases are silently
    /// dropped; this is a documented precision gap, not an error.
    pub fn build(files: &[SourceFile]) -> Self {
        let known: BTreeSet<&str> = files.iter().map(|f| f.path.as_str()).collect();
        let mut graph = DependencyGraph::default();

        for file in files {
            for spec in &file.imports {
                if let Some(target) = resolve_import(&file.path, spec, &known) {
                    if target == file.path {
                        continue;
                    }
                    graph
                        .dependencies
                        .entry(file.path.clone())
                        .or_default()
                        .insert(target.clone());
                    graph
                        .reverse
                        .entry(target)
                        .or_default()
                        .insert(file.path.clone());
                }
            }
        }

        graph
    }

    /// Files this file imports.
    pub fn dependencies_of(&self, path: &str) -> Option<&BTreeSet<String>> {
        self.dependencies.get(path)
    }

    /// Files that import this file.
    pub fn dependents_of(&self, path: &str) -> Option<&BTreeSet<String>> {
        self.reverse.get(path)
    }

    pub fn dependent_count(&self, path: &str) -> usize {
        self.reverse.get(path).map_or(0, |set| set.len())
    }

    pub fn edge_count(&self) -> usize {
        self.dependencies.values().map(|set| set.len()).sum()
    }

    pub fn dependencies(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.dependencies
    }

    pub fn reverse_dependencies(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.reverse
    }
}

/// Resolve an import specifier to a known project path.
///
/// Only relative specifiers resolve; candidates are tried as-given, with each
/// known extension appended, then as a directory `index.*`.
fn resolve_import(from: &str, spec: &str, known: &BTreeSet<&str>) -> Option<String> {
    if !spec.starts_with("./") && !spec.starts_with("../") && spec != "." && spec != ".." {
        return None;
    }

    let base = join_relative(parent_dir(from), spec)?;

    if known.contains(base.as_str()) {
        return Some(base);
    }
    for ext in RESOLVE_EXTENSIONS {
        let candidate = format!("{base}{ext}");
        if known.contains(candidate.as_str()) {
            return Some(candidate);
        }
    }
    for ext in RESOLVE_EXTENSIONS {
        let candidate = format!("{base}/index{ext}");
        if known.contains(candidate.as_str()) {
            return Some(candidate);
        }
    }

    None
}

fn parent_dir(path: &str) -> &str {
    match path.rfind('/') {
        Some(pos) => &path[..pos],
        None => "",
    }
}

/// Join a relative specifier onto a directory, normalizing `.` and `..`.
/// Returns `None` when the specifier escapes the project root.
fn join_relative(dir: &str, spec: &str) -> Option<String> {
    let mut segments: Vec<&str> = if dir.is_empty() {
        Vec::new()
    } else {
        dir.split('/').collect()
    };
    for segment in spec.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.pop().is_none() {
                    return None;
                }
            }
            other => segments.push(other),
        }
    }
    if segments.is_empty() {
        None
    } else {
        Some(segments.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(path: &str, imports: &[&str]) -> SourceFile {
        SourceFile {
            path: path.to_string(),
            imports: imports.iter().map(|s| s.to_string()).collect(),
            declarations: Vec::new(),
        }
    }

    #[test]
    fn resolves_relative_with_extension() {
        let files = vec![
            file("src/app.ts", &["./api/user", "vue"]),
            file("src/api/user.ts", &["../utils/http"]),
            file("src/utils/http.ts", &[]),
        ];
        let graph = DependencyGraph::build(&files);

        assert!(graph.dependencies_of("src/app.ts").unwrap().contains("src/api/user.ts"));
        assert!(graph.dependencies_of("src/api/user.ts").unwrap().contains("src/utils/http.ts"));
        // Bare package specifier dropped.
        assert_eq!(graph.dependencies_of("src/app.ts").unwrap().len(), 1);
    }

    #[test]
    fn resolves_directory_index() {
        let files = vec![
            file("src/app.ts", &["./store"]),
            file("src/store/index.ts", &[]),
        ];
        let graph = DependencyGraph::build(&files);
        assert!(graph.dependencies_of("src/app.ts").unwrap().contains("src/store/index.ts"));
    }

    #[test]
    fn edge_set_is_symmetric() {
        let files = vec![
            file("src/a.ts", &["./b", "./c"]),
            file("src/b.ts", &["./c"]),
            file("src/c.ts", &[]),
        ];
        let graph = DependencyGraph::build(&files);

        for (from, targets) in graph.dependencies() {
            for to in targets {
                assert!(
                    graph.dependents_of(to).unwrap().contains(from),
                    "missing reverse edge {to} -> {from}"
                );
            }
        }
        for (to, sources) in graph.reverse_dependencies() {
            for from in sources {
                assert!(
                    graph.dependencies_of(from).unwrap().contains(to),
                    "missing forward edge {from} -> {to}"
                );
            }
        }
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.dependent_count("src/c.ts"), 2);
    }

    #[test]
    fn unresolvable_imports_dropped() {
        let files = vec![file("src/a.ts", &["./missing", "@/aliased", "lodash"])];
        let graph = DependencyGraph::build(&files);
        assert!(graph.dependencies_of("src/a.ts").is_none());
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn escaping_root_dropped() {
        let files = vec![file("a.ts", &["../outside"])];
        let graph = DependencyGraph::build(&files);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn vue_single_file_components_resolve() {
        let files = vec![
            file("src/pages/home.ts", &["../components/Banner"]),
            file("src/components/Banner.vue", &[]),
        ];
        let graph = DependencyGraph::build(&files);
        assert_eq!(graph.dependent_count("src/components/Banner.vue"), 1);
    }
}
