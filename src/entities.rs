//! Maps diff hunks onto declared entities.
//!
//! A declaration is touched when its inclusive line range intersects a hunk's
//! new-file range; the first overlapping hunk in file order decides whether
//! the entity counts as added, deleted or modified. Kind refinement is
//! heuristic and name/initializer based, it never inspects syntax.

use crate::model::{
    ChangedFile, CodeEntity, Declaration, EntityChange, EntityKind, ExportedSymbol, FileStatus,
    HunkKind, SourceFile,
};
use crate::util::count_word;
use std::collections::BTreeMap;

/// Initializer fragments that mark a variable as a UI component.
const COMPONENT_MARKERS: [&str; 7] = [
    "defineComponent",
    "createApp",
    "styled.",
    "styled(",
    "forwardRef",
    "React.memo",
    "h(",
];

/// Touched entities for one changed file, in declaration order.
///
/// Deleted files have no post-image to map against and yield nothing; their
/// change still counts at the file level.
pub fn map_entities(file: &ChangedFile, source: &SourceFile) -> Vec<CodeEntity> {
    if file.status == FileStatus::Deleted {
        return Vec::new();
    }

    let mut entities = Vec::new();
    for decl in &source.declarations {
        let (start, end) = decl.range();
        if let Some(change) = first_overlap(&file.hunks, start, end) {
            entities.push(CodeEntity {
                kind: refine_kind(decl, &source.path),
                name: decl.name().to_string(),
                start_line: start,
                end_line: end,
                change,
                exported: decl.exported(),
                parent: None,
            });
        }
        if let Declaration::Class { name, methods, .. } = decl {
            for method in methods {
                if let Some(change) =
                    first_overlap(&file.hunks, method.start_line, method.end_line)
                {
                    entities.push(CodeEntity {
                        kind: EntityKind::Function,
                        name: method.name.clone(),
                        start_line: method.start_line,
                        end_line: method.end_line,
                        change,
                        exported: decl.exported(),
                        parent: Some(name.clone()),
                    });
                }
            }
        }
    }
    entities
}

fn first_overlap(hunks: &[crate::model::DiffHunk], start: u32, end: u32) -> Option<EntityChange> {
    hunks
        .iter()
        .find(|hunk| hunk.overlaps_new_range(start, end))
        .map(|hunk| match hunk.kind {
            HunkKind::Add => EntityChange::Added,
            HunkKind::Remove => EntityChange::Deleted,
            HunkKind::Modify => EntityChange::Modified,
        })
}

/// Refine the declared kind with naming conventions.
pub fn refine_kind(decl: &Declaration, path: &str) -> EntityKind {
    let name = decl.name();
    if let Declaration::Variable { initializer, .. } = decl {
        if COMPONENT_MARKERS.iter().any(|m| initializer.contains(m)) || path.ends_with(".vue") {
            return EntityKind::Component;
        }
    }
    if is_hook_name(name) {
        return EntityKind::Hook;
    }
    if is_config_name(name) {
        return EntityKind::Config;
    }
    match decl {
        Declaration::Function { .. } => EntityKind::Function,
        Declaration::Class { .. } => EntityKind::Class,
        Declaration::Variable { .. } => EntityKind::Variable,
        Declaration::Interface { .. } => EntityKind::Interface,
        Declaration::TypeAlias { .. } => EntityKind::Type,
        Declaration::ExportDecl { .. } => EntityKind::Export,
    }
}

fn is_hook_name(name: &str) -> bool {
    let mut rest = name.chars();
    rest.next() == Some('u')
        && rest.next() == Some('s')
        && rest.next() == Some('e')
        && rest.next().is_some_and(|c| c.is_ascii_uppercase())
}

fn is_config_name(name: &str) -> bool {
    let all_caps = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
        && name.chars().any(|c| c.is_ascii_uppercase());
    all_caps || name.ends_with("Config") || name.ends_with("Options")
}

/// Build the exported-symbol table for the changed files, with usage counts
/// gathered by word-boundary textual containment over every other file's
/// imports, declaration names and initializers. An over-approximation; two
/// unrelated symbols sharing a name are counted together.
pub fn collect_exported_symbols(
    changed_paths: &[&str],
    inventory: &[SourceFile],
) -> Vec<ExportedSymbol> {
    let by_path: BTreeMap<&str, &SourceFile> =
        inventory.iter().map(|f| (f.path.as_str(), f)).collect();

    let mut symbols = Vec::new();
    for path in changed_paths {
        let Some(source) = by_path.get(path) else {
            continue;
        };
        for decl in &source.declarations {
            if !decl.exported() {
                continue;
            }
            let name = decl.name();
            let mut usage_count = 0;
            let mut used_by = Vec::new();
            for other in inventory {
                if other.path == *path {
                    continue;
                }
                let count = count_word(&searchable_text(other), name);
                if count > 0 {
                    usage_count += count;
                    used_by.push(other.path.clone());
                }
            }
            symbols.push(ExportedSymbol {
                name: name.to_string(),
                kind: refine_kind(decl, path),
                file: (*path).to_string(),
                usage_count,
                used_by,
            });
        }
    }
    symbols
}

fn searchable_text(file: &SourceFile) -> String {
    let mut text = String::new();
    for import in &file.imports {
        text.push_str(import);
        text.push('\n');
    }
    for decl in &file.declarations {
        text.push_str(decl.name());
        text.push('\n');
        if let Declaration::Variable { initializer, .. } = decl {
            text.push_str(initializer);
            text.push('\n');
        }
    }
    text
}
