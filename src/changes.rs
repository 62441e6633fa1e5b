//! Changed-file extraction.
//!
//! Resolves the changed set through a fallback cascade (working tree first,
//! then the configured base ref), computes per-file stats and hunks through a
//! similar cascade, and classifies each file's role and module category.
//! Every stage runs at most once; a failed git call degrades one file's
//! contribution to zero hunks/zero stats and never aborts the run.

use crate::model::{ChangedFile, DiffHunk, FileStatus, FileType, HunkKind};
use crate::util::{normalize_path, summarize};
use crate::vcs::{DiffTarget, Vcs};
use serde::Serialize;
use std::path::Path;

/// Which cascade stage produced the changed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeSource {
    Worktree,
    BaseRef,
    Empty,
}

#[derive(Debug, Serialize)]
pub struct ChangeSet {
    pub source: ChangeSource,
    pub files: Vec<ChangedFile>,
}

/// Resolve the changed-file set for the analysis root.
///
/// Stage 1 takes uncommitted working-tree changes (staged, unstaged and
/// untracked); stage 2 diffs `base_ref..HEAD` only when stage 1 is empty.
/// An invalid base ref yields an empty set, never an error.
pub fn extract_changes(vcs: &dyn Vcs, analysis_root: &Path, base_ref: &str) -> ChangeSet {
    let prefix = rebase_prefix(vcs, analysis_root);

    // Keep the repo-relative path for git pathspecs next to the rebased one.
    let worktree: Vec<(FileStatus, String, String)> = vcs
        .status_porcelain()
        .map(|text| parse_status_porcelain(&text))
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(status, path)| rebase(&prefix, &path).map(|p| (status, path, p)))
        .collect();

    let (source, mut entries) = if !worktree.is_empty() {
        (ChangeSource::Worktree, worktree)
    } else {
        let against_base: Vec<(FileStatus, String, String)> = vcs
            .diff_name_status(base_ref, "HEAD")
            .map(|text| parse_name_status(&text))
            .unwrap_or_default()
            .into_iter()
            .filter_map(|(status, path)| rebase(&prefix, &path).map(|p| (status, path, p)))
            .collect();
        if against_base.is_empty() {
            (ChangeSource::Empty, Vec::new())
        } else {
            (ChangeSource::BaseRef, against_base)
        }
    };

    entries.sort_by(|a, b| a.2.cmp(&b.2));
    entries.dedup_by(|a, b| a.2 == b.2);

    let targets = cascade_targets(source, base_ref);
    let files = entries
        .into_iter()
        .map(|(status, repo_path, path)| {
            let (additions, deletions) = file_stats(vcs, &targets, &repo_path);
            let hunks = file_hunks(vcs, &targets, &repo_path);
            let file_type = classify_file_type(&path);
            let module = module_category(&path);
            ChangedFile {
                path,
                status,
                additions,
                deletions,
                hunks,
                file_type,
                module,
            }
        })
        .collect();

    ChangeSet { source, files }
}

/// Per-file diff targets tried in order, first stage with output wins.
fn cascade_targets(source: ChangeSource, base_ref: &str) -> Vec<DiffTarget> {
    match source {
        ChangeSource::Worktree => vec![
            DiffTarget::Worktree,
            DiffTarget::Cached,
            DiffTarget::LastCommit,
        ],
        ChangeSource::BaseRef => vec![DiffTarget::Range {
            base: base_ref.to_string(),
            head: "HEAD".to_string(),
        }],
        ChangeSource::Empty => Vec::new(),
    }
}

fn file_stats(vcs: &dyn Vcs, targets: &[DiffTarget], path: &str) -> (u32, u32) {
    for target in targets {
        if let Ok(text) = vcs.diff_numstat(target, path) {
            if let Some(stats) = parse_numstat(&text) {
                return stats;
            }
        }
    }
    (0, 0)
}

fn file_hunks(vcs: &dyn Vcs, targets: &[DiffTarget], path: &str) -> Vec<DiffHunk> {
    for target in targets {
        if let Ok(text) = vcs.diff_unified(target, path) {
            let hunks = parse_unified_hunks(&text);
            if !hunks.is_empty() {
                return hunks;
            }
        }
    }
    Vec::new()
}

/// Path prefix the VCS prepends relative to the analysis root, without a
/// trailing slash. Empty when the analysis root is the repository root or
/// the root cannot be determined.
fn rebase_prefix(vcs: &dyn Vcs, analysis_root: &Path) -> String {
    let Some(repo_root) = vcs.repo_root() else {
        return String::new();
    };
    let canonical = analysis_root
        .canonicalize()
        .unwrap_or_else(|_| analysis_root.to_path_buf());
    match canonical.strip_prefix(&repo_root) {
        Ok(rel) => {
            let norm = normalize_path(rel);
            if norm == "." { String::new() } else { norm }
        }
        Err(_) => String::new(),
    }
}

/// Rebase a repo-root-relative path onto the analysis root. Files outside
/// the analysis subtree are dropped.
fn rebase(prefix: &str, path: &str) -> Option<String> {
    if prefix.is_empty() {
        return Some(path.to_string());
    }
    path.strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('/'))
        .map(|rest| rest.to_string())
}

/// Parse `git status --porcelain` output into `(status, path)` pairs.
pub fn parse_status_porcelain(text: &str) -> Vec<(FileStatus, String)> {
    let mut entries = Vec::new();
    for line in text.lines() {
        if line.len() < 4 {
            continue;
        }
        let (code, rest) = line.split_at(2);
        let path = rest.trim_start();
        if path.is_empty() {
            continue;
        }
        let status = porcelain_status(code);
        let path = match status {
            // `R old -> new`: analyze the new path, the old one is gone.
            FileStatus::Renamed => match path.split_once(" -> ") {
                Some((_, new)) => new,
                None => path,
            },
            _ => path,
        };
        entries.push((status, unquote(path)));
    }
    entries
}

fn porcelain_status(code: &str) -> FileStatus {
    let mut chars = code.chars();
    let index = chars.next().unwrap_or(' ');
    let worktree = chars.next().unwrap_or(' ');
    let significant = if index != ' ' && index != '?' {
        index
    } else {
        worktree
    };
    match (index, significant) {
        ('?', _) => FileStatus::Added,
        (_, 'A') => FileStatus::Added,
        (_, 'D') => FileStatus::Deleted,
        (_, 'R') => FileStatus::Renamed,
        (_, 'C') => FileStatus::Added,
        _ => FileStatus::Modified,
    }
}

/// Parse `git diff --name-status` output.
pub fn parse_name_status(text: &str) -> Vec<(FileStatus, String)> {
    let mut entries = Vec::new();
    for line in text.lines() {
        let mut parts = line.split('\t');
        let Some(code) = parts.next() else { continue };
        let status = match code.chars().next() {
            Some('A') => FileStatus::Added,
            Some('D') => FileStatus::Deleted,
            Some('R') => FileStatus::Renamed,
            Some('C') => FileStatus::Added,
            Some('M' | 'T') => FileStatus::Modified,
            _ => continue,
        };
        // Renames and copies list `old\tnew`; take the last path.
        let Some(path) = parts.last() else { continue };
        if path.is_empty() {
            continue;
        }
        entries.push((status, unquote(path)));
    }
    entries
}

/// Parse the first line of `git diff --numstat` output for one file.
/// Binary files report `-` and degrade to zero.
pub fn parse_numstat(text: &str) -> Option<(u32, u32)> {
    let line = text.lines().next()?;
    let mut parts = line.split('\t');
    let additions = parts.next()?.parse().unwrap_or(0);
    let deletions = parts.next()?.parse().unwrap_or(0);
    Some((additions, deletions))
}

/// Parse every hunk of a unified diff.
pub fn parse_unified_hunks(diff: &str) -> Vec<DiffHunk> {
    struct Open {
        header: (u32, u32, u32, u32),
        plus: u32,
        minus: u32,
        changed: Vec<String>,
    }

    fn close(open: Open) -> DiffHunk {
        let kind = if open.plus > 0 && open.minus == 0 {
            HunkKind::Add
        } else if open.minus > 0 && open.plus == 0 {
            HunkKind::Remove
        } else {
            HunkKind::Modify
        };
        let (old_start, old_lines, new_start, new_lines) = open.header;
        DiffHunk {
            old_start,
            old_lines,
            new_start,
            new_lines,
            kind,
            content: summarize(&open.changed.join(" ")),
        }
    }

    let mut hunks = Vec::new();
    let mut current: Option<Open> = None;

    for line in diff.lines() {
        if line.starts_with("@@") {
            if let Some(open) = current.take() {
                hunks.push(close(open));
            }
            current = parse_hunk_header(line).map(|header| Open {
                header,
                plus: 0,
                minus: 0,
                changed: Vec::new(),
            });
            continue;
        }
        if line.starts_with("diff ") || line.starts_with("index ") {
            if let Some(open) = current.take() {
                hunks.push(close(open));
            }
            continue;
        }
        let Some(open) = current.as_mut() else { continue };
        if let Some(added) = line.strip_prefix('+') {
            if !line.starts_with("+++") {
                open.plus += 1;
                open.changed.push(added.to_string());
            }
        } else if let Some(removed) = line.strip_prefix('-') {
            if !line.starts_with("---") {
                open.minus += 1;
                open.changed.push(removed.to_string());
            }
        }
    }
    if let Some(open) = current.take() {
        hunks.push(close(open));
    }

    hunks
}

/// Parse `@@ -old_start[,old_lines] +new_start[,new_lines] @@`; omitted
/// counts default to 1.
pub fn parse_hunk_header(line: &str) -> Option<(u32, u32, u32, u32)> {
    let rest = line.strip_prefix("@@ ")?;
    let end = rest.find(" @@")?;
    let mut parts = rest[..end].split_whitespace();
    let old = parts.next()?.strip_prefix('-')?;
    let new = parts.next()?.strip_prefix('+')?;
    let (old_start, old_lines) = parse_range(old)?;
    let (new_start, new_lines) = parse_range(new)?;
    Some((old_start, old_lines, new_start, new_lines))
}

fn parse_range(text: &str) -> Option<(u32, u32)> {
    match text.split_once(',') {
        Some((start, lines)) => Some((start.parse().ok()?, lines.parse().ok()?)),
        None => Some((text.parse().ok()?, 1)),
    }
}

fn unquote(path: &str) -> String {
    // Porcelain quotes paths containing special characters.
    path.trim_matches('"').to_string()
}

/// True for paths that look like test files.
pub fn is_test_path(path: &str) -> bool {
    let lower = path.to_lowercase();
    lower.contains("/test/")
        || lower.contains("/tests/")
        || lower.contains("/__tests__/")
        || lower.contains("/spec/")
        || lower.contains(".test.")
        || lower.contains(".spec.")
        || lower.contains("_test.")
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

fn file_name(path: &str) -> &str {
    segments(path).last().unwrap_or(path)
}

fn extension(path: &str) -> &str {
    file_name(path).rsplit_once('.').map_or("", |(_, ext)| ext)
}

/// Classify a file's role from its path.
pub fn classify_file_type(path: &str) -> FileType {
    if is_test_path(path) {
        return FileType::Test;
    }

    let name = file_name(path);
    let lower_name = name.to_lowercase();

    match extension(path) {
        "css" | "scss" | "sass" | "less" | "styl" => return FileType::Style,
        _ => {}
    }
    if name.ends_with(".d.ts") || lower_name == "types.ts" || lower_name.ends_with(".types.ts") {
        return FileType::Type;
    }

    for segment in segments(path) {
        match segment {
            "api" | "services" => return FileType::Api,
            "store" | "stores" | "vuex" | "pinia" | "redux" => return FileType::Store,
            "hooks" | "composables" => return FileType::Hook,
            "pages" | "views" => return FileType::Page,
            "components" => return FileType::Component,
            "types" => return FileType::Type,
            "utils" | "util" | "lib" | "helpers" => return FileType::Util,
            "config" => return FileType::Config,
            _ => {}
        }
    }

    if extension(path) == "vue" {
        return FileType::Component;
    }
    if starts_like_hook(name) {
        return FileType::Hook;
    }
    if lower_name.contains("config") {
        return FileType::Config;
    }
    FileType::Other
}

fn starts_like_hook(name: &str) -> bool {
    let stem = name.split('.').next().unwrap_or(name);
    let mut chars = stem.chars();
    chars.next() == Some('u')
        && chars.next() == Some('s')
        && chars.next() == Some('e')
        && chars.next().is_some_and(|c| c.is_ascii_uppercase())
}

/// Module-category grouping key: the first path segment under `src/`.
pub fn module_category(path: &str) -> String {
    let mut parts: Vec<&str> = segments(path).collect();
    // The last segment is the file name.
    parts.pop();
    if parts.first() == Some(&"src") {
        parts.remove(0);
    }
    parts.first().copied().unwrap_or("root").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, bail};
    use std::cell::RefCell;
    use std::path::PathBuf;

    #[test]
    fn hunk_header_with_counts() {
        assert_eq!(parse_hunk_header("@@ -10,3 +10,5 @@"), Some((10, 3, 10, 5)));
        assert_eq!(
            parse_hunk_header("@@ -1,7 +1,9 @@ fn context()"),
            Some((1, 7, 1, 9))
        );
    }

    #[test]
    fn hunk_header_omitted_counts_default_to_one() {
        assert_eq!(parse_hunk_header("@@ -3 +4 @@"), Some((3, 1, 4, 1)));
        assert_eq!(parse_hunk_header("@@ -0,0 +1 @@"), Some((0, 0, 1, 1)));
    }

    #[test]
    fn hunk_header_rejects_garbage() {
        assert_eq!(parse_hunk_header("@@ bogus @@"), None);
        assert_eq!(parse_hunk_header("+++ b/foo.ts"), None);
    }

    #[test]
    fn unified_diff_classification() {
        let diff = "\
diff --git a/src/a.ts b/src/a.ts
index 123..456 100644
--- a/src/a.ts
+++ b/src/a.ts
@@ -1,3 +1,4 @@
 context
+added line
 context
 context
@@ -10,4 +11,3 @@
 context
-removed line
 context
 context
@@ -20,3 +20,3 @@
 context
-old line
+new line
 context
";
        let hunks = parse_unified_hunks(diff);
        assert_eq!(hunks.len(), 3);
        assert_eq!(hunks[0].kind, HunkKind::Add);
        assert_eq!(hunks[0].new_start, 1);
        assert_eq!(hunks[0].new_lines, 4);
        assert_eq!(hunks[0].content, "added line");
        assert_eq!(hunks[1].kind, HunkKind::Remove);
        assert_eq!(hunks[2].kind, HunkKind::Modify);
        assert_eq!(hunks[2].content, "old line new line");
    }

    #[test]
    fn porcelain_parsing() {
        let text = "\
 M src/api/user.ts
A  src/store/cart.ts
 D src/old.ts
?? src/new.ts
R  src/a.ts -> src/b.ts
";
        let entries = parse_status_porcelain(text);
        assert_eq!(entries.len(), 5);
        assert_eq!(entries[0], (FileStatus::Modified, "src/api/user.ts".to_string()));
        assert_eq!(entries[1], (FileStatus::Added, "src/store/cart.ts".to_string()));
        assert_eq!(entries[2], (FileStatus::Deleted, "src/old.ts".to_string()));
        assert_eq!(entries[3], (FileStatus::Added, "src/new.ts".to_string()));
        assert_eq!(entries[4], (FileStatus::Renamed, "src/b.ts".to_string()));
    }

    #[test]
    fn name_status_parsing() {
        let text = "M\tsrc/api/user.ts\nA\tsrc/new.ts\nR087\tsrc/a.ts\tsrc/b.ts\nD\tsrc/old.ts\n";
        let entries = parse_name_status(text);
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[2], (FileStatus::Renamed, "src/b.ts".to_string()));
        assert_eq!(entries[3], (FileStatus::Deleted, "src/old.ts".to_string()));
    }

    #[test]
    fn numstat_parsing() {
        assert_eq!(parse_numstat("40\t5\tsrc/api/user.ts\n"), Some((40, 5)));
        assert_eq!(parse_numstat("-\t-\tassets/logo.png\n"), Some((0, 0)));
        assert_eq!(parse_numstat(""), None);
    }

    #[test]
    fn file_type_classification() {
        assert_eq!(classify_file_type("src/api/user.ts"), FileType::Api);
        assert_eq!(classify_file_type("src/store/cart.ts"), FileType::Store);
        assert_eq!(classify_file_type("src/hooks/useCart.ts"), FileType::Hook);
        assert_eq!(classify_file_type("src/useFetch.ts"), FileType::Hook);
        assert_eq!(classify_file_type("src/pages/home/index.vue"), FileType::Page);
        assert_eq!(classify_file_type("src/components/Banner.vue"), FileType::Component);
        assert_eq!(classify_file_type("src/Widget.vue"), FileType::Component);
        assert_eq!(classify_file_type("src/utils/format.ts"), FileType::Util);
        assert_eq!(classify_file_type("src/types/order.ts"), FileType::Type);
        assert_eq!(classify_file_type("src/global.d.ts"), FileType::Type);
        assert_eq!(classify_file_type("src/styles/main.scss"), FileType::Style);
        assert_eq!(classify_file_type("src/api/user.test.ts"), FileType::Test);
        assert_eq!(classify_file_type("vite.config.ts"), FileType::Config);
        assert_eq!(classify_file_type("src/main.ts"), FileType::Other);
    }

    #[test]
    fn module_category_strips_src() {
        assert_eq!(module_category("src/api/user.ts"), "api");
        assert_eq!(module_category("src/store/modules/cart.ts"), "store");
        assert_eq!(module_category("packages/common/http.ts"), "packages");
        assert_eq!(module_category("src/main.ts"), "root");
        assert_eq!(module_category("README.md"), "root");
    }

    /// Scripted fake VCS for cascade-order tests.
    struct FakeVcs {
        status: Result<String, ()>,
        name_status: Result<String, ()>,
        numstat: Vec<(DiffTarget, String)>,
        unified: Vec<(DiffTarget, String)>,
        numstat_calls: RefCell<Vec<DiffTarget>>,
    }

    impl FakeVcs {
        fn new() -> Self {
            FakeVcs {
                status: Ok(String::new()),
                name_status: Ok(String::new()),
                numstat: Vec::new(),
                unified: Vec::new(),
                numstat_calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl Vcs for FakeVcs {
        fn repo_root(&self) -> Option<PathBuf> {
            None
        }
        fn current_branch(&self) -> Option<String> {
            None
        }
        fn head_commit(&self) -> Option<(String, String)> {
            None
        }
        fn status_porcelain(&self) -> Result<String> {
            match &self.status {
                Ok(text) => Ok(text.clone()),
                Err(_) => bail!("status unavailable"),
            }
        }
        fn diff_name_status(&self, _base: &str, _head: &str) -> Result<String> {
            match &self.name_status {
                Ok(text) => Ok(text.clone()),
                Err(_) => bail!("bad ref"),
            }
        }
        fn diff_numstat(&self, target: &DiffTarget, _path: &str) -> Result<String> {
            self.numstat_calls.borrow_mut().push(target.clone());
            match self.numstat.iter().find(|(t, _)| t == target) {
                Some((_, text)) => Ok(text.clone()),
                None => bail!("no numstat"),
            }
        }
        fn diff_unified(&self, target: &DiffTarget, _path: &str) -> Result<String> {
            match self.unified.iter().find(|(t, _)| t == target) {
                Some((_, text)) => Ok(text.clone()),
                None => bail!("no diff"),
            }
        }
    }

    #[test]
    fn worktree_stage_wins_when_dirty() {
        let mut vcs = FakeVcs::new();
        vcs.status = Ok(" M src/api/user.ts\n".to_string());
        vcs.name_status = Ok("M\tsrc/ignored.ts\n".to_string());
        vcs.numstat = vec![(DiffTarget::Worktree, "4\t1\tsrc/api/user.ts\n".to_string())];

        let set = extract_changes(&vcs, Path::new("."), "HEAD~1");
        assert_eq!(set.source, ChangeSource::Worktree);
        assert_eq!(set.files.len(), 1);
        assert_eq!(set.files[0].path, "src/api/user.ts");
        assert_eq!(set.files[0].additions, 4);
        assert_eq!(set.files[0].deletions, 1);
    }

    #[test]
    fn base_ref_stage_fires_when_clean() {
        let mut vcs = FakeVcs::new();
        vcs.name_status = Ok("M\tsrc/store/cart.ts\n".to_string());
        vcs.numstat = vec![(
            DiffTarget::Range {
                base: "HEAD~1".to_string(),
                head: "HEAD".to_string(),
            },
            "7\t2\tsrc/store/cart.ts\n".to_string(),
        )];

        let set = extract_changes(&vcs, Path::new("."), "HEAD~1");
        assert_eq!(set.source, ChangeSource::BaseRef);
        assert_eq!(set.files.len(), 1);
        assert_eq!(set.files[0].additions, 7);
        assert_eq!(set.files[0].file_type, FileType::Store);
    }

    #[test]
    fn numstat_cascade_falls_through_to_cached() {
        let mut vcs = FakeVcs::new();
        vcs.status = Ok("A  src/new.ts\n".to_string());
        // Worktree numstat empty (staged-only change), cached has it.
        vcs.numstat = vec![
            (DiffTarget::Worktree, String::new()),
            (DiffTarget::Cached, "12\t0\tsrc/new.ts\n".to_string()),
        ];

        let set = extract_changes(&vcs, Path::new("."), "HEAD~1");
        assert_eq!(set.files[0].additions, 12);
        let calls = vcs.numstat_calls.borrow();
        assert_eq!(calls[0], DiffTarget::Worktree);
        assert_eq!(calls[1], DiffTarget::Cached);
    }

    #[test]
    fn invalid_base_ref_degrades_to_empty() {
        let mut vcs = FakeVcs::new();
        vcs.name_status = Err(());

        let set = extract_changes(&vcs, Path::new("."), "not-a-ref");
        assert_eq!(set.source, ChangeSource::Empty);
        assert!(set.files.is_empty());
    }

    #[test]
    fn vcs_failure_degrades_file_to_zero() {
        let mut vcs = FakeVcs::new();
        vcs.status = Ok(" M src/a.ts\n".to_string());
        // No numstat or unified responses configured at all.

        let set = extract_changes(&vcs, Path::new("."), "HEAD~1");
        assert_eq!(set.files.len(), 1);
        assert_eq!(set.files[0].additions, 0);
        assert_eq!(set.files[0].deletions, 0);
        assert!(set.files[0].hunks.is_empty());
    }
}
