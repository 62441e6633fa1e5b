//! VCS collaborator contract and the git subprocess implementation.
//!
//! The engine only needs raw text from the VCS (porcelain status, name-status
//! and numstat listings, unified diffs); all parsing lives in `changes`.
//! Every method is allowed to fail — callers degrade the affected file's
//! contribution to empty instead of aborting the run.

use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Which diff a per-file query targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffTarget {
    /// Unstaged working-tree changes.
    Worktree,
    /// Staged (index) changes.
    Cached,
    /// `HEAD~1..HEAD`.
    LastCommit,
    /// An explicit `base..head` range.
    Range { base: String, head: String },
}

impl DiffTarget {
    fn args(&self) -> Vec<String> {
        match self {
            DiffTarget::Worktree => Vec::new(),
            DiffTarget::Cached => vec!["--cached".to_string()],
            DiffTarget::LastCommit => vec!["HEAD~1..HEAD".to_string()],
            DiffTarget::Range { base, head } => vec![format!("{base}..{head}")],
        }
    }
}

pub trait Vcs {
    /// Top-level directory of the repository, if inside one.
    fn repo_root(&self) -> Option<PathBuf>;

    fn current_branch(&self) -> Option<String>;

    /// `(sha, subject)` of the current commit.
    fn head_commit(&self) -> Option<(String, String)>;

    /// `git status --porcelain` text.
    fn status_porcelain(&self) -> Result<String>;

    /// `git diff --name-status base..head` text.
    fn diff_name_status(&self, base: &str, head: &str) -> Result<String>;

    /// `git diff --numstat` text for one repo-root-relative path.
    fn diff_numstat(&self, target: &DiffTarget, path: &str) -> Result<String>;

    /// Unified diff with 3 context lines for one repo-root-relative path.
    fn diff_unified(&self, target: &DiffTarget, path: &str) -> Result<String>;
}

/// Real VCS adapter shelling out to `git`.
pub struct GitCli {
    workdir: PathBuf,
}

impl GitCli {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        GitCli {
            workdir: workdir.into(),
        }
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    fn git(&self, args: &[&str]) -> Result<String> {
        let output = Command::new("git")
            .arg("-C")
            .arg(&self.workdir)
            .args(args)
            .output()
            .with_context(|| format!("run git {}", args.join(" ")))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("git {} failed: {}", args.join(" "), stderr.trim());
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Vcs for GitCli {
    fn repo_root(&self) -> Option<PathBuf> {
        let out = self.git(&["rev-parse", "--show-toplevel"]).ok()?;
        let trimmed = out.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(PathBuf::from(trimmed))
        }
    }

    fn current_branch(&self) -> Option<String> {
        let out = self.git(&["rev-parse", "--abbrev-ref", "HEAD"]).ok()?;
        let trimmed = out.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    fn head_commit(&self) -> Option<(String, String)> {
        let out = self.git(&["log", "-1", "--format=%H%x09%s"]).ok()?;
        let line = out.lines().next()?;
        let (sha, subject) = line.split_once('\t')?;
        if sha.is_empty() {
            None
        } else {
            Some((sha.to_string(), subject.to_string()))
        }
    }

    fn status_porcelain(&self) -> Result<String> {
        self.git(&["status", "--porcelain"])
    }

    fn diff_name_status(&self, base: &str, head: &str) -> Result<String> {
        let range = format!("{base}..{head}");
        self.git(&["diff", "--name-status", &range])
    }

    fn diff_numstat(&self, target: &DiffTarget, path: &str) -> Result<String> {
        let mut args = vec!["diff".to_string(), "--numstat".to_string()];
        args.extend(target.args());
        args.push("--".to_string());
        // `:/` pathspec magic anchors the path at the repo root regardless
        // of which directory the command runs in.
        args.push(format!(":/{path}"));
        let refs: Vec<&str> = args.iter().map(String::as_str).collect();
        self.git(&refs)
    }

    fn diff_unified(&self, target: &DiffTarget, path: &str) -> Result<String> {
        let mut args = vec!["diff".to_string(), "-U3".to_string()];
        args.extend(target.args());
        args.push("--".to_string());
        args.push(format!(":/{path}"));
        let refs: Vec<&str> = args.iter().map(String::as_str).collect();
        self.git(&refs)
    }
}
