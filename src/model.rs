//! Data model for the change-impact analysis engine.
//!
//! Input types (`SourceFile`, `Declaration`) describe the parsed inventory a
//! collaborator loader supplies; everything else is constructed fresh during
//! one analysis run and serialized into the final `AnalysisOutcome`.

use serde::{Deserialize, Serialize};

/// One parsed source file: import specifiers plus its declaration inventory.
/// Immutable once loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFile {
    /// Path relative to the analysis root, `/`-separated.
    pub path: String,
    #[serde(default)]
    pub imports: Vec<String>,
    #[serde(default)]
    pub declarations: Vec<Declaration>,
}

/// A method inside a class declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodDecl {
    pub name: String,
    pub start_line: u32,
    pub end_line: u32,
}

/// A declared top-level entity, tagged by kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Declaration {
    Function {
        name: String,
        start_line: u32,
        end_line: u32,
        #[serde(default)]
        exported: bool,
    },
    Class {
        name: String,
        start_line: u32,
        end_line: u32,
        #[serde(default)]
        exported: bool,
        #[serde(default)]
        methods: Vec<MethodDecl>,
    },
    Variable {
        name: String,
        start_line: u32,
        end_line: u32,
        #[serde(default)]
        exported: bool,
        /// Initializer text, used for heuristic kind refinement.
        #[serde(default)]
        initializer: String,
    },
    Interface {
        name: String,
        start_line: u32,
        end_line: u32,
        #[serde(default)]
        exported: bool,
    },
    TypeAlias {
        name: String,
        start_line: u32,
        end_line: u32,
        #[serde(default)]
        exported: bool,
    },
    ExportDecl {
        name: String,
        start_line: u32,
        end_line: u32,
    },
}

impl Declaration {
    pub fn name(&self) -> &str {
        match self {
            Declaration::Function { name, .. }
            | Declaration::Class { name, .. }
            | Declaration::Variable { name, .. }
            | Declaration::Interface { name, .. }
            | Declaration::TypeAlias { name, .. }
            | Declaration::ExportDecl { name, .. } => name,
        }
    }

    /// Inclusive line range of the declaration.
    pub fn range(&self) -> (u32, u32) {
        match self {
            Declaration::Function {
                start_line,
                end_line,
                ..
            }
            | Declaration::Class {
                start_line,
                end_line,
                ..
            }
            | Declaration::Variable {
                start_line,
                end_line,
                ..
            }
            | Declaration::Interface {
                start_line,
                end_line,
                ..
            }
            | Declaration::TypeAlias {
                start_line,
                end_line,
                ..
            }
            | Declaration::ExportDecl {
                start_line,
                end_line,
                ..
            } => (*start_line, *end_line),
        }
    }

    pub fn exported(&self) -> bool {
        match self {
            Declaration::Function { exported, .. }
            | Declaration::Class { exported, .. }
            | Declaration::Variable { exported, .. }
            | Declaration::Interface { exported, .. }
            | Declaration::TypeAlias { exported, .. } => *exported,
            // An export declaration is exported by definition.
            Declaration::ExportDecl { .. } => true,
        }
    }
}

/// Classification of a unified-diff hunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HunkKind {
    Add,
    Remove,
    Modify,
}

/// One hunk from a unified diff (`@@ -old_start,old_lines +new_start,new_lines @@`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiffHunk {
    pub old_start: u32,
    pub old_lines: u32,
    pub new_start: u32,
    pub new_lines: u32,
    pub kind: HunkKind,
    /// Whitespace-collapsed summary of the changed lines.
    pub content: String,
}

impl DiffHunk {
    /// True when the inclusive line span intersects this hunk's new-file
    /// range `[new_start, new_start + new_lines)`.
    pub fn overlaps_new_range(&self, start_line: u32, end_line: u32) -> bool {
        if self.new_lines == 0 {
            return false;
        }
        let hunk_end = self.new_start + self.new_lines; // exclusive
        start_line < hunk_end && end_line >= self.new_start
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Added,
    Modified,
    Deleted,
    Renamed,
}

/// Coarse role of a file inside the project, inferred from its path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileType {
    Api,
    Store,
    Config,
    Hook,
    Util,
    Component,
    Page,
    Type,
    Style,
    Test,
    Other,
}

/// One file from the resolved change set.
#[derive(Debug, Clone, Serialize)]
pub struct ChangedFile {
    pub path: String,
    pub status: FileStatus,
    pub additions: u32,
    pub deletions: u32,
    pub hunks: Vec<DiffHunk>,
    pub file_type: FileType,
    /// Module-category grouping key (first path segment under `src/`).
    pub module: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Function,
    Class,
    Variable,
    Interface,
    Type,
    Export,
    Import,
    Component,
    Hook,
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityChange {
    Added,
    Modified,
    Deleted,
}

/// A declared entity touched by at least one hunk of a changed file.
#[derive(Debug, Clone, Serialize)]
pub struct CodeEntity {
    pub kind: EntityKind,
    pub name: String,
    pub start_line: u32,
    pub end_line: u32,
    pub change: EntityChange,
    pub exported: bool,
    /// Owning class name for methods.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

/// An exported symbol of a changed file with heuristic usage evidence.
///
/// `usage_count` and `used_by` come from textual containment over other
/// files' inventories, a conservative over-approximation rather than semantic
/// reference resolution.
#[derive(Debug, Clone, Serialize)]
pub struct ExportedSymbol {
    pub name: String,
    pub kind: EntityKind,
    pub file: String,
    pub usage_count: usize,
    pub used_by: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactLevel {
    Minimal,
    Small,
    Medium,
    Large,
    Critical,
}

/// How many files the change touches directly / indirectly / transitively.
#[derive(Debug, Clone, Serialize)]
pub struct ImpactScope {
    pub direct: usize,
    pub indirect: usize,
    pub transitive: usize,
    pub total: usize,
    pub max_depth: usize,
    pub level: ImpactLevel,
}

impl ImpactScope {
    pub fn empty() -> Self {
        ImpactScope {
            direct: 0,
            indirect: 0,
            transitive: 0,
            total: 0,
            max_depth: 0,
            level: ImpactLevel::Minimal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactType {
    Direct,
    Indirect,
    Transitive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Critical,
    High,
    Medium,
    Low,
    Minimal,
}

/// Module-category group reached by the propagation.
#[derive(Debug, Clone, Serialize)]
pub struct AffectedModule {
    pub name: String,
    pub impact: ImpactType,
    /// Shortest hop-count from any changed file.
    pub depth: usize,
    pub risk: RiskLevel,
}

/// Component or page file reached by the propagation.
#[derive(Debug, Clone, Serialize)]
pub struct AffectedComponent {
    pub path: String,
    pub name: String,
    pub impact: ImpactType,
    pub depth: usize,
}

/// One fired risk condition with its fixed point contribution.
#[derive(Debug, Clone, Serialize)]
pub struct RiskFactor {
    pub name: String,
    pub points: f64,
    pub detail: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RiskAssessment {
    pub overall: RiskLevel,
    /// Clamped to `[0, 100]`.
    pub score: f64,
    pub factors: Vec<RiskFactor>,
    pub mitigations: Vec<String>,
}

impl RiskAssessment {
    pub fn empty() -> Self {
        RiskAssessment {
            overall: RiskLevel::Minimal,
            score: 0.0,
            factors: Vec::new(),
            mitigations: Vec::new(),
        }
    }
}

/// Ordered so that sorting ascending puts the most urgent first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TestKind {
    Smoke,
    Functional,
    Regression,
}

#[derive(Debug, Clone, Serialize)]
pub struct TestSuggestion {
    pub id: String,
    pub kind: TestKind,
    pub priority: Priority,
    pub target: String,
    pub steps: Vec<String>,
    pub expected: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InvestigationKind {
    CodeReview,
    DependencyCheck,
    ApiCompatibility,
    StateManagement,
}

#[derive(Debug, Clone, Serialize)]
pub struct InvestigationSuggestion {
    pub id: String,
    pub kind: InvestigationKind,
    pub priority: Priority,
    pub target: String,
    pub checkpoints: Vec<String>,
}

/// Components grouped into one navigable test path.
#[derive(Debug, Clone, Serialize)]
pub struct TestPath {
    pub route: String,
    pub components: Vec<String>,
    /// 1 if any member is directly changed, 2 if indirect, 3 otherwise.
    pub priority: u8,
}

/// A changed file with its touched entities and final weight.
#[derive(Debug, Clone, Serialize)]
pub struct RankedFile {
    pub file: ChangedFile,
    pub entities: Vec<CodeEntity>,
    /// Reverse-dependency count from the module graph.
    pub dependents: usize,
    /// Summed heuristic usage over this file's exported symbols.
    pub symbol_usage: usize,
    /// Clamped to `[0, 100]`; drives suggestion prioritization.
    pub weight: f64,
}

/// Branch/commit context captured from the VCS, best effort.
#[derive(Debug, Clone, Default, Serialize)]
pub struct VcsContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_subject: Option<String>,
}

/// The single structured result of one analysis run.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub summary: String,
    pub vcs: VcsContext,
    /// Changed files, descending by weight.
    pub files: Vec<RankedFile>,
    pub scope: ImpactScope,
    pub modules: Vec<AffectedModule>,
    pub components: Vec<AffectedComponent>,
    pub exported_symbols: Vec<ExportedSymbol>,
    pub risk: RiskAssessment,
    pub test_paths: Vec<TestPath>,
    pub test_suggestions: Vec<TestSuggestion>,
    pub investigations: Vec<InvestigationSuggestion>,
}

/// Report plus the per-stage execution trace.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisOutcome {
    pub report: AnalysisReport,
    pub trace: crate::trace::AnalysisTrace,
}
