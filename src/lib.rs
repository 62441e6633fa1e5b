//! Static change-impact analysis for source-code projects.
//!
//! Given a parsed declaration inventory and a version-control diff, ripple
//! answers "what does this change touch, how risky is it, and what should be
//! tested?" The pipeline runs strictly forward:
//!
//! 1. Build forward/reverse module-import graphs from the inventory.
//! 2. Resolve the changed-file set and per-file hunks from the VCS.
//! 3. Map hunks onto declared code entities.
//! 4. Propagate impact over reverse dependencies (BFS).
//! 5. Score files, aggregate risk factors.
//! 6. Emit ranked test and investigation suggestions.
//!
//! The source-file loader and the VCS are external collaborators: the engine
//! consumes `model::SourceFile` records and a `vcs::Vcs` implementation, and
//! returns one `model::AnalysisOutcome` per invocation. No state survives a
//! run.

pub mod changes;
pub mod cli;
pub mod config;
pub mod entities;
pub mod graph;
pub mod impact;
pub mod loader;
pub mod model;
pub mod trace;
pub mod util;
pub mod vcs;

pub use impact::analyze;
