//! Structured execution trace.
//!
//! The engine performs no ambient progress logging; each pipeline stage
//! records a step here and the whole trace is returned next to the report.

use serde::Serialize;
use std::time::Instant;

#[derive(Debug, Clone, Serialize)]
pub struct TraceStep {
    pub stage: String,
    pub duration_ms: u64,
    pub detail: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AnalysisTrace {
    pub steps: Vec<TraceStep>,
}

impl AnalysisTrace {
    pub fn new() -> Self {
        AnalysisTrace::default()
    }

    /// Record a completed stage measured from `started`.
    pub fn step(&mut self, stage: &str, started: Instant, detail: impl Into<String>) {
        self.steps.push(TraceStep {
            stage: stage.to_string(),
            duration_ms: started.elapsed().as_millis() as u64,
            detail: detail.into(),
        });
    }
}
