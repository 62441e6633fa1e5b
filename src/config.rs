// Analyzer configuration.
// Defaults overridable from environment variables; constructed per run.

use std::env;

/// Per-run analysis configuration.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Baseline ref for the diff when the working tree is clean (RIPPLE_BASE_REF).
    pub base_ref: String,

    /// Maximum BFS hop-count for transitive propagation (RIPPLE_MAX_DEPTH).
    pub max_depth: usize,

    /// Continue past the first dependent hop (RIPPLE_INCLUDE_TRANSITIVE).
    pub include_transitive: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            base_ref: "HEAD~1".to_string(),
            max_depth: 5,
            include_transitive: true,
        }
    }
}

impl AnalyzerConfig {
    /// Load configuration, applying environment overrides on top of defaults.
    pub fn from_env() -> Self {
        let mut config = AnalyzerConfig::default();

        if let Ok(val) = env::var("RIPPLE_BASE_REF") {
            if !val.trim().is_empty() {
                config.base_ref = val.trim().to_string();
            }
        }

        if let Ok(val) = env::var("RIPPLE_MAX_DEPTH") {
            if let Ok(parsed) = val.parse() {
                config.max_depth = parsed;
            } else {
                eprintln!(
                    "ripple: Warning: Invalid RIPPLE_MAX_DEPTH value: {}, using default: {}",
                    val, config.max_depth
                );
            }
        }

        if let Ok(val) = env::var("RIPPLE_INCLUDE_TRANSITIVE") {
            if let Ok(parsed) = val.parse() {
                config.include_transitive = parsed;
            } else {
                eprintln!(
                    "ripple: Warning: Invalid RIPPLE_INCLUDE_TRANSITIVE value: {}, using default: {}",
                    val, config.include_transitive
                );
            }
        }

        config
    }
}
