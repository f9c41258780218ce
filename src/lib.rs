//! vibecheck - a quick vibe check for code snippets.
//!
//! Scans source text for a small set of security and privacy anti-patterns
//! (hard-coded secrets, risky Supabase client usage, sensitive data in logs),
//! classifies it as `chill`, `sus`, or `cursed`, and hands back a prompt that
//! asks a code-fixing assistant to repair the most severe finding.
//!
//! Detection is plain pattern matching over the raw text. Nothing is parsed,
//! so partial or broken snippets are fine, and false positives are expected.
//!
//! # Architecture
//!
//! - `detect`: rule detectors and the [`Engine`] that runs them
//! - `score`: level aggregation, summary, top-finding selection
//! - `prompts`: remediation prompt templates
//! - `config`: YAML config for the CLI
//! - `scan`: file discovery and parallel analysis
//! - `report`: output formatting (pretty, JSON, SARIF)
//!
//! # Example
//!
//! ```
//! let code = r#"console.log("user email:", email)"#;
//! let result = vibecheck::analyze(code);
//! assert_eq!(result.level, vibecheck::Severity::Sus);
//!
//! let rule = result.top_finding.as_ref().unwrap().rule_id;
//! let prompt = vibecheck::prompts::render(vibecheck::prompt_for(rule.as_str()), code);
//! assert!(prompt.ends_with(code));
//! ```

pub mod cli;
pub mod config;
pub mod detect;
pub mod prompts;
pub mod report;
pub mod scan;
pub mod score;

use once_cell::sync::Lazy;

pub use config::{Config, ConfigError};
pub use detect::{AnalysisResult, Detector, Engine, Finding, RuleId, Severity};

/// Engine with the built-in rules, built on first use.
static DEFAULT_ENGINE: Lazy<Engine> = Lazy::new(Engine::new);

/// The shared default engine.
pub fn engine() -> &'static Engine {
    &DEFAULT_ENGINE
}

/// Analyze text with the built-in rules.
pub fn analyze(code: &str) -> AnalysisResult {
    DEFAULT_ENGINE.analyze(code)
}

/// Remediation template for a rule identifier.
///
/// Unknown identifiers get the generic template.
pub fn prompt_for(rule_id: &str) -> &'static str {
    DEFAULT_ENGINE.prompt_for(rule_id)
}
