//! Analysis engine that runs every detector and assembles the result.

use tracing::debug;

use crate::prompts;
use crate::score::{build_summary, compute_level, pick_top_finding};

use super::{
    detect_privacy_logs, detect_spooky_secrets, detect_supabase_broad_insert,
    detect_supabase_service_role, AnalysisResult, Finding, RuleId,
};

/// Signature every detector implements.
pub type DetectFn = fn(&str) -> Vec<Finding>;

/// A rule paired with the function that detects it.
///
/// Detectors are pure functions of the input text. A regex detector can be
/// swapped for a parser-backed one here without touching aggregation.
#[derive(Clone, Copy)]
pub struct Detector {
    pub rule: RuleId,
    pub detect: DetectFn,
}

impl std::fmt::Debug for Detector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Detector").field("rule", &self.rule).finish()
    }
}

/// Built-in detectors in invocation order.
///
/// The order is observable through `AnalysisResult::findings` and the
/// top-finding tie-break.
pub fn builtin_detectors() -> Vec<Detector> {
    vec![
        Detector {
            rule: RuleId::SpookySecrets,
            detect: detect_spooky_secrets,
        },
        Detector {
            rule: RuleId::SupabaseServiceRole,
            detect: detect_supabase_service_role,
        },
        Detector {
            rule: RuleId::SupabaseBroadInsert,
            detect: detect_supabase_broad_insert,
        },
        Detector {
            rule: RuleId::PrivacyLogs,
            detect: detect_privacy_logs,
        },
    ]
}

/// Immutable rule table plus the analysis entry points.
///
/// Holds no mutable state; one instance can serve any number of threads.
#[derive(Debug, Clone)]
pub struct Engine {
    detectors: Vec<Detector>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Create an engine with the built-in rule set.
    pub fn new() -> Self {
        Self::with_detectors(builtin_detectors())
    }

    /// Create an engine with a custom detector table, run in the given order.
    pub fn with_detectors(detectors: Vec<Detector>) -> Self {
        Self { detectors }
    }

    /// Rules this engine checks, in invocation order.
    pub fn rules(&self) -> impl Iterator<Item = RuleId> + '_ {
        self.detectors.iter().map(|d| d.rule)
    }

    /// Run every detector and concatenate their findings.
    pub fn detect(&self, code: &str) -> Vec<Finding> {
        let mut findings = Vec::new();
        for detector in &self.detectors {
            let found = (detector.detect)(code);
            if !found.is_empty() {
                debug!(rule = %detector.rule, count = found.len(), "rule fired");
            }
            findings.extend(found);
        }
        findings
    }

    /// Classify one piece of text.
    pub fn analyze(&self, code: &str) -> AnalysisResult {
        let findings = self.detect(code);
        let level = compute_level(&findings);
        let summary = build_summary(level, &findings);
        let top_finding = pick_top_finding(&findings);

        debug!(%level, findings = findings.len(), bytes = code.len(), "analysis complete");

        AnalysisResult {
            level,
            findings,
            summary,
            top_finding,
        }
    }

    /// Remediation template for a rule identifier (generic for unknown ids).
    pub fn prompt_for(&self, rule_id: &str) -> &'static str {
        prompts::prompt_for(rule_id)
    }
}
