//! Detection of privacy-sensitive data in log statements.

use lazy_static::lazy_static;
use regex::Regex;

use super::{Finding, RuleId};

lazy_static! {
    /// A `console.log(` or `logger.<level>(` call whose argument list, up to the
    /// first closing paren, mentions a sensitive field. Names fold ASCII case only.
    static ref SENSITIVE_LOG: Regex = Regex::new(
        r"(?i-u:console\.log|logger\.[a-z]+)\s*\([^)]*(?i-u:email|password|token|ssn|social|address|phone|req\.body|user)"
    ).unwrap();
}

/// Scan text for logging calls that include sensitive fields.
pub fn detect_privacy_logs(code: &str) -> Vec<Finding> {
    let mut findings = Vec::new();

    if SENSITIVE_LOG.is_match(code) {
        findings.push(Finding::for_rule(RuleId::PrivacyLogs));
    }

    findings
}
