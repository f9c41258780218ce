//! Detection of hard-coded secrets.
//!
//! Two independent signals, either one is enough to fire:
//! - a secret-ish name anywhere in the text (`password`, `api_key`, `token`, ...)
//! - a quoted literal of 32+ key-like characters
//!
//! Literal values are never inspected beyond the quoted-run heuristic, so this
//! rule is deliberately loud.

use lazy_static::lazy_static;
use regex::Regex;

use super::{Finding, RuleId};

lazy_static! {
    /// Names that usually sit next to a credential. Case folding is ASCII-only.
    static ref SECRET_NAME: Regex = Regex::new(
        r"(?i-u)(service_role|api[_-]?key|secret|token|password|passwd|client_secret|private[_-]?key)"
    ).unwrap();

    /// A quoted run that looks like an embedded key or token value.
    static ref LONG_KEY_LITERAL: Regex = Regex::new(
        r#"['"`][A-Za-z0-9+/_=-]{32,}['"`]"#
    ).unwrap();
}

/// Scan text for hard-coded secrets.
pub fn detect_spooky_secrets(code: &str) -> Vec<Finding> {
    let mut findings = Vec::new();

    if SECRET_NAME.is_match(code) || LONG_KEY_LITERAL.is_match(code) {
        findings.push(Finding::for_rule(RuleId::SpookySecrets));
    }

    findings
}
