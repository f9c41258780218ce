//! Detection of risky Supabase client usage.
//!
//! Both rules only fire when the text looks like it talks to Supabase at all,
//! so generic secret-looking code is left to the secrets rule.

use lazy_static::lazy_static;
use regex::Regex;

use super::{Finding, RuleId};

lazy_static! {
    static ref SUPABASE_DOMAIN: Regex = Regex::new(r"supabase\.co").unwrap();
    static ref USERS_TABLE: Regex = Regex::new(r#"from\(["']users["']\)"#).unwrap();

    // ASCII-only case folding: `ſ` and the Kelvin sign do not stand in for `s` and `k`.
    static ref SERVICE_ROLE: Regex = Regex::new(r"(?i-u)service_role").unwrap();
    static ref SERVICE_ROLE_KEY: Regex = Regex::new(r"SERVICE_ROLE_KEY").unwrap();
    static ref ANON_OR_SERVICE_ROLE: Regex = Regex::new(r"(?i-u)anon|service_role").unwrap();

    /// `.from("<table>") . insert ( req.body`, tolerant of whitespace and line breaks.
    static ref INSERT_REQ_BODY: Regex = Regex::new(
        r#"(?i-u:\.from)\(["'][^"']+["']\)\s*\.\s*(?i-u:insert)\s*\(\s*(?i-u:req\.body)"#
    ).unwrap();
}

/// Whether the text appears to use the Supabase client.
pub fn uses_supabase(code: &str) -> bool {
    SUPABASE_DOMAIN.is_match(code) || USERS_TABLE.is_match(code)
}

/// Whether the text carries a service-role key indicator.
///
/// The three checks overlap; they are kept as separate conditions so the
/// rule matches exactly the same inputs regardless of which one is hit.
pub fn has_service_role(code: &str) -> bool {
    SERVICE_ROLE.is_match(code)
        || SERVICE_ROLE_KEY.is_match(code)
        || ANON_OR_SERVICE_ROLE.is_match(code)
}

/// Scan text for a service-role key used alongside the Supabase client.
pub fn detect_supabase_service_role(code: &str) -> Vec<Finding> {
    let mut findings = Vec::new();

    if uses_supabase(code) && has_service_role(code) {
        findings.push(Finding::for_rule(RuleId::SupabaseServiceRole));
    }

    findings
}

/// Scan text for raw `req.body` inserted straight into a Supabase table.
pub fn detect_supabase_broad_insert(code: &str) -> Vec<Finding> {
    let mut findings = Vec::new();

    if uses_supabase(code) && INSERT_REQ_BODY.is_match(code) {
        findings.push(Finding::for_rule(RuleId::SupabaseBroadInsert));
    }

    findings
}
