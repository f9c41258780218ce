//! Level aggregation and result summarization.
//!
//! Turns the flat list of findings into an overall level, a one-line summary,
//! and the single finding that should drive remediation.

use crate::detect::{Finding, Severity};

/// Summary used when no rule fired.
pub const NO_FINDINGS_SUMMARY: &str = "VibeLevel: chill. No obvious hard-coded secrets, risky Supabase usage, or privacy-unfriendly logs were detected.";

/// Reduce findings to an overall level.
///
/// `cursed` beats `sus` beats `chill`. No weighting, no counting.
pub fn compute_level(findings: &[Finding]) -> Severity {
    if findings.is_empty() {
        return Severity::Chill;
    }
    if findings.iter().any(|f| f.severity == Severity::Cursed) {
        return Severity::Cursed;
    }
    if findings.iter().any(|f| f.severity == Severity::Sus) {
        return Severity::Sus;
    }
    Severity::Chill
}

/// Render a one-line description of the level and the findings that fired.
pub fn build_summary(level: Severity, findings: &[Finding]) -> String {
    if findings.is_empty() {
        return NO_FINDINGS_SUMMARY.to_string();
    }

    let labels: Vec<&str> = findings.iter().map(|f| f.id.as_str()).collect();
    format!("VibeLevel: {}. Found: {}.", level, labels.join(", "))
}

/// Pick the most severe finding.
///
/// Uses a stable sort, so equal severities resolve to the earliest finding.
pub fn pick_top_finding(findings: &[Finding]) -> Option<Finding> {
    let mut ranked: Vec<&Finding> = findings.iter().collect();
    ranked.sort_by(|a, b| b.severity.rank().cmp(&a.severity.rank()));
    ranked.first().map(|f| (*f).clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::RuleId;

    fn finding(rule: RuleId) -> Finding {
        Finding::for_rule(rule)
    }

    fn with_severity(id: &str, severity: Severity) -> Finding {
        Finding {
            id: id.to_string(),
            severity,
            ..Finding::for_rule(RuleId::PrivacyLogs)
        }
    }

    #[test]
    fn test_level_empty_is_chill() {
        assert_eq!(compute_level(&[]), Severity::Chill);
    }

    #[test]
    fn test_level_cursed_wins() {
        let findings = vec![
            finding(RuleId::PrivacyLogs),
            finding(RuleId::SupabaseBroadInsert),
            finding(RuleId::SpookySecrets),
        ];
        assert_eq!(compute_level(&findings), Severity::Cursed);
    }

    #[test]
    fn test_level_only_sus() {
        let findings = vec![finding(RuleId::SupabaseBroadInsert), finding(RuleId::PrivacyLogs)];
        assert_eq!(compute_level(&findings), Severity::Sus);
    }

    #[test]
    fn test_level_only_chill_findings() {
        let findings = vec![with_severity("Note", Severity::Chill)];
        assert_eq!(compute_level(&findings), Severity::Chill);
    }

    #[test]
    fn test_summary_without_findings() {
        assert_eq!(build_summary(Severity::Chill, &[]), NO_FINDINGS_SUMMARY);
    }

    #[test]
    fn test_summary_lists_ids_in_order() {
        let findings = vec![finding(RuleId::SpookySecrets), finding(RuleId::PrivacyLogs)];
        assert_eq!(
            build_summary(Severity::Cursed, &findings),
            "VibeLevel: cursed. Found: SpookySecrets, PrivacyLogs."
        );
    }

    #[test]
    fn test_summary_uses_ids_not_titles() {
        let findings = vec![with_severity("Custom", Severity::Sus)];
        assert_eq!(build_summary(Severity::Sus, &findings), "VibeLevel: sus. Found: Custom.");
    }

    #[test]
    fn test_top_finding_empty() {
        assert!(pick_top_finding(&[]).is_none());
    }

    #[test]
    fn test_top_finding_highest_severity() {
        let findings = vec![finding(RuleId::PrivacyLogs), finding(RuleId::SupabaseServiceRole)];
        let top = pick_top_finding(&findings).unwrap();
        assert_eq!(top.rule_id, RuleId::SupabaseServiceRole);
    }

    #[test]
    fn test_top_finding_tie_goes_to_earliest() {
        let findings = vec![
            finding(RuleId::SpookySecrets),
            finding(RuleId::SupabaseServiceRole),
            finding(RuleId::SupabaseBroadInsert),
        ];
        let top = pick_top_finding(&findings).unwrap();
        assert_eq!(top.rule_id, RuleId::SpookySecrets);

        let findings = vec![
            with_severity("first", Severity::Sus),
            with_severity("second", Severity::Sus),
            with_severity("third", Severity::Chill),
        ];
        assert_eq!(pick_top_finding(&findings).unwrap().id, "first");
    }

    #[test]
    fn test_top_finding_does_not_reorder_input() {
        let findings = vec![finding(RuleId::PrivacyLogs), finding(RuleId::SpookySecrets)];
        let _ = pick_top_finding(&findings);
        assert_eq!(findings[0].rule_id, RuleId::PrivacyLogs);
    }
}
