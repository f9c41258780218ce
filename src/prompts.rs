//! Remediation prompt templates.
//!
//! Each rule has a fixed instruction block for a separate code-fixing
//! assistant. The wording is part of the tool's output contract, so the
//! templates are kept verbatim. Every template ends with [`CODE_PLACEHOLDER`].

use crate::detect::{AnalysisResult, RuleId};

/// Marker replaced by the analyzed code when a prompt is rendered.
pub const CODE_PLACEHOLDER: &str = "<PASTE CODE HERE>";

/// Line inserted before the code when a template carries no placeholder.
pub const CODE_SEPARATOR: &str = "\n\nHere is the code to review and fix:\n\n";

const SPOOKY_SECRETS_PROMPT: &str = r#"You are a senior application security engineer.
The code I paste after this message was flagged by my VibeChecker tool as "SpookySecrets" which means it likely contains hard coded secrets, credentials, API keys, tokens, private keys, database passwords, or other sensitive values in source code or logs.

Your job:
1. Identify every SpookySecrets issue and treat any literal credential or sensitive value as unsafe.
2. Refactor the code to remove secrets from source and logs:
   - Use configuration or environment variables or a secrets manager instead of literals.
   - Never print or log secrets or full user sensitive data.
   - Do not invent real values. Use safe placeholders like YOUR_API_KEY or CONFIG.SECRET instead.
   - If the code runs in a browser, avoid exposing privileged keys client side and call out any remaining unavoidable risk.
3. Keep behavior the same apart from making it more secure.
4. Return:
   - The fully fixed code.
   - A short bullet list explaining each change and why it improves secret handling.

Here is the code to review and fix:
<PASTE CODE HERE>"#;

const SUPABASE_SERVICE_ROLE_PROMPT: &str = r#"You are a senior application security engineer.
The code I paste after this message uses a Supabase service_role style key in application code.

Your job:
1. Identify every place where privileged Supabase keys are used in code that could run in a browser or multi-tenant environment.
2. Refactor so:
   - service_role keys only live in server-side config or environment variables.
   - browser and untrusted contexts use anon/public keys only.
   - any remaining privileged calls are wrapped in server-side APIs that perform proper auth and authorization.
3. Keep behavior the same apart from improving security.
4. Return:
   - The fixed code (or pseudo-code if it requires serverless functions or APIs).
   - A short list of changes and why they matter.

Here is the code to review and fix:
<PASTE CODE HERE>"#;

const SUPABASE_BROAD_INSERT_PROMPT: &str = r#"You are a senior application security engineer.
The code I paste after this message performs Supabase inserts or updates using raw req.body data.

Your job:
1. Identify every Supabase query that uses req.body or other unvalidated input directly.
2. Refactor so:
   - Only expected fields are whitelisted and written.
   - Extra or unexpected fields from the client are ignored or rejected.
   - Any per-user data is correctly scoped to the authenticated user.
3. Keep behavior the same apart from making it more robust and secure.
4. Return:
   - The fixed code.
   - A short list of the key validation and authorization checks you added.

Here is the code to review and fix:
<PASTE CODE HERE>"#;

const PRIVACY_LOGS_PROMPT: &str = r#"You are a senior privacy-aware application security engineer.
The code I paste after this message was flagged for logging potentially sensitive or personal data.

Your job:
1. Identify every log statement that includes request bodies, credentials, tokens, or user-identifying fields (email, phone, address, ID numbers, etc).
2. Refactor logging so:
   - Secrets and credentials are never logged.
   - Personal data is minimized, masked, or removed unless strictly necessary for debugging.
   - Logs avoid violating common privacy expectations under GDPR/CCPA/HIPAA and similar rules.
3. Keep behavior the same apart from safer logging.
4. Return:
   - The fixed code.
   - A short list of what you stopped logging or masked and why.

Here is the code to review and fix:
<PASTE CODE HERE>"#;

pub const GENERIC_PROMPT: &str = r#"You are a senior application security engineer.
The code I paste after this message was flagged by my VibeChecker tool for security and privacy risks.

Your job:
1. Identify and explain the most important security or privacy issues.
2. Refactor the code to mitigate those issues while keeping behavior the same where possible.
3. Avoid logging or hard-coding secrets or personal data.
4. Return:
   - The fixed code.
   - A concise list of changes and why they matter.

Here is the code to review and fix:
<PASTE CODE HERE>"#;

/// Template for a known rule.
pub fn template(rule: RuleId) -> &'static str {
    match rule {
        RuleId::SpookySecrets => SPOOKY_SECRETS_PROMPT,
        RuleId::SupabaseServiceRole => SUPABASE_SERVICE_ROLE_PROMPT,
        RuleId::SupabaseBroadInsert => SUPABASE_BROAD_INSERT_PROMPT,
        RuleId::PrivacyLogs => PRIVACY_LOGS_PROMPT,
    }
}

/// Resolve a template by rule identifier.
///
/// Unknown identifiers get [`GENERIC_PROMPT`]; this never fails.
pub fn prompt_for(rule_id: &str) -> &'static str {
    RuleId::parse(rule_id).map(template).unwrap_or(GENERIC_PROMPT)
}

/// Fill a template with the code under review.
///
/// Replaces the first [`CODE_PLACEHOLDER`]. Templates without one get the
/// code appended after [`CODE_SEPARATOR`].
pub fn render(template: &str, code: &str) -> String {
    if template.contains(CODE_PLACEHOLDER) {
        template.replacen(CODE_PLACEHOLDER, code, 1)
    } else {
        format!("{}{}{}", template, CODE_SEPARATOR, code)
    }
}

/// Render the prompt for the top finding of an analysis, if there is one.
pub fn fix_prompt(result: &AnalysisResult, code: &str) -> Option<String> {
    result
        .top_finding
        .as_ref()
        .map(|top| render(template(top.rule_id), code))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::{Finding, Severity};

    #[test]
    fn test_known_rules_resolve_to_their_template() {
        for rule in RuleId::ALL {
            let prompt = prompt_for(rule.as_str());
            assert_eq!(prompt, template(rule));
            assert_ne!(prompt, GENERIC_PROMPT);
        }
    }

    #[test]
    fn test_unknown_rule_falls_back_to_generic() {
        assert_eq!(prompt_for("NotARule"), GENERIC_PROMPT);
        assert_eq!(prompt_for(""), GENERIC_PROMPT);
        assert_eq!(prompt_for("spookysecrets"), GENERIC_PROMPT);
    }

    #[test]
    fn test_templates_are_trimmed_and_end_with_placeholder() {
        for prompt in RuleId::ALL.iter().map(|r| template(*r)).chain([GENERIC_PROMPT]) {
            assert!(prompt.starts_with("You are a senior "));
            assert!(prompt.ends_with("Here is the code to review and fix:\n<PASTE CODE HERE>"));
            assert_eq!(prompt, prompt.trim());
            assert!(prompt.contains("\n\nYour job:\n1. "));
        }
    }

    #[test]
    fn test_spooky_secrets_template_text() {
        let prompt = template(RuleId::SpookySecrets);
        assert!(prompt.contains(r#"flagged by my VibeChecker tool as "SpookySecrets""#));
        assert!(prompt.contains(
            "   - Do not invent real values. Use safe placeholders like YOUR_API_KEY or CONFIG.SECRET instead.\n"
        ));
    }

    #[test]
    fn test_render_replaces_placeholder() {
        let rendered = render(template(RuleId::PrivacyLogs), "console.log(email)");
        assert!(rendered.ends_with("Here is the code to review and fix:\nconsole.log(email)"));
        assert!(!rendered.contains(CODE_PLACEHOLDER));
    }

    #[test]
    fn test_render_replaces_only_first_placeholder() {
        let rendered = render("a <PASTE CODE HERE> b <PASTE CODE HERE>", "X");
        assert_eq!(rendered, "a X b <PASTE CODE HERE>");
    }

    #[test]
    fn test_render_appends_without_placeholder() {
        let rendered = render("Fix this please.", "let x = 1;");
        assert_eq!(
            rendered,
            "Fix this please.\n\nHere is the code to review and fix:\n\nlet x = 1;"
        );
    }

    #[test]
    fn test_fix_prompt_uses_top_finding() {
        let top = Finding::for_rule(RuleId::SupabaseServiceRole);
        let result = AnalysisResult {
            level: Severity::Cursed,
            findings: vec![top.clone()],
            summary: String::new(),
            top_finding: Some(top),
        };
        let prompt = fix_prompt(&result, "CODE").unwrap();
        assert!(prompt.starts_with(template(RuleId::SupabaseServiceRole).trim_end_matches(CODE_PLACEHOLDER)));
        assert!(prompt.ends_with("\nCODE"));

        let empty = AnalysisResult {
            level: Severity::Chill,
            findings: vec![],
            summary: String::new(),
            top_finding: None,
        };
        assert!(fix_prompt(&empty, "CODE").is_none());
    }
}
