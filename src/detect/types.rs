//! Core types for analysis results.

use serde::{Deserialize, Deserializer, Serialize};

/// Risk tiers, ordered from least to most severe.
///
/// The same scale is used for a single finding's severity and for the
/// overall level of an analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Chill,
    Sus,
    Cursed,
}

impl Severity {
    /// Numeric rank used when ordering findings (`chill`=0, `sus`=1, `cursed`=2).
    pub fn rank(&self) -> u8 {
        match self {
            Severity::Chill => 0,
            Severity::Sus => 1,
            Severity::Cursed => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Chill => "chill",
            Severity::Sus => "sus",
            Severity::Cursed => "cursed",
        }
    }

    /// Capitalized label for display ("Chill", "Sus", "Cursed").
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Chill => "Chill",
            Severity::Sus => "Sus",
            Severity::Cursed => "Cursed",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "chill" => Ok(Severity::Chill),
            "sus" => Ok(Severity::Sus),
            "cursed" => Ok(Severity::Cursed),
            _ => Err(format!("unknown level: {}", s)),
        }
    }
}

// Config files and JSON go through `FromStr` so `Cursed` is accepted there too.
impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Identifiers of the built-in rules, in detector declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleId {
    SpookySecrets,
    SupabaseServiceRole,
    SupabaseBroadInsert,
    PrivacyLogs,
}

impl RuleId {
    pub const ALL: [RuleId; 4] = [
        RuleId::SpookySecrets,
        RuleId::SupabaseServiceRole,
        RuleId::SupabaseBroadInsert,
        RuleId::PrivacyLogs,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RuleId::SpookySecrets => "SpookySecrets",
            RuleId::SupabaseServiceRole => "SupabaseServiceRole",
            RuleId::SupabaseBroadInsert => "SupabaseBroadInsert",
            RuleId::PrivacyLogs => "PrivacyLogs",
        }
    }

    /// Exact-match lookup. Unknown identifiers yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "SpookySecrets" => Some(RuleId::SpookySecrets),
            "SupabaseServiceRole" => Some(RuleId::SupabaseServiceRole),
            "SupabaseBroadInsert" => Some(RuleId::SupabaseBroadInsert),
            "PrivacyLogs" => Some(RuleId::PrivacyLogs),
            _ => None,
        }
    }

    /// Severity every finding of this rule carries.
    pub fn severity(&self) -> Severity {
        match self {
            RuleId::SpookySecrets | RuleId::SupabaseServiceRole => Severity::Cursed,
            RuleId::SupabaseBroadInsert | RuleId::PrivacyLogs => Severity::Sus,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            RuleId::SpookySecrets => "SpookySecrets: possible hard-coded secrets or credentials",
            RuleId::SupabaseServiceRole => "Supabase: service_role key likely exposed in app code",
            RuleId::SupabaseBroadInsert => "Supabase: inserting raw req.body into a table",
            RuleId::PrivacyLogs => "Privacy: potentially sensitive data logged",
        }
    }

    pub fn detail(&self) -> &'static str {
        match self {
            RuleId::SpookySecrets => "We saw patterns that look like keys, tokens, or secrets directly in source. These should live in env/config or a secrets manager, not in code.",
            RuleId::SupabaseServiceRole => "We saw a Supabase service_role-style key in code that looks like it could run in a browser or shared app environment. That key should only live in trusted server-side config.",
            RuleId::SupabaseBroadInsert => "We saw req.body inserted directly into a Supabase table. This can lead to over-permissive writes or unexpected data stored without validation.",
            RuleId::PrivacyLogs => "We saw logging of request bodies or fields like email, password, tokens, or IDs. These can become privacy incidents if logs are exposed or retained too long.",
        }
    }
}

impl std::fmt::Display for RuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single detected issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    pub id: String,
    pub rule_id: RuleId,
    pub severity: Severity,
    pub title: String,
    pub detail: String,
}

impl Finding {
    /// Build the canonical finding for a rule.
    pub fn for_rule(rule: RuleId) -> Self {
        Self {
            id: rule.as_str().to_string(),
            rule_id: rule,
            severity: rule.severity(),
            title: rule.title().to_string(),
            detail: rule.detail().to_string(),
        }
    }
}

/// Outcome of analyzing one piece of text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub level: Severity,
    pub findings: Vec<Finding>,
    pub summary: String,
    pub top_finding: Option<Finding>,
}

impl AnalysisResult {
    /// Identifiers of all findings, in order.
    pub fn finding_ids(&self) -> Vec<&str> {
        self.findings.iter().map(|f| f.id.as_str()).collect()
    }

    /// Whether the overall level reaches `threshold`.
    pub fn reaches(&self, threshold: Severity) -> bool {
        self.level >= threshold
    }
}
