//! Output formatting for vibecheck results.
//!
//! Supports three output formats:
//! - Pretty: colored terminal output for human readability
//! - JSON: structured output for programmatic consumption
//! - SARIF: Static Analysis Results Interchange Format for IDE/CI integration

use colored::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::detect::{Finding, RuleId, Severity};
use crate::scan::{FileReport, ScanOutcome, SkippedFile};

/// Output formats accepted by `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Pretty,
    Json,
    Sarif,
}

impl std::str::FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pretty" => Ok(Format::Pretty),
            "json" => Ok(Format::Json),
            "sarif" => Ok(Format::Sarif),
            _ => Err(format!(
                "invalid format {:?}, must be 'pretty', 'json', or 'sarif'",
                s
            )),
        }
    }
}

/// Scan details shared by every output format.
pub struct ReportContext<'a> {
    pub path: &'a str,
    pub config: Option<&'a str>,
    pub fail_on: Severity,
}

// =============================================================================
// JSON Format
// =============================================================================

/// Top-level JSON report.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonReport {
    pub version: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<String>,
    pub level: Severity,
    pub fail_on: Severity,
    pub passed: bool,
    pub files_scanned: usize,
    pub finding_count: usize,
    pub files: Vec<FileReport>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedFile>,
}

impl JsonReport {
    pub fn new(ctx: &ReportContext<'_>, outcome: &ScanOutcome) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            path: ctx.path.to_string(),
            config: ctx.config.map(str::to_string),
            level: outcome.level(),
            fail_on: ctx.fail_on,
            passed: !outcome.fails(ctx.fail_on),
            files_scanned: outcome.reports.len(),
            finding_count: outcome.finding_count(),
            files: outcome.reports.clone(),
            skipped: outcome.skipped.clone(),
        }
    }
}

/// Render results as pretty-printed JSON.
pub fn to_json(ctx: &ReportContext<'_>, outcome: &ScanOutcome) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(&JsonReport::new(ctx, outcome))?)
}

/// Write results in JSON format.
pub fn write_json(ctx: &ReportContext<'_>, outcome: &ScanOutcome) -> anyhow::Result<()> {
    println!("{}", to_json(ctx, outcome)?);
    Ok(())
}

// =============================================================================
// SARIF Format
// =============================================================================

const SARIF_VERSION: &str = "2.1.0";
const SARIF_SCHEMA: &str = "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/master/Schemata/sarif-schema-2.1.0.json";
const TOOL_NAME: &str = "vibecheck";

#[derive(Serialize, Deserialize)]
pub struct SarifReport {
    pub version: String,
    #[serde(rename = "$schema")]
    pub schema: String,
    pub runs: Vec<SarifRun>,
}

#[derive(Serialize, Deserialize)]
pub struct SarifRun {
    pub tool: SarifTool,
    pub results: Vec<SarifResult>,
}

#[derive(Serialize, Deserialize)]
pub struct SarifTool {
    pub driver: SarifDriver,
}

#[derive(Serialize, Deserialize)]
pub struct SarifDriver {
    pub name: String,
    pub version: String,
    pub rules: Vec<SarifRule>,
}

#[derive(Serialize, Deserialize)]
pub struct SarifRule {
    pub id: String,
    pub name: String,
    #[serde(rename = "shortDescription")]
    pub short_description: SarifMessage,
    #[serde(rename = "fullDescription")]
    pub full_description: SarifMessage,
    #[serde(rename = "defaultConfiguration")]
    pub default_config: SarifRuleConfig,
}

#[derive(Serialize, Deserialize)]
pub struct SarifRuleConfig {
    pub level: String,
}

#[derive(Serialize, Deserialize)]
pub struct SarifResult {
    #[serde(rename = "ruleId")]
    pub rule_id: String,
    pub level: String,
    pub message: SarifMessage,
    pub locations: Vec<SarifLocation>,
}

#[derive(Serialize, Deserialize)]
pub struct SarifMessage {
    pub text: String,
}

#[derive(Serialize, Deserialize)]
pub struct SarifLocation {
    #[serde(rename = "physicalLocation")]
    pub physical_location: SarifPhysicalLocation,
}

#[derive(Serialize, Deserialize)]
pub struct SarifPhysicalLocation {
    #[serde(rename = "artifactLocation")]
    pub artifact_location: SarifArtifact,
}

#[derive(Serialize, Deserialize)]
pub struct SarifArtifact {
    pub uri: String,
}

/// SARIF has no "chill"; it maps to the informational level.
pub fn map_severity_to_level(severity: Severity) -> &'static str {
    match severity {
        Severity::Cursed => "error",
        Severity::Sus => "warning",
        Severity::Chill => "note",
    }
}

fn make_relative_path(file_path: &str, base_path: &Path) -> String {
    if base_path.as_os_str().is_empty() {
        return file_path.to_string();
    }

    let file = Path::new(file_path);

    // Single file scan: report just the file name
    if file == base_path {
        return file
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| file_path.to_string());
    }

    file.strip_prefix(base_path)
        .map(|p| p.to_string_lossy().replace('\\', "/"))
        .unwrap_or_else(|_| file_path.to_string())
}

fn sarif_rule(rule: RuleId) -> SarifRule {
    SarifRule {
        id: rule.as_str().to_string(),
        name: rule.as_str().to_string(),
        short_description: SarifMessage {
            text: rule.title().to_string(),
        },
        full_description: SarifMessage {
            text: rule.detail().to_string(),
        },
        default_config: SarifRuleConfig {
            level: map_severity_to_level(rule.severity()).to_string(),
        },
    }
}

fn sarif_result(finding: &Finding, uri: &str) -> SarifResult {
    SarifResult {
        rule_id: finding.rule_id.as_str().to_string(),
        level: map_severity_to_level(finding.severity).to_string(),
        message: SarifMessage {
            text: format!("{}. {}", finding.title, finding.detail),
        },
        locations: vec![SarifLocation {
            physical_location: SarifPhysicalLocation {
                artifact_location: SarifArtifact {
                    uri: uri.to_string(),
                },
            },
        }],
    }
}

/// Build a SARIF report. Rules are listed in detector order, only those that fired.
pub fn build_sarif(base_path: &Path, outcome: &ScanOutcome) -> SarifReport {
    let rules: Vec<SarifRule> = RuleId::ALL
        .iter()
        .filter(|rule| {
            outcome
                .reports
                .iter()
                .any(|r| r.result.findings.iter().any(|f| f.rule_id == **rule))
        })
        .map(|rule| sarif_rule(*rule))
        .collect();

    let results: Vec<SarifResult> = outcome
        .reports
        .iter()
        .flat_map(|report| {
            let uri = make_relative_path(&report.file, base_path);
            report
                .result
                .findings
                .iter()
                .map(move |f| sarif_result(f, &uri))
        })
        .collect();

    SarifReport {
        version: SARIF_VERSION.to_string(),
        schema: SARIF_SCHEMA.to_string(),
        runs: vec![SarifRun {
            tool: SarifTool {
                driver: SarifDriver {
                    name: TOOL_NAME.to_string(),
                    version: env!("CARGO_PKG_VERSION").to_string(),
                    rules,
                },
            },
            results,
        }],
    }
}

/// Write results in SARIF format.
pub fn write_sarif(base_path: &Path, outcome: &ScanOutcome) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(&build_sarif(base_path, outcome))?;
    println!("{}", json);
    Ok(())
}

// =============================================================================
// Pretty Format
// =============================================================================

/// Write results in pretty (human-readable) format.
pub fn write_pretty(ctx: &ReportContext<'_>, outcome: &ScanOutcome) {
    // Header
    println!();
    print!("  ");
    print!("{}", "vibecheck".cyan().bold());
    println!(" v{}", env!("CARGO_PKG_VERSION"));
    println!();

    print!("  {}", "Scanning: ".dimmed());
    println!("{}", ctx.path);
    print!("  {}", "Config:   ".dimmed());
    println!("{}", ctx.config.unwrap_or("(defaults)"));
    println!();

    let level = outcome.level();
    print!("  ");
    write_level_tag(level);
    println!("  {}", level_meter(level));
    println!();

    // A single input is always shown, even when clean
    let show_clean = outcome.reports.len() == 1;
    let mut clean = 0;
    for report in &outcome.reports {
        if report.result.findings.is_empty() && !show_clean {
            clean += 1;
            continue;
        }
        write_file_report(report);
        println!();
    }

    if clean > 0 {
        println!(
            "  {}",
            format!("{} file(s) with no findings", clean).dimmed()
        );
        println!();
    }

    if !outcome.skipped.is_empty() {
        write_skipped(&outcome.skipped);
        println!();
    }

    write_final_status(ctx, outcome);
    println!();
}

fn write_level_tag(level: Severity) {
    let tag = format!(" {} ", level.label().to_uppercase());
    match level {
        Severity::Cursed => print!("{}", tag.white().on_red().bold()),
        Severity::Sus => print!("{}", tag.black().on_yellow().bold()),
        Severity::Chill => print!("{}", tag.black().on_green().bold()),
    }
}

/// Three-segment track (cursed, sus, chill) with the active segment lit.
pub fn level_meter(level: Severity) -> String {
    let segment = |s: Severity| {
        let bar = "━━━━";
        if s != level {
            return bar.dimmed().to_string();
        }
        match s {
            Severity::Cursed => bar.red().bold().to_string(),
            Severity::Sus => bar.yellow().bold().to_string(),
            Severity::Chill => bar.green().bold().to_string(),
        }
    };
    format!(
        "{} {} {}",
        segment(Severity::Cursed),
        segment(Severity::Sus),
        segment(Severity::Chill)
    )
}

fn write_file_report(report: &FileReport) {
    print!("  {}", report.file.blue());
    print!("  ");
    write_severity(report.result.level);
    println!();
    println!("    {}", report.result.summary.dimmed());

    for f in &report.result.findings {
        println!();
        print!("    ");
        write_severity(f.severity);
        print!("  {:<22}", f.id.dimmed());
        println!("{}", f.title);
        println!("            {}", f.detail);
    }

    if let Some(prompt) = &report.fix_prompt {
        println!();
        println!("    {}", "Fix prompt:".bold());
        for line in prompt.lines() {
            println!("    {}", line);
        }
    }
}

fn write_severity(severity: Severity) {
    match severity {
        Severity::Cursed => print!("{}", "CURSED".red()),
        Severity::Sus => print!("{}", "SUS   ".yellow()),
        Severity::Chill => print!("{}", "CHILL ".green()),
    }
}

fn write_skipped(skipped: &[SkippedFile]) {
    println!("  {} ({}):", "Skipped".dimmed(), skipped.len());
    for s in skipped {
        println!("    {}  {}", s.file.blue(), s.reason.dimmed());
    }
}

fn write_final_status(ctx: &ReportContext<'_>, outcome: &ScanOutcome) {
    print!(
        "  {}",
        format!(
            "Files: {}  Findings: {}  Fail on: {}",
            outcome.reports.len(),
            outcome.finding_count(),
            ctx.fail_on
        )
        .dimmed()
    );
    print!("  ");

    if outcome.fails(ctx.fail_on) {
        print!("{}", "FAILED".red());
    } else {
        print!("{}", "PASSED".green());
    }
    println!();
}
