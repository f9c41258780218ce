//! Feeding files into the engine.
//!
//! The engine analyzes one text blob at a time. This module finds the files
//! to analyze, enforces the per-file size limit, and runs the analyses in
//! parallel while keeping output in discovery order.

use anyhow::Context;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::Config;
use crate::detect::{AnalysisResult, Engine, Severity};
use crate::prompts;

/// Directories never descended into.
const SKIPPED_DIRS: &[&str] = &["node_modules", "vendor", "target", "__pycache__"];

/// Display name used for text read from stdin.
pub const STDIN_NAME: &str = "<stdin>";

/// Analysis of a single file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReport {
    pub file: String,
    #[serde(flatten)]
    pub result: AnalysisResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix_prompt: Option<String>,
}

/// A file that was not analyzed, and why.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedFile {
    pub file: String,
    pub reason: String,
}

/// Results of scanning one or more files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanOutcome {
    pub reports: Vec<FileReport>,
    pub skipped: Vec<SkippedFile>,
}

impl ScanOutcome {
    /// Highest level across all analyzed files.
    pub fn level(&self) -> Severity {
        self.reports
            .iter()
            .map(|r| r.result.level)
            .max()
            .unwrap_or(Severity::Chill)
    }

    /// Number of findings across all files.
    pub fn finding_count(&self) -> usize {
        self.reports.iter().map(|r| r.result.findings.len()).sum()
    }

    /// Whether any file reaches `threshold`.
    pub fn fails(&self, threshold: Severity) -> bool {
        self.reports.iter().any(|r| r.result.reaches(threshold))
    }
}

/// Options controlling a scan.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub max_input_bytes: u64,
    pub include_prompt: bool,
}

impl ScanOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_input_bytes: config.max_input_bytes(),
            include_prompt: false,
        }
    }

    /// Set whether to render the fix prompt for each file's top finding.
    pub fn include_prompt(mut self, include: bool) -> Self {
        self.include_prompt = include;
        self
    }
}

/// Collect files to scan under `root`, sorted by path.
pub fn collect_files(root: &Path, config: &Config) -> anyhow::Result<Vec<PathBuf>> {
    let extensions = config.extensions();
    let excluded = config.exclusion_matcher()?;

    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            if e.depth() == 0 || !e.file_type().is_dir() {
                return true;
            }
            let name = e.file_name().to_string_lossy();
            !name.starts_with('.') && !SKIPPED_DIRS.contains(&&*name)
        })
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        if !extensions.contains(&ext) {
            continue;
        }
        if excluded.is_match(path) {
            debug!(file = %path.display(), "excluded by config");
            continue;
        }

        files.push(path.to_path_buf());
    }

    Ok(files)
}

/// Analyze each file in parallel. Output order matches `files`.
pub fn scan_files(engine: &Engine, files: &[PathBuf], options: &ScanOptions) -> ScanOutcome {
    let results: Vec<Result<FileReport, SkippedFile>> = files
        .par_iter()
        .map(|path| scan_file(engine, path, options))
        .collect();

    let mut outcome = ScanOutcome::default();
    for result in results {
        match result {
            Ok(report) => outcome.reports.push(report),
            Err(skipped) => {
                warn!(file = %skipped.file, reason = %skipped.reason, "skipped file");
                outcome.skipped.push(skipped);
            }
        }
    }

    info!(
        analyzed = outcome.reports.len(),
        skipped = outcome.skipped.len(),
        level = %outcome.level(),
        "scan complete"
    );

    outcome
}

fn scan_file(engine: &Engine, path: &Path, options: &ScanOptions) -> Result<FileReport, SkippedFile> {
    let name = path.to_string_lossy().to_string();
    let skip = |reason: String| SkippedFile {
        file: name.clone(),
        reason,
    };

    let size = std::fs::metadata(path)
        .map_err(|e| skip(e.to_string()))?
        .len();
    if size > options.max_input_bytes {
        return Err(skip(format!(
            "file is {} bytes, limit is {}",
            size, options.max_input_bytes
        )));
    }

    let bytes = std::fs::read(path).map_err(|e| skip(e.to_string()))?;
    let code = String::from_utf8_lossy(&bytes);

    Ok(analyze_text(engine, &name, &code, options))
}

/// Analyze text that did not come from a file on disk.
pub fn analyze_text(engine: &Engine, name: &str, code: &str, options: &ScanOptions) -> FileReport {
    let result = engine.analyze(code);
    let fix_prompt = if options.include_prompt {
        prompts::fix_prompt(&result, code)
    } else {
        None
    };

    FileReport {
        file: name.to_string(),
        result,
        fix_prompt,
    }
}

/// Whether `path` names stdin (`-`).
pub fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == "-"
}

/// Read a file, or stdin when `path` is `-`, refusing input over the size limit.
///
/// Invalid UTF-8 is replaced rather than rejected, the same as a directory scan.
pub fn read_text(path: &Path, max_input_bytes: u64) -> anyhow::Result<String> {
    if is_stdin(path) {
        return read_limited(std::io::stdin().lock(), max_input_bytes, STDIN_NAME);
    }

    let file = std::fs::File::open(path).with_context(|| format!("reading {}", path.display()))?;
    read_limited(file, max_input_bytes, &path.display().to_string())
}

fn read_limited<R: Read>(reader: R, max_input_bytes: u64, name: &str) -> anyhow::Result<String> {
    let mut buf = Vec::new();
    reader
        .take(max_input_bytes.saturating_add(1))
        .read_to_end(&mut buf)
        .with_context(|| format!("reading {}", name))?;

    if buf.len() as u64 > max_input_bytes {
        anyhow::bail!("{} exceeds max_input_bytes ({})", name, max_input_bytes);
    }

    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::RuleId;
    use tempfile::TempDir;

    fn write(dir: &Path, rel: &str, content: &str) -> PathBuf {
        let path = dir.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_collect_files_filters_and_sorts() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "b.js", "");
        write(temp.path(), "a.ts", "");
        write(temp.path(), "notes.md", "");
        write(temp.path(), "node_modules/dep/index.js", "");
        write(temp.path(), ".git/hooks/pre-commit.js", "");
        write(temp.path(), "dist/bundle.js", "");

        let config = Config::parse_str("excluded_paths: ['**/dist/**']").unwrap();
        let files = collect_files(temp.path(), &config).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.strip_prefix(temp.path()).unwrap().to_string_lossy().to_string())
            .collect();

        assert_eq!(names, vec!["a.ts", "b.js"]);
    }

    #[test]
    fn test_scan_files_keeps_order_and_levels() {
        let temp = TempDir::new().unwrap();
        let files = vec![
            write(temp.path(), "clean.js", "export const add = (a, b) => a + b;\n"),
            write(temp.path(), "leaky.js", "console.log('email', email);\n"),
            write(temp.path(), "secret.js", "const apiKey = 'x';\n"),
        ];

        let engine = Engine::new();
        let options = ScanOptions::from_config(&Config::default());
        let outcome = scan_files(&engine, &files, &options);

        assert_eq!(outcome.reports.len(), 3);
        assert!(outcome.reports[0].file.ends_with("clean.js"));
        assert_eq!(outcome.reports[0].result.level, Severity::Chill);
        assert_eq!(outcome.reports[1].result.level, Severity::Sus);
        assert_eq!(outcome.reports[2].result.level, Severity::Cursed);
        assert_eq!(outcome.level(), Severity::Cursed);
        assert_eq!(outcome.finding_count(), 2);
        assert!(outcome.fails(Severity::Cursed));
        assert!(outcome.reports.iter().all(|r| r.fix_prompt.is_none()));
    }

    #[test]
    fn test_oversized_file_is_skipped() {
        let temp = TempDir::new().unwrap();
        let big = write(temp.path(), "big.js", &"a".repeat(64));
        let small = write(temp.path(), "small.js", "let a = 1;");

        let engine = Engine::new();
        let options = ScanOptions {
            max_input_bytes: 32,
            include_prompt: false,
        };
        let outcome = scan_files(&engine, &[big, small], &options);

        assert_eq!(outcome.reports.len(), 1);
        assert_eq!(outcome.skipped.len(), 1);
        assert!(outcome.skipped[0].reason.contains("limit is 32"));
    }

    #[test]
    fn test_include_prompt_renders_top_finding() {
        let engine = Engine::new();
        let options = ScanOptions::from_config(&Config::default()).include_prompt(true);
        let code = "logger.warn(user.phone)";
        let report = analyze_text(&engine, STDIN_NAME, code, &options);

        assert_eq!(report.result.top_finding.as_ref().unwrap().rule_id, RuleId::PrivacyLogs);
        let prompt = report.fix_prompt.unwrap();
        assert!(prompt.ends_with(code));
        assert!(!prompt.contains(prompts::CODE_PLACEHOLDER));
    }

    #[test]
    fn test_read_limited_boundary() {
        let input: &[u8] = b"12345";
        assert_eq!(read_limited(input, 5, "x").unwrap(), "12345");

        let err = read_limited(input, 4, "x").unwrap_err();
        assert!(err.to_string().contains("exceeds max_input_bytes (4)"));

        // the largest configurable limit must not wrap to an empty read
        assert_eq!(read_limited(input, u64::MAX, "x").unwrap(), "12345");
    }

    #[test]
    fn test_read_text_is_lossy_and_bounded() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("latin1.js");
        std::fs::write(&path, b"console.log(user, \xe9)").unwrap();

        let code = read_text(&path, 1024).unwrap();
        assert!(code.starts_with("console.log(user, "));
        assert!(code.contains('\u{FFFD}'));

        assert!(read_text(&path, 8).is_err());
        assert!(read_text(&temp.path().join("missing.js"), 1024).is_err());
    }

    #[test]
    fn test_is_stdin() {
        assert!(is_stdin(Path::new("-")));
        assert!(!is_stdin(Path::new("./-")));
        assert!(!is_stdin(Path::new("src")));
    }

    #[test]
    fn test_file_report_json_shape() {
        let engine = Engine::new();
        let options = ScanOptions::from_config(&Config::default());
        let report = analyze_text(&engine, "x.js", "", &options);
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["file"], "x.js");
        assert_eq!(json["level"], "chill");
        assert!(json["topFinding"].is_null());
        assert!(json.get("fixPrompt").is_none());
    }
}
