//! Command-line interface for vibecheck.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::config::{self, Config};
use crate::detect::{RuleId, Severity};
use crate::prompts;
use crate::report::{self, Format, ReportContext};
use crate::scan::{self, ScanOptions, ScanOutcome, STDIN_NAME};

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Environment variable holding a tracing filter directive.
pub const LOG_ENV: &str = "VIBECHECK_LOG";

/// Vibe check for code - flag hard-coded secrets, risky Supabase usage,
/// and privacy-hostile logs.
///
/// Each input is classified as chill, sus, or cursed. The top finding comes
/// with a ready-made prompt for an AI code-fixing assistant.
#[derive(Parser)]
#[command(name = "vibecheck")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging (VIBECHECK_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a file, a directory, or stdin
    #[command(visible_alias = "scan")]
    Check(CheckArgs),
    /// Print the fix prompt for a rule
    Prompt(PromptArgs),
    /// Create a vibecheck config file
    Init(InitArgs),
}

/// Arguments for the check command.
#[derive(Args)]
pub struct CheckArgs {
    /// Path to check (file or directory), or "-" for stdin
    pub path: PathBuf,

    /// Path to config YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format: pretty, json, or sarif
    #[arg(short, long, default_value = "pretty")]
    pub format: String,

    /// Fail when any input reaches this level: chill, sus, or cursed
    #[arg(long)]
    pub fail_on: Option<Severity>,

    /// Include the rendered fix prompt for each input's top finding
    #[arg(long)]
    pub prompt: bool,
}

/// Arguments for the prompt command.
#[derive(Args)]
pub struct PromptArgs {
    /// Rule identifier (unknown identifiers get the generic prompt)
    #[arg(required_unless_present = "list")]
    pub rule: Option<String>,

    /// Render the prompt against this file ("-" for stdin)
    #[arg(long)]
    pub code: Option<PathBuf>,

    /// Path to config YAML file, for max_input_bytes (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// List known rules
    #[arg(short, long)]
    pub list: bool,
}

/// Arguments for the init command.
#[derive(Args)]
pub struct InitArgs {
    /// Output file path
    #[arg(short, long, default_value = "vibecheck.yaml")]
    pub output: PathBuf,
}

/// Run the check command.
pub fn run_check(args: &CheckArgs) -> anyhow::Result<i32> {
    let format: Format = match args.format.parse() {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let cwd = std::env::current_dir().context("resolving working directory")?;
    let (config, config_path) = match Config::load(args.config.as_deref(), &cwd) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };
    let fail_on = args.fail_on.unwrap_or_else(|| config.fail_on());
    let options = ScanOptions::from_config(&config).include_prompt(args.prompt);
    let engine = crate::engine();

    let (outcome, base_path) = if scan::is_stdin(&args.path) {
        let code = scan::read_text(&args.path, options.max_input_bytes)?;
        let report = scan::analyze_text(engine, STDIN_NAME, &code, &options);
        (
            ScanOutcome {
                reports: vec![report],
                skipped: vec![],
            },
            PathBuf::new(),
        )
    } else {
        let abs_path = match args.path.canonicalize() {
            Ok(p) => p,
            Err(e) => {
                eprintln!("Error: cannot access path {:?}: {}", args.path, e);
                return Ok(EXIT_ERROR);
            }
        };

        let files = if abs_path.is_dir() {
            scan::collect_files(&abs_path, &config)?
        } else {
            vec![abs_path.clone()]
        };

        if files.is_empty() {
            eprintln!("Warning: no files to scan");
            return Ok(EXIT_SUCCESS);
        }

        (scan::scan_files(engine, &files, &options), abs_path)
    };

    let path_str = args.path.to_string_lossy().to_string();
    let config_str = config_path.map(|p| p.to_string_lossy().to_string());
    let ctx = ReportContext {
        path: &path_str,
        config: config_str.as_deref(),
        fail_on,
    };

    match format {
        Format::Json => report::write_json(&ctx, &outcome)?,
        Format::Sarif => report::write_sarif(&base_path, &outcome)?,
        Format::Pretty => report::write_pretty(&ctx, &outcome),
    }

    if outcome.fails(fail_on) {
        Ok(EXIT_FAILED)
    } else {
        Ok(EXIT_SUCCESS)
    }
}

/// Run the prompt command.
pub fn run_prompt(args: &PromptArgs) -> anyhow::Result<i32> {
    if args.list {
        return list_rules();
    }

    let rule = args.rule.as_deref().unwrap_or_default();
    if RuleId::parse(rule).is_none() {
        tracing::info!(rule, "unknown rule, using generic prompt");
    }
    let template = prompts::prompt_for(rule);

    let output = match &args.code {
        None => template.to_string(),
        Some(path) => {
            let cwd = std::env::current_dir().context("resolving working directory")?;
            let (config, _) = match Config::load(args.config.as_deref(), &cwd) {
                Ok(loaded) => loaded,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    return Ok(EXIT_ERROR);
                }
            };
            let code = scan::read_text(path, config.max_input_bytes())?;
            prompts::render(template, &code)
        }
    };

    println!("{}", output);
    Ok(EXIT_SUCCESS)
}

/// List known rules.
fn list_rules() -> anyhow::Result<i32> {
    println!("Rules:");
    println!();

    for rule in crate::engine().rules() {
        println!("  {:<22} {:<7} {}", rule.as_str(), rule.severity().as_str(), rule.title());
    }

    println!();
    println!("Usage:");
    println!("  vibecheck prompt <rule> [--code <file>] [--config <file>]");

    Ok(EXIT_SUCCESS)
}

/// Run the init command.
pub fn run_init(args: &InitArgs) -> anyhow::Result<i32> {
    if args.output.exists() {
        eprintln!("Error: file already exists: {}", args.output.display());
        eprintln!("Remove it or use --output to specify a different path");
        return Ok(EXIT_ERROR);
    }

    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() && parent != Path::new(".") {
            if let Err(e) = std::fs::create_dir_all(parent) {
                eprintln!("Error: failed to create directory: {}", e);
                return Ok(EXIT_ERROR);
            }
        }
    }

    if let Err(e) = std::fs::write(&args.output, config::DEFAULT_CONFIG_YAML) {
        eprintln!("Error: failed to write config: {}", e);
        return Ok(EXIT_ERROR);
    }

    println!("Created {}", args.output.display());
    println!();
    println!("Next steps:");
    println!("  1. Edit {} to customize for your project", args.output.display());
    println!("  2. Run: vibecheck check . --config {}", args.output.display());

    Ok(EXIT_SUCCESS)
}
