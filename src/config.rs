//! Configuration file for the vibecheck CLI.
//!
//! The engine itself takes no configuration. This file only controls which
//! files the scanner feeds it and when the CLI reports failure.

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::detect::Severity;

/// Config file names searched for in the working directory.
pub const DEFAULT_CONFIG_NAMES: &[&str] = &["vibecheck.yaml", ".vibecheck.yaml", "vibecheck.yml"];

/// Default upper bound on the size of a single scanned file.
pub const DEFAULT_MAX_INPUT_BYTES: u64 = 1024 * 1024;

/// Extensions scanned when the config does not list any.
pub const DEFAULT_EXTENSIONS: &[&str] = &[
    "js", "jsx", "ts", "tsx", "mjs", "cjs", "vue", "svelte", "py", "rb", "go", "java", "php", "rs",
];

/// Contents written by `vibecheck init`.
pub const DEFAULT_CONFIG_YAML: &str = r#"# vibecheck configuration
version: "1"

# File extensions to scan when checking a directory
extensions: [js, jsx, ts, tsx, mjs, cjs, vue, svelte, py, rb, go, java, php, rs]

# Glob patterns for paths to skip
excluded_paths:
  - "**/node_modules/**"
  - "**/dist/**"
  - "**/build/**"

# Files larger than this are skipped instead of analyzed
max_input_bytes: 1048576

# Exit non-zero when any file reaches this level: chill, sus, or cursed
fail_on: cursed
"#;

/// Errors raised while loading or validating a config file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("reading config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing config: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid excluded_paths pattern {pattern:?}: {source}")]
    Glob {
        pattern: String,
        #[source]
        source: globset::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level config definition.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub version: String,
    /// File extensions (without the dot) to scan in directories
    #[serde(default)]
    pub extensions: Option<Vec<String>>,
    /// Glob patterns for paths to exclude (e.g. "**/node_modules/**")
    #[serde(default)]
    pub excluded_paths: Vec<String>,
    /// Maximum size of a single file in bytes
    #[serde(default)]
    pub max_input_bytes: Option<u64>,
    /// Level at which the check fails (default: cursed)
    #[serde(default)]
    pub fail_on: Option<Severity>,
}

impl Config {
    /// Parse a config from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_str(&content)
    }

    /// Parse a config from YAML text. An empty document yields the defaults.
    pub fn parse_str(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Find a config file in `dir`.
    pub fn discover(dir: &Path) -> Option<PathBuf> {
        DEFAULT_CONFIG_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    }

    /// Load an explicit config, or discover one in `dir`, or fall back to defaults.
    ///
    /// Returns the path the config was read from, if any.
    pub fn load(explicit: Option<&Path>, dir: &Path) -> Result<(Self, Option<PathBuf>), ConfigError> {
        let path = match explicit {
            Some(p) => Some(p.to_path_buf()),
            None => Self::discover(dir),
        };

        let config = match &path {
            Some(p) => Self::parse_file(p)?,
            None => Self::default(),
        };
        validate(&config)?;

        Ok((config, path))
    }

    /// Extensions to scan (defaults to [`DEFAULT_EXTENSIONS`]).
    pub fn extensions(&self) -> Vec<String> {
        match &self.extensions {
            Some(exts) => exts
                .iter()
                .map(|e| e.trim_start_matches('.').to_lowercase())
                .collect(),
            None => DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }

    /// Returns the per-file size limit (defaults to 1 MiB).
    pub fn max_input_bytes(&self) -> u64 {
        self.max_input_bytes.unwrap_or(DEFAULT_MAX_INPUT_BYTES)
    }

    /// Returns the failing level (defaults to cursed).
    pub fn fail_on(&self) -> Severity {
        self.fail_on.unwrap_or(Severity::Cursed)
    }

    /// Compile `excluded_paths` into one matcher.
    pub fn exclusion_matcher(&self) -> Result<GlobSet, ConfigError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.excluded_paths {
            let glob = Glob::new(pattern).map_err(|source| ConfigError::Glob {
                pattern: pattern.clone(),
                source,
            })?;
            builder.add(glob);
        }
        builder.build().map_err(|source| ConfigError::Glob {
            pattern: self.excluded_paths.join(", "),
            source,
        })
    }
}

/// Validate a config for correctness.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    if let Some(exts) = &config.extensions {
        if exts.is_empty() {
            return Err(ConfigError::Invalid("extensions must not be empty".to_string()));
        }
        if let Some(bad) = exts.iter().find(|e| e.trim_start_matches('.').is_empty()) {
            return Err(ConfigError::Invalid(format!("invalid extension {:?}", bad)));
        }
    }

    if config.max_input_bytes == Some(0) {
        return Err(ConfigError::Invalid(
            "max_input_bytes must be greater than zero".to_string(),
        ));
    }

    config.exclusion_matcher()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_config() {
        let yaml = r#"
version: "1"
extensions: [".JS", ts]
excluded_paths:
  - "**/node_modules/**"
max_input_bytes: 2048
fail_on: sus
"#;
        let config = Config::parse_str(yaml).unwrap();
        assert_eq!(config.extensions(), vec!["js", "ts"]);
        assert_eq!(config.max_input_bytes(), 2048);
        assert_eq!(config.fail_on(), Severity::Sus);
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_defaults() {
        let config = Config::parse_str("").unwrap();
        assert_eq!(config.fail_on(), Severity::Cursed);
        assert_eq!(config.max_input_bytes(), DEFAULT_MAX_INPUT_BYTES);
        assert!(config.extensions().contains(&"ts".to_string()));
    }

    #[test]
    fn test_fail_on_ignores_case() {
        let config = Config::parse_str("fail_on: Cursed").unwrap();
        assert_eq!(config.fail_on(), Severity::Cursed);

        let config = Config::parse_str("fail_on: SUS").unwrap();
        assert_eq!(config.fail_on(), Severity::Sus);
    }

    #[test]
    fn test_default_template_is_valid() {
        let config = Config::parse_str(DEFAULT_CONFIG_YAML).unwrap();
        assert!(validate(&config).is_ok());
        assert_eq!(config.excluded_paths.len(), 3);
        assert_eq!(config.max_input_bytes(), DEFAULT_MAX_INPUT_BYTES);
    }

    #[test]
    fn test_rejects_bad_values() {
        let config = Config::parse_str("extensions: []").unwrap();
        assert!(matches!(validate(&config), Err(ConfigError::Invalid(_))));

        let config = Config::parse_str("max_input_bytes: 0").unwrap();
        assert!(matches!(validate(&config), Err(ConfigError::Invalid(_))));

        let config = Config::parse_str("excluded_paths: ['a/[b']").unwrap();
        assert!(matches!(validate(&config), Err(ConfigError::Glob { .. })));

        assert!(matches!(
            Config::parse_str("fail_on: spicy"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_exclusion_matcher() {
        let config = Config::parse_str("excluded_paths: ['**/node_modules/**']").unwrap();
        let matcher = config.exclusion_matcher().unwrap();
        assert!(matcher.is_match("/repo/node_modules/pkg/index.js"));
        assert!(!matcher.is_match("/repo/src/index.js"));
    }

    #[test]
    fn test_load_discovers_and_falls_back() {
        let temp = TempDir::new().unwrap();

        let (config, path) = Config::load(None, temp.path()).unwrap();
        assert!(path.is_none());
        assert_eq!(config.fail_on(), Severity::Cursed);

        std::fs::write(temp.path().join("vibecheck.yaml"), "fail_on: sus\n").unwrap();
        let (config, path) = Config::load(None, temp.path()).unwrap();
        assert_eq!(path.unwrap(), temp.path().join("vibecheck.yaml"));
        assert_eq!(config.fail_on(), Severity::Sus);
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope.yaml");
        assert!(matches!(
            Config::load(Some(&missing), temp.path()),
            Err(ConfigError::Io { .. })
        ));
    }
}
