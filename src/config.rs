//! Scan configuration.
//!
//! An optional YAML file (`codebrev.yaml` or `.codebrev.yaml` in the scan
//! root) tunes output location, exclusions, risk thresholds and resolution
//! aliases. Every key has a default, so an empty file is valid.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::outline::RiskThresholds;

/// File names probed in the scan root, in order.
pub const CONFIG_FILE_NAMES: &[&str] = &["codebrev.yaml", ".codebrev.yaml"];

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Report path, relative to the scan root unless absolute.
    #[serde(default = "default_output")]
    pub output: String,
    /// Glob patterns matched against repo-relative paths.
    #[serde(default)]
    pub excluded_paths: Vec<String>,
    #[serde(default)]
    pub risk: RiskThresholds,
    /// Alias token to source-root directory, e.g. `~` to `src`.
    #[serde(default = "default_aliases")]
    pub aliases: BTreeMap<String, String>,
    #[serde(default)]
    pub variables: VariablesConfig,
    /// Include mermaid diagrams in the Markdown report.
    #[serde(default = "default_true")]
    pub diagrams: bool,
    /// Read and parse files on the rayon pool.
    #[serde(default = "default_true")]
    pub parallel: bool,
}

/// Filters for meaningful script constants.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VariablesConfig {
    /// Lowercase substrings that mark a constant as worth listing.
    #[serde(default = "default_keywords")]
    pub keywords: Vec<String>,
}

impl Default for VariablesConfig {
    fn default() -> Self {
        Self {
            keywords: default_keywords(),
        }
    }
}

fn default_output() -> String {
    "codebrev.md".to_string()
}

fn default_aliases() -> BTreeMap<String, String> {
    let mut aliases = BTreeMap::new();
    aliases.insert("~".to_string(), "src".to_string());
    aliases
}

fn default_keywords() -> Vec<String> {
    ["config", "default", "option", "setting"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output: default_output(),
            excluded_paths: Vec::new(),
            risk: RiskThresholds::default(),
            aliases: default_aliases(),
            variables: VariablesConfig::default(),
            diagrams: true,
            parallel: true,
        }
    }
}

impl Config {
    /// Parse a config from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::parse_str(&content)
    }

    /// Parse a config from YAML text. Empty text yields the defaults.
    pub fn parse_str(content: &str) -> anyhow::Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Config = serde_yaml::from_str(content)?;
        Ok(config)
    }

    /// Locate a config file in `root`, if any.
    pub fn discover(root: &Path) -> Option<PathBuf> {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| root.join(name))
            .find(|path| path.is_file())
    }

    /// Load the config for `root`: an explicit path, a discovered file, or
    /// the defaults.
    pub fn load(root: &Path, explicit: Option<&Path>) -> anyhow::Result<Self> {
        match explicit {
            Some(path) => Self::parse_file(path),
            None => match Self::discover(root) {
                Some(path) => Self::parse_file(&path),
                None => Ok(Self::default()),
            },
        }
    }

    /// Compile `excluded_paths` into a matcher. Invalid patterns are skipped.
    pub fn exclusion_set(&self) -> GlobSet {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.excluded_paths {
            match Glob::new(pattern) {
                Ok(glob) => {
                    builder.add(glob);
                }
                Err(e) => warn!(pattern = %pattern, error = %e, "invalid excluded_paths pattern"),
            }
        }
        builder.build().unwrap_or_else(|_| GlobSet::empty())
    }

    /// Check a repo-relative path against `excluded_paths`.
    pub fn is_path_excluded(&self, rel_path: &str) -> bool {
        if self.excluded_paths.is_empty() {
            return false;
        }
        self.exclusion_set().is_match(rel_path)
    }

    /// Resolve the report path against the scan root.
    pub fn output_path(&self, root: &Path) -> PathBuf {
        let output = Path::new(&self.output);
        if output.is_absolute() {
            output.to_path_buf()
        } else {
            root.join(output)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::parse_str("").unwrap();
        assert_eq!(config.output, "codebrev.md");
        assert_eq!(config.risk, RiskThresholds::default());
        assert_eq!(config.aliases.get("~").map(String::as_str), Some("src"));
        assert_eq!(config.variables.keywords.len(), 4);
        assert!(config.diagrams);
        assert!(config.parallel);
    }

    #[test]
    fn test_partial_overrides() {
        let yaml = r#"
output: docs/outline.md
excluded_paths:
  - "vendor/**"
  - "**/generated/**"
risk:
  high_above: 20
aliases:
  "@": app
diagrams: false
"#;
        let config = Config::parse_str(yaml).unwrap();
        assert_eq!(config.output, "docs/outline.md");
        assert_eq!(config.risk.medium_above, 3);
        assert_eq!(config.risk.high_above, 20);
        assert_eq!(config.aliases.get("@").map(String::as_str), Some("app"));
        assert!(config.aliases.get("~").is_none());
        assert!(!config.diagrams);
        assert!(config.parallel);
    }

    #[test]
    fn test_is_path_excluded() {
        let config = Config {
            excluded_paths: vec!["vendor/**".to_string(), "**/generated/**".to_string()],
            ..Default::default()
        };
        assert!(config.is_path_excluded("vendor/lib/x.go"));
        assert!(config.is_path_excluded("web/generated/api.ts"));
        assert!(!config.is_path_excluded("web/src/api.ts"));
    }

    #[test]
    fn test_discover_and_load() {
        let temp = TempDir::new().unwrap();
        assert!(Config::discover(temp.path()).is_none());
        assert_eq!(Config::load(temp.path(), None).unwrap().output, "codebrev.md");

        fs::write(temp.path().join(".codebrev.yaml"), "output: out.md\n").unwrap();
        assert_eq!(Config::load(temp.path(), None).unwrap().output, "out.md");
        assert_eq!(
            Config::default().output_path(Path::new("/repo")),
            PathBuf::from("/repo/codebrev.md")
        );
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        assert!(Config::parse_str("risk: [1, 2").is_err());
    }
}
