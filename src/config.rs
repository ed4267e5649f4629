//! Scanner configuration loaded from `.sharpscan.toml`.

use crate::error::{Error, Result};
use crate::rules::XxeScope;
use crate::types::Severity;
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = ".sharpscan.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Rule ids to skip, e.g. `["xxe"]`.
    pub disabled_rules: Vec<String>,
    /// Diagnostics below this severity are dropped from reports.
    pub min_severity: Severity,
    /// Glob patterns, relative to the scanned directory, to skip.
    pub exclude: Vec<String>,
    pub xxe_scope: XxeScope,
    /// Files larger than this many bytes are skipped.
    pub max_file_size: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            disabled_rules: Vec::new(),
            min_severity: Severity::Info,
            exclude: vec!["bin/**".to_string(), "obj/**".to_string()],
            xxe_scope: XxeScope::default(),
            max_file_size: 1024 * 1024, // 1 MB
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&content)?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load `.sharpscan.toml` from the working directory, or defaults.
    pub fn load_default() -> Self {
        let path = Path::new(DEFAULT_CONFIG_FILE);
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn is_rule_enabled(&self, rule_id: &str) -> bool {
        !self.disabled_rules.iter().any(|r| r == rule_id)
    }

    /// Compile the exclude patterns; invalid patterns are logged and skipped.
    pub fn exclude_globs(&self) -> GlobSet {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.exclude {
            match Glob::new(pattern) {
                Ok(glob) => {
                    builder.add(glob);
                }
                Err(e) => tracing::warn!("Invalid exclude pattern {:?}: {}", pattern, e),
            }
        }
        builder.build().unwrap_or_else(|e| {
            tracing::warn!("Failed to build exclude patterns: {}", e);
            GlobSet::empty()
        })
    }
}

/// Commented default config written by `sharpscan init`.
pub fn generate_default_config() -> String {
    r#"# sharpscan configuration

# Rules to skip. Available: sql-injection, exception-handling, xss, xxe,
# deserialization, csrf
disabled_rules = []

# Drop diagnostics below this severity: info, low, medium, high, critical
min_severity = "info"

# Paths to skip when scanning a directory (glob patterns)
exclude = ["bin/**", "obj/**"]

# Which nodes the XXE rule inspects:
#   "constructions" - every object construction in the file
#   "root"          - only the node the rule is invoked on
xxe_scope = "constructions"

# Skip files larger than this (bytes)
max_file_size = 1048576
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_generated_config_matches_defaults() {
        let parsed: Config = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let parsed: Config = toml::from_str(
            r#"
disabled_rules = ["xss"]
min_severity = "high"
xxe_scope = "root"
"#,
        )
        .unwrap();
        assert!(!parsed.is_rule_enabled("xss"));
        assert!(parsed.is_rule_enabled("csrf"));
        assert_eq!(parsed.min_severity, Severity::High);
        assert_eq!(parsed.xxe_scope, XxeScope::Root);
        assert_eq!(parsed.max_file_size, 1024 * 1024);
    }

    #[test]
    fn test_load_reports_bad_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "min_severity = 3").unwrap();
        assert!(matches!(Config::load(file.path()), Err(Error::Config(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Path::new("/nonexistent/sharpscan.toml")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_exclude_globs() {
        let config = Config {
            exclude: vec!["obj/**".to_string(), "[".to_string()],
            ..Default::default()
        };
        let globs = config.exclude_globs();
        assert!(globs.is_match("obj/Debug/Generated.cs"));
        assert!(!globs.is_match("src/Controller.cs"));
    }
}
