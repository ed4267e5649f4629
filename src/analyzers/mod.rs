//! Single-file analysis: parse C# source and run the rule set over it.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::rules::RuleSet;
use crate::syntax::SourceFile;
use crate::types::Diagnostic;
use std::path::Path;

/// Parses source text and runs the configured rules over the tree.
pub struct Analyzer {
    rules: RuleSet,
}

impl Analyzer {
    /// Analyzer with every built-in rule.
    pub fn new() -> Result<Self> {
        Ok(Self {
            rules: RuleSet::new().with_builtin_rules()?,
        })
    }

    pub fn with_config(config: &Config) -> Result<Self> {
        Ok(Self {
            rules: RuleSet::from_config(config)?,
        })
    }

    pub fn with_rules(rules: RuleSet) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Parse and analyze source text.
    ///
    /// A parse failure is returned as [`Error::Parse`]; no rule runs on
    /// malformed input.
    pub fn analyze_source(&self, source: &str) -> Result<Vec<Diagnostic>> {
        let file = SourceFile::parse(source)?;
        Ok(self.analyze(&file))
    }

    /// Run the rules over an already parsed file.
    pub fn analyze(&self, file: &SourceFile) -> Vec<Diagnostic> {
        self.rules.run(file.root())
    }

    pub fn analyze_file(&self, path: &Path) -> Result<Vec<Diagnostic>> {
        let source = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.analyze_source(&source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_source_rejects_malformed_input() {
        let analyzer = Analyzer::new().unwrap();
        let result = analyzer.analyze_source("class A { void M( }");
        assert!(matches!(result, Err(Error::Parse { .. })));
    }

    #[test]
    fn test_analyze_clean_source() {
        let analyzer = Analyzer::new().unwrap();
        let diagnostics = analyzer
            .analyze_source("class A { int Twice(int x) { return x * 2; } }")
            .unwrap();
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_config_disables_rules() {
        let source = "class A { void M() { try { F(); } catch (Exception) { } } }";
        let all = Analyzer::new().unwrap().analyze_source(source).unwrap();
        assert!(!all.is_empty());

        let config = Config {
            disabled_rules: vec!["exception-handling".to_string()],
            ..Default::default()
        };
        let none = Analyzer::with_config(&config)
            .unwrap()
            .analyze_source(source)
            .unwrap();
        assert!(none.is_empty());
    }
}
