//! Security rules and the rule set that runs them.
//!
//! Each rule inspects one parsed tree and appends diagnostics to a shared
//! list. Rules never see each other's output; the [`RuleSet`] runs them in
//! registration order, so the combined output is ordered by rule first and
//! by document position within a rule.

mod csrf;
mod deserialization;
mod exception_handling;
mod sql_injection;
pub mod text;
mod xss;
mod xxe;

pub use csrf::CsrfRule;
pub use deserialization::DeserializationRule;
pub use exception_handling::ExceptionHandlingRule;
pub use sql_injection::SqlInjectionRule;
pub use xss::XssRule;
pub use xxe::{XxeRule, XxeScope};

use crate::config::Config;
use crate::error::Result;
use crate::syntax::SyntaxNode;
use crate::types::{Diagnostic, RuleCategory, Severity};
use serde::Serialize;

/// One kind of finding a rule can report.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Check {
    pub id: &'static str,
    pub severity: Severity,
    pub cwe: &'static str,
    pub summary: &'static str,
}

impl Check {
    /// Build a diagnostic for this check located at `node`.
    pub fn report(&self, node: SyntaxNode<'_>, message: impl Into<String>) -> Diagnostic {
        Diagnostic::new(self.id, self.severity, message, node.location())
            .with_cwe(self.cwe)
            .with_snippet(node.text())
    }
}

/// A detector that inspects a syntax tree for one class of weakness.
pub trait Rule: Send + Sync {
    /// Stable identifier used in config files, e.g. `sql-injection`.
    fn id(&self) -> &'static str;

    fn title(&self) -> &'static str;

    fn category(&self) -> RuleCategory;

    /// Every check this rule can report.
    fn checks(&self) -> &'static [Check];

    /// Inspect the tree under `root` and append findings to `diagnostics`.
    fn check(&self, root: SyntaxNode<'_>, diagnostics: &mut Vec<Diagnostic>);
}

/// Serializable summary of a rule for listings.
#[derive(Debug, Clone, Serialize)]
pub struct RuleInfo {
    pub id: &'static str,
    pub title: &'static str,
    pub category: RuleCategory,
    pub checks: &'static [Check],
}

impl RuleInfo {
    fn of(rule: &dyn Rule) -> Self {
        Self {
            id: rule.id(),
            title: rule.title(),
            category: rule.category(),
            checks: rule.checks(),
        }
    }
}

/// The built-in rules in their reporting order.
pub fn builtin_rules(xxe_scope: XxeScope) -> Result<Vec<Box<dyn Rule>>> {
    Ok(vec![
        Box::new(SqlInjectionRule::new()?),
        Box::new(ExceptionHandlingRule::new()),
        Box::new(XssRule::new()),
        Box::new(XxeRule::new(xxe_scope)),
        Box::new(DeserializationRule::new()),
        Box::new(CsrfRule::new()),
    ])
}

/// Ordered collection of rules run against a tree.
#[derive(Default)]
pub struct RuleSet {
    rules: Vec<Box<dyn Rule>>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Load the built-in rules with default settings.
    pub fn with_builtin_rules(mut self) -> Result<Self> {
        self.rules.extend(builtin_rules(XxeScope::default())?);
        Ok(self)
    }

    /// Built-in rules minus the ones the config disables, order preserved.
    pub fn from_config(config: &Config) -> Result<Self> {
        let rules = builtin_rules(config.xxe_scope)?
            .into_iter()
            .filter(|rule| {
                let enabled = config.is_rule_enabled(rule.id());
                if !enabled {
                    tracing::debug!("Rule {} disabled by config", rule.id());
                }
                enabled
            })
            .collect();
        Ok(Self { rules })
    }

    /// Append a custom rule; it reports after every rule already registered.
    pub fn add_rule(&mut self, rule: Box<dyn Rule>) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[Box<dyn Rule>] {
        &self.rules
    }

    pub fn infos(&self) -> Vec<RuleInfo> {
        self.rules.iter().map(|r| RuleInfo::of(r.as_ref())).collect()
    }

    /// Run every rule over `root` and return their combined findings.
    pub fn run(&self, root: SyntaxNode<'_>) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        for rule in &self.rules {
            let before = diagnostics.len();
            rule.check(root, &mut diagnostics);
            tracing::debug!(
                "Rule {} reported {} finding(s)",
                rule.id(),
                diagnostics.len() - before
            );
        }
        diagnostics
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::SourceFile;

    struct FixedRule(&'static str);

    impl Rule for FixedRule {
        fn id(&self) -> &'static str {
            self.0
        }

        fn title(&self) -> &'static str {
            "Fixed"
        }

        fn category(&self) -> RuleCategory {
            RuleCategory::SqlInjection
        }

        fn checks(&self) -> &'static [Check] {
            &[]
        }

        fn check(&self, root: SyntaxNode<'_>, diagnostics: &mut Vec<Diagnostic>) {
            diagnostics.push(Diagnostic::new(self.0, Severity::Info, self.0, root.location()));
        }
    }

    #[test]
    fn test_builtin_rule_order() {
        let set = RuleSet::new().with_builtin_rules().unwrap();
        let ids: Vec<_> = set.rules().iter().map(|r| r.id()).collect();
        assert_eq!(
            ids,
            vec!["sql-injection", "exception-handling", "xss", "xxe", "deserialization", "csrf"]
        );
    }

    #[test]
    fn test_run_preserves_registration_order() {
        let mut set = RuleSet::new();
        set.add_rule(Box::new(FixedRule("second")));
        set.add_rule(Box::new(FixedRule("first")));
        let file = SourceFile::parse("class A { }").unwrap();
        let ids: Vec<_> = set.run(file.root()).iter().map(|d| d.rule_id).collect();
        assert_eq!(ids, vec!["second", "first"]);
    }

    #[test]
    fn test_from_config_skips_disabled_rules() {
        let config = Config {
            disabled_rules: vec!["xss".to_string(), "csrf".to_string()],
            ..Default::default()
        };
        let set = RuleSet::from_config(&config).unwrap();
        let ids: Vec<_> = set.rules().iter().map(|r| r.id()).collect();
        assert_eq!(
            ids,
            vec!["sql-injection", "exception-handling", "xxe", "deserialization"]
        );
    }

    #[test]
    fn test_check_ids_are_unique() {
        let set = RuleSet::new().with_builtin_rules().unwrap();
        let mut ids: Vec<_> = set
            .infos()
            .iter()
            .flat_map(|info| info.checks.iter().map(|c| c.id))
            .collect();
        let total = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }
}
