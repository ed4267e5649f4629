//! XML external entity rule.
//!
//! Inspects object constructions:
//! - `new XmlReaderSettings(..)` that enables or does not disable DTD processing
//! - `new XmlUrlResolver()`
//! - any construction with no validation call among its own descendants

use super::text::{mentions, mentions_any};
use super::{Check, Rule};
use crate::syntax::csharp::{kinds, type_names};
use crate::syntax::SyntaxNode;
use crate::types::{Diagnostic, RuleCategory, Severity};
use serde::{Deserialize, Serialize};

const DTD_PARSE: Check = Check {
    id: "XXE-001",
    severity: Severity::High,
    cwe: "CWE-611",
    summary: "XmlReaderSettings with DtdProcessing.Parse",
};

const DTD_NOT_DISABLED: Check = Check {
    id: "XXE-002",
    severity: Severity::Medium,
    cwe: "CWE-611",
    summary: "XmlReaderSettings does not disable DTD processing",
};

const URL_RESOLVER: Check = Check {
    id: "XXE-003",
    severity: Severity::High,
    cwe: "CWE-611",
    summary: "XmlUrlResolver may resolve external entities",
};

const MISSING_VALIDATION: Check = Check {
    id: "XXE-004",
    severity: Severity::Low,
    cwe: "CWE-20",
    summary: "Missing XML input validation",
};

const CHECKS: &[Check] = &[DTD_PARSE, DTD_NOT_DISABLED, URL_RESOLVER, MISSING_VALIDATION];

/// Which nodes the XXE rule inspects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum XxeScope {
    /// Every object construction in the tree.
    #[default]
    Constructions,
    /// Only the node handed to the rule, and only if it is itself a
    /// construction. Run from a file root this reports nothing.
    Root,
}

pub struct XxeRule {
    scope: XxeScope,
    settings_type: &'static str,
    resolver_types: &'static [&'static str],
    dtd_setting: &'static str,
    dtd_parse: &'static str,
    dtd_disabled: &'static [&'static str],
    validation_markers: &'static [&'static str],
}

impl XxeRule {
    pub fn new(scope: XxeScope) -> Self {
        Self {
            scope,
            settings_type: "XmlReaderSettings",
            resolver_types: &["XmlUrlResolver"],
            dtd_setting: "DtdProcessing",
            dtd_parse: "DtdProcessing.Parse",
            dtd_disabled: &["DtdProcessing.Prohibit", "DtdProcessing.Ignore"],
            // "Validate" also covers "ValidateXml".
            validation_markers: &["Validate"],
        }
    }

    /// DTD setting passed to the constructor or, failing that, set in its initializer.
    fn find_dtd_setting<'t>(&self, creation: SyntaxNode<'t>) -> Option<&'t str> {
        creation
            .arguments()
            .into_iter()
            .chain(creation.initializer_assignments())
            .map(|n| n.text())
            .find(|text| mentions(text, self.dtd_setting))
    }

    fn inspect(&self, node: SyntaxNode<'_>, diagnostics: &mut Vec<Diagnostic>) {
        if !node.is_kind(kinds::OBJECT_CREATION_EXPRESSION) {
            return;
        }
        let type_text = node.constructed_type().unwrap_or("");

        if type_names(type_text, self.settings_type) {
            if let Some(setting) = self.find_dtd_setting(node) {
                if mentions(setting, self.dtd_parse) {
                    diagnostics.push(DTD_PARSE.report(
                        node,
                        "XML reader uses the unsafe DtdProcessing.Parse setting, which allows XXE attacks",
                    ));
                }
                if !mentions_any(setting, self.dtd_disabled) {
                    diagnostics.push(DTD_NOT_DISABLED.report(
                        node,
                        "XML reader does not disable DTD processing, which may allow XXE attacks",
                    ));
                }
            }
        }

        if self.resolver_types.iter().any(|r| type_names(type_text, r)) {
            diagnostics.push(URL_RESOLVER.report(
                node,
                "Using XmlUrlResolver may lead to an XXE attack",
            ));
        }

        let validated = node
            .descendants_of_kind(kinds::INVOCATION_EXPRESSION)
            .any(|call| mentions_any(call.text(), self.validation_markers));
        if !validated {
            diagnostics.push(MISSING_VALIDATION.report(
                node,
                "XML input is not validated; validate it against an XSD schema",
            ));
        }
    }
}

impl Default for XxeRule {
    fn default() -> Self {
        Self::new(XxeScope::default())
    }
}

impl Rule for XxeRule {
    fn id(&self) -> &'static str {
        "xxe"
    }

    fn title(&self) -> &'static str {
        "XML external entity injection"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::XmlExternalEntity
    }

    fn checks(&self) -> &'static [Check] {
        CHECKS
    }

    fn check(&self, root: SyntaxNode<'_>, diagnostics: &mut Vec<Diagnostic>) {
        match self.scope {
            XxeScope::Root => self.inspect(root, diagnostics),
            XxeScope::Constructions => {
                for node in std::iter::once(root).chain(root.descendants()) {
                    self.inspect(node, diagnostics);
                }
            }
        }
    }
}
