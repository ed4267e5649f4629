//! Cross-site scripting rule.
//!
//! Detects raw output sinks such as `Response.Write(input)` whose arguments
//! never pass through an encoder like `HttpUtility.HtmlEncode`.

use super::text::mentions_any;
use super::{Check, Rule};
use crate::syntax::csharp::kinds;
use crate::syntax::SyntaxNode;
use crate::types::{Diagnostic, RuleCategory, Severity};

const UNENCODED_SINK: Check = Check {
    id: "XSS-001",
    severity: Severity::High,
    cwe: "CWE-79",
    summary: "Unencoded data written to an HTML sink",
};

const CHECKS: &[Check] = &[UNENCODED_SINK];

pub struct XssRule {
    sinks: &'static [&'static str],
    sanitizers: &'static [&'static str],
}

impl XssRule {
    pub fn new() -> Self {
        Self {
            sinks: &["Response.Write", "innerHTML"],
            sanitizers: &["HtmlEncode", "Sanitize"],
        }
    }
}

impl Default for XssRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for XssRule {
    fn id(&self) -> &'static str {
        "xss"
    }

    fn title(&self) -> &'static str {
        "Cross-site scripting"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::CrossSiteScripting
    }

    fn checks(&self) -> &'static [Check] {
        CHECKS
    }

    fn check(&self, root: SyntaxNode<'_>, diagnostics: &mut Vec<Diagnostic>) {
        for call in root.descendants_of_kind(kinds::INVOCATION_EXPRESSION) {
            let Some(callee) = call.callee() else {
                continue;
            };
            if !mentions_any(callee.text(), self.sinks) {
                continue;
            }

            let sanitized = call
                .arguments()
                .iter()
                .any(|arg| mentions_any(arg.text(), self.sanitizers));

            if !sanitized {
                diagnostics.push(UNENCODED_SINK.report(
                    call,
                    format!(
                        "Potentially vulnerable call {} detected; escape input data before output",
                        callee.text()
                    ),
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::{ids, run_rule};

    fn run(source: &str) -> Vec<Diagnostic> {
        run_rule(&XssRule::new(), source)
    }

    #[test]
    fn test_raw_response_write() {
        let diagnostics = run(r#"
class Page {
    void Render(string name) {
        Response.Write("<b>" + name + "</b>");
        HttpContext.Current.Response.Write(name);
    }
}
"#);
        assert_eq!(ids(&diagnostics), vec!["XSS-001", "XSS-001"]);
        assert!(diagnostics[0].message.contains("Response.Write"));
        assert!(diagnostics[1]
            .message
            .contains("HttpContext.Current.Response.Write"));
    }

    #[test]
    fn test_encoded_arguments_are_accepted() {
        let diagnostics = run(r#"
class Page {
    void Render(string name, string bio) {
        Response.Write(HttpUtility.HtmlEncode(name));
        element.innerHTML(Sanitizer.Sanitize(bio));
    }
}
"#);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_inner_html_call() {
        let diagnostics = run(r#"
class Widget {
    void Show(string html) {
        dom.innerHTML(html);
    }
}
"#);
        assert_eq!(ids(&diagnostics), vec!["XSS-001"]);
    }

    #[test]
    fn test_sanitizer_outside_arguments_does_not_count() {
        let diagnostics = run(r#"
class Page {
    void Render(string name) {
        var safe = HttpUtility.HtmlEncode(name);
        Response.Write(name);
    }
}
"#);
        assert_eq!(ids(&diagnostics), vec!["XSS-001"]);
    }
}
