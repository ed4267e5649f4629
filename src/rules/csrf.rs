//! Cross-site request forgery rule.
//!
//! Covers MVC controller conventions:
//! - `[HttpPost]` actions without `[ValidateAntiForgeryToken]`
//! - `[HttpGet]` actions that change state
//! - no `Request.Headers["Origin"]`/`["Referer"]` check anywhere
//! - `Response.Cookies.Append(..)` without a `SameSite` option

use super::text::{mentions, mentions_any};
use super::{Check, Rule};
use crate::syntax::csharp::kinds;
use crate::syntax::SyntaxNode;
use crate::types::{Diagnostic, RuleCategory, Severity};

const MISSING_ANTIFORGERY: Check = Check {
    id: "CSRF-001",
    severity: Severity::High,
    cwe: "CWE-352",
    summary: "POST handler missing anti-forgery validation",
};

const GET_MUTATES_STATE: Check = Check {
    id: "CSRF-002",
    severity: Severity::Medium,
    cwe: "CWE-352",
    summary: "GET handler mutates state",
};

const MISSING_ORIGIN_CHECK: Check = Check {
    id: "CSRF-003",
    severity: Severity::Low,
    cwe: "CWE-352",
    summary: "Missing Origin/Referer header check",
};

const COOKIE_SAMESITE: Check = Check {
    id: "CSRF-004",
    severity: Severity::Medium,
    cwe: "CWE-1275",
    summary: "Cookie missing SameSite attribute",
};

const CHECKS: &[Check] = &[
    MISSING_ANTIFORGERY,
    GET_MUTATES_STATE,
    MISSING_ORIGIN_CHECK,
    COOKIE_SAMESITE,
];

pub struct CsrfRule {
    post_attribute: &'static str,
    get_attribute: &'static str,
    antiforgery_attribute: &'static str,
    mutation_markers: &'static [&'static str],
    origin_headers: &'static [&'static str],
    cookie_append: &'static str,
    same_site: &'static str,
}

impl CsrfRule {
    pub fn new() -> Self {
        Self {
            post_attribute: "HttpPost",
            get_attribute: "HttpGet",
            antiforgery_attribute: "ValidateAntiForgeryToken",
            mutation_markers: &["Change", "Update"],
            origin_headers: &[r#"Request.Headers["Origin"]"#, r#"Request.Headers["Referer"]"#],
            cookie_append: "Response.Cookies.Append",
            same_site: "SameSite",
        }
    }

    fn has_attribute(method: SyntaxNode<'_>, name: &str) -> bool {
        method
            .attribute_names()
            .iter()
            .any(|attr| mentions(attr, name))
    }

    fn is_post_handler(&self, method: SyntaxNode<'_>) -> bool {
        Self::has_attribute(method, self.post_attribute)
    }

    /// Whether a direct statement of the method body looks like a mutation.
    fn modifies_state(&self, method: SyntaxNode<'_>) -> bool {
        method.body_block().is_some_and(|body| {
            body.statements()
                .iter()
                .any(|s| mentions_any(s.text(), self.mutation_markers))
        })
    }

    fn check_origin(
        &self,
        root: SyntaxNode<'_>,
        methods: &[SyntaxNode<'_>],
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        let has_origin_check = root
            .descendants_of_kind(kinds::IF_STATEMENT)
            .filter_map(|stmt| stmt.field("condition"))
            .any(|cond| mentions_any(cond.text(), self.origin_headers));
        if has_origin_check {
            return;
        }

        // Only the first method in the file gates this check.
        if methods.first().is_some_and(|m| self.is_post_handler(*m)) {
            diagnostics.push(MISSING_ORIGIN_CHECK.report(
                root,
                "The code never checks the Origin or Referer header",
            ));
        }
    }
}

impl Default for CsrfRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for CsrfRule {
    fn id(&self) -> &'static str {
        "csrf"
    }

    fn title(&self) -> &'static str {
        "Cross-site request forgery"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::RequestForgery
    }

    fn checks(&self) -> &'static [Check] {
        CHECKS
    }

    fn check(&self, root: SyntaxNode<'_>, diagnostics: &mut Vec<Diagnostic>) {
        let methods: Vec<_> = root
            .descendants_of_kind(kinds::METHOD_DECLARATION)
            .collect();

        for method in &methods {
            if self.is_post_handler(*method)
                && !Self::has_attribute(*method, self.antiforgery_attribute)
            {
                diagnostics.push(MISSING_ANTIFORGERY.report(
                    *method,
                    format!(
                        "POST handler '{}' is missing anti-forgery validation ([ValidateAntiForgeryToken])",
                        method.name_text()
                    ),
                ));
            }
        }

        for method in &methods {
            if Self::has_attribute(*method, self.get_attribute) && self.modifies_state(*method) {
                diagnostics.push(GET_MUTATES_STATE.report(
                    *method,
                    format!(
                        "GET handler '{}' changes application state; use [HttpPost] instead",
                        method.name_text()
                    ),
                ));
            }
        }

        self.check_origin(root, &methods, diagnostics);

        for call in root.descendants_of_kind(kinds::INVOCATION_EXPRESSION) {
            let appends_cookie = call
                .callee()
                .is_some_and(|callee| mentions(callee.text(), self.cookie_append));
            if appends_cookie && !mentions(call.text(), self.same_site) {
                diagnostics.push(COOKIE_SAMESITE.report(
                    call,
                    "Cookie is appended without the SameSite attribute",
                ));
            }
        }
    }
}
