//! Exception handling rule.
//!
//! Looks at catch clauses for overly broad or swallowed exceptions and for
//! exception details leaking into output, and at methods that perform I/O
//! without any try block.

use super::text::mentions_any;
use super::{Check, Rule};
use crate::syntax::csharp::kinds;
use crate::syntax::SyntaxNode;
use crate::types::{Diagnostic, RuleCategory, Severity};

const BROAD_CATCH: Check = Check {
    id: "EXC-001",
    severity: Severity::Medium,
    cwe: "CWE-396",
    summary: "Overly broad catch (Exception)",
};

const EMPTY_CATCH: Check = Check {
    id: "EXC-002",
    severity: Severity::Medium,
    cwe: "CWE-390",
    summary: "Empty or non-functional catch block",
};

const DETAILS_LOGGED: Check = Check {
    id: "EXC-003",
    severity: Severity::Low,
    cwe: "CWE-209",
    summary: "Exception message or stack trace logged",
};

const UNGUARDED_OPERATION: Check = Check {
    id: "EXC-004",
    severity: Severity::Low,
    cwe: "CWE-755",
    summary: "Critical operation without try-catch",
};

const CHECKS: &[Check] = &[BROAD_CATCH, EMPTY_CATCH, DETAILS_LOGGED, UNGUARDED_OPERATION];

pub struct ExceptionHandlingRule {
    generic_types: &'static [&'static str],
    /// Variable name assumed when a catch declares none.
    default_variable: &'static str,
    detail_members: &'static [&'static str],
    critical_markers: &'static [&'static str],
}

impl ExceptionHandlingRule {
    pub fn new() -> Self {
        Self {
            generic_types: &["Exception", "System.Exception"],
            default_variable: "ex",
            detail_members: &["Message", "StackTrace"],
            critical_markers: &["File", "HttpClient", "Sql"],
        }
    }

    fn check_catch(&self, catch: SyntaxNode<'_>, diagnostics: &mut Vec<Diagnostic>) {
        let (declared_type, variable) = catch.catch_declaration().unwrap_or((None, None));

        if declared_type.is_some_and(|ty| self.generic_types.contains(&ty.trim())) {
            diagnostics.push(BROAD_CATCH.report(
                catch,
                "Generic exception handler catch (Exception) detected; catch a more specific exception type",
            ));
        }

        let Some(body) = catch.body_block() else {
            return;
        };
        let statements = body.statements();

        if statements.iter().all(|s| s.is_kind(kinds::EMPTY_STATEMENT)) {
            diagnostics.push(EMPTY_CATCH.report(
                catch,
                "Empty or non-functional catch block detected; add logic to handle the exception",
            ));
        }

        let variable = variable.unwrap_or(self.default_variable);
        let accessors: Vec<String> = self
            .detail_members
            .iter()
            .map(|member| format!("{}.{}", variable, member))
            .collect();

        for statement in statements {
            let leaks_details = statement
                .descendants_of_kind(kinds::MEMBER_ACCESS_EXPRESSION)
                .filter_map(|access| access.member_parts())
                .any(|(receiver, member)| {
                    receiver.text() == variable && self.detail_members.contains(&member.text())
                });
            if leaks_details {
                diagnostics.push(DETAILS_LOGGED.report(
                    statement,
                    format!(
                        "Exception details logged ({}); this may leak sensitive information",
                        accessors.join(" or ")
                    ),
                ));
            }
        }
    }

    fn check_method(&self, method: SyntaxNode<'_>, diagnostics: &mut Vec<Diagnostic>) {
        let has_critical_call = method
            .descendants_of_kind(kinds::INVOCATION_EXPRESSION)
            .any(|call| mentions_any(call.text(), self.critical_markers));
        if !has_critical_call {
            return;
        }

        let has_try = method.descendants_of_kind(kinds::TRY_STATEMENT).next().is_some();
        if !has_try {
            diagnostics.push(UNGUARDED_OPERATION.report(
                method,
                format!(
                    "Method '{}' performs critical operations but has no try-catch block; add exception handling",
                    method.name_text()
                ),
            ));
        }
    }
}

impl Default for ExceptionHandlingRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for ExceptionHandlingRule {
    fn id(&self) -> &'static str {
        "exception-handling"
    }

    fn title(&self) -> &'static str {
        "Unsafe exception handling"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::ExceptionHandling
    }

    fn checks(&self) -> &'static [Check] {
        CHECKS
    }

    fn check(&self, root: SyntaxNode<'_>, diagnostics: &mut Vec<Diagnostic>) {
        for catch in root.descendants_of_kind(kinds::CATCH_CLAUSE) {
            self.check_catch(catch, diagnostics);
        }
        for method in root.descendants_of_kind(kinds::METHOD_DECLARATION) {
            self.check_method(method, diagnostics);
        }
    }
}
