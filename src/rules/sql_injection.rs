//! SQL injection rule.
//!
//! Flags patterns around ADO.NET command objects:
//! - `new SqlCommand("... WHERE name = '" + name + "'", conn)`
//! - `cmd.ExecuteReader()` with no `@param` marker, `SqlParameter` or validation call
//! - literals such as `"DROP TABLE Users"` or `"... IN (" + ids + ")"`

use super::text::mentions;
use super::{Check, Rule};
use crate::error::Result;
use crate::syntax::csharp::kinds;
use crate::syntax::SyntaxNode;
use crate::types::{Diagnostic, RuleCategory, Severity};
use regex::Regex;

const PREFIX: &str = "Possible SQL injection vulnerability";

const CONCATENATION: Check = Check {
    id: "SQLI-001",
    severity: Severity::High,
    cwe: "CWE-89",
    summary: "String concatenation in SQL query",
};

const UNPARAMETERIZED: Check = Check {
    id: "SQLI-002",
    severity: Severity::High,
    cwe: "CWE-89",
    summary: "SQL query without parameterization",
};

const UNESCAPED: Check = Check {
    id: "SQLI-003",
    severity: Severity::Medium,
    cwe: "CWE-89",
    summary: "Possible missing escaping of data in SQL query",
};

const UNVALIDATED: Check = Check {
    id: "SQLI-004",
    severity: Severity::Medium,
    cwe: "CWE-20",
    summary: "Missing validation of user input in SQL query",
};

const DANGEROUS_OPERATOR: Check = Check {
    id: "SQLI-005",
    severity: Severity::Medium,
    cwe: "CWE-89",
    summary: "Dangerous SQL operator in string literal",
};

const IN_CLAUSE: Check = Check {
    id: "SQLI-006",
    severity: Severity::Medium,
    cwe: "CWE-89",
    summary: "Possible SQL injection via IN clause",
};

const CHECKS: &[Check] = &[
    CONCATENATION,
    UNPARAMETERIZED,
    UNESCAPED,
    UNVALIDATED,
    DANGEROUS_OPERATOR,
    IN_CLAUSE,
];

/// Methods that execute a command's SQL.
const EXECUTE_METHODS: &[&str] = &["ExecuteReader", "ExecuteScalar", "ExecuteNonQuery"];

pub struct SqlInjectionRule {
    command_type: &'static str,
    parameter_type: &'static str,
    validate_method: &'static str,
    parameter_marker: &'static str,
    execute_methods: &'static [&'static str],
    dangerous_operators: Regex,
    in_clause: Regex,
}

impl SqlInjectionRule {
    pub fn new() -> Result<Self> {
        Ok(Self {
            command_type: "SqlCommand",
            parameter_type: "SqlParameter",
            validate_method: "Validate",
            parameter_marker: "@",
            execute_methods: EXECUTE_METHODS,
            dangerous_operators: Regex::new(r"(?i)\b(DROP|TRUNCATE|DELETE)\b")?,
            in_clause: Regex::new(r"(?i)IN\s*\(.*\)")?,
        })
    }

    /// A call that runs SQL: its callee names the command type, or it is one
    /// of the `Execute*` methods.
    fn is_command_sink(&self, call: SyntaxNode<'_>) -> bool {
        let Some(callee) = call.callee() else {
            return false;
        };
        if mentions(callee.text(), self.command_type) {
            return true;
        }
        callee
            .member_parts()
            .is_some_and(|(_, name)| self.execute_methods.contains(&name.text()))
    }

    /// Whether `expr` is passed straight into `new SqlCommand(...)`.
    fn is_command_argument(&self, expr: SyntaxNode<'_>) -> bool {
        let creation = expr
            .parent()
            .filter(|p| p.is_kind(kinds::ARGUMENT))
            .and_then(|arg| arg.parent())
            .filter(|list| list.is_kind(kinds::ARGUMENT_LIST))
            .and_then(|list| list.parent())
            .filter(|c| c.is_kind(kinds::OBJECT_CREATION_EXPRESSION));

        creation
            .and_then(|c| c.constructed_type())
            .is_some_and(|ty| mentions(ty, self.command_type))
    }

    fn check_concatenation(&self, root: SyntaxNode<'_>, diagnostics: &mut Vec<Diagnostic>) {
        for expr in root.descendants_of_kind(kinds::BINARY_EXPRESSION) {
            if expr.operator_text() != "+" {
                continue;
            }
            let left_names_command = expr
                .field("left")
                .is_some_and(|left| mentions(left.text(), self.command_type));

            if left_names_command || self.is_command_argument(expr) {
                diagnostics.push(
                    CONCATENATION.report(expr, "String concatenation detected in SQL query"),
                );
            }
        }
    }

    fn check_commands(&self, root: SyntaxNode<'_>, diagnostics: &mut Vec<Diagnostic>) {
        let sinks: Vec<_> = root
            .descendants_of_kind(kinds::INVOCATION_EXPRESSION)
            .filter(|call| self.is_command_sink(*call))
            .collect();

        let conditions = [
            (
                UNPARAMETERIZED,
                self.parameter_marker,
                "SQL query without parameterization",
            ),
            (
                UNESCAPED,
                self.parameter_type,
                "possible missing escaping of data in SQL query",
            ),
            (
                UNVALIDATED,
                self.validate_method,
                "missing validation of user input in SQL query",
            ),
        ];

        for (check, required, detail) in conditions {
            for call in &sinks {
                if !mentions(call.text(), required) {
                    diagnostics.push(check.report(*call, format!("{}: {}", PREFIX, detail)));
                }
            }
        }
    }

    fn check_literals(
        &self,
        root: SyntaxNode<'_>,
        check: Check,
        pattern: &Regex,
        message: &str,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        for literal in root.descendants().filter(|n| n.is_string_literal()) {
            if pattern.is_match(literal.text()) {
                diagnostics.push(check.report(literal, message));
            }
        }
    }
}

impl Rule for SqlInjectionRule {
    fn id(&self) -> &'static str {
        "sql-injection"
    }

    fn title(&self) -> &'static str {
        "SQL injection"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::SqlInjection
    }

    fn checks(&self) -> &'static [Check] {
        CHECKS
    }

    fn check(&self, root: SyntaxNode<'_>, diagnostics: &mut Vec<Diagnostic>) {
        self.check_concatenation(root, diagnostics);
        self.check_commands(root, diagnostics);
        self.check_literals(
            root,
            DANGEROUS_OPERATOR,
            &self.dangerous_operators,
            "Dangerous SQL operators detected (DROP, TRUNCATE, DELETE)",
            diagnostics,
        );
        self.check_literals(
            root,
            IN_CLAUSE,
            &self.in_clause,
            "Possible SQL injection via IN clause",
            diagnostics,
        );
    }
}
