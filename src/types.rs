//! Core types shared by the front-end, the rules and the reporters.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity level of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Info => "info",
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        };
        f.write_str(s)
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "info" => Ok(Severity::Info),
            "low" => Ok(Severity::Low),
            "medium" | "med" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            "critical" | "crit" => Ok(Severity::Critical),
            _ => Err(format!("Unknown severity: {}", s)),
        }
    }
}

/// Vulnerability class a rule belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleCategory {
    SqlInjection,
    ExceptionHandling,
    CrossSiteScripting,
    XmlExternalEntity,
    Deserialization,
    RequestForgery,
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RuleCategory::SqlInjection => "SQL Injection",
            RuleCategory::ExceptionHandling => "Exception Handling",
            RuleCategory::CrossSiteScripting => "Cross-Site Scripting",
            RuleCategory::XmlExternalEntity => "XML External Entity",
            RuleCategory::Deserialization => "Deserialization",
            RuleCategory::RequestForgery => "Cross-Site Request Forgery",
        };
        f.write_str(s)
    }
}

/// Position of a node in the scanned source.
///
/// Lines and columns are 1-based and columns count characters, not bytes.
/// Ordering compares byte offsets first, so a sorted list of locations is in
/// document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Location {
    pub start_byte: usize,
    pub end_byte: usize,
    pub start_line: usize,
    pub start_column: usize,
    pub end_line: usize,
    pub end_column: usize,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start_line, self.start_column)
    }
}

/// A single finding reported by a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Identifier of the check that produced this diagnostic (e.g. `SQLI-002`).
    pub rule_id: &'static str,
    pub severity: Severity,
    pub message: String,
    pub location: Location,
    /// CWE reference, when one applies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cwe: Option<&'static str>,
    /// Source text of the flagged node.
    pub snippet: String,
}

impl Diagnostic {
    pub fn new(
        rule_id: &'static str,
        severity: Severity,
        message: impl Into<String>,
        location: Location,
    ) -> Self {
        Self {
            rule_id,
            severity,
            message: message.into(),
            location,
            cwe: None,
            snippet: String::new(),
        }
    }

    pub fn with_cwe(mut self, cwe: &'static str) -> Self {
        self.cwe = Some(cwe);
        self
    }

    /// Attach the flagged source text. Multi-line text is cut to its first line.
    pub fn with_snippet(mut self, snippet: &str) -> Self {
        self.snippet = snippet.lines().next().unwrap_or("").trim().to_string();
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.message, self.location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(start_byte: usize, line: usize) -> Location {
        Location {
            start_byte,
            end_byte: start_byte + 1,
            start_line: line,
            start_column: 1,
            end_line: line,
            end_column: 2,
        }
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Critical > Severity::High);
        assert!(Severity::High > Severity::Medium);
        assert!(Severity::Low > Severity::Info);
    }

    #[test]
    fn test_severity_parse() {
        assert_eq!("HIGH".parse::<Severity>().unwrap(), Severity::High);
        assert_eq!("crit".parse::<Severity>().unwrap(), Severity::Critical);
        assert!("urgent".parse::<Severity>().is_err());
    }

    #[test]
    fn test_location_orders_by_offset() {
        assert!(location(10, 2) < location(40, 1));
    }

    #[test]
    fn test_diagnostic_display() {
        let diagnostic = Diagnostic::new("TEST-001", Severity::Low, "Something odd", location(0, 3));
        assert_eq!(diagnostic.to_string(), "Something odd at 3:1");
    }

    #[test]
    fn test_snippet_keeps_first_line() {
        let diagnostic = Diagnostic::new("TEST-001", Severity::Low, "m", location(0, 1))
            .with_snippet("  catch (Exception)\n  {\n  }");
        assert_eq!(diagnostic.snippet, "catch (Exception)");
    }
}
