//! Output formats for scan reports.

use crate::scanner::ScanReport;
use crate::types::Severity;
use colored::{ColoredString, Colorize};
use std::io::{self, Write};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

pub fn report(report: &ScanReport, format: OutputFormat, out: &mut dyn Write) -> io::Result<()> {
    match format {
        OutputFormat::Text => report_text(report, out),
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, report)?;
            writeln!(out)
        }
    }
}

pub fn severity_label(severity: Severity) -> ColoredString {
    let label = severity.to_string();
    match severity {
        Severity::Critical => label.bright_red(),
        Severity::High => label.red(),
        Severity::Medium => label.yellow(),
        Severity::Low => label.blue(),
        Severity::Info => label.white(),
    }
}

fn report_text(report: &ScanReport, out: &mut dyn Write) -> io::Result<()> {
    if report.total_diagnostics() == 0 {
        writeln!(out, "No issues found.")?;
        return Ok(());
    }

    writeln!(out, "Issues found:")?;
    for (path, diagnostic) in report.diagnostics() {
        writeln!(
            out,
            "[{}] {} {} at {}:{}",
            severity_label(diagnostic.severity),
            diagnostic.rule_id.bright_cyan(),
            diagnostic.message,
            path.display(),
            diagnostic.location
        )?;
    }

    let files_with_findings = report
        .files
        .iter()
        .filter(|f| !f.diagnostics.is_empty())
        .count();
    writeln!(
        out,
        "\n{} issue(s) in {} file(s)",
        report.total_diagnostics(),
        files_with_findings
    )
}
