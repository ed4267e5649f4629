//! CLI entry point for sharpscan.

use anyhow::{bail, Result};
use clap::Parser;
use colored::Colorize;
use sharpscan::{
    cli::{Cli, Commands},
    config::{generate_default_config, Config},
    reporters::{report, severity_label, OutputFormat},
    RuleSet, Scanner, Severity,
};
use std::io;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Exit code when a finding reaches the `--fail-on` threshold.
const EXIT_FINDINGS: u8 = 1;
/// Exit code when some input could not be read or parsed.
const EXIT_INPUT_ERROR: u8 = 2;
/// Exit code for bad arguments, config errors and failed commands.
const EXIT_USAGE: u8 = 3;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version also arrive here, on stdout.
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(EXIT_USAGE)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::from(EXIT_USAGE)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| log_level.into()))
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let base_config = if let Some(ref config_path) = cli.config {
        Config::load(config_path)?
    } else {
        Config::load_default()
    };

    match cli.command {
        Commands::Scan {
            paths,
            output,
            min_severity,
            fail_on,
            disabled_rules,
        } => {
            let format: OutputFormat = cli.format.parse().map_err(|e| anyhow::anyhow!("{}", e))?;
            let fail_on = fail_on.as_deref().map(parse_severity).transpose()?;

            let mut config = base_config;
            if let Some(ref s) = min_severity {
                config.min_severity = parse_severity(s)?;
            }
            for rule in disabled_rules {
                if !config.disabled_rules.contains(&rule) {
                    config.disabled_rules.push(rule);
                }
            }

            let scanner = Scanner::with_config(config)?;
            let scan_report = scanner.scan_paths(&paths);

            if let Some(output_path) = output {
                let mut file = std::fs::File::create(&output_path)?;
                report(&scan_report, format, &mut file)?;
                eprintln!("Report written to: {}", output_path.display());
            } else {
                let mut stdout = io::stdout().lock();
                report(&scan_report, format, &mut stdout)?;
            }

            for failure in &scan_report.errors {
                eprintln!(
                    "{} {}: {}",
                    "error:".red().bold(),
                    failure.path.display(),
                    failure.message
                );
            }

            if !scan_report.errors.is_empty() {
                return Ok(ExitCode::from(EXIT_INPUT_ERROR));
            }
            if let (Some(threshold), Some(max)) = (fail_on, scan_report.max_severity()) {
                if max >= threshold {
                    return Ok(ExitCode::from(EXIT_FINDINGS));
                }
            }
        }

        Commands::Rules { rule, json } => {
            let rules = RuleSet::from_config(&base_config)?.infos();

            let selected: Vec<_> = match rule {
                Some(ref id) => rules
                    .into_iter()
                    .filter(|r| r.id == id || r.checks.iter().any(|c| c.id == id))
                    .collect(),
                None => rules,
            };

            if let Some(ref id) = rule {
                if selected.is_empty() {
                    bail!("Rule not found: {}", id);
                }
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&selected)?);
            } else {
                println!("{}", "Available Rules".bold().underline());
                let mut total = 0;
                for r in &selected {
                    println!("\n{} ({})", r.title.bold(), r.id);
                    for check in r.checks {
                        println!(
                            "  {} [{}] {} ({})",
                            check.id.bright_cyan(),
                            severity_label(check.severity),
                            check.summary,
                            check.cwe
                        );
                        total += 1;
                    }
                }
                println!();
                println!("Total: {} checks in {} rules", total, selected.len());
            }
        }

        Commands::Init { output } => {
            if output.exists() {
                bail!(
                    "Config file already exists: {} (use a different path or remove it)",
                    output.display()
                );
            }

            std::fs::write(&output, generate_default_config())?;
            println!(
                "{}",
                format!("Created config file: {}", output.display()).green()
            );
            println!("Edit this file to disable rules or adjust severity filtering.");
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn parse_severity(s: &str) -> Result<Severity> {
    s.parse().map_err(|e| anyhow::anyhow!("{}", e))
}
