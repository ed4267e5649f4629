//! sharpscan: a rule-based security scanner for C# source.
//!
//! A file is parsed with tree-sitter, then a fixed, ordered set of rules
//! (SQL injection, exception handling, XSS, XXE, deserialization, CSRF)
//! inspects the tree and reports [`Diagnostic`]s.
//!
//! ```no_run
//! use sharpscan::Analyzer;
//!
//! let analyzer = Analyzer::new()?;
//! for diagnostic in analyzer.analyze_source("class A { }")? {
//!     println!("{}", diagnostic);
//! }
//! # Ok::<(), sharpscan::Error>(())
//! ```

pub mod analyzers;
pub mod cli;
pub mod config;
pub mod error;
pub mod reporters;
pub mod rules;
pub mod scanner;
pub mod syntax;
pub mod types;

pub use analyzers::Analyzer;
pub use config::Config;
pub use error::{Error, Result};
pub use rules::{Rule, RuleSet, XxeScope};
pub use scanner::{ScanReport, Scanner};
pub use syntax::{SourceFile, SyntaxNode};
pub use types::{Diagnostic, Location, RuleCategory, Severity};
