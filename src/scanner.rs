//! Multi-file scanning: resolve paths to C# files and analyze each one.

use crate::analyzers::Analyzer;
use crate::config::Config;
use crate::error::Result;
use crate::types::{Diagnostic, Severity};
use globset::GlobSet;
use serde::Serialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Findings for one scanned file.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub diagnostics: Vec<Diagnostic>,
}

/// A file that could not be read or parsed.
#[derive(Debug, Clone, Serialize)]
pub struct ScanFailure {
    pub path: PathBuf,
    pub message: String,
}

/// Results of scanning a set of paths.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanReport {
    pub files: Vec<FileReport>,
    pub errors: Vec<ScanFailure>,
}

impl ScanReport {
    pub fn total_diagnostics(&self) -> usize {
        self.files.iter().map(|f| f.diagnostics.len()).sum()
    }

    pub fn max_severity(&self) -> Option<Severity> {
        self.files
            .iter()
            .flat_map(|f| f.diagnostics.iter())
            .map(|d| d.severity)
            .max()
    }

    /// Every diagnostic paired with its file, in scan order.
    pub fn diagnostics(&self) -> impl Iterator<Item = (&Path, &Diagnostic)> {
        self.files
            .iter()
            .flat_map(|f| f.diagnostics.iter().map(move |d| (f.path.as_path(), d)))
    }
}

pub struct Scanner {
    analyzer: Analyzer,
    config: Config,
    excludes: GlobSet,
}

impl Scanner {
    pub fn with_config(config: Config) -> Result<Self> {
        Ok(Self {
            analyzer: Analyzer::with_config(&config)?,
            excludes: config.exclude_globs(),
            config,
        })
    }

    pub fn analyzer(&self) -> &Analyzer {
        &self.analyzer
    }

    /// Scan files and directories. Directories are searched for `*.cs` files.
    pub fn scan_paths(&self, paths: &[PathBuf]) -> ScanReport {
        let mut report = ScanReport::default();

        for path in paths {
            if !path.exists() {
                report.errors.push(ScanFailure {
                    path: path.clone(),
                    message: "no such file or directory".to_string(),
                });
                continue;
            }

            for file in self.collect_files(path) {
                match self.scan_file(&file) {
                    Ok(Some(diagnostics)) => report.files.push(FileReport {
                        path: file,
                        diagnostics,
                    }),
                    Ok(None) => {}
                    Err(e) => {
                        tracing::warn!("Failed to analyze {}: {}", file.display(), e);
                        report.errors.push(ScanFailure {
                            path: file,
                            message: e.to_string(),
                        });
                    }
                }
            }
        }

        tracing::info!(
            "Scanned {} file(s), {} finding(s), {} error(s)",
            report.files.len(),
            report.total_diagnostics(),
            report.errors.len()
        );
        report
    }

    fn collect_files(&self, path: &Path) -> Vec<PathBuf> {
        if path.is_file() {
            return vec![path.to_path_buf()];
        }

        WalkDir::new(path)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "cs"))
            .filter(|p| {
                let relative = p.strip_prefix(path).unwrap_or(p);
                let excluded = self.excludes.is_match(relative);
                if excluded {
                    tracing::debug!("Excluded {}", p.display());
                }
                !excluded
            })
            .collect()
    }

    /// Analyze one file; `None` when it is skipped for size.
    fn scan_file(&self, path: &Path) -> Result<Option<Vec<Diagnostic>>> {
        if let Ok(meta) = std::fs::metadata(path) {
            if meta.len() > self.config.max_file_size {
                tracing::warn!(
                    "Skipping {} ({} bytes exceeds max_file_size)",
                    path.display(),
                    meta.len()
                );
                return Ok(None);
            }
        }

        tracing::debug!("Analyzing {}", path.display());
        let diagnostics = self
            .analyzer
            .analyze_file(path)?
            .into_iter()
            .filter(|d| d.severity >= self.config.min_severity)
            .collect();
        Ok(Some(diagnostics))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const VULNERABLE: &str = "class A { void M() { try { F(); } catch (Exception) { } } }";

    #[test]
    fn test_scan_directory_filters_and_excludes() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("obj")).unwrap();
        fs::write(dir.path().join("A.cs"), VULNERABLE).unwrap();
        fs::write(dir.path().join("notes.txt"), VULNERABLE).unwrap();
        fs::write(dir.path().join("obj").join("Gen.cs"), VULNERABLE).unwrap();

        let scanner = Scanner::with_config(Config::default()).unwrap();
        let report = scanner.scan_paths(&[dir.path().to_path_buf()]);

        assert_eq!(report.files.len(), 1);
        assert!(report.files[0].path.ends_with("A.cs"));
        assert_eq!(report.total_diagnostics(), 2);
        assert_eq!(report.max_severity(), Some(Severity::Medium));
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_parse_failures_are_collected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Bad.cs"), "class A { void M( }").unwrap();
        fs::write(dir.path().join("Good.cs"), VULNERABLE).unwrap();

        let scanner = Scanner::with_config(Config::default()).unwrap();
        let report = scanner.scan_paths(&[dir.path().to_path_buf()]);

        assert_eq!(report.files.len(), 1);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].path.ends_with("Bad.cs"));
        assert!(report.errors[0].message.starts_with("syntax error"));
    }

    #[test]
    fn test_min_severity_filter() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("A.cs");
        fs::write(&file, VULNERABLE).unwrap();

        let config = Config {
            min_severity: Severity::High,
            ..Default::default()
        };
        let report = Scanner::with_config(config).unwrap().scan_paths(&[file]);
        assert_eq!(report.files.len(), 1);
        assert_eq!(report.total_diagnostics(), 0);
    }

    #[test]
    fn test_missing_path_is_an_error() {
        let scanner = Scanner::with_config(Config::default()).unwrap();
        let report = scanner.scan_paths(&[PathBuf::from("/nonexistent/Program.cs")]);
        assert_eq!(report.errors.len(), 1);
    }
}
