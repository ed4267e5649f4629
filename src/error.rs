//! Error type for the scanner.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The source text is not valid C#.
    #[error("syntax error at {line}:{column}")]
    Parse { line: usize, column: usize },

    #[error("failed to load C# grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("invalid rule pattern: {0}")]
    Pattern(#[from] regex::Error),
}
