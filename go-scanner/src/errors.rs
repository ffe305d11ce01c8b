use std::fmt;

use thiserror::Error;

use crate::types::Target;

#[derive(Debug, Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("tree-sitter language error")]
    TreeSitterLanguage,

    #[error("tree-sitter parse error")]
    TreeSitterParse,

    #[error("syntax error at {line}:{column}")]
    Syntax { line: usize, column: usize },

    #[error("missing package clause")]
    MissingPackage,

    #[error("invalid mapping {0}")]
    InvalidMapping(String),

    #[error("invalid generator {0}")]
    UnknownGenerator(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// A single failure recorded while walking the tree.
///
/// `name` is the file or directory entry name when the failure is tied to one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanError {
    pub name: Option<String>,
    pub message: String,
}

impl ScanError {
    pub fn new(name: Option<String>, message: impl Into<String>) -> Self {
        Self {
            name,
            message: message.into(),
        }
    }
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "failed to scan {name}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for ScanError {}

/// Combined failure of a tree walk. Still carries every target that was found.
#[derive(Debug, Error)]
#[error("failed to scan file tree\n{}", join_errors(.errors))]
pub struct TreeScanError {
    pub errors: Vec<ScanError>,
    pub targets: Vec<Target>,
}

fn join_errors(errors: &[ScanError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}
