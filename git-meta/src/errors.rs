//! Unified error types for the crate.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, MetaError>;

/// Repository access failures. All of them abort flag generation.
#[derive(Debug, Error)]
pub enum MetaError {
    /// The repository could not be opened.
    #[error("failed to open git repository at {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: git2::Error,
    },

    /// Tag references could not be enumerated or resolved.
    #[error("failed to read tags: {0}")]
    Tags(#[source] git2::Error),

    /// HEAD could not be resolved to a commit.
    #[error("failed to resolve HEAD: {0}")]
    Head(#[source] git2::Error),
}
