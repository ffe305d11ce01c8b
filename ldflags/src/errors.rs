use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlagsError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no module path in go.mod and {path} is not under GOPATH/src")]
    RootPackage { path: PathBuf },

    #[error(transparent)]
    Meta(#[from] git_meta::MetaError),
}

pub type Result<T> = std::result::Result<T, FlagsError>;
