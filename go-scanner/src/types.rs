//! Generator kinds and discovered injection targets.

use std::{fmt, path::PathBuf, str::FromStr};

use crate::errors::Error;

/// Category of value computed for a target variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GeneratorKind {
    /// Highest semantic version among repository tags.
    Version,
    /// Most recently created tag.
    Tag,
    /// First 7 hex characters of the HEAD commit id.
    HashShort,
    /// Full HEAD commit id.
    HashLong,
    /// Same value as `HashLong`.
    Hash,
    /// Build timestamp, `YYYY-MM-DD_HH:MM:SS_Z`.
    Time,
}

impl GeneratorKind {
    pub const ALL: [GeneratorKind; 6] = [
        GeneratorKind::Version,
        GeneratorKind::Tag,
        GeneratorKind::HashShort,
        GeneratorKind::HashLong,
        GeneratorKind::Hash,
        GeneratorKind::Time,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            GeneratorKind::Version => "version",
            GeneratorKind::Tag => "tag",
            GeneratorKind::HashShort => "hash-short",
            GeneratorKind::HashLong => "hash-long",
            GeneratorKind::Hash => "hash",
            GeneratorKind::Time => "time",
        }
    }
}

impl fmt::Display for GeneratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GeneratorKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "version" => Ok(GeneratorKind::Version),
            "tag" => Ok(GeneratorKind::Tag),
            "hash-short" | "hash_short" => Ok(GeneratorKind::HashShort),
            "hash-long" | "hash_long" => Ok(GeneratorKind::HashLong),
            "hash" => Ok(GeneratorKind::Hash),
            "time" => Ok(GeneratorKind::Time),
            other => Err(Error::UnknownGenerator(other.to_string())),
        }
    }
}

/// One variable slated for link-time injection.
///
/// `containing_package` starts out as a filesystem-derived anchor and is
/// rewritten to the logical Go package path before flags are assembled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub variable_name: String,
    pub containing_package: String,
    pub generator: GeneratorKind,
    /// File the declaration was found in.
    pub source: PathBuf,
    /// Byte offset of the variable name within `source`.
    pub offset: usize,
}
