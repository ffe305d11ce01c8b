//! Case-insensitive dictionary of variable names that receive build metadata.
//!
//! Built once before the tree walk (defaults, then config file, then CLI
//! mapping) and shared read-only by every scan task afterwards.

use std::collections::BTreeMap;

use crate::errors::{Error, Result};
use crate::types::GeneratorKind;

pub const MAP_SEPARATOR: char = ',';
pub const MAP_ASSIGNMENT: char = '=';

/// Names recognised without any configuration.
const DEFAULT_TARGETS: &[(&str, GeneratorKind)] = &[
    ("Version", GeneratorKind::Version),
    ("BuildVersion", GeneratorKind::Version),
    ("Tag", GeneratorKind::Tag),
    ("BuildTag", GeneratorKind::Tag),
    ("Commit", GeneratorKind::HashShort),
    ("BuildCommit", GeneratorKind::HashShort),
    ("GitCommit", GeneratorKind::HashShort),
    ("CommitHash", GeneratorKind::HashLong),
    ("BuildHash", GeneratorKind::HashLong),
    ("BuildTime", GeneratorKind::Time),
    ("BuildDate", GeneratorKind::Time),
];

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    name: String,
    generator: GeneratorKind,
}

/// Variable name -> generator kind, keyed case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetDictionary {
    entries: BTreeMap<String, Entry>,
}

impl TargetDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults() -> Self {
        let mut dict = Self::new();
        for (name, generator) in DEFAULT_TARGETS {
            dict.insert(name, *generator);
        }
        dict
    }

    /// Insert or replace a mapping. The latest spelling of the name is kept.
    pub fn insert(&mut self, name: &str, generator: GeneratorKind) {
        self.entries.insert(
            name.to_lowercase(),
            Entry {
                name: name.to_string(),
                generator,
            },
        );
    }

    /// Parse `var=gen[,var=gen]*` and apply every item on top of the current entries.
    pub fn apply_mapping(&mut self, mapping: &str) -> Result<()> {
        for (name, generator) in parse_mapping(mapping)? {
            self.insert(&name, generator);
        }
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<GeneratorKind> {
        self.entries.get(&name.to_lowercase()).map(|e| e.generator)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, GeneratorKind)> {
        self.entries.values().map(|e| (e.name.as_str(), e.generator))
    }
}

/// Parse a mapping line in the form `var=gen[,var=gen]*`.
///
/// Items are returned in the order written; whitespace around names and
/// generators is ignored.
pub fn parse_mapping(mapping: &str) -> Result<Vec<(String, GeneratorKind)>> {
    mapping
        .split(MAP_SEPARATOR)
        .map(|item| {
            let parts: Vec<&str> = item.split(MAP_ASSIGNMENT).collect();
            let [name, generator] = parts.as_slice() else {
                return Err(Error::InvalidMapping(item.to_string()));
            };
            let name = name.trim();
            if name.is_empty() {
                return Err(Error::InvalidMapping(item.to_string()));
            }
            let generator = generator
                .trim()
                .parse::<GeneratorKind>()
                .map_err(|_| Error::UnknownGenerator(item.to_string()))?;
            Ok((name.to_string(), generator))
        })
        .collect()
}
