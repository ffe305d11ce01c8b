//! Loose semantic versions parsed from tag names.
//!
//! Accepted tags look like `v1`, `1.2`, `v1.2.3`, optionally followed by
//! anything (`v1.2.3-rc1`, `1.2.3.4`); only the leading match is parsed.

use std::{cmp::Ordering, fmt, sync::LazyLock};

use regex::Regex;

pub const VERSION_PREFIX: &str = "v";
pub const VERSION_SEPARATOR: char = '.';

static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^v?[0-9]+(?:\.[0-9]+){0,2}").expect("version pattern"));

/// Numeric representation of a tag version.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Version {
    pub has_prefix: bool,
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl Version {
    /// Parse a tag name. Never fails: missing or unparseable parts become 0.
    pub fn parse(s: &str) -> Version {
        let matched = VERSION_RE.find(s).map_or(s, |m| m.as_str());
        let (has_prefix, digits) = match matched.strip_prefix(VERSION_PREFIX) {
            Some(rest) => (true, rest),
            None => (false, matched),
        };

        let mut parts = digits
            .split(VERSION_SEPARATOR)
            .map(|p| p.parse::<u64>().unwrap_or(0));
        Version {
            has_prefix,
            major: parts.next().unwrap_or(0),
            minor: parts.next().unwrap_or(0),
            patch: parts.next().unwrap_or(0),
        }
    }

    /// Compare by major, then minor, then patch. The prefix does not take part.
    pub fn compare(&self, other: &Version) -> Ordering {
        (self.major, self.minor, self.patch).cmp(&(other.major, other.minor, other.patch))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = if self.has_prefix { VERSION_PREFIX } else { "" };
        write!(f, "{prefix}{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// True when the tag starts with `[v]N[.N[.N]]`.
pub fn is_version_tag(tag: &str) -> bool {
    VERSION_RE.is_match(tag)
}

/// Highest version among `tags`, rendered with all three components.
///
/// Non-version tags are skipped. Tags with the same numbers are ordered by
/// their name so the pick does not depend on iteration order. Empty string
/// when nothing matches.
pub fn latest_version<'a>(tags: impl IntoIterator<Item = &'a str>) -> String {
    let mut versions: Vec<(Version, &str)> = tags
        .into_iter()
        .filter(|t| is_version_tag(t))
        .map(|t| (Version::parse(t), t))
        .collect();

    versions.sort_by(|(a, a_tag), (b, b_tag)| b.compare(a).then_with(|| a_tag.cmp(b_tag)));

    versions
        .first()
        .map(|(v, _)| v.to_string())
        .unwrap_or_default()
}
