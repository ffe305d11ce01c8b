//! Value generators: version, tag, commit hashes and build time.

use chrono::{DateTime, FixedOffset, Local};
use tracing::debug;

use crate::errors::Result;
use crate::repository::MetadataSource;
use crate::version::latest_version;

/// Length of an abbreviated commit id.
pub const SHORT_HASH_LEN: usize = 7;

const TIME_FORMAT: &str = "%Y-%m-%d_%H:%M:%S";
const UTC_SUFFIX: &str = "Z";

/// Quote character wrapped around free-form values such as tag names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QuoteStyle {
    #[default]
    Single,
    Double,
}

impl QuoteStyle {
    pub fn from_double(double: bool) -> Self {
        if double {
            QuoteStyle::Double
        } else {
            QuoteStyle::Single
        }
    }

    pub fn quote(self, s: &str) -> String {
        match self {
            QuoteStyle::Single => format!("'{s}'"),
            QuoteStyle::Double => format!("\"{s}\""),
        }
    }
}

/// Computes generator values from a repository.
pub struct MetadataResolver<S> {
    source: S,
    quote: QuoteStyle,
}

impl<S: MetadataSource> MetadataResolver<S> {
    pub fn new(source: S, quote: QuoteStyle) -> Self {
        Self { source, quote }
    }

    /// Highest version among the tags, unquoted; empty when no tag is a version.
    pub fn version(&self) -> Result<String> {
        let tags = self.source.tags()?;
        let value = latest_version(tags.iter().map(|t| t.name.as_str()));
        debug!(tags = tags.len(), %value, "generator: version");
        Ok(value)
    }

    /// Most recently created tag, quoted; empty when the repository has no tags.
    pub fn tag(&self) -> Result<String> {
        let tags = self.source.tags()?;
        let latest = tags
            .iter()
            .max_by(|a, b| a.created.cmp(&b.created).then_with(|| b.name.cmp(&a.name)));
        let value = latest
            .map(|t| self.quote.quote(&t.name))
            .unwrap_or_default();
        debug!(%value, "generator: tag");
        Ok(value)
    }

    /// Full HEAD commit id.
    pub fn hash_long(&self) -> Result<String> {
        self.source.head_hash()
    }

    /// HEAD commit id cut to `SHORT_HASH_LEN` characters.
    pub fn hash_short(&self) -> Result<String> {
        let hash = self.source.head_hash()?;
        Ok(hash.chars().take(SHORT_HASH_LEN).collect())
    }

    /// Current local time. Does not touch the repository.
    pub fn time(&self) -> String {
        format_build_time(&Local::now().fixed_offset())
    }
}

/// Render `YYYY-MM-DD_HH:MM:SS_<offset>` where a zero offset is written `Z`.
pub fn format_build_time(at: &DateTime<FixedOffset>) -> String {
    let offset = if at.offset().local_minus_utc() == 0 {
        UTC_SUFFIX.to_string()
    } else {
        at.format("%:z").to_string()
    };
    format!("{}_{offset}", at.format(TIME_FORMAT))
}
