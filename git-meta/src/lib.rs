//! Build metadata from a git repository: highest version tag, most recent
//! tag, HEAD commit ids and the build timestamp.

pub mod errors;
pub mod generators;
pub mod repository;
pub mod version;

pub use errors::{MetaError, Result};
pub use generators::{MetadataResolver, QuoteStyle, SHORT_HASH_LEN, format_build_time};
pub use repository::{GitRepository, MetadataSource, TagRef};
pub use version::{Version, is_version_tag, latest_version};
