//! Read-only access to tags and HEAD of a git repository (libgit2).

use std::path::Path;

use git2::Repository;
use tracing::{debug, instrument};

use crate::errors::{MetaError, Result};

const TAG_REFS_GLOB: &str = "refs/tags/*";
const TAG_REFS_PREFIX: &str = "refs/tags/";

/// A tag's short name and creation time (seconds since the epoch).
///
/// Creation time is the tagger time for annotated tags and the commit time
/// of the tagged commit for lightweight ones; 0 when neither is available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRef {
    pub name: String,
    pub created: i64,
}

/// What the generators need from a repository.
pub trait MetadataSource {
    /// All tags, in no particular order.
    fn tags(&self) -> Result<Vec<TagRef>>;

    /// Full hex id of the commit HEAD points at.
    fn head_hash(&self) -> Result<String>;
}

/// `MetadataSource` over an on-disk git repository.
pub struct GitRepository {
    repo: Repository,
}

impl GitRepository {
    #[instrument(level = "debug", skip_all, fields(path = %path.display()))]
    pub fn open(path: &Path) -> Result<Self> {
        let repo = Repository::open(path).map_err(|source| MetaError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(git_dir = %repo.path().display(), "repository opened");
        Ok(Self { repo })
    }
}

impl MetadataSource for GitRepository {
    fn tags(&self) -> Result<Vec<TagRef>> {
        let refs = self
            .repo
            .references_glob(TAG_REFS_GLOB)
            .map_err(MetaError::Tags)?;

        let mut out = Vec::new();
        for reference in refs {
            let reference = reference.map_err(MetaError::Tags)?;
            let Some(name) = reference
                .name()
                .and_then(|n| n.strip_prefix(TAG_REFS_PREFIX))
            else {
                continue;
            };

            let tagger_time = reference
                .peel_to_tag()
                .ok()
                .and_then(|tag| tag.tagger().map(|sig| sig.when().seconds()));
            let created = tagger_time
                .or_else(|| {
                    reference
                        .peel_to_commit()
                        .ok()
                        .map(|commit| commit.time().seconds())
                })
                .unwrap_or(0);

            out.push(TagRef {
                name: name.to_string(),
                created,
            });
        }

        debug!(count = out.len(), "tags listed");
        Ok(out)
    }

    fn head_hash(&self) -> Result<String> {
        let head = self.repo.head().map_err(MetaError::Head)?;
        let commit = head.peel_to_commit().map_err(MetaError::Head)?;
        Ok(commit.id().to_string())
    }
}
