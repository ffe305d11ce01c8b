//! Per-file classification of `string` declarations against the target dictionary.

use std::{
    fs,
    path::Path,
    sync::Arc,
};

use tracing::{debug, instrument};

use crate::ast::{DeclarationExtractor, GoAst};
use crate::dictionary::TargetDictionary;
use crate::errors::Result;
use crate::types::Target;

pub const GO_SOURCE_EXT: &str = "go";
pub const GO_TEST_SUFFIX: &str = "_test.go";
pub const STRING_TYPE: &str = "string";

/// Finds targets in single files. Cheap to clone; shared by every walk task.
#[derive(Clone)]
pub struct Scanner {
    dictionary: Arc<TargetDictionary>,
    extractor: Arc<dyn DeclarationExtractor>,
}

impl Scanner {
    pub fn new(dictionary: Arc<TargetDictionary>) -> Self {
        Self::with_extractor(dictionary, Arc::new(GoAst))
    }

    pub fn with_extractor(
        dictionary: Arc<TargetDictionary>,
        extractor: Arc<dyn DeclarationExtractor>,
    ) -> Self {
        Self {
            dictionary,
            extractor,
        }
    }

    pub fn dictionary(&self) -> &TargetDictionary {
        &self.dictionary
    }

    /// `*.go` files that are not `*_test.go`.
    pub fn is_source_file(path: &Path) -> bool {
        let is_go = path.extension().and_then(|x| x.to_str()) == Some(GO_SOURCE_EXT);
        let is_test = path
            .file_name()
            .and_then(|x| x.to_str())
            .is_some_and(|name| name.ends_with(GO_TEST_SUFFIX));
        is_go && !is_test
    }

    /// Read and scan one file.
    #[instrument(level = "debug", skip_all, fields(path = %path.display()))]
    pub fn scan_file(&self, path: &Path) -> Result<Vec<Target>> {
        let code = fs::read_to_string(path)?;
        self.scan_source(path, &code)
    }

    /// Scan already loaded source text as if it lived at `path`.
    pub fn scan_source(&self, path: &Path, code: &str) -> Result<Vec<Target>> {
        let decls = self.extractor.extract(code)?;
        let anchor = package_anchor(path, &decls.package);

        let targets: Vec<Target> = decls
            .vars
            .into_iter()
            .filter(|v| v.top_level && v.declared_type.as_deref() == Some(STRING_TYPE))
            .filter_map(|v| {
                let generator = self.dictionary.lookup(&v.name)?;
                debug!(var = %v.name, %generator, "target found");
                Some(Target {
                    variable_name: v.name,
                    containing_package: anchor.clone(),
                    generator,
                    source: path.to_path_buf(),
                    offset: v.offset,
                })
            })
            .collect();

        Ok(targets)
    }
}

/// Directory above the file's own directory, joined with the declared package name.
fn package_anchor(path: &Path, package: &str) -> String {
    let grandparent = path
        .parent()
        .and_then(Path::parent)
        .unwrap_or_else(|| Path::new(""));
    grandparent.join(package).to_string_lossy().into_owned()
}
