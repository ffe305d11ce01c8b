//! Go package paths for discovered targets.
//!
//! The project's root package comes from the `module` line of `go.mod`, or
//! failing that from the project's location under `$GOPATH/src`. Every target
//! anchor is then rewritten relative to the project directory.

use std::{
    ffi::OsStr,
    fs::File,
    io::{self, BufRead, BufReader},
    path::{Component, MAIN_SEPARATOR, Path, PathBuf},
    sync::LazyLock,
};

use go_scanner::Target;
use regex::Regex;
use tracing::{debug, instrument};

use crate::errors::{FlagsError, Result};

pub const GO_MOD_NAME: &str = "go.mod";
pub const GO_PATH_ENV: &str = "GOPATH";
pub const SRC_DIR_NAME: &str = "src";
/// GOPATH used by the Go toolchain when the variable is unset, relative to home.
const DEFAULT_GO_PATH: &str = "go";

static GO_MOD_MODULE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*module\s+(.+)$").expect("module pattern"));

/// Root package of the project at `root`, using the process `GOPATH`.
pub fn root_package(root: &Path) -> Result<String> {
    let gopath = std::env::var_os(GO_PATH_ENV);
    root_package_with(root, gopath.as_deref())
}

/// Root package of the project at `root` with an explicit `GOPATH` value.
///
/// Fails when neither `go.mod` nor `GOPATH` yields a package.
#[instrument(level = "debug", skip_all, fields(root = %root.display()))]
pub fn root_package_with(root: &Path, gopath: Option<&OsStr>) -> Result<String> {
    if let Some(module) = read_module_path(root)? {
        debug!(%module, "root package from go.mod");
        return Ok(module);
    }
    match package_from_gopath(root, gopath) {
        Some(pkg) => {
            debug!(%pkg, "root package from GOPATH");
            Ok(pkg)
        }
        None => Err(FlagsError::RootPackage {
            path: root.to_path_buf(),
        }),
    }
}

/// Module path declared in `<root>/go.mod`; `None` when the file or the
/// `module` line is absent.
pub fn read_module_path(root: &Path) -> Result<Option<String>> {
    let file = match File::open(root.join(GO_MOD_NAME)) {
        Ok(f) => f,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };

    for line in BufReader::new(file).lines() {
        let line = line?;
        if let Some(cap) = GO_MOD_MODULE_RE.captures(&line) {
            let module = clean_module_path(&cap[1]);
            if !module.is_empty() {
                return Ok(Some(module));
            }
        }
    }
    Ok(None)
}

/// Drop a trailing `//` comment and surrounding quotes.
fn clean_module_path(raw: &str) -> String {
    let without_comment = raw.split("//").next().unwrap_or(raw);
    without_comment
        .trim()
        .trim_matches(|c| c == '"' || c == '`')
        .to_string()
}

/// Package path of `root` relative to the first `GOPATH` entry containing it.
/// An unset `GOPATH` means `$HOME/go`.
pub fn package_from_gopath(root: &Path, gopath: Option<&OsStr>) -> Option<String> {
    let entries: Vec<PathBuf> = match gopath.filter(|g| !g.is_empty()) {
        Some(g) => std::env::split_paths(g).collect(),
        None => dirs::home_dir()
            .map(|home| vec![home.join(DEFAULT_GO_PATH)])
            .unwrap_or_default(),
    };

    entries.into_iter().find_map(|entry| {
        let rel = strip_head_path(root, &entry.join(SRC_DIR_NAME))?;
        (!rel.is_empty()).then_some(rel)
    })
}

/// Part of `path` below `head`, `/`-separated, without leading or trailing
/// separators. `None` when `path` is not inside `head`.
pub fn strip_head_path(path: &Path, head: &Path) -> Option<String> {
    let rel = path.strip_prefix(head).ok()?;
    let parts: Vec<String> = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    Some(parts.join("/"))
}

/// Logical package for a target anchored at `anchor`.
///
/// Anchors at the project directory, or outside of it, map to the root package.
pub fn resolve_package(root_package: &str, root_dir: &Path, anchor: &str) -> String {
    let suffix = strip_head_path(Path::new(anchor), root_dir).unwrap_or_default();
    let pkg = if suffix.is_empty() {
        root_package.to_string()
    } else {
        format!("{root_package}/{suffix}")
    };
    pkg.replace(MAIN_SEPARATOR, "/")
}

/// Rewrite every target's `containing_package` in place.
pub fn rewrite_targets(targets: &mut [Target], root_package: &str, root_dir: &Path) {
    for target in targets.iter_mut() {
        let resolved = resolve_package(root_package, root_dir, &target.containing_package);
        debug!(
            var = %target.variable_name,
            from = %target.containing_package,
            to = %resolved,
            "package resolved"
        );
        target.containing_package = resolved;
    }
}
