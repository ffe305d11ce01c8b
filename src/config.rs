//! Target dictionary assembly: defaults, then a `.goxver` file, then `-m`.
//!
//! The file holds one mapping per line (`var=gen[,var=gen]`). Blank lines and
//! lines starting with `#` are skipped.

use std::{
    ffi::OsStr,
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use go_scanner::TargetDictionary;
use ldflags::package_path::SRC_DIR_NAME;
use tracing::{debug, info};

pub const DEFAULT_CONFIG_NAME: &str = ".goxver";
const CURRENT_DIR: &str = ".";
const COMMENT_PREFIX: char = '#';

/// First `.goxver` found in the current directory, the project directory or
/// any `GOPATH/src` directory.
pub fn find_config_file(project_dir: &Path, gopath: Option<&OsStr>) -> Option<PathBuf> {
    let mut dirs = vec![PathBuf::from(CURRENT_DIR), project_dir.to_path_buf()];
    if let Some(gopath) = gopath.filter(|g| !g.is_empty()) {
        dirs.extend(std::env::split_paths(gopath).map(|p| p.join(SRC_DIR_NAME)));
    }

    dirs.into_iter()
        .map(|dir| dir.join(DEFAULT_CONFIG_NAME))
        .find(|path| path.is_file())
}

/// Apply every mapping line of `path` to `dict`.
pub fn read_config_file(path: &Path, dict: &mut TargetDictionary) -> Result<()> {
    let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    for (idx, line) in BufReader::new(file).lines().enumerate() {
        let line = line.with_context(|| format!("cannot read {}", path.display()))?;
        let line = line.trim();
        if line.is_empty() || line.starts_with(COMMENT_PREFIX) {
            continue;
        }
        dict.apply_mapping(line)
            .with_context(|| format!("{}:{}", path.display(), idx + 1))?;
    }
    Ok(())
}

/// Build the dictionary shared by the scan phase.
///
/// `config_path` overrides file discovery; `mapping` is applied last.
pub fn build_dictionary(
    project_dir: &Path,
    config_path: Option<&Path>,
    mapping: Option<&str>,
    gopath: Option<&OsStr>,
) -> Result<TargetDictionary> {
    let mut dict = TargetDictionary::with_defaults();

    let config_path = config_path
        .map(Path::to_path_buf)
        .or_else(|| find_config_file(project_dir, gopath));
    match &config_path {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            read_config_file(path, &mut dict).context("failed to read configuration file")?;
        }
        None => info!("Use no configuration file"),
    }

    if let Some(mapping) = mapping.filter(|m| !m.is_empty()) {
        dict.apply_mapping(mapping)
            .context("failed to parse mapping")?;
    }

    debug!(entries = dict.len(), "dictionary built");
    Ok(dict)
}

#[cfg(test)]
mod tests {
    use super::*;
    use go_scanner::GeneratorKind;
    use std::fs;

    #[test]
    fn file_overrides_defaults_and_mapping_overrides_file() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = tmp.path().join("custom.cfg");
        fs::write(
            &cfg,
            "# project targets\n\nAppVersion=tag, Commit=hash-long\n\nStamp=time\n",
        )
        .unwrap();

        let dict = build_dictionary(
            tmp.path(),
            Some(&cfg),
            Some("appversion=version"),
            None,
        )
        .unwrap();

        assert_eq!(dict.lookup("AppVersion"), Some(GeneratorKind::Version));
        assert_eq!(dict.lookup("commit"), Some(GeneratorKind::HashLong));
        assert_eq!(dict.lookup("STAMP"), Some(GeneratorKind::Time));
        assert_eq!(dict.lookup("BuildTime"), Some(GeneratorKind::Time));
    }

    #[test]
    fn invalid_line_reports_location() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = tmp.path().join(DEFAULT_CONFIG_NAME);
        fs::write(&cfg, "Version=version\nBroken\n").unwrap();

        let err = build_dictionary(tmp.path(), Some(&cfg), None, None).unwrap_err();
        let text = format!("{err:#}");
        assert!(text.contains("failed to read configuration file"), "{text}");
        assert!(text.contains(":2"), "{text}");
        assert!(text.contains("invalid mapping Broken"), "{text}");
    }

    #[test]
    fn invalid_cli_mapping_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = tmp.path().join("empty.cfg");
        fs::write(&cfg, "").unwrap();
        let err = build_dictionary(tmp.path(), Some(&cfg), Some("X=nope"), None).unwrap_err();
        assert!(format!("{err:#}").contains("invalid generator X=nope"));
    }

    #[test]
    fn discovers_config_in_project_then_gopath() {
        let tmp = tempfile::tempdir().unwrap();
        let project = tmp.path().join("project");
        let gopath = tmp.path().join("gopath");
        fs::create_dir_all(&project).unwrap();
        fs::create_dir_all(gopath.join(SRC_DIR_NAME)).unwrap();

        let in_gopath = gopath.join(SRC_DIR_NAME).join(DEFAULT_CONFIG_NAME);
        fs::write(&in_gopath, "A=tag\n").unwrap();
        assert_eq!(
            find_config_file(&project, Some(gopath.as_os_str())),
            Some(in_gopath)
        );

        let in_project = project.join(DEFAULT_CONFIG_NAME);
        fs::write(&in_project, "A=version\n").unwrap();
        assert_eq!(
            find_config_file(&project, Some(gopath.as_os_str())),
            Some(in_project)
        );
    }
}
