use std::fs;
use std::path::Path;

use clap::Parser;
use git2::{Oid, Repository, Signature, Time};
use goxver::{app, cli::Cli};

struct Project {
    dir: tempfile::TempDir,
    repo: Repository,
    config: std::path::PathBuf,
}

impl Project {
    /// Git repository with `go.mod` for `example.com/app` and an empty config
    /// file, so no `.goxver` from the environment leaks in.
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        fs::write(dir.path().join("go.mod"), "module example.com/app\n\ngo 1.22\n").unwrap();
        let config = dir.path().join("goxver.cfg");
        fs::write(&config, "").unwrap();
        Self { dir, repo, config }
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }

    fn write(&self, rel: &str, body: &str) {
        let path = self.root().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, body).unwrap();
    }

    fn commit(&self, at: i64) -> Oid {
        let sig = Signature::new("Dev", "dev@example.com", &Time::new(at, 0)).unwrap();
        let tree_id = self.repo.index().unwrap().write_tree().unwrap();
        let tree = self.repo.find_tree(tree_id).unwrap();
        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();
        self.repo
            .commit(Some("HEAD"), &sig, &sig, "commit", &tree, &parents)
            .unwrap()
    }

    fn tag(&self, name: &str, commit: Oid) {
        let obj = self.repo.find_object(commit, None).unwrap();
        self.repo.tag_lightweight(name, &obj, false).unwrap();
    }

    fn cli(&self, extra: &[&str]) -> Cli {
        let mut args = vec![
            "goxver".to_string(),
            "-d".to_string(),
            self.root().display().to_string(),
            "-c".to_string(),
            self.config.display().to_string(),
        ];
        args.extend(extra.iter().map(|s| s.to_string()));
        Cli::parse_from(args)
    }
}

#[tokio::test]
async fn version_of_root_main_package() {
    let p = Project::new();
    p.write("main.go", "package main\n\nvar BuildVersion string\n\nfunc main() {}\n");
    let head = p.commit(1_000);
    p.tag("v2.0.0", head);

    let flags = app::run(&p.cli(&[])).await.unwrap();
    assert_eq!(
        flags.as_deref(),
        Some("-X example.com/app.BuildVersion=v2.0.0")
    );
}

#[tokio::test]
async fn nested_packages_hashes_and_double_quotes() {
    let p = Project::new();
    p.write(
        "internal/build/info.go",
        "package build\n\nvar (\n\tCommit string\n\tBuildTag string\n)\n",
    );
    p.write("internal/build/info_test.go", "package build\n\nvar Version string\n");
    p.write(".tools/gen/gen.go", "package gen\n\nvar Version string\n");
    p.write("broken/broken.go", "package broken\n\nvar (\n");
    let first = p.commit(1_000);
    p.tag("v1.9.9", first);
    let head = p.commit(2_000);
    p.tag("release-candidate", head);

    let flags = app::run(&p.cli(&["--qq"])).await.unwrap().unwrap();
    let short = &head.to_string()[..7];
    assert_eq!(
        flags,
        format!(
            "-X example.com/app/internal/build.Commit={short} \
             -X example.com/app/internal/build.BuildTag=\"release-candidate\""
        )
    );
}

#[tokio::test]
async fn mapping_adds_custom_targets() {
    let p = Project::new();
    p.write("cmd/tool/main.go", "package tool\n\nvar appRelease string\n");
    let head = p.commit(1_000);
    p.tag("v0.3", head);
    p.tag("v0.10.1-rc1", head);

    let flags = app::run(&p.cli(&["-m", "AppRelease=version"])).await.unwrap();
    assert_eq!(
        flags.as_deref(),
        Some("-X example.com/app/cmd/tool.appRelease=v0.10.1")
    );
}

#[tokio::test]
async fn no_tags_means_no_tokens() {
    let p = Project::new();
    p.write("main.go", "package main\n\nvar Version string\nvar Tag string\n");
    p.commit(1_000);

    let flags = app::run(&p.cli(&[])).await.unwrap();
    assert_eq!(flags.as_deref(), Some(""));
}

#[tokio::test]
async fn no_targets_is_a_quiet_success() {
    let p = Project::new();
    p.write("main.go", "package main\n\nvar Version = \"dev\"\n");
    p.commit(1_000);

    assert_eq!(app::run(&p.cli(&[])).await.unwrap(), None);
}

#[tokio::test]
async fn missing_repository_is_a_quiet_success() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("main.go"), "package main\n\nvar Version string\n").unwrap();
    let root = dir.path().display().to_string();
    let cli = Cli::parse_from(["goxver", "-d", root.as_str()]);

    assert_eq!(app::run(&cli).await.unwrap(), None);
}

#[tokio::test]
async fn missing_root_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let absent = dir.path().join("absent").display().to_string();
    let cli = Cli::parse_from(["goxver", "-d", absent.as_str()]);

    let err = app::run(&cli).await.unwrap_err();
    assert!(err.to_string().contains("path does not exist"));
}

#[tokio::test]
async fn unborn_head_fails_hash_generation() {
    let p = Project::new();
    p.write("main.go", "package main\n\nvar Commit string\n");

    let err = app::run(&p.cli(&[])).await.unwrap_err();
    assert!(format!("{err:#}").contains("failed to generate LDFLAGS"));
}
