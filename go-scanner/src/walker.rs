//! Concurrent directory walker.
//!
//! Every directory is handled by its own tokio task and joins only its own
//! children, so awaiting the root task waits for the whole tree. File parsing
//! runs on the blocking pool. Targets and failures go to lock-protected lists;
//! a failure in one branch never stops the others.

use std::{
    io,
    path::{Path, PathBuf},
    sync::Arc,
};

use futures::future::{BoxFuture, FutureExt};
use tokio::{
    fs,
    sync::Mutex,
    task::{self, JoinHandle},
};
use tracing::{debug, info, instrument, warn};

use crate::errors::{ScanError, TreeScanError};
use crate::scanner::Scanner;
use crate::types::Target;

/// Directory entries read per batch.
pub const DIR_CHUNK_SIZE: usize = 100;

/// Everything a walk produced.
#[derive(Debug, Default)]
pub struct TreeScan {
    pub targets: Vec<Target>,
    pub errors: Vec<ScanError>,
}

impl TreeScan {
    /// `Ok` when no node failed; otherwise the combined error, which still
    /// carries the targets that were found.
    pub fn into_result(self) -> Result<Vec<Target>, TreeScanError> {
        if self.errors.is_empty() {
            Ok(self.targets)
        } else {
            Err(TreeScanError {
                errors: self.errors,
                targets: self.targets,
            })
        }
    }
}

struct WalkContext {
    scanner: Scanner,
    targets: Mutex<Vec<Target>>,
    errors: Mutex<Vec<ScanError>>,
}

impl WalkContext {
    async fn push_targets(&self, mut found: Vec<Target>) {
        self.targets.lock().await.append(&mut found);
    }

    async fn push_error(&self, err: ScanError) {
        warn!(error = %err, "walk: node failed");
        self.errors.lock().await.push(err);
    }
}

/// Walk `root` and collect targets from every eligible Go file.
///
/// Results are ordered by (source file, declaration offset) so repeated runs
/// over the same tree produce the same sequence.
#[instrument(level = "info", skip_all, fields(root = %root.display()))]
pub async fn scan_tree(root: &Path, scanner: Scanner) -> TreeScan {
    let ctx = Arc::new(WalkContext {
        scanner,
        targets: Mutex::new(Vec::new()),
        errors: Mutex::new(Vec::new()),
    });

    walk_dir(ctx.clone(), root.to_path_buf(), None).await;

    let mut targets = std::mem::take(&mut *ctx.targets.lock().await);
    let errors = std::mem::take(&mut *ctx.errors.lock().await);
    targets.sort_by(|a, b| a.source.cmp(&b.source).then(a.offset.cmp(&b.offset)));

    info!(
        targets = targets.len(),
        errors = errors.len(),
        "walk: done"
    );
    TreeScan { targets, errors }
}

/// One unit of work: read `dir`, spawn a task per subdirectory, scan files,
/// then join the spawned children.
fn walk_dir(ctx: Arc<WalkContext>, dir: PathBuf, name: Option<String>) -> BoxFuture<'static, ()> {
    async move {
        debug!(dir = %dir.display(), "walk: enter");
        let mut children: Vec<JoinHandle<()>> = Vec::new();

        if let Err(err) = read_dir_batched(&ctx, &dir, &mut children).await {
            ctx.push_error(ScanError::new(name, err.to_string())).await;
        }

        for child in children {
            if let Err(err) = child.await {
                ctx.push_error(ScanError::new(None, format!("directory task failed: {err}")))
                    .await;
            }
        }
    }
    .boxed()
}

async fn read_dir_batched(
    ctx: &Arc<WalkContext>,
    dir: &Path,
    children: &mut Vec<JoinHandle<()>>,
) -> io::Result<()> {
    let mut entries = fs::read_dir(dir).await?;
    let mut batch = Vec::with_capacity(DIR_CHUNK_SIZE);

    loop {
        while batch.len() < DIR_CHUNK_SIZE {
            match entries.next_entry().await? {
                Some(entry) => batch.push(entry),
                None => break,
            }
        }
        if batch.is_empty() {
            return Ok(());
        }

        let exhausted = batch.len() < DIR_CHUNK_SIZE;
        for entry in batch.drain(..) {
            process_entry(ctx, entry, children).await;
        }
        if exhausted {
            return Ok(());
        }
    }
}

async fn process_entry(
    ctx: &Arc<WalkContext>,
    entry: fs::DirEntry,
    children: &mut Vec<JoinHandle<()>>,
) {
    let name = entry.file_name().to_string_lossy().into_owned();
    let path = entry.path();

    let file_type = match entry.file_type().await {
        Ok(t) => t,
        Err(err) => {
            ctx.push_error(ScanError::new(Some(name), err.to_string()))
                .await;
            return;
        }
    };

    if file_type.is_dir() {
        if name.starts_with('.') {
            debug!(dir = %path.display(), "walk: skip dot directory");
            return;
        }
        children.push(tokio::spawn(walk_dir(ctx.clone(), path, Some(name))));
        return;
    }

    if !Scanner::is_source_file(&path) {
        return;
    }
    // Symlinked sources are scanned; symlinked directories are never followed.
    if file_type.is_symlink() {
        match fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => {}
            _ => return,
        }
    }

    let scanner = ctx.scanner.clone();
    let scanned = task::spawn_blocking(move || scanner.scan_file(&path)).await;
    match scanned {
        Ok(Ok(found)) => {
            if !found.is_empty() {
                ctx.push_targets(found).await;
            }
        }
        Ok(Err(err)) => {
            ctx.push_error(ScanError::new(Some(name), err.to_string()))
                .await
        }
        Err(err) => {
            ctx.push_error(ScanError::new(Some(name), err.to_string()))
                .await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::TargetDictionary;
    use crate::types::GeneratorKind;
    use std::collections::HashSet;
    use std::fs as stdfs;

    fn scanner() -> Scanner {
        let mut dict = TargetDictionary::new();
        dict.insert("BuildVersion", GeneratorKind::Version);
        Scanner::new(Arc::new(dict))
    }

    fn write(path: &Path, body: &str) {
        stdfs::create_dir_all(path.parent().unwrap()).unwrap();
        stdfs::write(path, body).unwrap();
    }

    #[tokio::test]
    async fn skips_dot_directories_tests_and_foreign_files() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        let body = "package app\n\nvar BuildVersion string\n";
        write(&root.join("main.go"), body);
        write(&root.join(".hidden/app/main.go"), body);
        write(&root.join("main_test.go"), body);
        write(&root.join("notes.txt"), body);

        let scan = scan_tree(root, scanner()).await;
        assert!(scan.errors.is_empty(), "{:?}", scan.errors);
        assert_eq!(scan.targets.len(), 1);
        assert_eq!(scan.targets[0].source, root.join("main.go"));
    }

    #[tokio::test]
    async fn collects_every_subdirectory_and_reports_failures() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        let good = 12;
        let bad = 3;
        for i in 0..good {
            write(
                &root.join(format!("pkg{i}/deep/pkg{i}.go")),
                &format!("package pkg{i}\n\nvar BuildVersion string\n"),
            );
        }
        for i in 0..bad {
            write(
                &root.join(format!("broken{i}/broken.go")),
                "package broken\n\nvar (\n",
            );
        }

        let scan = scan_tree(root, scanner()).await;

        assert_eq!(scan.targets.len(), good);
        let sources: HashSet<_> = scan.targets.iter().map(|t| t.source.clone()).collect();
        assert_eq!(sources.len(), good);

        assert_eq!(scan.errors.len(), bad);
        assert!(
            scan.errors
                .iter()
                .all(|e| e.name.as_deref() == Some("broken.go"))
        );

        let err = scan.into_result().unwrap_err();
        assert_eq!(err.targets.len(), good);
        assert!(err.to_string().starts_with("failed to scan file tree\n"));
    }

    #[tokio::test]
    async fn reads_large_directories_in_batches() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        let files = DIR_CHUNK_SIZE * 2 + 7;
        for i in 0..files {
            write(
                &root.join(format!("f{i:03}.go")),
                "package app\n\nvar BuildVersion string\n",
            );
        }

        let scan = scan_tree(root, scanner()).await;
        assert_eq!(scan.targets.len(), files);
        let sorted = scan
            .targets
            .windows(2)
            .all(|w| w[0].source <= w[1].source);
        assert!(sorted);
    }

    #[tokio::test]
    async fn missing_root_is_a_single_unnamed_error() {
        let tmp = tempfile::tempdir().unwrap();
        let scan = scan_tree(&tmp.path().join("absent"), scanner()).await;
        assert!(scan.targets.is_empty());
        assert_eq!(scan.errors.len(), 1);
        assert_eq!(scan.errors[0].name, None);
    }

    #[tokio::test]
    async fn empty_tree_is_ok() {
        let tmp = tempfile::tempdir().unwrap();
        let targets = scan_tree(tmp.path(), scanner()).await.into_result().unwrap();
        assert!(targets.is_empty());
    }
}
