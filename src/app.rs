//! End-to-end run: scan the tree, resolve packages, query git, build flags.

use std::{path::Path, sync::Arc};

use anyhow::{Context, Result, bail};
use git_meta::{GitRepository, MetadataResolver, QuoteStyle};
use go_scanner::{Scanner, Target, scan_tree};
use ldflags::{assemble_ldflags, package_path::GO_PATH_ENV, rewrite_targets, root_package_with};
use tokio::task;
use tracing::{info, instrument, warn};

use crate::cli::Cli;
use crate::config;

pub const GIT_DIR_NAME: &str = ".git";

/// Run the whole pipeline.
///
/// `Ok(None)` covers the quiet successful exits: no git repository at the
/// root, or no targets in the tree.
#[instrument(level = "info", skip_all)]
pub async fn run(cli: &Cli) -> Result<Option<String>> {
    let root = std::path::absolute(&cli.root_dir).context("failed to get absolute path")?;
    if !root.exists() {
        bail!("path does not exist: {}", root.display());
    }
    if !root.join(GIT_DIR_NAME).exists() {
        info!("No git repository found");
        return Ok(None);
    }

    let gopath = std::env::var_os(GO_PATH_ENV);
    let dictionary = config::build_dictionary(
        &root,
        cli.config_path.as_deref(),
        cli.mapping.as_deref(),
        gopath.as_deref(),
    )?;
    if !dictionary.is_empty() {
        info!("Target mappings:");
        for (name, generator) in dictionary.iter() {
            info!("  - {name} = {generator}");
        }
    }

    let root_package =
        root_package_with(&root, gopath.as_deref()).context("failed to find root package")?;

    let scan = scan_tree(&root, Scanner::new(Arc::new(dictionary))).await;
    let mut targets = match scan.into_result() {
        Ok(targets) => targets,
        Err(err) => {
            // Broken files may be excluded from the build (build tags etc.),
            // so keep going with whatever was found.
            warn!("failed to scan targets: {err}");
            err.targets
        }
    };

    rewrite_targets(&mut targets, &root_package, &root);
    log_targets(&root_package, &targets);
    if targets.is_empty() {
        return Ok(None);
    }

    let quote = QuoteStyle::from_double(cli.double_quote);
    let flags = task::spawn_blocking(move || generate_flags(&root, &targets, quote))
        .await
        .context("flag generation task failed")??;
    Ok(Some(flags))
}

fn generate_flags(root: &Path, targets: &[Target], quote: QuoteStyle) -> Result<String> {
    let repo = GitRepository::open(root).context("failed to open git repository")?;
    let resolver = MetadataResolver::new(repo, quote);
    assemble_ldflags(targets, &resolver).context("failed to generate LDFLAGS")
}

fn log_targets(root_package: &str, targets: &[Target]) {
    info!("Root package is {root_package}");
    if targets.is_empty() {
        info!("No targets found");
        return;
    }
    info!("Targets:");
    for t in targets {
        info!(
            "  - {}.{} with {} generator",
            t.containing_package, t.variable_name, t.generator
        );
    }
}
