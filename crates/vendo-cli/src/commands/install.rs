//! Handler for `vendo install`.

use std::path::PathBuf;

use miette::Result;
use vendo_core::config::Config;

pub async fn exec(
    manifest: &str,
    install_root: Option<PathBuf>,
    shared_root: Option<PathBuf>,
    vendoring: bool,
    verbose: bool,
) -> Result<()> {
    let root = super::workspace_root(manifest)?;
    let mut config = Config::new(&root)
        .with_manifest_file(manifest)
        .with_shared_root(shared_root)
        .with_vendoring(vendoring);
    if let Some(dir) = install_root {
        config = config.with_install_root(dir);
    }

    let summary = vendo_ops::ops_install::install(config, verbose).await?;
    if !summary.is_clean() {
        tracing::warn!(
            "{} fetch failures, {} errors",
            summary.fetch_failures.len(),
            summary.errors.len()
        );
    }
    Ok(())
}
