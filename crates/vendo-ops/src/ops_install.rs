//! Operation: install everything the workspace imports and record it in the
//! root manifest.

use vendo_core::config::Config;
use vendo_resolver::report::Summary;
use vendo_resolver::{Collaborators, Resolver};
use vendo_util::errors::VendoError;

/// Install with the system collaborators: source scanning and the
/// command-line version-control clients.
pub async fn install(config: Config, verbose: bool) -> miette::Result<Summary> {
    let collab = Collaborators::system(&config);
    install_with(config, collab, verbose).await
}

/// Install dependencies for the workspace in `config`.
///
/// 1. Load the root manifest, if there is one.
/// 2. Install the dependencies it lists, concurrently.
/// 3. Read the workspace's own imports and attach and install anything new.
/// 4. Write the resulting graph back to the root manifest.
pub async fn install_with(
    config: Config,
    collab: Collaborators,
    verbose: bool,
) -> miette::Result<Summary> {
    use vendo_util::progress::{spinner, status, status_info, status_warn};

    let resolver = Resolver::new(config, collab);
    let root = resolver.root();
    let graph = resolver.graph();

    let manifest_path = graph.manifest_path(root)?;
    if manifest_path.is_file() {
        graph.load_manifest(root)?;
        status_info("Loaded", &manifest_path.display().to_string());
    }

    let sp = spinner("Installing dependencies...");
    let installs = resolver.install_deps(root).await;
    let mut summary = Summary::from_installs(&installs);

    sp.set_message("Resolving imports...");
    let meta = {
        let r = resolver.clone();
        tokio::task::spawn_blocking(move || r.meta(root))
            .await
            .map_err(|e| VendoError::Generic {
                message: format!("reading workspace sources: {e}"),
            })?
    };
    let meta = meta.ok_or_else(|| VendoError::Import {
        name: ".".to_string(),
        message: format!(
            "cannot read sources in {}",
            resolver.config().workspace_root.display()
        ),
    })?;
    let build = resolver.build(root, meta).await?;
    sp.finish_and_clear();
    summary.add_build(&build);

    let diamonds = resolver.diamonds();
    if verbose && !diamonds.is_empty() {
        eprintln!("{diamonds}");
    }
    for name in &summary.fetch_failures {
        status_warn("Failed", &format!("could not fetch {name}"));
    }
    for name in &summary.dirty {
        status_warn("Skipped", &format!("{name} has local changes"));
    }
    for error in &summary.errors {
        status_warn("Error", error);
    }

    let saved = graph.save_manifest(root)?;
    status(
        "Installed",
        &format!("{} dependencies ({} fetched)", graph.len(), summary.fetched),
    );
    status("Saved", &saved.display().to_string());
    tracing::debug!("Install summary: {summary:?}");
    Ok(summary)
}
