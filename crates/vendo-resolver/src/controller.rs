//! Version control for one node: picking a backend, pinning the working
//! copy, and picking up the module's own manifest afterwards.

use std::sync::Arc;

use futures_util::future::{BoxFuture, FutureExt};
use tracing::{debug, info, warn};
use vendo_core::module::NodeId;
use vendo_core::version;
use vendo_util::errors::VendoError;
use vendo_vcs::{hosting, repo_from_paths, Repo, VcsKind};

use crate::report::{CheckoutOutcome, CheckoutReport, ManifestOutcome};
use crate::resolver::Resolver;

impl Resolver {
    /// Backend kind and remote for a node.
    ///
    /// An existing checkout (in the install directory, then the shared tree)
    /// decides both. Failing that they are inferred from the module name,
    /// which may also supply a version constraint when the node has none.
    /// An explicit `url` on the node always wins.
    pub fn remote(&self, id: NodeId) -> (VcsKind, Option<String>) {
        let node = self.graph().snapshot(id);
        let local = self.repo_path(id);
        let shared = self.config().shared_path(&node.name);
        let candidates = std::iter::once(local.as_path()).chain(shared.as_deref());

        let (mut kind, mut url) = match repo_from_paths(self.backends(), candidates) {
            Some(existing) => {
                debug!(
                    "Using existing {} checkout of {} at {}",
                    existing.kind(),
                    node.name,
                    existing.local_path().display()
                );
                let remote = existing.remote();
                (
                    existing.kind(),
                    (!remote.is_empty()).then(|| remote.to_string()),
                )
            }
            None => {
                let inferred = hosting::infer(&node.name);
                if let Some(v) = inferred.version {
                    self.graph().update(id, |n| {
                        if n.version.is_empty() {
                            n.version = v;
                        }
                    });
                }
                (inferred.kind, inferred.url)
            }
        };

        if !node.url.is_empty() {
            url = Some(node.url.clone());
            if kind == VcsKind::None {
                kind = VcsKind::Git;
            }
        }
        (kind, url)
    }

    /// Repository handle for a node, constructed once per node.
    pub fn vcs(&self, id: NodeId) -> Result<Arc<dyn Repo>, VendoError> {
        if let Some(repo) = self.cached_repo(id) {
            return Ok(repo);
        }
        let name = self.graph().name(id);
        let backend_err = |message: String| VendoError::Backend {
            name: name.clone(),
            message,
        };

        let (kind, url) = self.remote(id);
        if kind == VcsKind::None {
            return Err(backend_err(
                "no version control could be inferred from the module name".to_string(),
            ));
        }
        let url = url.ok_or_else(|| backend_err(format!("no remote for {kind} checkout")))?;
        let repo = self
            .backends()
            .create(kind, &url, &self.repo_path(id))
            .map_err(|e| backend_err(e.to_string()))?;
        Ok(self.cache_repo(id, repo))
    }

    /// Move a node's working copy to its target and record the result.
    ///
    /// The root is never touched. A missing checkout and a dirty one are
    /// both left alone. When the checkout was pinned, the module's own
    /// manifest is loaded; without one, the parent is rebuilt from source so
    /// the module's imports are attached next to it.
    pub fn checkout(&self, id: NodeId) -> BoxFuture<'static, Result<CheckoutReport, VendoError>> {
        let this = self.clone();
        async move {
            if this.graph().is_root(id) {
                return Ok(CheckoutReport::early(CheckoutOutcome::Root));
            }
            let outcome = this
                .blocking(move |r| {
                    let repo = r.vcs(id)?;
                    r.pin(id, repo.as_ref())
                })
                .await?;
            if !outcome.pinned() {
                return Ok(CheckoutReport::early(outcome));
            }
            let manifest = this.nested_manifest(id).await?;
            Ok(CheckoutReport { outcome, manifest })
        }
        .boxed()
    }

    fn pin(&self, id: NodeId, repo: &dyn Repo) -> Result<CheckoutOutcome, VendoError> {
        let node = self.graph().snapshot(id);
        let name = node.name.clone();
        let checkout_err = |e: VendoError| VendoError::Checkout {
            name: name.clone(),
            message: e.to_string(),
        };

        let installed = repo.check_local();
        self.graph().update(id, |n| n.installed = installed);
        if !installed {
            debug!("{name} has no local checkout");
            return Ok(CheckoutOutcome::NotInstalled);
        }
        if repo.is_dirty() {
            warn!("Skipping checkout for {name}. Dependency is dirty.");
            return Ok(CheckoutOutcome::Dirty);
        }

        let outcome = if !node.reference.is_empty() || !node.version.is_empty() {
            let wanted = if node.reference.is_empty() {
                let tags = repo.tags().unwrap_or_else(|e| {
                    debug!("No tags for {name}: {e}");
                    Vec::new()
                });
                version::resolve_target(&node.version, &tags)
            } else {
                node.reference.clone()
            };
            if repo.is_reference(&wanted) {
                debug!("{name} is already at {wanted}");
                return Ok(CheckoutOutcome::Current);
            }
            info!("Checking out {name} at {wanted}");
            repo.update_version(&wanted).map_err(checkout_err)?;
            CheckoutOutcome::Updated {
                reference: repo.version().map_err(checkout_err)?,
            }
        } else {
            CheckoutOutcome::Recorded {
                reference: repo.version().map_err(checkout_err)?,
            }
        };

        let reference = match &outcome {
            CheckoutOutcome::Updated { reference } | CheckoutOutcome::Recorded { reference } => {
                reference.clone()
            }
            _ => String::new(),
        };
        let local = repo.local_path().to_path_buf();
        self.graph().update(id, |n| {
            n.reference = reference;
            n.path = Some(local);
        });
        Ok(outcome)
    }

    async fn nested_manifest(&self, id: NodeId) -> Result<ManifestOutcome, VendoError> {
        let name = self.graph().name(id);
        let loaded = self
            .blocking(move |r| Ok(r.graph().load_manifest(id)))
            .await?;
        match loaded {
            Ok(()) => {
                let dependencies = self.graph().dependencies(id).len();
                debug!("{name} carries its own manifest with {dependencies} dependencies");
                Ok(ManifestOutcome::Loaded { dependencies })
            }
            Err(e) => {
                match &e {
                    VendoError::Io(_) => debug!("{name} has no manifest"),
                    other => warn!("Ignoring manifest of {name}: {other}"),
                }
                let Some(parent) = self.graph().parent(id) else {
                    return Ok(ManifestOutcome::Absent(e.to_string()));
                };
                match self.blocking(move |r| Ok(r.meta(parent))).await? {
                    Some(meta) => {
                        let build = self.build(parent, meta).await?;
                        Ok(ManifestOutcome::Rederived(Box::new(build)))
                    }
                    None => Ok(ManifestOutcome::Absent(format!(
                        "no source metadata for {}",
                        self.fqn(parent)
                    ))),
                }
            }
        }
    }
}
