//! Fetching nodes and fanning installs out across tasks.

use futures_util::future::{BoxFuture, FutureExt};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};
use vendo_core::module::NodeId;
use vendo_util::errors::VendoError;

use crate::report::{CheckoutOutcome, CheckoutReport, DepInstall, FetchOutcome, InstallReport};
use crate::resolver::Resolver;

impl Resolver {
    /// Make sure a node is present locally, then check it out.
    ///
    /// A failed fetch is logged and recorded in the report; the checkout
    /// step still runs and finds nothing to pin. Failing to construct a
    /// backend, or failing to move an existing checkout, is an error.
    pub fn install(&self, id: NodeId) -> BoxFuture<'static, Result<InstallReport, VendoError>> {
        let this = self.clone();
        async move {
            let name = this.graph().name(id);
            if this.graph().is_root(id) {
                return Ok(InstallReport {
                    name,
                    fetch: FetchOutcome::Present,
                    checkout: CheckoutReport::early(CheckoutOutcome::Root),
                });
            }

            let (repo, present) = this
                .blocking(move |r| {
                    let repo = r.vcs(id)?;
                    let present = repo.check_local();
                    Ok((repo, present))
                })
                .await?;
            let local = repo.local_path().to_path_buf();
            this.graph().update(id, |n| {
                n.installed = present;
                n.path = Some(local);
            });

            let fetch = if present {
                debug!("{name} is already installed");
                FetchOutcome::Present
            } else {
                let _permit = this.fetch_permits().acquire().await;
                info!("Installing {name}");
                match this.blocking(move |_| repo.get()).await {
                    Ok(()) => FetchOutcome::Fetched,
                    Err(e) => {
                        warn!("Failed to install {name}: {e}");
                        FetchOutcome::Failed(e.to_string())
                    }
                }
            };

            let checkout = this.checkout(id).await?;
            Ok(InstallReport {
                name,
                fetch,
                checkout,
            })
        }
        .boxed()
    }

    /// Install every direct dependency of `id` concurrently.
    ///
    /// Returns once all of them have finished, in dependency order. Each
    /// failure is logged and reported; none stops the others.
    pub async fn install_deps(&self, id: NodeId) -> Vec<DepInstall> {
        let deps = self.graph().dependencies(id);
        self.install_all(deps).await
    }

    pub(crate) async fn install_all(&self, ids: Vec<NodeId>) -> Vec<DepInstall> {
        let mut set = JoinSet::new();
        for (idx, child) in ids.into_iter().enumerate() {
            let install = self.install(child);
            set.spawn(async move { (idx, child, install.await) });
        }

        let mut done = Vec::with_capacity(set.len());
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok(entry) => done.push(entry),
                Err(e) => warn!("Install task did not finish: {e}"),
            }
        }
        done.sort_by_key(|(idx, ..)| *idx);

        done.into_iter()
            .map(|(_, id, result)| {
                if let Err(e) = &result {
                    warn!("{e}");
                }
                DepInstall {
                    id,
                    name: self.graph().name(id),
                    result,
                }
            })
            .collect()
    }
}
