//! Growing the graph from a unit's imports.

use futures_util::future::{BoxFuture, FutureExt};
use tracing::debug;
use vendo_core::graph::Attach;
use vendo_core::module::{NodeId, UnitMeta};
use vendo_core::naming;
use vendo_util::errors::VendoError;

use crate::diamond::DiamondEncounter;
use crate::report::BuildReport;
use crate::resolver::Resolver;

impl Resolver {
    /// Attach every external module `meta` imports under `id`, then install
    /// the newly attached ones concurrently.
    ///
    /// Modules already visible from `id` (its own children, or those of an
    /// ancestor) are reused rather than attached twice, so a module reached
    /// along several paths is installed once. Sub-packages of `id` itself
    /// are skipped. Returns after every spawned install has finished.
    pub fn build(
        &self,
        id: NodeId,
        meta: UnitMeta,
    ) -> BoxFuture<'static, Result<BuildReport, VendoError>> {
        let this = self.clone();
        async move {
            let canonical = naming::base_module(&meta.import_path);
            let rename = this.in_shared_root() && !canonical.is_empty() && canonical != ".";
            this.graph().update(id, |n| {
                n.path = Some(meta.dir.clone());
                if rename {
                    n.name = canonical;
                }
            });

            let owner = this.graph().name(id);
            let imports = {
                let owner = owner.clone();
                let list = meta.imports;
                this.blocking(move |r| Ok(r.resolve_imports(&owner, &list)))
                    .await?
            };
            for failure in &imports.failures {
                debug!("Not following {failure}");
            }

            let mut report = BuildReport {
                module: owner.clone(),
                ..Default::default()
            };
            let mut created = Vec::new();
            for name in &imports.names {
                if naming::is_subpackage(name, &owner) {
                    report.skipped.push(name.clone());
                    continue;
                }
                match this.graph().attach(id, name) {
                    Attach::Created(child) => {
                        debug!("Attached {name} under {}", this.fqn(id));
                        report.created.push(name.clone());
                        created.push(child);
                    }
                    Attach::Existing(existing) => {
                        this.note_shared(id, existing, &owner);
                        report.reused.push(name.clone());
                    }
                    Attach::Ancestor(_) => report.skipped.push(name.clone()),
                }
            }
            report.imports = imports;
            report.installs = this.install_all(created).await;
            Ok(report)
        }
        .boxed()
    }

    fn note_shared(&self, requester: NodeId, existing: NodeId, owner: &str) {
        let graph = self.graph();
        let Some(parent) = graph.parent(existing) else {
            return;
        };
        if parent == requester {
            return;
        }
        let (module, constraint) = graph.read(existing, |n| (n.name.clone(), n.version.clone()));
        self.record_diamond(DiamondEncounter {
            module,
            requested_by: if owner.is_empty() { ".".to_string() } else { owner.to_string() },
            attached_under: graph.name(parent),
            constraint,
        });
    }
}
