//! The engine handle shared by every concurrent task.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::Semaphore;
use tracing::warn;
use vendo_core::config::Config;
use vendo_core::graph::ModuleGraph;
use vendo_core::module::{ModuleNode, NodeId, UnitMeta};
use vendo_util::errors::VendoError;
use vendo_vcs::{BackendFactory, CliBackends, Repo};

use crate::diamond::{DiamondEncounter, DiamondReport};
use crate::extract::{BuiltinClassifier, ExtractError, ImportExtractor, StdlibClassifier};
use crate::imports::{ImportResolver, ResolvedImports};
use crate::scan::SourceScanner;

/// Upper bound on fetches running at the same time.
pub(crate) const MAX_CONCURRENT_FETCHES: usize = 8;

/// The pluggable parts of the engine.
#[derive(Clone)]
pub struct Collaborators {
    pub extractor: Arc<dyn ImportExtractor>,
    pub classifier: Arc<dyn BuiltinClassifier>,
    pub backends: Arc<dyn BackendFactory>,
}

impl Collaborators {
    /// Source scanning, the standard-library classifier, and the
    /// command-line version-control clients.
    pub fn system(config: &Config) -> Self {
        Self {
            extractor: Arc::new(SourceScanner::new(config)),
            classifier: Arc::new(StdlibClassifier),
            backends: Arc::new(CliBackends),
        }
    }
}

/// Cheaply cloneable handle to one resolution run.
///
/// Holds the module graph, the configuration and the collaborators, plus a
/// memo of repository handles per node.
#[derive(Clone)]
pub struct Resolver {
    inner: Arc<Inner>,
}

struct Inner {
    config: Config,
    graph: ModuleGraph,
    collab: Collaborators,
    repos: Mutex<HashMap<NodeId, Arc<dyn Repo>>>,
    diamonds: Mutex<DiamondReport>,
    fetches: Semaphore,
}

fn locked<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

impl Resolver {
    /// Start a run whose root module lives at `config.workspace_root`.
    pub fn new(config: Config, collab: Collaborators) -> Self {
        let root = ModuleNode::new("")
            .with_path(config.workspace_root.clone())
            .with_manifest_file(config.manifest_file.clone());
        Self {
            inner: Arc::new(Inner {
                graph: ModuleGraph::new(root),
                config,
                collab,
                repos: Mutex::new(HashMap::new()),
                diamonds: Mutex::new(DiamondReport::new()),
                fetches: Semaphore::new(MAX_CONCURRENT_FETCHES),
            }),
        }
    }

    pub fn graph(&self) -> &ModuleGraph {
        &self.inner.graph
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    pub fn root(&self) -> NodeId {
        self.inner.graph.root()
    }

    /// Modules discovered again after their first attachment.
    pub fn diamonds(&self) -> DiamondReport {
        locked(&self.inner.diamonds).clone()
    }

    pub(crate) fn record_diamond(&self, encounter: DiamondEncounter) {
        locked(&self.inner.diamonds).add(encounter);
    }

    pub(crate) fn backends(&self) -> &dyn BackendFactory {
        self.inner.collab.backends.as_ref()
    }

    pub(crate) fn fetch_permits(&self) -> &Semaphore {
        &self.inner.fetches
    }

    pub(crate) fn cached_repo(&self, id: NodeId) -> Option<Arc<dyn Repo>> {
        locked(&self.inner.repos).get(&id).cloned()
    }

    /// Memoize `repo` for `id`, keeping the first handle if another task won.
    pub(crate) fn cache_repo(&self, id: NodeId, repo: Arc<dyn Repo>) -> Arc<dyn Repo> {
        locked(&self.inner.repos).entry(id).or_insert(repo).clone()
    }

    /// Whether the root module sits inside the shared source tree.
    pub fn in_shared_root(&self) -> bool {
        let root = self.inner.graph.root();
        self.inner
            .graph
            .read(root, |n| n.path.clone())
            .is_some_and(|p| self.inner.config.is_in_shared_root(&p))
    }

    /// Name the extractor knows a node by.
    ///
    /// Inside the shared tree, dependencies are addressed through the root's
    /// vendor directory; otherwise the node's name is used as is.
    pub fn fqn(&self, id: NodeId) -> String {
        let graph = &self.inner.graph;
        let own = dotted(graph.name(id));
        if graph.is_root(id) || !self.in_shared_root() {
            return own;
        }
        let root = dotted(graph.name(graph.root()));
        format!("{root}/vendor/{own}")
    }

    /// Directory a node is (or will be) checked out in.
    pub fn repo_path(&self, id: NodeId) -> PathBuf {
        let node = self.inner.graph.snapshot(id);
        node.install_path
            .unwrap_or_else(|| self.inner.config.install_path(&node.name))
    }

    /// Extractor metadata for a node, computed once and cached on the node.
    ///
    /// A directory without buildable sources yields metadata with no imports.
    /// Other failures are logged and yield `None`.
    pub fn meta(&self, id: NodeId) -> Option<UnitMeta> {
        if let Some(meta) = self.inner.graph.read(id, |n| n.meta.clone()) {
            return Some(meta);
        }
        let fqn = self.fqn(id);
        let meta = match self
            .inner
            .collab
            .extractor
            .import(&fqn, &self.inner.config.workspace_root)
        {
            Ok(meta) => meta,
            Err(ExtractError::NoBuildableSource { dir, import_path }) => UnitMeta {
                dir,
                import_path,
                imports: Vec::new(),
            },
            Err(e) => {
                warn!("Unable to read imports of {fqn}: {e}");
                return None;
            }
        };
        Some(
            self.inner
                .graph
                .update(id, |n| n.meta.get_or_insert(meta).clone()),
        )
    }

    /// Run [`ImportResolver::resolve`] with this run's collaborators.
    pub fn resolve_imports(&self, owner: &str, imports: &[String]) -> ResolvedImports {
        let c = &self.inner.collab;
        ImportResolver::new(
            c.extractor.as_ref(),
            c.classifier.as_ref(),
            self.inner.config.vendoring,
            &self.inner.config.workspace_root,
        )
        .resolve(owner, imports)
    }

    /// Run blocking work on the blocking pool with a clone of this handle.
    pub(crate) async fn blocking<T, F>(&self, f: F) -> Result<T, VendoError>
    where
        T: Send + 'static,
        F: FnOnce(Resolver) -> Result<T, VendoError> + Send + 'static,
    {
        let this = self.clone();
        tokio::task::spawn_blocking(move || f(this))
            .await
            .map_err(|e| VendoError::Generic {
                message: format!("background task failed: {e}"),
            })?
    }
}

fn dotted(name: String) -> String {
    if name.is_empty() {
        ".".to_string()
    } else {
        name
    }
}
