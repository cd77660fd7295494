use std::path::Path;
use std::sync::Arc;

use vendo_util::errors::VendoError;

use crate::backend::{detect_from_fs, Repo, VcsKind};
use crate::bzr::BzrRepo;
use crate::git::GitRepo;
use crate::hg::HgRepo;
use crate::svn::SvnRepo;

/// Constructs repository handles.
pub trait BackendFactory: Send + Sync {
    /// Open an existing checkout at `path`, reading its kind and remote from
    /// the on-disk metadata. `None` when nothing usable is there.
    fn open(&self, path: &Path) -> Option<Arc<dyn Repo>>;

    /// Construct a handle for `remote` to be checked out at `local`.
    fn create(&self, kind: VcsKind, remote: &str, local: &Path)
        -> Result<Arc<dyn Repo>, VendoError>;
}

/// Open the first of `paths` that holds a usable checkout.
pub fn repo_from_paths<'a>(
    factory: &dyn BackendFactory,
    paths: impl IntoIterator<Item = &'a Path>,
) -> Option<Arc<dyn Repo>> {
    paths.into_iter().find_map(|p| factory.open(p))
}

/// Backends that drive the `git`, `hg`, `bzr` and `svn` command-line clients.
#[derive(Debug, Default, Clone, Copy)]
pub struct CliBackends;

impl BackendFactory for CliBackends {
    fn open(&self, path: &Path) -> Option<Arc<dyn Repo>> {
        let kind = detect_from_fs(path)?;
        match self.create(kind, "", path) {
            Ok(repo) => Some(repo),
            Err(e) => {
                tracing::debug!("Ignoring {} checkout at {}: {e}", kind, path.display());
                None
            }
        }
    }

    fn create(
        &self,
        kind: VcsKind,
        remote: &str,
        local: &Path,
    ) -> Result<Arc<dyn Repo>, VendoError> {
        let repo: Arc<dyn Repo> = match kind {
            VcsKind::Git => Arc::new(GitRepo::new(remote, local)?),
            VcsKind::Hg => Arc::new(HgRepo::new(remote, local)?),
            VcsKind::Bzr => Arc::new(BzrRepo::new(remote, local)?),
            VcsKind::Svn => Arc::new(SvnRepo::new(remote, local)?),
            VcsKind::None => {
                return Err(VendoError::Vcs {
                    message: format!("no version control for {}", local.display()),
                })
            }
        };
        Ok(repo)
    }
}
