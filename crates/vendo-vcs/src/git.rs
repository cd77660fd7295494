//! Git backend.

use std::path::{Path, PathBuf};

use vendo_util::errors::VendoError;
use vendo_util::process::CommandBuilder;

use crate::backend::{lines, Repo, VcsKind};

#[derive(Debug, Clone)]
pub struct GitRepo {
    remote: String,
    local: PathBuf,
}

impl GitRepo {
    /// Handle for `remote` checked out at `local`.
    ///
    /// An empty `remote` is read back from an existing checkout's `origin`.
    pub fn new(remote: &str, local: &Path) -> Result<Self, VendoError> {
        let mut repo = Self {
            remote: remote.to_string(),
            local: local.to_path_buf(),
        };
        if repo.remote.is_empty() {
            repo.remote = repo.git(&["config", "--get", "remote.origin.url"])?;
        }
        Ok(repo)
    }

    fn git(&self, args: &[&str]) -> Result<String, VendoError> {
        CommandBuilder::new("git").args(args.iter().copied()).cwd(&self.local).run()
    }

    fn rev_parse(&self, reference: &str) -> Result<String, VendoError> {
        self.git(&["rev-parse", "--verify", "--quiet", &format!("{reference}^{{commit}}")])
    }
}

impl Repo for GitRepo {
    fn kind(&self) -> VcsKind {
        VcsKind::Git
    }

    fn remote(&self) -> &str {
        &self.remote
    }

    fn local_path(&self) -> &Path {
        &self.local
    }

    fn check_local(&self) -> bool {
        self.local.join(".git").exists()
    }

    fn is_dirty(&self) -> bool {
        self.git(&["status", "--porcelain", "--untracked-files=no"])
            .map(|out| !out.is_empty())
            .unwrap_or(false)
    }

    fn get(&self) -> Result<(), VendoError> {
        if let Some(parent) = self.local.parent() {
            vendo_util::fs::ensure_dir(parent)?;
        }
        CommandBuilder::new("git")
            .arg("clone")
            .arg(&self.remote)
            .arg(self.local.to_string_lossy())
            .run()
            .map(|_| ())
    }

    fn update_version(&self, reference: &str) -> Result<(), VendoError> {
        if self.git(&["checkout", "--quiet", reference]).is_ok() {
            return Ok(());
        }
        // The reference may be newer than the clone.
        self.git(&["fetch", "--tags", "origin"])?;
        self.git(&["checkout", "--quiet", reference]).map(|_| ())
    }

    fn is_reference(&self, reference: &str) -> bool {
        match (self.rev_parse(reference), self.rev_parse("HEAD")) {
            (Ok(want), Ok(head)) => want == head,
            _ => false,
        }
    }

    fn version(&self) -> Result<String, VendoError> {
        self.git(&["rev-parse", "HEAD"])
    }

    fn tags(&self) -> Result<Vec<String>, VendoError> {
        self.git(&["tag", "--list"]).map(|out| lines(&out))
    }
}
