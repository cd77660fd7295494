//! Bazaar backend.

use std::path::{Path, PathBuf};

use vendo_util::errors::VendoError;
use vendo_util::process::CommandBuilder;

use crate::backend::{lines, Repo, VcsKind};

#[derive(Debug, Clone)]
pub struct BzrRepo {
    remote: String,
    local: PathBuf,
}

impl BzrRepo {
    pub fn new(remote: &str, local: &Path) -> Result<Self, VendoError> {
        let mut repo = Self {
            remote: remote.to_string(),
            local: local.to_path_buf(),
        };
        if repo.remote.is_empty() {
            repo.remote = repo.bzr(&["config", "parent_location"])?;
        }
        Ok(repo)
    }

    fn bzr(&self, args: &[&str]) -> Result<String, VendoError> {
        CommandBuilder::new("bzr").args(args.iter().copied()).cwd(&self.local).run()
    }

    /// `revision-info` prints `<revno> <revision-id>`; keep the id.
    fn revision_id(&self, reference: &str) -> Result<String, VendoError> {
        let out = self.bzr(&["revision-info", "--tree", "-r", reference])?;
        out.split_whitespace()
            .nth(1)
            .map(str::to_string)
            .ok_or_else(|| VendoError::Vcs {
                message: format!("bzr revision-info gave no id for {reference}"),
            })
    }
}

impl Repo for BzrRepo {
    fn kind(&self) -> VcsKind {
        VcsKind::Bzr
    }

    fn remote(&self) -> &str {
        &self.remote
    }

    fn local_path(&self) -> &Path {
        &self.local
    }

    fn check_local(&self) -> bool {
        self.local.join(".bzr").exists()
    }

    fn is_dirty(&self) -> bool {
        self.bzr(&["status", "--short", "--versioned"])
            .map(|out| !out.is_empty())
            .unwrap_or(false)
    }

    fn get(&self) -> Result<(), VendoError> {
        if let Some(parent) = self.local.parent() {
            vendo_util::fs::ensure_dir(parent)?;
        }
        CommandBuilder::new("bzr")
            .arg("branch")
            .arg(&self.remote)
            .arg(self.local.to_string_lossy())
            .run()
            .map(|_| ())
    }

    fn update_version(&self, reference: &str) -> Result<(), VendoError> {
        self.bzr(&["update", "-r", reference]).map(|_| ())
    }

    fn is_reference(&self, reference: &str) -> bool {
        match (self.revision_id(reference), self.version()) {
            (Ok(want), Ok(current)) => want == current,
            _ => false,
        }
    }

    fn version(&self) -> Result<String, VendoError> {
        let out = self.bzr(&["revision-info", "--tree"])?;
        out.split_whitespace()
            .nth(1)
            .map(str::to_string)
            .ok_or_else(|| VendoError::Vcs {
                message: "bzr revision-info gave no id".to_string(),
            })
    }

    fn tags(&self) -> Result<Vec<String>, VendoError> {
        self.bzr(&["tags"]).map(|out| {
            lines(&out)
                .into_iter()
                .filter_map(|l| l.split_whitespace().next().map(str::to_string))
                .collect()
        })
    }
}
