//! Mercurial backend.

use std::path::{Path, PathBuf};

use vendo_util::errors::VendoError;
use vendo_util::process::CommandBuilder;

use crate::backend::{lines, Repo, VcsKind};

#[derive(Debug, Clone)]
pub struct HgRepo {
    remote: String,
    local: PathBuf,
}

impl HgRepo {
    pub fn new(remote: &str, local: &Path) -> Result<Self, VendoError> {
        let mut repo = Self {
            remote: remote.to_string(),
            local: local.to_path_buf(),
        };
        if repo.remote.is_empty() {
            repo.remote = repo.hg(&["paths", "default"])?;
        }
        Ok(repo)
    }

    fn hg(&self, args: &[&str]) -> Result<String, VendoError> {
        CommandBuilder::new("hg").args(args.iter().copied()).cwd(&self.local).run()
    }

    fn node_of(&self, reference: &str) -> Result<String, VendoError> {
        self.hg(&["log", "-r", reference, "--template", "{node}"])
    }
}

impl Repo for HgRepo {
    fn kind(&self) -> VcsKind {
        VcsKind::Hg
    }

    fn remote(&self) -> &str {
        &self.remote
    }

    fn local_path(&self) -> &Path {
        &self.local
    }

    fn check_local(&self) -> bool {
        self.local.join(".hg").exists()
    }

    fn is_dirty(&self) -> bool {
        self.hg(&["status", "-mard"])
            .map(|out| !out.is_empty())
            .unwrap_or(false)
    }

    fn get(&self) -> Result<(), VendoError> {
        if let Some(parent) = self.local.parent() {
            vendo_util::fs::ensure_dir(parent)?;
        }
        CommandBuilder::new("hg")
            .arg("clone")
            .arg(&self.remote)
            .arg(self.local.to_string_lossy())
            .run()
            .map(|_| ())
    }

    fn update_version(&self, reference: &str) -> Result<(), VendoError> {
        if self.hg(&["update", "-r", reference]).is_ok() {
            return Ok(());
        }
        self.hg(&["pull"])?;
        self.hg(&["update", "-r", reference]).map(|_| ())
    }

    fn is_reference(&self, reference: &str) -> bool {
        match (self.node_of(reference), self.node_of(".")) {
            (Ok(want), Ok(current)) => !want.is_empty() && want == current,
            _ => false,
        }
    }

    fn version(&self) -> Result<String, VendoError> {
        self.node_of(".")
    }

    fn tags(&self) -> Result<Vec<String>, VendoError> {
        self.hg(&["tags", "--quiet"]).map(|out| {
            lines(&out)
                .into_iter()
                .filter(|t| t != "tip")
                .collect()
        })
    }
}
