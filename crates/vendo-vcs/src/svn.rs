//! Subversion backend.
//!
//! Subversion has no local history graph: references are revision numbers,
//! and tags are directories under `<remote>/tags`. Checking out a tag switches
//! the working copy to that directory.

use std::path::{Path, PathBuf};

use vendo_util::errors::VendoError;
use vendo_util::process::CommandBuilder;

use crate::backend::{lines, Repo, VcsKind};

#[derive(Debug, Clone)]
pub struct SvnRepo {
    remote: String,
    local: PathBuf,
}

impl SvnRepo {
    pub fn new(remote: &str, local: &Path) -> Result<Self, VendoError> {
        let mut repo = Self {
            remote: remote.to_string(),
            local: local.to_path_buf(),
        };
        if repo.remote.is_empty() {
            let url = repo.svn(&["info", "--show-item", "url"])?;
            repo.remote = tag_base(&url).to_string();
        }
        Ok(repo)
    }

    fn tag_url(&self, tag: &str) -> String {
        format!("{}/tags/{tag}", self.remote.trim_end_matches('/'))
    }

    /// Command line that moves the working copy to `reference`.
    fn update_args(&self, reference: &str) -> Vec<String> {
        if is_revision(reference) {
            vec!["update".into(), "-r".into(), reference.into()]
        } else {
            vec!["switch".into(), self.tag_url(reference)]
        }
    }

    fn svn(&self, args: &[&str]) -> Result<String, VendoError> {
        CommandBuilder::new("svn").args(args.iter().copied()).cwd(&self.local).run()
    }
}

impl Repo for SvnRepo {
    fn kind(&self) -> VcsKind {
        VcsKind::Svn
    }

    fn remote(&self) -> &str {
        &self.remote
    }

    fn local_path(&self) -> &Path {
        &self.local
    }

    fn check_local(&self) -> bool {
        self.local.join(".svn").exists()
    }

    fn is_dirty(&self) -> bool {
        self.svn(&["status", "--quiet"])
            .map(|out| !out.is_empty())
            .unwrap_or(false)
    }

    fn get(&self) -> Result<(), VendoError> {
        if let Some(parent) = self.local.parent() {
            vendo_util::fs::ensure_dir(parent)?;
        }
        CommandBuilder::new("svn")
            .arg("checkout")
            .arg(&self.remote)
            .arg(self.local.to_string_lossy())
            .run()
            .map(|_| ())
    }

    fn update_version(&self, reference: &str) -> Result<(), VendoError> {
        let args = self.update_args(reference);
        CommandBuilder::new("svn")
            .args(args)
            .cwd(&self.local)
            .run()
            .map(|_| ())
    }

    fn is_reference(&self, reference: &str) -> bool {
        if is_revision(reference) {
            return self.version().is_ok_and(|current| current == reference);
        }
        self.svn(&["info", "--show-item", "url"])
            .is_ok_and(|url| url.trim_end_matches('/') == self.tag_url(reference))
    }

    fn version(&self) -> Result<String, VendoError> {
        self.svn(&["info", "--show-item", "revision"])
    }

    fn tags(&self) -> Result<Vec<String>, VendoError> {
        let url = format!("{}/tags", self.remote.trim_end_matches('/'));
        self.svn(&["ls", url.as_str()]).map(|out| {
            lines(&out)
                .into_iter()
                .map(|t| t.trim_end_matches('/').to_string())
                .collect()
        })
    }
}

/// Revision numbers (`1234`, `r1234`) and svn's revision keywords.
fn is_revision(reference: &str) -> bool {
    let digits = reference.strip_prefix('r').unwrap_or(reference);
    (!digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
        || matches!(reference, "HEAD" | "BASE" | "COMMITTED" | "PREV")
}

/// The module root of a working-copy URL that may point into `tags/`.
fn tag_base(url: &str) -> &str {
    match url.rfind("/tags/") {
        Some(i) => &url[..i],
        None => url,
    }
}
