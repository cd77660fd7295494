use std::fmt;
use std::path::Path;

use vendo_util::errors::VendoError;

/// The kinds of version control vendo knows how to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VcsKind {
    Git,
    Hg,
    Bzr,
    Svn,
    /// No usable version control.
    None,
}

impl VcsKind {
    /// Metadata directory that marks a checkout of this kind.
    pub fn marker(self) -> Option<&'static str> {
        match self {
            VcsKind::Git => Some(".git"),
            VcsKind::Hg => Some(".hg"),
            VcsKind::Bzr => Some(".bzr"),
            VcsKind::Svn => Some(".svn"),
            VcsKind::None => None,
        }
    }

    /// Whether the backend keeps the full history graph locally.
    pub fn is_distributed(self) -> bool {
        matches!(self, VcsKind::Git | VcsKind::Hg | VcsKind::Bzr)
    }
}

impl fmt::Display for VcsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            VcsKind::Git => "git",
            VcsKind::Hg => "hg",
            VcsKind::Bzr => "bzr",
            VcsKind::Svn => "svn",
            VcsKind::None => "none",
        };
        f.write_str(s)
    }
}

/// Detect which backend manages the checkout at `path`.
pub fn detect_from_fs(path: &Path) -> Option<VcsKind> {
    [VcsKind::Git, VcsKind::Hg, VcsKind::Bzr, VcsKind::Svn]
        .into_iter()
        .find(|kind| kind.marker().is_some_and(|m| path.join(m).exists()))
}

/// A handle on one module's remote repository and its local working copy.
///
/// All methods block on the backend's command-line client.
pub trait Repo: Send + Sync + fmt::Debug {
    fn kind(&self) -> VcsKind;

    /// Remote address the working copy was (or will be) cloned from.
    fn remote(&self) -> &str;

    /// Directory of the working copy.
    fn local_path(&self) -> &Path;

    /// Whether a working copy already exists at [`Repo::local_path`].
    fn check_local(&self) -> bool;

    /// Whether the working copy has uncommitted modifications.
    fn is_dirty(&self) -> bool;

    /// Create the working copy from the remote.
    fn get(&self) -> Result<(), VendoError>;

    /// Move the working copy to `reference`.
    fn update_version(&self, reference: &str) -> Result<(), VendoError>;

    /// Whether `reference` names the revision that is currently checked out.
    fn is_reference(&self, reference: &str) -> bool;

    /// The concrete revision currently checked out.
    fn version(&self) -> Result<String, VendoError>;

    /// Tag names known to the working copy.
    fn tags(&self) -> Result<Vec<String>, VendoError>;
}

/// Split command output into trimmed, non-empty lines.
pub(crate) fn lines(out: &str) -> Vec<String> {
    out.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}
