//! Version-control adapters.
//!
//! Every backend (git, Mercurial, Bazaar, Subversion) implements [`Repo`] by
//! shelling out to its command-line client. [`BackendFactory`] is the seam the
//! resolver uses to detect existing checkouts and construct new handles, so
//! tests can substitute in-memory repositories.

pub mod backend;
pub mod bzr;
pub mod factory;
pub mod git;
pub mod hg;
pub mod hosting;
pub mod svn;

pub use backend::{detect_from_fs, Repo, VcsKind};
pub use factory::{repo_from_paths, BackendFactory, CliBackends};
