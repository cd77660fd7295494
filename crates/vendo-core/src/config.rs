use std::path::{Path, PathBuf};

use crate::MANIFEST_FILE;

/// Process-wide settings, fixed for the duration of one invocation.
///
/// Passed by value (usually behind an `Arc`) to everything that needs it;
/// nothing in vendo reads these from global state.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory of the root module being installed.
    pub workspace_root: PathBuf,
    /// Where dependency checkouts are materialized, one directory per module name.
    pub install_root: PathBuf,
    /// Optional shared source tree (the `$GOPATH/src` convention) that may
    /// already hold checkouts and that changes how module names are derived.
    pub shared_root: Option<PathBuf>,
    /// Whether imports are followed into vendored dependencies.
    pub vendoring: bool,
    /// Manifest file name looked up in every module directory.
    pub manifest_file: String,
    /// Extension of source files scanned for imports, without the dot.
    pub source_extension: String,
}

impl Config {
    /// Defaults for a workspace rooted at `workspace_root`: install into
    /// `<workspace_root>/vendor`, vendoring on, no shared root.
    pub fn new(workspace_root: impl Into<PathBuf>) -> Self {
        let workspace_root = workspace_root.into();
        Self {
            install_root: workspace_root.join("vendor"),
            workspace_root,
            shared_root: None,
            vendoring: true,
            manifest_file: MANIFEST_FILE.to_string(),
            source_extension: "go".to_string(),
        }
    }

    pub fn with_install_root(mut self, dir: impl Into<PathBuf>) -> Self {
        self.install_root = dir.into();
        self
    }

    pub fn with_shared_root(mut self, dir: Option<PathBuf>) -> Self {
        self.shared_root = dir;
        self
    }

    pub fn with_vendoring(mut self, enabled: bool) -> Self {
        self.vendoring = enabled;
        self
    }

    pub fn with_manifest_file(mut self, name: impl Into<String>) -> Self {
        self.manifest_file = name.into();
        self
    }

    pub fn with_source_extension(mut self, ext: impl Into<String>) -> Self {
        self.source_extension = ext.into();
        self
    }

    /// Whether `path` lies inside the shared source tree.
    pub fn is_in_shared_root(&self, path: &Path) -> bool {
        match &self.shared_root {
            Some(root) => path.starts_with(root),
            None => false,
        }
    }

    /// Location of `name` inside the shared source tree, if one is configured.
    pub fn shared_path(&self, name: &str) -> Option<PathBuf> {
        self.shared_root
            .as_ref()
            .map(|root| vendo_util::fs::join_module_path(root, name))
    }

    /// Default checkout directory for module `name`.
    pub fn install_path(&self, name: &str) -> PathBuf {
        vendo_util::fs::join_module_path(&self.install_root, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_install_into_vendor() {
        let cfg = Config::new("/work/app");
        assert_eq!(cfg.install_root, Path::new("/work/app/vendor"));
        assert!(cfg.vendoring);
        assert_eq!(cfg.manifest_file, "vendo.toml");
        assert_eq!(
            cfg.install_path("github.com/pkg/errors"),
            Path::new("/work/app/vendor/github.com/pkg/errors")
        );
    }

    #[test]
    fn shared_root_membership() {
        let cfg = Config::new("/gopath/src/github.com/me/app")
            .with_shared_root(Some(PathBuf::from("/gopath/src")));
        assert!(cfg.is_in_shared_root(Path::new("/gopath/src/github.com/me/app")));
        assert!(!cfg.is_in_shared_root(Path::new("/elsewhere/app")));
        assert_eq!(
            cfg.shared_path("golang.org/x/net"),
            Some(PathBuf::from("/gopath/src/golang.org/x/net"))
        );
    }

    #[test]
    fn no_shared_root_means_never_inside() {
        let cfg = Config::new("/work/app");
        assert!(!cfg.is_in_shared_root(Path::new("/work/app")));
        assert_eq!(cfg.shared_path("a.com/b/c"), None);
    }
}
