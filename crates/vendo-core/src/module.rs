//! Module nodes and unit metadata.

use std::fmt;
use std::path::PathBuf;

use crate::MANIFEST_FILE;

/// Stable handle to a node inside a [`crate::graph::ModuleGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What the import extractor reports about one unit of source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitMeta {
    /// Directory holding the unit's sources.
    pub dir: PathBuf,
    /// Import path the unit is known by from its location.
    pub import_path: String,
    /// Direct imports, as written in source.
    pub imports: Vec<String>,
}

/// One module in the dependency graph: the root or a dependency.
///
/// `parent` and `dependencies` are maintained by the graph; the parent link
/// is lookup-only and carries no ownership.
#[derive(Debug, Clone)]
pub struct ModuleNode {
    /// Canonical module path.
    pub name: String,
    /// User-specified compatibility expression, e.g. `~1.0.0` or `1.*`.
    pub version: String,
    /// Concrete revision or tag recorded after checkout.
    pub reference: String,
    /// Explicit remote override.
    pub url: String,
    /// Local checkout directory, once known.
    pub path: Option<PathBuf>,
    /// Per-node override for the install root.
    pub install_path: Option<PathBuf>,
    /// Cached extractor output.
    pub meta: Option<UnitMeta>,
    pub installed: bool,
    pub has_manifest: bool,
    pub manifest_file: String,
    pub(crate) parent: Option<NodeId>,
    pub(crate) dependencies: Vec<NodeId>,
}

impl ModuleNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: String::new(),
            reference: String::new(),
            url: String::new(),
            path: None,
            install_path: None,
            meta: None,
            installed: false,
            has_manifest: false,
            manifest_file: MANIFEST_FILE.to_string(),
            parent: None,
            dependencies: Vec::new(),
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_manifest_file(mut self, file: impl Into<String>) -> Self {
        self.manifest_file = file.into();
        self
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn dependencies(&self) -> &[NodeId] {
        &self.dependencies
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// The reference a checkout should aim for: the pinned reference when
    /// set, the version constraint otherwise.
    pub fn target(&self) -> &str {
        if self.reference.is_empty() {
            &self.version
        } else {
            &self.reference
        }
    }
}

impl fmt::Display for ModuleNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            f.write_str(".")?;
        } else {
            f.write_str(&self.name)?;
        }
        if !self.version.is_empty() {
            write!(f, " {}", self.version)?;
        }
        if !self.reference.is_empty() {
            let end = self
                .reference
                .char_indices()
                .nth(12)
                .map_or(self.reference.len(), |(i, _)| i);
            let short = &self.reference[..end];
            write!(f, " @{short}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_prefers_reference() {
        let mut node = ModuleNode::new("github.com/a/b").with_version("~1.0");
        assert_eq!(node.target(), "~1.0");
        node.reference = "v1.0.4".to_string();
        assert_eq!(node.target(), "v1.0.4");
    }

    #[test]
    fn display_shortens_reference() {
        let mut node = ModuleNode::new("github.com/a/b").with_version("1.*");
        node.reference = "0123456789abcdef0123".to_string();
        assert_eq!(node.to_string(), "github.com/a/b 1.* @0123456789ab");
        assert_eq!(ModuleNode::new("").to_string(), ".");
    }
}
