use serde::{Deserialize, Serialize};
use std::path::Path;

use vendo_util::errors::VendoError;

/// Persisted record of a module: its name, constraint, pinned reference,
/// remote override and (unless the dependency keeps its own manifest) its
/// dependency subtree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestDoc {
    pub pkg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ver: Option<String>,
    #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deps: Option<Vec<ManifestDoc>>,
}

impl ManifestDoc {
    pub fn new(pkg: impl Into<String>) -> Self {
        Self {
            pkg: pkg.into(),
            ..Self::default()
        }
    }

    /// Parse a manifest document from TOML text.
    pub fn parse(content: &str) -> Result<Self, VendoError> {
        toml::from_str(content).map_err(|e| VendoError::Manifest {
            message: format!("Failed to parse manifest: {e}"),
        })
    }

    /// Load and parse a manifest file.
    ///
    /// A missing or unreadable file surfaces as [`VendoError::Io`] so callers
    /// can tell absence apart from a malformed document.
    pub fn from_path(path: &Path) -> Result<Self, VendoError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Serialize the manifest to a pretty-printed TOML string.
    pub fn to_string_pretty(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Serialize and write the manifest to `path`.
    pub fn write_to(&self, path: &Path) -> Result<(), VendoError> {
        let content = self.to_string_pretty().map_err(|e| VendoError::Manifest {
            message: format!("Failed to serialize manifest: {e}"),
        })?;
        std::fs::write(path, content).map_err(|e| VendoError::Manifest {
            message: format!("Failed to write {}: {e}", path.display()),
        })
    }

    /// Number of documents in this subtree, excluding `self`.
    pub fn dependency_count(&self) -> usize {
        self.deps
            .iter()
            .flatten()
            .map(|d| 1 + d.dependency_count())
            .sum()
    }
}

/// Turn an empty string into `None` for optional manifest fields.
pub(crate) fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}
