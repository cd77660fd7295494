//! Loading and saving a node's manifest file.

use std::path::PathBuf;

use vendo_util::errors::VendoError;

use crate::graph::ModuleGraph;
use crate::manifest::ManifestDoc;
use crate::module::NodeId;

impl ModuleGraph {
    /// Path of the manifest file inside `id`'s local directory.
    pub fn manifest_path(&self, id: NodeId) -> Result<PathBuf, VendoError> {
        self.read(id, |n| match &n.path {
            Some(dir) => Ok(dir.join(&n.manifest_file)),
            None => Err(VendoError::Manifest {
                message: format!("{} has no local directory", n),
            }),
        })
    }

    /// Read `id`'s manifest and merge it into the graph.
    ///
    /// On any failure the node is marked as having no manifest and the error
    /// is returned; an absent file shows up as [`VendoError::Io`], which
    /// callers treat as a normal condition.
    pub fn load_manifest(&self, id: NodeId) -> Result<(), VendoError> {
        self.update(id, |n| n.has_manifest = false);
        let path = self.manifest_path(id)?;
        let doc = ManifestDoc::from_path(&path)?;
        self.apply_manifest(id, &doc);
        self.update(id, |n| n.has_manifest = true);
        tracing::debug!("Loaded manifest {}", path.display());
        Ok(())
    }

    /// Write `id` and its subtree to `id`'s manifest file.
    pub fn save_manifest(&self, id: NodeId) -> Result<PathBuf, VendoError> {
        let path = self.manifest_path(id)?;
        self.to_manifest(id).write_to(&path)?;
        Ok(path)
    }
}
