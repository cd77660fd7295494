//! Collaborator seams: where unit metadata and built-in classification come from.

use std::path::{Path, PathBuf};

use thiserror::Error;
use vendo_core::module::UnitMeta;

/// Why metadata for an import could not be produced.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The directory exists but holds no source files. Callers tolerate this.
    #[error("no buildable source files in {}", dir.display())]
    NoBuildableSource { dir: PathBuf, import_path: String },

    /// The import could not be located; usually it is not installed yet.
    #[error("cannot find module {name}")]
    NotFound { name: String },

    #[error("reading {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// Reads a unit's location and direct imports from source.
pub trait ImportExtractor: Send + Sync {
    /// Metadata for import path `name`, resolved relative to `cwd`.
    fn import(&self, name: &str, cwd: &Path) -> Result<UnitMeta, ExtractError>;
}

/// Decides whether an import belongs to the language itself.
pub trait BuiltinClassifier: Send + Sync {
    fn is_builtin(&self, import: &str) -> bool;
}

/// Treats every path whose first segment has no dot as standard library.
///
/// Relative imports and the `C` pseudo-package are built-in as well; neither
/// is ever fetched.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdlibClassifier;

impl BuiltinClassifier for StdlibClassifier {
    fn is_builtin(&self, import: &str) -> bool {
        if import == "C" || import.starts_with('.') {
            return true;
        }
        let first = import.split('/').next().unwrap_or_default();
        !first.contains('.')
    }
}
