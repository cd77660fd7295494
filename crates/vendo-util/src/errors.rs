use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for all vendo operations.
#[derive(Debug, Error, Diagnostic)]
pub enum VendoError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid, unreadable or unwritable manifest (e.g. vendo.toml).
    #[error("Manifest error: {message}")]
    #[diagnostic(help("Check your vendo.toml for syntax errors"))]
    Manifest { message: String },

    /// No version-control backend could be constructed for a module.
    #[error("Could not resolve repo for {name}: {message}")]
    #[diagnostic(help("Set an explicit `url` for this module in vendo.toml"))]
    Backend { name: String, message: String },

    /// Updating a working copy to the requested reference failed.
    #[error("Checkout of {name} failed: {message}")]
    Checkout { name: String, message: String },

    /// Metadata for an import could not be loaded.
    #[error("Unable to import {name}: {message}")]
    Import { name: String, message: String },

    /// A version-control command exited unsuccessfully.
    #[error("VCS error: {message}")]
    Vcs { message: String },

    /// Catch-all for miscellaneous errors.
    #[error("{message}")]
    Generic { message: String },
}
