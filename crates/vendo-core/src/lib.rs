//! Core data types for vendo.
//!
//! This crate defines the types every other vendo crate shares: the immutable
//! run configuration, the module graph and its nodes, the manifest document
//! and its codec, module naming rules, and version-constraint matching.
//!
//! This crate is intentionally free of async code and network I/O.

/// File name of the per-directory manifest.
pub const MANIFEST_FILE: &str = "vendo.toml";

pub mod config;
pub mod graph;
pub mod manifest;
pub mod module;
pub mod naming;
pub mod store;
pub mod version;
