//! Dependency graph engine: recursive import discovery, concurrent graph
//! construction with deduplication, version-control backed fetch and
//! checkout, and manifest round-tripping.
//!
//! [`Resolver`] ties the pieces together. It owns the [`vendo_core::graph::ModuleGraph`]
//! and drives three mutually recursive operations:
//!
//! - [`Resolver::build`] turns a unit's imports into child nodes and installs them,
//! - [`Resolver::install`] fetches a node if needed and checks it out,
//! - [`Resolver::checkout`] pins the working copy and loads its manifest, falling
//!   back to rebuilding the parent from source when there is none.

pub mod builder;
pub mod controller;
pub mod diamond;
pub mod extract;
pub mod imports;
pub mod install;
pub mod report;
pub mod resolver;
pub mod scan;

pub use extract::{BuiltinClassifier, ExtractError, ImportExtractor, StdlibClassifier};
pub use resolver::{Collaborators, Resolver};
pub use scan::SourceScanner;
