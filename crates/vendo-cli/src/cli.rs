//! CLI argument definitions for vendo.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "vendo",
    version,
    about = "Fetch, pin and record the dependencies a workspace imports",
    long_about = "vendo scans a workspace's sources for imports, installs every external \
                  module they reach into a vendor directory, pins each checkout to a \
                  version, and records the result in vendo.toml."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Manifest file name looked up in every module directory
    #[arg(long, global = true, env = "VENDO_MANIFEST", default_value = vendo_core::MANIFEST_FILE)]
    pub manifest: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Install the workspace's dependencies and update the manifest
    Install {
        /// Directory dependencies are checked out into [default: <workspace>/vendor]
        #[arg(long, env = "VENDO_INSTALL_ROOT")]
        install_root: Option<PathBuf>,

        /// Shared source tree that may already hold checkouts
        #[arg(long, env = "VENDO_SHARED_ROOT")]
        shared_root: Option<PathBuf>,

        /// Do not follow imports into dependencies
        #[arg(long)]
        no_vendoring: bool,

        #[arg(
            long,
            env = "VENDO_VENDORING",
            hide = true,
            default_value_t = true,
            action = ArgAction::Set
        )]
        vendoring: bool,
    },

    /// Display the dependency tree recorded in the manifest
    Tree {
        /// Maximum depth
        #[arg(long)]
        depth: Option<usize>,
    },
}

pub fn parse() -> Cli {
    Cli::parse()
}
