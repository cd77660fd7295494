//! Command dispatch and handler modules.

mod install;
mod tree;

use std::path::PathBuf;

use miette::Result;
use vendo_util::errors::VendoError;

use crate::cli::{Cli, Command};

/// Route a parsed CLI invocation to the appropriate command handler.
pub async fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Install {
            install_root,
            shared_root,
            no_vendoring,
            vendoring,
        } => {
            install::exec(
                &cli.manifest,
                install_root,
                shared_root,
                vendoring && !no_vendoring,
                cli.verbose,
            )
            .await
        }
        Command::Tree { depth } => tree::exec(&cli.manifest, depth),
    }
}

/// The nearest directory at or above the current one holding `manifest`,
/// or the current directory when there is none.
fn workspace_root(manifest: &str) -> Result<PathBuf> {
    let cwd = std::env::current_dir().map_err(VendoError::Io)?;
    Ok(vendo_util::fs::find_ancestor_with(&cwd, manifest).unwrap_or(cwd))
}
