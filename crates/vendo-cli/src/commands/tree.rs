//! Handler for `vendo tree`.

use miette::Result;
use vendo_core::config::Config;
use vendo_ops::ops_tree::{self, TreeOptions};

pub fn exec(manifest: &str, depth: Option<usize>) -> Result<()> {
    let root = super::workspace_root(manifest)?;
    let config = Config::new(root).with_manifest_file(manifest);
    ops_tree::tree(&config, &TreeOptions { depth })
}
