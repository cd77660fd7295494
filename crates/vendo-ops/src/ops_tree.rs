//! Operation: display the dependency tree recorded in the root manifest.

use vendo_core::config::Config;
use vendo_core::graph::ModuleGraph;
use vendo_core::module::ModuleNode;
use vendo_util::errors::VendoError;

/// Options for `vendo tree`.
#[derive(Debug, Default)]
pub struct TreeOptions {
    /// Maximum tree depth to display.
    pub depth: Option<usize>,
}

/// Render the recorded tree without touching the network.
pub fn render_tree(config: &Config, opts: &TreeOptions) -> miette::Result<String> {
    let root = ModuleNode::new("")
        .with_path(config.workspace_root.clone())
        .with_manifest_file(config.manifest_file.clone());
    let graph = ModuleGraph::new(root);
    let id = graph.root();

    let path = graph.manifest_path(id)?;
    if !path.is_file() {
        return Err(VendoError::Manifest {
            message: format!("no {} found", config.manifest_file),
        }
        .into());
    }
    graph.load_manifest(id)?;
    Ok(graph.print_tree(opts.depth))
}

/// Print the recorded dependency tree.
pub fn tree(config: &Config, opts: &TreeOptions) -> miette::Result<()> {
    print!("{}", render_tree(config, opts)?);
    Ok(())
}
