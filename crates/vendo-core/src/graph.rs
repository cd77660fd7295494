//! The module graph: an arena of [`ModuleNode`]s owned root-to-leaves.
//!
//! Every node lives in one arena behind a graph-wide read/write lock. Children
//! are owned through each node's ordered `dependencies` list; the `parent`
//! link is a plain [`NodeId`] used only for ancestor lookups. Nodes are never
//! removed from the arena; a subtree replaced by a manifest load simply
//! becomes unreachable from the root.
//!
//! Because lookups and insertions take the same lock, [`ModuleGraph::attach`]
//! is an atomic find-or-insert: two tasks discovering the same module at once
//! cannot both create it.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::manifest::{non_empty, ManifestDoc};
use crate::module::{ModuleNode, NodeId};
use crate::naming::is_subpackage;

/// Result of [`ModuleGraph::attach`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attach {
    /// A new child was created under the requesting node.
    Created(NodeId),
    /// The module already exists in the requesting node's ancestor scope.
    Existing(NodeId),
    /// The name is the requesting node itself or one of its ancestors.
    Ancestor(NodeId),
}

impl Attach {
    pub fn id(self) -> NodeId {
        match self {
            Attach::Created(id) | Attach::Existing(id) | Attach::Ancestor(id) => id,
        }
    }
}

/// Arena-backed dependency tree.
#[derive(Debug)]
pub struct ModuleGraph {
    nodes: RwLock<Vec<ModuleNode>>,
}

const ROOT: NodeId = NodeId(0);

impl ModuleGraph {
    /// Create a graph whose root is `root`.
    pub fn new(mut root: ModuleNode) -> Self {
        root.parent = None;
        root.dependencies.clear();
        Self {
            nodes: RwLock::new(vec![root]),
        }
    }

    fn read_lock(&self) -> RwLockReadGuard<'_, Vec<ModuleNode>> {
        self.nodes.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_lock(&self) -> RwLockWriteGuard<'_, Vec<ModuleNode>> {
        self.nodes.write().unwrap_or_else(|e| e.into_inner())
    }

    pub fn root(&self) -> NodeId {
        ROOT
    }

    /// Run `f` against a node under the read lock.
    pub fn read<R>(&self, id: NodeId, f: impl FnOnce(&ModuleNode) -> R) -> R {
        let nodes = self.read_lock();
        f(&nodes[id.0])
    }

    /// Run `f` against a node under the write lock.
    pub fn update<R>(&self, id: NodeId, f: impl FnOnce(&mut ModuleNode) -> R) -> R {
        let mut nodes = self.write_lock();
        f(&mut nodes[id.0])
    }

    /// A copy of the node as it is right now.
    pub fn snapshot(&self, id: NodeId) -> ModuleNode {
        self.read(id, Clone::clone)
    }

    pub fn name(&self, id: NodeId) -> String {
        self.read(id, |n| n.name.clone())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.read(id, |n| n.parent)
    }

    pub fn is_root(&self, id: NodeId) -> bool {
        self.read(id, ModuleNode::is_root)
    }

    /// Direct dependencies of `id`, in discovery order.
    pub fn dependencies(&self, id: NodeId) -> Vec<NodeId> {
        self.read(id, |n| n.dependencies.clone())
    }

    /// `id` followed by each of its ancestors up to the root.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let nodes = self.read_lock();
        chain(&nodes, id)
    }

    /// Find the nearest node called `name`: first among `from`'s direct
    /// dependencies, then among each ancestor's direct dependencies in turn.
    pub fn find(&self, from: NodeId, name: &str) -> Option<NodeId> {
        let nodes = self.read_lock();
        find_in(&nodes, from, name)
    }

    /// Find `name` in `parent`'s scope, or create it as a new child of `parent`.
    ///
    /// The lookup and the insertion happen under one write lock. Names equal to
    /// `parent` or any of its ancestors are never inserted.
    pub fn attach(&self, parent: NodeId, name: &str) -> Attach {
        let mut nodes = self.write_lock();
        if let Some(anc) = chain(&nodes, parent)
            .into_iter()
            .find(|&a| nodes[a.0].name == name)
        {
            return Attach::Ancestor(anc);
        }
        if let Some(existing) = find_in(&nodes, parent, name) {
            return Attach::Existing(existing);
        }
        let manifest_file = nodes[parent.0].manifest_file.clone();
        let child = ModuleNode::new(name).with_manifest_file(manifest_file);
        Attach::Created(push_child(&mut nodes, parent, child))
    }

    /// Append `node` as the last dependency of `parent`, without any lookup.
    pub fn add_child(&self, parent: NodeId, node: ModuleNode) -> NodeId {
        let mut nodes = self.write_lock();
        push_child(&mut nodes, parent, node)
    }

    /// Overwrite `id` with the fields present in `doc`.
    ///
    /// When the document carries `deps`, the node's dependency list is
    /// replaced by freshly built nodes whose parent links point back into
    /// this graph. Entries naming the node, one of its ancestors, or a module
    /// already in scope are not inserted.
    pub fn apply_manifest(&self, id: NodeId, doc: &ManifestDoc) {
        let mut nodes = self.write_lock();
        {
            let node = &mut nodes[id.0];
            if !doc.pkg.is_empty() {
                node.name = doc.pkg.clone();
            }
            if let Some(ver) = &doc.ver {
                node.version = ver.clone();
            }
            if let Some(reference) = &doc.reference {
                node.reference = reference.clone();
            }
            if let Some(url) = &doc.url {
                node.url = url.clone();
            }
        }
        if let Some(deps) = &doc.deps {
            nodes[id.0].dependencies.clear();
            for dep in deps {
                hydrate(&mut nodes, id, dep);
            }
        }
    }

    /// Serialize `id` and its subtree into a manifest document.
    ///
    /// Descendants that keep a manifest of their own are written without
    /// their `deps`; each such module records its own transitive graph.
    pub fn to_manifest(&self, id: NodeId) -> ManifestDoc {
        let nodes = self.read_lock();
        to_doc(&nodes, id, true)
    }

    /// Number of nodes reachable from the root, excluding the root.
    pub fn len(&self) -> usize {
        let nodes = self.read_lock();
        let mut count = 0;
        let mut stack = nodes[ROOT.0].dependencies.clone();
        while let Some(id) = stack.pop() {
            count += 1;
            stack.extend(nodes[id.0].dependencies.iter().copied());
        }
        count
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every node reachable from the root in depth-first discovery order,
    /// excluding the root.
    pub fn descendants(&self) -> Vec<NodeId> {
        let nodes = self.read_lock();
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = nodes[ROOT.0].dependencies.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(nodes[id.0].dependencies.iter().rev().copied());
        }
        out
    }

    /// Render the tree below the root with box-drawing connectors.
    pub fn print_tree(&self, max_depth: Option<usize>) -> String {
        let nodes = self.read_lock();
        let mut output = format!("{}\n", nodes[ROOT.0]);
        let deps = &nodes[ROOT.0].dependencies;
        let count = deps.len();
        for (i, child) in deps.iter().enumerate() {
            print_subtree(&nodes, &mut output, *child, "", i == count - 1, 1, max_depth);
        }
        output
    }
}

fn chain(nodes: &[ModuleNode], id: NodeId) -> Vec<NodeId> {
    let mut out = vec![id];
    let mut current = nodes[id.0].parent;
    while let Some(p) = current {
        out.push(p);
        current = nodes[p.0].parent;
    }
    out
}

fn find_in(nodes: &[ModuleNode], from: NodeId, name: &str) -> Option<NodeId> {
    let mut current = Some(from);
    while let Some(id) = current {
        let node = &nodes[id.0];
        if let Some(&dep) = node
            .dependencies
            .iter()
            .find(|d| nodes[d.0].name == name)
        {
            return Some(dep);
        }
        current = node.parent;
    }
    None
}

fn push_child(nodes: &mut Vec<ModuleNode>, parent: NodeId, mut child: ModuleNode) -> NodeId {
    let id = NodeId(nodes.len());
    child.parent = Some(parent);
    child.dependencies.clear();
    nodes.push(child);
    nodes[parent.0].dependencies.push(id);
    id
}

/// Insert `doc` under `parent` unless its name is already taken in scope.
///
/// Names of `parent` and its ancestors, or of their subpackages, are dropped.
/// A module already visible from `parent` is left where it is.
fn hydrate(nodes: &mut Vec<ModuleNode>, parent: NodeId, doc: &ManifestDoc) {
    if doc.pkg.is_empty() {
        return;
    }
    let in_chain = chain(nodes, parent)
        .into_iter()
        .any(|a| is_subpackage(&doc.pkg, &nodes[a.0].name));
    if in_chain || find_in(nodes, parent, &doc.pkg).is_some() {
        tracing::debug!("Skipping {} listed under {}", doc.pkg, nodes[parent.0].name);
        return;
    }
    let manifest_file = nodes[parent.0].manifest_file.clone();
    let mut node = ModuleNode::new(doc.pkg.clone()).with_manifest_file(manifest_file);
    node.version = doc.ver.clone().unwrap_or_default();
    node.reference = doc.reference.clone().unwrap_or_default();
    node.url = doc.url.clone().unwrap_or_default();
    let id = push_child(nodes, parent, node);
    for dep in doc.deps.iter().flatten() {
        hydrate(nodes, id, dep);
    }
}

fn to_doc(nodes: &[ModuleNode], id: NodeId, owner: bool) -> ManifestDoc {
    let node = &nodes[id.0];
    let own_graph = !owner && node.has_manifest && !node.is_root();
    let deps = if own_graph || node.dependencies.is_empty() {
        None
    } else {
        Some(
            node.dependencies
                .iter()
                .map(|&d| to_doc(nodes, d, false))
                .collect(),
        )
    };
    ManifestDoc {
        pkg: node.name.clone(),
        ver: non_empty(&node.version),
        reference: non_empty(&node.reference),
        url: non_empty(&node.url),
        deps,
    }
}

fn print_subtree(
    nodes: &[ModuleNode],
    output: &mut String,
    id: NodeId,
    prefix: &str,
    is_last: bool,
    depth: usize,
    max_depth: Option<usize>,
) {
    let connector = if is_last { "└── " } else { "├── " };
    let node = &nodes[id.0];
    output.push_str(&format!("{prefix}{connector}{node}\n"));

    if let Some(max) = max_depth {
        if depth >= max {
            return;
        }
    }

    let child_prefix = format!("{prefix}{}", if is_last { "    " } else { "│   " });
    let count = node.dependencies.len();
    for (i, child) in node.dependencies.iter().enumerate() {
        print_subtree(
            nodes,
            output,
            *child,
            &child_prefix,
            i == count - 1,
            depth + 1,
            max_depth,
        );
    }
}
