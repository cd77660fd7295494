use tempfile::TempDir;
use vendo_core::graph::ModuleGraph;
use vendo_core::module::ModuleNode;
use vendo_util::errors::VendoError;

fn graph_at(dir: &std::path::Path, name: &str) -> ModuleGraph {
    ModuleGraph::new(ModuleNode::new(name).with_path(dir))
}

#[test]
fn save_then_load_round_trips_scalars_and_subtree() {
    let tmp = TempDir::new().unwrap();
    let g = graph_at(tmp.path(), "github.com/me/app");
    let root = g.root();
    g.update(root, |n| {
        n.version = "~1.0.0".to_string();
        n.reference = "v1.0.2".to_string();
        n.url = "git@github.com:me/app.git".to_string();
    });
    let a = g.add_child(root, ModuleNode::new("github.com/a/a").with_version("1.*"));
    g.update(a, |n| n.reference = "deadbeef".to_string());
    g.add_child(a, ModuleNode::new("github.com/c/c"));
    g.add_child(root, ModuleNode::new("github.com/b/b"));
    g.save_manifest(root).unwrap();

    let fresh = graph_at(tmp.path(), "");
    fresh.load_manifest(fresh.root()).unwrap();
    let r = fresh.snapshot(fresh.root());
    assert_eq!(r.name, "github.com/me/app");
    assert_eq!(r.version, "~1.0.0");
    assert_eq!(r.reference, "v1.0.2");
    assert_eq!(r.url, "git@github.com:me/app.git");
    assert!(r.has_manifest);
    assert_eq!(fresh.to_manifest(fresh.root()), g.to_manifest(root));

    let fa = fresh.dependencies(fresh.root())[0];
    assert_eq!(fresh.read(fa, |n| n.reference.clone()), "deadbeef");
    let fc = fresh.dependencies(fa)[0];
    assert_eq!(fresh.parent(fc), Some(fa));
    assert_eq!(fresh.len(), 3);
}

#[test]
fn missing_manifest_clears_flag() {
    let tmp = TempDir::new().unwrap();
    let g = graph_at(tmp.path(), "github.com/me/app");
    g.update(g.root(), |n| n.has_manifest = true);
    let err = g.load_manifest(g.root()).unwrap_err();
    assert!(matches!(err, VendoError::Io(_)));
    assert!(!g.read(g.root(), |n| n.has_manifest));
}

#[test]
fn node_without_path_cannot_save() {
    let g = ModuleGraph::new(ModuleNode::new("github.com/me/app"));
    let err = g.save_manifest(g.root()).unwrap_err();
    assert!(matches!(err, VendoError::Manifest { .. }));
}

#[test]
fn save_to_unwritable_directory_fails() {
    let tmp = TempDir::new().unwrap();
    let g = graph_at(&tmp.path().join("does-not-exist"), "github.com/me/app");
    let err = g.save_manifest(g.root()).unwrap_err();
    assert!(matches!(err, VendoError::Manifest { .. }));
}

#[test]
fn custom_manifest_file_name_is_used() {
    let tmp = TempDir::new().unwrap();
    let g = ModuleGraph::new(
        ModuleNode::new("github.com/me/app")
            .with_path(tmp.path())
            .with_manifest_file("deps.toml"),
    );
    let path = g.save_manifest(g.root()).unwrap();
    assert_eq!(path, tmp.path().join("deps.toml"));
    assert!(path.is_file());
}
