use vendo_core::manifest::ManifestDoc;
use vendo_util::errors::VendoError;

#[test]
fn parse_full_document() {
    let text = r#"
pkg = "github.com/me/app"
ver = "1.*"
ref = "abc123"
url = "git@example.com:me/app.git"

[[deps]]
pkg = "github.com/pkg/errors"
ver = "~0.8.0"

[[deps]]
pkg = "gopkg.in/yaml.v2"
ref = "v2.2.1"

[[deps.deps]]
pkg = "github.com/kr/pretty"
"#;
    let doc = ManifestDoc::parse(text).unwrap();
    assert_eq!(doc.pkg, "github.com/me/app");
    assert_eq!(doc.ver.as_deref(), Some("1.*"));
    assert_eq!(doc.reference.as_deref(), Some("abc123"));
    assert_eq!(doc.url.as_deref(), Some("git@example.com:me/app.git"));
    let deps = doc.deps.as_ref().unwrap();
    assert_eq!(deps.len(), 2);
    assert_eq!(deps[0].pkg, "github.com/pkg/errors");
    assert_eq!(deps[1].deps.as_ref().unwrap()[0].pkg, "github.com/kr/pretty");
    assert_eq!(doc.dependency_count(), 3);
}

#[test]
fn pkg_is_required() {
    let err = ManifestDoc::parse("ver = \"1.0\"\n").unwrap_err();
    assert!(matches!(err, VendoError::Manifest { .. }));
}

#[test]
fn optional_fields_are_omitted() {
    let doc = ManifestDoc::new("github.com/a/b");
    let text = doc.to_string_pretty().unwrap();
    assert!(text.contains("pkg = \"github.com/a/b\""));
    assert!(!text.contains("ver"));
    assert!(!text.contains("ref"));
    assert!(!text.contains("deps"));
}

#[test]
fn missing_file_is_io_error() {
    let tmp = tempfile::TempDir::new().unwrap();
    let err = ManifestDoc::from_path(&tmp.path().join("vendo.toml")).unwrap_err();
    assert!(matches!(err, VendoError::Io(_)));
}

#[test]
fn write_then_read_nested() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = tmp.path().join("vendo.toml");
    let mut child = ManifestDoc::new("github.com/b/c");
    child.deps = Some(vec![ManifestDoc::new("github.com/d/e")]);
    let mut doc = ManifestDoc::new("github.com/a/b");
    doc.ver = Some("^1.2".to_string());
    doc.deps = Some(vec![child]);
    doc.write_to(&path).unwrap();

    let back = ManifestDoc::from_path(&path).unwrap();
    assert_eq!(back, doc);
}
