//! Turns a unit's raw imports into the set of external modules it needs.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;
use std::path::Path;

use tracing::{debug, trace};
use vendo_core::naming;

use crate::extract::{BuiltinClassifier, ExtractError, ImportExtractor};

/// An import whose metadata could not be read. Resolution carries on without
/// its transitive imports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportFailure {
    pub import: String,
    pub reason: String,
}

impl fmt::Display for ImportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.import, self.reason)
    }
}

/// Output of [`ImportResolver::resolve`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedImports {
    /// Canonical module names, sorted and de-duplicated.
    pub names: Vec<String>,
    /// Imports whose metadata could not be read, sorted by import path.
    pub failures: Vec<ImportFailure>,
}

/// Walks imports transitively through every unit the extractor can see.
pub struct ImportResolver<'a> {
    extractor: &'a dyn ImportExtractor,
    classifier: &'a dyn BuiltinClassifier,
    vendoring: bool,
    cwd: &'a Path,
}

struct Walk {
    names: BTreeSet<String>,
    failures: BTreeMap<String, String>,
    visited: HashSet<String>,
}

impl<'a> ImportResolver<'a> {
    pub fn new(
        extractor: &'a dyn ImportExtractor,
        classifier: &'a dyn BuiltinClassifier,
        vendoring: bool,
        cwd: &'a Path,
    ) -> Self {
        Self {
            extractor,
            classifier,
            vendoring,
            cwd,
        }
    }

    /// Resolve `imports` of the unit named `owner`.
    ///
    /// Built-in imports are dropped. When vendoring is off, or an import
    /// already points into a vendor tree, it is skipped as well. Each
    /// remaining import is recursed into when its metadata can be read, then
    /// reduced to its base module name. Names equal to the unit that
    /// imported them are dropped.
    pub fn resolve(&self, owner: &str, imports: &[String]) -> ResolvedImports {
        let mut walk = Walk {
            names: BTreeSet::new(),
            failures: BTreeMap::new(),
            visited: HashSet::new(),
        };
        self.walk(owner, imports, &mut walk);
        ResolvedImports {
            names: walk.names.into_iter().collect(),
            failures: walk
                .failures
                .into_iter()
                .map(|(import, reason)| ImportFailure { import, reason })
                .collect(),
        }
    }

    fn walk(&self, owner: &str, imports: &[String], walk: &mut Walk) {
        for import in imports {
            if self.classifier.is_builtin(import) {
                trace!("{import} is built in");
                continue;
            }
            if !self.vendoring || naming::is_vendored(import) {
                continue;
            }

            if walk.visited.insert(import.clone()) {
                match self.extractor.import(import, self.cwd) {
                    Ok(meta) => self.walk(import, &meta.imports, walk),
                    Err(e) => {
                        if !matches!(e, ExtractError::NoBuildableSource { .. }) {
                            debug!("Not following {import}: {e}");
                        }
                        walk.failures.insert(import.clone(), e.to_string());
                    }
                }
            }

            let name = naming::base_module(import);
            if name == owner {
                continue;
            }
            walk.names.insert(name);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use vendo_core::module::UnitMeta;

    use super::*;
    use crate::extract::StdlibClassifier;

    #[derive(Default)]
    struct MapExtractor {
        units: HashMap<String, Vec<String>>,
        calls: AtomicUsize,
    }

    impl MapExtractor {
        fn with(mut self, name: &str, imports: &[&str]) -> Self {
            self.units.insert(
                name.to_string(),
                imports.iter().map(|s| s.to_string()).collect(),
            );
            self
        }
    }

    impl ImportExtractor for MapExtractor {
        fn import(&self, name: &str, _cwd: &Path) -> Result<UnitMeta, ExtractError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let imports = self.units.get(name).ok_or_else(|| ExtractError::NotFound {
                name: name.to_string(),
            })?;
            Ok(UnitMeta {
                dir: PathBuf::from(name),
                import_path: name.to_string(),
                imports: imports.clone(),
            })
        }
    }

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn reduces_to_sorted_base_modules() {
        let ex = MapExtractor::default();
        let r = ImportResolver::new(&ex, &StdlibClassifier, true, Path::new("."));
        let out = r.resolve(
            "github.com/me/app",
            &strings(&[
                "github.com/z/z/sub",
                "fmt",
                "github.com/a/a",
                "github.com/z/z",
                "github.com/me/app/internal",
            ]),
        );
        assert_eq!(out.names, vec!["github.com/a/a", "github.com/z/z"]);
        assert_eq!(out.failures.len(), 4);
    }

    #[test]
    fn follows_readable_imports_transitively() {
        let ex = MapExtractor::default()
            .with("github.com/a/a", &["github.com/b/b/x", "os"])
            .with("github.com/b/b/x", &["github.com/c/c"]);
        let r = ImportResolver::new(&ex, &StdlibClassifier, true, Path::new("."));
        let out = r.resolve("github.com/me/app", &strings(&["github.com/a/a"]));
        assert_eq!(
            out.names,
            vec!["github.com/a/a", "github.com/b/b", "github.com/c/c"]
        );
        assert_eq!(out.failures[0].import, "github.com/c/c");
    }

    #[test]
    fn disabled_vendoring_yields_nothing() {
        let ex = MapExtractor::default().with("github.com/a/a", &[]);
        let r = ImportResolver::new(&ex, &StdlibClassifier, false, Path::new("."));
        let out = r.resolve("", &strings(&["github.com/a/a", "fmt"]));
        assert!(out.names.is_empty());
        assert_eq!(ex.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn vendored_imports_are_skipped() {
        let ex = MapExtractor::default();
        let r = ImportResolver::new(&ex, &StdlibClassifier, true, Path::new("."));
        let out = r.resolve("", &strings(&["github.com/me/app/vendor/github.com/a/a"]));
        assert!(out.names.is_empty());
        assert_eq!(ex.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn import_cycles_terminate() {
        let ex = MapExtractor::default()
            .with("github.com/a/a", &["github.com/b/b"])
            .with("github.com/b/b", &["github.com/a/a"]);
        let r = ImportResolver::new(&ex, &StdlibClassifier, true, Path::new("."));
        let out = r.resolve("", &strings(&["github.com/a/a"]));
        assert_eq!(out.names, vec!["github.com/a/a", "github.com/b/b"]);
        assert_eq!(ex.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn output_does_not_depend_on_input_order() {
        let ex = MapExtractor::default()
            .with("github.com/a/a", &["github.com/c/c"])
            .with("github.com/b/b", &["github.com/c/c"]);
        let r = ImportResolver::new(&ex, &StdlibClassifier, true, Path::new("."));
        let one = r.resolve("", &strings(&["github.com/a/a", "github.com/b/b"]));
        let two = r.resolve("", &strings(&["github.com/b/b", "github.com/a/a"]));
        assert_eq!(one, two);
    }
}
