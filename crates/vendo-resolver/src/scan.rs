//! Default [`ImportExtractor`]: scans source files for import declarations.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use vendo_core::config::Config;
use vendo_core::module::UnitMeta;
use vendo_core::naming;

use crate::extract::{ExtractError, ImportExtractor};

fn single_import_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?m)^\s*import\s+(?:[\w.]+\s+)?"([^"]+)""#).expect("valid import regex")
    })
}

fn block_import_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(?ms)^\s*import\s*\((.*?)\)"#).expect("valid import regex"))
}

fn quoted_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?m)^\s*(?:[\w.]+\s+)?"([^"]+)""#).expect("valid import regex")
    })
}

/// Collect the import paths declared in one source text.
pub fn scan_imports_in_text(src: &str) -> BTreeSet<String> {
    let mut out: BTreeSet<String> = single_import_re()
        .captures_iter(src)
        .filter_map(|c| c.get(1).map(|m| m.as_str().to_string()))
        .collect();
    for block in block_import_re().captures_iter(src) {
        let Some(body) = block.get(1) else {
            continue;
        };
        out.extend(
            quoted_re()
                .captures_iter(body.as_str())
                .filter_map(|c| c.get(1).map(|m| m.as_str().to_string())),
        );
    }
    out
}

/// Locates modules under the install root (and the shared root, if any) and
/// reads imports from their non-test source files.
#[derive(Debug, Clone)]
pub struct SourceScanner {
    install_root: PathBuf,
    shared_root: Option<PathBuf>,
    extension: String,
}

impl SourceScanner {
    pub fn new(config: &Config) -> Self {
        Self {
            install_root: config.install_root.clone(),
            shared_root: config.shared_root.clone(),
            extension: config.source_extension.clone(),
        }
    }

    /// Import path `cwd` is known by: its location inside the shared root, or `.`.
    fn local_import_path(&self, cwd: &Path) -> String {
        self.shared_root
            .as_ref()
            .and_then(|root| vendo_util::fs::module_name_under(root, cwd))
            .unwrap_or_else(|| ".".to_string())
    }

    fn locate(&self, name: &str, cwd: &Path) -> Option<PathBuf> {
        if name == "." {
            return Some(cwd.to_path_buf());
        }
        let unvendored = naming::strip_vendor(name);
        let mut candidates = vec![vendo_util::fs::join_module_path(&self.install_root, unvendored)];
        if let Some(root) = &self.shared_root {
            candidates.push(vendo_util::fs::join_module_path(root, name));
        }
        candidates.into_iter().find(|p| p.is_dir())
    }

    fn is_source(&self, path: &Path) -> bool {
        let Some(file) = path.file_name().and_then(|f| f.to_str()) else {
            return false;
        };
        let suffix = format!(".{}", self.extension);
        let test_suffix = format!("_test.{}", self.extension);
        file.ends_with(&suffix) && !file.ends_with(&test_suffix) && !file.starts_with(['.', '_'])
    }
}

impl ImportExtractor for SourceScanner {
    fn import(&self, name: &str, cwd: &Path) -> Result<UnitMeta, ExtractError> {
        let dir = self.locate(name, cwd).ok_or_else(|| ExtractError::NotFound {
            name: name.to_string(),
        })?;
        let import_path = if name == "." {
            self.local_import_path(cwd)
        } else {
            name.to_string()
        };
        let io_err = |source| ExtractError::Io {
            name: name.to_string(),
            source,
        };

        let mut files: Vec<PathBuf> = fs::read_dir(&dir)
            .map_err(io_err)?
            .filter_map(Result::ok)
            .map(|e| e.path())
            .filter(|p| p.is_file() && self.is_source(p))
            .collect();
        if files.is_empty() {
            return Err(ExtractError::NoBuildableSource { dir, import_path });
        }
        files.sort();

        let mut imports = BTreeSet::new();
        for file in &files {
            let text = fs::read_to_string(file).map_err(io_err)?;
            imports.extend(scan_imports_in_text(&text));
        }
        Ok(UnitMeta {
            dir,
            import_path,
            imports: imports.into_iter().collect(),
        })
    }
}
