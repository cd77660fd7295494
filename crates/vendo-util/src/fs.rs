//! Path helpers for workspaces and module directories.

use std::io;
use std::path::{Path, PathBuf};

/// The nearest directory at or above `start` that holds a file named `filename`.
pub fn find_ancestor_with(start: &Path, filename: &str) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(filename).is_file())
        .map(Path::to_path_buf)
}

/// Create `path` and any missing parents. Existing directories are fine.
pub fn ensure_dir(path: &Path) -> io::Result<()> {
    std::fs::create_dir_all(path)
}

/// Join a slash-separated module name onto `base`, one segment at a time.
///
/// Empty, `.` and `..` segments are dropped so a hostile name cannot escape `base`.
pub fn join_module_path(base: &Path, name: &str) -> PathBuf {
    name.split('/')
        .filter(|seg| !matches!(*seg, "" | "." | ".."))
        .fold(base.to_path_buf(), |dir, seg| dir.join(seg))
}

/// Inverse of [`join_module_path`]: the slash-separated name of `path`
/// relative to `base`, or `None` when `path` is `base` itself or lies outside it.
pub fn module_name_under(base: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(base).ok()?;
    let name = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    (!name.is_empty()).then_some(name)
}
