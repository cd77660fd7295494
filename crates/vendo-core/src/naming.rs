//! Module naming rules: reducing import paths to the module that hosts them.

/// Number of path segments that identify a repository on a hosting service
/// (`host/owner/repo`).
const HOSTED_SEGMENTS: usize = 3;

/// Whether an import path refers to a vendored copy of a package.
pub fn is_vendored(import: &str) -> bool {
    import.contains("vendor")
}

/// Strip everything up to and including the last `vendor/` segment.
///
/// `github.com/me/app/vendor/github.com/pkg/errors` becomes
/// `github.com/pkg/errors`; paths without a vendor segment are returned as-is.
pub fn strip_vendor(import: &str) -> &str {
    if let Some(rest) = import.strip_prefix("vendor/") {
        return strip_vendor(rest);
    }
    match import.rfind("/vendor/") {
        Some(idx) => &import[idx + "/vendor/".len()..],
        None => import,
    }
}

/// Reduce an import path to the name of the module that hosts it.
///
/// Hosted paths (first segment contains a dot) keep `host/owner/repo` and drop
/// any subpackage segments below it. Anything else is returned unchanged.
pub fn base_module(import: &str) -> String {
    let import = strip_vendor(import).trim_matches('/');
    let parts: Vec<&str> = import.split('/').filter(|s| !s.is_empty()).collect();
    match parts.first() {
        Some(host) if host.contains('.') => {
            parts[..parts.len().min(HOSTED_SEGMENTS)].join("/")
        }
        _ => import.to_string(),
    }
}

/// Whether `name` is `owner` itself or one of its subpackages.
///
/// An unnamed owner has no subpackages.
pub fn is_subpackage(name: &str, owner: &str) -> bool {
    if owner.is_empty() {
        return false;
    }
    name == owner
        || name
            .strip_prefix(owner)
            .is_some_and(|rest| rest.starts_with('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_module_drops_subpackages() {
        assert_eq!(base_module("github.com/pkg/errors"), "github.com/pkg/errors");
        assert_eq!(
            base_module("github.com/stretchr/testify/assert"),
            "github.com/stretchr/testify"
        );
        assert_eq!(base_module("golang.org/x/net/context"), "golang.org/x/net");
    }

    #[test]
    fn base_module_keeps_short_hosted_paths() {
        assert_eq!(base_module("gopkg.in/yaml.v2"), "gopkg.in/yaml.v2");
    }

    #[test]
    fn base_module_strips_vendor_prefix() {
        assert_eq!(
            base_module("github.com/me/app/vendor/github.com/pkg/errors/sub"),
            "github.com/pkg/errors"
        );
        assert_eq!(base_module("vendor/golang.org/x/sys/unix"), "golang.org/x/sys");
    }

    #[test]
    fn base_module_leaves_unhosted_paths() {
        assert_eq!(base_module("internal/thing"), "internal/thing");
    }

    #[test]
    fn subpackage_is_segment_aware() {
        assert!(is_subpackage("github.com/a/b", "github.com/a/b"));
        assert!(is_subpackage("github.com/a/b/c", "github.com/a/b"));
        assert!(!is_subpackage("github.com/a/bc", "github.com/a/b"));
        assert!(!is_subpackage("github.com/a/b", ""));
    }

    #[test]
    fn vendored_paths() {
        assert!(is_vendored("github.com/me/app/vendor/x.org/y/z"));
        assert!(!is_vendored("github.com/pkg/errors"));
    }
}
