//! Hosting-service conventions: how a module name maps to a remote.

use crate::backend::VcsKind;

/// What the module name alone says about its repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inferred {
    pub kind: VcsKind,
    pub url: Option<String>,
    /// A version constraint encoded in the name (`gopkg.in/yaml.v2` → `v2`).
    pub version: Option<String>,
}

impl Inferred {
    fn none() -> Self {
        Self {
            kind: VcsKind::None,
            url: None,
            version: None,
        }
    }

    fn git(url: String) -> Self {
        Self {
            kind: VcsKind::Git,
            url: Some(url),
            version: None,
        }
    }
}

/// Split `name.vN` into (`name`, `vN`).
fn split_major_suffix(segment: &str) -> Option<(&str, &str)> {
    let (name, suffix) = segment.rsplit_once('.')?;
    let digits = suffix.strip_prefix('v')?;
    if name.is_empty() || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((name, suffix))
}

/// Infer backend kind, remote address and any encoded version from a module name.
pub fn infer(name: &str) -> Inferred {
    let parts: Vec<&str> = name.split('/').filter(|s| !s.is_empty()).collect();
    match parts.as_slice() {
        ["github.com", owner, repo, ..] => {
            Inferred::git(format!("git@github.com:{owner}/{repo}.git"))
        }
        ["bitbucket.org", owner, repo, ..] => {
            Inferred::git(format!("git@bitbucket.org:{owner}/{repo}.git"))
        }
        ["golang.org", "x", repo, ..] => {
            Inferred::git(format!("git@github.com:golang/{repo}.git"))
        }
        ["gopkg.in", owner, last, ..] => match split_major_suffix(last) {
            Some((repo, version)) => Inferred {
                version: Some(version.to_string()),
                ..Inferred::git(format!("git@github.com:{owner}/{repo}.git"))
            },
            None => Inferred::none(),
        },
        ["gopkg.in", last] => match split_major_suffix(last) {
            Some((repo, version)) => Inferred {
                version: Some(version.to_string()),
                ..Inferred::git(format!("git@github.com:go-{repo}/{repo}.git"))
            },
            None => Inferred::none(),
        },
        _ => Inferred::none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn github_uses_owner_and_repo() {
        let inf = infer("github.com/pkg/errors/sub");
        assert_eq!(inf.kind, VcsKind::Git);
        assert_eq!(inf.url.as_deref(), Some("git@github.com:pkg/errors.git"));
        assert_eq!(inf.version, None);
    }

    #[test]
    fn golang_x_maps_to_github_mirror() {
        let inf = infer("golang.org/x/net");
        assert_eq!(inf.url.as_deref(), Some("git@github.com:golang/net.git"));
    }

    #[test]
    fn gopkg_extracts_version_suffix() {
        let inf = infer("gopkg.in/fsnotify/fsnotify.v1");
        assert_eq!(inf.url.as_deref(), Some("git@github.com:fsnotify/fsnotify.git"));
        assert_eq!(inf.version.as_deref(), Some("v1"));

        let short = infer("gopkg.in/yaml.v2");
        assert_eq!(short.url.as_deref(), Some("git@github.com:go-yaml/yaml.git"));
        assert_eq!(short.version.as_deref(), Some("v2"));
    }

    #[test]
    fn dotted_names_keep_inner_dots() {
        let inf = infer("gopkg.in/src-d/go-git.v4");
        assert_eq!(inf.url.as_deref(), Some("git@github.com:src-d/go-git.git"));
        assert_eq!(inf.version.as_deref(), Some("v4"));
    }

    #[test]
    fn unknown_hosts_have_no_backend() {
        assert_eq!(infer("example.com/a/b"), Inferred::none());
        assert_eq!(infer("gopkg.in/yaml"), Inferred::none());
        assert_eq!(infer("github.com/only-owner").kind, VcsKind::None);
    }
}
