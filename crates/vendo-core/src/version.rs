//! Version constraints and tag selection.
//!
//! A constraint such as `~1.0.0`, `1.*` or `v2` is matched against a module's
//! tags using semver requirement rules, tolerating a leading `v` on both sides.
//! Anything that does not parse as a requirement (a branch name, a commit) is
//! used verbatim as a reference.

use semver::{Version, VersionReq};

/// Parse a tag or version string, tolerating a leading `v` and missing
/// minor/patch components (`v2` parses as `2.0.0`).
pub fn parse_version_loose(raw: &str) -> Option<Version> {
    let t = raw.trim();
    let t = t.strip_prefix('v').unwrap_or(t);
    if t.is_empty() {
        return None;
    }
    if let Ok(v) = Version::parse(t) {
        return Some(v);
    }
    let core: Vec<&str> = t.split('.').collect();
    if core.len() > 3 || !core.iter().all(|c| !c.is_empty() && c.bytes().all(|b| b.is_ascii_digit())) {
        return None;
    }
    let part = |i: usize| core.get(i).and_then(|c| c.parse::<u64>().ok()).unwrap_or(0);
    Some(Version::new(part(0), part(1), part(2)))
}

fn is_req_boundary(ch: char) -> bool {
    ch.is_ascii_whitespace() || matches!(ch, ',' | '<' | '>' | '=' | '^' | '~')
}

/// Drop a `v` that directly precedes a version number inside a requirement.
fn strip_v_prefixes(raw: &str) -> String {
    let chars: Vec<char> = raw.trim().chars().collect();
    let mut out = String::with_capacity(chars.len());
    for (i, &ch) in chars.iter().enumerate() {
        if ch == 'v'
            && chars.get(i + 1).is_some_and(|c| c.is_ascii_digit())
            && (i == 0 || is_req_boundary(chars[i - 1]))
        {
            continue;
        }
        out.push(ch);
    }
    out
}

/// Parse a constraint as a semver requirement.
///
/// Returns `None` for strings that are not requirements, which callers treat
/// as literal references. A bare version (`1.2.3`, `v1.2.3`) keeps semver's
/// caret meaning.
pub fn parse_constraint(raw: &str) -> Option<VersionReq> {
    let t = raw.trim();
    if t.is_empty() || !t.chars().any(|c| c.is_ascii_digit() || c == '*') {
        return None;
    }
    VersionReq::parse(&strip_v_prefixes(t)).ok()
}

/// Pick the highest tag satisfying `constraint`.
///
/// Returns `None` when the constraint is not a requirement or no tag matches.
pub fn select_tag<'a>(constraint: &str, tags: &'a [String]) -> Option<&'a str> {
    let req = parse_constraint(constraint)?;
    let mut best: Option<(Version, &'a str)> = None;
    for tag in tags {
        let Some(ver) = parse_version_loose(tag) else {
            continue;
        };
        if !req.matches(&ver) {
            continue;
        }
        match &best {
            Some((b, _)) if ver <= *b => {}
            _ => best = Some((ver, tag.as_str())),
        }
    }
    best.map(|(_, tag)| tag)
}

/// Resolve the reference a checkout should move to.
///
/// A matching tag wins; otherwise the constraint itself is the reference.
pub fn resolve_target(constraint: &str, tags: &[String]) -> String {
    select_tag(constraint, tags)
        .map(str::to_string)
        .unwrap_or_else(|| constraint.trim().to_string())
}
