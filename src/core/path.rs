//! Helpers over `/`-separated repository paths.
//!
//! The repository root is the empty string. Nothing here touches the local
//! filesystem, so `std::path` is deliberately not involved: a repository path
//! always uses `/`, whatever the host platform.

pub const SEPARATOR: char = '/';

/// Everything before the last separator, or `""` for a root-level entry.
pub fn parent_path(path: &str) -> &str {
    match path.rfind(SEPARATOR) {
        Some(index) => &path[..index],
        None => "",
    }
}

/// Everything after the last separator, or the whole path.
pub fn file_name(path: &str) -> &str {
    match path.rfind(SEPARATOR) {
        Some(index) => &path[index + 1..],
        None => path,
    }
}

pub fn is_descendant_or_self(candidate: &str, ancestor: &str) -> bool {
    candidate == ancestor || is_strict_descendant(candidate, ancestor)
}

pub fn is_strict_descendant(candidate: &str, ancestor: &str) -> bool {
    if ancestor.is_empty() {
        return !candidate.is_empty();
    }
    candidate.len() > ancestor.len()
        && candidate.starts_with(ancestor)
        && candidate[ancestor.len()..].starts_with(SEPARATOR)
}

/// Join a name onto a parent directory; a root parent adds no separator.
pub fn join(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_owned()
    } else {
        format!("{parent}{SEPARATOR}{name}")
    }
}

/// Replace the `old` prefix of `path` with `new`, keeping the remainder
/// verbatim. Returns `None` when `path` is neither `old` nor nested under it.
pub fn rebase(path: &str, old: &str, new: &str) -> Option<String> {
    if path == old {
        return Some(new.to_owned());
    }
    if !old.is_empty() && is_strict_descendant(path, old) {
        let mut rebased = String::with_capacity(new.len() + path.len() - old.len());
        rebased.push_str(new);
        rebased.push_str(&path[old.len()..]);
        return Some(rebased);
    }
    None
}

/// Number of ancestors between `path` and the root.
pub fn depth(path: &str) -> usize {
    path.matches(SEPARATOR).count()
}

/// Non-empty, no leading or trailing separator, no empty segments.
pub fn is_well_formed(path: &str) -> bool {
    !path.is_empty() && path.split(SEPARATOR).all(|segment| !segment.is_empty())
}

/// Every proper ancestor of `path`, nearest to the root first.
pub fn ancestors(path: &str) -> impl Iterator<Item = &str> {
    path.match_indices(SEPARATOR).map(move |(index, _)| &path[..index])
}
